//! Controls Manager
//!
//! Game-agnostic glue between hardware inputs and abstract actions. Inputs
//! feed per-source values as they arrive; once per frame, [`ControlsManager::new_frame`]
//! turns the values of every bound action type into a queue of [`Action`]s.
//!
//! An action type's value is the highest value among the sources bound to
//! it, so a stick and a D-pad bound to the same action don't fight.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::source::{Input, InputSource, InputSourceKind};
use crate::math::interpolate_number;
use crate::timing::{AutoRepeater, AutoRepeaterSettings};

/// How an action type reads its source values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionValueType {
    /// Any value in [0, 1].
    #[default]
    Analog,
    /// 0 or 1. Analog sources count as pressed from 0.5 up.
    Digital,
}

/// A kind of action the game understands.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActionType {
    pub id: i32,
    pub value_type: ActionValueType,
    /// 0 disables auto-repeat. Otherwise, the value above which a held
    /// action starts repeating.
    pub auto_repeat: f32,
    /// Every input bound to this type is queued as its own action right
    /// away, instead of feeding the held value.
    pub direct_events: bool,
    /// How long a reinserted action of this type may keep coming back.
    /// 0 forbids reinsertion.
    pub reinsertion_ttl: f32,
}

/// Flags on an emitted [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ActionFlags(u8);

impl ActionFlags {
    pub const NONE: ActionFlags = ActionFlags(0);
    /// Emitted by auto-repeat.
    pub const REPEAT: ActionFlags = ActionFlags(1 << 0);
    /// Put back in the queue with [`ControlsManager::reinsert_action`].
    pub const REINSERTED: ActionFlags = ActionFlags(1 << 1);

    pub fn contains(self, other: ActionFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: ActionFlags) {
        self.0 |= other.0;
    }
}

/// One input source bound to one action type for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bind {
    pub action_type_id: i32,
    /// Starts at 1. 0 if not applicable.
    pub player_nr: i32,
    pub input_source: InputSource,
}

/// What the player wants to do, regardless of how they did it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Action {
    pub action_type_id: i32,
    pub player_nr: i32,
    /// In [0, 1].
    pub value: f32,
    pub flags: ActionFlags,
    /// Time left before this action can no longer be reinserted.
    pub reinsertion_lifetime: f32,
}

/// Controls tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsOptions {
    /// Stick tilts below this read as 0.
    pub stick_min_deadzone: f32,
    /// Stick tilts above this read as 1.
    pub stick_max_deadzone: f32,
    /// Auto-repeat interval when a hold starts.
    pub auto_repeat_max_interval: f32,
    /// Auto-repeat interval once fully ramped.
    pub auto_repeat_min_interval: f32,
    /// Hold time to ramp from the max interval to the min one.
    pub auto_repeat_ramp_time: f32,
}

impl Default for ControlsOptions {
    fn default() -> Self {
        Self {
            stick_min_deadzone: 0.0,
            stick_max_deadzone: 1.0,
            auto_repeat_max_interval: 0.3,
            auto_repeat_min_interval: 0.05,
            auto_repeat_ramp_time: 0.9,
        }
    }
}

impl ControlsOptions {
    pub fn auto_repeat_settings(&self) -> AutoRepeaterSettings {
        AutoRepeaterSettings {
            slowest_interval: self.auto_repeat_max_interval,
            fastest_interval: self.auto_repeat_min_interval,
            ramp_time: self.auto_repeat_ramp_time,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ActionTypeStatus {
    value: f32,
    old_value: f32,
    repeater: AutoRepeater,
}

/// Stick key: device and stick number.
type StickId = (i32, i32);

#[derive(Debug, Clone, Default)]
pub struct ControlsManager {
    /// Registered action types, by ID.
    pub action_types: BTreeMap<i32, ActionType>,
    /// Binds in insertion order. Several binds may share an action type.
    pub binds: Vec<Bind>,
    /// While true, [`Self::new_frame`] swallows every action.
    pub ignoring_actions: bool,
    pub options: ControlsOptions,

    statuses: BTreeMap<i32, ActionTypeStatus>,
    queue: Vec<Action>,
    raw_sticks: HashMap<StickId, [f32; 2]>,
    clean_sticks: HashMap<StickId, [f32; 2]>,
    source_values: BTreeMap<InputSource, f32>,
    /// Scroll not yet worth a whole notch, per wheel direction.
    wheel_remainders: BTreeMap<InputSource, f32>,
    ignored_sources: Vec<InputSource>,
    last_dt: f32,
}

impl ControlsManager {
    pub fn new(options: ControlsOptions) -> Self {
        Self { options, ..Default::default() }
    }

    pub fn add_action_type(&mut self, action_type: ActionType) {
        self.action_types.insert(action_type.id, action_type);
    }

    /// Current value of an action type: the highest among its bound sources.
    pub fn get_value(&self, action_type_id: i32) -> f32 {
        self.binds
            .iter()
            .filter(|b| b.action_type_id == action_type_id)
            .filter_map(|b| self.source_values.get(&b.input_source))
            .fold(0.0, |acc: f32, v| acc.max(*v))
    }

    /// Last value received from a source. 0 if nothing was received.
    pub fn get_input_source_value(&self, source: &InputSource) -> f32 {
        self.source_values.get(source).copied().unwrap_or(0.0)
    }

    /// Feeds a hardware input.
    ///
    /// Stick axes go through the radial deadzone and then update all four
    /// half-axis sources of their stick. Wheel scrolls accumulate, and each
    /// whole notch becomes one action queued directly. Everything else
    /// stores its value.
    pub fn handle_input(&mut self, input: Input) {
        let src = input.source;
        match src.kind {
            InputSourceKind::None => {}
            InputSourceKind::ControllerAxisPos | InputSourceKind::ControllerAxisNeg => {
                let clean = self.clean_stick(input);
                for (axis, positive) in [(0, true), (0, false), (1, true), (1, false)] {
                    let v = clean[axis as usize];
                    let value = if positive { v.max(0.0) } else { (-v).max(0.0) };
                    let source = InputSource::controller_axis(src.device_nr, src.stick_nr, axis, positive);
                    self.handle_clean_input(Input::new(source, value), false);
                }
            }
            kind if kind.is_wheel() => {
                let acc = self.wheel_remainders.entry(src).or_default();
                *acc += input.value.max(0.0);
                let notches = acc.floor();
                *acc -= notches;
                for _ in 0..notches as u32 {
                    self.handle_clean_input(Input::new(src, 1.0), true);
                }
            }
            _ => self.handle_clean_input(input, false),
        }
    }

    /// Applies the radial deadzone to the stick this input belongs to.
    fn clean_stick(&mut self, input: Input) -> [f32; 2] {
        let src = input.source;
        let id = (src.device_nr, src.stick_nr);
        let raw = self.raw_sticks.entry(id).or_default();
        let signed = if src.kind == InputSourceKind::ControllerAxisPos { input.value } else { -input.value };
        if let Some(axis) = raw.get_mut(src.axis_nr as usize) {
            *axis = signed;
        }

        let (x, y) = (raw[0], raw[1]);
        let radius = (x * x + y * y).sqrt();
        let (inner, outer) = (self.options.stick_min_deadzone, self.options.stick_max_deadzone);
        let clean_radius = if outer <= inner {
            if radius >= inner { 1.0 } else { 0.0 }
        } else {
            interpolate_number(radius, inner, outer, 0.0, 1.0).clamp(0.0, 1.0)
        };
        let clean = if radius > 0.0 {
            [x / radius * clean_radius, y / radius * clean_radius]
        } else {
            [0.0, 0.0]
        };
        self.clean_sticks.insert(id, clean);
        clean
    }

    /// Stores or queues an input whose value is already in [0, 1].
    /// Transient inputs (wheel notches) are queued but never held.
    fn handle_clean_input(&mut self, input: Input, transient: bool) {
        let ignored = self.process_input_ignoring(&input);
        if !transient {
            self.source_values
                .insert(input.source, if ignored { 0.0 } else { input.value });
        }
        if ignored {
            return;
        }

        for bind in self.binds.iter().filter(|b| b.input_source == input.source) {
            let action_type = self.action_types.get(&bind.action_type_id).copied().unwrap_or_default();
            if !transient && !action_type.direct_events {
                continue;
            }
            self.queue.push(Action {
                action_type_id: bind.action_type_id,
                player_nr: bind.player_nr,
                value: convert_action_value(&action_type, input.value),
                flags: ActionFlags::NONE,
                reinsertion_lifetime: action_type.reinsertion_ttl,
            });
        }
    }

    /// Whether the input must be ignored. A release ends the ignoring.
    fn process_input_ignoring(&mut self, input: &Input) -> bool {
        let Some(idx) = self.ignored_sources.iter().position(|s| *s == input.source) else {
            return false;
        };
        if input.value == 0.0 {
            self.ignored_sources.remove(idx);
        }
        true
    }

    /// Ignores a source until it reports 0. With `now_only`, this only
    /// happens if the source is held right now. Returns whether the source
    /// is now being ignored by this call.
    pub fn start_ignoring_input_source(&mut self, source: InputSource, now_only: bool) -> bool {
        if self.ignored_sources.contains(&source) {
            return false;
        }
        if now_only && self.get_input_source_value(&source) == 0.0 {
            return false;
        }
        self.ignored_sources.push(source);
        if let Some(v) = self.source_values.get_mut(&source) {
            *v = 0.0;
        }
        true
    }

    pub fn is_ignoring_input_source(&self, source: &InputSource) -> bool {
        self.ignored_sources.contains(source)
    }

    /// Returns the actions of the frame that just ended and starts a new one.
    ///
    /// Queues an action for every type whose value changed, then auto-repeats
    /// for held types past their threshold. Direct and reinserted actions
    /// queued since the last call come first.
    pub fn new_frame(&mut self, dt: f32) -> Vec<Action> {
        self.last_dt = dt;

        let ids: Vec<i32> = self.action_types.keys().copied().collect();
        for id in ids {
            let value = convert_action_value(&self.action_types[&id], self.get_value(id));
            self.statuses.entry(id).or_default().value = value;
        }

        let settings = self.options.auto_repeat_settings();
        let Self { statuses, action_types, queue, .. } = self;

        for (id, status) in statuses.iter_mut() {
            let action_type = action_types.get(id).copied().unwrap_or_default();
            if status.old_value != status.value {
                queue.push(Action {
                    action_type_id: *id,
                    value: status.value,
                    reinsertion_lifetime: action_type.reinsertion_ttl,
                    ..Default::default()
                });
            }

            status.repeater.settings = settings;
            let is_active = status.value != 0.0;
            let was_active = status.old_value != 0.0;
            if is_active != was_active {
                if is_active {
                    status.repeater.start();
                } else {
                    status.repeater.stop();
                }
                continue;
            }

            let triggers = status.repeater.tick(dt);
            if action_type.auto_repeat <= 0.0 || status.value <= action_type.auto_repeat {
                continue;
            }
            for _ in 0..triggers {
                queue.push(Action {
                    action_type_id: *id,
                    value: status.value,
                    flags: ActionFlags::REPEAT,
                    reinsertion_lifetime: action_type.reinsertion_ttl,
                    ..Default::default()
                });
            }
        }

        for status in self.statuses.values_mut() {
            status.old_value = status.value;
        }

        let actions = std::mem::take(&mut self.queue);
        if self.ignoring_actions { Vec::new() } else { actions }
    }

    /// Puts an action back so the next [`Self::new_frame`] returns it again.
    /// Fails if its type forbids it, its lifetime ran out, or no frame has
    /// passed yet.
    pub fn reinsert_action(&mut self, action: Action) -> bool {
        let ttl = self.action_types.get(&action.action_type_id).map(|t| t.reinsertion_ttl).unwrap_or(0.0);
        if ttl <= 0.0 || action.reinsertion_lifetime <= 0.0 || self.last_dt == 0.0 {
            return false;
        }
        let mut action = action;
        action.reinsertion_lifetime -= self.last_dt;
        action.flags.insert(ActionFlags::REINSERTED);
        self.queue.push(action);
        true
    }

    /// Forgets every held source value, as if everything was let go.
    pub fn release_everything(&mut self) {
        self.source_values.clear();
        self.raw_sticks.clear();
        self.clean_sticks.clear();
        self.wheel_remainders.clear();
    }

    /// Forces the stored value of every source bound to an action type.
    pub fn set_value(&mut self, action_type_id: i32, value: f32) {
        for bind in self.binds.iter().filter(|b| b.action_type_id == action_type_id) {
            self.source_values.insert(bind.input_source, value);
        }
    }

    /// Cleaned position of a stick, each axis in [-1, 1].
    pub fn stick_position(&self, device_nr: i32, stick_nr: i32) -> [f32; 2] {
        self.clean_sticks.get(&(device_nr, stick_nr)).copied().unwrap_or_default()
    }
}

fn convert_action_value(action_type: &ActionType, value: f32) -> f32 {
    match action_type.value_type {
        ActionValueType::Analog => value,
        ActionValueType::Digital => {
            if value >= 0.5 { 1.0 } else { 0.0 }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JUMP: i32 = 1;
    const MENU: i32 = 2;
    const WHEEL: i32 = 3;

    fn manager() -> ControlsManager {
        let mut m = ControlsManager::new(ControlsOptions::default());
        m.add_action_type(ActionType { id: JUMP, value_type: ActionValueType::Digital, ..Default::default() });
        m.add_action_type(ActionType { id: MENU, auto_repeat: 0.5, ..Default::default() });
        m.add_action_type(ActionType { id: WHEEL, ..Default::default() });
        m.binds.push(Bind { action_type_id: JUMP, player_nr: 1, input_source: InputSource::key(75) });
        m.binds.push(Bind { action_type_id: JUMP, player_nr: 1, input_source: InputSource::mouse_button(1) });
        m.binds.push(Bind { action_type_id: MENU, player_nr: 1, input_source: InputSource::key(84) });
        m.binds.push(Bind {
            action_type_id: WHEEL,
            player_nr: 1,
            input_source: InputSource::wheel(InputSourceKind::MouseWheelDown),
        });
        m
    }

    #[test]
    fn test_press_and_release_queue_changes() {
        let mut m = manager();
        m.handle_input(Input::new(InputSource::key(75), 1.0));
        let a = m.new_frame(0.016);
        assert_eq!(a.len(), 1);
        assert_eq!((a[0].action_type_id, a[0].value), (JUMP, 1.0));

        assert!(m.new_frame(0.016).is_empty());

        m.handle_input(Input::new(InputSource::key(75), 0.0));
        let a = m.new_frame(0.016);
        assert_eq!((a[0].action_type_id, a[0].value), (JUMP, 0.0));
    }

    #[test]
    fn test_value_is_highest_bound_source() {
        let mut m = manager();
        m.handle_input(Input::new(InputSource::key(75), 1.0));
        m.handle_input(Input::new(InputSource::mouse_button(1), 0.0));
        assert_eq!(m.get_value(JUMP), 1.0);
        m.handle_input(Input::new(InputSource::key(75), 0.0));
        assert_eq!(m.get_value(JUMP), 0.0);
    }

    #[test]
    fn test_wheel_notches_are_direct() {
        let mut m = manager();
        m.handle_input(Input::new(InputSource::wheel(InputSourceKind::MouseWheelDown), 3.0));
        let a = m.new_frame(0.016);
        assert_eq!(a.iter().filter(|a| a.action_type_id == WHEEL && a.value == 1.0).count(), 3);
        assert_eq!(m.get_value(WHEEL), 0.0);
        assert!(m.new_frame(0.016).is_empty());
    }

    #[test]
    fn test_fractional_wheel_scrolls_add_up() {
        let mut m = manager();
        let down = InputSource::wheel(InputSourceKind::MouseWheelDown);
        let mut fired = 0;
        for _ in 0..12 {
            m.handle_input(Input::new(down, 0.25));
            fired += m.new_frame(0.016).iter().filter(|a| a.action_type_id == WHEEL).count();
        }
        assert_eq!(fired, 3);

        m.handle_input(Input::new(down, 0.75));
        assert!(m.new_frame(0.016).is_empty());
        m.handle_input(Input::new(down, 0.5));
        assert_eq!(m.new_frame(0.016).len(), 1);
    }

    #[test]
    fn test_auto_repeat_ramps() {
        let mut m = manager();
        m.handle_input(Input::new(InputSource::key(84), 1.0));
        assert_eq!(m.new_frame(0.11).len(), 1);

        // First repeat after the max interval.
        let mut repeats = 0;
        for _ in 0..2 {
            repeats += m.new_frame(0.11).len();
        }
        assert_eq!(repeats, 0);
        let a = m.new_frame(0.11);
        assert_eq!(a.len(), 1);
        assert!(a[0].flags.contains(ActionFlags::REPEAT));

        // Repeats come faster the longer it's held.
        let mut late = 0;
        for _ in 0..10 {
            late += m.new_frame(0.11).len();
        }
        assert!(late > 3, "{late}");
    }

    #[test]
    fn test_digital_types_never_repeat_without_threshold() {
        let mut m = manager();
        m.handle_input(Input::new(InputSource::key(75), 1.0));
        let total: usize = (0..30).map(|_| m.new_frame(0.1).len()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_stick_deadzone_and_half_axes() {
        let mut m = manager();
        m.options.stick_min_deadzone = 0.2;
        m.options.stick_max_deadzone = 0.8;

        m.handle_input(Input::new(InputSource::controller_axis(0, 0, 0, false), 0.1));
        assert_eq!(m.stick_position(0, 0), [0.0, 0.0]);

        m.handle_input(Input::new(InputSource::controller_axis(0, 0, 0, false), 0.5));
        let pos = m.stick_position(0, 0);
        assert!((pos[0] + 0.5).abs() < 1e-5);
        assert_eq!(m.get_input_source_value(&InputSource::controller_axis(0, 0, 0, true)), 0.0);
        let neg = m.get_input_source_value(&InputSource::controller_axis(0, 0, 0, false));
        assert!((neg - 0.5).abs() < 1e-5);

        m.handle_input(Input::new(InputSource::controller_axis(0, 0, 0, true), 0.95));
        let pos = m.get_input_source_value(&InputSource::controller_axis(0, 0, 0, true));
        assert!((pos - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_ignore_until_release() {
        let mut m = manager();
        let key = InputSource::key(75);
        m.handle_input(Input::new(key, 1.0));
        m.new_frame(0.016);

        assert!(m.start_ignoring_input_source(key, true));
        assert!(!m.start_ignoring_input_source(key, true));
        assert_eq!(m.get_value(JUMP), 0.0);

        // Key repeat from the OS while still held.
        m.handle_input(Input::new(key, 1.0));
        assert_eq!(m.get_value(JUMP), 0.0);

        m.handle_input(Input::new(key, 0.0));
        assert!(!m.is_ignoring_input_source(&key));
        m.handle_input(Input::new(key, 1.0));
        assert_eq!(m.get_value(JUMP), 1.0);
    }

    #[test]
    fn test_now_only_skips_released_sources() {
        let mut m = manager();
        let key = InputSource::key(75);
        assert!(!m.start_ignoring_input_source(key, true));
        assert!(m.start_ignoring_input_source(key, false));
        m.handle_input(Input::new(key, 1.0));
        assert_eq!(m.get_value(JUMP), 0.0);
    }

    #[test]
    fn test_ignoring_actions_swallows_queue() {
        let mut m = manager();
        m.ignoring_actions = true;
        m.handle_input(Input::new(InputSource::key(75), 1.0));
        assert!(m.new_frame(0.016).is_empty());
        m.ignoring_actions = false;
        assert!(m.new_frame(0.016).is_empty());
        assert_eq!(m.get_value(JUMP), 1.0);
    }

    #[test]
    fn test_reinsertion() {
        let mut m = manager();
        m.add_action_type(ActionType { id: 9, reinsertion_ttl: 0.1, ..Default::default() });
        let action = Action { action_type_id: 9, value: 1.0, reinsertion_lifetime: 0.1, ..Default::default() };

        // No frame has passed yet.
        assert!(!m.reinsert_action(action));
        m.new_frame(0.06);
        assert!(m.reinsert_action(action));
        let a = m.new_frame(0.06);
        assert_eq!(a.len(), 1);
        assert!(a[0].flags.contains(ActionFlags::REINSERTED));
        assert!((a[0].reinsertion_lifetime - 0.04).abs() < 1e-6);

        assert!(m.reinsert_action(a[0]));
        let a = m.new_frame(0.06);
        assert!(!m.reinsert_action(a[0]));

        let jump = Action { action_type_id: JUMP, reinsertion_lifetime: 1.0, ..Default::default() };
        assert!(!m.reinsert_action(jump));
    }

    #[test]
    fn test_release_everything() {
        let mut m = manager();
        m.handle_input(Input::new(InputSource::key(75), 1.0));
        m.new_frame(0.016);
        m.release_everything();
        let a = m.new_frame(0.016);
        assert_eq!((a[0].action_type_id, a[0].value), (JUMP, 0.0));
    }

    #[test]
    fn test_release_everything_forgets_sticks() {
        let mut m = manager();
        m.handle_input(Input::new(InputSource::controller_axis(0, 0, 0, true), 1.0));
        m.release_everything();
        assert_eq!(m.stick_position(0, 0), [0.0, 0.0]);

        m.handle_input(Input::new(InputSource::controller_axis(0, 0, 1, true), 1.0));
        let pos = m.stick_position(0, 0);
        assert_eq!(pos[0], 0.0);
        assert!((pos[1] - 1.0).abs() < 1e-5);
    }
}
