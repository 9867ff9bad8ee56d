//! GUI Manager
//!
//! Owns every item of one GUI (a menu, the HUD) in an arena, and runs
//! selection, navigation, activation, juice and transitions for them.
//!
//! Iteration order is insertion order: new items always take a fresh slot
//! at the end of the arena, and freed slots at the end are trimmed.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::Vec2;

use super::animation::GuiAnimation;
use super::item::{GuiItem, GuiItemId, GuiItemKind, JuiceType};
use super::{widgets, GuiConfig, GuiEvent, GuiOutput, GuiSound};
use crate::data::DataNode;
use crate::input::{Action, PlayerActionType};
use crate::math::{select_next_item_directionally, LARGE_FLOAT};
use crate::render::{ClipGuard, ClipRect, Renderer};
use crate::timing::{AutoRepeater, Timer};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    item: GuiItem,
}

#[derive(Debug, Clone)]
pub struct GuiManager {
    slots: Vec<Option<Slot>>,
    next_generation: u32,
    selected_item: Option<GuiItemId>,
    /// Item activated by the menu back action.
    pub back_item: Option<GuiItemId>,
    /// When false, events and actions are ignored.
    pub responsive: bool,
    /// Ignore events and actions while a transition plays.
    pub ignore_input_on_animation: bool,
    window_size: Vec2,
    /// Held state of menu right, up, left and down.
    dir_pressed: [bool; 4],
    last_input_was_mouse: bool,
    auto_repeater: AutoRepeater,
    anim_type: GuiAnimation,
    anim_timer: Timer,
    visible: bool,
    /// Centers and sizes by string id, in window ratio.
    registered_coords: HashMap<String, (Vec2, Vec2)>,
    outputs: Vec<GuiOutput>,
    time_passed: f32,
}

impl Default for GuiManager {
    fn default() -> Self {
        Self::new(&GuiConfig::default())
    }
}

impl GuiManager {
    pub fn new(config: &GuiConfig) -> Self {
        Self {
            slots: Vec::new(),
            next_generation: 0,
            selected_item: None,
            back_item: None,
            responsive: true,
            ignore_input_on_animation: true,
            window_size: config.window_size,
            dir_pressed: [false; 4],
            last_input_was_mouse: false,
            auto_repeater: AutoRepeater::new(config.auto_repeat),
            anim_type: GuiAnimation::None,
            anim_timer: Timer::default(),
            visible: true,
            registered_coords: HashMap::new(),
            outputs: Vec::new(),
            time_passed: 0.0,
        }
    }

    pub fn window_size(&self) -> Vec2 {
        self.window_size
    }

    pub fn set_window_size(&mut self, size: Vec2) {
        self.window_size = size;
    }

    // ----- Arena -----

    pub fn item(&self, id: GuiItemId) -> Option<&GuiItem> {
        match self.slots.get(id.idx as usize) {
            Some(Some(slot)) if slot.generation == id.generation => Some(&slot.item),
            _ => None,
        }
    }

    pub fn item_mut(&mut self, id: GuiItemId) -> Option<&mut GuiItem> {
        match self.slots.get_mut(id.idx as usize) {
            Some(Some(slot)) if slot.generation == id.generation => Some(&mut slot.item),
            _ => None,
        }
    }

    pub fn contains(&self, id: GuiItemId) -> bool {
        self.item(id).is_some()
    }

    /// Live items, in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (GuiItemId, &GuiItem)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.as_ref().map(|s| {
                let id = GuiItemId { idx: i as u32, generation: s.generation };
                (id, &s.item)
            })
        })
    }

    pub fn ids(&self) -> Vec<GuiItemId> {
        self.items().map(|(id, _)| id).collect()
    }

    pub fn item_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Adds an item. If coordinates were registered under `coords_id`, they
    /// replace the item's own.
    pub fn add_item(&mut self, mut item: GuiItem, coords_id: &str) -> GuiItemId {
        if let Some(&(center, size)) = self.registered_coords.get(coords_id) {
            item.center = center;
            item.size = size;
        }
        item.selected = false;
        item.parent = None;
        item.children.clear();

        let id = GuiItemId { idx: self.slots.len() as u32, generation: self.next_generation };
        self.next_generation = self.next_generation.wrapping_add(1);
        self.slots.push(Some(Slot { generation: id.generation, item }));
        id
    }

    /// Places `child` inside `parent`, taking it out of its previous parent.
    pub fn add_child(&mut self, parent: GuiItemId, child: GuiItemId) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return false;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Refusing to nest a GUI item inside its own descendant");
            return false;
        }
        if let Some(old) = self.item(child).and_then(|c| c.parent) {
            self.remove_child(old, child);
        }
        if let Some(p) = self.item_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.item_mut(child) {
            c.parent = Some(parent);
        }
        true
    }

    fn is_ancestor(&self, ancestor: GuiItemId, mut id: GuiItemId) -> bool {
        while let Some(parent) = self.item(id).and_then(|i| i.parent) {
            if parent == ancestor {
                return true;
            }
            id = parent;
        }
        false
    }

    /// Detaches a child without removing it from the manager.
    pub fn remove_child(&mut self, parent: GuiItemId, child: GuiItemId) -> bool {
        let Some(p) = self.item_mut(parent) else {
            return false;
        };
        let before = p.children.len();
        p.children.retain(|&c| c != child);
        let removed = p.children.len() != before;
        if let Some(c) = self.item_mut(child) {
            if c.parent == Some(parent) {
                c.parent = None;
            }
        }
        removed
    }

    /// Removes an item and all of its descendants.
    pub fn remove_item(&mut self, id: GuiItemId) -> bool {
        let Some(item) = self.item(id) else {
            return false;
        };
        let children = item.children.clone();
        let parent = item.parent;
        for child in children {
            self.remove_item(child);
        }

        if self.selected_item == Some(id) {
            self.set_selected_item(None, true);
        }
        if self.back_item == Some(id) {
            self.back_item = None;
        }
        if let Some(parent) = parent {
            self.remove_child(parent, id);
        }

        self.slots[id.idx as usize] = None;
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        true
    }

    pub fn delete_all_children(&mut self, id: GuiItemId) {
        let children = self.item(id).map(|i| i.children.clone()).unwrap_or_default();
        for child in children {
            self.remove_item(child);
        }
    }

    /// Removes every item and registered coordinate.
    pub fn destroy(&mut self) {
        self.set_selected_item(None, true);
        self.back_item = None;
        self.slots.clear();
        self.registered_coords.clear();
    }

    // ----- Geometry -----

    /// Lowest edge of the item's children, in its height ratio.
    pub fn get_child_bottom(&self, id: GuiItemId) -> f32 {
        let Some(item) = self.item(id) else {
            return 0.0;
        };
        item.children
            .iter()
            .filter_map(|&c| self.item(c))
            .map(|c| c.center.y + c.size.y / 2.0)
            .fold(0.0, f32::max)
    }

    fn parent_of(&self, item: &GuiItem) -> Option<(GuiItemId, &GuiItem)> {
        let p = item.parent?;
        self.item(p).map(|pi| (p, pi))
    }

    /// Center in window pixels, before transitions.
    pub fn get_reference_center(&self, id: GuiItemId) -> Vec2 {
        let Some(item) = self.item(id) else {
            return Vec2::ZERO;
        };
        match self.parent_of(item) {
            Some((p, parent)) => {
                let parent_s = self.get_reference_size(p) - Vec2::splat(parent.padding * 2.0);
                let parent_c = self.get_reference_center(p);
                let mut result = item.center * parent_s + parent_c - parent_s / 2.0;
                result.y -= parent_s.y * parent.offset;
                result
            }
            None => item.center * self.window_size,
        }
    }

    /// Size in window pixels.
    pub fn get_reference_size(&self, id: GuiItemId) -> Vec2 {
        let Some(item) = self.item(id) else {
            return Vec2::ZERO;
        };
        let mult = match self.parent_of(item) {
            Some((p, parent)) => self.get_reference_size(p) - Vec2::splat(parent.padding * 2.0),
            None => self.window_size,
        };
        item.size * mult
    }

    /// Whether the cursor is over the item and over every ancestor.
    pub fn is_mouse_on(&self, id: GuiItemId, cursor: Vec2) -> bool {
        let Some(item) = self.item(id) else {
            return false;
        };
        if let Some(p) = item.parent {
            if !self.is_mouse_on(p, cursor) {
                return false;
            }
        }
        let c = self.get_reference_center(id);
        let s = self.get_reference_size(id);
        cursor.x >= c.x - s.x * 0.5
            && cursor.x <= c.x + s.x * 0.5
            && cursor.y >= c.y - s.y * 0.5
            && cursor.y <= c.y + s.y * 0.5
    }

    fn all_ancestors(&self, id: GuiItemId, flag: impl Fn(&GuiItem) -> bool) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let Some(item) = self.item(c) else {
                return false;
            };
            if !flag(item) {
                return false;
            }
            cur = item.parent;
        }
        true
    }

    /// Visible itself, and so is every ancestor.
    pub fn is_visible(&self, id: GuiItemId) -> bool {
        self.all_ancestors(id, |i| i.visible)
    }

    /// Responsive itself, and so is every ancestor.
    pub fn is_responsive(&self, id: GuiItemId) -> bool {
        self.all_ancestors(id, |i| i.responsive)
    }

    fn can_select(&self, id: GuiItemId) -> bool {
        self.is_responsive(id) && self.item(id).is_some_and(|i| i.selectable)
    }

    pub fn start_juice_animation(&mut self, id: GuiItemId, juice_type: JuiceType) {
        if let Some(item) = self.item_mut(id) {
            item.start_juice_animation(juice_type);
        }
    }

    // ----- Selection and activation -----

    pub fn selected_item(&self) -> Option<GuiItemId> {
        self.selected_item
    }

    /// Selects an item, or nothing. A silent selection plays no sound.
    pub fn set_selected_item(&mut self, id: Option<GuiItemId>, silent: bool) {
        let id = id.filter(|&i| self.contains(i));
        if self.selected_item == id {
            return;
        }
        self.auto_repeater.stop();

        let old = self.selected_item;
        if let Some(item) = old.and_then(|o| self.item_mut(o)) {
            item.selected = false;
        }
        self.selected_item = id;
        if let Some(item) = id.and_then(|n| self.item_mut(n)) {
            item.selected = true;
        }

        self.outputs.push(GuiOutput::SelectionChanged(id));
        if id.is_some() && !silent {
            self.outputs.push(GuiOutput::Sound(GuiSound::Select));
        }
    }

    /// Activates an item as if clicked at `cursor`. Keyboard and controller
    /// activations pass `LARGE_FLOAT` coordinates.
    pub fn activate(&mut self, id: GuiItemId, cursor: Vec2) -> bool {
        if !self.item(id).is_some_and(|i| i.activatable) {
            return false;
        }
        let center_x = self.get_reference_center(id).x;
        let Some(item) = self.item_mut(id) else {
            return false;
        };

        let extra = match &mut item.kind {
            GuiItemKind::Check { value, .. } => {
                *value = !*value;
                let value = *value;
                item.start_juice_animation(JuiceType::GrowTextElasticMedium);
                Some(GuiOutput::CheckToggled { item: id, value })
            }
            GuiItemKind::Picker(_) if cursor.x >= center_x => Some(GuiOutput::PickerNext(id)),
            GuiItemKind::Picker(_) => Some(GuiOutput::PickerPrevious(id)),
            _ => None,
        };

        self.outputs.push(GuiOutput::Activated(id));
        self.outputs.extend(extra);
        let sound = if self.back_item == Some(id) { GuiSound::Back } else { GuiSound::Activate };
        self.outputs.push(GuiOutput::Sound(sound));
        true
    }

    pub fn get_current_tooltip(&self) -> &str {
        self.selected_item
            .and_then(|id| self.item(id))
            .map_or("", |i| i.tooltip.as_str())
    }

    pub fn was_last_input_mouse(&self) -> bool {
        self.last_input_was_mouse
    }

    /// Takes everything that happened since the last call.
    pub fn drain_events(&mut self) -> Vec<GuiOutput> {
        std::mem::take(&mut self.outputs)
    }

    pub(super) fn push_output(&mut self, out: GuiOutput) {
        self.outputs.push(out);
    }

    pub(super) fn time_passed(&self) -> f32 {
        self.time_passed
    }

    // ----- Input -----

    fn accepts_input(&self) -> bool {
        self.responsive && !(self.ignore_input_on_animation && self.anim_timer.ratio_left() > 0.0)
    }

    /// Handles a mouse event. Menu actions go through
    /// [`Self::handle_player_action`].
    pub fn handle_event(&mut self, ev: &GuiEvent) {
        if !self.accepts_input() {
            return;
        }
        let pos = ev.pos();
        let mut mouse_moved = false;

        if matches!(
            ev,
            GuiEvent::MouseMoved { .. } | GuiEvent::MouseWheel { .. } | GuiEvent::MouseButtonDown { .. }
        ) {
            let hovered = self
                .ids()
                .into_iter()
                .find(|&id| self.is_mouse_on(id, pos) && self.can_select(id));
            if let Some(id) = hovered {
                widgets::mouse_over(self, id, pos);
            }
            self.set_selected_item(hovered, false);
            mouse_moved = true;
        }

        match *ev {
            GuiEvent::MouseButtonDown { button: 1, .. } => {
                let target = self.selected_item.filter(|&id| self.is_responsive(id));
                if let Some(id) = target {
                    if self.activate(id, pos) {
                        self.auto_repeater.start();
                    }
                }
                mouse_moved = true;
            }
            GuiEvent::MouseButtonUp { button: 1, .. } => {
                self.auto_repeater.stop();
                mouse_moved = true;
            }
            _ => {}
        }

        for id in self.ids() {
            if self.is_responsive(id) {
                widgets::handle_event(self, id, ev);
            }
        }

        if mouse_moved {
            self.last_input_was_mouse = true;
        }
    }

    /// Handles a menu action. Returns whether the GUI used it.
    pub fn handle_player_action(&mut self, action: &Action) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let is_down = action.value >= 0.5;

        let recognized = match PlayerActionType::from_id(action.action_type_id) {
            Some(
                dir @ (PlayerActionType::MenuRight
                | PlayerActionType::MenuUp
                | PlayerActionType::MenuLeft
                | PlayerActionType::MenuDown),
            ) => {
                self.handle_menu_direction(dir, is_down);
                true
            }
            Some(PlayerActionType::MenuOk) => {
                let target = self.selected_item.filter(|&id| self.is_responsive(id));
                match target {
                    Some(id) if is_down => {
                        if self.activate(id, Vec2::splat(LARGE_FLOAT)) {
                            self.auto_repeater.start();
                        }
                    }
                    _ if !is_down => self.auto_repeater.stop(),
                    _ => {}
                }
                true
            }
            Some(PlayerActionType::MenuBack) => {
                let target = self.back_item.filter(|&id| self.is_responsive(id));
                if let (true, Some(id)) = (is_down, target) {
                    self.activate(id, Vec2::splat(LARGE_FLOAT));
                }
                true
            }
            _ => false,
        };

        if recognized {
            self.last_input_was_mouse = false;
        }
        recognized
    }

    fn handle_menu_direction(&mut self, dir: PlayerActionType, is_down: bool) {
        let (slot, direction) = match dir {
            PlayerActionType::MenuRight => (0, 0.0),
            PlayerActionType::MenuUp => (1, TAU * 0.75),
            PlayerActionType::MenuLeft => (2, TAU * 0.5),
            PlayerActionType::MenuDown => (3, TAU * 0.25),
            _ => return,
        };
        let pressed = is_down && !self.dir_pressed[slot];
        self.dir_pressed[slot] = is_down;
        if !pressed {
            return;
        }

        if self.selected_item.is_none() {
            let first = self.ids().into_iter().find(|&id| self.can_select(id));
            if first.is_some() {
                self.set_selected_item(first, false);
                return;
            }
        }
        let Some(selected) = self.selected_item else {
            return;
        };

        if self.is_responsive(selected) && widgets::menu_dir_button(self, selected, dir) {
            return;
        }

        let mut min_y: f32 = 0.0;
        let mut max_y = self.window_size.y;
        let mut coords = Vec::new();
        let mut candidates = Vec::new();
        let mut selected_idx = None;
        for id in self.ids() {
            if !self.can_select(id) {
                continue;
            }
            let c = self.get_reference_center(id);
            if id == selected {
                selected_idx = Some(coords.len());
            }
            min_y = min_y.min(c.y);
            max_y = max_y.max(c.y);
            coords.push(c);
            candidates.push(id);
        }
        let Some(selected_idx) = selected_idx else {
            return;
        };

        let new_idx = select_next_item_directionally(
            &coords,
            selected_idx,
            direction,
            Vec2::new(self.window_size.x, max_y - min_y),
        );
        if new_idx == selected_idx {
            return;
        }
        let new_item = candidates[new_idx];
        self.set_selected_item(Some(new_item), false);
        if let Some(parent) = self.item(new_item).and_then(|i| i.parent) {
            widgets::child_selected(self, parent, new_item);
        }
    }

    // ----- Time -----

    /// Advances transitions, widgets, juice and held activations.
    pub fn tick(&mut self, dt: f32) {
        if self.anim_timer.tick(dt) {
            self.visible = !self.anim_type.hides_at_end();
        }
        self.time_passed += dt;

        let tooltip = self.get_current_tooltip().to_string();
        for id in self.ids() {
            widgets::tick(self, id, dt, &tooltip);
            if let Some(item) = self.item_mut(id) {
                item.tick_juice(dt);
            }
        }

        let repeat_target = self
            .selected_item
            .filter(|&id| self.item(id).is_some_and(|i| i.can_auto_repeat && i.activatable));
        if let Some(id) = repeat_target {
            for _ in 0..self.auto_repeater.tick(dt) {
                self.activate(id, Vec2::splat(LARGE_FLOAT));
            }
        }
    }

    // ----- Transitions and visibility -----

    pub fn start_animation(&mut self, anim: GuiAnimation, duration: f32) {
        self.anim_type = anim;
        self.anim_timer.start_with(duration);
        self.visible = true;
    }

    pub fn anim_type(&self) -> GuiAnimation {
        self.anim_type
    }

    pub fn is_animating(&self) -> bool {
        self.anim_timer.time_left > 0.0
    }

    pub fn show_items(&mut self) {
        self.visible = true;
    }

    /// Hides everything until shown again or a transition starts.
    pub fn hide_items(&mut self) {
        self.visible = false;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    // ----- Coordinates -----

    /// Registers a default center and size, in window percentages.
    pub fn register_coords(&mut self, id: &str, cx: f32, cy: f32, w: f32, h: f32) {
        self.registered_coords.insert(
            id.to_string(),
            (Vec2::new(cx, cy) / 100.0, Vec2::new(w, h) / 100.0),
        );
    }

    /// Registers coordinates from a node whose children are named after
    /// item ids, with `cx cy w h` values. Children with fewer than four
    /// values are skipped.
    pub fn read_coords(&mut self, node: &DataNode) {
        for i in 0..node.child_count() {
            let Some(child) = node.child(i) else {
                continue;
            };
            let words: Vec<&str> = child.value.split_whitespace().collect();
            if words.len() < 4 {
                log::debug!("Skipping GUI coordinates for \"{}\"", child.name);
                continue;
            }
            let n = |w: usize| words[w].parse::<f32>().unwrap_or(0.0);
            self.register_coords(&child.name, n(0), n(1), n(2), n(3));
        }
    }

    pub fn registered_coords(&self, id: &str) -> Option<(Vec2, Vec2)> {
        self.registered_coords.get(id).copied()
    }

    // ----- Drawing -----

    /// Where an item is drawn this frame, in window pixels, or `None` if
    /// it isn't drawn.
    pub fn get_item_draw_info(&self, id: GuiItemId) -> Option<(Vec2, Vec2)> {
        if !self.is_visible(id) {
            return None;
        }
        let item = self.item(id)?;
        if item.size.x == 0.0 {
            return None;
        }
        let mut center = self.get_reference_center(id);
        let size = self.get_reference_size(id);
        if self.anim_timer.time_left > 0.0 {
            center = self.anim_type.apply(center, self.anim_timer.ratio_left(), self.window_size);
        }
        Some((center, size))
    }

    /// Draws every visible item. Children are clipped to their parent's
    /// drawn box.
    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        if !self.visible {
            return;
        }
        for (id, item) in self.items() {
            if !widgets::has_drawing(item) {
                continue;
            }
            let Some((center, size)) = self.get_item_draw_info(id) else {
                continue;
            };
            match item.parent {
                Some(parent) => {
                    let Some((pc, ps)) = self.get_item_draw_info(parent) else {
                        continue;
                    };
                    let clip = ClipRect {
                        x: pc.x - ps.x / 2.0 + 1.0,
                        y: pc.y - ps.y / 2.0 + 1.0,
                        w: ps.x - 2.0,
                        h: ps.y - 2.0,
                    };
                    let mut guard = ClipGuard::new(&mut *renderer, Some(clip));
                    widgets::draw(self, id, item, center, size, &mut *guard);
                }
                None => widgets::draw(self, id, item, center, size, renderer),
            }
        }
    }
}
