//! Controls Mediator
//!
//! The game-facing side of the controls layer. Registers every
//! [`PlayerActionType`] with a [`ControlsManager`], and loads and saves
//! player binds through data trees.
//!
//! Binds persist as one child per action type, named after its internal
//! name, whose value lists input tokens separated by `;`. Token order is
//! kept: the first bind of an action is the one shown in button hints.

use super::actions::{PlayerActionType, PlayerActionTypeInfo, PLAYER_ACTION_TYPES};
use super::manager::{Action, Bind, ControlsManager, ControlsOptions};
use super::source::{Input, InputSource};
use crate::data::DataNode;

#[derive(Debug, Clone)]
pub struct ControlsMediator {
    mgr: ControlsManager,
}

impl Default for ControlsMediator {
    fn default() -> Self {
        Self::new(ControlsOptions::default())
    }
}

impl ControlsMediator {
    /// Creates a mediator with every player action type registered and no
    /// binds.
    pub fn new(options: ControlsOptions) -> Self {
        let mut mgr = ControlsManager::new(options);
        for info in PLAYER_ACTION_TYPES {
            mgr.add_action_type(info.action_type());
        }
        Self { mgr }
    }

    pub fn manager(&self) -> &ControlsManager {
        &self.mgr
    }

    pub fn manager_mut(&mut self) -> &mut ControlsManager {
        &mut self.mgr
    }

    pub fn binds(&self) -> &[Bind] {
        &self.mgr.binds
    }

    pub fn binds_mut(&mut self) -> &mut Vec<Bind> {
        &mut self.mgr.binds
    }

    pub fn add_bind(&mut self, action: PlayerActionType, player_nr: i32, input_source: InputSource) {
        self.mgr.binds.push(Bind { action_type_id: action.id(), player_nr, input_source });
    }

    /// First bind for an action type, if any.
    pub fn find_bind(&self, action: PlayerActionType) -> Option<&Bind> {
        self.mgr.binds.iter().find(|b| b.action_type_id == action.id())
    }

    /// First bind for the action type with the given internal name.
    pub fn find_bind_by_name(&self, internal_name: &str) -> Option<&Bind> {
        let info = PLAYER_ACTION_TYPES
            .iter()
            .find(|i| !i.internal_name.is_empty() && i.internal_name == internal_name)?;
        self.find_bind(info.id)
    }

    pub fn all_player_action_types(&self) -> &'static [PlayerActionTypeInfo] {
        PLAYER_ACTION_TYPES
    }

    pub fn get_player_action_type(&self, id: i32) -> Option<&'static PlayerActionTypeInfo> {
        PLAYER_ACTION_TYPES.iter().find(|i| i.id.id() == id)
    }

    pub fn get_player_action_type_internal_name(&self, id: i32) -> &'static str {
        self.get_player_action_type(id).map(|i| i.internal_name).unwrap_or("")
    }

    pub fn get_player_action_type_value(&self, action: PlayerActionType) -> f32 {
        self.mgr.get_value(action.id())
    }

    pub fn input_source_to_str(&self, source: &InputSource) -> String {
        source.to_string()
    }

    /// Parses an input token. Unrecognized tokens are logged and give a
    /// `None` source.
    pub fn str_to_input_source(&self, s: &str) -> InputSource {
        s.parse().unwrap_or_else(|e| {
            log::error!("{e}");
            InputSource::default()
        })
    }

    /// Feeds a hardware input. Returns false for inputs with no source.
    pub fn handle_input(&mut self, input: Input) -> bool {
        if input.source.is_none() {
            return false;
        }
        self.mgr.handle_input(input);
        true
    }

    /// Appends the binds stored in `node` for a player. Actions with no
    /// child are skipped, as are unrecognized tokens.
    pub fn load_binds_from_data_node(&mut self, node: &DataNode, player_nr: i32) {
        for info in PLAYER_ACTION_TYPES {
            if info.internal_name.is_empty() {
                continue;
            }
            let Some(bind_node) = node.child_by_name(info.internal_name) else {
                continue;
            };
            self.add_binds_from_str(info.id, player_nr, &bind_node.value);
        }
    }

    /// Replaces a player's binds with every action type's default.
    pub fn load_default_binds(&mut self, player_nr: i32) {
        self.mgr.binds.retain(|b| b.player_nr != player_nr);
        for info in PLAYER_ACTION_TYPES {
            self.add_binds_from_str(info.id, player_nr, info.default_bind_str);
        }
    }

    fn add_binds_from_str(&mut self, action: PlayerActionType, player_nr: i32, s: &str) {
        for token in s.split(';').map(str::trim).filter(|t| !t.is_empty()) {
            let source = self.str_to_input_source(token);
            if source.is_none() {
                continue;
            }
            self.add_bind(action, player_nr, source);
        }
    }

    /// Writes a player's binds into `node`, one child per named action type
    /// in registry order. Actions with no binds get an empty value.
    pub fn save_binds_to_data_node(&self, node: &mut DataNode, player_nr: i32) {
        for info in PLAYER_ACTION_TYPES {
            if info.internal_name.is_empty() {
                continue;
            }
            let tokens: Vec<String> = self
                .mgr
                .binds
                .iter()
                .filter(|b| b.player_nr == player_nr && b.action_type_id == info.id.id())
                .map(|b| b.input_source.to_string())
                .collect();
            node.add_new(info.internal_name, tokens.join(";"));
        }
    }

    pub fn new_frame(&mut self, dt: f32) -> Vec<Action> {
        self.mgr.new_frame(dt)
    }

    pub fn reinsert_action(&mut self, action: Action) -> bool {
        self.mgr.reinsert_action(action)
    }

    /// Lets go of every input, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.mgr.release_everything();
    }

    pub fn set_options(&mut self, options: ControlsOptions) {
        self.mgr.options = options;
    }

    pub fn start_ignoring_actions(&mut self) {
        self.mgr.ignoring_actions = true;
    }

    pub fn stop_ignoring_actions(&mut self) {
        self.mgr.ignoring_actions = false;
    }

    pub fn start_ignoring_input_source(&mut self, source: InputSource, now_only: bool) -> bool {
        self.mgr.start_ignoring_input_source(source, now_only)
    }
}
