//! Player Action Types
//!
//! Every action a player can bind, with the text shown in the controls menu,
//! the name used in the options file and the default bind.
//!
//! Default binds use keyboard key numbers as persisted in options files
//! (see [`super::handler::key_code_number`]).

use super::manager::{ActionType, ActionValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum PlayerActionCategory {
    #[default]
    None,
    Main,
    Menus,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(i32)]
pub enum PlayerActionType {
    #[default]
    None,
    // Main.
    Right,
    Up,
    Left,
    Down,
    Throw,
    Whistle,
    NextType,
    PrevType,
    NextLeader,
    GroupCursor,
    Dismiss,
    UseSpray1,
    UseSpray2,
    UseSpray,
    NextSpray,
    PrevSpray,
    Pause,
    // Menus.
    MenuRight,
    MenuUp,
    MenuLeft,
    MenuDown,
    MenuOk,
    RadarRight,
    RadarUp,
    RadarLeft,
    RadarDown,
    RadarZoomIn,
    RadarZoomOut,
    // Advanced.
    CursorRight,
    CursorUp,
    CursorLeft,
    CursorDown,
    GroupRight,
    GroupUp,
    GroupLeft,
    GroupDown,
    PrevLeader,
    ChangeZoom,
    ZoomIn,
    ZoomOut,
    NextMaturity,
    PrevMaturity,
    LieDown,
    CustomA,
    CustomB,
    CustomC,
    Radar,
    MenuBack,
    MenuPageLeft,
    MenuPageRight,
}

impl PlayerActionType {
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn from_id(id: i32) -> Option<Self> {
        PLAYER_ACTION_TYPES.iter().map(|info| info.id).find(|t| t.id() == id)
    }
}

/// Registry entry for a [`PlayerActionType`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerActionTypeInfo {
    pub id: PlayerActionType,
    pub category: PlayerActionCategory,
    pub name: &'static str,
    pub description: &'static str,
    /// Property name in the options file. Empty for [`PlayerActionType::None`].
    pub internal_name: &'static str,
    /// Semicolon-separated input tokens.
    pub default_bind_str: &'static str,
    /// Auto-repeat threshold. 0 for none.
    pub auto_repeat: f32,
}

impl PlayerActionTypeInfo {
    /// The manager-side description of this type.
    pub fn action_type(&self) -> ActionType {
        ActionType {
            id: self.id.id(),
            value_type: ActionValueType::Analog,
            auto_repeat: self.auto_repeat,
            direct_events: false,
            reinsertion_ttl: 0.0,
        }
    }
}

const fn info(
    id: PlayerActionType,
    category: PlayerActionCategory,
    name: &'static str,
    description: &'static str,
    internal_name: &'static str,
    default_bind_str: &'static str,
    auto_repeat: f32,
) -> PlayerActionTypeInfo {
    PlayerActionTypeInfo { id, category, name, description, internal_name, default_bind_str, auto_repeat }
}

use PlayerActionCategory as Cat;
use PlayerActionType as T;

/// Every player action type, in controls menu order.
pub const PLAYER_ACTION_TYPES: &[PlayerActionTypeInfo] = &[
    info(T::None, Cat::None, "---", "", "", "", 0.0),
    info(T::Right, Cat::Main, "Move right", "Move the leader right.", "move_right", "k_4", 0.0),
    info(T::Up, Cat::Main, "Move up", "Move the leader up.", "move_up", "k_23", 0.0),
    info(T::Left, Cat::Main, "Move left", "Move the leader left.", "move_left", "k_1", 0.0),
    info(T::Down, Cat::Main, "Move down", "Move the leader down.", "move_down", "k_19", 0.0),
    info(T::Throw, Cat::Main, "Throw", "Throw a Pikmin.", "throw", "mb_1", 0.0),
    info(T::Whistle, Cat::Main, "Whistle", "Whistle around the cursor.", "whistle", "mb_2", 0.0),
    info(T::NextType, Cat::Main, "Next Pikmin", "Change to the next Pikmin type in the group.", "next_type", "mwd", 0.0),
    info(T::PrevType, Cat::Main, "Prev. Pikmin", "Change to the previous Pikmin type in the group.", "prev_type", "mwu", 0.0),
    info(T::NextLeader, Cat::Main, "Next leader", "Change to the next leader.", "next_leader", "k_215", 0.0),
    info(T::GroupCursor, Cat::Main, "Swarm to cursor", "Swarm all Pikmin towards the cursor.", "swarm_cursor", "k_75", 0.0),
    info(T::Dismiss, Cat::Main, "Dismiss", "Dismiss all Pikmin.", "dismiss", "k_217", 0.0),
    info(T::UseSpray1, Cat::Main, "Use spray 1", "Use the spray in slot 1.", "use_spray_1", "k_18", 0.0),
    info(T::UseSpray2, Cat::Main, "Use spray 2", "Use the spray in slot 2.", "use_spray_2", "k_6", 0.0),
    info(T::UseSpray, Cat::Main, "Use spray", "Use the currently selected spray.", "use_spray", "k_18", 0.0),
    info(T::NextSpray, Cat::Main, "Next spray", "Change to the next spray.", "next_spray", "k_5", 0.0),
    info(T::PrevSpray, Cat::Main, "Prev. spray", "Change to the previous spray.", "prev_spray", "k_17", 0.0),
    info(T::Pause, Cat::Main, "Pause", "Pause the game.", "pause", "k_59", 0.0),
    info(T::MenuRight, Cat::Menus, "Menu right", "Navigate right in a menu.", "menu_right", "k_83", 0.5),
    info(T::MenuUp, Cat::Menus, "Menu up", "Navigate up in a menu.", "menu_up", "k_84", 0.5),
    info(T::MenuLeft, Cat::Menus, "Menu left", "Navigate left in a menu.", "menu_left", "k_82", 0.5),
    info(T::MenuDown, Cat::Menus, "Menu down", "Navigate down in a menu.", "menu_down", "k_85", 0.5),
    info(T::MenuOk, Cat::Menus, "Menu OK", "Confirm the selected item in a menu.", "menu_ok", "k_67", 0.5),
    info(T::RadarRight, Cat::Menus, "Radar pan right", "Pan the radar to the right.", "menu_radar_right", "k_4", 0.0),
    info(T::RadarUp, Cat::Menus, "Radar pan up", "Pan the radar upward.", "menu_radar_up", "k_23", 0.0),
    info(T::RadarLeft, Cat::Menus, "Radar pan left", "Pan the radar to the left.", "menu_radar_left", "k_1", 0.0),
    info(T::RadarDown, Cat::Menus, "Radar pan down", "Pan the radar downward.", "menu_radar_down", "k_19", 0.0),
    info(T::RadarZoomIn, Cat::Menus, "Radar zoom in", "Zoom the radar in.", "menu_radar_zoom_in", "k_18", 0.0),
    info(T::RadarZoomOut, Cat::Menus, "Radar zoom out", "Zoom the radar out.", "menu_radar_zoom_out", "k_6", 0.0),
    info(T::CursorRight, Cat::Advanced, "Cursor right", "Move the cursor right. Useful if it's not mouse-controlled.", "cursor_right", "", 0.0),
    info(T::CursorUp, Cat::Advanced, "Cursor up", "Move the cursor up. Useful if it's not mouse-controlled.", "cursor_up", "", 0.0),
    info(T::CursorLeft, Cat::Advanced, "Cursor left", "Move the cursor left. Useful if it's not mouse-controlled.", "cursor_left", "", 0.0),
    info(T::CursorDown, Cat::Advanced, "Cursor down", "Move the cursor down. Useful if it's not mouse-controlled.", "cursor_down", "", 0.0),
    info(T::GroupRight, Cat::Advanced, "Swarm right", "Swarm all Pikmin right.", "swarm_right", "", 0.0),
    info(T::GroupUp, Cat::Advanced, "Swarm up", "Swarm all Pikmin up.", "swarm_up", "", 0.0),
    info(T::GroupLeft, Cat::Advanced, "Swarm left", "Swarm all Pikmin left.", "swarm_left", "", 0.0),
    info(T::GroupDown, Cat::Advanced, "Swarm down", "Swarm all Pikmin down.", "swarm_down", "", 0.0),
    info(T::PrevLeader, Cat::Advanced, "Prev. leader", "Change to the previous leader.", "prev_leader", "", 0.0),
    info(T::ChangeZoom, Cat::Advanced, "Change zoom", "Change the current zoom level.", "change_zoom", "k_3", 0.0),
    info(T::ZoomIn, Cat::Advanced, "Zoom in", "Change to a closer zoom level.", "zoom_in", "", 0.0),
    info(T::ZoomOut, Cat::Advanced, "Zoom out", "Change to a farther zoom level.", "zoom_out", "", 0.0),
    info(T::NextMaturity, Cat::Advanced, "Next maturity", "Change to a Pikmin of the next maturity.", "next_maturity", "", 0.0),
    info(T::PrevMaturity, Cat::Advanced, "Prev. maturity", "Change to a Pikmin of the previous maturity.", "prev_maturity", "", 0.0),
    info(T::LieDown, Cat::Advanced, "Lie down", "Lie down so Pikmin can carry you.", "lie_down", "k_26", 0.0),
    info(T::CustomA, Cat::Advanced, "Custom A", "Custom action A, if the current leader supports it.", "custom_a", "", 0.0),
    info(T::CustomB, Cat::Advanced, "Custom B", "Custom action B, if the current leader supports it.", "custom_b", "", 0.0),
    info(T::CustomC, Cat::Advanced, "Custom C", "Custom action C, if the current leader supports it.", "custom_c", "", 0.0),
    info(T::Radar, Cat::Advanced, "Radar", "Open or close the radar.", "radar", "k_64", 0.0),
    info(T::MenuBack, Cat::Advanced, "Menu shortcut - back", "Go back or cancel in a menu.", "menu_back", "k_59", 0.5),
    info(T::MenuPageLeft, Cat::Advanced, "Menu shortcut - left page", "Go to the page to the left in a menu.", "menu_page_left", "k_17", 0.5),
    info(T::MenuPageRight, Cat::Advanced, "Menu shortcut - right page", "Go to the page to the right in a menu.", "menu_page_right", "k_5", 0.5),
];
