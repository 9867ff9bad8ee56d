//! GUI Module
//!
//! Hierarchical, ratio-positioned widgets for menus and the HUD, with
//! mouse and menu-action navigation, juice animations and whole-GUI slide
//! transitions.
//!
//! Items live in a [`GuiManager`] arena and refer to each other by
//! [`GuiItemId`]. Widgets don't call back into game code: the manager
//! queues [`GuiOutput`]s that the owner drains once per frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use onion_grove_engine::gui::{GuiConfig, GuiItem, GuiManager, GuiOutput};
//!
//! let mut gui = GuiManager::new(&GuiConfig::default());
//! gui.register_coords("play", 50.0, 40.0, 30.0, 10.0);
//! let play = gui.add_item(GuiItem::button("Play", Color::WHITE), "play");
//!
//! for action in controls.new_frame(dt) {
//!     gui.handle_player_action(&action);
//! }
//! gui.tick(dt);
//! for out in gui.drain_events() {
//!     if out == GuiOutput::Activated(play) {
//!         start_game();
//!     }
//! }
//! gui.draw(&mut renderer);
//! ```

pub mod animation;
pub mod item;
pub mod manager;
mod widgets;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::timing::AutoRepeaterSettings;

pub use animation::GuiAnimation;
pub use item::{GuiItem, GuiItemId, GuiItemKind, JuiceType, PickerArrow, PickerData};
pub use manager::GuiManager;

/// Padding before and after the circle of a bullet point.
pub const BULLET_PADDING: f32 = 6.0;
pub const BULLET_RADIUS: f32 = 4.0;
pub const JUICY_GROW_DURATION: f32 = 0.3;
pub const JUICY_GROW_ELASTIC_DURATION: f32 = 0.4;
pub const JUICY_GROW_ICON_MULT: f32 = 5.0;
pub const JUICY_GROW_TEXT_HIGH_MULT: f32 = 0.15;
pub const JUICY_GROW_TEXT_LOW_MULT: f32 = 0.02;
pub const JUICY_GROW_TEXT_MEDIUM_MULT: f32 = 0.05;
pub const LIST_PADDING: f32 = 8.0;

/// GUI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    /// Window size in pixels. Root items are ratios of this.
    pub window_size: Vec2,
    /// Held activation repeat for menus.
    pub auto_repeat: AutoRepeaterSettings,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            window_size: Vec2::new(1280.0, 720.0),
            auto_repeat: AutoRepeaterSettings {
                slowest_interval: 0.3,
                fastest_interval: 0.011,
                ramp_time: 0.9,
            },
        }
    }
}

/// Mouse events the GUI reacts to, in window pixels. Button 1 is the
/// primary button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuiEvent {
    MouseMoved { pos: Vec2 },
    MouseButtonDown { pos: Vec2, button: u32 },
    MouseButtonUp { pos: Vec2, button: u32 },
    /// Vertical wheel movement, in notches. Positive is away from the user.
    MouseWheel { pos: Vec2, dz: f32 },
}

impl GuiEvent {
    pub fn pos(&self) -> Vec2 {
        match *self {
            Self::MouseMoved { pos }
            | Self::MouseButtonDown { pos, .. }
            | Self::MouseButtonUp { pos, .. }
            | Self::MouseWheel { pos, .. } => pos,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuiSound {
    Select,
    Activate,
    Back,
}

/// Things that happened in the GUI that its owner may react to.
#[derive(Debug, Clone, PartialEq)]
pub enum GuiOutput {
    Activated(GuiItemId),
    PickerNext(GuiItemId),
    PickerPrevious(GuiItemId),
    CheckToggled { item: GuiItemId, value: bool },
    Sound(GuiSound),
    SelectionChanged(Option<GuiItemId>),
}
