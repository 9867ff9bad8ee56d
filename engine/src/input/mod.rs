//! Input Module
//!
//! Turns hardware inputs into player actions. Hardware readings arrive as
//! [`Input`]s (from winit through [`InputHandler`], or fed raw for
//! controllers), get matched against the players' [`Bind`]s, and come out
//! once per frame as [`Action`]s.
//!
//! # Example
//!
//! ```rust,ignore
//! use onion_grove_engine::input::{ControlsMediator, InputHandler, PlayerActionType};
//!
//! let mut controls = ControlsMediator::default();
//! controls.load_default_binds(1);
//! let mut handler = InputHandler::new();
//!
//! // On each window event
//! let translated = handler.handle_window_event(&event);
//! for input in translated.inputs {
//!     controls.handle_input(input);
//! }
//!
//! // Once per frame
//! for action in controls.new_frame(dt) {
//!     if action.action_type_id == PlayerActionType::Dismiss.id() && action.value >= 0.5 {
//!         // Dismiss the group
//!     }
//! }
//! ```

pub mod actions;
pub mod handler;
pub mod manager;
pub mod mediator;
pub mod source;

pub use actions::{PlayerActionCategory, PlayerActionType, PlayerActionTypeInfo, PLAYER_ACTION_TYPES};
pub use handler::{key_code_number, InputHandler, TranslatedEvent};
pub use manager::{
    Action, ActionFlags, ActionType, ActionValueType, Bind, ControlsManager, ControlsOptions,
};
pub use mediator::ControlsMediator;
pub use source::{Input, InputSource, InputSourceKind};
