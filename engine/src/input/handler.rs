//! Input Handler
//!
//! Translates winit window events into engine [`Input`]s for the controls
//! layer and [`GuiEvent`]s for GUI managers. Controllers are not handled
//! here: the host feeds their buttons and axes as raw inputs.
//!
//! Keyboard keys are numbered the way bind tokens persist them (`k_N`), so
//! option files stay valid across platforms.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::source::{Input, InputSource, InputSourceKind};
use crate::gui::GuiEvent;

/// Pixel scroll that counts as one wheel notch, for touchpads.
const PIXELS_PER_NOTCH: f32 = 40.0;

/// Persisted number of a key, or `None` for keys that can't be bound.
pub fn key_code_number(code: KeyCode) -> Option<i32> {
    let n = match code {
        KeyCode::KeyA => 1,
        KeyCode::KeyB => 2,
        KeyCode::KeyC => 3,
        KeyCode::KeyD => 4,
        KeyCode::KeyE => 5,
        KeyCode::KeyF => 6,
        KeyCode::KeyG => 7,
        KeyCode::KeyH => 8,
        KeyCode::KeyI => 9,
        KeyCode::KeyJ => 10,
        KeyCode::KeyK => 11,
        KeyCode::KeyL => 12,
        KeyCode::KeyM => 13,
        KeyCode::KeyN => 14,
        KeyCode::KeyO => 15,
        KeyCode::KeyP => 16,
        KeyCode::KeyQ => 17,
        KeyCode::KeyR => 18,
        KeyCode::KeyS => 19,
        KeyCode::KeyT => 20,
        KeyCode::KeyU => 21,
        KeyCode::KeyV => 22,
        KeyCode::KeyW => 23,
        KeyCode::KeyX => 24,
        KeyCode::KeyY => 25,
        KeyCode::KeyZ => 26,
        KeyCode::Digit0 => 27,
        KeyCode::Digit1 => 28,
        KeyCode::Digit2 => 29,
        KeyCode::Digit3 => 30,
        KeyCode::Digit4 => 31,
        KeyCode::Digit5 => 32,
        KeyCode::Digit6 => 33,
        KeyCode::Digit7 => 34,
        KeyCode::Digit8 => 35,
        KeyCode::Digit9 => 36,
        KeyCode::Numpad0 => 37,
        KeyCode::Numpad1 => 38,
        KeyCode::Numpad2 => 39,
        KeyCode::Numpad3 => 40,
        KeyCode::Numpad4 => 41,
        KeyCode::Numpad5 => 42,
        KeyCode::Numpad6 => 43,
        KeyCode::Numpad7 => 44,
        KeyCode::Numpad8 => 45,
        KeyCode::Numpad9 => 46,
        KeyCode::F1 => 47,
        KeyCode::F2 => 48,
        KeyCode::F3 => 49,
        KeyCode::F4 => 50,
        KeyCode::F5 => 51,
        KeyCode::F6 => 52,
        KeyCode::F7 => 53,
        KeyCode::F8 => 54,
        KeyCode::F9 => 55,
        KeyCode::F10 => 56,
        KeyCode::F11 => 57,
        KeyCode::F12 => 58,
        KeyCode::Escape => 59,
        KeyCode::Backquote => 60,
        KeyCode::Minus => 61,
        KeyCode::Equal => 62,
        KeyCode::Backspace => 63,
        KeyCode::Tab => 64,
        KeyCode::BracketLeft => 65,
        KeyCode::BracketRight => 66,
        KeyCode::Enter => 67,
        KeyCode::Semicolon => 68,
        KeyCode::Quote => 69,
        KeyCode::Backslash => 70,
        KeyCode::Comma => 72,
        KeyCode::Period => 73,
        KeyCode::Slash => 74,
        KeyCode::Space => 75,
        KeyCode::Insert => 76,
        KeyCode::Delete => 77,
        KeyCode::Home => 78,
        KeyCode::End => 79,
        KeyCode::PageUp => 80,
        KeyCode::PageDown => 81,
        KeyCode::ArrowLeft => 82,
        KeyCode::ArrowRight => 83,
        KeyCode::ArrowUp => 84,
        KeyCode::ArrowDown => 85,
        KeyCode::ShiftLeft => 215,
        KeyCode::ShiftRight => 216,
        KeyCode::ControlLeft => 217,
        KeyCode::ControlRight => 218,
        KeyCode::AltLeft => 219,
        KeyCode::AltRight => 220,
        _ => return None,
    };
    Some(n)
}

pub fn mouse_button_number(button: MouseButton) -> Option<i32> {
    match button {
        MouseButton::Left => Some(1),
        MouseButton::Right => Some(2),
        MouseButton::Middle => Some(3),
        MouseButton::Back => Some(4),
        MouseButton::Forward => Some(5),
        MouseButton::Other(_) => None,
    }
}

fn pressed_value(state: ElementState) -> f32 {
    if state.is_pressed() { 1.0 } else { 0.0 }
}

pub fn key_input(code: KeyCode, state: ElementState) -> Option<Input> {
    let n = key_code_number(code)?;
    Some(Input::new(InputSource::key(n), pressed_value(state)))
}

pub fn mouse_button_input(button: MouseButton, state: ElementState) -> Option<Input> {
    let n = mouse_button_number(button)?;
    Some(Input::new(InputSource::mouse_button(n), pressed_value(state)))
}

/// Wheel movement in notches. Positive `y` scrolls up, positive `x`
/// scrolls right.
pub fn scroll_notches(delta: MouseScrollDelta) -> Vec2 {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => Vec2::new(x, y),
        MouseScrollDelta::PixelDelta(p) => Vec2::new(p.x as f32, p.y as f32) / PIXELS_PER_NOTCH,
    }
}

/// One input per wheel direction that moved.
pub fn wheel_inputs(delta: MouseScrollDelta) -> Vec<Input> {
    let notches = scroll_notches(delta);
    let mut inputs = Vec::new();
    for (amount, pos_kind, neg_kind) in [
        (notches.y, InputSourceKind::MouseWheelUp, InputSourceKind::MouseWheelDown),
        (notches.x, InputSourceKind::MouseWheelRight, InputSourceKind::MouseWheelLeft),
    ] {
        if amount > 0.0 {
            inputs.push(Input::new(InputSource::wheel(pos_kind), amount));
        } else if amount < 0.0 {
            inputs.push(Input::new(InputSource::wheel(neg_kind), -amount));
        }
    }
    inputs
}

/// What a window event means to the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslatedEvent {
    pub inputs: Vec<Input>,
    pub gui_event: Option<GuiEvent>,
    /// The window lost focus; everything held should be released.
    pub focus_lost: bool,
}

/// Tracks the cursor between window events.
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    cursor: Vec2,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor position in window pixels.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) -> TranslatedEvent {
        let mut out = TranslatedEvent::default();
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                // OS key repeat is left out; the controls layer repeats on
                // its own.
                if event.repeat {
                    return out;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    out.inputs.extend(key_input(code, event.state));
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                out.inputs.extend(mouse_button_input(*button, *state));
                if let Some(n) = mouse_button_number(*button) {
                    let (pos, button) = (self.cursor, n as u32);
                    out.gui_event = Some(if state.is_pressed() {
                        GuiEvent::MouseButtonDown { pos, button }
                    } else {
                        GuiEvent::MouseButtonUp { pos, button }
                    });
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                out.gui_event = Some(GuiEvent::MouseMoved { pos: self.cursor });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                out.inputs = wheel_inputs(*delta);
                let dz = scroll_notches(*delta).y;
                if dz != 0.0 {
                    out.gui_event = Some(GuiEvent::MouseWheel { pos: self.cursor, dz });
                }
            }
            WindowEvent::Focused(false) => {
                out.focus_lost = true;
            }
            _ => {}
        }
        out
    }
}
