//! Input Sources
//!
//! A source is one physical thing a player can press or tilt: a key, a mouse
//! button, a wheel direction, a controller button or half of a controller
//! axis. Sources persist as short tokens such as `k_23` or `jap_0_1_0`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ControlsError;

/// Kinds of hardware input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum InputSourceKind {
    #[default]
    None,
    KeyboardKey,
    MouseButton,
    MouseWheelUp,
    MouseWheelDown,
    MouseWheelLeft,
    MouseWheelRight,
    ControllerButton,
    /// Controller stick axis tilted towards its positive end.
    ControllerAxisPos,
    /// Controller stick axis tilted towards its negative end.
    ControllerAxisNeg,
}

impl InputSourceKind {
    pub fn is_axis(self) -> bool {
        matches!(self, Self::ControllerAxisPos | Self::ControllerAxisNeg)
    }

    pub fn is_wheel(self) -> bool {
        matches!(
            self,
            Self::MouseWheelUp | Self::MouseWheelDown | Self::MouseWheelLeft | Self::MouseWheelRight
        )
    }
}

/// A specific key, button, wheel direction or half-axis on a specific
/// device. Fields that don't apply to the kind are 0.
///
/// Ordering compares kind, then device, button, stick and axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct InputSource {
    pub kind: InputSourceKind,
    pub device_nr: i32,
    /// Key code, mouse button or controller button.
    pub button_nr: i32,
    pub stick_nr: i32,
    pub axis_nr: i32,
}

impl InputSource {
    pub fn key(code: i32) -> Self {
        Self { kind: InputSourceKind::KeyboardKey, button_nr: code, ..Default::default() }
    }

    pub fn mouse_button(button: i32) -> Self {
        Self { kind: InputSourceKind::MouseButton, button_nr: button, ..Default::default() }
    }

    pub fn wheel(kind: InputSourceKind) -> Self {
        Self { kind, ..Default::default() }
    }

    pub fn controller_button(device: i32, button: i32) -> Self {
        Self {
            kind: InputSourceKind::ControllerButton,
            device_nr: device,
            button_nr: button,
            ..Default::default()
        }
    }

    pub fn controller_axis(device: i32, stick: i32, axis: i32, positive: bool) -> Self {
        Self {
            kind: if positive {
                InputSourceKind::ControllerAxisPos
            } else {
                InputSourceKind::ControllerAxisNeg
            },
            device_nr: device,
            stick_nr: stick,
            axis_nr: axis,
            ..Default::default()
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == InputSourceKind::None
    }
}

impl fmt::Display for InputSource {
    /// Writes the persisted token. `None` writes nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            InputSourceKind::None => Ok(()),
            InputSourceKind::KeyboardKey => write!(f, "k_{}", self.button_nr),
            InputSourceKind::MouseButton => write!(f, "mb_{}", self.button_nr),
            InputSourceKind::MouseWheelUp => f.write_str("mwu"),
            InputSourceKind::MouseWheelDown => f.write_str("mwd"),
            InputSourceKind::MouseWheelLeft => f.write_str("mwl"),
            InputSourceKind::MouseWheelRight => f.write_str("mwr"),
            InputSourceKind::ControllerButton => write!(f, "jb_{}_{}", self.device_nr, self.button_nr),
            InputSourceKind::ControllerAxisPos => {
                write!(f, "jap_{}_{}_{}", self.device_nr, self.stick_nr, self.axis_nr)
            }
            InputSourceKind::ControllerAxisNeg => {
                write!(f, "jan_{}_{}_{}", self.device_nr, self.stick_nr, self.axis_nr)
            }
        }
    }
}

impl FromStr for InputSource {
    type Err = ControlsError;

    /// Parses a persisted token. Numbers that fail to parse read as 0,
    /// like the rest of the data tree coercions.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parts: Vec<&str> = s.split('_').collect();
        let num = |i: usize| parts.get(i).and_then(|p| p.trim().parse::<i32>().ok()).unwrap_or(0);

        let source = match (parts[0], parts.len()) {
            ("k", n) if n >= 2 => Self::key(num(1)),
            ("mb", n) if n >= 2 => Self::mouse_button(num(1)),
            ("mwu", _) => Self::wheel(InputSourceKind::MouseWheelUp),
            ("mwd", _) => Self::wheel(InputSourceKind::MouseWheelDown),
            ("mwl", _) => Self::wheel(InputSourceKind::MouseWheelLeft),
            ("mwr", _) => Self::wheel(InputSourceKind::MouseWheelRight),
            ("jb", n) if n >= 3 => Self::controller_button(num(1), num(2)),
            ("jap", n) if n >= 4 => Self::controller_axis(num(1), num(2), num(3), true),
            ("jan", n) if n >= 4 => Self::controller_axis(num(1), num(2), num(3), false),
            _ => return Err(ControlsError::UnknownInputSource(s.to_string())),
        };
        Ok(source)
    }
}

/// One reading from one source. Buttons are 0 or 1, axes are in [0, 1],
/// wheels carry the number of notches scrolled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Input {
    pub source: InputSource,
    pub value: f32,
}

impl Input {
    pub fn new(source: InputSource, value: f32) -> Self {
        Self { source, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("k_65", InputSource::key(65) ; "key")]
    #[test_case("mb_2", InputSource::mouse_button(2) ; "mouse button")]
    #[test_case("mwd", InputSource::wheel(InputSourceKind::MouseWheelDown) ; "wheel down")]
    #[test_case("jb_1_7", InputSource::controller_button(1, 7) ; "controller button")]
    #[test_case("jap_0_1_0", InputSource::controller_axis(0, 1, 0, true) ; "positive axis")]
    #[test_case("jan_2_0_1", InputSource::controller_axis(2, 0, 1, false) ; "negative axis")]
    fn test_token_round_trip(token: &str, expected: InputSource) {
        let parsed: InputSource = token.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), token);
    }

    #[test]
    fn test_bad_tokens() {
        for token in ["", "k", "jb_1", "jap_0_0", "zz_9", "keyboard"] {
            assert_eq!(
                token.parse::<InputSource>(),
                Err(ControlsError::UnknownInputSource(token.to_string())),
                "{token}"
            );
        }
    }

    #[test]
    fn test_ordering_by_kind_first() {
        let mut v = vec![
            InputSource::mouse_button(1),
            InputSource::key(90),
            InputSource::key(3),
        ];
        v.sort();
        assert_eq!(v, vec![InputSource::key(3), InputSource::key(90), InputSource::mouse_button(1)]);
    }

    #[test]
    fn test_none_has_no_token() {
        assert_eq!(InputSource::default().to_string(), "");
        assert!(InputSource::default().is_none());
    }
}
