//! Easing Curves
//!
//! Maps a normalized progress value in [0, 1] onto an eased value. Most
//! curves start at 0 and end at 1; the up-and-down family starts and ends at
//! 0 and peaks in between, which is what the GUI juice animations use.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Easing method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Ease {
    /// Linear.
    #[default]
    None,
    /// Cubic, slow start.
    In,
    /// Cubic, slow finish.
    Out,
    InBack,
    OutBack,
    InOutBack,
    InElastic,
    OutElastic,
    /// Half sine: 0 -> 1 -> 0.
    UpAndDown,
    /// Half sine followed by two smaller, inverted wobbles.
    UpAndDownElastic,
}

const BACK_MAGNITUDE: f32 = 1.70158;

/// Eases `n` with the given method.
pub fn ease(method: Ease, n: f32) -> f32 {
    match method {
        Ease::None => n,
        Ease::In => n.powi(3),
        Ease::Out => 1.0 - (1.0 - n).powi(3),
        Ease::InBack => {
            let mag2 = BACK_MAGNITUDE + 1.0;
            mag2 * n * n * n - BACK_MAGNITUDE * n * n
        }
        Ease::OutBack => {
            let mag2 = BACK_MAGNITUDE + 1.0;
            1.0 + mag2 * (n - 1.0).powi(3) + BACK_MAGNITUDE * (n - 1.0).powi(2)
        }
        Ease::InOutBack => {
            let mag2 = BACK_MAGNITUDE * 1.525;
            if n < 0.5 {
                ((2.0 * n).powi(2) * ((mag2 + 1.0) * 2.0 * n - mag2)) / 2.0
            } else {
                ((2.0 * n - 2.0).powi(2) * ((mag2 + 1.0) * (n * 2.0 - 2.0) + mag2) + 2.0) / 2.0
            }
        }
        Ease::InElastic => {
            let mag = TAU / 3.0;
            if n == 0.0 {
                0.0
            } else if n == 1.0 {
                1.0
            } else {
                -(2.0f32.powf(10.0 * n - 10.0)) * ((n * 10.0 - 10.75) * mag).sin()
            }
        }
        Ease::OutElastic => {
            let mag = TAU / 3.0;
            if n == 0.0 {
                0.0
            } else if n == 1.0 {
                1.0
            } else {
                2.0f32.powf(-10.0 * n) * ((n * 10.0 - 0.75) * mag).sin() + 1.0
            }
        }
        Ease::UpAndDown => (n * TAU / 2.0).sin(),
        Ease::UpAndDownElastic => {
            const CP1: f32 = 0.5;
            const CP2: f32 = 0.8;
            const MAG1: f32 = -0.4;
            const MAG2: f32 = 0.15;
            if n < CP1 {
                let aux = n / CP1;
                (aux * TAU / 2.0).sin()
            } else if n < CP2 {
                let aux = (n - CP1) / (CP2 - CP1);
                (aux * TAU / 2.0).sin() * MAG1
            } else {
                let aux = (n - CP2) / (1.0 - CP2);
                (aux * TAU / 2.0).sin() * MAG2
            }
        }
    }
}

impl Ease {
    /// Name used in data files.
    pub fn name(self) -> &'static str {
        match self {
            Ease::None => "none",
            Ease::In => "in",
            Ease::Out => "out",
            Ease::InBack => "in_back",
            Ease::OutBack => "out_back",
            Ease::InOutBack => "in_out_back",
            Ease::InElastic => "in_elastic",
            Ease::OutElastic => "out_elastic",
            Ease::UpAndDown => "up_and_down",
            Ease::UpAndDownElastic => "up_and_down_elastic",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "none" => Ease::None,
            "in" => Ease::In,
            "out" => Ease::Out,
            "in_back" => Ease::InBack,
            "out_back" => Ease::OutBack,
            "in_out_back" => Ease::InOutBack,
            "in_elastic" => Ease::InElastic,
            "out_elastic" => Ease::OutElastic,
            "up_and_down" => Ease::UpAndDown,
            "up_and_down_elastic" => Ease::UpAndDownElastic,
            _ => return None,
        })
    }
}
