//! Keyframe Interpolation
//!
//! Time-keyed value tracks used by particles (size, speeds, color) and by
//! anything else that animates over a normalized [0, 1] lifetime.
//!
//! A track always holds at least one keyframe. Sampling outside the covered
//! range clamps to the nearest endpoint value; there is no extrapolation.

use glam::Vec2;

use super::color::Color;
use super::easing::{ease, Ease};
use crate::data::{DataNode, DataValue};

/// Minimum span used between two keyframes, so equal times never divide by zero.
const MIN_KEYFRAME_GAP: f32 = 0.01;

/// Values that can be blended between two keyframes.
pub trait Interpolate: Clone {
    fn interpolate(from: &Self, to: &Self, ratio: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(from: &Self, to: &Self, ratio: f32) -> Self {
        from + (to - from) * ratio
    }
}

impl Interpolate for Vec2 {
    fn interpolate(from: &Self, to: &Self, ratio: f32) -> Self {
        from.lerp(*to, ratio)
    }
}

impl Interpolate for Color {
    fn interpolate(from: &Self, to: &Self, ratio: f32) -> Self {
        from.lerp(*to, ratio)
    }
}

/// Ordered `(time, value, ease)` keyframes.
///
/// The ease stored on keyframe `k` shapes the blend from `k - 1` into `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeInterpolator<T> {
    times: Vec<f32>,
    values: Vec<T>,
    eases: Vec<Ease>,
}

impl<T: Interpolate + Default> Default for KeyframeInterpolator<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Interpolate> KeyframeInterpolator<T> {
    /// Creates a track with a single keyframe at time 0.
    pub fn new(initial: T) -> Self {
        Self {
            times: vec![0.0],
            values: vec![initial],
            eases: vec![Ease::None],
        }
    }

    /// Samples the track at `t`.
    pub fn get(&self, t: f32) -> T {
        if t < 0.0 || t < self.times[0] {
            return self.values[0].clone();
        }

        for k in 1..self.times.len() {
            if t <= self.times[k] {
                let delta = (self.times[k] - self.times[k - 1]).max(MIN_KEYFRAME_GAP);
                let ratio = ease(self.eases[k], (t - self.times[k - 1]) / delta);
                return T::interpolate(&self.values[k - 1], &self.values[k], ratio);
            }
        }

        self.values[self.values.len() - 1].clone()
    }

    fn insertion_idx(&self, t: f32) -> usize {
        self.times
            .iter()
            .position(|&time| time >= t)
            .unwrap_or(self.times.len())
    }

    /// Inserts a keyframe keeping time order. Returns its index.
    pub fn add(&mut self, t: f32, value: T, ease: Ease) -> usize {
        let idx = self.insertion_idx(t);
        self.times.insert(idx, t);
        self.values.insert(idx, value);
        self.eases.insert(idx, ease);
        idx
    }

    /// Overwrites the value of the keyframe at exactly `t`, or adds one.
    pub fn add_or_set(&mut self, t: f32, value: T) -> usize {
        if let Some(idx) = self.times.iter().position(|&time| time == t) {
            self.values[idx] = value;
            return idx;
        }
        self.add(t, value, Ease::None)
    }

    /// Removes a keyframe. The last remaining keyframe is never removed.
    pub fn remove(&mut self, idx: usize) {
        if self.times.len() <= 1 || idx >= self.times.len() {
            return;
        }
        self.times.remove(idx);
        self.values.remove(idx);
        self.eases.remove(idx);
    }

    pub fn keyframe_count(&self) -> usize {
        self.times.len()
    }

    pub fn get_keyframe(&self, idx: usize) -> Option<(f32, &T)> {
        Some((*self.times.get(idx)?, self.values.get(idx)?))
    }

    pub fn keyframe_ease(&self, idx: usize) -> Option<Ease> {
        self.eases.get(idx).copied()
    }

    pub fn set_keyframe_value(&mut self, idx: usize, value: T) {
        if let Some(v) = self.values.get_mut(idx) {
            *v = value;
        }
    }

    /// Applies `f` to every keyframe value, keeping the time axis.
    pub fn map_values(&mut self, mut f: impl FnMut(&T) -> T) {
        for v in &mut self.values {
            *v = f(v);
        }
    }

    /// Moves a keyframe in time, bubbling it into place. Returns its new index.
    pub fn set_keyframe_time(&mut self, idx: usize, time: f32) -> usize {
        if idx >= self.times.len() {
            return idx;
        }
        let mut cur = idx;
        while cur > 0 && time < self.times[cur - 1] {
            self.swap(cur, cur - 1);
            cur -= 1;
        }
        while cur + 1 < self.times.len() && time > self.times[cur + 1] {
            self.swap(cur, cur + 1);
            cur += 1;
        }
        self.times[cur] = time;
        cur
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.times.swap(a, b);
        self.values.swap(a, b);
        self.eases.swap(a, b);
    }
}

impl<T: Interpolate + DataValue> KeyframeInterpolator<T> {
    /// Loads keyframes from a node whose children are `time = value` pairs.
    ///
    /// An empty node leaves the track untouched. Children with unparsable
    /// times or values are logged and skipped.
    pub fn load_from_data_node(&mut self, node: &DataNode) {
        if node.child_count() == 0 {
            return;
        }

        let mut loaded: Option<Self> = None;
        for child in &node.children {
            let time = match child.name.trim().parse::<f32>() {
                Ok(t) => t,
                Err(_) => {
                    log::error!("Keyframe time '{}' is not a number", child.name);
                    continue;
                }
            };
            let value = match T::from_node(child) {
                Ok(v) => v,
                Err(e) => {
                    log::error!("{e}");
                    continue;
                }
            };
            match loaded.as_mut() {
                Some(track) => {
                    track.add(time, value, Ease::None);
                }
                None => {
                    let mut track = Self::new(value);
                    track.times[0] = time;
                    loaded = Some(track);
                }
            }
        }

        if let Some(track) = loaded {
            *self = track;
        }
    }

    /// Writes one `time = value` child per keyframe.
    pub fn save_to_data_node(&self, node: &mut DataNode) {
        for (time, value) in self.times.iter().zip(&self.values) {
            node.add_new(time.to_string(), value.to_value_string());
        }
    }
}
