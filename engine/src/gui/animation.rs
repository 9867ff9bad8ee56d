//! GUI Transitions
//!
//! Whole-manager slide animations. They only move where items are drawn;
//! the items' own coordinates are never touched.

use glam::Vec2;

use crate::math::{ease, get_angle_between, interpolate_number, Ease};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GuiAnimation {
    #[default]
    None,
    /// Items fly in from outside the window, away from its center.
    OutToIn,
    /// Items fly out of the window, away from its center.
    InToOut,
    UpToCenter,
    CenterToUp,
    DownToCenter,
    CenterToDown,
    LeftToCenter,
    CenterToLeft,
    RightToCenter,
    CenterToRight,
}

impl GuiAnimation {
    /// Whether the manager is hidden once this animation ends.
    pub fn hides_at_end(self) -> bool {
        matches!(
            self,
            Self::InToOut
                | Self::CenterToUp
                | Self::CenterToDown
                | Self::CenterToLeft
                | Self::CenterToRight
        )
    }

    /// Where an item resting at `center` is drawn, given the ratio of the
    /// animation still left.
    pub fn apply(self, center: Vec2, ratio_left: f32, window: Vec2) -> Vec2 {
        let t = 1.0 - ratio_left;
        let lerp = |curve: Ease, from: Vec2, to: Vec2| {
            let e = ease(curve, t);
            Vec2::new(
                interpolate_number(e, 0.0, 1.0, from.x, to.x),
                interpolate_number(e, 0.0, 1.0, from.y, to.y),
            )
        };
        let away = || {
            let angle = get_angle_between(window / 2.0, center);
            center + Vec2::new(angle.cos() * window.x, angle.sin() * window.y)
        };
        let dx = Vec2::new(window.x, 0.0);
        let dy = Vec2::new(0.0, window.y);

        match self {
            Self::None => center,
            Self::OutToIn => lerp(Ease::Out, away(), center),
            Self::InToOut => lerp(Ease::In, center, away()),
            Self::UpToCenter => lerp(Ease::Out, center - dy, center),
            Self::CenterToUp => lerp(Ease::Out, center, center - dy),
            Self::DownToCenter => lerp(Ease::Out, center + dy, center),
            Self::CenterToDown => lerp(Ease::Out, center, center + dy),
            Self::LeftToCenter => lerp(Ease::Out, center - dx, center),
            Self::CenterToLeft => lerp(Ease::Out, center, center - dx),
            Self::RightToCenter => lerp(Ease::Out, center + dx, center),
            Self::CenterToRight => lerp(Ease::Out, center, center + dx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const WINDOW: Vec2 = Vec2::new(800.0, 600.0);

    #[test_case(GuiAnimation::UpToCenter, Vec2::new(400.0, -300.0) ; "up to center")]
    #[test_case(GuiAnimation::DownToCenter, Vec2::new(400.0, 900.0) ; "down to center")]
    #[test_case(GuiAnimation::LeftToCenter, Vec2::new(-400.0, 300.0) ; "left to center")]
    #[test_case(GuiAnimation::RightToCenter, Vec2::new(1200.0, 300.0) ; "right to center")]
    fn test_slide_in_starts_one_window_away(anim: GuiAnimation, start: Vec2) {
        let center = Vec2::new(400.0, 300.0);
        assert!(anim.apply(center, 1.0, WINDOW).distance(start) < 1e-3);
        assert!(anim.apply(center, 0.0, WINDOW).distance(center) < 1e-3);
    }

    #[test]
    fn test_out_to_in_flies_away_from_center() {
        let center = Vec2::new(600.0, 300.0);
        let start = GuiAnimation::OutToIn.apply(center, 1.0, WINDOW);
        assert!((start - Vec2::new(1400.0, 300.0)).length() < 1e-2);
        let end = GuiAnimation::InToOut.apply(center, 0.0, WINDOW);
        assert!((end - start).length() < 1e-2);
    }

    #[test]
    fn test_end_visibility() {
        assert!(GuiAnimation::CenterToLeft.hides_at_end());
        assert!(GuiAnimation::InToOut.hides_at_end());
        assert!(!GuiAnimation::OutToIn.hides_at_end());
        assert!(!GuiAnimation::None.hides_at_end());
    }
}
