//! GUI Items
//!
//! A [`GuiItem`] is one node of a GUI tree: a HUD element, a button, a list,
//! some text. Its position and size are ratios of its parent's content box,
//! or of the window for root items. Per-widget state lives in
//! [`GuiItemKind`].

use glam::Vec2;

use crate::math::{ease, Color, Ease};
use crate::render::TextAlign;

use super::{
    JUICY_GROW_DURATION, JUICY_GROW_ELASTIC_DURATION, JUICY_GROW_ICON_MULT,
    JUICY_GROW_TEXT_HIGH_MULT, JUICY_GROW_TEXT_LOW_MULT, JUICY_GROW_TEXT_MEDIUM_MULT, LIST_PADDING,
};

/// Handle to an item owned by a [`super::GuiManager`].
///
/// Handles to removed items are stale: the manager ignores them, even if
/// their slot has since been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GuiItemId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

/// Short "juicy" growth effects, used to give feedback on a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JuiceType {
    #[default]
    None,
    GrowTextLow,
    GrowTextMedium,
    GrowTextHigh,
    GrowTextElasticLow,
    GrowTextElasticMedium,
    GrowTextElasticHigh,
    GrowIcon,
}

impl JuiceType {
    /// Total duration and peak multiplier, plus the curve used.
    fn params(self) -> Option<(f32, f32, Ease)> {
        let p = match self {
            Self::None => return None,
            Self::GrowTextLow => (JUICY_GROW_DURATION, JUICY_GROW_TEXT_LOW_MULT, Ease::UpAndDown),
            Self::GrowTextMedium => {
                (JUICY_GROW_DURATION, JUICY_GROW_TEXT_MEDIUM_MULT, Ease::UpAndDown)
            }
            Self::GrowTextHigh => (JUICY_GROW_DURATION, JUICY_GROW_TEXT_HIGH_MULT, Ease::UpAndDown),
            Self::GrowTextElasticLow => (
                JUICY_GROW_ELASTIC_DURATION,
                JUICY_GROW_TEXT_LOW_MULT,
                Ease::UpAndDownElastic,
            ),
            Self::GrowTextElasticMedium => (
                JUICY_GROW_ELASTIC_DURATION,
                JUICY_GROW_TEXT_MEDIUM_MULT,
                Ease::UpAndDownElastic,
            ),
            Self::GrowTextElasticHigh => (
                JUICY_GROW_ELASTIC_DURATION,
                JUICY_GROW_TEXT_HIGH_MULT,
                Ease::UpAndDownElastic,
            ),
            Self::GrowIcon => (JUICY_GROW_DURATION, JUICY_GROW_ICON_MULT, Ease::UpAndDown),
        };
        Some(p)
    }

    pub fn duration(self) -> f32 {
        self.params().map_or(0.0, |(d, _, _)| d)
    }
}

/// Which arrow of a picker the mouse is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerArrow {
    Previous,
    Next,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickerData {
    /// Text drawn before the option's name.
    pub base_text: String,
    pub option: String,
    pub nr_options: usize,
    pub cur_option_idx: usize,
    pub(crate) arrow_highlight: Option<PickerArrow>,
}

impl PickerData {
    /// Shows a new option, e.g. after handling a picker step.
    pub fn set_option(&mut self, option: impl Into<String>, idx: usize) {
        self.option = option.into();
        self.cur_option_idx = idx;
    }

    pub fn arrow_highlight(&self) -> Option<PickerArrow> {
        self.arrow_highlight
    }
}

/// Widget-specific state and behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum GuiItemKind {
    /// No drawing of its own. Used for containers and host-drawn HUD parts.
    Plain,
    Bullet {
        text: String,
        color: Color,
    },
    Button {
        text: String,
        color: Color,
    },
    Check {
        value: bool,
        text: String,
        color: Color,
    },
    /// Scrollable container. `offset` on the item is the current scroll,
    /// which eases towards `target_offset`.
    List {
        target_offset: f32,
    },
    Picker(PickerData),
    /// Scrollbar for a list item.
    Scroll {
        list_item: Option<GuiItemId>,
    },
    Text {
        text: String,
        color: Color,
        align: TextAlign,
    },
    /// Shows the selected item's tooltip.
    Tooltip {
        prev_text: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuiItem {
    /// Center, as a ratio of the parent's content box.
    pub center: Vec2,
    /// Size, as a ratio of the parent's content box.
    pub size: Vec2,
    pub visible: bool,
    pub responsive: bool,
    pub selectable: bool,
    /// Whether activating it does anything.
    pub activatable: bool,
    /// Vertical scroll of the children, in ratio of this item's height.
    pub offset: f32,
    /// Pixels between the edges and the children's content box.
    pub padding: f32,
    pub can_auto_repeat: bool,
    pub tooltip: String,
    pub kind: GuiItemKind,
    pub(crate) selected: bool,
    pub(crate) parent: Option<GuiItemId>,
    pub(crate) children: Vec<GuiItemId>,
    pub(crate) juice_type: JuiceType,
    pub(crate) juice_timer: f32,
}

impl Default for GuiItem {
    fn default() -> Self {
        Self::new(false)
    }
}

impl GuiItem {
    pub fn new(selectable: bool) -> Self {
        Self::with_kind(GuiItemKind::Plain, selectable, false)
    }

    fn with_kind(kind: GuiItemKind, selectable: bool, activatable: bool) -> Self {
        Self {
            center: Vec2::ZERO,
            size: Vec2::ZERO,
            visible: true,
            responsive: true,
            selectable,
            activatable,
            offset: 0.0,
            padding: 0.0,
            can_auto_repeat: false,
            tooltip: String::new(),
            kind,
            selected: false,
            parent: None,
            children: Vec::new(),
            juice_type: JuiceType::None,
            juice_timer: 0.0,
        }
    }

    pub fn bullet(text: impl Into<String>, color: Color) -> Self {
        Self::with_kind(GuiItemKind::Bullet { text: text.into(), color }, true, false)
    }

    pub fn button(text: impl Into<String>, color: Color) -> Self {
        Self::with_kind(GuiItemKind::Button { text: text.into(), color }, true, true)
    }

    pub fn check(value: bool, text: impl Into<String>, color: Color) -> Self {
        Self::with_kind(GuiItemKind::Check { value, text: text.into(), color }, true, true)
    }

    pub fn list() -> Self {
        let mut item = Self::with_kind(GuiItemKind::List { target_offset: 0.0 }, false, false);
        item.padding = LIST_PADDING;
        item
    }

    pub fn picker(
        base_text: impl Into<String>,
        option: impl Into<String>,
        nr_options: usize,
        cur_option_idx: usize,
    ) -> Self {
        Self::with_kind(
            GuiItemKind::Picker(PickerData {
                base_text: base_text.into(),
                option: option.into(),
                nr_options,
                cur_option_idx,
                arrow_highlight: None,
            }),
            true,
            true,
        )
    }

    pub fn scroll(list_item: GuiItemId) -> Self {
        Self::with_kind(GuiItemKind::Scroll { list_item: Some(list_item) }, false, false)
    }

    pub fn text(text: impl Into<String>, color: Color, align: TextAlign) -> Self {
        Self::with_kind(GuiItemKind::Text { text: text.into(), color, align }, false, false)
    }

    pub fn tooltip() -> Self {
        Self::with_kind(GuiItemKind::Tooltip { prev_text: String::new() }, false, false)
    }

    pub fn with_coords(mut self, center: Vec2, size: Vec2) -> Self {
        self.center = center;
        self.size = size;
        self
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn parent(&self) -> Option<GuiItemId> {
        self.parent
    }

    pub fn children(&self) -> &[GuiItemId] {
        &self.children
    }

    pub fn juice_type(&self) -> JuiceType {
        self.juice_type
    }

    pub fn juice_timer(&self) -> f32 {
        self.juice_timer
    }

    /// Current growth amount of the juice animation, 0 when there is none.
    pub fn get_juice_value(&self) -> f32 {
        let Some((duration, mult, curve)) = self.juice_type.params() else {
            return 0.0;
        };
        let anim_ratio = 1.0 - self.juice_timer / duration;
        ease(curve, anim_ratio) * mult
    }

    pub fn start_juice_animation(&mut self, juice_type: JuiceType) {
        self.juice_type = juice_type;
        if juice_type != JuiceType::None {
            self.juice_timer = juice_type.duration();
        }
    }

    /// Counts the juice timer down. The type resets on the tick after the
    /// timer runs out.
    pub(crate) fn tick_juice(&mut self, dt: f32) {
        if self.juice_timer > 0.0 {
            self.juice_timer = (self.juice_timer - dt).max(0.0);
        } else {
            self.juice_type = JuiceType::None;
        }
    }
}
