//! Per-widget drawing, ticking and input reactions, dispatched on
//! [`GuiItemKind`].

use std::f32::consts::TAU;

use glam::Vec2;

use super::item::{GuiItem, GuiItemId, GuiItemKind, JuiceType, PickerArrow};
use super::manager::GuiManager;
use super::{GuiEvent, GuiOutput, BULLET_PADDING, BULLET_RADIUS};
use crate::input::PlayerActionType;
use crate::math::Color;
use crate::render::{ColoredVertex, PrimKind, Renderer, TextAlign};

pub const BMP_BUBBLE_BOX: &str = "bubble_box";
pub const BMP_FOCUS_BOX: &str = "focus_box";
pub const BMP_CHECKBOX_CHECK: &str = "checkbox_check";
pub const BMP_CHECKBOX_NO_CHECK: &str = "checkbox_no_check";

/// Height of the fade drawn at a list's clipped edges.
const LIST_SHADE_HEIGHT: f32 = 20.0;
/// Scroll per wheel notch, in list heights.
const LIST_WHEEL_STEP: f32 = 0.2;
const LIST_SCROLL_SPEED: f32 = 10.0;

fn highlight_color() -> Color {
    Color::from_rgba8(87, 200, 208, 255)
}

fn box_tint(item: &GuiItem) -> Color {
    if item.selected { highlight_color() } else { Color::WHITE }
}

pub(super) fn has_drawing(item: &GuiItem) -> bool {
    !matches!(item.kind, GuiItemKind::Plain)
}

fn draw_focus_box<R: Renderer + ?Sized>(center: Vec2, size: Vec2, time: f32, r: &mut R) {
    let grow = 10.0 + (time * TAU).sin() * 2.0;
    r.draw_bitmap(BMP_FOCUS_BOX, center, size + Vec2::splat(grow), 0.0, Color::WHITE);
}

/// Fade along a horizontal list edge, from `y1` (visible) to `y2` (clear).
fn list_shade(center: Vec2, size: Vec2, y1: f32, y2: f32) -> Vec<ColoredVertex> {
    let opaque = Color::from_rgba8(255, 255, 255, 64);
    let empty = opaque.with_alpha(0.0);
    let strip = [
        (-0.49, y1, empty),
        (-0.49, y2, empty),
        (-0.47, y1, opaque),
        (-0.47, y2, empty),
        (0.47, y1, opaque),
        (0.47, y2, empty),
        (0.49, y1, empty),
        (0.49, y2, empty),
    ]
    .map(|(rx, y, c)| ColoredVertex::untextured(Vec2::new(center.x + size.x * rx, y), c));

    strip.windows(3).flat_map(|w| w.iter().copied()).collect()
}

pub(super) fn draw<R: Renderer + ?Sized>(
    mgr: &GuiManager,
    id: GuiItemId,
    item: &GuiItem,
    center: Vec2,
    size: Vec2,
    r: &mut R,
) {
    let juice = item.get_juice_value();
    let juice_scale = Vec2::splat(1.0 + juice);
    let time = mgr.time_passed();

    match &item.kind {
        GuiItemKind::Plain => {}

        GuiItemKind::Bullet { text, color } => {
            let x_start = center.x - size.x * 0.5;
            let text_x_offset = BULLET_RADIUS * 2.0 + BULLET_PADDING * 2.0;
            let text_space = Vec2::new((size.x - text_x_offset).max(1.0), size.y);
            r.draw_filled_circle(
                Vec2::new(x_start + BULLET_RADIUS + BULLET_PADDING, center.y),
                BULLET_RADIUS,
                *color,
            );
            r.draw_text(
                text,
                Vec2::new(x_start + text_x_offset, center.y),
                text_space,
                TextAlign::Left,
                *color,
                juice_scale,
            );
            if item.selected {
                draw_focus_box(center, size, time, r);
            }
        }

        GuiItemKind::Button { text, color } => {
            r.draw_text(text, center, size, TextAlign::Center, *color, juice_scale);
            r.draw_bitmap(BMP_BUBBLE_BOX, center, size, 0.0, box_tint(item));
            if item.selected {
                draw_focus_box(center, size, time, r);
            }
        }

        GuiItemKind::Check { value, text, color } => {
            r.draw_text(
                text,
                Vec2::new(center.x - size.x * 0.45, center.y),
                Vec2::new(size.x * 0.9, size.y),
                TextAlign::Left,
                *color,
                juice_scale,
            );
            let bmp = if *value { BMP_CHECKBOX_CHECK } else { BMP_CHECKBOX_NO_CHECK };
            r.draw_bitmap(
                bmp,
                Vec2::new(center.x + size.x * 0.5 - 40.0, center.y),
                Vec2::new(32.0, -1.0),
                0.0,
                Color::WHITE,
            );
            r.draw_bitmap(BMP_BUBBLE_BOX, center, size, 0.0, box_tint(item));
            if item.selected {
                draw_focus_box(center, size, time, r);
            }
        }

        GuiItemKind::List { .. } => {
            r.draw_rounded_rectangle(center, size, 8.0, Color::from_rgba8(255, 255, 255, 48), 1.0);
            if item.offset > 0.0 {
                let y1 = center.y - size.y / 2.0;
                let shade = list_shade(center, size, y1, y1 + LIST_SHADE_HEIGHT);
                r.draw_prim(&shade, PrimKind::TriangleList, None);
            }
            let child_bottom = mgr.get_child_bottom(id);
            if child_bottom > 1.0 && item.offset < child_bottom - 1.0 {
                let y1 = center.y + size.y / 2.0;
                let shade = list_shade(center, size, y1, y1 - LIST_SHADE_HEIGHT);
                r.draw_prim(&shade, PrimKind::TriangleList, None);
            }
        }

        GuiItemKind::Picker(data) => {
            if data.nr_options != 0 && item.selected {
                let start = Vec2::new(center.x - size.x / 2.0 + 20.0, center.y + size.y / 2.0 - 12.0);
                let interval = (size.x - 40.0) / (data.nr_options as f32 - 0.5);
                for o in 0..data.nr_options {
                    let x1 = start.x + o as f32 * interval;
                    let alpha = if data.cur_option_idx == o { 160 } else { 64 };
                    r.draw_filled_rectangle(
                        Vec2::new(x1, start.y),
                        Vec2::new(x1 + interval * 0.5, start.y + 4.0),
                        Color::from_rgba8(255, 255, 255, alpha),
                    );
                }
            }

            let highlight = if item.selected && mgr.was_last_input_mouse() {
                data.arrow_highlight
            } else {
                None
            };
            for (arrow, text, rx) in [(PickerArrow::Previous, "<", -0.45), (PickerArrow::Next, ">", 0.45)] {
                let (color, scale) = if highlight == Some(arrow) {
                    (highlight_color(), Vec2::splat(1.4))
                } else {
                    (Color::WHITE, Vec2::ONE)
                };
                r.draw_text(
                    text,
                    Vec2::new(center.x + size.x * rx, center.y),
                    size,
                    TextAlign::Center,
                    color,
                    scale,
                );
            }

            r.draw_text(
                &format!("{}{}", data.base_text, data.option),
                Vec2::new(center.x - size.x * 0.4, center.y),
                Vec2::new(size.x * 0.8, size.y),
                TextAlign::Left,
                Color::WHITE,
                juice_scale,
            );
            r.draw_bitmap(BMP_BUBBLE_BOX, center, size, 0.0, box_tint(item));
            if item.selected {
                draw_focus_box(center, size, time, r);
            }
        }

        GuiItemKind::Scroll { list_item } => {
            let Some((list_id, list)) = list_item.and_then(|l| mgr.item(l).map(|i| (l, i))) else {
                return;
            };
            let list_bottom = mgr.get_child_bottom(list_id);
            let mut bar_y = 0.0;
            let mut bar_h = 0.0;
            let mut alpha = 48;
            if list_bottom > 1.0 {
                let offset = list.offset.min(list_bottom - 1.0);
                bar_y = offset / list_bottom;
                bar_h = 1.0 / list_bottom;
                alpha = 128;
            }
            r.draw_rounded_rectangle(center, size, 8.0, Color::from_rgba8(255, 255, 255, alpha), 1.0);
            if bar_h != 0.0 {
                let bar_center = Vec2::new(
                    center.x,
                    center.y - size.y * 0.5 + size.y * bar_y + size.y * bar_h * 0.5,
                );
                r.draw_bitmap(
                    BMP_BUBBLE_BOX,
                    bar_center,
                    Vec2::new(size.x, size.y * bar_h),
                    0.0,
                    Color::WHITE,
                );
            }
        }

        GuiItemKind::Text { text, color, align } => {
            let text_x = match align {
                TextAlign::Left => center.x - size.x * 0.5,
                TextAlign::Center => center.x,
                TextAlign::Right => center.x + size.x * 0.5,
            };
            r.draw_text(text, Vec2::new(text_x, center.y), size, *align, *color, juice_scale);
        }

        GuiItemKind::Tooltip { .. } => {
            r.draw_text(
                mgr.get_current_tooltip(),
                center,
                size,
                TextAlign::Center,
                Color::WHITE,
                Vec2::splat(0.7 + juice),
            );
        }
    }
}

pub(super) fn tick(mgr: &mut GuiManager, id: GuiItemId, dt: f32, tooltip: &str) {
    let child_bottom = mgr.get_child_bottom(id);
    let Some(item) = mgr.item_mut(id) else {
        return;
    };
    match &mut item.kind {
        GuiItemKind::List { target_offset } => {
            if child_bottom < 1.0 {
                *target_offset = 0.0;
                item.offset = 0.0;
                return;
            }
            let max_offset = child_bottom - 1.0;
            *target_offset = target_offset.clamp(0.0, max_offset);
            let mut offset = item.offset + (*target_offset - item.offset) * (LIST_SCROLL_SPEED * dt);
            offset = offset.clamp(0.0, max_offset);
            if offset <= 0.01 {
                offset = 0.0;
            }
            if child_bottom > 1.0 && max_offset - offset <= 0.01 {
                offset = max_offset;
            }
            item.offset = offset;
        }
        GuiItemKind::Tooltip { prev_text } => {
            if prev_text != tooltip {
                *prev_text = tooltip.to_string();
                item.start_juice_animation(JuiceType::GrowTextLow);
            }
        }
        _ => {}
    }
}

/// Mouse-driven reactions of list scrolling and scrollbar clicks.
pub(super) fn handle_event(mgr: &mut GuiManager, id: GuiItemId, ev: &GuiEvent) {
    let pos = ev.pos();
    let Some(item) = mgr.item(id) else {
        return;
    };
    match (&item.kind, *ev) {
        (GuiItemKind::List { target_offset }, GuiEvent::MouseWheel { dz, .. }) => {
            if dz == 0.0 || !mgr.is_mouse_on(id, pos) {
                return;
            }
            let child_bottom = mgr.get_child_bottom(id);
            if child_bottom <= 1.0 && item.offset == 0.0 {
                return;
            }
            let new_target = (target_offset - dz * LIST_WHEEL_STEP).min(child_bottom - 1.0).max(0.0);
            set_list_target(mgr, id, new_target);
        }
        (GuiItemKind::Scroll { list_item: Some(list) }, GuiEvent::MouseButtonDown { button: 1, .. }) => {
            let list = *list;
            if !mgr.is_mouse_on(id, pos) {
                return;
            }
            let list_bottom = mgr.get_child_bottom(list);
            if list_bottom <= 1.0 {
                return;
            }
            let c = mgr.get_reference_center(id);
            let s = mgr.get_reference_size(id);
            let bar_h = (1.0 / list_bottom) * s.y;
            let y1 = (c.y - s.y / 2.0) + bar_h / 2.0;
            let y2 = (c.y + s.y / 2.0) - bar_h / 2.0;
            let click = ((pos.y - y1) / (y2 - y1)).clamp(0.0, 1.0);
            set_list_target(mgr, list, click * (list_bottom - 1.0));
        }
        _ => {}
    }
}

fn set_list_target(mgr: &mut GuiManager, list: GuiItemId, value: f32) {
    if let Some(GuiItemKind::List { target_offset }) = mgr.item_mut(list).map(|i| &mut i.kind) {
        *target_offset = value;
    }
}

pub(super) fn mouse_over(mgr: &mut GuiManager, id: GuiItemId, cursor: Vec2) {
    let center_x = mgr.get_reference_center(id).x;
    if let Some(GuiItemKind::Picker(data)) = mgr.item_mut(id).map(|i| &mut i.kind) {
        data.arrow_highlight = Some(if cursor.x >= center_x {
            PickerArrow::Next
        } else {
            PickerArrow::Previous
        });
    }
}

/// Gives the selected item a chance to use a menu direction itself.
/// Returns true if it did, in which case navigation is skipped.
pub(super) fn menu_dir_button(mgr: &mut GuiManager, id: GuiItemId, dir: PlayerActionType) -> bool {
    let Some(GuiItemKind::Picker(_)) = mgr.item(id).map(|i| &i.kind) else {
        return false;
    };
    let out = match dir {
        PlayerActionType::MenuRight => GuiOutput::PickerNext(id),
        PlayerActionType::MenuLeft => GuiOutput::PickerPrevious(id),
        _ => return false,
    };
    mgr.push_output(out);
    true
}

/// Scrolls a list so a newly selected child is centered.
pub(super) fn child_selected(mgr: &mut GuiManager, parent: GuiItemId, child: GuiItemId) {
    let Some(parent_item) = mgr.item(parent) else {
        return;
    };
    if !matches!(parent_item.kind, GuiItemKind::List { .. }) {
        return;
    }
    let child_bottom = mgr.get_child_bottom(parent);
    if child_bottom <= 1.0 && parent_item.offset == 0.0 {
        return;
    }
    let Some(child_y) = mgr.item(child).map(|c| c.center.y) else {
        return;
    };
    set_list_target(mgr, parent, (child_y - 0.5).min(child_bottom - 1.0).max(0.0));
}
