//! GUI Tests - Menus Driven by Controls and Mouse
//!
//! Builds a small menu and drives it the way a game frame would: actions
//! from the controls mediator, mouse events, ticks and draws.

use glam::Vec2;
use onion_grove_engine::data::DataNode;
use onion_grove_engine::gui::{
    GuiAnimation, GuiConfig, GuiEvent, GuiItem, GuiItemId, GuiManager, GuiOutput, GuiSound,
};
use onion_grove_engine::input::handler::key_input;
use onion_grove_engine::input::ControlsMediator;
use onion_grove_engine::math::Color;
use onion_grove_engine::render::{MeshRenderer, Renderer};
use winit::event::ElementState;
use winit::keyboard::KeyCode;

const DT: f32 = 1.0 / 60.0;

struct Menu {
    gui: GuiManager,
    controls: ControlsMediator,
    play: GuiItemId,
    options: GuiItemId,
    back: GuiItemId,
}

impl Menu {
    fn new() -> Self {
        let mut gui = GuiManager::new(&GuiConfig::default());
        let mut coords = DataNode::new("positions", "");
        coords.add_new("play", "50 40 40 10");
        coords.add_new("options", "50 60 40 10");
        coords.add_new("back", "10 90 10 5");
        gui.read_coords(&coords);

        let play = gui.add_item(GuiItem::button("Play", Color::WHITE), "play");
        let options = gui.add_item(GuiItem::check(false, "Rumble", Color::WHITE), "options");
        let back = gui.add_item(GuiItem::button("Back", Color::WHITE), "back");
        gui.back_item = Some(back);

        let mut controls = ControlsMediator::default();
        controls.load_default_binds(1);
        Self { gui, controls, play, options, back }
    }

    /// Runs one frame with a key changing state.
    fn key(&mut self, code: KeyCode, state: ElementState) -> Vec<GuiOutput> {
        if let Some(input) = key_input(code, state) {
            self.controls.handle_input(input);
        }
        for action in self.controls.new_frame(DT) {
            self.gui.handle_player_action(&action);
        }
        self.gui.tick(DT);
        self.gui.drain_events()
    }

    fn tap(&mut self, code: KeyCode) -> Vec<GuiOutput> {
        let mut out = self.key(code, ElementState::Pressed);
        out.extend(self.key(code, ElementState::Released));
        out
    }

    fn center_px(&self, id: GuiItemId) -> Vec2 {
        self.gui.get_reference_center(id)
    }
}

fn selected_count(gui: &GuiManager) -> usize {
    gui.items().filter(|(_, i)| i.is_selected()).count()
}

// ============================================================================
// Keyboard navigation
// ============================================================================

#[test]
fn test_keyboard_walks_the_menu() {
    let mut m = Menu::new();

    let out = m.tap(KeyCode::ArrowDown);
    assert!(out.contains(&GuiOutput::SelectionChanged(Some(m.play))));
    assert!(out.contains(&GuiOutput::Sound(GuiSound::Select)));

    m.tap(KeyCode::ArrowDown);
    assert_eq!(m.gui.selected_item(), Some(m.options));
    assert_eq!(selected_count(&m.gui), 1);

    let out = m.tap(KeyCode::Enter);
    assert!(out.contains(&GuiOutput::Activated(m.options)));
    assert!(out.contains(&GuiOutput::CheckToggled { item: m.options, value: true }));
    assert!(!m.gui.was_last_input_mouse());
}

#[test]
fn test_back_shortcut_activates_back_item() {
    let mut m = Menu::new();
    let out = m.tap(KeyCode::Escape);
    assert!(out.contains(&GuiOutput::Activated(m.back)));
    assert!(out.contains(&GuiOutput::Sound(GuiSound::Back)));
    // The back shortcut doesn't move the selection.
    assert_eq!(m.gui.selected_item(), None);
}

#[test]
fn test_unresponsive_menu_ignores_actions() {
    let mut m = Menu::new();
    m.gui.responsive = false;
    assert!(m.tap(KeyCode::ArrowDown).is_empty());
    assert_eq!(m.gui.selected_item(), None);
}

// ============================================================================
// Mouse
// ============================================================================

#[test]
fn test_mouse_hover_and_click() {
    let mut m = Menu::new();
    let pos = m.center_px(m.play);
    assert_eq!(pos, Vec2::new(640.0, 288.0));

    m.gui.handle_event(&GuiEvent::MouseMoved { pos });
    assert_eq!(m.gui.selected_item(), Some(m.play));
    m.gui.handle_event(&GuiEvent::MouseButtonDown { pos, button: 1 });
    m.gui.handle_event(&GuiEvent::MouseButtonUp { pos, button: 1 });
    let out = m.gui.drain_events();
    assert!(out.contains(&GuiOutput::Activated(m.play)));
    assert!(m.gui.was_last_input_mouse());

    // Moving off every item clears the selection.
    m.gui.handle_event(&GuiEvent::MouseMoved { pos: Vec2::new(5.0, 5.0) });
    assert_eq!(m.gui.selected_item(), None);
    assert_eq!(selected_count(&m.gui), 0);
}

#[test]
fn test_right_click_does_not_activate() {
    let mut m = Menu::new();
    let pos = m.center_px(m.play);
    m.gui.handle_event(&GuiEvent::MouseButtonDown { pos, button: 2 });
    let out = m.gui.drain_events();
    assert!(!out.iter().any(|o| matches!(o, GuiOutput::Activated(_))));
    assert_eq!(m.gui.selected_item(), Some(m.play));
}

// ============================================================================
// Transitions and drawing
// ============================================================================

#[test]
fn test_slide_out_then_in() {
    let mut m = Menu::new();
    m.gui.start_animation(GuiAnimation::CenterToLeft, 0.5);
    assert!(m.gui.is_animating());

    // Input is held off while sliding.
    assert!(m.tap(KeyCode::ArrowDown).is_empty());

    for _ in 0..40 {
        m.gui.tick(DT);
    }
    assert!(!m.gui.is_animating());
    assert!(!m.gui.visible());

    m.gui.start_animation(GuiAnimation::LeftToCenter, 0.5);
    for _ in 0..40 {
        m.gui.tick(DT);
    }
    assert!(m.gui.visible());
    m.tap(KeyCode::ArrowDown);
    assert_eq!(m.gui.selected_item(), Some(m.play));
}

#[test]
fn test_draw_leaves_renderer_state_alone() {
    let mut m = Menu::new();
    m.tap(KeyCode::ArrowDown);
    let mut r = MeshRenderer::new();
    m.gui.draw(&mut r);
    assert_eq!(r.clip_rect(), None);
    assert!(r.total_triangles() > 0 || r.batches().iter().any(|b| !b.texts.is_empty()));

    m.gui.hide_items();
    let mut hidden = MeshRenderer::new();
    m.gui.draw(&mut hidden);
    assert!(hidden.batches().is_empty());
}
