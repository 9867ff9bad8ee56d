//! Controls Tests - From Window Events to Player Actions
//!
//! Runs hardware inputs through the handler and the mediator, and checks
//! that the resulting actions drive the systems that consume them.

use glam::Vec2;
use onion_grove_engine::data::DataNode;
use onion_grove_engine::gameplay::{DismissConfig, GroupMember, Leader, DISMISS_PARTICLE_AMOUNT};
use onion_grove_engine::input::handler::{key_input, mouse_button_input, wheel_inputs};
use onion_grove_engine::input::{
    Action, ActionFlags, ControlsMediator, Input, InputHandler, InputSource, PlayerActionType,
};
use onion_grove_engine::particles::ParticleManager;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::KeyCode;

const DT: f32 = 1.0 / 60.0;

fn controls() -> ControlsMediator {
    let mut m = ControlsMediator::default();
    m.load_default_binds(1);
    m
}

fn press(m: &mut ControlsMediator, code: KeyCode, state: ElementState) {
    let input = key_input(code, state).expect("bindable key");
    assert!(m.handle_input(input));
}

fn of_type(actions: &[Action], action: PlayerActionType) -> Vec<Action> {
    actions
        .iter()
        .filter(|a| a.action_type_id == action.id())
        .copied()
        .collect()
}

// ============================================================================
// Binds
// ============================================================================

#[test]
fn test_bind_string_survives_json() {
    let mut m = ControlsMediator::default();
    let mut node = DataNode::new("controls", "");
    node.add_new("throw", "k_65;mb_1");
    m.load_binds_from_data_node(&node, 1);

    let mut saved = DataNode::new("controls", "");
    m.save_binds_to_data_node(&mut saved, 1);
    let json = saved.to_json_string().unwrap();
    let reloaded = DataNode::from_json_str(&json).unwrap();
    assert_eq!(
        reloaded.child_by_name("throw").map(|n| n.value.as_str()),
        Some("k_65;mb_1")
    );
}

#[test]
fn test_unrecognized_bind_never_fires() {
    let mut m = ControlsMediator::default();
    let mut node = DataNode::new("controls", "");
    node.add_new("dismiss", "nonsense");
    m.load_binds_from_data_node(&node, 1);
    assert!(m.binds().is_empty());

    press(&mut m, KeyCode::ControlLeft, ElementState::Pressed);
    assert!(m.new_frame(DT).is_empty());
}

// ============================================================================
// Actions
// ============================================================================

#[test]
fn test_press_and_release_emit_once_each() {
    let mut m = controls();
    press(&mut m, KeyCode::ControlLeft, ElementState::Pressed);
    let down = of_type(&m.new_frame(DT), PlayerActionType::Dismiss);
    assert_eq!(down.len(), 1);
    assert_eq!(down[0].value, 1.0);

    // Held without change: nothing new, dismiss doesn't repeat.
    assert!(of_type(&m.new_frame(1.0), PlayerActionType::Dismiss).is_empty());

    press(&mut m, KeyCode::ControlLeft, ElementState::Released);
    let up = of_type(&m.new_frame(DT), PlayerActionType::Dismiss);
    assert_eq!(up.len(), 1);
    assert_eq!(up[0].value, 0.0);
}

#[test]
fn test_held_menu_direction_repeats() {
    let mut m = controls();
    press(&mut m, KeyCode::ArrowDown, ElementState::Pressed);
    let first = of_type(&m.new_frame(DT), PlayerActionType::MenuDown);
    assert_eq!(first.len(), 1);
    assert!(!first[0].flags.contains(ActionFlags::REPEAT));

    let repeats = of_type(&m.new_frame(0.35), PlayerActionType::MenuDown);
    assert!(!repeats.is_empty());
    assert!(repeats.iter().all(|a| a.flags.contains(ActionFlags::REPEAT)));
}

#[test]
fn test_mouse_button_throws() {
    let mut m = controls();
    let input = mouse_button_input(MouseButton::Left, ElementState::Pressed).unwrap();
    m.handle_input(input);
    let throws = of_type(&m.new_frame(DT), PlayerActionType::Throw);
    assert_eq!(throws.len(), 1);
}

#[test]
fn test_touchpad_swipe_cycles_types() {
    let mut m = controls();
    let mut fired = 0;
    // A 120 px swipe in small steps.
    for _ in 0..12 {
        for input in wheel_inputs(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -10.0))) {
            m.handle_input(input);
        }
        fired += of_type(&m.new_frame(DT), PlayerActionType::NextType).len();
    }
    assert_eq!(fired, 3);
}

#[test]
fn test_focus_loss_releases_held_keys() {
    let mut m = controls();
    let mut handler = InputHandler::new();
    press(&mut m, KeyCode::ControlLeft, ElementState::Pressed);
    m.new_frame(DT);

    let translated = handler.handle_window_event(&WindowEvent::Focused(false));
    assert!(translated.focus_lost);
    assert!(translated.inputs.is_empty());
    m.release_all();

    let up = of_type(&m.new_frame(DT), PlayerActionType::Dismiss);
    assert_eq!(up.len(), 1);
    assert_eq!(up[0].value, 0.0);
}

#[test]
fn test_ignored_source_stays_quiet_until_released() {
    let mut m = controls();
    let source = InputSource::key(217);
    assert!(m.start_ignoring_input_source(source, false));
    m.handle_input(Input::new(source, 1.0));
    assert!(of_type(&m.new_frame(DT), PlayerActionType::Dismiss).is_empty());
}

// ============================================================================
// Consumers
// ============================================================================

#[test]
fn test_dismiss_key_dismisses_group() {
    let mut m = controls();
    let mut rng = StdRng::seed_from_u64(11);
    let mut particles = ParticleManager::new(100);
    let mut leader = Leader::new(Vec2::new(300.0, 200.0));
    for i in 0..5 {
        leader.group.push(GroupMember::new(Vec2::new(320.0 + i as f32 * 4.0, 200.0), i % 2));
    }

    press(&mut m, KeyCode::ControlLeft, ElementState::Pressed);
    let mut plan = None;
    for action in m.new_frame(DT) {
        if action.action_type_id == PlayerActionType::Dismiss.id() && action.value >= 0.5 {
            plan = leader.dismiss(None, &DismissConfig::default(), &mut particles, &mut rng);
        }
    }

    let plan = plan.expect("dismissed");
    assert_eq!(plan.subgroups.len(), 2);
    assert_eq!(plan.destinations.iter().flatten().count(), 5);
    assert!(leader.group.is_empty());
    assert_eq!(particles.count(), DISMISS_PARTICLE_AMOUNT);
}
