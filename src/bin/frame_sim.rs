//! Frame Simulator
//!
//! Run with: `cargo run --bin frame-sim`
//! Headless: `cargo run --bin frame-sim -- --headless 600`
//! Custom tuning: `cargo run --bin frame-sim -- --config engine.json`
//!
//! Drives the engine core through a small scene: a raised platform casting
//! wall shadows, a smoke generator, a leader with a group, and a pause menu.
//! Nothing is sent to a GPU. Each frame is tessellated into vertex batches
//! and the totals are logged once per second (`RUST_LOG=debug` for more).
//!
//! Controls:
//! - Left Ctrl: Dismiss the group
//! - Right mouse: Whistle the group back
//! - Arrows/Enter: Navigate the menu
//! - ESC: Quit, through the menu's back item

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use onion_grove_engine::area::{
    draw_sector_edge_offsets, update_offset_effect_buffer, update_offset_effect_caches, Area,
    Edge, EdgeOffsetCache, Sector, WallShadow,
};
use onion_grove_engine::camera::Viewport;
use onion_grove_engine::config::EngineConfig;
use onion_grove_engine::gameplay::{GroupMember, Leader};
use onion_grove_engine::gui::{GuiAnimation, GuiItem, GuiItemId, GuiManager, GuiOutput};
use onion_grove_engine::input::handler::key_input;
use onion_grove_engine::input::{ControlsMediator, InputHandler, PlayerActionType};
use onion_grove_engine::math::{Color, Ease};
use onion_grove_engine::particles::{
    EmissionShape, Particle, ParticleGenerator, ParticleManager, ParticlePriority,
};
use onion_grove_engine::render::{BufferId, MeshRenderer, Renderer};

const FIXED_DT: f32 = 1.0 / 60.0;
const SHADOW_BUFFER: BufferId = BufferId(1);

// ============================================================================
// SCENE
// ============================================================================

struct Menu {
    gui: GuiManager,
    resume: GuiItemId,
    rumble: GuiItemId,
    quit: GuiItemId,
}

impl Menu {
    fn new(config: &EngineConfig) -> Self {
        let mut gui = GuiManager::new(&config.gui);
        gui.register_coords("resume", 50.0, 35.0, 30.0, 8.0);
        gui.register_coords("rumble", 50.0, 50.0, 30.0, 8.0);
        gui.register_coords("quit", 50.0, 65.0, 30.0, 8.0);

        let resume = gui.add_item(GuiItem::button("Resume", Color::WHITE), "resume");
        let rumble = gui.add_item(GuiItem::check(true, "Rumble", Color::WHITE), "rumble");
        let quit = gui.add_item(GuiItem::button("Quit", Color::WHITE), "quit");
        gui.back_item = Some(quit);
        gui.start_animation(GuiAnimation::UpToCenter, 0.4);

        Self { gui, resume, rumble, quit }
    }
}

struct Scene {
    config: EngineConfig,
    rng: StdRng,
    controls: ControlsMediator,
    menu: Menu,
    area: Area,
    shadow_caches: Vec<EdgeOffsetCache>,
    particles: ParticleManager,
    smoke: ParticleGenerator,
    leader: Leader,
    /// Members out of the group, waiting for a whistle.
    idle: Vec<GroupMember>,
    view: Viewport,
    renderer: MeshRenderer,
    time: f32,
    frames: u64,
    quit_requested: bool,
}

impl Scene {
    fn new(config: EngineConfig) -> Self {
        let mut controls = ControlsMediator::new(config.controls.clone());
        controls.load_default_binds(1);

        let (area, platform) = build_area();
        let mut shadow_caches = EdgeOffsetCache::for_area(&area);
        let all: Vec<usize> = (0..area.vertexes.len()).collect();
        update_offset_effect_caches(&area, &mut shadow_caches, &all, &WallShadow::new(&config.geometry));
        log::info!(
            "Area ready: {} edges, platform sector {platform}",
            area.edges.len()
        );

        let view = Viewport::full_window(config.gui.window_size).with_camera(Vec2::new(200.0, 150.0), 1.5);
        let mut particles = ParticleManager::new(config.particles.max_count);
        particles.set_viewports(vec![view]);

        let mut leader = Leader::new(Vec2::new(100.0, 260.0));
        leader.height = 32.0;
        for i in 0..14u32 {
            let offset = Vec2::new((i % 5) as f32 * 9.0, (i / 5) as f32 * 9.0);
            leader.group.push(GroupMember::new(Vec2::new(130.0, 250.0) + offset, i % 3));
        }

        Self {
            menu: Menu::new(&config),
            config,
            rng: StdRng::seed_from_u64(0x0a11),
            controls,
            area,
            shadow_caches,
            particles,
            smoke: smoke_generator(),
            leader,
            idle: Vec::new(),
            view,
            renderer: MeshRenderer::new(),
            time: 0.0,
            frames: 0,
            quit_requested: false,
        }
    }

    fn frame(&mut self, dt: f32) {
        self.time += dt;
        self.frames += 1;

        for action in self.controls.new_frame(dt) {
            if self.menu.gui.handle_player_action(&action) {
                continue;
            }
            let pressed = action.value >= 0.5;
            match PlayerActionType::from_id(action.action_type_id) {
                Some(PlayerActionType::Dismiss) if pressed => self.dismiss(),
                Some(PlayerActionType::Whistle) if pressed => self.whistle(),
                _ => {}
            }
        }

        self.menu.gui.tick(dt);
        for out in self.menu.gui.drain_events() {
            match out {
                GuiOutput::Activated(id) if id == self.menu.quit => self.quit_requested = true,
                GuiOutput::Activated(id) if id == self.menu.resume => {
                    self.menu.gui.start_animation(GuiAnimation::CenterToUp, 0.4);
                }
                GuiOutput::CheckToggled { item, value } if item == self.menu.rumble => {
                    log::info!("Rumble {}", if value { "on" } else { "off" });
                }
                other => log::debug!("GUI: {other:?}"),
            }
        }

        self.smoke.tick(dt, &mut self.particles, &mut self.rng);
        self.particles.tick_all(dt, &mut self.rng);

        self.draw();
    }

    fn dismiss(&mut self) {
        let members = self.leader.group.clone();
        let plan = self.leader.dismiss(None, &self.config.dismiss, &mut self.particles, &mut self.rng);
        let Some(plan) = plan else {
            log::info!("Nobody to dismiss");
            return;
        };
        for (member, dest) in members.into_iter().zip(plan.destinations) {
            if let Some(pos) = dest {
                self.idle.push(GroupMember { pos, ..member });
            }
        }
        log::info!(
            "Dismissed {} members in {} subgroups",
            self.idle.len(),
            plan.subgroups.len()
        );
    }

    fn whistle(&mut self) {
        if self.idle.is_empty() {
            return;
        }
        log::info!("Whistled {} members back", self.idle.len());
        self.leader.group.append(&mut self.idle);
    }

    fn draw(&mut self) {
        self.renderer.reset_frame();
        self.renderer.clear(Color::BLACK);

        let (cam_tl, cam_br) = self.view.world_box();
        update_offset_effect_buffer(
            &self.area,
            cam_tl,
            cam_br,
            &self.shadow_caches,
            SHADOW_BUFFER,
            true,
            &self.view,
            &mut self.renderer,
        );
        for s in 0..self.area.sectors.len() {
            draw_sector_edge_offsets(&self.area, s, SHADOW_BUFFER, 1.0, &self.view, &mut self.renderer);
        }

        for i in 0..self.particles.count() {
            self.particles.draw(i, &mut self.renderer);
        }
        if self.menu.gui.visible() {
            self.menu.gui.draw(&mut self.renderer);
        }

        if self.frames % 60 == 0 {
            log::info!(
                "t={:.1}s particles={} batches={} triangles={} group={} idle={}",
                self.time,
                self.particles.count(),
                self.renderer.batches().len(),
                self.renderer.total_triangles(),
                self.leader.group.len(),
                self.idle.len(),
            );
        }
    }
}

/// Floor with a raised square platform in the middle.
fn build_area() -> (Area, usize) {
    let mut area = Area::new();
    let platform = area.add_sector(Sector::new(120.0));
    let floor = area.add_sector(Sector::new(0.0));

    let corners = [
        Vec2::new(150.0, 80.0),
        Vec2::new(300.0, 80.0),
        Vec2::new(300.0, 200.0),
        Vec2::new(150.0, 200.0),
    ];
    let v: Vec<usize> = corners.iter().map(|&p| area.add_vertex(p)).collect();
    for i in 0..v.len() {
        area.add_edge(Edge::new(v[i], v[(i + 1) % v.len()]), [Some(floor), Some(platform)]);
    }

    area.calculate_bboxes();
    area.triangulate_convex_sector(platform);
    (area, platform)
}

fn smoke_generator() -> ParticleGenerator {
    let mut base = Particle::new(
        Vec2::new(225.0, 140.0),
        130.0,
        12.0,
        2.0,
        ParticlePriority::Low,
        Color::new(0.6, 0.6, 0.6, 0.5),
    );
    base.size.add(1.0, 28.0, Ease::Out);
    base.color.add(1.0, Color::new(0.6, 0.6, 0.6, 0.0), Ease::None);
    base.outwards_speed.set_keyframe_value(0, 12.0);

    let mut smoke = ParticleGenerator::new(0.25, base, 2);
    smoke.name = "platform_smoke".to_string();
    smoke.emission.shape = EmissionShape::Circle;
    smoke.emission.circle_outer_dist = 20.0;
    smoke.emission.number_deviation = 1;
    smoke.size_deviation = 4.0;
    smoke.duration_deviation = 0.5;
    smoke
}

// ============================================================================
// HEADLESS RUN
// ============================================================================

/// Scripted presses: (frame, key, pressed).
const SCRIPT: &[(u64, KeyCode, bool)] = &[
    (30, KeyCode::ArrowDown, true),
    (32, KeyCode::ArrowDown, false),
    (40, KeyCode::ArrowDown, true),
    (42, KeyCode::ArrowDown, false),
    (50, KeyCode::Enter, true),
    (52, KeyCode::Enter, false),
    (90, KeyCode::ControlLeft, true),
    (92, KeyCode::ControlLeft, false),
];

fn run_headless(mut scene: Scene, frames: u64) {
    log::info!("Running {frames} headless frames");
    for f in 0..frames {
        for &(_, key, pressed) in SCRIPT.iter().filter(|(at, ..)| *at == f) {
            let state = if pressed { ElementState::Pressed } else { ElementState::Released };
            if let Some(input) = key_input(key, state) {
                scene.controls.handle_input(input);
            }
        }
        scene.frame(FIXED_DT);
        if scene.quit_requested {
            break;
        }
    }
    log::info!(
        "Done after {} frames: {} particles alive, {} members idle",
        scene.frames,
        scene.particles.count(),
        scene.idle.len()
    );
}

// ============================================================================
// WINDOWED RUN
// ============================================================================

struct App {
    scene: Scene,
    handler: InputHandler,
    window: Option<Arc<Window>>,
    last_frame: Instant,
    accumulator: f32,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let size = self.scene.config.gui.window_size;
        let attrs = WindowAttributes::default()
            .with_title("Onion Grove - frame simulator")
            .with_inner_size(PhysicalSize::new(size.x as u32, size.y as u32));
        match event_loop.create_window(attrs) {
            Ok(window) => {
                self.window = Some(Arc::new(window));
                self.last_frame = Instant::now();
            }
            Err(e) => {
                log::error!("Could not create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                return;
            }
            WindowEvent::Resized(size) => {
                let size = Vec2::new(size.width as f32, size.height as f32);
                self.scene.menu.gui.set_window_size(size);
                self.scene.view = Viewport::full_window(size).with_camera(self.scene.view.cam_pos, self.scene.view.cam_zoom);
                self.scene.particles.set_viewports(vec![self.scene.view]);
            }
            _ => {}
        }

        let translated = self.handler.handle_window_event(&event);
        if translated.focus_lost {
            self.scene.controls.release_all();
        }
        for input in translated.inputs {
            self.scene.controls.handle_input(input);
        }
        if let Some(gui_event) = translated.gui_event {
            self.scene.menu.gui.handle_event(&gui_event);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        self.accumulator += now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        while self.accumulator >= FIXED_DT {
            self.scene.frame(FIXED_DT);
            self.accumulator -= FIXED_DT;
        }
        if self.scene.quit_requested {
            event_loop.exit();
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

struct Args {
    headless: Option<u64>,
    config: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args { headless: None, config: None };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--headless" => {
                args.headless = Some(it.next().and_then(|n| n.parse().ok()).unwrap_or(600));
            }
            "--config" => args.config = it.next().map(PathBuf::from),
            other => log::warn!("Ignoring unknown argument '{other}'"),
        }
    }
    args
}

fn main() {
    onion_grove_engine::logging::init();
    let args = parse_args();

    let config = match &args.config {
        Some(path) => EngineConfig::load_or_default(path),
        None => EngineConfig::default(),
    };
    let scene = Scene::new(config);

    if let Some(frames) = args.headless {
        run_headless(scene, frames);
        return;
    }

    let event_loop = match EventLoop::new() {
        Ok(l) => l,
        Err(e) => {
            log::error!("No event loop ({e}), falling back to a headless run");
            run_headless(scene, 600);
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        scene,
        handler: InputHandler::new(),
        window: None,
        last_frame: Instant::now(),
        accumulator: 0.0,
    };
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {e}");
    }
}
