//! Reactor Core entry point
//!
//! The web build runs the frame loop and touch handlers; the native build runs
//! a headless session with a scripted hand on the knob and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use glam::Vec2;
    use reactor_core::consts::SIM_DT;
    use reactor_core::frame::FixedStep;
    use reactor_core::haptics::{HapticFeedback, ImpactStyle};
    use reactor_core::hud::HudText;
    use reactor_core::renderer::{RenderState, build_scene};
    use reactor_core::sim::{ReactorState, TickInput, tick};
    use reactor_core::{SceneLayout, SceneNodes, Settings};

    /// Game instance holding all state
    struct Game {
        state: ReactorState,
        layout: SceneLayout,
        nodes: SceneNodes,
        render_state: Option<RenderState>,
        haptics: HapticFeedback,
        settings: Settings,
        step: FixedStep,
        last_time: f64,
        input: TickInput,
        /// Device pixels per CSS pixel
        dpr: f32,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(settings: Settings, layout: SceneLayout, nodes: SceneNodes, seed: u64) -> Self {
            let state = ReactorState::new(seed, nodes.knob_center(&layout));
            let haptics = HapticFeedback::new(settings.feedback.vibrate(), settings.feedback.click());
            Self {
                state,
                layout,
                nodes,
                render_state: None,
                haptics,
                settings,
                step: FixedStep::default(),
                last_time: 0.0,
                input: TickInput::default(),
                dpr: 1.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Canvas-relative CSS pixel to scene point
        fn to_scene(&self, x: f32, y: f32) -> Option<Vec2> {
            let mapping = self.render_state.as_ref()?.mapping;
            Some(mapping.view_to_scene(x * self.dpr, y * self.dpr))
        }

        fn touch_began(&mut self, x: f32, y: f32) {
            // Audio can only start inside a user gesture
            self.haptics.prepare();
            if let Some(point) = self.to_scene(x, y) {
                self.state.touch_began(point);
            }
        }

        fn touch_moved(&mut self, x: f32, y: f32) {
            if let Some(point) = self.to_scene(x, y) {
                self.state.touch_moved(point);
                self.dispatch_events();
            }
        }

        /// Turn pending simulation events into haptics
        fn dispatch_events(&mut self) {
            for event in self.state.drain_events() {
                if let Some(style) = ImpactStyle::for_event(&event) {
                    self.haptics.impact(style);
                }
            }
        }

        fn request_pause(&mut self, reason: &str) {
            if !self.state.paused {
                self.input.pause = true;
                log::info!("Auto-paused ({})", reason);
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            for _ in 0..self.step.advance(dt) {
                tick(&mut self.state, &self.input);
                // One-shot
                self.input.pause = false;
            }
            self.dispatch_events();

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            self.nodes.apply(&mut self.layout, &self.state);
            let vertices = build_scene(&self.layout, &self.state);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = (render_state.config.width, render_state.config.height);
                        render_state.resize(w, h);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = HudText::from_state(&self.state);

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&hud.score));
            }
            if let Some(el) = document.get_element_by_id("hud-temp") {
                el.set_text_content(Some(&hud.temperature));
                let _ = el.set_attribute("class", hud.zone_class);
            }
            if let Some(el) = document.get_element_by_id("hud-streak") {
                el.set_text_content(Some(&hud.streak));
            }
            if let Some(el) = document.get_element_by_id("hud-mode") {
                let class = if hud.banner.is_empty() { "hidden" } else { "" };
                el.set_text_content(Some(&hud.banner));
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                }
            }
            if let Some(el) = document.get_element_by_id("pause-overlay") {
                let class = if self.state.paused { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Reactor Core starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let settings = Settings::from_query(&window.location().search().unwrap_or_default());

        // A layout without the nodes we drive never reaches the frame loop
        let layout = match SceneLayout::bundled() {
            Ok(layout) => layout,
            Err(e) => {
                log::error!("Scene setup failed: {}", e);
                return;
            }
        };
        let nodes = match SceneNodes::resolve(&layout) {
            Ok(nodes) => nodes,
            Err(e) => {
                log::error!("Scene setup failed: {}", e);
                return;
            }
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = settings.seed_or(js_sys::Date::now() as u64);
        let background = layout.background;
        let scene_size = layout.size;
        let game = Rc::new(RefCell::new(Game::new(settings, layout, nodes, seed)));
        game.borrow_mut().dpr = dpr as f32;

        log::info!("Reactor initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, scene_size, background).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Renderer setup failed: {}", e);
                return;
            }
        }

        setup_input_handlers(&canvas, game.clone());
        setup_pause_button(game.clone());
        setup_auto_pause(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Reactor Core running!");
    }

    /// Canvas-relative CSS position of an event
    fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f32, f32) {
        let rect = canvas.get_bounding_client_rect();
        (
            client_x as f32 - rect.left() as f32,
            client_y as f32 - rect.top() as f32,
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let (x, y) = canvas_point(&canvas_clone, touch.client_x(), touch.client_y());
                    game.borrow_mut().touch_began(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let (x, y) = canvas_point(&canvas_clone, touch.client_x(), touch.client_y());
                    game.borrow_mut().touch_moved(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel
        for (name, cancelled) in [("touchend", false), ("touchcancel", true)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if cancelled {
                    g.state.touch_cancelled();
                } else {
                    g.state.finger_lifted(event.touches().length());
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse drag (desktop)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let (x, y) = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().touch_began(x, y);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                // Primary button held
                if event.buttons() & 1 == 0 {
                    return;
                }
                let (x, y) = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().touch_moved(x, y);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().state.touch_ended();
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pause_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        for id in ["pause-btn", "pause-overlay"] {
            if let Some(el) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().input.pause = true;
                });
                let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().request_pause("tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().request_pause("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use reactor_core::haptics::{HapticFeedback, ImpactStyle};
    use reactor_core::polar_to_cartesian;
    use reactor_core::sim::{GameEvent, ReactorState, TickInput, tick};
    use reactor_core::{SceneError, SceneLayout, SceneNodes, Settings};

    /// Finger distance from the knob centre
    const GRIP_RADIUS: f32 = 200.0;
    /// Largest finger step per frame (radians)
    const MAX_TURN: f32 = 0.3;

    /// Play `settings.frames` frames with a simple proportional hand on the
    /// knob: turn counter-clockwise (rods in) when hot, clockwise when cold.
    pub fn run(settings: &Settings) -> Result<(), SceneError> {
        let mut layout = SceneLayout::bundled()?;
        let nodes = SceneNodes::resolve(&layout)?;

        let seed = settings.seed_or(0x5EED);
        let center = nodes.knob_center(&layout);
        let mut state = ReactorState::new(seed, center);
        let mut haptics = HapticFeedback::new(settings.feedback.vibrate(), settings.feedback.click());
        let mut hand = Pcg32::seed_from_u64(seed ^ 0xF1A9);
        let input = TickInput::default();

        log::info!("Headless run: seed {}, {} frames", seed, settings.frames);

        let mut finger = std::f32::consts::FRAC_PI_2;
        state.touch_began(center + polar_to_cartesian(GRIP_RADIUS, finger));
        let mut criticals = 0u32;

        for frame in 0..settings.frames {
            // Let go now and then, like a real hand
            if frame % 240 == 200 {
                state.touch_ended();
            } else if frame % 240 == 220 {
                state.touch_began(center + polar_to_cartesian(GRIP_RADIUS, finger));
            }

            let error = state.temperature - 0.5;
            let turn = (error * 4.0).clamp(-MAX_TURN, MAX_TURN) + hand.random_range(-0.02..0.02);
            finger += turn;
            state.touch_moved(center + polar_to_cartesian(GRIP_RADIUS, finger));

            tick(&mut state, &input);
            nodes.apply(&mut layout, &state);

            for event in state.drain_events() {
                if matches!(event, GameEvent::CriticalTemperature { .. }) {
                    criticals += 1;
                }
                if let Some(style) = ImpactStyle::for_event(&event) {
                    haptics.impact(style);
                }
            }
        }

        let snapshot = state.snapshot();
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => log::info!("Final state:\n{}", json),
            Err(e) => log::warn!("Could not serialize snapshot: {}", e),
        }
        log::info!(
            "Score {} | best streak {}s | critical entries {} | haptic impacts {}",
            snapshot.score,
            snapshot.best_streak_secs,
            criticals,
            haptics.impacts()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Reactor Core (native) starting...");

    let query = std::env::args().nth(1).unwrap_or_default();
    let settings = reactor_core::Settings::from_query(&query);

    if let Err(e) = headless::run(&settings) {
        log::error!("Scene setup failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
