//! Last Archer entry point
//!
//! The wasm32 build drives a `Session` from `requestAnimationFrame` and draws
//! through WebGPU; the native build runs a headless autopilot session and logs
//! what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use last_archer::renderer::{RenderError, RenderState, scene};
    use last_archer::sim::{GameEvent, RenderFrame};
    use last_archer::{Activation, FrameOutcome, GameConfig, RawInput, Renderer, Session};

    /// Draws through wgpu and keeps the DOM HUD/overlay in sync
    struct WebRenderer {
        gpu: Option<RenderState>,
        document: Document,
    }

    impl WebRenderer {
        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
            }
        }

        fn update_hud(&self, frame: &RenderFrame) {
            if let Some(el) = self
                .document
                .query_selector("#hud-score .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&frame.score.to_string()));
            }
            if let Some(el) = self
                .document
                .query_selector("#hud-time .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&format!("{}s", frame.hud_seconds())));
            }
        }
    }

    impl Renderer for WebRenderer {
        fn draw(&mut self, frame: &RenderFrame) {
            self.update_hud(frame);

            let Some(gpu) = self.gpu.as_mut() else {
                return;
            };
            match gpu.render(&scene::build(frame)) {
                Ok(()) => {}
                Err(RenderError::Surface(
                    wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                )) => {
                    let (w, h) = gpu.size;
                    let playfield = gpu.playfield;
                    gpu.resize(w, h, playfield);
                }
                Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {e}"),
            }
        }

        fn show_overlay(&mut self, message: &str) {
            if let Some(el) = self.document.get_element_by_id("game-over-message") {
                el.set_text_content(Some(message));
            }
            self.set_hidden("game-over", false);
        }

        fn hide_overlay(&mut self) {
            self.set_hidden("game-over", true);
        }
    }

    /// Game instance shared between the frame loop and input listeners
    struct Game {
        session: Session,
        renderer: WebRenderer,
        canvas: HtmlCanvasElement,
        /// An animation frame is scheduled
        looping: bool,
    }

    impl Game {
        /// Feed one device event. Returns true when the frame loop must be
        /// (re)started.
        fn handle(&mut self, event: RawInput) -> bool {
            if let Some(Activation::Reset | Activation::Started) = self.session.handle(&event) {
                // Floor spawns from the reset
                self.log_events();
            }
            if self.session.is_running() && !self.looping {
                self.looping = true;
                return true;
            }
            false
        }

        fn log_events(&mut self) {
            for event in self.session.drain_events() {
                match event {
                    GameEvent::Killed { enemy, .. } => log::debug!("Enemy {enemy} down"),
                    GameEvent::Spawned { enemy, kind } => log::trace!("{kind:?} enemy {enemy} in"),
                    GameEvent::Escaped { enemy } => log::debug!("Enemy {enemy} got away"),
                    _ => {}
                }
            }
        }

        /// Match the backing store to the CSS size and tell everyone
        fn resize(&mut self) {
            let (css_w, css_h, w, h) = canvas_size(&self.canvas);
            self.canvas.set_width(w);
            self.canvas.set_height(h);
            self.session.resize(css_w, css_h);
            if let Some(gpu) = self.renderer.gpu.as_mut() {
                gpu.resize(w, h, (css_w, css_h));
            }
        }
    }

    /// CSS size and device-pixel size of the canvas
    fn canvas_size(canvas: &HtmlCanvasElement) -> (f32, f32, u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let css_w = canvas.client_width().max(1);
        let css_h = canvas.client_height().max(1);
        (
            css_w as f32,
            css_h as f32,
            (css_w as f64 * dpr) as u32,
            (css_h as f64 * dpr) as u32,
        )
    }

    /// Tuning from `<script id="game-config" type="application/json">`, if any
    fn load_config(document: &Document) -> GameConfig {
        let Some(json) = document
            .get_element_by_id("game-config")
            .and_then(|el| el.text_content())
        else {
            return GameConfig::default();
        };
        match GameConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring game config: {e}");
                GameConfig::default()
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Last Archer starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
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

        let (css_w, css_h, width, height) = canvas_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let config = load_config(&document).with_playfield(css_w, css_h);
        let session = match Session::new(config, seed) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Cannot start: {e}");
                return;
            }
        };
        log::info!("Session created with seed: {seed}");

        let gpu = match init_gpu(&canvas, width, height, (css_w, css_h)).await {
            Ok(gpu) => Some(gpu),
            Err(e) => {
                log::error!("WebGPU unavailable: {e}");
                None
            }
        };

        let game = Rc::new(RefCell::new(Game {
            session,
            renderer: WebRenderer {
                gpu,
                document: document.clone(),
            },
            canvas: canvas.clone(),
            looping: false,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_resize(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        {
            let mut g = game.borrow_mut();
            g.session.start();
            g.log_events();
            g.looping = true;
        }
        request_animation_frame(game);

        log::info!("Last Archer running!");
    }

    async fn init_gpu(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        playfield: (f32, f32),
    ) -> Result<RenderState, String> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| e.to_string())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| e.to_string())?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height, playfield)
            .await
            .map_err(|e| e.to_string())
    }

    /// Forward one event and kick the frame loop if it had stopped
    fn dispatch(game: &Rc<RefCell<Game>>, event: RawInput) {
        let restart = game.borrow_mut().handle(event);
        if restart {
            request_animation_frame(game.clone());
        }
    }

    /// First touch point relative to the canvas
    fn touch_point(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<(f32, f32)> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some((
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        ))
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                dispatch(
                    &game,
                    RawInput::PointerMove {
                        x: event.offset_x() as f32,
                        y: event.offset_y() as f32,
                    },
                );
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down (aim + fire / restart)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                dispatch(
                    &game,
                    RawInput::PointerDown {
                        x: event.offset_x() as f32,
                        y: event.offset_y() as f32,
                    },
                );
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                dispatch(&game, RawInput::TouchMove(touch_point(&canvas_clone, &event)));
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                dispatch(
                    &game,
                    RawInput::TouchStart(touch_point(&canvas_clone, &event)),
                );
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if code == "Space" {
                    event.prevent_default();
                }
                dispatch(&game, RawInput::KeyDown(code));
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
        let outcome = {
            let mut guard = game.borrow_mut();
            let g = &mut *guard;
            let outcome = g.session.frame(time, &mut g.renderer);
            g.log_events();
            if outcome != FrameOutcome::Continue {
                g.looping = false;
            }
            outcome
        };

        if outcome == FrameOutcome::Continue {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Last Archer (native) starting...");
    log::info!("Native mode runs a headless demo - use `trunk serve` for the playable web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1);

    match demo::run(seed) {
        Ok(score) => println!("\nDemo finished with score {score}"),
        Err(e) => {
            log::error!("Demo failed: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Autopilot: aim at the closest enemy and loose an arrow every few frames
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use last_archer::sim::GameEvent;
    use last_archer::{ConfigError, GameConfig, Session, angle_between};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const FRAMES_PER_SHOT: u32 = 20;
    /// Stop after this much simulated time even if the run is still going
    const MAX_SECONDS: f32 = 180.0;

    pub fn run(seed: u64) -> Result<u32, ConfigError> {
        let mut session = Session::new(GameConfig::default(), seed)?;
        session.start();
        log::info!("Demo seed {seed}");

        let mut frame = 0u32;
        while session.is_running() {
            if frame as f32 * FRAME_DT >= MAX_SECONDS {
                log::info!("Demo stopped after {MAX_SECONDS}s of play");
                break;
            }

            let state = session.state();
            let muzzle = state.archer.muzzle();
            let target = state
                .enemies
                .iter_live()
                .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
                .map(|e| e.pos);
            if let Some(target) = target {
                session.aim(angle_between(muzzle, target));
                if frame % FRAMES_PER_SHOT == 0 {
                    session.activate();
                }
            }

            session.advance(FRAME_DT);
            for event in session.drain_events() {
                match event {
                    GameEvent::Killed { enemy, pos } => {
                        log::debug!("Enemy {enemy} down at ({:.0}, {:.0})", pos.x, pos.y)
                    }
                    GameEvent::TimeBonus { time_remaining, .. } => {
                        log::info!("Time bonus, {time_remaining:.1}s left")
                    }
                    _ => {}
                }
            }
            frame += 1;
        }

        Ok(session.state().score)
    }
}
