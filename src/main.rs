//! Tilt Catch entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use tilt_catch::audio::{LossFeedback, Silent};
    use tilt_catch::platform::web::{OrientationSource, WebRecorder};
    use tilt_catch::renderer::SdfRenderState;
    use tilt_catch::sim::Bounds;
    use tilt_catch::{GameSession, SessionPhase, Settings};

    /// Game instance holding all state
    struct Game {
        settings: Settings,
        bounds: Bounds,
        session: GameSession,
        render_state: Option<SdfRenderState>,
        last_phase: SessionPhase,
    }

    impl Game {
        fn new(settings: Settings, bounds: Bounds) -> Self {
            let session = start_session(&settings, bounds);
            Self {
                settings,
                bounds,
                session,
                render_state: None,
                last_phase: SessionPhase::Running,
            }
        }

        /// Throw the old session away and start over
        fn restart(&mut self) {
            self.session.stop();
            self.session = start_session(&self.settings, self.bounds);
            self.last_phase = SessionPhase::Running;
        }

        fn update(&mut self, time: f64) {
            self.session.on_frame(time);

            let phase = self.session.phase();
            if phase != self.last_phase {
                self.last_phase = phase;
                update_game_over(phase);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let snapshot = self.session.snapshot();
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&snapshot, &self.settings.tuning) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    fn start_session(settings: &Settings, bounds: Bounds) -> GameSession {
        let feedback: Box<dyn LossFeedback> = if settings.variant.records_on_loss() {
            Box::new(WebRecorder::new(settings.recording_window_ms))
        } else {
            Box::new(Silent)
        };
        GameSession::start(settings.clone(), bounds, &mut OrientationSource, feedback)
    }

    /// Show/hide the game over overlay
    fn update_game_over(phase: SessionPhase) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("game-over") {
            let class = match phase {
                SessionPhase::Stopped(_) => "",
                SessionPhase::Running => "hidden",
            };
            let _ = el.set_attribute("class", class);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tilt Catch starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Viewport is measured once; the session keeps these bounds
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let bounds = Bounds::new(client_w as f32, client_h as f32);
        let game = Rc::new(RefCell::new(Game::new(settings, bounds)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match SdfRenderState::new(surface, &adapter, width, height, dpr as f32).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {e}"),
        }

        setup_restart_button(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Tilt Catch running!");
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.restart();
                update_game_over(SessionPhase::Running);
                log::info!("Game restarted");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
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
    use tilt_catch::platform::{NoRecorder, ScriptedTilt};
    use tilt_catch::sim::Bounds;
    use tilt_catch::{GameSession, SessionPhase, Settings};

    env_logger::init();
    log::info!("Tilt Catch (native) starting...");
    log::info!("Native mode runs headless against a scripted tilt");

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60;

    let settings = Settings::load();
    let mut tilt = ScriptedTilt::new(100.0, 4000.0);
    let mut session = GameSession::start(
        settings,
        Bounds::new(400.0, 800.0),
        &mut tilt,
        Box::new(NoRecorder),
    );

    let mut hits = 0;
    for frame in 0..MAX_FRAMES {
        let now = f64::from(frame) * FRAME_MS;
        tilt.sample(now);
        let report = session.on_frame(now);
        hits += report
            .events
            .iter()
            .filter(|e| matches!(e, tilt_catch::sim::StepEvent::PaddleHit))
            .count();
        if report.stopped.is_some() {
            break;
        }
    }

    let outcome = match session.phase() {
        SessionPhase::Running => "still running".to_string(),
        SessionPhase::Stopped(reason) => format!("stopped ({reason:?})"),
    };
    println!(
        "{} after {} ticks, {} paddle hits, ball at {:?}",
        outcome,
        session.ticks(),
        hits,
        session.snapshot().ball.pos
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
