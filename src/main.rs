//! Lane Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, TouchEvent};

    use lane_rush::consts::*;
    use lane_rush::render::Renderer;
    use lane_rush::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use lane_rush::{BestScore, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Renderer,
        settings: Settings,
        best: BestScore,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track phase for best-score commit and overlay toggles
        last_phase: GamePhase,
        // HUD notification currently on screen, if any
        notification_until: f64,
        // Pending rAF handle; None while the loop is stopped
        raf_id: Option<i32>,
        // Whether the last finished run set a new best score
        new_best: bool,
    }

    impl Game {
        fn new(seed: u64, ctx: CanvasRenderingContext2d) -> Self {
            let mut game = Self {
                state: GameState::new(seed),
                renderer: Renderer::new(ctx),
                settings: Settings::load(),
                best: BestScore::load(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Menu,
                notification_until: 0.0,
                raf_id: None,
                new_best: false,
            };
            game.apply_quality();
            game
        }

        /// Push quality-derived knobs into the live config; `start` keeps
        /// the config across restarts so this survives the session
        fn apply_quality(&mut self) {
            self.state.config.particle_scale = self.settings.quality.particle_scale();
            self.state.config.max_particles = self.settings.quality.max_particles();
            if self.settings.reduced_motion {
                self.state.config.particle_scale *= 0.5;
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.nitro = false;
                self.input.restart = false;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            // Commit the best score exactly once per run, on the way out;
            // ties are not a new best, so the banner keys off record()
            let current_phase = self.state.phase;
            if current_phase != self.last_phase {
                if current_phase == GamePhase::GameOver {
                    self.new_best = self.best.record(self.state.score);
                    if self.new_best {
                        log::info!("New best score: {}", self.best.0);
                    }
                }
                self.last_phase = current_phase;
            }

            // Surface sim events as HUD notifications
            for event in self.state.drain_events() {
                if let Some(text) = notification_text(event) {
                    self.show_notification(text, time);
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            self.renderer.render(&self.state, &self.settings);
        }

        fn show_notification(&mut self, text: &str, time: f64) {
            let document = match web_sys::window().and_then(|w| w.document()) {
                Some(d) => d,
                None => return,
            };
            if let Some(el) = document.get_element_by_id("notification") {
                el.set_text_content(Some(text));
                let _ = el.set_attribute("class", "");
            }
            self.notification_until = time + 2000.0;
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, time: f64) {
            let window = match web_sys::window() {
                Some(w) => w,
                None => return,
            };
            let document = match window.document() {
                Some(d) => d,
                None => return,
            };

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.best.0.max(self.state.score).to_string()));
            }
            if let Some(el) = document.query_selector("#hud-coins .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.coins_collected.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-streak .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.streak.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
                let hearts: String = (0..3)
                    .map(|i| if (i as u8) < self.state.lives { '\u{2764}' } else { '\u{1F5A4}' })
                    .collect();
                el.set_text_content(Some(&hearts));
            }
            if let Some(el) = document.query_selector("#hud-speed .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!(
                    "{} km/h ({:.1}x)",
                    self.state.speed_kmh(),
                    self.state.speed_multiplier()
                )));
            }
            if let Some(el) = document.query_selector("#hud-distance .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("{}m", self.state.distance as u64)));
            }
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                if self.settings.show_fps {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            // Combo badge only shows once a multiplier is running
            if let Some(el) = document.get_element_by_id("hud-combo") {
                if self.state.effects.combo_multiplier > 1 {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-combo .hud-value").ok().flatten() {
                        val.set_text_content(Some(&format!("x{}", self.state.effects.combo_multiplier)));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            // Nitro indicator
            if let Some(el) = document.get_element_by_id("hud-nitro") {
                use lane_rush::sim::NitroState;
                let label = match self.state.effects.nitro {
                    NitroState::Ready => "NITRO READY",
                    NitroState::Active { .. } => "NITRO!",
                    NitroState::Cooldown { .. } => "nitro cooling",
                };
                el.set_text_content(Some(label));
            }

            // Expire the notification banner
            if self.notification_until > 0.0 && time >= self.notification_until {
                if let Some(el) = document.get_element_by_id("notification") {
                    let _ = el.set_attribute("class", "hidden");
                }
                self.notification_until = 0.0;
            }

            // Menu overlay
            if let Some(el) = document.get_element_by_id("menu") {
                if self.state.phase == GamePhase::Menu {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Game-over overlay with final stats
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    if let Some(note) = document.get_element_by_id("notification") {
                        let _ = note.set_attribute("class", "hidden");
                    }
                    self.notification_until = 0.0;
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.score.to_string()));
                    }
                    if let Some(dist_el) = document.get_element_by_id("final-distance") {
                        dist_el.set_text_content(Some(&format!("{}m", self.state.distance as u64)));
                    }
                    if let Some(coins_el) = document.get_element_by_id("final-coins") {
                        coins_el.set_text_content(Some(&self.state.coins_collected.to_string()));
                    }
                    if let Some(streak_el) = document.get_element_by_id("final-streak") {
                        streak_el.set_text_content(Some(&self.state.best_streak.to_string()));
                    }
                    if let Some(best_el) = document.get_element_by_id("new-best") {
                        if self.new_best {
                            let _ = best_el.set_attribute("class", "");
                        } else {
                            let _ = best_el.set_attribute("class", "hidden");
                        }
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    fn notification_text(event: GameEvent) -> Option<&'static str> {
        match event {
            GameEvent::PowerupActivated(kind) => Some(kind.label()),
            GameEvent::PowerupExpired(kind) => Some(kind.expired_label()),
            GameEvent::ShieldAbsorbed => Some("Shield absorbed the hit!"),
            GameEvent::NitroActivated => Some("Nitro boost!"),
            GameEvent::NitroExpired => Some("Nitro spent"),
            GameEvent::NitroReady => Some("Nitro ready"),
            GameEvent::GameOver => None,
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lane Rush starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Fixed logical resolution; CSS scales the element to fit
        canvas.set_width(LOGICAL_WIDTH as u32);
        canvas.set_height(LOGICAL_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, ctx)));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());

        // One frame so the canvas isn't blank behind the menu overlay
        game.borrow_mut().render();

        log::info!("Lane Rush ready");
    }

    /// Start a fresh run with a wall-clock seed and (re)kick the loop
    fn start_run(game: &Rc<RefCell<Game>>) {
        let seed = js_sys::Date::now() as u64;
        {
            let mut g = game.borrow_mut();
            g.state.start(seed);
            g.accumulator = 0.0;
            g.last_time = 0.0;
            g.input = TickInput::default();
            g.new_best = false;
        }
        log::info!("Run started with seed: {}", seed);

        // Invalidate any pending frame first so the loop is never scheduled
        // twice
        cancel_pending_frame(game);
        schedule_frame(game.clone());
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Keyboard held/one-shot inputs
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = true,
                    "ArrowRight" | "d" | "D" => g.input.right = true,
                    "Shift" => g.input.nitro = true,
                    " " | "Enter" => match g.state.phase {
                        GamePhase::Menu | GamePhase::GameOver => {
                            drop(g);
                            start_run(&game);
                        }
                        GamePhase::Playing => {}
                    },
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = false,
                    "ArrowRight" | "d" | "D" => g.input.right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch steering: left half steers left, right half steers right
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f64 - rect.left();
                    let mut g = game.borrow_mut();
                    if g.state.phase != GamePhase::Playing {
                        drop(g);
                        start_run(&game);
                        return;
                    }
                    let left_half = x < rect.width() / 2.0;
                    g.input.left = left_half;
                    g.input.right = !left_half;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.input.left = false;
                g.input.right = false;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                start_run(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                start_run(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Quality cycles Low → Medium → High and applies immediately
        if let Some(btn) = document.get_element_by_id("quality-btn") {
            btn.set_text_content(Some(&format!(
                "Quality: {}",
                game.borrow().settings.quality.as_str()
            )));
            let game = game.clone();
            let label = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.settings.quality = g.settings.quality.cycle();
                g.settings.save();
                g.apply_quality();
                label.set_text_content(Some(&format!("Quality: {}", g.settings.quality.as_str())));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("shake-btn") {
            let shake_label = |on: bool| if on { "Shake: On" } else { "Shake: Off" };
            btn.set_text_content(Some(shake_label(game.borrow().settings.screen_shake)));
            let label = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.settings.screen_shake = !g.settings.screen_shake;
                g.settings.save();
                label.set_text_content(Some(shake_label(g.settings.screen_shake)));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn schedule_frame(game: Rc<RefCell<Game>>) {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return,
        };
        let handle = game.clone();
        let closure = Closure::once(move |time: f64| {
            handle.borrow_mut().raf_id = None;
            game_loop(handle, time);
        });
        if let Ok(id) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            game.borrow_mut().raf_id = Some(id);
        }
        closure.forget();
    }

    /// Invalidate the pending frame so no further step can execute
    fn cancel_pending_frame(game: &Rc<RefCell<Game>>) {
        if let Some(id) = game.borrow_mut().raf_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running;
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
            g.update_hud(time);

            // The loop stops when the run ends; start/restart re-kick it
            keep_running = g.state.phase == GamePhase::Playing;
        }

        if keep_running {
            schedule_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lane_rush::sim::{GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Lane Rush (native) starting...");

    // Headless scripted run: weave between lanes until the run ends
    let mut state = GameState::new(42);
    state.start(42);

    let mut input = TickInput::default();
    let mut ticks = 0u64;
    while state.phase == GamePhase::Playing && ticks < 60 * 120 {
        // Swerve direction every two seconds, nitro on the minute
        let phase = (ticks / 120) % 2;
        input.left = phase == 0;
        input.right = phase == 1;
        input.nitro = ticks % 3600 == 600;
        tick(&mut state, &input);
        ticks += 1;
    }

    log::info!(
        "Run over after {} ticks: score {}, coins {}, best streak {}, distance {}m",
        ticks,
        state.score,
        state.coins_collected,
        state.best_streak,
        state.distance as u64
    );
}
