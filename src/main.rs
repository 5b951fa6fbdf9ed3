//! Horde Blitz entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use horde_blitz::Settings;
    use horde_blitz::consts::*;
    use horde_blitz::items;
    use horde_blitz::renderer::{CanvasRenderer, build_scene};
    use horde_blitz::sim::{GamePhase, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<CanvasRenderer>,
        settings: Settings,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                renderer: None,
                settings: Settings::default(),
                input: TickInput::default(),
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
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
                self.input.pause = false;
                self.input.equip = None;
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
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.render(&build_scene(&self.state, &self.settings));
            }
        }

        /// Reflect health/money into the status display (write-only)
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("health-bar") {
                if let Ok(el) = el.dyn_into::<web_sys::HtmlElement>() {
                    let width = format!("{}%", self.state.health_percent());
                    let _ = el.style().set_property("width", &width);
                }
            }

            if let Some(el) = document.get_element_by_id("money-count") {
                el.set_text_content(Some(&self.state.money().to_string()));
            }

            if self.settings.show_fps {
                if let Some(el) = document.get_element_by_id("fps-counter") {
                    el.set_text_content(Some(&format!("{} FPS", self.fps)));
                }
            }
        }
    }

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Map a key event onto the control snapshot. Returns whether the key is
    /// one of ours (callers prevent the default scroll behavior for those).
    fn apply_key(input: &mut TickInput, key: &str, pressed: bool) -> bool {
        match key {
            "ArrowUp" => input.controls.up = pressed,
            "ArrowDown" => input.controls.down = pressed,
            "ArrowLeft" => input.controls.left = pressed,
            "ArrowRight" => input.controls.right = pressed,
            "Enter" => input.controls.shoot = pressed,
            "p" | "P" | "Escape" => {
                if pressed {
                    input.pause = true;
                }
            }
            _ => {
                // Digits 1-9 request a weapon slot
                let digit = (key.len() == 1)
                    .then(|| key.chars().next())
                    .flatten()
                    .and_then(|c| c.to_digit(10));
                match digit {
                    Some(d) if d >= 1 => {
                        if pressed {
                            input.equip = Some(d as usize - 1);
                        }
                    }
                    _ => return false,
                }
            }
        }
        true
    }

    fn setup_input(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if apply_key(&mut g.input, &event.key(), true) {
                    event.prevent_default();
                }
            });
            let _ =
                window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if apply_key(&mut g.input, &event.key(), false) {
                    event.prevent_default();
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
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
                    let mut g = game.borrow_mut();
                    if g.settings.auto_pause && g.state.phase == GamePhase::Playing {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
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
                let mut g = game.borrow_mut();
                if g.settings.auto_pause && g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) {
        if let Some(window) = web_sys::window() {
            let _ = window.request_animation_frame(f.as_ref().unchecked_ref());
        }
    }

    /// Entry point for the page's chat collaborator: feed a generated item
    /// descriptor into the weapon catalog. Returns whether a weapon slot now
    /// exists for it.
    pub fn ingest_item_json(json: &str) -> bool {
        let item = match items::parse_item(json) {
            Ok(item) => item,
            Err(err) => {
                log::warn!("rejected generated item: {err}");
                return false;
            }
        };

        GAME.with(|slot| {
            let Some(game) = slot.borrow().as_ref().cloned() else {
                log::warn!("item arrived before the game was initialized");
                return false;
            };
            let mut g = game.borrow_mut();
            match g.state.ingest_item(&item) {
                Ok(index) => {
                    log::info!("'{}' available in slot {}", item.name(), index + 1);
                    true
                }
                Err(err) => {
                    log::warn!("rejected generated item: {err}");
                    false
                }
            }
        })
    }

    pub fn run() {
        console_log::init_with_level(log::Level::Info).ok();
        console_error_panic_hook::set_once();

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(seed);
        game.settings = Settings::load();
        log::info!("Horde Blitz starting with seed {seed}");

        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("gameCanvas"))
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        match canvas {
            Some(canvas) => game.renderer = CanvasRenderer::new(&canvas),
            None => log::error!("no #gameCanvas element; running headless"),
        }

        let game = Rc::new(RefCell::new(game));
        GAME.with(|slot| *slot.borrow_mut() = Some(game.clone()));

        setup_input(game.clone());
        setup_auto_pause(game.clone());

        // rAF loop
        let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        let game_loop = game.clone();
        *g.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            {
                let mut game = game_loop.borrow_mut();
                let dt = ((time - game.last_time) / 1000.0) as f32;
                game.last_time = time;
                game.update(dt, time);
                game.render();
                game.update_hud();
            }
            if let Some(closure) = f.borrow().as_ref() {
                request_animation_frame(closure);
            }
        }));
        if let Some(closure) = g.borrow().as_ref() {
            request_animation_frame(closure);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Bridge for the page's chat UI: hand over a generated item as JSON
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn ingest_item_json(json: &str) -> bool {
    wasm_game::ingest_item_json(json)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Horde Blitz (native) starting...");
    run_headless();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the simulation for thirty seconds of game time with a scripted
/// pilot, as a smoke check that the core runs without a browser.
#[cfg(not(target_arch = "wasm32"))]
fn run_headless() {
    use horde_blitz::consts::TICK_HZ;
    use horde_blitz::sim::{ControlState, GameState, TickInput, tick};

    let mut state = GameState::new(0xB117);
    for step in 0..(TICK_HZ * 30) {
        // Sweep the aim so the demo sprays all four directions
        let phase = step % 240;
        let controls = ControlState {
            up: phase < 60,
            left: (60..120).contains(&phase),
            down: (120..180).contains(&phase),
            right: phase >= 180,
            shoot: true,
        };
        tick(
            &mut state,
            &TickInput {
                controls,
                ..Default::default()
            },
        );
    }

    println!(
        "seed {:#x}: level {}, ${}, {} enemies alive, {} drops on the floor",
        state.seed,
        state.level,
        state.money(),
        state.enemies.len(),
        state.drops.len()
    );
}
