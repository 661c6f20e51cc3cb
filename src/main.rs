//! Lane Dodge entry point
//!
//! On the web, drives the simulation from `requestAnimationFrame` and hands
//! each frame's snapshot to the page. Natively, runs a seeded headless demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use lane_dodge::{PageHost, Simulation, Snapshot, Tuning};

    /// Page-side render hook, called with the snapshot JSON
    const RENDER_HOOK: &str = "laneDodgeRender";

    /// Game instance holding all state
    struct Game {
        host: PageHost,
        render_hook: Option<js_sys::Function>,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning) -> Self {
            Self {
                host: PageHost::new(Simulation::new(seed, tuning)),
                render_hook: None,
            }
        }

        /// Hand the snapshot to the page renderer
        fn render(&self, snapshot: &Snapshot) {
            let Some(ref hook) = self.render_hook else {
                return;
            };
            match snapshot.to_json() {
                Ok(json) => {
                    if let Err(e) = hook.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                        log::warn!("Render hook failed: {:?}", e);
                    }
                }
                Err(e) => log::error!("Snapshot encoding failed: {}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, snapshot: &Snapshot) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-time") {
                el.set_text_content(Some(&format!("Time: {}", snapshot.hud_time())));
            }
            if let Some(el) = document.get_element_by_id("hud-speed") {
                el.set_text_content(Some(&format!("Speed: {}", snapshot.hud_speed())));
            }
        }
    }

    /// Look up `window.laneDodgeRender`, if the page defined one
    fn find_render_hook(window: &web_sys::Window) -> Option<js_sys::Function> {
        js_sys::Reflect::get(window, &JsValue::from_str(RENDER_HOOK))
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lane Dodge starting...");

        let window = web_sys::window().expect("no window");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, Tuning::load())));

        match find_render_hook(&window) {
            Some(hook) => game.borrow_mut().render_hook = Some(hook),
            None => log::warn!("window.{} not defined, rendering HUD only", RENDER_HOOK),
        }

        setup_auto_pause(game.clone());
        setup_page_lifecycle(game.clone());

        request_animation_frame(game);

        log::info!("Lane Dodge running!");
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
            let Some(snapshot) = g.host.frame(time) else {
                log::info!("Game loop stopped");
                return;
            };
            g.render(&snapshot);
            g.update_hud(&snapshot);
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            game.borrow_mut().host.set_hidden(hidden);
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Pause on `pagehide` into the back/forward cache, dispose on a real unload
    fn setup_page_lifecycle(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let hide_game = game.clone();
        let on_hide = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PageTransitionEvent| {
            hide_game.borrow_mut().host.page_hide(event.persisted());
        });
        let _ = window.add_event_listener_with_callback("pagehide", on_hide.as_ref().unchecked_ref());
        on_hide.forget();

        let on_show = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PageTransitionEvent| {
            if event.persisted() {
                game.borrow_mut().host.page_show();
            }
        });
        let _ = window.add_event_listener_with_callback("pageshow", on_show.as_ref().unchecked_ref());
        on_show.forget();
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
    env_logger::init();
    log::info!("Lane Dodge (native) starting...");
    log::info!("Native mode runs headless - build for wasm32 to play in the browser");

    headless::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use lane_dodge::{Simulation, Tuning};

    const SEED_VAR: &str = "LANE_DODGE_SEED";
    const SECONDS_VAR: &str = "LANE_DODGE_SECONDS";

    const DEFAULT_SEED: u64 = 42;
    /// Long enough to see cars: spawning starts once speed caps
    const DEFAULT_SECONDS: u64 = 90;
    /// One animation frame
    const FRAME_MS: u64 = 16;
    const REPORT_EVERY_MS: u64 = 5_000;

    /// Read a numeric environment variable, falling back on absence or garbage
    fn env_u64(name: &str, default: u64) -> u64 {
        match std::env::var(name) {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
                log::warn!("Ignoring {}={:?}: {}", name, raw, e);
                default
            }),
            Err(_) => default,
        }
    }

    pub fn run() {
        let seed = env_u64(SEED_VAR, DEFAULT_SEED);
        let seconds = env_u64(SECONDS_VAR, DEFAULT_SECONDS);
        let mut sim = Simulation::new(seed, Tuning::load());

        let end_ms = seconds * 1000;
        let mut next_report = REPORT_EVERY_MS;
        while sim.now_ms() < end_ms {
            sim.advance(FRAME_MS.min(end_ms - sim.now_ms()));

            if sim.now_ms() >= next_report {
                let state = sim.state();
                log::info!(
                    "t={}s score={} speed={:.2}x cars={} lane={}->{}",
                    sim.now_ms() / 1000,
                    state.run.score,
                    state.run.speed,
                    state.obstacles.len(),
                    state.player.current_lane,
                    state.player.target_lane
                );
                next_report += REPORT_EVERY_MS;
            }
        }

        let snapshot = sim.snapshot();
        sim.dispose();

        let stats = sim.stats();
        println!(
            "Survived {} ({} ticks) at {} - {} cars spawned, {} autopilot checks",
            snapshot.hud_time(),
            snapshot.score,
            snapshot.hud_speed(),
            stats.spawn,
            stats.avoidance
        );
        match snapshot.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Snapshot encoding failed: {}", e),
        }
    }
}
