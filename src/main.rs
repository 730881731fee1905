//! Fiat Invaders entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent};

    use fiat_invaders::audio::AudioManager;
    use fiat_invaders::consts::*;
    use fiat_invaders::highscores::LocalStore;
    use fiat_invaders::platform::{FeedbackSink, HudSink, InputSource, KeyState, Sinks};
    use fiat_invaders::renderer::CanvasRenderer;
    use fiat_invaders::{Game, GameMode, HudSnapshot, Settings};

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_width_percent(document: &Document, id: &str, percent: f32) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property("width", &format!("{percent}%"));
        }
    }

    fn set_active(document: &Document, id: &str, active: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if active {
                classes.add_1("active")
            } else {
                classes.remove_1("active")
            };
        }
    }

    /// HUD text and health bar in the DOM
    struct DomHud {
        document: Document,
    }

    impl HudSink for DomHud {
        fn update(&mut self, hud: &HudSnapshot) {
            let doc = &self.document;
            set_text(doc, "score", &hud.score.to_string());
            set_text(doc, "level", &hud.level.to_string());
            set_text(doc, "highScore", &hud.high_score.to_string());
            set_width_percent(doc, "healthBar", hud.health_percent());
            set_text(doc, "weaponIcon", hud.weapon.icon());
            set_text(doc, "weaponName", hud.weapon.as_str());
        }
    }

    /// Shakes the canvas with a CSS transform that settles over a few frames
    struct CssShake {
        canvas: HtmlElement,
        intensity: f32,
    }

    impl CssShake {
        fn settle(&mut self) {
            if self.intensity <= 0.0 {
                return;
            }
            let style = self.canvas.style();
            if self.intensity < 0.5 {
                self.intensity = 0.0;
                let _ = style.set_property("transform", "none");
                return;
            }
            let dx = (js_sys::Math::random() - 0.5) * self.intensity as f64;
            let dy = (js_sys::Math::random() - 0.5) * self.intensity as f64;
            let _ = style.set_property("transform", &format!("translate({dx:.1}px, {dy:.1}px)"));
            self.intensity *= 0.8;
        }
    }

    impl FeedbackSink for CssShake {
        fn screen_shake(&mut self, intensity: f32) {
            self.intensity = self.intensity.max(intensity);
        }
    }

    /// Game instance holding all state
    struct App {
        game: Game,
        keys: KeyState,
        renderer: CanvasRenderer,
        hud: DomHud,
        audio: AudioManager,
        shake: CssShake,
        accumulator: f32,
        last_time: f64,
        // Track mode for screen switching
        last_mode: GameMode,
    }

    impl App {
        /// Run simulation ticks for the elapsed time, then draw once
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;
            self.accumulator += dt.min(0.1);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.keys.poll();
                let mut sinks = Sinks {
                    hud: &mut self.hud,
                    audio: &mut self.audio,
                    feedback: &mut self.shake,
                };
                self.game.step(&input, &mut sinks);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            self.sync_screens();
            self.renderer.set_time(time);
            self.game.draw(&mut self.renderer);
            self.shake.settle();
        }

        /// Show the DOM screen matching the current mode
        fn sync_screens(&mut self) {
            let doc = &self.hud.document;
            let mode = self.game.mode();

            if mode == GameMode::Loading {
                let progress = self.game.loading_progress();
                set_width_percent(doc, "loadingProgress", progress as f32);
                set_text(doc, "loadingText", &format!("Loading... {progress}%"));
            }

            if mode == self.last_mode {
                return;
            }
            log::info!("Mode {:?} -> {:?}", self.last_mode, mode);
            set_active(doc, "loadingScreen", mode == GameMode::Loading);
            set_active(doc, "mainMenu", mode == GameMode::Menu);
            set_active(doc, "gameHUD", mode == GameMode::Playing);
            set_active(doc, "gameOverScreen", mode == GameMode::GameOver);
            if mode == GameMode::GameOver {
                set_text(doc, "finalScore", &self.game.state().score.to_string());
                set_text(doc, "highScore", &self.game.high_score().to_string());
            }
            self.last_mode = mode;
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Fiat Invaders starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas = document
            .get_element_by_id("gameCanvas")
            .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
            .expect("missing #gameCanvas");

        let mut settings = Settings::load();
        if let Ok(query) = window.location().search() {
            if settings.apply_query(&query) {
                settings.save();
            }
        }
        log::info!("Quality preset: {}", settings.quality.as_str());
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, Box::new(LocalStore), settings.clone());
        log::info!("Game initialized with seed: {}", seed);

        let mut renderer = CanvasRenderer::new(&canvas, FIELD_WIDTH, FIELD_HEIGHT)
            .expect("2D canvas context unavailable");
        renderer.set_starfield(settings.quality.starfield_enabled());

        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);

        set_text(&document, "highScore", &game.high_score().to_string());

        let app = Rc::new(RefCell::new(App {
            game,
            keys: KeyState::new(),
            renderer,
            hud: DomHud {
                document: document.clone(),
            },
            audio,
            shake: CssShake {
                canvas: canvas.unchecked_into::<HtmlElement>(),
                intensity: 0.0,
            },
            accumulator: 0.0,
            last_time: 0.0,
            last_mode: GameMode::Loading,
        }));

        setup_keyboard(app.clone());
        setup_touch_buttons(app.clone());
        setup_start_buttons(app.clone());
        setup_focus(app.clone(), settings.mute_on_blur);
        request_animation_frame(app);

        log::info!("Fiat Invaders running!");
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if app.borrow_mut().keys.set_key(&event.code(), pressed) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch_buttons(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        let buttons = [
            ("touchLeft", "left"),
            ("touchRight", "right"),
            ("touchShoot", "shoot"),
            ("touchShield", "shield"),
        ];
        for (id, button) in buttons {
            let Some(el) = document.get_element_by_id(id) else {
                continue;
            };
            for (event_name, pressed) in [
                ("pointerdown", true),
                ("pointerup", false),
                ("pointerleave", false),
            ] {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PointerEvent| {
                    event.prevent_default();
                    app.borrow_mut().keys.set_touch(button, pressed);
                });
                let _ = el
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_start_buttons(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for id in ["startButton", "restartButton"] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{}", id);
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PointerEvent| {
                let mut a = app.borrow_mut();
                // Browsers only allow audio after a user gesture
                a.audio.resume();
                a.keys.clear();
                a.game.start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus(app: Rc<RefCell<App>>, mute_on_blur: bool) {
        let window = web_sys::window().unwrap();

        // Window blur: drop held keys so the ship doesn't keep sliding
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                a.keys.clear();
                if mute_on_blur {
                    a.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use fiat_invaders::platform::{NullSink, Sinks};
    use fiat_invaders::sim::{GameState, TickInput};
    use fiat_invaders::{Game, GameMode, HudSnapshot, MemoryStore, Settings};

    /// Play one headless run with a simple autopilot
    pub fn run(seed: u64, settings: Settings, max_ticks: u64) -> (HudSnapshot, u64) {
        let mut game = Game::new(seed, Box::new(MemoryStore::default()), settings);
        let (mut hud, mut audio, mut feedback) = (NullSink, NullSink, NullSink);
        let mut sinks = Sinks {
            hud: &mut hud,
            audio: &mut audio,
            feedback: &mut feedback,
        };

        while game.mode() == GameMode::Loading {
            game.step(&TickInput::default(), &mut sinks);
        }
        game.start();

        let mut ticks = 0;
        while ticks < max_ticks && game.mode() == GameMode::Playing {
            let input = autopilot(game.state());
            game.step(&input, &mut sinks);
            ticks += 1;
        }
        (game.hud(), ticks)
    }

    /// Line up under the nearest invader, hold still to HODL, and raise the
    /// shield when enemy fire is about to land
    fn autopilot(state: &GameState) -> TickInput {
        let ship = state.player.pos;
        let incoming = state.bullets.iter().any(|b| {
            b.owner.is_enemy() && (b.pos.x - ship.x).abs() < 25.0 && (ship.y - b.pos.y) < 80.0
        });

        let target = state
            .enemies
            .iter()
            .map(|e| e.pos.x)
            .min_by(|a, b| (a - ship.x).abs().total_cmp(&(b - ship.x).abs()));
        let dx = target.map_or(0.0, |x| x - ship.x);

        TickInput {
            move_left: dx < -20.0,
            move_right: dx > 20.0,
            shoot: true,
            shield: incoming,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fiat Invaders (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xF1A7);
    let settings = match std::env::args().nth(2) {
        Some(arg) => match fiat_invaders::QualityPreset::parse(&arg) {
            Some(preset) => fiat_invaders::Settings::from_preset(preset),
            None => {
                log::warn!("Unknown quality preset {:?}, using saved settings", arg);
                fiat_invaders::Settings::load()
            }
        },
        None => fiat_invaders::Settings::load(),
    };
    log::info!("Quality preset: {}", settings.quality.as_str());

    let (hud, ticks) = demo::run(seed, settings, 60 * 60 * 5);

    log::info!(
        "Demo finished after {} ticks ({:.1}s): score {}, level {}",
        ticks,
        ticks as f32 * fiat_invaders::consts::SIM_DT,
        hud.score,
        hud.level
    );
    match serde_json::to_string(&hud) {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("Could not encode summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
