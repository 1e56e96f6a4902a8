//! Fall Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use fall_dodge::leaderboard::transport::WebTransport;
    use fall_dodge::leaderboard::{DEFAULT_RANKING_LIMIT, Leaderboard};
    use fall_dodge::name::{NAME_PROMPT, prompt_player_name};
    use fall_dodge::notifier::{DomNotifier, Notifier};
    use fall_dodge::renderer::{LabelId, RenderState, Scene};
    use fall_dodge::sim::GameEvent;
    use fall_dodge::ui::{Session, UiAction, playfield_scale, to_canvas, to_playfield};
    use fall_dodge::{Settings, Tuning, format_elapsed};
    use glam::Vec2;

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        settings: Settings,
        leaderboard: Rc<Leaderboard<WebTransport>>,
        notifier: Rc<DomNotifier>,
        /// Mirror of the running flag read by the leaderboard
        running: Rc<Cell<bool>>,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, settings: Settings) -> Self {
            let running = Rc::new(Cell::new(false));
            let notifier = Rc::new(DomNotifier);
            let flag = Rc::clone(&running);
            let leaderboard = Leaderboard::new(
                WebTransport::new(settings.endpoint()),
                move || flag.get(),
                notifier.clone() as Rc<dyn Notifier>,
            );
            Self {
                session: Session::new(seed, tuning),
                render_state: None,
                settings,
                leaderboard: Rc::new(leaderboard),
                notifier,
                running,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn sync_running(&self) {
            self.running.set(self.session.state.is_running());
        }

        /// Run one simulation tick, returning its events
        fn update(&mut self, dt: f32, time: f64) -> Vec<GameEvent> {
            let events = self.session.advance(dt);
            self.sync_running();

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            events
        }

        fn scene(&self) -> Scene {
            let scene = Scene::build(&self.session);
            if self.settings.show_fps {
                scene.with_fps(self.fps)
            } else {
                scene
            }
        }

        /// Render the current frame
        fn render(&mut self, scene: &Scene) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(scene) {
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

        /// Mirror scene text into the overlay elements
        fn update_hud(&self, scene: &Scene) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let tuning = &self.session.state.tuning;
            let canvas_size = document
                .get_element_by_id("canvas")
                .map(|c| Vec2::new(c.client_width() as f32, c.client_height() as f32))
                .unwrap_or(Vec2::new(tuning.screen_width, tuning.screen_height));
            let px_per_unit = playfield_scale(canvas_size, tuning);

            for id in LabelId::ALL {
                let Some(el) = document.get_element_by_id(id.dom_id()) else {
                    continue;
                };
                let Ok(el) = el.dyn_into::<web_sys::HtmlElement>() else {
                    continue;
                };
                match scene.label(id) {
                    Some(label) => {
                        if el.text_content().as_deref() != Some(label.text.as_str()) {
                            el.set_text_content(Some(&label.text));
                        }
                        let style = el.style();
                        let at = to_canvas(label.position, canvas_size, tuning);
                        let _ = style.set_property("left", &format!("{}px", at.x));
                        let _ = style.set_property("top", &format!("{}px", at.y));
                        let _ = style.set_property(
                            "font-size",
                            &format!("{}px", label.size * px_per_unit),
                        );
                        let _ = style.set_property("color", &css_color(label.color));
                        let _ = style.set_property("font-weight", if label.bold { "bold" } else { "normal" });
                        let _ = el.set_attribute("class", "label");
                    }
                    None => {
                        let _ = el.set_attribute("class", "label hidden");
                    }
                }
            }
        }

        /// Ask for a name and submit the finished run, then allow restarts
        fn finish_run(&mut self, score: u32, elapsed_ms: f64) {
            self.submit_run(score, elapsed_ms);
            self.session.finish_recorded();
        }

        fn submit_run(&mut self, score: u32, elapsed_ms: f64) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let name = prompt_player_name(
                self.settings.player_name.as_deref(),
                || window.prompt_with_message(NAME_PROMPT).ok().flatten(),
                self.notifier.as_ref(),
            );
            let Some(name) = name else {
                log::info!("Score submission skipped: no name given");
                return;
            };

            if self.settings.player_name.as_deref() != Some(name.as_str())
                && self.settings.remember_name(&name)
            {
                self.settings.save();
            }

            if !self.leaderboard.save_score(&name, score, &format_elapsed(elapsed_ms)) {
                return;
            }

            let notifier = Rc::clone(&self.notifier);
            self.leaderboard.fetch_rankings(
                DEFAULT_RANKING_LIMIT,
                Box::new(move |result| match result {
                    Ok(rankings) => {
                        let rank = rankings.potential_rank(score);
                        if rank <= DEFAULT_RANKING_LIMIT {
                            notifier.show(&format!("Rank #{} on the leaderboard!", rank));
                        } else if let Some(best) = rankings.rank_of(&name) {
                            notifier.show(&format!("Your best is still #{}", best));
                        }
                    }
                    Err(e) => log::warn!("Could not fetch rankings: {}", e),
                }),
            );
        }
    }

    fn css_color([r, g, b, a]: [f32; 4]) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            a
        )
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Fall Dodge starting...");

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

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let tuning = Tuning::load();
        let playfield = Vec2::new(tuning.screen_width, tuning.screen_height);
        let game = Rc::new(RefCell::new(Game::new(seed, tuning, Settings::load())));

        log::info!("Game initialized with seed: {}", seed);

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
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, playfield).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_resize(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Fall Dodge running!");
    }

    /// Client point to playfield point using the canvas's on-screen rect
    fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32, game: &Game) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        to_playfield(
            Vec2::new(client_x as f32, client_y as f32),
            Vec2::new(rect.left() as f32, rect.top() as f32),
            Vec2::new(rect.width() as f32, rect.height() as f32),
            &game.session.state.tuning,
        )
    }

    fn report(game: &Game, action: Option<UiAction>) {
        game.sync_running();
        if let Some(UiAction::AutopilotToggled(on)) = action {
            game.notifier
                .show(if on { "Autopilot on" } else { "Autopilot off" });
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if key == " " || key.starts_with("Arrow") {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                let action = g.session.key_down(&key);
                report(&g, action);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().session.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click - buttons
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let point = canvas_point(&canvas_clone, event.client_x(), event.client_y(), &g);
                let action = g.session.pointer_down(point);
                report(&g, action);
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - pointer cursor over buttons
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let g = game.borrow();
                let point = canvas_point(&canvas_clone, event.client_x(), event.client_y(), &g);
                let cursor = if g.session.pointer_move(point) {
                    "pointer"
                } else {
                    "default"
                };
                let _ = canvas_clone.style().set_property("cursor", cursor);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - buttons or steering
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let point = canvas_point(&canvas_clone, touch.client_x(), touch.client_y(), &g);
                    let action = g.session.touch_start(point);
                    report(&g, action);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - stop steering once no finger remains
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if event.touches().length() == 0 {
                    game.borrow_mut().session.touch_end();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(ref mut render_state) = game.borrow_mut().render_state {
                render_state.resize(width, height);
            }
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

    /// Defer the end-of-run dialog until the frame has been presented
    ///
    /// Restarts are refused until `finish_run` has run.
    fn schedule_finish(game: Rc<RefCell<Game>>, score: u32, elapsed_ms: f64) {
        let Some(window) = web_sys::window() else {
            game.borrow_mut().finish_run(score, elapsed_ms);
            return;
        };
        let closure = Closure::once(move || {
            game.borrow_mut().finish_run(score, elapsed_ms);
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            0,
        );
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let events = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            let events = g.update(dt, time);
            let scene = g.scene();
            g.render(&scene);
            g.update_hud(&scene);
            events
        };

        for event in events {
            if let GameEvent::GameOver {
                score, elapsed_ms, ..
            } = event
            {
                schedule_finish(game.clone(), score, elapsed_ms);
            }
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
    use std::cell::Cell;
    use std::path::PathBuf;
    use std::rc::Rc;

    use fall_dodge::leaderboard::transport::HttpTransport;
    use fall_dodge::leaderboard::{DEFAULT_RANKING_LIMIT, Leaderboard};
    use fall_dodge::notifier::{LogNotifier, Notifier};
    use fall_dodge::sim::GameEvent;
    use fall_dodge::ui::Session;
    use fall_dodge::{Settings, Tuning, format_elapsed};

    /// Simulated frame length (60 FPS)
    const FRAME_DT: f32 = 1.0 / 60.0;

    // ── CLI Configuration ────────────────────────────────────────────────

    struct Cli {
        seed: u64,
        tuning_path: Option<PathBuf>,
        seconds: f32,
        submit_as: Option<String>,
        help: bool,
    }

    impl Default for Cli {
        fn default() -> Self {
            Self {
                seed: 42,
                tuning_path: None,
                seconds: 60.0,
                submit_as: None,
                help: false,
            }
        }
    }

    fn parse_cli() -> Result<Cli, String> {
        let mut cli = Cli::default();
        let mut args = std::env::args().skip(1);

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| args.next().ok_or_else(|| format!("{flag} requires a value"));
            match arg.as_str() {
                "--seed" => {
                    cli.seed = value("--seed")?
                        .parse()
                        .map_err(|_| "--seed requires a number".to_string())?;
                }
                "--tuning" => cli.tuning_path = Some(PathBuf::from(value("--tuning")?)),
                "--seconds" => {
                    cli.seconds = value("--seconds")?
                        .parse()
                        .map_err(|_| "--seconds requires a number".to_string())?;
                }
                "--submit" => cli.submit_as = Some(value("--submit")?),
                "--help" | "-h" => cli.help = true,
                other => return Err(format!("unknown argument: {other} (try --help)")),
            }
        }
        Ok(cli)
    }

    fn print_usage() {
        eprintln!(
            "Fall Dodge headless autopilot run\n\
             \n\
             Usage: fall-dodge [OPTIONS]\n\
             \n\
             Options:\n\
             \x20 --seed N        RNG seed (default: 42)\n\
             \x20 --tuning PATH   JSON balance overrides\n\
             \x20 --seconds S     Simulated time limit (default: 60)\n\
             \x20 --submit NAME   Send a finished run to the leaderboard\n\
             \x20 --help, -h      Show this help"
        );
    }

    /// Counters for the end-of-run summary
    #[derive(Debug, Default)]
    struct RunStats {
        spawned: u32,
        collected: u32,
        dodged: u32,
        ended: Option<GameEvent>,
    }

    pub fn run() -> i32 {
        let cli = match parse_cli() {
            Ok(cli) => cli,
            Err(e) => {
                eprintln!("{e}");
                print_usage();
                return 2;
            }
        };
        if cli.help {
            print_usage();
            return 0;
        }

        let tuning = match &cli.tuning_path {
            Some(path) => match Tuning::from_file(path) {
                Ok(tuning) => tuning,
                Err(e) => {
                    eprintln!("Could not load {}: {}", path.display(), e);
                    return 1;
                }
            },
            None => Tuning::default(),
        };

        let mut session = Session::new(cli.seed, tuning);
        session.autopilot = true;
        session.start();
        log::info!("Headless run: seed {}, limit {}s", cli.seed, cli.seconds);

        let mut stats = RunStats::default();
        let limit_ms = f64::from(cli.seconds.max(0.0)) * 1000.0;
        while session.state.is_running() && session.state.clock_ms < limit_ms {
            for event in session.advance(FRAME_DT) {
                match event {
                    GameEvent::Spawned { .. } => stats.spawned += 1,
                    GameEvent::Collected { .. } => stats.collected += 1,
                    GameEvent::Dodged { .. } => stats.dodged += 1,
                    GameEvent::GameOver { .. } => stats.ended = Some(event),
                }
            }
        }

        let state = &session.state;
        println!("seed:      {}", cli.seed);
        println!("score:     {}", state.score);
        println!("time:      {}", format_elapsed(state.clock_ms));
        println!("spawned:   {}", stats.spawned);
        println!("collected: {}", stats.collected);
        println!("dodged:    {}", stats.dodged);
        match &stats.ended {
            Some(GameEvent::GameOver { cause, .. }) => println!("ended:     {:?}", cause),
            _ => println!("ended:     survived the time limit"),
        }

        if let Some(name) = cli.submit_as {
            let Some(GameEvent::GameOver {
                score, elapsed_ms, ..
            }) = stats.ended
            else {
                eprintln!("Only finished runs are submitted");
                return 1;
            };
            return submit(&name, score, elapsed_ms);
        }
        0
    }

    fn submit(name: &str, score: u32, elapsed_ms: f64) -> i32 {
        let settings = Settings::load();
        let running = Rc::new(Cell::new(false));
        let flag = Rc::clone(&running);
        let notifier: Rc<dyn Notifier> = Rc::new(LogNotifier);
        let leaderboard = Leaderboard::new(
            HttpTransport::new(settings.endpoint()),
            move || flag.get(),
            notifier,
        );

        if !leaderboard.save_score(name, score, &format_elapsed(elapsed_ms)) {
            eprintln!("Score not submitted (see log)");
            return 1;
        }

        let name = name.to_string();
        leaderboard.fetch_rankings(
            DEFAULT_RANKING_LIMIT,
            Box::new(move |result| match result {
                Ok(rankings) => {
                    for (i, entry) in rankings.top(DEFAULT_RANKING_LIMIT).iter().enumerate() {
                        println!("{:>2}. {:<10} {:>6} {}", i + 1, entry.name, entry.score, entry.time);
                    }
                    match rankings.rank_of(&name) {
                        Some(rank) => println!("{} is ranked #{}", name, rank),
                        None => println!("{} is not in the top {}", name, DEFAULT_RANKING_LIMIT),
                    }
                }
                Err(e) => eprintln!("Could not fetch rankings: {}", e),
            }),
        );
        0
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    std::process::exit(headless::run());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
