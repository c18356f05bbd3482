//! Duo Arcade entry point
//!
//! In the browser: mounts the game named by the location hash, feeds keyboard
//! and pointer events into the input sampler and drives the frame loop from
//! `requestAnimationFrame`. Natively: runs one headless match and prints the
//! HUD line.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, HtmlInputElement,
        KeyboardEvent, PointerEvent,
    };

    use duo_arcade::profile::{LocalStorageStore, MemoryStore};
    use duo_arcade::renderer::{RenderState, Scene, build_scene, clear_color, viewport_to_world};
    use duo_arcade::sim::{AnyGame, Game, GameKind, InputSampler, Key, Setting, TankTuning};
    use duo_arcade::{GameLoop, LoopPhase, NameStore, PlayerProfile, RealTime, Theme};

    type Handler = Closure<dyn FnMut(Event)>;

    /// Event listener owned by one mounted game; detached on unmount
    struct Listener {
        target: EventTarget,
        event: &'static str,
        handler: Handler,
    }

    impl Listener {
        fn attach(target: &EventTarget, event: &'static str, handler: Handler) -> Self {
            if let Err(e) =
                target.add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())
            {
                log::warn!("Failed to listen for {event}: {e:?}");
            }
            Self {
                target: target.clone(),
                event,
                handler,
            }
        }

        fn detach(&self) {
            let _ = self.target.remove_event_listener_with_callback(
                self.event,
                self.handler.as_ref().unchecked_ref(),
            );
        }
    }

    struct Session {
        kind: GameKind,
        driver: GameLoop<AnyGame, RealTime>,
        input: InputSampler,
        raf_id: Option<i32>,
        listeners: Vec<Listener>,
        last_hud: String,
    }

    struct Shell {
        canvas: HtmlCanvasElement,
        render_state: Option<RenderState>,
        store: Box<dyn NameStore>,
        profile: PlayerProfile,
        /// World size of the last drawn scene, for pointer mapping
        world: Vec2,
        /// Bumped on every mount; frame callbacks from older mounts stop
        generation: u32,
        session: Option<Session>,
    }

    fn js_err(msg: &str) -> JsValue {
        JsValue::from_str(msg)
    }

    fn window() -> Result<web_sys::Window, JsValue> {
        web_sys::window().ok_or_else(|| js_err("no window"))
    }

    fn element(id: &str) -> Option<Element> {
        web_sys::window()?.document()?.get_element_by_id(id)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = element(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    /// Read and clear a text input
    fn take_input(id: &str) -> Option<String> {
        let input: HtmlInputElement = element(id)?.dyn_into().ok()?;
        let value = input.value();
        input.set_value("");
        Some(value)
    }

    fn page_input(id: &str) -> Option<HtmlInputElement> {
        element(id)?.dyn_into().ok()
    }

    fn number<T: std::str::FromStr>(id: &str) -> Option<T> {
        page_input(id)?.value().trim().parse().ok()
    }

    fn is_checked(id: &str) -> bool {
        page_input(id).is_some_and(|input| input.checked())
    }

    fn set_value(id: &str, value: &str) {
        if let Some(input) = page_input(id) {
            input.set_value(value);
        }
    }

    fn set_checked(id: &str, checked: bool) {
        if let Some(input) = page_input(id) {
            input.set_checked(checked);
        }
    }

    fn apply_theme(theme: Theme) {
        if let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        {
            let _ = root.set_attribute("data-theme", theme.as_str());
        }
    }

    /// Keys typed into page inputs belong to the form, not the game
    fn typing_in_field(event: &Event) -> bool {
        event
            .target()
            .is_some_and(|t| t.dyn_ref::<HtmlInputElement>().is_some())
    }

    fn canvas_pixels(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let w = (canvas.client_width().max(1) as f64 * dpr) as u32;
        let h = (canvas.client_height().max(1) as f64 * dpr) as u32;
        (w, h)
    }

    fn fit_canvas(shell: &mut Shell) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let (w, h) = canvas_pixels(&window, &shell.canvas);
        if (shell.canvas.width(), shell.canvas.height()) != (w, h) {
            shell.canvas.set_width(w);
            shell.canvas.set_height(h);
            if let Some(rs) = shell.render_state.as_mut() {
                rs.resize(w, h);
            }
        }
    }

    fn pointer_world(shell: &Shell, event: &PointerEvent) -> Vec2 {
        let css = (
            shell.canvas.client_width().max(1) as u32,
            shell.canvas.client_height().max(1) as u32,
        );
        viewport_to_world(
            Vec2::new(event.offset_x() as f32, event.offset_y() as f32),
            shell.world,
            css,
        )
    }

    fn draw(rs: &mut RenderState, scene: &Scene, theme: Theme) {
        match rs.render(scene, clear_color(theme)) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                rs.resize(rs.size.0, rs.size.1);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => log::error!("Out of memory!"),
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }

    fn update_hud(session: &mut Session) {
        let game = session.driver.game();
        let hud = game.hud_text();
        if hud != session.last_hud {
            set_text("hud", &hud);
            session.last_hud = hud;
        }
        if let AnyGame::Guess(g) = game {
            let lines: Vec<String> = g
                .history()
                .iter()
                .map(|r| format!("{}. {}: {}", r.attempt, r.guess, r.feedback))
                .collect();
            set_text("guess-history", &lines.join("\n"));
        }
    }

    /// Tank form over the current tuning; blank or unparsable fields keep their value
    fn tank_tuning_from_form(current: TankTuning) -> TankTuning {
        TankTuning {
            speed: number("tank-speed").unwrap_or(current.speed),
            turn_speed: number("tank-turn").unwrap_or(current.turn_speed),
            fire_cooldown_ms: number("tank-cooldown").unwrap_or(current.fire_cooldown_ms),
            bullet_speed: number("tank-bullet-speed").unwrap_or(current.bullet_speed),
            bullet_bounces: number("tank-bounces").unwrap_or(current.bullet_bounces),
        }
    }

    /// Show the mounted game's settings and fill them from its current values
    fn sync_settings_form(kind: &GameKind, game: &AnyGame) {
        set_hidden("tanks-settings", *kind != GameKind::Tanks);
        set_hidden("snake-settings", *kind != GameKind::Snake);
        set_hidden("squid-settings", *kind != GameKind::RedLight);
        set_hidden("tictactoe-settings", *kind != GameKind::TicTacToe);

        match game {
            AnyGame::Tanks(g) => {
                let t = g.tuning();
                set_value("tank-speed", &t.speed.to_string());
                set_value("tank-turn", &t.turn_speed.to_string());
                set_value("tank-cooldown", &t.fire_cooldown_ms.to_string());
                set_value("tank-bullet-speed", &t.bullet_speed.to_string());
                set_value("tank-bounces", &t.bullet_bounces.to_string());
            }
            AnyGame::Snake(g) => set_checked("snake-wrap", g.tuning().wrap),
            AnyGame::RedLight(g) => set_value("squid-speed", &g.steps_per_second().to_string()),
            AnyGame::TicTacToe(g) => {
                set_checked("ttt-timer", g.turn_timer().is_some());
                if let Some(ms) = g.turn_timer() {
                    set_value("ttt-seconds", &(ms / 1000.0).to_string());
                }
            }
            AnyGame::Guess(g) => set_value(
                "guess-attempts",
                &g.max_attempts().map(|n| n.to_string()).unwrap_or_default(),
            ),
            _ => {}
        }
    }

    /// Apply a setting built from the page when `event` fires on element `id`.
    /// The control gives focus back so game keys keep working.
    fn bind_setting(
        shell: &Rc<RefCell<Shell>>,
        out: &mut Vec<Listener>,
        id: &str,
        event: &'static str,
        make: impl Fn(&AnyGame) -> Option<Setting> + 'static,
    ) {
        let Some(el) = element(id) else {
            return;
        };
        let shell = shell.clone();
        let handler = Handler::new(move |fired: Event| {
            if let Some(target) = fired.target().and_then(|t| t.dyn_into::<HtmlElement>().ok()) {
                let _ = target.blur();
            }
            with_session(&shell, |session| {
                let Some(setting) = make(session.driver.game()) else {
                    return;
                };
                match session.driver.game_mut().apply(setting) {
                    Ok(()) => session.driver.resume(),
                    Err(e) => log::warn!("{e}"),
                }
            });
        });
        out.push(Listener::attach(el.as_ref(), event, handler));
    }

    fn attach_settings(shell: &Rc<RefCell<Shell>>, kind: &GameKind, out: &mut Vec<Listener>) {
        bind_setting(shell, out, "reset-scores-btn", "click", |_| Some(Setting::ResetScores));
        match kind {
            GameKind::Tanks => bind_setting(shell, out, "tank-apply-btn", "click", |game| match game {
                AnyGame::Tanks(g) => Some(Setting::Tanks(tank_tuning_from_form(*g.tuning()))),
                _ => None,
            }),
            GameKind::Snake => bind_setting(shell, out, "snake-wrap", "change", |_| {
                Some(Setting::SnakeWrap(is_checked("snake-wrap")))
            }),
            GameKind::RedLight => {
                bind_setting(shell, out, "squid-speed", "change", |_| {
                    number("squid-speed").map(Setting::RedLightSpeed)
                });
                bind_setting(shell, out, "squid-start-btn", "click", |_| Some(Setting::RedLightStart));
                bind_setting(shell, out, "squid-restart-btn", "click", |_| {
                    Some(Setting::RedLightRestart)
                });
            }
            GameKind::TicTacToe => {
                let timer = |_: &AnyGame| {
                    let seconds = number::<f64>("ttt-seconds").unwrap_or(10.0);
                    Some(Setting::TurnTimer(is_checked("ttt-timer").then_some(seconds * 1000.0)))
                };
                bind_setting(shell, out, "ttt-timer", "change", timer);
                bind_setting(shell, out, "ttt-seconds", "change", timer);
            }
            GameKind::Guess => bind_setting(shell, out, "guess-attempts", "change", |_| {
                Some(Setting::GuessAttempts(number("guess-attempts")))
            }),
            GameKind::Race(_) | GameKind::Lawn | GameKind::Platformer => {}
        }
    }

    /// Tear down the mounted game: no listener or frame callback survives this
    fn unmount(shell: &mut Shell) {
        let Some(mut session) = shell.session.take() else {
            return;
        };
        session.driver.cancel();
        if let (Some(id), Some(window)) = (session.raf_id, web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
        for listener in &session.listeners {
            listener.detach();
        }
        log::info!("Unmounted {}", session.kind.title());
    }

    fn schedule_frame(shell: &Rc<RefCell<Shell>>, generation: u32) -> Result<(), JsValue> {
        let shell_cb = shell.clone();
        let closure = Closure::once(move |timestamp: f64| on_frame(&shell_cb, generation, timestamp));
        let id = window()?.request_animation_frame(closure.as_ref().unchecked_ref())?;
        closure.forget();
        if let Some(session) = shell.borrow_mut().session.as_mut() {
            session.raf_id = Some(id);
        }
        Ok(())
    }

    fn on_frame(shell: &Rc<RefCell<Shell>>, generation: u32, timestamp: f64) {
        {
            let mut guard = shell.borrow_mut();
            let s: &mut Shell = &mut guard;
            if s.generation != generation {
                return;
            }
            let Some(session) = s.session.as_mut() else {
                return;
            };
            session.raf_id = None;

            let theme = s.profile.theme;
            let render_state = &mut s.render_state;
            let world = &mut s.world;
            session
                .driver
                .frame(timestamp, &mut session.input, |game: &AnyGame| {
                    let scene = build_scene(game, theme);
                    *world = scene.world;
                    if let Some(rs) = render_state.as_mut() {
                        draw(rs, &scene, theme);
                    }
                });
            update_hud(session);
        }
        if let Err(e) = schedule_frame(shell, generation) {
            log::warn!("Failed to schedule frame: {e:?}");
        }
    }

    fn with_session(shell: &Rc<RefCell<Shell>>, f: impl FnOnce(&mut Session)) {
        if let Some(session) = shell.borrow_mut().session.as_mut() {
            f(session);
        }
    }

    fn attach_listeners(
        shell: &Rc<RefCell<Shell>>,
        kind: &GameKind,
        out: &mut Vec<Listener>,
    ) -> Result<(), JsValue> {
        let window = window()?;
        let canvas = shell.borrow().canvas.clone();

        // Keyboard
        {
            let shell = shell.clone();
            let handler = Handler::new(move |event: Event| {
                if typing_in_field(&event) {
                    return;
                }
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let Some(key) = Key::from_code(&event.code()) else {
                    return;
                };
                if key.scrolls_page() {
                    event.prevent_default();
                }
                with_session(&shell, |session| {
                    if key == Key::R {
                        if !event.repeat() {
                            session.driver.reset();
                            session.input.release_all();
                            log::info!("Round reset");
                        }
                        return;
                    }
                    session.input.key_down(key, event.time_stamp(), event.repeat());
                });
            });
            out.push(Listener::attach(window.as_ref(), "keydown", handler));
        }
        {
            let shell = shell.clone();
            let handler = Handler::new(move |event: Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if let Some(key) = Key::from_code(&event.code()) {
                    with_session(&shell, |session| session.input.key_up(key));
                }
            });
            out.push(Listener::attach(window.as_ref(), "keyup", handler));
        }
        {
            let shell = shell.clone();
            let handler = Handler::new(move |_event: Event| {
                with_session(&shell, |session| session.input.release_all());
            });
            out.push(Listener::attach(window.as_ref(), "blur", handler));
        }

        // Pointer
        {
            let shell = shell.clone();
            let handler = Handler::new(move |event: Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let mut guard = shell.borrow_mut();
                let p = pointer_world(&guard, event);
                if let Some(session) = guard.session.as_mut() {
                    session.input.set_pointer(p);
                }
            });
            out.push(Listener::attach(canvas.as_ref(), "pointermove", handler));
        }
        {
            let shell = shell.clone();
            let handler = Handler::new(move |event: Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let mut guard = shell.borrow_mut();
                let p = pointer_world(&guard, event);
                if let Some(session) = guard.session.as_mut() {
                    session.input.set_pointer(p);
                    session.input.click(p);
                }
            });
            out.push(Listener::attach(canvas.as_ref(), "pointerdown", handler));
        }

        // Page buttons
        if let Some(btn) = element("reset-btn") {
            let shell = shell.clone();
            let handler = Handler::new(move |_event: Event| {
                with_session(&shell, |session| session.driver.reset());
            });
            out.push(Listener::attach(btn.as_ref(), "click", handler));
        }
        if let Some(btn) = element("theme-btn") {
            let shell = shell.clone();
            let handler = Handler::new(move |_event: Event| {
                let mut guard = shell.borrow_mut();
                let s: &mut Shell = &mut guard;
                s.profile.theme = s.profile.theme.toggled();
                apply_theme(s.profile.theme);
                if let Err(e) = s.profile.save(s.store.as_mut()) {
                    log::warn!("Failed to save profile: {e}");
                }
            });
            out.push(Listener::attach(btn.as_ref(), "click", handler));
        }

        attach_settings(shell, kind, out);
        if *kind == GameKind::Guess {
            attach_guess_form(shell, out);
        }
        Ok(())
    }

    fn attach_guess_form(shell: &Rc<RefCell<Shell>>, out: &mut Vec<Listener>) {
        if let Some(btn) = element("guess-secret-btn") {
            let shell = shell.clone();
            let handler = Handler::new(move |_event: Event| {
                let Some(text) = take_input("guess-secret") else {
                    return;
                };
                with_session(&shell, |session| {
                    if session.driver.phase() == LoopPhase::Finished {
                        session.driver.reset();
                    }
                    if let AnyGame::Guess(g) = session.driver.game_mut() {
                        let message = match g.set_secret(&text) {
                            Ok(()) => "Число загадано".to_string(),
                            Err(e) => {
                                log::debug!("Rejected secret: {e}");
                                e.to_string()
                            }
                        };
                        set_text("guess-message", &message);
                    }
                });
            });
            out.push(Listener::attach(btn.as_ref(), "click", handler));
        }
        if let Some(btn) = element("guess-submit-btn") {
            let shell = shell.clone();
            let handler = Handler::new(move |_event: Event| {
                let Some(text) = take_input("guess-input") else {
                    return;
                };
                with_session(&shell, |session| {
                    if let AnyGame::Guess(g) = session.driver.game_mut() {
                        let message = match g.submit_guess(&text) {
                            Ok(feedback) => feedback.to_string(),
                            Err(e) => {
                                log::debug!("Rejected guess: {e}");
                                e.to_string()
                            }
                        };
                        set_text("guess-message", &message);
                    }
                });
            });
            out.push(Listener::attach(btn.as_ref(), "click", handler));
        }
    }

    /// Replace whatever is mounted with the game named by the location hash
    fn mount(shell: &Rc<RefCell<Shell>>) -> Result<(), JsValue> {
        let hash = window()?.location().hash()?;
        let kind = GameKind::from_hash(&hash).unwrap_or_else(|| {
            if !hash.trim_start_matches('#').is_empty() {
                log::warn!("Unknown route {hash}, showing tanks");
            }
            GameKind::Tanks
        });
        let seed = js_sys::Date::now() as u64;

        let generation = {
            let mut guard = shell.borrow_mut();
            let s: &mut Shell = &mut guard;
            unmount(s);
            fit_canvas(s);
            s.generation = s.generation.wrapping_add(1);
            let game = AnyGame::new(&kind, &s.profile.match_config(), seed);
            let mut driver = GameLoop::new(game, RealTime::default());
            driver.start();
            s.session = Some(Session {
                kind: kind.clone(),
                driver,
                input: InputSampler::new(),
                raf_id: None,
                listeners: Vec::new(),
                last_hud: String::new(),
            });
            s.generation
        };

        let mut listeners = Vec::new();
        let attached = attach_listeners(shell, &kind, &mut listeners);
        with_session(shell, |session| session.listeners = listeners);
        attached?;

        set_text("game-title", kind.title());
        set_text("guess-message", "");
        set_hidden("guess-panel", kind != GameKind::Guess);
        with_session(shell, |session| sync_settings_form(&kind, session.driver.game()));
        log::info!("Mounted {} with seed {}", kind.title(), seed);

        schedule_frame(shell, generation)
    }

    async fn init_gpu(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<RenderState, String> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| e.to_string())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| e.to_string())?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);
        RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| e.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger init failed: {e}").into());
        }

        log::info!("Duo Arcade starting...");

        let window = window()?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_err("no #canvas element"))?
            .dyn_into()
            .map_err(|_| js_err("#canvas is not a canvas"))?;

        let (width, height) = canvas_pixels(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let store: Box<dyn NameStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{e}; names will not persist");
                Box::new(MemoryStore::default())
            }
        };
        let profile = PlayerProfile::load(store.as_ref());
        apply_theme(profile.theme);

        let render_state = match init_gpu(canvas.clone(), width, height).await {
            Ok(rs) => Some(rs),
            Err(e) => {
                log::error!("Rendering unavailable: {e}");
                set_text("hud", "WebGPU недоступен");
                None
            }
        };

        let shell = Rc::new(RefCell::new(Shell {
            canvas,
            render_state,
            store,
            profile,
            world: Vec2::ONE,
            generation: 0,
            session: None,
        }));

        // Page-lifetime listeners
        {
            let shell = shell.clone();
            let closure = Handler::new(move |_event: Event| {
                if let Err(e) = mount(&shell) {
                    log::warn!("Failed to mount game: {e:?}");
                }
            });
            window.add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let shell = shell.clone();
            let closure = Handler::new(move |_event: Event| fit_canvas(&mut shell.borrow_mut()));
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        mount(&shell)?;
        log::info!("Duo Arcade running!");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    web::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use duo_arcade::consts::SIM_DT;
    use duo_arcade::sim::{AnyGame, Game, GameKind, InputSampler, Key, MatchConfig};
    use duo_arcade::{FixedStep, GameLoop, LoopPhase};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let route = args.next().unwrap_or_else(|| "tanks".to_string());
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let Some(kind) = GameKind::from_hash(&route) else {
        log::error!("Unknown game `{route}`, expected one of {:?}", GameKind::ALL_ROUTES);
        std::process::exit(2);
    };

    log::info!("Duo Arcade (native) running {} headless, seed {seed}", kind.title());

    let game = AnyGame::new(&kind, &MatchConfig::default(), seed);
    let mut driver = GameLoop::new(game, FixedStep::default());
    let mut input = InputSampler::new();
    // Player 1 holds throttle and fire for the whole demo
    input.key_down(Key::W, 0.0, false);
    input.key_down(Key::Space, 0.0, false);
    driver.start();

    let ticks_per_second = (1.0 / SIM_DT).round() as u32;
    let limit = ticks_per_second * 60;
    let mut frame = 0;
    while driver.phase() == LoopPhase::Running && frame < limit {
        driver.frame(f64::from(frame) * f64::from(SIM_DT) * 1000.0, &mut input, |_| {});
        if frame % ticks_per_second == 0 {
            log::info!("{}", driver.game().hud_text());
        }
        frame += 1;
    }

    println!("{}", driver.game().hud_text());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
