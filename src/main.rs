//! Walking Trump entry point
//!
//! Web: wires the game to the DOM, LocalStorage and the QR scanner.
//! Native: plays a seeded demo game in the terminal.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use walking_trump::persistence::{LocalStorageStore, MemoryStore, StateStore};
    use walking_trump::platform::{ScanSourceError, id_from_query};
    use walking_trump::presenter::Notice;
    use walking_trump::sim::Reveal;
    use walking_trump::{Game, GameError, ScanReport, Settings};

    type Store = Box<dyn StateStore>;

    /// App instance holding the game and its settings
    struct App {
        game: Game<Store>,
        settings: Settings,
        /// A revealed pair is waiting for its delayed judgment
        judging: bool,
    }

    thread_local! {
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    fn current_app() -> Option<Rc<RefCell<App>>> {
        APP.with(|app| app.borrow().clone())
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn show_notices(notices: &[Notice]) {
        for notice in notices.iter().filter(|n| n.needs_alert()) {
            alert(&notice.to_string());
        }
    }

    /// Rebuild the whole grid and status line from the current state
    fn render(app: &App) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let view = app.game.view();

        if let Some(grid) = document.get_element_by_id("card-grid") {
            grid.set_inner_html("");
            for cell in &view.cells {
                let Ok(div) = document.create_element("div") else {
                    continue;
                };
                div.set_class_name(&cell.class_name());
                if let Some(label) = &cell.label {
                    div.set_text_content(Some(label));
                }
                let _ = grid.append_child(&div);
            }
        }

        if let Some(status) = document.get_element_by_id("status-text") {
            status.set_text_content(Some(&view.status_text()));
        }
    }

    /// Render, tell the player, and schedule judgment for a second card
    fn handle_report(app_rc: &Rc<RefCell<App>>, report: ScanReport) {
        let notices = report.notices();
        {
            let app = app_rc.borrow();
            render(&app);
        }
        show_notices(&notices);

        if let Ok(Reveal::SecondCardRevealed { pending, .. }) = report.outcome {
            let delay = {
                let mut app = app_rc.borrow_mut();
                app.judging = true;
                app.settings.effective_delay_ms()
            };
            let app_rc = app_rc.clone();
            let callback = Closure::once_into_js(move || {
                let report = {
                    let mut app = app_rc.borrow_mut();
                    app.judging = false;
                    app.game.commit_judgment(pending)
                };
                render(&app_rc.borrow());
                if let Some(report) = report {
                    show_notices(&report.notices());
                }
            });
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.unchecked_ref::<js_sys::Function>(),
                    delay as i32,
                );
            }
        }
    }

    fn scan_with(app_rc: &Rc<RefCell<App>>, scan: impl FnOnce(&mut Game<Store>) -> ScanReport) {
        let report = {
            let mut app = app_rc.borrow_mut();
            if app.judging {
                log::info!("Scan ignored, previous pair still being judged");
                return;
            }
            scan(&mut app.game)
        };
        handle_report(app_rc, report);
    }

    /// Called by the JS QR scanner with the decoded text
    #[wasm_bindgen]
    pub fn on_qr_decoded(payload: &str) {
        if let Some(app) = current_app() {
            scan_with(&app, |game| game.scan_payload(payload));
        }
    }

    /// Called by the JS QR scanner when the camera or decoder fails
    #[wasm_bindgen]
    pub fn on_scan_failed() {
        if let Some(app) = current_app() {
            let notice = app.borrow().game.scan_failed(ScanSourceError);
            alert(&notice.to_string());
        }
    }

    fn open_store() -> (Store, Option<Notice>) {
        match LocalStorageStore::open() {
            Ok(store) => (Box::new(store), None),
            Err(e) => {
                log::error!("LocalStorage unavailable, progress will not be kept: {}", e);
                (Box::new(MemoryStore::new()), Some(Notice::Error(GameError::Store(e))))
            }
        }
    }

    fn setup_reset_button(app_rc: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let confirmed = web_sys::window()
                    .and_then(|w| w.confirm_with_message("Reset the game?").ok())
                    .unwrap_or(false);
                if !confirmed {
                    return;
                }
                let result = app_rc.borrow_mut().game.reset();
                render(&app_rc.borrow());
                match result {
                    Ok(()) => alert(&Notice::Reset.to_string()),
                    Err(e) => alert(&Notice::Error(e.into()).to_string()),
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Walking Trump starting...");

        let window = web_sys::window().expect("no window");
        let location = window.location();
        let search = location.search().unwrap_or_default();

        let mut settings = Settings::load();
        settings.apply_query(&search);

        let (store, store_notice) = open_store();
        let (game, mut notices) = Game::open(store, settings.match_mode);
        notices.extend(store_notice);

        log::info!(
            "Game ready ({} mode, {} pairs found)",
            settings.match_mode.as_str(),
            game.state().pairs_found()
        );

        let app_rc = Rc::new(RefCell::new(App {
            game,
            settings,
            judging: false,
        }));
        APP.with(|app| *app.borrow_mut() = Some(app_rc.clone()));

        render(&app_rc.borrow());
        show_notices(&notices);

        // Card QR codes may point at this page with ?id=N
        match id_from_query(&search) {
            Some(Ok(raw)) => scan_with(&app_rc, |game| game.scan(raw)),
            Some(Err(e)) => show_notices(&[Notice::Error(e.into())]),
            None => {}
        }
        if search.contains("id=") {
            // Drop the parameter so a reload does not scan again
            if let (Ok(history), Ok(path)) = (window.history(), location.pathname()) {
                let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&path));
            }
        }

        setup_reset_button(app_rc);

        log::info!("Walking Trump running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use walking_trump::Game;
    use walking_trump::persistence::MemoryStore;
    use walking_trump::sim::{DemoPlayer, MatchMode, Reveal};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let mode = args
        .next()
        .and_then(|s| MatchMode::from_str(&s))
        .unwrap_or_default();

    log::info!(
        "Walking Trump (native) demo, seed {} in {} mode",
        seed,
        mode.as_str()
    );
    log::info!("Run with `trunk serve` for the web version");

    let (mut game, _) = Game::open(MemoryStore::new(), mode);
    let mut player = DemoPlayer::new(seed, mode);
    let mut scans = 0;

    while let Some(id) = player.choose(game.state()) {
        scans += 1;
        let report = game.scan(id as i64);
        for notice in report.notices() {
            log::info!("{}", notice.to_string().replace('\n', " "));
        }
        match report.outcome {
            Ok(Reveal::FirstCardRevealed(card)) => player.observe(&card),
            Ok(Reveal::SecondCardRevealed { card, pending }) => {
                player.observe(&card);
                if let Some(judgment) = game.commit_judgment(pending) {
                    for notice in judgment.notices() {
                        log::info!("{}", notice.to_string().replace('\n', " "));
                    }
                }
            }
            Err(_) => {}
        }
    }

    let view = game.view();
    for row in view.cells.chunks(13) {
        let line: Vec<String> = row
            .iter()
            .map(|cell| format!("{:>4}", cell.label.as_deref().unwrap_or("##")))
            .collect();
        println!("{}", line.join(""));
    }
    println!("{} after {} scans", view.status_text(), scans);
}
