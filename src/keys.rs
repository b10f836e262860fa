use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

const JUMP: isize = 10;

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let mut request: Option<NetworkRequest> = None;

    if guard.state.search.active {
        match (key_event.code, key_event.modifiers) {
            (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            (KeyCode::Esc | KeyCode::Enter, _) => guard.search_finish(),
            (KeyCode::Backspace, _) => guard.search_pop(),
            (Char(c), _) => guard.search_push(c),
            _ => {}
        }
    } else {
        match (guard.state.active_tab, key_event.code, key_event.modifiers) {
            // Quit
            (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }

            // Tab switching
            (_, Char('1'), _) => guard.update_tab(MenuItem::CurrentStats),
            (_, Char('2'), _) => guard.update_tab(MenuItem::Career),
            (_, Char('3'), _) => guard.update_tab(MenuItem::Trade),
            (_, Char('4'), _) => guard.update_tab(MenuItem::Compare),
            (_, Char('v'), _) => guard.toggle_compare(),
            (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
            (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

            // Season + games filter
            (_, Char('s'), _) => request = guard.season_older(),
            (_, Char('S'), _) => request = guard.season_newer(),
            (_, Char('m'), _) => guard.adjust_min_games(-1),
            (_, Char('M'), _) => guard.adjust_min_games(1),
            (_, Char('n'), _) => guard.adjust_min_games(-5),
            (_, Char('N'), _) => guard.adjust_min_games(5),

            // Player picker / trade lists
            (_, Char('j') | KeyCode::Down, _) => guard.move_selection(1),
            (_, Char('k') | KeyCode::Up, _) => guard.move_selection(-1),
            (_, Char('J') | KeyCode::PageDown, _) => guard.move_selection(JUMP),
            (_, Char('K') | KeyCode::PageUp, _) => guard.move_selection(-JUMP),
            (_, Char('/'), _) => guard.search_start(),
            (_, KeyCode::Tab, _) => guard.switch_focus(),

            // Trade simulator
            (MenuItem::Trade, Char(' ') | KeyCode::Enter, _) => guard.trade_toggle(),
            (MenuItem::Trade, Char('l') | KeyCode::Right, _) => guard.trade_share_up(),
            (MenuItem::Trade, Char('h') | KeyCode::Left, _) => guard.trade_share_down(),
            (MenuItem::Trade, Char('c'), _) => guard.trade_clear(),

            // Global
            (_, Char('f'), _) => guard.toggle_full_screen(),
            (_, Char('"'), _) => guard.toggle_show_logs(),

            _ => {}
        }
    }

    let career = guard.career_request();
    drop(guard);

    for request in request.into_iter().chain(career) {
        let _ = network_requests.send(request).await;
    }
}
