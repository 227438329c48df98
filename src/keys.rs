use crate::app::{App, MINUTES_STEP, MenuItem};
use crate::state::app_state::Facet;
use crate::state::messages::NetworkRequest;
use courtside_engine::RecordKind;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

const PAGE_ROWS: isize = 20;

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    if guard.state.editing_search {
        match (key_event.code, key_event.modifiers) {
            (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            (KeyCode::Enter | KeyCode::Esc, _) => guard.stop_search(),
            (KeyCode::Backspace, _) => guard.pop_search(),
            (Char(c), _) => guard.push_search(c),
            _ => {}
        }
        return;
    }

    let mut requests = Vec::new();
    let kind = guard.state.active_tab.kind();

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Players),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Teams),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Standings),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Season
        (_, Char('['), _) => requests = guard.change_season(-1),
        (_, Char(']'), _) => requests = guard.change_season(1),

        // Standings scrolling
        (MenuItem::Standings, Char('j') | KeyCode::Down, _) => {
            guard.state.standings_scroll = guard.state.standings_scroll.saturating_add(1);
        }
        (MenuItem::Standings, Char('k') | KeyCode::Up, _) => {
            guard.state.standings_scroll = guard.state.standings_scroll.saturating_sub(1);
        }

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {
            if let Some(kind) = kind {
                handle_table_key(&mut guard, kind, key_event);
            }
        }
    }

    drop(guard);
    for request in requests {
        let _ = network_requests.send(request).await;
    }
}

fn handle_table_key(app: &mut App, kind: RecordKind, key_event: KeyEvent) {
    match key_event.code {
        // Rows
        Char('j') | KeyCode::Down => app.move_row(kind, 1),
        Char('k') | KeyCode::Up => app.move_row(kind, -1),
        KeyCode::PageDown => app.move_row(kind, PAGE_ROWS),
        KeyCode::PageUp => app.move_row(kind, -PAGE_ROWS),
        KeyCode::Home => app.move_row(kind, isize::MIN),
        KeyCode::End => app.move_row(kind, isize::MAX),

        // Columns and sort
        Char('l') | KeyCode::Right => app.move_column(kind, 1),
        Char('h') | KeyCode::Left => app.move_column(kind, -1),
        Char('s') | KeyCode::Enter => app.sort_by_selected(kind),
        Char('S') => app.clear_sort(kind),

        // Filters
        Char('/') => app.start_search(),
        Char('c') => app.cycle_facet(kind, Facet::Conference),
        Char('y') => app.cycle_facet(kind, Facet::ClassYear),
        Char('t') => app.toggle_team_facet(kind),
        Char('x') => app.clear_filters(),
        Char('m') => app.adjust_min_minutes(-MINUTES_STEP),
        Char('M') => app.adjust_min_minutes(MINUTES_STEP),
        Char('g') => app.adjust_min_games(-1),
        Char('G') => app.adjust_min_games(1),
        _ => {}
    }
}
