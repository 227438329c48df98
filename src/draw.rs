use tui::backend::Backend;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::state::app_state::scroll_into_view;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::columns::{self, clip, format_cell, pinned_cells, pinned_headers, pinned_widths};
use crate::ui::layout::LayoutAreas;
use crate::ui::palette::cell_style;
use courtside_engine::RecordKind;
use courtside_engine::grade::CellGrade;
use courtside_engine::rank::Direction;
use log::error;

static TABS: &[&str; 3] = &["Players", "Teams", "Standings"];

/// Rows materialized beyond the viewport on each side.
const OVERSCAN: usize = 5;

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Players => draw_stat_table(f, layout.main, app, RecordKind::Player),
            MenuItem::Teams => draw_stat_table(f, layout.main, app, RecordKind::Team),
            MenuItem::Standings => draw_standings(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        draw_status(f, layout.status, app);
        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Players => 0,
        MenuItem::Teams => 1,
        MenuItem::Standings => 2,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new(format!("{} | Help: ? ", app.state.season))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn pad_left(text: &str, width: u16) -> String {
    let width = usize::from(width);
    format!("{:<width$}", clip(text, width))
}

fn pad_right(text: &str, width: u16) -> String {
    let width = usize::from(width);
    format!("{:>width$}", clip(text, width))
}

fn draw_stat_table(f: &mut Frame, area: Rect, app: &mut App, kind: RecordKind) {
    let title = match app.state.view(kind).store.pending_season() {
        Some(season) if season != app.state.view(kind).store.population().season => {
            format!(" {} {} (loading {season}) ", TABS[kind_tab(kind)], app.state.view(kind).store.population().season)
        }
        _ => format!(" {} {} ", TABS[kind_tab(kind)], app.state.season),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let view = app.state.view(kind);
    if view.store.population().is_empty() {
        let msg = if let Some(err) = view.store.last_error() {
            format!("Season load failed:\n{err}")
        } else if view.store.is_loading() {
            "Loading season data...".to_string()
        } else {
            "No records for this season".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    // Header line + rows.
    let body_height = usize::from(inner.height.saturating_sub(1));
    let columns = view.columns();
    let widths: Vec<u16> = columns.iter().map(|c| columns::width(c)).collect();
    let pinned_total: u16 = pinned_widths().iter().map(|w| w + 1).sum();
    let (first_column, end_column) = columns::visible_columns(
        &widths,
        view.first_column,
        view.selected_column,
        inner.width.saturating_sub(pinned_total),
    );
    let first_visible = scroll_into_view(view.selected_row, view.first_visible, body_height);
    let selected_row = view.selected_row;
    let selected_column = view.selected_column;
    let sort = view.sort.clone();

    let view = app.state.view_mut(kind);
    view.first_column = first_column;
    view.first_visible = first_visible;

    let table = app.table(kind);
    if table.rows.is_empty() {
        f.render_widget(
            Paragraph::new("No records match the current filters (x clears them)")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let mut lines = Vec::with_capacity(body_height + 1);

    // Header
    let header_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let mut header: Vec<Span> = pinned_headers(kind)
        .iter()
        .zip(pinned_widths())
        .map(|(h, w)| Span::styled(format!("{} ", pad_left(h, w)), header_style))
        .collect();
    for (i, field) in columns.iter().enumerate().take(end_column).skip(first_column) {
        let marker = match (&sort.field, sort.direction) {
            (Some(active), Direction::Desc) if active == field => "▼",
            (Some(active), Direction::Asc) if active == field => "▲",
            _ => "",
        };
        let label = format!("{marker}{}", columns::header(field));
        let mut style = header_style;
        if i == selected_column {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        header.push(Span::styled(format!("{} ", pad_right(&label, widths[i])), style));
    }
    lines.push(Line::from(header));

    // Rows: the window carries overscan, only the viewport is painted.
    let window = table.window(first_visible, body_height, OVERSCAN);
    let viewport = first_visible..first_visible + body_height;
    for (offset, row) in window.rows.iter().enumerate() {
        let index = window.range.start + offset;
        if !viewport.contains(&index) {
            continue;
        }
        let pinned_style = if index == selected_row {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let mut spans: Vec<Span> = pinned_cells(row)
            .iter()
            .zip(pinned_widths())
            .enumerate()
            .map(|(i, (text, w))| {
                let text = if i == 0 { pad_right(text, w - 1) + " " } else { pad_left(text, w) };
                Span::styled(format!("{text} "), pinned_style)
            })
            .collect();
        for (i, field) in columns.iter().enumerate().take(end_column).skip(first_column) {
            let grade = row.cell_bands.get(*field).copied().unwrap_or(CellGrade::NEUTRAL);
            spans.push(Span::styled(pad_right(&format_cell(&row.record, field), widths[i]), cell_style(&grade)));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn kind_tab(kind: RecordKind) -> usize {
    match kind {
        RecordKind::Player => 0,
        RecordKind::Team => 1,
    }
}

fn draw_standings(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.state.standings_season {
        Some(season) => format!(" Conference Standings {season} "),
        None => " Conference Standings ".to_string(),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.state.standings.is_empty() {
        let msg = if app.state.standings_season.is_none() {
            "Loading standings..."
        } else {
            "No standings published for this season"
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let mut lines = Vec::new();
    for (conference, entries) in &app.state.standings {
        lines.push(Line::from(Span::styled(
            format!("{conference:<28} {:>7} {:>7}", "Conf", "Overall"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        for entry in entries {
            lines.push(Line::from(format!(
                "  {:<26} {:>7} {:>7}",
                clip(&entry.team.display_name, 26),
                format!("{}-{}", entry.conference_wins, entry.conference_losses),
                format!("{}-{}", entry.wins, entry.losses),
            )));
        }
        lines.push(Line::from(""));
    }

    f.render_widget(Paragraph::new(lines).scroll((app.state.standings_scroll, 0)), inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = [
        ("1 / 2 / 3", "players, teams, standings"),
        ("[ / ]", "previous / next season"),
        ("j k ↑ ↓ PgUp PgDn Home End", "move between rows"),
        ("h l ← →", "move between stat columns"),
        ("s / Enter", "sort by column (again flips direction)"),
        ("S", "original order"),
        ("/", "search names and teams (Enter or Esc to finish)"),
        ("c / y / t", "cycle conference / class year, toggle selected team"),
        ("m M", "minimum minutes % down / up"),
        ("g G", "minimum games down / up"),
        ("x", "clear facets and search"),
        ("f / \"", "full screen / log pane"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{keys:>28}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_status(f: &mut Frame, area: Rect, app: &mut App) {
    if area.height == 0 {
        return;
    }
    let filters = app.state.filters.clone();
    let editing = app.state.editing_search;
    let error = app.state.last_error.clone();

    let mut spans = Vec::new();
    if editing || !filters.search_text.is_empty() {
        let cursor = if editing { "_" } else { "" };
        spans.push(Span::styled(
            format!(" /{}{cursor} ", filters.search_text),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
    }
    for (label, value) in [
        ("conf", &filters.conference),
        ("class", &filters.class_year),
        ("team", &filters.team),
    ] {
        if let Some(v) = value {
            spans.push(Span::raw(format!(" {label}:{v}")));
        }
    }

    if let Some(kind) = app.state.active_tab.kind() {
        let table = app.table(kind);
        let games = if table.games_minimum_waived() {
            format!("G≥{} (waived)", filters.min_games_played)
        } else {
            format!("G≥{}", filters.min_games_played)
        };
        let minutes = match kind {
            RecordKind::Player => format!(" Min%≥{:.0}", filters.min_minutes_pct),
            RecordKind::Team => String::new(),
        };
        spans.push(Span::styled(
            format!(" {minutes} {games} | {} shown of {} qualified", table.rows.len(), table.qualified_count),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(err) = error {
        spans.push(Span::styled(format!("  {err}"), Style::default().fg(Color::Red)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(widget, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
