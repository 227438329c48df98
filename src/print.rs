use crate::cli::{Cli, PrintTarget};
use crate::state::app_settings::AppSettings;
use crate::ui::columns::{self, clip, format_cell, pinned_cells, pinned_headers, pinned_widths, stat_columns};
use crate::ui::palette::band_rgb;
use anyhow::Context;
use courtside_engine::client::StatsClient;
use courtside_engine::grade::CellGrade;
use courtside_engine::rank::conference_standings;
use courtside_engine::resolve::TeamDirectory;
use courtside_engine::table::{TableModel, graded_fields};
use courtside_engine::StandingsEntry;
use crossterm::style::{Color, Stylize};
use crossterm::tty::IsTty;
use log::{info, warn};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Fetch, derive and print one table, then return.
pub async fn run(cli: &Cli, target: PrintTarget, season: u16, settings: &AppSettings) -> anyhow::Result<()> {
    let client = StatsClient::with_endpoints(settings.endpoints.clone());
    let color = !cli.no_color && io::stdout().is_tty();
    let mut out = io::stdout().lock();

    let Some(kind) = target.kind() else {
        let entries = client
            .fetch_standings(season)
            .await
            .with_context(|| format!("loading {season} standings"))?;
        write_standings(&mut out, &conference_standings(entries))?;
        return Ok(());
    };

    let teams = match client.fetch_teams().await {
        Ok(teams) => teams,
        Err(e) => {
            warn!("team directory unavailable, team names stay as published: {e}");
            Vec::new()
        }
    };
    let population = client
        .fetch_season(season, kind)
        .await
        .with_context(|| format!("loading {season} {}", kind.label()))?;
    info!("fetched {} {} for {season}", population.len(), kind.label());

    let directory = TeamDirectory::with_default_aliases(teams);
    let table = TableModel::derive(
        &population,
        &cli.filters(season),
        &cli.sort(kind),
        &directory,
        graded_fields(kind),
    );
    write_table(&mut out, &table, cli.offset, cli.limit, color)?;
    Ok(())
}

fn paint(text: String, grade: &CellGrade, color: bool) -> String {
    match band_rgb(grade.band) {
        Some(((br, bg, bb), (fr, fg, fb))) if color => text
            .with(Color::Rgb { r: fr, g: fg, b: fb })
            .on(Color::Rgb { r: br, g: bg, b: bb })
            .to_string(),
        _ => text,
    }
}

/// Rows `offset..offset + limit` of `table`, every stat column, one line each.
pub fn write_table<W: Write>(
    out: &mut W,
    table: &TableModel,
    offset: usize,
    limit: usize,
    color: bool,
) -> io::Result<()> {
    let columns = stat_columns(table.kind);
    let widths = pinned_widths();

    let mut header = String::new();
    for (h, w) in pinned_headers(table.kind).iter().zip(widths) {
        header.push_str(&format!("{:<w$} ", h, w = usize::from(w)));
    }
    for field in &columns {
        header.push_str(&format!("{:>w$} ", columns::header(field), w = usize::from(columns::width(field))));
    }
    writeln!(out, "{}", header.trim_end())?;

    let window = table.window(offset, limit, 0);
    for row in window.rows {
        let mut line = String::new();
        for (i, (text, w)) in pinned_cells(row).iter().zip(widths).enumerate() {
            let w = usize::from(w);
            if i == 0 {
                line.push_str(&format!("{:>x$}  ", clip(text, w - 1), x = w - 1));
            } else {
                line.push_str(&format!("{:<w$} ", clip(text, w)));
            }
        }
        for field in &columns {
            let grade = row.cell_bands.get(*field).copied().unwrap_or(CellGrade::NEUTRAL);
            let text = format!("{:>w$}", format_cell(&row.record, field), w = usize::from(columns::width(field)));
            line.push_str(&paint(text, &grade, color));
            line.push(' ');
        }
        writeln!(out, "{}", line.trim_end())?;
    }

    let waived = if table.games_minimum_waived() { " (games minimum waived)" } else { "" };
    if window.rows.is_empty() {
        writeln!(out, "none of {} shown, {} qualified{waived}", table.rows.len(), table.qualified_count)?;
    } else {
        writeln!(
            out,
            "{}-{} of {} shown, {} qualified{waived}",
            window.range.start + 1,
            window.range.end,
            table.rows.len(),
            table.qualified_count,
        )?;
    }
    Ok(())
}

pub fn write_standings<W: Write>(out: &mut W, standings: &BTreeMap<String, Vec<StandingsEntry>>) -> io::Result<()> {
    for (conference, entries) in standings {
        writeln!(out, "{conference:<28} {:>7} {:>7}", "Conf", "Overall")?;
        for entry in entries {
            writeln!(
                out,
                "  {:<26} {:>7} {:>7}",
                clip(&entry.team.display_name, 26),
                format!("{}-{}", entry.conference_wins, entry.conference_losses),
                format!("{}-{}", entry.wins, entry.losses),
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_engine::fields::{GAMES_PLAYED, MINUTES_PCT, OFFENSIVE_RATING};
    use courtside_engine::filter::FilterState;
    use courtside_engine::rank::{Direction, SortState};
    use courtside_engine::{PlayerStatRecord, Population, RecordKind, StatRecord, StatValue, TeamIdentity};

    fn population() -> Population {
        let records = (0..12)
            .map(|i| {
                StatRecord::Player(PlayerStatRecord {
                    name: format!("Player {i:02}"),
                    team: "Houston".into(),
                    conference: "B12".into(),
                    season: 2025,
                    stats: [
                        (OFFENSIVE_RATING, 95.0 + f64::from(i)),
                        (MINUTES_PCT, 55.0),
                        (GAMES_PLAYED, 4.0),
                    ]
                    .into_iter()
                    .map(|(k, v)| (k.to_owned(), StatValue::Number(v)))
                    .collect(),
                    ..Default::default()
                })
            })
            .collect();
        Population::new(2025, RecordKind::Player, records)
    }

    fn table() -> TableModel {
        TableModel::derive(
            &population(),
            &FilterState::default(),
            &SortState::by(OFFENSIVE_RATING, Direction::Desc),
            &TeamDirectory::default(),
            graded_fields(RecordKind::Player),
        )
    }

    #[test]
    fn prints_the_requested_slice() {
        let mut out = Vec::new();
        write_table(&mut out, &table(), 2, 3, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Rk"));
        assert!(lines[1].trim_start().starts_with("3 "));
        assert!(lines[1].contains("Player 09"));
        assert!(lines[3].contains("Player 07"));
        assert_eq!(lines[4], "3-5 of 12 shown, 12 qualified (games minimum waived)");
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn graded_cells_are_colored_on_request() {
        let mut out = Vec::new();
        write_table(&mut out, &table(), 0, 1, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('\u{1b}'));
    }

    #[test]
    fn empty_slice_still_reports_counts() {
        let mut out = Vec::new();
        write_table(&mut out, &table(), 50, 10, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("none of 12 shown, 12 qualified (games minimum waived)\n"));
    }

    #[test]
    fn zero_games_minimum_is_not_reported_as_waived() {
        let table = TableModel::derive(
            &population(),
            &FilterState { min_games_played: 0, ..FilterState::default() },
            &SortState::by(OFFENSIVE_RATING, Direction::Desc),
            &TeamDirectory::default(),
            graded_fields(RecordKind::Player),
        );
        let mut out = Vec::new();
        write_table(&mut out, &table, 0, 2, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("1-2 of 12 shown, 12 qualified\n"));
    }

    #[test]
    fn standings_print_by_conference() {
        let entry = |name: &str, cw, cl| StandingsEntry {
            team: TeamIdentity { display_name: name.into(), ..Default::default() },
            conference: "Big Ten".into(),
            wins: 20,
            losses: 10,
            conference_wins: cw,
            conference_losses: cl,
        };
        let standings = conference_standings(vec![entry("Purdue Boilermakers", 15, 5), entry("Michigan State Spartans", 17, 3)]);
        let mut out = Vec::new();
        write_standings(&mut out, &standings).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Big Ten"));
        assert!(lines[1].contains("Michigan State Spartans"));
        assert!(lines[1].contains("17-3"));
        assert!(lines[2].contains("Purdue"));
    }
}
