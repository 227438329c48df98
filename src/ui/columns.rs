use courtside_engine::fields::{self, *};
use courtside_engine::table::{RowView, graded_fields};
use courtside_engine::{FieldSource, RecordKind, StatRecord, StatValue};

pub const RANK_WIDTH: u16 = 4;
pub const NAME_WIDTH: u16 = 24;
pub const TEAM_WIDTH: u16 = 16;

/// Headers of the pinned (never scrolled) columns.
pub fn pinned_headers(kind: RecordKind) -> [&'static str; 3] {
    match kind {
        RecordKind::Player => ["Rk", "Player", "Team"],
        RecordKind::Team => ["Rk", "Team", "Conf"],
    }
}

pub fn pinned_widths() -> [u16; 3] {
    [RANK_WIDTH, NAME_WIDTH, TEAM_WIDTH]
}

/// Scrollable stat columns: volume first, then every graded field.
pub fn stat_columns(kind: RecordKind) -> Vec<&'static str> {
    let lead: &[&'static str] = match kind {
        RecordKind::Player => &[GAMES_PLAYED, MINUTES_PCT],
        RecordKind::Team => &[WINS, LOSSES],
    };
    lead.iter().chain(graded_fields(kind)).copied().collect()
}

pub fn header(field: &str) -> &str {
    match field {
        GAMES_PLAYED => "G",
        MINUTES_PCT => "Min%",
        WINS => "W",
        LOSSES => "L",
        OFFENSIVE_RATING => "ORtg",
        DEFENSIVE_RATING => "DRtg",
        ADJUSTED_OFFENSIVE_RATING => "AdjO",
        ADJUSTED_DEFENSIVE_RATING => "AdjD",
        ADJUSTED_TEMPO => "Tempo",
        BARTHAG => "Barthag",
        USAGE_RATE => "Usg",
        EFFECTIVE_FG_PCT => "eFG",
        TRUE_SHOOTING_PCT => "TS",
        OFFENSIVE_REBOUND_PCT => "OR%",
        DEFENSIVE_REBOUND_PCT => "DR%",
        ASSIST_PCT => "Ast%",
        TURNOVER_PCT => "TO%",
        STEAL_PCT => "Stl%",
        BLOCK_PCT => "Blk%",
        FREE_THROW_RATE => "FTR",
        FREE_THROW_PERCENTAGE => "FT%",
        TWO_PERCENTAGE => "2P%",
        THREE_PERCENTAGE => "3P%",
        RIM_PERCENTAGE => "Rim%",
        MID_PERCENTAGE => "Mid%",
        BPM => "BPM",
        OBPM => "OBPM",
        DBPM => "DBPM",
        POINTS => "Pts",
        REBOUNDS => "Reb",
        ASSISTS => "Ast",
        STEALS => "Stl",
        BLOCKS => "Blk",
        TURNOVERS => "TOV",
        other => other,
    }
}

pub fn width(field: &str) -> u16 {
    (header(field).len() as u16).max(6)
}

/// Display text for one stat cell; `-` for null.
pub fn format_cell(record: &StatRecord, field: &str) -> String {
    match record.field(field) {
        None => "-".to_string(),
        Some(StatValue::Text(s)) => s.clone(),
        Some(StatValue::Number(_)) => match record.numeric(field) {
            None => "-".to_string(),
            Some(v) if fields::is_percentage(field) => format!("{:.1}", v * 100.0),
            Some(v) if matches!(field, GAMES_PLAYED | WINS | LOSSES) => format!("{v:.0}"),
            Some(v) if field == BARTHAG => format!("{v:.3}"),
            Some(v) => format!("{v:.1}"),
        },
    }
}

/// Rank, name and team (or conference) text for a row.
pub fn pinned_cells(row: &RowView) -> [String; 3] {
    let third = match &*row.record {
        StatRecord::Player(p) => row
            .team
            .as_ref()
            .map(|t| t.nickname.clone())
            .unwrap_or_else(|| p.team.clone()),
        StatRecord::Team(t) => t.conference.clone(),
    };
    [row.rank.to_string(), row.record.display_name().to_owned(), third]
}

/// Scrollable columns that fit in `available` cells, starting no later than
/// `first` and always including `selected`. Returns the new first column and
/// the end of the visible range.
pub fn visible_columns(widths: &[u16], first: usize, selected: usize, available: u16) -> (usize, usize) {
    if widths.is_empty() {
        return (0, 0);
    }
    let selected = selected.min(widths.len() - 1);
    let span = |from: usize, to: usize| -> u32 { widths[from..=to].iter().map(|w| u32::from(*w) + 1).sum() };
    let mut first = first.min(selected);
    while first < selected && span(first, selected) > u32::from(available) {
        first += 1;
    }
    let mut end = selected + 1;
    while end < widths.len() && span(first, end) <= u32::from(available) {
        end += 1;
    }
    (first, end)
}

/// Cut `text` to `max` characters, marking the cut.
pub fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
