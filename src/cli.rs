use clap::{Parser, ValueEnum};
use courtside_engine::RecordKind;
use courtside_engine::filter::{DEFAULT_MIN_GAMES_PLAYED, DEFAULT_MIN_MINUTES_PCT, FilterState};
use courtside_engine::rank::{Direction, SortState};

use crate::state::app_state::default_sort;

#[derive(Debug, Parser)]
#[command(
    name = "courtside",
    version,
    about = "College basketball stat tables, graded and ranked against the qualified field",
    after_help = "Environment:
  COURTSIDE_PLAYERS_JSON     Local player season snapshot (positional rows)
  COURTSIDE_TEAM_STATS_JSON  Local team season snapshot (positional rows)
  COURTSIDE_TEAMS_JSON       Local ESPN teams listing
  COURTSIDE_ANALYTICS_URL    Analytics provider base URL
  COURTSIDE_ESPN_URL         ESPN API base URL
  COURTSIDE_LOG              Log level (error, warn, info, debug, trace)"
)]
pub struct Cli {
    /// Season, named for the year it ends in. Defaults to the current one.
    #[arg(long)]
    pub season: Option<u16>,

    /// Print one table to stdout and exit instead of starting the interface.
    #[arg(long, value_enum)]
    pub print: Option<PrintTarget>,

    /// Minimum share of team minutes played, in percent (players only).
    #[arg(long, default_value_t = DEFAULT_MIN_MINUTES_PCT)]
    pub min_minutes: f64,

    /// Minimum games played. Waived until someone has played ten.
    #[arg(long, default_value_t = DEFAULT_MIN_GAMES_PLAYED)]
    pub min_games: u32,

    #[arg(long)]
    pub conference: Option<String>,

    /// Class year facet, e.g. Fr, So, Jr, Sr.
    #[arg(long)]
    pub class_year: Option<String>,

    /// Team facet, as the analytics provider labels it.
    #[arg(long)]
    pub team: Option<String>,

    /// Whitespace-separated terms; every term must match.
    #[arg(long, short)]
    pub search: Option<String>,

    /// Sort field, e.g. bpm or turnover_pct. `none` keeps provider order.
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort ascending instead of descending.
    #[arg(long)]
    pub asc: bool,

    /// Rows printed with --print.
    #[arg(long, default_value_t = 25)]
    pub limit: usize,

    /// First row printed with --print.
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Never color --print output.
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrintTarget {
    Players,
    Teams,
    Standings,
}

impl PrintTarget {
    pub fn kind(&self) -> Option<RecordKind> {
        match self {
            PrintTarget::Players => Some(RecordKind::Player),
            PrintTarget::Teams => Some(RecordKind::Team),
            PrintTarget::Standings => None,
        }
    }
}

impl Cli {
    pub fn filters(&self, season: u16) -> FilterState {
        FilterState {
            min_minutes_pct: self.min_minutes,
            min_games_played: self.min_games,
            conference: self.conference.clone(),
            class_year: self.class_year.clone(),
            team: self.team.clone(),
            search_text: self.search.clone().unwrap_or_default(),
            season,
        }
    }

    /// Requested sort for `kind`, or that table's default.
    pub fn sort(&self, kind: RecordKind) -> SortState {
        let direction = if self.asc { Direction::Asc } else { Direction::Desc };
        match self.sort.as_deref() {
            Some("none") => SortState::unsorted(),
            Some(field) => SortState::by(field, direction),
            None if self.asc => SortState { direction, ..default_sort(kind) },
            None => default_sort(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_engine::fields::{BPM, TURNOVER_PCT};

    #[test]
    fn defaults_match_engine_defaults() {
        let cli = Cli::try_parse_from(["courtside"]).unwrap();
        let filters = cli.filters(2025);
        assert_eq!(filters, FilterState { season: 2025, ..FilterState::default() });
        assert_eq!(cli.sort(RecordKind::Player), SortState::by(BPM, Direction::Desc));
        assert!(cli.print.is_none());
    }

    #[test]
    fn print_mode_with_filters() {
        let cli = Cli::try_parse_from([
            "courtside", "--print", "players", "--season", "2024", "--conference", "Big Ten",
            "-s", "purdue", "--sort", "turnover_pct", "--asc", "--min-games", "0",
        ])
        .unwrap();
        assert_eq!(cli.print, Some(PrintTarget::Players));
        assert_eq!(cli.season, Some(2024));
        let filters = cli.filters(2024);
        assert_eq!(filters.conference.as_deref(), Some("Big Ten"));
        assert_eq!(filters.search_text, "purdue");
        assert_eq!(filters.min_games_played, 0);
        assert_eq!(cli.sort(RecordKind::Player), SortState::by(TURNOVER_PCT, Direction::Asc));
    }

    #[test]
    fn sort_none_keeps_provider_order() {
        let cli = Cli::try_parse_from(["courtside", "--sort", "none"]).unwrap();
        assert_eq!(cli.sort(RecordKind::Team).field, None);
    }

    #[test]
    fn unknown_print_target_is_rejected() {
        assert!(Cli::try_parse_from(["courtside", "--print", "schedule"]).is_err());
    }
}
