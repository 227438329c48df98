use crate::fields::{GAMES_PLAYED, MINUTES_PCT};
use crate::resolve::TeamDirectory;
use crate::{FieldSource, StatRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Early-season cutoff: while nobody has played this many games, the games
/// requirement is waived.
pub const EARLY_SEASON_MAX_GAMES: f64 = 10.0;

pub const DEFAULT_MIN_MINUTES_PCT: f64 = 40.0;
pub const DEFAULT_MIN_GAMES_PLAYED: u32 = 5;

/// User-selected eligibility and facets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub min_minutes_pct: f64,
    pub min_games_played: u32,
    pub conference: Option<String>,
    pub class_year: Option<String>,
    pub team: Option<String>,
    pub search_text: String,
    pub season: u16,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            min_minutes_pct: DEFAULT_MIN_MINUTES_PCT,
            min_games_played: DEFAULT_MIN_GAMES_PLAYED,
            conference: None,
            class_year: None,
            team: None,
            search_text: String::new(),
            season: 0,
        }
    }
}

impl FilterState {
    /// True when two states select the same qualified population, i.e. only
    /// facets or search differ.
    pub fn same_eligibility(&self, other: &FilterState) -> bool {
        self.min_minutes_pct == other.min_minutes_pct
            && self.min_games_played == other.min_games_played
            && self.season == other.season
    }
}

// ---------------------------------------------------------------------------
// Qualification
// ---------------------------------------------------------------------------

/// The configured games minimum, or 0 when the season is too young for it.
pub fn effective_min_games(population: &[Arc<StatRecord>], min_games_played: u32) -> u32 {
    let max_games = population
        .iter()
        .filter_map(|r| r.numeric(GAMES_PLAYED))
        .fold(f64::NEG_INFINITY, f64::max);
    if max_games < EARLY_SEASON_MAX_GAMES { 0 } else { min_games_played }
}

fn qualifies(record: &StatRecord, min_minutes_pct: f64, min_games: u32) -> bool {
    let minutes_ok = match record {
        StatRecord::Player(_) => record.numeric(MINUTES_PCT).is_some_and(|m| m >= min_minutes_pct),
        // Team rows always play every minute.
        StatRecord::Team(_) => true,
    };
    let games_ok = min_games == 0
        || record.numeric(GAMES_PLAYED).is_some_and(|g| g >= f64::from(min_games));
    minutes_ok && games_ok
}

/// Records eligible for the statistical baseline and global ranking.
pub fn qualified(population: &[Arc<StatRecord>], filters: &FilterState) -> Vec<Arc<StatRecord>> {
    let min_games = effective_min_games(population, filters.min_games_played);
    population
        .iter()
        .filter(|r| qualifies(r, filters.min_minutes_pct, min_games))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Facets and search
// ---------------------------------------------------------------------------

/// Lowercased search tokens. Empty query → no tokens → everything matches.
pub fn search_tokens(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// Text a record can be found by: name, raw team label, and the resolved
/// team's nickname, display name and alias labels.
pub fn search_haystack(record: &StatRecord, teams: &TeamDirectory) -> String {
    let mut haystack = format!("{} {}", record.display_name(), record.team()).to_lowercase();
    if let Some(team) = teams.resolve(record.team()) {
        haystack.push(' ');
        haystack.push_str(&teams.search_terms(team));
    }
    haystack
}

pub fn matches_search(haystack: &str, tokens: &[String]) -> bool {
    tokens.iter().all(|t| haystack.contains(t.as_str()))
}

fn facet_matches(value: Option<&str>, wanted: &Option<String>) -> bool {
    match wanted {
        None => true,
        Some(w) => value == Some(w.as_str()),
    }
}

/// Conference, class year, team, then search, applied over the qualified set.
/// Order of `qualified` is preserved.
pub fn displayed(
    qualified: &[Arc<StatRecord>],
    filters: &FilterState,
    teams: &TeamDirectory,
) -> Vec<Arc<StatRecord>> {
    let tokens = search_tokens(&filters.search_text);
    qualified
        .iter()
        .filter(|r| facet_matches(Some(r.conference()), &filters.conference))
        .filter(|r| facet_matches(r.class_year(), &filters.class_year))
        .filter(|r| facet_matches(Some(r.team()), &filters.team))
        .filter(|r| tokens.is_empty() || matches_search(&search_haystack(r, teams), &tokens))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlayerStatRecord, StatValue, TeamIdentity, TeamStatRecord};

    fn player(name: &str, team: &str, conf: &str, year: &str, minutes: f64, games: f64) -> Arc<StatRecord> {
        Arc::new(StatRecord::Player(PlayerStatRecord {
            name: name.into(),
            team: team.into(),
            conference: conf.into(),
            class_year: Some(year.into()),
            stats: [
                (MINUTES_PCT.to_owned(), StatValue::Number(minutes)),
                (GAMES_PLAYED.to_owned(), StatValue::Number(games)),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        }))
    }

    fn names(records: &[Arc<StatRecord>]) -> Vec<&str> {
        records.iter().map(|r| r.display_name()).collect()
    }

    fn directory() -> TeamDirectory {
        TeamDirectory::with_default_aliases(vec![
            TeamIdentity {
                id: "41".into(),
                display_name: "UConn Huskies".into(),
                nickname: "UConn".into(),
                ..Default::default()
            },
            TeamIdentity {
                id: "150".into(),
                display_name: "Duke Blue Devils".into(),
                nickname: "Duke".into(),
                ..Default::default()
            },
        ])
    }

    #[test]
    fn minutes_and_games_both_required() {
        let pop = vec![
            player("A", "Duke", "ACC", "Fr", 60.0, 20.0),
            player("B", "Duke", "ACC", "Fr", 30.0, 20.0),
            player("C", "Duke", "ACC", "Fr", 60.0, 3.0),
        ];
        let q = qualified(&pop, &FilterState::default());
        assert_eq!(names(&q), ["A"]);
    }

    #[test]
    fn early_season_waives_games_requirement() {
        let pop = vec![
            player("A", "Duke", "ACC", "Fr", 60.0, 2.0),
            player("B", "Duke", "ACC", "Fr", 60.0, 9.0),
        ];
        assert_eq!(effective_min_games(&pop, 25), 0);
        let filters = FilterState { min_games_played: 25, ..Default::default() };
        assert_eq!(qualified(&pop, &filters).len(), 2);
    }

    #[test]
    fn ten_games_restores_requirement() {
        let pop = vec![
            player("A", "Duke", "ACC", "Fr", 60.0, 10.0),
            player("B", "Duke", "ACC", "Fr", 60.0, 2.0),
        ];
        assert_eq!(effective_min_games(&pop, 5), 5);
        assert_eq!(names(&qualified(&pop, &FilterState::default())), ["A"]);
    }

    #[test]
    fn empty_population_is_empty_not_an_error() {
        assert_eq!(effective_min_games(&[], 12), 0);
        assert!(qualified(&[], &FilterState::default()).is_empty());
        assert!(displayed(&[], &FilterState::default(), &directory()).is_empty());
    }

    #[test]
    fn missing_minutes_does_not_qualify_a_player() {
        let no_minutes = Arc::new(StatRecord::Player(PlayerStatRecord {
            name: "X".into(),
            ..Default::default()
        }));
        assert!(qualified(&[no_minutes], &FilterState::default()).is_empty());
    }

    #[test]
    fn teams_skip_the_minutes_check() {
        let team = Arc::new(StatRecord::Team(TeamStatRecord {
            team: "Duke".into(),
            stats: [(GAMES_PLAYED.to_owned(), StatValue::Number(30.0))].into_iter().collect(),
            ..Default::default()
        }));
        assert_eq!(qualified(&[team], &FilterState::default()).len(), 1);
    }

    #[test]
    fn facets_apply_in_sequence() {
        let pop = vec![
            player("A", "Duke", "ACC", "Fr", 60.0, 20.0),
            player("B", "Duke", "ACC", "Sr", 60.0, 20.0),
            player("C", "Connecticut", "BE", "Fr", 60.0, 20.0),
        ];
        let dir = directory();
        let filters = FilterState { conference: Some("ACC".into()), class_year: Some("Fr".into()), ..Default::default() };
        assert_eq!(names(&displayed(&pop, &filters, &dir)), ["A"]);
        let filters = FilterState { team: Some("Connecticut".into()), ..Default::default() };
        assert_eq!(names(&displayed(&pop, &filters, &dir)), ["C"]);
    }

    #[test]
    fn search_requires_every_token() {
        let pop = vec![
            player("Cooper Flagg", "Duke", "ACC", "Fr", 60.0, 20.0),
            player("Cooper Smith", "Connecticut", "BE", "Fr", 60.0, 20.0),
        ];
        let dir = directory();
        let filters = FilterState { search_text: "cooper  DUKE".into(), ..Default::default() };
        assert_eq!(names(&displayed(&pop, &filters, &dir)), ["Cooper Flagg"]);
    }

    #[test]
    fn search_reaches_resolved_team_names_and_aliases() {
        let pop = vec![
            player("Alex Karaban", "Connecticut", "BE", "Jr", 60.0, 20.0),
            player("Tyrese Proctor", "Duke", "ACC", "Jr", 60.0, 20.0),
        ];
        let dir = directory();
        for query in ["huskies", "uconn", "conn"] {
            let filters = FilterState { search_text: query.into(), ..Default::default() };
            assert_eq!(names(&displayed(&pop, &filters, &dir)), ["Alex Karaban"], "query {query}");
        }
        let filters = FilterState { search_text: "blue devils".into(), ..Default::default() };
        assert_eq!(names(&displayed(&pop, &filters, &dir)), ["Tyrese Proctor"]);
    }

    #[test]
    fn eligibility_comparison_ignores_facets() {
        let a = FilterState::default();
        let b = FilterState { search_text: "duke".into(), conference: Some("ACC".into()), ..Default::default() };
        assert!(a.same_eligibility(&b));
        let c = FilterState { min_minutes_pct: 10.0, ..Default::default() };
        assert!(!a.same_eligibility(&c));
    }
}
