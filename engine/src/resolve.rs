//! Reconciles analytics-provider team labels ("Connecticut", "Michigan St.")
//! with schedule-provider identities ("UConn Huskies").

use crate::TeamIdentity;
use log::debug;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

/// Curated lowercase label → canonical nickname or display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys are stored lowercased and trimmed.
    pub fn insert(&mut self, label: &str, canonical: &str) {
        self.entries.insert(label.trim().to_lowercase(), canonical.to_owned());
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(&label.trim().to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Alias labels whose canonical value names `team`.
    pub fn labels_for<'a>(&'a self, team: &'a TeamIdentity) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(_, canonical)| names_team(team, canonical))
            .map(|(label, _)| label.as_str())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for AliasTable {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut table = AliasTable::new();
        for (label, canonical) in iter {
            table.insert(label, canonical);
        }
        table
    }
}

/// Known naming mismatches between the two providers.
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("connecticut", "uconn"),
    ("north carolina st.", "nc state"),
    ("miami fl", "miami"),
    ("miami oh", "miami (oh)"),
    ("mississippi", "ole miss"),
    ("louisiana st.", "lsu"),
    ("southern california", "usc"),
    ("brigham young", "byu"),
    ("central florida", "ucf"),
    ("southern methodist", "smu"),
    ("texas christian", "tcu"),
    ("virginia commonwealth", "vcu"),
    ("nevada las vegas", "unlv"),
    ("maryland baltimore county", "umbc"),
    ("florida international", "fiu"),
    ("illinois chicago", "uic"),
    ("tennessee martin", "ut martin"),
    ("arkansas little rock", "little rock"),
    ("umkc", "kansas city"),
    ("ipfw", "purdue fort wayne"),
    ("detroit", "detroit mercy"),
    ("liu brooklyn", "long island university"),
    ("cal st. bakersfield", "cal state bakersfield"),
    ("texas a&m corpus chris", "texas a&m-corpus christi"),
    ("penn", "pennsylvania"),
];

pub fn default_aliases() -> AliasTable {
    DEFAULT_ALIASES.iter().copied().collect()
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// How a label was matched, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    Alias,
    Nickname,
    DisplayName,
    TokenPrefix,
}

fn names_team(team: &TeamIdentity, name: &str) -> bool {
    team.nickname.eq_ignore_ascii_case(name) || team.display_name.eq_ignore_ascii_case(name)
}

/// Lowercase, drop `.`, `'`, `(`, `)`, spell out `&`, split hyphens, then
/// split on whitespace.
pub fn normalize_tokens(name: &str) -> Vec<String> {
    let mut cleaned = String::with_capacity(name.len());
    for ch in name.chars().flat_map(char::to_lowercase) {
        match ch {
            '.' | '\'' | '(' | ')' => {}
            '&' => cleaned.push_str(" and "),
            '-' => cleaned.push(' '),
            c => cleaned.push(c),
        }
    }
    cleaned.split_whitespace().map(str::to_owned).collect()
}

fn token_prefix_match(input: &[String], team: &TeamIdentity) -> bool {
    let mut candidate = normalize_tokens(&team.display_name);
    candidate.extend(normalize_tokens(&team.nickname));
    input
        .iter()
        .all(|token| candidate.iter().any(|c| c.starts_with(token.as_str())))
}

/// Resolve `name` against `candidates`. Pure: the same inputs always give the
/// same answer. The first candidate in slice order wins within a strategy.
pub fn resolve<'a>(
    name: &str,
    aliases: &AliasTable,
    candidates: &'a [TeamIdentity],
) -> Option<(&'a TeamIdentity, MatchKind)> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(canonical) = aliases.get(trimmed)
        && let Some(team) = candidates.iter().find(|t| names_team(t, canonical))
    {
        return Some((team, MatchKind::Alias));
    }

    if let Some(team) = candidates.iter().find(|t| t.nickname.eq_ignore_ascii_case(trimmed)) {
        return Some((team, MatchKind::Nickname));
    }

    if let Some(team) = candidates.iter().find(|t| t.display_name.eq_ignore_ascii_case(trimmed)) {
        return Some((team, MatchKind::DisplayName));
    }

    let tokens = normalize_tokens(trimmed);
    if tokens.is_empty() {
        return None;
    }
    let found = candidates.iter().find(|t| token_prefix_match(&tokens, t));
    if found.is_none() {
        debug!("unresolved team label {trimmed:?}");
    }
    found.map(|t| (t, MatchKind::TokenPrefix))
}

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// Schedule-provider teams plus the alias table used to reach them.
///
/// Contents never change after construction. Each directory gets its own
/// `revision`, and label lookups are memoized for the directory's lifetime.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    teams: Vec<TeamIdentity>,
    aliases: AliasTable,
    revision: u64,
    resolved: RefCell<HashMap<String, Option<usize>>>,
    misses: Cell<u64>,
}

impl TeamDirectory {
    pub fn new(teams: Vec<TeamIdentity>, aliases: AliasTable) -> Self {
        Self {
            teams,
            aliases,
            revision: NEXT_REVISION.fetch_add(1, Ordering::Relaxed),
            resolved: RefCell::default(),
            misses: Cell::new(0),
        }
    }

    pub fn with_default_aliases(teams: Vec<TeamIdentity>) -> Self {
        Self::new(teams, default_aliases())
    }

    pub fn teams(&self) -> &[TeamIdentity] {
        &self.teams
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Identifies this directory's contents. Distinct for every `new`.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Memoized `resolve` over this directory.
    pub fn resolve(&self, name: &str) -> Option<&TeamIdentity> {
        let cached = self.resolved.borrow().get(name).copied();
        let index = match cached {
            Some(index) => index,
            None => {
                self.misses.set(self.misses.get() + 1);
                let index = resolve(name, &self.aliases, &self.teams)
                    .and_then(|(team, _)| self.teams.iter().position(|t| std::ptr::eq(t, team)));
                self.resolved.borrow_mut().insert(name.to_owned(), index);
                index
            }
        };
        index.and_then(|i| self.teams.get(i))
    }

    /// Labels resolved from scratch rather than from the memo.
    pub fn misses(&self) -> u64 {
        self.misses.get()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&TeamIdentity> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Lowercased search text for a team: nickname, display name and every
    /// alias label pointing at it.
    pub fn search_terms(&self, team: &TeamIdentity) -> String {
        let mut terms = vec![team.nickname.to_lowercase(), team.display_name.to_lowercase()];
        terms.extend(self.aliases.labels_for(team).map(str::to_owned));
        terms.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str, display_name: &str, nickname: &str) -> TeamIdentity {
        TeamIdentity {
            id: id.into(),
            display_name: display_name.into(),
            nickname: nickname.into(),
            ..Default::default()
        }
    }

    fn candidates() -> Vec<TeamIdentity> {
        vec![
            team("150", "Duke Blue Devils", "Duke"),
            team("41", "UConn Huskies", "UConn"),
            team("127", "Michigan State Spartans", "Michigan State"),
            team("130", "Michigan Wolverines", "Michigan"),
            team("2608", "Saint Mary's Gaels", "Saint Mary's"),
            team("245", "Texas A&M Aggies", "Texas A&M"),
            team("2390", "Miami Hurricanes", "Miami"),
            team("193", "Miami (OH) RedHawks", "Miami (OH)"),
        ]
    }

    #[test]
    fn alias_resolves_connecticut_in_any_case() {
        let teams = candidates();
        let aliases = default_aliases();
        for label in ["Connecticut", "CONNECTICUT", " connecticut "] {
            let (t, how) = resolve(label, &aliases, &teams).unwrap();
            assert_eq!(t.id, "41");
            assert_eq!(how, MatchKind::Alias);
        }
    }

    #[test]
    fn nickname_beats_display_name_and_tokens() {
        let teams = candidates();
        let (t, how) = resolve("michigan", &AliasTable::new(), &teams).unwrap();
        assert_eq!(t.id, "130");
        assert_eq!(how, MatchKind::Nickname);
    }

    #[test]
    fn display_name_exact_match() {
        let teams = candidates();
        let (t, how) = resolve("duke blue devils", &AliasTable::new(), &teams).unwrap();
        assert_eq!(t.id, "150");
        assert_eq!(how, MatchKind::DisplayName);
    }

    #[test]
    fn abbreviated_state_matches_by_token_prefix() {
        let teams = candidates();
        let (t, how) = resolve("Michigan St.", &AliasTable::new(), &teams).unwrap();
        assert_eq!(t.id, "127");
        assert_eq!(how, MatchKind::TokenPrefix);
    }

    #[test]
    fn punctuation_and_ampersand_are_normalized() {
        assert_eq!(normalize_tokens("Texas A&M-Corpus Christi"), ["texas", "a", "and", "m", "corpus", "christi"]);
        assert_eq!(normalize_tokens("St. John's (NY)"), ["st", "johns", "ny"]);

        let teams = candidates();
        let (t, _) = resolve("Saint Marys", &AliasTable::new(), &teams).unwrap();
        assert_eq!(t.id, "2608");
    }

    #[test]
    fn alias_to_missing_team_falls_through() {
        let teams = candidates();
        let aliases: AliasTable = [("duke", "Nonexistent")].into_iter().collect();
        let (t, how) = resolve("Duke", &aliases, &teams).unwrap();
        assert_eq!(t.id, "150");
        assert_eq!(how, MatchKind::Nickname);
    }

    #[test]
    fn miami_alias_picks_the_right_miami() {
        let teams = candidates();
        let aliases = default_aliases();
        assert_eq!(resolve("Miami FL", &aliases, &teams).unwrap().0.id, "2390");
        assert_eq!(resolve("Miami OH", &aliases, &teams).unwrap().0.id, "193");
    }

    #[test]
    fn unknown_and_blank_labels_are_unresolved() {
        let teams = candidates();
        assert!(resolve("Gonzaga", &default_aliases(), &teams).is_none());
        assert!(resolve("   ", &default_aliases(), &teams).is_none());
        assert!(resolve("...", &default_aliases(), &teams).is_none());
    }

    #[test]
    fn resolution_is_deterministic() {
        let teams = candidates();
        let aliases = default_aliases();
        let first = resolve("Mich", &aliases, &teams).map(|(t, _)| t.id.clone());
        for _ in 0..10 {
            assert_eq!(resolve("Mich", &aliases, &teams).map(|(t, _)| t.id.clone()), first);
        }
        // Token-prefix ties go to the earliest candidate.
        assert_eq!(first.as_deref(), Some("127"));
    }

    #[test]
    fn search_terms_include_alias_labels() {
        let dir = TeamDirectory::with_default_aliases(candidates());
        let uconn = dir.find_by_id("41").unwrap();
        let terms = dir.search_terms(uconn);
        assert!(terms.contains("connecticut"));
        assert!(terms.contains("uconn huskies"));
    }

    #[test]
    fn directory_lookups_are_memoized() {
        let dir = TeamDirectory::with_default_aliases(candidates());
        for _ in 0..3 {
            assert_eq!(dir.resolve("Connecticut").map(|t| t.id.as_str()), Some("41"));
            assert!(dir.resolve("Gonzaga").is_none());
        }
        assert_eq!(dir.misses(), 2);

        assert_eq!(dir.resolve("Michigan St.").map(|t| t.id.as_str()), Some("127"));
        assert_eq!(dir.misses(), 3);
    }

    #[test]
    fn every_directory_has_its_own_revision() {
        let a = TeamDirectory::with_default_aliases(candidates());
        let b = TeamDirectory::with_default_aliases(candidates());
        assert_ne!(a.revision(), b.revision());
        assert_eq!(a.clone().revision(), a.revision());
    }
}
