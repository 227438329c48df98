use crate::fields::is_lower_better;
use crate::{StandingsEntry, StatRecord, StatValue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

/// Active sort. `field == None` keeps the input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    pub field: Option<String>,
    pub direction: Direction,
}

impl SortState {
    pub fn by(field: &str, direction: Direction) -> Self {
        Self { field: Some(field.to_owned()), direction }
    }

    pub fn unsorted() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Comparator
// ---------------------------------------------------------------------------

/// Sort key of `field` on `record`. Identity columns are addressable by name
/// so the table can sort on them like any stat.
pub fn sort_value<'a>(record: &'a StatRecord, field: &str) -> Option<SortValue<'a>> {
    match field {
        "name" => Some(SortValue::Text(record.display_name())),
        "team" => Some(SortValue::Text(record.team())),
        "conference" => Some(SortValue::Text(record.conference())),
        "class_year" => record.class_year().map(SortValue::Text),
        _ => match record.stats().get(field)? {
            StatValue::Number(n) => n.is_finite().then_some(SortValue::Number(*n)),
            StatValue::Text(s) => Some(match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => SortValue::Number(n),
                _ => SortValue::Text(s.as_str()),
            }),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Number(f64),
    Text(&'a str),
}

fn text_of(value: &SortValue<'_>) -> String {
    match value {
        SortValue::Number(n) => n.to_string(),
        SortValue::Text(s) => (*s).to_owned(),
    }
}

/// Case-insensitive, then byte order.
fn text_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn value_cmp(a: &SortValue<'_>, b: &SortValue<'_>) -> Ordering {
    match (a, b) {
        (SortValue::Number(x), SortValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        _ => text_cmp(&text_of(a), &text_of(b)),
    }
}

/// Null-last, lower-is-better aware comparison. `Desc` means best first for
/// every field.
pub fn compare(a: &StatRecord, b: &StatRecord, field: &str, direction: Direction) -> Ordering {
    match (sort_value(a, field), sort_value(b, field)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let mut ord = value_cmp(&x, &y);
            if is_lower_better(field) {
                ord = ord.reverse();
            }
            if direction == Direction::Desc {
                ord = ord.reverse();
            }
            ord
        }
    }
}

/// Stable sort under `sort`. Returns the input order when no field is set.
pub fn sorted(records: &[Arc<StatRecord>], sort: &SortState) -> Vec<Arc<StatRecord>> {
    let mut out = records.to_vec();
    if let Some(field) = &sort.field {
        out.sort_by(|a, b| compare(a, b, field, sort.direction));
    }
    out
}

// ---------------------------------------------------------------------------
// Global rank
// ---------------------------------------------------------------------------

/// 1-based positions of the qualified population under `sort`, keyed by
/// `StatRecord::key`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankMap {
    ranks: HashMap<String, usize>,
}

impl RankMap {
    pub fn compute(qualified: &[Arc<StatRecord>], sort: &SortState) -> Self {
        let mut ranks = HashMap::with_capacity(qualified.len());
        for (i, record) in sorted(qualified, sort).iter().enumerate() {
            // First occurrence wins if a provider ever repeats a row.
            ranks.entry(record.key()).or_insert(i + 1);
        }
        Self { ranks }
    }

    pub fn get(&self, record: &StatRecord) -> Option<usize> {
        self.ranks.get(&record.key()).copied()
    }

    /// Global rank, or the displayed position when the record is unknown.
    pub fn rank_or(&self, record: &StatRecord, displayed_index: usize) -> usize {
        self.get(record).unwrap_or(displayed_index + 1)
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Conference standings
// ---------------------------------------------------------------------------

fn standings_cmp(a: &StandingsEntry, b: &StandingsEntry) -> Ordering {
    let pct = |e: &StandingsEntry| e.conference_win_pct();
    match (pct(a), pct(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
    }
    .then_with(|| b.conference_wins.cmp(&a.conference_wins))
    .then_with(|| {
        let overall = |e: &StandingsEntry| e.win_pct().unwrap_or(0.0);
        overall(b).partial_cmp(&overall(a)).unwrap_or(Ordering::Equal)
    })
}

/// Group by conference (alphabetical) and order each group best first.
/// Equal conference win percentages are separated by raw conference wins.
pub fn conference_standings(entries: Vec<StandingsEntry>) -> BTreeMap<String, Vec<StandingsEntry>> {
    let mut groups: BTreeMap<String, Vec<StandingsEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.conference.clone()).or_default().push(entry);
    }
    for group in groups.values_mut() {
        group.sort_by(standings_cmp);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{OFFENSIVE_RATING, TURNOVER_PCT};
    use crate::{PlayerStatRecord, TeamIdentity};

    fn rec(name: &str, field: &str, value: Option<f64>) -> Arc<StatRecord> {
        let mut stats = BTreeMap::new();
        if let Some(v) = value {
            stats.insert(field.to_owned(), StatValue::Number(v));
        }
        Arc::new(StatRecord::Player(PlayerStatRecord { name: name.into(), stats, ..Default::default() }))
    }

    fn names(records: &[Arc<StatRecord>]) -> Vec<&str> {
        records.iter().map(|r| r.display_name()).collect()
    }

    #[test]
    fn low_turnover_rate_ranks_first_descending() {
        let pop = vec![rec("A", TURNOVER_PCT, Some(30.0)), rec("B", TURNOVER_PCT, Some(10.0))];
        let out = sorted(&pop, &SortState::by(TURNOVER_PCT, Direction::Desc));
        assert_eq!(names(&out), ["B", "A"]);
        let out = sorted(&pop, &SortState::by(TURNOVER_PCT, Direction::Asc));
        assert_eq!(names(&out), ["A", "B"]);
    }

    #[test]
    fn higher_is_better_descending() {
        let pop = vec![
            rec("A", OFFENSIVE_RATING, Some(101.0)),
            rec("B", OFFENSIVE_RATING, Some(120.0)),
            rec("C", OFFENSIVE_RATING, Some(95.5)),
        ];
        let out = sorted(&pop, &SortState::by(OFFENSIVE_RATING, Direction::Desc));
        assert_eq!(names(&out), ["B", "A", "C"]);
    }

    #[test]
    fn nulls_sort_last_both_ways() {
        let pop = vec![
            rec("none", OFFENSIVE_RATING, None),
            rec("nan", OFFENSIVE_RATING, Some(f64::NAN)),
            rec("low", OFFENSIVE_RATING, Some(90.0)),
            rec("high", OFFENSIVE_RATING, Some(110.0)),
        ];
        for direction in [Direction::Asc, Direction::Desc] {
            let out = sorted(&pop, &SortState::by(OFFENSIVE_RATING, direction));
            assert_eq!(&names(&out)[2..], ["none", "nan"], "{direction:?}");
        }
    }

    #[test]
    fn no_field_keeps_input_order() {
        let pop = vec![
            rec("C", OFFENSIVE_RATING, Some(1.0)),
            rec("A", OFFENSIVE_RATING, Some(3.0)),
            rec("B", OFFENSIVE_RATING, Some(2.0)),
        ];
        assert_eq!(names(&sorted(&pop, &SortState::unsorted())), ["C", "A", "B"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let pop = vec![
            rec("first", OFFENSIVE_RATING, Some(100.0)),
            rec("second", OFFENSIVE_RATING, Some(100.0)),
        ];
        for direction in [Direction::Asc, Direction::Desc] {
            let out = sorted(&pop, &SortState::by(OFFENSIVE_RATING, direction));
            assert_eq!(names(&out), ["first", "second"]);
        }
    }

    #[test]
    fn text_fields_compare_case_insensitively() {
        let pop = vec![rec("bob", "x", None), rec("Alice", "x", None), rec("carl", "x", None)];
        let out = sorted(&pop, &SortState::by("name", Direction::Asc));
        assert_eq!(names(&out), ["Alice", "bob", "carl"]);
    }

    #[test]
    fn numeric_text_compares_numerically() {
        let mut a = PlayerStatRecord { name: "a".into(), ..Default::default() };
        a.stats.insert("points".into(), StatValue::from("9.5"));
        let mut b = PlayerStatRecord { name: "b".into(), ..Default::default() };
        b.stats.insert("points".into(), StatValue::from("12"));
        let pop = vec![Arc::new(StatRecord::Player(a)), Arc::new(StatRecord::Player(b))];
        let out = sorted(&pop, &SortState::by("points", Direction::Desc));
        assert_eq!(names(&out), ["b", "a"]);
    }

    #[test]
    fn rank_map_is_one_based_and_falls_back() {
        let pop = vec![
            rec("A", OFFENSIVE_RATING, Some(100.0)),
            rec("B", OFFENSIVE_RATING, Some(110.0)),
        ];
        let ranks = RankMap::compute(&pop, &SortState::by(OFFENSIVE_RATING, Direction::Desc));
        assert_eq!(ranks.get(&pop[1]), Some(1));
        assert_eq!(ranks.get(&pop[0]), Some(2));
        let stranger = rec("Z", OFFENSIVE_RATING, Some(1.0));
        assert_eq!(ranks.rank_or(&stranger, 6), 7);
    }

    fn standing(name: &str, conf: &str, wins: u16, losses: u16, cw: u16, cl: u16) -> StandingsEntry {
        StandingsEntry {
            team: TeamIdentity { id: name.into(), nickname: name.into(), ..Default::default() },
            conference: conf.into(),
            wins,
            losses,
            conference_wins: cw,
            conference_losses: cl,
        }
    }

    #[test]
    fn standings_break_pct_ties_by_wins() {
        let groups = conference_standings(vec![
            standing("few", "ACC", 20, 5, 3, 1),
            standing("many", "ACC", 22, 7, 12, 4),
            standing("best", "ACC", 25, 3, 15, 1),
            standing("idle", "ACC", 2, 0, 0, 0),
            standing("other", "SEC", 10, 10, 5, 5),
        ]);
        let acc: Vec<&str> = groups["ACC"].iter().map(|e| e.team.id.as_str()).collect();
        assert_eq!(acc, ["best", "many", "few", "idle"]);
        assert_eq!(groups["SEC"].len(), 1);
    }
}
