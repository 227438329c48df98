pub mod analytics;
pub mod client;
pub mod espn;
pub mod fields;
pub mod filter;
pub mod grade;
pub mod rank;
pub mod resolve;
pub mod season;
pub mod table;
pub mod thresholds;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of either provider's wire format
// ---------------------------------------------------------------------------

/// A single stat cell. Absent fields are null; non-finite numbers are treated
/// as null by every consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

impl StatValue {
    /// Numeric view of the cell. Text is parsed; NaN and infinities are dropped.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            StatValue::Number(n) => *n,
            StatValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    pub fn as_text(&self) -> String {
        match self {
            StatValue::Number(n) => n.to_string(),
            StatValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for StatValue {
    fn from(value: f64) -> Self {
        StatValue::Number(value)
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        StatValue::Text(value.to_owned())
    }
}

/// Named field extractor. Threshold profiling and grading work against this
/// rather than a concrete record type.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<&StatValue>;

    fn numeric(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(StatValue::as_f64)
    }
}

impl FieldSource for BTreeMap<String, StatValue> {
    fn field(&self, name: &str) -> Option<&StatValue> {
        self.get(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    #[default]
    Player,
    Team,
}

impl RecordKind {
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Player => "players",
            RecordKind::Team => "teams",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatRecord {
    pub name: String,
    pub team: String, // analytics-provider label, e.g. "Michigan St."
    pub conference: String,
    pub season: u16,
    pub class_year: Option<String>, // "Fr", "So", "Jr", "Sr"
    pub height: Option<String>,     // "6-8"
    pub stats: BTreeMap<String, StatValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStatRecord {
    pub team: String,
    pub team_id: Option<String>, // schedule-provider id, when known at decode time
    pub conference: String,
    pub season: u16,
    pub stats: BTreeMap<String, StatValue>,
}

/// One row of a season feed. Player and team feeds share the pipeline but not
/// the field set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StatRecord {
    Player(PlayerStatRecord),
    Team(TeamStatRecord),
}

impl StatRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            StatRecord::Player(_) => RecordKind::Player,
            StatRecord::Team(_) => RecordKind::Team,
        }
    }

    /// Stable identity used for global rank lookup.
    pub fn key(&self) -> String {
        match self {
            StatRecord::Player(p) => format!("player:{}|{}", p.name, p.team),
            StatRecord::Team(t) => match &t.team_id {
                Some(id) => format!("team:{id}"),
                None => format!("team:{}", t.team),
            },
        }
    }

    /// Player name for player rows, team label for team rows.
    pub fn display_name(&self) -> &str {
        match self {
            StatRecord::Player(p) => &p.name,
            StatRecord::Team(t) => &t.team,
        }
    }

    pub fn team(&self) -> &str {
        match self {
            StatRecord::Player(p) => &p.team,
            StatRecord::Team(t) => &t.team,
        }
    }

    pub fn conference(&self) -> &str {
        match self {
            StatRecord::Player(p) => &p.conference,
            StatRecord::Team(t) => &t.conference,
        }
    }

    pub fn class_year(&self) -> Option<&str> {
        match self {
            StatRecord::Player(p) => p.class_year.as_deref(),
            StatRecord::Team(_) => None,
        }
    }

    pub fn season(&self) -> u16 {
        match self {
            StatRecord::Player(p) => p.season,
            StatRecord::Team(t) => t.season,
        }
    }

    pub fn stats(&self) -> &BTreeMap<String, StatValue> {
        match self {
            StatRecord::Player(p) => &p.stats,
            StatRecord::Team(t) => &t.stats,
        }
    }
}

impl FieldSource for StatRecord {
    fn field(&self, name: &str) -> Option<&StatValue> {
        self.stats().get(name)
    }
}

/// Everything fetched for one season and record kind. Replaced wholesale.
#[derive(Debug, Clone, Default)]
pub struct Population {
    pub season: u16,
    pub kind: RecordKind,
    pub records: Vec<Arc<StatRecord>>,
}

impl Population {
    pub fn new(season: u16, kind: RecordKind, records: Vec<StatRecord>) -> Self {
        Self {
            season,
            kind,
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Schedule-provider identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamIdentity {
    pub id: String,
    pub display_name: String, // "UConn Huskies"
    pub nickname: String,     // "UConn"
    pub abbreviation: String, // "CONN"
    pub conference: Option<String>,
    pub logos: Vec<LogoVariant>,
}

impl TeamIdentity {
    /// Preferred logo for a light or dark background, falling back to the
    /// first variant the provider listed.
    pub fn logo(&self, dark: bool) -> Option<&LogoVariant> {
        let wanted = if dark { "dark" } else { "default" };
        self.logos
            .iter()
            .find(|l| l.rel.iter().any(|r| r == wanted))
            .or_else(|| self.logos.first())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoVariant {
    pub href: String,
    pub rel: Vec<String>, // "full", "default", "dark", ...
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandingsEntry {
    pub team: TeamIdentity,
    pub conference: String,
    pub wins: u16,
    pub losses: u16,
    pub conference_wins: u16,
    pub conference_losses: u16,
}

impl StandingsEntry {
    pub fn win_pct(&self) -> Option<f64> {
        ratio(self.wins, self.losses)
    }

    pub fn conference_win_pct(&self) -> Option<f64> {
        ratio(self.conference_wins, self.conference_losses)
    }
}

fn ratio(wins: u16, losses: u16) -> Option<f64> {
    let games = u32::from(wins) + u32::from(losses);
    (games > 0).then(|| f64::from(wins) / games as f64)
}
