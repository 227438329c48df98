//! Stat field names shared by the decoders, the grader and the ranker.
//!
//! Fields whose name contains `percentage` are stored as 0–1 fractions and are
//! rescaled to 0–100 wherever they are profiled or graded. Every other rate
//! (`*_pct`, `*_rate`) already arrives in percent units.

pub const GAMES_PLAYED: &str = "games_played";
pub const MINUTES_PCT: &str = "minutes_pct";

pub const OFFENSIVE_RATING: &str = "offensive_rating";
pub const DEFENSIVE_RATING: &str = "defensive_rating";
pub const ADJUSTED_OFFENSIVE_RATING: &str = "adjusted_offensive_rating";
pub const ADJUSTED_DEFENSIVE_RATING: &str = "adjusted_defensive_rating";
pub const ADJUSTED_TEMPO: &str = "adjusted_tempo";
pub const BARTHAG: &str = "barthag";
pub const USAGE_RATE: &str = "usage_rate";
pub const EFFECTIVE_FG_PCT: &str = "effective_fg_pct";
pub const TRUE_SHOOTING_PCT: &str = "true_shooting_pct";

pub const OFFENSIVE_REBOUND_PCT: &str = "offensive_rebound_pct";
pub const DEFENSIVE_REBOUND_PCT: &str = "defensive_rebound_pct";
pub const ASSIST_PCT: &str = "assist_pct";
pub const STEAL_PCT: &str = "steal_pct";
pub const BLOCK_PCT: &str = "block_pct";
pub const TURNOVER_PCT: &str = "turnover_pct";
pub const FREE_THROW_RATE: &str = "free_throw_rate";

pub const FREE_THROWS_MADE: &str = "free_throws_made";
pub const FREE_THROWS_ATTEMPTED: &str = "free_throws_attempted";
pub const FREE_THROW_PERCENTAGE: &str = "free_throw_percentage";
pub const TWOS_MADE: &str = "twos_made";
pub const TWOS_ATTEMPTED: &str = "twos_attempted";
pub const TWO_PERCENTAGE: &str = "two_percentage";
pub const THREES_MADE: &str = "threes_made";
pub const THREES_ATTEMPTED: &str = "threes_attempted";
pub const THREE_PERCENTAGE: &str = "three_percentage";
pub const RIM_MADE: &str = "rim_made";
pub const RIM_ATTEMPTED: &str = "rim_attempted";
pub const RIM_PERCENTAGE: &str = "rim_percentage";
pub const MID_MADE: &str = "mid_made";
pub const MID_ATTEMPTED: &str = "mid_attempted";
pub const MID_PERCENTAGE: &str = "mid_percentage";

pub const BPM: &str = "bpm";
pub const OBPM: &str = "obpm";
pub const DBPM: &str = "dbpm";
pub const POINTS: &str = "points";
pub const REBOUNDS: &str = "rebounds";
pub const ASSISTS: &str = "assists";
pub const STEALS: &str = "steals";
pub const BLOCKS: &str = "blocks";
pub const TURNOVERS: &str = "turnovers";

pub const WINS: &str = "wins";
pub const LOSSES: &str = "losses";

/// Fields where a smaller raw value is the better performance.
pub const LOWER_IS_BETTER: &[&str] =
    &[TURNOVER_PCT, DEFENSIVE_RATING, ADJUSTED_DEFENSIVE_RATING, TURNOVERS];

/// Fields profiled and graded for player tables.
pub const PLAYER_GRADED: &[&str] = &[
    OFFENSIVE_RATING,
    DEFENSIVE_RATING,
    USAGE_RATE,
    EFFECTIVE_FG_PCT,
    TRUE_SHOOTING_PCT,
    OFFENSIVE_REBOUND_PCT,
    DEFENSIVE_REBOUND_PCT,
    ASSIST_PCT,
    TURNOVER_PCT,
    STEAL_PCT,
    BLOCK_PCT,
    FREE_THROW_RATE,
    FREE_THROW_PERCENTAGE,
    TWO_PERCENTAGE,
    THREE_PERCENTAGE,
    RIM_PERCENTAGE,
    MID_PERCENTAGE,
    BPM,
    OBPM,
    DBPM,
    POINTS,
    REBOUNDS,
    ASSISTS,
    TURNOVERS,
];

/// Fields profiled and graded for team tables.
pub const TEAM_GRADED: &[&str] = &[
    ADJUSTED_OFFENSIVE_RATING,
    ADJUSTED_DEFENSIVE_RATING,
    ADJUSTED_TEMPO,
    BARTHAG,
    EFFECTIVE_FG_PCT,
    TURNOVER_PCT,
    OFFENSIVE_REBOUND_PCT,
    FREE_THROW_RATE,
    TWO_PERCENTAGE,
    THREE_PERCENTAGE,
];

pub fn is_lower_better(field: &str) -> bool {
    LOWER_IS_BETTER.contains(&field)
}

pub fn is_percentage(field: &str) -> bool {
    field.contains("percentage")
}

/// Three/two-point, rim, mid-range and free-throw fields. A zero here usually
/// means no attempts rather than a failed attempt.
pub fn is_shooting_related(field: &str) -> bool {
    ["three", "two", "rim", "mid", "free_throw"]
        .iter()
        .any(|needle| field.contains(needle))
}

/// Value in the units used for profiling and grading.
pub fn profile_units(field: &str, raw: f64) -> f64 {
    if is_percentage(field) { raw * 100.0 } else { raw }
}
