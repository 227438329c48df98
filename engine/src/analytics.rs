//! Analytics-provider row decoding.
//!
//! The provider ships each season as a JSON array of position-indexed rows.
//! The column tables below are the contract with that feed: if the provider
//! reorders its columns, these tables are the only place that changes, and
//! nothing outside this module refers to a column index.

use crate::fields::*;
use crate::{PlayerStatRecord, StatRecord, StatValue, TeamStatRecord};
use log::warn;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Bumped whenever either column table changes.
pub const COLUMN_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("row has {len} columns, identity columns need at least {needed}")]
    TooShort { len: usize, needed: usize },
    #[error("column {index} ({column}) is empty or not text")]
    MissingIdentity { index: usize, column: &'static str },
    #[error("row is not an array")]
    NotARow,
}

/// Identity columns of the player feed.
mod player_identity {
    pub const NAME: usize = 0;
    pub const TEAM: usize = 1;
    pub const CONFERENCE: usize = 2;
    pub const CLASS_YEAR: usize = 25;
    pub const HEIGHT: usize = 26;
    pub const SEASON: usize = 31;
}

/// Stat columns of the player season feed, version 1.
pub const PLAYER_COLUMNS_V1: &[(usize, &str)] = &[
    (3, GAMES_PLAYED),
    (4, MINUTES_PCT),
    (5, OFFENSIVE_RATING),
    (6, USAGE_RATE),
    (7, EFFECTIVE_FG_PCT),
    (8, TRUE_SHOOTING_PCT),
    (9, OFFENSIVE_REBOUND_PCT),
    (10, DEFENSIVE_REBOUND_PCT),
    (11, ASSIST_PCT),
    (12, TURNOVER_PCT),
    (13, FREE_THROWS_MADE),
    (14, FREE_THROWS_ATTEMPTED),
    (15, FREE_THROW_PERCENTAGE),
    (16, TWOS_MADE),
    (17, TWOS_ATTEMPTED),
    (18, TWO_PERCENTAGE),
    (19, THREES_MADE),
    (20, THREES_ATTEMPTED),
    (21, THREE_PERCENTAGE),
    (22, BLOCK_PCT),
    (23, STEAL_PCT),
    (24, FREE_THROW_RATE),
    (36, RIM_MADE),
    (37, RIM_ATTEMPTED),
    (38, MID_MADE),
    (39, MID_ATTEMPTED),
    (40, RIM_PERCENTAGE),
    (41, MID_PERCENTAGE),
    (46, DEFENSIVE_RATING),
    (47, ADJUSTED_DEFENSIVE_RATING),
    (50, BPM),
    (51, OBPM),
    (52, DBPM),
    (57, REBOUNDS),
    (58, ASSISTS),
    (59, STEALS),
    (60, BLOCKS),
    (61, TURNOVERS),
    (62, POINTS),
];

/// Identity columns of the team feed.
mod team_identity {
    pub const TEAM: usize = 1;
    pub const CONFERENCE: usize = 2;
    pub const RECORD: usize = 3; // "24-8"
}

/// Stat columns of the team season feed, version 1.
pub const TEAM_COLUMNS_V1: &[(usize, &str)] = &[
    (4, ADJUSTED_OFFENSIVE_RATING),
    (6, ADJUSTED_DEFENSIVE_RATING),
    (8, BARTHAG),
    (10, EFFECTIVE_FG_PCT),
    (11, TURNOVER_PCT),
    (12, OFFENSIVE_REBOUND_PCT),
    (13, FREE_THROW_RATE),
    (14, TWO_PERCENTAGE),
    (15, THREE_PERCENTAGE),
    (16, ADJUSTED_TEMPO),
];

fn text_at(row: &[Value], index: usize, column: &'static str) -> Result<String, DecodeError> {
    match row.get(index) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_owned()),
        _ => Err(DecodeError::MissingIdentity { index, column }),
    }
}

fn optional_text(row: &[Value], index: usize) -> Option<String> {
    match row.get(index)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A numeric cell. Numbers-in-strings are accepted; anything else is null.
fn cell(row: &[Value], index: usize) -> Option<StatValue> {
    let n = match row.get(index)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(StatValue::Number(n))
}

fn stat_columns(row: &[Value], columns: &[(usize, &str)]) -> BTreeMap<String, StatValue> {
    columns
        .iter()
        .filter_map(|&(index, field)| cell(row, index).map(|v| (field.to_owned(), v)))
        .collect()
}

fn as_row(value: &Value) -> Result<&[Value], DecodeError> {
    value.as_array().map(Vec::as_slice).ok_or(DecodeError::NotARow)
}

pub fn decode_player_row(row: &Value, season: u16) -> Result<PlayerStatRecord, DecodeError> {
    let row = as_row(row)?;
    let needed = player_identity::CONFERENCE + 1;
    if row.len() < needed {
        return Err(DecodeError::TooShort { len: row.len(), needed });
    }
    let season = cell(row, player_identity::SEASON)
        .and_then(|v| v.as_f64())
        .and_then(season_year)
        .unwrap_or(season);
    Ok(PlayerStatRecord {
        name: text_at(row, player_identity::NAME, "name")?,
        team: text_at(row, player_identity::TEAM, "team")?,
        conference: optional_text(row, player_identity::CONFERENCE).unwrap_or_default(),
        season,
        class_year: optional_text(row, player_identity::CLASS_YEAR),
        height: optional_text(row, player_identity::HEIGHT),
        stats: stat_columns(row, PLAYER_COLUMNS_V1),
    })
}

/// A whole, in-range year. Anything else is treated as missing.
fn season_year(value: f64) -> Option<u16> {
    if value.fract() != 0.0 {
        return None;
    }
    u16::try_from(value as i64).ok()
}

/// "24-8" → (24, 8).
pub fn parse_record(summary: &str) -> Option<(u16, u16)> {
    let (w, l) = summary.trim().split_once('-')?;
    Some((w.trim().parse().ok()?, l.trim().parse().ok()?))
}

pub fn decode_team_row(row: &Value, season: u16) -> Result<TeamStatRecord, DecodeError> {
    let row = as_row(row)?;
    let needed = team_identity::CONFERENCE + 1;
    if row.len() < needed {
        return Err(DecodeError::TooShort { len: row.len(), needed });
    }
    let mut stats = stat_columns(row, TEAM_COLUMNS_V1);
    if let Some((wins, losses)) = optional_text(row, team_identity::RECORD).as_deref().and_then(parse_record) {
        stats.insert(WINS.to_owned(), StatValue::Number(f64::from(wins)));
        stats.insert(LOSSES.to_owned(), StatValue::Number(f64::from(losses)));
        stats.insert(GAMES_PLAYED.to_owned(), StatValue::Number(f64::from(wins + losses)));
    }
    Ok(TeamStatRecord {
        team: text_at(row, team_identity::TEAM, "team")?,
        team_id: None,
        conference: optional_text(row, team_identity::CONFERENCE).unwrap_or_default(),
        season,
        stats,
    })
}

/// Decode a whole feed. Bad rows are logged and skipped; they never abort
/// the rest of the population.
pub fn decode_player_rows(rows: &[Value], season: u16) -> Vec<StatRecord> {
    decode_all(rows, |row| decode_player_row(row, season).map(StatRecord::Player))
}

pub fn decode_team_rows(rows: &[Value], season: u16) -> Vec<StatRecord> {
    decode_all(rows, |row| decode_team_row(row, season).map(StatRecord::Team))
}

fn decode_all(
    rows: &[Value],
    decode: impl Fn(&Value) -> Result<StatRecord, DecodeError>,
) -> Vec<StatRecord> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| match decode(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("skipping row {i} (schema v{COLUMN_SCHEMA_VERSION}): {e}");
                None
            }
        })
        .collect()
}
