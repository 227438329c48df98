use crate::fields::{self, is_lower_better, is_shooting_related, profile_units};
use crate::thresholds::{ThresholdProfile, Thresholds};
use crate::{FieldSource, RecordKind};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Bands and palette
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorBand {
    Poor,
    BelowAverage,
    #[default]
    Neutral,
    AboveAverage,
    Good,
    Excellent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandColors {
    pub background_color: &'static str,
    pub text_color: &'static str,
}

impl ColorBand {
    pub fn colors(&self) -> BandColors {
        let (background_color, text_color) = match self {
            ColorBand::Excellent => ("#1a7f37", "#ffffff"),
            ColorBand::Good => ("#4caf50", "#ffffff"),
            ColorBand::AboveAverage => ("#c8e6c9", "#1b1b1b"),
            ColorBand::Neutral => ("transparent", "inherit"),
            ColorBand::BelowAverage => ("#ffcdd2", "#1b1b1b"),
            ColorBand::Poor => ("#c62828", "#ffffff"),
        };
        BandColors { background_color, text_color }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColorBand::Excellent => "excellent",
            ColorBand::Good => "good",
            ColorBand::AboveAverage => "above average",
            ColorBand::Neutral => "neutral",
            ColorBand::BelowAverage => "below average",
            ColorBand::Poor => "poor",
        }
    }
}

/// Grade of one table cell. `attempts_ratio` is only set for shooting
/// percentages and is informational: it never changes the band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CellGrade {
    pub band: ColorBand,
    pub attempts_ratio: Option<f64>,
}

impl CellGrade {
    pub const NEUTRAL: CellGrade = CellGrade { band: ColorBand::Neutral, attempts_ratio: None };

    fn band(band: ColorBand) -> Self {
        Self { band, attempts_ratio: None }
    }

    /// Below the minimum-attempts gate. Callers may mute or annotate the cell.
    pub fn is_small_sample(&self) -> bool {
        self.attempts_ratio.is_some_and(|r| r < 1.0)
    }
}

// ---------------------------------------------------------------------------
// Z-score banding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatClass {
    Default,
    Efficiency,
    Usage,
    Turnover,
}

/// Z cutoffs, highest tier first. `below_average` and `poor` are negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZCutoffs {
    pub excellent: f64,
    pub good: f64,
    pub above_average: f64,
    pub below_average: f64,
    pub poor: f64,
}

impl StatClass {
    pub fn of(field: &str) -> Self {
        match field {
            fields::EFFECTIVE_FG_PCT | fields::TRUE_SHOOTING_PCT => StatClass::Efficiency,
            fields::USAGE_RATE => StatClass::Usage,
            fields::TURNOVER_PCT | fields::TURNOVERS => StatClass::Turnover,
            _ => StatClass::Default,
        }
    }

    pub fn cutoffs(&self) -> ZCutoffs {
        match self {
            StatClass::Default => ZCutoffs {
                excellent: 2.5,
                good: 1.5,
                above_average: 0.75,
                below_average: -1.0,
                poor: -2.0,
            },
            StatClass::Efficiency => ZCutoffs {
                excellent: 1.8,
                good: 1.2,
                above_average: 0.6,
                below_average: -0.9,
                poor: -1.8,
            },
            StatClass::Usage => ZCutoffs {
                excellent: 2.0,
                good: 1.25,
                above_average: 0.6,
                below_average: -0.75,
                poor: -1.5,
            },
            StatClass::Turnover => ZCutoffs {
                excellent: 1.95,
                good: 1.25,
                above_average: 0.6,
                below_average: -0.75,
                poor: -1.5,
            },
        }
    }
}

impl ZCutoffs {
    pub fn band(&self, z: f64) -> ColorBand {
        if z.is_nan() {
            ColorBand::Neutral
        } else if z >= self.excellent {
            ColorBand::Excellent
        } else if z >= self.good {
            ColorBand::Good
        } else if z >= self.above_average {
            ColorBand::AboveAverage
        } else if z <= self.poor {
            ColorBand::Poor
        } else if z <= self.below_average {
            ColorBand::BelowAverage
        } else {
            ColorBand::Neutral
        }
    }
}

/// Grade against the population. Lower-is-better fields are scored as
/// `(mean - value) / std_dev` so a low turnover rate lands in a high band.
pub fn z_band(field: &str, value: f64, profile: &ThresholdProfile) -> ColorBand {
    let Some(z) = profile.z_score(value) else {
        return ColorBand::Neutral;
    };
    let z = if is_lower_better(field) { -z } else { z };
    StatClass::of(field).cutoffs().band(z)
}

// ---------------------------------------------------------------------------
// Fixed absolute cutoffs
// ---------------------------------------------------------------------------

/// Absolute cutoffs in profile units, best first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCutoffs {
    pub excellent: f64,
    pub good: f64,
    pub average: f64,
    pub below_average: f64,
    pub poor: f64,
}

impl FixedCutoffs {
    pub fn band(&self, value: f64) -> ColorBand {
        if value >= self.excellent {
            ColorBand::Excellent
        } else if value >= self.good {
            ColorBand::Good
        } else if value >= self.average {
            ColorBand::AboveAverage
        } else if value >= self.below_average {
            ColorBand::Neutral
        } else if value >= self.poor {
            ColorBand::BelowAverage
        } else {
            ColorBand::Poor
        }
    }
}

const fn cutoffs(excellent: f64, good: f64, average: f64, below_average: f64, poor: f64) -> FixedCutoffs {
    FixedCutoffs { excellent, good, average, below_average, poor }
}

/// Rebound, assist and steal rates for individual players. These are
/// calibrated constants, not distribution-relative.
pub fn fixed_percentage_cutoffs(field: &str) -> Option<FixedCutoffs> {
    match field {
        fields::OFFENSIVE_REBOUND_PCT => Some(cutoffs(12.0, 9.0, 6.0, 3.0, 1.5)),
        fields::DEFENSIVE_REBOUND_PCT => Some(cutoffs(22.0, 18.0, 14.0, 10.0, 7.0)),
        fields::ASSIST_PCT => Some(cutoffs(30.0, 24.0, 18.0, 12.0, 7.0)),
        fields::STEAL_PCT => Some(cutoffs(3.5, 2.8, 2.0, 1.4, 0.8)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Shooting percentages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShootingCutoffs {
    pub cutoffs: FixedCutoffs,
    pub attempts_field: &'static str,
    pub min_attempts: f64,
}

pub fn shooting_cutoffs(field: &str) -> Option<ShootingCutoffs> {
    let (cutoffs, attempts_field, min_attempts) = match field {
        fields::THREE_PERCENTAGE => (cutoffs(40.0, 37.0, 34.0, 30.0, 25.0), fields::THREES_ATTEMPTED, 20.0),
        fields::TWO_PERCENTAGE => (cutoffs(58.0, 53.0, 49.0, 45.0, 40.0), fields::TWOS_ATTEMPTED, 30.0),
        fields::RIM_PERCENTAGE => (cutoffs(70.0, 64.0, 58.0, 52.0, 45.0), fields::RIM_ATTEMPTED, 15.0),
        fields::MID_PERCENTAGE => (cutoffs(45.0, 40.0, 36.0, 32.0, 27.0), fields::MID_ATTEMPTED, 15.0),
        fields::FREE_THROW_PERCENTAGE => {
            (cutoffs(85.0, 78.0, 72.0, 65.0, 55.0), fields::FREE_THROWS_ATTEMPTED, 20.0)
        }
        _ => return None,
    };
    Some(ShootingCutoffs { cutoffs, attempts_field, min_attempts })
}

/// Fixed-cutoff band plus the attempts ratio. The ratio is reported but the
/// band is returned unsoftened even for tiny samples.
pub fn shooting_grade(spec: &ShootingCutoffs, value: f64, attempts: Option<f64>) -> CellGrade {
    let attempts_ratio = attempts
        .filter(|a| *a >= 0.0)
        .map(|a| (a / spec.min_attempts).min(1.0))
        .or(Some(0.0));
    CellGrade { band: spec.cutoffs.band(value), attempts_ratio }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Grade one cell of `record`. Never fails: anything that cannot be graded is
/// neutral.
pub fn grade<R: FieldSource + ?Sized>(
    kind: RecordKind,
    field: &str,
    record: &R,
    thresholds: &Thresholds,
) -> CellGrade {
    let Some(raw) = record.numeric(field) else {
        return CellGrade::NEUTRAL;
    };
    grade_value(kind, field, raw, |f| record.numeric(f), thresholds)
}

/// Grade a raw value. `lookup` supplies companion fields (shot attempts).
pub fn grade_value(
    kind: RecordKind,
    field: &str,
    raw: f64,
    lookup: impl Fn(&str) -> Option<f64>,
    thresholds: &Thresholds,
) -> CellGrade {
    if !raw.is_finite() {
        return CellGrade::NEUTRAL;
    }
    if raw == 0.0 && is_shooting_related(field) {
        return CellGrade::NEUTRAL;
    }
    let value = profile_units(field, raw);

    if kind == RecordKind::Player {
        if let Some(spec) = shooting_cutoffs(field) {
            return shooting_grade(&spec, value, lookup(spec.attempts_field));
        }
        if let Some(fixed) = fixed_percentage_cutoffs(field) {
            return CellGrade::band(fixed.band(value));
        }
    }

    match thresholds.get(field) {
        Some(profile) => CellGrade::band(z_band(field, value, profile)),
        None => CellGrade::NEUTRAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatValue;
    use crate::fields::*;
    use std::collections::BTreeMap;

    fn thresholds(field: &str, values: &[f64]) -> Thresholds {
        let rows: Vec<BTreeMap<String, StatValue>> = values
            .iter()
            .map(|v| BTreeMap::from([(field.to_owned(), StatValue::Number(*v))]))
            .collect();
        Thresholds::compute(&rows, &[field])
    }

    fn record(pairs: &[(&str, f64)]) -> BTreeMap<String, StatValue> {
        pairs.iter().map(|(k, v)| (k.to_string(), StatValue::Number(*v))).collect()
    }

    #[test]
    fn mean_value_is_neutral() {
        let t = thresholds(OFFENSIVE_RATING, &[90.0, 100.0, 110.0]);
        let g = grade(RecordKind::Player, OFFENSIVE_RATING, &record(&[(OFFENSIVE_RATING, 100.0)]), &t);
        assert_eq!(g.band, ColorBand::Neutral);
    }

    #[test]
    fn default_class_bands() {
        let profile = ThresholdProfile { mean: 100.0, std_dev: 10.0 };
        assert_eq!(z_band(OFFENSIVE_RATING, 125.0, &profile), ColorBand::Excellent);
        assert_eq!(z_band(OFFENSIVE_RATING, 116.0, &profile), ColorBand::Good);
        assert_eq!(z_band(OFFENSIVE_RATING, 108.0, &profile), ColorBand::AboveAverage);
        assert_eq!(z_band(OFFENSIVE_RATING, 95.0, &profile), ColorBand::Neutral);
        assert_eq!(z_band(OFFENSIVE_RATING, 89.0, &profile), ColorBand::BelowAverage);
        assert_eq!(z_band(OFFENSIVE_RATING, 80.0, &profile), ColorBand::Poor);
    }

    #[test]
    fn efficiency_class_is_tighter() {
        let profile = ThresholdProfile { mean: 50.0, std_dev: 5.0 };
        // z = 2.0: only "good" for the default class, "excellent" for efficiency.
        assert_eq!(z_band(EFFECTIVE_FG_PCT, 60.0, &profile), ColorBand::Excellent);
        assert_eq!(z_band(OFFENSIVE_RATING, 60.0, &profile), ColorBand::Good);
        assert_eq!(z_band(TRUE_SHOOTING_PCT, 41.0, &profile), ColorBand::Poor);
    }

    #[test]
    fn usage_class_cutoffs() {
        let profile = ThresholdProfile { mean: 20.0, std_dev: 4.0 };
        assert_eq!(z_band(USAGE_RATE, 28.0, &profile), ColorBand::Excellent);
        assert_eq!(z_band(USAGE_RATE, 14.0, &profile), ColorBand::Poor);
    }

    #[test]
    fn turnover_rate_is_inverted() {
        let profile = ThresholdProfile { mean: 18.0, std_dev: 4.0 };
        assert_eq!(z_band(TURNOVER_PCT, 10.0, &profile), ColorBand::Excellent);
        assert_eq!(z_band(TURNOVER_PCT, 25.0, &profile), ColorBand::Poor);
        assert_eq!(z_band(TURNOVER_PCT, 18.0, &profile), ColorBand::Neutral);
    }

    #[test]
    fn defensive_rating_lower_is_better() {
        let profile = ThresholdProfile { mean: 100.0, std_dev: 4.0 };
        assert_eq!(z_band(ADJUSTED_DEFENSIVE_RATING, 88.0, &profile), ColorBand::Excellent);
        assert_eq!(z_band(ADJUSTED_DEFENSIVE_RATING, 110.0, &profile), ColorBand::Poor);
    }

    #[test]
    fn ungradable_profile_is_neutral() {
        assert_eq!(z_band(BPM, 12.0, &ThresholdProfile::UNGRADABLE), ColorBand::Neutral);
        let flat = ThresholdProfile { mean: 3.0, std_dev: 0.0 };
        assert_eq!(z_band(BPM, 12.0, &flat), ColorBand::Neutral);
    }

    #[test]
    fn missing_value_and_missing_profile_are_neutral() {
        let t = Thresholds::default();
        assert_eq!(grade(RecordKind::Player, BPM, &record(&[]), &t), CellGrade::NEUTRAL);
        assert_eq!(grade(RecordKind::Player, BPM, &record(&[(BPM, 4.0)]), &t), CellGrade::NEUTRAL);
        assert_eq!(
            grade_value(RecordKind::Team, BPM, f64::NAN, |_| None, &t),
            CellGrade::NEUTRAL
        );
    }

    #[test]
    fn zero_on_shooting_field_is_neutral_not_poor() {
        let t = thresholds(THREES_MADE, &[0.0, 40.0, 60.0, 80.0]);
        let g = grade(RecordKind::Player, THREES_MADE, &record(&[(THREES_MADE, 0.0)]), &t);
        assert_eq!(g.band, ColorBand::Neutral);
        let g = grade(RecordKind::Player, THREE_PERCENTAGE, &record(&[(THREE_PERCENTAGE, 0.0)]), &t);
        assert_eq!(g, CellGrade::NEUTRAL);
    }

    #[test]
    fn fixed_percentage_ignores_population() {
        // Everyone in this population is an elite passer; the band does not care.
        let t = thresholds(ASSIST_PCT, &[31.0, 33.0, 35.0]);
        let g = grade(RecordKind::Player, ASSIST_PCT, &record(&[(ASSIST_PCT, 31.0)]), &t);
        assert_eq!(g.band, ColorBand::Excellent);
        let g = grade(RecordKind::Player, STEAL_PCT, &record(&[(STEAL_PCT, 0.5)]), &t);
        assert_eq!(g.band, ColorBand::Poor);
        let g = grade(RecordKind::Player, DEFENSIVE_REBOUND_PCT, &record(&[(DEFENSIVE_REBOUND_PCT, 12.0)]), &t);
        assert_eq!(g.band, ColorBand::Neutral);
    }

    #[test]
    fn team_rebound_rate_uses_population() {
        let t = thresholds(OFFENSIVE_REBOUND_PCT, &[25.0, 30.0, 35.0]);
        let g = grade(RecordKind::Team, OFFENSIVE_REBOUND_PCT, &record(&[(OFFENSIVE_REBOUND_PCT, 30.0)]), &t);
        assert_eq!(g.band, ColorBand::Neutral);
    }

    #[test]
    fn shooting_percentage_uses_fixed_cutoffs_with_attempts_ratio() {
        let t = Thresholds::default();
        let r = record(&[(THREE_PERCENTAGE, 0.42), (THREES_ATTEMPTED, 110.0)]);
        let g = grade(RecordKind::Player, THREE_PERCENTAGE, &r, &t);
        assert_eq!(g.band, ColorBand::Excellent);
        assert_eq!(g.attempts_ratio, Some(1.0));
        assert!(!g.is_small_sample());
    }

    #[test]
    fn small_sample_keeps_its_band() {
        let t = Thresholds::default();
        let r = record(&[(THREE_PERCENTAGE, 0.5), (THREES_ATTEMPTED, 4.0)]);
        let g = grade(RecordKind::Player, THREE_PERCENTAGE, &r, &t);
        assert_eq!(g.band, ColorBand::Excellent);
        assert_eq!(g.attempts_ratio, Some(0.2));
        assert!(g.is_small_sample());
    }

    #[test]
    fn missing_attempts_reports_zero_ratio() {
        let t = Thresholds::default();
        let r = record(&[(FREE_THROW_PERCENTAGE, 0.60)]);
        let g = grade(RecordKind::Player, FREE_THROW_PERCENTAGE, &r, &t);
        assert_eq!(g.band, ColorBand::BelowAverage);
        assert_eq!(g.attempts_ratio, Some(0.0));
    }

    #[test]
    fn fixed_cutoff_edges() {
        let c = cutoffs(40.0, 37.0, 34.0, 30.0, 25.0);
        assert_eq!(c.band(40.0), ColorBand::Excellent);
        assert_eq!(c.band(37.0), ColorBand::Good);
        assert_eq!(c.band(34.0), ColorBand::AboveAverage);
        assert_eq!(c.band(30.0), ColorBand::Neutral);
        assert_eq!(c.band(25.0), ColorBand::BelowAverage);
        assert_eq!(c.band(24.9), ColorBand::Poor);
    }

    #[test]
    fn neutral_palette_is_transparent() {
        let c = ColorBand::Neutral.colors();
        assert_eq!(c.background_color, "transparent");
        assert_eq!(ColorBand::Excellent.colors().text_color, "#ffffff");
    }
}
