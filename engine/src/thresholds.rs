use crate::FieldSource;
use crate::fields::profile_units;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean and population standard deviation of one stat over a qualified
/// population snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdProfile {
    pub mean: f64,
    pub std_dev: f64,
}

impl ThresholdProfile {
    pub const UNGRADABLE: ThresholdProfile = ThresholdProfile { mean: f64::NAN, std_dev: f64::NAN };

    /// False for empty or zero-variance baselines; callers render neutral.
    pub fn is_gradable(&self) -> bool {
        self.mean.is_finite() && self.std_dev.is_finite() && self.std_dev > 0.0
    }

    /// `(value - mean) / std_dev`, or `None` when the profile cannot grade.
    pub fn z_score(&self, value: f64) -> Option<f64> {
        self.is_gradable().then(|| (value - self.mean) / self.std_dev)
    }
}

/// Baseline profiles keyed by field name. Always rebuilt, never patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Thresholds {
    profiles: BTreeMap<String, ThresholdProfile>,
}

impl Thresholds {
    /// Profile every field in `fields` over `population`.
    pub fn compute<'a, R, I>(population: I, fields: &[&str]) -> Self
    where
        R: FieldSource + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let records: Vec<&R> = population.into_iter().collect();
        let profiles = fields
            .iter()
            .map(|&field| {
                let values: Vec<f64> = records
                    .iter()
                    .filter_map(|r| r.numeric(field))
                    .map(|v| profile_units(field, v))
                    .collect();
                debug!("profiled {field}: {} of {} records", values.len(), records.len());
                (field.to_owned(), profile(&values))
            })
            .collect();
        Self { profiles }
    }

    pub fn get(&self, field: &str) -> Option<&ThresholdProfile> {
        self.profiles.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThresholdProfile)> {
        self.profiles.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Arithmetic mean and population (N) standard deviation of finite values.
pub fn profile(values: &[f64]) -> ThresholdProfile {
    if values.is_empty() {
        return ThresholdProfile::UNGRADABLE;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    ThresholdProfile { mean, std_dev: variance.sqrt() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{ASSIST_PCT, THREE_PERCENTAGE};
    use crate::{StatValue, TeamStatRecord};
    use std::collections::BTreeMap;

    fn row(pairs: &[(&str, StatValue)]) -> BTreeMap<String, StatValue> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn population_std_dev_divides_by_n() {
        let p = profile(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(p.mean, 5.0);
        assert_eq!(p.std_dev, 2.0);
    }

    #[test]
    fn empty_values_are_nan() {
        let p = profile(&[]);
        assert!(p.mean.is_nan());
        assert!(p.std_dev.is_nan());
        assert!(!p.is_gradable());
    }

    #[test]
    fn zero_variance_cannot_grade() {
        let p = profile(&[12.0, 12.0, 12.0]);
        assert_eq!(p.std_dev, 0.0);
        assert!(!p.is_gradable());
        assert_eq!(p.z_score(13.0), None);
    }

    #[test]
    fn percentage_fields_are_rescaled_before_profiling() {
        let rows = vec![
            row(&[(THREE_PERCENTAGE, StatValue::Number(0.30))]),
            row(&[(THREE_PERCENTAGE, StatValue::Number(0.40))]),
        ];
        let t = Thresholds::compute(&rows, &[THREE_PERCENTAGE]);
        let p = t.get(THREE_PERCENTAGE).unwrap();
        assert!((p.mean - 35.0).abs() < 1e-9);
        assert!((p.std_dev - 5.0).abs() < 1e-9);
    }

    #[test]
    fn junk_values_are_dropped_not_fatal() {
        let rows = vec![
            row(&[(ASSIST_PCT, StatValue::Number(10.0))]),
            row(&[(ASSIST_PCT, StatValue::Number(f64::NAN))]),
            row(&[(ASSIST_PCT, StatValue::from("n/a"))]),
            row(&[(ASSIST_PCT, StatValue::from("20"))]),
            row(&[]),
        ];
        let t = Thresholds::compute(&rows, &[ASSIST_PCT]);
        assert_eq!(t.get(ASSIST_PCT).unwrap().mean, 15.0);
    }

    #[test]
    fn all_missing_field_profiles_to_nan() {
        let rows = vec![
            crate::StatRecord::Team(TeamStatRecord { team: "A".into(), ..Default::default() }),
            crate::StatRecord::Team(TeamStatRecord { team: "B".into(), ..Default::default() }),
        ];
        let t = Thresholds::compute(&rows, &[ASSIST_PCT]);
        let p = t.get(ASSIST_PCT).unwrap();
        assert!(p.mean.is_nan() && p.std_dev.is_nan());
    }
}
