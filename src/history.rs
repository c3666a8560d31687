//! Observation intake
//!
//! Validates the retrieval collaborator's payload and indexes it by date.
//! The wire format is a JSON array of `{"date": "YYYY-MM-DD", "count": n}`
//! objects in any order; the optional grand total is `{"total": n}`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{GridError, GridResult};
use crate::models::{Observation, RawObservation};

/// Date format used on the wire
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// What to do when two observations share a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Later observations (in input order) replace earlier ones
    #[default]
    LastWins,
    /// Any duplicate date fails the whole payload
    Reject,
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "last-wins" | "last_wins" | "last" => Ok(DuplicatePolicy::LastWins),
            "reject" => Ok(DuplicatePolicy::Reject),
            _ => Err(format!(
                "Unknown duplicate policy '{}'. Valid policies: last-wins, reject",
                s
            )),
        }
    }
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicatePolicy::LastWins => write!(f, "last-wins"),
            DuplicatePolicy::Reject => write!(f, "reject"),
        }
    }
}

/// Date-keyed view of the observations; dates not present count as zero.
#[derive(Debug, Clone, Default)]
pub struct ObservationLookup {
    counts: HashMap<NaiveDate, u64>,
}

impl ObservationLookup {
    /// Index validated observations, applying `policy` to repeated dates.
    pub fn from_observations<I>(observations: I, policy: DuplicatePolicy) -> GridResult<Self>
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut counts = HashMap::new();
        for obs in observations {
            if let Some(previous) = counts.insert(obs.date, obs.count) {
                match policy {
                    DuplicatePolicy::Reject => {
                        return Err(GridError::DuplicateDate { date: obs.date });
                    }
                    DuplicatePolicy::LastWins => {
                        warn!(
                            "Duplicate observation for {}: {} replaces {}",
                            obs.date, obs.count, previous
                        );
                    }
                }
            }
        }
        debug!("Indexed {} observation dates", counts.len());
        Ok(Self { counts })
    }

    /// Validate and index the raw wire payload.
    pub fn from_raw(raw: &[RawObservation], policy: DuplicatePolicy) -> GridResult<Self> {
        let observations = raw
            .iter()
            .map(validate)
            .collect::<GridResult<Vec<_>>>()?;
        Self::from_observations(observations, policy)
    }

    /// Count for `date`, zero when absent.
    pub fn count(&self, date: NaiveDate) -> u64 {
        self.counts.get(&date).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Parse a wire date (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> GridResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|source| GridError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

fn validate(raw: &RawObservation) -> GridResult<Observation> {
    let date = parse_date(&raw.date)?;
    let count = u64::try_from(raw.count).map_err(|_| GridError::NegativeCount {
        date,
        count: raw.count,
    })?;
    Ok(Observation { date, count })
}

/// Parse the history payload: `[{"date": "YYYY-MM-DD", "count": n}, ...]`.
pub fn parse_history_json(payload: &str) -> GridResult<Vec<RawObservation>> {
    Ok(serde_json::from_str(payload)?)
}

#[derive(Deserialize)]
struct TotalPayload {
    total: u64,
}

/// Parse the total payload: `{"total": n}`.
pub fn parse_total_json(payload: &str) -> GridResult<u64> {
    let parsed: TotalPayload = serde_json::from_str(payload)?;
    Ok(parsed.total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, count: i64) -> RawObservation {
        RawObservation {
            date: date.to_string(),
            count,
        }
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_missing_dates_count_as_zero() {
        let lookup =
            ObservationLookup::from_raw(&[raw("2024-01-03", 5)], DuplicatePolicy::LastWins).unwrap();
        assert_eq!(lookup.count(date("2024-01-03")), 5);
        assert_eq!(lookup.count(date("2024-01-04")), 0);
        assert_eq!(lookup.len(), 1);
    }

    #[test]
    fn test_negative_count_rejected() {
        let err = ObservationLookup::from_raw(&[raw("2024-01-03", -2)], DuplicatePolicy::LastWins)
            .unwrap_err();
        assert!(matches!(err, GridError::NegativeCount { count: -2, .. }));
    }

    #[test]
    fn test_invalid_date_rejected() {
        let err = ObservationLookup::from_raw(&[raw("2024-13-40", 1)], DuplicatePolicy::LastWins)
            .unwrap_err();
        assert!(matches!(err, GridError::InvalidDate { .. }));
    }

    #[test]
    fn test_duplicate_last_wins_in_input_order() {
        let lookup = ObservationLookup::from_raw(
            &[raw("2024-01-03", 5), raw("2024-01-03", 9)],
            DuplicatePolicy::LastWins,
        )
        .unwrap();
        assert_eq!(lookup.count(date("2024-01-03")), 9);
    }

    #[test]
    fn test_duplicate_reject() {
        let err = ObservationLookup::from_raw(
            &[raw("2024-01-03", 5), raw("2024-01-03", 9)],
            DuplicatePolicy::Reject,
        )
        .unwrap_err();
        assert!(matches!(err, GridError::DuplicateDate { .. }));
    }

    #[test]
    fn test_parse_history_json() {
        let payload = r#"[{"date": "2024-01-07", "count": 50}, {"date": "2024-01-03", "count": 5}]"#;
        let parsed = parse_history_json(payload).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], raw("2024-01-07", 50));
        assert!(parse_history_json("{not json").is_err());
    }

    #[test]
    fn test_parse_total_json() {
        assert_eq!(parse_total_json(r#"{"total": 123456}"#).unwrap(), 123456);
        assert!(parse_total_json(r#"{"sum": 1}"#).is_err());
    }

    #[test]
    fn test_duplicate_policy_from_str() {
        assert_eq!("reject".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Reject);
        assert_eq!(
            "Last-Wins".parse::<DuplicatePolicy>().unwrap(),
            DuplicatePolicy::LastWins
        );
        assert!("first-wins".parse::<DuplicatePolicy>().is_err());
    }
}
