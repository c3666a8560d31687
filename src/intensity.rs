//! Intensity classification
//!
//! Counts span several orders of magnitude (a quiet day has a handful of
//! events, a busy one thousands), so buckets are cut on `log10(count + 1)`
//! at fixed percentiles of the nonzero days rather than on raw counts.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Day, DayCount};

/// Percentiles (of nonzero days, on the log scale) that bound the buckets
pub const PERCENTILES: [u32; 9] = [10, 25, 40, 55, 70, 80, 88, 94, 98];

/// Highest bucket a day can be assigned
pub const MAX_INTENSITY: u8 = 9;

/// How a log-scaled count is mapped onto a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketRule {
    /// One bucket above 1 for every threshold the value reaches, capped at 9.
    /// The largest observed count always lands in bucket 9.
    #[default]
    Reached,
    /// First threshold at or above the value decides the bucket; values above
    /// every threshold get 9.
    Ceiling,
}

impl std::str::FromStr for BucketRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reached" => Ok(BucketRule::Reached),
            "ceiling" => Ok(BucketRule::Ceiling),
            _ => Err(format!(
                "Unknown bucket rule '{}'. Valid rules: reached, ceiling",
                s
            )),
        }
    }
}

impl std::fmt::Display for BucketRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BucketRule::Reached => write!(f, "reached"),
            BucketRule::Ceiling => write!(f, "ceiling"),
        }
    }
}

/// `log10(count + 1)`, the scale thresholds live on.
pub fn log_scale(count: u64) -> f64 {
    (count as f64 + 1.0).log10()
}

/// Nearest-rank percentile of an ascending slice.
///
/// Index is `ceil(pct / 100 * n) - 1`, clamped to the slice. The rank is
/// computed in integers so values like `55% of 20` land exactly on 11.
pub fn percentile(sorted: &[f64], pct: u32) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    let rank = (pct as usize * n).div_ceil(100);
    let idx = rank.saturating_sub(1).min(n - 1);
    sorted[idx]
}

/// Nine ascending log-scale thresholds, one per entry of [`PERCENTILES`].
///
/// Ties in the data produce equal neighbouring thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds(pub [f64; 9]);

impl Thresholds {
    /// Thresholds over the nonzero entries of `counts`, `None` if there are none.
    pub fn from_counts<I>(counts: I) -> Option<Self>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut logs: Vec<f64> = counts
            .into_iter()
            .filter(|&c| c > 0)
            .map(log_scale)
            .collect();
        if logs.is_empty() {
            return None;
        }
        logs.sort_by(|a, b| a.total_cmp(b));

        let values = PERCENTILES.map(|p| percentile(&logs, p));
        debug!(
            "Percentile thresholds over {} active days: p10={:.3} p25={:.3} p40={:.3} p55={:.3} p70={:.3} p80={:.3} p88={:.3} p94={:.3} p98={:.3}",
            logs.len(),
            values[0], values[1], values[2], values[3], values[4],
            values[5], values[6], values[7], values[8]
        );
        Some(Self(values))
    }

    pub fn values(&self) -> &[f64; 9] {
        &self.0
    }

    /// Bucket (1..=9) for a nonzero count.
    pub fn bucket(&self, count: u64, rule: BucketRule) -> u8 {
        let v = log_scale(count);
        match rule {
            BucketRule::Reached => {
                let reached = self.0.iter().filter(|&&t| t <= v).count() as u8;
                (1 + reached).min(MAX_INTENSITY)
            }
            BucketRule::Ceiling => self
                .0
                .iter()
                .position(|&t| v <= t)
                .map(|k| k as u8 + 1)
                .unwrap_or(MAX_INTENSITY),
        }
    }

    /// Raw count at which each threshold sits, for display.
    pub fn as_counts(&self) -> [f64; 9] {
        self.0.map(|t| 10f64.powf(t) - 1.0)
    }
}

/// Assign every day its intensity. Zero-count days get 0; if no day has a
/// nonzero count, no thresholds are computed and every day gets 0.
pub fn classify(days: &[DayCount], rule: BucketRule) -> (Vec<Day>, Option<Thresholds>) {
    let thresholds = Thresholds::from_counts(days.iter().map(|d| d.count));
    let classified = days
        .iter()
        .map(|d| Day {
            date: d.date,
            count: d.count,
            intensity: match (&thresholds, d.count) {
                (_, 0) | (None, _) => 0,
                (Some(t), count) => t.bucket(count, rule),
            },
        })
        .collect();
    (classified, thresholds)
}
