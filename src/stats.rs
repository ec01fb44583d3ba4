use serde::{Deserialize, Serialize};

/// Percentiles at which a [`PercentileStats`] record carries a value, in ascending order.
pub const ANCHOR_PERCENTILES: [u8; 7] = [5, 10, 25, 50, 75, 90, 95];

const FALLBACK_PERCENTILE: u8 = 50;
const MIN_PERCENTILE: f64 = 1.0;
const MAX_PERCENTILE: f64 = 99.0;

/// Rate distribution for one code/state pair.
///
/// Values are expected to be non-decreasing from `p5` to `p95`. Nothing here enforces it; the
/// table producer does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileStats {
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPoint {
    pub percentile: u8,
    pub value: f64,
}

impl PercentileStats {
    pub fn median(&self) -> f64 {
        self.p50
    }

    pub fn anchors(&self) -> [AnchorPoint; 7] {
        let values = [
            self.p5, self.p10, self.p25, self.p50, self.p75, self.p90, self.p95,
        ];
        std::array::from_fn(|i| AnchorPoint {
            percentile: ANCHOR_PERCENTILES[i],
            value: values[i],
        })
    }
}

fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn to_percentile(raw: f64) -> u8 {
    if raw.is_nan() {
        return FALLBACK_PERCENTILE;
    }
    round_half_up(raw).clamp(MIN_PERCENTILE, MAX_PERCENTILE) as u8
}

/// Estimates the percentile rank of `value` within `stats`.
///
/// Between `p5` and `p95` the rank is interpolated linearly between neighbouring anchors.
/// Below `p5` it is extrapolated towards zero, above `p95` it grows by 20 points per 100% of
/// `p95`. The result is always within `1..=99`.
pub fn estimate_percentile(value: f64, stats: &PercentileStats) -> u8 {
    let anchors = stats.anchors();
    let first = anchors[0];
    let last = anchors[anchors.len() - 1];

    if value <= first.value {
        // Zero or negative floor: nothing sits below it.
        if first.value <= 0.0 {
            return MIN_PERCENTILE as u8;
        }
        let raw = round_half_up((value / first.value) * f64::from(first.percentile));
        return to_percentile(raw.max(MIN_PERCENTILE));
    }

    if value >= last.value {
        if last.value <= 0.0 {
            return if value == last.value {
                last.percentile
            } else {
                MAX_PERCENTILE as u8
            };
        }
        let raw = f64::from(last.percentile) + ((value - last.value) / last.value) * 20.0;
        return to_percentile(raw.min(MAX_PERCENTILE));
    }

    for pair in anchors.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if value >= a.value && value <= b.value {
            if b.value == a.value {
                return a.percentile;
            }
            let span = f64::from(b.percentile - a.percentile);
            let raw = f64::from(a.percentile) + (value - a.value) / (b.value - a.value) * span;
            return to_percentile(raw);
        }
    }

    FALLBACK_PERCENTILE
}

/// Coarse market position of a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketTier {
    Below,
    Competitive,
    Top,
}

impl MarketTier {
    pub fn from_percentile(percentile: u8) -> Self {
        match percentile {
            0..=24 => MarketTier::Below,
            25..=74 => MarketTier::Competitive,
            _ => MarketTier::Top,
        }
    }

    /// Classifies on the raw rate alone: above `p75` is top, under the median is below.
    pub fn from_thresholds(value: f64, stats: &PercentileStats) -> Self {
        if value > stats.p75 {
            MarketTier::Top
        } else if value < stats.median() {
            MarketTier::Below
        } else {
            MarketTier::Competitive
        }
    }
}

/// Which classification a caller wants. The two policies disagree near the median.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TierPolicy {
    /// Bucket the estimated percentile rank.
    Percentile,
    /// Compare the raw rate against p75 and the median.
    #[default]
    Threshold,
}

impl TierPolicy {
    pub fn classify(self, value: f64, stats: &PercentileStats) -> MarketTier {
        match self {
            TierPolicy::Percentile => MarketTier::from_percentile(estimate_percentile(value, stats)),
            TierPolicy::Threshold => MarketTier::from_thresholds(value, stats),
        }
    }
}
