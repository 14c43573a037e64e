//! Summary statistics and histogram binning over field arrays.

use ndarray::ArrayView2;

use crate::error::{RadarError, RadarResult};

/// Mean, extremes and population standard deviation of a field array.
///
/// Every element takes part, including gates flagged invalid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStatistics {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl FieldStatistics {
    pub fn compute(data: ArrayView2<'_, f32>) -> RadarResult<Self> {
        let count = data.len();
        if count == 0 {
            return Err(RadarError::EmptyData("cannot summarize an empty array".to_string()));
        }

        let mut sum = 0.0f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in data.iter() {
            let v = v as f64;
            sum += v;
            // NaN poisons the extremes as it does the mean
            if v.is_nan() || min.is_nan() {
                min = f64::NAN;
                max = f64::NAN;
            } else {
                min = min.min(v);
                max = max.max(v);
            }
        }
        let mean = sum / count as f64;

        // Two-pass variance (ddof = 0)
        let variance = data
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / count as f64;

        Ok(Self {
            mean,
            max,
            min,
            std_dev: variance.sqrt(),
            count,
        })
    }
}

/// Equal-width frequency histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` edges, ascending
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning their min..max.
    ///
    /// The last bin is closed on the right so the maximum is counted. A
    /// constant input spans `value - 0.5 .. value + 0.5`. Non-finite values
    /// are ignored.
    pub fn compute<I>(values: I, bins: usize) -> RadarResult<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        if bins == 0 {
            return Err(RadarError::InvalidFormat("histogram needs at least one bin".to_string()));
        }
        let values: Vec<f64> = values
            .into_iter()
            .filter(|v| v.is_finite())
            .map(f64::from)
            .collect();
        if values.is_empty() {
            return Err(RadarError::EmptyData("no finite values to bin".to_string()));
        }

        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0u64; bins];
        for v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Self { edges, counts })
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
