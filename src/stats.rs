//! Simple statistics over columns that may hold missing values.

use chrono::{NaiveDateTime, Timelike};
use itertools::izip;
use optional::{none, some, Optioned};
use std::collections::BTreeMap;

/// Mean of the values, missing if there are none.
pub fn mean(vals: &[f64]) -> Optioned<f64> {
    if vals.is_empty() {
        none()
    } else {
        some(vals.iter().sum::<f64>() / vals.len() as f64)
    }
}

/// Sample standard deviation (n - 1 in the denominator), missing with fewer than two values.
pub fn std_dev(vals: &[f64]) -> Optioned<f64> {
    variance(vals).map_t(f64::sqrt)
}

/// Sample variance (n - 1 in the denominator), missing with fewer than two values.
pub fn variance(vals: &[f64]) -> Optioned<f64> {
    if vals.len() < 2 {
        return none();
    }

    let n = vals.len() as f64;
    let mean = vals.iter().sum::<f64>() / n;
    let sum_sq: f64 = vals.iter().map(|v| (v - mean) * (v - mean)).sum();

    some(sum_sq / (n - 1.0))
}

/// The values that are not missing.
pub fn present(vals: &[Optioned<f64>]) -> Vec<f64> {
    vals.iter().filter_map(|v| v.into_option()).collect()
}

/// Mean of a column, skipping missing values.
#[inline]
pub fn column_mean(vals: &[Optioned<f64>]) -> Optioned<f64> {
    mean(&present(vals))
}

/// Equal width bins over the range of some data.
#[derive(Clone, Debug)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<usize>,
}

impl Histogram {
    /// Bin the finite values into `bins` equal width bins from the minimum to the maximum value.
    ///
    /// Every bin is half open except the last one, which also holds the maximum. If all values
    /// are the same the range is widened by 0.5 on both sides. With no finite values all the
    /// counts are zero over the range 0 to 1.
    pub fn new(vals: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);

        let (lo, hi) = vals
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .map(|(lo, hi)| if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) })
            .unwrap_or((0.0, 1.0));

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0; bins];
        for &v in vals.iter().filter(|v| v.is_finite()) {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Histogram { edges, counts }
    }

    /// The bin edges, one more than the number of bins.
    #[inline]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// The number of values in each bin.
    #[inline]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Iterate over `(left edge, right edge, count)`.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        izip!(&self.edges, self.edges.iter().skip(1), &self.counts).map(|(&l, &r, &c)| (l, r, c))
    }

    /// The largest count in any bin.
    pub fn max_count(&self) -> usize {
        self.counts.iter().cloned().max().unwrap_or(0)
    }
}

/// The mean of a quantity at one hour of the day.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HourlyMean {
    /// Hour of the day, 0-23
    pub hour: u32,
    /// Mean of all the values in that hour
    pub mean: f64,
    /// The number of values averaged
    pub count: usize,
}

/// Group values by hour of the day and average them.
///
/// Missing values are skipped, but non-finite values are kept so an infinite value makes the mean
/// for its hour infinite. Only hours with at least one value are returned, in order.
pub fn diurnal_mean(times: &[NaiveDateTime], vals: &[Optioned<f64>]) -> Vec<HourlyMean> {
    debug_assert_eq!(times.len(), vals.len());

    let mut groups: BTreeMap<u32, (f64, usize)> = BTreeMap::new();

    for (t, v) in izip!(times, vals) {
        if let Some(v) = v.into_option() {
            let entry = groups.entry(t.hour()).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(hour, (sum, count))| HourlyMean {
            hour,
            mean: sum / count as f64,
            count,
        })
        .collect()
}
