//! Time indexed tables and block resampling.

use crate::{
    error::{AnalysisError, Result},
    interpolation::interp,
    stats,
    table::Table,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use optional::Optioned;
use tracing::debug;

/// The columns of a table that together make up the timestamp of each row.
#[derive(Clone, Copy, Debug)]
pub enum DateColumns<'a> {
    /// Calendar date plus an hour of the day, which may be fractional.
    Hourly {
        /// Four digit year
        year: &'a str,
        /// Month, 1-12
        month: &'a str,
        /// Day of the month
        day: &'a str,
        /// Hour of the day
        hour: &'a str,
    },
    /// Calendar date plus hour, minute and (possibly fractional) second.
    Seconds {
        /// Four digit year
        year: &'a str,
        /// Month, 1-12
        month: &'a str,
        /// Day of the month
        day: &'a str,
        /// Hour of the day
        hour: &'a str,
        /// Minute of the hour
        minute: &'a str,
        /// Second of the minute
        second: &'a str,
    },
}

impl<'a> DateColumns<'a> {
    fn names(&self) -> Vec<&'a str> {
        match *self {
            DateColumns::Hourly {
                year,
                month,
                day,
                hour,
            } => vec![year, month, day, hour],
            DateColumns::Seconds {
                year,
                month,
                day,
                hour,
                minute,
                second,
            } => vec![year, month, day, hour, minute, second],
        }
    }
}

/// A table where every row has a timestamp.
///
/// Rows are always sorted by time.
#[derive(Clone, Debug, Default)]
pub struct TimeSeries {
    times: Vec<NaiveDateTime>,
    table: Table,
}

impl TimeSeries {
    /// Create a time series from parallel timestamps and table rows.
    ///
    /// The rows are sorted by time if they are not already.
    pub fn new(times: Vec<NaiveDateTime>, table: Table) -> Result<Self> {
        if times.len() != table.len() {
            return Err(AnalysisError::InvalidInput(format!(
                "{} timestamps for {} rows",
                times.len(),
                table.len()
            )));
        }

        let mut order: Vec<usize> = (0..times.len()).collect();
        order.sort_by_key(|&i| times[i]);

        if order.iter().enumerate().all(|(i, &j)| i == j) {
            Ok(TimeSeries { times, table })
        } else {
            Ok(TimeSeries {
                times: order.iter().map(|&i| times[i]).collect(),
                table: table.select_rows(&order),
            })
        }
    }

    /// Build the timestamps from date columns in the table. The date columns are removed.
    pub fn from_date_columns(table: Table, cols: DateColumns) -> Result<Self> {
        let names = cols.names();
        let parts: Vec<&[Optioned<f64>]> = names
            .iter()
            .map(|name| table.column(name))
            .collect::<Result<_>>()?;

        let times = (0..table.len())
            .map(|row| {
                let vals: Option<Vec<f64>> = parts.iter().map(|p| p[row].into_option()).collect();
                vals.and_then(|vals| make_timestamp(&vals))
                    .ok_or(AnalysisError::InvalidTimestamp { row })
            })
            .collect::<Result<Vec<_>>>()?;

        let table = table.without_columns(&names);

        Self::new(times, table)
    }

    /// The number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True if there are no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// The timestamps of the rows.
    #[inline]
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// The table holding the data.
    #[inline]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Get a column by name.
    #[inline]
    pub fn column(&self, name: &str) -> Result<&[Optioned<f64>]> {
        self.table.column(name)
    }

    /// Builder method to add or replace a column.
    pub fn with_column<S: Into<String>>(self, name: S, values: Vec<Optioned<f64>>) -> Result<Self> {
        let TimeSeries { times, table } = self;
        let table = table.with_column(name, values)?;
        Ok(TimeSeries { times, table })
    }

    /// Select the rows with `start <= time <= end`.
    pub fn between(&self, start: NaiveDateTime, end: NaiveDateTime) -> TimeSeries {
        let lo = self.times.partition_point(|&t| t < start);
        let hi = self.times.partition_point(|&t| t <= end).max(lo);
        let rows: Vec<usize> = (lo..hi).collect();

        TimeSeries {
            times: self.times[lo..hi].to_vec(),
            table: self.table.select_rows(&rows),
        }
    }

    /// Seconds since `origin` for every row.
    pub fn seconds_since(&self, origin: NaiveDateTime) -> Vec<f64> {
        self.times
            .iter()
            .map(|&t| seconds_between(origin, t))
            .collect()
    }

    /// Mean of every column over consecutive blocks of `interval`.
    ///
    /// See [`TimeSeries::resample`] for how the blocks are laid out.
    pub fn resample_mean(&self, interval: Duration) -> Result<TimeSeries> {
        self.resample(interval, stats::mean)
    }

    /// Sample standard deviation of every column over consecutive blocks of `interval`.
    pub fn resample_std(&self, interval: Duration) -> Result<TimeSeries> {
        self.resample(interval, stats::std_dev)
    }

    /// Reduce every column over consecutive blocks of `interval`.
    ///
    /// Blocks are aligned to midnight of the first sample's day and labelled with their start
    /// time. Every block from the one holding the first sample to the one holding the last is in
    /// the output, a block without valid data gets a missing value.
    pub fn resample<F>(&self, interval: Duration, reduce: F) -> Result<TimeSeries>
    where
        F: Fn(&[f64]) -> Optioned<f64>,
    {
        let block_ms = interval.num_milliseconds();
        if block_ms <= 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "resample interval must be positive, got {} ms",
                block_ms
            )));
        }

        let (first, last) = match (self.times.first(), self.times.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Err(AnalysisError::NotEnoughData),
        };

        let origin = first
            .date()
            .and_hms_opt(0, 0, 0)
            .ok_or(AnalysisError::InvalidTimestamp { row: 0 })?;
        let block_of = |t: NaiveDateTime| ((t - origin).num_milliseconds() / block_ms) as usize;

        let first_block = block_of(first);
        let num_blocks = block_of(last) - first_block + 1;

        let times: Vec<NaiveDateTime> = (first_block..first_block + num_blocks)
            .map(|b| origin + Duration::milliseconds(b as i64 * block_ms))
            .collect();

        let blocks: Vec<usize> = self.times.iter().map(|&t| block_of(t) - first_block).collect();

        debug!(
            rows = self.len(),
            blocks = num_blocks,
            interval_ms = block_ms,
            "resampling"
        );

        let mut table = Table::new();
        for name in self.table.column_names() {
            let col = self.table.column(name)?;

            let mut groups: Vec<Vec<f64>> = vec![Vec::new(); num_blocks];
            for (&b, val) in blocks.iter().zip(col) {
                if let Some(v) = val.into_option() {
                    groups[b].push(v);
                }
            }

            let reduced = groups.iter().map(|g| reduce(g)).collect();
            table = table.with_column(name.clone(), reduced)?;
        }

        Ok(TimeSeries { times, table })
    }

    /// Linearly interpolate a column of this series onto other timestamps.
    ///
    /// Timestamps outside this series take the value at the nearest end.
    pub fn interpolate_to(&self, targets: &[NaiveDateTime], column: &str) -> Result<Vec<Optioned<f64>>> {
        let origin = match self.times.first() {
            Some(&t) => t,
            None => return Err(AnalysisError::NotEnoughData),
        };

        let xp = self.seconds_since(origin);
        let x: Vec<f64> = targets.iter().map(|&t| seconds_between(origin, t)).collect();

        interp(&x, &xp, self.column(column)?)
    }
}

/// Seconds from `origin` to `t`, with millisecond resolution.
#[inline]
pub fn seconds_between(origin: NaiveDateTime, t: NaiveDateTime) -> f64 {
    (t - origin).num_milliseconds() as f64 / 1000.0
}

// Values are year, month, day, then either a fractional hour or hour, minute, fractional second.
fn make_timestamp(vals: &[f64]) -> Option<NaiveDateTime> {
    if vals.iter().take(3).any(|v| v.fract() != 0.0) {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(vals[0] as i32, vals[1] as u32, vals[2] as u32)?;
    let midnight = date.and_hms_opt(0, 0, 0)?;

    let seconds = match vals.len() {
        4 => vals[3] * 3600.0,
        6 => vals[3] * 3600.0 + vals[4] * 60.0 + vals[5],
        _ => return None,
    };

    let millis = (seconds * 1000.0).round();
    if !millis.is_finite() || millis < 0.0 || millis >= i64::MAX as f64 {
        return None;
    }

    let offset = Duration::try_milliseconds(millis as i64)?;
    midnight.checked_add_signed(offset)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::approx_equal;
    use optional::{none, some};

    fn dt(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2008, 5, d)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn sample_series() -> TimeSeries {
        let src = "\
year month day hour x
2008 5 8 0 1.0
2008 5 8 1 2.0
2008 5 8 2.5 NaN
2008 5 8 3 4.0
2008 5 9 0 5.0
";
        let table = Table::from_reader(src.as_bytes()).unwrap();
        TimeSeries::from_date_columns(
            table,
            DateColumns::Hourly {
                year: "year",
                month: "month",
                day: "day",
                hour: "hour",
            },
        )
        .unwrap()
    }

    #[test]
    fn test_from_date_columns() {
        let ts = sample_series();

        assert_eq!(ts.len(), 5);
        assert_eq!(ts.table().column_names(), &["x"]);
        assert_eq!(ts.times()[2], dt(8, 2, 30, 0));
        assert_eq!(ts.times()[4], dt(9, 0, 0, 0));
    }

    #[test]
    fn test_from_seconds_columns() {
        let src = "\
yyyy mm dd HH MIN SEC u
2008 5 9 5 0 0.10 1.0
2008 5 9 5 0 0.05 2.0
";
        let table = Table::from_reader(src.as_bytes()).unwrap();
        let ts = TimeSeries::from_date_columns(
            table,
            DateColumns::Seconds {
                year: "yyyy",
                month: "mm",
                day: "dd",
                hour: "HH",
                minute: "MIN",
                second: "SEC",
            },
        )
        .unwrap();

        // Sorted on construction
        assert_eq!(ts.column("u").unwrap()[0], some(2.0));
        assert_eq!(ts.times()[0], dt(9, 5, 0, 0) + Duration::milliseconds(50));
    }

    #[test]
    fn test_invalid_timestamp() {
        let src = "year month day hour\n2008 13 1 0\n";
        let table = Table::from_reader(src.as_bytes()).unwrap();
        let res = TimeSeries::from_date_columns(
            table,
            DateColumns::Hourly {
                year: "year",
                month: "month",
                day: "day",
                hour: "hour",
            },
        );
        assert!(matches!(res, Err(AnalysisError::InvalidTimestamp { row: 0 })));
    }

    #[test]
    fn test_timestamp_out_of_range() {
        let hourly = DateColumns::Hourly {
            year: "year",
            month: "month",
            day: "day",
            hour: "hour",
        };

        for hour in &["1e13", "1e300", "-1"] {
            let src = format!("year month day hour x\n2008 5 8 {} 1.0\n", hour);
            let table = Table::from_reader(src.as_bytes()).unwrap();
            let res = TimeSeries::from_date_columns(table, hourly);
            assert!(
                matches!(res, Err(AnalysisError::InvalidTimestamp { row: 0 })),
                "hour {}",
                hour
            );
        }
    }

    #[test]
    fn test_resample_aligned_to_midnight() {
        let table = Table::new()
            .with_column("x", vec![some(1.0), some(2.0), some(3.0), some(4.0)])
            .unwrap();
        let times = vec![dt(9, 5, 10, 0), dt(9, 5, 20, 0), dt(9, 5, 40, 0), dt(9, 5, 50, 0)];
        let ts = TimeSeries::new(times, table).unwrap();

        let means = ts.resample_mean(Duration::minutes(30)).unwrap();

        // The first sample is mid-block, the labels are still on the half hour
        assert_eq!(means.times(), &[dt(9, 5, 0, 0), dt(9, 5, 30, 0)][..]);
        let x = means.column("x").unwrap();
        assert!(approx_equal(x[0].unpack(), 1.5, 1.0e-12));
        assert!(approx_equal(x[1].unpack(), 3.5, 1.0e-12));
    }

    #[test]
    fn test_between_is_inclusive() {
        let ts = sample_series();

        let sub = ts.between(dt(8, 1, 0, 0), dt(8, 3, 0, 0));
        assert_eq!(sub.len(), 3);
        assert_eq!(sub.column("x").unwrap()[0], some(2.0));
        assert_eq!(sub.column("x").unwrap()[2], some(4.0));

        assert!(ts.between(dt(10, 0, 0, 0), dt(11, 0, 0, 0)).is_empty());
    }

    #[test]
    fn test_resample_mean() {
        let ts = sample_series();
        let means = ts.resample_mean(Duration::hours(2)).unwrap();

        // Blocks starting at 00, 02, ..., 22 on the 8th and 00 on the 9th
        assert_eq!(means.len(), 13);
        assert_eq!(means.times()[0], dt(8, 0, 0, 0));
        assert_eq!(means.times()[12], dt(9, 0, 0, 0));

        let x = means.column("x").unwrap();
        assert!(approx_equal(x[0].unpack(), 1.5, 1.0e-12));
        // The NaN is skipped
        assert!(approx_equal(x[1].unpack(), 4.0, 1.0e-12));
        // Empty block
        assert!(x[5].is_none());
        assert!(approx_equal(x[12].unpack(), 5.0, 1.0e-12));
    }

    #[test]
    fn test_resample_std() {
        let ts = sample_series();
        let stds = ts.resample_std(Duration::hours(2)).unwrap();
        let x = stds.column("x").unwrap();

        assert!(approx_equal(x[0].unpack(), 0.5f64.sqrt(), 1.0e-12));
        // A single value has no sample standard deviation
        assert!(x[1].is_none());
    }

    #[test]
    fn test_resample_bad_interval() {
        let ts = sample_series();
        assert!(ts.resample_mean(Duration::zero()).is_err());
        assert!(TimeSeries::default().resample_mean(Duration::hours(1)).is_err());
    }

    #[test]
    fn test_interpolate_to() {
        let table = Table::new()
            .with_column("y", vec![some(0.0), some(10.0), none()])
            .unwrap();
        let ts = TimeSeries::new(
            vec![dt(8, 0, 0, 0), dt(8, 0, 30, 0), dt(8, 1, 0, 0)],
            table,
        )
        .unwrap();

        let targets = [dt(7, 23, 0, 0), dt(8, 0, 15, 0), dt(8, 0, 45, 0)];
        let vals = ts.interpolate_to(&targets, "y").unwrap();

        assert!(approx_equal(vals[0].unpack(), 0.0, 1.0e-12));
        assert!(approx_equal(vals[1].unpack(), 5.0, 1.0e-12));
        assert!(vals[2].is_none());
    }
}
