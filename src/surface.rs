//! Analysis of a multi-day surface station record.

use crate::{
    chart::MultiAxisChart,
    error::{AnalysisError, Result},
    met_formulas::obukhov_length,
    plot::{render_stacked, AxisFormat, PlotStyle, Series, SeriesKind, XYChart},
    stats::{diurnal_mean, HourlyMean},
    table::Table,
    timeseries::{DateColumns, TimeSeries},
};
use chrono::{NaiveDate, NaiveDateTime};
use itertools::izip;
use metfor::{Celsius, MetersPSec, Quantity};
use optional::Optioned;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the Obukhov length column added to the analysis window.
pub const OBUKHOV_COLUMN: &str = "L";

/// Load a surface record with the columns
/// `year month day hour Press Rain Ta002 U010 ust005 wT005 NRad H LE G`.
pub fn load_surface_record<P: AsRef<Path>>(path: P) -> Result<TimeSeries> {
    surface_record_from_table(Table::from_file(path)?)
}

/// Build the time series of a surface record from its table.
pub fn surface_record_from_table(table: Table) -> Result<TimeSeries> {
    TimeSeries::from_date_columns(
        table,
        DateColumns::Hourly {
            year: "year",
            month: "month",
            day: "day",
            hour: "hour",
        },
    )
}

/// Obukhov length from the friction velocity `ust005`, kinematic heat flux `wT005` and
/// temperature `Ta002` (°C) columns.
///
/// `None` where an input is missing. A heat flux of zero gives a non-finite length, which is kept.
pub fn obukhov_series(series: &TimeSeries) -> Result<Vec<Option<f64>>> {
    let u_star = series.column("ust005")?;
    let heat_flux = series.column("wT005")?;
    let temperature = series.column("Ta002")?;

    Ok(izip!(u_star, heat_flux, temperature)
        .map(|(u, h, t)| -> Option<f64> {
            let (u, h, t) = (u.into_option()?, h.into_option()?, t.into_option()?);
            Some(obukhov_length(MetersPSec(u), h, Celsius(t)).unpack())
        })
        .collect())
}

/// The results of a surface analysis.
#[derive(Clone, Debug)]
pub struct SurfaceAnalysis {
    record: TimeSeries,
    window: TimeSeries,
    diurnal: Vec<HourlyMean>,
    non_finite: usize,
}

impl SurfaceAnalysis {
    /// Compute the Obukhov length and its diurnal cycle over `start` to `end`, both inclusive.
    pub fn analyze(record: TimeSeries, start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        let window = record.between(start, end);
        if window.is_empty() {
            warn!(%start, %end, "no surface data in the analysis window");
            return Err(AnalysisError::NotEnoughData);
        }

        let obukhov = obukhov_series(&window)?;
        let non_finite = obukhov
            .iter()
            .filter(|l| l.map(|l| !l.is_finite()).unwrap_or(false))
            .count();
        if non_finite > 0 {
            warn!(count = non_finite, "non-finite Obukhov lengths");
        }

        let column: Vec<Optioned<f64>> = obukhov.into_iter().map(Optioned::from).collect();
        let diurnal = diurnal_mean(window.times(), &column);
        let window = window.with_column(OBUKHOV_COLUMN, column)?;

        debug!(
            rows = record.len(),
            window = window.len(),
            hours = diurnal.len(),
            "surface analysis"
        );

        Ok(SurfaceAnalysis {
            record,
            window,
            diurnal,
            non_finite,
        })
    }

    /// The whole record.
    #[inline]
    pub fn record(&self) -> &TimeSeries {
        &self.record
    }

    /// The analysis window, with the Obukhov length column added.
    #[inline]
    pub fn window(&self) -> &TimeSeries {
        &self.window
    }

    /// Obukhov length at every time in the window. NaN results are missing.
    pub fn obukhov_length(&self) -> Result<&[Optioned<f64>]> {
        self.window.column(OBUKHOV_COLUMN)
    }

    /// Mean Obukhov length at each hour of the day.
    #[inline]
    pub fn diurnal(&self) -> &[HourlyMean] {
        &self.diurnal
    }

    /// The number of Obukhov lengths that came out infinite or NaN.
    #[inline]
    pub fn non_finite_count(&self) -> usize {
        self.non_finite
    }

    /// Draw the record time series, the diurnal Obukhov length and the energy balance. Returns the
    /// paths written.
    pub fn render_charts(&self, out_dir: &Path, style: &PlotStyle) -> Result<Vec<PathBuf>> {
        let mut written = vec![];

        let origin = match self.record.times().first() {
            Some(&t) => t,
            None => return Err(AnalysisError::NotEnoughData),
        };
        let x = self.record.seconds_since(origin);
        let x_format = AxisFormat::Time {
            origin,
            pattern: "%m-%d %H:%M",
        };

        let panels = [
            ("Press", "Press [hPa]"),
            ("Rain", "Rain [mm]"),
            ("Ta002", "Temp [°C]"),
            ("U010", "WS [m/s]"),
        ];
        let mut charts = vec![];
        for (i, &(col, label)) in panels.iter().enumerate() {
            let pts = izip!(&x, self.record.column(col)?)
                .map(|(&x, y)| (x, y.into_option().unwrap_or(std::f64::NAN)))
                .collect();
            let chart = XYChart::new("Datetime", label)
                .with_formats(x_format, AxisFormat::Decimals(2))
                .with_series(Series::new(pts).with_kind(SeriesKind::LineMarkers));
            charts.push(if i + 1 < panels.len() {
                chart.hide_x_labels()
            } else {
                chart
            });
        }
        let path = out_dir.join("surface_timeseries.svg");
        render_stacked(&path, &charts, &style.with_size(1500, 600))?;
        written.push(path);

        // Plot the hours on an arbitrary day so they format as a clock time.
        let midnight = NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| AnalysisError::InvalidInput("bad reference date".to_owned()))?;
        let pts = self
            .diurnal
            .iter()
            .map(|h| (f64::from(h.hour) * 3600.0, h.mean))
            .collect();
        let path = out_dir.join("diurnal_obukhov.svg");
        XYChart::new("Hour", "Obukhov length [m]")
            .with_formats(
                AxisFormat::Time {
                    origin: midnight,
                    pattern: "%H:%M:%S",
                },
                AxisFormat::Plain,
            )
            .with_series(Series::new(pts).with_kind(SeriesKind::LineMarkers))
            .render_svg(&path, style)?;
        written.push(path);

        let path = out_dir.join("energy_balance.svg");
        MultiAxisChart::from_time_series(&self.window, &[&["NRad"], &["H"], &["LE"], &["G"]])?
            .render_svg(&path, &style.with_size(1500, 400))?;
        written.push(path);

        Ok(written)
    }
}
