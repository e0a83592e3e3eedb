//! Eddy covariance analysis of a sonic anemometer record.
//!
//! The record is split into a slowly varying mean and a turbulent fluctuation by averaging over
//! fixed blocks and interpolating the block means back onto the sample times. Covariances of the
//! fluctuations give the stress tensor and the kinematic heat flux.

use crate::{
    error::{AnalysisError, Result},
    keys::WindComponent,
    met_formulas::{friction_velocity, obukhov_length, stress_component, turbulent_kinetic_energy},
    plot::{render_stacked, AxisFormat, HistogramChart, PlotStyle, Series, SeriesKind, XYChart},
    stats::{present, Histogram},
    table::Table,
    timeseries::{DateColumns, TimeSeries},
};
use chrono::{Duration, NaiveDateTime};
use itertools::{izip, Itertools};
use metfor::{Celsius, Kelvin, Meters, MetersPSec};
use optional::{none, some, Optioned};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tracing::debug;

/// Name of the column holding the block mean of `column`.
pub fn bar_column(column: &str) -> String {
    format!("{}_bar", column)
}

/// Name of the column holding the fluctuation of `column`.
pub fn prime_column(column: &str) -> String {
    format!("{}_prime", column)
}

/// Name of the kinematic heat flux column.
pub const HEAT_FLUX_COLUMN: &str = "wT";

/// The unit of the sonic temperature column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    /// Kelvin
    Kelvin,
    /// Degrees Celsius
    Celsius,
}

impl TemperatureUnit {
    /// Interpret a value in this unit.
    #[inline]
    pub fn to_kelvin(self, val: f64) -> Kelvin {
        match self {
            TemperatureUnit::Kelvin => Kelvin(val),
            TemperatureUnit::Celsius => Kelvin::from(Celsius(val)),
        }
    }
}

/// Options for the turbulence analysis.
#[derive(Clone, Copy, Debug)]
pub struct TurbulenceSettings {
    /// Averaging block length
    pub block: Duration,
    /// Air density, kg/m³
    pub density: f64,
    /// Unit of the `T` column
    pub temperature_unit: TemperatureUnit,
    /// Number of bins in the fluctuation histograms
    pub histogram_bins: usize,
}

impl Default for TurbulenceSettings {
    fn default() -> Self {
        TurbulenceSettings {
            block: Duration::minutes(30),
            density: 1.2,
            temperature_unit: TemperatureUnit::Kelvin,
            histogram_bins: 50,
        }
    }
}

/// Load a sonic record with the columns `yyyy mm dd HH MIN SEC u v w T`.
pub fn load_sonic_series<P: AsRef<Path>>(path: P) -> Result<TimeSeries> {
    sonic_series_from_table(Table::from_file(path)?)
}

/// Build the time series of a sonic record from its table.
pub fn sonic_series_from_table(table: Table) -> Result<TimeSeries> {
    TimeSeries::from_date_columns(
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
}

/// Split columns into block means and fluctuations.
///
/// For every column `c` two columns are added: `c_bar`, the block means interpolated onto the
/// sample times, and `c_prime`, the raw value minus `c_bar`.
pub fn reynolds_decomposition(
    series: &TimeSeries,
    columns: &[&str],
    block: Duration,
) -> Result<TimeSeries> {
    let means = series.resample_mean(block)?;

    let mut out = series.clone();
    for &col in columns {
        let raw = series.column(col)?;
        let bar = means.interpolate_to(series.times(), col)?;
        let prime = izip!(raw, &bar)
            .map(|(r, b)| match (r.into_option(), b.into_option()) {
                (Some(r), Some(b)) => some(r - b),
                _ => none(),
            })
            .collect();

        out = out
            .with_column(bar_column(col), bar)?
            .with_column(prime_column(col), prime)?;
    }

    Ok(out)
}

/// Add the stress tensor components `uu uv uw vv vw ww`, ρ a' b', and the kinematic heat flux
/// `wT`, w' T', to a decomposed series.
pub fn add_fluxes(series: TimeSeries, density: f64) -> Result<TimeSeries> {
    let mut out = series;

    for pair in WindComponent::iter().combinations_with_replacement(2) {
        let (a, b) = (pair[0], pair[1]);
        let stress = product(
            out.column(&prime_column(a.as_ref()))?,
            out.column(&prime_column(b.as_ref()))?,
            |a, b| stress_component(a, b, density),
        );
        out = out.with_column(format!("{}{}", a, b), stress)?;
    }

    let heat_flux = product(
        out.column(&prime_column("w"))?,
        out.column(&prime_column("T"))?,
        |w, t| w * t,
    );
    out.with_column(HEAT_FLUX_COLUMN, heat_flux)
}

fn product<F>(a: &[Optioned<f64>], b: &[Optioned<f64>], f: F) -> Vec<Optioned<f64>>
where
    F: Fn(f64, f64) -> f64,
{
    izip!(a, b)
        .map(|(a, b)| match (a.into_option(), b.into_option()) {
            (Some(a), Some(b)) => some(f(a, b)),
            _ => none(),
        })
        .collect()
}

/// Flux statistics of one averaging block.
#[derive(Clone, Copy, Debug)]
pub struct BlockFluxes {
    /// Start of the block
    pub start: NaiveDateTime,
    /// Mean ρ u'u', N/m²
    pub uu: Optioned<f64>,
    /// Mean ρ u'v', N/m²
    pub uv: Optioned<f64>,
    /// Mean ρ u'w', N/m²
    pub uw: Optioned<f64>,
    /// Mean ρ v'v', N/m²
    pub vv: Optioned<f64>,
    /// Mean ρ v'w', N/m²
    pub vw: Optioned<f64>,
    /// Mean ρ w'w', N/m²
    pub ww: Optioned<f64>,
    /// Mean w'T', K m/s
    pub heat_flux: Optioned<f64>,
    /// Mean temperature
    pub mean_temperature: Optioned<Kelvin>,
    /// Friction velocity from the kinematic momentum fluxes
    pub friction_velocity: Optioned<MetersPSec>,
    /// Obukhov length, infinite when there is no heat flux
    pub obukhov_length: Optioned<Meters>,
    /// Standard deviation of u
    pub sigma_u: Optioned<f64>,
    /// Standard deviation of v
    pub sigma_v: Optioned<f64>,
    /// Standard deviation of w
    pub sigma_w: Optioned<f64>,
    /// Turbulent kinetic energy per unit mass, m²/s²
    pub tke: Optioned<f64>,
}

/// Reduce a series with flux columns to per block statistics.
pub fn block_fluxes(series: &TimeSeries, settings: &TurbulenceSettings) -> Result<Vec<BlockFluxes>> {
    let means = series.resample_mean(settings.block)?;
    let stds = series.resample_std(settings.block)?;

    let mean = |name: &str| means.column(name);
    let (uu, uv, uw) = (mean("uu")?, mean("uv")?, mean("uw")?);
    let (vv, vw, ww) = (mean("vv")?, mean("vw")?, mean("ww")?);
    let heat = mean(HEAT_FLUX_COLUMN)?;
    let temp = mean("T")?;

    let sigma = |c: WindComponent| stds.column(&prime_column(c.as_ref()));
    let (su, sv, sw) = (
        sigma(WindComponent::U)?,
        sigma(WindComponent::V)?,
        sigma(WindComponent::W)?,
    );

    let rho = settings.density;
    let blocks = (0..means.len())
        .map(|i| {
            let mean_temperature: Optioned<Kelvin> = temp[i]
                .map_t(|t| settings.temperature_unit.to_kelvin(t));

            let u_star: Optioned<MetersPSec> = match (uw[i].into_option(), vw[i].into_option()) {
                (Some(uw), Some(vw)) => some(friction_velocity(uw / rho, vw / rho)),
                _ => none(),
            };

            let obukhov: Optioned<Meters> = match (
                u_star.into_option(),
                heat[i].into_option(),
                mean_temperature.into_option(),
            ) {
                (Some(u_star), Some(h), Some(t)) => some(obukhov_length(u_star, h, t)),
                _ => none(),
            };

            let tke = match (su[i].into_option(), sv[i].into_option(), sw[i].into_option()) {
                (Some(a), Some(b), Some(c)) => some(turbulent_kinetic_energy(a * a, b * b, c * c)),
                _ => none(),
            };

            BlockFluxes {
                start: means.times()[i],
                uu: uu[i],
                uv: uv[i],
                uw: uw[i],
                vv: vv[i],
                vw: vw[i],
                ww: ww[i],
                heat_flux: heat[i],
                mean_temperature,
                friction_velocity: u_star,
                obukhov_length: obukhov,
                sigma_u: su[i],
                sigma_v: sv[i],
                sigma_w: sw[i],
                tke,
            }
        })
        .collect();

    Ok(blocks)
}

/// The turbulence analysis of one record.
#[derive(Clone, Debug)]
pub struct TurbulenceAnalysis {
    series: TimeSeries,
    blocks: Vec<BlockFluxes>,
    histogram_bins: usize,
}

impl TurbulenceAnalysis {
    /// Decompose the record, compute the fluxes and reduce them over the blocks.
    pub fn analyze(series: &TimeSeries, settings: &TurbulenceSettings) -> Result<Self> {
        if series.len() < 2 {
            return Err(AnalysisError::NotEnoughData);
        }

        let columns = ["u", "v", "w", "T"];
        let decomposed = reynolds_decomposition(series, &columns, settings.block)?;
        let series = add_fluxes(decomposed, settings.density)?;
        let blocks = block_fluxes(&series, settings)?;

        debug!(samples = series.len(), blocks = blocks.len(), "turbulence analysis");

        Ok(TurbulenceAnalysis {
            series,
            blocks,
            histogram_bins: settings.histogram_bins,
        })
    }

    /// The record with the decomposition and flux columns added.
    #[inline]
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// The per block statistics.
    #[inline]
    pub fn blocks(&self) -> &[BlockFluxes] {
        &self.blocks
    }

    /// Histogram of the fluctuations of a wind component.
    pub fn histogram(&self, component: WindComponent) -> Result<Histogram> {
        let vals = present(self.series.column(&prime_column(component.as_ref()))?);
        Ok(Histogram::new(&vals, self.histogram_bins))
    }

    /// Draw the time series panels and fluctuation histograms. Returns the paths written.
    pub fn render_charts(&self, out_dir: &Path, style: &PlotStyle) -> Result<Vec<PathBuf>> {
        let origin = match self.series.times().first() {
            Some(&t) => t,
            None => return Err(AnalysisError::NotEnoughData),
        };
        let x = self.series.seconds_since(origin);
        let x_format = AxisFormat::Time {
            origin,
            pattern: "%H:%M:%S",
        };

        let panels = [("T", "T [K]"), ("w", "W [m/s]"), ("v", "V [m/s]"), ("u", "U [m/s]")];
        let charts = panels
            .iter()
            .enumerate()
            .map(|(i, &(col, label))| -> Result<XYChart> {
                let pts = izip!(&x, self.series.column(col)?)
                    .map(|(&x, y)| (x, y.into_option().unwrap_or(std::f64::NAN)))
                    .collect();
                let chart = XYChart::new("Datetime", label)
                    .with_formats(x_format, AxisFormat::Decimals(2))
                    .with_series(Series::new(pts).with_kind(SeriesKind::LineMarkers));
                Ok(if i + 1 < panels.len() {
                    chart.hide_x_labels()
                } else {
                    chart
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut written = vec![];

        let path = out_dir.join("sonic_timeseries.svg");
        render_stacked(&path, &charts, &style.with_size(1500, 600))?;
        written.push(path);

        for comp in WindComponent::iter() {
            let path = out_dir.join(format!("hist_{}.svg", comp));
            HistogramChart::new(self.histogram(comp)?, format!("{} flux [m/s]", comp.label()))
                .render_svg(&path, &style.with_size(800, 600))?;
            written.push(path);
        }

        Ok(written)
    }
}
