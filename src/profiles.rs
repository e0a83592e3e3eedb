//! Vertical profiles of temperature and moisture from radiosonde or tower snapshots.

use crate::{
    error::{AnalysisError, Result},
    interpolation::linear_interpolate,
    met_formulas::{potential_temperature, specific_humidity, vapor_pressure},
    plot::{palette_color, PlotStyle, Series, SeriesKind, XYChart},
    table::Table,
};
use itertools::izip;
use metfor::{Celsius, HectoPascal, Quantity};
use optional::{none, some, Optioned};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// Snapshot files are the ones with names ending in this.
pub const SNAPSHOT_SUFFIX: &str = "UTC.txt";

/// Find the snapshot files in a directory, sorted by file name.
pub fn discover_snapshots<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir.as_ref())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.ends_with(SNAPSHOT_SUFFIX))
                    .unwrap_or(false)
        })
        .collect();

    paths.sort();
    debug!(dir = %dir.as_ref().display(), found = paths.len(), "profile snapshots");

    Ok(paths)
}

/// One vertical profile.
///
/// Only levels with a height, temperature, dew point and pressure are kept.
#[derive(Clone, Debug)]
pub struct Snapshot {
    name: String,
    height: Vec<f64>,
    temperature: Vec<f64>,
    dew_point: Vec<f64>,
    pressure: Vec<f64>,
    theta: Vec<f64>,
    vapor_pressure: Vec<f64>,
    specific_humidity: Vec<f64>,
}

impl Snapshot {
    /// Load a snapshot file, the name is the file stem.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::from_table(name, &Table::from_file(path)?)
    }

    /// Build a snapshot from a table whose first column is the height and that has the columns
    /// `T` (°C), `Td` (°C) and `press` (hPa).
    pub fn from_table<S: Into<String>>(name: S, table: &Table) -> Result<Self> {
        let name = name.into();

        // Check the columns before dropping rows so a missing one is reported as such.
        for col in &["T", "Td", "press"] {
            table.column(col)?;
        }
        table.column_at(0)?;

        let table = table.drop_missing_rows();
        if table.is_empty() {
            warn!(name = %name, "profile has no complete levels");
        }

        let values = |col: &[Optioned<f64>]| -> Vec<f64> { col.iter().map(|v| v.unpack()).collect() };

        let height = values(table.column_at(0)?);
        let temperature = values(table.column("T")?);
        let dew_point = values(table.column("Td")?);
        let pressure = values(table.column("press")?);

        let theta = izip!(&temperature, &pressure)
            .map(|(&t, &p)| potential_temperature(Celsius(t), HectoPascal(p)).unpack())
            .collect();

        let vapor_pressure: Vec<f64> = dew_point
            .iter()
            .map(|&td| vapor_pressure(Celsius(td)).unpack())
            .collect();

        let specific_humidity = izip!(&vapor_pressure, &pressure)
            .map(|(&e, &p)| specific_humidity(HectoPascal(e), HectoPascal(p)))
            .collect();

        Ok(Snapshot {
            name,
            height,
            temperature,
            dew_point,
            pressure,
            theta,
            vapor_pressure,
            specific_humidity,
        })
    }

    /// Name of the snapshot, used as the chart label.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of levels.
    #[inline]
    pub fn len(&self) -> usize {
        self.height.len()
    }

    /// True if there are no levels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.height.is_empty()
    }

    /// Heights, m
    #[inline]
    pub fn height(&self) -> &[f64] {
        &self.height
    }

    /// Temperature, °C
    #[inline]
    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    /// Dew point, °C
    #[inline]
    pub fn dew_point(&self) -> &[f64] {
        &self.dew_point
    }

    /// Pressure, hPa
    #[inline]
    pub fn pressure(&self) -> &[f64] {
        &self.pressure
    }

    /// Potential temperature, K
    #[inline]
    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    /// Vapor pressure, hPa
    #[inline]
    pub fn vapor_pressure(&self) -> &[f64] {
        &self.vapor_pressure
    }

    /// Specific humidity, kg/kg
    #[inline]
    pub fn specific_humidity(&self) -> &[f64] {
        &self.specific_humidity
    }

    /// Potential temperature interpolated to a height, missing outside the profile.
    pub fn theta_at(&self, height: f64) -> Optioned<f64> {
        self.interpolate(&self.theta, height)
    }

    /// Specific humidity interpolated to a height, missing outside the profile.
    pub fn specific_humidity_at(&self, height: f64) -> Optioned<f64> {
        self.interpolate(&self.specific_humidity, height)
    }

    fn interpolate(&self, vals: &[f64], height: f64) -> Optioned<f64> {
        let hs: Vec<Optioned<f64>> = self.height.iter().map(|&h| some(h)).collect();
        let vs: Vec<Optioned<f64>> = vals.iter().map(|&v| some(v)).collect();

        linear_interpolate(&hs, &vs, height)
    }

    /// Potential temperature at the lowest and highest levels and the bulk lapse rate between.
    pub fn summary(&self) -> ProfileSummary {
        let lowest = self.extreme_level(|a, b| a < b);
        let highest = self.extreme_level(|a, b| a > b);

        let lapse_rate = match (lowest, highest) {
            (Some((h0, t0)), Some((h1, t1))) if h1 > h0 => some((t1 - t0) / ((h1 - h0) / 1000.0)),
            _ => none(),
        };

        ProfileSummary {
            name: self.name.clone(),
            levels: self.len(),
            lowest,
            highest,
            lapse_rate,
        }
    }

    // (height, theta) of the level that wins the comparison on height.
    fn extreme_level<F>(&self, better: F) -> Option<(f64, f64)>
    where
        F: Fn(f64, f64) -> bool,
    {
        izip!(&self.height, &self.theta).fold(None, |acc, (&h, &t)| match acc {
            Some((best_h, _)) if !better(h, best_h) => acc,
            _ => Some((h, t)),
        })
    }
}

/// Potential temperature summary of one snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileSummary {
    /// Snapshot name
    pub name: String,
    /// Number of complete levels
    pub levels: usize,
    /// Height (m) and potential temperature (K) of the lowest level
    pub lowest: Option<(f64, f64)>,
    /// Height (m) and potential temperature (K) of the highest level
    pub highest: Option<(f64, f64)>,
    /// Change in potential temperature with height between those levels, K/km
    pub lapse_rate: Optioned<f64>,
}

/// All the snapshots of a profile analysis.
#[derive(Clone, Debug, Default)]
pub struct ProfileAnalysis {
    snapshots: Vec<Snapshot>,
}

impl ProfileAnalysis {
    /// Create from snapshots that are already loaded.
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        ProfileAnalysis { snapshots }
    }

    /// Load every snapshot in a directory, in file name order.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let paths = discover_snapshots(&dir)?;
        if paths.is_empty() {
            return Err(AnalysisError::InvalidInput(format!(
                "no *{} files in {}",
                SNAPSHOT_SUFFIX,
                dir.as_ref().display()
            )));
        }

        let snapshots = paths
            .iter()
            .map(Snapshot::from_file)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(snapshots))
    }

    /// The snapshots.
    #[inline]
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// A summary of every snapshot.
    pub fn summaries(&self) -> Vec<ProfileSummary> {
        self.snapshots.iter().map(Snapshot::summary).collect()
    }

    /// Draw the potential temperature and specific humidity profiles, every snapshot against its
    /// own heights. Returns the paths written.
    pub fn render_charts(&self, out_dir: &Path, style: &PlotStyle) -> Result<Vec<PathBuf>> {
        let style = style.with_size(600, 600);

        let charts: [(&str, &str, fn(&Snapshot) -> &[f64]); 2] = [
            ("theta.svg", "Potential temperature [K]", Snapshot::theta),
            (
                "specific_humidity.svg",
                "Specific humidity [kg/kg]",
                Snapshot::specific_humidity,
            ),
        ];

        let mut written = vec![];
        for (file, x_label, getter) in charts.iter() {
            let mut chart = XYChart::new(*x_label, "Height [m]");
            for (i, snap) in self.snapshots.iter().enumerate() {
                let pts = izip!(getter(snap), &snap.height)
                    .map(|(&x, &h)| (x, h))
                    .collect();
                chart = chart.with_series(
                    Series::new(pts)
                        .with_kind(SeriesKind::LineMarkers)
                        .with_color(palette_color(i))
                        .with_label(snap.name.as_str()),
                );
            }

            let path = out_dir.join(file);
            chart.render_svg(&path, &style)?;
            written.push(path);
        }

        Ok(written)
    }
}
