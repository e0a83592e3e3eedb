//! Settings for the analyses, read from a JSON file.
//!
//! Every field has a default, so a configuration file only needs the values that differ.
//!
//! ```json
//! {
//!     "surface_file": "data/SurfaceData_Cabauw_May2008.txt",
//!     "window_start": "2008-05-09T00:00:00",
//!     "window_end": "2008-05-10T00:00:00",
//!     "spectral": { "mean_wind": 3.1 }
//! }
//! ```

use crate::{
    error::{AnalysisError, Result},
    spectra::SpectralConstants,
    turbulence::{TemperatureUnit, TurbulenceSettings},
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Input files, parameters and output location for every analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Surface station record
    pub surface_file: PathBuf,
    /// Sonic anemometer time series
    pub sonic_file: PathBuf,
    /// Spectral density table
    pub spectra_file: PathBuf,
    /// Directory holding the `*UTC.txt` profile snapshots
    pub profile_dir: PathBuf,
    /// Where charts are written
    pub output_dir: PathBuf,
    /// First time of the surface analysis window
    pub window_start: NaiveDateTime,
    /// Last time of the surface analysis window
    pub window_end: NaiveDateTime,
    /// Length of the averaging blocks for the turbulence analysis, minutes
    pub block_minutes: i64,
    /// Air density, kg/m³
    pub air_density: f64,
    /// Unit of the sonic temperature column
    pub sonic_temperature_unit: TemperatureUnit,
    /// Number of bins in the fluctuation histograms
    pub histogram_bins: usize,
    /// Heights (m) at which the profiles are reported
    pub report_heights: Vec<f64>,
    /// Scales and constants for the spectral analysis
    pub spectral: SpectralConstants,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from("/project/mrp/BLM/SERIES4");

        AnalysisConfig {
            surface_file: data_dir.join("SurfaceData_Cabauw_May2008.txt"),
            sonic_file: data_dir.join("Cabauw_TimeSeries_09May2008_05000530_rotated.txt"),
            spectra_file: data_dir.join("Cabauw_SpecDens_09May2008_05000530.txt"),
            profile_dir: data_dir,
            output_dir: PathBuf::from("plots"),
            window_start: midnight(2008, 5, 8),
            window_end: midnight(2008, 5, 13),
            block_minutes: 30,
            air_density: 1.2,
            sonic_temperature_unit: TemperatureUnit::Kelvin,
            histogram_bins: 50,
            report_heights: vec![10.0, 100.0, 500.0, 1000.0],
            spectral: SpectralConstants::default(),
        }
    }
}

fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

impl AnalysisConfig {
    /// Load a configuration from a JSON file and check it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;

        debug!(path = %path.as_ref().display(), "loaded configuration");
        Ok(config)
    }

    /// Check that the values make sense.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(AnalysisError::InvalidInput(msg.to_owned()));

        if self.window_end < self.window_start {
            return invalid("window_end is before window_start");
        }
        if self.block_minutes <= 0 {
            return invalid("block_minutes must be positive");
        }
        if Duration::try_minutes(self.block_minutes).is_none() {
            return invalid("block_minutes is too large");
        }
        if !(self.air_density > 0.0) {
            return invalid("air_density must be positive");
        }
        if self.histogram_bins == 0 {
            return invalid("histogram_bins must be at least 1");
        }

        let s = &self.spectral;
        if !(s.mean_wind > 0.0 && s.friction_velocity > 0.0 && s.height > 0.0) {
            return invalid("spectral scales must be positive");
        }

        Ok(())
    }

    /// The averaging block length.
    #[inline]
    pub fn block(&self) -> Result<Duration> {
        Duration::try_minutes(self.block_minutes).ok_or_else(|| {
            AnalysisError::InvalidInput(format!(
                "block_minutes {} is out of range",
                self.block_minutes
            ))
        })
    }

    /// Settings for the turbulence analysis.
    pub fn turbulence_settings(&self) -> Result<TurbulenceSettings> {
        Ok(TurbulenceSettings {
            block: self.block()?,
            density: self.air_density,
            temperature_unit: self.sonic_temperature_unit,
            histogram_bins: self.histogram_bins,
        })
    }
}
