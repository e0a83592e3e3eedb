#![warn(missing_docs)]
//! Functions and data types for analyzing boundary-layer meteorology observations: a multi-day
//! surface station record, vertical profile snapshots, a high-frequency sonic anemometer time
//! series and the velocity spectra derived from it.
//!
//! Each analysis loads whitespace delimited text tables, computes its derived quantities and can
//! render its charts as SVG files.

//
// API
//
pub use crate::{
    chart::MultiAxisChart,
    config::AnalysisConfig,
    error::{AnalysisError, Result},
    interpolation::linear_interpolate,
    keys::WindComponent,
    plot::PlotStyle,
    profiles::{ProfileAnalysis, ProfileSummary, Snapshot},
    spectra::{SpectralAnalysis, SpectralConstants, SpectralData},
    surface::SurfaceAnalysis,
    table::Table,
    timeseries::{DateColumns, TimeSeries},
    turbulence::{BlockFluxes, TemperatureUnit, TurbulenceAnalysis, TurbulenceSettings},
};

pub mod chart;
pub mod config;
pub mod error;
pub mod met_formulas;
pub mod plot;
pub mod profiles;
pub mod spectra;
pub mod stats;
pub mod surface;
pub mod table;
pub mod timeseries;
pub mod turbulence;

/// Utility functions and types.
pub mod utility;

//
// Internal use only
//

// Modules
mod interpolation;
mod keys;
