//! Analysis of turbulence power spectra.
//!
//! Spectra are normalized with the surface layer scales, compared with the empirical (Kaimal type)
//! curves fitted by Olesen et al., and the turbulent kinetic energy dissipation rate is estimated
//! from the inertial subrange.

use crate::{
    error::{AnalysisError, Result},
    keys::WindComponent,
    plot::{AxisFormat, PlotStyle, RefLine, Scale, Series, SeriesKind, XYChart, TAB10},
    table::Table,
};
use itertools::{izip, Itertools};
use optional::{none, some, Optioned};
use plotters::style::{BLACK, RED};
use serde::{Deserialize, Serialize};
use std::{
    f64::consts::PI,
    path::{Path, PathBuf},
};
use strum::IntoEnumIterator;
use tracing::{debug, warn};

/// Normalized frequency where the inertial subrange starts.
pub const INERTIAL_SUBRANGE_START: f64 = 1.2;

/// Ratio of the cross wind or vertical to the along wind spectrum in the inertial subrange for
/// isotropic turbulence.
pub const ISOTROPY_RATIO: f64 = 4.0 / 3.0;

/// Half width of the band around [`ISOTROPY_RATIO`] counted as isotropic.
pub const ISOTROPY_TOLERANCE: f64 = 0.3;

/// Surface layer scales and Kolmogorov constants for normalizing the spectra.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralConstants {
    /// Mean wind speed, m/s
    pub mean_wind: f64,
    /// Friction velocity, m/s
    pub friction_velocity: f64,
    /// Measurement height, m
    pub height: f64,
    /// Kolmogorov constant for the along wind component
    pub alpha_u: f64,
    /// Kolmogorov constant for the cross wind component
    pub alpha_v: f64,
    /// Kolmogorov constant for the vertical component
    pub alpha_w: f64,
}

impl Default for SpectralConstants {
    fn default() -> Self {
        SpectralConstants {
            mean_wind: 2.706808,
            friction_velocity: 0.209603,
            height: 3.0,
            alpha_u: 0.55,
            alpha_v: 0.73,
            alpha_w: 0.73,
        }
    }
}

impl SpectralConstants {
    /// The Kolmogorov constant for a component.
    pub fn alpha(&self, component: WindComponent) -> f64 {
        match component {
            WindComponent::U => self.alpha_u,
            WindComponent::V => self.alpha_v,
            WindComponent::W => self.alpha_w,
        }
    }
}

/// Area under the curve `ys(xs)` by the trapezoidal rule. The spacing need not be uniform.
///
/// Fewer than two points have no area.
pub fn trapezoidal_rule(xs: &[f64], ys: &[f64]) -> Result<f64> {
    if xs.len() != ys.len() {
        return Err(AnalysisError::InvalidInput(format!(
            "trapezoidal rule needs matching lengths, got {} x and {} y values",
            xs.len(),
            ys.len()
        )));
    }

    Ok(izip!(xs, ys)
        .tuple_windows::<(_, _)>()
        .map(|((x0, y0), (x1, y1))| 0.5 * (y1 + y0) * (x1 - x0))
        .sum())
}

/// Frequency scaled by the height and mean wind, `n = f z / u`.
#[inline]
pub fn normalized_frequency(freq: f64, height: f64, mean_wind: f64) -> f64 {
    freq * height / mean_wind
}

/// The empirical normalized spectrum of a component at normalized frequency `n`.
#[inline]
pub fn empirical_spectrum(component: WindComponent, n: f64) -> f64 {
    let (a, b) = match component {
        WindComponent::U => (79.0, 263.0),
        WindComponent::V => (13.0, 32.0),
        WindComponent::W => (3.5, 8.6),
    };

    a * n / (1.0 + b * n.powf(5.0 / 3.0))
}

/// Spectral density scaled by the frequency and friction velocity, `f S / u*²`.
#[inline]
pub fn normalized_spectrum(freq: f64, density: f64, friction_velocity: f64) -> f64 {
    freq * density / (friction_velocity * friction_velocity)
}

/// Dissipation rate of turbulent kinetic energy from one point of the inertial subrange,
/// `ε = (2π f / u) (f S / α)^(3/2)`.
#[inline]
pub fn dissipation_rate(freq: f64, density: f64, alpha: f64, mean_wind: f64) -> f64 {
    (2.0 * PI * freq / mean_wind) * (freq * density / alpha).powf(1.5)
}

/// Measured spectral densities of the three wind components.
#[derive(Clone, Debug, Default)]
pub struct SpectralData {
    freq: Vec<f64>,
    su: Vec<f64>,
    sv: Vec<f64>,
    sw: Vec<f64>,
}

impl SpectralData {
    /// Create from parallel vectors.
    pub fn new(freq: Vec<f64>, su: Vec<f64>, sv: Vec<f64>, sw: Vec<f64>) -> Result<Self> {
        if su.len() != freq.len() || sv.len() != freq.len() || sw.len() != freq.len() {
            return Err(AnalysisError::InvalidInput(
                "spectra and frequencies differ in length".to_owned(),
            ));
        }

        Ok(SpectralData { freq, su, sv, sw })
    }

    /// Read the `freq`, `Su`, `Sv` and `Sw` columns of a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_table(&Table::from_file(path)?)
    }

    /// Take the `freq`, `Su`, `Sv` and `Sw` columns of a table. Rows with a missing value in any
    /// of them are skipped.
    pub fn from_table(table: &Table) -> Result<Self> {
        let mut selected = Table::new().with_column("freq", table.column("freq")?.to_vec())?;
        for comp in WindComponent::iter() {
            let name = comp.spectrum_column();
            selected = selected.with_column(name, table.column(name)?.to_vec())?;
        }

        let complete = selected.drop_missing_rows();
        if complete.len() < selected.len() {
            warn!(
                skipped = selected.len() - complete.len(),
                "spectral rows with missing values"
            );
        }
        if complete.is_empty() {
            return Err(AnalysisError::NotEnoughData);
        }

        let col = |name: &str| -> Result<Vec<f64>> {
            Ok(complete.column(name)?.iter().map(|v| v.unpack()).collect())
        };

        Self::new(col("freq")?, col("Su")?, col("Sv")?, col("Sw")?)
    }

    /// The frequencies, 1/s.
    #[inline]
    pub fn frequency(&self) -> &[f64] {
        &self.freq
    }

    /// The spectral density of a component.
    #[inline]
    pub fn density(&self, component: WindComponent) -> &[f64] {
        match component {
            WindComponent::U => &self.su,
            WindComponent::V => &self.sv,
            WindComponent::W => &self.sw,
        }
    }

    /// The number of frequencies.
    #[inline]
    pub fn len(&self) -> usize {
        self.freq.len()
    }

    /// True if there are no frequencies.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.freq.is_empty()
    }
}

/// Results for one wind component.
#[derive(Clone, Debug)]
pub struct ComponentSpectrum {
    /// Which component
    pub component: WindComponent,
    /// `f S / u*²` at every frequency
    pub normalized: Vec<f64>,
    /// The empirical model at every normalized frequency
    pub model: Vec<f64>,
    /// Variance of the component, the integral of the spectrum over frequency
    pub variance: f64,
    /// Dissipation rate at every inertial subrange frequency
    pub dissipation: Vec<f64>,
}

/// The full spectral analysis.
#[derive(Clone, Debug)]
pub struct SpectralAnalysis {
    /// Frequency, 1/s
    pub frequency: Vec<f64>,
    /// Normalized frequency `n = f z / u`
    pub normalized_frequency: Vec<f64>,
    /// Per component results in u, v, w order
    pub components: Vec<ComponentSpectrum>,
    /// Sv / Su at every frequency
    pub ratio_v_u: Vec<f64>,
    /// Sw / Su at every frequency
    pub ratio_w_u: Vec<f64>,
    /// Frequencies with `n >= 1.2`
    pub inertial_frequency: Vec<f64>,
    /// Mean of the three dissipation rates at every inertial subrange frequency
    pub mean_dissipation: Vec<f64>,
    /// The mean dissipation rate averaged over the inertial subrange frequency band
    pub band_dissipation: Optioned<f64>,
    /// Fraction of inertial subrange points with Sv/Su inside the isotropy band
    pub isotropy_fraction_v: Optioned<f64>,
    /// Fraction of inertial subrange points with Sw/Su inside the isotropy band
    pub isotropy_fraction_w: Optioned<f64>,
}

impl SpectralAnalysis {
    /// Analyze measured spectra.
    pub fn analyze(data: &SpectralData, consts: &SpectralConstants) -> Result<Self> {
        if data.is_empty() {
            return Err(AnalysisError::NotEnoughData);
        }

        let freq = data.frequency();
        let n: Vec<f64> = freq
            .iter()
            .map(|&f| normalized_frequency(f, consts.height, consts.mean_wind))
            .collect();

        let inertial: Vec<usize> = (0..n.len())
            .filter(|&i| n[i] >= INERTIAL_SUBRANGE_START)
            .collect();
        let inertial_frequency: Vec<f64> = inertial.iter().map(|&i| freq[i]).collect();

        debug!(
            points = freq.len(),
            inertial = inertial.len(),
            "spectral analysis"
        );

        let components = WindComponent::iter()
            .map(|comp| -> Result<ComponentSpectrum> {
                let density = data.density(comp);
                let alpha = consts.alpha(comp);

                Ok(ComponentSpectrum {
                    component: comp,
                    normalized: izip!(freq, density)
                        .map(|(&f, &s)| normalized_spectrum(f, s, consts.friction_velocity))
                        .collect(),
                    model: n.iter().map(|&n| empirical_spectrum(comp, n)).collect(),
                    variance: trapezoidal_rule(freq, density)?,
                    dissipation: inertial
                        .iter()
                        .map(|&i| dissipation_rate(freq[i], density[i], alpha, consts.mean_wind))
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mean_dissipation: Vec<f64> = izip!(
            &components[0].dissipation,
            &components[1].dissipation,
            &components[2].dissipation
        )
        .map(|(u, v, w)| (u + v + w) / 3.0)
        .collect();

        let band_dissipation = match inertial_frequency.len() {
            0 => none(),
            1 => some(mean_dissipation[0]),
            len => {
                let width = inertial_frequency[len - 1] - inertial_frequency[0];
                some(trapezoidal_rule(&inertial_frequency, &mean_dissipation)? / width)
            }
        };

        let ratio = |comp: WindComponent| -> Vec<f64> {
            izip!(data.density(comp), data.density(WindComponent::U))
                .map(|(s, su)| s / su)
                .collect()
        };
        let ratio_v_u = ratio(WindComponent::V);
        let ratio_w_u = ratio(WindComponent::W);

        let isotropy_fraction_v = isotropy_fraction(&ratio_v_u, &inertial);
        let isotropy_fraction_w = isotropy_fraction(&ratio_w_u, &inertial);

        Ok(SpectralAnalysis {
            frequency: freq.to_vec(),
            normalized_frequency: n,
            components,
            ratio_v_u,
            ratio_w_u,
            inertial_frequency,
            mean_dissipation,
            band_dissipation,
            isotropy_fraction_v,
            isotropy_fraction_w,
        })
    }

    /// Results for one component.
    pub fn component(&self, component: WindComponent) -> &ComponentSpectrum {
        // Stored in declaration order
        &self.components[component as usize]
    }

    /// Mean of the three dissipation rates over all inertial subrange points.
    pub fn overall_dissipation(&self) -> Optioned<f64> {
        crate::stats::mean(&self.mean_dissipation)
    }

    /// Draw the spectrum, ratio and dissipation rate charts. Returns the paths written.
    pub fn render_charts(&self, out_dir: &Path, style: &PlotStyle) -> Result<Vec<PathBuf>> {
        let mut written = vec![];
        let square = style.with_size(style.height.max(600), style.height.max(600));

        for comp in &self.components {
            let name = comp.component.label();
            let path = out_dir.join(format!("spectrum_{}.svg", comp.component));

            XYChart::new("n = f z / u", format!("f S{}(f) / u*²", comp.component))
                .with_title(format!("{} Spectrum", name))
                .with_scales(Scale::Log, Scale::Log)
                .with_series(
                    Series::new(pairs(&self.normalized_frequency, &comp.normalized))
                        .with_kind(SeriesKind::Markers)
                        .with_label("measured"),
                )
                .with_series(
                    Series::new(pairs(&self.normalized_frequency, &comp.model))
                        .with_color(TAB10[1])
                        .with_label("Olesen"),
                )
                .render_svg(&path, &square)?;
            written.push(path);
        }

        for (comp, ratio) in &[
            (WindComponent::V, &self.ratio_v_u),
            (WindComponent::W, &self.ratio_w_u),
        ] {
            let path = out_dir.join(format!("ratio_s{}_su.svg", comp));

            XYChart::new("n = f z / u", "ratio")
                .with_title(format!("Ratio S{}/Su", comp))
                .with_scales(Scale::Log, Scale::Linear)
                .with_series(
                    Series::new(pairs(&self.normalized_frequency, ratio))
                        .with_kind(SeriesKind::Markers),
                )
                .with_ref_line(RefLine::Horizontal(ISOTROPY_RATIO - ISOTROPY_TOLERANCE, RED))
                .with_ref_line(RefLine::Horizontal(ISOTROPY_RATIO + ISOTROPY_TOLERANCE, RED))
                .with_ref_line(RefLine::Vertical(INERTIAL_SUBRANGE_START, RED))
                .render_svg(&path, &square)?;
            written.push(path);
        }

        let path = out_dir.join("dissipation.svg");
        let mut chart = XYChart::new("Frequency [1/s]", "Dissipation Rate")
            .with_formats(AxisFormat::Plain, AxisFormat::Plain);
        for (i, comp) in self.components.iter().enumerate() {
            chart = chart.with_series(
                Series::new(pairs(&self.inertial_frequency, &comp.dissipation))
                    .with_kind(SeriesKind::LineMarkers)
                    .with_color(TAB10[i])
                    .with_label(format!("ε{}", comp.component)),
            );
        }
        chart
            .with_series(
                Series::new(pairs(&self.inertial_frequency, &self.mean_dissipation))
                    .with_color(BLACK)
                    .with_label("mean"),
            )
            .render_svg(&path, style)?;
        written.push(path);

        Ok(written)
    }
}

fn isotropy_fraction(ratio: &[f64], inertial: &[usize]) -> Optioned<f64> {
    if inertial.is_empty() {
        return none();
    }

    let inside = inertial
        .iter()
        .filter(|&&i| (ratio[i] - ISOTROPY_RATIO).abs() <= ISOTROPY_TOLERANCE)
        .count();

    some(inside as f64 / inertial.len() as f64)
}

fn pairs(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    xs.iter().cloned().zip(ys.iter().cloned()).collect()
}
