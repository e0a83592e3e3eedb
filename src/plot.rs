//! Render diagnostic charts to SVG files.
//!
//! Charts are described by plain data types ([`XYChart`], [`HistogramChart`]) and drawn with
//! `plotters`. Log scaled axes are drawn in log10 space with the tick labels converted back, so
//! values that are zero, negative or not finite are left out of a log axis.

use crate::{
    error::{render_err, Result},
    stats::Histogram,
};
use chrono::{Duration, NaiveDateTime};
use plotters::{coord::Shift, prelude::*};
use std::path::Path;
use tracing::info;

/// The matplotlib `tab10` palette.
pub const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Get a palette color, cycling when the index runs past the end.
#[inline]
pub fn palette_color(idx: usize) -> RGBColor {
    TAB10[idx % TAB10.len()]
}

/// Sizes and colors shared by every chart.
#[derive(Clone, Copy, Debug)]
pub struct PlotStyle {
    /// Width of the image in pixels
    pub width: u32,
    /// Height of the image in pixels
    pub height: u32,
    /// Stroke width of data lines
    pub line_width: u32,
    /// Radius of point markers
    pub marker_size: u32,
    /// Size of tick labels, titles are a little larger.
    pub font_size: u32,
    /// Color of the grid lines
    pub grid_color: RGBColor,
}

impl Default for PlotStyle {
    fn default() -> Self {
        PlotStyle {
            width: 1200,
            height: 480,
            line_width: 1,
            marker_size: 2,
            font_size: 14,
            grid_color: RGBColor(128, 128, 128),
        }
    }
}

impl PlotStyle {
    /// Same style with a different image size.
    pub fn with_size(self, width: u32, height: u32) -> Self {
        PlotStyle {
            width,
            height,
            ..self
        }
    }
}

/// How a series is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesKind {
    /// Connect the points with a line
    Line,
    /// Only draw a marker at each point
    Markers,
    /// A line with a marker at each point
    LineMarkers,
}

/// Linear or logarithmic axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    /// Linear axis
    Linear,
    /// Base 10 logarithmic axis
    Log,
}

impl Scale {
    /// Map a data value into drawing space, `None` if it can't be shown on this axis.
    #[inline]
    pub fn forward(self, val: f64) -> Option<f64> {
        match self {
            Scale::Linear if val.is_finite() => Some(val),
            Scale::Log if val.is_finite() && val > 0.0 => Some(val.log10()),
            _ => None,
        }
    }

    /// Map a value in drawing space back to data space.
    #[inline]
    pub fn inverse(self, val: f64) -> f64 {
        match self {
            Scale::Linear => val,
            Scale::Log => 10f64.powf(val),
        }
    }
}

/// How tick labels are written.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisFormat {
    /// A short general number format.
    Plain,
    /// A fixed number of decimal places.
    Decimals(usize),
    /// The value is seconds since `origin`, shown as a time with a `strftime` pattern.
    Time {
        /// The time at value zero
        origin: NaiveDateTime,
        /// Pattern for `chrono::format`
        pattern: &'static str,
    },
}

impl AxisFormat {
    /// Format a data value.
    pub fn format(&self, val: f64) -> String {
        match *self {
            AxisFormat::Plain => format_plain(val),
            AxisFormat::Decimals(n) => format!("{:.*}", n, val),
            AxisFormat::Time { origin, pattern } => {
                let t = origin + Duration::milliseconds((val * 1000.0).round() as i64);
                t.format(pattern).to_string()
            }
        }
    }

    fn format_scaled(&self, val: f64, scale: Scale) -> String {
        match scale {
            Scale::Linear => self.format(val),
            Scale::Log => format!("{:.0e}", scale.inverse(val)),
        }
    }
}

fn format_plain(val: f64) -> String {
    let abs = val.abs();
    if abs != 0.0 && !(1.0e-3..1.0e5).contains(&abs) {
        format!("{:.2e}", val)
    } else {
        let s = format!("{:.4}", val);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" {
            "0".to_owned()
        } else {
            s.to_owned()
        }
    }
}

/// A labelled set of points.
#[derive(Clone, Debug)]
pub struct Series {
    label: Option<String>,
    points: Vec<(f64, f64)>,
    color: RGBColor,
    kind: SeriesKind,
}

impl Series {
    /// A line series. Points that are not finite break the line.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Series {
            label: None,
            points,
            color: TAB10[0],
            kind: SeriesKind::Line,
        }
    }

    /// Builder method to set the legend label.
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder method to set the color.
    pub fn with_color(mut self, color: RGBColor) -> Self {
        self.color = color;
        self
    }

    /// Builder method to set how the series is drawn.
    pub fn with_kind(mut self, kind: SeriesKind) -> Self {
        self.kind = kind;
        self
    }

    /// The points of the series.
    #[inline]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}

/// A reference line across the whole chart.
#[derive(Clone, Copy, Debug)]
pub enum RefLine {
    /// A horizontal line at this y value
    Horizontal(f64, RGBColor),
    /// A vertical line at this x value
    Vertical(f64, RGBColor),
}

/// A chart with a single pair of axes.
#[derive(Clone, Debug)]
pub struct XYChart {
    title: Option<String>,
    x_label: String,
    y_label: String,
    x_scale: Scale,
    y_scale: Scale,
    x_format: AxisFormat,
    y_format: AxisFormat,
    show_x_labels: bool,
    series: Vec<Series>,
    ref_lines: Vec<RefLine>,
}

impl XYChart {
    /// Create a chart with linear axes.
    pub fn new<S: Into<String>, T: Into<String>>(x_label: S, y_label: T) -> Self {
        XYChart {
            title: None,
            x_label: x_label.into(),
            y_label: y_label.into(),
            x_scale: Scale::Linear,
            y_scale: Scale::Linear,
            x_format: AxisFormat::Plain,
            y_format: AxisFormat::Plain,
            show_x_labels: true,
            series: vec![],
            ref_lines: vec![],
        }
    }

    /// Builder method to set the title.
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method to set the axis scales.
    pub fn with_scales(mut self, x_scale: Scale, y_scale: Scale) -> Self {
        self.x_scale = x_scale;
        self.y_scale = y_scale;
        self
    }

    /// Builder method to set the tick label formats.
    pub fn with_formats(mut self, x_format: AxisFormat, y_format: AxisFormat) -> Self {
        self.x_format = x_format;
        self.y_format = y_format;
        self
    }

    /// Builder method to hide the x tick labels and description, used for stacked panels.
    pub fn hide_x_labels(mut self) -> Self {
        self.show_x_labels = false;
        self
    }

    /// Builder method to add a series.
    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Builder method to add a reference line.
    pub fn with_ref_line(mut self, line: RefLine) -> Self {
        self.ref_lines.push(line);
        self
    }

    /// The series in this chart.
    #[inline]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// The x and y ranges of the chart in drawing space.
    pub fn ranges(&self) -> ((f64, f64), (f64, f64)) {
        let pts = self.series.iter().flat_map(|s| s.points.iter()).filter_map(|&(x, y)| {
            match (self.x_scale.forward(x), self.y_scale.forward(y)) {
                (Some(x), Some(y)) => Some((x, y)),
                _ => None,
            }
        });

        let mut xs: Vec<f64> = vec![];
        let mut ys: Vec<f64> = vec![];
        for (x, y) in pts {
            xs.push(x);
            ys.push(y);
        }

        for line in &self.ref_lines {
            match *line {
                RefLine::Horizontal(y, _) => ys.extend(self.y_scale.forward(y)),
                RefLine::Vertical(x, _) => xs.extend(self.x_scale.forward(x)),
            }
        }

        (padded_range(&xs), padded_range(&ys))
    }

    /// Draw the chart into its own SVG file.
    pub fn render_svg<P: AsRef<Path>>(&self, path: P, style: &PlotStyle) -> Result<()> {
        let path = path.as_ref();
        {
            let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;
            self.draw_on(&root, style)?;
            root.present().map_err(render_err)?;
        }
        info!(path = %path.display(), "wrote chart");
        Ok(())
    }

    /// Draw the chart on part of a larger image.
    pub fn draw_on<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        style: &PlotStyle,
    ) -> Result<()> {
        let ((x0, x1), (y0, y1)) = self.ranges();

        let mut builder = ChartBuilder::on(area);
        builder
            .margin(10)
            .x_label_area_size(if self.show_x_labels { 45 } else { 5 })
            .y_label_area_size(80);
        if let Some(ref title) = self.title {
            builder.caption(title, ("sans-serif", style.font_size + 4));
        }
        let mut chart = builder
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(render_err)?;

        let x_fmt = |v: &f64| {
            if self.show_x_labels {
                self.x_format.format_scaled(*v, self.x_scale)
            } else {
                String::new()
            }
        };
        let y_fmt = |v: &f64| self.y_format.format_scaled(*v, self.y_scale);

        {
            let mut mesh = chart.configure_mesh();
            mesh.y_desc(self.y_label.as_str())
                .x_label_formatter(&x_fmt)
                .y_label_formatter(&y_fmt)
                .light_line_style(&TRANSPARENT)
                .bold_line_style(&style.grid_color.mix(0.3))
                .label_style(("sans-serif", style.font_size));
            if self.show_x_labels {
                mesh.x_desc(self.x_label.as_str());
            }
            mesh.draw().map_err(render_err)?;
        }

        for line in &self.ref_lines {
            let pts = match *line {
                RefLine::Horizontal(y, color) => self
                    .y_scale
                    .forward(y)
                    .map(|y| (vec![(x0, y), (x1, y)], color)),
                RefLine::Vertical(x, color) => self
                    .x_scale
                    .forward(x)
                    .map(|x| (vec![(x, y0), (x, y1)], color)),
            };
            if let Some((pts, color)) = pts {
                chart
                    .draw_series(LineSeries::new(pts, color.stroke_width(1)))
                    .map_err(render_err)?;
            }
        }

        let mut any_labels = false;
        for series in &self.series {
            let transformed: Vec<(f64, f64)> = series
                .points
                .iter()
                .map(|&(x, y)| {
                    match (self.x_scale.forward(x), self.y_scale.forward(y)) {
                        (Some(x), Some(y)) => (x, y),
                        _ => (std::f64::NAN, std::f64::NAN),
                    }
                })
                .collect();

            let color = series.color;
            let mut labelled = series.label.is_none();

            if series.kind != SeriesKind::Markers {
                let runs = split_runs(&transformed);
                let runs = if runs.is_empty() { vec![vec![]] } else { runs };
                for run in runs {
                    let anno = chart
                        .draw_series(LineSeries::new(run, color.stroke_width(style.line_width)))
                        .map_err(render_err)?;
                    if !labelled {
                        if let Some(ref label) = series.label {
                            anno.label(label.as_str()).legend(move |(x, y)| {
                                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                            });
                        }
                        labelled = true;
                    }
                }
            }

            if series.kind != SeriesKind::Line {
                let size = style.marker_size;
                let anno = chart
                    .draw_series(
                        transformed
                            .iter()
                            .filter(|(x, y)| x.is_finite() && y.is_finite())
                            .map(|&pt| Circle::new(pt, size, color.filled())),
                    )
                    .map_err(render_err)?;
                if !labelled {
                    if let Some(ref label) = series.label {
                        anno.label(label.as_str())
                            .legend(move |(x, y)| Circle::new((x + 10, y), 3, color.filled()));
                    }
                }
            }

            any_labels |= series.label.is_some();
        }

        if any_labels {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font(("sans-serif", style.font_size))
                .draw()
                .map_err(render_err)?;
        }

        Ok(())
    }
}

/// Draw charts stacked on top of each other in one image, the first chart at the top.
pub fn render_stacked<P: AsRef<Path>>(path: P, charts: &[XYChart], style: &PlotStyle) -> Result<()> {
    let path = path.as_ref();
    {
        let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let panels = root.split_evenly((charts.len().max(1), 1));
        for (chart, panel) in charts.iter().zip(panels.iter()) {
            chart.draw_on(panel, style)?;
        }

        root.present().map_err(render_err)?;
    }
    info!(path = %path.display(), panels = charts.len(), "wrote chart");
    Ok(())
}

/// A bar chart of a histogram.
#[derive(Clone, Debug)]
pub struct HistogramChart {
    x_label: String,
    y_label: String,
    color: RGBColor,
    histogram: Histogram,
}

impl HistogramChart {
    /// Create a chart of the histogram with the default bar color.
    pub fn new<S: Into<String>>(histogram: Histogram, x_label: S) -> Self {
        HistogramChart {
            x_label: x_label.into(),
            y_label: "Frequency".to_owned(),
            color: TAB10[0],
            histogram,
        }
    }

    /// Draw the chart into its own SVG file.
    pub fn render_svg<P: AsRef<Path>>(&self, path: P, style: &PlotStyle) -> Result<()> {
        let path = path.as_ref();
        {
            let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            let edges = self.histogram.edges();
            let (x0, x1) = (edges[0], edges[edges.len() - 1]);
            let y1 = (self.histogram.max_count().max(1) as f64) * 1.05;

            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .x_label_area_size(45)
                .y_label_area_size(70)
                .build_cartesian_2d(x0..x1, 0.0..y1)
                .map_err(render_err)?;

            chart
                .configure_mesh()
                .x_desc(self.x_label.as_str())
                .y_desc(self.y_label.as_str())
                .x_label_formatter(&|v| format_plain(*v))
                .y_label_formatter(&|v| format!("{:.0}", v))
                .light_line_style(&TRANSPARENT)
                .bold_line_style(&style.grid_color.mix(0.3))
                .label_style(("sans-serif", style.font_size))
                .draw()
                .map_err(render_err)?;

            let color = self.color;
            chart
                .draw_series(self.histogram.bins().map(|(l, r, c)| {
                    Rectangle::new([(l, 0.0), (r, c as f64)], color.mix(0.8).filled())
                }))
                .map_err(render_err)?;

            root.present().map_err(render_err)?;
        }
        info!(path = %path.display(), "wrote chart");
        Ok(())
    }
}

/// Split points into runs of consecutive finite points.
pub fn split_runs(points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = vec![];
    let mut current = vec![];

    for &(x, y) in points {
        if x.is_finite() && y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

/// Cut a polyline into dashes.
///
/// `pattern` holds alternating on and off lengths, starting with on, in the same units as the
/// points.
pub fn dash_segments(points: &[(f64, f64)], pattern: &[f64]) -> Vec<Vec<(f64, f64)>> {
    if points.is_empty() || pattern.is_empty() || pattern.iter().sum::<f64>() <= 0.0 {
        return vec![points.to_vec()];
    }

    let mut dashes = vec![];
    let mut current = vec![points[0]];
    let mut k = 0;
    let mut left = pattern[0];
    let mut on = true;

    for pair in points.windows(2) {
        let (mut p, q) = (pair[0], pair[1]);
        let mut seg_len = ((q.0 - p.0).powi(2) + (q.1 - p.1).powi(2)).sqrt();

        while seg_len > left {
            let t = left / seg_len;
            let mid = (p.0 + (q.0 - p.0) * t, p.1 + (q.1 - p.1) * t);

            if on {
                current.push(mid);
                dashes.push(std::mem::take(&mut current));
            } else {
                current = vec![mid];
            }

            seg_len -= left;
            p = mid;
            k = (k + 1) % pattern.len();
            left = pattern[k];
            on = k % 2 == 0;
        }

        left -= seg_len;
        if on {
            current.push(q);
        }
    }

    if on && current.len() > 1 {
        dashes.push(current);
    }

    dashes
}

/// Pick evenly spaced tick values with a step of 1, 2, 2.5 or 5 times a power of ten, with
/// about `target` ticks between `lo` and `hi` inclusive.
pub fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo {
        return if lo.is_finite() { vec![lo] } else { vec![] };
    }

    let raw = (hi - lo) / target.max(1) as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let step = mag
        * if norm <= 1.0 {
            1.0
        } else if norm <= 2.0 {
            2.0
        } else if norm <= 2.5 {
            2.5
        } else if norm <= 5.0 {
            5.0
        } else {
            10.0
        };

    let first = (lo / step).ceil() * step;
    let eps = step * 1.0e-9;

    (0..)
        .map(|i| first + step * i as f64)
        .take_while(|&v| v <= hi + eps)
        .map(|v| if v.abs() < eps { 0.0 } else { v })
        .collect()
}

/// The range of some values with 5% padding on each side.
pub(crate) fn padded_range(vals: &[f64]) -> (f64, f64) {
    let lo = vals.iter().cloned().fold(std::f64::INFINITY, f64::min);
    let hi = vals.iter().cloned().fold(std::f64::NEG_INFINITY, f64::max);

    if !(lo.is_finite() && hi.is_finite()) {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::approx_equal;
    use chrono::NaiveDate;

    #[test]
    fn test_scale() {
        assert_eq!(Scale::Linear.forward(-2.0), Some(-2.0));
        assert_eq!(Scale::Linear.forward(std::f64::NAN), None);
        assert_eq!(Scale::Log.forward(0.0), None);
        assert!(approx_equal(Scale::Log.forward(100.0).unwrap(), 2.0, 1.0e-12));
        assert!(approx_equal(Scale::Log.inverse(-1.0), 0.1, 1.0e-12));
    }

    #[test]
    fn test_axis_format() {
        assert_eq!(AxisFormat::Decimals(2).format(1013.256), "1013.26");
        assert_eq!(AxisFormat::Plain.format(2.5), "2.5");
        assert_eq!(AxisFormat::Plain.format(-0.0), "0");
        assert_eq!(AxisFormat::Plain.format(123456.0), "1.23e5");

        let origin = NaiveDate::from_ymd_opt(2008, 5, 8)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let fmt = AxisFormat::Time {
            origin,
            pattern: "%H:%M:%S",
        };
        assert_eq!(fmt.format(3600.0 * 13.0 + 61.0), "13:01:01");
    }

    #[test]
    fn test_split_runs() {
        let pts = [
            (0.0, 1.0),
            (1.0, std::f64::NAN),
            (2.0, 2.0),
            (3.0, 3.0),
            (std::f64::INFINITY, 0.0),
        ];
        let runs = split_runs(&pts);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], vec![(0.0, 1.0)]);
        assert_eq!(runs[1], vec![(2.0, 2.0), (3.0, 3.0)]);
    }

    #[test]
    fn test_dash_segments() {
        let dashes = dash_segments(&[(0.0, 0.0), (10.0, 0.0)], &[2.0, 3.0]);
        assert_eq!(dashes.len(), 2);
        assert!(approx_equal(dashes[0][1].0, 2.0, 1.0e-12));
        assert!(approx_equal(dashes[1][0].0, 5.0, 1.0e-12));
        assert!(approx_equal(dashes[1][1].0, 7.0, 1.0e-12));

        // Dashes carry on around corners
        let dashes = dash_segments(&[(0.0, 0.0), (1.0, 0.0), (1.0, 4.0)], &[2.0, 1.0]);
        assert_eq!(dashes[0], vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert_eq!(dashes.len(), 2);

        // A pattern with no length leaves the line solid
        let solid = dash_segments(&[(0.0, 0.0), (1.0, 1.0)], &[0.0, 0.0]);
        assert_eq!(solid.len(), 1);
        assert_eq!(solid[0].len(), 2);
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);

        let ticks = nice_ticks(0.13, 0.87, 4);
        let expected = [0.2, 0.4, 0.6, 0.8];
        assert_eq!(ticks.len(), expected.len());
        for (t, e) in ticks.iter().zip(&expected) {
            assert!(approx_equal(*t, *e, 1.0e-12));
        }

        assert_eq!(nice_ticks(-1.0, 1.0, 4), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(nice_ticks(3.0, 3.0, 4), vec![3.0]);
    }

    #[test]
    fn test_padded_range() {
        let (lo, hi) = padded_range(&[0.0, 10.0]);
        assert!(approx_equal(lo, -0.5, 1.0e-12));
        assert!(approx_equal(hi, 10.5, 1.0e-12));
        assert_eq!(padded_range(&[]), (0.0, 1.0));
        assert_eq!(padded_range(&[2.0]), (1.5, 2.5));
    }

    #[test]
    fn test_chart_ranges_skip_non_positive_on_log_axes() {
        let chart = XYChart::new("n", "S")
            .with_scales(Scale::Log, Scale::Log)
            .with_series(Series::new(vec![(0.0, 1.0), (1.0, 10.0), (100.0, 0.1)]));

        let ((x0, x1), (y0, y1)) = chart.ranges();
        // Only (1, 10) and (100, 0.1) are usable: x in [0, 2], y in [-1, 1] before padding
        assert!(approx_equal(x0, -0.1, 1.0e-12));
        assert!(approx_equal(x1, 2.1, 1.0e-12));
        assert!(approx_equal(y0, -1.1, 1.0e-12));
        assert!(approx_equal(y1, 1.1, 1.0e-12));
    }

    #[test]
    fn test_render_svg() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("chart.svg");

        XYChart::new("x", "y")
            .with_title("test")
            .with_series(
                Series::new(vec![(0.0, 1.0), (1.0, std::f64::NAN), (2.0, 3.0), (3.0, 2.0)])
                    .with_label("data")
                    .with_kind(SeriesKind::LineMarkers),
            )
            .with_ref_line(RefLine::Horizontal(2.0, RED))
            .render_svg(&path, &PlotStyle::default())
            .unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("data"));
    }

    #[test]
    fn test_render_histogram() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hist.svg");

        let hist = Histogram::new(&[0.0, 0.5, 0.6, 1.0], 4);
        HistogramChart::new(hist, "U flux [m/s]")
            .render_svg(&path, &PlotStyle::default())
            .unwrap();

        assert!(path.exists());
    }
}
