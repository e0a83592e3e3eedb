//! A line chart with one shared x axis and an independent y axis for every group of columns.
//!
//! The first axis uses the left spine and the second the right spine. Every further axis gets its
//! own right spine, offset outward from the plot so the tick labels don't overlap. The layout is
//! computed by [`MultiAxisChart::layout`] and drawn by [`MultiAxisChart::render_svg`].

use crate::{
    error::{render_err, AnalysisError, Result},
    plot::{dash_segments, nice_ticks, padded_range, palette_color, split_runs, AxisFormat, PlotStyle},
    table::Table,
    timeseries::TimeSeries,
};
use optional::Optioned;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use std::path::Path;
use tracing::{info, warn};

/// How the lines of a group are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    /// Solid line
    Solid,
    /// Long dashes
    Dashed,
    /// Alternating dashes and dots
    DashDot,
    /// Dots
    Dotted,
    /// Markers at the points, no line
    Points(Marker),
}

/// Shape of the markers of a [`LineStyle::Points`] group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    /// Small filled circle
    Point,
    /// Single pixel
    Pixel,
    /// Open circle
    Circle,
    /// Triangle pointing down
    TriangleDown,
    /// Triangle pointing up
    TriangleUp,
    /// Open square
    Square,
    /// Diagonal cross
    Cross,
}

impl Marker {
    /// Every marker, in the order groups cycle through them.
    pub const ALL: [Marker; 7] = [
        Marker::Point,
        Marker::Pixel,
        Marker::Circle,
        Marker::TriangleDown,
        Marker::TriangleUp,
        Marker::Square,
        Marker::Cross,
    ];
}

impl LineStyle {
    /// The line style for group number `idx`.
    ///
    /// From the seventh group on, groups are drawn with markers, cycling through [`Marker::ALL`].
    pub fn for_group(idx: usize) -> Self {
        match idx {
            0..=2 => LineStyle::Solid,
            3 => LineStyle::Dashed,
            4 => LineStyle::DashDot,
            5 => LineStyle::Dotted,
            _ => LineStyle::Points(Marker::ALL[(idx - 6) % Marker::ALL.len()]),
        }
    }

    /// On and off lengths in pixels, `None` for solid lines and markers.
    pub fn dash_pattern(self) -> Option<&'static [f64]> {
        match self {
            LineStyle::Solid | LineStyle::Points(_) => None,
            LineStyle::Dashed => Some(&[8.0, 4.0]),
            LineStyle::DashDot => Some(&[8.0, 3.0, 2.0, 3.0]),
            LineStyle::Dotted => Some(&[2.0, 3.0]),
        }
    }
}

/// Which side of the plot an axis spine is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Left edge of the plot
    Left,
    /// Right edge of the plot or beyond
    Right,
}

/// One line of the chart.
#[derive(Clone, Debug)]
pub struct ColumnData {
    /// Legend label
    pub name: String,
    /// One value per x value
    pub values: Vec<Optioned<f64>>,
}

impl ColumnData {
    /// Create a named column.
    pub fn new<S: Into<String>>(name: S, values: Vec<Optioned<f64>>) -> Self {
        ColumnData {
            name: name.into(),
            values,
        }
    }
}

/// Where and how one y axis is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisSpec {
    /// Which side the spine and tick labels are on.
    pub side: Side,
    /// Spine position as a fraction of the plot width, 0 is the left edge and 1 the right edge.
    pub position: f64,
    /// Color of the lines, spine, ticks and (for single column groups) the label.
    pub color: RGBColor,
    /// How the lines are drawn.
    pub line_style: LineStyle,
    /// Axis label.
    pub label: String,
    /// True if the label is drawn in the group color.
    pub label_colored: bool,
}

/// A legend row.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    /// Column name
    pub label: String,
    /// Line color
    pub color: RGBColor,
    /// Line style
    pub line_style: LineStyle,
}

/// The computed arrangement of a multi-axis chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartLayout {
    /// Right edge of the plot as a fraction of the image width.
    pub right: f64,
    /// One entry per group, in order.
    pub axes: Vec<AxisSpec>,
    /// One entry per line, in order.
    pub legend: Vec<LegendEntry>,
}

/// Right edge of the plot as a fraction of the image width when there are `extra` axes beyond
/// the first two.
pub fn right_fraction(extra: usize) -> f64 {
    match extra {
        0 => 0.9,
        1..=2 => 0.75,
        3..=4 => 0.6,
        _ => 0.85,
    }
}

/// A chart of grouped columns against a shared x axis.
#[derive(Clone, Debug)]
pub struct MultiAxisChart {
    title: Option<String>,
    x_label: String,
    x: Vec<f64>,
    x_format: AxisFormat,
    groups: Vec<Vec<ColumnData>>,
}

impl MultiAxisChart {
    /// Create a chart with no groups.
    pub fn new<S: Into<String>>(x_label: S, x: Vec<f64>, x_format: AxisFormat) -> Self {
        MultiAxisChart {
            title: None,
            x_label: x_label.into(),
            x,
            x_format,
            groups: vec![],
        }
    }

    /// Chart named columns of a time series, the x axis shows the time of day.
    ///
    /// Each inner slice is one group sharing a y axis.
    pub fn from_time_series(series: &TimeSeries, groups: &[&[&str]]) -> Result<Self> {
        let origin = match series.times().first() {
            Some(&t) => t,
            None => return Err(AnalysisError::NotEnoughData),
        };

        let chart = MultiAxisChart::new(
            "time",
            series.seconds_since(origin),
            AxisFormat::Time {
                origin,
                pattern: "%m-%d %H:%M",
            },
        );

        chart.with_table_groups(series.table(), groups)
    }

    /// Chart named columns of a table against one of its columns.
    pub fn from_table(table: &Table, x_column: &str, groups: &[&[&str]]) -> Result<Self> {
        let x: Vec<f64> = table
            .column(x_column)?
            .iter()
            .map(|v| v.into_option().unwrap_or(std::f64::NAN))
            .collect();

        MultiAxisChart::new(x_column, x, AxisFormat::Plain).with_table_groups(table, groups)
    }

    fn with_table_groups(mut self, table: &Table, groups: &[&[&str]]) -> Result<Self> {
        for group in groups {
            let cols = group
                .iter()
                .map(|&name| -> Result<ColumnData> {
                    Ok(ColumnData::new(name, table.column(name)?.to_vec()))
                })
                .collect::<Result<Vec<_>>>()?;
            self = self.with_group(cols)?;
        }
        Ok(self)
    }

    /// Builder method to set the title.
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method to add a group of columns sharing a y axis.
    pub fn with_group(mut self, columns: Vec<ColumnData>) -> Result<Self> {
        if columns.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "a chart group needs at least one column".to_owned(),
            ));
        }

        if let Some(bad) = columns.iter().find(|c| c.values.len() != self.x.len()) {
            return Err(AnalysisError::InvalidInput(format!(
                "column {} has {} values for {} x values",
                bad.name,
                bad.values.len(),
                self.x.len()
            )));
        }

        self.groups.push(columns);
        Ok(self)
    }

    /// The number of y axes.
    #[inline]
    pub fn num_axes(&self) -> usize {
        self.groups.len()
    }

    /// Work out the position, color, style and label of every axis.
    pub fn layout(&self) -> Result<ChartLayout> {
        if self.groups.is_empty() {
            return Err(AnalysisError::InvalidInput("chart has no columns".to_owned()));
        }

        let extra = self.groups.len().saturating_sub(2);
        if extra > 5 {
            warn!(axes = self.groups.len(), "too many y axes, labels will overlap");
        }

        let right = right_fraction(extra);
        let additive = if extra > 0 {
            (0.98 - right) / extra as f64
        } else {
            0.0
        };

        let mut axes = Vec::with_capacity(self.groups.len());
        let mut legend = vec![];

        for (i, group) in self.groups.iter().enumerate() {
            let color = palette_color(i);
            let line_style = LineStyle::for_group(i);

            let (side, position) = match i {
                0 => (Side::Left, 0.0),
                1 => (Side::Right, 1.0),
                _ => (Side::Right, 1.0 + additive * (i - 1) as f64),
            };

            let label = group
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            axes.push(AxisSpec {
                side,
                position,
                color,
                line_style,
                label,
                label_colored: group.len() == 1,
            });

            legend.extend(group.iter().map(|c| LegendEntry {
                label: c.name.clone(),
                color,
                line_style,
            }));
        }

        Ok(ChartLayout {
            right,
            axes,
            legend,
        })
    }

    /// Draw the chart into an SVG file.
    pub fn render_svg<P: AsRef<Path>>(&self, path: P, style: &PlotStyle) -> Result<()> {
        let path = path.as_ref();
        let layout = self.layout()?;
        {
            let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;
            self.draw(&root, &layout, style)?;
            root.present().map_err(render_err)?;
        }
        info!(path = %path.display(), axes = layout.axes.len(), "wrote chart");
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        layout: &ChartLayout,
        style: &PlotStyle,
    ) -> Result<()> {
        let (w, h) = (f64::from(style.width), f64::from(style.height));
        let frame = Frame {
            left: 0.125 * w,
            right: layout.right * w,
            top: 0.12 * h,
            bottom: 0.89 * h,
        };
        let font = f64::from(style.font_size);
        let text = |color: &RGBColor, pos: Pos| {
            ("sans-serif", style.font_size).into_font().color(color).pos(pos)
        };
        let grey = style.grid_color;

        if let Some(ref title) = self.title {
            root.draw(&Text::new(
                title.clone(),
                (px(w / 2.0), px(frame.top / 2.0)),
                ("sans-serif", style.font_size + 4)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            ))
            .map_err(render_err)?;
        }

        // x axis
        let xs: Vec<f64> = self.x.iter().cloned().filter(|x| x.is_finite()).collect();
        let (x0, x1) = padded_range(&xs);
        let x_ticks = nice_ticks(x0, x1, 8);
        let to_px_x = |x: f64| frame.left + (x - x0) / (x1 - x0) * frame.width();

        for &tick in &x_ticks {
            let x = to_px_x(tick);
            draw_path(
                root,
                &[(x, frame.top), (x, frame.bottom)],
                grey,
                LineStyle::Dotted,
                1,
            )?;
            root.draw(&PathElement::new(
                vec![(px(x), px(frame.bottom)), (px(x), px(frame.bottom + 4.0))],
                BLACK.stroke_width(1),
            ))
            .map_err(render_err)?;
            root.draw(&Text::new(
                self.x_format.format(tick),
                (px(x), px(frame.bottom + 6.0)),
                text(&BLACK, Pos::new(HPos::Center, VPos::Top)),
            ))
            .map_err(render_err)?;
        }
        root.draw(&Text::new(
            self.x_label.clone(),
            (px((frame.left + frame.right) / 2.0), px(frame.bottom + 2.5 * font)),
            text(&BLACK, Pos::new(HPos::Center, VPos::Top)),
        ))
        .map_err(render_err)?;

        for y in &[frame.top, frame.bottom] {
            root.draw(&PathElement::new(
                vec![(px(frame.left), px(*y)), (px(frame.right), px(*y))],
                BLACK.stroke_width(1),
            ))
            .map_err(render_err)?;
        }

        // y axes and lines
        for (i, (group, axis)) in self.groups.iter().zip(&layout.axes).enumerate() {
            let vals: Vec<f64> = group
                .iter()
                .flat_map(|c| c.values.iter().filter_map(|v| v.into_option()))
                .filter(|v| v.is_finite())
                .collect();
            let (y0, y1) = padded_range(&vals);
            let to_px_y = |y: f64| frame.bottom - (y - y0) / (y1 - y0) * frame.height();
            let spine_x = frame.left + axis.position * frame.width();
            let sign = match axis.side {
                Side::Left => -1.0,
                Side::Right => 1.0,
            };

            root.draw(&PathElement::new(
                vec![(px(spine_x), px(frame.top)), (px(spine_x), px(frame.bottom))],
                axis.color.stroke_width(1),
            ))
            .map_err(render_err)?;

            let anchor = match axis.side {
                Side::Left => Pos::new(HPos::Right, VPos::Center),
                Side::Right => Pos::new(HPos::Left, VPos::Center),
            };
            for tick in nice_ticks(y0, y1, 6) {
                let y = to_px_y(tick);
                if i == 0 {
                    draw_path(
                        root,
                        &[(frame.left, y), (frame.right, y)],
                        grey,
                        LineStyle::Dotted,
                        1,
                    )?;
                }
                root.draw(&PathElement::new(
                    vec![(px(spine_x), px(y)), (px(spine_x + sign * 4.0), px(y))],
                    axis.color.stroke_width(1),
                ))
                .map_err(render_err)?;
                root.draw(&Text::new(
                    format_tick(tick),
                    (px(spine_x + sign * 6.0), px(y)),
                    text(&axis.color, anchor),
                ))
                .map_err(render_err)?;
            }

            let label_color = if axis.label_colored { axis.color } else { BLACK };
            root.draw(&Text::new(
                axis.label.clone(),
                (
                    px(spine_x + sign * 4.0 * font),
                    px((frame.top + frame.bottom) / 2.0),
                ),
                ("sans-serif", style.font_size)
                    .into_font()
                    .transform(FontTransform::Rotate270)
                    .color(&label_color)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            ))
            .map_err(render_err)?;

            for col in group {
                let pts: Vec<(f64, f64)> = self
                    .x
                    .iter()
                    .zip(&col.values)
                    .map(|(&x, v)| match v.into_option() {
                        Some(y) => (to_px_x(x), to_px_y(y)),
                        None => (std::f64::NAN, std::f64::NAN),
                    })
                    .collect();

                for run in split_runs(&pts) {
                    draw_path(root, &run, axis.color, axis.line_style, style.line_width)?;
                }
            }
        }

        self.draw_legend(root, layout, &frame, style)
    }

    fn draw_legend<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        layout: &ChartLayout,
        frame: &Frame,
        style: &PlotStyle,
    ) -> Result<()> {
        let font = f64::from(style.font_size);
        let row = font * 1.4;
        let longest = layout
            .legend
            .iter()
            .map(|e| e.label.chars().count())
            .max()
            .unwrap_or(0) as f64;

        let (bx, by) = (frame.left + 10.0, frame.top + 10.0);
        let bw = 44.0 + longest * font * 0.6;
        let bh = row * layout.legend.len() as f64 + 8.0;

        root.draw(&Rectangle::new(
            [(px(bx), px(by)), (px(bx + bw), px(by + bh))],
            WHITE.mix(0.8).filled(),
        ))
        .map_err(render_err)?;
        root.draw(&Rectangle::new(
            [(px(bx), px(by)), (px(bx + bw), px(by + bh))],
            BLACK.stroke_width(1),
        ))
        .map_err(render_err)?;

        for (k, entry) in layout.legend.iter().enumerate() {
            let y = by + 4.0 + row * (k as f64 + 0.5);
            let sample = if let LineStyle::Points(_) = entry.line_style {
                vec![(bx + 18.0, y)]
            } else {
                vec![(bx + 6.0, y), (bx + 30.0, y)]
            };
            draw_path(root, &sample, entry.color, entry.line_style, 2)?;
            root.draw(&Text::new(
                entry.label.clone(),
                (px(bx + 36.0), px(y)),
                ("sans-serif", style.font_size)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Left, VPos::Center)),
            ))
            .map_err(render_err)?;
        }

        Ok(())
    }
}

// The plotting rectangle in pixels.
struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Frame {
    fn width(&self) -> f64 {
        self.right - self.left
    }

    fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

#[inline]
fn px(v: f64) -> i32 {
    v.round() as i32
}

fn format_tick(v: f64) -> String {
    AxisFormat::Plain.format(v)
}

fn draw_path<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    pts: &[(f64, f64)],
    color: RGBColor,
    line_style: LineStyle,
    width: u32,
) -> Result<()> {
    if let LineStyle::Points(marker) = line_style {
        for &(x, y) in pts {
            draw_marker(root, (px(x), px(y)), marker, color)?;
        }
        return Ok(());
    }

    let pieces = match line_style.dash_pattern() {
        Some(pattern) => dash_segments(pts, pattern),
        None => vec![pts.to_vec()],
    };

    for piece in pieces.into_iter().filter(|p| p.len() > 1) {
        let piece: Vec<(i32, i32)> = piece.into_iter().map(|(x, y)| (px(x), px(y))).collect();
        root.draw(&PathElement::new(piece, color.stroke_width(width)))
            .map_err(render_err)?;
    }

    Ok(())
}

fn draw_marker<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    (x, y): (i32, i32),
    marker: Marker,
    color: RGBColor,
) -> Result<()> {
    let r = 3;
    let res = match marker {
        Marker::Point => root.draw(&Circle::new((x, y), 2, color.filled())),
        Marker::Pixel => root.draw(&Pixel::new((x, y), color)),
        Marker::Circle => root.draw(&Circle::new((x, y), r, color.stroke_width(1))),
        Marker::TriangleDown => root.draw(&Polygon::new(
            vec![(x - r, y - r), (x + r, y - r), (x, y + r)],
            color.filled(),
        )),
        Marker::TriangleUp => root.draw(&Polygon::new(
            vec![(x - r, y + r), (x + r, y + r), (x, y - r)],
            color.filled(),
        )),
        Marker::Square => root.draw(&Rectangle::new(
            [(x - r, y - r), (x + r, y + r)],
            color.stroke_width(1),
        )),
        Marker::Cross => root.draw(&Cross::new((x, y), r as u32, color.stroke_width(1))),
    };

    res.map_err(render_err)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{plot::TAB10, utility::test_tools::approx_equal};
    use optional::{none, some};

    fn column(name: &str, n: usize) -> ColumnData {
        ColumnData::new(name, (0..n).map(|i| some(i as f64)).collect())
    }

    fn chart_with_groups(sizes: &[usize]) -> MultiAxisChart {
        let n = 5;
        let mut chart = MultiAxisChart::new("x", (0..n).map(|i| i as f64).collect(), AxisFormat::Plain);
        for (g, &size) in sizes.iter().enumerate() {
            let cols = (0..size).map(|c| column(&format!("g{}c{}", g, c), n)).collect();
            chart = chart.with_group(cols).unwrap();
        }
        chart
    }

    #[test]
    fn test_right_fraction() {
        assert!(approx_equal(right_fraction(1), 0.75, 1.0e-12));
        assert!(approx_equal(right_fraction(2), 0.75, 1.0e-12));
        assert!(approx_equal(right_fraction(3), 0.6, 1.0e-12));
        assert!(approx_equal(right_fraction(4), 0.6, 1.0e-12));
        assert!(approx_equal(right_fraction(5), 0.85, 1.0e-12));
    }

    #[test]
    fn test_two_axes() {
        let layout = chart_with_groups(&[1, 1]).layout().unwrap();

        assert_eq!(layout.axes.len(), 2);
        assert_eq!(layout.axes[0].side, Side::Left);
        assert_eq!(layout.axes[1].side, Side::Right);
        assert!(approx_equal(layout.axes[1].position, 1.0, 1.0e-12));
    }

    #[test]
    fn test_four_axes_offsets() {
        let layout = chart_with_groups(&[1, 1, 1, 1]).layout().unwrap();

        // Two extra axes, step is (0.98 - 0.75) / 2
        assert!(approx_equal(layout.right, 0.75, 1.0e-12));
        assert!(approx_equal(layout.axes[2].position, 1.115, 1.0e-12));
        assert!(approx_equal(layout.axes[3].position, 1.23, 1.0e-12));
        assert!(layout.axes.iter().skip(1).all(|a| a.side == Side::Right));
    }

    #[test]
    fn test_colors_and_styles() {
        let layout = chart_with_groups(&[1; 7]).layout().unwrap();

        assert_eq!(layout.axes[0].color, TAB10[0]);
        assert_eq!(layout.axes[6].color, TAB10[6]);
        let styles: Vec<LineStyle> = layout.axes.iter().map(|a| a.line_style).collect();
        assert_eq!(
            styles,
            vec![
                LineStyle::Solid,
                LineStyle::Solid,
                LineStyle::Solid,
                LineStyle::Dashed,
                LineStyle::DashDot,
                LineStyle::Dotted,
                LineStyle::Points(Marker::Point),
            ]
        );

        // Marker groups keep changing shape
        let markers: Vec<LineStyle> = (6..14).map(LineStyle::for_group).collect();
        assert_eq!(markers[1], LineStyle::Points(Marker::Pixel));
        assert_eq!(markers[4], LineStyle::Points(Marker::TriangleUp));
        assert_eq!(markers[6], LineStyle::Points(Marker::Cross));
        assert_eq!(markers[7], LineStyle::Points(Marker::Point));
        assert_eq!(palette_color(11), TAB10[1]);
    }

    #[test]
    fn test_labels_and_legend() {
        let layout = chart_with_groups(&[1, 2]).layout().unwrap();

        assert_eq!(layout.axes[0].label, "g0c0");
        assert!(layout.axes[0].label_colored);
        assert_eq!(layout.axes[1].label, "g1c0, g1c1");
        assert!(!layout.axes[1].label_colored);

        // Every line is in the one legend
        assert_eq!(layout.legend.len(), 3);
        assert_eq!(layout.legend[2].color, TAB10[1]);
    }

    #[test]
    fn test_bad_groups() {
        let chart = MultiAxisChart::new("x", vec![0.0, 1.0], AxisFormat::Plain);
        assert!(chart.clone().with_group(vec![]).is_err());
        assert!(chart.clone().with_group(vec![column("a", 3)]).is_err());
        assert!(chart.layout().is_err());
    }

    #[test]
    fn test_from_table() {
        let table = Table::new()
            .with_column("x", vec![some(0.0), some(1.0), some(2.0)])
            .unwrap()
            .with_column("a", vec![some(1.0), none(), some(3.0)])
            .unwrap()
            .with_column("b", vec![some(1.0), some(2.0), some(3.0)])
            .unwrap();

        let chart = MultiAxisChart::from_table(&table, "x", &[&["a"], &["b"]]).unwrap();
        assert_eq!(chart.num_axes(), 2);

        assert!(MultiAxisChart::from_table(&table, "x", &[&["c"]]).is_err());
    }

    #[test]
    fn test_render_svg() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("multi.svg");

        chart_with_groups(&[1, 1, 2, 1, 1, 1, 1])
            .with_title("many axes")
            .render_svg(&path, &PlotStyle::default())
            .unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("g2c0, g2c1"));
    }
}
