//! Static Chart Renderer
//! Draws each chart view to a PNG with plotters.
//!
//! Charts:
//! 1. Histogram of ESTIMATE, bins shaded along a rainbow scale
//! 2. Mean ESTIMATE by sex, pastel bars
//! 3. Donut of the latest year's age groups
//! 4. Year x sex heatmap with a viridis color bar

use super::palette;
use super::views::{CategoryMean, DonutView, HeatmapView, HistogramBin, HistogramView};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

type DrawResult = Result<(), Box<dyn std::error::Error>>;

pub const HISTOGRAM_FILE: &str = "histogram.png";
pub const BAR_CHART_FILE: &str = "bar_by_sex.png";
pub const DONUT_FILE: &str = "donut_age.png";
pub const HEATMAP_FILE: &str = "heatmap_year_sex.png";

const HISTOGRAM_SIZE: (u32, u32) = (1000, 600);
const BAR_CHART_SIZE: (u32, u32) = (800, 600);
const DONUT_SIZE: (u32, u32) = (1000, 1000);
const HEATMAP_SIZE: (u32, u32) = (1400, 600);
const COLOR_BAR_WIDTH: i32 = 160;

// Donut geometry
const DONUT_START_ANGLE: f64 = 90.0;
const DONUT_RING_WIDTH: f64 = 0.4;

// Most year labels the heatmap axis will print
const MAX_YEAR_LABELS: usize = 25;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Nothing to draw for {0}")]
    EmptyView(&'static str),
    #[error("Failed to draw {chart}: {message}")]
    Drawing {
        chart: &'static str,
        message: String,
    },
    #[error("Failed to create output directory: {0}")]
    Io(#[from] std::io::Error),
}

fn title_font() -> FontDesc<'static> {
    ("sans-serif", 24).into_font().style(FontStyle::Bold)
}

/// Axis label for integer positions; blank between categories.
fn category_label(position: f64, labels: &[String]) -> String {
    let idx = position.round();
    if idx < 0.0 || (position - idx).abs() > 1e-6 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Pixel position at `radius` and `degrees` (counter-clockwise from east).
fn polar(center: (f64, f64), radius: f64, degrees: f64) -> (i32, i32) {
    let theta = degrees.to_radians();
    (
        (center.0 + radius * theta.cos()).round() as i32,
        (center.1 - radius * theta.sin()).round() as i32,
    )
}

/// Outline of one ring wedge: outer arc forward, inner arc back.
fn ring_segment(center: (f64, f64), inner: f64, outer: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = ((sweep / 2.0).ceil() as usize).max(2);
    let angle = |k: usize| start + sweep * k as f64 / steps as f64;

    let mut points: Vec<(i32, i32)> = (0..=steps).map(|k| polar(center, outer, angle(k))).collect();
    points.extend((0..=steps).rev().map(|k| polar(center, inner, angle(k))));
    points
}

/// Rainbow fill keyed by the bin's left edge.
fn bin_fill(view: &HistogramView, bin: &HistogramBin) -> RGBColor {
    palette::rainbow(palette::normalize(bin.left, view.min, view.max))
}

fn draw_histogram(path: &Path, view: &HistogramView) -> DrawResult {
    let root = BitMapBackend::new(path, HISTOGRAM_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = view.max_count().max(1) as f64 * 1.05;
    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Suicide Rates", title_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(view.min..view.max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Suicide Rate")
        .y_desc("Frequency")
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    chart.draw_series(view.bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.left, 0.0), (bin.right, bin.count as f64)],
            bin_fill(view, bin).filled(),
        )
    }))?;
    chart.draw_series(view.bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.left, 0.0), (bin.right, bin.count as f64)],
            BLACK.stroke_width(1),
        )
    }))?;

    root.present()?;
    Ok(())
}

fn draw_bar_chart(path: &Path, means: &[CategoryMean]) -> DrawResult {
    let root = BitMapBackend::new(path, BAR_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<String> = means.iter().map(|m| m.label.clone()).collect();
    let y_max = means
        .iter()
        .map(|m| m.mean)
        .fold(0.0_f64, f64::max)
        .max(f64::EPSILON)
        * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Average Suicide Rate by Sex", title_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(means.len() as f64 - 0.5), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(means.len())
        .x_label_formatter(&|x| category_label(*x, &labels))
        .x_desc("Sex")
        .y_desc("Average Suicide Rate")
        .draw()?;

    chart.draw_series(means.iter().enumerate().map(|(i, m)| {
        let x = i as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, m.mean)], palette::pastel(i).filled())
    }))?;

    root.present()?;
    Ok(())
}

fn draw_donut(path: &Path, donut: &DonutView) -> DrawResult {
    let root = BitMapBackend::new(path, DONUT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(
        &format!("Suicide Rate Distribution by Age Group ({})", donut.year),
        title_font(),
    )?;

    let (w, h) = root.dim_in_pixel();
    let center = (w as f64 / 2.0, h as f64 / 2.0);
    let outer = w.min(h) as f64 * 0.33;
    let inner = outer * (1.0 - DONUT_RING_WIDTH);
    let total = donut.total();
    let label_style = TextStyle::from(("sans-serif", 16).into_font().style(FontStyle::Bold));

    let mut start = DONUT_START_ANGLE;
    for (slice, color) in donut.slices.iter().zip(palette::rainbow_steps(donut.slices.len())) {
        let sweep = slice.value / total * 360.0;
        if sweep.is_nan() || sweep <= 0.0 {
            continue;
        }

        let ring = ring_segment(center, inner, outer, start, sweep);
        let mut outline = ring.clone();
        outline.push(ring[0]);
        root.draw(&Polygon::new(ring, color.filled()))?;
        root.draw(&PathElement::new(outline, WHITE.stroke_width(2)))?;

        let mid = start + sweep / 2.0;
        let anchor = polar(center, outer * 1.08, mid);
        let hpos = if mid.to_radians().cos() >= 0.0 {
            HPos::Left
        } else {
            HPos::Right
        };
        let (name, detail) = donut.label_lines(slice);
        root.draw(&Text::new(name, anchor, label_style.pos(Pos::new(hpos, VPos::Bottom))))?;
        root.draw(&Text::new(detail, anchor, label_style.pos(Pos::new(hpos, VPos::Top))))?;

        start += sweep;
    }

    root.present()?;
    Ok(())
}

fn draw_heatmap(path: &Path, heat: &HeatmapView) -> DrawResult {
    let root = BitMapBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Suicide Rates by Year and Sex", title_font())?;
    let (plot_area, bar_area) = root.split_horizontally(HEATMAP_SIZE.0 as i32 - COLOR_BAR_WIDTH);

    let (lo, mut hi) = heat.value_range();
    if hi <= lo {
        hi = lo + 1.0;
    }
    let ncols = heat.columns.len();
    let nrows = heat.years.len();

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(
            -0.5f64..(ncols as f64 - 0.5),
            -0.5f64..(nrows as f64 - 0.5),
        )?;

    // Earliest year on the top row
    let year_labels: Vec<String> = heat.years.iter().rev().map(i64::to_string).collect();
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(ncols)
        .y_labels(nrows.min(MAX_YEAR_LABELS))
        .x_label_formatter(&|x| category_label(*x, &heat.columns))
        .y_label_formatter(&|y| category_label(*y, &year_labels))
        .x_desc("Sex")
        .y_desc("Year")
        .draw()?;

    let font_size = (420.0 / nrows.max(1) as f64).clamp(6.0, 12.0);
    let annotation =
        TextStyle::from(("sans-serif", font_size).into_font()).pos(Pos::new(HPos::Center, VPos::Center));

    for (r, row) in heat.cells.iter().enumerate() {
        let y = (nrows - 1 - r) as f64;
        for (c, cell) in row.iter().enumerate() {
            let Some(value) = *cell else { continue };
            let x = c as f64;
            let corners = [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)];
            let shade = palette::normalize(value, lo, hi);
            let ink = if shade < 0.5 { &WHITE } else { &BLACK };

            chart.draw_series(std::iter::once(Rectangle::new(
                corners,
                palette::viridis(shade).filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(corners, WHITE.stroke_width(1))))?;
            chart.draw_series(std::iter::once(Text::new(
                format!("{:.1}", value),
                (x, y),
                annotation.color(ink),
            )))?;
        }
    }

    let mut color_bar = ChartBuilder::on(&bar_area)
        .margin(15)
        .margin_left(30)
        .x_label_area_size(45)
        .right_y_label_area_size(60)
        .build_cartesian_2d(0f64..1f64, lo..hi)?;
    color_bar
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_label_style(("sans-serif", 12))
        .axis_desc_style(("sans-serif", 14))
        .y_desc("Suicide Rate")
        .draw()?;

    let steps = 100;
    color_bar.draw_series((0..steps).map(|i| {
        let a = lo + (hi - lo) * i as f64 / steps as f64;
        let b = lo + (hi - lo) * (i + 1) as f64 / steps as f64;
        Rectangle::new(
            [(0.0, a), (1.0, b)],
            palette::viridis(i as f64 / (steps - 1) as f64).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Writes chart PNGs into one output directory.
pub struct StaticChartRenderer {
    output_dir: PathBuf,
}

impl StaticChartRenderer {
    pub fn new(output_dir: &Path) -> Result<Self, ChartError> {
        std::fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    fn render(
        &self,
        chart: &'static str,
        file: &str,
        draw: impl FnOnce(&Path) -> DrawResult,
    ) -> Result<PathBuf, ChartError> {
        let path = self.output_dir.join(file);
        draw(&path).map_err(|e| ChartError::Drawing {
            chart,
            message: e.to_string(),
        })?;
        info!(chart, path = %path.display(), "rendered chart");
        Ok(path)
    }

    pub fn render_histogram(&self, view: &HistogramView) -> Result<PathBuf, ChartError> {
        self.render("histogram", HISTOGRAM_FILE, |path| draw_histogram(path, view))
    }

    pub fn render_bar_chart(&self, means: &[CategoryMean]) -> Result<PathBuf, ChartError> {
        if means.is_empty() {
            return Err(ChartError::EmptyView("bar chart"));
        }
        self.render("bar chart", BAR_CHART_FILE, |path| draw_bar_chart(path, means))
    }

    pub fn render_donut(&self, donut: &DonutView) -> Result<PathBuf, ChartError> {
        let total = donut.total();
        if total.is_nan() || total <= 0.0 {
            return Err(ChartError::EmptyView("donut chart"));
        }
        self.render("donut chart", DONUT_FILE, |path| draw_donut(path, donut))
    }

    pub fn render_heatmap(&self, heat: &HeatmapView) -> Result<PathBuf, ChartError> {
        self.render("heatmap", HEATMAP_FILE, |path| draw_heatmap(path, heat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_at_whole_positions() {
        let labels = vec!["Female".to_string(), "Male".to_string()];
        assert_eq!(category_label(0.0, &labels), "Female");
        assert_eq!(category_label(1.0, &labels), "Male");
        assert_eq!(category_label(0.5, &labels), "");
        assert_eq!(category_label(-1.0, &labels), "");
        assert_eq!(category_label(2.0, &labels), "");
    }

    #[test]
    fn ring_segment_stays_between_radii() {
        let center = (500.0, 500.0);
        let ring = ring_segment(center, 200.0, 300.0, 90.0, 120.0);
        assert_eq!(ring[0], (500, 200));
        for (x, y) in ring {
            let r = ((x as f64 - center.0).powi(2) + (y as f64 - center.1).powi(2)).sqrt();
            assert!((199.0..=301.0).contains(&r));
        }
    }

    #[test]
    fn histogram_fill_follows_left_edge() {
        let values: Vec<f64> = (0..=30).map(f64::from).collect();
        let view = HistogramView::from_values(&values, 30).unwrap();

        let first = view.bins.first().unwrap();
        let last = view.bins.last().unwrap();
        assert_eq!(bin_fill(&view, first), palette::rainbow(0.0));
        assert_eq!(bin_fill(&view, last), palette::rainbow(29.0 / 30.0));
        assert_ne!(bin_fill(&view, last), palette::rainbow(1.0));
    }

    #[test]
    fn empty_views_are_rejected_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = StaticChartRenderer::new(dir.path()).unwrap();
        assert!(matches!(
            renderer.render_bar_chart(&[]),
            Err(ChartError::EmptyView(_))
        ));

        let donut = DonutView {
            year: 2018,
            slices: Vec::new(),
        };
        assert!(matches!(
            renderer.render_donut(&donut),
            Err(ChartError::EmptyView(_))
        ));
    }
}
