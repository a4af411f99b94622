//! Box-plot image sink: one box per group, read counts on the y axis.

use std::path::Path;

use anyhow::{Result, anyhow};
use log::info;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::color::ColorMap;
use crate::data::model::GroupCounts;
use crate::data::stats::BoxSummary;

/// Figure size and labelling.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Gene name used in the title.
    pub gene: String,
    /// X-axis title, normally the group column name.
    pub x_label: String,
    /// Figure width in inches.
    pub width_in: f64,
    /// Figure height in inches.
    pub height_in: f64,
    pub dpi: u32,
}

impl PlotOptions {
    pub fn new(gene: &str, x_label: &str) -> Self {
        PlotOptions {
            gene: gene.to_string(),
            x_label: x_label.to_string(),
            width_in: 10.0,
            height_in: 4.0,
            dpi: 300,
        }
    }

    /// Pixel dimensions of the figure.
    pub fn pixels(&self) -> (u32, u32) {
        let px = |inches: f64| (inches * self.dpi as f64).round().max(1.0) as u32;
        (px(self.width_in), px(self.height_in))
    }

    fn title(&self) -> String {
        format!("{} read counts across all tissue samples", self.gene)
    }
}

/// Render a box plot of `grouped` to `path`; `.svg` writes vector output,
/// anything else a bitmap (PNG by default).
pub fn render_box_plot(path: &Path, grouped: &[GroupCounts], options: &PlotOptions) -> Result<()> {
    let size = options.pixels();
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    if is_svg {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_box_plot(&root, grouped, options).map_err(|e| anyhow!("drawing box plot: {e}"))?;
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw_box_plot(&root, grouped, options).map_err(|e| anyhow!("drawing box plot: {e}"))?;
    }

    info!("Saved box plot of {} groups to {}", grouped.len(), path.display());
    Ok(())
}

fn draw_box_plot<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    grouped: &[GroupCounts],
    options: &PlotOptions,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let (width, height) = root.dim_in_pixel();
    let (width, height) = (width as i32, height as i32);
    let scale = options.dpi as f64 / 100.0;
    let px = |v: f64| (v * scale).round() as i32;

    let summaries: Vec<Option<BoxSummary>> = grouped.iter().map(|g| BoxSummary::from_counts(&g.counts)).collect();
    let colors = ColorMap::new(grouped.iter().map(|g| g.label.as_str()));
    let (y_min, y_max) = value_range(&summaries);

    let longest_label = grouped.iter().map(|g| g.label.chars().count()).max().unwrap_or(0);
    let left = px(90.0);
    let right = px(20.0);
    let top = px(40.0);
    let bottom = px(45.0 + longest_label as f64 * 6.5).min(height / 2);
    let (x0, x1, y0, y1) = (left, width - right, top, height - bottom);

    let to_y = |v: f64| y1 - ((v - y_min) / (y_max - y_min) * (y1 - y0) as f64).round() as i32;

    // title and axis titles
    let title_font = ("sans-serif", 16.0 * scale).into_font().color(&BLACK);
    let label_font = ("sans-serif", 11.0 * scale).into_font().color(&BLACK);
    let tick_font = ("sans-serif", 9.0 * scale).into_font().color(&BLACK);

    root.draw(&Text::new(
        options.title(),
        (width / 2, top / 2),
        title_font.pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;
    root.draw(&Text::new(
        options.x_label.clone(),
        ((x0 + x1) / 2, height - px(12.0)),
        label_font.pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;
    root.draw(&Text::new(
        "Gene Read Counts".to_string(),
        (px(14.0), (y0 + y1) / 2),
        ("sans-serif", 11.0 * scale)
            .into_font()
            .transform(FontTransform::Rotate270)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;

    // axes
    let axis = BLACK.stroke_width(px(1.0).max(1) as u32);
    root.draw(&PathElement::new(vec![(x0, y0), (x0, y1), (x1, y1)], axis))?;

    // y ticks with plain (non-scientific) labels
    let step = nice_step((y_max - y_min) / 5.0);
    let mut tick = (y_min / step).ceil() * step;
    while tick <= y_max {
        let y = to_y(tick);
        root.draw(&PathElement::new(vec![(x0 - px(4.0), y), (x0, y)], axis))?;
        root.draw(&Text::new(
            format_tick(tick),
            (x0 - px(6.0), y),
            tick_font.pos(Pos::new(HPos::Right, VPos::Center)),
        ))?;
        tick += step;
    }

    if grouped.is_empty() {
        return root.present();
    }

    let slot = (x1 - x0) as f64 / grouped.len() as f64;
    let half_box = ((slot * 0.25).round() as i32).max(1);
    let line = BLACK.stroke_width(px(0.8).max(1) as u32);

    for (i, (group, summary)) in grouped.iter().zip(&summaries).enumerate() {
        let cx = x0 + (slot * (i as f64 + 0.5)).round() as i32;

        // x tick label, rotated to read bottom-up and ending just below the axis
        root.draw(&Text::new(
            group.label.clone(),
            (cx, y1 + px(6.0)),
            tick_label_style(scale),
        ))?;

        let Some(s) = summary else {
            continue;
        };

        let [r, g, b] = colors.color_for(&group.label);
        let fill = RGBColor(r, g, b).mix(0.6).filled();

        root.draw(&Rectangle::new([(cx - half_box, to_y(s.q3)), (cx + half_box, to_y(s.q1))], fill))?;
        root.draw(&Rectangle::new([(cx - half_box, to_y(s.q3)), (cx + half_box, to_y(s.q1))], line))?;
        root.draw(&PathElement::new(
            vec![(cx - half_box, to_y(s.median)), (cx + half_box, to_y(s.median))],
            RGBColor(255, 127, 14).stroke_width(px(1.2).max(1) as u32),
        ))?;

        // whiskers and caps
        let cap = half_box / 2;
        for (from, to) in [(s.q3, s.upper_whisker), (s.q1, s.lower_whisker)] {
            root.draw(&PathElement::new(vec![(cx, to_y(from)), (cx, to_y(to))], line))?;
            root.draw(&PathElement::new(vec![(cx - cap, to_y(to)), (cx + cap, to_y(to))], line))?;
        }

        for &outlier in &s.outliers {
            root.draw(&Circle::new((cx, to_y(outlier)), px(2.0).max(1), line))?;
        }
    }

    root.present()
}

fn tick_label_style(scale: f64) -> TextStyle<'static> {
    ("sans-serif", 9.0 * scale)
        .into_font()
        .transform(FontTransform::Rotate270)
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center))
}

/// Y range covering every box, whisker and outlier, padded by 5%.
fn value_range(summaries: &[Option<BoxSummary>]) -> (f64, f64) {
    let (lo, hi) = summaries
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s.min), hi.max(s.max)));

    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    let lo = lo.min(0.0);
    let pad = ((hi - lo) * 0.05).max(1.0);
    (lo, hi + pad)
}

/// Round a raw tick spacing up to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(0.7), 1.0);
        assert_eq!(nice_step(1.5), 2.0);
        assert_eq!(nice_step(380.0), 500.0);
        assert_eq!(nice_step(2000.0), 2000.0);
        assert_eq!(nice_step(0.0), 1.0);
    }

    #[test]
    fn test_value_range() {
        let summaries = vec![BoxSummary::from_counts(&[5, 9]), None, BoxSummary::from_counts(&[100])];
        let (lo, hi) = value_range(&summaries);
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 105.0);
        assert_eq!(value_range(&[None]), (0.0, 1.0));
    }

    #[test]
    fn test_tick_labels_read_bottom_up() {
        let style = tick_label_style(1.0);
        assert!(matches!(style.font.get_transform(), FontTransform::Rotate270));
    }

    #[test]
    fn test_pixels_at_dpi() {
        let options = PlotOptions::new("GENE1", "SMTS");
        assert_eq!(options.pixels(), (3000, 1200));
    }

    #[test]
    fn test_render_svg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plot.svg");
        let grouped = vec![
            GroupCounts::new("Blood", vec![5, 9, 11, 200]),
            GroupCounts::new("Brain", vec![7]),
            GroupCounts::new("Lung", vec![]),
        ];
        let mut options = PlotOptions::new("GENE1", "SMTS");
        options.dpi = 100;

        render_box_plot(&path, &grouped, &options).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("GENE1 read counts across all tissue samples"));
        assert!(svg.contains("Brain"));
    }
}
