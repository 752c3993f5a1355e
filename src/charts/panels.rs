//! Single-panel chart primitives drawn onto one SVG drawing area.
//!
//! Reports split a root area into a grid and hand each cell to one of these:
//! box plots, grouped bars, heatmaps, line series, scatter/KDE and a 3-D scatter.

use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use statrs::{
    distribution::{Continuous, Normal},
    statistics::Statistics,
};

use crate::charts::palette::{ColorScale, series_color};
use crate::utils::error::Result;

pub type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 20);

/// Bounds of `values` with 5% padding; degenerate input gets a unit-wide range.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if hi - lo < f64::EPSILON {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// Box plot per group; `raw_points` overlays every observation.
pub fn box_panel(
    area: &Area,
    title: &str,
    y_desc: &str,
    groups: &[(String, Vec<f64>)],
    raw_points: bool,
) -> Result<()> {
    if groups.is_empty() {
        return Ok(());
    }
    let labels: Vec<String> = groups.iter().map(|(g, _)| g.clone()).collect();
    let (lo, hi) = padded_range(groups.iter().flat_map(|(_, v)| v.iter().copied()));

    let mut chart = ChartBuilder::on(area)
        .caption(title, CAPTION_FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(labels[..].into_segmented(), lo as f32..hi as f32)?;

    chart
        .configure_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(s) | SegmentValue::Exact(s) => s.to_string(),
            SegmentValue::Last => String::new(),
        })
        .y_desc(y_desc)
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    chart.draw_series(groups.iter().enumerate().filter(|(_, (_, v))| !v.is_empty()).map(
        |(i, (label, values))| {
            Boxplot::new_vertical(SegmentValue::CenterOf(label), &Quartiles::new(values))
                .width(24)
                .whisker_width(0.5)
                .style(series_color(i).stroke_width(2))
        },
    ))?;

    if raw_points {
        chart.draw_series(groups.iter().flat_map(|(label, values)| {
            values
                .iter()
                .map(move |&v| Circle::new((SegmentValue::CenterOf(label), v as f32), 2, RED.mix(0.3).filled()))
        }))?;
    }

    Ok(())
}

/// Side-by-side bars: one cluster per category, one bar per series.
pub fn grouped_bar_panel(
    area: &Area,
    title: &str,
    y_desc: &str,
    categories: &[String],
    series: &[(&str, Vec<f64>)],
) -> Result<()> {
    let n = categories.len();
    let (lo, hi) = padded_range(
        series.iter().flat_map(|(_, v)| v.iter().copied()).chain(std::iter::once(0.0)),
    );

    let mut chart = ChartBuilder::on(area)
        .caption(title, CAPTION_FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5).max(0.5), lo.min(0.0)..hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n + 1)
        .x_label_formatter(&|x| category_label(categories, *x))
        .x_desc("Algorithm")
        .y_desc(y_desc)
        .draw()?;

    let width = 0.8 / series.len().max(1) as f64;
    for (s, (name, values)) in series.iter().enumerate() {
        let color = series_color(s);
        chart
            .draw_series(values.iter().enumerate().filter(|(_, v)| v.is_finite()).map(|(i, &v)| {
                let left = i as f64 - 0.4 + s as f64 * width;
                Rectangle::new([(left, 0.0), (left + width, v)], color.mix(0.8).filled())
            }))?
            .label(*name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn category_label(categories: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    categories.get(i as usize).cloned().unwrap_or_default()
}

/// Annotated heatmap; `cell(row, column)` of `None` draws a blank grey cell.
///
/// Cells are centred on integer coordinates, like the bar clusters, with row 0 at the top.
pub fn heatmap_panel(
    area: &Area,
    title: &str,
    rows: &[String],
    columns: &[String],
    cell: impl Fn(usize, usize) -> Option<f64>,
    scale: ColorScale,
) -> Result<()> {
    let (nrows, ncols) = (rows.len(), columns.len());
    if nrows == 0 || ncols == 0 {
        return Ok(());
    }

    let mut chart = ChartBuilder::on(area)
        .caption(title, CAPTION_FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(110)
        .build_cartesian_2d(-0.5..ncols as f64 - 0.5, -0.5..nrows as f64 - 0.5)?;

    let flip = |r: usize| (nrows - 1 - r) as f64;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(ncols + 1)
        .y_labels(nrows + 1)
        .x_label_formatter(&|x| category_label(columns, *x))
        .y_label_formatter(&|y| flipped_label(rows, *y))
        .draw()?;

    let text_style = ("sans-serif", 12)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    for r in 0..nrows {
        for c in 0..ncols {
            let (x, y) = (c as f64, flip(r));
            let corners = [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)];
            match cell(r, c).filter(|v| v.is_finite()) {
                Some(v) => {
                    chart.draw_series(std::iter::once(Rectangle::new(corners, scale.color(v).filled())))?;
                    chart.draw_series(std::iter::once(Text::new(
                        format!("{:.3}", v),
                        (x, y),
                        text_style.clone(),
                    )))?;
                }
                None => {
                    chart.draw_series(std::iter::once(Rectangle::new(corners, BLACK.mix(0.08).filled())))?;
                }
            }
        }
    }

    Ok(())
}

fn flipped_label(labels: &[String], y: f64) -> String {
    let i = y.round();
    if (y - i).abs() > 1e-6 || i < 0.0 || i as usize >= labels.len() {
        return String::new();
    }
    labels[labels.len() - 1 - i as usize].clone()
}

/// Marker drawn at each point of a line series.
#[derive(Debug, Clone, Copy)]
pub enum Marker {
    Circle,
    Cross,
    Triangle,
}

/// One line (with markers) per named series.
pub fn line_panel(
    area: &Area,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    series: &[(String, Vec<(f64, f64)>)],
    marker: Marker,
) -> Result<()> {
    let (x0, x1) = padded_range(series.iter().flat_map(|(_, p)| p.iter().map(|p| p.0)));
    let (y0, y1) = padded_range(series.iter().flat_map(|(_, p)| p.iter().map(|p| p.1)));

    let mut chart = ChartBuilder::on(area)
        .caption(title, CAPTION_FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    for (i, (name, points)) in series.iter().enumerate() {
        let color = series_color(i);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        match marker {
            Marker::Circle => {
                chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))?;
            }
            Marker::Cross => {
                chart.draw_series(points.iter().map(|&p| Cross::new(p, 4, color.stroke_width(2))))?;
            }
            Marker::Triangle => {
                chart.draw_series(points.iter().map(|&p| TriangleMarker::new(p, 5, color.filled())))?;
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Points in 3-D, one colour per named series.
pub fn scatter3d_panel(
    area: &Area,
    title: &str,
    series: &[(String, Vec<(f64, f64, f64)>)],
) -> Result<()> {
    let all = || series.iter().flat_map(|(_, p)| p.iter());
    let (x0, x1) = padded_range(all().map(|p| p.0));
    let (y0, y1) = padded_range(all().map(|p| p.1));
    let (z0, z1) = padded_range(all().map(|p| p.2));

    let mut chart = ChartBuilder::on(area)
        .caption(title, CAPTION_FONT)
        .margin(20)
        .build_cartesian_3d(x0..x1, z0..z1, y0..y1)?;

    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.3;
        pb.scale = 0.8;
        pb.into_matrix()
    });

    chart.configure_axes().light_grid_style(BLACK.mix(0.1)).max_light_lines(3).draw()?;

    // Height axis carries cost; depth carries node count.
    for (i, (name, points)) in series.iter().enumerate() {
        let color = series_color(i);
        chart
            .draw_series(points.iter().map(|&(x, y, z)| Circle::new((x, z, y), 4, color.filled())))?
            .label(name.as_str())
            .legend(move |(x, y)| Circle::new((x + 8, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Plain 2-D scatter of paired observations.
pub fn scatter_panel(area: &Area, x_desc: &str, y_desc: &str, points: &[(f64, f64)]) -> Result<()> {
    let (x0, x1) = padded_range(points.iter().map(|p| p.0));
    let (y0, y1) = padded_range(points.iter().map(|p| p.1));

    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(4)
        .y_labels(4)
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, series_color(5).mix(0.6).filled())))?;
    Ok(())
}

/// Kernel density estimate of `values` (Gaussian kernel, Scott's bandwidth).
///
/// Without spread there is no density to estimate; only a rug of the values is drawn.
pub fn kde_panel(area: &Area, desc: &str, values: &[f64]) -> Result<()> {
    let (x0, x1) = padded_range(values.iter().copied());
    let curve = kde_curve(values, x0, x1, 100);
    let y1 = curve.iter().map(|p| p.1).fold(0.0, f64::max).max(1e-9) * 1.1;

    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x0..x1, 0.0..y1)?;

    chart
        .configure_mesh()
        .x_desc(desc)
        .y_desc("Density")
        .x_labels(4)
        .y_labels(4)
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    let color = series_color(5);
    chart.draw_series(LineSeries::new(curve, color.stroke_width(2)))?;
    chart.draw_series(values.iter().map(|&v| {
        PathElement::new(vec![(v, 0.0), (v, y1 * 0.04)], color.mix(0.6))
    }))?;
    Ok(())
}

/// Samples the density on `steps` evenly spaced points; empty when undefined.
pub fn kde_curve(values: &[f64], lo: f64, hi: f64, steps: usize) -> Vec<(f64, f64)> {
    if values.len() < 2 || steps < 2 {
        return Vec::new();
    }
    let sd = values.iter().std_dev();
    let bandwidth = sd * (values.len() as f64).powf(-0.2);
    let Ok(kernel) = Normal::new(0.0, 1.0) else {
        return Vec::new();
    };
    if bandwidth.is_nan() || bandwidth <= 0.0 {
        return Vec::new();
    }

    let n = values.len() as f64;
    (0..steps)
        .map(|i| {
            let x = lo + (hi - lo) * i as f64 / (steps - 1) as f64;
            let density = values.iter().map(|v| kernel.pdf((x - v) / bandwidth)).sum::<f64>()
                / (n * bandwidth);
            (x, density)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_handles_degenerate_input() {
        assert_eq!(padded_range(Vec::<f64>::new()), (0.0, 1.0));
        assert_eq!(padded_range(vec![3.0, 3.0]), (2.5, 3.5));
        let (lo, hi) = padded_range(vec![0.0, 10.0, f64::NAN]);
        assert!((lo + 0.5).abs() < 1e-12 && (hi - 10.5).abs() < 1e-12);
    }

    #[test]
    fn kde_integrates_to_roughly_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 4.2, 5.0];
        let curve = kde_curve(&values, -5.0, 11.0, 400);
        let step = curve[1].0 - curve[0].0;
        let area: f64 = curve.iter().map(|p| p.1 * step).sum();
        assert!((area - 1.0).abs() < 0.01, "area = {area}");
    }

    #[test]
    fn kde_of_constant_values_is_empty() {
        assert!(kde_curve(&[2.0, 2.0, 2.0], 0.0, 4.0, 10).is_empty());
    }

    #[test]
    fn category_labels_only_on_integer_ticks() {
        let cats = vec!["GA".to_string(), "PSO".to_string()];
        assert_eq!(category_label(&cats, 1.0), "PSO");
        assert_eq!(category_label(&cats, 0.5), "");
        assert_eq!(category_label(&cats, 2.0), "");
    }

    #[test]
    fn heatmap_rows_read_top_down() {
        let rows = vec!["HFCO".to_string(), "GA".to_string(), "PSO".to_string()];
        assert_eq!(flipped_label(&rows, 2.0), "HFCO");
        assert_eq!(flipped_label(&rows, 0.0), "PSO");
        assert_eq!(flipped_label(&rows, 1.5), "");
        assert_eq!(flipped_label(&rows, 3.0), "");
    }
}
