//! Colours: categorical series colours plus sequential and diverging heatmap scales.

use plotters::style::RGBColor;

/// Evenly spaced hues, reused cyclically.
const SERIES: [RGBColor; 8] = [
    RGBColor(246, 112, 136),
    RGBColor(206, 143, 49),
    RGBColor(150, 163, 49),
    RGBColor(50, 177, 101),
    RGBColor(53, 172, 164),
    RGBColor(56, 167, 208),
    RGBColor(163, 140, 244),
    RGBColor(245, 101, 204),
];

pub fn series_color(index: usize) -> RGBColor {
    SERIES[index % SERIES.len()]
}

// Yellow -> orange -> red
const SEQUENTIAL: [RGBColor; 3] = [
    RGBColor(255, 255, 204),
    RGBColor(253, 141, 60),
    RGBColor(189, 0, 38),
];

// Blue -> white -> red
const DIVERGING: [RGBColor; 3] = [
    RGBColor(59, 76, 192),
    RGBColor(221, 221, 221),
    RGBColor(180, 4, 38),
];

/// How heatmap values map to colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorScale {
    /// Low..high over the observed range.
    Sequential { min: f64, max: f64 },
    /// Symmetric around zero, saturating at `±limit`.
    Diverging { limit: f64 },
}

impl ColorScale {
    pub fn color(&self, value: f64) -> RGBColor {
        match *self {
            ColorScale::Sequential { min, max } => {
                let t = if max > min { (value - min) / (max - min) } else { 0.5 };
                interpolate(&SEQUENTIAL, t)
            }
            ColorScale::Diverging { limit } => {
                let t = if limit > 0.0 { 0.5 + 0.5 * value / limit } else { 0.5 };
                interpolate(&DIVERGING, t)
            }
        }
    }
}

/// Piecewise-linear interpolation through `stops`, `t` clamped to [0, 1].
fn interpolate(stops: &[RGBColor], t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (stops.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(stops.len() - 2);
    let frac = scaled - i as f64;
    let (a, b) = (stops[i], stops[i + 1]);
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}
