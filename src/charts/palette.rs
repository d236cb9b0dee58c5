//! Color scales used by the charts.

use plotters::style::RGBColor;

/// seaborn "pastel" palette
pub const PASTEL: [RGBColor; 6] = [
    RGBColor(161, 201, 244), // Blue
    RGBColor(255, 180, 130), // Orange
    RGBColor(141, 229, 161), // Green
    RGBColor(255, 159, 155), // Red
    RGBColor(208, 187, 255), // Purple
    RGBColor(222, 187, 155), // Brown
];

// Viridis sampled at 0, 1/8, ..., 1
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 45, 123),
    (59, 82, 139),
    (44, 114, 142),
    (33, 145, 140),
    (40, 174, 128),
    (94, 201, 98),
    (173, 220, 48),
    (253, 231, 37),
];

pub fn pastel(index: usize) -> RGBColor {
    PASTEL[index % PASTEL.len()]
}

fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Map `value` in `[min, max]` onto `[0, 1]`; a flat range maps to 0.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Rainbow scale, purple at 0 through red at 1.
pub fn rainbow(x: f64) -> RGBColor {
    let x = x.clamp(0.0, 1.0);
    RGBColor(
        channel((2.0 * x - 0.5).abs()),
        channel((std::f64::consts::PI * x).sin()),
        channel((std::f64::consts::FRAC_PI_2 * x).cos()),
    )
}

/// `n` rainbow colors evenly spaced over the whole scale.
pub fn rainbow_steps(n: usize) -> Vec<RGBColor> {
    match n {
        0 => Vec::new(),
        1 => vec![rainbow(0.0)],
        _ => (0..n).map(|i| rainbow(i as f64 / (n - 1) as f64)).collect(),
    }
}

pub fn viridis(x: f64) -> RGBColor {
    let pos = x.clamp(0.0, 1.0) * (VIRIDIS.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = (lower + 1).min(VIRIDIS.len() - 1);
    let frac = pos - lower as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (r0, g0, b0) = VIRIDIS[lower];
    let (r1, g1, b1) = VIRIDIS[upper];
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}
