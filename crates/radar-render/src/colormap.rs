//! Color ramps for radar fields.

use plotters::style::RGBColor;
use radar_common::{DIFFERENTIAL_REFLECTIVITY, VELOCITY};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    pub fn to_rgb(self) -> RGBColor {
        RGBColor(self.r, self.g, self.b)
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| (a as f32 * t_inv + b as f32 * t).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// Piecewise-linear ramp over normalized positions `0..=1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    pub name: &'static str,
    stops: Vec<(f32, Color)>,
}

impl Colormap {
    /// Stops must be sorted by position, start at 0 and end at 1.
    pub fn new(name: &'static str, stops: Vec<(f32, Color)>) -> Self {
        Self { name, stops }
    }

    /// Color at normalized position `t`, clamped to the ramp ends.
    pub fn sample(&self, t: f32) -> Color {
        let Some(&(_, first)) = self.stops.first() else {
            return Color::transparent();
        };
        if !t.is_finite() || t <= self.stops[0].0 {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (p0, c0) = pair[0];
            let (p1, c1) = pair[1];
            if t <= p1 {
                return interpolate_color(c0, c1, (t - p0) / (p1 - p0));
            }
        }
        self.stops[self.stops.len() - 1].1
    }

    /// Color of `value` scaled into `vmin..vmax`.
    pub fn map(&self, value: f32, vmin: f32, vmax: f32) -> Color {
        let range = vmax - vmin;
        let range = if range.abs() < 0.001 { 1.0 } else { range };
        self.sample((value - vmin) / range)
    }

    /// Carbone42-style reflectivity ramp: grays and blues for weak echo,
    /// greens and yellows for moderate, reds and magenta for intense.
    pub fn reflectivity() -> Self {
        Self::new(
            "carbone42",
            vec![
                (0.00, Color::rgb(204, 204, 204)),
                (0.10, Color::rgb(153, 204, 255)),
                (0.20, Color::rgb(0, 128, 255)),
                (0.30, Color::rgb(0, 204, 153)),
                (0.40, Color::rgb(0, 204, 0)),
                (0.50, Color::rgb(0, 128, 0)),
                (0.60, Color::rgb(255, 255, 0)),
                (0.70, Color::rgb(255, 153, 0)),
                (0.80, Color::rgb(255, 0, 0)),
                (0.90, Color::rgb(153, 0, 0)),
                (1.00, Color::rgb(255, 0, 255)),
            ],
        )
    }

    /// Diverging blue (toward the radar) to red (away) ramp.
    pub fn velocity() -> Self {
        Self::new(
            "velocity",
            vec![
                (0.00, Color::rgb(0, 0, 153)),
                (0.25, Color::rgb(51, 102, 255)),
                (0.50, Color::rgb(240, 240, 240)),
                (0.75, Color::rgb(255, 80, 80)),
                (1.00, Color::rgb(153, 0, 0)),
            ],
        )
    }

    pub fn differential_reflectivity() -> Self {
        Self::new(
            "refdiff",
            vec![
                (0.00, Color::rgb(64, 0, 128)),
                (0.20, Color::rgb(0, 0, 255)),
                (0.40, Color::rgb(0, 200, 255)),
                (0.50, Color::rgb(200, 200, 200)),
                (0.60, Color::rgb(0, 200, 0)),
                (0.80, Color::rgb(255, 200, 0)),
                (1.00, Color::rgb(200, 0, 0)),
            ],
        )
    }

    /// Default ramp for a field name; unknown fields use the reflectivity ramp.
    pub fn for_field(name: &str) -> Self {
        match name {
            VELOCITY => Self::velocity(),
            DIFFERENTIAL_REFLECTIVITY => Self::differential_reflectivity(),
            _ => Self::reflectivity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_midpoint() {
        let c = interpolate_color(Color::rgb(0, 0, 0), Color::rgb(255, 100, 50), 0.5);
        assert_eq!(c, Color::rgb(128, 50, 25));
    }

    #[test]
    fn test_sample_hits_stops_and_clamps() {
        let cmap = Colormap::reflectivity();
        assert_eq!(cmap.sample(0.0), Color::rgb(204, 204, 204));
        assert_eq!(cmap.sample(0.4), Color::rgb(0, 204, 0));
        assert_eq!(cmap.sample(1.0), Color::rgb(255, 0, 255));
        assert_eq!(cmap.sample(-3.0), Color::rgb(204, 204, 204));
        assert_eq!(cmap.sample(7.0), Color::rgb(255, 0, 255));
        assert_eq!(cmap.sample(f32::NAN), Color::rgb(204, 204, 204));
    }

    #[test]
    fn test_map_scales_into_limits() {
        let cmap = Colormap::velocity();
        assert_eq!(cmap.map(0.0, -30.0, 30.0), Color::rgb(240, 240, 240));
        assert_eq!(cmap.map(-30.0, -30.0, 30.0), Color::rgb(0, 0, 153));
        assert_eq!(cmap.map(45.0, -30.0, 30.0), Color::rgb(153, 0, 0));
    }

    #[test]
    fn test_for_field() {
        assert_eq!(Colormap::for_field(VELOCITY).name, "velocity");
        assert_eq!(Colormap::for_field(DIFFERENTIAL_REFLECTIVITY).name, "refdiff");
        assert_eq!(Colormap::for_field("reflectivity_horizontal").name, "carbone42");
    }

    #[test]
    fn test_empty_colormap_is_transparent() {
        let cmap = Colormap::new("empty", Vec::new());
        assert_eq!(cmap.sample(0.5), Color::transparent());
    }
}
