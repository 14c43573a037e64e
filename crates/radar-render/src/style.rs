//! Display limits and labels per field.

use radar_common::{Field, DIFFERENTIAL_REFLECTIVITY, REFLECTIVITY, VELOCITY};

use crate::colormap::Colormap;

/// How a field is colored and labelled.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStyle {
    pub colormap: Colormap,
    pub vmin: f32,
    pub vmax: f32,
    /// Colorbar label, `"<long name> (<units>)"`
    pub label: String,
}

impl FieldStyle {
    pub fn for_field(name: &str, field: &Field) -> Self {
        let (vmin, vmax) = default_limits(name)
            .or_else(|| field.valid_range())
            .unwrap_or((0.0, 1.0));
        let long_name = field.long_name().unwrap_or(name);
        let units = field.units().unwrap_or("?");

        Self {
            colormap: Colormap::for_field(name),
            vmin,
            vmax,
            label: format!("{} ({})", long_name, units),
        }
    }

    pub fn color(&self, value: f32) -> crate::colormap::Color {
        self.colormap.map(value, self.vmin, self.vmax)
    }
}

/// Fixed display limits for well-known fields.
pub fn default_limits(name: &str) -> Option<(f32, f32)> {
    match name {
        REFLECTIVITY | "reflectivity" => Some((-30.0, 75.0)),
        VELOCITY => Some((-30.0, 30.0)),
        DIFFERENTIAL_REFLECTIVITY => Some((-1.0, 8.0)),
        _ => None,
    }
}
