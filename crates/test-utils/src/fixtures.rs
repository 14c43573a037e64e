//! Common test fixtures for radar-report tests.

use std::collections::BTreeMap;

use ndarray::Array2;
use radar_common::{
    Coordinate, Field, RadarVolume, Sweep, DIFFERENTIAL_REFLECTIVITY, REFLECTIVITY, VELOCITY,
};

use crate::generators::{reflectivity_pattern, uniform_field, velocity_pattern};

/// Reference time used in synthetic time units.
pub const REFERENCE_TIME_UNITS: &str = "seconds since 2011-05-20T10:54:16Z";

/// Builder for synthetic PPI volumes.
///
/// Every sweep has the same number of rays, evenly spaced in azimuth and
/// starting at north. Gates are evenly spaced with the first gate centered
/// half a spacing from the antenna.
#[derive(Debug, Clone)]
pub struct VolumeFixture {
    pub fields: Vec<String>,
    pub elevations: Vec<f64>,
    pub rays_per_sweep: usize,
    pub ngates: usize,
    pub gate_spacing_m: f64,
    /// Gates at these (ray, gate) positions are masked in every field
    pub masked_gates: Vec<(usize, usize)>,
    /// Overrides the generated values of every field when set
    pub uniform_value: Option<f32>,
}

impl Default for VolumeFixture {
    fn default() -> Self {
        Self {
            fields: vec![REFLECTIVITY.to_string(), VELOCITY.to_string()],
            elevations: vec![0.5, 1.5, 2.5],
            rays_per_sweep: 72,
            ngates: 60,
            gate_spacing_m: 2500.0,
            masked_gates: Vec::new(),
            uniform_value: None,
        }
    }
}

impl VolumeFixture {
    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_sweeps(mut self, elevations: &[f64]) -> Self {
        self.elevations = elevations.to_vec();
        self
    }

    pub fn with_geometry(mut self, rays_per_sweep: usize, ngates: usize, gate_spacing_m: f64) -> Self {
        self.rays_per_sweep = rays_per_sweep;
        self.ngates = ngates;
        self.gate_spacing_m = gate_spacing_m;
        self
    }

    pub fn with_masked_gate(mut self, ray: usize, gate: usize) -> Self {
        self.masked_gates.push((ray, gate));
        self
    }

    pub fn with_uniform_value(mut self, value: f32) -> Self {
        self.uniform_value = Some(value);
        self
    }

    pub fn build(&self) -> RadarVolume {
        let nsweeps = self.elevations.len();
        let nrays = nsweeps * self.rays_per_sweep;
        let step = 360.0 / self.rays_per_sweep.max(1) as f64;

        let azimuth: Vec<f64> = (0..nrays)
            .map(|ray| (ray % self.rays_per_sweep.max(1)) as f64 * step)
            .collect();
        let elevation: Vec<f64> = (0..nrays)
            .map(|ray| self.elevations[ray / self.rays_per_sweep.max(1)])
            .collect();
        let range: Vec<f64> = (0..self.ngates)
            .map(|gate| (gate as f64 + 0.5) * self.gate_spacing_m)
            .collect();
        let time: Vec<f64> = (0..nrays).map(|ray| ray as f64 * 0.1).collect();

        let sweeps = (0..nsweeps)
            .map(|i| Sweep {
                start_ray: i * self.rays_per_sweep,
                end_ray: (i + 1) * self.rays_per_sweep - 1,
                fixed_angle: self.elevations[i],
            })
            .collect();

        let mut mask = Array2::from_elem((nrays, self.ngates), false);
        for &(ray, gate) in &self.masked_gates {
            if let Some(m) = mask.get_mut((ray, gate)) {
                *m = true;
            }
        }

        let fields = self
            .fields
            .iter()
            .map(|name| {
                let mut data = match (self.uniform_value, name.as_str()) {
                    (Some(v), _) => uniform_field(nrays, self.ngates, v),
                    (None, VELOCITY) => velocity_pattern(nrays, self.ngates, self.rays_per_sweep),
                    (None, _) => reflectivity_pattern(nrays, self.ngates),
                };
                for (value, masked) in data.iter_mut().zip(mask.iter()) {
                    if *masked {
                        *value = FILL_VALUE;
                    }
                }
                let (units, long_name) = field_labels(name);
                let field = Field::with_mask(data, mask.clone())
                    .expect("fixture mask matches data")
                    .with_attribute("units", units)
                    .with_attribute("long_name", long_name);
                (name.clone(), field)
            })
            .collect();

        let mut metadata = BTreeMap::new();
        metadata.insert("instrument_name".to_string(), "XSAPR-SGP".to_string());
        metadata.insert("source".to_string(), "synthetic".to_string());

        RadarVolume {
            time: Coordinate::new(time, REFERENCE_TIME_UNITS),
            range: Coordinate::new(range, "meters"),
            azimuth: Coordinate::new(azimuth, "degrees"),
            elevation: Coordinate::new(elevation, "degrees"),
            latitude: Coordinate::scalar(36.49, "degrees_north"),
            longitude: Coordinate::scalar(-97.59, "degrees_east"),
            altitude: Coordinate::scalar(328.0, "meters"),
            fields,
            sweeps,
            metadata,
            scan_type: "ppi".to_string(),
        }
    }
}

/// Fill value stored at masked gates.
pub const FILL_VALUE: f32 = -9999.0;

fn field_labels(name: &str) -> (&'static str, &'static str) {
    match name {
        REFLECTIVITY => ("dBZ", "Reflectivity horizontal"),
        VELOCITY => ("m/s", "Mean Doppler velocity"),
        DIFFERENTIAL_REFLECTIVITY => ("dB", "Differential reflectivity"),
        _ => ("unitless", "Synthetic field"),
    }
}
