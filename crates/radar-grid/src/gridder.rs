//! Nearest-gate gridding.
//!
//! Each grid cell is mapped to an azimuth and ground range from the radar.
//! Every sweep proposes its nearest gate to that point; among proposals that
//! fall inside the radius of influence, the gate whose beam height is
//! closest to the cell altitude wins. Masked gates never contribute.

use ndarray::Array3;
use radar_common::{Field, GateIndex, RadarResult, RadarVolume, SweepLocator};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::composite::CompositeGrid;
use crate::spec::GridSpec;

/// Resamples volume fields onto a Cartesian grid.
pub trait Gridder {
    fn grid(&self, volume: &RadarVolume, fields: &[&str], spec: &GridSpec) -> RadarResult<CompositeGrid>;
}

/// Distance-dependent radius of influence.
///
/// `max(min_radius, h_factor * z / 20 + horizontal_distance * tan(beam_width))`,
/// so the radius grows with the beam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiusOfInfluence {
    pub min_radius: f64,
    pub beam_width_deg: f64,
    pub h_factor: f64,
}

impl Default for RadiusOfInfluence {
    fn default() -> Self {
        Self {
            min_radius: 500.0,
            beam_width_deg: 1.5,
            h_factor: 1.0,
        }
    }
}

impl RadiusOfInfluence {
    pub fn at(&self, x: f64, y: f64, z: f64) -> f64 {
        let spread = self.h_factor * z / 20.0 + x.hypot(y) * self.beam_width_deg.to_radians().tan();
        spread.max(self.min_radius)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NearestGateGridder {
    pub roi: RadiusOfInfluence,
}

impl NearestGateGridder {
    pub fn new(roi: RadiusOfInfluence) -> Self {
        Self { roi }
    }
}

/// A gate proposed for a cell, with its vertical offset from the cell.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    gate: GateIndex,
    dz: f64,
}

impl Gridder for NearestGateGridder {
    #[instrument(skip(self, volume, spec), fields(shape = ?spec.shape))]
    fn grid(&self, volume: &RadarVolume, fields: &[&str], spec: &GridSpec) -> RadarResult<CompositeGrid> {
        let sources: Vec<&Field> = fields
            .iter()
            .map(|name| volume.require_field(name))
            .collect::<RadarResult<_>>()?;
        let locators: Vec<SweepLocator> = (0..volume.nsweeps())
            .map(|i| SweepLocator::new(volume, i))
            .collect::<RadarResult<_>>()?;

        let (nz, ny, nx) = spec.shape;
        let zs = spec.z_coords();
        let ys = spec.y_coords();
        let xs = spec.x_coords();
        let azimuths = &volume.azimuth.data;

        // One row per (z, y); each row yields nx values per field
        let rows: Vec<Vec<Vec<f32>>> = (0..nz * ny)
            .into_par_iter()
            .map(|row| {
                let z = zs[row / ny];
                let y = ys[row % ny];
                let mut values = vec![vec![f32::NAN; nx]; sources.len()];
                let mut candidates: Vec<Candidate> = Vec::with_capacity(locators.len());

                for (col, &x) in xs.iter().enumerate() {
                    let roi = self.roi.at(x, y, z);
                    candidates.clear();
                    for locator in &locators {
                        let Some(gate) = locator.locate(x, y) else {
                            continue;
                        };
                        let azimuth = azimuths[gate.ray].to_radians();
                        let ground = locator.ground_range(gate.gate);
                        let dx = ground * azimuth.sin() - x;
                        let dy = ground * azimuth.cos() - y;
                        let dz = locator.gate_height(gate.gate) - z;
                        if (dx * dx + dy * dy + dz * dz).sqrt() <= roi {
                            candidates.push(Candidate { gate, dz: dz.abs() });
                        }
                    }
                    if candidates.is_empty() {
                        continue;
                    }
                    candidates.sort_by(|a, b| a.dz.total_cmp(&b.dz));

                    for (field, out) in sources.iter().zip(values.iter_mut()) {
                        if let Some(v) = candidates
                            .iter()
                            .find_map(|c| field.value(c.gate.ray, c.gate.gate))
                        {
                            out[col] = v;
                        }
                    }
                }
                values
            })
            .collect();

        let mut grid = CompositeGrid::new(spec.clone());
        for (f, name) in fields.iter().enumerate() {
            let mut data = Array3::from_elem((nz, ny, nx), f32::NAN);
            for (row, values) in rows.iter().enumerate() {
                for (col, &v) in values[f].iter().enumerate() {
                    data[[row / ny, row % ny, col]] = v;
                }
            }
            grid.fields.insert(name.to_string(), data);
        }

        for name in fields {
            debug!(field = %name, filled = grid.filled_cells(name)?, "Gridded field");
        }
        info!(
            fields = fields.len(),
            sweeps = locators.len(),
            cells = spec.cell_count(),
            "Gridding complete"
        );

        Ok(grid)
    }
}
