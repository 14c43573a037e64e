//! CF/Radial NetCDF reader.
//!
//! # Layout consumed
//!
//! - dimensions `time` (rays), `range` (gates), `sweep`
//! - coordinate variables `time`, `range`, `azimuth`, `elevation`
//! - site location `latitude`, `longitude`, `altitude` (scalar or per-ray;
//!   only the first value is used)
//! - `sweep_start_ray_index`, `sweep_end_ray_index`, optional `fixed_angle`
//! - every `(time, range)` variable is a field
//!
//! Packed fields are unpacked with `scale_factor`/`add_offset`. Raw values
//! equal to `_FillValue` (or `missing_value`) and non-finite values are
//! masked and keep their raw value.

use std::collections::BTreeMap;
use std::path::Path;

use ndarray::Array2;
use radar_common::{Coordinate, Field, RadarError, RadarResult, RadarVolume, Sweep};
use tracing::{debug, info, instrument};

use crate::attributes::{get_f64_attr, global_attributes, variable_attributes};
use crate::native::silence_hdf5_errors;
use crate::RadarReader;

/// Reads CF/Radial files.
#[derive(Debug, Clone, Default)]
pub struct CfRadialReader {
    /// Only load these fields, when set
    pub include_fields: Option<Vec<String>>,
    /// Never load these fields
    pub exclude_fields: Vec<String>,
}

impl CfRadialReader {
    pub fn with_exclude_fields(mut self, fields: &[&str]) -> Self {
        self.exclude_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_include_fields(mut self, fields: &[&str]) -> Self {
        self.include_fields = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    fn wants_field(&self, name: &str) -> bool {
        if self.exclude_fields.iter().any(|f| f == name) {
            return false;
        }
        match &self.include_fields {
            Some(include) => include.iter().any(|f| f == name),
            None => true,
        }
    }
}

impl RadarReader for CfRadialReader {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn read(&self, path: &Path) -> RadarResult<RadarVolume> {
        silence_hdf5_errors();

        if !path.exists() {
            return Err(RadarError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("radar file not found: {}", path.display()),
            )));
        }

        let file = netcdf::open(path)
            .map_err(|e| RadarError::InvalidFormat(format!("Failed to open NetCDF: {}", e)))?;

        let nrays = dimension_len(&file, "time")?;
        let ngates = dimension_len(&file, "range")?;
        let nsweeps = dimension_len(&file, "sweep")?;

        let time = read_coordinate(&file, "time")?;
        let range = read_coordinate(&file, "range")?;
        let azimuth = read_coordinate(&file, "azimuth")?;
        let elevation = read_coordinate(&file, "elevation")?;
        let latitude = read_coordinate(&file, "latitude")?;
        let longitude = read_coordinate(&file, "longitude")?;
        let altitude = read_coordinate(&file, "altitude")?;

        let sweeps = read_sweeps(&file, nsweeps, &elevation)?;

        let mut fields = BTreeMap::new();
        for var in file.variables() {
            let name = var.name();
            let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
            if dims != ["time", "range"] || !self.wants_field(&name) {
                continue;
            }
            let field = read_field(&var, nrays, ngates)?;
            debug!(field = %name, "Loaded field");
            fields.insert(name, field);
        }

        let metadata = global_attributes(&file);
        let scan_type = metadata
            .get("scan_type")
            .cloned()
            .unwrap_or_else(|| infer_scan_type(&azimuth, &elevation, sweeps.first()));

        let volume = RadarVolume {
            time,
            range,
            azimuth,
            elevation,
            latitude,
            longitude,
            altitude,
            fields,
            sweeps,
            metadata,
            scan_type,
        };
        volume.validate()?;

        info!(
            rays = nrays,
            gates = ngates,
            sweeps = nsweeps,
            fields = volume.fields.len(),
            scan_type = %volume.scan_type,
            "Read radar volume"
        );

        Ok(volume)
    }
}

fn dimension_len(file: &netcdf::File, name: &str) -> RadarResult<usize> {
    file.dimension(name)
        .map(|d| d.len())
        .ok_or_else(|| RadarError::MissingData(format!("{} dimension", name)))
}

fn read_coordinate(file: &netcdf::File, name: &str) -> RadarResult<Coordinate> {
    let var = file
        .variable(name)
        .ok_or_else(|| RadarError::MissingData(format!("{} variable", name)))?;
    let data: Vec<f64> = var
        .get_values(..)
        .map_err(|e| RadarError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;
    Ok(Coordinate {
        attributes: variable_attributes(&var),
        data: data.into(),
    })
}

fn read_sweeps(
    file: &netcdf::File,
    nsweeps: usize,
    elevation: &Coordinate,
) -> RadarResult<Vec<Sweep>> {
    let read_indices = |name: &str| -> RadarResult<Vec<i32>> {
        let var = file
            .variable(name)
            .ok_or_else(|| RadarError::MissingData(format!("{} variable", name)))?;
        var.get_values(..)
            .map_err(|e| RadarError::InvalidFormat(format!("Failed to read {}: {}", name, e)))
    };
    let starts = read_indices("sweep_start_ray_index")?;
    let ends = read_indices("sweep_end_ray_index")?;
    if starts.len() != nsweeps || ends.len() != nsweeps {
        return Err(RadarError::ShapeMismatch {
            expected: vec![nsweeps],
            actual: vec![starts.len(), ends.len()],
        });
    }

    let fixed_angles: Option<Vec<f64>> = file
        .variable("fixed_angle")
        .and_then(|var| var.get_values(..).ok());

    starts
        .iter()
        .zip(ends.iter())
        .enumerate()
        .map(|(i, (&start, &end))| {
            if start < 0 || end < start {
                return Err(RadarError::InvalidFormat(format!(
                    "sweep {} has ray indices {}..={}",
                    i, start, end
                )));
            }
            let (start_ray, end_ray) = (start as usize, end as usize);
            let fixed_angle = fixed_angles
                .as_ref()
                .and_then(|angles| angles.get(i).copied())
                .unwrap_or_else(|| mean_angle(elevation, start_ray, end_ray));
            Ok(Sweep {
                start_ray,
                end_ray,
                fixed_angle,
            })
        })
        .collect()
}

fn mean_angle(coord: &Coordinate, start: usize, end: usize) -> f64 {
    let values: Vec<f64> = coord.data.iter().skip(start).take(end + 1 - start).copied().collect();
    if values.is_empty() {
        f64::NAN
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn read_field(var: &netcdf::Variable, nrays: usize, ngates: usize) -> RadarResult<Field> {
    let name = var.name();
    let raw: Vec<f32> = var
        .get_values(..)
        .map_err(|e| RadarError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;

    let scale_factor = get_f64_attr(var, "scale_factor").unwrap_or(1.0);
    let add_offset = get_f64_attr(var, "add_offset").unwrap_or(0.0);
    let fill_value = get_f64_attr(var, "_FillValue")
        .or_else(|| get_f64_attr(var, "missing_value"))
        .map(|v| v as f32);

    let mut mask = Vec::with_capacity(raw.len());
    let data: Vec<f32> = raw
        .iter()
        .map(|&v| {
            let masked = !v.is_finite() || fill_value.map_or(false, |fill| v == fill);
            mask.push(masked);
            if masked {
                v
            } else {
                (v as f64 * scale_factor + add_offset) as f32
            }
        })
        .collect();

    let shape_error = |len: usize| RadarError::ShapeMismatch {
        expected: vec![nrays, ngates],
        actual: vec![len],
    };
    let len = data.len();
    let data = Array2::from_shape_vec((nrays, ngates), data).map_err(|_| shape_error(len))?;
    let mask = Array2::from_shape_vec((nrays, ngates), mask).map_err(|_| shape_error(len))?;

    let mut field = Field::with_mask(data, mask)?;
    field.attributes = variable_attributes(var);
    Ok(field)
}

/// `ppi` when azimuth varies more than elevation across the first sweep.
fn infer_scan_type(azimuth: &Coordinate, elevation: &Coordinate, sweep: Option<&Sweep>) -> String {
    let Some(sweep) = sweep else {
        return "other".to_string();
    };
    let span = |coord: &Coordinate| {
        let values = coord
            .data
            .iter()
            .skip(sweep.start_ray)
            .take(sweep.ray_count())
            .copied();
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if hi >= lo {
            hi - lo
        } else {
            0.0
        }
    };
    if span(azimuth) > span(elevation) {
        "ppi".to_string()
    } else {
        "rhi".to_string()
    }
}
