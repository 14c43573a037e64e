//! In-memory radar volume.
//!
//! A [`RadarVolume`] is built once by a reader and shared read-only by every
//! pipeline stage. Field arrays are laid out rays x gates; sweeps are
//! contiguous, inclusive ray ranges into those arrays.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use ndarray::{s, Array1, Array2, ArrayView2};

use crate::error::{RadarError, RadarResult};

/// A coordinate or scalar variable: its attributes plus a 1D data vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coordinate {
    pub attributes: BTreeMap<String, String>,
    pub data: Array1<f64>,
}

impl Coordinate {
    pub fn new(data: Vec<f64>, units: &str) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert("units".to_string(), units.to_string());
        Self {
            attributes,
            data: Array1::from(data),
        }
    }

    /// A single-valued coordinate such as the site latitude.
    pub fn scalar(value: f64, units: &str) -> Self {
        Self::new(vec![value], units)
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn units(&self) -> Option<&str> {
        self.attributes.get("units").map(String::as_str)
    }

    pub fn first(&self) -> Option<f64> {
        self.data.first().copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Renders as an attribute map followed by a data summary, eliding the
/// middle of long vectors.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (name, value) in &self.attributes {
            write!(f, "'{}': '{}', ", name, value)?;
        }
        write!(f, "'data': [")?;
        let n = self.data.len();
        let mut parts: Vec<String> = Vec::with_capacity(7);
        if n > 6 {
            parts.extend(self.data.iter().take(3).map(|v| format!("{}", v)));
            parts.push("...".to_string());
            parts.extend(self.data.iter().skip(n - 3).map(|v| format!("{}", v)));
        } else {
            parts.extend(self.data.iter().map(|v| format!("{}", v)));
        }
        write!(f, "{}]}}", parts.join(" "))
    }
}

/// One named measurement, rays x gates.
///
/// Invalid gates keep their decoded fill value in `data` and are flagged in
/// `mask`; statistics run over `data` as-is, renderers skip masked gates.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub attributes: BTreeMap<String, String>,
    pub data: Array2<f32>,
    pub mask: Array2<bool>,
}

impl Field {
    /// Field with every gate valid.
    pub fn new(data: Array2<f32>) -> Self {
        let mask = Array2::from_elem(data.raw_dim(), false);
        Self {
            attributes: BTreeMap::new(),
            data,
            mask,
        }
    }

    pub fn with_mask(data: Array2<f32>, mask: Array2<bool>) -> RadarResult<Self> {
        if data.shape() != mask.shape() {
            return Err(RadarError::ShapeMismatch {
                expected: data.shape().to_vec(),
                actual: mask.shape().to_vec(),
            });
        }
        Ok(Self {
            attributes: BTreeMap::new(),
            data,
            mask,
        })
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn units(&self) -> Option<&str> {
        self.attributes.get("units").map(String::as_str)
    }

    pub fn long_name(&self) -> Option<&str> {
        self.attributes.get("long_name").map(String::as_str)
    }

    /// Value at (ray, gate), or `None` when masked or out of bounds.
    pub fn value(&self, ray: usize, gate: usize) -> Option<f32> {
        match self.mask.get((ray, gate)) {
            Some(false) => self.data.get((ray, gate)).copied(),
            _ => None,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Minimum and maximum over unmasked, finite gates.
    pub fn valid_range(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .zip(self.mask.iter())
            .filter(|(v, masked)| !**masked && v.is_finite())
            .fold(None, |acc, (&v, _)| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// A contiguous, inclusive ray range at one fixed angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub start_ray: usize,
    pub end_ray: usize,
    pub fixed_angle: f64,
}

impl Sweep {
    pub fn ray_count(&self) -> usize {
        self.end_ray + 1 - self.start_ray
    }
}

/// A parsed radar scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadarVolume {
    pub time: Coordinate,
    pub range: Coordinate,
    pub azimuth: Coordinate,
    pub elevation: Coordinate,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    pub altitude: Coordinate,
    pub fields: BTreeMap<String, Field>,
    pub sweeps: Vec<Sweep>,
    pub metadata: BTreeMap<String, String>,
    pub scan_type: String,
}

impl RadarVolume {
    pub fn nsweeps(&self) -> usize {
        self.sweeps.len()
    }

    pub fn nrays(&self) -> usize {
        self.azimuth.len()
    }

    pub fn ngates(&self) -> usize {
        self.range.len()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Optional lookup, for stages that skip absent fields.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Required lookup, for stages that cannot run without the field.
    pub fn require_field(&self, name: &str) -> RadarResult<&Field> {
        self.fields
            .get(name)
            .ok_or_else(|| RadarError::MissingField(name.to_string()))
    }

    pub fn sweep(&self, index: usize) -> RadarResult<&Sweep> {
        self.sweeps.get(index).ok_or(RadarError::SweepOutOfRange {
            index,
            count: self.sweeps.len(),
        })
    }

    /// The rays of one sweep of a field.
    pub fn sweep_data(&self, field: &str, index: usize) -> RadarResult<ArrayView2<'_, f32>> {
        let field = self.require_field(field)?;
        let sweep = self.sweep(index)?;
        Ok(field.data.slice(s![sweep.start_ray..=sweep.end_ray, ..]))
    }

    /// Mean elevation of a sweep's rays, falling back to its fixed angle.
    pub fn sweep_elevation(&self, index: usize) -> RadarResult<f64> {
        let sweep = self.sweep(index)?;
        if sweep.end_ray >= self.elevation.len() {
            return Ok(sweep.fixed_angle);
        }
        let angles = self.elevation.data.slice(s![sweep.start_ray..=sweep.end_ray]);
        Ok(angles.mean().unwrap_or(sweep.fixed_angle))
    }

    /// Volume start time from a CF `"<unit> since <timestamp>"` units string.
    pub fn scan_start(&self) -> Option<DateTime<Utc>> {
        let units = self.time.units()?;
        let (_, reference) = units.split_once(" since ")?;
        let reference = reference.trim().trim_end_matches('Z');
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(reference, format).ok())
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    /// Check that every field and sweep agrees with the coordinate sizes.
    pub fn validate(&self) -> RadarResult<()> {
        let expected = [self.nrays(), self.ngates()];
        if self.elevation.len() != self.nrays() {
            return Err(RadarError::ShapeMismatch {
                expected: vec![self.nrays()],
                actual: vec![self.elevation.len()],
            });
        }
        for field in self.fields.values() {
            if field.data.shape() != expected {
                return Err(RadarError::ShapeMismatch {
                    expected: expected.to_vec(),
                    actual: field.data.shape().to_vec(),
                });
            }
        }
        for (index, sweep) in self.sweeps.iter().enumerate() {
            if sweep.start_ray > sweep.end_ray || sweep.end_ray >= self.nrays() {
                return Err(RadarError::InvalidFormat(format!(
                    "sweep {} spans rays {}..={} of {}",
                    index,
                    sweep.start_ray,
                    sweep.end_ray,
                    self.nrays()
                )));
            }
        }
        Ok(())
    }
}
