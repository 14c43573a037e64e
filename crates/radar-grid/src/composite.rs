//! Gridded output.

use std::collections::BTreeMap;

use ndarray::{Array3, ArrayD, Axis};
use radar_common::{RadarError, RadarResult};

use crate::spec::GridSpec;

/// Gridded fields, each shaped `(nz, ny, nx)`. Row 0 of a layer is the
/// southernmost y coordinate.
#[derive(Debug, Clone)]
pub struct CompositeGrid {
    pub spec: GridSpec,
    pub fields: BTreeMap<String, Array3<f32>>,
}

impl CompositeGrid {
    pub fn new(spec: GridSpec) -> Self {
        Self {
            spec,
            fields: BTreeMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> RadarResult<&Array3<f32>> {
        self.fields
            .get(name)
            .ok_or_else(|| RadarError::MissingField(name.to_string()))
    }

    /// One z layer of a field, in dynamic dimensionality.
    pub fn layer(&self, name: &str, level: usize) -> RadarResult<ArrayD<f32>> {
        let data = self.field(name)?;
        let nz = data.len_of(Axis(0));
        if level >= nz {
            return Err(RadarError::ShapeMismatch {
                expected: vec![level + 1],
                actual: vec![nz],
            });
        }
        Ok(data.index_axis(Axis(0), level).to_owned().into_dyn())
    }

    /// Number of cells holding a value.
    pub fn filled_cells(&self, name: &str) -> RadarResult<usize> {
        Ok(self.field(name)?.iter().filter(|v| !v.is_nan()).count())
    }
}
