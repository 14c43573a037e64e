//! Cartesian gridding of radar volumes.
//!
//! A [`Gridder`] resamples one or more fields of a [`RadarVolume`] onto a
//! regular `z x y x x` grid described by a [`GridSpec`]. Cells that no gate
//! reaches hold NaN.
//!
//! [`RadarVolume`]: radar_common::RadarVolume

pub mod composite;
pub mod gridder;
pub mod reshape;
pub mod spec;

pub use composite::CompositeGrid;
pub use gridder::{Gridder, NearestGateGridder, RadiusOfInfluence};
pub use reshape::ensure_2d;
pub use spec::GridSpec;
