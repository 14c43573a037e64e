//! Beam geometry: antenna coordinates to Cartesian, and the inverse lookup
//! from a Cartesian point to the nearest gate of a sweep.
//!
//! Propagation uses the 4/3 effective Earth radius model.

use crate::error::{RadarError, RadarResult};
use crate::volume::RadarVolume;

/// Mean Earth radius (meters)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Standard refraction factor applied to the Earth radius
pub const EFFECTIVE_RADIUS_FACTOR: f64 = 4.0 / 3.0;

/// Convert a gate's antenna coordinates to radar-relative Cartesian meters.
///
/// Returns `(x, y, z)`: east, north and height above the antenna.
pub fn antenna_to_cartesian(range_m: f64, azimuth_deg: f64, elevation_deg: f64) -> (f64, f64, f64) {
    let r_eff = EARTH_RADIUS_M * EFFECTIVE_RADIUS_FACTOR;
    let theta_e = elevation_deg.to_radians();
    let theta_a = azimuth_deg.to_radians();

    let z = (range_m.powi(2) + r_eff.powi(2) + 2.0 * range_m * r_eff * theta_e.sin()).sqrt() - r_eff;
    let s = r_eff * (range_m * theta_e.cos() / (r_eff + z)).asin();

    (s * theta_a.sin(), s * theta_a.cos(), z)
}

/// Smallest absolute difference between two bearings, in degrees.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// A (ray, gate) position in a volume's field arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateIndex {
    pub ray: usize,
    pub gate: usize,
}

/// Nearest-gate lookup for one sweep.
///
/// Rays are indexed by azimuth and gates by ground distance along the
/// sweep's mean elevation, so a lookup is two binary searches.
#[derive(Debug, Clone)]
pub struct SweepLocator {
    /// (azimuth in [0, 360), absolute ray index), sorted by azimuth
    rays: Vec<(f64, usize)>,
    azimuth_tolerance: f64,
    ground_ranges: Vec<f64>,
    heights: Vec<f64>,
    range_tolerance: f64,
}

impl SweepLocator {
    pub fn new(volume: &RadarVolume, sweep_index: usize) -> RadarResult<Self> {
        let sweep = volume.sweep(sweep_index)?;
        if sweep.end_ray >= volume.azimuth.len() {
            return Err(RadarError::InvalidFormat(format!(
                "sweep {} ends at ray {} but volume has {} azimuths",
                sweep_index,
                sweep.end_ray,
                volume.azimuth.len()
            )));
        }
        if volume.range.is_empty() {
            return Err(RadarError::MissingData("range gates".to_string()));
        }
        let elevation = volume.sweep_elevation(sweep_index)?;

        let mut rays: Vec<(f64, usize)> = (sweep.start_ray..=sweep.end_ray)
            .map(|ray| (volume.azimuth.data[ray].rem_euclid(360.0), ray))
            .collect();
        rays.sort_by(|a, b| a.0.total_cmp(&b.0));
        let azimuth_tolerance = median_spacing(&rays);

        // Ground distance and height of each gate along azimuth 0
        let (ground_ranges, heights): (Vec<f64>, Vec<f64>) = volume
            .range
            .data
            .iter()
            .map(|&r| {
                let (_, y, z) = antenna_to_cartesian(r, 0.0, elevation);
                (y, z)
            })
            .unzip();

        let n = ground_ranges.len();
        let range_tolerance = if n >= 2 {
            (ground_ranges[n - 1] - ground_ranges[0]) / (n - 1) as f64 / 2.0
        } else {
            ground_ranges[0].abs().max(1.0)
        };

        Ok(Self {
            rays,
            azimuth_tolerance,
            ground_ranges,
            heights,
            range_tolerance,
        })
    }

    /// Nearest gate to the radar-relative point `(x, y)` in meters, if one
    /// lies within half a gate and one ray spacing of it.
    pub fn locate(&self, x: f64, y: f64) -> Option<GateIndex> {
        let ray = self.nearest_ray(x.atan2(y).to_degrees().rem_euclid(360.0))?;
        let gate = self.nearest_gate(x.hypot(y))?;
        Some(GateIndex { ray, gate })
    }

    fn nearest_ray(&self, azimuth: f64) -> Option<usize> {
        let n = self.rays.len();
        if n == 0 {
            return None;
        }
        let idx = self.rays.partition_point(|(a, _)| *a < azimuth);
        let (best_az, best_ray) = [self.rays[idx % n], self.rays[(idx + n - 1) % n]]
            .into_iter()
            .min_by(|a, b| {
                angular_distance(a.0, azimuth).total_cmp(&angular_distance(b.0, azimuth))
            })?;
        (angular_distance(best_az, azimuth) <= self.azimuth_tolerance).then_some(best_ray)
    }

    fn nearest_gate(&self, ground_range: f64) -> Option<usize> {
        let n = self.ground_ranges.len();
        let idx = self.ground_ranges.partition_point(|&g| g < ground_range);
        let gate = [idx.min(n - 1), idx.saturating_sub(1)]
            .into_iter()
            .min_by(|&a, &b| {
                (self.ground_ranges[a] - ground_range)
                    .abs()
                    .total_cmp(&(self.ground_ranges[b] - ground_range).abs())
            })?;
        ((self.ground_ranges[gate] - ground_range).abs() <= self.range_tolerance).then_some(gate)
    }

    /// Beam height above the antenna at a gate (meters).
    pub fn gate_height(&self, gate: usize) -> f64 {
        self.heights[gate]
    }

    pub fn ground_range(&self, gate: usize) -> f64 {
        self.ground_ranges[gate]
    }
}

/// Median gap between consecutive sorted azimuths, wrapping at 360.
fn median_spacing(rays: &[(f64, usize)]) -> f64 {
    if rays.len() < 2 {
        return 360.0;
    }
    let mut gaps: Vec<f64> = rays.windows(2).map(|w| w[1].0 - w[0].0).collect();
    gaps.push(rays[0].0 + 360.0 - rays[rays.len() - 1].0);
    gaps.sort_by(f64::total_cmp);
    gaps[gaps.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::{Coordinate, Sweep};

    fn ring_volume(rays: usize, gates: usize, spacing_m: f64) -> RadarVolume {
        let step = 360.0 / rays as f64;
        RadarVolume {
            azimuth: Coordinate::new((0..rays).map(|i| i as f64 * step).collect(), "degrees"),
            elevation: Coordinate::new(vec![0.5; rays], "degrees"),
            range: Coordinate::new(
                (0..gates).map(|g| (g as f64 + 0.5) * spacing_m).collect(),
                "meters",
            ),
            sweeps: vec![Sweep {
                start_ray: 0,
                end_ray: rays - 1,
                fixed_angle: 0.5,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_antenna_to_cartesian_horizontal_beam() {
        let (x, y, z) = antenna_to_cartesian(10_000.0, 90.0, 0.0);
        assert!((x - 10_000.0).abs() < 1.0, "x = {}", x);
        assert!(y.abs() < 1e-6);
        // Earth curvature lifts the beam a few meters at 10 km
        assert!(z > 0.0 && z < 10.0, "z = {}", z);
    }

    #[test]
    fn test_antenna_to_cartesian_elevated_beam_rises() {
        let (_, _, z_low) = antenna_to_cartesian(50_000.0, 0.0, 0.5);
        let (_, _, z_high) = antenna_to_cartesian(50_000.0, 0.0, 5.0);
        assert!(z_high > z_low);
    }

    #[test]
    fn test_angular_distance_wraps() {
        assert_eq!(angular_distance(359.0, 1.0), 2.0);
        assert_eq!(angular_distance(10.0, 350.0), 20.0);
        assert_eq!(angular_distance(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_locate_east_point() {
        let volume = ring_volume(360, 100, 1000.0);
        let locator = SweepLocator::new(&volume, 0).unwrap();

        // 20.5 km due east: azimuth 90, gate 20
        let gate = locator.locate(20_500.0, 0.0).unwrap();
        assert_eq!(gate.ray, 90);
        assert_eq!(gate.gate, 20);
    }

    #[test]
    fn test_locate_wraps_north() {
        let volume = ring_volume(360, 100, 1000.0);
        let locator = SweepLocator::new(&volume, 0).unwrap();

        // Just west of north should resolve to ray 0 or 359
        let gate = locator.locate(-100.0, 30_000.0).unwrap();
        assert!(gate.ray == 0 || gate.ray == 359);
    }

    #[test]
    fn test_locate_beyond_range_is_none() {
        let volume = ring_volume(360, 100, 1000.0);
        let locator = SweepLocator::new(&volume, 0).unwrap();
        assert!(locator.locate(0.0, 150_000.0).is_none());
    }

    #[test]
    fn test_locate_outside_sector_is_none() {
        // 10 rays covering azimuth 0..9 only
        let mut volume = ring_volume(10, 50, 1000.0);
        volume.azimuth = Coordinate::new((0..10).map(f64::from).collect(), "degrees");
        let locator = SweepLocator::new(&volume, 0).unwrap();

        assert!(locator.locate(0.0, 10_000.0).is_some());
        // Due south is far from any ray
        assert!(locator.locate(0.0, -10_000.0).is_none());
    }
}
