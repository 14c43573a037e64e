//! Minimal CF/Radial writer for reader round-trip tests.
//!
//! Writes the subset of the convention the reader consumes: `time`, `range`
//! and `sweep` dimensions, coordinate variables, scalar site location, sweep
//! ray indices and one `(time, range)` float variable per field, with masked
//! gates stored as `_FillValue`.

use std::path::Path;

use radar_common::RadarVolume;

use crate::fixtures::FILL_VALUE;

pub fn write_cfradial<P: AsRef<Path>>(path: P, volume: &RadarVolume) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;

    file.add_attribute("Conventions", "CF/Radial")?;
    for (name, value) in &volume.metadata {
        file.add_attribute(name, value.as_str())?;
    }
    if !volume.scan_type.is_empty() {
        file.add_attribute("scan_type", volume.scan_type.as_str())?;
    }

    file.add_dimension("time", volume.nrays())?;
    file.add_dimension("range", volume.ngates())?;
    file.add_dimension("sweep", volume.nsweeps())?;

    let coordinates = [
        ("time", &volume.time, "time"),
        ("range", &volume.range, "range"),
        ("azimuth", &volume.azimuth, "time"),
        ("elevation", &volume.elevation, "time"),
    ];
    for (name, coord, dim) in coordinates {
        let mut var = file.add_variable::<f64>(name, &[dim])?;
        for (attr, value) in &coord.attributes {
            var.put_attribute(attr, value.as_str())?;
        }
        if !coord.is_empty() {
            var.put_values(&coord.data.to_vec(), ..)?;
        }
    }

    for (name, coord) in [
        ("latitude", &volume.latitude),
        ("longitude", &volume.longitude),
        ("altitude", &volume.altitude),
    ] {
        let mut var = file.add_variable::<f64>(name, &[])?;
        for (attr, value) in &coord.attributes {
            var.put_attribute(attr, value.as_str())?;
        }
        var.put_values(&[coord.first().unwrap_or(0.0)], ..)?;
    }

    let starts: Vec<i32> = volume.sweeps.iter().map(|s| s.start_ray as i32).collect();
    let ends: Vec<i32> = volume.sweeps.iter().map(|s| s.end_ray as i32).collect();
    let angles: Vec<f32> = volume.sweeps.iter().map(|s| s.fixed_angle as f32).collect();
    {
        let mut var = file.add_variable::<i32>("sweep_start_ray_index", &["sweep"])?;
        if !starts.is_empty() {
            var.put_values(&starts, ..)?;
        }
    }
    {
        let mut var = file.add_variable::<i32>("sweep_end_ray_index", &["sweep"])?;
        if !ends.is_empty() {
            var.put_values(&ends, ..)?;
        }
    }
    {
        let mut var = file.add_variable::<f32>("fixed_angle", &["sweep"])?;
        var.put_attribute("units", "degrees")?;
        if !angles.is_empty() {
            var.put_values(&angles, ..)?;
        }
    }

    for (name, field) in &volume.fields {
        let mut var = file.add_variable::<f32>(name, &["time", "range"])?;
        var.set_fill_value(FILL_VALUE)?;
        for (attr, value) in &field.attributes {
            var.put_attribute(attr, value.as_str())?;
        }
        let values: Vec<f32> = field
            .data
            .iter()
            .zip(field.mask.iter())
            .map(|(&v, &masked)| if masked { FILL_VALUE } else { v })
            .collect();
        if !values.is_empty() {
            var.put_values(&values, ..)?;
        }
    }

    Ok(())
}
