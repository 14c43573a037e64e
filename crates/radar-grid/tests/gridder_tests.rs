//! Gridding synthetic volumes.

use radar_common::{RadarError, REFLECTIVITY, VELOCITY};
use radar_grid::{ensure_2d, GridSpec, Gridder, NearestGateGridder};
use test_utils::VolumeFixture;

/// 1 degree rays, 500 m gates out to 150 km.
fn fine_fixture() -> VolumeFixture {
    VolumeFixture::default()
        .with_fields(&[REFLECTIVITY])
        .with_sweeps(&[0.5, 1.5])
        .with_geometry(360, 300, 500.0)
        .with_uniform_value(35.0)
}

/// 5 km cells, offset by half a gate so cell centers sit on gate centers.
fn small_spec() -> GridSpec {
    GridSpec {
        shape: (1, 61, 61),
        z_limits: (0.0, 10_000.0),
        y_limits: (-149_750.0, 150_250.0),
        x_limits: (-149_750.0, 150_250.0),
    }
}

#[test]
fn test_uniform_volume_fills_near_cells() {
    let volume = fine_fixture().build();
    let spec = small_spec();
    let grid = NearestGateGridder::default()
        .grid(&volume, &[REFLECTIVITY], &spec)
        .unwrap();

    let data = grid.field(REFLECTIVITY).unwrap();
    assert_eq!(data.dim(), (1, 61, 61));

    // (row 32, col 30) is 10.25 km north of the radar
    assert_eq!(data[[0, 32, 30]], 35.0);
    // 50.25 km east
    assert_eq!(data[[0, 30, 40]], 35.0);
}

#[test]
fn test_cells_beyond_range_are_nan() {
    let volume = fine_fixture().build();
    let spec = small_spec();
    let grid = NearestGateGridder::default()
        .grid(&volume, &[REFLECTIVITY], &spec)
        .unwrap();

    let data = grid.field(REFLECTIVITY).unwrap();
    // Corners are ~212 km out
    assert!(data[[0, 0, 0]].is_nan());
    assert!(data[[0, 60, 60]].is_nan());
    assert!(grid.filled_cells(REFLECTIVITY).unwrap() < spec.cell_count());
}

#[test]
fn test_masked_gate_falls_back_to_other_sweep() {
    // Ray 0 is north; gate 19 is centered at 9.75 km
    let volume = fine_fixture().with_masked_gate(0, 19).build();
    let spec = GridSpec {
        shape: (1, 3, 1),
        z_limits: (0.0, 0.0),
        y_limits: (9_750.0, 9_750.0),
        x_limits: (0.0, 0.0),
    };
    let grid = NearestGateGridder::default()
        .grid(&volume, &[REFLECTIVITY], &spec)
        .unwrap();

    // The second sweep (rays 360..720) still covers the cell
    assert_eq!(grid.field(REFLECTIVITY).unwrap()[[0, 0, 0]], 35.0);
}

#[test]
fn test_missing_field_is_an_error() {
    let volume = fine_fixture().build();
    let result = NearestGateGridder::default().grid(&volume, &[VELOCITY], &small_spec());
    assert!(matches!(result, Err(RadarError::MissingField(name)) if name == VELOCITY));
}

#[test]
fn test_layer_zero_reduces_to_image() {
    let volume = fine_fixture().build();
    let spec = small_spec();
    let grid = NearestGateGridder::default()
        .grid(&volume, &[REFLECTIVITY], &spec)
        .unwrap();

    let layer = grid.layer(REFLECTIVITY, 0).unwrap();
    let image = ensure_2d(layer, (61, 61)).unwrap();
    assert_eq!(image[[32, 30]], 35.0);
}
