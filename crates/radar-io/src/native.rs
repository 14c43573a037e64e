//! Process-wide setup for the native NetCDF/HDF5 libraries.

use std::sync::Once;

/// Silence HDF5's automatic error printing to stderr.
///
/// HDF5 prints a diagnostic stack whenever a lookup fails, including the
/// optional-attribute probes the reader performs on every variable:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// Safe to call repeatedly; only the first call has an effect. Call it
/// before the first file is opened.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 with null handlers is the documented way to
        // disable automatic error printing.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}
