use ndarray::{ArrayD, IxDyn};

use crate::error::{Error, Result};

/// Axis order that moves the trailing time axis of an (X, Y, Z, T) volume
/// to the front.
pub const TIME_FIRST: [usize; 4] = [3, 0, 1, 2];

/// Reorder (X, Y, Z, T) into (T, X, Y, Z), keeping the spatial axes in
/// their relative order. The result is returned in standard layout.
pub fn time_to_front(volume: ArrayD<f64>) -> Result<ArrayD<f64>> {
    if volume.ndim() != TIME_FIRST.len() {
        return Err(Error::Dimensionality {
            expected: TIME_FIRST.len(),
            found: volume.ndim(),
        });
    }
    let permuted = volume.permuted_axes(IxDyn(&TIME_FIRST));
    Ok(permuted.as_standard_layout().into_owned())
}
