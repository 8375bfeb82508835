//! Rayon step backend
//!
//! Same decomposition as the thread-per-partition coordinator, but the interior rows
//! are scheduled on rayon's persistent pool instead of freshly spawned threads, and the
//! boundary update is forked alongside them with `rayon::join`.

use super::stencil::{update_boundary, update_interior_rows};
use crate::error::HeatSimError;
use crate::grid::{TemperatureField, WriteRegions};
use rayon::prelude::*;

/// Advance one step from `prev` into `next` on the rayon pool.
///
/// # Errors
///
/// Returns [`HeatSimError::InvalidParameter`] if the two fields differ in size.
pub fn step_rayon(
    prev: &TemperatureField,
    next: &mut TemperatureField,
    fourier: f32,
) -> Result<(), HeatSimError> {
    let n = prev.side();
    if next.side() != n {
        return Err(HeatSimError::invalid_parameter(
            "grid_points",
            format!("read buffer is {n} wide, write buffer is {}", next.side()),
        ));
    }

    let prev = prev.as_slice();
    let WriteRegions {
        mut boundary,
        mut interior,
    } = WriteRegions::split(next.as_mut_slice(), n)?;

    rayon::join(
        || update_boundary(prev, &mut boundary, n, fourier),
        || {
            interior
                .par_iter_mut()
                .enumerate()
                .for_each(|(k, row)| {
                    update_interior_rows(prev, std::slice::from_mut(row), k + 1, n, fourier);
                });
        },
    );

    Ok(())
}
