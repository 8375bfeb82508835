//! Disjoint write regions of one time step
//!
//! A step writes every node of the current field exactly once: the boundary
//! (edges and corners) on the calling thread, the interior rows on the workers.
//! Splitting the write buffer into non-aliasing mutable borrows up front makes that
//! disjointness a property the compiler checks rather than a convention.

use crate::error::HeatSimError;
use crate::params::MIN_GRID_POINTS;

/// Boundary nodes of the write buffer.
pub struct BoundaryRegion<'a> {
    /// Row `y = 0`, corners included
    pub top: &'a mut [f32],
    /// Row `y = n - 1`, corners included
    pub bottom: &'a mut [f32],
    /// Column `x = 0` of rows `1..n-1`; entry `k` is row `k + 1`
    pub left: Vec<&'a mut f32>,
    /// Column `x = n - 1` of rows `1..n-1`; entry `k` is row `k + 1`
    pub right: Vec<&'a mut f32>,
}

/// The write buffer split into its boundary and interior parts.
pub struct WriteRegions<'a> {
    /// Nodes updated by the edge and corner rules
    pub boundary: BoundaryRegion<'a>,
    /// Columns `1..n-1` of rows `1..n-1`; entry `k` is row `k + 1`
    pub interior: Vec<&'a mut [f32]>,
}

impl<'a> WriteRegions<'a> {
    /// Split an `n×n` row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`HeatSimError::InvalidParameter`] if `n` is below the minimum grid size
    /// or `field` does not hold `n²` values.
    pub fn split(field: &'a mut [f32], n: usize) -> Result<Self, HeatSimError> {
        if n < MIN_GRID_POINTS || field.len() != n * n {
            return Err(HeatSimError::invalid_parameter(
                "grid_points",
                format!("cannot split {} values into a {n}x{n} grid", field.len()),
            ));
        }

        let inner = n - 2;
        let mut rows = field.chunks_exact_mut(n);
        let (Some(top), Some(bottom)) = (rows.next(), rows.next_back()) else {
            return Err(HeatSimError::NotInitialized("grid rows"));
        };

        let mut left = Vec::with_capacity(inner);
        let mut right = Vec::with_capacity(inner);
        let mut interior = Vec::with_capacity(inner);
        for row in rows {
            let Some((first, rest)) = row.split_first_mut() else {
                continue;
            };
            let Some((last, middle)) = rest.split_last_mut() else {
                continue;
            };
            left.push(first);
            right.push(last);
            interior.push(middle);
        }

        Ok(Self {
            boundary: BoundaryRegion {
                top,
                bottom,
                left,
                right,
            },
            interior,
        })
    }
}
