//! Explicit finite-difference stencil for transient 2-D conduction
//!
//! # Physics Implementation
//!
//! Forward-time, centred-space discretisation of
//! ```text
//! ∂T/∂t = α∇²T
//! ```
//! on a uniform grid with Fourier number `F = α·dt/dx²`:
//! ```text
//! T'[P] = T[P]·(1 − 4F) + F·(T_E + T_W + T_S + T_N)
//! ```
//!
//! The outer ring is adiabatic (zero flux). A missing outward neighbour is replaced by
//! its mirror image, which doubles the inward neighbour on edges and both in-grid
//! neighbours on corners.
//!
//! The scheme is only stable for `F ≤ 1/4`. The kernel does not check this.

use crate::grid::{BoundaryRegion, NodeKind};

/// Interior node: all four neighbours are in the grid.
#[inline]
#[must_use]
pub fn interior_node(p: f32, east: f32, west: f32, south: f32, north: f32, fourier: f32) -> f32 {
    p * (1.0 - 4.0 * fourier) + fourier * (east + west + south + north)
}

/// Edge node: the outward neighbour is mirrored onto `inward`.
#[inline]
#[must_use]
pub fn edge_node(p: f32, inward: f32, side_a: f32, side_b: f32, fourier: f32) -> f32 {
    p * (1.0 - 4.0 * fourier) + fourier * ((2.0 * inward) + side_a + side_b)
}

/// Corner node: both outward neighbours are mirrored.
#[inline]
#[must_use]
pub fn corner_node(p: f32, neighbour_a: f32, neighbour_b: f32, fourier: f32) -> f32 {
    p * (1.0 - 4.0 * fourier) + 2.0 * fourier * (neighbour_a + neighbour_b)
}

/// Updated value of node `(x, y)` read from `prev`, selecting the rule by position.
///
/// Reference path for a single node; the step backends use the region functions below.
#[must_use]
pub fn update_node(prev: &[f32], n: usize, x: usize, y: usize, fourier: f32) -> f32 {
    let p = x + y * n;
    let last = n - 1;
    match NodeKind::classify(x, y, n) {
        NodeKind::Interior => interior_node(
            prev[p],
            prev[p + 1],
            prev[p - 1],
            prev[p + n],
            prev[p - n],
            fourier,
        ),
        NodeKind::Edge => {
            if y == 0 {
                edge_node(prev[p], prev[p + n], prev[p - 1], prev[p + 1], fourier)
            } else if y == last {
                edge_node(prev[p], prev[p - n], prev[p - 1], prev[p + 1], fourier)
            } else if x == 0 {
                edge_node(prev[p], prev[p + 1], prev[p - n], prev[p + n], fourier)
            } else {
                edge_node(prev[p], prev[p - 1], prev[p - n], prev[p + n], fourier)
            }
        }
        NodeKind::Corner => {
            let horizontal = if x == 0 { prev[p + 1] } else { prev[p - 1] };
            let vertical = if y == 0 { prev[p + n] } else { prev[p - n] };
            corner_node(prev[p], horizontal, vertical, fourier)
        }
    }
}

/// Update a block of interior rows.
///
/// `rows[k]` holds columns `1..n-1` of grid row `first_row + k`.
pub fn update_interior_rows(
    prev: &[f32],
    rows: &mut [&mut [f32]],
    first_row: usize,
    n: usize,
    fourier: f32,
) {
    for (k, row) in rows.iter_mut().enumerate() {
        let y = first_row + k;
        for (i, cell) in row.iter_mut().enumerate() {
            let p = (i + 1) + y * n;
            *cell = interior_node(
                prev[p],
                prev[p + 1],
                prev[p - 1],
                prev[p + n],
                prev[p - n],
                fourier,
            );
        }
    }
}

/// Update every edge and corner node.
pub fn update_boundary(prev: &[f32], boundary: &mut BoundaryRegion<'_>, n: usize, fourier: f32) {
    let last = n - 1;

    for i in 1..last {
        // top
        let p = i;
        boundary.top[i] = edge_node(prev[p], prev[p + n], prev[p - 1], prev[p + 1], fourier);

        // right
        let p = (i + 1) * n - 1;
        *boundary.right[i - 1] =
            edge_node(prev[p], prev[p - 1], prev[p - n], prev[p + n], fourier);

        // bottom
        let p = n * last + i;
        boundary.bottom[i] = edge_node(prev[p], prev[p - n], prev[p - 1], prev[p + 1], fourier);

        // left
        let p = i * n;
        *boundary.left[i - 1] =
            edge_node(prev[p], prev[p + 1], prev[p - n], prev[p + n], fourier);
    }

    let p = 0;
    boundary.top[0] = corner_node(prev[p], prev[p + 1], prev[p + n], fourier);
    let p = last;
    boundary.top[last] = corner_node(prev[p], prev[p - 1], prev[p + n], fourier);
    let p = n * n - 1;
    boundary.bottom[last] = corner_node(prev[p], prev[p - 1], prev[p - n], fourier);
    let p = n * last;
    boundary.bottom[0] = corner_node(prev[p], prev[p + 1], prev[p - n], fourier);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WriteRegions;
    use approx::assert_relative_eq;

    fn ramp(n: usize) -> Vec<f32> {
        (0..n * n).map(|i| (i * i % 17) as f32 * 3.5).collect()
    }

    #[test]
    fn test_zero_fourier_is_identity() {
        assert_eq!(interior_node(42.0, 1.0, 2.0, 3.0, 4.0, 0.0), 42.0);
        assert_eq!(edge_node(42.0, 1.0, 2.0, 3.0, 0.0), 42.0);
        assert_eq!(corner_node(42.0, 1.0, 2.0, 0.0), 42.0);

        let n = 6;
        let prev = ramp(n);
        for y in 0..n {
            for x in 0..n {
                assert_eq!(update_node(&prev, n, x, y, 0.0), prev[x + y * n]);
            }
        }
    }

    #[test]
    fn test_uniform_field_is_steady() {
        // No gradient, no flux: every rule must reproduce the value
        let n = 5;
        let prev = vec![37.5_f32; n * n];
        for y in 0..n {
            for x in 0..n {
                assert_relative_eq!(update_node(&prev, n, x, y, 0.2), 37.5, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn test_interior_formula() {
        let value = interior_node(10.0, 20.0, 30.0, 40.0, 50.0, 0.1);
        assert_relative_eq!(value, 10.0 * 0.6 + 0.1 * 140.0, max_relative = 1e-6);
    }

    #[test]
    fn test_edge_formula_doubles_inward() {
        let value = edge_node(10.0, 20.0, 30.0, 40.0, 0.1);
        assert_relative_eq!(value, 10.0 * 0.6 + 0.1 * (40.0 + 30.0 + 40.0), max_relative = 1e-6);
    }

    #[test]
    fn test_corner_formula() {
        let value = corner_node(10.0, 20.0, 30.0, 0.1);
        assert_relative_eq!(value, 10.0 * 0.6 + 0.2 * 50.0, max_relative = 1e-6);
    }

    #[test]
    fn test_region_updates_match_node_rule() {
        for n in 3..9 {
            let prev = ramp(n);
            let fourier = 0.23;
            let mut next = vec![f32::NAN; n * n];
            {
                let WriteRegions {
                    mut boundary,
                    mut interior,
                } = WriteRegions::split(&mut next, n).unwrap();
                update_interior_rows(&prev, &mut interior, 1, n, fourier);
                update_boundary(&prev, &mut boundary, n, fourier);
            }
            for y in 0..n {
                for x in 0..n {
                    assert_eq!(
                        next[x + y * n],
                        update_node(&prev, n, x, y, fourier),
                        "n={n} node=({x},{y})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_interior_rows_with_offset() {
        let n = 6;
        let prev = ramp(n);
        let mut next = vec![0.0_f32; n * n];
        let WriteRegions { mut interior, .. } = WriteRegions::split(&mut next, n).unwrap();
        // Rows 3 and 4 only
        update_interior_rows(&prev, &mut interior[2..4], 3, n, 0.1);
        assert_eq!(*interior[2].first().unwrap(), update_node(&prev, n, 1, 3, 0.1));
        assert_eq!(*interior[3].last().unwrap(), update_node(&prev, n, 4, 4, 0.1));
        assert!(interior[0].iter().all(|&v| v == 0.0));
    }
}
