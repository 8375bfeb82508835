//! Square temperature field
//!
//! Stores an `N×N` scalar field as a flat `Vec<f32>` in row-major order
//! (`index = x + y * N`).

use crate::error::HeatSimError;

/// Square scalar field of nodal temperatures (°C)
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureField {
    /// Node values in row-major order (y * n + x)
    data: Vec<f32>,
    /// Nodes per side
    n: usize,
}

impl TemperatureField {
    /// Allocate an `n×n` field with every node set to `value`.
    ///
    /// Storage is reserved fallibly so an oversized grid is reported instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns [`HeatSimError::Allocation`] if `n²` overflows or the memory cannot be reserved.
    pub fn try_with_value(n: usize, value: f32) -> Result<Self, HeatSimError> {
        let nodes = n
            .checked_mul(n)
            .ok_or(HeatSimError::Allocation { nodes: usize::MAX })?;

        let mut data = Vec::new();
        data.try_reserve_exact(nodes)
            .map_err(|_| HeatSimError::Allocation { nodes })?;
        data.resize(nodes, value);

        Ok(Self { data, n })
    }

    /// Wrap existing row-major values.
    ///
    /// # Errors
    ///
    /// Returns [`HeatSimError::InvalidParameter`] if `data.len() != n²`.
    pub fn from_vec(n: usize, data: Vec<f32>) -> Result<Self, HeatSimError> {
        if n.checked_mul(n) != Some(data.len()) {
            return Err(HeatSimError::invalid_parameter(
                "field",
                format!("expected {n}x{n} values, got {}", data.len()),
            ));
        }
        Ok(Self { data, n })
    }

    /// Nodes per side.
    #[must_use]
    pub fn side(&self) -> usize {
        self.n
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Get mutable reference to field data
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume the field, returning its values.
    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Flat index of `(x, y)`.
    #[inline]
    #[must_use]
    pub fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.n
    }

    /// Get value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        assert!(x < self.n && y < self.n, "Coordinates out of bounds");
        self.data[self.index(x, y)]
    }

    /// Set value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        assert!(x < self.n && y < self.n, "Coordinates out of bounds");
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Iterate over rows, top (`y = 0`) first.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(self.n)
    }
}
