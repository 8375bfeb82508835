//! Initial condition of the plate
//!
//! ```text
//!        top_left  __________  top_right
//!                 |          |
//!                 |   body   |
//!                 |          |
//!     bottom_left |__________| bottom_right
//! ```
//!
//! The body starts at a uniform temperature. The outermost ring of nodes is suddenly
//! brought to the corner temperatures, with each edge linearly interpolated between
//! its two corners.

use super::field::TemperatureField;
use crate::error::HeatSimError;

/// Initial body temperature (°C)
pub const INIT_TEMP_BODY: f32 = 0.0;
/// Top-left corner (°C)
pub const INIT_TEMP_TOP_LEFT: f32 = 150.0;
/// Top-right corner (°C)
pub const INIT_TEMP_TOP_RIGHT: f32 = 350.0;
/// Bottom-right corner (°C)
pub const INIT_TEMP_BOTTOM_RIGHT: f32 = 500.0;
/// Bottom-left corner (°C)
pub const INIT_TEMP_BOTTOM_LEFT: f32 = 50.0;

/// Corner-interpolated initial temperature distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialCondition {
    /// Uniform interior temperature (°C)
    pub body: f32,
    /// Corner temperatures in clockwise order from the top left:
    /// `[top_left, top_right, bottom_right, bottom_left]` (°C)
    pub corners: [f32; 4],
}

impl Default for InitialCondition {
    fn default() -> Self {
        Self {
            body: INIT_TEMP_BODY,
            corners: [
                INIT_TEMP_TOP_LEFT,
                INIT_TEMP_TOP_RIGHT,
                INIT_TEMP_BOTTOM_RIGHT,
                INIT_TEMP_BOTTOM_LEFT,
            ],
        }
    }
}

impl InitialCondition {
    /// Build the `n×n` initial field.
    ///
    /// Edges are interpolated first; the four corners are then pinned to exactly their
    /// configured values, so rounding in the interpolation never decides a corner.
    ///
    /// # Errors
    ///
    /// Returns [`HeatSimError::Allocation`] if the field cannot be allocated.
    pub fn build(&self, n: usize) -> Result<TemperatureField, HeatSimError> {
        let mut field = TemperatureField::try_with_value(n, self.body)?;
        if n < 2 {
            return Ok(field);
        }

        let [top_left, top_right, bottom_right, bottom_left] = self.corners;
        let span = (n - 1) as f32;
        let last = n - 1;
        for i in 0..n {
            let t = i as f32;
            field.set(i, 0, top_left + t * ((top_right - top_left) / span));
            field.set(i, last, bottom_left + t * ((bottom_right - bottom_left) / span));
            field.set(0, i, top_left + t * ((bottom_left - top_left) / span));
            field.set(last, i, top_right + t * ((bottom_right - top_right) / span));
        }

        field.set(0, 0, top_left);
        field.set(last, 0, top_right);
        field.set(last, last, bottom_right);
        field.set(0, last, bottom_left);

        Ok(field)
    }
}
