//! Double-buffered temperature storage
//!
//! Two equal-size fields whose roles ("current" and "previous") are swapped once per
//! time step by flipping an index. No data is copied on swap.

use super::field::TemperatureField;
use crate::error::HeatSimError;

/// Ping-pong pair of temperature fields.
#[derive(Debug, Clone)]
pub struct BufferPair {
    buffers: [TemperatureField; 2],
    /// Index of the buffer holding the current step
    active: usize,
}

impl BufferPair {
    /// Build a pair from an initial field. Both buffers start out holding it.
    ///
    /// # Errors
    ///
    /// Returns [`HeatSimError::Allocation`] if the second buffer cannot be allocated.
    pub fn new(initial: TemperatureField) -> Result<Self, HeatSimError> {
        let mut back = TemperatureField::try_with_value(initial.side(), 0.0)?;
        back.as_mut_slice().copy_from_slice(initial.as_slice());
        Ok(Self {
            buffers: [initial, back],
            active: 0,
        })
    }

    /// Nodes per side.
    pub fn side(&self) -> usize {
        self.buffers[0].side()
    }

    /// Field of the current step.
    pub fn current(&self) -> &TemperatureField {
        &self.buffers[self.active]
    }

    /// Field of the previous step.
    pub fn previous(&self) -> &TemperatureField {
        &self.buffers[1 - self.active]
    }

    /// Exchange the roles of the two buffers.
    pub fn swap(&mut self) {
        self.active = 1 - self.active;
    }

    /// Borrow `(previous, current)` for one step: read from the first, write to the second.
    pub fn read_write(&mut self) -> (&TemperatureField, &mut TemperatureField) {
        let [a, b] = &mut self.buffers;
        if self.active == 0 {
            (&*b, a)
        } else {
            (&*a, b)
        }
    }
}
