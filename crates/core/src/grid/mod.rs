//! Grid storage: square fields, the double buffer and per-step write regions

pub mod buffers;
pub mod field;
pub mod initial;
pub mod regions;

// Re-export main types
pub use buffers::BufferPair;
pub use field::TemperatureField;
pub use initial::InitialCondition;
pub use regions::{BoundaryRegion, WriteRegions};

/// Position class of a node, derived from its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// One of the four corners (two in-grid neighbours)
    Corner,
    /// Outer ring excluding corners (three in-grid neighbours)
    Edge,
    /// Everything else (four in-grid neighbours)
    Interior,
}

impl NodeKind {
    /// Classify node `(x, y)` of an `n×n` grid.
    #[must_use]
    pub fn classify(x: usize, y: usize, n: usize) -> Self {
        let last = n - 1;
        let on_x = x == 0 || x == last;
        let on_y = y == 0 || y == last;
        match (on_x, on_y) {
            (true, true) => Self::Corner,
            (true, false) | (false, true) => Self::Edge,
            (false, false) => Self::Interior,
        }
    }
}
