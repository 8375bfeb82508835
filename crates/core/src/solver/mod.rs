//! Explicit conduction solver
//!
//! This module holds the finite-difference kernel, the interior row partitioner and
//! the step backends that apply the kernel to a whole field.
//!
//! # Backends
//!
//! - [`Backend::Serial`]: the whole step on the calling thread.
//! - [`Backend::Threaded`]: one scoped thread per interior partition, launched and
//!   joined every step, with the boundary computed on the calling thread meanwhile.
//! - [`Backend::Rayon`]: interior rows on rayon's pool.
//!
//! Every backend applies the same kernel to the same nodes, so their output is
//! bit-identical.
//!
//! # Example
//!
//! ```rust
//! use heat_sim_core::grid::{InitialCondition, TemperatureField};
//! use heat_sim_core::solver::Backend;
//!
//! let prev = InitialCondition::default().build(16).unwrap();
//! let mut next = TemperatureField::try_with_value(16, 0.0).unwrap();
//! Backend::threaded(4).step(&prev, &mut next, 0.2).unwrap();
//! ```

pub mod coordinator;
pub mod parallel;
pub mod partition;
pub mod profiler;
pub mod stencil;

// Re-exports
pub use coordinator::{step_threaded, WorkDescriptor};
pub use parallel::step_rayon;
pub use partition::{partition_rows, RowRange};
pub use profiler::{StepTimer, TimingStats};
pub use stencil::{corner_node, edge_node, interior_node, update_node};

use crate::error::HeatSimError;
use crate::grid::{TemperatureField, WriteRegions};
use std::fmt;
use std::str::FromStr;

/// Default number of interior worker threads.
pub const DEFAULT_WORKERS: usize = 7;

/// How the nodes of one step are distributed over threads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Calling thread only
    Serial,
    /// Fresh scoped thread per interior partition every step
    Threaded {
        /// Number of interior partitions (and threads)
        workers: usize,
    },
    /// Rayon work-stealing pool
    Rayon,
}

impl Default for Backend {
    fn default() -> Self {
        Self::Threaded {
            workers: DEFAULT_WORKERS,
        }
    }
}

impl Backend {
    /// Threaded backend with at least one worker.
    pub fn threaded(workers: usize) -> Self {
        Self::Threaded {
            workers: workers.max(1),
        }
    }

    /// Compute the next field from `prev` into `next`.
    ///
    /// # Errors
    ///
    /// Returns [`HeatSimError::Worker`] if a threaded worker fails, or
    /// [`HeatSimError::InvalidParameter`] if the fields do not match.
    pub fn step(
        &self,
        prev: &TemperatureField,
        next: &mut TemperatureField,
        fourier: f32,
    ) -> Result<(), HeatSimError> {
        match *self {
            Self::Serial => step_serial(prev, next, fourier),
            Self::Threaded { workers } => step_threaded(prev, next, fourier, workers),
            Self::Rayon => step_rayon(prev, next, fourier),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serial => write!(f, "serial"),
            Self::Threaded { workers } => write!(f, "threaded ({workers} workers)"),
            Self::Rayon => write!(f, "rayon"),
        }
    }
}

impl FromStr for Backend {
    type Err = HeatSimError;

    /// Parse `serial`, `rayon`, `threaded` or `threaded:<workers>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "serial" => Ok(Self::Serial),
            "rayon" => Ok(Self::Rayon),
            "threaded" => Ok(Self::default()),
            other => {
                let workers = other
                    .strip_prefix("threaded:")
                    .and_then(|w| w.parse::<usize>().ok())
                    .filter(|&w| w > 0)
                    .ok_or_else(|| {
                        HeatSimError::invalid_parameter(
                            "backend",
                            format!("unknown backend '{s}' (serial, threaded[:N], rayon)"),
                        )
                    })?;
                Ok(Self::Threaded { workers })
            }
        }
    }
}

/// Advance one step entirely on the calling thread.
///
/// # Errors
///
/// Returns [`HeatSimError::InvalidParameter`] if the two fields differ in size.
pub fn step_serial(
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
    stencil::update_interior_rows(prev, &mut interior, 1, n, fourier);
    stencil::update_boundary(prev, &mut boundary, n, fourier);
    Ok(())
}
