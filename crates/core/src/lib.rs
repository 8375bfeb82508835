//! Transient Heat Conduction Core Library
//!
//! Computes the time evolution of the temperature field on a square plate with an
//! explicit finite-difference scheme, advancing a fixed number of steps and emitting
//! the field after every step.
//!
//! ## Structure
//!
//! - [`grid`]: square fields, the ping-pong buffer pair and per-step write regions
//! - [`solver`]: the stencil kernel, interior row partitioning and step backends
//!   (serial, thread-per-partition, rayon)
//! - [`simulation`]: the time-step driver and frame sinks
//! - [`params`]: validated run parameters, loadable from JSON
//!
//! ## Example
//!
//! ```rust
//! use heat_sim_core::{FrameRecorder, InitialCondition, Simulation, SimulationParams};
//!
//! let params = SimulationParams::new(20, 10, 0.1, 0.001).unwrap();
//! let mut sim = Simulation::builder()
//!     .params(params)
//!     .initial_condition(InitialCondition::default())
//!     .build()
//!     .unwrap();
//!
//! let mut frames = FrameRecorder::new();
//! let summary = sim.run(&mut frames).unwrap();
//! assert_eq!(summary.frames_emitted, 11);
//! ```

pub mod error;
pub mod grid;
pub mod params;
pub mod simulation;
pub mod solver;

// Re-export main types
pub use error::{HeatSimError, StatusCode};
pub use grid::{BufferPair, InitialCondition, NodeKind, TemperatureField};
pub use params::{ParamOverrides, SimulationParams, StabilityPolicy};
pub use simulation::{
    FieldStats, Frame, FrameRecorder, FrameSink, RunSummary, Simulation, SimulationBuilder,
    TextFrameWriter,
};
pub use solver::{Backend, RowRange};
