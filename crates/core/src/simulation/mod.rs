//! Simulation driver
//!
//! [`Simulation`] owns the double buffer and runs the time-step loop:
//!
//! ```text
//! Emit → Swap → Compute → Advance → (repeat until step == T) → Emit
//! ```
//!
//! The initial field is emitted before anything is computed, and the final field is
//! emitted once more after the last step, so a run of `T` steps produces `T + 1` frames.

pub mod sink;
pub mod stats;

pub use sink::{format_frame, Frame, FrameRecorder, FrameSink, TextFrameWriter};
pub use stats::FieldStats;

use crate::error::HeatSimError;
use crate::grid::{BufferPair, InitialCondition, TemperatureField};
use crate::params::{SimulationParams, STABILITY_LIMIT};
use crate::solver::profiler::{StepTimer, TimingStats};
use crate::solver::Backend;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Outcome of [`Simulation::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    /// Frames handed to the sink (successfully or not)
    pub frames_emitted: usize,
    /// Steps computed during this run
    pub steps_computed: usize,
    /// Sink calls that returned an error
    pub sink_failures: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
    /// Per-step compute timings
    pub timing: TimingStats,
}

/// Collects everything a [`Simulation`] needs before storage is allocated.
#[derive(Debug, Clone, Default)]
pub struct SimulationBuilder {
    params: Option<SimulationParams>,
    backend: Backend,
    initial_condition: Option<InitialCondition>,
    initial_field: Option<TemperatureField>,
    report_interval: Option<usize>,
}

impl SimulationBuilder {
    /// Empty builder with the default backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the run parameters.
    pub fn params(mut self, params: SimulationParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Set the step backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Start from a corner-interpolated plate.
    pub fn initial_condition(mut self, condition: InitialCondition) -> Self {
        self.initial_condition = Some(condition);
        self.initial_field = None;
        self
    }

    /// Start from explicit node values.
    pub fn initial_field(mut self, field: TemperatureField) -> Self {
        self.initial_field = Some(field);
        self.initial_condition = None;
        self
    }

    /// Log field statistics every `steps` steps (0 disables).
    pub fn report_interval(mut self, steps: usize) -> Self {
        self.report_interval = (steps > 0).then_some(steps);
        self
    }

    /// Allocate storage and create the simulation.
    ///
    /// # Errors
    ///
    /// - [`HeatSimError::NotInitialized`] if parameters or the initial field were never set
    /// - [`HeatSimError::InvalidParameter`] if the initial field does not match the grid size
    /// - [`HeatSimError::Allocation`] if the buffers cannot be allocated
    pub fn build(self) -> Result<Simulation, HeatSimError> {
        let params = self
            .params
            .ok_or(HeatSimError::NotInitialized("simulation parameters"))?;
        params.validate()?;

        let n = params.grid_points();
        let initial = match (self.initial_field, self.initial_condition) {
            (Some(field), _) => {
                if field.side() != n {
                    return Err(HeatSimError::invalid_parameter(
                        "initial_field",
                        format!("field is {0}x{0}, grid is {n}x{n}", field.side()),
                    ));
                }
                field
            }
            (None, Some(condition)) => condition.build(n)?,
            (None, None) => return Err(HeatSimError::NotInitialized("initial temperature field")),
        };

        let fourier = params.fourier();
        if !params.is_stable() {
            warn!(
                fourier,
                limit = STABILITY_LIMIT,
                "Fourier number exceeds the stability limit; results will diverge"
            );
        }

        let buffers = BufferPair::new(initial)?;
        info!(
            "Simulation initialized: {}x{} grid, {} steps, dx={:.4}m, F={:.4}, backend={}",
            n,
            n,
            params.time_steps(),
            params.dx(),
            fourier,
            self.backend
        );

        Ok(Simulation {
            params,
            backend: self.backend,
            buffers,
            step: 0,
            report_interval: self.report_interval,
            timing: TimingStats::default(),
        })
    }
}

/// Explicit transient conduction on a square plate.
#[derive(Debug)]
pub struct Simulation {
    params: SimulationParams,
    backend: Backend,
    buffers: BufferPair,
    /// Steps computed so far
    step: usize,
    report_interval: Option<usize>,
    timing: TimingStats,
}

impl Simulation {
    /// Start building a simulation.
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::new()
    }

    /// Run parameters.
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Step backend in use.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Field of the most recent step.
    pub fn current(&self) -> &TemperatureField {
        self.buffers.current()
    }

    /// Number of steps computed so far.
    pub fn step_index(&self) -> usize {
        self.step
    }

    /// Whether all `T` steps have been computed.
    pub fn is_finished(&self) -> bool {
        self.step >= self.params.time_steps()
    }

    /// Compute timings accumulated so far.
    pub fn timing(&self) -> TimingStats {
        self.timing
    }

    /// Swap the buffers and compute one step.
    ///
    /// Returns `Ok(false)` without doing anything once all steps are done.
    ///
    /// # Errors
    ///
    /// Propagates backend failures ([`HeatSimError::Worker`]).
    pub fn step(&mut self) -> Result<bool, HeatSimError> {
        if self.is_finished() {
            return Ok(false);
        }

        let backend = self.backend;
        self.advance_with(|read, write, fourier| backend.step(read, write, fourier))
    }

    /// Swap, compute with `compute`, advance. A failed step swaps back, so the field of
    /// the last completed step stays current.
    fn advance_with<F>(&mut self, compute: F) -> Result<bool, HeatSimError>
    where
        F: FnOnce(&TemperatureField, &mut TemperatureField, f32) -> Result<(), HeatSimError>,
    {
        self.buffers.swap();
        let timer = StepTimer::start(self.step);
        let fourier = self.params.fourier();
        let (read, write) = self.buffers.read_write();
        if let Err(e) = compute(read, write, fourier) {
            self.buffers.swap();
            return Err(e);
        }
        self.timing.record(timer.elapsed());
        self.step += 1;
        Ok(true)
    }

    /// Run the remaining steps, emitting every frame to `sink`.
    ///
    /// Sink errors are logged and counted but do not stop the run.
    ///
    /// # Errors
    ///
    /// Propagates backend failures ([`HeatSimError::Worker`]).
    pub fn run<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunSummary, HeatSimError> {
        let started = Instant::now();
        let first_step = self.step;
        let mut summary = RunSummary::default();
        info!(
            "Running steps {}..{} with {}",
            first_step,
            self.params.time_steps(),
            self.backend
        );

        while !self.is_finished() {
            self.emit(sink, &mut summary);
            self.step()?;
            self.report_progress();
        }
        self.emit(sink, &mut summary);

        if let Err(e) = sink.finish() {
            warn!(error = %e, "frame sink failed to finish");
            summary.sink_failures += 1;
        }

        summary.steps_computed = self.step - first_step;
        summary.elapsed = started.elapsed();
        summary.timing = self.timing;
        info!(
            "Run complete: {} steps, {} frames, {:.3}s (mean step {:.3}ms)",
            summary.steps_computed,
            summary.frames_emitted,
            summary.elapsed.as_secs_f64(),
            summary.timing.mean().as_secs_f64() * 1000.0
        );
        Ok(summary)
    }

    fn emit<S: FrameSink + ?Sized>(&self, sink: &mut S, summary: &mut RunSummary) {
        let field = self.buffers.current();
        if let Err(e) = sink.emit(self.step, field.as_slice(), field.side()) {
            warn!(step = self.step, error = %e, "frame sink failed");
            summary.sink_failures += 1;
        }
        summary.frames_emitted += 1;
    }

    fn report_progress(&self) {
        let Some(interval) = self.report_interval else {
            return;
        };
        if self.step % interval != 0 {
            return;
        }
        if let Some(stats) = FieldStats::of(self.buffers.current().as_slice()) {
            info!(
                "step {}/{}: min={:.2} max={:.2} mean={:.2}",
                self.step,
                self.params.time_steps(),
                stats.min,
                stats.max,
                stats.mean
            );
        }
        debug!(
            slowest_ms = self.timing.slowest().as_secs_f64() * 1000.0,
            "step timing"
        );
    }
}
