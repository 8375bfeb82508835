//! Thread-per-partition step coordinator
//!
//! One time step is executed as follows:
//!
//! 1. The write buffer is split into its boundary region and interior rows.
//! 2. For every worker `j`, the coordinator builds worker `j`'s [`WorkDescriptor`],
//!    spawns the worker and hands the descriptor over a zero-capacity channel. The
//!    send is a rendezvous: it returns only once the worker has taken the descriptor,
//!    so the coordinator never moves on to worker `j + 1` before worker `j` holds a
//!    complete assignment.
//! 3. With every worker launched, the calling thread updates the edges and corners.
//! 4. All workers are joined before the step returns.
//!
//! Workers are scoped threads re-created every step. A spawn failure or a worker
//! panic is fatal to the step and is reported as [`HeatSimError::Worker`].

use super::partition::{partition_rows, RowRange};
use super::stencil::{update_boundary, update_interior_rows};
use crate::error::HeatSimError;
use crate::grid::{TemperatureField, WriteRegions};
use std::sync::mpsc;
use std::thread;
use tracing::{debug, trace};

/// Everything one worker needs for its share of a step.
pub struct WorkDescriptor<'a> {
    /// Worker index within the step
    pub worker: usize,
    /// Grid rows this worker owns
    pub rows: RowRange,
    /// Previous-step field (shared, read-only)
    pub prev: &'a [f32],
    /// Interior columns of `rows` in the write buffer; entry `k` is row `rows.start + k`
    pub block: Vec<&'a mut [f32]>,
    /// Nodes per side
    pub n: usize,
    /// Fourier number
    pub fourier: f32,
}

impl WorkDescriptor<'_> {
    /// Update every node of the assigned rows.
    pub fn run(mut self) {
        update_interior_rows(
            self.prev,
            &mut self.block,
            self.rows.start,
            self.n,
            self.fourier,
        );
    }
}

/// Advance one step from `prev` into `next` using `workers` interior threads.
///
/// # Errors
///
/// Returns [`HeatSimError::Worker`] if a worker cannot be spawned, does not take its
/// descriptor, or panics; [`HeatSimError::InvalidParameter`] if the fields do not match.
pub fn step_threaded(
    prev: &TemperatureField,
    next: &mut TemperatureField,
    fourier: f32,
    workers: usize,
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
        interior,
    } = WriteRegions::split(next.as_mut_slice(), n)?;
    let ranges = partition_rows(n, workers);
    debug!(n, workers = ranges.len(), "launching interior workers");

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(ranges.len());
        let mut blocks = interior.into_iter();
        let mut failure = None;

        for (worker, rows) in ranges.into_iter().enumerate() {
            let descriptor = WorkDescriptor {
                worker,
                rows,
                prev,
                block: blocks.by_ref().take(rows.len()).collect(),
                n,
                fourier,
            };

            let (handoff, mailbox) = mpsc::sync_channel::<WorkDescriptor<'_>>(0);
            let spawned = thread::Builder::new()
                .name(format!("heat-worker-{worker}"))
                .spawn_scoped(scope, move || {
                    let Ok(descriptor) = mailbox.recv() else {
                        return;
                    };
                    drop(mailbox);
                    descriptor.run();
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    failure = Some(HeatSimError::Worker {
                        worker,
                        message: format!("could not spawn thread: {e}"),
                    });
                    break;
                }
            }

            if handoff.send(descriptor).is_err() {
                failure = Some(HeatSimError::Worker {
                    worker,
                    message: "exited before taking its descriptor".to_string(),
                });
                break;
            }
            trace!(worker, start = rows.start, end = rows.end, "descriptor taken");
        }

        // Edges and corners run here while the workers fill the interior
        update_boundary(prev, &mut boundary, n, fourier);

        let mut result = failure.map_or(Ok(()), Err);
        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() && result.is_ok() {
                result = Err(HeatSimError::Worker {
                    worker,
                    message: "panicked".to_string(),
                });
            }
        }
        result
    })
}
