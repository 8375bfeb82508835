//! Properties of the parallel decomposition
//!
//! - Coverage: corners, edges and the workers' interior rows partition the grid
//! - Determinism: repeated runs and different backends give bit-identical frames
//! - Symmetry: mirror-symmetric initial fields stay mirror-symmetric
//! - Frame count: `T + 1` frames of `N²` values
//!
//! Run tests with: `cargo test --test parallel_properties`

use approx::assert_relative_eq;
use heat_sim_core::solver::partition_rows;
use heat_sim_core::{
    Backend, FrameRecorder, InitialCondition, NodeKind, Simulation, SimulationParams,
    TemperatureField,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn random_field(n: usize, seed: u64) -> TemperatureField {
    let mut rng = StdRng::seed_from_u64(seed);
    let values = (0..n * n).map(|_| rng.random_range(0.0..500.0)).collect();
    TemperatureField::from_vec(n, values).unwrap()
}

fn run(params: SimulationParams, backend: Backend, initial: TemperatureField) -> Vec<Vec<f32>> {
    let mut sim = Simulation::builder()
        .params(params)
        .backend(backend)
        .initial_field(initial)
        .build()
        .unwrap();
    let mut recorder = FrameRecorder::new();
    sim.run(&mut recorder).unwrap();
    recorder.into_frames().into_iter().map(|f| f.values).collect()
}

/// dt chosen so that F = 0.2 for any n on the unit square
fn stable_params(n: usize, steps: usize) -> SimulationParams {
    let dx = 1.0 / n as f32;
    SimulationParams::new(n, steps, 0.2 * dx * dx, 1.0).unwrap()
}

#[test]
fn test_boundary_and_partitions_cover_grid_exactly_once() {
    for n in 3..40 {
        for workers in 1..=n - 2 {
            let mut hits = vec![0_u32; n * n];
            for y in 0..n {
                for x in 0..n {
                    if NodeKind::classify(x, y, n) != NodeKind::Interior {
                        hits[x + y * n] += 1;
                    }
                }
            }
            for range in partition_rows(n, workers) {
                for y in range.as_range() {
                    for x in 1..n - 1 {
                        hits[x + y * n] += 1;
                    }
                }
            }
            assert!(
                hits.iter().all(|&h| h == 1),
                "n={n} workers={workers}: {hits:?}"
            );
        }
    }
}

#[test]
fn test_partitions_contiguous_and_disjoint() {
    for n in 3..80 {
        for workers in 1..=n - 2 {
            let ranges = partition_rows(n, workers);
            assert_eq!(ranges.len(), workers);
            assert_eq!(ranges[0].start, 1);
            assert_eq!(ranges[workers - 1].end, n - 1);
            for pair in ranges.windows(2) {
                assert_eq!(pair[0].end, pair[1].start, "n={n} workers={workers}");
            }
        }
    }
}

#[test]
fn test_frame_count_and_size() {
    for (n, steps) in [(3, 1), (4, 7), (10, 3), (17, 12)] {
        let frames = run(
            stable_params(n, steps),
            Backend::default(),
            InitialCondition::default().build(n).unwrap(),
        );
        assert_eq!(frames.len(), steps + 1, "n={n} steps={steps}");
        assert!(frames.iter().all(|f| f.len() == n * n));
    }
}

#[test]
fn test_repeated_runs_bit_identical() {
    let n = 23;
    let params = stable_params(n, 15);
    let initial = random_field(n, 7);
    for workers in [1, 3, 7, 21] {
        let first = run(params, Backend::threaded(workers), initial.clone());
        let second = run(params, Backend::threaded(workers), initial.clone());
        assert_eq!(first, second, "workers={workers}");
    }
}

#[test]
fn test_all_backends_and_worker_counts_agree() {
    for (n, seed) in [(3, 1), (5, 2), (12, 3), (31, 4)] {
        let params = stable_params(n, 8);
        let initial = random_field(n, seed);
        let reference = run(params, Backend::Serial, initial.clone());

        for workers in 1..=n - 2 {
            let frames = run(params, Backend::threaded(workers), initial.clone());
            assert_eq!(frames, reference, "n={n} workers={workers}");
        }
        let frames = run(params, Backend::Rayon, initial.clone());
        assert_eq!(frames, reference, "n={n} rayon");
    }
}

#[test]
fn test_more_workers_than_rows() {
    let n = 4;
    let params = stable_params(n, 5);
    let initial = random_field(n, 11);
    let reference = run(params, Backend::Serial, initial.clone());
    assert_eq!(run(params, Backend::threaded(7), initial), reference);
}

fn assert_mirror_symmetric(
    values: &[f32],
    n: usize,
    mirror: impl Fn(usize, usize) -> (usize, usize),
) {
    for y in 0..n {
        for x in 0..n {
            let (mx, my) = mirror(x, y);
            assert_relative_eq!(
                values[x + y * n],
                values[mx + my * n],
                epsilon = 1e-3,
                max_relative = 1e-4
            );
        }
    }
}

#[test]
fn test_left_right_symmetry_preserved() {
    let n = 11;
    let mut rng = StdRng::seed_from_u64(99);
    let mut field = TemperatureField::try_with_value(n, 0.0).unwrap();
    for y in 0..n {
        for x in 0..=n / 2 {
            let v = rng.random_range(0.0..300.0);
            field.set(x, y, v);
            field.set(n - 1 - x, y, v);
        }
    }

    let frames = run(stable_params(n, 40), Backend::threaded(4), field);
    for frame in &frames {
        assert_mirror_symmetric(frame, n, |x, y| (n - 1 - x, y));
    }
}

#[test]
fn test_diagonal_symmetry_preserved() {
    // Corners 0/100/200/100 are symmetric about the main diagonal
    let n = 9;
    let condition = InitialCondition {
        body: 20.0,
        corners: [0.0, 100.0, 200.0, 100.0],
    };
    let frames = run(
        stable_params(n, 30),
        Backend::Rayon,
        condition.build(n).unwrap(),
    );
    for frame in &frames {
        assert_mirror_symmetric(frame, n, |x, y| (y, x));
    }
}

#[test]
fn test_adiabatic_plate_conserves_energy() {
    // Zero-flux boundaries: the control-volume weighted sum stays constant
    let n = 15;
    let frames = run(stable_params(n, 50), Backend::default(), random_field(n, 5));
    let weighted = |values: &[f32]| -> f64 {
        let mut total = 0.0;
        for y in 0..n {
            for x in 0..n {
                let weight = match NodeKind::classify(x, y, n) {
                    NodeKind::Interior => 1.0,
                    NodeKind::Edge => 0.5,
                    NodeKind::Corner => 0.25,
                };
                total += weight * f64::from(values[x + y * n]);
            }
        }
        total
    };
    let start = weighted(&frames[0]);
    let end = weighted(frames.last().unwrap());
    assert_relative_eq!(start, end, max_relative = 1e-4);
}

#[test]
fn test_uniform_plate_stays_uniform() {
    let n = 8;
    let field = TemperatureField::try_with_value(n, 42.0).unwrap();
    let frames = run(stable_params(n, 10), Backend::threaded(3), field);
    for frame in &frames {
        for &v in frame {
            assert_relative_eq!(v, 42.0, max_relative = 1e-5);
        }
    }
}
