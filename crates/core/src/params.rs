//! Simulation parameters
//!
//! Physical and numerical inputs of a run. Parameters are validated when they are
//! constructed (or loaded from a file), so every `SimulationParams` a simulation
//! receives already satisfies its constraints.

use crate::error::HeatSimError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Smallest grid that still has an interior node.
pub const MIN_GRID_POINTS: usize = 3;

/// Default side length of the square domain (m).
pub const DEFAULT_SIDE_LENGTH: f32 = 1.0;

/// Largest Fourier number for which the explicit 2-D scheme is stable.
pub const STABILITY_LIMIT: f32 = 0.25;

/// What to do when the Fourier number exceeds [`STABILITY_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityPolicy {
    /// Run anyway. The output diverges numerically but the run is not an error.
    #[default]
    Permit,
    /// Treat an unstable Fourier number as an invalid configuration.
    Reject,
}

/// Validated parameters of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Nodes per side of the square grid
    grid_points: usize,
    /// Number of time steps to advance
    time_steps: usize,
    /// Time-step size (s)
    dt: f32,
    /// Thermal diffusivity (m²/s)
    alpha: f32,
    /// Side length of the domain (m)
    #[serde(default = "default_side_length")]
    side_length: f32,
    /// Handling of unstable Fourier numbers
    #[serde(default)]
    stability: StabilityPolicy,
}

fn default_side_length() -> f32 {
    DEFAULT_SIDE_LENGTH
}

/// Explicit values layered over parameters loaded from a file.
///
/// `None` keeps the loaded value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParamOverrides {
    pub grid_points: Option<usize>,
    pub time_steps: Option<usize>,
    pub dt: Option<f32>,
    pub alpha: Option<f32>,
    pub side_length: Option<f32>,
    pub stability: Option<StabilityPolicy>,
}

impl SimulationParams {
    /// Create parameters for the default 1 m domain.
    ///
    /// # Errors
    ///
    /// Returns [`HeatSimError::InvalidParameter`] if any value violates its constraint.
    pub fn new(
        grid_points: usize,
        time_steps: usize,
        dt: f32,
        alpha: f32,
    ) -> Result<Self, HeatSimError> {
        let params = Self {
            grid_points,
            time_steps,
            dt,
            alpha,
            side_length: DEFAULT_SIDE_LENGTH,
            stability: StabilityPolicy::default(),
        };
        params.validate()?;
        Ok(params)
    }

    /// Replace the domain side length.
    ///
    /// # Errors
    ///
    /// Returns [`HeatSimError::InvalidParameter`] if the length is not finite and positive,
    /// or if the new Fourier number is rejected by the stability policy.
    pub fn with_side_length(mut self, side_length: f32) -> Result<Self, HeatSimError> {
        self.side_length = side_length;
        self.validate()?;
        Ok(self)
    }

    /// Replace the stability policy.
    ///
    /// # Errors
    ///
    /// Returns [`HeatSimError::InvalidParameter`] if `policy` is
    /// [`StabilityPolicy::Reject`] and the Fourier number is unstable.
    pub fn with_stability(mut self, policy: StabilityPolicy) -> Result<Self, HeatSimError> {
        self.stability = policy;
        self.validate()?;
        Ok(self)
    }

    /// Check every constraint.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as [`HeatSimError::InvalidParameter`].
    pub fn validate(&self) -> Result<(), HeatSimError> {
        if self.grid_points < MIN_GRID_POINTS {
            return Err(HeatSimError::invalid_parameter(
                "grid_points",
                format!(
                    "must be at least {MIN_GRID_POINTS}, got {}",
                    self.grid_points
                ),
            ));
        }
        if self.time_steps == 0 {
            return Err(HeatSimError::invalid_parameter(
                "time_steps",
                "must be at least 1, got 0",
            ));
        }
        for (name, value) in [
            ("dt", self.dt),
            ("alpha", self.alpha),
            ("side_length", self.side_length),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(HeatSimError::non_positive(name, value));
            }
        }

        let fourier = self.fourier();
        if !fourier.is_finite() {
            return Err(HeatSimError::invalid_parameter(
                "fourier",
                format!("derived Fourier number is not finite ({fourier})"),
            ));
        }
        if self.stability == StabilityPolicy::Reject && !self.is_stable() {
            return Err(HeatSimError::invalid_parameter(
                "fourier",
                format!("{fourier} exceeds the stability limit {STABILITY_LIMIT}"),
            ));
        }
        Ok(())
    }

    /// Nodes per side.
    pub fn grid_points(&self) -> usize {
        self.grid_points
    }

    /// Total node count `N²`.
    pub fn node_count(&self) -> usize {
        self.grid_points * self.grid_points
    }

    /// Number of time steps.
    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    /// Time-step size (s).
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Thermal diffusivity (m²/s).
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Domain side length (m).
    pub fn side_length(&self) -> f32 {
        self.side_length
    }

    /// Stability policy in force.
    pub fn stability(&self) -> StabilityPolicy {
        self.stability
    }

    /// Node spacing `dx = L / N`.
    pub fn dx(&self) -> f32 {
        self.side_length / self.grid_points as f32
    }

    /// Fourier number `F = α·dt / dx²`.
    pub fn fourier(&self) -> f32 {
        let dx = self.dx();
        (self.alpha * self.dt) / (dx * dx)
    }

    /// Whether `F` lies within the stability limit.
    pub fn is_stable(&self) -> bool {
        self.fourier() <= STABILITY_LIMIT
    }

    /// Replace every value set in `overrides`, then validate the result once.
    ///
    /// # Errors
    ///
    /// Returns [`HeatSimError::InvalidParameter`] if the combined values are invalid.
    pub fn with_overrides(mut self, overrides: ParamOverrides) -> Result<Self, HeatSimError> {
        let ParamOverrides {
            grid_points,
            time_steps,
            dt,
            alpha,
            side_length,
            stability,
        } = overrides;
        self.grid_points = grid_points.unwrap_or(self.grid_points);
        self.time_steps = time_steps.unwrap_or(self.time_steps);
        self.dt = dt.unwrap_or(self.dt);
        self.alpha = alpha.unwrap_or(self.alpha);
        self.side_length = side_length.unwrap_or(self.side_length);
        self.stability = stability.unwrap_or(self.stability);
        self.validate()?;
        Ok(self)
    }

    /// Load parameters from a JSON file and validate them.
    ///
    /// # Errors
    ///
    /// Returns [`HeatSimError::Config`] if the file cannot be read or parsed, or
    /// [`HeatSimError::InvalidParameter`] if the loaded values are invalid.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, HeatSimError> {
        Self::load_json_with(path, ParamOverrides::default())
    }

    /// Load parameters from a JSON file, apply `overrides`, and validate the result.
    ///
    /// Only the combined parameters have to be valid, so a file may leave out a value
    /// the overrides supply.
    ///
    /// # Errors
    ///
    /// Returns [`HeatSimError::Config`] if the file cannot be read or parsed, or
    /// [`HeatSimError::InvalidParameter`] if the combined values are invalid.
    pub fn load_json_with<P: AsRef<Path>>(
        path: P,
        overrides: ParamOverrides,
    ) -> Result<Self, HeatSimError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| HeatSimError::Config(format!("{}: {e}", path.display())))?;

        let params: Self = serde_json::from_str(&contents)
            .map_err(|e| HeatSimError::Config(format!("{}: {e}", path.display())))?;

        params.with_overrides(overrides)
    }

    /// Save parameters to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`HeatSimError::Config`] if the parameters cannot be serialized or written.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), HeatSimError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| HeatSimError::Config(e.to_string()))?;

        fs::write(path, contents)
            .map_err(|e| HeatSimError::Config(format!("{}: {e}", path.display())))?;

        Ok(())
    }
}
