//! Error and status-code types
//!
//! Every failure the library can report is a [`HeatSimError`]. Each variant maps onto
//! exactly one [`StatusCode`], the small closed set of process exit statuses used by
//! the command-line front end.

use std::fmt;

/// Process status codes.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// Run completed successfully.
    Ok = 0,

    /// Wrong number of arguments supplied.
    BadArgumentCount = 1,

    /// An argument was present but zero, non-numeric, or out of range.
    InvalidArgument = 2,

    /// Grid storage could not be allocated.
    AllocationFailure = 3,

    /// A resource was used before it was initialized, or another internal
    /// invariant was broken (worker thread failure).
    NotInitialized = 4,
}

impl StatusCode {
    /// Numeric value handed to the operating system.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "ok",
            Self::BadArgumentCount => "wrong number of arguments",
            Self::InvalidArgument => "invalid argument",
            Self::AllocationFailure => "allocation failure",
            Self::NotInitialized => "uninitialized resource",
        };
        write!(f, "{name}")
    }
}

/// Errors produced while configuring or running a simulation.
#[derive(Debug)]
pub enum HeatSimError {
    /// Argument count did not match the expected surface.
    ArgumentCount {
        /// Number of arguments expected
        expected: usize,
        /// Number of arguments received
        found: usize,
    },

    /// A parameter failed validation.
    InvalidParameter {
        /// Parameter name (e.g. `"grid_points"`, `"dt"`)
        name: &'static str,
        /// Description of the violated constraint
        message: String,
    },

    /// Grid storage could not be reserved.
    Allocation {
        /// Number of `f32` nodes requested
        nodes: usize,
    },

    /// A resource was used before being initialized.
    NotInitialized(&'static str),

    /// A worker thread could not be spawned or did not finish cleanly.
    Worker {
        /// Index of the worker within the step
        worker: usize,
        /// What went wrong
        message: String,
    },

    /// Reading or writing a configuration file failed.
    Config(String),
}

impl HeatSimError {
    /// Create error for an invalid parameter with a custom message.
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Create error for a real-valued parameter that must be finite and positive.
    pub fn non_positive(name: &'static str, value: f32) -> Self {
        Self::invalid_parameter(name, format!("must be finite and positive, got {value}"))
    }

    /// Status code reported to the operating system for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ArgumentCount { .. } => StatusCode::BadArgumentCount,
            Self::InvalidParameter { .. } | Self::Config(_) => StatusCode::InvalidArgument,
            Self::Allocation { .. } => StatusCode::AllocationFailure,
            Self::NotInitialized(_) | Self::Worker { .. } => StatusCode::NotInitialized,
        }
    }
}

impl fmt::Display for HeatSimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArgumentCount { expected, found } => {
                write!(f, "wrong number of args: expected {expected}, got {found}")
            }
            Self::InvalidParameter { name, message } => {
                write!(f, "invalid input - parameter {name}: {message}")
            }
            Self::Allocation { nodes } => write!(
                f,
                "could not allocate memory for {nodes} nodes - try again, or with a smaller grid"
            ),
            Self::NotInitialized(what) => {
                write!(f, "{what} not initialized - this is a programming error")
            }
            Self::Worker { worker, message } => write!(f, "worker {worker} failed: {message}"),
            Self::Config(message) => write!(f, "configuration file error: {message}"),
        }
    }
}

impl std::error::Error for HeatSimError {}
