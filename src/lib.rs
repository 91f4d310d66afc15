/// Implemented RL algorithms
pub mod algo;

/// File-based configuration
pub mod config;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// The smartcab world as the agent sees it
pub mod env;

/// Crate error type
pub mod error;

/// Single transitions
pub mod experience;

/// Exploration policies
pub mod exploration;

/// Discretized states
pub mod state;

/// Per-step trial records
pub mod telemetry;

mod util;

pub use error::{Error, Result};
