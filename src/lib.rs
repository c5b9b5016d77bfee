/// Implemented RL algorithms
pub mod algo;

/// Environment
pub mod env;

/// Configuration errors
pub mod error;

/// Testing environments
#[cfg(feature = "gym")]
pub mod gym;

mod util;

pub use algo::tabular::{
    trainer::{BoundaryMode, EvalOutcome, EvalReport, RunConfig, RunSummary, TrainReport, Trainer},
    value_table::{UpdateRule, ValueTable, ValueTableConfig},
};
pub use error::{Error, Result};
