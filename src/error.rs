use thiserror::Error;

/// Errors raised while configuring a value table or a training run
///
/// Out-of-range state and action indices are not represented here: they are
/// contract violations and panic at the offending call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid value for `{field}`: {value}. Must be {expected}.")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("Value table has {table} {space} but the environment has {env}")]
    SpaceMismatch {
        space: &'static str,
        table: usize,
        env: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
