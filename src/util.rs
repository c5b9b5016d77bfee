use crate::error::{Error, Result};

/// Asserts that an index lies in `[0, bound)` and panics with a helpful message if not
///
/// ### Example
/// ```should_panic
/// # use tdcontrol::assert_index;
/// let state = 48;
/// assert_index!(state, 48);
/// ```
/// This will panic with the message "Index out of range for \`state\`: 48. Must be less than 48."
#[macro_export]
macro_rules! assert_index {
    ($var:expr, $bound:expr) => {
        assert!(
            $var < $bound,
            "Index out of range for `{}`: {}. Must be less than {}.",
            stringify!($var),
            $var,
            $bound,
        );
    };
}

/// Checks that `value` lies in `(0, 1]` when `open` is set, or `[0, 1]` otherwise.
/// NaN is always rejected.
pub(crate) fn check_unit_interval(field: &'static str, value: f64, open: bool) -> Result<()> {
    let above = if open { value > 0.0 } else { value >= 0.0 };
    if above && value <= 1.0 {
        return Ok(());
    }

    Err(Error::InvalidConfig {
        field,
        value,
        expected: match open {
            true => "in the interval (0, 1]",
            false => "in the interval [0, 1]",
        },
    })
}

/// Checks that a table dimension is non-zero
pub(crate) fn check_positive(field: &'static str, value: usize) -> Result<()> {
    (value > 0).then_some(()).ok_or(Error::InvalidConfig {
        field,
        value: value as f64,
        expected: "a positive integer",
    })
}
