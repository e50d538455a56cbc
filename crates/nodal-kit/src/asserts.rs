//! Non-panicking invariant checks: `ensure!` returns a `Result` instead of
//! unwinding, for call sites that want to convert a violated precondition
//! into an ordinary error path rather than a panic.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("assertion failed: {0}")]
pub struct AssertionError(pub String);

/// Build an [`AssertionError`] from a `format!`-style message. Exported so
/// [`ensure`] can expand to it without requiring callers to import both
/// items.
#[doc(hidden)]
#[must_use]
pub fn assertion_failed(message: impl Into<String>) -> AssertionError {
    AssertionError(message.into())
}

/// `ensure!(cond, "message {arg}")` returns `Err(AssertionError)` from the
/// enclosing function if `cond` is false.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::asserts::assertion_failed(format!($($arg)*)));
        }
    };
}
