//! A small "exception class" helper: a `kind()`-tagged classification for
//! error enums, plus a source-chain walker, for code that wants to branch
//! on an error's category without matching every variant.

use std::error::Error;
use std::fmt;

/// Coarse classification an error type can report, independent of its
/// specific variant. Mirrors how a handful of broad "exception classes"
/// (not-found, invalid-input, internal) are often layered over a much
/// larger set of concrete error variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    NotFound,
    InvalidInput,
    Internal,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not-found",
            Self::InvalidInput => "invalid-input",
            Self::Internal => "internal",
        };
        f.write_str(label)
    }
}

/// Implemented by error types that can classify themselves into a
/// [`FaultKind`].
pub trait Fault: Error {
    fn kind(&self) -> FaultKind;
}

/// Walk `err`'s `source()` chain, innermost cause last, collecting each
/// error's `Display` rendering.
pub fn causal_chain(err: &(dyn Error + 'static)) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut current = err.source();
    while let Some(cause) = current {
        chain.push(cause.to_string());
        current = cause.source();
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error as ThisError;

    #[derive(ThisError, Debug)]
    #[error("inner failure")]
    struct Inner;

    #[derive(ThisError, Debug)]
    #[error("outer failure")]
    struct Outer(#[source] Inner);

    impl Fault for Outer {
        fn kind(&self) -> FaultKind {
            FaultKind::Internal
        }
    }

    #[test]
    fn kind_reports_the_declared_classification() {
        let err = Outer(Inner);
        assert_eq!(err.kind(), FaultKind::Internal);
    }

    #[test]
    fn causal_chain_walks_every_source() {
        let err = Outer(Inner);
        assert_eq!(
            causal_chain(&err),
            vec!["outer failure".to_string(), "inner failure".to_string()]
        );
    }
}
