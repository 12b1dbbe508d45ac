//! Internal parse failures.
//!
//! These never escape [`crate::Dispatcher::process_command`] or
//! [`crate::Dispatcher::process_message`] — the text decoder collapses every
//! variant to [`crate::DispatchStatus::MalformedSyntax`] at the boundary.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ParseError {
    #[error("not a valid integer")]
    Integer(#[from] core::num::ParseIntError),
    #[error("not a valid percentage")]
    Float(#[from] core::num::ParseFloatError),
    #[error("address 0 (or U/0) is null and cannot be targeted")]
    NullAddress,
    #[error("address range expression did not match the grammar")]
    MalformedRange,
    #[error("missing '@' between address range and value")]
    MissingAt,
    #[error("missing 'to' between source and destination")]
    MissingTo,
    #[error("'mask' clause is malformed")]
    MalformedMask,
    #[error("unrecognized command name")]
    UnknownCommand,
}
