use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{0} is not valid unicode")]
    NotUnicode(&'static str),

    #[error("{key} must be an integer, got {value:?}")]
    InvalidNumber {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{key} has unknown value {value:?} (expected one of: {expected})")]
    InvalidChoice {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// A single inbound line that could not be turned into an event.
///
/// Never fatal: the session logs it and moves on to the next line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("PING without a token")]
    MissingPingToken,

    #[error("PRIVMSG line is missing its {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not build mention pattern: {0}")]
    Pattern(#[from] regex::Error),
}
