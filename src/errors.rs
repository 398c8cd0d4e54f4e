//! Error types for flag parsing and command dispatch

use thiserror::Error;

use crate::exitcode;

/// Errors produced while parsing a token list against a flag set.
#[derive(Error, Debug)]
pub enum FlagError {
    #[error("unknown flag: --{name}")]
    Unknown { name: String },

    #[error("unknown shorthand flag: -{shorthand}")]
    UnknownShorthand { shorthand: char },

    #[error("flag --{name} requires a value")]
    MissingValue { name: String },

    #[error("invalid value {value:?} for flag --{name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("cannot group shorthand flags: {token:?}")]
    ShorthandBlock { token: String },
}

/// Top-level dispatch errors. These are what callers of
/// [`Commander::execute`](crate::dispatch::Commander::execute) see.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("called execute on an empty command tree")]
    EmptyTree,

    #[error("unknown subcommand {name:?}\nRun 'help' for usage")]
    UnknownSubcommand { name: String },

    #[error("{0}")]
    Parse(#[from] FlagError),
}

impl DispatchError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchError::EmptyTree => exitcode::SOFTWARE,
            DispatchError::UnknownSubcommand { .. } | DispatchError::Parse(_) => exitcode::USAGE,
        }
    }
}
