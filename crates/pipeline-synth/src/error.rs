use thiserror::Error;

use crate::registry::CommandKind;

pub type Result<T, E = SynthError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("{command}: empty {list} list")]
    EmptyList {
        command: CommandKind,
        list: &'static str,
    },
    #[error("{command}: template {template:?} references undefined placeholder {{{placeholder}}}")]
    UnknownPlaceholder {
        command: CommandKind,
        template: String,
        placeholder: String,
    },
    #[error("{command}: template {template:?} has an unterminated placeholder")]
    UnterminatedPlaceholder {
        command: CommandKind,
        template: String,
    },
    #[error("{command}: ambiguous form requested without conversation history")]
    AmbiguousWithoutHistory { command: CommandKind },
    #[error("{command}: command type has no ambiguous form")]
    NoAmbiguousForm { command: CommandKind },
    #[error("invalid weight table {table}: {reason}")]
    InvalidWeights { table: &'static str, reason: String },
    #[error("value out of range: {0}")]
    OutOfRange(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("generation worker failed: {0}")]
    Worker(String),
}
