//! Error types for the density lab.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("host channel disconnected")]
    Disconnected,

    #[error("IO error writing to host: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("no tutor credential configured")]
    MissingCredential,

    #[error("failed to run tutor command: {0}")]
    Io(#[from] std::io::Error),

    #[error("tutor command exited with {0}")]
    CommandFailed(std::process::ExitStatus),

    #[error("tutor did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("malformed tutor response: {0}")]
    Malformed(String),

    #[error("tutor worker disconnected")]
    Disconnected,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("missing argument for {0}")]
    MissingArgument(&'static str),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}
