use crate::commands::CommandError;
use crate::net::codec::CodecError;
use thiserror::Error;

pub type AppResult<T> = Result<T, SessionError>;

/// Everything that can end a connection session early.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Socket-level failure while talking to the client
    #[error("connection failure: {0}")]
    Connection(#[from] std::io::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("connection closed before the registration form was sent")]
    MissingForm,

    #[error(transparent)]
    Command(#[from] CommandError),
}

#[derive(Debug, Error)]
pub enum ConfigErrorKind {
    #[error("failed to read file: {0}")]
    Read(std::io::Error),

    #[error("failed to parse file: {0}")]
    Parse(toml::de::Error),

    #[error("invalid environment variable {0}: {1}")]
    InvalidEnv(String, String),

    #[error("{0} out of range: {1}")]
    OutOfRange(&'static str, String),
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: std::path::PathBuf,
        #[source]
        source: ConfigErrorKind,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
