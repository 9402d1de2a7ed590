use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiError;

/// What was being decoded when a [`Error::Decode`] occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeTarget {
    Artifact,
    Metadata,
    Config,
    Response,
}

impl std::fmt::Display for DecodeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DecodeTarget::Artifact => "artifact",
            DecodeTarget::Metadata => "contract metadata",
            DecodeTarget::Config => "project configuration",
            DecodeTarget::Response => "API response",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("File not found: {path}: {source}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode {target}: {source}")]
    Decode {
        target: DecodeTarget,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Optimizer settings missing from contract metadata ({0})")]
    MissingOptimizerSettings(&'static str),

    #[error("Remote transport error: {0}")]
    RemoteTransport(String),

    #[error("Remote API error: {0}")]
    RemoteApplication(ApiError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap a parser error raised while decoding `target`
    pub fn decode<E>(target: DecodeTarget, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Decode {
            target,
            source: Box::new(source),
        }
    }

    /// Machine-readable error code, used in failure reports
    pub fn code(&self) -> &'static str {
        match self {
            Error::FileNotFound { .. } => "FILE_NOT_FOUND",
            Error::Decode { .. } => "DECODE_ERROR",
            Error::MissingOptimizerSettings(_) => "MISSING_OPTIMIZER_SETTINGS",
            Error::RemoteTransport(_) => "REMOTE_TRANSPORT_ERROR",
            Error::RemoteApplication(_) => "REMOTE_APPLICATION_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
