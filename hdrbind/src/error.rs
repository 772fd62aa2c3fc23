//! Error types surfaced by the scaffolding pipeline.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a run.
///
/// Nothing in the crate recovers from these locally: the first error stops
/// the walk and is handed back to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// The header does not live under the declared include base.
    #[error("header {} is not under include base {}", header.display(), include_base.display())]
    Path {
        header: PathBuf,
        include_base: PathBuf,
    },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("invalid regex for option `{option}`: {source}")]
    InvalidPattern {
        option: &'static str,
        #[source]
        source: regex::Error,
    },

    /// Two headers derived the same `Bind<Symbol>` name.
    #[error(
        "symbol `{symbol}` derived from both {} and {}",
        first.display(),
        second.display()
    )]
    SymbolCollision {
        symbol: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Opaque failure reported by a generation engine.
///
/// The message and cause are preserved for reporting but never parsed.
#[derive(Debug, Error)]
#[error("generation engine failed: {message}")]
pub struct EngineError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn engine_error_keeps_message_and_source() {
        let io = std::io::Error::other("pipe closed");
        let err = EngineError::with_source("litgen crashed", io);
        assert_eq!(err.message(), "litgen crashed");
        assert_eq!(err.to_string(), "generation engine failed: litgen crashed");
        assert_eq!(err.source().unwrap().to_string(), "pipe closed");
    }

    #[test]
    fn engine_error_converts_transparently() {
        let err: Error = EngineError::new("boom").into();
        assert!(matches!(err, Error::Engine(_)));
        assert_eq!(err.to_string(), "generation engine failed: boom");
    }

    #[test]
    fn path_error_names_both_paths() {
        let err = Error::Path {
            header: PathBuf::from("/elsewhere/foo.h"),
            include_base: PathBuf::from("/inc"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/elsewhere/foo.h"), "{msg}");
        assert!(msg.contains("/inc"), "{msg}");
    }
}
