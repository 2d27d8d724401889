use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which record table an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Memo,
    User,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memo => "memo",
            Self::User => "user",
        })
    }
}

/// Errors raised by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this id.
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: u64 },
    /// A draft failed validation; the message is shown to the user as is.
    #[error("{0}")]
    Validation(String),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed data file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
