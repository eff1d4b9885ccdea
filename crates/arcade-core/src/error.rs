use std::fmt;

use crate::catalog::GameId;

/// Failure of the score persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store could not be reached or refused the operation.
    Unavailable(String),
    Io(String),
    Parse(String),
    Encode(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(m) => write!(f, "storage unavailable: {m}"),
            Self::Io(m) => write!(f, "storage i/o error: {m}"),
            Self::Parse(m) => write!(f, "could not parse stored scores: {m}"),
            Self::Encode(m) => write!(f, "could not encode scores: {m}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Errors surfaced by the arcade's public operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArcadeError {
    UnknownGame(GameId),
    UnknownCategory(String),
    Config(String),
    Storage(StorageError),
}

impl fmt::Display for ArcadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGame(id) => write!(f, "no game with id {id}"),
            Self::UnknownCategory(c) => write!(f, "unknown category '{c}'"),
            Self::Config(m) => write!(f, "invalid configuration: {m}"),
            Self::Storage(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ArcadeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for ArcadeError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}
