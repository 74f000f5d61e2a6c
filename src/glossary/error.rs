//! Error type shared by the glossary modules.

use std::fmt;

/// Errors surfaced by glossary operations.
///
/// An empty search result is not an error; callers get an empty `Vec`.
#[derive(Debug)]
pub enum GlossaryError {
    /// The SQLite store failed.
    Storage(rusqlite::Error),
    /// An insert was rejected because a required field is empty.
    InvalidTerm(String),
    /// A random pick was needed but the glossary holds no terms.
    EmptyGlossary,
    /// The user already has an unanswered quiz question.
    QuizAlreadyActive,
}

impl fmt::Display for GlossaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(source) => write!(f, "storage error: {}", source),
            Self::InvalidTerm(msg) => write!(f, "invalid term: {}", msg),
            Self::EmptyGlossary => write!(f, "glossary is empty"),
            Self::QuizAlreadyActive => write!(f, "quiz already active"),
        }
    }
}

impl std::error::Error for GlossaryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(source) => Some(source),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for GlossaryError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e)
    }
}

pub type Result<T> = std::result::Result<T, GlossaryError>;
