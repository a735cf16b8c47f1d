//! Unified error types for ifcdiff.
//!
//! This module provides the error hierarchy for the library, with rich
//! context for debugging and user-friendly messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ifcdiff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IfcDiffError {
    /// Errors in the comparison configuration (rule list)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Errors raised by the model store
    #[error("Model store operation failed: {context}")]
    Store {
        context: String,
        #[source]
        source: StoreErrorKind,
    },

    /// Errors during result write-back
    #[error("Result write failed: {context}")]
    Write {
        context: String,
        #[source]
        source: WriteErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Specific model-store error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreErrorKind {
    #[error("model snapshot is not valid JSON: {0}")]
    SnapshotDecode(String),

    #[error("model snapshot serialization failed: {0}")]
    SnapshotEncode(String),

    #[error("entity label #{0} not present in store")]
    UnknownLabel(u64),

    #[error("staged relation references no objects")]
    EmptyRelation,
}

/// Specific result-writer error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WriteErrorKind {
    #[error("transaction commit failed for batch {batch}")]
    CommitFailed { batch: usize },

    #[error("saving annotated model failed: {0}")]
    SaveFailed(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for ifcdiff operations
pub type Result<T> = std::result::Result<T, IfcDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl IfcDiffError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a store error with context
    pub fn store(context: impl Into<String>, source: StoreErrorKind) -> Self {
        Self::Store {
            context: context.into(),
            source,
        }
    }

    /// Create a write error with context
    pub fn write(context: impl Into<String>, source: WriteErrorKind) -> Self {
        Self::Write {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }
}

impl From<std::io::Error> for IfcDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context,
/// creating a chain that shows the path through the code.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    ///
    /// The closure is only called if the result is an error,
    /// which is more efficient when the context string is expensive to compute.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<IfcDiffError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: IfcDiffError, new_ctx: &str) -> IfcDiffError {
    match err {
        IfcDiffError::Config(msg) => IfcDiffError::Config(chain_context(new_ctx, &msg)),
        IfcDiffError::Store {
            context: existing,
            source,
        } => IfcDiffError::Store {
            context: chain_context(new_ctx, &existing),
            source,
        },
        IfcDiffError::Write {
            context: existing,
            source,
        } => IfcDiffError::Write {
            context: chain_context(new_ctx, &existing),
            source,
        },
        IfcDiffError::Io {
            path,
            message,
            source,
        } => IfcDiffError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
