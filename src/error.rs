//! Error handling for the Fyre pipeline core
//!
//! Each subsystem has its own error enum; this module defines the top-level
//! error that wraps them, and a Result alias for use throughout the crate.

use crate::pipeline::PipelineError;
use crate::plugin::PluginLoadError;
use crate::types::TypeError;
use thiserror::Error;

/// Main error type for Fyre operations
#[derive(Error, Debug)]
pub enum FyreError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors from graph mutations
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Type check failures
    #[error("Type error: {0}")]
    Type(#[from] TypeError),

    /// Plugin loading and catalog errors
    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginLoadError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FyreError>,
    },
}

impl FyreError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FyreError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for Fyre operations
pub type Result<T> = std::result::Result<T, FyreError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<FyreError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
