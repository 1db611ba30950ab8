//! Error types for the Child Support Assessment Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during an assessment.

use thiserror::Error;

/// The main error type for the Child Support Assessment Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use assessment_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No rate table exists for the requested assessment year.
    #[error("No rate table for assessment year {year}")]
    YearNotFound {
        /// The assessment year that was requested.
        year: u16,
    },

    /// A parent record was invalid or contained inconsistent data.
    #[error("Invalid parent field '{field}': {message}")]
    InvalidParent {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A child record was invalid or contained inconsistent data.
    #[error("Invalid child '{child_id}': {message}")]
    InvalidChild {
        /// The ID of the invalid child.
        child_id: String,
        /// A description of what made the child invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
