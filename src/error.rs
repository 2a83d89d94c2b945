//! Error types for evo-min
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

use crate::genome::bounds::ElementKind;

/// Error type for chromosome operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenomeError {
    /// Two chromosomes (or a chromosome and a gene space) disagree on length
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Two chromosomes (or a chromosome and a gene space) disagree on element kind
    #[error("Element kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        expected: ElementKind,
        actual: ElementKind,
    },

    /// Invalid chromosome structure
    #[error("Invalid chromosome structure: {0}")]
    InvalidStructure(String),
}

/// Error type for operator failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// Crossover operation failed
    #[error("Crossover failed: {0}")]
    CrossoverFailed(String),

    /// Mutation operation failed
    #[error("Mutation failed: {0}")]
    MutationFailed(String),

    /// Selection operation failed
    #[error("Selection failed: {0}")]
    SelectionFailed(String),

    /// An operator returned chromosomes that do not fit the gene space
    #[error("{operator} operator returned a malformed chromosome at index {index}: {source}")]
    ContractViolation {
        operator: &'static str,
        index: usize,
        #[source]
        source: GenomeError,
    },
}

/// Error type for history export and import
#[derive(Debug, Error)]
pub enum HistoryError {
    /// IO error while reading or writing a history file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// The file does not contain a recorded history
    #[error("Not a history file: {0}")]
    InvalidFormat(String),

    /// History file version is newer than supported
    #[error("History version {0} is newer than supported")]
    VersionTooNew(u32),
}

/// Top-level error type for evolution operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Engine construction parameters are invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Chromosome error
    #[error("Genome error: {0}")]
    Genome(#[from] GenomeError),

    /// Operator error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Fitness evaluation failed
    #[error("Fitness evaluation failed at iteration {iteration}: {message}")]
    FitnessEvaluation { iteration: usize, message: String },

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,

    /// History recorder error
    #[error("History error: {0}")]
    History(#[from] HistoryError),
}

impl EvolutionError {
    /// Shorthand for an [`EvolutionError::InvalidConfiguration`]
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;
