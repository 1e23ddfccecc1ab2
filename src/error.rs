//! Errors raised by lookups, atom construction and (de)serialization.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An integer index fell outside of a registry.
    #[error("index {index} is out of range for a registry of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// No element of a registry matched a label or energy search.
    #[error("no entry matches key `{key}`")]
    NotFound { key: String },

    /// The key could not be used to index a registry.
    #[error("unsupported key {found}: expected an integer, range, term string, energy or list")]
    TypeMismatch { found: String },

    /// Two registries belonging to different parents were joined.
    #[error("cannot concatenate registries with different parents ({left} and {right})")]
    ParentMismatch { left: String, right: String },

    #[error("state `{state}` has no polarizability model")]
    MissingPolarizability { state: String },

    #[error("state index {index} does not refer to a state of the atom")]
    UnknownState { index: usize },

    #[error("invalid {field} `{value}` in record")]
    InvalidRecord { field: String, value: String },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Configuration(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
