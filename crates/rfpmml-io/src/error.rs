//! I/O and lookup error types for rfpmml-io.

use std::path::PathBuf;

/// Errors from reading source models, looking up their parts, and writing
/// documents.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the input file is not a valid source object rendition.
    #[error("malformed source model in {path} at line {line}, column {column}")]
    JsonParse {
        /// Path to the input file.
        path: PathBuf,
        /// One-based line of the failure.
        line: usize,
        /// One-based column of the failure.
        column: usize,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when a list has no element with the requested name.
    #[error("field {name} not in {available:?}")]
    FieldNotFound {
        /// The name that was sought.
        name: String,
        /// The names the list does carry.
        available: Vec<String>,
    },

    /// Returned when an object carries no attribute with the requested name.
    #[error("attribute {name} not in {available:?}")]
    AttributeNotFound {
        /// The name that was sought.
        name: String,
        /// The attribute names the object does carry.
        available: Vec<String>,
    },

    /// Returned when a vector is shorter than a requested position.
    #[error("{kind} vector has {len} elements, no element at index {index}")]
    MissingElement {
        /// Which vector was indexed (`"string"`, `"integer"`, ...).
        kind: &'static str,
        /// The zero-based index requested.
        index: usize,
        /// The vector length.
        len: usize,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a document cannot be rendered as JSON.
    #[error("cannot serialize document for {path}")]
    Serialize {
        /// Destination path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when a document file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
