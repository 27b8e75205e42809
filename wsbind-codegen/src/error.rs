//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema parsing error.
    #[error("schema parse error: {0}")]
    Parse(#[from] wsbind_schema::ParseError),

    /// Schema assumption check failed.
    #[error("schema error: {0}")]
    Schema(#[from] wsbind_schema::SchemaError),

    /// Target schema could not be loaded.
    #[error("load error: {0}")]
    Load(#[from] wsbind_schema::LoadError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },

    /// Registry queried for a name it was never given.
    #[error("type '{name}' is not registered")]
    Unregistered {
        /// Queried name.
        name: String,
    },

    /// Field type the emitter has no mapping for.
    #[error("unknown type '{type_name}' in field '{field}'")]
    UnknownType {
        /// Type name.
        type_name: String,
        /// Field name.
        field: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Creates an unregistered name error.
    pub fn unregistered(name: impl Into<String>) -> Self {
        Self::Unregistered { name: name.into() }
    }
}
