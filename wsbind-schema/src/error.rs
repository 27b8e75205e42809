//! Error types for schema reading, merging, validation and loading.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for WSDL reading operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// A message or element reference could not be resolved.
    #[error("unresolved {kind} '{name}' referenced by operation '{operation}'")]
    Unresolved {
        /// What was referenced (message, element).
        kind: &'static str,
        /// Referenced name.
        name: String,
        /// Referencing operation.
        operation: String,
    },

    /// Invalid document structure.
    #[error("invalid schema structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an unresolved reference error.
    pub fn unresolved(
        kind: &'static str,
        name: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Unresolved {
            kind,
            name: name.into(),
            operation: operation.into(),
        }
    }
}

/// Error type for the schema assumption check.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A field references a type the schema does not declare.
    #[error("type '{name}' referenced by '{referenced_by}' not found")]
    TypeNotFound {
        /// Missing type name.
        name: String,
        /// Referencing type or operation.
        referenced_by: String,
    },

    /// A field references an XML Schema type the generator cannot map.
    #[error("unsupported builtin type 'xsd:{name}' referenced by '{referenced_by}'")]
    UnsupportedBuiltin {
        /// Builtin name.
        name: String,
        /// Referencing type.
        referenced_by: String,
    },

    /// A composite extends something that is not a composite.
    #[error("type '{name}' extends '{base}', which is not a composite type")]
    InvalidBase {
        /// Extending type.
        name: String,
        /// Declared base.
        base: String,
    },

    /// Inheritance chain loops back on itself.
    #[error("circular inheritance detected: {path}")]
    CircularInheritance {
        /// Chain that closes the cycle.
        path: String,
    },

    /// Same field declared twice in one composite.
    #[error("duplicate field '{field}' in type '{type_name}'")]
    DuplicateField {
        /// Type name.
        type_name: String,
        /// Field name.
        field: String,
    },

    /// Enum without values.
    #[error("enum '{name}' declares no values")]
    EmptyEnum {
        /// Enum name.
        name: String,
    },

    /// Same value listed twice in one enum.
    #[error("duplicate value '{value}' in enum '{enum_name}'")]
    DuplicateEnumValue {
        /// Enum name.
        enum_name: String,
        /// Duplicate value.
        value: String,
    },
}

/// Error type for overlay documents.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// YAML syntax or shape error.
    #[error("overlay YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Property shape the overlay reader does not understand.
    #[error("unsupported overlay property '{property}' on '{schema}': {reason}")]
    Unsupported {
        /// Overlay schema name.
        schema: String,
        /// Property name.
        property: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Overlay redeclares a primary field with a different type.
    #[error(
        "overlay field '{field}' on '{type_name}' conflicts: primary declares '{primary}', overlay declares '{overlay}'"
    )]
    Conflict {
        /// Type name.
        type_name: String,
        /// Field name.
        field: String,
        /// Primary field type.
        primary: String,
        /// Overlay field type.
        overlay: String,
    },

    /// Overlay supplies fields for an enum type.
    #[error("overlay declares properties for enum type '{type_name}'")]
    EnumProperties {
        /// Enum name.
        type_name: String,
    },
}

impl OverlayError {
    /// Creates an unsupported property error.
    pub fn unsupported(
        schema: impl Into<String>,
        property: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Unsupported {
            schema: schema.into(),
            property: property.into(),
            reason: reason.into(),
        }
    }
}

/// Error type for generator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Target identifier is empty or contains path separators.
    #[error("invalid target name '{0}'")]
    InvalidTarget(String),
}

/// Error type for loading a target's schema.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The target's primary schema does not exist.
    #[error("schema for target '{target}' not found at {}", .path.display())]
    SchemaNotFound {
        /// Target name.
        target: String,
        /// Expected location.
        path: PathBuf,
    },

    /// IO error while reading a schema document.
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Primary schema could not be read.
    #[error("schema parse error: {0}")]
    Parse(#[from] ParseError),

    /// Overlay could not be read or merged.
    #[error("overlay error: {0}")]
    Overlay(#[from] OverlayError),

    /// Assumption check failed.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Target policy could not be resolved.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
