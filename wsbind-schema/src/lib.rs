//! # wsbind Schema
//!
//! WSDL schema reader and type descriptors.
//!
//! This crate provides:
//! - WSDL/XSD parsing into type and operation descriptors
//! - Overlay documents that supplement the primary declarations
//! - Assumption checks on the merged schema
//! - Generator configuration and per-target output policies
//! - A loader tying the above together for one target

pub mod config;
pub mod error;
pub mod loader;
pub mod overlay;
pub mod parser;
pub mod types;
pub mod validation;

pub use config::{DEFAULT_LICENSE, GeneratorConfig, TargetConfig, TargetPolicy};
pub use error::{ConfigError, LoadError, OverlayError, ParseError, SchemaError};
pub use loader::{LoadedSchema, SchemaLoader};
pub use overlay::Overlay;
pub use parser::read;
pub use types::{
    BUILTIN_TYPES, FieldDef, OperationDescriptor, Schema, Source, TypeDescriptor, TypeKind,
    TypeRef, XSD_NAMESPACE, namespace_prefix,
};
pub use validation::validate_assumptions;
