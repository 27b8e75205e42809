//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use wsbind::prelude::*;
//! ```

// Schema types
pub use wsbind_schema::{
    FieldDef, OperationDescriptor, Schema, Source, TypeDescriptor, TypeKind, TypeRef,
};

// Loading
pub use wsbind_schema::{
    ConfigError, GeneratorConfig, LoadError, LoadedSchema, Overlay, SchemaLoader, TargetPolicy,
};

// Generation
pub use wsbind_codegen::{
    Artifacts, CodegenError, Generator, Interface, Named, TypeRegistry, partition_enums,
    sorted_unique,
};
