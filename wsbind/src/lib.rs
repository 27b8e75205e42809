//! # wsbind
//!
//! Schema-driven generator of Go SOAP bindings.
//!
//! wsbind reads a target's WSDL document, supplements it with an optional
//! overlay, classifies every type and emits four Go files: enums, structs,
//! interfaces for polymorphic bases and one method stub per operation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use wsbind::prelude::*;
//!
//! let config = GeneratorConfig::default().with_schema_dir("wsdl");
//! let loaded = SchemaLoader::new(&config).load("vim")?;
//! let registry = TypeRegistry::build(&loaded.schema.types);
//! let artifacts = Generator::new(&loaded.schema, &registry, &loaded.policy).generate()?;
//! artifacts.write_to(Path::new("out"))?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - WSDL reading, overlays, configuration and loading
//! - [`codegen`] - Type registry, ordering and Go emission

pub mod cli;
pub mod prelude;

/// WSDL reading, overlays, configuration and loading.
pub mod schema {
    pub use wsbind_schema::*;
}

/// Type registry, ordering and Go emission.
pub mod codegen {
    pub use wsbind_codegen::*;
}

// Re-export commonly used items at the crate root
pub use wsbind_codegen::{Artifacts, CodegenError, Generator, TypeRegistry};
pub use wsbind_schema::{GeneratorConfig, LoadedSchema, SchemaLoader, TargetPolicy};
