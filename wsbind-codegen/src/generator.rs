//! Artifact assembly.
//!
//! Runs the ordering stage and the four Go emission passes over one target's
//! schema and returns the artifact contents. Nothing here touches the
//! filesystem.

use crate::error::CodegenError;
use crate::go::{
    CompositeGenerator, EnumGenerator, InterfaceGenerator, MethodGenerator, header, import_block,
};
use crate::ordering::sorted_unique;
use crate::output::Artifacts;
use crate::registry::TypeRegistry;
use wsbind_schema::{DEFAULT_LICENSE, Schema, TargetPolicy};

/// Package the type artifacts belong to.
pub const TYPES_PACKAGE: &str = "types";

/// Package the method artifact belongs to.
pub const METHODS_PACKAGE: &str = "methods";

/// Main code generator.
pub struct Generator<'a> {
    schema: &'a Schema,
    registry: &'a TypeRegistry<'a>,
    policy: &'a TargetPolicy,
    license: String,
}

impl<'a> Generator<'a> {
    /// Creates a new generator for a loaded schema and its registry.
    #[must_use]
    pub fn new(schema: &'a Schema, registry: &'a TypeRegistry<'a>, policy: &'a TargetPolicy) -> Self {
        Self {
            schema,
            registry,
            policy,
            license: DEFAULT_LICENSE.to_string(),
        }
    }

    /// Replaces the license notice placed at the top of each artifact.
    #[must_use]
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }

    /// Generates all four artifacts.
    ///
    /// # Errors
    /// Returns `CodegenError` if any emission pass fails.
    pub fn generate(&self) -> Result<Artifacts, CodegenError> {
        if self.registry.is_empty() {
            tracing::warn!("target {} declares no types", self.policy.name);
        }
        if self.registry.redeclarations() > 0 {
            tracing::info!(
                "{} redeclared types in {}, first declarations kept",
                self.registry.redeclarations(),
                self.policy.name
            );
        }

        Ok(Artifacts {
            enums: self.generate_enums()?,
            types: self.generate_types()?,
            interfaces: self.generate_interfaces()?,
            methods: self.generate_methods()?,
        })
    }

    /// Generates the enum artifact.
    ///
    /// # Errors
    /// Returns `CodegenError` if two enum values map to the same constant.
    pub fn generate_enums(&self) -> Result<String, CodegenError> {
        let enums = self.registry.enum_types();
        let generator = EnumGenerator::new(self.policy);

        let mut output = header(&self.license, TYPES_PACKAGE);
        output.push_str(&import_block(&generator.imports()));
        output.push_str(&generator.generate(&enums)?);
        tracing::debug!("generated {} enums", enums.len());
        Ok(output)
    }

    /// Generates the composite artifact.
    ///
    /// # Errors
    /// Returns `CodegenError` if a field type cannot be mapped.
    pub fn generate_types(&self) -> Result<String, CodegenError> {
        let generator = CompositeGenerator::new(self.registry, self.policy);
        let composites = generator.emitted(&self.registry.composite_types())?;

        let mut output = header(&self.license, TYPES_PACKAGE);
        output.push_str(&import_block(&generator.imports(&composites)));
        output.push_str(&generator.generate(&composites)?);
        tracing::debug!("generated {} composites", composites.len());
        Ok(output)
    }

    /// Generates the interface artifact.
    ///
    /// # Errors
    /// Returns `CodegenError` if an interface cannot be described.
    pub fn generate_interfaces(&self) -> Result<String, CodegenError> {
        let generator = InterfaceGenerator::new(self.registry);

        let mut output = header(&self.license, TYPES_PACKAGE);
        output.push_str(&generator.generate()?);
        tracing::debug!("generated {} interfaces", self.registry.interface_count());
        Ok(output)
    }

    /// Generates the method artifact.
    ///
    /// # Errors
    /// Returns `CodegenError` if an operation payload cannot be resolved.
    pub fn generate_methods(&self) -> Result<String, CodegenError> {
        let operations = sorted_unique(&self.schema.operations);
        let generator = MethodGenerator::new(self.registry, self.policy);

        let mut output = header(&self.license, METHODS_PACKAGE);
        output.push_str(&import_block(&generator.imports()));
        output.push_str(&generator.generate(&operations)?);
        tracing::debug!("generated {} methods", operations.len());
        Ok(output)
    }
}
