//! Composite (struct) code generation.

use crate::error::CodegenError;
use crate::go::{align, claim_identifier, init_block, naming};
use crate::registry::TypeRegistry;
use std::collections::HashMap;
use wsbind_schema::{FieldDef, Source, TargetPolicy, TypeDescriptor, TypeRef};

/// Go rendition of one field's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoFieldType {
    /// Type expression, including pointer or slice markers.
    pub expr: String,
    /// True if the concrete type travels in an `xsi:type` attribute.
    pub typeattr: bool,
}

/// Generator for composite type definitions.
pub struct CompositeGenerator<'a> {
    registry: &'a TypeRegistry<'a>,
    policy: &'a TargetPolicy,
}

impl<'a> CompositeGenerator<'a> {
    /// Creates a new composite generator.
    #[must_use]
    pub fn new(registry: &'a TypeRegistry<'a>, policy: &'a TargetPolicy) -> Self {
        Self { registry, policy }
    }

    /// Drops abstract bases, which are represented by their interface only.
    ///
    /// # Errors
    /// Returns `CodegenError::Unregistered` if a type is unknown to the
    /// registry.
    pub fn emitted<'t>(
        &self,
        composites: &[&'t TypeDescriptor],
    ) -> Result<Vec<&'t TypeDescriptor>, CodegenError> {
        let mut emitted = Vec::with_capacity(composites.len());
        for &composite in composites {
            if self.registry.is_abstract_base(&composite.name)? {
                tracing::debug!("{} is an abstract base, interface only", composite.name);
            } else {
                emitted.push(composite);
            }
        }
        Ok(emitted)
    }

    /// Imports the composite artifact needs for `composites`.
    #[must_use]
    pub fn imports(&self, composites: &[&TypeDescriptor]) -> Vec<String> {
        let mut imports = vec!["reflect".to_string()];

        let uses_time = composites.iter().flat_map(|c| c.fields()).any(|f| {
            f.type_ref.is_builtin() && f.type_ref.name == "dateTime"
        });
        if uses_time {
            imports.push("time".to_string());
        }

        if !self.policy.is_root {
            imports.push("context".to_string());
            imports.push(self.policy.root_types_import());
        }

        imports
    }

    /// Generates every composite, each definition followed by its init block.
    ///
    /// `composites` must already be ordered, deduplicated and stripped of
    /// abstract bases.
    ///
    /// # Errors
    /// Returns `CodegenError` if a field references a type that cannot be
    /// mapped.
    pub fn generate(&self, composites: &[&TypeDescriptor]) -> Result<String, CodegenError> {
        let mut output = String::new();

        for composite in composites {
            output.push_str(&self.generate_struct(composite)?);
            output.push_str(&init_block(self.policy, &composite.name));
        }

        Ok(output)
    }

    /// Generates one struct definition.
    fn generate_struct(&self, composite: &TypeDescriptor) -> Result<String, CodegenError> {
        let mut output = String::new();
        let mut seen = HashMap::new();
        output.push_str(&format!("type {} struct {{\n", composite.name));

        let embedded = self.embedded(composite)?;
        if let Some(embedded) = &embedded {
            // An embedded field is named after its type, without the package.
            let ident = embedded.rsplit('.').next().unwrap_or(embedded.as_str());
            claim_identifier(&mut seen, &composite.name, ident, embedded)?;
            output.push_str(&format!("\t{embedded}\n"));
        }
        for field in composite.fields() {
            let wire = match field.source {
                Source::Primary => field.name.clone(),
                Source::Overlay => format!("{} (overlay)", field.name),
            };
            claim_identifier(
                &mut seen,
                &composite.name,
                &naming::exported(&field.name),
                &wire,
            )?;
        }

        let rows = composite
            .fields()
            .iter()
            .map(|field| self.field_row(&composite.name, field))
            .collect::<Result<Vec<_>, _>>()?;
        if !rows.is_empty() {
            if embedded.is_some() {
                output.push('\n');
            }
            output.push_str(&align(&rows));
        }

        output.push_str("}\n\n");
        Ok(output)
    }

    /// Returns the embedded supertype, if the struct has one.
    fn embedded(&self, composite: &TypeDescriptor) -> Result<Option<String>, CodegenError> {
        let Some(base) = composite.base() else {
            return Ok(None);
        };
        if base.is_local() {
            if self.registry.is_abstract_base(&base.name)? {
                return Ok(None);
            }
            return Ok(Some(base.name.clone()));
        }
        Ok(Some(self.qualified(base)))
    }

    /// Builds the name, type and tag cells of one field.
    fn field_row(&self, owner: &str, field: &FieldDef) -> Result<Vec<String>, CodegenError> {
        let go_type = self.field_type(owner, field)?;

        let mut tag = field.name.clone();
        if field.optional || field.repeated {
            tag.push_str(",omitempty");
        }
        if go_type.typeattr {
            tag.push_str(",typeattr");
        }

        Ok(vec![
            naming::exported(&field.name),
            go_type.expr,
            format!("`xml:\"{tag}\"`"),
        ])
    }

    /// Maps a field's type reference to a Go type.
    ///
    /// # Errors
    /// Returns `CodegenError::UnknownType` for builtins without a mapping and
    /// `CodegenError::Unregistered` for unknown local types.
    pub fn field_type(&self, owner: &str, field: &FieldDef) -> Result<GoFieldType, CodegenError> {
        let type_ref = &field.type_ref;

        // (type, pointer when optional, typeattr)
        let (base, nullable, typeattr) = if type_ref.is_builtin() {
            match type_ref.name.as_str() {
                "string" | "anyURI" => ("string".to_string(), false, false),
                "int" => ("int32".to_string(), false, false),
                "long" => ("int64".to_string(), false, false),
                "short" => ("int16".to_string(), false, false),
                "byte" => ("int8".to_string(), false, false),
                "boolean" => ("bool".to_string(), true, false),
                "float" => ("float32".to_string(), false, false),
                "double" => ("float64".to_string(), false, false),
                "dateTime" => ("time.Time".to_string(), true, false),
                "base64Binary" => ("[]byte".to_string(), false, false),
                "anyType" => (self.root_qualified("AnyType"), false, true),
                _ => {
                    return Err(CodegenError::UnknownType {
                        type_name: type_ref.to_string(),
                        field: format!("{owner}.{}", field.name),
                    });
                }
            }
        } else if type_ref.is_local() {
            let name = &type_ref.name;
            if self.registry.is_enum(name)? {
                (name.clone(), false, false)
            } else if self.registry.is_polymorphic_base(name)? {
                (naming::interface_name(name), false, true)
            } else {
                (name.clone(), true, false)
            }
        } else {
            (self.qualified(type_ref), true, false)
        };

        let expr = if field.repeated {
            format!("[]{base}")
        } else if field.optional && nullable {
            format!("*{base}")
        } else {
            base
        };

        Ok(GoFieldType { expr, typeattr })
    }

    fn qualified(&self, type_ref: &TypeRef) -> String {
        self.root_qualified(&type_ref.name)
    }

    fn root_qualified(&self, name: &str) -> String {
        if self.policy.is_root {
            name.to_string()
        } else {
            format!("types.{name}")
        }
    }
}
