//! Schema assumption checks.
//!
//! The generator relies on a handful of structural properties of the merged
//! schema: every local reference resolves, supertypes are composites and form
//! no cycles, fields and enum values are unique within their owner. These are
//! checked once, after the overlay merge and before any classification.

use crate::error::SchemaError;
use crate::types::{BUILTIN_TYPES, Schema, TypeDescriptor, TypeKind, TypeRef};
use std::collections::HashSet;

/// Validates a merged schema against the generator's assumptions.
///
/// # Arguments
/// * `schema` - The schema to validate
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the first violation.
///
/// # Errors
/// Returns `SchemaError` if validation fails.
pub fn validate_assumptions(schema: &Schema) -> Result<(), SchemaError> {
    validate_types(schema)?;
    validate_inheritance(schema)?;
    validate_operations(schema)?;
    Ok(())
}

/// Validates every type declaration in the schema.
fn validate_types(schema: &Schema) -> Result<(), SchemaError> {
    for type_def in &schema.types {
        match &type_def.kind {
            TypeKind::Enum(values) => validate_enum(&type_def.name, values)?,
            TypeKind::Composite { base, .. } => {
                validate_composite(schema, type_def)?;
                if let Some(base) = base {
                    validate_base(schema, &type_def.name, base)?;
                }
            }
        }
    }
    Ok(())
}

/// Validates an enum type definition.
fn validate_enum(name: &str, values: &[String]) -> Result<(), SchemaError> {
    if values.is_empty() {
        return Err(SchemaError::EmptyEnum {
            name: name.to_string(),
        });
    }

    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(SchemaError::DuplicateEnumValue {
                enum_name: name.to_string(),
                value: value.clone(),
            });
        }
    }

    Ok(())
}

/// Validates the fields of a composite type.
fn validate_composite(schema: &Schema, type_def: &TypeDescriptor) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();

    for field in type_def.fields() {
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                type_name: type_def.name.clone(),
                field: field.name.clone(),
            });
        }
        validate_reference(schema, &field.type_ref, &type_def.name)?;
    }

    Ok(())
}

/// Validates that a reference resolves. Foreign references belong to
/// another target and are not checked here.
fn validate_reference(
    schema: &Schema,
    type_ref: &TypeRef,
    referenced_by: &str,
) -> Result<(), SchemaError> {
    if type_ref.is_builtin() {
        if !BUILTIN_TYPES.contains(&type_ref.name.as_str()) {
            return Err(SchemaError::UnsupportedBuiltin {
                name: type_ref.name.clone(),
                referenced_by: referenced_by.to_string(),
            });
        }
    } else if type_ref.is_local() && !schema.has_type(&type_ref.name) {
        return Err(SchemaError::TypeNotFound {
            name: type_ref.name.clone(),
            referenced_by: referenced_by.to_string(),
        });
    }
    Ok(())
}

/// Validates a declared supertype.
fn validate_base(schema: &Schema, name: &str, base: &TypeRef) -> Result<(), SchemaError> {
    if base.is_builtin() {
        return Err(SchemaError::InvalidBase {
            name: name.to_string(),
            base: base.to_string(),
        });
    }
    if !base.is_local() {
        return Ok(());
    }

    match schema.get_type(&base.name) {
        None => Err(SchemaError::TypeNotFound {
            name: base.name.clone(),
            referenced_by: name.to_string(),
        }),
        Some(base_def) if base_def.is_enum() => Err(SchemaError::InvalidBase {
            name: name.to_string(),
            base: base.to_string(),
        }),
        Some(_) => Ok(()),
    }
}

/// Rejects inheritance chains that loop back on themselves.
fn validate_inheritance(schema: &Schema) -> Result<(), SchemaError> {
    for type_def in &schema.types {
        let mut path = vec![type_def.name.as_str()];
        let mut current = type_def.base();

        while let Some(base) = current.filter(|b| b.is_local()) {
            if path.contains(&base.name.as_str()) {
                path.push(base.name.as_str());
                return Err(SchemaError::CircularInheritance {
                    path: path.join(" -> "),
                });
            }
            path.push(base.name.as_str());
            current = schema.get_type(&base.name).and_then(TypeDescriptor::base);
        }
    }
    Ok(())
}

/// Validates that operation payloads resolve.
fn validate_operations(schema: &Schema) -> Result<(), SchemaError> {
    for operation in &schema.operations {
        validate_reference(schema, &operation.input, &operation.name)?;
        if let Some(output) = &operation.output {
            validate_reference(schema, output, &operation.name)?;
        }
    }
    Ok(())
}
