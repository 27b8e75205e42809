//! Overlay schema documents.
//!
//! An overlay is a YAML document in the `components.schemas` layout that
//! supplies extra fields for types the WSDL already declares. Overlay fields
//! are strictly additive: a field the primary already declares with the same
//! type is ignored, one with a different type is a conflict.

use crate::error::OverlayError;
use crate::types::{FieldDef, Schema, Source, TypeKind, TypeRef};
use serde::Deserialize;
use std::collections::BTreeMap;

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Parsed overlay document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Overlay {
    #[serde(default)]
    components: Components,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Components {
    #[serde(default)]
    schemas: BTreeMap<String, OverlaySchema>,
}

/// One overlay entry, keyed by type name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverlaySchema {
    /// Supplementary properties by wire name.
    #[serde(default)]
    pub properties: BTreeMap<String, OverlayProperty>,
    /// Properties that are not optional.
    #[serde(default)]
    pub required: Vec<String>,
}

/// A property of an overlay entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverlayProperty {
    /// JSON schema type name.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Refinement of `type` (`int64`, `float`, `date-time`, ...).
    pub format: Option<String>,
    /// Reference to another schema entry.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Element type for arrays.
    pub items: Option<Box<OverlayProperty>>,
}

impl Overlay {
    /// Parses an overlay from YAML text.
    ///
    /// # Errors
    /// Returns `OverlayError::Yaml` if the document is not valid YAML or does
    /// not have the expected shape.
    pub fn from_yaml(yaml: &str) -> Result<Self, OverlayError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Merges the overlay into `schema`.
    ///
    /// Every declaration of an overlaid name receives the missing fields, in
    /// overlay order after the primary fields. Overlay entries without a
    /// primary counterpart are ignored.
    ///
    /// # Returns
    /// The number of fields added.
    ///
    /// # Errors
    /// Returns `OverlayError::Conflict` if a field is redeclared with a
    /// different type, `OverlayError::EnumProperties` if an enum type is
    /// given properties, and `OverlayError::Unsupported` for property shapes
    /// that cannot be mapped.
    pub fn merge_into(&self, schema: &mut Schema) -> Result<usize, OverlayError> {
        let mut added = 0;

        for (name, entry) in &self.components.schemas {
            if !schema.has_type(name) {
                tracing::debug!("overlay entry {} has no primary declaration, ignoring", name);
                continue;
            }

            let supplement = entry.fields(name)?;
            for type_def in schema.types_named_mut(name) {
                let TypeKind::Composite { fields, .. } = &mut type_def.kind else {
                    if supplement.is_empty() {
                        continue;
                    }
                    return Err(OverlayError::EnumProperties {
                        type_name: name.clone(),
                    });
                };

                for extra in &supplement {
                    match fields.iter().find(|f| f.name == extra.name) {
                        Some(existing) if existing.same_type(extra) => {}
                        Some(existing) => {
                            return Err(OverlayError::Conflict {
                                type_name: name.clone(),
                                field: extra.name.clone(),
                                primary: describe(existing),
                                overlay: describe(extra),
                            });
                        }
                        None => {
                            tracing::debug!("overlay adds {}.{}", name, extra.name);
                            fields.push(extra.clone());
                            added += 1;
                        }
                    }
                }
            }
        }

        Ok(added)
    }
}

impl OverlaySchema {
    /// Converts the entry's properties into field definitions.
    ///
    /// # Errors
    /// Returns `OverlayError::Unsupported` for properties without a usable
    /// type.
    pub fn fields(&self, schema: &str) -> Result<Vec<FieldDef>, OverlayError> {
        self.properties
            .iter()
            .map(|(name, property)| {
                let (type_ref, repeated) = property.type_ref(schema, name)?;
                let mut field = FieldDef::new(name.clone(), type_ref);
                field.optional = !self.required.contains(name);
                field.repeated = repeated;
                field.source = Source::Overlay;
                Ok(field)
            })
            .collect()
    }
}

impl OverlayProperty {
    /// Maps the property to a type reference and a repeated flag.
    fn type_ref(&self, schema: &str, property: &str) -> Result<(TypeRef, bool), OverlayError> {
        if let Some(reference) = &self.reference {
            let name = reference.strip_prefix(SCHEMA_REF_PREFIX).ok_or_else(|| {
                OverlayError::unsupported(schema, property, format!("external $ref '{reference}'"))
            })?;
            return Ok((TypeRef::local(name), false));
        }

        let kind = self
            .kind
            .as_deref()
            .ok_or_else(|| OverlayError::unsupported(schema, property, "no type or $ref"))?;

        let builtin = match (kind, self.format.as_deref()) {
            ("array", _) => {
                let items = self.items.as_deref().ok_or_else(|| {
                    OverlayError::unsupported(schema, property, "array without items")
                })?;
                let (item_ref, nested) = items.type_ref(schema, property)?;
                if nested {
                    return Err(OverlayError::unsupported(schema, property, "nested array"));
                }
                return Ok((item_ref, true));
            }
            ("string", Some("date-time")) => "dateTime",
            ("string", Some("byte")) => "base64Binary",
            ("string", Some("uri")) => "anyURI",
            ("string", _) => "string",
            ("integer", Some("int64")) => "long",
            ("integer", Some("int16")) => "short",
            ("integer", Some("int8")) => "byte",
            ("integer", _) => "int",
            ("number", Some("float")) => "float",
            ("number", _) => "double",
            ("boolean", _) => "boolean",
            ("object", _) => "anyType",
            (other, _) => {
                return Err(OverlayError::unsupported(
                    schema,
                    property,
                    format!("type '{other}'"),
                ));
            }
        };

        Ok((TypeRef::builtin(builtin), false))
    }
}

fn describe(field: &FieldDef) -> String {
    if field.repeated {
        format!("{}[]", field.type_ref)
    } else {
        field.type_ref.to_string()
    }
}
