//! Schema type definitions.
//!
//! This module contains the descriptors produced by the WSDL reader and the
//! overlay merge: types (enums and composites), their fields, and the RPC
//! operations that reference them.

use std::collections::HashMap;
use std::fmt;

/// Namespace prefix used for XML Schema builtin types.
pub const XSD_NAMESPACE: &str = "xsd";

/// XML Schema builtin types the generator knows how to map.
pub const BUILTIN_TYPES: &[&str] = &[
    "anyType",
    "anyURI",
    "base64Binary",
    "boolean",
    "byte",
    "dateTime",
    "double",
    "float",
    "int",
    "long",
    "short",
    "string",
];

/// Parsed schema for one target.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Namespace prefix of the target (`vim25` for `urn:vim25`).
    pub namespace: String,
    /// Full target namespace URI as declared by the document.
    pub target_namespace: String,
    /// Type descriptors in document order. Names may repeat.
    pub types: Vec<TypeDescriptor>,
    /// Operation descriptors in document order.
    pub operations: Vec<OperationDescriptor>,
    /// First index of each type name.
    type_map: HashMap<String, usize>,
}

impl Schema {
    /// Creates a new empty schema for the given target namespace URI.
    #[must_use]
    pub fn new(target_namespace: impl Into<String>) -> Self {
        let target_namespace = target_namespace.into();
        Self {
            namespace: namespace_prefix(&target_namespace).to_string(),
            target_namespace,
            types: Vec::new(),
            operations: Vec::new(),
            type_map: HashMap::new(),
        }
    }

    /// Adds a type descriptor to the schema.
    ///
    /// Redeclarations are kept in `types`; lookups keep resolving to the
    /// first declaration.
    pub fn add_type(&mut self, type_def: TypeDescriptor) {
        let index = self.types.len();
        self.type_map
            .entry(type_def.name.clone())
            .or_insert(index);
        self.types.push(type_def);
    }

    /// Adds an operation descriptor to the schema.
    pub fn add_operation(&mut self, operation: OperationDescriptor) {
        self.operations.push(operation);
    }

    /// Looks up the first type declared under `name`.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.type_map.get(name).map(|&idx| &self.types[idx])
    }

    /// Returns true if a type with the given name exists.
    #[must_use]
    pub fn has_type(&self, name: &str) -> bool {
        self.type_map.contains_key(name)
    }

    /// Returns every declaration of `name`, mutably.
    pub fn types_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut TypeDescriptor> + 'a {
        self.types.iter_mut().filter(move |t| t.name == name)
    }
}

/// Returns the namespace prefix of a target namespace URI.
///
/// `urn:vim25` becomes `vim25`; the XML Schema namespace becomes `xsd`.
#[must_use]
pub fn namespace_prefix(uri: &str) -> &str {
    if uri == "http://www.w3.org/2001/XMLSchema" {
        return XSD_NAMESPACE;
    }
    uri.strip_prefix("urn:").unwrap_or(uri)
}

/// Where a field was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Source {
    /// The target's WSDL document.
    #[default]
    Primary,
    /// The target's overlay document.
    Overlay,
}

/// Reference to a type by qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef {
    /// Namespace prefix; `None` for types local to the schema being read.
    pub namespace: Option<String>,
    /// Local type name.
    pub name: String,
}

impl TypeRef {
    /// Creates a reference to a type local to the current schema.
    #[must_use]
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    /// Creates a reference to an XML Schema builtin.
    #[must_use]
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::qualified(XSD_NAMESPACE, name)
    }

    /// Creates a reference into another namespace.
    #[must_use]
    pub fn qualified(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    /// Returns true if this references an XML Schema builtin.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.namespace.as_deref() == Some(XSD_NAMESPACE)
    }

    /// Returns true if this references a type of the current schema.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.namespace.is_none()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}:{}", ns, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// One discovered schema type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name, unique within the target's namespace.
    pub name: String,
    /// Enum or composite payload.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Creates an enum type with the given symbolic values.
    #[must_use]
    pub fn new_enum(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Enum(values),
        }
    }

    /// Creates a composite type.
    #[must_use]
    pub fn new_composite(
        name: impl Into<String>,
        base: Option<TypeRef>,
        fields: Vec<FieldDef>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Composite { base, fields },
        }
    }

    /// Returns true if this is a closed set of symbolic values.
    #[must_use]
    pub const fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum(_))
    }

    /// Returns the declared supertype, if any.
    #[must_use]
    pub fn base(&self) -> Option<&TypeRef> {
        match &self.kind {
            TypeKind::Composite { base, .. } => base.as_ref(),
            TypeKind::Enum(_) => None,
        }
    }

    /// Returns the composite fields (empty for enums).
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        match &self.kind {
            TypeKind::Composite { fields, .. } => fields,
            TypeKind::Enum(_) => &[],
        }
    }

    /// Returns the enum values (empty for composites).
    #[must_use]
    pub fn values(&self) -> &[String] {
        match &self.kind {
            TypeKind::Enum(values) => values,
            TypeKind::Composite { .. } => &[],
        }
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields().iter().find(|f| f.name == name)
    }
}

/// Type payload variants.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Closed set of string values.
    Enum(Vec<String>),
    /// Structure with an optional supertype.
    Composite {
        /// Declared supertype.
        base: Option<TypeRef>,
        /// Own fields, in declaration order.
        fields: Vec<FieldDef>,
    },
}

/// Field of a composite type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Wire name of the field.
    pub name: String,
    /// Referenced type.
    pub type_ref: TypeRef,
    /// `minOccurs="0"`.
    pub optional: bool,
    /// `maxOccurs` greater than one.
    pub repeated: bool,
    /// Document the field came from.
    pub source: Source,
}

impl FieldDef {
    /// Creates a required, single-valued field.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            optional: false,
            repeated: false,
            source: Source::Primary,
        }
    }

    /// Marks the field optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Marks the field repeated.
    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    /// Returns true if `other` declares the same type shape.
    #[must_use]
    pub fn same_type(&self, other: &Self) -> bool {
        self.type_ref == other.type_ref && self.repeated == other.repeated
    }
}

/// One discovered RPC operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Operation name.
    pub name: String,
    /// Target namespace URI the request element lives in.
    pub namespace: String,
    /// Request payload type.
    pub input: TypeRef,
    /// Response payload type; `None` for one-way operations.
    pub output: Option<TypeRef>,
    /// Request element name on the wire.
    pub request_element: String,
    /// Response element name on the wire.
    pub response_element: String,
}

impl OperationDescriptor {
    /// Creates an operation whose wire elements follow the usual
    /// `Op` / `OpResponse` convention.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        input: TypeRef,
        output: Option<TypeRef>,
    ) -> Self {
        let name = name.into();
        Self {
            request_element: name.clone(),
            response_element: format!("{name}Response"),
            name,
            namespace: namespace.into(),
            input,
            output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_prefix() {
        assert_eq!(namespace_prefix("urn:vim25"), "vim25");
        assert_eq!(namespace_prefix("urn:pbm"), "pbm");
        assert_eq!(namespace_prefix("http://www.w3.org/2001/XMLSchema"), "xsd");
        assert_eq!(namespace_prefix("custom"), "custom");
    }

    #[test]
    fn test_schema_type_lookup_first_wins() {
        let mut schema = Schema::new("urn:vim25");
        schema.add_type(TypeDescriptor::new_composite(
            "Epsilon",
            None,
            vec![FieldDef::new("a", TypeRef::builtin("string"))],
        ));
        schema.add_type(TypeDescriptor::new_composite("Epsilon", None, vec![]));

        assert_eq!(schema.types.len(), 2);
        assert!(schema.has_type("Epsilon"));
        assert_eq!(schema.get_type("Epsilon").unwrap().fields().len(), 1);
        assert!(!schema.has_type("Zeta"));
    }

    #[test]
    fn test_types_named_mut_visits_every_declaration() {
        let mut schema = Schema::new("urn:vim25");
        schema.add_type(TypeDescriptor::new_composite("Epsilon", None, vec![]));
        schema.add_type(TypeDescriptor::new_enum("Alpha", vec!["A".into()]));
        schema.add_type(TypeDescriptor::new_composite("Epsilon", None, vec![]));

        assert_eq!(schema.types_named_mut("Epsilon").count(), 2);
    }

    #[test]
    fn test_type_ref_classification() {
        let builtin = TypeRef::builtin("string");
        assert!(builtin.is_builtin());
        assert!(!builtin.is_local());

        let local = TypeRef::local("Beta");
        assert!(local.is_local());
        assert!(!local.is_builtin());

        let foreign = TypeRef::qualified("vim25", "DynamicData");
        assert!(!foreign.is_local());
        assert!(!foreign.is_builtin());
        assert_eq!(foreign.to_string(), "vim25:DynamicData");
        assert_eq!(local.to_string(), "Beta");
    }

    #[test]
    fn test_type_descriptor_accessors() {
        let alpha = TypeDescriptor::new_enum("Alpha", vec!["A".into(), "B".into()]);
        assert!(alpha.is_enum());
        assert_eq!(alpha.values(), ["A", "B"]);
        assert!(alpha.fields().is_empty());
        assert!(alpha.base().is_none());

        let beta = TypeDescriptor::new_composite(
            "Beta",
            Some(TypeRef::local("Gamma")),
            vec![FieldDef::new("x", TypeRef::builtin("int")).optional()],
        );
        assert!(!beta.is_enum());
        assert_eq!(beta.base(), Some(&TypeRef::local("Gamma")));
        assert!(beta.field("x").unwrap().optional);
        assert!(beta.field("y").is_none());
        assert!(beta.values().is_empty());
    }

    #[test]
    fn test_field_same_type() {
        let a = FieldDef::new("x", TypeRef::builtin("string"));
        let b = FieldDef::new("x", TypeRef::builtin("string")).optional();
        let c = FieldDef::new("x", TypeRef::builtin("string")).repeated();
        let d = FieldDef::new("x", TypeRef::builtin("int"));

        assert!(a.same_type(&b));
        assert!(!a.same_type(&c));
        assert!(!a.same_type(&d));
    }

    #[test]
    fn test_operation_default_elements() {
        let op = OperationDescriptor::new(
            "DoThing",
            "urn:vim25",
            TypeRef::local("Beta"),
            Some(TypeRef::local("Alpha")),
        );
        assert_eq!(op.request_element, "DoThing");
        assert_eq!(op.response_element, "DoThingResponse");
    }
}
