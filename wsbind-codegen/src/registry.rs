//! Type registry.
//!
//! The registry indexes the merged type set by name and derives which types
//! act as polymorphic bases. It is built once, before any emission pass, and
//! is read-only afterwards.

use crate::error::CodegenError;
use crate::ordering::{partition_enums, sorted_unique};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use wsbind_schema::TypeDescriptor;

/// Abstraction synthesized for a polymorphic base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// Name of the base type.
    pub name: String,
    /// True if the base is itself emitted as a composite.
    pub concrete: bool,
    /// Every type whose supertype chain reaches the base, sorted by name.
    pub implementers: Vec<String>,
}

/// Name index over a target's type declarations.
#[derive(Debug)]
pub struct TypeRegistry<'a> {
    declarations: &'a [TypeDescriptor],
    by_name: HashMap<&'a str, &'a TypeDescriptor>,
    redeclarations: usize,
    interfaces: BTreeMap<String, Interface>,
}

impl<'a> TypeRegistry<'a> {
    /// Builds the registry from declarations in document order.
    ///
    /// The first declaration of a name is the one the registry answers for;
    /// later declarations are counted and left to the ordering stage.
    #[must_use]
    pub fn build(declarations: &'a [TypeDescriptor]) -> Self {
        let mut by_name = HashMap::with_capacity(declarations.len());
        let mut redeclarations = 0;

        for type_def in declarations {
            match by_name.entry(type_def.name.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(type_def);
                }
                Entry::Occupied(_) => {
                    tracing::debug!("{} redeclared, keeping first declaration", type_def.name);
                    redeclarations += 1;
                }
            }
        }

        let interfaces = derive_interfaces(&by_name);

        Self {
            declarations,
            by_name,
            redeclarations,
            interfaces,
        }
    }

    /// Returns every declaration in document order, redeclarations included.
    #[must_use]
    pub const fn types(&self) -> &'a [TypeDescriptor] {
        self.declarations
    }

    /// Returns the enum types in emission order: sorted by name, one
    /// declaration per name.
    #[must_use]
    pub fn enum_types(&self) -> Vec<&'a TypeDescriptor> {
        partition_enums(sorted_unique(self.types())).0
    }

    /// Returns the non-enum types in emission order.
    ///
    /// A name redeclared with a different kind lands on the side of its
    /// first declaration only.
    #[must_use]
    pub fn composite_types(&self) -> Vec<&'a TypeDescriptor> {
        partition_enums(sorted_unique(self.types())).1
    }

    /// Returns the interface names in ascending byte order.
    pub fn interface_names(&self) -> impl Iterator<Item = &str> {
        self.interfaces.keys().map(String::as_str)
    }

    /// Returns the interface synthesized for `name`.
    ///
    /// # Errors
    /// Returns `CodegenError::Unregistered` if `name` is not a registered
    /// type, and `CodegenError::Generation` if it is not a polymorphic base.
    pub fn interface(&self, name: &str) -> Result<&Interface, CodegenError> {
        self.get(name)?;
        self.interfaces
            .get(name)
            .ok_or_else(|| CodegenError::generation(format!("'{name}' is not a polymorphic base")))
    }


    /// Returns the descriptor registered under `name`.
    ///
    /// # Errors
    /// Returns `CodegenError::Unregistered` if no type has that name.
    pub fn get(&self, name: &str) -> Result<&'a TypeDescriptor, CodegenError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| CodegenError::unregistered(name))
    }

    /// Number of distinct type names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Number of synthesized interfaces.
    #[must_use]
    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    /// Returns true if `name` is an enum.
    ///
    /// # Errors
    /// Returns `CodegenError::Unregistered` for unknown names.
    pub fn is_enum(&self, name: &str) -> Result<bool, CodegenError> {
        Ok(self.get(name)?.is_enum())
    }

    /// Number of declarations shadowed by an earlier one of the same name.
    #[must_use]
    pub const fn redeclarations(&self) -> usize {
        self.redeclarations
    }

    /// Returns true if another type has `name` in its supertype chain.
    ///
    /// # Errors
    /// Returns `CodegenError::Unregistered` for unknown names.
    pub fn is_polymorphic_base(&self, name: &str) -> Result<bool, CodegenError> {
        self.get(name)?;
        Ok(self.interfaces.contains_key(name))
    }

    /// Returns true if `name` is a polymorphic base with no state of its own.
    ///
    /// Such a base is represented only by its interface.
    ///
    /// # Errors
    /// Returns `CodegenError::Unregistered` for unknown names.
    pub fn is_abstract_base(&self, name: &str) -> Result<bool, CodegenError> {
        self.get(name)?;
        Ok(self.interfaces.get(name).is_some_and(|i| !i.concrete))
    }
}

fn local_base(type_def: &TypeDescriptor) -> Option<&str> {
    type_def
        .base()
        .filter(|base| base.is_local())
        .map(|base| base.name.as_str())
}

fn derive_interfaces(by_name: &HashMap<&str, &TypeDescriptor>) -> BTreeMap<String, Interface> {
    let mut implementers: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for &type_def in by_name.values() {
        let mut visited = HashSet::new();
        let mut current = local_base(type_def);

        while let Some(base) = current {
            if !visited.insert(base) {
                break;
            }
            let Some(&base_def) = by_name.get(base) else {
                break;
            };
            if base_def.is_enum() {
                break;
            }
            implementers
                .entry(base_def.name.as_str())
                .or_default()
                .insert(type_def.name.as_str());
            current = local_base(base_def);
        }
    }

    implementers
        .into_iter()
        .filter_map(|(name, members)| {
            let base_def = by_name.get(name)?;
            let concrete = !base_def.fields().is_empty() || base_def.base().is_some();
            Some((
                name.to_string(),
                Interface {
                    name: name.to_string(),
                    concrete,
                    implementers: members.into_iter().map(str::to_string).collect(),
                },
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsbind_schema::{FieldDef, TypeRef};

    fn scenario_types() -> Vec<TypeDescriptor> {
        vec![
            TypeDescriptor::new_enum("Alpha", vec!["A".into(), "B".into()]),
            TypeDescriptor::new_composite("Beta", Some(TypeRef::local("Gamma")), vec![]),
            TypeDescriptor::new_composite("Gamma", None, vec![]),
        ]
    }

    #[test]
    fn test_build_scenario() {
        let types = scenario_types();
        let registry = TypeRegistry::build(&types);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.interface_count(), 1);
        assert_eq!(registry.interface_names().collect::<Vec<_>>(), ["Gamma"]);
        assert!(registry.is_polymorphic_base("Gamma").unwrap());
        assert!(registry.is_abstract_base("Gamma").unwrap());
        assert!(!registry.is_polymorphic_base("Beta").unwrap());
        assert!(registry.is_enum("Alpha").unwrap());

        let gamma = registry.interface("Gamma").unwrap();
        assert!(!gamma.concrete);
        assert_eq!(gamma.implementers, ["Beta"]);
    }

    #[test]
    fn test_concrete_base() {
        let types = vec![
            TypeDescriptor::new_composite(
                "Gamma",
                None,
                vec![FieldDef::new("key", TypeRef::builtin("string"))],
            ),
            TypeDescriptor::new_composite("Beta", Some(TypeRef::local("Gamma")), vec![]),
        ];
        let registry = TypeRegistry::build(&types);

        assert!(registry.interface("Gamma").unwrap().concrete);
        assert!(!registry.is_abstract_base("Gamma").unwrap());
    }

    #[test]
    fn test_transitive_implementers() {
        let types = vec![
            TypeDescriptor::new_composite("Root", None, vec![]),
            TypeDescriptor::new_composite("Mid", Some(TypeRef::local("Root")), vec![]),
            TypeDescriptor::new_composite("Leaf", Some(TypeRef::local("Mid")), vec![]),
        ];
        let registry = TypeRegistry::build(&types);

        assert_eq!(registry.interface_names().collect::<Vec<_>>(), ["Mid", "Root"]);
        assert_eq!(registry.interface("Root").unwrap().implementers, ["Leaf", "Mid"]);
        assert_eq!(registry.interface("Mid").unwrap().implementers, ["Leaf"]);
        // Mid has a supertype of its own, so it is emitted as a struct.
        assert!(registry.interface("Mid").unwrap().concrete);
        assert!(!registry.is_polymorphic_base("Leaf").unwrap());
    }

    #[test]
    fn test_foreign_base_is_not_local_interface() {
        let types = vec![TypeDescriptor::new_composite(
            "PbmProfile",
            Some(TypeRef::qualified("vim25", "DynamicData")),
            vec![],
        )];
        let registry = TypeRegistry::build(&types);

        assert_eq!(registry.interface_count(), 0);
    }

    #[test]
    fn test_redeclaration_first_wins() {
        let types = vec![
            TypeDescriptor::new_composite(
                "Epsilon",
                None,
                vec![FieldDef::new("a", TypeRef::builtin("string"))],
            ),
            TypeDescriptor::new_composite("Epsilon", None, vec![]),
        ];
        let registry = TypeRegistry::build(&types);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.types().len(), 2);
        assert_eq!(registry.redeclarations(), 1);
        assert_eq!(registry.get("Epsilon").unwrap().fields().len(), 1);
    }

    #[test]
    fn test_unregistered_queries() {
        let types = scenario_types();
        let registry = TypeRegistry::build(&types);

        assert!(matches!(
            registry.get("Zeta"),
            Err(CodegenError::Unregistered { .. })
        ));
        assert!(registry.is_polymorphic_base("Zeta").is_err());
        assert!(registry.is_abstract_base("Zeta").is_err());
        assert!(matches!(
            registry.interface("Zeta"),
            Err(CodegenError::Unregistered { .. })
        ));
        assert!(matches!(
            registry.interface("Beta"),
            Err(CodegenError::Generation { .. })
        ));
    }

    #[test]
    fn test_enum_and_composite_views() {
        let mut types = scenario_types();
        // Redeclared with the other kind: only the first declaration counts.
        types.push(TypeDescriptor::new_enum("Beta", vec!["X".into()]));
        types.insert(0, TypeDescriptor::new_composite("Delta", None, vec![]));
        let registry = TypeRegistry::build(&types);

        let enums: Vec<_> = registry.enum_types().iter().map(|t| t.name.as_str()).collect();
        let composites: Vec<_> = registry
            .composite_types()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(enums, ["Alpha"]);
        assert_eq!(composites, ["Beta", "Delta", "Gamma"]);
    }

    #[test]
    fn test_cycle_does_not_hang() {
        let types = vec![
            TypeDescriptor::new_composite("A", Some(TypeRef::local("B")), vec![]),
            TypeDescriptor::new_composite("B", Some(TypeRef::local("A")), vec![]),
        ];
        let registry = TypeRegistry::build(&types);

        assert_eq!(registry.interface_count(), 2);
    }
}
