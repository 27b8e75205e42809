//! Interface code generation for polymorphic bases.

use crate::error::CodegenError;
use crate::go::naming;
use crate::registry::{Interface, TypeRegistry};

/// Generator for interface definitions.
pub struct InterfaceGenerator<'a> {
    registry: &'a TypeRegistry<'a>,
}

impl<'a> InterfaceGenerator<'a> {
    /// Creates a new interface generator.
    #[must_use]
    pub fn new(registry: &'a TypeRegistry<'a>) -> Self {
        Self { registry }
    }

    /// Generates one interface per polymorphic base, in name order.
    ///
    /// # Errors
    /// Returns `CodegenError` if the registry cannot describe one of its own
    /// interface names.
    pub fn generate(&self) -> Result<String, CodegenError> {
        let mut output = String::new();

        for name in self.registry.interface_names() {
            let interface = self.registry.interface(name)?;
            if interface.concrete {
                output.push_str(&self.generate_concrete(interface));
            } else {
                output.push_str(&self.generate_abstract(interface));
            }
        }

        Ok(output)
    }

    /// A concrete base hands out a pointer to itself; implementers inherit
    /// the accessor by embedding.
    fn generate_concrete(&self, interface: &Interface) -> String {
        let mut output = String::new();
        let base = &interface.name;
        let getter = naming::getter_name(base);

        output.push_str(&format!(
            "func (b *{base}) {getter}() *{base} {{ return b }}\n\n"
        ));
        output.push_str(&format!(
            "type {} interface {{\n",
            naming::interface_name(base)
        ));
        output.push_str(&format!("\t{getter}() *{base}\n"));
        output.push_str("}\n\n");

        output
    }

    /// An abstract base has no struct to point at, so implementers answer a
    /// discriminator instead.
    fn generate_abstract(&self, interface: &Interface) -> String {
        let mut output = String::new();
        let kind = naming::kind_method_name(&interface.name);

        output.push_str(&format!(
            "type {} interface {{\n",
            naming::interface_name(&interface.name)
        ));
        output.push_str(&format!("\t{kind}() string\n"));
        output.push_str("}\n\n");

        for implementer in &interface.implementers {
            output.push_str(&format!(
                "func (b *{implementer}) {kind}() string {{ return \"{implementer}\" }}\n\n"
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsbind_schema::{FieldDef, TypeDescriptor, TypeRef};

    #[test]
    fn test_abstract_interface() {
        let types = vec![
            TypeDescriptor::new_composite("Beta", Some(TypeRef::local("Gamma")), vec![]),
            TypeDescriptor::new_composite("Gamma", None, vec![]),
        ];
        let registry = TypeRegistry::build(&types);

        let code = InterfaceGenerator::new(&registry).generate().unwrap();

        assert_eq!(
            code,
            "type BaseGamma interface {\n\tGammaKind() string\n}\n\n\
             func (b *Beta) GammaKind() string { return \"Beta\" }\n\n"
        );
    }

    #[test]
    fn test_concrete_interface() {
        let types = vec![
            TypeDescriptor::new_composite(
                "Gamma",
                None,
                vec![FieldDef::new("key", TypeRef::builtin("string"))],
            ),
            TypeDescriptor::new_composite("Beta", Some(TypeRef::local("Gamma")), vec![]),
        ];
        let registry = TypeRegistry::build(&types);

        let code = InterfaceGenerator::new(&registry).generate().unwrap();

        assert_eq!(
            code,
            "func (b *Gamma) GetGamma() *Gamma { return b }\n\n\
             type BaseGamma interface {\n\tGetGamma() *Gamma\n}\n\n"
        );
        assert!(!code.contains("func init()"));
    }

    #[test]
    fn test_leaf_types_have_no_interface() {
        let types = vec![
            TypeDescriptor::new_composite("Leaf", None, vec![]),
            TypeDescriptor::new_enum("Alpha", vec!["A".into()]),
        ];
        let registry = TypeRegistry::build(&types);

        assert!(InterfaceGenerator::new(&registry).generate().unwrap().is_empty());
    }

    #[test]
    fn test_interfaces_in_name_order() {
        let types = vec![
            TypeDescriptor::new_composite("Zed", None, vec![]),
            TypeDescriptor::new_composite("Apple", None, vec![]),
            TypeDescriptor::new_composite("ZedChild", Some(TypeRef::local("Zed")), vec![]),
            TypeDescriptor::new_composite("AppleChild", Some(TypeRef::local("Apple")), vec![]),
        ];
        let registry = TypeRegistry::build(&types);

        let code = InterfaceGenerator::new(&registry).generate().unwrap();

        let apple = code.find("type BaseApple").unwrap();
        let zed = code.find("type BaseZed").unwrap();
        assert!(apple < zed);
    }
}
