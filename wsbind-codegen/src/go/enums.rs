//! Enum code generation.

use crate::error::CodegenError;
use crate::go::{align, claim_identifier, init_block, naming};
use std::collections::HashMap;
use wsbind_schema::{TargetPolicy, TypeDescriptor};

/// Generator for enum definitions.
pub struct EnumGenerator<'a> {
    policy: &'a TargetPolicy,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(policy: &'a TargetPolicy) -> Self {
        Self { policy }
    }

    /// Imports the enum artifact needs.
    ///
    /// Non-root targets register through the root `types` package.
    #[must_use]
    pub fn imports(&self) -> Vec<String> {
        let mut imports = vec!["reflect".to_string()];
        if !self.policy.is_root {
            imports.push(self.policy.root_types_import());
        }
        imports
    }

    /// Generates every enum, each definition followed by its init block.
    ///
    /// `enums` must already be ordered and deduplicated.
    ///
    /// # Errors
    /// Returns `CodegenError::Generation` if two values map to the same Go
    /// constant anywhere in the package.
    pub fn generate(&self, enums: &[&TypeDescriptor]) -> Result<String, CodegenError> {
        let mut output = String::new();
        let mut constants = HashMap::new();

        for enum_def in enums {
            output.push_str(&self.generate_enum(enum_def, &mut constants)?);
            output.push_str(&init_block(self.policy, &enum_def.name));
        }

        Ok(output)
    }

    /// Generates one enum definition with its value accessors.
    fn generate_enum(
        &self,
        enum_def: &TypeDescriptor,
        seen: &mut HashMap<String, String>,
    ) -> Result<String, CodegenError> {
        let mut output = String::new();
        let name = &enum_def.name;
        let mut constants = Vec::with_capacity(enum_def.values().len());
        for value in enum_def.values() {
            let constant = naming::enum_constant(name, value);
            claim_identifier(seen, name, &constant, &format!("{name}.{value}"))?;
            constants.push(constant);
        }

        output.push_str(&format!("type {name} string\n\n"));

        output.push_str("const (\n");
        let rows: Vec<Vec<String>> = constants
            .iter()
            .zip(enum_def.values())
            .map(|(constant, value)| {
                vec![
                    constant.clone(),
                    format!("= {name}({})", quote(value)),
                ]
            })
            .collect();
        output.push_str(&align(&rows));
        output.push_str(")\n\n");

        output.push_str(&format!("func (e {name}) Values() []{name} {{\n"));
        output.push_str(&format!("\treturn []{name}{{\n"));
        for constant in &constants {
            output.push_str(&format!("\t\t{constant},\n"));
        }
        output.push_str("\t}\n");
        output.push_str("}\n\n");

        output.push_str(&format!("func (e {name}) Strings() []string {{\n"));
        output.push_str("\tvalues := e.Values()\n");
        output.push_str("\ts := make([]string, len(values))\n");
        output.push_str("\tfor i, v := range values {\n");
        output.push_str("\t\ts[i] = string(v)\n");
        output.push_str("\t}\n");
        output.push_str("\treturn s\n");
        output.push_str("}\n\n");

        Ok(output)
    }
}

/// Quotes a value as a Go string literal.
pub(crate) fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
