//! Method stub code generation.

use crate::error::CodegenError;
use crate::go::align;
use crate::registry::TypeRegistry;
use wsbind_schema::{OperationDescriptor, TargetPolicy, TypeRef};

/// Tag of the fault field in every request body.
const FAULT_TAG: &str = "`xml:\"http://schemas.xmlsoap.org/soap/envelope/ Body>Fault,omitempty\"`";

/// Generator for RPC method stubs.
pub struct MethodGenerator<'a> {
    registry: &'a TypeRegistry<'a>,
    policy: &'a TargetPolicy,
}

impl<'a> MethodGenerator<'a> {
    /// Creates a new method generator.
    #[must_use]
    pub fn new(registry: &'a TypeRegistry<'a>, policy: &'a TargetPolicy) -> Self {
        Self { registry, policy }
    }

    /// Imports the method artifact needs. These do not depend on the
    /// operations being generated.
    #[must_use]
    pub fn imports(&self) -> Vec<String> {
        vec![
            "context".to_string(),
            self.policy.types_import(),
            self.policy.soap_import(),
        ]
    }

    /// Generates one stub per operation.
    ///
    /// `operations` must already be ordered and deduplicated.
    ///
    /// # Errors
    /// Returns `CodegenError` if an operation payload is not a registered
    /// composite or a cross-target type, or names an abstract base.
    pub fn generate(&self, operations: &[&OperationDescriptor]) -> Result<String, CodegenError> {
        let mut output = String::new();

        for operation in operations {
            output.push_str(&self.generate_method(operation)?);
        }

        Ok(output)
    }

    /// Generates the body struct, its fault accessor and the call stub.
    fn generate_method(&self, operation: &OperationDescriptor) -> Result<String, CodegenError> {
        let mut output = String::new();
        let name = &operation.name;
        let body = format!("{name}Body");
        let input = self.payload_type(operation, &operation.input, "input")?;
        let output_type = operation
            .output
            .as_ref()
            .map(|out| self.payload_type(operation, out, "output"))
            .transpose()?;

        let mut rows = vec![vec![
            "Req".to_string(),
            format!("*{input}"),
            format!(
                "`xml:\"{} {},omitempty\"`",
                operation.namespace, operation.request_element
            ),
        ]];
        if let Some(output_type) = &output_type {
            rows.push(vec![
                "Res".to_string(),
                format!("*{output_type}"),
                format!("`xml:\"{},omitempty\"`", operation.response_element),
            ]);
        }
        rows.push(vec![
            "Fault_".to_string(),
            "*soap.Fault".to_string(),
            FAULT_TAG.to_string(),
        ]);

        output.push_str(&format!("type {body} struct {{\n"));
        output.push_str(&align(&rows));
        output.push_str("}\n\n");

        output.push_str(&format!(
            "func (b *{body}) Fault() *soap.Fault {{ return b.Fault_ }}\n\n"
        ));

        match &output_type {
            Some(output_type) => {
                output.push_str(&format!(
                    "func {name}(ctx context.Context, r soap.RoundTripper, req *{input}) (*{output_type}, error) {{\n"
                ));
                output.push_str(&format!("\tvar reqBody, resBody {body}\n\n"));
                output.push_str("\treqBody.Req = req\n\n");
                output.push_str("\tif err := r.RoundTrip(ctx, &reqBody, &resBody); err != nil {\n");
                output.push_str("\t\treturn nil, err\n");
                output.push_str("\t}\n\n");
                output.push_str("\treturn resBody.Res, nil\n");
            }
            None => {
                output.push_str(&format!(
                    "func {name}(ctx context.Context, r soap.RoundTripper, req *{input}) error {{\n"
                ));
                output.push_str(&format!("\tvar reqBody, resBody {body}\n\n"));
                output.push_str("\treqBody.Req = req\n\n");
                output.push_str("\treturn r.RoundTrip(ctx, &reqBody, &resBody)\n");
            }
        }
        output.push_str("}\n\n");

        Ok(output)
    }

    /// Resolves a request or response payload to a `types` package name.
    fn payload_type(
        &self,
        operation: &OperationDescriptor,
        payload: &TypeRef,
        role: &str,
    ) -> Result<String, CodegenError> {
        if payload.is_builtin() {
            return Err(CodegenError::UnknownType {
                type_name: payload.to_string(),
                field: format!("{} {role}", operation.name),
            });
        }
        if payload.is_local() {
            self.registry.get(&payload.name)?;
            if self.registry.is_abstract_base(&payload.name)? {
                return Err(CodegenError::generation(format!(
                    "operation {} {role} '{}' is an abstract base with no struct",
                    operation.name, payload.name
                )));
            }
        }
        Ok(format!("types.{}", payload.name))
    }
}
