//! # wsbind Codegen
//!
//! Go binding generation from WSDL schemas.
//!
//! This crate provides:
//! - A type registry that classifies types and derives polymorphic bases
//! - Deterministic ordering and deduplication of emitted entities
//! - Go emitters for enums, structs, interfaces and method stubs
//! - Artifact assembly and output layout

pub mod error;
pub mod generator;
pub mod go;
pub mod ordering;
pub mod output;
pub mod registry;

pub use error::CodegenError;
pub use generator::Generator;
pub use ordering::{Named, partition_enums, sorted_unique};
pub use output::Artifacts;
pub use registry::{Interface, TypeRegistry};

use wsbind_schema::{GeneratorConfig, LoadError, Overlay, Schema, SchemaLoader, TargetPolicy};

/// Generates Go bindings from WSDL text and an optional overlay document.
///
/// # Arguments
/// * `wsdl` - WSDL document content
/// * `overlay` - Overlay YAML content, if any
/// * `target` - Target identifier selecting the output policy
/// * `config` - Generator configuration
///
/// # Returns
/// The four generated artifacts.
///
/// # Errors
/// Returns `CodegenError` if reading, merging, checking or generation fails.
pub fn generate_from_str(
    wsdl: &str,
    overlay: Option<&str>,
    target: &str,
    config: &GeneratorConfig,
) -> Result<Artifacts, CodegenError> {
    let mut schema = wsbind_schema::read(wsdl)?;
    if let Some(overlay) = overlay {
        Overlay::from_yaml(overlay)
            .and_then(|overlay| overlay.merge_into(&mut schema))
            .map_err(LoadError::from)?;
    }
    wsbind_schema::validate_assumptions(&schema)?;
    let policy = config.policy(target).map_err(LoadError::from)?;

    generate(&schema, &policy, &config.license)
}

/// Loads `target` from the configured directories and generates its bindings.
///
/// # Errors
/// Returns `CodegenError` if loading or generation fails.
pub fn generate_from_config(
    config: &GeneratorConfig,
    target: &str,
) -> Result<Artifacts, CodegenError> {
    let loaded = SchemaLoader::new(config).load(target)?;
    generate(&loaded.schema, &loaded.policy, &config.license)
}

/// Builds the registry for `schema` and runs every emission pass.
///
/// # Errors
/// Returns `CodegenError` if generation fails.
pub fn generate(
    schema: &Schema,
    policy: &TargetPolicy,
    license: &str,
) -> Result<Artifacts, CodegenError> {
    let registry = TypeRegistry::build(&schema.types);
    Generator::new(schema, &registry, policy)
        .with_license(license)
        .generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SCENARIO_WSDL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions targetNamespace="urn:vim25"
             xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:vim25="urn:vim25"
             xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <types>
        <xsd:schema targetNamespace="urn:vim25">
            <xsd:simpleType name="Alpha">
                <xsd:restriction base="xsd:string">
                    <xsd:enumeration value="A"/>
                    <xsd:enumeration value="B"/>
                </xsd:restriction>
            </xsd:simpleType>
            <xsd:complexType name="Beta">
                <xsd:complexContent>
                    <xsd:extension base="vim25:Gamma">
                        <xsd:sequence>
                            <xsd:element name="mode" type="vim25:Alpha"/>
                        </xsd:sequence>
                    </xsd:extension>
                </xsd:complexContent>
            </xsd:complexType>
            <xsd:complexType name="Gamma"/>
            <xsd:complexType name="Delta">
                <xsd:sequence>
                    <xsd:element name="x" type="xsd:int"/>
                </xsd:sequence>
            </xsd:complexType>
            <xsd:complexType name="Epsilon">
                <xsd:sequence>
                    <xsd:element name="first" type="xsd:string"/>
                </xsd:sequence>
            </xsd:complexType>
            <xsd:element name="DoThing" type="vim25:Beta"/>
            <xsd:element name="DoThingResponse" type="vim25:Alpha"/>
        </xsd:schema>
        <xsd:schema targetNamespace="urn:vim25">
            <xsd:complexType name="Epsilon">
                <xsd:sequence>
                    <xsd:element name="second" type="xsd:string"/>
                </xsd:sequence>
            </xsd:complexType>
        </xsd:schema>
    </types>
    <message name="DoThingRequestMsg">
        <part name="parameters" element="vim25:DoThing"/>
    </message>
    <message name="DoThingResponseMsg">
        <part name="parameters" element="vim25:DoThingResponse"/>
    </message>
    <portType name="VimPortType">
        <operation name="DoThing">
            <input message="vim25:DoThingRequestMsg"/>
            <output message="vim25:DoThingResponseMsg"/>
        </operation>
    </portType>
</definitions>"#;

    const DELTA_OVERLAY: &str = "\
components:
  schemas:
    Delta:
      properties:
        y:
          type: string
";

    fn generate_vim(overlay: Option<&str>) -> Artifacts {
        let config = GeneratorConfig::default();
        generate_from_str(SCENARIO_WSDL, overlay, "vim", &config).expect("Failed to generate")
    }

    /// Names declared with `type <Name> ` in `code`, in order of appearance.
    fn declared_types(code: &str) -> Vec<&str> {
        code.lines()
            .filter_map(|line| line.strip_prefix("type "))
            .filter_map(|rest| rest.split_whitespace().next())
            .collect()
    }

    #[test]
    fn test_scenario_artifacts() {
        let artifacts = generate_vim(None);

        assert_eq!(declared_types(&artifacts.enums), ["Alpha"]);
        assert_eq!(declared_types(&artifacts.types), ["Beta", "Delta", "Epsilon"]);
        assert_eq!(declared_types(&artifacts.interfaces), ["BaseGamma"]);
        assert_eq!(declared_types(&artifacts.methods), ["DoThingBody"]);
        assert!(artifacts.methods.contains(
            "func DoThing(ctx context.Context, r soap.RoundTripper, req *types.Beta) (*types.Alpha, error) {"
        ));
        assert!(artifacts.interfaces.contains(
            "func (b *Beta) GammaKind() string { return \"Beta\" }"
        ));
    }

    #[test]
    fn test_determinism() {
        assert_eq!(generate_vim(Some(DELTA_OVERLAY)), generate_vim(Some(DELTA_OVERLAY)));
    }

    #[test]
    fn test_duplicate_names_emitted_once() {
        let artifacts = generate_vim(None);

        assert_eq!(artifacts.types.matches("type Epsilon struct").count(), 1);
        assert_eq!(artifacts.types.matches("t[\"Epsilon\"]").count(), 1);
        // The first declaration wins.
        assert!(artifacts.types.contains("`xml:\"first\"`"));
        assert!(!artifacts.types.contains("`xml:\"second\"`"));
    }

    #[test]
    fn test_partition_and_ordering() {
        let artifacts = generate_vim(None);
        let enums = declared_types(&artifacts.enums);
        let types = declared_types(&artifacts.types);

        assert!(enums.iter().all(|name| !types.contains(name)));
        for declared in [&enums, &types] {
            assert!(declared.windows(2).all(|pair| pair[0] < pair[1]));
        }

        // Every registered type except abstract bases lands in one of them.
        let schema = wsbind_schema::read(SCENARIO_WSDL).unwrap();
        let registry = TypeRegistry::build(&schema.types);
        let mut expected: Vec<&str> = schema
            .types
            .iter()
            .map(|t| t.name.as_str())
            .filter(|name| !registry.is_abstract_base(name).unwrap())
            .collect();
        expected.sort_unstable();
        expected.dedup();
        let mut emitted: Vec<&str> = enums.iter().chain(&types).copied().collect();
        emitted.sort_unstable();
        assert_eq!(emitted, expected);
        assert_eq!(expected, ["Alpha", "Beta", "Delta", "Epsilon"]);
    }

    #[test]
    fn test_overlay_merge() {
        let artifacts = generate_vim(Some(DELTA_OVERLAY));

        assert!(artifacts.types.contains(
            "type Delta struct {\n\tX int32  `xml:\"x\"`\n\tY string `xml:\"y,omitempty\"`\n}\n"
        ));
    }

    #[test]
    fn test_root_target_method_imports() {
        let config = GeneratorConfig::default();
        let vim = generate_from_str(SCENARIO_WSDL, None, "vim", &config).unwrap();
        let pbm = generate_from_str(SCENARIO_WSDL, None, "pbm", &config).unwrap();
        let sms = generate_from_str(SCENARIO_WSDL, None, "sms", &config).unwrap();

        assert!(vim.methods.contains("\"github.com/vmware/govmomi/vim25/types\""));
        assert!(pbm.methods.contains("\"github.com/vmware/govmomi/pbm/types\""));
        assert!(sms.methods.contains("\"github.com/vmware/govmomi/sms/types\""));
        for artifacts in [&vim, &pbm, &sms] {
            assert!(artifacts.methods.contains("\"github.com/vmware/govmomi/vim25/soap\""));
        }

        assert!(!vim.types.contains("\"context\""));
        assert!(pbm.types.contains("\"context\""));
        assert!(pbm.types.contains("\ttypes.Add(\"pbm:Beta\", "));
        assert!(pbm.enums.contains("\"github.com/vmware/govmomi/vim25/types\""));
    }

    #[test]
    fn test_abstract_base_payload_rejected() {
        let config = GeneratorConfig::default();
        let wsdl = SCENARIO_WSDL.replace(
            "<xsd:element name=\"DoThing\" type=\"vim25:Beta\"/>",
            "<xsd:element name=\"DoThing\" type=\"vim25:Gamma\"/>",
        );

        let result = generate_from_str(&wsdl, None, "vim", &config);
        assert!(matches!(result, Err(CodegenError::Generation { .. })));
    }

    #[test]
    fn test_overlay_conflict() {
        let config = GeneratorConfig::default();
        let overlay = "components:\n  schemas:\n    Delta:\n      properties:\n        x:\n          type: string\n";

        let result = generate_from_str(SCENARIO_WSDL, Some(overlay), "vim", &config);
        assert!(matches!(result, Err(CodegenError::Load(LoadError::Overlay(_)))));
    }

    #[test]
    fn test_generate_from_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("vim.wsdl"), SCENARIO_WSDL).unwrap();
        fs::create_dir(dir.path().join("sdk")).unwrap();
        fs::write(dir.path().join("sdk/vim.yaml"), DELTA_OVERLAY).unwrap();
        let config = GeneratorConfig::default()
            .with_schema_dir(dir.path())
            .with_overlay_dir(dir.path().join("sdk"));

        let artifacts = generate_from_config(&config, "vim").unwrap();

        assert_eq!(artifacts, generate_vim(Some(DELTA_OVERLAY)));
    }

    #[test]
    fn test_generate_from_config_missing_schema() {
        let dir = TempDir::new().unwrap();
        let config = GeneratorConfig::default().with_schema_dir(dir.path());

        let result = generate_from_config(&config, "vim");
        assert!(matches!(
            result,
            Err(CodegenError::Load(LoadError::SchemaNotFound { .. }))
        ));
    }
}
