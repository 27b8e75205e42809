//! Command-line front end.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use wsbind_codegen::{Generator, TypeRegistry};
use wsbind_schema::{GeneratorConfig, SchemaLoader};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "wsbind")]
#[command(about = "Generate Go SOAP bindings from a WSDL schema", long_about = None)]
pub struct Args {
    /// Output directory (receives types/ and methods/)
    pub out_dir: PathBuf,

    /// Target to generate bindings for (vim, pbm, ...)
    pub target: String,

    /// Directory holding <TARGET>.wsdl
    #[arg(long)]
    pub schema_dir: Option<PathBuf>,

    /// Directory holding the optional <TARGET>.yaml overlay
    #[arg(long)]
    pub overlay_dir: Option<PathBuf>,

    /// Generator configuration (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// What a run produced.
#[derive(Debug)]
pub struct Summary {
    /// Distinct type names.
    pub classes: usize,
    /// Synthesized interfaces.
    pub interfaces: usize,
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
}

impl Args {
    /// Resolves the generator configuration, applying directory overrides.
    ///
    /// # Errors
    /// Returns an error if the configuration file cannot be loaded.
    pub fn config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };
        if let Some(dir) = &self.schema_dir {
            config = config.with_schema_dir(dir);
        }
        if let Some(dir) = &self.overlay_dir {
            config = config.with_overlay_dir(dir);
        }
        Ok(config)
    }
}

/// Runs one generation.
///
/// The class and interface counts are written to `out` once the registry is
/// built, before any artifact is written.
///
/// # Errors
/// Returns an error if the output directory is missing, or if loading,
/// generation or writing fails.
pub fn run(args: &Args, out: &mut impl Write) -> Result<Summary> {
    if !args.out_dir.is_dir() {
        bail!("{} is not a directory", args.out_dir.display());
    }

    let config = args.config()?;
    let loaded = SchemaLoader::new(&config)
        .load(&args.target)
        .with_context(|| format!("failed to load target '{}'", args.target))?;

    let registry = TypeRegistry::build(&loaded.schema.types);
    let classes = registry.len();
    let interfaces = registry.interface_count();
    writeln!(out, "{classes} classes, {interfaces} interfaces")?;

    let artifacts = Generator::new(&loaded.schema, &registry, &loaded.policy)
        .with_license(config.license.as_str())
        .generate()
        .with_context(|| format!("failed to generate target '{}'", args.target))?;

    let written = artifacts
        .write_to(&args.out_dir)
        .with_context(|| format!("failed to write to {}", args.out_dir.display()))?;

    tracing::info!("generated {} files for {}", written.len(), args.target);

    Ok(Summary {
        classes,
        interfaces,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const WSDL: &str = r#"<definitions targetNamespace="urn:vim25"
            xmlns:vim25="urn:vim25" xmlns:xsd="http://www.w3.org/2001/XMLSchema">
        <types><xsd:schema targetNamespace="urn:vim25">
            <xsd:simpleType name="Alpha">
                <xsd:restriction base="xsd:string">
                    <xsd:enumeration value="A"/>
                </xsd:restriction>
            </xsd:simpleType>
            <xsd:complexType name="Gamma"/>
            <xsd:complexType name="Beta">
                <xsd:complexContent><xsd:extension base="vim25:Gamma"/></xsd:complexContent>
            </xsd:complexType>
        </xsd:schema></types>
    </definitions>"#;

    fn args(out_dir: PathBuf, schema_dir: PathBuf) -> Args {
        Args {
            out_dir,
            target: "vim".to_string(),
            schema_dir: Some(schema_dir),
            overlay_dir: None,
            config: None,
        }
    }

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "wsbind",
            "out",
            "pbm",
            "--schema-dir",
            "wsdl",
            "--config",
            "wsbind.toml",
        ])
        .unwrap();

        assert_eq!(args.out_dir, PathBuf::from("out"));
        assert_eq!(args.target, "pbm");
        assert_eq!(args.schema_dir, Some(PathBuf::from("wsdl")));
        assert!(args.overlay_dir.is_none());
        assert_eq!(args.config, Some(PathBuf::from("wsbind.toml")));
    }

    #[test]
    fn test_run_writes_artifacts() {
        let schema_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        fs::write(schema_dir.path().join("vim.wsdl"), WSDL).unwrap();
        let args = args(out_dir.path().to_path_buf(), schema_dir.path().to_path_buf());

        let mut stdout = Vec::new();
        let summary = run(&args, &mut stdout).unwrap();

        assert_eq!(String::from_utf8(stdout).unwrap(), "3 classes, 1 interfaces\n");
        assert_eq!(summary.classes, 3);
        assert_eq!(summary.interfaces, 1);
        assert_eq!(summary.written.len(), 4);
        assert!(out_dir.path().join("types/if.go").is_file());
    }

    #[test]
    fn test_run_requires_output_directory() {
        let schema_dir = TempDir::new().unwrap();
        let missing = schema_dir.path().join("missing");
        let args = args(missing, schema_dir.path().to_path_buf());

        let mut stdout = Vec::new();
        assert!(run(&args, &mut stdout).is_err());
        assert!(stdout.is_empty());
    }

    #[test]
    fn test_run_missing_schema_prints_nothing() {
        let schema_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let args = args(out_dir.path().to_path_buf(), schema_dir.path().to_path_buf());

        let mut stdout = Vec::new();
        let err = run(&args, &mut stdout).unwrap_err();

        assert!(format!("{err:#}").contains("not found"));
        assert!(stdout.is_empty());
        assert!(!out_dir.path().join("types").exists());
    }

    #[test]
    fn test_config_file_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wsbind.toml");
        fs::write(&path, "license = \"\"\nschema_dir = \"from-file\"\n").unwrap();
        let args = Args {
            out_dir: dir.path().to_path_buf(),
            target: "vim".to_string(),
            schema_dir: None,
            overlay_dir: Some(PathBuf::from("overlays")),
            config: Some(path),
        };

        let config = args.config().unwrap();

        assert_eq!(config.schema_dir, PathBuf::from("from-file"));
        assert_eq!(config.overlay_dir, PathBuf::from("overlays"));
        assert!(config.license.is_empty());
    }
}
