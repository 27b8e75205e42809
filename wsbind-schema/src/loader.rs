//! Target schema loading.
//!
//! Locates a target's WSDL and optional overlay, merges them and checks the
//! result before anything downstream sees it.

use crate::config::{GeneratorConfig, TargetPolicy};
use crate::error::LoadError;
use crate::overlay::Overlay;
use crate::parser;
use crate::types::Schema;
use crate::validation::validate_assumptions;
use std::path::Path;

/// Merged, checked schema of one target together with its output policy.
#[derive(Debug, Clone)]
pub struct LoadedSchema {
    /// Primary declarations with overlay fields merged in.
    pub schema: Schema,
    /// Output conventions for the target.
    pub policy: TargetPolicy,
}

/// Loads target schemas according to a generator configuration.
#[derive(Debug)]
pub struct SchemaLoader<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> SchemaLoader<'a> {
    /// Creates a loader over `config`.
    #[must_use]
    pub const fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Loads, merges and checks the schema of `target`.
    ///
    /// # Errors
    /// Returns `LoadError::SchemaNotFound` if `<schema_dir>/<target>.wsdl`
    /// does not exist, and the corresponding variant for read, parse, merge,
    /// check or policy failures.
    pub fn load(&self, target: &str) -> Result<LoadedSchema, LoadError> {
        let policy = self.config.policy(target)?;

        let schema_path = self.config.schema_path(target);
        if !schema_path.is_file() {
            return Err(LoadError::SchemaNotFound {
                target: target.to_string(),
                path: schema_path,
            });
        }

        let xml = read(&schema_path)?;
        let mut schema = parser::read(&xml)?;
        tracing::info!(
            "read {} types and {} operations from {}",
            schema.types.len(),
            schema.operations.len(),
            schema_path.display()
        );

        let overlay_path = self.config.overlay_path(target);
        if overlay_path.is_file() {
            let overlay = Overlay::from_yaml(&read(&overlay_path)?)?;
            let added = overlay.merge_into(&mut schema)?;
            tracing::info!(
                "merged {} overlay fields from {}",
                added,
                overlay_path.display()
            );
        } else {
            tracing::debug!("no overlay at {}", overlay_path.display());
        }

        validate_assumptions(&schema)?;

        Ok(LoadedSchema { schema, policy })
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
