//! Generator configuration and per-target output policy.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default Go module the generated packages live in.
pub const DEFAULT_MODULE_PATH: &str = "github.com/vmware/govmomi";

/// Default root target.
pub const DEFAULT_ROOT_TARGET: &str = "vim";

/// Default license notice placed at the top of every artifact.
pub const DEFAULT_LICENSE: &str = "\
Copyright (c) 2014-2024 VMware, Inc. All Rights Reserved.

Licensed under the Apache License, Version 2.0 (the \"License\");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an \"AS IS\" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.";

/// Generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Go module path generated imports are rooted at.
    pub module_path: String,
    /// Target whose types every other target builds on.
    pub root_target: String,
    /// Directory holding `<target>.wsdl`.
    pub schema_dir: PathBuf,
    /// Directory holding the optional `<target>.yaml` overlays.
    pub overlay_dir: PathBuf,
    /// License notice emitted at the top of each artifact.
    pub license: String,
    /// Per-target overrides.
    pub targets: BTreeMap<String, TargetConfig>,
}

/// Per-target overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Directory under the module path holding the target's packages.
    pub import_dir: Option<String>,
    /// Namespace prefix used in type registration keys.
    pub namespace: Option<String>,
}

fn default_targets() -> BTreeMap<String, TargetConfig> {
    let mut targets = BTreeMap::new();
    targets.insert(
        DEFAULT_ROOT_TARGET.to_string(),
        TargetConfig {
            import_dir: Some("vim25".to_string()),
            namespace: Some("vim25".to_string()),
        },
    );
    targets
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let targets = default_targets();

        Self {
            module_path: DEFAULT_MODULE_PATH.to_string(),
            root_target: DEFAULT_ROOT_TARGET.to_string(),
            schema_dir: PathBuf::from("."),
            overlay_dir: PathBuf::from("sdk"),
            license: DEFAULT_LICENSE.to_string(),
            targets,
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text. Missing keys take defaults.
    ///
    /// Target tables are layered over the built-in ones field by field, so a
    /// file that only configures `sms` still keeps the root's `vim25` layout.
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` on invalid TOML.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        for (name, defaults) in default_targets() {
            let entry = config.targets.entry(name).or_default();
            if entry.import_dir.is_none() {
                entry.import_dir = defaults.import_dir;
            }
            if entry.namespace.is_none() {
                entry.namespace = defaults.namespace;
            }
        }
        Ok(config)
    }

    /// Sets the schema directory.
    #[must_use]
    pub fn with_schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schema_dir = dir.into();
        self
    }

    /// Sets the overlay directory.
    #[must_use]
    pub fn with_overlay_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.overlay_dir = dir.into();
        self
    }

    /// Resolves the output policy for `target`.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidTarget` if the target or the configured
    /// root target is not a plain identifier.
    pub fn policy(&self, target: &str) -> Result<TargetPolicy, ConfigError> {
        check_target(target)?;
        check_target(&self.root_target)?;

        let (import_dir, namespace) = self.dirs(target);
        let (root_import_dir, _) = self.dirs(&self.root_target);

        Ok(TargetPolicy {
            name: target.to_string(),
            is_root: target == self.root_target,
            import_dir,
            namespace,
            root_import_dir,
            module_path: self.module_path.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the primary schema path for `target`.
    #[must_use]
    pub fn schema_path(&self, target: &str) -> PathBuf {
        self.schema_dir.join(format!("{target}.wsdl"))
    }

    /// Returns the overlay path for `target`.
    #[must_use]
    pub fn overlay_path(&self, target: &str) -> PathBuf {
        self.overlay_dir.join(format!("{target}.yaml"))
    }

    fn dirs(&self, target: &str) -> (String, String) {
        let entry = self.targets.get(target);
        let import_dir = entry
            .and_then(|t| t.import_dir.clone())
            .unwrap_or_else(|| target.to_string());
        let namespace = entry
            .and_then(|t| t.namespace.clone())
            .unwrap_or_else(|| target.to_string());
        (import_dir, namespace)
    }
}

fn check_target(target: &str) -> Result<(), ConfigError> {
    let valid = !target.is_empty()
        && target
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidTarget(target.to_string()))
    }
}

/// Output conventions for one target, resolved once by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPolicy {
    /// Target identifier.
    pub name: String,
    /// True for the target every other target builds on.
    pub is_root: bool,
    /// Directory under the module path holding this target's packages.
    pub import_dir: String,
    /// Namespace prefix used in registration keys.
    pub namespace: String,
    /// Directory of the root target's packages.
    pub root_import_dir: String,
    /// Go module path.
    pub module_path: String,
}

impl TargetPolicy {
    /// Import path of this target's `types` package.
    #[must_use]
    pub fn types_import(&self) -> String {
        format!("{}/{}/types", self.module_path, self.import_dir)
    }

    /// Import path of the root target's `types` package.
    #[must_use]
    pub fn root_types_import(&self) -> String {
        format!("{}/{}/types", self.module_path, self.root_import_dir)
    }

    /// Import path of the SOAP transport package.
    #[must_use]
    pub fn soap_import(&self) -> String {
        format!("{}/{}/soap", self.module_path, self.root_import_dir)
    }

    /// Key a generated type registers itself under.
    ///
    /// Root types register bare; other targets qualify the name with their
    /// namespace so both can share one type table.
    #[must_use]
    pub fn registration_key(&self, type_name: &str) -> String {
        if self.is_root {
            type_name.to_string()
        } else {
            format!("{}:{}", self.namespace, type_name)
        }
    }
}
