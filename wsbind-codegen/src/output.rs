//! Generated artifacts and their on-disk layout.

use crate::error::CodegenError;
use std::fs;
use std::path::{Path, PathBuf};

/// Enum artifact path, relative to the output directory.
pub const ENUMS_FILE: &str = "types/enum.go";
/// Composite artifact path.
pub const TYPES_FILE: &str = "types/types.go";
/// Interface artifact path.
pub const INTERFACES_FILE: &str = "types/if.go";
/// Method artifact path.
pub const METHODS_FILE: &str = "methods/methods.go";

/// Contents of the four generated files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    /// Enum definitions.
    pub enums: String,
    /// Composite definitions.
    pub types: String,
    /// Interface definitions.
    pub interfaces: String,
    /// Method stubs.
    pub methods: String,
}

impl Artifacts {
    /// Returns each artifact with its relative path, in write order.
    #[must_use]
    pub fn files(&self) -> [(&'static str, &str); 4] {
        [
            (ENUMS_FILE, self.enums.as_str()),
            (TYPES_FILE, self.types.as_str()),
            (INTERFACES_FILE, self.interfaces.as_str()),
            (METHODS_FILE, self.methods.as_str()),
        ]
    }

    /// Writes the artifacts under `dir`, creating `types/` and `methods/`.
    ///
    /// Files are written one at a time; the first failure stops the run and
    /// leaves earlier files in place.
    ///
    /// # Returns
    /// Paths of the written files.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if a directory or file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, CodegenError> {
        let mut written = Vec::with_capacity(4);

        for (relative, contents) in self.files() {
            let path = dir.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, contents)?;
            tracing::info!("wrote {}", path.display());
            written.push(path);
        }

        Ok(written)
    }
}
