//! Configuration module - Catalog locations, constants and `config.toml` settings

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::{Error, Result};

/// Tokens with a fixed meaning inside catalogs and templates
pub mod tokens {
    /// Stands for the project name inside captured template content
    pub const PLACEHOLDER: &str = "{FLUTTER_ASSIST}";

    /// Type tag that applies regardless of the selected types
    pub const ALL: &str = "ALL";
}

/// File and directory names under the catalog root
pub mod files {
    /// Directory holding every catalog file
    pub const UTIL_DIR: &str = "template_util";

    /// Package catalog (also the name of the project-local manifest)
    pub const PACKAGES: &str = "packages.json";

    /// Template-for type catalog
    pub const TEMPLATE_FOR: &str = "template_for.json";

    /// Directory of per-file templates
    pub const TEMPLATES_DIR: &str = "templates";

    /// Optional settings file
    pub const CONFIG: &str = "config.toml";

    /// Extension of stored templates
    pub const TEMPLATE_EXT: &str = "json";
}

/// External commands and their default names
pub mod commands {
    /// Project generator (`<generator> create <name>`)
    pub const GENERATOR: &str = "flutter";

    /// Package manager (`<package_manager> pub add <package>`)
    pub const PACKAGE_MANAGER: &str = "flutter";
}

/// Mode for directories created while materializing templates
pub const DIR_MODE: u32 = 0o755;

/// Environment variable that points at the catalog root
pub const HOME_ENV: &str = "FLUTTER_ASSIST_HOME";

/// Resolved locations of the catalog files
#[derive(Debug, Clone)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use the explicit root when given, the executable's directory otherwise
    pub fn resolve(root: Option<PathBuf>) -> Result<Self> {
        match root {
            Some(root) => Ok(Self::new(root)),
            None => {
                let exe = std::env::current_exe().map_err(Error::ExecutablePathUnavailable)?;
                let dir = exe.parent().ok_or_else(|| {
                    Error::ExecutablePathUnavailable(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "executable has no parent directory",
                    ))
                })?;
                Ok(Self::new(dir))
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn util_dir(&self) -> PathBuf {
        self.root.join(files::UTIL_DIR)
    }

    pub fn packages_file(&self) -> PathBuf {
        self.util_dir().join(files::PACKAGES)
    }

    pub fn template_for_file(&self) -> PathBuf {
        self.util_dir().join(files::TEMPLATE_FOR)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.util_dir().join(files::TEMPLATES_DIR)
    }

    pub fn config_file(&self) -> PathBuf {
        self.util_dir().join(files::CONFIG)
    }
}

/// Contents of `template_util/config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub generator: String,
    pub package_manager: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            generator: commands::GENERATOR.to_string(),
            package_manager: commands::PACKAGE_MANAGER.to_string(),
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when the file is absent
    pub fn load(paths: &Paths) -> Result<Self> {
        let path = paths.config_file();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(Error::read(path, err)),
        };
        toml::from_str(&content).map_err(|source| Error::Config { path, source })
    }
}
