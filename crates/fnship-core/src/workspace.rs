//! Repository layout resolution.
//!
//! A [`Workspace`] is the repository root together with its loaded
//! [`FnshipConfig`]. Every path the build and deploy steps touch is derived
//! from it, so commands receive their configuration explicitly instead of
//! reading process-wide state.

use crate::config::FnshipConfig;
use std::path::{Path, PathBuf};

/// The repository being operated on.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: FnshipConfig,
}

/// One deployable function directory.
///
/// Only obtainable through [`Workspace::function`], which checks the
/// directory exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionUnit {
    pub name: String,
    /// `<functions_dir>/<name>`
    pub dir: PathBuf,
    /// `<functions_dir>/<name>/<dist_dir>`
    pub dist_dir: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, config: FnshipConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Load `fnship.toml` from `root` (defaults when absent).
    pub fn load(root: impl Into<PathBuf>) -> crate::Result<Self> {
        let root = root.into();
        let config = FnshipConfig::load(&root)?;
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &FnshipConfig {
        &self.config
    }

    pub fn functions_root(&self) -> PathBuf {
        self.root.join(&self.config.layout.functions_dir)
    }

    pub fn packages_root(&self) -> PathBuf {
        self.root.join(&self.config.layout.packages_dir)
    }

    pub fn lockfile(&self) -> PathBuf {
        self.root.join(&self.config.layout.lockfile)
    }

    /// Resolve a function by name.
    ///
    /// The name must be a single path component; the directory must exist.
    pub fn function(&self, name: &str) -> crate::Result<FunctionUnit> {
        validate_function_name(name)?;

        let dir = self.functions_root().join(name);
        if !dir.is_dir() {
            return Err(crate::Error::FunctionNotFound {
                name: name.to_owned(),
                dir,
            });
        }

        let dist_dir = dir.join(&self.config.layout.dist_dir);
        Ok(FunctionUnit {
            name: name.to_owned(),
            dir,
            dist_dir,
        })
    }
}

impl FunctionUnit {
    /// `<dist>/packages`, where the build places bundled internal packages.
    pub fn bundled_packages_dir(&self) -> PathBuf {
        self.dist_dir.join("packages")
    }
}

fn validate_function_name(name: &str) -> crate::Result<()> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name == "." || name == ".." {
        Some("must not be a relative directory")
    } else if name.contains(['/', '\\']) {
        Some("must be a single directory name")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(crate::Error::InvalidFunctionName {
            name: name.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}
