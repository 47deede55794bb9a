use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const MANIFEST_FILE: &str = "package.json";

/// The subset of a `package.json` that fnship reads.
///
/// `name` is required; a manifest without it is treated as malformed.
/// A missing `dependencies` object reads as empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

impl PackageManifest {
    /// Read `<dir>/package.json`.
    pub fn load(dir: &Path) -> crate::Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| crate::Error::ManifestRead {
            path: path.clone(),
            source: e,
        })?;

        Self::parse(&content).map_err(|e| crate::Error::ManifestParse { path, source: e })
    }

    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn depends_on(&self, package: &str) -> bool {
        self.dependencies.contains_key(package)
    }
}
