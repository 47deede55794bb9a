use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Name of the optional configuration file at the repository root.
pub const CONFIG_FILE: &str = "fnship.toml";

/// fnship.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FnshipConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub deploy: DeployConfig,
    /// Per-function overrides, keyed by function directory name.
    #[serde(default)]
    pub functions: HashMap<String, FunctionOverrides>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Directory holding one subdirectory per function
    #[serde(default = "default_functions_dir")]
    pub functions_dir: String,
    /// Directory holding one subdirectory per internal package
    #[serde(default = "default_packages_dir")]
    pub packages_dir: String,
    /// Build output directory inside each function
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,
    /// Generated entry file name inside the build output
    #[serde(default = "default_entry_file")]
    pub entry_file: String,
    /// Lockfile copied from the repository root before deploy
    #[serde(default = "default_lockfile")]
    pub lockfile: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Package manager used as `<pm> workspace <name> build`
    #[serde(default = "default_package_manager")]
    pub package_manager: String,
    /// Dependency every function manifest must declare
    #[serde(default = "default_required_dependency")]
    pub required_dependency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Cloud Functions runtime identifier
    #[serde(default = "default_runtime")]
    pub runtime: String,
    /// gcloud binary
    #[serde(default = "default_gcloud")]
    pub gcloud: String,
    /// Exported handler symbol. When unset it is derived from the
    /// function name (`funny-world` -> `funnyWorld`).
    pub entry_point: Option<String>,
    pub region: Option<String>,
    pub gcp_project_id: Option<String>,
    /// Runtime environment variables passed with `--set-env-vars`
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionOverrides {
    pub entry_point: Option<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            functions_dir: default_functions_dir(),
            packages_dir: default_packages_dir(),
            dist_dir: default_dist_dir(),
            entry_file: default_entry_file(),
            lockfile: default_lockfile(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            package_manager: default_package_manager(),
            required_dependency: default_required_dependency(),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            gcloud: default_gcloud(),
            entry_point: None,
            region: None,
            gcp_project_id: None,
            env: BTreeMap::new(),
        }
    }
}

impl FnshipConfig {
    /// Load from fnship.toml at the given path, or return defaults if not found.
    pub fn load(root: &std::path::Path) -> crate::Result<Self> {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Handler symbol for `function`: per-function override, then
    /// `[deploy].entry_point`, then the camel-cased function name.
    pub fn entry_point_for(&self, function: &str) -> String {
        self.functions
            .get(function)
            .and_then(|f| f.entry_point.clone())
            .or_else(|| self.deploy.entry_point.clone())
            .unwrap_or_else(|| lower_camel_case(function))
    }
}

/// `funny-world` -> `funnyWorld`, `send_mail` -> `sendMail`.
pub fn lower_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '-' || c == '_' || c == '.' || c == ' ' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn default_functions_dir() -> String {
    "functions".to_owned()
}

fn default_packages_dir() -> String {
    "packages".to_owned()
}

fn default_dist_dir() -> String {
    "dist".to_owned()
}

fn default_entry_file() -> String {
    "index.js".to_owned()
}

fn default_lockfile() -> String {
    "yarn.lock".to_owned()
}

fn default_package_manager() -> String {
    "yarn".to_owned()
}

fn default_required_dependency() -> String {
    "module-alias".to_owned()
}

fn default_runtime() -> String {
    "nodejs20".to_owned()
}

fn default_gcloud() -> String {
    "gcloud".to_owned()
}
