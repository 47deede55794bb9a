use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid function name {name:?}: {reason}")]
    InvalidFunctionName { name: String, reason: &'static str },

    #[error("function \"{name}\" does not exist (looked in {dir})")]
    FunctionNotFound { name: String, dir: PathBuf },

    // ── package.json ──
    #[error("failed to read manifest {path}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest {path}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Error {
    /// True for both manifest variants, i.e. the manifest was missing,
    /// unreadable, or not a valid `package.json`.
    pub fn is_manifest_error(&self) -> bool {
        matches!(self, Self::ManifestRead { .. } | Self::ManifestParse { .. })
    }
}
