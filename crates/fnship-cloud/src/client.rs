use crate::executor::{GcloudExecutor, RealExecutor};
use crate::gcloud::GcloudError;
use fnship_core::{FnshipConfig, FunctionUnit};
use std::path::PathBuf;

/// GCP operations client, parameterized over the executor for testability.
pub struct GcloudClient<E: GcloudExecutor = RealExecutor> {
    executor: E,
}

impl GcloudClient<RealExecutor> {
    /// Client for the gcloud binary configured under `[deploy].gcloud`.
    pub fn from_config(config: &FnshipConfig) -> Self {
        Self {
            executor: RealExecutor::new(config.deploy.gcloud.clone()),
        }
    }
}

impl<E: GcloudExecutor> GcloudClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Preflight ──

    /// Confirm the gcloud CLI runs; returns its reported version.
    pub async fn check_installed(&self) -> Result<String, DeployError> {
        self.executor
            .exec(&args(["version", "--format", "value(version)"]))
            .await
            .map(|v| v.trim().to_owned())
            .map_err(|e| DeployError::GcloudNotInstalled { source: e })
    }

    // ── Cloud Functions Deploy ──

    /// Run `gcloud functions deploy`, streaming its output to the terminal.
    pub async fn deploy_function(&self, deploy: &FunctionDeploy) -> Result<(), DeployError> {
        tracing::debug!(args = ?deploy.args(), "deploying function");
        self.executor
            .exec_streaming(&deploy.args())
            .await
            .map_err(|e| DeployError::Deploy {
                function: deploy.name.clone(),
                source: e,
            })
    }
}

/// Parameters of one `gcloud functions deploy` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDeploy {
    pub name: String,
    /// Function directory uploaded as the source
    pub source: String,
    pub runtime: String,
    pub entry_point: String,
    pub region: Option<String>,
    pub project_id: Option<String>,
    /// `KEY=VALUE` pairs, already sorted by key
    pub env: Vec<(String, String)>,
}

impl FunctionDeploy {
    /// Derive the deploy parameters for `function` from `[deploy]` and any
    /// per-function overrides.
    pub fn from_config(
        config: &FnshipConfig,
        function: &FunctionUnit,
    ) -> Result<Self, DeployError> {
        let source = function
            .dir
            .to_str()
            .ok_or_else(|| DeployError::InvalidPath(function.dir.clone()))?
            .to_owned();

        Ok(Self {
            name: function.name.clone(),
            source,
            runtime: config.deploy.runtime.clone(),
            entry_point: config.entry_point_for(&function.name),
            region: config.deploy.region.clone(),
            project_id: config.deploy.gcp_project_id.clone(),
            env: config
                .deploy
                .env
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    /// gcloud arguments, without the program name.
    pub fn args(&self) -> Vec<String> {
        let mut cmd = args([
            "functions",
            "deploy",
            &self.name,
            "--source",
            &self.source,
            "--runtime",
            &self.runtime,
            "--trigger-http",
            "--entry-point",
            &self.entry_point,
        ]);

        if let Some(region) = &self.region {
            cmd.extend(args(["--region", region.as_str()]));
        }
        if let Some(project) = &self.project_id {
            cmd.extend(args(["--project", project.as_str()]));
        }
        if !self.env.is_empty() {
            let vars = self
                .env
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(",");
            cmd.extend(["--set-env-vars".to_owned(), vars]);
        }

        cmd
    }

    /// Full command line for display.
    pub fn command_line(&self, program: &str) -> String {
        std::iter::once(program.to_owned())
            .chain(self.args())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("gcloud CLI is not available")]
    GcloudNotInstalled { source: GcloudError },

    #[error("function source path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("deployment of function \"{function}\" failed")]
    Deploy {
        function: String,
        source: GcloudError,
    },
}
