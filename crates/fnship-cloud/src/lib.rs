pub mod client;
pub mod executor;
pub mod gcloud;

pub use client::{DeployError, FunctionDeploy, GcloudClient};
pub use executor::{GcloudExecutor, RealExecutor};
