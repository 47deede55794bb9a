use fnship_build::{CommandRunner, copy_lockfile};
use fnship_cloud::{FunctionDeploy, GcloudClient};
use fnship_core::Workspace;
use std::path::Path;

/// Execute the full deploy pipeline: build → entry file → lockfile → gcloud.
pub async fn deploy(root: &Path, function: &str, dry_run: bool) -> anyhow::Result<()> {
    let workspace = Workspace::load(root)?;
    let config = workspace.config();
    let unit = workspace.function(function)?;
    let client = GcloudClient::from_config(config);

    println!("Preparing function \"{function}\" for deploy...");

    // Pre-flight: fail before building if gcloud cannot run
    if !dry_run {
        let version = client.check_installed().await?;
        tracing::debug!(%version, "gcloud available");
    }

    super::build::build_entry_point(&workspace, &unit, &CommandRunner)?;

    // Lockfile only after a successful build
    let lockfile = copy_lockfile(&workspace, &unit)?;
    println!("{} copied", config.layout.lockfile);
    tracing::debug!(path = %lockfile.display(), "lockfile in place");

    let params = FunctionDeploy::from_config(config, &unit)?;
    println!("Deploy cmd: {}", params.command_line(&config.deploy.gcloud));

    if dry_run {
        println!("Dry run: gcloud not invoked");
        return Ok(());
    }

    client.deploy_function(&params).await?;

    println!();
    println!("Deployed: {function}");
    Ok(())
}
