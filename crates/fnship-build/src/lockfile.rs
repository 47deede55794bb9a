use fnship_core::{FunctionUnit, Workspace};
use std::path::PathBuf;

/// Copy the repository lockfile into the function directory so the cloud
/// build installs the same dependency versions.
///
/// Overwrites a lockfile left by a previous deploy.
pub fn copy_lockfile(
    workspace: &Workspace,
    function: &FunctionUnit,
) -> Result<PathBuf, LockfileError> {
    let src = workspace.lockfile();
    let dst = match src.file_name() {
        Some(name) if src.is_file() => function.dir.join(name),
        _ => return Err(LockfileError::Missing(src.clone())),
    };

    std::fs::copy(&src, &dst).map_err(|e| LockfileError::Copy {
        from: src.clone(),
        to: dst.clone(),
        source: e,
    })?;

    tracing::debug!(from = %src.display(), to = %dst.display(), "lockfile copied");
    Ok(dst)
}

#[derive(Debug, thiserror::Error)]
pub enum LockfileError {
    #[error("lockfile not found at {0}")]
    Missing(PathBuf),
    #[error("failed to copy lockfile {from} to {to}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}
