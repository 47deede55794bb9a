use fnship_core::{FunctionUnit, PackageManifest, Workspace};
use std::path::Path;
use std::process::Command;

/// Runs the package manager for a function build.
///
/// Production code uses [`CommandRunner`]; tests substitute a mock.
pub trait BuildRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<(), BuildError>;
}

/// Runs the command as a child process and waits for it.
pub struct CommandRunner;

impl BuildRunner for CommandRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<(), BuildError> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|e| BuildError::Spawn {
                command: command_line(program, args),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BuildError::CommandFailed {
                command: command_line(program, args),
                status: output.status.to_string(),
                stderr: stderr.trim().to_owned(),
            });
        }

        Ok(())
    }
}

/// Build one function with `<package manager> workspace <name> build`.
///
/// The function's `package.json` must declare the configured required
/// dependency (`module-alias` by default); this is checked before anything
/// runs.
pub fn build_function(
    workspace: &Workspace,
    function: &FunctionUnit,
    runner: &impl BuildRunner,
) -> Result<(), BuildError> {
    let manifest = PackageManifest::load(&function.dir).map_err(|e| BuildError::Manifest {
        function: function.name.clone(),
        source: e,
    })?;

    let required = &workspace.config().build.required_dependency;
    if !manifest.depends_on(required) {
        return Err(BuildError::MissingDependency {
            function: function.name.clone(),
            dependency: required.clone(),
        });
    }

    let program = &workspace.config().build.package_manager;
    let args = build_args(&manifest);
    tracing::debug!(command = %command_line(program, &args), "running function build");

    runner.run(program, &args, workspace.root())
}

fn build_args(manifest: &PackageManifest) -> Vec<String> {
    vec![
        "workspace".to_owned(),
        manifest.name.clone(),
        "build".to_owned(),
    ]
}

fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to read package.json of function \"{function}\"")]
    Manifest {
        function: String,
        source: fnship_core::Error,
    },
    #[error("function \"{function}\" package.json does not include the \"{dependency}\" dependency")]
    MissingDependency {
        function: String,
        dependency: String,
    },
    #[error("failed to run `{command}`")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
}
