use fnship_build::{
    BuildRunner, CommandRunner, EntryOutcome, build_function, generate_entry_point,
};
use fnship_core::{FunctionUnit, Workspace};
use std::path::Path;
use std::time::{Duration, Instant};

/// Build one function and generate its entry file.
pub async fn build(root: &Path, function: &str) -> anyhow::Result<()> {
    let started = Instant::now();
    let workspace = Workspace::load(root)?;
    let unit = workspace.function(function)?;
    build_entry_point(&workspace, &unit, &CommandRunner)?;

    println!();
    println!(
        "Finished in {} milliseconds",
        format_millis(started.elapsed())
    );
    Ok(())
}

/// Run the package-manager build, then write `dist/index.js` when the
/// output bundles internal packages.
pub(crate) fn build_entry_point(
    workspace: &Workspace,
    function: &FunctionUnit,
    runner: &impl BuildRunner,
) -> anyhow::Result<()> {
    let name = &function.name;

    println!("Building \"{name}\" function...");
    build_function(workspace, function, runner)?;
    println!("Function \"{name}\" built");

    match generate_entry_point(workspace, function)? {
        EntryOutcome::Skipped => {
            println!("Function \"{name}\" has no packages, no entry file needed. Skipping...");
        }
        EntryOutcome::Written { path, aliases } => {
            println!(
                "Function \"{name}\" entry file generated ({aliases} alias{s}): {path}",
                s = if aliases == 1 { "" } else { "es" },
                path = path.display(),
            );
        }
    }

    Ok(())
}

/// Milliseconds with four significant digits.
fn format_millis(elapsed: Duration) -> String {
    let ms = elapsed.as_secs_f64() * 1000.0;
    let int_digits = if ms >= 1.0 {
        ms.log10().floor() as i32 + 1
    } else {
        0
    };
    let decimals = (4 - int_digits).max(0) as usize;
    format!("{ms:.decimals$}")
}
