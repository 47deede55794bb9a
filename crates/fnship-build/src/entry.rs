use fnship_core::{FunctionUnit, PackageManifest, Workspace};
use std::path::{Path, PathBuf};

/// Directory name, shared by the build output and the repository, under
/// which internal packages live.
const BUNDLED_PACKAGES_DIR: &str = "packages";

/// An internal package the build bundled into a function's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalPackage {
    /// Directory name under `<dist>/packages/` (and under the packages root)
    pub dir_name: String,
    /// Manifest read from `<packages root>/<dir_name>/package.json`
    pub manifest: PackageManifest,
}

/// One `moduleAlias.addAliases` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    /// Declared package name, e.g. `@org/utils`
    pub name: String,
    /// Package directory name, e.g. `utils`
    pub package_dir: String,
}

impl AliasEntry {
    /// Path the alias resolves to, relative to the generated entry file.
    ///
    /// Always `packages/<dir>/src`, whatever name the manifest declares.
    pub fn target(&self) -> String {
        format!("{BUNDLED_PACKAGES_DIR}/{}/src", self.package_dir)
    }

    /// `"<name>": path.join(__dirname, "packages/<dir>/src")`
    pub fn render(&self) -> String {
        format!(
            "{}: path.join(__dirname, {})",
            js_string(&self.name),
            js_string(&self.target()),
        )
    }
}

/// Rendered loader module for one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFile {
    aliases: Vec<AliasEntry>,
    contents: String,
}

impl EntryFile {
    /// Render the loader: alias registration first, then the re-export of
    /// the compiled handler.
    pub fn render(functions_dir: &str, function_name: &str, aliases: Vec<AliasEntry>) -> Self {
        let entries = aliases
            .iter()
            .map(AliasEntry::render)
            .collect::<Vec<_>>()
            .join(",\n  ");
        let handler = js_string(&format!("./{functions_dir}/{function_name}/src/index"));

        let contents = format!(
            r#"const path = require("path");
const moduleAlias = require("module-alias");

moduleAlias.addAliases({{
  {entries}
}});

module.exports = require({handler});
"#
        );

        Self { aliases, contents }
    }

    pub fn aliases(&self) -> &[AliasEntry] {
        &self.aliases
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

/// Result of entry-file synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synthesis {
    /// The build output has no internal packages; the compiled handler is
    /// used as-is.
    Skip,
    Generated(EntryFile),
}

/// What [`generate_entry_point`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Skipped,
    Written { path: PathBuf, aliases: usize },
}

/// Compute the entry file for an already-built function.
///
/// Reads `<dist>/packages/` and the manifests of the packages found there;
/// writes nothing.
pub fn synthesize_entry_file(
    workspace: &Workspace,
    function: &FunctionUnit,
) -> Result<Synthesis, EntryError> {
    let bundled_dir = function.bundled_packages_dir();
    if !bundled_dir.exists() {
        tracing::debug!(function = %function.name, "no bundled packages directory");
        return Ok(Synthesis::Skip);
    }

    let dir_names = list_package_dirs(&bundled_dir)?;
    if dir_names.is_empty() {
        tracing::debug!(function = %function.name, "bundled packages directory is empty");
        return Ok(Synthesis::Skip);
    }

    let packages = load_internal_packages(&workspace.packages_root(), &dir_names)?;
    let aliases = resolve_aliases(&packages)?;

    Ok(Synthesis::Generated(EntryFile::render(
        &workspace.config().layout.functions_dir,
        &function.name,
        aliases,
    )))
}

/// Synthesize and, when there is something to alias, write the entry file.
///
/// The file is only written once synthesis fully succeeded, so a manifest
/// error never leaves a partial entry file behind.
pub fn generate_entry_point(
    workspace: &Workspace,
    function: &FunctionUnit,
) -> Result<EntryOutcome, EntryError> {
    match synthesize_entry_file(workspace, function)? {
        Synthesis::Skip => Ok(EntryOutcome::Skipped),
        Synthesis::Generated(entry) => {
            let path = function.dist_dir.join(&workspace.config().layout.entry_file);
            write_entry_file(&path, &entry)?;
            Ok(EntryOutcome::Written {
                path,
                aliases: entry.aliases().len(),
            })
        }
    }
}

/// Write `entry` to `path`, replacing any existing file.
pub fn write_entry_file(path: &Path, entry: &EntryFile) -> Result<(), EntryError> {
    std::fs::write(path, entry.contents()).map_err(|e| EntryError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), aliases = entry.aliases().len(), "entry file written");
    Ok(())
}

/// Immediate subdirectories of `dir`, sorted by name.
fn list_package_dirs(dir: &Path) -> Result<Vec<String>, EntryError> {
    let read_dir_err = |e| EntryError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        // Follows symlinks: yarn workspaces link bundled packages
        if !std::fs::metadata(entry.path()).map_err(read_dir_err)?.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                return Err(EntryError::NonUtf8Name {
                    path: dir.join(raw),
                });
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Read the repository-level manifest for each bundled package directory.
fn load_internal_packages(
    packages_root: &Path,
    dir_names: &[String],
) -> Result<Vec<InternalPackage>, EntryError> {
    dir_names
        .iter()
        .map(|dir_name| {
            let manifest = PackageManifest::load(&packages_root.join(dir_name)).map_err(|e| {
                EntryError::Manifest {
                    package: dir_name.clone(),
                    source: e,
                }
            })?;
            tracing::debug!(package = %dir_name, name = %manifest.name, "internal package");
            Ok(InternalPackage {
                dir_name: dir_name.clone(),
                manifest,
            })
        })
        .collect()
}

/// One alias per package; two packages declaring the same name is an error.
pub fn resolve_aliases(packages: &[InternalPackage]) -> Result<Vec<AliasEntry>, EntryError> {
    let mut aliases: Vec<AliasEntry> = Vec::with_capacity(packages.len());
    for package in packages {
        if let Some(existing) = aliases.iter().find(|a| a.name == package.manifest.name) {
            return Err(EntryError::DuplicateAlias {
                name: package.manifest.name.clone(),
                first: existing.package_dir.clone(),
                second: package.dir_name.clone(),
            });
        }
        aliases.push(AliasEntry {
            name: package.manifest.name.clone(),
            package_dir: package.dir_name.clone(),
        });
    }
    Ok(aliases)
}

/// Double-quoted JavaScript string literal. JSON string syntax is a subset
/// of JavaScript's.
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_owned()).to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("failed to list bundled packages in {path}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("bundled package directory name is not valid UTF-8: {path}")]
    NonUtf8Name { path: PathBuf },
    #[error("failed to read manifest of internal package \"{package}\"")]
    Manifest {
        package: String,
        source: fnship_core::Error,
    },
    #[error(
        "internal packages \"{first}\" and \"{second}\" both declare the name \"{name}\"; \
         module aliases must be unique"
    )]
    DuplicateAlias {
        name: String,
        first: String,
        second: String,
    },
    #[error("failed to write entry file {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias(name: &str, dir: &str) -> AliasEntry {
        AliasEntry {
            name: name.to_owned(),
            package_dir: dir.to_owned(),
        }
    }

    #[test]
    fn alias_renders_as_object_entry() {
        assert_eq!(
            alias("@org/utils", "utils").render(),
            r#""@org/utils": path.join(__dirname, "packages/utils/src")"#
        );
    }

    #[test]
    fn alias_target_ignores_declared_name() {
        assert_eq!(alias("@scope/other-name", "utils").target(), "packages/utils/src");
    }

    #[test]
    fn alias_name_is_escaped() {
        let rendered = alias(r#"we"ird\name"#, "w").render();
        assert!(rendered.starts_with(r#""we\"ird\\name": "#), "got: {rendered}");
    }

    #[test]
    fn render_joins_entries_with_comma_newline() {
        let entry = EntryFile::render(
            "functions",
            "greet",
            vec![alias("@org/a", "a"), alias("@org/b", "b")],
        );
        assert!(entry.contents().contains(
            "  \"@org/a\": path.join(__dirname, \"packages/a/src\"),\n  \"@org/b\": path.join(__dirname, \"packages/b/src\")\n});"
        ));
    }

    #[test]
    fn render_registers_aliases_before_reexport() {
        let entry = EntryFile::render("functions", "greet", vec![alias("@org/a", "a")]);
        let contents = entry.contents();

        let register = contents.find("moduleAlias.addAliases").unwrap();
        let reexport = contents.find("module.exports").unwrap();
        assert!(register < reexport);
        assert!(contents.starts_with("const path = require(\"path\");\n"));
        assert!(contents.ends_with("module.exports = require(\"./functions/greet/src/index\");\n"));
    }

    #[test]
    fn resolve_aliases_rejects_duplicate_names() {
        let manifest = |name: &str| PackageManifest {
            name: name.to_owned(),
            dependencies: Default::default(),
        };
        let packages = vec![
            InternalPackage {
                dir_name: "a".to_owned(),
                manifest: manifest("@org/shared"),
            },
            InternalPackage {
                dir_name: "b".to_owned(),
                manifest: manifest("@org/shared"),
            },
        ];

        let err = resolve_aliases(&packages).unwrap_err();
        match err {
            EntryError::DuplicateAlias {
                name,
                first,
                second,
            } => {
                assert_eq!(name, "@org/shared");
                assert_eq!(first, "a");
                assert_eq!(second, "b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn dir_names(max: usize) -> impl Strategy<Value = Vec<String>> {
            proptest::collection::btree_set("[a-z][a-z0-9-]{0,15}", 1..=max)
                .prop_map(|s| s.into_iter().collect::<Vec<_>>())
        }

        proptest! {
            #[test]
            fn one_alias_line_per_package(dirs in dir_names(8)) {
                let aliases: Vec<AliasEntry> = dirs
                    .iter()
                    .map(|d| alias(&format!("@org/{d}"), d))
                    .collect();
                let entry = EntryFile::render("functions", "fn", aliases);

                let lines = entry
                    .contents()
                    .lines()
                    .filter(|l| l.contains("path.join(__dirname"))
                    .count();
                prop_assert_eq!(lines, dirs.len());
                for d in &dirs {
                    let expected = format!("\"packages/{}/src\"", d);
                    prop_assert!(entry.contents().contains(&expected));
                }
            }
        }
    }
}
