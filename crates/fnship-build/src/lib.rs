//! Function build, module-alias entry file generation, and lockfile
//! handling for fnship.
//!
//! # Build pipeline
//!
//! ```text
//! fnship build <fn>
//!   1. Manifest   ── functions/<fn>/package.json must depend on module-alias
//!   2. Build      ── yarn workspace <package name> build
//!   3. Scan       ── functions/<fn>/dist/packages/*  (absent → skip 4-5)
//!   4. Synthesize ── alias per package → packages/<dir>/src
//!   5. Write      ── functions/<fn>/dist/index.js
//!
//! fnship deploy <fn>
//!   1-5 as above
//!   6. Lockfile   ── yarn.lock → functions/<fn>/yarn.lock
//! ```
//!
//! # Entry file
//!
//! The build output mirrors the repository layout, with bundled internal
//! packages under `dist/packages/<dir>`. The generated `index.js` registers
//! one `module-alias` entry per bundled package, keyed by the name its
//! `package.json` declares, then re-exports the compiled handler:
//!
//! ```text
//! const path = require("path");
//! const moduleAlias = require("module-alias");
//!
//! moduleAlias.addAliases({
//!   "@org/utils": path.join(__dirname, "packages/utils/src")
//! });
//!
//! module.exports = require("./functions/greet/src/index");
//! ```

pub mod builder;
pub mod entry;
pub mod lockfile;

pub use builder::{BuildError, BuildRunner, CommandRunner, build_function};
pub use entry::{
    AliasEntry, EntryError, EntryFile, EntryOutcome, InternalPackage, Synthesis,
    generate_entry_point, synthesize_entry_file,
};
pub use lockfile::{LockfileError, copy_lockfile};
