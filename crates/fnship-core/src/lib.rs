//! Core types and configuration for fnship.
//!
//! This crate defines the `fnship.toml` schema ([`FnshipConfig`]),
//! repository layout resolution ([`Workspace`], [`FunctionUnit`]),
//! `package.json` reading ([`PackageManifest`]), and shared error types.

pub mod config;
pub mod error;
pub mod manifest;
pub mod workspace;

pub use config::{BuildConfig, DeployConfig, FnshipConfig, FunctionOverrides, LayoutConfig};
pub use error::{Error, Result};
pub use manifest::PackageManifest;
pub use workspace::{FunctionUnit, Workspace};
