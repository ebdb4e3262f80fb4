//! # cforge - Declarative-in-Code Build Orchestrator
//!
//! cforge builds native artifacts (executables, static and shared
//! libraries) from a target description written in plain Rust. There is no
//! build-file language: your build program *is* the configuration.
//!
//! ## Features
//!
//! - **Declarative in code**: one closure populates a [`BuildTarget`]
//! - **Parallel Compilation**: every translation unit is dispatched before
//!   the first wait, one child process per file
//! - **pkg-config Integration**: resolve a package's flags and merge them
//!   into the target with one call
//! - **Lifecycle Hooks**: before/after compile and link, plus a per-file
//!   compile gate
//!
//! ## Quick Start
//!
//! ```no_run
//! use cforge::{ProductType, run};
//!
//! fn main() {
//!     std::process::exit(run("app", ProductType::Executable, |t| {
//!         t.add_glob("src/*.c")?;
//!         t.add_include_dir("src");
//!         t.add_flags(["-Wall", "-Wextra", "-Werror"]);
//!
//!         let raylib = cforge::query("raylib")?;
//!         t.add_package(&raylib);
//!         Ok(())
//!     }));
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`build`] - Compile/link orchestration engine
//! - [`target`] - Build target description and configuration API
//! - [`pkgconfig`] - pkg-config dependency resolution
//! - [`process`] - Child-process dispatch and capture
//! - [`strlist`] - Ordered string collection underlying every list

/// Compile/link orchestration engine.
pub mod build;

/// Error taxonomy shared across the crate.
pub mod error;

/// pkg-config dependency resolution.
pub mod pkgconfig;

/// Child-process dispatch and capture.
pub mod process;

/// Ordered string collection.
pub mod strlist;

/// Build target description and configuration API.
pub mod target;

pub use build::{execute, run};
pub use error::{Error, Result, Stage};
pub use pkgconfig::{PkgInfo, query, query_with};
pub use strlist::StringList;
pub use target::{BuildTarget, CompileGate, Hook, ProductType};
