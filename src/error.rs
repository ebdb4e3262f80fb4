//! Error types for the build engine.
//!
//! Nothing in the crate retries; every failure surfaces once, as close to
//! its origin as possible, and carries enough context to print a one-line
//! diagnostic. Out-of-memory is the sole exception to the typed-error rule:
//! allocation failure aborts the process.

use std::fmt;
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between configuration and the final link.
#[derive(Debug, Error)]
pub enum Error {
    /// The OS refused to create a child process, or the program was not
    /// found on `PATH`.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// Reading a captured child's standard output failed mid-stream.
    #[error("failed to read output of `{command}`: {source}")]
    Capture {
        command: String,
        #[source]
        source: io::Error,
    },

    /// Waiting on a dispatched child failed.
    #[error("failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },

    /// A glob pattern handed to the configuration did not parse.
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// The package-metadata tool exited non-zero for this package.
    #[error("pkg-config query for `{package}` failed")]
    PkgConfig { package: String },

    /// The per-file compile gate vetoed a file, aborting the build.
    #[error("compilation of `{file}` was rejected")]
    Rejected { file: String },

    /// A compiler, linker or archiver exited with a non-zero status.
    #[error("{stage} failed with exit status {code}")]
    ToolFailed { stage: Stage, code: i32 },

    /// The user's configuration callback reported an error.
    #[error(transparent)]
    Config(#[from] anyhow::Error),
}

/// Which phase of the build a tool failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compile,
    Link,
    Archive,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Compile => "compile",
            Stage::Link => "link",
            Stage::Archive => "archive",
        })
    }
}

impl Error {
    /// Exit status the build process should report for this error.
    ///
    /// Tool failures carry the child's own status through unchanged;
    /// everything else maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ToolFailed { code, .. } => *code,
            _ => 1,
        }
    }
}
