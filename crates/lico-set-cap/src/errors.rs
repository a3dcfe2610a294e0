//! Error types for launching plugin interpreters

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Failures that end a launch. Every variant is fatal.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' exited unsuccessfully: {status}")]
    ChildFailed { program: String, status: ExitStatus },
}
