//! Launch a plugin module under the requested interpreter and relay the result.
//!
//! [`Launcher::run`] never terminates the process itself. It returns an
//! [`ExitOutcome`] and leaves the exit to the binary.

use crate::errors::LaunchError;
use crate::help::{usage_text, DEFAULT_PROGRAM_NAME};
use crate::invocation::Invocation;
use std::ffi::OsString;
use std::io::Write;
use std::process::ExitStatus;

/// Exit code for a malformed command line.
///
/// Historically this launcher exited with `-1`, which Unix reports as 255.
/// The literal is used so every platform sees the same value.
pub const USAGE_EXIT_CODE: u8 = 255;

/// Exit code when the plugin could not be run or did not succeed
pub const FATAL_EXIT_CODE: u8 = 1;

/// Starts a plugin invocation and blocks until it finishes
pub trait Spawner {
    fn spawn_and_wait(&self, invocation: &Invocation) -> Result<ExitStatus, LaunchError>;
}

/// Runs the interpreter as a real child process sharing our stdout and stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

impl Spawner for SystemSpawner {
    fn spawn_and_wait(&self, invocation: &Invocation) -> Result<ExitStatus, LaunchError> {
        let program = invocation.display_program();
        let mut child = invocation
            .command()
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })?;
        child
            .wait()
            .map_err(|source| LaunchError::Wait { program, source })
    }
}

/// How a launcher run ended
#[derive(Debug)]
pub enum ExitOutcome {
    /// The plugin ran and exited successfully
    Completed,
    /// Too few arguments; usage text was printed and nothing was spawned
    Usage,
    /// The plugin could not be started, waited on, or it failed
    Fatal(LaunchError),
}

impl ExitOutcome {
    /// Process exit code for this outcome
    pub fn code(&self) -> u8 {
        match self {
            ExitOutcome::Completed => 0,
            ExitOutcome::Usage => USAGE_EXIT_CODE,
            ExitOutcome::Fatal(_) => FATAL_EXIT_CODE,
        }
    }
}

pub struct Launcher<S> {
    spawner: S,
}

impl Launcher<SystemSpawner> {
    pub fn system() -> Self {
        Self::new(SystemSpawner)
    }
}

impl<S: Spawner> Launcher<S> {
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }

    /// Run one launch from the full argument list (element 0 is the program name).
    ///
    /// Usage text goes to `out`. A fatal error is emitted as a `tracing` error
    /// event, which the installed subscriber writes to the log stream.
    pub fn run<I, T, W>(&self, args: I, out: &mut W) -> ExitOutcome
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
        W: Write,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        let Some(invocation) = Invocation::from_args(&args) else {
            let prog = args
                .first()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_string());
            if let Err(e) = out
                .write_all(usage_text(&prog).as_bytes())
                .and_then(|()| out.flush())
            {
                tracing::warn!("failed to print usage: {}", e);
            }
            return ExitOutcome::Usage;
        };

        match self.launch(&invocation) {
            Ok(()) => ExitOutcome::Completed,
            Err(e) => {
                tracing::error!("{}", e);
                ExitOutcome::Fatal(e)
            }
        }
    }

    /// Spawn the plugin, wait for it, and treat any unsuccessful exit as an error
    pub fn launch(&self, invocation: &Invocation) -> Result<(), LaunchError> {
        let status = self.spawner.spawn_and_wait(invocation)?;

        if status.success() {
            Ok(())
        } else {
            Err(LaunchError::ChildFailed {
                program: invocation.display_program(),
                status,
            })
        }
    }
}
