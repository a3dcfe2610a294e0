//! The invocation descriptor built from the launcher's command line.

use std::ffi::{OsStr, OsString};
use std::process::{Command, Stdio};

/// Package under which every launchable plugin module lives
pub const PLUGIN_NAMESPACE: &str = "lico.monitor.plugins.icinga";

/// Interpreter flag that runs a module as a script
pub const MODULE_FLAG: &str = "-m";

/// Program name, interpreter path and module name
pub const MIN_ARGS: usize = 3;

/// One interpreter run: which executable, which plugin module, which options.
///
/// `extra_args` are handed to the plugin untouched and in their original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    interpreter: OsString,
    module: OsString,
    extra_args: Vec<OsString>,
}

impl Invocation {
    pub fn new(
        interpreter: impl Into<OsString>,
        module: impl Into<OsString>,
        extra_args: Vec<OsString>,
    ) -> Self {
        Self {
            interpreter: interpreter.into(),
            module: module.into(),
            extra_args,
        }
    }

    /// Build from the full program argument list (element 0 is the program name).
    ///
    /// Returns `None` when fewer than [`MIN_ARGS`] elements are present.
    pub fn from_args(args: &[OsString]) -> Option<Self> {
        match args {
            [_, interpreter, module, rest @ ..] => Some(Self::new(
                interpreter.clone(),
                module.clone(),
                rest.to_vec(),
            )),
            _ => None,
        }
    }

    pub fn interpreter(&self) -> &OsStr {
        &self.interpreter
    }

    pub fn module(&self) -> &OsStr {
        &self.module
    }

    pub fn extra_args(&self) -> &[OsString] {
        &self.extra_args
    }

    /// Interpreter path for use in messages
    pub fn display_program(&self) -> String {
        self.interpreter.to_string_lossy().into_owned()
    }

    /// `lico.monitor.plugins.icinga.<module>`
    pub fn qualified_module(&self) -> OsString {
        let mut qualified = OsString::from(PLUGIN_NAMESPACE);
        qualified.push(".");
        qualified.push(&self.module);
        qualified
    }

    /// `-m <qualified module>` followed by the pass-through options
    pub fn child_args(&self) -> Vec<OsString> {
        let mut args = Vec::with_capacity(self.extra_args.len() + 2);
        args.push(OsString::from(MODULE_FLAG));
        args.push(self.qualified_module());
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Command that runs the plugin with the caller's stdout and stderr.
    ///
    /// Stdin is the null device; plugins never read from the caller.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.interpreter);
        command
            .args(self.child_args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }
}
