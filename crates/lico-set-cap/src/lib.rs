//! lico_set_cap library - launcher internals exposed for testing
//!
//! Runs `lico.monitor.plugins.icinga.<module>` under a given Python
//! interpreter and relays its output and exit status.

pub mod errors;
pub mod help;
pub mod invocation;
pub mod launcher;
