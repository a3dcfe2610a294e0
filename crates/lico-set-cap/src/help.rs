/// Program name used when the argument list does not carry one
pub const DEFAULT_PROGRAM_NAME: &str = "lico_set_cap";

/// Usage text for `prog`, naming it on both the usage and the example line.
///
/// Plain text only: stdout must not depend on the terminal or the environment.
pub fn usage_text(prog: &str) -> String {
    format!(
        "\nUsage:\n    {prog} python_path module_path [options]\n\n    \
         python_path: Should specify an absolute path for python interpreter.\n    \
         module_path: Should specify the module path.\n    \
         options: Options for the specified module, refer to the module help.\n\n\
         Example:\n    {prog} /usr/bin/python3 base.cpu.lico_check_cpu --util\n"
    )
}
