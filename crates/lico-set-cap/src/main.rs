use lico_logger as logger;
use lico_set_cap::launcher::Launcher;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = logger::init() {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    let outcome = Launcher::system().run(std::env::args_os(), &mut io::stdout());
    ExitCode::from(outcome.code())
}
