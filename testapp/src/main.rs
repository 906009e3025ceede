//! `testapp` command-line entry point.
//!
//! ```bash
//! testapp validate person --sample
//! testapp render simple --withhold messages --withhold errors
//! testapp search opinion "opinion 1"
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use formset_rs_core::logging::setup_logging;
use formset_rs_core::SETTINGS;

use testapp::command::{CommandRegistry, Outcome};
use testapp::commands::register_builtin_commands;
use testapp::load_settings;

fn main() -> ExitCode {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    let matches = registry.build_cli().get_matches();

    let settings = match load_settings(matches.get_one::<PathBuf>("settings").map(PathBuf::as_path)) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    setup_logging(&settings);
    SETTINGS.configure(settings);

    let mut stdout = std::io::stdout().lock();
    match registry.execute(&matches, SETTINGS.get(), &mut stdout) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Failure) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}
