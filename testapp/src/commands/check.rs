//! The `check` management command.
//!
//! Runs the model form checks over the person model form configuration
//! and reports every message found. This mirrors Django's `check` command.

use std::io::Write;

use formset_rs_core::{FormsetResult, Settings};
use formset_rs_forms::model_form::check;

use crate::command::{ManagementCommand, Outcome};

/// Runs the model form checks.
pub struct CheckCommand;

impl ManagementCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Run the model form checks"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(super::all_fields_arg())
    }

    fn handle(
        &self,
        matches: &clap::ArgMatches,
        _settings: &Settings,
        out: &mut dyn Write,
    ) -> FormsetResult<Outcome> {
        let messages = check(&super::model_config(matches));

        if messages.is_empty() {
            writeln!(out, "System check identified no issues (0 silenced).")?;
            return Ok(Outcome::Success);
        }

        for msg in &messages {
            writeln!(out, "{msg}")?;
        }
        let serious = messages.iter().filter(|m| m.is_serious()).count();
        writeln!(
            out,
            "System check identified {} issue(s) ({serious} serious).",
            messages.len()
        )?;
        tracing::warn!(issues = messages.len(), serious, "model form checks reported issues");

        Ok(if serious > 0 {
            Outcome::Failure
        } else {
            Outcome::Success
        })
    }
}
