//! The `validate` management command.
//!
//! Binds a submission to one of the demo forms and prints the outcome as
//! JSON, the same body the form endpoint answers with.

use std::io::Write;

use formset_rs_core::{FormsetError, FormsetResult, Settings};

use crate::command::{ManagementCommand, Outcome};
use crate::forms::form_by_name;

/// Validates a submission against a demo form.
pub struct ValidateCommand;

impl ManagementCommand for ValidateCommand {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn help(&self) -> &'static str {
        "Validate a submission against a form and print the result as JSON"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        super::data_args(cmd.arg(super::form_arg()), true)
    }

    fn handle(
        &self,
        matches: &clap::ArgMatches,
        _settings: &Settings,
        out: &mut dyn Write,
    ) -> FormsetResult<Outcome> {
        let name = matches.get_one::<String>("form").map_or("", String::as_str);
        let data = super::submission(matches)?.ok_or_else(|| {
            FormsetError::ConfigurationError("validate needs --data, --json or --sample".into())
        })?;

        let mut form = form_by_name(name)?;
        form.bind(data);
        let valid = form.is_valid();

        let body = serde_json::json!({
            "valid": valid,
            "cleaned_data": form.cleaned_data(),
            "errors": form.errors(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;

        Ok(if valid {
            Outcome::Success
        } else {
            Outcome::Failure
        })
    }
}
