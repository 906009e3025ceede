//! The `render` management command.

use std::io::Write;

use formset_rs_core::{FormsetResult, Settings};
use formset_rs_forms::render::{Feedback, RenderOptions};

use crate::command::{ManagementCommand, Outcome};
use crate::forms::form_by_name;

/// Renders a demo form as a `<django-formset>` element.
///
/// With a submission the form is validated first, so its errors and the
/// submitted values show up in the markup.
pub struct RenderCommand;

impl ManagementCommand for RenderCommand {
    fn name(&self) -> &'static str {
        "render"
    }

    fn help(&self) -> &'static str {
        "Render a form as HTML"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        let cmd = cmd
            .arg(super::form_arg())
            .arg(
                clap::Arg::new("endpoint")
                    .long("endpoint")
                    .value_name("URL")
                    .help("URL the web component submits to"),
            )
            .arg(
                clap::Arg::new("withhold")
                    .long("withhold")
                    .value_name("KIND")
                    .action(clap::ArgAction::Append)
                    .value_parser(["messages", "errors", "warnings", "success"])
                    .help("Feedback kind the web component should withhold; repeatable"),
            );
        super::data_args(cmd, false)
    }

    fn handle(
        &self,
        matches: &clap::ArgMatches,
        _settings: &Settings,
        out: &mut dyn Write,
    ) -> FormsetResult<Outcome> {
        let name = matches.get_one::<String>("form").map_or("", String::as_str);
        let mut form = form_by_name(name)?;

        let mut options = RenderOptions::new();
        if let Some(endpoint) = matches.get_one::<String>("endpoint") {
            options = options.endpoint(endpoint);
        }
        for kind in matches.get_many::<String>("withhold").into_iter().flatten() {
            options = options.withhold(kind.parse::<Feedback>()?);
        }

        if let Some(data) = super::submission(matches)? {
            form.bind(data);
            let valid = form.is_valid();
            tracing::debug!(form = name, valid, "validated submission before rendering");
        }

        writeln!(out, "{}", form.base().render(&options))?;
        Ok(Outcome::Success)
    }
}
