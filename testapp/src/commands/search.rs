//! The `search` management command.
//!
//! Answers the option queries a selectize or dual selector widget sends
//! while the user types.

use std::io::Write;

use formset_rs_core::{FormsetError, FormsetResult, Settings};

use crate::command::{ManagementCommand, Outcome};
use crate::forms::model_person_form_all_fields;

/// Filters the choices of a person attribute through its widget's lookup.
pub struct SearchCommand;

impl ManagementCommand for SearchCommand {
    fn name(&self) -> &'static str {
        "search"
    }

    fn help(&self) -> &'static str {
        "Search the options of a selector widget"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("field")
                .required(true)
                .help("Person attribute with a searchable widget"),
        )
        .arg(
            clap::Arg::new("term").help("Text to search for; empty lists every option"),
        )
    }

    fn handle(
        &self,
        matches: &clap::ArgMatches,
        _settings: &Settings,
        out: &mut dyn Write,
    ) -> FormsetResult<Outcome> {
        let field_name = matches.get_one::<String>("field").map_or("", String::as_str);
        let term = matches.get_one::<String>("term").map_or("", String::as_str);

        let config = model_person_form_all_fields();
        let field = config.model.field(field_name).ok_or_else(|| {
            FormsetError::ImproperlyConfigured(format!(
                "{} has no attribute '{field_name}'",
                config.model.object_name
            ))
        })?;
        let widget = config.widget_for(field_name).ok_or_else(|| {
            FormsetError::ImproperlyConfigured(format!("'{field_name}' has no widget override"))
        })?;

        let choices = field.choices.as_deref().unwrap_or_default();
        let hits: Vec<serde_json::Value> = widget
            .search(choices, term)?
            .into_iter()
            .map(|(value, label)| serde_json::json!({ "value": value, "label": label }))
            .collect();
        tracing::debug!(field = field_name, term, hits = hits.len(), "searched options");

        writeln!(out, "{}", serde_json::to_string_pretty(&hits)?)?;
        Ok(Outcome::Success)
    }
}
