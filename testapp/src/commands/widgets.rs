//! The `widgets` management command.

use std::io::Write;

use formset_rs_core::{FormsetResult, Settings};
use formset_rs_forms::model_form::generate_form_fields;

use crate::command::{ManagementCommand, Outcome};

/// Lists the fields of the person model form together with their widgets.
pub struct WidgetsCommand;

impl ManagementCommand for WidgetsCommand {
    fn name(&self) -> &'static str {
        "widgets"
    }

    fn help(&self) -> &'static str {
        "Show the widget chosen for each field of the person model form"
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
        let config = super::model_config(matches);
        let fields: Vec<serde_json::Value> = generate_form_fields(&config)?
            .iter()
            .map(|f| {
                serde_json::json!({
                    "name": f.name,
                    "label": f.label,
                    "required": f.required,
                    "widget": f.widget,
                })
            })
            .collect();
        let overrides: serde_json::Map<String, serde_json::Value> = config
            .widgets
            .iter()
            .map(|(name, widget)| Ok((name.clone(), serde_json::to_value(widget)?)))
            .collect::<FormsetResult<_>>()?;

        let body = serde_json::json!({
            "model": config.model.label(),
            "fields": fields,
            "overrides": overrides,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        Ok(Outcome::Success)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::run;

    fn fields(args: &[&str]) -> Vec<serde_json::Value> {
        let (_, output) = run(args).unwrap();
        let body: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(body["model"], "testapp.PersonModel");
        assert_eq!(body["overrides"].as_object().unwrap().len(), 5);
        body["fields"].as_array().unwrap().clone()
    }

    #[test]
    fn test_widgets_default_form() {
        let fields = fields(&["widgets"]);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0]["name"], "weighted_opinions");
        assert_eq!(fields[0]["widget"]["widget"], "DualSortableSelector");
        assert_eq!(fields[0]["widget"]["search_lookup"], "label__icontains");
    }

    #[test]
    fn test_widgets_all_fields() {
        let fields = fields(&["widgets", "--all"]);
        let names: Vec<&str> = fields.iter().filter_map(|f| f["name"].as_str()).collect();
        assert_eq!(
            names,
            ["full_name", "avatar", "gender", "opinion", "opinions", "weighted_opinions"]
        );
        assert_eq!(fields[1]["widget"]["widget"], "UploadedFileInput");
        assert_eq!(fields[1]["required"], false);
        assert_eq!(fields[4]["widget"]["max_items"], 15);
    }
}
