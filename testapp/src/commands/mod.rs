//! Built-in management commands of the demo application.
//!
//! Each command implements the
//! [`ManagementCommand`](crate::command::ManagementCommand) trait.

pub mod check;
pub mod render;
pub mod search;
pub mod validate;
pub mod widgets;

pub use check::CheckCommand;
pub use render::RenderCommand;
pub use search::SearchCommand;
pub use validate::ValidateCommand;
pub use widgets::WidgetsCommand;

use formset_rs_core::FormsetResult;
use formset_rs_forms::data::FormData;
use formset_rs_forms::model_form::ModelFormConfig;

use crate::command::CommandRegistry;
use crate::forms::{
    model_person_form_all_fields, model_person_form_config, sample_person_data, FORM_NAMES,
};

/// Registers all built-in management commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(ValidateCommand));
    registry.register(Box::new(RenderCommand));
    registry.register(Box::new(WidgetsCommand));
    registry.register(Box::new(CheckCommand));
    registry.register(Box::new(SearchCommand));
}

/// The positional `form` argument naming one of the demo forms.
fn form_arg() -> clap::Arg {
    clap::Arg::new("form")
        .required(true)
        .value_parser(clap::builder::PossibleValuesParser::new(FORM_NAMES))
        .help("Which form to use")
}

/// The mutually exclusive `--data`, `--json` and `--sample` submission flags.
fn data_args(cmd: clap::Command, required: bool) -> clap::Command {
    cmd.arg(
        clap::Arg::new("data")
            .long("data")
            .value_name("URLENCODED")
            .help("Submission as an application/x-www-form-urlencoded string"),
    )
    .arg(
        clap::Arg::new("json")
            .long("json")
            .value_name("JSON")
            .help("Submission as a JSON object, optionally nested under \"formset_data\""),
    )
    .arg(
        clap::Arg::new("sample")
            .long("sample")
            .action(clap::ArgAction::SetTrue)
            .help("Submit the sample person record"),
    )
    .group(
        clap::ArgGroup::new("submission")
            .args(["data", "json", "sample"])
            .required(required),
    )
}

/// Reads the submission selected by [`data_args`], if any.
fn submission(matches: &clap::ArgMatches) -> FormsetResult<Option<FormData>> {
    if let Some(encoded) = matches.get_one::<String>("data") {
        return Ok(Some(FormData::parse(encoded)));
    }
    if let Some(json) = matches.get_one::<String>("json") {
        let payload: serde_json::Value = serde_json::from_str(json)?;
        return FormData::from_json(&payload).map(Some);
    }
    if matches.get_flag("sample") {
        return Ok(Some(sample_person_data()));
    }
    Ok(None)
}

/// The `--all` flag switching to the every-attribute model form.
fn all_fields_arg() -> clap::Arg {
    clap::Arg::new("all")
        .long("all")
        .action(clap::ArgAction::SetTrue)
        .help("Use the model form with every attribute selected")
}

fn model_config(matches: &clap::ArgMatches) -> ModelFormConfig {
    if matches.get_flag("all") {
        model_person_form_all_fields()
    } else {
        model_person_form_config()
    }
}
