//! Webhook subscription command definitions.

use crate::{
    commands::params::{
        long_value_parameters, SuggestedValues, COMMAND_CREATE, COMMAND_DELETE, COMMAND_GET,
        COMMAND_LIST, COMMAND_RENEW, COMMAND_TYPES, COMMAND_UPDATE, COMMAND_WEBHOOK,
        PARAMETER_CALLBACK_URL, PARAMETER_DATA_TYPE, PARAMETER_EVENT_TYPE,
        PARAMETER_VERIFICATION_TOKEN,
    },
    model::{DataType, EventType},
};
use clap::{Arg, Command};
use strum::VariantNames;

fn id_parameter() -> Arg {
    Arg::new("id").num_args(1).required(true)
}

/// The flags shared by `create` and `update`. Handlers parse with this
/// definition and check required flags and enum values themselves.
pub fn subscription_command(name: &'static str) -> Command {
    Command::new(name)
        .args(long_value_parameters(PARAMETER_CALLBACK_URL, "Callback URL"))
        .args(long_value_parameters(
            PARAMETER_VERIFICATION_TOKEN,
            "Verification token",
        ))
        .args(
            long_value_parameters(PARAMETER_EVENT_TYPE, "Event type")
                .map(|arg| arg.value_parser(SuggestedValues(EventType::VARIANTS))),
        )
        .args(
            long_value_parameters(PARAMETER_DATA_TYPE, "Data type")
                .map(|arg| arg.value_parser(SuggestedValues(DataType::VARIANTS))),
        )
}

/// Create the webhook command with all its subcommands.
pub fn webhook_command() -> Command {
    Command::new(COMMAND_WEBHOOK)
        .about("Manage webhook subscriptions")
        .subcommand(Command::new(COMMAND_LIST).about("List subscriptions"))
        .subcommand(
            Command::new(COMMAND_GET)
                .about("Fetch a subscription")
                .arg(id_parameter()),
        )
        .subcommand(subscription_command(COMMAND_CREATE).about("Create a subscription"))
        .subcommand(
            subscription_command(COMMAND_UPDATE)
                .about("Update a subscription")
                .arg(id_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_DELETE)
                .about("Delete a subscription")
                .arg(id_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_RENEW)
                .about("Renew a subscription")
                .arg(id_parameter()),
        )
        .subcommand(Command::new(COMMAND_TYPES).about("List event and data types"))
}
