//! Tag, enhanced tag and session command definitions.

use crate::commands::params::{
    long_value_parameters, COMMAND_GET, COMMAND_LIST, PARAMETER_END_DATE, PARAMETER_NEXT_TOKEN,
    PARAMETER_START_DATE,
};
use clap::{Arg, Command};

/// The `list` subcommand; its flags are parsed with this definition.
pub fn list_command() -> Command {
    Command::new(COMMAND_LIST)
        .about("List documents (default)")
        .args(long_value_parameters(
            PARAMETER_START_DATE,
            "First day to include (YYYY-MM-DD)",
        ))
        .args(long_value_parameters(
            PARAMETER_END_DATE,
            "Last day to include (YYYY-MM-DD)",
        ))
        .args(long_value_parameters(
            PARAMETER_NEXT_TOKEN,
            "Pagination token from a previous page",
        ))
}

/// Create a list/get command for one document collection.
pub fn document_command(
    name: &'static str,
    aliases: &'static [&'static str],
    about: &'static str,
) -> Command {
    Command::new(name)
        .about(about)
        .aliases(aliases.iter().copied())
        .subcommand(list_command())
        .subcommand(
            Command::new(COMMAND_GET)
                .about("Fetch a single document")
                .arg(Arg::new("document_id").num_args(1).required(true)),
        )
}
