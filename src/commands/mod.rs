//! CLI command definitions.
//!
//! The command tree below describes the complete `oura` surface with clap.
//! The top level of an invocation is parsed by [`crate::args`], which accepts
//! the global options anywhere on the line. The flags of `tag list`,
//! `webhook create` and the like are parsed with the subcommand definitions
//! from this module, and the whole tree is the source for the shell
//! completion scripts.

use clap::{Arg, Command};

pub mod documents;
pub mod params;
pub mod webhook;

use params::*;

fn date_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name).about(about).arg(date_parameter())
}

/// Create the complete command tree for the `oura` binary.
pub fn create_full_command() -> Command {
    Command::new("oura")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Oura Ring CLI")
        .disable_help_subcommand(true)
        .arg(json_parameter())
        .subcommand(Command::new(COMMAND_AUTH).about("Authenticate with Oura (first time setup)"))
        .subcommand(
            Command::new(COMMAND_PERSONAL_INFO)
                .about("Fetch personal info")
                .aliases(ALIASES_PERSONAL_INFO.iter().copied())
                .subcommand(Command::new(COMMAND_GET).about("Fetch personal info")),
        )
        .subcommand(date_command(COMMAND_TODAY, "Show today's summary"))
        .subcommand(date_command(
            COMMAND_ALL,
            "Show all metrics for date (default: today)",
        ))
        .subcommand(date_command(COMMAND_SLEEP, "Show sleep data"))
        .subcommand(date_command(COMMAND_ACTIVITY, "Show activity data"))
        .subcommand(date_command(COMMAND_READINESS, "Show readiness data"))
        .subcommand(date_command(COMMAND_HEARTRATE, "Show heart rate data"))
        .subcommand(date_command(
            COMMAND_HRV,
            "Show heart rate variability (from sleep)",
        ))
        .subcommand(date_command(COMMAND_STRESS, "Show daytime stress data"))
        .subcommand(date_command(COMMAND_SPO2, "Show blood oxygen data"))
        .subcommand(date_command(COMMAND_RESILIENCE, "Show resilience data"))
        .subcommand(date_command(COMMAND_VO2, "Show VO2 max data"))
        .subcommand(date_command(COMMAND_WORKOUT, "Show workouts"))
        .subcommand(date_command(
            COMMAND_JSON,
            "Raw JSON dump of all data (alias for: all --json)",
        ))
        .subcommand(documents::document_command(COMMAND_TAG, &[], "Manage tags"))
        .subcommand(documents::document_command(
            COMMAND_ENHANCED_TAG,
            ALIASES_ENHANCED_TAG,
            "Manage enhanced tags",
        ))
        .subcommand(documents::document_command(
            COMMAND_SESSION,
            &[],
            "Manage sessions",
        ))
        .subcommand(webhook::webhook_command())
        .subcommand(
            Command::new(COMMAND_HELP)
                .about("Show help for a command")
                .arg(Arg::new("command").num_args(1).required(false)),
        )
        .subcommand(
            Command::new(COMMAND_COMPLETION)
                .about("Print a shell completion script")
                .aliases(ALIASES_COMPLETION.iter().copied())
                .arg(
                    Arg::new("shell")
                        .num_args(1)
                        .required(true)
                        .value_parser(SHELLS),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        create_full_command().debug_assert();
    }

    #[test]
    fn every_date_command_is_present() {
        let command = create_full_command();
        for name in DATE_COMMANDS {
            let sub = command
                .find_subcommand(name)
                .unwrap_or_else(|| panic!("missing {name}"));
            assert!(sub.get_arguments().any(|a| a.get_id() == "date"));
        }
    }

    #[test]
    fn aliases_resolve_to_commands() {
        let command = create_full_command();
        let matches = command
            .clone()
            .try_get_matches_from(["oura", "personal", "get"])
            .unwrap();
        assert_eq!(matches.subcommand_name(), Some(COMMAND_PERSONAL_INFO));

        let matches = command
            .try_get_matches_from(["oura", "enhanced_tag", "list", "--start_date", "2024-01-01"])
            .unwrap();
        assert_eq!(matches.subcommand_name(), Some(COMMAND_ENHANCED_TAG));
    }

    #[test]
    fn enum_flags_offer_their_variants() {
        let command = create_full_command();
        let create = command
            .find_subcommand(COMMAND_WEBHOOK)
            .and_then(|webhook| webhook.find_subcommand(COMMAND_CREATE))
            .unwrap();
        let event_type = create
            .get_arguments()
            .find(|arg| arg.get_id() == "event-type")
            .unwrap();
        let offered: Vec<String> = event_type
            .get_possible_values()
            .iter()
            .map(|value| value.get_name().to_string())
            .collect();
        assert_eq!(offered, ["create", "update", "delete"]);

        let underscore = create
            .get_arguments()
            .find(|arg| arg.get_id() == "event_type")
            .unwrap();
        assert!(underscore.is_hide_set());
    }
}
