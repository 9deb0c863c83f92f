//! Usage text and the `help` command.

use std::io::{self, Write};

use crate::commands::params::*;

pub const USAGE: &str = "oura - Oura Ring CLI

Usage:
  oura <command> [args] [--json|-j]
  oura help [command]
  oura completion <bash|zsh|fish>

Commands:
  auth              Authenticate with Oura (first time setup)
  personal-info     Fetch personal info
  today             Show today's summary
  all [date]        Show all metrics for date (default: today)
  sleep [date]      Show sleep data
  activity [date]   Show activity data
  readiness [date]  Show readiness data
  heartrate [date]  Show heart rate data
  hrv [date]        Show heart rate variability (from sleep)
  stress [date]     Show daytime stress data
  spo2 [date]       Show blood oxygen data
  resilience [date] Show resilience data
  vo2 [date]        Show VO2 max data
  workout [date]    Show workouts
  json [date]       Raw JSON dump of all data (alias for: all --json)

  tag               Manage tags
  enhanced-tag      Manage enhanced tags
  session           Manage sessions

  webhook           Manage webhook subscriptions

Webhook subcommands:
  webhook list
  webhook get <id>
  webhook create --callback-url <url> --verification-token <token> --event-type <create|update|delete> --data-type <type>
  webhook update <id> --verification-token <token> [--callback-url <url>] [--event-type <create|update|delete>] [--data-type <type>]
  webhook delete <id>
  webhook renew <id>
  webhook types

Options:
  --help, -h        Show help for a command
  --json, -j        Output JSON to stdout (machine readable)

Date format: YYYY-MM-DD (defaults to today)
";

pub const AUTH_USAGE: &str = "Usage: oura auth
Authenticate with Oura (OAuth2).
";

pub const COMPLETION_USAGE: &str = "Shell completion

Usage:
  oura completion <bash|zsh|fish>

Examples:
  oura completion bash > /etc/bash_completion.d/oura
  oura completion zsh  > ~/.zsh/completions/_oura
  oura completion fish > ~/.config/fish/completions/oura.fish
";

pub const PERSONAL_INFO_USAGE: &str = "Personal info

Usage:
  oura personal-info [--json|-j]
  oura personal-info get [--json|-j]
";

pub const TAG_USAGE: &str = "Tags

Usage:
  oura tag [list] [--start-date <date>] [--end-date <date>] [--next-token <token>] [--json|-j]
  oura tag get <document_id> [--json|-j]
";

pub const ENHANCED_TAG_USAGE: &str = "Enhanced tags

Usage:
  oura enhanced-tag [list] [--start-date <date>] [--end-date <date>] [--next-token <token>] [--json|-j]
  oura enhanced-tag get <document_id> [--json|-j]
";

pub const SESSION_USAGE: &str = "Sessions

Usage:
  oura session [list] [--start-date <date>] [--end-date <date>] [--next-token <token>] [--json|-j]
  oura session get <document_id> [--json|-j]
";

pub const WEBHOOK_USAGE: &str = "Webhook subscription management

Usage:
  oura webhook list [--json|-j]
  oura webhook get <id> [--json|-j]
  oura webhook create --callback-url <url> --verification-token <token> --event-type <create|update|delete> --data-type <type> [--json|-j]
  oura webhook update <id> --verification-token <token> [--callback-url <url>] [--event-type <create|update|delete>] [--data-type <type>] [--json|-j]
  oura webhook delete <id>
  oura webhook renew <id> [--json|-j]
  oura webhook types

Notes:
  - These endpoints use app credentials (x-client-id / x-client-secret), not the OAuth access token.
  - client_id/client_secret come from ~/.config/oura/config.json
";

fn date_command_about(command: &str) -> Option<&'static str> {
    let about = match command {
        COMMAND_TODAY => "Show today's summary.",
        COMMAND_ALL => "Show all metrics for a date.",
        COMMAND_SLEEP => "Show sleep data.",
        COMMAND_ACTIVITY => "Show activity data.",
        COMMAND_READINESS => "Show readiness data.",
        COMMAND_HEARTRATE => "Show heart rate data.",
        COMMAND_HRV => "Show heart rate variability (from sleep).",
        COMMAND_STRESS => "Show daytime stress data.",
        COMMAND_SPO2 => "Show blood oxygen data.",
        COMMAND_RESILIENCE => "Show resilience data.",
        COMMAND_VO2 => "Show VO2 max data.",
        COMMAND_WORKOUT => "Show workouts.",
        COMMAND_JSON => "Raw JSON dump of all data (alias for: all --json).",
        _ => return None,
    };
    Some(about)
}

/// Returns `true` when `command` is `name` or one of its `aliases`.
pub fn is_command(command: &str, name: &str, aliases: &[&str]) -> bool {
    command == name || aliases.contains(&command)
}

/// The usage text for a command name or alias.
pub fn usage_for(command: &str) -> Option<String> {
    if matches!(command, "" | COMMAND_HELP | "--help" | "-h") {
        return Some(USAGE.to_string());
    }
    if command == COMMAND_AUTH {
        return Some(AUTH_USAGE.to_string());
    }
    if is_command(command, COMMAND_COMPLETION, ALIASES_COMPLETION) {
        return Some(COMPLETION_USAGE.to_string());
    }
    if is_command(command, COMMAND_PERSONAL_INFO, ALIASES_PERSONAL_INFO) {
        return Some(PERSONAL_INFO_USAGE.to_string());
    }
    if command == COMMAND_TAG {
        return Some(TAG_USAGE.to_string());
    }
    if is_command(command, COMMAND_ENHANCED_TAG, ALIASES_ENHANCED_TAG) {
        return Some(ENHANCED_TAG_USAGE.to_string());
    }
    if command == COMMAND_SESSION {
        return Some(SESSION_USAGE.to_string());
    }
    if command == COMMAND_WEBHOOK {
        return Some(WEBHOOK_USAGE.to_string());
    }

    date_command_about(command).map(|about| {
        format!(
            "Usage: oura {} [date] [--json|-j]\n{}\n\nDate format: YYYY-MM-DD (defaults to today)\n",
            command, about
        )
    })
}

/// Prints help for `command`; for the `help` command itself the topic is
/// the first positional.
///
/// Unknown topics are reported on `err` followed by the top-level usage;
/// this is not a failure.
pub fn print_help<W: Write, E: Write>(
    command: &str,
    args: &[String],
    out: &mut W,
    err: &mut E,
) -> io::Result<()> {
    let topic = if command == COMMAND_HELP {
        args.first().map(String::as_str).unwrap_or_default()
    } else {
        command
    };

    match usage_for(topic) {
        Some(usage) => write!(out, "{}", usage),
        None => {
            write!(err, "Unknown command for help: {}\n\n", topic)?;
            write!(out, "{}", USAGE)
        }
    }
}
