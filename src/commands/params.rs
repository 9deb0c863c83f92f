//! Command names, aliases and shared arguments.

use clap::{
    builder::{PossibleValue, StringValueParser, TypedValueParser},
    Arg, ArgAction, Command,
};
use std::ffi::OsStr;

// Top-level commands
pub const COMMAND_AUTH: &str = "auth";
pub const COMMAND_HELP: &str = "help";
pub const COMMAND_COMPLETION: &str = "completion";
pub const COMMAND_PERSONAL_INFO: &str = "personal-info";
pub const COMMAND_TAG: &str = "tag";
pub const COMMAND_ENHANCED_TAG: &str = "enhanced-tag";
pub const COMMAND_SESSION: &str = "session";
pub const COMMAND_WEBHOOK: &str = "webhook";
pub const COMMAND_JSON: &str = "json";

// Date commands
pub const COMMAND_TODAY: &str = "today";
pub const COMMAND_ALL: &str = "all";
pub const COMMAND_SLEEP: &str = "sleep";
pub const COMMAND_ACTIVITY: &str = "activity";
pub const COMMAND_READINESS: &str = "readiness";
pub const COMMAND_HEARTRATE: &str = "heartrate";
pub const COMMAND_HRV: &str = "hrv";
pub const COMMAND_STRESS: &str = "stress";
pub const COMMAND_SPO2: &str = "spo2";
pub const COMMAND_RESILIENCE: &str = "resilience";
pub const COMMAND_VO2: &str = "vo2";
pub const COMMAND_WORKOUT: &str = "workout";

// Aliases kept for compatibility
pub const ALIASES_COMPLETION: &[&str] = &["completions"];
pub const ALIASES_PERSONAL_INFO: &[&str] = &["personal_info", "personal"];
pub const ALIASES_ENHANCED_TAG: &[&str] = &["enhanced_tag"];

// Subcommands
pub const COMMAND_LIST: &str = "list";
pub const COMMAND_GET: &str = "get";
pub const COMMAND_CREATE: &str = "create";
pub const COMMAND_UPDATE: &str = "update";
pub const COMMAND_DELETE: &str = "delete";
pub const COMMAND_RENEW: &str = "renew";
pub const COMMAND_TYPES: &str = "types";

// Long flags; the underscore spelling is accepted too
pub const PARAMETER_START_DATE: [&str; 2] = ["start-date", "start_date"];
pub const PARAMETER_END_DATE: [&str; 2] = ["end-date", "end_date"];
pub const PARAMETER_NEXT_TOKEN: [&str; 2] = ["next-token", "next_token"];
pub const PARAMETER_CALLBACK_URL: [&str; 2] = ["callback-url", "callback_url"];
pub const PARAMETER_VERIFICATION_TOKEN: [&str; 2] = ["verification-token", "verification_token"];
pub const PARAMETER_EVENT_TYPE: [&str; 2] = ["event-type", "event_type"];
pub const PARAMETER_DATA_TYPE: [&str; 2] = ["data-type", "data_type"];

pub const SHELLS: [&str; 3] = ["bash", "zsh", "fish"];

/// All commands that take an optional `[date]` and have a JSON report.
pub const DATE_COMMANDS: [&str; 12] = [
    COMMAND_TODAY,
    COMMAND_ALL,
    COMMAND_SLEEP,
    COMMAND_ACTIVITY,
    COMMAND_READINESS,
    COMMAND_HEARTRATE,
    COMMAND_HRV,
    COMMAND_STRESS,
    COMMAND_SPO2,
    COMMAND_RESILIENCE,
    COMMAND_VO2,
    COMMAND_WORKOUT,
];

pub fn json_parameter() -> Arg {
    Arg::new("json")
        .short('j')
        .long("json")
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Output JSON to stdout (machine readable)")
}

pub fn date_parameter() -> Arg {
    Arg::new("date")
        .num_args(1)
        .required(false)
        .help("Date in YYYY-MM-DD format (defaults to today)")
}

fn long_value_arg(name: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .num_args(1)
        .required(false)
        .allow_hyphen_values(true)
}

/// A long value flag and its hidden underscore spelling.
///
/// The spellings are separate arguments so the handler can tell which one
/// came first (see [`crate::args::first_flag`]).
pub fn long_value_parameters(names: [&'static str; 2], help: &'static str) -> [Arg; 2] {
    [
        long_value_arg(names[0]).help(help),
        long_value_arg(names[1]).hide(true),
    ]
}

/// Offers a fixed list of values to shell completion but accepts any string.
/// Handlers validate the value so they can report it their own way.
#[derive(Debug, Clone, Copy)]
pub struct SuggestedValues(pub &'static [&'static str]);

impl TypedValueParser for SuggestedValues {
    type Value = String;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        StringValueParser::new().parse_ref(cmd, arg, value)
    }

    fn possible_values(&self) -> Option<Box<dyn Iterator<Item = PossibleValue> + '_>> {
        Some(Box::new(self.0.iter().copied().map(PossibleValue::new)))
    }
}
