//! Command-line parsing.
//!
//! The CLI surface is deliberately permissive: global options (`--json`,
//! `--help`, and their short forms) may appear anywhere after the command,
//! and everything else is kept as positional input in the order given.
//! Resource subcommands hand their positionals to [`parse_flags`], which
//! parses them with the subcommand's definition from [`crate::commands`].

use clap::{
    error::{ContextKind, ContextValue, ErrorKind},
    ArgMatches, Command,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("missing command")]
    MissingCommand,
    #[error("invalid flag: {0:?}")]
    InvalidFlag(String),
    #[error("flag {0:?} requires a value")]
    MissingFlagValue(String),
    #[error("unexpected args: {0}")]
    UnexpectedArgs(String),
    #[error("{0}")]
    Rejected(String),
}

/// Options recognized anywhere on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub json: bool,
    pub help: bool,
}

/// The result of parsing the raw argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInvocation {
    pub command: String,
    pub positional: Vec<String>,
    pub options: Options,
}

impl ParsedInvocation {
    /// Parses `argv`, whose first element is the program name.
    pub fn parse<I, S>(argv: I) -> Result<ParsedInvocation, ArgsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into).skip(1);

        let mut command = argv.next().ok_or(ArgsError::MissingCommand)?;
        let mut options = Options::default();

        if command == "--help" || command == "-h" {
            return Ok(ParsedInvocation {
                command: "help".to_string(),
                positional: Vec::new(),
                options: Options {
                    json: false,
                    help: true,
                },
            });
        }

        // `oura json [date]` predates the --json flag.
        if command == "json" {
            command = "all".to_string();
            options.json = true;
        }

        let mut positional = Vec::new();
        for arg in argv {
            match arg.as_str() {
                "--help" | "-h" | "help" => options.help = true,
                "--json" | "-j" => options.json = true,
                _ => positional.push(arg),
            }
        }

        Ok(ParsedInvocation {
            command,
            positional,
            options,
        })
    }
}

/// Checks the `--name value` / `--name=value` shape of resource-subcommand
/// flags before clap sees them: a bare `--` or an empty name is invalid, and
/// a flag without `=` takes the next token as its value, whatever it is.
pub fn check_long_flags(args: &[String]) -> Result<(), ArgsError> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let Some(name_value) = arg.strip_prefix("--") else {
            continue;
        };
        if name_value.is_empty() {
            return Err(ArgsError::InvalidFlag(arg.clone()));
        }

        match name_value.split_once('=') {
            Some(("", _)) => return Err(ArgsError::InvalidFlag(arg.clone())),
            Some(_) => {}
            None => {
                iter.next()
                    .ok_or_else(|| ArgsError::MissingFlagValue(arg.clone()))?;
            }
        }
    }
    Ok(())
}

/// Parses the flags of a resource subcommand with its clap definition.
///
/// Repeating a flag keeps the last value. `args` holds no binary name.
pub fn parse_flags(command: Command, args: &[String]) -> Result<ArgMatches, ArgsError> {
    check_long_flags(args)?;
    command
        .no_binary_name(true)
        .args_override_self(true)
        .try_get_matches_from(args)
        .map_err(ArgsError::from)
}

/// The value of the first spelling of a flag that was given, if non-empty.
///
/// `--event-type= --event_type=x` yields `None`: the first spelling wins
/// even when its value is empty.
pub fn first_flag<'a>(matches: &'a ArgMatches, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|name| matches.try_get_one::<String>(name).ok().flatten())
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

fn invalid_arg(err: &clap::Error) -> Option<String> {
    match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => Some(arg.clone()),
        _ => None,
    }
}

impl From<clap::Error> for ArgsError {
    fn from(err: clap::Error) -> Self {
        match (err.kind(), invalid_arg(&err)) {
            (ErrorKind::UnknownArgument, Some(arg)) => ArgsError::UnexpectedArgs(arg),
            // clap names the flag as `--name <name>`
            (ErrorKind::InvalidValue, Some(arg)) => ArgsError::MissingFlagValue(
                arg.split_whitespace().next().unwrap_or_default().to_string(),
            ),
            _ => ArgsError::Rejected(
                err.to_string()
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches("error: ")
                    .to_string(),
            ),
        }
    }
}

/// Fails with `unexpected args` when any positional is left over.
pub fn reject_positional(positional: &[String]) -> Result<(), ArgsError> {
    if positional.is_empty() {
        Ok(())
    } else {
        Err(ArgsError::UnexpectedArgs(positional.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_command_is_a_failure() {
        assert_eq!(
            ParsedInvocation::parse(["oura"]),
            Err(ArgsError::MissingCommand)
        );
    }

    #[test]
    fn leading_help_flag_becomes_help_command() {
        for flag in ["--help", "-h"] {
            let parsed = ParsedInvocation::parse(["oura", flag, "sleep"]).unwrap();
            assert_eq!(parsed.command, "help");
            assert!(parsed.options.help);
            assert!(parsed.positional.is_empty());
        }
    }

    #[test]
    fn json_command_is_all_with_json() {
        let parsed = ParsedInvocation::parse(["oura", "json", "2024-05-01"]).unwrap();
        assert_eq!(
            parsed,
            ParsedInvocation {
                command: "all".to_string(),
                positional: strings(&["2024-05-01"]),
                options: Options {
                    json: true,
                    help: false
                },
            }
        );
    }

    #[test]
    fn global_flags_may_appear_anywhere() {
        let before = ParsedInvocation::parse(["oura", "sleep", "--json", "2024-05-01"]).unwrap();
        let after = ParsedInvocation::parse(["oura", "sleep", "2024-05-01", "-j"]).unwrap();
        assert_eq!(before, after);
        assert!(before.options.json);
        assert_eq!(before.positional, strings(&["2024-05-01"]));
    }

    #[test]
    fn positional_order_survives_flag_removal() {
        let parsed = ParsedInvocation::parse([
            "oura",
            "webhook",
            "-j",
            "update",
            "abc",
            "--json",
            "--verification-token",
            "t",
        ])
        .unwrap();
        assert_eq!(
            parsed.positional,
            strings(&["update", "abc", "--verification-token", "t"])
        );
    }

    #[test]
    fn help_word_sets_help_option() {
        let parsed = ParsedInvocation::parse(["oura", "tag", "help"]).unwrap();
        assert!(parsed.options.help);
        assert!(parsed.positional.is_empty());

        let parsed = ParsedInvocation::parse(["oura", "webhook", "-h"]).unwrap();
        assert!(parsed.options.help);
    }

    fn list_flags() -> Command {
        crate::commands::documents::list_command()
    }

    #[test]
    fn long_flags_accept_space_and_equals_forms() {
        let matches = parse_flags(
            list_flags(),
            &strings(&["--start-date", "2024-01-01", "--end_date=2024-01-31"]),
        )
        .unwrap();

        assert_eq!(
            first_flag(&matches, &["start-date", "start_date"]),
            Some("2024-01-01")
        );
        assert_eq!(
            first_flag(&matches, &["end-date", "end_date"]),
            Some("2024-01-31")
        );
        assert_eq!(first_flag(&matches, &["next-token", "next_token"]), None);
    }

    #[test]
    fn flag_value_may_look_like_a_flag() {
        let matches =
            parse_flags(list_flags(), &strings(&["--next-token", "--start-date"])).unwrap();
        assert_eq!(
            first_flag(&matches, &["next-token", "next_token"]),
            Some("--start-date")
        );
        assert_eq!(first_flag(&matches, &["start-date", "start_date"]), None);
    }

    #[test]
    fn repeated_flag_keeps_the_last_value() {
        let matches = parse_flags(
            list_flags(),
            &strings(&["--start-date=2024-01-01", "--start-date", "2024-02-01"]),
        )
        .unwrap();
        assert_eq!(
            first_flag(&matches, &["start-date", "start_date"]),
            Some("2024-02-01")
        );
    }

    #[test]
    fn first_spelling_given_wins_even_when_empty() {
        let matches = parse_flags(
            list_flags(),
            &strings(&["--start-date=", "--start_date=2024-01-01"]),
        )
        .unwrap();
        assert_eq!(first_flag(&matches, &["start-date", "start_date"]), None);

        let matches =
            parse_flags(list_flags(), &strings(&["--start_date=2024-01-01"])).unwrap();
        assert_eq!(
            first_flag(&matches, &["start-date", "start_date"]),
            Some("2024-01-01")
        );
    }

    #[test]
    fn bare_double_dash_is_invalid() {
        assert_eq!(
            check_long_flags(&strings(&["--"])),
            Err(ArgsError::InvalidFlag("--".to_string()))
        );
        assert_eq!(
            check_long_flags(&strings(&["--=x"])),
            Err(ArgsError::InvalidFlag("--=x".to_string()))
        );
    }

    #[test]
    fn bare_double_dash_does_not_swallow_the_next_token() {
        assert_eq!(
            parse_flags(list_flags(), &strings(&["--", "list"])).unwrap_err(),
            ArgsError::InvalidFlag("--".to_string())
        );
        assert_eq!(
            check_long_flags(&strings(&["--next-token", "--"])),
            Ok(())
        );
    }

    #[test]
    fn flag_without_value_is_an_error() {
        let err = parse_flags(list_flags(), &strings(&["--next-token"])).unwrap_err();
        assert_eq!(err, ArgsError::MissingFlagValue("--next-token".to_string()));
        assert_eq!(err.to_string(), "flag \"--next-token\" requires a value");
    }

    #[test]
    fn unknown_flags_are_rejected_by_name() {
        let err = parse_flags(list_flags(), &strings(&["--start-date", "x", "--bogus", "y"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "unexpected args: --bogus");

        let err = parse_flags(list_flags(), &strings(&["extra"])).unwrap_err();
        assert_eq!(err, ArgsError::UnexpectedArgs("extra".to_string()));
    }

    #[test]
    fn leftover_positionals_are_rejected() {
        assert!(reject_positional(&[]).is_ok());
        assert_eq!(
            reject_positional(&strings(&["a", "b"])).unwrap_err().to_string(),
            "unexpected args: a b"
        );
    }
}
