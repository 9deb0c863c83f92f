//! Completions action logic.
//!
//! This module contains the logic for generating shell completions.

use clap_complete::Shell;
use std::io::Write;

use crate::{actions::help::COMPLETION_USAGE, error::CliError};

/// Generate completions for the shell named in `args` and write them to `out`.
pub fn generate_completions<W: Write>(args: &[String], out: &mut W) -> Result<(), CliError> {
    let [shell] = args else {
        return Err(CliError::Usage(COMPLETION_USAGE));
    };

    let shell = match shell.to_lowercase().as_str() {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        _ => return Err(CliError::Usage(COMPLETION_USAGE)),
    };

    // Generated from the full command tree so every subject and subcommand is listed
    let mut cmd = crate::commands::create_full_command();
    clap_complete::generate(shell, &mut cmd, "oura", out);
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: &str) -> String {
        let mut out = Vec::new();
        generate_completions(&[shell.to_string()], &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn bash_script_lists_commands_and_subcommands() {
        let script = script("bash");
        assert!(script.contains("_oura"));
        for word in ["sleep", "enhanced-tag", "webhook", "renew", "types", "--next-token"] {
            assert!(script.contains(word), "missing {word}");
        }
    }

    #[test]
    fn zsh_and_fish_scripts_target_oura() {
        assert!(script("zsh").starts_with("#compdef oura"));
        assert!(script("fish").contains("complete -c oura"));
    }

    #[test]
    fn shell_name_is_case_insensitive() {
        assert!(script("BASH").contains("_oura"));
    }

    #[test]
    fn missing_or_unknown_shell_is_a_usage_error() {
        let mut out = Vec::new();
        for args in [vec![], vec!["powershell".to_string()], vec!["bash".to_string(), "zsh".to_string()]] {
            let err = generate_completions(&args, &mut out).unwrap_err();
            assert!(matches!(err, CliError::Usage(COMPLETION_USAGE)));
        }
        assert!(out.is_empty());
    }
}
