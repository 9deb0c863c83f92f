#[cfg(test)]
mod cli_help_tests {
    use assert_cmd::prelude::*;
    use predicates::prelude::*;
    use std::process::Command;

    fn oura(home: &tempfile::TempDir) -> Command {
        let mut cmd = Command::cargo_bin("oura").unwrap();
        cmd.env("HOME", home.path()).env_remove("RUST_LOG");
        cmd
    }

    #[test]
    fn test_cli_help_output() {
        let home = tempfile::tempdir().unwrap();

        for args in [vec!["help"], vec!["--help"], vec!["-h"], vec!["help", "help"]] {
            let assert_result = oura(&home).args(&args).assert().success();
            let output = assert_result.get_output();
            let help_output = String::from_utf8_lossy(&output.stdout);

            assert!(help_output.starts_with("oura - Oura Ring CLI\n"), "{args:?}");
            assert!(help_output.contains("Usage:"));
            assert!(help_output.contains("Commands:"));
            assert!(help_output.contains("Webhook subcommands:"));
            assert!(help_output.contains("--json, -j"));
            assert!(help_output.contains("Date format: YYYY-MM-DD (defaults to today)"));
        }
    }

    #[test]
    fn test_cli_subcommand_help_outputs() {
        let home = tempfile::tempdir().unwrap();
        let expectations = [
            ("auth", "Usage: oura auth"),
            ("tag", "oura tag get <document_id>"),
            ("enhanced-tag", "oura enhanced-tag [list]"),
            ("session", "oura session get <document_id>"),
            ("webhook", "oura webhook renew <id>"),
            ("personal", "oura personal-info get"),
            ("completion", "oura completion <bash|zsh|fish>"),
            ("sleep", "Usage: oura sleep [date] [--json|-j]"),
        ];

        for (subcommand, expected) in expectations {
            oura(&home)
                .args([subcommand, "--help"])
                .assert()
                .success()
                .stdout(predicate::str::contains(expected));

            oura(&home)
                .args(["help", subcommand])
                .assert()
                .success()
                .stdout(predicate::str::contains(expected));
        }
    }

    #[test]
    fn test_help_for_unknown_topic() {
        let home = tempfile::tempdir().unwrap();
        oura(&home)
            .args(["help", "bogus"])
            .assert()
            .success()
            .stderr("Unknown command for help: bogus\n\n")
            .stdout(predicate::str::starts_with("oura - Oura Ring CLI"));
    }

    #[test]
    fn test_no_arguments_prints_usage_and_fails() {
        let home = tempfile::tempdir().unwrap();
        oura(&home)
            .assert()
            .failure()
            .code(1)
            .stdout("")
            .stderr(predicate::str::starts_with("oura - Oura Ring CLI"));
    }

    #[test]
    fn test_unknown_command_prints_usage_and_fails() {
        let home = tempfile::tempdir().unwrap();
        oura(&home)
            .arg("bogus")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("Commands:"));
    }
}
