use std::io::Write;

use crate::{
    actions::help::PERSONAL_INFO_USAGE,
    client::UserCollection,
    commands::params::COMMAND_GET,
    error::CliError,
    format::{dashes, display_value, write_raw_json, RULE_WIDTH},
    model::PersonalInfo,
};

pub const PERSONAL_INFO_ENDPOINT: &str = "/personal_info";

/// Accepts no positional or a single `get`.
pub fn check_args(args: &[String]) -> Result<(), CliError> {
    match args {
        [] => Ok(()),
        [sub] if sub == COMMAND_GET => Ok(()),
        _ => Err(CliError::Usage(PERSONAL_INFO_USAGE)),
    }
}

pub fn render_personal_info(info: &PersonalInfo) -> String {
    let mut text = format!("Personal info\n{}\n", dashes(RULE_WIDTH));
    text.push_str(&format!("ID:       {}\n", info.id));
    if !info.email.is_empty() {
        text.push_str(&format!("Email:    {}\n", info.email));
    }
    if !info.biological_sex.is_empty() {
        text.push_str(&format!("Sex:      {}\n", info.biological_sex));
    }
    for (label, value) in [
        ("Age:      ", &info.age),
        ("Height:   ", &info.height),
        ("Weight:   ", &info.weight),
    ] {
        if let Some(value) = value {
            text.push_str(&format!("{}{}\n", label, display_value(value)));
        }
    }
    text
}

pub async fn fetch_personal_info<A: UserCollection, W: Write>(
    api: &A,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let body = api.api_get(PERSONAL_INFO_ENDPOINT, &[]).await?;
    if json {
        write_raw_json(out, &body)?;
        return Ok(());
    }

    let info: PersonalInfo = serde_json::from_slice(&body).map_err(CliError::ResponseFormat)?;
    write!(out, "{}", render_personal_info(&info))?;
    Ok(())
}
