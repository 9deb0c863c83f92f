//! Webhook subscription management.
//!
//! Every request here goes through [`WebhookApi`], i.e. with the app
//! credentials rather than the user's token.

use reqwest::{Method, StatusCode};
use std::{io::Write, str::FromStr};
use strum::VariantNames;
use tracing::debug;

use crate::{
    actions::help::WEBHOOK_USAGE,
    args::{first_flag, parse_flags, reject_positional},
    client::{escape_path_segment, webhook_payload, WebhookApi},
    commands::{params::*, webhook::subscription_command},
    error::CliError,
    format::{dashes, write_raw_json, LIST_RULE_WIDTH, RULE_WIDTH},
    model::{
        CreateWebhookSubscriptionRequest, DataType, EventType, UpdateWebhookSubscriptionRequest,
        WebhookSubscription,
    },
};

const SUBSCRIPTION_PATH: &str = "/subscription";
const RENEW_PATH: &str = "/subscription/renew";

/// A parsed and validated `oura webhook` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookCommand {
    List,
    Get(String),
    Create(CreateWebhookSubscriptionRequest),
    Update(String, UpdateWebhookSubscriptionRequest),
    Delete(String),
    Renew(String),
    Types,
}

fn parse_enum<T: FromStr>(name: &'static str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::InvalidEnum {
        name,
        value: value.to_string(),
    })
}

fn single_id(rest: &[String]) -> Result<String, CliError> {
    match rest {
        [id] => Ok(id.clone()),
        _ => Err(CliError::Usage(WEBHOOK_USAGE)),
    }
}

impl WebhookCommand {
    /// Parses the positionals after `webhook`; no request is made here.
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let Some((sub, rest)) = args.split_first() else {
            return Err(CliError::Usage(WEBHOOK_USAGE));
        };

        match sub.as_str() {
            COMMAND_LIST => {
                reject_positional(rest)?;
                Ok(WebhookCommand::List)
            }
            COMMAND_GET => Ok(WebhookCommand::Get(single_id(rest)?)),
            COMMAND_DELETE => Ok(WebhookCommand::Delete(single_id(rest)?)),
            COMMAND_RENEW => Ok(WebhookCommand::Renew(single_id(rest)?)),
            COMMAND_TYPES => Ok(WebhookCommand::Types),
            COMMAND_CREATE => {
                let flags = parse_flags(subscription_command(COMMAND_CREATE), rest)?;
                let (
                    Some(callback_url),
                    Some(verification_token),
                    Some(event_type),
                    Some(data_type),
                ) = (
                    first_flag(&flags, &PARAMETER_CALLBACK_URL),
                    first_flag(&flags, &PARAMETER_VERIFICATION_TOKEN),
                    first_flag(&flags, &PARAMETER_EVENT_TYPE),
                    first_flag(&flags, &PARAMETER_DATA_TYPE),
                )
                else {
                    return Err(CliError::MissingArgument(
                        "missing required flags; see: oura webhook create --help (or: oura webhook types)"
                            .to_string(),
                    ));
                };

                Ok(WebhookCommand::Create(CreateWebhookSubscriptionRequest {
                    callback_url: callback_url.to_string(),
                    verification_token: verification_token.to_string(),
                    event_type: parse_enum("event_type", event_type)?,
                    data_type: parse_enum("data_type", data_type)?,
                }))
            }
            COMMAND_UPDATE => {
                let Some((id, flag_args)) = rest.split_first() else {
                    return Err(CliError::Usage(WEBHOOK_USAGE));
                };
                let flags = parse_flags(subscription_command(COMMAND_UPDATE), flag_args)?;
                let Some(verification_token) =
                    first_flag(&flags, &PARAMETER_VERIFICATION_TOKEN)
                else {
                    return Err(CliError::MissingArgument(
                        "missing required flag: --verification-token".to_string(),
                    ));
                };

                let request = UpdateWebhookSubscriptionRequest {
                    verification_token: verification_token.to_string(),
                    callback_url: first_flag(&flags, &PARAMETER_CALLBACK_URL).map(str::to_string),
                    event_type: first_flag(&flags, &PARAMETER_EVENT_TYPE)
                        .map(|v| parse_enum("event_type", v))
                        .transpose()?,
                    data_type: first_flag(&flags, &PARAMETER_DATA_TYPE)
                        .map(|v| parse_enum("data_type", v))
                        .transpose()?,
                };
                Ok(WebhookCommand::Update(id.clone(), request))
            }
            _ => Err(CliError::Usage(WEBHOOK_USAGE)),
        }
    }
}

/// The `webhook types` listing.
pub fn render_types() -> String {
    let mut text = String::from("event_type:\n");
    for value in EventType::VARIANTS {
        text.push_str(&format!("  {}\n", value));
    }
    text.push_str("\ndata_type:\n");
    for value in DataType::VARIANTS {
        text.push_str(&format!("  {}\n", value));
    }
    text
}

pub fn render_subscription(heading: &str, subscription: &WebhookSubscription) -> String {
    format!(
        "{}\n{}\nID:        {}\nType:      {}/{}\nExpires:   {}\nCallback:  {}\n",
        heading,
        dashes(RULE_WIDTH),
        subscription.id,
        subscription.data_type,
        subscription.event_type,
        subscription.expiration_time,
        subscription.callback_url
    )
}

pub fn render_subscriptions(subscriptions: &[WebhookSubscription]) -> String {
    if subscriptions.is_empty() {
        return "No webhook subscriptions\n".to_string();
    }

    let mut text = format!(
        "Webhook subscriptions ({})\n{}\n",
        subscriptions.len(),
        dashes(LIST_RULE_WIDTH)
    );
    for s in subscriptions {
        text.push_str(&format!(
            "{}  {}/{}  expires={}\n  {}\n",
            s.id, s.data_type, s.event_type, s.expiration_time, s.callback_url
        ));
    }
    text
}

fn subscription_path(id: &str) -> String {
    format!("{}/{}", SUBSCRIPTION_PATH, escape_path_segment(id))
}

fn write_subscription<W: Write>(
    body: &[u8],
    heading: &str,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    if json {
        write_raw_json(out, body)?;
        return Ok(());
    }
    let subscription: WebhookSubscription =
        serde_json::from_slice(body).map_err(CliError::ResponseFormat)?;
    write!(out, "{}", render_subscription(heading, &subscription))?;
    Ok(())
}

/// Runs a parsed webhook command.
pub async fn execute<A: WebhookApi, W: Write>(
    api: &A,
    command: WebhookCommand,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        WebhookCommand::Types => write!(out, "{}", render_types())?,
        WebhookCommand::List => {
            let (body, _) = api.webhook_do(Method::GET, SUBSCRIPTION_PATH, None).await?;
            if json {
                write_raw_json(out, &body)?;
                return Ok(());
            }
            let subscriptions: Vec<WebhookSubscription> =
                serde_json::from_slice(&body).map_err(CliError::ResponseFormat)?;
            write!(out, "{}", render_subscriptions(&subscriptions))?;
        }
        WebhookCommand::Get(id) => {
            let (body, _) = api
                .webhook_do(Method::GET, &subscription_path(&id), None)
                .await?;
            write_subscription(&body, "Webhook subscription", json, out)?;
        }
        WebhookCommand::Create(request) => {
            debug!(
                "Creating {}/{} subscription",
                request.data_type, request.event_type
            );
            let payload = webhook_payload(&request)?;
            let (body, _) = api
                .webhook_do(Method::POST, SUBSCRIPTION_PATH, Some(payload))
                .await?;
            write_subscription(&body, "Created webhook subscription", json, out)?;
        }
        WebhookCommand::Update(id, request) => {
            let payload = webhook_payload(&request)?;
            let (body, _) = api
                .webhook_do(Method::PUT, &subscription_path(&id), Some(payload))
                .await?;
            write_subscription(&body, "Updated webhook subscription", json, out)?;
        }
        WebhookCommand::Delete(id) => {
            let (_, status) = api
                .webhook_do(Method::DELETE, &subscription_path(&id), None)
                .await?;
            if status != StatusCode::NO_CONTENT {
                return Err(CliError::UnexpectedStatus(status.as_u16()));
            }
            writeln!(out, "Deleted webhook subscription {}", id)?;
        }
        WebhookCommand::Renew(id) => {
            let path = format!("{}/{}", RENEW_PATH, escape_path_segment(&id));
            let (body, _) = api.webhook_do(Method::PUT, &path, None).await?;
            write_subscription(&body, "Renewed webhook subscription", json, out)?;
        }
    }
    Ok(())
}
