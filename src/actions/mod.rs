//! Command logic.
//!
//! [`execute`] routes a parsed invocation to its handler. Handlers validate
//! their arguments before any configuration is read or request is sent, and
//! write their output to the writer they are given.

use std::{
    io::{self, Write},
    str::FromStr,
};
use tracing::debug;

use crate::{
    args::{ArgsError, ParsedInvocation},
    client::{Endpoints, OuraClient},
    commands::params::*,
    configuration::AppCredentials,
    error::CliError,
    login,
    model::{EnhancedTagModel, SessionModel, TagModel},
    token::TokenStore,
};

pub mod completions;
pub mod daily;
pub mod documents;
pub mod help;
pub mod personal;
pub mod summary;
pub mod webhooks;

use daily::DailyCommand;
use documents::DocumentCommand;
use help::{is_command, USAGE};
use webhooks::WebhookCommand;

/// Parses `argv` (program name first) and runs the command.
pub async fn run<I, S>(argv: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let invocation = ParsedInvocation::parse(argv).map_err(|e| match e {
        ArgsError::MissingCommand => CliError::Usage(USAGE),
        other => other.into(),
    })?;
    execute(invocation, &Endpoints::default()).await
}

/// Loads the app credentials and the token store for a remote command.
pub fn connect(endpoints: &Endpoints) -> Result<OuraClient, CliError> {
    let credentials = AppCredentials::load_default()?;
    let store = TokenStore::default_location()?;
    Ok(OuraClient::new(credentials, endpoints.clone(), store)?)
}

/// Routes a parsed invocation.
pub async fn execute(invocation: ParsedInvocation, endpoints: &Endpoints) -> Result<(), CliError> {
    let ParsedInvocation {
        command,
        positional,
        options,
    } = invocation;
    let command = command.as_str();
    let json = options.json;
    let mut out = io::stdout();

    debug!("Executing {:?} with {} positional(s)", command, positional.len());

    if options.help {
        help::print_help(command, &positional, &mut out, &mut io::stderr())?;
        return Ok(());
    }

    if command == COMMAND_AUTH {
        let credentials = AppCredentials::load_default()?;
        let store = TokenStore::default_location()?;
        login::authorize(&credentials, endpoints, &store).await?;
        writeln!(out, "✓ Authenticated successfully!")?;
        return Ok(());
    }

    if command == COMMAND_HELP {
        help::print_help(command, &positional, &mut out, &mut io::stderr())?;
        return Ok(());
    }

    if is_command(command, COMMAND_COMPLETION, ALIASES_COMPLETION) {
        return completions::generate_completions(&positional, &mut out);
    }

    if is_command(command, COMMAND_PERSONAL_INFO, ALIASES_PERSONAL_INFO) {
        personal::check_args(&positional)?;
        let client = connect(endpoints)?;
        return personal::fetch_personal_info(&client, json, &mut out).await;
    }

    if command == COMMAND_TAG {
        let document = DocumentCommand::parse(&positional, help::TAG_USAGE)?;
        let client = connect(endpoints)?;
        return documents::execute::<TagModel, _, _>(&client, &document, json, &mut out).await;
    }

    if is_command(command, COMMAND_ENHANCED_TAG, ALIASES_ENHANCED_TAG) {
        let document = DocumentCommand::parse(&positional, help::ENHANCED_TAG_USAGE)?;
        let client = connect(endpoints)?;
        return documents::execute::<EnhancedTagModel, _, _>(&client, &document, json, &mut out)
            .await;
    }

    if command == COMMAND_SESSION {
        let document = DocumentCommand::parse(&positional, help::SESSION_USAGE)?;
        let client = connect(endpoints)?;
        return documents::execute::<SessionModel, _, _>(&client, &document, json, &mut out).await;
    }

    if command == COMMAND_WEBHOOK {
        let webhook = WebhookCommand::parse(&positional)?;
        if webhook == WebhookCommand::Types {
            write!(out, "{}", webhooks::render_types())?;
            return Ok(());
        }
        let client = connect(endpoints)?;
        return webhooks::execute(&client, webhook, json, &mut out).await;
    }

    if let Ok(daily) = DailyCommand::from_str(command) {
        let date = daily::parse_date(&positional)?;
        let client = connect(endpoints)?;
        return daily::execute(&client, daily, date, json, &mut out).await;
    }

    Err(CliError::Usage(USAGE))
}

#[cfg(test)]
pub(crate) mod tests {
    use async_trait::async_trait;
    use reqwest::{Method, StatusCode};
    use std::{
        collections::{BTreeMap, BTreeSet},
        sync::Mutex,
    };

    use crate::client::{ApiError, UserCollection, WebhookApi};

    pub(crate) type Call = (String, Vec<(String, String)>);

    /// A [`UserCollection`] that answers from canned bodies and records every call.
    #[derive(Default)]
    pub(crate) struct CannedCollection {
        bodies: BTreeMap<String, String>,
        failing: BTreeSet<String>,
        fallback: Option<String>,
        calls: Mutex<Vec<Call>>,
    }

    impl CannedCollection {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, path: &str, body: &str) -> Self {
            self.bodies.insert(path.to_string(), body.to_string());
            self
        }

        /// Body returned for paths without a canned one.
        pub fn fallback(mut self, body: &str) -> Self {
            self.fallback = Some(body.to_string());
            self
        }

        /// Makes `path` answer with a 500.
        pub fn failing(mut self, path: &str) -> Self {
            self.failing.insert(path.to_string());
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UserCollection for CannedCollection {
        async fn api_get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>, ApiError> {
            self.calls.lock().unwrap().push((
                path.to_string(),
                query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            ));

            if self.failing.contains(path) {
                return Err(ApiError::Status {
                    status: 500,
                    body: "canned failure".to_string(),
                });
            }
            match self.bodies.get(path).or(self.fallback.as_ref()) {
                Some(body) => Ok(body.clone().into_bytes()),
                None => Err(ApiError::Status {
                    status: 404,
                    body: format!("no canned body for {}", path),
                }),
            }
        }
    }

    /// A [`WebhookApi`] that must never be reached.
    pub(crate) struct Unreachable;

    #[async_trait]
    impl WebhookApi for Unreachable {
        async fn webhook_do(
            &self,
            method: Method,
            path: &str,
            _payload: Option<serde_json::Value>,
        ) -> Result<(Vec<u8>, StatusCode), ApiError> {
            panic!("unexpected webhook request: {} {}", method, path);
        }
    }

    #[tokio::test]
    async fn canned_collection_records_calls_in_order() {
        let api = CannedCollection::new().with("/a", "1").fallback("2").failing("/c");
        assert_eq!(api.api_get("/a", &[]).await.unwrap(), b"1");
        assert_eq!(
            api.api_get("/b", &[("start_date", "x".to_string())]).await.unwrap(),
            b"2"
        );
        assert!(api.api_get("/c", &[]).await.is_err());

        let paths: Vec<String> = api.calls().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["/a", "/b", "/c"]);
    }

    #[tokio::test]
    async fn types_never_touch_the_network() {
        let command = super::WebhookCommand::parse(&["types".to_string()]).unwrap();
        let mut out = Vec::new();
        super::webhooks::execute(&Unreachable, command, false, &mut out)
            .await
            .unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("event_type:\n"));
    }
}
