//! Browser-based OAuth2 authorization-code flow.
//!
//! `oura auth` binds a loopback listener on the redirect port, opens the
//! system browser at the Oura consent page, and waits for the redirect to
//! arrive at `/callback`. The callback handler only validates the request and
//! hands the code (or the failure) to the waiting task over a channel; the
//! token exchange happens after the listener has been shut down.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::{
    net::TcpListener,
    sync::{mpsc, oneshot},
    time::Instant,
};
use tracing::{debug, trace, warn};
use url::Url;

use crate::{
    auth::{AuthClient, AuthError},
    browser,
    client::Endpoints,
    configuration::AppCredentials,
    token::{StoredToken, TokenStore},
};

pub const CALLBACK_PATH: &str = "/callback";
pub const SCOPES: &str = "daily heartrate personal workout spo2 stress heart_health tag session";

/// Hard limit on how long the user has to finish the consent page.
pub const AUTHORIZATION_TIMEOUT: Duration = Duration::from_secs(120);

/// How long a stopped listener may take to drain open connections.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

const CONFIRMATION_HTML: &str =
    "<html><body><h1>\u{2713} Authenticated!</h1><p>You can close this tab.</p></body></html>";

/// State of one in-progress authorization; dropped when the flow returns.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub state: String,
    pub deadline: Instant,
}

impl PendingAuthorization {
    pub fn new() -> Self {
        Self::with_timeout(AUTHORIZATION_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            state: generate_state(),
            deadline: Instant::now() + timeout,
        }
    }
}

impl Default for PendingAuthorization {
    fn default() -> Self {
        Self::new()
    }
}

/// CSRF state value taken from the nanosecond wall clock.
pub fn generate_state() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .to_string()
}

/// Builds the consent-page URL the user is sent to.
pub fn authorization_url(
    endpoints: &Endpoints,
    client_id: &str,
    state: &str,
) -> Result<Url, AuthError> {
    Ok(Url::parse_with_params(
        &endpoints.authorize_url,
        &[
            ("client_id", client_id),
            ("redirect_uri", endpoints.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", SCOPES),
            ("state", state),
        ],
    )?)
}

struct CallbackState {
    expected_state: String,
    code_tx: mpsc::Sender<String>,
    error_tx: mpsc::Sender<AuthError>,
}

async fn handle_callback(
    State(callback): State<Arc<CallbackState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    trace!("Received authorization callback");

    if params.get("state").map(String::as_str) != Some(callback.expected_state.as_str()) {
        warn!("Authorization callback carried an unexpected state");
        let _ = callback.error_tx.try_send(AuthError::StateMismatch);
        return (StatusCode::BAD_REQUEST, "State mismatch").into_response();
    }

    let code = params.get("code").map(String::as_str).unwrap_or_default();
    if code.is_empty() {
        let _ = callback.error_tx.try_send(AuthError::MissingCode);
        return (StatusCode::BAD_REQUEST, "No code").into_response();
    }

    let _ = callback.code_tx.try_send(code.to_string());
    Html(CONFIRMATION_HTML).into_response()
}

/// The loopback HTTP listener that receives the OAuth redirect.
pub struct CallbackListener {
    listener: TcpListener,
}

impl CallbackListener {
    pub async fn bind(addr: &str) -> Result<Self, AuthError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|cause| AuthError::ListenerFailed {
                addr: addr.to_string(),
                cause,
            })?;
        debug!("Callback listener bound to {}", addr);
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves `/callback` until a code or an error arrives or the deadline passes.
    ///
    /// The listener is shut down before this returns, whatever the outcome.
    pub async fn wait_for_code(self, pending: &PendingAuthorization) -> Result<String, AuthError> {
        let (code_tx, mut code_rx) = mpsc::channel::<String>(1);
        let (error_tx, mut error_rx) = mpsc::channel::<AuthError>(1);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server_errors = error_tx.clone();
        let app = Router::new()
            .route(CALLBACK_PATH, get(handle_callback))
            .with_state(Arc::new(CallbackState {
                expected_state: pending.state.clone(),
                code_tx,
                error_tx,
            }));

        let listener = self.listener;
        let mut server = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = served {
                let _ = server_errors.try_send(AuthError::ServerFailed(e));
            }
        });

        let outcome = tokio::select! {
            Some(code) = code_rx.recv() => Ok(code),
            Some(err) = error_rx.recv() => Err(err),
            _ = tokio::time::sleep_until(pending.deadline) => Err(AuthError::Timeout),
        };

        let _ = shutdown_tx.send(());
        if tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await.is_err() {
            warn!("Callback listener did not stop in time; aborting it");
            server.abort();
        }
        debug!("Callback listener stopped");

        outcome
    }
}

/// Runs the complete `oura auth` flow and persists the resulting token.
pub async fn authorize(
    credentials: &AppCredentials,
    endpoints: &Endpoints,
    store: &TokenStore,
) -> Result<StoredToken, AuthError> {
    let pending = PendingAuthorization::new();
    let url = authorization_url(endpoints, &credentials.client_id, &pending.state)?;
    let listener = CallbackListener::bind(&endpoints.callback_addr).await?;

    println!("Opening browser for authentication...");
    println!("If it doesn't open, visit:");
    println!("{}", url);
    browser::open(url.as_str());

    complete_authorization(listener, &pending, credentials, endpoints, store).await
}

/// Waits for the callback on `listener`, exchanges the code, and saves the token.
pub async fn complete_authorization(
    listener: CallbackListener,
    pending: &PendingAuthorization,
    credentials: &AppCredentials,
    endpoints: &Endpoints,
    store: &TokenStore,
) -> Result<StoredToken, AuthError> {
    let code = listener.wait_for_code(pending).await?;

    let token = AuthClient::new(credentials, endpoints)?
        .exchange_code(&code, &endpoints.redirect_uri)
        .await?;
    store.save(&token)?;
    Ok(token)
}
