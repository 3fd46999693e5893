//! Authenticated account access.
//!
//! Every account request needs a session ID. Sessions expire server-side
//! without notice, so [`AccountClient`] caches the ID with a staleness bound
//! and, when a request fails, drops the cached session and tries again with
//! a fresh one.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use eatery_core::{Clock, SessionId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::cache::Cached;
use crate::retry::{RetryPolicy, with_retry};

/// How long a session ID is reused before re-authenticating.
pub const DEFAULT_MAX_SESSION_STALENESS_SECS: i64 = 15 * 60;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Account access errors.
///
/// Cloneable so one failed session fetch can be handed to every caller
/// waiting on it.
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    /// Credentials were missing or malformed.
    #[error("invalid credentials: {reason}")]
    InvalidCredentials { reason: &'static str },
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[source] Arc<reqwest::Error>),
    /// The service reported an error.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse a response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for AccountError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(Arc::new(err))
    }
}

/// A dining account (meal swipes, BRBs, laundry and so on).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
}

/// One charge or deposit against an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resulting_balance: Option<f64>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub account_name: String,
}

/// The wire side of account access.
#[async_trait]
pub trait AccountTransport: Send + Sync {
    /// Starts a new session.
    async fn authenticate(&self) -> Result<SessionId, AccountError>;

    async fn accounts(&self, session: &SessionId) -> Result<Vec<Account>, AccountError>;

    /// Transactions posted in `[start, end]`.
    async fn transactions(
        &self,
        session: &SessionId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, AccountError>;
}

/// Signals published by [`AccountClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountEvent {
    /// A new session ID was obtained.
    SessionRefreshed,
    /// The user logged out and the session was dropped.
    LoggedOut,
}

/// Account operations over a cached session.
pub struct AccountClient {
    transport: Arc<dyn AccountTransport>,
    session: Cached<SessionId, AccountError>,
    retry: RetryPolicy,
    max_session_staleness: Duration,
    events: broadcast::Sender<AccountEvent>,
}

impl std::fmt::Debug for AccountClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountClient")
            .field("session", &self.session)
            .field("retry", &self.retry)
            .field("max_session_staleness", &self.max_session_staleness)
            .finish_non_exhaustive()
    }
}

impl AccountClient {
    pub fn new(transport: Arc<dyn AccountTransport>, clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let session = {
            let transport = Arc::clone(&transport);
            let events = events.clone();
            Cached::new(clock, move || {
                let transport = Arc::clone(&transport);
                let events = events.clone();
                async move {
                    let session = transport.authenticate().await?;
                    tracing::debug!("obtained new account session");
                    // No subscribers is fine.
                    let _ = events.send(AccountEvent::SessionRefreshed);
                    Ok::<_, AccountError>(session)
                }
            })
        };

        Self {
            transport,
            session,
            retry: RetryPolicy::default(),
            max_session_staleness: Duration::seconds(DEFAULT_MAX_SESSION_STALENESS_SECS),
            events,
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_max_session_staleness(mut self, staleness: Duration) -> Self {
        self.max_session_staleness = staleness;
        self
    }

    /// Receives [`AccountEvent`]s published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<AccountEvent> {
        self.events.subscribe()
    }

    /// The current session ID, authenticating if needed.
    pub async fn session_id(&self) -> Result<SessionId, AccountError> {
        self.session.fetch(self.max_session_staleness).await
    }

    pub async fn accounts(&self) -> Result<Vec<Account>, AccountError> {
        with_retry(
            self.retry,
            || self.session.invalidate(),
            || async move {
                let session = self.session_id().await?;
                self.transport.accounts(&session).await
            },
        )
        .await
    }

    /// Transactions posted in `[start, end]`.
    pub async fn transactions(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, AccountError> {
        with_retry(
            self.retry,
            || self.session.invalidate(),
            || async move {
                let session = self.session_id().await?;
                self.transport.transactions(&session, start, end).await
            },
        )
        .await
    }

    /// Drops the session and tells subscribers.
    pub fn logout(&self) {
        self.session.invalidate();
        let _ = self.events.send(AccountEvent::LoggedOut);
        tracing::info!("logged out");
    }
}
