//! HTTP transport for the campus account service.
//!
//! The service speaks a JSON-RPC style protocol: every call is a POST of
//! `{"version", "method", "params"}` to a service path, and every reply is an
//! envelope of `{"response", "exception"}` where a non-null `exception`
//! signals failure even on HTTP 200.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use eatery_core::SessionId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::account::{Account, AccountError, AccountTransport, Transaction};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const PROTOCOL_VERSION: &str = "1";
const MAX_TRANSACTIONS: u32 = 100;

/// Production endpoint of the account service.
pub const DEFAULT_API_URL: &str = "https://services.get.cbord.com/GETServices/services/json";

/// Account service client.
///
/// Cheap to clone; clones share the underlying HTTP connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    pin: String,
    device_id: String,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("pin", &"[REDACTED]")
            .field("device_id", &self.device_id)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Creates a transport authenticating with `pin` on behalf of `device_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the PIN or device ID is empty, or if the HTTP
    /// client fails to build.
    pub fn new(
        base_url: impl Into<String>,
        pin: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Result<Self, AccountError> {
        let pin = pin.into();
        let device_id = device_id.into();

        if pin.trim().is_empty() {
            return Err(AccountError::InvalidCredentials {
                reason: "PIN cannot be empty",
            });
        }
        if device_id.trim().is_empty() {
            return Err(AccountError::InvalidCredentials {
                reason: "device ID cannot be empty",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            pin,
            device_id,
        })
    }

    async fn call<R: DeserializeOwned>(
        &self,
        service: &str,
        method: &str,
        params: Value,
    ) -> Result<R, AccountError> {
        let url = format!("{}/{service}", self.base_url.trim_end_matches('/'));
        let request = RpcRequest {
            version: PROTOCOL_VERSION,
            method,
            params,
        };

        tracing::debug!(%url, method, "calling account service");
        let response = self.http.post(&url).json(&request).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AccountError::Api {
                message: format!("status {status}: {body}"),
            });
        }
        parse_envelope(&body)
    }
}

#[async_trait]
impl AccountTransport for HttpTransport {
    async fn authenticate(&self) -> Result<SessionId, AccountError> {
        let session: String = self
            .call(
                "authentication",
                "authenticatePIN",
                json!({ "pin": self.pin, "deviceId": self.device_id }),
            )
            .await?;
        SessionId::new(session).map_err(|err| AccountError::InvalidResponse(err.to_string()))
    }

    async fn accounts(&self, session: &SessionId) -> Result<Vec<Account>, AccountError> {
        let payload: AccountsPayload = self
            .call(
                "commerce",
                "retrieveAccounts",
                json!({ "sessionId": session.as_str() }),
            )
            .await?;
        Ok(payload.accounts.into_iter().map(Account::from).collect())
    }

    async fn transactions(
        &self,
        session: &SessionId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, AccountError> {
        let payload: TransactionsPayload = self
            .call(
                "commerce",
                "retrieveTransactionHistoryWithinDateRange",
                json!({
                    "sessionId": session.as_str(),
                    "paymentSystemType": 0,
                    "queryCriteria": {
                        "maxReturnMostRecent": MAX_TRANSACTIONS,
                        "oldestDate": start.to_rfc3339_opts(SecondsFormat::Millis, true),
                        "newestDate": end.to_rfc3339_opts(SecondsFormat::Millis, true),
                        "accountId": null,
                    },
                }),
            )
            .await?;
        Ok(payload
            .transactions
            .into_iter()
            .map(Transaction::from)
            .collect())
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    version: &'static str,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountsPayload {
    accounts: Vec<WireAccount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAccount {
    id: String,
    account_display_name: String,
    #[serde(default)]
    balance: Option<f64>,
}

impl From<WireAccount> for Account {
    fn from(wire: WireAccount) -> Self {
        Self {
            id: wire.id,
            name: wire.account_display_name,
            balance: wire.balance,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionsPayload {
    #[serde(default)]
    transactions: Vec<WireTransaction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTransaction {
    transaction_id: String,
    amount: f64,
    #[serde(default)]
    resulting_balance: Option<f64>,
    actual_date: DateTime<Utc>,
    location_name: String,
    account_name: String,
}

impl From<WireTransaction> for Transaction {
    fn from(wire: WireTransaction) -> Self {
        Self {
            id: wire.transaction_id,
            amount: wire.amount,
            resulting_balance: wire.resulting_balance,
            date: wire.actual_date,
            location: wire.location_name,
            account_name: wire.account_name,
        }
    }
}

fn parse_envelope<R: DeserializeOwned>(body: &str) -> Result<R, AccountError> {
    #[derive(Deserialize)]
    struct Envelope<R> {
        response: Option<R>,
        #[serde(default)]
        exception: Option<Value>,
    }

    let envelope: Envelope<R> =
        serde_json::from_str(body).map_err(|err| AccountError::InvalidResponse(err.to_string()))?;
    if let Some(exception) = envelope.exception {
        return Err(AccountError::Api {
            message: exception_message(&exception),
        });
    }
    envelope
        .response
        .ok_or_else(|| AccountError::InvalidResponse("missing response".to_string()))
}

fn exception_message(exception: &Value) -> String {
    match exception {
        Value::String(message) => message.clone(),
        Value::Object(fields) => fields
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| exception.to_string(), str::to_string),
        other => other.to_string(),
    }
}
