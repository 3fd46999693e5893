//! Transactions command: recent charges against the user's dining accounts.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use eatery_core::{CAMPUS_TZ, SystemClock};
use eatery_net::{AccountClient, AccountTransport, HttpTransport, Transaction};

use crate::config::AccountConfig;

/// Builds an account client from configuration.
pub fn client(config: &AccountConfig) -> Result<AccountClient> {
    let pin = config
        .pin
        .as_deref()
        .context("no account PIN configured (set account.pin or EATERY_ACCOUNT__PIN)")?;
    let device_id = config
        .device_id
        .as_deref()
        .context("no device ID configured (set account.device_id or EATERY_ACCOUNT__DEVICE_ID)")?;

    let transport: Arc<dyn AccountTransport> =
        Arc::new(HttpTransport::new(config.api_url.as_str(), pin, device_id)?);
    Ok(AccountClient::new(transport, Arc::new(SystemClock))
        .with_retry_policy(config.retry_policy())
        .with_max_session_staleness(config.max_session_staleness()))
}

/// Transactions from the last `days` days, newest first.
pub async fn fetch(client: &AccountClient, days: u32, now: DateTime<Utc>) -> Result<Vec<Transaction>> {
    let start = Duration::try_days(i64::from(days))
        .and_then(|window| now.checked_sub_signed(window))
        .with_context(|| format!("a window of {days} days reaches past the supported date range"))?;
    let mut transactions = client
        .transactions(start, now)
        .await
        .context("failed to fetch transactions")?;
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
    tracing::debug!(count = transactions.len(), days, "fetched transactions");
    Ok(transactions)
}

pub fn render<W: Write>(writer: &mut W, transactions: &[Transaction]) -> Result<()> {
    if transactions.is_empty() {
        writeln!(writer, "No transactions.")?;
        return Ok(());
    }

    for tx in transactions {
        let date = tx.date.with_timezone(&CAMPUS_TZ).format("%b %-d %-I:%M %p");
        write!(
            writer,
            "{date}  {}  {:.2}  {}",
            tx.location, tx.amount, tx.account_name
        )?;
        if let Some(balance) = tx.resulting_balance {
            write!(writer, "  (balance {balance:.2})")?;
        }
        writeln!(writer)?;
    }

    let total: f64 = transactions.iter().map(|tx| tx.amount).sum();
    writeln!(writer, "Total: {total:.2}")?;
    Ok(())
}

pub fn run<W: Write>(writer: &mut W, config: &AccountConfig, days: u32) -> Result<()> {
    let client = client(config)?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let transactions = runtime.block_on(fetch(&client, days, Utc::now()))?;
    render(writer, &transactions)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use async_trait::async_trait;
    use eatery_core::SessionId;
    use eatery_net::{Account, AccountError};

    use insta::assert_snapshot;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn tx(id: &str, date: &str, location: &str, amount: f64, balance: Option<f64>) -> Transaction {
        Transaction {
            id: id.to_string(),
            amount,
            resulting_balance: balance,
            date: utc(date),
            location: location.to_string(),
            account_name: "BRBs".to_string(),
        }
    }

    /// Returns fixed transactions and records the requested window.
    #[derive(Default)]
    struct FixedTransport {
        window: Mutex<Option<(DateTime<Utc>, DateTime<Utc>)>>,
    }

    #[async_trait]
    impl AccountTransport for FixedTransport {
        async fn authenticate(&self) -> Result<SessionId, AccountError> {
            Ok(SessionId::new("session").unwrap())
        }

        async fn accounts(&self, _session: &SessionId) -> Result<Vec<Account>, AccountError> {
            Ok(Vec::new())
        }

        async fn transactions(
            &self,
            _session: &SessionId,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<Transaction>, AccountError> {
            *self.window.lock().unwrap() = Some((start, end));
            Ok(vec![
                tx("t1", "2025-01-06T17:15:00Z", "Trillium", -7.5, Some(92.5)),
                tx("t2", "2025-01-07T00:40:00Z", "Okenshields", -9.25, Some(83.25)),
            ])
        }
    }

    #[tokio::test]
    async fn fetch_requests_window_and_sorts_newest_first() {
        let transport = Arc::new(FixedTransport::default());
        let client = AccountClient::new(
            Arc::clone(&transport) as Arc<dyn AccountTransport>,
            Arc::new(SystemClock),
        );
        let now = utc("2025-01-08T12:00:00Z");

        let transactions = fetch(&client, 7, now).await.unwrap();

        assert_eq!(transactions[0].id, "t2");
        assert_eq!(transactions[1].id, "t1");
        assert_eq!(
            *transport.window.lock().unwrap(),
            Some((utc("2025-01-01T12:00:00Z"), now))
        );
    }

    #[tokio::test]
    async fn fetch_rejects_window_past_date_range() {
        let transport = Arc::new(FixedTransport::default());
        let client = AccountClient::new(
            Arc::clone(&transport) as Arc<dyn AccountTransport>,
            Arc::new(SystemClock),
        );

        let err = fetch(&client, u32::MAX, utc("2025-01-08T12:00:00Z"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("supported date range"));
        assert!(transport.window.lock().unwrap().is_none());
    }

    #[test]
    fn render_lists_transactions_in_campus_time() {
        let transactions = vec![
            tx("t2", "2025-01-07T00:40:00Z", "Okenshields", -9.25, Some(83.25)),
            tx("t1", "2025-01-06T17:15:00Z", "Trillium", -7.5, None),
        ];
        let mut output = Vec::new();
        render(&mut output, &transactions).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Jan 6 7:40 PM  Okenshields  -9.25  BRBs  (balance 83.25)
        Jan 6 12:15 PM  Trillium  -7.50  BRBs
        Total: -16.75
        ");
    }

    #[test]
    fn render_empty() {
        let mut output = Vec::new();
        render(&mut output, &[]).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "No transactions.\n");
    }

    #[test]
    fn client_requires_credentials() {
        let config = AccountConfig::default();
        let err = client(&config).unwrap_err();
        assert!(err.to_string().contains("no account PIN configured"));
    }
}
