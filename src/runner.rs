//! Sequential account processing loop.
//!
//! One fresh browser per account, fully torn down before the next account
//! begins. There is no overlap between iterations; the only state carried
//! across them is the append-only outcome list.

use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::task;
use tracing::{error, info};

use crate::browser::{create_browser, ChromePage};
use crate::config::Account;
use crate::login::{classify_login, LoginOutcome, LoginStatus};
use crate::panel;
use crate::report;

/// Bounds of the randomized pause after each account, in milliseconds.
/// Keeps the request pattern against the panels from looking bursty.
const DELAY_MIN_MS: u64 = 1000;
const DELAY_MAX_MS: u64 = 6000;

/// Process every account in order. Always yields exactly one outcome per
/// account; no error escapes an iteration.
pub async fn run_accounts(accounts: &[Account]) -> Vec<LoginOutcome> {
    let mut results = Vec::with_capacity(accounts.len());

    for account in accounts {
        let url = panel::login_url(account.domain.as_deref(), account.panel_num);
        let server_label = panel::server_label(account.domain.as_deref(), account.panel_num);
        info!("Attempting login for account {} at {}", account.username, url);

        let status = attempt_login(account.clone(), url).await;
        let outcome = LoginOutcome {
            username: account.username.clone(),
            server_label,
            status,
            finished_utc: Utc::now(),
        };
        log_outcome(&outcome);
        results.push(outcome);

        pause_between_accounts().await;
    }

    results
}

/// One blocking browser session for one account. The Chrome process dies
/// with the `browser` binding at the end of the closure, success or not.
async fn attempt_login(account: Account, url: String) -> LoginStatus {
    let handle = task::spawn_blocking(move || -> anyhow::Result<LoginStatus> {
        let browser = create_browser()?;
        let page = ChromePage::open(&browser)?;
        Ok(classify_login(
            &page,
            &url,
            &account.username,
            &account.password,
        ))
    });

    match handle.await {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => LoginStatus::Error(e.to_string()),
        Err(e) => LoginStatus::Error(format!("login task panicked: {}", e)),
    }
}

fn log_outcome(outcome: &LoginOutcome) {
    let beijing = report::format_chinese_timestamp(report::beijing_time(outcome.finished_utc));
    let utc = outcome.finished_utc.format("%Y-%m-%d %H:%M:%S");

    match &outcome.status {
        LoginStatus::Error(message) => error!(
            "Account {} ({}) errored during login: {}",
            outcome.username, outcome.server_label, message
        ),
        status => info!(
            "Account {} ({}) {} at Beijing time {} (UTC {})",
            outcome.username,
            outcome.server_label,
            if status.is_success() { "logged in" } else { "was rejected" },
            beijing,
            utc
        ),
    }
}

async fn pause_between_accounts() {
    let delay_ms = rand::thread_rng().gen_range(DELAY_MIN_MS..DELAY_MAX_MS);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}
