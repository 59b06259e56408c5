//! Single-attempt login protocol and outcome classification.
//!
//! The protocol drives a page abstraction through the panel login form and
//! reduces whatever happens to a three-way classification. Exactly one
//! attempt per account, no retries; no error escapes this module.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};

/// Fixed selector contract with the panel login page. These match the markup
/// served by serv00/ct8 panels and are not user-configurable; when the site
/// changes, only this block needs updating.
pub mod selectors {
    pub const USERNAME_INPUT: &str = "#id_username";
    pub const PASSWORD_INPUT: &str = "#id_password";
    pub const LOGIN_BUTTON: &str = ".login-form__button .button--primary";
    pub const LOGOUT_LINK: &str = r#"a[href="/logout/"]"#;
}

/// Message carried by the page-contract violation where the submit control
/// is absent.
pub const MISSING_BUTTON_MESSAGE: &str = "login button not found";

/// Browser page surface the login protocol drives. Implemented by the
/// headless Chrome wrapper in production and by scripted fakes in tests.
pub trait PanelPage {
    /// Navigate to the URL and wait for the page to finish loading.
    fn navigate(&self, url: &str) -> Result<()>;

    /// Whether an element matching the selector currently exists.
    fn element_exists(&self, selector: &str) -> Result<bool>;

    /// Reset the element's content to a known-empty state.
    fn clear(&self, selector: &str) -> Result<()>;

    fn type_text(&self, selector: &str, text: &str) -> Result<()>;

    fn click(&self, selector: &str) -> Result<()>;

    /// Wait for the navigation triggered by the last interaction to settle.
    fn wait_for_navigation(&self) -> Result<()>;

    /// Probe the loaded page for an element without waiting for it.
    fn probe(&self, selector: &str) -> Result<bool>;
}

/// Three-way result of one login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStatus {
    Success,
    Failure,
    Error(String),
}

impl LoginStatus {
    /// Localized status text used in the rendered report line. The success
    /// marker here is what the aggregator scans for.
    pub fn status_text(&self) -> String {
        match self {
            LoginStatus::Success => "登录成功".to_string(),
            LoginStatus::Failure => "登录失败".to_string(),
            LoginStatus::Error(message) => format!("登录时出现错误: {}", message),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LoginStatus::Success)
    }
}

/// Outcome of one login attempt. Exactly one exists per input account, in
/// input order.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub username: String,
    pub server_label: String,
    pub status: LoginStatus,
    pub finished_utc: DateTime<Utc>,
}

impl LoginOutcome {
    /// Rendered report line, e.g. `账号（alice）（serv00-5）登录成功`.
    pub fn report_line(&self) -> String {
        format!(
            "账号（{}）（{}）{}",
            self.username,
            self.server_label,
            self.status.status_text()
        )
    }
}

/// Run the single-attempt login protocol and fold any error into the
/// three-way classification. Never returns an error: every attempt yields
/// exactly one status.
pub fn classify_login(
    page: &dyn PanelPage,
    url: &str,
    username: &str,
    password: &str,
) -> LoginStatus {
    match drive_login(page, url, username, password) {
        Ok(true) => LoginStatus::Success,
        Ok(false) => LoginStatus::Failure,
        Err(e) => LoginStatus::Error(e.to_string()),
    }
}

fn drive_login(page: &dyn PanelPage, url: &str, username: &str, password: &str) -> Result<bool> {
    page.navigate(url)?;

    // Browser autofill can pre-populate the username field; put it in a
    // known-empty state before typing. The field occasionally renders late,
    // so absence at this point is tolerated.
    if page.element_exists(selectors::USERNAME_INPUT)? {
        page.clear(selectors::USERNAME_INPUT)?;
    }

    page.type_text(selectors::USERNAME_INPUT, username)?;
    page.type_text(selectors::PASSWORD_INPUT, password)?;

    // A missing submit control is a page-contract violation, not a
    // credential failure.
    if !page.element_exists(selectors::LOGIN_BUTTON)? {
        bail!(MISSING_BUTTON_MESSAGE);
    }
    page.click(selectors::LOGIN_BUTTON)?;
    page.wait_for_navigation()?;

    // A visible logout link is the sole signal the session was established.
    page.probe(selectors::LOGOUT_LINK)
}
