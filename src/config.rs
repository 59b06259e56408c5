//! Account list loading and notifier credentials.
//!
//! Accounts are read once at startup from a JSON file (an array of account
//! objects). A load or validation failure aborts the run before any account
//! is processed. Telegram credentials come from the environment and are
//! optional; without them the final notification is skipped.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Accounts file path relative to the working directory.
pub const DEFAULT_ACCOUNTS_PATH: &str = "./accounts.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Accounts file not found at {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read accounts file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse accounts file: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Account {index}: field '{field}' cannot be empty")]
    EmptyRequired { index: usize, field: &'static str },
}

/// One configured login target. The JSON field `panelnum` keeps the wire
/// format of existing account files.
#[derive(Clone, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
    #[serde(rename = "panelnum")]
    pub panel_num: u32,
    #[serde(default)]
    pub domain: Option<String>,
}

// The password must never reach logs or debug dumps.
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("panel_num", &self.panel_num)
            .field("domain", &self.domain)
            .finish()
    }
}

/// Load the ordered account list from a JSON file.
pub fn load_accounts(path: &Path) -> Result<Vec<Account>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let accounts: Vec<Account> = serde_json::from_str(&content)?;
    validate(&accounts)?;
    Ok(accounts)
}

fn validate(accounts: &[Account]) -> Result<(), ConfigError> {
    for (index, account) in accounts.iter().enumerate() {
        if account.username.is_empty() {
            return Err(ConfigError::EmptyRequired { index, field: "username" });
        }
        if account.password.is_empty() {
            return Err(ConfigError::EmptyRequired { index, field: "password" });
        }
    }
    Ok(())
}

/// Telegram delivery credentials, read from the environment. Either field
/// missing disables notification.
#[derive(Clone, Default)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

impl TelegramConfig {
    pub const TOKEN_ENV: &'static str = "TELEGRAM_BOT_TOKEN";
    pub const CHAT_ID_ENV: &'static str = "TELEGRAM_CHAT_ID";

    pub fn from_env() -> Self {
        Self {
            bot_token: env_non_empty(Self::TOKEN_ENV),
            chat_id: env_non_empty(Self::CHAT_ID_ENV),
        }
    }

    /// Both credentials, or `None` if either is missing.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.bot_token.as_deref(), self.chat_id.as_deref()) {
            (Some(token), Some(chat_id)) => Some((token, chat_id)),
            _ => None,
        }
    }
}

// The bot token is a secret.
impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_accounts_parse_with_and_without_domain() {
        let json = r#"[
            {"username": "alice", "password": "pw1", "panelnum": 3, "domain": "ct8.pl"},
            {"username": "bob", "password": "pw2", "panelnum": 5}
        ]"#;

        let accounts: Vec<Account> = serde_json::from_str(json).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].username, "alice");
        assert_eq!(accounts[0].panel_num, 3);
        assert_eq!(accounts[0].domain.as_deref(), Some("ct8.pl"));
        assert_eq!(accounts[1].domain, None);
    }

    #[test]
    fn test_load_accounts_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"[{{"username": "alice", "password": "pw", "panelnum": 1}}]"#
        )
        .unwrap();

        let accounts = load_accounts(&path).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].username, "alice");
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let result = load_accounts(Path::new("./no-such-accounts.json"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_empty_username_rejected() {
        let json = r#"[{"username": "", "password": "pw", "panelnum": 1}]"#;
        let accounts: Vec<Account> = serde_json::from_str(json).unwrap();
        let result = validate(&accounts);
        assert!(matches!(
            result,
            Err(ConfigError::EmptyRequired { index: 0, field: "username" })
        ));
    }

    #[test]
    fn test_account_debug_redacts_password() {
        let account = Account {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
            panel_num: 1,
            domain: None,
        };

        let debug = format!("{:?}", account);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_telegram_credentials_require_both() {
        let both = TelegramConfig {
            bot_token: Some("token".to_string()),
            chat_id: Some("42".to_string()),
        };
        assert_eq!(both.credentials(), Some(("token", "42")));

        let token_only = TelegramConfig {
            bot_token: Some("token".to_string()),
            chat_id: None,
        };
        assert_eq!(token_only.credentials(), None);
        assert_eq!(TelegramConfig::default().credentials(), None);
    }
}
