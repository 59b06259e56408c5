use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_ACCOUNTS_PATH;

#[derive(Parser, Debug)]
#[command(name = "panelkeeper")]
#[command(about = "Keeps serv00 and ct8 hosting panel accounts alive via scheduled logins")]
#[command(version)]
pub struct Cli {
    /// Path to the JSON account list
    #[arg(short, long, default_value = DEFAULT_ACCOUNTS_PATH)]
    pub accounts: PathBuf,

    /// Verbose logging (use -v for DEBUG detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print the report without sending it to Telegram
    #[arg(long)]
    pub no_notify: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["panelkeeper"]);
        assert_eq!(cli.accounts, PathBuf::from(DEFAULT_ACCOUNTS_PATH));
        assert_eq!(cli.verbose, 0);
        assert!(!cli.no_notify);
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::parse_from(["panelkeeper", "-a", "/tmp/accounts.json", "-v", "--no-notify"]);
        assert_eq!(cli.accounts, PathBuf::from("/tmp/accounts.json"));
        assert_eq!(cli.verbose, 1);
        assert!(cli.no_notify);
    }
}
