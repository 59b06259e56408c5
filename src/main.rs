use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use panelkeeper::cli::Cli;
use panelkeeper::config::{self, TelegramConfig};
use panelkeeper::notify::{self, TelegramTransport};
use panelkeeper::{report, runner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    // The only fatal error: without an account list there is nothing to do
    // and no report to send.
    let accounts = config::load_accounts(&cli.accounts)?;
    tracing::info!(
        "Loaded {} accounts from {}",
        accounts.len(),
        cli.accounts.display()
    );

    let outcomes = runner::run_accounts(&accounts).await;
    let lines: Vec<String> = outcomes.iter().map(|o| o.report_line()).collect();

    let report = report::format_report(chrono::Utc::now(), &lines);
    println!("{}", report);

    if cli.no_notify {
        tracing::info!("Notification disabled by --no-notify");
    } else {
        let telegram = TelegramConfig::from_env();
        match TelegramTransport::new() {
            Ok(transport) => notify::notify(&telegram, &transport, &report).await,
            Err(e) => tracing::error!("Failed to build Telegram client: {}", e),
        }
    }

    tracing::info!("All accounts processed");
    Ok(())
}

fn init_logger(verbose: u8) {
    let default_filter = if verbose > 0 {
        "panelkeeper=debug,info"
    } else {
        "panelkeeper=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Diagnostics go to stderr; stdout is reserved for the report itself.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
