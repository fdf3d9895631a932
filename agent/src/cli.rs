use clap::Parser;

/// Polls the homework review API and relays status changes to Telegram.
///
/// Tokens and the chat id come from the environment or a `.env` file:
/// PRACTICUM_TOKEN, TELEGRAM_TOKEN, TELEGRAM_CHAT_ID.
#[derive(Debug, Parser)]
#[command(name = "homework-agent", version)]
pub struct Cli {
    /// Run a single poll cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Seconds between poll cycles (overrides RETRY_INTERVAL_SECS)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: Option<u64>,

    /// Log filter, e.g. `info` or `homework_core=debug` (defaults to RUST_LOG, then `info`)
    #[arg(long)]
    pub log: Option<String>,
}
