mod cli;
mod transport;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use homework_core::{now_unix, Config, Poller, ThreadSleep};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use transport::UreqTransport;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    let config = load_config(|name| std::env::var(name).ok(), cli.interval_secs)?;

    let mut poller = Poller::new(&config, UreqTransport::new(), now_unix());
    if cli.once {
        let outcome = poller.run_cycle();
        info!(?outcome, "single cycle finished");
        return Ok(());
    }

    poller.run(&mut ThreadSleep);
    Ok(())
}

/// Read the config and apply the CLI interval override. A missing value
/// is reported once, by the error `main` returns.
fn load_config<F>(lookup: F, interval_secs: Option<u64>) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::from_lookup(lookup).context("environment is not configured")?;
    if let Some(secs) = interval_secs {
        config.retry_interval = Duration::from_secs(secs);
    }
    Ok(config)
}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
