use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use trader_browser::api::HttpTraderApi;
use trader_browser::browser::{CycleReport, Panels, TraderBrowser};
use trader_browser::config::{API_BASE_ENV, AppConfig, CONFIG_PATH};
use trader_browser::reporter::{self, RenderReport, RenderTrigger};
use trader_browser::state::Selection;

#[derive(Parser)]
#[command(name = "trader-browser", about = "Render tracked Polymarket traders and their trades as HTML")]
struct Args {
    /// Path to the TOML config file (optional)
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,

    /// Backend base URL, overrides config and environment
    #[arg(long)]
    api_base: Option<String>,

    /// Trader address to select before the first load
    #[arg(long)]
    select: Option<String>,

    /// Write the rendered page here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// After the first render, read trader addresses from stdin and select each one
    #[arg(long, requires = "out")]
    interactive: bool,

    /// Write the effective configuration to the config path and exit
    #[arg(long, conflicts_with_all = ["out", "interactive", "select"])]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = AppConfig::load_or_default(&args.config)?;
    config.apply_api_base_override(std::env::var(API_BASE_ENV).ok());
    config.apply_api_base_override(args.api_base.clone());

    if args.init_config {
        config.save(&args.config)?;
        eprintln!("Wrote {}", args.config.display());
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting trader browser: api={} timeout={}s refetch_on_select={}",
        config.api.base_url, config.api.timeout_secs, config.browser.refetch_on_select,
    );

    let api = HttpTraderApi::new(&config.api.base_url, config.api.timeout())
        .context("failed to build API client")?;
    let selection = match &args.select {
        Some(address) => Selection::with_address(address.trim()),
        None => Selection::new(),
    };
    let mut browser = TraderBrowser::with_selection(api, selection)
        .refetch_on_select(config.browser.refetch_on_select);

    let cycle = browser.load_traders().await;
    publish(&args.out, browser.panels(), browser.selection(), RenderTrigger::InitialLoad, &cycle)?;

    if !args.interactive {
        return Ok(());
    }

    info!("Interactive mode: enter a trader address to select it. Ctrl+C or EOF to stop.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            line = lines.next_line() => {
                let address = match line.context("failed to read stdin")? {
                    Some(line) => line.trim().to_string(),
                    None => break,
                };
                if address.is_empty() {
                    continue;
                }
                if !browser.traders().iter().any(|t| t.address == address) {
                    warn!("{address} is not in the current trader list");
                }
                let cycle = browser.click(&address).await;
                publish(&args.out, browser.panels(), browser.selection(), RenderTrigger::Click, &cycle)?;
            }
        }
    }

    Ok(())
}

/// Write the page document and, when it went to a file, a JSON report line.
fn publish(
    out: &Option<PathBuf>,
    panels: &Panels,
    selection: &Selection,
    trigger: RenderTrigger,
    cycle: &CycleReport,
) -> Result<()> {
    let document = panels.to_document();
    match out {
        Some(path) => {
            write_document(path, &document)?;
            info!("Wrote {}", path.display());
            reporter::report_render(&RenderReport::new(trigger, selection.address(), cycle));
        }
        None => print!("{document}"),
    }
    Ok(())
}

fn write_document(path: &Path, document: &str) -> Result<()> {
    std::fs::write(path, document).with_context(|| format!("failed to write {}", path.display()))
}
