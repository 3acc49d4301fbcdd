//! concierge CLI: single-session helpdesk assistant in the terminal

use clap::Parser;
use concierge_engine::{CannedResponder, ChatConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Single-session helpdesk assistant with a terminal UI
#[derive(Parser)]
#[command(name = "concierge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Title shown in the header
    #[arg(long)]
    title: Option<String>,

    /// Greeting that opens the conversation
    #[arg(long)]
    greeting: Option<String>,

    /// Artificial responder latency in milliseconds
    #[arg(long, default_value = "1200")]
    delay_ms: u64,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut config = ChatConfig::default();
    if let Some(title) = cli.title {
        config.title = title;
    }
    if let Some(greeting) = cli.greeting {
        config.greeting = greeting;
    }
    config.responder_delay = Duration::from_millis(cli.delay_ms);

    info!(delay_ms = cli.delay_ms, "starting concierge");

    let responder = Arc::new(CannedResponder::new(config.responder_delay));
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    if let Err(e) = rt.block_on(concierge_tui::run_tui(config, responder)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
