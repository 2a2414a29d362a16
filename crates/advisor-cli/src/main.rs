//! Terminal front end for the stock advisor client
//!
//! Takes a free-text financial question, submits it to the analysis
//! service, and prints whichever view the response classifies into. Runs
//! one-shot when a query is given on the command line, otherwise as an
//! interactive prompt.

mod format;

use advisor_client::{AgentClient, ClientConfig, QuerySession, RejectReason, Submission};
use advisor_core::classify::{ClassifierOptions, TrendPolicy};
use advisor_core::render::render;
use anyhow::Context;
use clap::Parser;
use std::io::{BufRead, Write};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "advisor")]
#[command(about = "Ask the stock analysis service about any stock", long_about = None)]
struct Args {
    /// Analysis service endpoint (overrides ADVISOR_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Render a market trend below a recommendation instead of replacing it
    #[arg(long)]
    trend_overlay: bool,

    /// One-shot query; omit for an interactive session
    query: Option<String>,
}

/// Initialize tracing subscriber with default configuration
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    let mut config = ClientConfig::from_env().context("reading client configuration")?;
    if let Some(endpoint) = args.endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout_secs(secs);
    }

    let options = ClassifierOptions {
        trend_policy: if args.trend_overlay {
            TrendPolicy::Overlay
        } else {
            TrendPolicy::Primary
        },
    };

    let client = AgentClient::new(config).context("building HTTP client")?;
    info!(endpoint = %client.config().endpoint, "client ready");
    let mut session = QuerySession::new(Box::new(client), options);

    match args.query {
        Some(query) => run_once(&mut session, &query).await,
        None => run_interactive(&mut session).await,
    }
}

async fn run_once(session: &mut QuerySession, query: &str) -> anyhow::Result<()> {
    match session.ask(query).await {
        Submission::Completed(classification) => {
            print!("{}", format::format_blocks(&render(classification)));
        }
        Submission::Rejected(RejectReason::EmptyQuery) => {
            anyhow::bail!("query must not be empty");
        }
        Submission::Rejected(RejectReason::Busy) => {
            anyhow::bail!("a submission is already outstanding");
        }
    }
    Ok(())
}

async fn run_interactive(session: &mut QuerySession) -> anyhow::Result<()> {
    println!("Stock advisor. Ask about any stock (exit to quit).");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "query> ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if matches!(input, "exit" | "quit") {
            break;
        }

        match session.ask(input).await {
            Submission::Completed(classification) => {
                println!("{}", format::format_blocks(&render(classification)));
            }
            // Blank lines are a no-op, matching the submit contract.
            Submission::Rejected(RejectReason::EmptyQuery) => {}
            Submission::Rejected(RejectReason::Busy) => {
                println!("Still waiting on the previous query.");
            }
        }
    }

    Ok(())
}
