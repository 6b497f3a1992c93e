//! logtrace command line.
//!
//! ```text
//! logtrace check config/logtrace.toml     compile a config, print the plan
//! logtrace demo --item itemA --item ex    run the order flow through proxies
//! ```

mod demo;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use logtrace::config::{load_config, parse_config, WeaveConfig};
use logtrace::observability::logging::init_logging;
use logtrace::trace::{TraceContext, Tracer};
use logtrace::wiring::AdvisorPlan;

const DEFAULT_CONFIG: &str = include_str!("../config/logtrace.toml");

#[derive(Parser)]
#[command(name = "logtrace")]
#[command(about = "Execution tracing through advised proxies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a config file and print the compiled advisor plan as JSON
    Check {
        config: PathBuf,
    },
    /// Run the sample order flow and print the call tree
    Demo {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Item ids to order; `ex` makes the repository fail
        #[arg(short, long, default_values_t = [String::from("itemA"), String::from("ex")])]
        item: Vec<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => {
            let config = load_config(&config)?;
            init_logging(&config.logging)?;
            let plan = AdvisorPlan::compile(&config)?;
            println!("{}", serde_json::to_string_pretty(&plan.summary())?);
        }
        Commands::Demo { config, item } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => parse_config(DEFAULT_CONFIG)?,
            };
            init_logging(&config.logging)?;
            run_demo(&config, item).await?;
        }
    }

    Ok(())
}

async fn run_demo(config: &WeaveConfig, items: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let plan = AdvisorPlan::compile(config)?;
    let tracer = Tracer::new(|line: &str| println!("{}", line));
    let controller = demo::build(&plan.proxy_factory(&tracer));

    tracing::info!(advisors = plan.planned().len(), items = items.len(), "Running order demo");

    for item in items {
        // Each request gets its own task-scoped trace context.
        let outcome = TraceContext::scope(async { demo::request(&controller, &item) }).await;
        match outcome {
            Ok(result) => tracing::info!(item = %item, result = %result, "Order placed"),
            Err(err) => tracing::warn!(item = %item, error = %err, "Order failed"),
        }
    }

    let bypass = demo::no_log(&controller)?;
    tracing::info!(result = %bypass, "noLog bypassed advice");
    Ok(())
}
