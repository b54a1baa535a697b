//! install-boost - install a prebuilt Boost release on a CI runner

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use boost_cli::actions::{self, ActionsReporter, Outputs};
use boost_cli::{Cli, run};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging; stdout is reserved for workflow commands
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let reporter = Arc::new(ActionsReporter::stdout());

    if let Err(err) = run(&cli, reporter, &Outputs::from_env()).await {
        actions::set_failed(&format!("{err:#}"));
        return ExitCode::FAILURE;
    }

    println!("Boost download finished");
    ExitCode::SUCCESS
}
