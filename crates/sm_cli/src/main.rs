mod cli;
mod commands;
mod render;

use std::process::ExitCode;

use clap::Parser;
use sm_core::logging::init_logging;
use sm_sources::SummaryManager;
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::render::{render_outcome, ConsoleProgress};

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.inference_config();
    let loader = sm_inference::create_loader(&config)?;
    let cache = if config.cache { "on" } else { "off" };
    info!("🧠 Model loader initialized (using {}, cache {})", loader.name(), cache);
    let manager = SummaryManager::new(loader)?;

    if let Commands::Serve { addr } = &cli.command {
        sm_web::serve(*addr, sm_web::AppState::new(manager)).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let result = match commands::build_request(&cli.command).await {
        Ok(request) => manager.run(&request, &ConsoleProgress).await,
        Err(err) => Err(err),
    };

    match &result {
        Ok(_) => {
            print!("{}", render_outcome(&result));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::debug!("Request failed ({}): {:?}", err.kind(), err);
            eprint!("{}", render_outcome(&result));
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("An error occurred: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
