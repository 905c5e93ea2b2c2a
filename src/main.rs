mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use hssh::services::config_service::ConfigService;
use hssh::utils::logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        logger::init_with_level("debug");
    } else {
        logger::init();
    }

    let config = match cli.config_dir {
        Some(dir) => ConfigService::with_dir(dir)?,
        None => ConfigService::new()?,
    };
    let settings = config.load_settings()?;

    match cli.command {
        Commands::Show { files, json } => cli::show(&files, json, &settings)?,
        Commands::List { json } => cli::list(json, &settings).await?,
        Commands::Render { file } => cli::render(&file, &settings)?,
    }

    Ok(())
}
