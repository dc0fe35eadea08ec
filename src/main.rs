//! Easel CLI - drive the generation pipeline from the command line.

use std::process;
use std::str::FromStr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use easel::cli::Cli;
use easel::config::{discover_config_path, Config};
use easel::error::GenError;
use easel::output::{resolve_output_path, save_image};
use easel::pipeline::ServiceContext;
use easel::request::{AspectRatio, Quality};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), GenError> {
    let config_path = discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(GenError::Config)?;

    let account = config.account_state();
    let ctx = ServiceContext::from_account(&account, &config.broker.base_url)?;

    if cli.cocktail {
        let cocktail = ctx.cocktail().await?;
        println!("{}", cocktail.name);
        println!("{}", cocktail.recipe);
        if let Some(url) = cocktail.image_url {
            println!("{url}");
        }
        return Ok(());
    }

    let default_aspect = AspectRatio::from_str(&config.defaults.aspect_ratio)
        .map_err(GenError::Config)?;
    let default_quality =
        Quality::from_str(&config.defaults.quality).map_err(GenError::Config)?;
    let request = cli
        .build_request(&config.defaults.model, default_aspect, default_quality)
        .map_err(GenError::Io)?;

    let outcome = ctx.generate(&request).await?;

    let output_path = resolve_output_path(cli.output.as_deref(), &outcome.description);
    save_image(&outcome.image.data, &output_path)?;
    eprintln!("Saved: {}", output_path.display());
    eprintln!("Description: {}", outcome.description);
    if let Some(usage) = outcome.usage {
        eprintln!("Quota: {}/{}", usage.used, usage.limit);
    }

    Ok(())
}
