use clap::Parser;
use tracing_subscriber::EnvFilter;

use hotel_datagen::cli::{resolve_config, Args, Command};
use hotel_datagen::data::export::write_dataset;
use hotel_datagen::data::generator::generate_dataset;
use hotel_datagen::error::DatagenResult;
use hotel_datagen::stats::summarize;

fn main() -> DatagenResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = resolve_config(args.config.as_deref())?;

    match args.command {
        Command::Generate { overrides, force } => {
            overrides.apply(&mut config)?;
            let outcome = write_dataset(&args.out_dir, &config, overrides.seed, force)?;
            let state = if outcome.reused { "unchanged" } else { "written" };
            println!(
                "dataset {state} at {} (seed={}, bookings={}, inventory_rows={}, daily_rate_rows={}, market_rows={})",
                args.out_dir.display(),
                outcome.manifest.seed,
                outcome.manifest.bookings,
                outcome.manifest.inventory_rows,
                outcome.manifest.daily_rate_rows,
                outcome.manifest.market_rows,
            );
        }
        Command::Summary { overrides } => {
            overrides.apply(&mut config)?;
            let dataset = generate_dataset(&config, overrides.seed)?;
            println!("{}", serde_json::to_string_pretty(&summarize(&dataset))?);
        }
        Command::Defaults => {
            config.validate()?;
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
