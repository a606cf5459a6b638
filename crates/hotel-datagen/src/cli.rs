use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{
    load_config, BookingVolume, Configuration, NightsPreset, OccupancyPolicy, OccupancyRange,
};
use crate::error::{DatagenError, DatagenResult};

#[derive(Debug, Parser)]
#[command(name = "hotel-datagen", about = "synthetic hotel booking dataset generator")]
pub struct Args {
    /// YAML configuration; the built-in hotel profile is used when absent.
    #[arg(long, env = "HOTEL_DATAGEN_CONFIG")]
    pub config: Option<PathBuf>,
    #[arg(long, env = "HOTEL_DATAGEN_OUT", default_value = "hotel_data")]
    pub out_dir: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the four CSV tables, the ZIP bundle and the manifest.
    Generate {
        #[command(flatten)]
        overrides: GenerationArgs,
        #[arg(long)]
        force: bool,
    },
    /// Generate in memory and print summary statistics as JSON.
    Summary {
        #[command(flatten)]
        overrides: GenerationArgs,
    },
    /// Print the effective configuration as YAML.
    Defaults,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OccupancyMode {
    Seasonal,
    Fixed,
    Random,
}

#[derive(Debug, Clone, clap::Args)]
pub struct GenerationArgs {
    #[arg(long, env = "HOTEL_DATAGEN_SEED", default_value_t = 42)]
    pub seed: u64,
    /// Exact number of bookings instead of filling to the occupancy target.
    #[arg(long)]
    pub bookings: Option<usize>,
    #[arg(long, value_enum)]
    pub occupancy: Option<OccupancyMode>,
    /// `MIN:MAX` fractions used by `--occupancy fixed|random`.
    #[arg(long)]
    pub occupancy_range: Option<String>,
    #[arg(long, value_enum)]
    pub nights: Option<NightsPreset>,
}

impl GenerationArgs {
    pub fn apply(&self, config: &mut Configuration) -> DatagenResult<()> {
        if let Some(bookings) = self.bookings {
            config.volume = BookingVolume::Count { bookings };
        }
        let range = self
            .occupancy_range
            .as_deref()
            .map(parse_occupancy_range)
            .transpose()?;
        match (self.occupancy, range) {
            (Some(OccupancyMode::Seasonal), None) => config.occupancy = OccupancyPolicy::default(),
            (Some(OccupancyMode::Fixed), range) => {
                config.occupancy =
                    OccupancyPolicy::Fixed(range.unwrap_or(OccupancyRange::new(0.5, 0.8)))
            }
            (Some(OccupancyMode::Random), range) => {
                config.occupancy = match range {
                    Some(range) => OccupancyPolicy::Random(range),
                    None => OccupancyPolicy::random_default(),
                }
            }
            (Some(OccupancyMode::Seasonal), Some(_)) | (None, Some(_)) => {
                return Err(DatagenError::InvalidArgument(
                    "--occupancy-range requires --occupancy fixed or random".to_string(),
                ))
            }
            (None, None) => {}
        }
        if let Some(preset) = self.nights {
            config.night_weights = preset.weights();
        }
        Ok(())
    }
}

pub fn parse_occupancy_range(value: &str) -> DatagenResult<OccupancyRange> {
    let Some((min, max)) = value.split_once(':') else {
        return Err(DatagenError::InvalidArgument(format!(
            "invalid occupancy range '{value}'; expected MIN:MAX"
        )));
    };
    let parse = |part: &str| {
        part.trim().parse::<f64>().map_err(|_| {
            DatagenError::InvalidArgument(format!(
                "invalid occupancy range '{value}'; '{part}' is not a number"
            ))
        })
    };
    let range = OccupancyRange::new(parse(min)?, parse(max)?);
    range
        .validate("occupancy range")
        .map_err(|error| DatagenError::InvalidArgument(error.to_string()))?;
    Ok(range)
}

pub fn resolve_config(path: Option<&Path>) -> DatagenResult<Configuration> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Configuration::default()),
    }
}
