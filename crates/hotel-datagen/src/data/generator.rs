use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::bookings::synthesize_bookings;
use super::datasets::HotelDataset;
use super::demand::DemandSignal;
use super::inventory::aggregate_inventory;
use super::rates::{synthesize_daily_rates, synthesize_market};
use crate::config::Configuration;
use crate::error::DatagenResult;

// Each phase reads its own ChaCha stream, so booking volume never shifts the
// rate or market draws for a given seed.
pub const BOOKING_STREAM: u64 = 0;
pub const DEMAND_STREAM: u64 = 1;
pub const RATE_STREAM: u64 = 2;
pub const MARKET_STREAM: u64 = 3;

pub fn phase_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// Validates `config` and produces all four tables in one synchronous pass.
pub fn generate_dataset(config: &Configuration, seed: u64) -> DatagenResult<HotelDataset> {
    config.validate()?;
    let started = Instant::now();

    let bookings = synthesize_bookings(config, &mut phase_rng(seed, BOOKING_STREAM))?;
    let inventory = aggregate_inventory(&bookings, &config.room_types, &config.stay_window)?;
    let demand = DemandSignal::draw(config, &mut phase_rng(seed, DEMAND_STREAM));
    let daily_rates = synthesize_daily_rates(config, &demand, &mut phase_rng(seed, RATE_STREAM));
    let market = synthesize_market(config, &demand, &mut phase_rng(seed, MARKET_STREAM));

    tracing::info!(
        seed,
        bookings = bookings.len(),
        inventory_rows = inventory.len(),
        daily_rate_rows = daily_rates.len(),
        market_rows = market.len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "generated hotel dataset"
    );

    Ok(HotelDataset {
        bookings,
        inventory,
        daily_rates,
        market,
    })
}
