use rand::Rng;

use super::datasets::{round_cents, DailyRateRow, MarketRow};
use super::demand::DemandSignal;
use crate::config::Configuration;

/// Spread of the noise added to the demand-driven adjustment factor.
const ADJUSTMENT_NOISE: f64 = 0.1;
const NO_EVENT: &str = "None";

/// Maps demand in `[0, 1]` to an adjustment factor in `[-1, 1]`: neutral at
/// 0.5, upward above it.
pub fn adjustment_factor(demand: f64, noise: f64) -> f64 {
    ((2.0 * demand - 1.0) + noise).clamp(-1.0, 1.0)
}

/// One row per (date, room type), date-major then catalog order.
pub fn synthesize_daily_rates<R: Rng + ?Sized>(
    config: &Configuration,
    demand: &DemandSignal,
    rng: &mut R,
) -> Vec<DailyRateRow> {
    let mut rows = Vec::with_capacity(demand.len() * config.room_types.len());
    for (date, demand_index) in demand.iter() {
        for room in &config.room_types {
            let noise = rng.gen_range(-ADJUSTMENT_NOISE..=ADJUSTMENT_NOISE);
            let factor = adjustment_factor(demand_index, noise);
            let dynamic_adjustment = round_cents(room.base_rate * config.max_rate_adjustment * factor);
            let final_rate = (room.base_rate + dynamic_adjustment).max(0.0);
            let is_promotion = rng.gen_bool(config.promotion_probability);
            rows.push(DailyRateRow {
                date,
                room_type: room.name.clone(),
                base_rate: room.base_rate,
                dynamic_adjustment,
                final_rate: round_cents(final_rate),
                is_promotion,
            });
        }
    }
    rows
}

/// One row per stay date. The demand index is the shared signal, not a fresh draw.
pub fn synthesize_market<R: Rng + ?Sized>(
    config: &Configuration,
    demand: &DemandSignal,
    rng: &mut R,
) -> Vec<MarketRow> {
    let mean_base_rate = config.mean_base_rate();
    let jitter = config.competitor_jitter;
    demand
        .iter()
        .map(|(date, demand_index)| {
            let event = pick_event(config, rng);
            let spread = if jitter > 0.0 {
                rng.gen_range((1.0 - jitter)..=(1.0 + jitter))
            } else {
                1.0
            };
            MarketRow {
                date,
                has_local_event: event.is_some(),
                local_event: event.unwrap_or(NO_EVENT).to_string(),
                competitor_rate: round_cents(mean_base_rate * spread),
                demand_index,
            }
        })
        .collect()
}

/// At most one event per day; the leftover probability mass means a quiet day.
fn pick_event<'c, R: Rng + ?Sized>(config: &'c Configuration, rng: &mut R) -> Option<&'c str> {
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    for event in &config.events {
        cumulative += event.probability;
        if roll < cumulative {
            return Some(event.name.as_str());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustment_follows_demand_direction() {
        assert!(adjustment_factor(0.9, 0.0) > 0.0);
        assert!(adjustment_factor(0.1, 0.0) < 0.0);
        assert_eq!(adjustment_factor(0.5, 0.0), 0.0);
    }

    #[test]
    fn adjustment_is_bounded() {
        assert_eq!(adjustment_factor(1.0, 0.1), 1.0);
        assert_eq!(adjustment_factor(0.0, -0.1), -1.0);
    }
}
