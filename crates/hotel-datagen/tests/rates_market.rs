use std::collections::HashSet;

use chrono::NaiveDate;
use hotel_datagen::calendar::DateWindow;
use hotel_datagen::config::{Configuration, OccupancyPolicy, OccupancyRange, RatePlan, RoomType};
use hotel_datagen::data::demand::DemandSignal;
use hotel_datagen::data::generator::{generate_dataset, phase_rng, DEMAND_STREAM};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn config() -> Configuration {
    Configuration::basic(
        DateWindow::new(date(2024, 10, 1), date(2024, 12, 31)),
        DateWindow::new(date(2024, 12, 1), date(2025, 2, 28)),
        vec![
            RoomType::new("Standard", 50, 900_000.0),
            RoomType::new("Deluxe", 20, 1_500_000.0),
            RoomType::new("Suite", 10, 2_500_000.0),
        ],
        vec![RatePlan::percent("BAR", 0.0)],
        25,
    )
}

#[test]
fn one_rate_row_per_date_and_room_type() {
    let cfg = config();
    let dataset = generate_dataset(&cfg, 42).expect("generate");
    let days = cfg.stay_window.len_days();
    assert_eq!(days, 90);
    assert_eq!(dataset.daily_rates.len(), days * 3);
    let keys = dataset
        .daily_rates
        .iter()
        .map(|row| (row.date, row.room_type.as_str()))
        .collect::<HashSet<_>>();
    assert_eq!(keys.len(), dataset.daily_rates.len());
}

#[test]
fn one_market_row_per_date_in_order() {
    let cfg = config();
    let dataset = generate_dataset(&cfg, 42).expect("generate");
    let dates = dataset.market.iter().map(|row| row.date).collect::<Vec<_>>();
    let expected = cfg.stay_window.days().collect::<Vec<_>>();
    assert_eq!(dates, expected);
}

#[test]
fn rates_are_built_from_catalog_base_rate() {
    let cfg = config();
    let dataset = generate_dataset(&cfg, 42).expect("generate");
    for row in &dataset.daily_rates {
        let room = cfg.room_type(&row.room_type).expect("room");
        assert_eq!(row.base_rate, room.base_rate);
        assert!(row.final_rate >= 0.0);
        assert!(row.dynamic_adjustment.abs() <= room.base_rate * cfg.max_rate_adjustment + 0.01);
        assert!((row.final_rate - (row.base_rate + row.dynamic_adjustment)).abs() < 0.011);
    }
}

#[test]
fn adjustment_direction_follows_market_demand() {
    let cfg = config();
    let dataset = generate_dataset(&cfg, 42).expect("generate");
    for rate in &dataset.daily_rates {
        let market = dataset
            .market
            .iter()
            .find(|row| row.date == rate.date)
            .expect("market row");
        if market.demand_index > 0.6 {
            assert!(rate.dynamic_adjustment > 0.0, "{} {}", rate.date, rate.room_type);
        }
        if market.demand_index < 0.4 {
            assert!(rate.dynamic_adjustment < 0.0, "{} {}", rate.date, rate.room_type);
        }
    }
}

#[test]
fn market_demand_is_the_shared_signal() {
    let cfg = config();
    let dataset = generate_dataset(&cfg, 42).expect("generate");
    let signal = DemandSignal::draw(&cfg, &mut phase_rng(42, DEMAND_STREAM));
    assert_eq!(signal.len(), dataset.market.len());
    for row in &dataset.market {
        assert_eq!(Some(row.demand_index), signal.get(row.date));
        assert!((0.0..=1.0).contains(&row.demand_index));
    }
}

#[test]
fn random_occupancy_policy_bounds_demand() {
    let mut cfg = config();
    cfg.occupancy = OccupancyPolicy::Random(OccupancyRange::new(0.5, 0.95));
    let dataset = generate_dataset(&cfg, 11).expect("generate");
    assert!(dataset
        .market
        .iter()
        .all(|row| (0.5..=0.95).contains(&row.demand_index)));
}

#[test]
fn competitor_rate_tracks_mean_base_rate() {
    let cfg = config();
    let dataset = generate_dataset(&cfg, 42).expect("generate");
    let mean = cfg.mean_base_rate();
    for row in &dataset.market {
        assert!(row.competitor_rate >= mean * (1.0 - cfg.competitor_jitter) - 0.01);
        assert!(row.competitor_rate <= mean * (1.0 + cfg.competitor_jitter) + 0.01);
        assert_eq!(row.has_local_event, row.local_event != "None");
    }
}

#[test]
fn event_and_promotion_flags_respect_probabilities() {
    let mut cfg = config();
    cfg.events.clear();
    cfg.promotion_probability = 0.0;
    let dataset = generate_dataset(&cfg, 42).expect("generate");
    assert!(dataset.market.iter().all(|row| !row.has_local_event));
    assert!(dataset.daily_rates.iter().all(|row| !row.is_promotion));

    cfg.promotion_probability = 1.0;
    let dataset = generate_dataset(&cfg, 42).expect("generate");
    assert!(dataset.daily_rates.iter().all(|row| row.is_promotion));
}
