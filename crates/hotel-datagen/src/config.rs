//! Generation parameters.
//!
//! [`Configuration::default`] reproduces the hotel profile the generator ships
//! with (three room types, four rate plans, seasonal occupancy, member
//! program). [`Configuration::basic`] builds a bare profile with uniform
//! draws everywhere.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::calendar::{months_between, DateWindow};
use crate::error::{DatagenError, DatagenResult};

/// Upper bound on the stay window; every table is materialized in memory.
pub const MAX_STAY_WINDOW_DAYS: usize = 3_660;
pub const MAX_BOOKINGS: usize = 5_000_000;
pub const MAX_ROOM_COUNT: u32 = 100_000;

pub const DEFAULT_CHANNELS: [&str; 4] = ["Website", "OTA", "Direct", "Walk-in"];
pub const DEFAULT_CANCELLATION_PROBABILITY: f64 = 0.1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub booking_window: DateWindow,
    pub stay_window: DateWindow,
    /// "Today" for seasonal occupancy tiers. Falls back to the booking window end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,
    pub occupancy: OccupancyPolicy,
    pub volume: BookingVolume,
    pub room_types: Vec<RoomType>,
    pub room_selection: RoomSelection,
    pub rate_plans: Vec<RatePlan>,
    pub early_bird: Option<EarlyBirdRule>,
    pub member_program: Option<MemberProgram>,
    pub channels: Vec<Channel>,
    pub booking_date: BookingDatePolicy,
    /// Relative weight of a stay lasting `index + 1` nights.
    pub night_weights: Vec<f64>,
    pub max_guests: u32,
    pub cancellation_probability: f64,
    /// Booked rates are scaled by a factor drawn from `[1 - jitter, 1 + jitter]`.
    pub rate_jitter: f64,
    pub promotion_probability: f64,
    /// Largest dynamic adjustment, as a fraction of the base rate.
    pub max_rate_adjustment: f64,
    pub competitor_jitter: f64,
    pub events: Vec<LocalEvent>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            booking_window: DateWindow::new(date(2024, 1, 1), date(2025, 12, 31)),
            stay_window: DateWindow::new(date(2025, 1, 1), date(2026, 12, 31)),
            reference_date: None,
            occupancy: OccupancyPolicy::default(),
            volume: BookingVolume::OccupancyTarget,
            room_types: vec![
                RoomType::new("Standard", 50, 900_000.0),
                RoomType::new("Deluxe", 20, 1_500_000.0),
                RoomType::new("Suite", 10, 2_500_000.0),
            ],
            room_selection: RoomSelection::Uniform,
            rate_plans: vec![
                RatePlan::percent("BAR", 0.0),
                RatePlan::percent("Non-Refundable", 0.10),
                RatePlan::percent(EARLY_BIRD_PLAN, 0.15),
                RatePlan::fixed("Corporate", 150_000.0),
            ],
            early_bird: Some(EarlyBirdRule {
                plan: EARLY_BIRD_PLAN.to_string(),
                min_advance_days: 30,
            }),
            member_program: Some(MemberProgram {
                share: 0.3,
                discount_pct: 0.10,
            }),
            channels: vec![
                Channel::weighted("Website", 0.30, 0.35),
                Channel::weighted("OTA", 0.40, 0.15),
                Channel::weighted("Direct", 0.20, 0.45),
                Channel::weighted("Walk-in", 0.10, 0.05),
            ],
            booking_date: BookingDatePolicy::LeadTime {
                max_advance_days: 90,
            },
            night_weights: NightsPreset::Business.weights(),
            max_guests: 3,
            cancellation_probability: DEFAULT_CANCELLATION_PROBABILITY,
            rate_jitter: 0.05,
            promotion_probability: 0.1,
            max_rate_adjustment: 0.2,
            competitor_jitter: 0.2,
            events: vec![
                LocalEvent::new("Concert", 0.05),
                LocalEvent::new("Conference", 0.10),
                LocalEvent::new("Holiday", 0.05),
            ],
        }
    }
}

const EARLY_BIRD_PLAN: &str = "Early Bird (> 30 days)";

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

impl Configuration {
    /// Bare profile: exact booking count, uniform dates/rooms/plans/channels,
    /// no member program, no rate jitter.
    pub fn basic(
        booking_window: DateWindow,
        stay_window: DateWindow,
        room_types: Vec<RoomType>,
        rate_plans: Vec<RatePlan>,
        bookings: usize,
    ) -> Self {
        Self {
            booking_window,
            stay_window,
            reference_date: None,
            occupancy: OccupancyPolicy::Fixed(OccupancyRange::new(0.5, 0.8)),
            volume: BookingVolume::Count { bookings },
            room_types,
            room_selection: RoomSelection::Uniform,
            rate_plans,
            early_bird: None,
            member_program: None,
            channels: DEFAULT_CHANNELS.iter().map(|name| Channel::uniform(name)).collect(),
            booking_date: BookingDatePolicy::Uniform,
            night_weights: NightsPreset::Balanced.weights(),
            max_guests: 4,
            cancellation_probability: DEFAULT_CANCELLATION_PROBABILITY,
            rate_jitter: 0.0,
            promotion_probability: 0.1,
            max_rate_adjustment: 0.2,
            competitor_jitter: 0.2,
            events: vec![LocalEvent::new("Local Event", 0.1)],
        }
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date.unwrap_or(self.booking_window.end)
    }

    pub fn room_type(&self, name: &str) -> Option<&RoomType> {
        self.room_types.iter().find(|room| room.name == name)
    }

    pub fn rate_plan(&self, name: &str) -> Option<&RatePlan> {
        self.rate_plans.iter().find(|plan| plan.name == name)
    }

    pub fn mean_base_rate(&self) -> f64 {
        if self.room_types.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.room_types.iter().map(|room| room.base_rate).sum();
        sum / self.room_types.len() as f64
    }

    /// `sha256:<hex>` over the canonical JSON form.
    pub fn fingerprint(&self) -> DatagenResult<String> {
        let bytes = serde_json::to_vec(self)?;
        let digest = Sha256::digest(&bytes);
        Ok(format!("sha256:{digest:x}"))
    }

    pub fn to_yaml(&self) -> DatagenResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(text: &str) -> DatagenResult<Self> {
        serde_yaml::from_str(text)
            .map_err(|error| DatagenError::Configuration(format!("invalid config: {error}")))
    }

    pub fn validate(&self) -> DatagenResult<()> {
        validate_window("booking_window", &self.booking_window)?;
        validate_window("stay_window", &self.stay_window)?;
        if self.stay_window.len_days() > MAX_STAY_WINDOW_DAYS {
            return config_err(format!(
                "stay_window spans {} days; at most {MAX_STAY_WINDOW_DAYS} are supported",
                self.stay_window.len_days()
            ));
        }

        self.occupancy.validate()?;
        self.validate_volume()?;
        self.validate_room_types()?;
        self.validate_rate_plans()?;
        self.validate_channels()?;

        if let BookingDatePolicy::LeadTime { max_advance_days } = self.booking_date {
            if max_advance_days == 0 {
                return config_err("booking_date.max_advance_days must be at least 1");
            }
        }
        if self.night_weights.is_empty() {
            return config_err("night_weights must not be empty");
        }
        validate_weights("night_weights", self.night_weights.iter().copied())?;
        if self.max_guests == 0 {
            return config_err("max_guests must be at least 1");
        }

        validate_probability("cancellation_probability", self.cancellation_probability)?;
        validate_probability("promotion_probability", self.promotion_probability)?;
        validate_probability("max_rate_adjustment", self.max_rate_adjustment)?;
        validate_fraction("rate_jitter", self.rate_jitter)?;
        validate_fraction("competitor_jitter", self.competitor_jitter)?;

        let mut event_total = 0.0;
        for event in &self.events {
            if event.name.trim().is_empty() {
                return config_err("event names must not be empty");
            }
            validate_probability(&format!("events['{}'].probability", event.name), event.probability)?;
            event_total += event.probability;
        }
        if event_total > 1.0 + f64::EPSILON {
            return config_err(format!(
                "event probabilities sum to {event_total}; they must not exceed 1"
            ));
        }

        self.validate_booked_rates()
    }

    fn validate_volume(&self) -> DatagenResult<()> {
        if let BookingVolume::Count { bookings } = self.volume {
            if bookings > MAX_BOOKINGS {
                return config_err(format!(
                    "booking count {bookings} exceeds the limit of {MAX_BOOKINGS}"
                ));
            }
            if bookings > 0 && self.stay_window.start >= self.stay_window.end {
                return config_err("stay_window must span at least one night to place bookings");
            }
        }
        Ok(())
    }

    fn validate_room_types(&self) -> DatagenResult<()> {
        if self.room_types.is_empty() {
            return config_err("room_types must not be empty");
        }
        let mut seen = HashSet::new();
        for room in &self.room_types {
            if room.name.trim().is_empty() {
                return config_err("room type names must not be empty");
            }
            if !seen.insert(room.name.as_str()) {
                return config_err(format!("duplicate room type '{}'", room.name));
            }
            if room.room_count == 0 || room.room_count > MAX_ROOM_COUNT {
                return config_err(format!(
                    "room type '{}' must have room_count within 1..={MAX_ROOM_COUNT}",
                    room.name
                ));
            }
            if !(room.base_rate.is_finite() && room.base_rate > 0.0) {
                return config_err(format!("room type '{}' must have base_rate > 0", room.name));
            }
        }
        Ok(())
    }

    fn validate_rate_plans(&self) -> DatagenResult<()> {
        if self.rate_plans.is_empty() {
            return config_err("rate_plans must not be empty");
        }
        let mut seen = HashSet::new();
        for plan in &self.rate_plans {
            if plan.name.trim().is_empty() {
                return config_err("rate plan names must not be empty");
            }
            if !seen.insert(plan.name.as_str()) {
                return config_err(format!("duplicate rate plan '{}'", plan.name));
            }
            validate_fraction(&format!("rate plan '{}' discount_pct", plan.name), plan.discount_pct)?;
            if !(plan.discount_fixed.is_finite() && plan.discount_fixed >= 0.0) {
                return config_err(format!(
                    "rate plan '{}' discount_fixed must be >= 0",
                    plan.name
                ));
            }
        }

        if let Some(rule) = &self.early_bird {
            if self.rate_plan(&rule.plan).is_none() {
                return config_err(format!(
                    "early_bird plan '{}' is not in rate_plans",
                    rule.plan
                ));
            }
            if self.rate_plans.len() < 2 {
                return config_err("early_bird requires at least one other rate plan");
            }
            if rule.min_advance_days < 0 {
                return config_err("early_bird.min_advance_days must be >= 0");
            }
        }
        if let Some(member) = &self.member_program {
            validate_probability("member_program.share", member.share)?;
            validate_fraction("member_program.discount_pct", member.discount_pct)?;
        }
        Ok(())
    }

    fn validate_channels(&self) -> DatagenResult<()> {
        if self.channels.is_empty() {
            return config_err("channels must not be empty");
        }
        let mut seen = HashSet::new();
        for channel in &self.channels {
            if channel.name.trim().is_empty() {
                return config_err("channel names must not be empty");
            }
            if !seen.insert(channel.name.as_str()) {
                return config_err(format!("duplicate channel '{}'", channel.name));
            }
        }
        validate_weights("channels.weight", self.channels.iter().map(|c| c.weight))?;
        if self.member_program.is_some() {
            validate_weights(
                "channels.member_weight",
                self.channels.iter().map(|c| c.member_weight),
            )?;
        }
        Ok(())
    }

    /// Every (room type, rate plan, member) combination must price above zero
    /// even at the bottom of the jitter band.
    fn validate_booked_rates(&self) -> DatagenResult<()> {
        let member_factor = self
            .member_program
            .as_ref()
            .map_or(1.0, |member| 1.0 - member.discount_pct);
        for room in &self.room_types {
            for plan in &self.rate_plans {
                let lowest = plan.net_rate(room.base_rate) * member_factor * (1.0 - self.rate_jitter);
                if lowest < 0.01 {
                    return config_err(format!(
                        "rate plan '{}' prices room type '{}' at or below zero",
                        plan.name, room.name
                    ));
                }
            }
        }
        Ok(())
    }
}

fn config_err<T>(message: impl Into<String>) -> DatagenResult<T> {
    Err(DatagenError::Configuration(message.into()))
}

fn validate_window(field: &str, window: &DateWindow) -> DatagenResult<()> {
    if window.start > window.end {
        return config_err(format!(
            "{field} start {} is after end {}",
            window.start, window.end
        ));
    }
    Ok(())
}

fn validate_probability(field: &str, value: f64) -> DatagenResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return config_err(format!("{field} must be within [0, 1], got {value}"));
    }
    Ok(())
}

fn validate_fraction(field: &str, value: f64) -> DatagenResult<()> {
    if !(0.0..1.0).contains(&value) {
        return config_err(format!("{field} must be within [0, 1), got {value}"));
    }
    Ok(())
}

fn validate_weights(field: &str, weights: impl Iterator<Item = f64>) -> DatagenResult<()> {
    let mut total = 0.0;
    for weight in weights {
        if !(weight.is_finite() && weight >= 0.0) {
            return config_err(format!("{field} entries must be finite and >= 0"));
        }
        total += weight;
    }
    if !(total.is_finite() && total > 0.0) {
        return config_err(format!("{field} must have a positive, finite sum"));
    }
    Ok(())
}

pub fn load_config(path: impl AsRef<Path>) -> DatagenResult<Configuration> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let config: Configuration = serde_yaml::from_str(&text).map_err(|error| {
        DatagenError::Configuration(format!("invalid config '{}': {error}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OccupancyRange {
    pub min: f64,
    pub max: f64,
}

impl OccupancyRange {
    pub const UNIT: Self = Self { min: 0.0, max: 1.0 };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn validate(&self, field: &str) -> DatagenResult<()> {
        validate_probability(&format!("{field}.min"), self.min)?;
        validate_probability(&format!("{field}.max"), self.max)?;
        if self.min > self.max {
            return config_err(format!("{field}.min must not exceed {field}.max"));
        }
        Ok(())
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OccupancyPolicy {
    Fixed(OccupancyRange),
    /// Like `Fixed`, and the market demand index is drawn from the same range.
    Random(OccupancyRange),
    /// Tiers by months ahead of the reference date: 0..=3 (and past), 4..=6, 7..=9, 10+.
    Seasonal { tiers: [OccupancyRange; 4] },
}

impl Default for OccupancyPolicy {
    fn default() -> Self {
        Self::Seasonal {
            tiers: [
                OccupancyRange::new(0.75, 0.90),
                OccupancyRange::new(0.55, 0.75),
                OccupancyRange::new(0.40, 0.60),
                OccupancyRange::new(0.25, 0.45),
            ],
        }
    }
}

impl OccupancyPolicy {
    pub fn random_default() -> Self {
        Self::Random(OccupancyRange::new(0.50, 0.95))
    }

    fn validate(&self) -> DatagenResult<()> {
        match self {
            Self::Fixed(range) | Self::Random(range) => range.validate("occupancy"),
            Self::Seasonal { tiers } => tiers
                .iter()
                .enumerate()
                .try_for_each(|(idx, tier)| tier.validate(&format!("occupancy.tiers[{idx}]"))),
        }
    }

    /// Target occupancy band for stays on `date`.
    pub fn target_range(&self, date: NaiveDate, reference: NaiveDate) -> OccupancyRange {
        match self {
            Self::Fixed(range) | Self::Random(range) => *range,
            Self::Seasonal { tiers } => tiers[seasonal_tier(months_between(reference, date))],
        }
    }

    /// Range the per-date demand index is drawn from.
    pub fn demand_range(&self) -> OccupancyRange {
        match self {
            Self::Random(range) => *range,
            Self::Fixed(_) | Self::Seasonal { .. } => OccupancyRange::UNIT,
        }
    }
}

/// Zero-based tier index for a stay `months_ahead` of the reference month.
pub fn seasonal_tier(months_ahead: i32) -> usize {
    match months_ahead {
        i32::MIN..=3 => 0,
        4..=6 => 1,
        7..=9 => 2,
        _ => 3,
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BookingVolume {
    Count { bookings: usize },
    /// Fill each (date, room type) up to the occupancy policy's target.
    OccupancyTarget,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub name: String,
    pub room_count: u32,
    pub base_rate: f64,
}

impl RoomType {
    pub fn new(name: impl Into<String>, room_count: u32, base_rate: f64) -> Self {
        Self {
            name: name.into(),
            room_count,
            base_rate,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomSelection {
    Uniform,
    WeightedByCount,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatePlan {
    pub name: String,
    pub discount_pct: f64,
    /// Flat amount taken off after the percentage discount.
    #[serde(default)]
    pub discount_fixed: f64,
}

impl RatePlan {
    pub fn percent(name: impl Into<String>, discount_pct: f64) -> Self {
        Self {
            name: name.into(),
            discount_pct,
            discount_fixed: 0.0,
        }
    }

    pub fn fixed(name: impl Into<String>, discount_fixed: f64) -> Self {
        Self {
            name: name.into(),
            discount_pct: 0.0,
            discount_fixed,
        }
    }

    pub fn net_rate(&self, base_rate: f64) -> f64 {
        base_rate * (1.0 - self.discount_pct) - self.discount_fixed
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EarlyBirdRule {
    pub plan: String,
    pub min_advance_days: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberProgram {
    pub share: f64,
    /// Stacks on top of the rate plan discount.
    pub discount_pct: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub weight: f64,
    pub member_weight: f64,
}

impl Channel {
    pub fn uniform(name: &str) -> Self {
        Self::weighted(name, 1.0, 1.0)
    }

    pub fn weighted(name: &str, weight: f64, member_weight: f64) -> Self {
        Self {
            name: name.to_string(),
            weight,
            member_weight,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BookingDatePolicy {
    Uniform,
    /// Book 1..=max_advance_days before arrival, clamped into the booking window.
    LeadTime { max_advance_days: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalEvent {
    pub name: String,
    pub probability: f64,
}

impl LocalEvent {
    pub fn new(name: &str, probability: f64) -> Self {
        Self {
            name: name.to_string(),
            probability,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum NightsPreset {
    /// 1-2 nights common.
    Business,
    /// 3-5 nights common.
    Resort,
    Balanced,
}

impl NightsPreset {
    pub fn weights(self) -> Vec<f64> {
        let weights: [f64; 7] = match self {
            Self::Business => [35.0, 30.0, 15.0, 10.0, 7.0, 2.0, 1.0],
            Self::Resort => [10.0, 15.0, 25.0, 25.0, 15.0, 7.0, 3.0],
            Self::Balanced => [14.0, 14.0, 14.0, 14.0, 14.0, 15.0, 15.0],
        };
        weights.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasonal_tier_boundaries() {
        assert_eq!(seasonal_tier(-5), 0);
        assert_eq!(seasonal_tier(0), 0);
        assert_eq!(seasonal_tier(3), 0);
        assert_eq!(seasonal_tier(4), 1);
        assert_eq!(seasonal_tier(6), 1);
        assert_eq!(seasonal_tier(7), 2);
        assert_eq!(seasonal_tier(9), 2);
        assert_eq!(seasonal_tier(10), 3);
        assert_eq!(seasonal_tier(30), 3);
    }

    #[test]
    fn default_profile_is_valid() {
        Configuration::default()
            .validate()
            .expect("default configuration should validate");
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = Configuration::default();
        let mut b = a.clone();
        assert_eq!(a.fingerprint().expect("fp"), b.fingerprint().expect("fp"));
        b.max_guests += 1;
        assert_ne!(a.fingerprint().expect("fp"), b.fingerprint().expect("fp"));
    }
}
