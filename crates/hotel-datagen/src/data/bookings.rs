use chrono::{Duration, NaiveDate};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use super::datasets::{round_cents, Booking};
use crate::calendar::{stay_nights, DateRange};
use crate::config::{BookingDatePolicy, BookingVolume, Configuration, RatePlan, RoomSelection, RoomType};
use crate::error::{DatagenError, DatagenResult};

/// Draws bookings one at a time against a validated [`Configuration`].
///
/// Every booking consumes its random draws in a fixed order (booking date,
/// nights, rate plan, membership, channel, rate jitter, guests, cancellation),
/// so a seed pins the whole sequence.
pub struct BookingSynthesizer<'a> {
    config: &'a Configuration,
    nights: WeightedIndex<f64>,
    channels: WeightedIndex<f64>,
    member_channels: Option<WeightedIndex<f64>>,
    rooms: Option<WeightedIndex<u64>>,
    regular_plans: Vec<&'a RatePlan>,
    early_bird_plan: Option<&'a RatePlan>,
    next_id: usize,
}

impl<'a> BookingSynthesizer<'a> {
    pub fn new(config: &'a Configuration) -> DatagenResult<Self> {
        let nights = weighted(config.night_weights.iter().copied(), "night_weights")?;
        let channels = weighted(config.channels.iter().map(|c| c.weight), "channels.weight")?;
        let member_channels = match config.member_program {
            Some(_) => Some(weighted(
                config.channels.iter().map(|c| c.member_weight),
                "channels.member_weight",
            )?),
            None => None,
        };
        let rooms = match config.room_selection {
            RoomSelection::Uniform => None,
            RoomSelection::WeightedByCount => Some(weighted(
                config.room_types.iter().map(|room| u64::from(room.room_count)),
                "room_types.room_count",
            )?),
        };

        let early_bird_plan = config
            .early_bird
            .as_ref()
            .and_then(|rule| config.rate_plan(&rule.plan));
        let regular_plans = config
            .rate_plans
            .iter()
            .filter(|plan| early_bird_plan.map_or(true, |early| early.name != plan.name))
            .collect::<Vec<_>>();
        if regular_plans.is_empty() {
            return Err(DatagenError::Configuration(
                "no rate plan is available for regular bookings".to_string(),
            ));
        }

        Ok(Self {
            config,
            nights,
            channels,
            member_channels,
            rooms,
            regular_plans,
            early_bird_plan,
            next_id: 1,
        })
    }

    pub fn pick_room<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a RoomType {
        let idx = match &self.rooms {
            Some(dist) => dist.sample(rng),
            None => rng.gen_range(0..self.config.room_types.len()),
        };
        &self.config.room_types[idx]
    }

    /// Uniform over `[stay.start, stay.end)`: the last stay day cannot start a night.
    pub fn pick_arrival<R: Rng + ?Sized>(&self, rng: &mut R) -> DatagenResult<NaiveDate> {
        let stay = &self.config.stay_window;
        let span = (stay.end - stay.start).num_days();
        if span <= 0 {
            return Err(DatagenError::Generation(format!(
                "stay window {}..{} has no night to book",
                stay.start, stay.end
            )));
        }
        add_days(stay.start, rng.gen_range(0..span))
    }

    pub fn draw<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        room: &RoomType,
        arrival: NaiveDate,
    ) -> DatagenResult<Booking> {
        let config = self.config;
        let booking_date = self.pick_booking_date(rng, arrival)?;

        let max_nights = (config.stay_window.end - arrival).num_days();
        let drawn_nights = self.nights.sample(rng) as i64 + 1;
        let nights = drawn_nights.min(max_nights);
        let departure_date = add_days(arrival, nights)?;

        let plan = self.pick_plan(rng, booking_date, arrival);

        let is_member = match &config.member_program {
            Some(member) => rng.gen_bool(member.share),
            None => false,
        };
        let channel_idx = match (&self.member_channels, is_member) {
            (Some(dist), true) => dist.sample(rng),
            _ => self.channels.sample(rng),
        };

        let mut rate = plan.net_rate(room.base_rate);
        if let (Some(member), true) = (&config.member_program, is_member) {
            rate *= 1.0 - member.discount_pct;
        }
        if config.rate_jitter > 0.0 {
            rate *= rng.gen_range((1.0 - config.rate_jitter)..=(1.0 + config.rate_jitter));
        }
        let booked_rate = round_cents(rate);

        let guests = rng.gen_range(1..=config.max_guests);
        let is_cancelled = rng.gen_bool(config.cancellation_probability);
        let revenue = if is_cancelled {
            0.0
        } else {
            round_cents(booked_rate * nights as f64)
        };

        let booking = Booking {
            booking_id: format_booking_id(self.next_id),
            booking_date,
            arrival_date: arrival,
            departure_date,
            room_type: room.name.clone(),
            rate_plan: plan.name.clone(),
            booked_rate,
            nights: nights as u32,
            guests,
            channel: config.channels[channel_idx].name.clone(),
            is_member,
            is_cancelled,
            revenue,
        };
        check_booking(config, &booking)?;
        self.next_id += 1;
        Ok(booking)
    }

    fn pick_booking_date<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        arrival: NaiveDate,
    ) -> DatagenResult<NaiveDate> {
        let window = &self.config.booking_window;
        match self.config.booking_date {
            BookingDatePolicy::Uniform => {
                let span = (window.end - window.start).num_days();
                add_days(window.start, rng.gen_range(0..=span))
            }
            BookingDatePolicy::LeadTime { max_advance_days } => {
                let reachable = (arrival - window.start).num_days();
                let max_advance = reachable.min(i64::from(max_advance_days));
                let drawn = if max_advance > 0 {
                    add_days(arrival, -rng.gen_range(1..=max_advance))?
                } else {
                    window.start
                };
                Ok(drawn.clamp(window.start, window.end))
            }
        }
    }

    fn pick_plan<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        booking_date: NaiveDate,
        arrival: NaiveDate,
    ) -> &'a RatePlan {
        if let (Some(rule), Some(plan)) = (&self.config.early_bird, self.early_bird_plan) {
            if (arrival - booking_date).num_days() > rule.min_advance_days {
                return plan;
            }
        }
        self.regular_plans[rng.gen_range(0..self.regular_plans.len())]
    }
}

pub fn format_booking_id(sequence: usize) -> String {
    format!("BKG{sequence:05}")
}

/// Runs the configured booking volume and returns bookings in creation order.
pub fn synthesize_bookings<R: Rng + ?Sized>(
    config: &Configuration,
    rng: &mut R,
) -> DatagenResult<Vec<Booking>> {
    let mut synth = BookingSynthesizer::new(config)?;
    let bookings = match config.volume {
        BookingVolume::Count { bookings } => {
            let mut out = Vec::with_capacity(bookings);
            for _ in 0..bookings {
                let room = synth.pick_room(rng);
                let arrival = synth.pick_arrival(rng)?;
                out.push(synth.draw(rng, room, arrival)?);
            }
            out
        }
        BookingVolume::OccupancyTarget => fill_to_occupancy(config, &mut synth, rng)?,
    };

    tracing::debug!(
        bookings = bookings.len(),
        cancelled = bookings.iter().filter(|b| b.is_cancelled).count(),
        "synthesized bookings"
    );
    Ok(bookings)
}

/// Walks the stay window and, per room type, books `floor(target) - occupied`
/// arrivals on each date, where `occupied` counts confirmed stays from earlier
/// arrivals. Cancelled draws still use a slot, so confirmed occupancy can end
/// below the sampled target.
fn fill_to_occupancy<R: Rng + ?Sized>(
    config: &Configuration,
    synth: &mut BookingSynthesizer<'_>,
    rng: &mut R,
) -> DatagenResult<Vec<Booking>> {
    let stay = &config.stay_window;
    let reference = config.reference_date();
    let mut occupied = vec![vec![0u32; config.room_types.len()]; stay.len_days()];
    let mut out = Vec::new();

    for (day_idx, day) in DateRange::half_open(stay.start, stay.end).enumerate() {
        for (room_idx, room) in config.room_types.iter().enumerate() {
            let target_pct = config.occupancy.target_range(day, reference).sample(rng);
            let target = (f64::from(room.room_count) * target_pct).floor() as u32;
            let needed = target.saturating_sub(occupied[day_idx][room_idx]);

            for _ in 0..needed {
                if out.len() >= crate::config::MAX_BOOKINGS {
                    return Err(DatagenError::Generation(format!(
                        "occupancy target needs more than {} bookings",
                        crate::config::MAX_BOOKINGS
                    )));
                }
                let booking = synth.draw(rng, room, day)?;
                if !booking.is_cancelled {
                    for (night, _) in stay_nights(&booking) {
                        if let Some(offset) = stay.offset_of(night) {
                            occupied[offset][room_idx] += 1;
                        }
                    }
                }
                out.push(booking);
            }
        }
    }

    Ok(out)
}

/// Post-sampling invariant check. A failure here is a generator defect.
pub fn check_booking(config: &Configuration, booking: &Booking) -> DatagenResult<()> {
    let defect = |what: &str| {
        Err(DatagenError::Generation(format!(
            "booking {} {what}",
            booking.booking_id
        )))
    };
    if booking.arrival_date >= booking.departure_date {
        return defect("departs on or before arrival");
    }
    if !config.stay_window.contains(booking.arrival_date)
        || !config.stay_window.contains(booking.departure_date)
    {
        return defect("falls outside the stay window");
    }
    if !config.booking_window.contains(booking.booking_date) {
        return defect("was booked outside the booking window");
    }
    if (booking.departure_date - booking.arrival_date).num_days() != i64::from(booking.nights) {
        return defect("has a night count that disagrees with its dates");
    }
    if !(booking.booked_rate > 0.0) {
        return defect("has a non-positive booked rate");
    }
    Ok(())
}

fn weighted<X>(weights: impl Iterator<Item = X>, field: &str) -> DatagenResult<WeightedIndex<X>>
where
    X: rand::distributions::uniform::SampleUniform + PartialOrd + for<'x> std::ops::AddAssign<&'x X> + Clone + Default,
{
    WeightedIndex::new(weights)
        .map_err(|error| DatagenError::Configuration(format!("{field}: {error}")))
}

fn add_days(date: NaiveDate, days: i64) -> DatagenResult<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| DatagenError::Generation(format!("date overflow adding {days} days to {date}")))
}
