use std::collections::HashMap;

use super::datasets::{Booking, InventoryRow};
use crate::calendar::{stay_nights, DateWindow};
use crate::config::RoomType;
use crate::error::{DatagenError, DatagenResult};

/// One row per (date, room type) in the stay window, date-major then catalog
/// order. Cancelled bookings are skipped; nights outside the window are ignored.
pub fn aggregate_inventory(
    bookings: &[Booking],
    room_types: &[RoomType],
    stay_window: &DateWindow,
) -> DatagenResult<Vec<InventoryRow>> {
    let room_index = room_types
        .iter()
        .enumerate()
        .map(|(idx, room)| (room.name.as_str(), idx))
        .collect::<HashMap<_, _>>();
    let mut tally = vec![vec![0u32; room_types.len()]; stay_window.len_days()];

    for booking in bookings.iter().filter(|b| !b.is_cancelled) {
        for (night, room_type) in stay_nights(booking) {
            let Some(&room_idx) = room_index.get(room_type) else {
                return Err(DatagenError::Generation(format!(
                    "booking {} references unknown room type '{room_type}'",
                    booking.booking_id
                )));
            };
            if let Some(day_idx) = stay_window.offset_of(night) {
                tally[day_idx][room_idx] += 1;
            }
        }
    }

    let mut rows = Vec::with_capacity(tally.len() * room_types.len());
    for (date, counts) in stay_window.days().zip(&tally) {
        for (room, &count) in room_types.iter().zip(counts) {
            let occupied = count.min(room.room_count);
            rows.push(InventoryRow {
                date,
                room_type: room.name.clone(),
                total_rooms: room.room_count,
                occupied,
                available: room.room_count - occupied,
                overbooked: count - occupied,
                occupancy_rate: f64::from(occupied) / f64::from(room.room_count),
            });
        }
    }

    let overbooked = rows.iter().filter(|row| row.overbooked > 0).count();
    if overbooked > 0 {
        tracing::warn!(overbooked, "inventory rows exceed capacity; occupied counts are clamped");
    }
    Ok(rows)
}
