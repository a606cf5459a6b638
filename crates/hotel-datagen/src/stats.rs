use serde::Serialize;

use crate::data::datasets::HotelDataset;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SampleStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

pub fn compute_stats(samples: &[f64]) -> Option<SampleStats> {
    if samples.is_empty() {
        return None;
    }

    let mut values = samples.to_vec();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let len = values.len();
    let sum: f64 = values.iter().sum();
    let median = if len % 2 == 0 {
        (values[(len / 2) - 1] + values[len / 2]) / 2.0
    } else {
        values[len / 2]
    };

    Some(SampleStats {
        min: *values.first().unwrap_or(&0.0),
        max: *values.last().unwrap_or(&0.0),
        mean: sum / (len as f64),
        median,
    })
}

/// Headline numbers for a generated dataset. Rate and revenue figures cover
/// confirmed bookings only.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_bookings: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    pub members: usize,
    pub total_revenue: f64,
    pub booked_rate: Option<SampleStats>,
    pub nights: Option<SampleStats>,
    pub mean_occupancy: Option<f64>,
    pub event_days: usize,
    pub promotion_rows: usize,
}

pub fn summarize(dataset: &HotelDataset) -> DatasetSummary {
    let confirmed = dataset
        .bookings
        .iter()
        .filter(|booking| !booking.is_cancelled)
        .collect::<Vec<_>>();
    let rates = confirmed.iter().map(|b| b.booked_rate).collect::<Vec<_>>();
    let nights = confirmed.iter().map(|b| f64::from(b.nights)).collect::<Vec<_>>();
    let occupancy = dataset
        .inventory
        .iter()
        .map(|row| row.occupancy_rate)
        .collect::<Vec<_>>();

    DatasetSummary {
        total_bookings: dataset.bookings.len(),
        confirmed: confirmed.len(),
        cancelled: dataset.bookings.len() - confirmed.len(),
        members: dataset.bookings.iter().filter(|b| b.is_member).count(),
        total_revenue: confirmed.iter().map(|b| b.revenue).sum(),
        booked_rate: compute_stats(&rates),
        nights: compute_stats(&nights),
        mean_occupancy: compute_stats(&occupancy).map(|stats| stats.mean),
        event_days: dataset.market.iter().filter(|row| row.has_local_event).count(),
        promotion_rows: dataset.daily_rates.iter().filter(|row| row.is_promotion).count(),
    }
}
