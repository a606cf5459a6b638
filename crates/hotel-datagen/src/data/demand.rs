use chrono::NaiveDate;
use rand::Rng;

use crate::calendar::DateWindow;
use crate::config::Configuration;

/// One demand value per stay date, drawn once and shared by the rate and
/// market synthesizers so both tables tell the same story.
#[derive(Clone, Debug, PartialEq)]
pub struct DemandSignal {
    window: DateWindow,
    values: Vec<f64>,
}

impl DemandSignal {
    pub fn draw<R: Rng + ?Sized>(config: &Configuration, rng: &mut R) -> Self {
        let range = config.occupancy.demand_range();
        let window = config.stay_window;
        let values = window.days().map(|_| range.sample(rng)).collect();
        Self { window, values }
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.window
            .offset_of(date)
            .and_then(|idx| self.values.get(idx).copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.window.days().zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
