use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "Booking_ID")]
    pub booking_id: String,
    #[serde(rename = "Booking_Date")]
    pub booking_date: NaiveDate,
    #[serde(rename = "Arrival_Date")]
    pub arrival_date: NaiveDate,
    #[serde(rename = "Departure_Date")]
    pub departure_date: NaiveDate,
    #[serde(rename = "Room_Type")]
    pub room_type: String,
    #[serde(rename = "Rate_Plan")]
    pub rate_plan: String,
    #[serde(rename = "Booked_Rate")]
    pub booked_rate: f64,
    #[serde(rename = "Nights")]
    pub nights: u32,
    #[serde(rename = "Guests")]
    pub guests: u32,
    #[serde(rename = "Channel")]
    pub channel: String,
    #[serde(rename = "Is_Member")]
    pub is_member: bool,
    #[serde(rename = "Is_Cancelled")]
    pub is_cancelled: bool,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
}

impl Booking {
    pub const COLUMNS: [&'static str; 13] = [
        "Booking_ID",
        "Booking_Date",
        "Arrival_Date",
        "Departure_Date",
        "Room_Type",
        "Rate_Plan",
        "Booked_Rate",
        "Nights",
        "Guests",
        "Channel",
        "Is_Member",
        "Is_Cancelled",
        "Revenue",
    ];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Room_Type")]
    pub room_type: String,
    #[serde(rename = "Total_Rooms")]
    pub total_rooms: u32,
    #[serde(rename = "Occupied")]
    pub occupied: u32,
    #[serde(rename = "Available")]
    pub available: u32,
    /// Confirmed room-nights beyond capacity; `occupied` is clamped at `total_rooms`.
    #[serde(rename = "Overbooked")]
    pub overbooked: u32,
    #[serde(rename = "Occupancy_Rate")]
    pub occupancy_rate: f64,
}

impl InventoryRow {
    pub const COLUMNS: [&'static str; 7] = [
        "Date",
        "Room_Type",
        "Total_Rooms",
        "Occupied",
        "Available",
        "Overbooked",
        "Occupancy_Rate",
    ];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyRateRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Room_Type")]
    pub room_type: String,
    #[serde(rename = "Base_Rate")]
    pub base_rate: f64,
    #[serde(rename = "Dynamic_Adjustment")]
    pub dynamic_adjustment: f64,
    #[serde(rename = "Final_Rate")]
    pub final_rate: f64,
    #[serde(rename = "Is_Promotion")]
    pub is_promotion: bool,
}

impl DailyRateRow {
    pub const COLUMNS: [&'static str; 6] = [
        "Date",
        "Room_Type",
        "Base_Rate",
        "Dynamic_Adjustment",
        "Final_Rate",
        "Is_Promotion",
    ];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Has_Local_Event")]
    pub has_local_event: bool,
    /// Event name, or `None` on quiet days.
    #[serde(rename = "Local_Event")]
    pub local_event: String,
    #[serde(rename = "Competitor_Rate")]
    pub competitor_rate: f64,
    #[serde(rename = "Demand_Index")]
    pub demand_index: f64,
}

impl MarketRow {
    pub const COLUMNS: [&'static str; 5] = [
        "Date",
        "Has_Local_Event",
        "Local_Event",
        "Competitor_Rate",
        "Demand_Index",
    ];
}

/// The four tables of one generation call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HotelDataset {
    pub bookings: Vec<Booking>,
    pub inventory: Vec<InventoryRow>,
    pub daily_rates: Vec<DailyRateRow>,
    pub market: Vec<MarketRow>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub schema_version: u32,
    pub seed: u64,
    pub config_fingerprint: String,
    pub bookings: usize,
    pub inventory_rows: usize,
    pub daily_rate_rows: usize,
    pub market_rows: usize,
}

impl DatasetManifest {
    pub const SCHEMA_VERSION: u32 = 1;

    pub fn describe(dataset: &HotelDataset, seed: u64, config_fingerprint: String) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION,
            seed,
            config_fingerprint,
            bookings: dataset.bookings.len(),
            inventory_rows: dataset.inventory.len(),
            daily_rate_rows: dataset.daily_rates.len(),
            market_rows: dataset.market.len(),
        }
    }
}

/// Rounds a currency amount to cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
