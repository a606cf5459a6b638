pub mod bookings;
pub mod datasets;
pub mod demand;
pub mod export;
pub mod generator;
pub mod inventory;
pub mod rates;
