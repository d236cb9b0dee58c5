//! Data module - CSV loading and cleaning

mod cleaner;
mod loader;
mod table;

pub use cleaner::Cleaner;
pub use loader::DataLoader;
pub use table::{Observation, ObservationTable, ESTIMATE};
