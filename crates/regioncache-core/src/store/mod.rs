mod manager;

pub use manager::{ListAges, RegionStore, StoredList};
