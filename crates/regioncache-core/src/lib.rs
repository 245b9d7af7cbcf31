//! Core library for regioncache.
//!
//! Provides the pieces behind the address picker:
//!
//! - `models`: `Province`, `City`, `Region` records and `Selection`
//! - `dataset`: seed document ingestion and validation
//! - `store`: the division store with on-disk persistence
//! - `config`: per-user configuration

pub mod config;
pub mod dataset;
pub mod models;
pub mod store;

pub use config::Config;
pub use dataset::{DatasetError, DivisionTree};
pub use models::{City, Province, Region, SavedSelection, Selection};
pub use store::{ListAges, RegionStore, StoredList};
