//! Data models for administrative divisions.
//!
//! - `Province`, `City`, `Region`: the three division levels, kept as
//!   flat ordered lists with parent links by code
//! - `Selection`, `SavedSelection`: a completed province/city/region pick

pub mod division;

pub use division::{City, Province, Region, SavedSelection, Selection};
