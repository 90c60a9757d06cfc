//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with no I/O or external dependencies.

mod account;
mod setting;
mod timeseries;
mod user;
pub mod result;

pub use account::{Account, AccountProperty};
pub use setting::Setting;
pub use timeseries::{Asset, TimeSeriesPoint, Unit, UnitConversion};
pub use user::User;
