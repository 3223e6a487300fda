pub mod catalog;
pub mod config;
pub mod duty;
pub mod error;
pub mod interact;
pub mod io;
pub mod lifecycle;
pub mod notify;
pub mod paths;
pub mod payload;
pub mod rotation;
pub mod schedule;
pub mod scoreboard;
pub mod store;
pub mod types;

pub use error::{PlantError, Result};
