//! Startup services.

pub mod unit_generator;

pub use unit_generator::{UnitGenerator, SYSTEM_USER_ID};
