//! HTTP route handlers.

pub mod bookings;
pub mod health;
pub mod openapi;
pub mod payments;
pub mod units;
pub mod users;
