//! Domain layer for the booking service.
//!
//! This crate contains:
//! - Domain models (Unit, Booking, Payment, User, Event) and their DTOs
//! - Pricing and booking lifecycle rules
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::DomainError;
