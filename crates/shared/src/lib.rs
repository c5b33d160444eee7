//! Shared utilities and common types for the booking service.
//!
//! This crate provides functionality used across all other crates:
//! - Page envelopes for offset-paginated listings
//! - Password hashing with Argon2id
//! - Field validators used by request DTOs

pub mod pagination;
pub mod password;
pub mod validation;
