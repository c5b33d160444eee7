//! Persistence layer for the booking service.
//!
//! This crate contains:
//! - PostgreSQL connection management and migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - The Redis-backed availability cache

pub mod cache;
pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
