//! Database entity definitions.

pub mod booking;
pub mod event;
pub mod payment;
pub mod unit;
pub mod user;

pub use booking::BookingEntity;
pub use event::EventEntity;
pub use payment::PaymentEntity;
pub use unit::UnitEntity;
pub use user::UserEntity;

use std::fmt::Display;
use std::str::FromStr;

use tracing::warn;
use uuid::Uuid;

/// Parses a stored enum column. Values the domain does not know are logged
/// and replaced with `fallback`.
pub(crate) fn parse_column<T>(value: &str, column: &'static str, id: Uuid, fallback: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().unwrap_or_else(|e: T::Err| {
        warn!(
            row_id = %id,
            column,
            value,
            error = %e,
            "Unrecognised stored value, using fallback"
        );
        fallback
    })
}
