//! Domain services for the booking service.
//!
//! Services contain business logic that operates on domain models.

pub mod audit;
pub mod booking_rules;
pub mod pricing;

pub use audit::audit_helpers;
pub use booking_rules::{
    check_can_cancel, check_can_confirm, overlaps, validate_stay_dates,
};
pub use pricing::{total_price, DEFAULT_MARKUP_PERCENT};
