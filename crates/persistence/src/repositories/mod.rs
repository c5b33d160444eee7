//! Repository implementations for database operations.

pub mod booking;
pub mod event;
pub mod payment;
pub mod unit;
pub mod user;

pub use booking::{BookingRepository, CreateBookingInput, CreateBookingOutcome};
pub use event::EventRepository;
pub use payment::{CreatePaymentInput, PaymentRepository, ProcessPaymentOutcome};
pub use unit::{UnitInput, UnitRepository};
pub use user::{UserInput, UserRepository};

/// Columns selected for every unit query.
pub(crate) const UNIT_COLUMNS: &str = "id, number_of_rooms, accommodation_type, floor, base_price, total_price, description, available, created_at, updated_at";

/// Columns selected for every booking query.
pub(crate) const BOOKING_COLUMNS: &str = "id, unit_id, user_id, check_in_date, check_out_date, total_price, status, payment_deadline, created_at, updated_at";

/// Columns selected for every payment query.
pub(crate) const PAYMENT_COLUMNS: &str = "id, booking_id, amount, status, payment_method, transaction_id, created_at, updated_at";
