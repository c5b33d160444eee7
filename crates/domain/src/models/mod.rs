//! Domain models for the booking service.

pub mod booking;
pub mod event;
pub mod payment;
pub mod unit;
pub mod user;

pub use booking::{Booking, BookingRequest, BookingResponse, BookingStatus};
pub use event::{Event, EventType, NewEvent};
pub use payment::{
    Payment, PaymentMethod, PaymentRequest, PaymentResponse, PaymentStatus, PaymentStatusQuery,
};
pub use unit::{
    AccommodationType, SortDirection, Unit, UnitRequest, UnitResponse, UnitSearchRequest,
    UnitSortField,
};
pub use user::{User, UserRequest, UserResponse, UserRole};
