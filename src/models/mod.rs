//! Wire models for the booking, task and auth backends.

pub mod booking;
pub mod task;
pub mod user;

pub use booking::{Booking, BookingStatus, CarDetails, ServiceType, VehicleType};
pub use task::{Task, TaskStats, TaskStatus};
pub use user::User;

/// A record the backend identifies by a server-assigned id.
pub trait Record {
    fn id(&self) -> &str;
}

/// Fields the backend owns. They are never echoed back on writes.
pub const SERVER_OWNED_FIELDS: &[&str] = &["_id", "id", "__v", "createdAt", "updatedAt"];

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
