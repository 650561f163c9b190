pub mod booking;
pub mod room;
pub mod session;
pub mod user;

pub use booking::{Booking, BookingRequest, BookingStatus};
pub use room::{Room, SlotStatus, TimeSlot};
pub use session::Session;
pub use user::{Role, User};
