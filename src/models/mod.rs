//! Domain models and payload types

pub mod menu;
pub mod reservation;
pub mod user;

pub use menu::{MenuDraft, MenuItem};
pub use reservation::{Reservation, ReservationCandidate};
pub use user::User;
