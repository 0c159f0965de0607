//! Data access layer
//!
//! Repositories are constructed with an explicit pool handle at startup and
//! injected through the application state; there are no module-level
//! singletons. Reservation queries are always scoped to the owning user.

pub mod menu;
pub mod reservation;
pub mod user;

pub use menu::MenuRepository;
pub use reservation::ReservationRepository;
pub use user::UserRepository;
