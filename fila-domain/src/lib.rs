pub mod draft;
pub mod flight;
pub mod hold;

pub use draft::{Passenger, PurchaseDraft};
pub use flight::{Aircraft, FlightOption};
pub use hold::{HoldStatus, ReservationHold};
