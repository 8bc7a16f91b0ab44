pub mod app_config;
pub mod cache;
pub mod client;
pub mod error;
pub mod mock;
pub mod models;
pub mod payment;

pub use app_config::{BusinessRules, Config};
pub use cache::DataCache;
pub use client::{BookingApi, HttpBookingApi};
pub use error::ApiError;
pub use mock::MockBookingApi;
pub use models::{PaymentOutcome, PaymentRequest, PaymentRedirect, TicketPrice};
