pub mod confirm;
pub mod controller;

pub use confirm::confirm_payment;
pub use controller::{WizardController, WizardError, WizardStep};
