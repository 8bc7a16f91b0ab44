use chrono::Utc;
use fila_api::{ApiError, BookingApi};
use fila_domain::{FlightOption, ReservationHold};

use crate::session::FlowRedirect;
use crate::storage::{clear_hold_keys, read_hold_keys, KeyStore};

#[derive(Debug, Clone)]
pub struct ActiveHold {
    pub flight: FlightOption,
    pub hold: ReservationHold,
}

#[derive(Debug, Clone)]
pub enum ResumeOutcome {
    /// The hold is live; passenger count is reconstructed from the server's
    /// reservation record, not from anything cached locally.
    Active(ActiveHold),
    /// Precondition failed or the server no longer honors the hold.
    Redirect(FlowRedirect),
}

/// Entry point for any page that depends on the hold. The two durable keys
/// are a hard precondition, and even with both present the hold must be
/// re-validated against the server before it is trusted.
pub async fn resume(store: &dyn KeyStore, api: &dyn BookingApi) -> Result<ResumeOutcome, ApiError> {
    let Some((reservation_id, flight_id)) = read_hold_keys(store) else {
        return Ok(ResumeOutcome::Redirect(FlowRedirect::FlightSelection {
            message: "No hay una reserva activa. Selecciona un vuelo.".to_string(),
        }));
    };

    let hold = match api.fetch_reservation(reservation_id).await {
        Ok(hold) => hold,
        Err(ApiError::Rejected { message }) => {
            // Server no longer knows the hold: stale keys, clean them up
            clear_hold_keys(store);
            return Ok(ResumeOutcome::Redirect(FlowRedirect::FlightSelection {
                message,
            }));
        }
        Err(err) => return Err(err),
    };

    if hold.is_expired(Utc::now()) {
        clear_hold_keys(store);
        return Ok(ResumeOutcome::Redirect(FlowRedirect::FlightSelection {
            message: "Tu reserva expiró. Selecciona un vuelo nuevamente.".to_string(),
        }));
    }

    let flight = match api.fetch_flight(flight_id).await {
        Ok(flight) => flight,
        Err(ApiError::Rejected { message }) => {
            // Same treatment as an unknown reservation: the keys point at
            // something the server no longer serves
            clear_hold_keys(store);
            return Ok(ResumeOutcome::Redirect(FlowRedirect::FlightSelection {
                message,
            }));
        }
        Err(err) => return Err(err),
    };
    Ok(ResumeOutcome::Active(ActiveHold { flight, hold }))
}
