use chrono::{DateTime, Utc};
use fila_api::{BookingApi, BusinessRules};
use fila_domain::ReservationHold;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::countdown::Countdown;
use crate::storage::{clear_hold_keys, store_hold_keys, KeyStore};

/// Where the workflow sends the user after leaving the hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowRedirect {
    /// Back to flight selection, with the message to show on arrival.
    FlightSelection { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Running {
        time_left: i64,
        display: String,
        urgent: bool,
    },
    Expired,
    /// The session was stopped by a consume or an earlier expiry; the
    /// ticker should wind down without running the expiry protocol.
    Stopped,
}

/// Tracks one live seat hold: persists the durable keys on creation, drives
/// the countdown, and runs the expiry protocol exactly once.
pub struct HoldSession {
    hold: ReservationHold,
    countdown: Countdown,
    store: Arc<dyn KeyStore>,
    api: Arc<dyn BookingApi>,
    stopped: AtomicBool,
}

impl HoldSession {
    /// Start tracking a freshly created hold. Writes both durable keys so a
    /// reload or a separately routed page can resume.
    pub fn start(
        hold: ReservationHold,
        store: Arc<dyn KeyStore>,
        api: Arc<dyn BookingApi>,
        rules: &BusinessRules,
    ) -> Self {
        store_hold_keys(store.as_ref(), hold.id, hold.flight_id);
        let countdown = Countdown::new(hold.expires_at)
            .with_urgency_threshold(rules.urgency_threshold_seconds as i64);
        Self {
            hold,
            countdown,
            store,
            api,
            stopped: AtomicBool::new(false),
        }
    }

    pub fn hold(&self) -> &ReservationHold {
        &self.hold
    }

    /// One countdown tick against the wall clock. A stopped session reports
    /// `Stopped`, never `Expired`: a hold the server already consumed must
    /// not trigger the expiry redirect from a stale tick.
    pub fn tick(&self, now: DateTime<Utc>) -> TickOutcome {
        if self.stopped.load(Ordering::SeqCst) {
            return TickOutcome::Stopped;
        }
        if self.countdown.is_expired(now) {
            return TickOutcome::Expired;
        }
        TickOutcome::Running {
            time_left: self.countdown.time_left(now),
            display: self.countdown.format_mmss(now),
            urgent: self.countdown.is_urgent(now),
        }
    }

    /// Stop the ticker. Returns true only for the caller that actually
    /// performed the stop, so the expiry path cannot double-fire.
    pub fn stop(&self) -> bool {
        !self.stopped.swap(true, Ordering::SeqCst)
    }

    /// Expiry protocol: stop first, then best-effort release, then clear
    /// both keys, then hand back the redirect. Release failures are logged
    /// only; the server expires holds on its own.
    pub async fn expire(&self) -> FlowRedirect {
        let redirect = FlowRedirect::FlightSelection {
            message: "Tu reserva expiró. Selecciona un vuelo nuevamente.".to_string(),
        };
        if !self.stop() {
            return redirect;
        }

        if let Err(err) = self.api.release_reservation(self.hold.id).await {
            tracing::warn!(reservation_id = %self.hold.id, error = %err, "hold release failed");
        }
        clear_hold_keys(self.store.as_ref());
        redirect
    }

    /// Successful final submission: the server consumes the hold, so only
    /// the durable keys need clearing. No release call.
    pub fn consume(&self) {
        self.stop();
        clear_hold_keys(self.store.as_ref());
    }
}
