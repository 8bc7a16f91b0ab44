use async_trait::async_trait;
use chrono::{Duration, Utc};
use fila_domain::{FlightOption, HoldStatus, ReservationHold};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::client::BookingApi;
use crate::error::ApiError;
use crate::models::{PaymentOutcome, PaymentRedirect, PaymentRequest, TicketPrice};

/// Programmable in-memory backend for tests. Counts hold-creation and
/// release calls so tests can assert that rejected selections never reach
/// the server and that expiry fires release exactly once.
pub struct MockBookingApi {
    state: Mutex<MockState>,
    ticket_price_calls: AtomicUsize,
    create_reservation_calls: AtomicUsize,
    release_calls: AtomicUsize,
}

struct MockState {
    precio_ticket: i64,
    flights: Vec<FlightOption>,
    reservations: HashMap<Uuid, ReservationHold>,
    hold_ttl: Duration,
    flights_rejection: Option<String>,
    reservation_rejection: Option<String>,
    release_fails: bool,
    payment_redirect: PaymentRedirect,
    payment_rejection: Option<String>,
    confirm_success: bool,
}

impl Default for MockBookingApi {
    fn default() -> Self {
        Self {
            state: Mutex::new(MockState {
                precio_ticket: 25000,
                flights: Vec::new(),
                reservations: HashMap::new(),
                hold_ttl: Duration::seconds(300),
                flights_rejection: None,
                reservation_rejection: None,
                release_fails: false,
                payment_redirect: PaymentRedirect {
                    url: "https://webpay.example.cl/init".to_string(),
                    token: "tok_mock_01".to_string(),
                },
                payment_rejection: None,
                confirm_success: true,
            }),
            ticket_price_calls: AtomicUsize::new(0),
            create_reservation_calls: AtomicUsize::new(0),
            release_calls: AtomicUsize::new(0),
        }
    }
}

impl MockBookingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flights(self, flights: Vec<FlightOption>) -> Self {
        self.state.lock().unwrap().flights = flights;
        self
    }

    pub fn with_hold_ttl(self, ttl: Duration) -> Self {
        self.state.lock().unwrap().hold_ttl = ttl;
        self
    }

    /// Make the available-flights listing fail with the given message.
    pub fn reject_flight_listing(&self, message: &str) {
        self.state.lock().unwrap().flights_rejection = Some(message.to_string());
    }

    /// Make the next hold creations fail with the given server message.
    pub fn reject_reservations(&self, message: &str) {
        self.state.lock().unwrap().reservation_rejection = Some(message.to_string());
    }

    pub fn fail_releases(&self) {
        self.state.lock().unwrap().release_fails = true;
    }

    pub fn reject_payments(&self, message: &str) {
        self.state.lock().unwrap().payment_rejection = Some(message.to_string());
    }

    pub fn insert_reservation(&self, hold: ReservationHold) {
        self.state.lock().unwrap().reservations.insert(hold.id, hold);
    }

    pub fn ticket_price_calls(&self) -> usize {
        self.ticket_price_calls.load(Ordering::SeqCst)
    }

    pub fn create_reservation_calls(&self) -> usize {
        self.create_reservation_calls.load(Ordering::SeqCst)
    }

    pub fn release_calls(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BookingApi for MockBookingApi {
    async fn ticket_price(&self) -> Result<TicketPrice, ApiError> {
        self.ticket_price_calls.fetch_add(1, Ordering::SeqCst);
        let precio_ticket = self.state.lock().unwrap().precio_ticket;
        Ok(TicketPrice { precio_ticket })
    }

    async fn list_available_flights(&self) -> Result<Vec<FlightOption>, ApiError> {
        let state = self.state.lock().unwrap();
        if let Some(message) = state.flights_rejection.clone() {
            return Err(ApiError::rejected(message));
        }
        Ok(state.flights.clone())
    }

    async fn create_reservation(
        &self,
        flight_id: Uuid,
        cantidad_pasajeros: u32,
    ) -> Result<ReservationHold, ApiError> {
        self.create_reservation_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.reservation_rejection.clone() {
            return Err(ApiError::rejected(message));
        }
        let hold = ReservationHold {
            id: Uuid::new_v4(),
            flight_id,
            cantidad_pasajeros,
            expires_at: Utc::now() + state.hold_ttl,
            status: HoldStatus::Active,
        };
        state.reservations.insert(hold.id, hold.clone());
        Ok(hold)
    }

    async fn fetch_flight(&self, flight_id: Uuid) -> Result<FlightOption, ApiError> {
        self.state
            .lock()
            .unwrap()
            .flights
            .iter()
            .find(|f| f.id == flight_id)
            .cloned()
            .ok_or_else(|| ApiError::rejected("Vuelo no encontrado"))
    }

    async fn fetch_reservation(&self, reservation_id: Uuid) -> Result<ReservationHold, ApiError> {
        self.state
            .lock()
            .unwrap()
            .reservations
            .get(&reservation_id)
            .cloned()
            .ok_or_else(|| ApiError::rejected("Reserva no encontrada"))
    }

    async fn release_reservation(&self, reservation_id: Uuid) -> Result<(), ApiError> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if state.release_fails {
            return Err(ApiError::rejected("Reserva ya expirada"));
        }
        if let Some(hold) = state.reservations.get_mut(&reservation_id) {
            hold.status = HoldStatus::Released;
        }
        Ok(())
    }

    async fn initiate_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentRedirect, ApiError> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.payment_rejection.clone() {
            return Err(ApiError::rejected(message));
        }
        if let Some(hold) = state.reservations.get_mut(&request.reservation_id) {
            hold.status = HoldStatus::Consumed;
        }
        Ok(state.payment_redirect.clone())
    }

    async fn confirm_payment(&self, token: &str) -> Result<PaymentOutcome, ApiError> {
        let success = self.state.lock().unwrap().confirm_success;
        Ok(PaymentOutcome {
            success,
            detail: serde_json::json!({ "token": token }),
        })
    }
}
