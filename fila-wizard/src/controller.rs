use chrono::Duration;
use fila_api::models::PaymentRequest;
use fila_api::{ApiError, BookingApi, BusinessRules, DataCache, PaymentRedirect};
use fila_domain::draft::DraftError;
use fila_domain::{FlightOption, Passenger, PurchaseDraft, ReservationHold};
use fila_reservation::storage::{clear_hold_keys, store_hold_keys, KeyStore};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// The five ordered purchase steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Count,
    Buyer,
    Passengers,
    Flight,
    Confirm,
}

impl WizardStep {
    /// 1-based index shown in the step indicator.
    pub fn number(&self) -> u8 {
        match self {
            Self::Count => 1,
            Self::Buyer => 2,
            Self::Passengers => 3,
            Self::Flight => 4,
            Self::Confirm => 5,
        }
    }

    fn next(&self) -> Option<Self> {
        match self {
            Self::Count => Some(Self::Buyer),
            Self::Buyer => Some(Self::Passengers),
            Self::Passengers => Some(Self::Flight),
            Self::Flight => Some(Self::Confirm),
            Self::Confirm => None,
        }
    }

    fn prev(&self) -> Option<Self> {
        match self {
            Self::Count => None,
            Self::Buyer => Some(Self::Count),
            Self::Passengers => Some(Self::Buyer),
            Self::Flight => Some(Self::Passengers),
            Self::Confirm => Some(Self::Flight),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}", self.number())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Cannot advance from {step}: {reason}")]
    GateNotSatisfied { step: WizardStep, reason: String },

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: WizardStep, to: WizardStep },

    #[error("Flight has {available} seats left, {requested} requested")]
    InsufficientSeats { requested: u32, available: u32 },

    #[error("No flight selected")]
    NoFlightSelected,

    #[error("No active reservation hold")]
    NoActiveHold,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Draft(#[from] DraftError),
}

const PRICE_CACHE_KEY: &str = "precio_ticket";

/// Drives the 5-step purchase sequence. Forward transitions are gated on
/// per-step predicates; going back never clears collected data. The only
/// destructive mutation is the passenger-count resize, and that is bounded
/// to append-default or truncate-tail.
pub struct WizardController {
    api: Arc<dyn BookingApi>,
    store: Arc<dyn KeyStore>,
    cache: Arc<DataCache>,
    price_ttl: Duration,
    draft: PurchaseDraft,
    step: WizardStep,
    flights: Vec<FlightOption>,
    hold: Option<ReservationHold>,
}

impl WizardController {
    /// The cache is built once per process and shared; every controller
    /// borrows the same instance so a price fetched on one page is still
    /// warm on the next.
    pub fn new(
        api: Arc<dyn BookingApi>,
        store: Arc<dyn KeyStore>,
        cache: Arc<DataCache>,
        rules: &BusinessRules,
    ) -> Self {
        Self {
            api,
            store,
            cache,
            price_ttl: Duration::seconds(rules.price_cache_seconds as i64),
            draft: PurchaseDraft::new(),
            step: WizardStep::Count,
            flights: Vec::new(),
            hold: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &PurchaseDraft {
        &self.draft
    }

    pub fn flights(&self) -> &[FlightOption] {
        &self.flights
    }

    pub fn hold(&self) -> Option<&ReservationHold> {
        self.hold.as_ref()
    }

    /// Applies the resize law eagerly, not deferred to Step3 entry.
    pub fn set_cantidad_pasajeros(&mut self, cantidad: u32) -> Result<(), WizardError> {
        self.draft.set_cantidad_pasajeros(cantidad)?;
        Ok(())
    }

    pub fn set_buyer(&mut self, email: &str, nombre: &str, telefono: Option<&str>) {
        self.draft.email = email.to_string();
        self.draft.nombre_comprador = nombre.to_string();
        self.draft.telefono = telefono.map(str::to_string);
    }

    pub fn passenger_mut(&mut self, index: usize) -> Option<&mut Passenger> {
        self.draft.pasajeros.get_mut(index)
    }

    /// Step1 total, with the unit price cached for the configured TTL.
    pub async fn total_price(&self) -> Result<i64, WizardError> {
        let api = self.api.clone();
        let price = self
            .cache
            .get_or_fetch(PRICE_CACHE_KEY, self.price_ttl, move || async move {
                api.ticket_price().await
            })
            .await?;
        Ok(price.total_for(self.draft.cantidad_pasajeros))
    }

    /// Whether the current step's forward gate is satisfied. Step4 also
    /// requires a selected flight with enough open seats.
    pub fn gate_satisfied(&self) -> bool {
        match self.step {
            WizardStep::Count => self.draft.cantidad_pasajeros >= 1,
            WizardStep::Buyer => self.draft.buyer_complete(),
            WizardStep::Passengers => self.draft.passengers_complete(),
            WizardStep::Flight => self
                .selected_flight()
                .is_some_and(|f| f.has_room_for(self.draft.cantidad_pasajeros)),
            WizardStep::Confirm => self.hold.is_some(),
        }
    }

    fn selected_flight(&self) -> Option<&FlightOption> {
        let id = self.draft.selected_flight_id?;
        self.flights.iter().find(|f| f.id == id)
    }

    /// Record the user's flight pick. Rejects a flight without room for the
    /// whole party before any hold request is issued.
    pub fn select_flight(&mut self, flight_id: Uuid) -> Result<(), WizardError> {
        let flight = self
            .flights
            .iter()
            .find(|f| f.id == flight_id)
            .ok_or(WizardError::NoFlightSelected)?;

        if !flight.has_room_for(self.draft.cantidad_pasajeros) {
            return Err(WizardError::InsufficientSeats {
                requested: self.draft.cantidad_pasajeros,
                available: flight.cupos_disponibles(),
            });
        }
        self.draft.selected_flight_id = Some(flight_id);
        Ok(())
    }

    /// Move forward one step. A failed gate or a failed side effect leaves
    /// the controller exactly where it was.
    pub async fn advance(&mut self) -> Result<WizardStep, WizardError> {
        match self.step {
            WizardStep::Count | WizardStep::Buyer => {
                self.require_gate()?;
            }
            WizardStep::Passengers => {
                self.require_gate()?;
                // Fetch before revealing Step4; a failure keeps the user here
                self.flights = self.api.list_available_flights().await?;
            }
            WizardStep::Flight => {
                let flight_id = self
                    .draft
                    .selected_flight_id
                    .ok_or(WizardError::NoFlightSelected)?;
                self.require_gate()?;

                match self
                    .api
                    .create_reservation(flight_id, self.draft.cantidad_pasajeros)
                    .await
                {
                    Ok(hold) => {
                        store_hold_keys(self.store.as_ref(), hold.id, hold.flight_id);
                        self.draft.reservation_id = Some(hold.id);
                        self.hold = Some(hold);
                    }
                    Err(err) => {
                        // The server's word is final: clear the selection,
                        // stay on Step4, and never retry on our own
                        self.draft.selected_flight_id = None;
                        return Err(err.into());
                    }
                }
            }
            WizardStep::Confirm => {
                return Err(WizardError::InvalidTransition {
                    from: WizardStep::Confirm,
                    to: WizardStep::Confirm,
                });
            }
        }

        // Confirm has no `next`, unreachable here because Confirm returns above
        let next = self.step.next().unwrap_or(self.step);
        tracing::debug!(from = %self.step, to = %next, "wizard advanced");
        self.step = next;
        Ok(self.step)
    }

    fn require_gate(&self) -> Result<(), WizardError> {
        if self.gate_satisfied() {
            return Ok(());
        }
        let reason = match self.step {
            WizardStep::Count => "at least one passenger required",
            WizardStep::Buyer => "buyer email and name required",
            WizardStep::Passengers => {
                "every passenger needs name, surname, RUT and, for minors, a signed authorization"
            }
            WizardStep::Flight => "selected flight lacks open seats",
            WizardStep::Confirm => "no active reservation hold",
        };
        Err(WizardError::GateNotSatisfied {
            step: self.step,
            reason: reason.to_string(),
        })
    }

    /// Step back one step, retaining all collected data. `None` means the
    /// user backed out of the wizard entirely.
    pub fn back(&mut self) -> Option<WizardStep> {
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                Some(prev)
            }
            None => None,
        }
    }

    /// Step5 submit: post the purchase, then clear both durable keys
    /// unconditionally; the server consumes the hold while processing.
    pub async fn submit(&mut self) -> Result<PaymentRedirect, WizardError> {
        if self.step != WizardStep::Confirm {
            return Err(WizardError::InvalidTransition {
                from: self.step,
                to: WizardStep::Confirm,
            });
        }
        let hold = self.hold.as_ref().ok_or(WizardError::NoActiveHold)?;

        let request = PaymentRequest {
            email: self.draft.email.clone(),
            nombre_comprador: self.draft.nombre_comprador.clone(),
            telefono: self.draft.telefono.clone(),
            pasajeros: self.draft.pasajeros.clone(),
            flight_id: hold.flight_id,
            reservation_id: hold.id,
        };

        let redirect = self.api.initiate_payment(&request).await?;
        clear_hold_keys(self.store.as_ref());
        tracing::info!(reservation_id = %hold.id, "purchase submitted, handing off to gateway");
        Ok(redirect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fila_api::{MockBookingApi, TicketPrice};
    use fila_domain::Aircraft;
    use fila_reservation::MemoryKeyStore;

    fn flight(capacidad: u32, ocupados: u32) -> FlightOption {
        FlightOption {
            id: Uuid::new_v4(),
            aircraft: Aircraft {
                matricula: "CC-PZA".to_string(),
                modelo: "Cessna 172".to_string(),
            },
            numero_circuito: 1,
            fecha_hora: Utc::now() + chrono::Duration::hours(6),
            hora_prevista_salida: Some("11:00".to_string()),
            capacidad_total: capacidad,
            asientos_ocupados: ocupados,
        }
    }

    fn adult(nombre: &str) -> Passenger {
        Passenger {
            nombre: nombre.to_string(),
            apellido: "Paredes".to_string(),
            rut: "11.111.111-1".to_string(),
            ..Passenger::default()
        }
    }

    fn controller_with(api: Arc<MockBookingApi>) -> WizardController {
        WizardController::new(
            api,
            Arc::new(MemoryKeyStore::new()),
            Arc::new(DataCache::new()),
            &BusinessRules::default(),
        )
    }

    #[tokio::test]
    async fn test_buyer_gate_blocks_and_then_passes() {
        let mut wizard = controller_with(Arc::new(MockBookingApi::new()));
        wizard.advance().await.unwrap();
        assert_eq!(wizard.step(), WizardStep::Buyer);

        let err = wizard.advance().await.unwrap_err();
        assert!(matches!(err, WizardError::GateNotSatisfied { .. }));
        assert_eq!(wizard.step(), WizardStep::Buyer);

        wizard.set_buyer("ana@example.cl", "Ana Paredes", None);
        wizard.advance().await.unwrap();
        assert_eq!(wizard.step(), WizardStep::Passengers);
    }

    #[tokio::test]
    async fn test_back_retains_collected_data() {
        let mut wizard = controller_with(Arc::new(MockBookingApi::new()));
        wizard.set_cantidad_pasajeros(2).unwrap();
        wizard.advance().await.unwrap();
        wizard.set_buyer("ana@example.cl", "Ana Paredes", Some("+56 9 1234 5678"));
        wizard.advance().await.unwrap();
        *wizard.passenger_mut(0).unwrap() = adult("Ana");

        assert_eq!(wizard.back(), Some(WizardStep::Buyer));
        assert_eq!(wizard.back(), Some(WizardStep::Count));
        assert_eq!(wizard.back(), None, "past Step1 means leaving the wizard");

        assert_eq!(wizard.draft().email, "ana@example.cl");
        assert_eq!(wizard.draft().pasajeros[0].nombre, "Ana");
        assert_eq!(wizard.draft().cantidad_pasajeros, 2);
    }

    #[tokio::test]
    async fn test_flight_fetch_failure_keeps_step3() {
        let api = Arc::new(MockBookingApi::new());
        let mut wizard = controller_with(api.clone());
        wizard.advance().await.unwrap();
        wizard.set_buyer("ana@example.cl", "Ana", None);
        wizard.advance().await.unwrap();

        // Incomplete passenger: gate fails before any fetch
        let err = wizard.advance().await.unwrap_err();
        assert!(matches!(err, WizardError::GateNotSatisfied { .. }));
        assert_eq!(wizard.step(), WizardStep::Passengers);

        // Complete passengers but the listing fails: stay on Step3 with the
        // server's message surfaced
        *wizard.passenger_mut(0).unwrap() = adult("Ana");
        api.reject_flight_listing("No hay vuelos programados");
        let err = wizard.advance().await.unwrap_err();
        assert_eq!(err.to_string(), "No hay vuelos programados");
        assert_eq!(wizard.step(), WizardStep::Passengers);
    }

    #[tokio::test]
    async fn test_total_price_uses_cached_unit_price() {
        let api = Arc::new(MockBookingApi::new());
        let mut wizard = controller_with(api);
        wizard.set_cantidad_pasajeros(3).unwrap();
        assert_eq!(wizard.total_price().await.unwrap(), 75000);
    }

    #[tokio::test]
    async fn test_shared_cache_survives_the_controller() {
        let cache = Arc::new(DataCache::new());
        let price: TicketPrice = cache
            .get_or_fetch(PRICE_CACHE_KEY, Duration::seconds(300), || async {
                Ok(TicketPrice {
                    precio_ticket: 99_000,
                })
            })
            .await
            .unwrap();
        assert_eq!(price.precio_ticket, 99_000);

        // A controller built over the warm cache never hits the backend
        let wizard = WizardController::new(
            Arc::new(MockBookingApi::new()),
            Arc::new(MemoryKeyStore::new()),
            cache,
            &BusinessRules::default(),
        );
        assert_eq!(wizard.total_price().await.unwrap(), 99_000);
    }

    #[tokio::test]
    async fn test_price_ttl_comes_from_the_rules() {
        // With a zero TTL nothing stays warm: every total recomputation
        // goes back to the backend
        let api = Arc::new(MockBookingApi::new());
        let rules = BusinessRules {
            price_cache_seconds: 0,
            ..BusinessRules::default()
        };
        let wizard = WizardController::new(
            api.clone(),
            Arc::new(MemoryKeyStore::new()),
            Arc::new(DataCache::new()),
            &rules,
        );
        wizard.total_price().await.unwrap();
        wizard.total_price().await.unwrap();
        assert_eq!(api.ticket_price_calls(), 2);

        // The default five-minute TTL serves the second call from cache
        let api = Arc::new(MockBookingApi::new());
        let wizard = controller_with(api.clone());
        wizard.total_price().await.unwrap();
        wizard.total_price().await.unwrap();
        assert_eq!(api.ticket_price_calls(), 1);
    }

    #[tokio::test]
    async fn test_hold_rejection_clears_selection_and_stays() {
        let api = Arc::new(MockBookingApi::new().with_flights(vec![flight(3, 0)]));
        let mut wizard = controller_with(api.clone());
        wizard.set_cantidad_pasajeros(2).unwrap();
        wizard.advance().await.unwrap();
        wizard.set_buyer("ana@example.cl", "Ana", None);
        wizard.advance().await.unwrap();
        *wizard.passenger_mut(0).unwrap() = adult("Ana");
        *wizard.passenger_mut(1).unwrap() = adult("Bruno");
        wizard.advance().await.unwrap();

        let flight_id = wizard.flights()[0].id;
        wizard.select_flight(flight_id).unwrap();
        api.reject_reservations("No quedan asientos disponibles en este vuelo");

        let err = wizard.advance().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "No quedan asientos disponibles en este vuelo"
        );
        assert_eq!(wizard.step(), WizardStep::Flight);
        assert!(wizard.draft().selected_flight_id.is_none());
        assert!(wizard.hold().is_none());
    }
}
