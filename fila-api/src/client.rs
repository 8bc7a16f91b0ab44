use async_trait::async_trait;
use fila_domain::{FlightOption, HoldStatus, ReservationHold};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    CreateReservationRequest, PaymentOutcome, PaymentRedirect, PaymentRequest, ReservationCreated,
    TicketPrice,
};

/// The backend collaborator consumed by the purchase workflow. Exact paths
/// live in the HTTP implementation; callers only see these operations.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Current per-seat ticket price, for the Step1 total.
    async fn ticket_price(&self) -> Result<TicketPrice, ApiError>;

    /// Flights with open seats, fetched when the Step3 gate passes.
    async fn list_available_flights(&self) -> Result<Vec<FlightOption>, ApiError>;

    /// Request a time-boxed seat hold. A rejection (e.g. seats taken in a
    /// race) is authoritative; callers must not retry automatically.
    async fn create_reservation(
        &self,
        flight_id: Uuid,
        cantidad_pasajeros: u32,
    ) -> Result<ReservationHold, ApiError>;

    async fn fetch_flight(&self, flight_id: Uuid) -> Result<FlightOption, ApiError>;

    async fn fetch_reservation(&self, reservation_id: Uuid) -> Result<ReservationHold, ApiError>;

    /// Best-effort release; the server expires holds on its own anyway.
    async fn release_reservation(&self, reservation_id: Uuid) -> Result<(), ApiError>;

    /// Post the final purchase and get the gateway handoff target.
    async fn initiate_payment(&self, request: &PaymentRequest)
        -> Result<PaymentRedirect, ApiError>;

    /// Post-redirect landing call with the gateway's token.
    async fn confirm_payment(&self, token: &str) -> Result<PaymentOutcome, ApiError>;
}

pub struct HttpBookingApi {
    base_url: String,
    http: reqwest::Client,
}

impl HttpBookingApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-2xx response into `ApiError::Rejected`, preferring the
    /// server's own `{"error": "..."}` message, otherwise the generic text.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .or_else(|| v.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("El servidor rechazó la solicitud ({status})"));
        Err(ApiError::rejected(message))
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn ticket_price(&self) -> Result<TicketPrice, ApiError> {
        let resp = self.http.get(self.url("/api/tickets/precio")).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn list_available_flights(&self) -> Result<Vec<FlightOption>, ApiError> {
        let resp = self
            .http
            .get(self.url("/api/vuelos/disponibles"))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn create_reservation(
        &self,
        flight_id: Uuid,
        cantidad_pasajeros: u32,
    ) -> Result<ReservationHold, ApiError> {
        let request = CreateReservationRequest {
            flight_id,
            cantidad_pasajeros,
        };
        let resp = self
            .http
            .post(self.url("/api/reservas"))
            .json(&request)
            .send()
            .await?;
        let created: ReservationCreated = Self::check(resp).await?.json().await?;
        Ok(ReservationHold {
            id: created.reservation_id,
            flight_id,
            cantidad_pasajeros,
            expires_at: created.expires_at,
            status: HoldStatus::Active,
        })
    }

    async fn fetch_flight(&self, flight_id: Uuid) -> Result<FlightOption, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("/api/vuelos/{flight_id}")))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn fetch_reservation(&self, reservation_id: Uuid) -> Result<ReservationHold, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("/api/reservas/{reservation_id}")))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn release_reservation(&self, reservation_id: Uuid) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.url(&format!("/api/reservas/{reservation_id}")))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn initiate_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentRedirect, ApiError> {
        let resp = self
            .http
            .post(self.url("/api/pagos/iniciar"))
            .json(request)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn confirm_payment(&self, token: &str) -> Result<PaymentOutcome, ApiError> {
        let resp = self
            .http
            .post(self.url("/api/pagos/confirmar"))
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }
}
