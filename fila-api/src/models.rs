use chrono::{DateTime, Utc};
use fila_domain::Passenger;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketPrice {
    pub precio_ticket: i64,
}

impl TicketPrice {
    /// Step1 total: unit price times passenger count.
    pub fn total_for(&self, cantidad: u32) -> i64 {
        self.precio_ticket * i64::from(cantidad)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub flight_id: Uuid,
    pub cantidad_pasajeros: u32,
}

/// Wire shape of a successful hold creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreated {
    pub reservation_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Final submission payload: buyer, passengers and the hold being consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub email: String,
    pub nombre_comprador: String,
    pub telefono: Option<String>,
    pub pasajeros: Vec<Passenger>,
    pub flight_id: Uuid,
    pub reservation_id: Uuid,
}

/// Gateway handoff target returned by the initiate-payment endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRedirect {
    pub url: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub success: bool,
    #[serde(default)]
    pub detail: serde_json::Value,
}
