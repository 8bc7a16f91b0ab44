use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A passenger entry inside a purchase draft. `autorizacion_file` holds the
/// base64-encoded signed consent document when the passenger is a minor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Passenger {
    pub nombre: String,
    pub apellido: String,
    pub rut: String,
    pub es_menor: bool,
    pub autorizacion_file: Option<String>,
    pub autorizacion_file_name: Option<String>,
}

impl Passenger {
    /// A minor counts as authorized only with a non-empty encoded artifact.
    pub fn has_authorization(&self) -> bool {
        self.autorizacion_file
            .as_deref()
            .is_some_and(|f| !f.is_empty())
    }

    /// Identity fields filled, plus the authorization artifact for minors.
    pub fn is_complete(&self) -> bool {
        !self.nombre.trim().is_empty()
            && !self.apellido.trim().is_empty()
            && !self.rut.trim().is_empty()
            && (!self.es_menor || self.has_authorization())
    }
}

/// In-memory state of one purchase attempt. Mutated at every wizard step,
/// discarded on submit or abandonment. Only `selected_flight_id` and
/// `reservation_id` outlive it, via the durable key store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseDraft {
    pub cantidad_pasajeros: u32,
    pub email: String,
    pub nombre_comprador: String,
    pub telefono: Option<String>,
    pub pasajeros: Vec<Passenger>,
    pub selected_flight_id: Option<Uuid>,
    pub reservation_id: Option<Uuid>,
}

impl PurchaseDraft {
    /// A fresh draft starts at one passenger with a blank record.
    pub fn new() -> Self {
        Self {
            cantidad_pasajeros: 1,
            email: String::new(),
            nombre_comprador: String::new(),
            telefono: None,
            pasajeros: vec![Passenger::default()],
            selected_flight_id: None,
            reservation_id: None,
        }
    }

    /// Set the passenger count and resize `pasajeros` eagerly: grow by
    /// appending blank records, shrink by truncating from the tail.
    /// Surviving entries keep their data untouched.
    pub fn set_cantidad_pasajeros(&mut self, cantidad: u32) -> Result<(), DraftError> {
        if cantidad < 1 {
            return Err(DraftError::InvalidPassengerCount(cantidad));
        }
        self.cantidad_pasajeros = cantidad;
        self.pasajeros.resize_with(cantidad as usize, Passenger::default);
        Ok(())
    }

    /// Step2 gate: buyer email and name filled (whitespace doesn't count).
    pub fn buyer_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.nombre_comprador.trim().is_empty()
    }

    /// Step3 gate: every passenger complete, minors authorized.
    pub fn passengers_complete(&self) -> bool {
        self.pasajeros.len() == self.cantidad_pasajeros as usize
            && self.pasajeros.iter().all(Passenger::is_complete)
    }
}

impl Default for PurchaseDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("Passenger count must be at least 1, got {0}")]
    InvalidPassengerCount(u32),
}
