use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Aircraft {
    pub matricula: String,
    pub modelo: String,
}

/// Read-only snapshot of a flight slot as served by the backend. Seat
/// availability here is advisory only; the hold-creation response is the
/// authoritative answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightOption {
    pub id: Uuid,
    pub aircraft: Aircraft,
    pub numero_circuito: u32,
    pub fecha_hora: DateTime<Utc>,
    pub hora_prevista_salida: Option<String>,
    pub capacidad_total: u32,
    pub asientos_ocupados: u32,
}

impl FlightOption {
    pub fn cupos_disponibles(&self) -> u32 {
        self.capacidad_total.saturating_sub(self.asientos_ocupados)
    }

    pub fn has_room_for(&self, cantidad: u32) -> bool {
        self.cupos_disponibles() >= cantidad
    }
}

/// Group flights by circuit number for display, ascending by circuit.
pub fn group_by_circuito(flights: &[FlightOption]) -> Vec<(u32, Vec<FlightOption>)> {
    let mut groups: BTreeMap<u32, Vec<FlightOption>> = BTreeMap::new();
    for flight in flights {
        groups
            .entry(flight.numero_circuito)
            .or_default()
            .push(flight.clone());
    }
    groups.into_iter().collect()
}
