use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Key under which the active reservation id survives page navigation.
pub const RESERVATION_ID_KEY: &str = "reservationId";
/// Key under which the selected flight id survives page navigation.
pub const SELECTED_FLIGHT_ID_KEY: &str = "selectedFlightId";

/// Durable cross-page string storage. The browser deployment backs this
/// with localStorage; tests and the native tooling use `MemoryKeyStore`.
pub trait KeyStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Write both hold keys. They are only ever set as a pair.
pub fn store_hold_keys(store: &dyn KeyStore, reservation_id: Uuid, flight_id: Uuid) {
    store.set(RESERVATION_ID_KEY, &reservation_id.to_string());
    store.set(SELECTED_FLIGHT_ID_KEY, &flight_id.to_string());
}

/// Clear both hold keys. They are only ever cleared as a pair.
pub fn clear_hold_keys(store: &dyn KeyStore) {
    store.remove(RESERVATION_ID_KEY);
    store.remove(SELECTED_FLIGHT_ID_KEY);
}

/// Read `(reservation_id, flight_id)`; `None` unless both keys parse.
pub fn read_hold_keys(store: &dyn KeyStore) -> Option<(Uuid, Uuid)> {
    let reservation_id = store.get(RESERVATION_ID_KEY)?.parse().ok()?;
    let flight_id = store.get(SELECTED_FLIGHT_ID_KEY)?.parse().ok()?;
    Some((reservation_id, flight_id))
}

#[derive(Default)]
pub struct MemoryKeyStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryKeyStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}
