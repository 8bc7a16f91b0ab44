use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldStatus {
    Active,
    Consumed,
    Expired,
    Released,
}

/// Client copy of a server-owned seat hold. The server is the authority on
/// its lifecycle; the client only caches it and runs the countdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationHold {
    pub id: Uuid,
    pub flight_id: Uuid,
    pub cantidad_pasajeros: u32,
    pub expires_at: DateTime<Utc>,
    pub status: HoldStatus,
}

impl ReservationHold {
    /// Once the wall clock reaches `expires_at` the hold is dead client-side,
    /// regardless of server confirmation latency.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn hold(expires_at: DateTime<Utc>) -> ReservationHold {
        ReservationHold {
            id: Uuid::new_v4(),
            flight_id: Uuid::new_v4(),
            cantidad_pasajeros: 2,
            expires_at,
            status: HoldStatus::Active,
        }
    }

    #[test]
    fn test_expiry_is_optimistic_at_the_boundary() {
        let now = Utc::now();
        let h = hold(now);
        // now == expires_at counts as expired already
        assert!(h.is_expired(now));
        assert!(!h.is_expired(now - Duration::seconds(1)));
        assert!(h.is_expired(now + Duration::seconds(1)));
    }
}
