use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::session::{FlowRedirect, HoldSession, TickOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownEvent {
    Tick {
        time_left: i64,
        display: String,
        urgent: bool,
    },
    Expired(FlowRedirect),
}

/// One-second ticker around a `HoldSession`. Each tick recomputes from the
/// wall clock; on expiry it runs the session's expiry protocol, emits the
/// redirect and stops itself.
pub struct CountdownDriver {
    handle: JoinHandle<()>,
}

impl CountdownDriver {
    pub fn spawn(session: Arc<HoldSession>, tx: mpsc::Sender<CountdownEvent>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            loop {
                interval.tick().await;
                match session.tick(Utc::now()) {
                    TickOutcome::Running {
                        time_left,
                        display,
                        urgent,
                    } => {
                        if tx
                            .send(CountdownEvent::Tick {
                                time_left,
                                display,
                                urgent,
                            })
                            .await
                            .is_err()
                        {
                            // Receiver gone, the page navigated away
                            return;
                        }
                    }
                    TickOutcome::Expired => {
                        let redirect = session.expire().await;
                        let _ = tx.send(CountdownEvent::Expired(redirect)).await;
                        return;
                    }
                    TickOutcome::Stopped => {
                        // Consumed or already expired elsewhere; wind down
                        // without announcing anything
                        return;
                    }
                }
            }
        });
        Self { handle }
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for CountdownDriver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
