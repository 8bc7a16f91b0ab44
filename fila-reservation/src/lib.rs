pub mod countdown;
pub mod driver;
pub mod resume;
pub mod session;
pub mod storage;

pub use countdown::Countdown;
pub use driver::{CountdownDriver, CountdownEvent};
pub use resume::{resume, ActiveHold, ResumeOutcome};
pub use session::{FlowRedirect, HoldSession, TickOutcome};
pub use storage::{KeyStore, MemoryKeyStore};
