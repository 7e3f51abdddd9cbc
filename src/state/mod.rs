//! Server state: sessions, channels, and the process-wide registries.
//!
//! All of this is owned by the dispatcher task and mutated only there;
//! mutual exclusion is structural, so none of it is locked.

mod channel;
mod registry;
mod session;

pub use channel::{Channel, Departure};
pub use registry::ServerState;
pub use session::{Phase, Session, SessionId};
