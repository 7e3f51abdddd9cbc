//! Per-connection session state.

use crate::heartbeat::HeartbeatHandle;
use minirc_proto::Record;
use std::collections::HashSet;
use std::fmt;
use tokio::sync::mpsc;
use tracing::debug;

/// Opaque session identifier, minted from a monotonically increasing
/// counter at connection accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session lifecycle. `Gone` is represented by removal from the session
/// table rather than a variant, so a stale id simply resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Allocated, not yet registered with a heartbeat.
    Connecting,
    /// Processing commands.
    Active,
    /// Cleanup in progress; no further commands are processed.
    Disconnecting,
}

/// Server-side state for one live connection.
#[derive(Debug)]
pub struct Session {
    /// This session's id.
    pub id: SessionId,
    /// Current display name; the key under which the session is registered.
    pub name: String,
    /// Names of joined channels. A non-owning view: the channels own
    /// membership.
    pub channels: HashSet<String>,
    /// Set by an inbound PONG, cleared when a probe is sent.
    pub pending_pong: bool,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Liveness timer, cancelled exactly once on disconnect.
    pub heartbeat: Option<HeartbeatHandle>,
    outbound: mpsc::UnboundedSender<Record>,
}

impl Session {
    pub fn new(id: SessionId, name: String, outbound: mpsc::UnboundedSender<Record>) -> Self {
        Self {
            id,
            name,
            channels: HashSet::new(),
            pending_pong: false,
            phase: Phase::Connecting,
            heartbeat: None,
            outbound,
        }
    }

    /// Enqueue one outbound record, in issuance order. Never blocks and
    /// never fails the caller; a closed transport surfaces through the
    /// connection's own lifecycle, not here.
    pub fn send(&self, record: Record) {
        if self.outbound.send(record).is_err() {
            debug!(id = %self.id, nick = %self.name, "Outbound path closed; record dropped");
        }
    }

    /// Whether commands may be processed for this session.
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }
}
