//! Event model and the single-threaded dispatcher.
//!
//! One dispatcher task owns the [`ServerState`]; connection tasks and
//! heartbeat timers only reach it through the event channel, so every
//! handler runs to completion against unshared state. Suspension happens
//! only between events, never inside a handler.

use crate::config::HeartbeatConfig;
use crate::handlers;
use crate::heartbeat;
use crate::state::{ServerState, SessionId};
use minirc_proto::{RawRecord, Record, Request, STATUS_MALFORMED};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Everything the dispatcher reacts to.
#[derive(Debug)]
pub enum Event {
    /// A connection was accepted; `outbound` is its FIFO write path.
    Connect {
        id: SessionId,
        outbound: mpsc::UnboundedSender<Record>,
    },
    /// A decoded inbound command record.
    Command { id: SessionId, record: RawRecord },
    /// The client answered a liveness probe.
    Pong { id: SessionId },
    /// Heartbeat timer: a probe is due.
    HeartbeatProbe { id: SessionId },
    /// Heartbeat timer: the grace window after a probe has elapsed.
    HeartbeatCheck { id: SessionId },
    /// The transport closed (read EOF or write failure).
    TransportClosed { id: SessionId },
}

/// Owns the server state and processes events one at a time.
pub struct Dispatcher {
    state: ServerState,
    heartbeat: HeartbeatConfig,
    events_rx: mpsc::UnboundedReceiver<Event>,
    /// Handed to each session's heartbeat timer.
    events_tx: mpsc::UnboundedSender<Event>,
}

impl Dispatcher {
    /// Build a dispatcher and the sender used to feed it events.
    pub fn new(heartbeat: HeartbeatConfig) -> (Self, mpsc::UnboundedSender<Event>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            state: ServerState::new(),
            heartbeat,
            events_rx,
            events_tx: events_tx.clone(),
        };
        (dispatcher, events_tx)
    }

    /// Process events until every sender is gone.
    pub async fn run(mut self) {
        while let Some(event) = self.events_rx.recv().await {
            self.handle(event);
        }
        info!("Dispatcher stopped");
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Connect { id, outbound } => self.on_connect(id, outbound),
            Event::Command { id, record } => self.on_command(id, record),
            Event::Pong { id } => {
                if let Some(session) = self.state.session_mut(id) {
                    session.pending_pong = true;
                }
            }
            Event::HeartbeatProbe { id } => {
                if let Some(session) = self.state.session_mut(id) {
                    session.pending_pong = false;
                    session.send(Record::Ping);
                    debug!(%id, "Sent PING");
                }
            }
            Event::HeartbeatCheck { id } => {
                // A pong in the grace window lets the cycle reschedule;
                // silence means the connection is half-open.
                if let Some(session) = self.state.session(id)
                    && !session.pending_pong
                {
                    info!(%id, nick = %session.name, "PONG not received; closing connection");
                    self.state.disconnect(id, false);
                }
            }
            Event::TransportClosed { id } => {
                // Same cleanup as an explicit quit; idempotent if another
                // path already ran it.
                self.state.disconnect(id, false);
            }
        }
    }

    fn on_connect(&mut self, id: SessionId, outbound: mpsc::UnboundedSender<Record>) {
        let name = self.state.create_session(id, outbound);
        let handle = heartbeat::spawn(id, &self.heartbeat, self.events_tx.clone());
        if let Some(session) = self.state.session_mut(id) {
            session.heartbeat = Some(handle);
            session.phase = crate::state::Phase::Active;
        }
        info!(%id, nick = %name, "Session registered");
    }

    fn on_command(&mut self, id: SessionId, record: RawRecord) {
        // Commands are only processed for active sessions; anything
        // arriving for a disconnecting or gone session is dropped.
        if !self.state.session(id).is_some_and(|s| s.is_active()) {
            debug!(%id, command = record.kind.name(), "Command for inactive session dropped");
            return;
        }

        match Request::bind(record) {
            Ok(request) => handlers::dispatch(&mut self.state, id, request),
            Err(e) => {
                debug!(%id, error = %e, "Malformed request");
                handlers::reply(&self.state, id, Record::err(STATUS_MALFORMED, e.0));
            }
        }
    }
}
