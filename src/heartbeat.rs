//! Per-session liveness monitor.
//!
//! Each session owns one heartbeat task running a fixed cycle: after the
//! idle delay it asks the dispatcher to send a probe, and after the grace
//! window it asks it to check for the pong. The dispatcher owns the
//! `pending_pong` flag and the force-close decision; this module only
//! keeps time.

use crate::config::HeartbeatConfig;
use crate::dispatch::Event;
use crate::state::SessionId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Owning handle for a session's heartbeat timer.
///
/// Consumed by [`cancel`](Self::cancel), which the disconnect cleanup
/// calls exactly once (it takes the handle out of the session first), so
/// a cancelled timer can never fire against a torn-down session.
#[derive(Debug)]
pub struct HeartbeatHandle {
    task: JoinHandle<()>,
}

impl HeartbeatHandle {
    /// Stop the timer. The underlying task is aborted; any probe or
    /// check it already enqueued is ignored by the dispatcher once the
    /// session is gone.
    pub fn cancel(self) {
        self.task.abort();
    }
}

/// Start the probe/check cycle for a session.
pub fn spawn(
    id: SessionId,
    config: &HeartbeatConfig,
    events: mpsc::UnboundedSender<Event>,
) -> HeartbeatHandle {
    let ping_interval = config.ping_interval();
    let pong_grace = config.pong_grace();

    let task = tokio::spawn(async move {
        loop {
            sleep(ping_interval).await;
            if events.send(Event::HeartbeatProbe { id }).is_err() {
                break;
            }
            sleep(pong_grace).await;
            if events.send(Event::HeartbeatCheck { id }).is_err() {
                break;
            }
        }
    });

    HeartbeatHandle { task }
}
