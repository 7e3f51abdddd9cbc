//! LOGIN and QUIT.

use super::reply;
use crate::state::{ServerState, SessionId};
use minirc_proto::{LoginRequest, Record};
use tracing::info;

/// Rename the session. The registry key moves atomically with the name;
/// a conflict leaves the original registration untouched.
pub fn login(state: &mut ServerState, id: SessionId, request: LoginRequest) {
    match state.rename(id, &request.nick) {
        Ok(()) => {
            info!(%id, nick = %request.nick, "Username set");
            reply(
                state,
                id,
                Record::ok(format!("Username changed to {}", request.nick)),
            );
        }
        Err(e) => reply(state, id, e.record()),
    }
}

/// Disconnect. The `GOODBYE` sentinel is the response; cleanup runs to
/// completion before the session is gone.
pub fn quit(state: &mut ServerState, id: SessionId) {
    info!(%id, "Quit received; closing the connection");
    state.disconnect(id, true);
}
