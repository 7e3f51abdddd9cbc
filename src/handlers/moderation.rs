//! KICK - privileged forced disconnect.

use super::{PRIVILEGED_NICK, reply};
use crate::error::DomainError;
use crate::state::{ServerState, SessionId};
use minirc_proto::{KickRequest, Outcome, Record, STATUS_OK};
use tracing::{info, warn};

/// Kick each target independently: notice, forced disconnect
/// (quit-equivalent, sentinel included), then a success entry.
///
/// Authorization is deny-and-return: a requester not named by
/// [`PRIVILEGED_NICK`] gets one `Unauthorized` error and no target is
/// touched.
pub fn kick(state: &mut ServerState, id: SessionId, request: KickRequest) {
    let Some(kicker) = state.name_of(id).map(str::to_string) else {
        return;
    };
    if kicker != PRIVILEGED_NICK {
        warn!(%id, nick = %kicker, "Unauthorized kick attempt");
        return reply(state, id, DomainError::Unauthorized.record());
    }

    let mut success = Vec::new();
    let mut error = Vec::new();

    for nick in &request.nicks {
        match state.resolve(nick) {
            Some(target) => {
                let notice = match &request.message {
                    Some(message) => {
                        format!("You were kicked by {kicker}. Message: {message}")
                    }
                    None => format!("You were kicked by {kicker}."),
                };
                if let Some(session) = state.session(target) {
                    session.send(Record::KickNotice { message: notice });
                }
                state.disconnect(target, true);
                info!(%id, target = %nick, "User kicked");
                success.push(Outcome::new(STATUS_OK, format!("User {nick} kicked.")));
            }
            None => error.push(DomainError::UserNotFound(nick.clone()).outcome()),
        }
    }

    reply(state, id, Record::Aggregate { success, error });
}
