//! SENDMSG - direct and channel message delivery.

use super::reply;
use crate::error::DomainError;
use crate::state::{ServerState, SessionId};
use minirc_proto::{Outcome, Record, STATUS_OK, SendMsgRequest};
use tracing::debug;

/// Deliver a message to users and/or channels, aggregating one outcome
/// per target. The two target lists are independent: a bad entry in one
/// never aborts the other.
pub fn send(state: &mut ServerState, id: SessionId, request: SendMsgRequest) {
    let Some(message) = request.message.filter(|m| !m.is_empty()) else {
        let e = DomainError::MalformedRequest("Message is required.".into());
        return reply(state, id, e.record());
    };

    let users = request.users.unwrap_or_default();
    let channels = request.channels.unwrap_or_default();
    if users.is_empty() && channels.is_empty() {
        let e = DomainError::MalformedRequest("User(s) or channel(s) required.".into());
        return reply(state, id, e.record());
    }

    let Some(from) = state.name_of(id).map(str::to_string) else {
        return;
    };

    let mut success = Vec::new();
    let mut error = Vec::new();

    for user in &users {
        match state.resolve(user) {
            Some(target) => {
                if let Some(session) = state.session(target) {
                    session.send(Record::DirectMsg {
                        from: from.clone(),
                        to: user.clone(),
                        message: message.clone(),
                    });
                }
                success.push(Outcome::new(
                    STATUS_OK,
                    format!("Message sent to user {user}."),
                ));
            }
            None => error.push(DomainError::UserNotFound(user.clone()).outcome()),
        }
    }

    for channel in &channels {
        if state.broadcast(channel, &message, &from) {
            debug!(%id, channel = %channel, "Message broadcast");
            success.push(Outcome::new(
                STATUS_OK,
                format!("Message sent to channel {channel}."),
            ));
        } else {
            error.push(Outcome::new(
                minirc_proto::STATUS_NOT_FOUND,
                format!("Channel {channel} not found."),
            ));
        }
    }

    reply(state, id, Record::Aggregate { success, error });
}
