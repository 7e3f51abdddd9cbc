//! Command handlers.
//!
//! One module per command family. Every handler sends exactly one
//! outbound record to the requester (success, error, or per-target
//! aggregate) plus whatever broadcast, direct-delivery or notice records
//! the command implies for other sessions.

pub mod channel;
pub mod connection;
pub mod messaging;
pub mod moderation;

use crate::state::{ServerState, SessionId};
use minirc_proto::{Record, Request};

/// The single privileged identity allowed to KICK.
pub const PRIVILEGED_NICK: &str = "Admin";

/// Route one bound request to its handler.
///
/// The match is exhaustive over the closed request union: adding a
/// command is a compile-time-checked variant addition.
pub fn dispatch(state: &mut ServerState, id: SessionId, request: Request) {
    match request {
        Request::Login(req) => connection::login(state, id, req),
        Request::Quit => connection::quit(state, id),
        Request::CreateChan(req) => channel::create(state, id, req),
        Request::List(req) => channel::list(state, id, req),
        Request::Join(req) => channel::join(state, id, req),
        Request::Users(req) => channel::users(state, id, req),
        Request::SendMsg(req) => messaging::send(state, id, req),
        Request::Kick(req) => moderation::kick(state, id, req),
    }
}

/// Send the requester its one response record, if it is still live.
pub(crate) fn reply(state: &ServerState, id: SessionId, record: Record) {
    if let Some(session) = state.session(id) {
        session.send(record);
    }
}
