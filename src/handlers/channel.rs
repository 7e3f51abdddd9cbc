//! CREATECHAN, LIST, JOIN and USERS.

use super::reply;
use crate::error::DomainError;
use crate::state::{ServerState, SessionId};
use minirc_proto::{
    CreateChanRequest, JoinRequest, ListRequest, Outcome, Record, STATUS_OK, UsersRequest,
};
use regex::Regex;
use tracing::debug;

/// Create a channel; the requester becomes moderator and sole member.
pub fn create(state: &mut ServerState, id: SessionId, request: CreateChanRequest) {
    match state.create_channel(&request.name, id) {
        Ok(()) => {
            debug!(%id, channel = %request.name, "Channel created");
            reply(
                state,
                id,
                Record::ok(format!("Channel {} created successfully", request.name)),
            );
        }
        Err(e) => reply(state, id, e.record()),
    }
}

/// List channel names matching the optional filter pattern.
pub fn list(state: &mut ServerState, id: SessionId, request: ListRequest) {
    let filter = match compile_filter(request.filter.as_deref()) {
        Ok(filter) => filter,
        Err(e) => return reply(state, id, e.record()),
    };

    let mut names: Vec<String> = state
        .channel_names()
        .filter(|name| matches(&filter, name))
        .map(str::to_string)
        .collect();
    names.sort();

    reply(
        state,
        id,
        Record::Success(Outcome::with_names(STATUS_OK, names)),
    );
}

/// Join an ordered sequence of channels, aggregating one outcome per
/// name. A joined session alone receives the channel's welcome notice.
pub fn join(state: &mut ServerState, id: SessionId, request: JoinRequest) {
    let mut success = Vec::new();
    let mut error = Vec::new();

    for name in &request.channels {
        match state.join_channel(id, name) {
            Ok(()) => {
                reply(
                    state,
                    id,
                    Record::ChanHist {
                        channel: name.clone(),
                    },
                );
                success.push(Outcome::new(
                    STATUS_OK,
                    format!("Channel {name} joined successfully."),
                ));
            }
            Err(e) => error.push(e.outcome()),
        }
    }

    reply(state, id, Record::Aggregate { success, error });
}

/// List the members of one channel, optionally filtered by pattern.
pub fn users(state: &mut ServerState, id: SessionId, request: UsersRequest) {
    let Some(name) = request.name.filter(|n| !n.is_empty()) else {
        let e = DomainError::MalformedRequest("Must send name of channel.".into());
        return reply(state, id, e.record());
    };

    let filter = match compile_filter(request.filter.as_deref()) {
        Ok(filter) => filter,
        Err(e) => return reply(state, id, e.record()),
    };

    let Some(channel) = state.channel(&name) else {
        return reply(state, id, DomainError::ChannelNotFound(name).record());
    };

    let mut members: Vec<String> = channel
        .members()
        .iter()
        .filter_map(|&member| state.name_of(member))
        .filter(|member| matches(&filter, member))
        .map(str::to_string)
        .collect();
    members.sort();

    reply(
        state,
        id,
        Record::Success(Outcome::with_names(STATUS_OK, members)),
    );
}

/// Compile an optional filter. Absent or empty patterns match everything;
/// matching is an unanchored search, not a full match.
fn compile_filter(filter: Option<&str>) -> Result<Option<Regex>, DomainError> {
    match filter {
        None | Some("") => Ok(None),
        Some(pattern) => Regex::new(pattern)
            .map(Some)
            .map_err(|_| DomainError::MalformedRequest("Invalid FILTER pattern.".into())),
    }
}

fn matches(filter: &Option<Regex>, candidate: &str) -> bool {
    filter.as_ref().is_none_or(|re| re.is_match(candidate))
}
