//! # minirc-proto
//!
//! Sans-io model of the minIRC wire protocol.
//!
//! Records are line-delimited JSON objects with exactly one top-level key
//! naming the command, e.g. `{"LOGIN": {"NICK": "ada"}}`. This crate splits
//! decoding into two tiers that mirror how the server reports failures:
//!
//! - [`record::RawRecord::parse`] handles the protocol tier: framing shape,
//!   the closed command-name set, and the `{"PING": "PONG"}` liveness
//!   sentinel. Failures here are logged and dropped by the connection;
//!   the peer never sees them.
//! - [`request::Request::bind`] handles the domain tier: binding a known
//!   command's payload to its typed request struct. Failures here become
//!   401 malformed-request responses to the requester.
//!
//! Outbound traffic is modeled by [`response::Record`], which encodes every
//! server-to-client line including the `GOODBYE` disconnect sentinel.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod record;
pub mod request;
pub mod response;

pub use record::{CommandKind, RawRecord, RecordError};
pub use request::{
    BindError, CreateChanRequest, JoinRequest, KickRequest, ListRequest, LoginRequest, Request,
    SendMsgRequest, UsersRequest,
};
pub use response::{
    Outcome, Record, STATUS_ALREADY_MEMBER, STATUS_CONFLICT, STATUS_MALFORMED, STATUS_NOT_FOUND,
    STATUS_OK, STATUS_UNAUTHORIZED,
};
