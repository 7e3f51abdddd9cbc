//! Domain error model.
//!
//! Domain-tier failures are structured results returned to the requester
//! only; they never cross the handler boundary as panics or transport
//! errors. Protocol-tier failures (bad framing, unknown commands) never
//! reach this type — the connection logs and drops those.

use minirc_proto::{
    Outcome, Record, STATUS_ALREADY_MEMBER, STATUS_CONFLICT, STATUS_MALFORMED, STATUS_NOT_FOUND,
    STATUS_UNAUTHORIZED,
};
use thiserror::Error;

/// The closed set of domain failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Username {0} already exists")]
    NameTaken(String),

    #[error("Channel {0} already exists")]
    ChannelExists(String),

    #[error("Channel {0} does not exist.")]
    ChannelNotFound(String),

    #[error("User {0} not found.")]
    UserNotFound(String),

    #[error("User {user} already in channel {channel}")]
    AlreadyMember {
        /// The requester's display name.
        user: String,
        /// The channel already joined.
        channel: String,
    },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Malformed request. {0}")]
    MalformedRequest(String),
}

impl DomainError {
    /// The wire status code for this error kind.
    pub fn status(&self) -> u16 {
        match self {
            Self::NameTaken(_) | Self::ChannelExists(_) => STATUS_CONFLICT,
            Self::ChannelNotFound(_) | Self::UserNotFound(_) => STATUS_NOT_FOUND,
            Self::AlreadyMember { .. } => STATUS_ALREADY_MEMBER,
            Self::Unauthorized => STATUS_UNAUTHORIZED,
            Self::MalformedRequest(_) => STATUS_MALFORMED,
        }
    }

    /// This error as one `{STATUS, MESSAGE}` outcome (aggregate entries).
    pub fn outcome(&self) -> Outcome {
        Outcome::new(self.status(), self.to_string())
    }

    /// This error as a standalone `{"ERROR": {...}}` record.
    pub fn record(&self) -> Record {
        Record::Error(self.outcome())
    }
}
