//! Protocol-tier record decoding.
//!
//! A raw inbound line is split into a command kind and its unparsed JSON
//! payload. Anything that fails at this tier (bad JSON, wrong framing
//! shape, unknown command name) is a protocol error: the connection logs
//! it and drops the record without answering the peer.

use serde_json::Value;
use thiserror::Error;

/// Errors raised while splitting a line into command and payload.
///
/// None of these are ever reported to the peer.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record must carry exactly one top-level key, found {0}")]
    KeyCount(usize),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A `PING` record whose payload is not the `"PONG"` sentinel.
    #[error("PING record without PONG payload")]
    InvalidPing,
}

/// The closed set of inbound command names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// `LOGIN` - rename the session.
    Login,
    /// `QUIT` - disconnect.
    Quit,
    /// `CREATECHAN` - create a channel.
    CreateChan,
    /// `LIST` - list channel names.
    List,
    /// `JOIN` - join one or more channels.
    Join,
    /// `USERS` - list the members of a channel.
    Users,
    /// `SENDMSG` - message users and/or channels.
    SendMsg,
    /// `KICK` - privileged forced disconnect.
    Kick,
    /// `PING` - the liveness sentinel; never dispatched as a domain command.
    Ping,
}

impl CommandKind {
    /// Resolve a wire command name. Returns `None` for anything outside
    /// the closed set.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "LOGIN" => Some(Self::Login),
            "QUIT" => Some(Self::Quit),
            "CREATECHAN" => Some(Self::CreateChan),
            "LIST" => Some(Self::List),
            "JOIN" => Some(Self::Join),
            "USERS" => Some(Self::Users),
            "SENDMSG" => Some(Self::SendMsg),
            "KICK" => Some(Self::Kick),
            "PING" => Some(Self::Ping),
            _ => None,
        }
    }

    /// The wire name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Quit => "QUIT",
            Self::CreateChan => "CREATECHAN",
            Self::List => "LIST",
            Self::Join => "JOIN",
            Self::Users => "USERS",
            Self::SendMsg => "SENDMSG",
            Self::Kick => "KICK",
            Self::Ping => "PING",
        }
    }
}

/// An inbound record split into its command kind and raw payload.
///
/// The payload is left as a [`Value`]; typed binding happens later in
/// [`crate::request::Request::bind`] so that shape problems in a known
/// command surface as domain errors rather than silent drops.
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// Which command the single top-level key named.
    pub kind: CommandKind,
    /// The unparsed payload under that key. `Null` for bare commands.
    pub payload: Value,
}

impl RawRecord {
    /// Parse one wire line.
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(line.trim())?;
        let map = value.as_object().ok_or(RecordError::NotAnObject)?;
        if map.len() != 1 {
            return Err(RecordError::KeyCount(map.len()));
        }
        // Single-key invariant checked above.
        let (name, payload) = map
            .iter()
            .next()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .ok_or(RecordError::KeyCount(0))?;

        let kind =
            CommandKind::from_name(name).ok_or_else(|| RecordError::UnknownCommand(name.into()))?;

        // The only valid client-side PING payload is the PONG sentinel.
        if kind == CommandKind::Ping && payload != Value::String("PONG".into()) {
            return Err(RecordError::InvalidPing);
        }

        Ok(Self { kind, payload })
    }

    /// True if this record is the client liveness reply `{"PING": "PONG"}`.
    pub fn is_pong(&self) -> bool {
        self.kind == CommandKind::Ping
    }
}
