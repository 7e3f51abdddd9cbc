//! Outbound record model.
//!
//! Everything the server writes to a client is one of these records,
//! encoded as a single JSON line — except the bare `GOODBYE` sentinel
//! written immediately before the server closes a connection.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Success.
pub const STATUS_OK: u16 = 200;
/// Malformed request or unauthorized.
pub const STATUS_MALFORMED: u16 = 401;
/// Unauthorized shares the 401 status with malformed requests.
pub const STATUS_UNAUTHORIZED: u16 = 401;
/// Already a member of the channel.
pub const STATUS_ALREADY_MEMBER: u16 = 402;
/// User or channel not found.
pub const STATUS_NOT_FOUND: u16 = 404;
/// Name or channel already taken.
pub const STATUS_CONFLICT: u16 = 409;

/// One `{STATUS, MESSAGE}` outcome.
///
/// `MESSAGE` is usually text but carries a name array for LIST and USERS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// HTTP-flavored status code.
    #[serde(rename = "STATUS")]
    pub status: u16,
    /// Human-readable text, or an array of names.
    #[serde(rename = "MESSAGE")]
    pub message: Value,
}

impl Outcome {
    /// A textual outcome.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Value::String(message.into()),
        }
    }

    /// An outcome whose message is an array of names (LIST, USERS).
    pub fn with_names(status: u16, names: Vec<String>) -> Self {
        Self {
            status,
            message: json!(names),
        }
    }
}

/// One server-to-client record.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// `{"SUCCESS": {...}}`
    Success(Outcome),
    /// `{"ERROR": {...}}`
    Error(Outcome),
    /// Aggregated per-target outcomes for JOIN, SENDMSG and KICK:
    /// `{"ERROR": [...], "SUCCESS": [...]}`.
    Aggregate {
        /// Per-target successes, in target order.
        success: Vec<Outcome>,
        /// Per-target failures, in target order.
        error: Vec<Outcome>,
    },
    /// A channel broadcast. Every recipient of one broadcast sees the
    /// same `time` string.
    ChanMsg {
        /// Originating channel.
        channel: String,
        /// Shared broadcast timestamp (RFC 3339).
        time: String,
        /// Sender display name.
        from: String,
        /// Message body.
        message: String,
    },
    /// A direct message between users.
    DirectMsg {
        /// Sender display name.
        from: String,
        /// Recipient display name.
        to: String,
        /// Message body.
        message: String,
    },
    /// Welcome/history notice sent to a joining session alone.
    ChanHist {
        /// The channel just joined.
        channel: String,
    },
    /// Notice sent to a session about to be kicked.
    KickNotice {
        /// Explanation, including the kicker's name.
        message: String,
    },
    /// Server liveness probe `{"PING": null}`.
    Ping,
    /// Disconnect sentinel; written bare, then the transport closes.
    Goodbye,
}

impl Record {
    /// A 200 success record with a textual message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self::Success(Outcome::new(STATUS_OK, message))
    }

    /// An error record with the given status and message.
    pub fn err(status: u16, message: impl Into<String>) -> Self {
        Self::Error(Outcome::new(status, message))
    }

    /// The JSON form of this record. The `GOODBYE` sentinel has none.
    pub fn to_value(&self) -> Option<Value> {
        Some(match self {
            Self::Success(outcome) => json!({ "SUCCESS": outcome }),
            Self::Error(outcome) => json!({ "ERROR": outcome }),
            Self::Aggregate { success, error } => {
                json!({ "ERROR": error, "SUCCESS": success })
            }
            Self::ChanMsg {
                channel,
                time,
                from,
                message,
            } => json!({
                "CHANMSG": {
                    "CHANNEL": channel,
                    "TIME": time,
                    "FROM": from,
                    "MESSAGE": message,
                }
            }),
            Self::DirectMsg { from, to, message } => json!({
                "DIRECTMSG": { "FROM": from, "TO": to, "MESSAGE": message }
            }),
            Self::ChanHist { channel } => json!({ "CHANHIST": { "CHANNEL": channel } }),
            Self::KickNotice { message } => json!({ "KICK": { "MESSAGE": message } }),
            Self::Ping => json!({ "PING": null }),
            Self::Goodbye => return None,
        })
    }

    /// Encode this record as one wire line (without the trailing newline).
    pub fn encode(&self) -> String {
        match self.to_value() {
            Some(value) => value.to_string(),
            None => "GOODBYE".to_string(),
        }
    }
}
