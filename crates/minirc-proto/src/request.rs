//! Typed request binding.
//!
//! Once the connection has resolved a record to a known [`CommandKind`],
//! the payload is bound to a per-command request struct before dispatch.
//! A failure here is a domain error: the requester gets a 401
//! malformed-request response instead of an exception at arbitrary depth.

use crate::record::{CommandKind, RawRecord};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// A payload that does not fit its command's expected shape.
///
/// Carries the client-facing message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BindError(pub String);

impl BindError {
    fn malformed(detail: impl std::fmt::Display) -> Self {
        Self(format!("Malformed request. {detail}"))
    }
}

/// `LOGIN` - adopt a new display name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    /// The requested display name.
    #[serde(rename = "NICK")]
    pub nick: String,
}

/// `CREATECHAN` - create a channel and become its moderator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateChanRequest {
    /// The channel name; must not already be registered.
    #[serde(rename = "NAME")]
    pub name: String,
}

/// `LIST` - list channel names, optionally filtered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListRequest {
    /// Optional unanchored regex pattern; absent/empty matches all.
    #[serde(rename = "FILTER", default)]
    pub filter: Option<String>,
}

/// `JOIN` - join an ordered sequence of channels.
///
/// `CHANNELS` must be a JSON array; a bare string is the documented
/// malformed-request case and is rejected with its own message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JoinRequest {
    /// Channel names to join, processed in order.
    #[serde(rename = "CHANNELS")]
    pub channels: Vec<String>,
}

/// `USERS` - list the members of one channel.
///
/// `NAME` is modeled as optional so its absence surfaces as the
/// handler-specific 401 rather than a generic binding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UsersRequest {
    /// The channel to inspect.
    #[serde(rename = "NAME", default)]
    pub name: Option<String>,
    /// Optional unanchored regex applied to member names.
    #[serde(rename = "FILTER", default)]
    pub filter: Option<String>,
}

/// `SENDMSG` - deliver a message to users and/or channels.
///
/// Both target fields accept a bare string as a one-element list, matching
/// the protocol's historical leniency. Presence of a message and at least
/// one target is checked by the handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendMsgRequest {
    /// The message body.
    #[serde(rename = "MESSAGE", default)]
    pub message: Option<String>,
    /// Direct-message recipients.
    #[serde(rename = "USERS", default, deserialize_with = "one_or_many_opt")]
    pub users: Option<Vec<String>>,
    /// Broadcast target channels.
    #[serde(rename = "CHANNELS", default, deserialize_with = "one_or_many_opt")]
    pub channels: Option<Vec<String>>,
}

/// `KICK` - forcibly disconnect users (privileged).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KickRequest {
    /// Target display names; a bare string is a one-element list.
    #[serde(rename = "NICKS", deserialize_with = "one_or_many")]
    pub nicks: Vec<String>,
    /// Optional reason echoed in the kick notice.
    #[serde(rename = "MESSAGE", default)]
    pub message: Option<String>,
}

/// The closed tagged union of dispatchable requests.
///
/// Adding a command means adding a variant here and an arm in the
/// dispatcher's exhaustive match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Rename the session.
    Login(LoginRequest),
    /// Disconnect.
    Quit,
    /// Create a channel.
    CreateChan(CreateChanRequest),
    /// List channel names.
    List(ListRequest),
    /// Join channels.
    Join(JoinRequest),
    /// List channel members.
    Users(UsersRequest),
    /// Send a message.
    SendMsg(SendMsgRequest),
    /// Kick users.
    Kick(KickRequest),
}

impl Request {
    /// Bind a raw record's payload to its typed request.
    ///
    /// `PING` is not a domain command and always fails to bind; the
    /// connection handles it before dispatch.
    pub fn bind(record: RawRecord) -> Result<Self, BindError> {
        // Bare commands arrive as `{"QUIT": null}`; treat null as empty.
        let payload = match record.payload {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other,
        };

        match record.kind {
            CommandKind::Login => bind_payload::<LoginRequest>(payload).map(Self::Login),
            CommandKind::Quit => Ok(Self::Quit),
            CommandKind::CreateChan => {
                bind_payload::<CreateChanRequest>(payload).map(Self::CreateChan)
            }
            CommandKind::List => bind_payload::<ListRequest>(payload).map(Self::List),
            CommandKind::Join => {
                if payload.get("CHANNELS").is_some_and(Value::is_string) {
                    return Err(BindError::malformed(
                        "Channel names must be passed as a list",
                    ));
                }
                bind_payload::<JoinRequest>(payload).map(Self::Join)
            }
            CommandKind::Users => bind_payload::<UsersRequest>(payload).map(Self::Users),
            CommandKind::SendMsg => bind_payload::<SendMsgRequest>(payload).map(Self::SendMsg),
            CommandKind::Kick => bind_payload::<KickRequest>(payload).map(Self::Kick),
            CommandKind::Ping => Err(BindError::malformed("PING is not a dispatchable command")),
        }
    }
}

fn bind_payload<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T, BindError> {
    serde_json::from_value(payload).map_err(BindError::malformed)
}

/// Accept either `"x"` or `["x", "y"]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

fn one_or_many_opt<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(|v| match v {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(line: &str) -> Result<Request, BindError> {
        Request::bind(RawRecord::parse(line).expect("protocol tier should accept"))
    }

    #[test]
    fn test_bind_login() {
        let req = bind(r#"{"LOGIN": {"NICK": "ada"}}"#).unwrap();
        assert_eq!(
            req,
            Request::Login(LoginRequest {
                nick: "ada".into()
            })
        );
    }

    #[test]
    fn test_login_missing_nick_is_malformed() {
        let err = bind(r#"{"LOGIN": {}}"#).unwrap_err();
        assert!(err.0.starts_with("Malformed request."));
    }

    #[test]
    fn test_quit_ignores_payload() {
        assert_eq!(bind(r#"{"QUIT": null}"#).unwrap(), Request::Quit);
    }

    #[test]
    fn test_join_requires_list() {
        let err = bind(r#"{"JOIN": {"CHANNELS": "lobby"}}"#).unwrap_err();
        assert_eq!(
            err.0,
            "Malformed request. Channel names must be passed as a list"
        );

        let req = bind(r#"{"JOIN": {"CHANNELS": ["lobby", "dev"]}}"#).unwrap();
        assert_eq!(
            req,
            Request::Join(JoinRequest {
                channels: vec!["lobby".into(), "dev".into()]
            })
        );
    }

    #[test]
    fn test_users_name_optional_at_binding() {
        // Missing NAME binds; the handler owns the 401.
        let req = bind(r#"{"USERS": {}}"#).unwrap();
        assert_eq!(req, Request::Users(UsersRequest::default()));
    }

    #[test]
    fn test_sendmsg_accepts_scalar_targets() {
        let req = bind(r#"{"SENDMSG": {"MESSAGE": "hi", "USERS": "bob"}}"#).unwrap();
        let Request::SendMsg(send) = req else {
            panic!("expected SENDMSG");
        };
        assert_eq!(send.users.as_deref(), Some(&["bob".to_string()][..]));
        assert_eq!(send.channels, None);
    }

    #[test]
    fn test_kick_scalar_and_list_nicks() {
        let req = bind(r#"{"KICK": {"NICKS": "mallory"}}"#).unwrap();
        let Request::Kick(kick) = req else {
            panic!("expected KICK");
        };
        assert_eq!(kick.nicks, vec!["mallory".to_string()]);
        assert_eq!(kick.message, None);

        let req = bind(r#"{"KICK": {"NICKS": ["a", "b"], "MESSAGE": "bye"}}"#).unwrap();
        let Request::Kick(kick) = req else {
            panic!("expected KICK");
        };
        assert_eq!(kick.nicks.len(), 2);
        assert_eq!(kick.message.as_deref(), Some("bye"));
    }

    #[test]
    fn test_list_filter_optional() {
        assert_eq!(
            bind(r#"{"LIST": null}"#).unwrap(),
            Request::List(ListRequest::default())
        );
        assert_eq!(
            bind(r#"{"LIST": {"FILTER": "^lob"}}"#).unwrap(),
            Request::List(ListRequest {
                filter: Some("^lob".into())
            })
        );
    }
}
