//! The process-wide registries and cross-registry operations.
//!
//! `ServerState` owns every live session and channel and the two lookup
//! tables over them. It is constructed once, owned by the dispatcher, and
//! passed by reference into every handler — no globals.

use super::channel::{Channel, Departure};
use super::session::{Phase, Session, SessionId};
use crate::error::DomainError;
use minirc_proto::Record;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct ServerState {
    sessions: HashMap<SessionId, Session>,
    /// Every live session under exactly one key: its current display name.
    users_by_name: HashMap<String, SessionId>,
    /// Every entry's key equals that channel's name.
    channels_by_name: HashMap<String, Channel>,
    /// Counter for synthesized default names.
    name_counter: u64,
}

impl ServerState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    /// Register a new session under a synthesized unique name and return
    /// that name. The session starts in [`Phase::Connecting`].
    pub fn create_session(
        &mut self,
        id: SessionId,
        outbound: mpsc::UnboundedSender<Record>,
    ) -> String {
        let name = loop {
            self.name_counter += 1;
            let candidate = format!("user_{}", self.name_counter);
            if !self.users_by_name.contains_key(&candidate) {
                break candidate;
            }
        };
        self.users_by_name.insert(name.clone(), id);
        self.sessions.insert(id, Session::new(id, name.clone(), outbound));
        name
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    /// Look up a session id by display name.
    pub fn resolve(&self, name: &str) -> Option<SessionId> {
        self.users_by_name.get(name).copied()
    }

    /// The display name of a live session.
    pub fn name_of(&self, id: SessionId) -> Option<&str> {
        self.sessions.get(&id).map(|s| s.name.as_str())
    }

    /// Change a session's display name, atomically moving its registry
    /// key. Fails with `NameTaken` without touching the original
    /// registration.
    pub fn rename(&mut self, id: SessionId, new_name: &str) -> Result<(), DomainError> {
        if self.users_by_name.contains_key(new_name) {
            return Err(DomainError::NameTaken(new_name.to_string()));
        }
        let Some(session) = self.sessions.get_mut(&id) else {
            return Err(DomainError::UserNotFound(format!("session {id}")));
        };
        let old_name = std::mem::replace(&mut session.name, new_name.to_string());
        self.users_by_name.remove(&old_name);
        self.users_by_name.insert(new_name.to_string(), id);
        debug!(%id, from = %old_name, to = %new_name, "Username changed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Channels
    // ------------------------------------------------------------------

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels_by_name.get(name)
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels_by_name.keys().map(String::as_str)
    }

    /// Create a channel with the requester as moderator and sole member.
    pub fn create_channel(&mut self, name: &str, requester: SessionId) -> Result<(), DomainError> {
        if self.channels_by_name.contains_key(name) {
            return Err(DomainError::ChannelExists(name.to_string()));
        }
        self.channels_by_name
            .insert(name.to_string(), Channel::new(name, requester));
        if let Some(session) = self.sessions.get_mut(&requester) {
            session.channels.insert(name.to_string());
        }
        Ok(())
    }

    /// Add a session to a channel's member set and record the membership
    /// on the session.
    pub fn join_channel(&mut self, id: SessionId, name: &str) -> Result<(), DomainError> {
        let user = self
            .name_of(id)
            .ok_or_else(|| DomainError::UserNotFound(format!("session {id}")))?
            .to_string();
        let channel = self
            .channels_by_name
            .get_mut(name)
            .ok_or_else(|| DomainError::ChannelNotFound(name.to_string()))?;
        if !channel.add_member(id) {
            return Err(DomainError::AlreadyMember {
                user,
                channel: name.to_string(),
            });
        }
        if let Some(session) = self.sessions.get_mut(&id) {
            session.channels.insert(name.to_string());
        }
        Ok(())
    }

    /// Deliver one message to every current member of a channel, all
    /// stamped with a single shared timestamp. Returns `false` if the
    /// channel does not exist.
    pub fn broadcast(&self, channel: &str, message: &str, from: &str) -> bool {
        let Some(channel) = self.channels_by_name.get(channel) else {
            return false;
        };
        let time = chrono::Utc::now().to_rfc3339();
        for member in channel.members() {
            if let Some(session) = self.sessions.get(member) {
                session.send(Record::ChanMsg {
                    channel: channel.name().to_string(),
                    time: time.clone(),
                    from: from.to_string(),
                    message: message.to_string(),
                });
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Disconnect cleanup
    // ------------------------------------------------------------------

    /// Tear a session down: cancel its heartbeat, optionally write the
    /// `GOODBYE` sentinel, deregister the name, and remove it from every
    /// joined channel, destroying any channel thereby emptied.
    ///
    /// Idempotent: returns `false` if the session is already gone or
    /// already disconnecting, so cleanup runs exactly once no matter how
    /// many paths (QUIT, kick, heartbeat timeout, transport close) race
    /// to it.
    pub fn disconnect(&mut self, id: SessionId, notify: bool) -> bool {
        let (name, joined) = {
            let Some(session) = self.sessions.get_mut(&id) else {
                return false;
            };
            if session.phase == Phase::Disconnecting {
                return false;
            }
            session.phase = Phase::Disconnecting;

            // Cancel the heartbeat before any registry or channel
            // mutation so a stale timer cannot act on a torn-down
            // session.
            if let Some(handle) = session.heartbeat.take() {
                handle.cancel();
            }

            if notify {
                session.send(Record::Goodbye);
            }

            (
                session.name.clone(),
                session.channels.iter().cloned().collect::<Vec<_>>(),
            )
        };

        self.users_by_name.remove(&name);

        for channel_name in joined {
            if let Some(channel) = self.channels_by_name.get_mut(&channel_name) {
                match channel.remove_member(id) {
                    Departure::Empty => {
                        self.channels_by_name.remove(&channel_name);
                        info!(channel = %channel_name, "Empty channel removed");
                    }
                    Departure::Remaining(members) => {
                        debug!(channel = %channel_name, members, "Member removed");
                    }
                }
            }
        }

        // Dropping the session closes its outbound path, which closes
        // the transport.
        self.sessions.remove(&id);
        info!(%id, nick = %name, "Session deregistered");
        true
    }

    #[cfg(test)]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
