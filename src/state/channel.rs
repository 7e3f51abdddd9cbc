//! Channel state: membership and moderator succession.

use super::SessionId;
use std::collections::HashSet;

/// What happened when a member left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// Members remain; the channel lives on.
    Remaining(usize),
    /// The departing session was the last member. The channel must be
    /// deregistered by the caller: a channel with zero members does not
    /// exist.
    Empty,
}

/// A named group of member sessions with one moderator.
///
/// Invariants: `members` is non-empty for as long as the channel is
/// registered, and the moderator is always a member.
#[derive(Debug)]
pub struct Channel {
    name: String,
    moderator: SessionId,
    members: HashSet<SessionId>,
}

impl Channel {
    /// Create a channel whose sole member is its moderator.
    pub fn new(name: impl Into<String>, moderator: SessionId) -> Self {
        let mut members = HashSet::new();
        members.insert(moderator);
        Self {
            name: name.into(),
            moderator,
            members,
        }
    }

    /// The immutable channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current moderator.
    pub fn moderator(&self) -> SessionId {
        self.moderator
    }

    /// The current member set.
    pub fn members(&self) -> &HashSet<SessionId> {
        &self.members
    }

    pub fn is_member(&self, session: SessionId) -> bool {
        self.members.contains(&session)
    }

    /// Add a member. Returns `false` (members unchanged) if the session
    /// is already one.
    pub fn add_member(&mut self, session: SessionId) -> bool {
        self.members.insert(session)
    }

    /// Remove a member, promoting an arbitrary remaining member if the
    /// moderator leaves. Returns [`Departure::Empty`] when the last
    /// member leaves, in which case the caller deregisters the channel.
    pub fn remove_member(&mut self, session: SessionId) -> Departure {
        if self.members.len() == 1 && self.members.contains(&session) {
            return Departure::Empty;
        }
        self.members.remove(&session);
        if self.moderator == session {
            // No seniority rule: any remaining member will do.
            if let Some(&successor) = self.members.iter().next() {
                self.moderator = successor;
            }
        }
        Departure::Remaining(self.members.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_is_moderator_and_member() {
        let channel = Channel::new("lobby", SessionId(1));
        assert_eq!(channel.moderator(), SessionId(1));
        assert!(channel.is_member(SessionId(1)));
        assert_eq!(channel.members().len(), 1);
    }

    #[test]
    fn test_duplicate_join_leaves_members_unchanged() {
        let mut channel = Channel::new("lobby", SessionId(1));
        assert!(channel.add_member(SessionId(2)));
        assert!(!channel.add_member(SessionId(2)));
        assert_eq!(channel.members().len(), 2);
    }

    #[test]
    fn test_last_member_leaving_empties_channel() {
        let mut channel = Channel::new("lobby", SessionId(1));
        assert_eq!(channel.remove_member(SessionId(1)), Departure::Empty);
    }

    #[test]
    fn test_moderator_departure_promotes_remaining_member() {
        let mut channel = Channel::new("lobby", SessionId(1));
        channel.add_member(SessionId(2));
        channel.add_member(SessionId(3));

        assert!(matches!(
            channel.remove_member(SessionId(1)),
            Departure::Remaining(2)
        ));
        // The successor is arbitrary but must be a member.
        assert!(channel.is_member(channel.moderator()));
        assert_ne!(channel.moderator(), SessionId(1));
    }

    #[test]
    fn test_non_moderator_departure_keeps_moderator() {
        let mut channel = Channel::new("lobby", SessionId(1));
        channel.add_member(SessionId(2));

        assert!(matches!(
            channel.remove_member(SessionId(2)),
            Departure::Remaining(1)
        ));
        assert_eq!(channel.moderator(), SessionId(1));
        assert!(channel.is_member(SessionId(1)));
    }
}
