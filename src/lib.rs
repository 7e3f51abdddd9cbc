//! minircd - a JSON-framed chat daemon.
//!
//! Clients connect over TCP, adopt a display name, create and join named
//! channels, exchange channel broadcasts and direct messages, and are
//! monitored for liveness with a PING/PONG heartbeat.
//!
//! All server state lives in a single dispatcher task; connection and
//! heartbeat tasks only talk to it over an event channel, so registry and
//! channel mutation is serialized without locks.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod heartbeat;
pub mod network;
pub mod state;
