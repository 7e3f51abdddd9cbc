//! TCP surface: the accept loop and per-connection tasks.

pub mod connection;
pub mod gateway;

pub use gateway::Gateway;
