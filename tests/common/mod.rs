//! Shared harness for integration tests.
//!
//! Not every test uses every helper.
#![allow(dead_code)]

pub mod client;
pub mod server;

pub use client::TestClient;
pub use server::TestServer;
