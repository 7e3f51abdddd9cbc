//! In-process server harness.

use minircd::config::HeartbeatConfig;
use minircd::dispatch::Dispatcher;
use minircd::network::Gateway;
use std::net::SocketAddr;

/// A full server (dispatcher plus gateway) on an ephemeral port.
///
/// The spawned tasks run until the test's runtime is dropped.
pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    /// Start with default heartbeat timings (slow enough that the
    /// heartbeat never fires inside an ordinary test).
    pub async fn start() -> Self {
        Self::start_with_heartbeat(HeartbeatConfig::default()).await
    }

    /// Start with explicit heartbeat timings.
    pub async fn start_with_heartbeat(heartbeat: HeartbeatConfig) -> Self {
        let (dispatcher, events) = Dispatcher::new(heartbeat);
        tokio::spawn(dispatcher.run());

        let listen: SocketAddr = "127.0.0.1:0".parse().expect("literal address");
        let gateway = Gateway::bind(listen, events).await.expect("bind test listener");
        let addr = gateway.local_addr();
        tokio::spawn(async move {
            let _ = gateway.run().await;
        });

        Self { addr }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}
