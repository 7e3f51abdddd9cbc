//! Accept loop.

use crate::dispatch::Event;
use crate::network::connection;
use crate::state::SessionId;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Listens for connections and spawns one task per accepted socket.
pub struct Gateway {
    listener: TcpListener,
    events: mpsc::UnboundedSender<Event>,
    /// Monotonic source of session ids; never reused for the process
    /// lifetime.
    next_id: AtomicU64,
}

impl Gateway {
    /// Bind the listening socket.
    pub async fn bind(addr: SocketAddr, events: mpsc::UnboundedSender<Event>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            events,
            next_id: AtomicU64::new(1),
        })
    }

    /// The bound address, useful when binding to port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.listener
            .local_addr()
            .unwrap_or_else(|_| ([0, 0, 0, 0], 0).into())
    }

    /// Accept forever. Individual accept failures are logged and the
    /// loop keeps going.
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
                    info!(%id, %peer, "Connection accepted");
                    tokio::spawn(connection::run(id, stream, self.events.clone()));
                }
                Err(e) => warn!(error = %e, "Accept failed"),
            }
        }
    }
}
