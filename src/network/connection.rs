//! Per-connection event loop.
//!
//! Each accepted socket gets one task that owns the framed transport.
//! Inbound lines are decoded at the protocol tier and forwarded to the
//! dispatcher; outbound records arrive over the session's FIFO channel
//! and are written in order. The task never touches server state.

use crate::dispatch::Event;
use crate::state::SessionId;
use futures_util::{SinkExt, StreamExt};
use minirc_proto::{RawRecord, Record};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::debug;

/// Inbound lines longer than this are a protocol error and poison the
/// connection.
const MAX_LINE_BYTES: usize = 8192;

/// Drive one connection until either side closes it.
///
/// On every exit path a final [`Event::TransportClosed`] is sent; the
/// dispatcher's cleanup is idempotent, so a duplicate after a QUIT or
/// kick is harmless.
pub async fn run(id: SessionId, stream: TcpStream, events: mpsc::UnboundedSender<Event>) {
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Record>();
    if events
        .send(Event::Connect {
            id,
            outbound: outbound_tx,
        })
        .is_err()
    {
        return;
    }

    let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_BYTES));

    loop {
        tokio::select! {
            inbound = framed.next() => match inbound {
                Some(Ok(line)) => match RawRecord::parse(&line) {
                    Ok(record) if record.is_pong() => {
                        let _ = events.send(Event::Pong { id });
                    }
                    Ok(record) => {
                        let _ = events.send(Event::Command { id, record });
                    }
                    // Protocol-tier failure: log and drop, no reply.
                    Err(e) => debug!(%id, error = %e, "Undecodable record dropped"),
                },
                Some(Err(e)) => {
                    debug!(%id, error = %e, "Read failed; closing connection");
                    break;
                }
                None => {
                    debug!(%id, "Peer closed the connection");
                    break;
                }
            },
            outbound = outbound_rx.recv() => match outbound {
                Some(record) => {
                    let closing = record == Record::Goodbye;
                    if framed.send(record.encode()).await.is_err() {
                        break;
                    }
                    // The sentinel is the last write; drop the socket
                    // without waiting for the peer.
                    if closing {
                        break;
                    }
                }
                // The dispatcher dropped the session: forced close.
                None => break,
            },
        }
    }

    let _ = events.send(Event::TransportClosed { id });
}
