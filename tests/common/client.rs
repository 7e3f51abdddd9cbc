//! Line-oriented test client.

use serde_json::{Value, json};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// One client connection speaking the wire protocol line by line.
pub struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect to server");
        let (read, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read).lines(),
            writer,
        }
    }

    /// Write one raw line, newline-terminated.
    pub async fn send_raw(&mut self, line: &str) {
        self.writer
            .write_all(line.as_bytes())
            .await
            .expect("write line");
        self.writer.write_all(b"\n").await.expect("write newline");
    }

    /// Write one JSON record.
    pub async fn send(&mut self, record: Value) {
        self.send_raw(&record.to_string()).await;
    }

    /// Read the next line, or `None` if the server closed the connection.
    pub async fn recv_line(&mut self) -> Option<String> {
        timeout(RECV_TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .expect("read line")
    }

    /// Read the next line and parse it as JSON. Panics on close or on
    /// the bare `GOODBYE` sentinel; use [`expect_goodbye`](Self::expect_goodbye)
    /// for that.
    pub async fn recv(&mut self) -> Value {
        let line = self.recv_line().await.expect("connection closed");
        serde_json::from_str(&line).unwrap_or_else(|e| panic!("bad JSON line {line:?}: {e}"))
    }

    /// Assert the next line is the bare disconnect sentinel.
    pub async fn expect_goodbye(&mut self) {
        assert_eq!(self.recv_line().await.as_deref(), Some("GOODBYE"));
    }

    /// Assert the server has closed the connection.
    pub async fn expect_closed(&mut self) {
        assert_eq!(self.recv_line().await, None);
    }

    /// LOGIN and return the response record.
    pub async fn login(&mut self, nick: &str) -> Value {
        self.send(json!({ "LOGIN": { "NICK": nick } })).await;
        self.recv().await
    }
}
