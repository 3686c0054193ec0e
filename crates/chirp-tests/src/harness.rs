//! Scripted mock server for protocol exchanges.
//!
//! A test spawns a one-connection server with a script closure, connects a
//! real client session to it over loopback, and asserts on both sides.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use chirp_client::{Connector, Deadline, Session};

/// Server side of one scripted connection.
pub struct ServerConn {
    stream: BufReader<TcpStream>,
}

impl ServerConn {
    fn new(stream: TcpStream) -> Self {
        Self {
            stream: BufReader::new(stream),
        }
    }

    /// Reads the next request line, without its newline.
    pub async fn read_request(&mut self) -> String {
        let mut line = String::new();
        self.stream.read_line(&mut line).await.unwrap();
        line.trim_end_matches('\n').to_string()
    }

    /// Reads the next request line and asserts it matches exactly.
    pub async fn expect(&mut self, expected: &str) {
        let got = self.read_request().await;
        assert_eq!(got, expected, "unexpected request line");
    }

    /// Sends one response line.
    pub async fn send_line(&mut self, line: &str) {
        self.stream
            .get_mut()
            .write_all(format!("{line}\n").as_bytes())
            .await
            .unwrap();
    }

    /// Sends raw payload bytes.
    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.stream.get_mut().write_all(bytes).await.unwrap();
    }

    /// Consumes exactly `n` payload bytes from the client.
    pub async fn read_payload(&mut self, n: usize) -> Vec<u8> {
        let mut buf = vec![0u8; n];
        self.stream.read_exact(&mut buf).await.unwrap();
        buf
    }
}

/// Binds a loopback listener, runs `script` on the first connection, and
/// returns the address plus the script's join handle.
pub async fn spawn_server<F, Fut>(script: F) -> (String, JoinHandle<()>)
where
    F: FnOnce(ServerConn) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        script(ServerConn::new(stream)).await;
    });
    (format!("127.0.0.1:{}", addr.port()), handle)
}

/// A generous deadline for exchanges that should not block.
pub fn deadline() -> Deadline {
    Deadline::after(Duration::from_secs(10))
}

/// Connects a session to a mock server, without the auth handshake.
pub async fn connect(addr: &str) -> Session {
    Connector::new()
        .connect(addr, false, deadline())
        .await
        .expect("connect to mock server")
}

/// Opt-in log capture for debugging a failing exchange.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env(),
        )
        .with_test_writer()
        .try_init();
}
