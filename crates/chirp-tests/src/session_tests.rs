//! Response core and fault-state behavior over a live connection.

use chirp_client::ErrorKind;
use chirp_proto::WireCode;

use crate::harness::{connect, deadline, spawn_server};

const STAT_LINE: &str = "2049 77 33188 1 0 0 0 1234 4096 8 1 2 3";

#[tokio::test]
async fn test_simple_command_roundtrip() {
    let (addr, server) = spawn_server(|mut conn| async move {
        conn.expect("stat /etc/motd").await;
        conn.send_line("0").await;
        conn.send_line(STAT_LINE).await;
    })
    .await;

    let mut session = connect(&addr).await;
    let stat = session.stat("/etc/motd", deadline()).await.unwrap();
    assert_eq!(stat.size, 1234);
    assert_eq!(stat.dev, -1);
    assert_eq!(stat.rdev, 0);
    server.await.unwrap();
}

#[tokio::test]
async fn test_path_arguments_are_percent_encoded() {
    let (addr, server) = spawn_server(|mut conn| async move {
        conn.expect("unlink /tmp/a%20file").await;
        conn.send_line("0").await;
    })
    .await;

    let mut session = connect(&addr).await;
    session.unlink("/tmp/a file", deadline()).await.unwrap();
    server.await.unwrap();
}

#[tokio::test]
async fn test_server_error_leaves_session_usable() {
    let (addr, server) = spawn_server(|mut conn| async move {
        conn.expect("unlink /missing").await;
        conn.send_line("-3").await;
        conn.expect("mkdir /fresh 493").await;
        conn.send_line("0").await;
    })
    .await;

    let mut session = connect(&addr).await;
    let err = session.unlink("/missing", deadline()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!session.is_broken());

    session.mkdir("/fresh", 0o755, deadline()).await.unwrap();
    server.await.unwrap();
}

#[tokio::test]
async fn test_every_wire_code_translates_over_the_wire() {
    let codes: Vec<i64> = WireCode::ALL.iter().map(|&c| c as i64).collect();
    let expected: Vec<ErrorKind> = WireCode::ALL.iter().map(|c| c.kind()).collect();

    let server_codes = codes.clone();
    let (addr, server) = spawn_server(|mut conn| async move {
        for code in server_codes {
            conn.read_request().await;
            conn.send_line(&code.to_string()).await;
        }
    })
    .await;

    let mut session = connect(&addr).await;
    for (code, want) in codes.iter().zip(expected) {
        let err = session.access("/p", 0, deadline()).await.unwrap_err();
        assert_eq!(err.kind(), want, "wire code {code}");
        assert!(!session.is_broken(), "semantic error broke session");
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_unknown_wire_code_carries_raw_value() {
    let (addr, server) = spawn_server(|mut conn| async move {
        conn.read_request().await;
        conn.send_line("-99").await;
    })
    .await;

    let mut session = connect(&addr).await;
    let err = session.rmdir("/x", deadline()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol(-99));
    server.await.unwrap();
}

#[tokio::test]
async fn test_malformed_result_line_breaks_session() {
    let (addr, server) = spawn_server(|mut conn| async move {
        conn.read_request().await;
        conn.send_line("bananas").await;
    })
    .await;

    let mut session = connect(&addr).await;
    let err = session.rmdir("/x", deadline()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConnectionReset);
    assert!(session.is_broken());
    server.await.unwrap();
}

#[tokio::test]
async fn test_broken_session_fails_fast_without_io() {
    let (addr, server) = spawn_server(|mut conn| async move {
        conn.read_request().await;
        conn.send_line("garbage line").await;
    })
    .await;

    let mut session = connect(&addr).await;
    assert!(session.rmdir("/x", deadline()).await.is_err());
    server.await.unwrap();

    // Server is gone; these must fail locally, immediately, every time.
    for _ in 0..3 {
        let err = session.unlink("/y", deadline()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionReset);
    }
}

#[tokio::test]
async fn test_deadline_expiry_mid_response_is_reset() {
    let (addr, server) = spawn_server(|mut conn| async move {
        // Swallow the request and never answer.
        conn.read_request().await;
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    })
    .await;

    let mut session = connect(&addr).await;
    let short = chirp_client::Deadline::after(std::time::Duration::from_millis(100));
    let err = session.rmdir("/x", short).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConnectionReset);
    assert!(session.is_broken());
    server.await.unwrap();
}

#[tokio::test]
async fn test_whoami_reads_counted_payload() {
    let (addr, server) = spawn_server(|mut conn| async move {
        conn.expect("whoami 256").await;
        conn.send_line("11").await;
        conn.send_raw(b"hostname:nd").await;
    })
    .await;

    let mut session = connect(&addr).await;
    let identity = session.whoami(256, deadline()).await.unwrap();
    assert_eq!(identity, "hostname:nd");
    server.await.unwrap();
}

#[tokio::test]
async fn test_locate_is_local_only() {
    let (addr, server) = spawn_server(|_conn| async move {}).await;

    let session = connect(&addr).await;
    let mut seen = Vec::new();
    let count = session.locate("/data/x", |loc| seen.push(loc.to_string()));
    assert_eq!(count, 1);
    assert_eq!(seen, vec![format!("127.0.0.1:/data/x")]);
    server.await.unwrap();
}

/// Toy negotiator: one request line, one yes/no reply.
struct LineAuth;

#[async_trait::async_trait]
impl chirp_client::AuthNegotiator for LineAuth {
    async fn assert(
        &self,
        link: &mut chirp_transport::Link,
        deadline: chirp_client::Deadline,
    ) -> chirp_transport::Result<chirp_client::AuthIdent> {
        link.write_all(b"auth hostname\n", deadline).await?;
        let line = link.read_line(1024, deadline).await?;
        if line == "yes" {
            Ok(chirp_client::AuthIdent {
                auth_type: "hostname".to_string(),
                subject: "client.example.edu".to_string(),
            })
        } else {
            Err(chirp_transport::TransportError::AuthFailed { reason: line })
        }
    }
}

#[tokio::test]
async fn test_connect_with_auth_handshake() {
    let (addr, server) = spawn_server(|mut conn| async move {
        conn.expect("auth hostname").await;
        conn.send_line("yes").await;
        conn.expect("whoami 64").await;
        conn.send_line("2").await;
        conn.send_raw(b"ok").await;
    })
    .await;

    let connector = chirp_client::Connector::new().with_auth(std::sync::Arc::new(LineAuth));
    let mut session = connector.connect(&addr, true, deadline()).await.unwrap();
    assert_eq!(session.whoami(64, deadline()).await.unwrap(), "ok");
    server.await.unwrap();
}

#[tokio::test]
async fn test_rejected_handshake_is_permission_denied() {
    let (addr, server) = spawn_server(|mut conn| async move {
        conn.expect("auth hostname").await;
        conn.send_line("no").await;
    })
    .await;

    let connector = chirp_client::Connector::new().with_auth(std::sync::Arc::new(LineAuth));
    let err = connector.connect(&addr, true, deadline()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    server.await.unwrap();
}

#[tokio::test]
async fn test_auth_requested_without_negotiator_is_config_error() {
    let (addr, server) = spawn_server(|_conn| async move {}).await;

    let connector = chirp_client::Connector::new();
    let err = connector.connect(&addr, true, deadline()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    server.await.unwrap();
}

#[tokio::test]
async fn test_serials_are_distinct_across_sessions() {
    let (addr_a, _sa) = spawn_server(|_conn| async move {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    })
    .await;
    let (addr_b, _sb) = spawn_server(|_conn| async move {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    })
    .await;

    let connector = chirp_client::Connector::new();
    let a = connector.connect(&addr_a, false, deadline()).await.unwrap();
    let b = connector.connect(&addr_b, false, deadline()).await.unwrap();
    assert_ne!(a.serial(), b.serial());
}
