//! Transport Client Tests
//!
//! Exercises `HyperionClient::send_command` against a fake server:
//! - framing of requests and replies
//! - reassembly of replies split across reads
//! - connection, protocol, timeout and size-limit failures

mod common;

use common::{closed_port, FakeServer, Reply};
use hyperion_bench::{
    DriverError, Filter, HyperionClient, HyperionClientBuilder, Operator, Record,
};
use std::time::Duration;

fn client_for(server: &FakeServer) -> HyperionClient {
    HyperionClient::new("127.0.0.1", server.port)
}

// ============================================================================
// Framing
// ============================================================================

#[tokio::test]
async fn test_echo_returns_command_exactly() {
    let server = FakeServer::start(|_, _| Reply::Echo).await;
    let client = client_for(&server);

    for command in [
        "LIST",
        "QUERY price > 100",
        r#"INSERT_OR_UPDATE_MANY [{"_id":"id_0","content":"a b c"}]"#,
        "QUERY name CONTAINS Gaston Lagaffe",
    ] {
        let reply = client.send_command(command).await.unwrap();
        assert_eq!(reply, command);
    }

    assert_eq!(server.requests().len(), 4);
}

#[tokio::test]
async fn test_request_is_single_newline_terminated_line() {
    let server = FakeServer::constant("OK").await;
    let client = client_for(&server);

    client.send_command("GET user_1").await.unwrap();
    assert_eq!(server.requests(), vec!["GET user_1".to_string()]);
}

#[tokio::test]
async fn test_reply_whitespace_is_trimmed() {
    let server = FakeServer::start(|_, _| Reply::split(&["  OK  \r\n"], Duration::ZERO)).await;
    let reply = client_for(&server).send_command("DELETE k").await.unwrap();
    assert_eq!(reply, "OK");
}

#[tokio::test]
async fn test_command_with_newline_is_rejected_before_sending() {
    let server = FakeServer::constant("OK").await;
    let client = client_for(&server);

    let err = client.send_command("LIST\nLIST").await.unwrap_err();
    assert!(matches!(err, DriverError::InvalidCommand(_)));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_each_request_uses_a_new_connection() {
    let server = FakeServer::start(|index, _| Reply::line(&format!("conn-{}", index))).await;
    let client = client_for(&server);

    assert_eq!(client.send_command("LIST").await.unwrap(), "conn-0");
    assert_eq!(client.send_command("LIST").await.unwrap(), "conn-1");
    assert_eq!(client.send_command("LIST").await.unwrap(), "conn-2");
}

#[tokio::test]
async fn test_bytes_after_terminator_are_kept_and_connection_closed() {
    let server = FakeServer::start(|_, _| Reply::line("OK\nTRAIL")).await;

    let reply = client_for(&server).send_command("LIST").await.unwrap();
    assert_eq!(reply, "OK\nTRAIL");
    assert!(server.client_closed(0).await);
}

// ============================================================================
// Partial reads
// ============================================================================

#[tokio::test]
async fn test_reply_split_mid_word_is_reassembled() {
    let server = FakeServer::start(|_, _| {
        Reply::split(
            &["[{\"name\":\"Gas", "ton\"},{\"name\"", ":\"Alice\"}]\n"],
            Duration::from_millis(30),
        )
    })
    .await;

    let reply = client_for(&server).send_command("LIST").await.unwrap();
    assert_eq!(reply, r#"[{"name":"Gaston"},{"name":"Alice"}]"#);
}

#[tokio::test]
async fn test_large_reply_spanning_many_reads() {
    let payload = "x".repeat(64 * 1024);
    let expected = payload.clone();
    let server = FakeServer::start(move |_, _| Reply::line(&payload)).await;

    let reply = client_for(&server).send_command("LIST").await.unwrap();
    assert_eq!(reply.len(), expected.len());
    assert_eq!(reply, expected);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_connect_failure_is_connection_error() {
    let port = closed_port().await;
    let client = HyperionClient::new("127.0.0.1", port);

    let err = client.send_command("LIST").await.unwrap_err();
    assert!(matches!(err, DriverError::ConnectionError(_)), "{:?}", err);
}

#[tokio::test]
async fn test_close_without_reply_is_protocol_error() {
    let server = FakeServer::start(|_, _| Reply::Close).await;

    let err = client_for(&server).send_command("LIST").await.unwrap_err();
    assert!(matches!(err, DriverError::ProtocolError(_)), "{:?}", err);
}

#[tokio::test]
async fn test_close_before_terminator_is_protocol_error() {
    let server = FakeServer::start(|_, _| Reply::split(&["[1,2"], Duration::ZERO)).await;

    let err = client_for(&server).send_command("LIST").await.unwrap_err();
    assert!(matches!(err, DriverError::ProtocolError(_)), "{:?}", err);
    assert!(server.client_closed(0).await);
}

#[tokio::test]
async fn test_invalid_utf8_is_protocol_error() {
    let server = FakeServer::start(|_, _| Reply::Chunks {
        chunks: vec![vec![0xc3, 0x28, b'\n']],
        gap: Duration::ZERO,
    })
    .await;

    let err = client_for(&server).send_command("LIST").await.unwrap_err();
    assert!(matches!(err, DriverError::ProtocolError(_)), "{:?}", err);
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let server = FakeServer::start(|_, _| Reply::Hang).await;
    let client = HyperionClientBuilder::new(&server.addr)
        .timeout_ms(200)
        .build()
        .unwrap();

    let err = client.send_command("LIST").await.unwrap_err();
    assert!(
        matches!(err, DriverError::TimeoutError(d) if d == Duration::from_millis(200)),
        "{:?}",
        err
    );
    // The server never answered, yet the socket is released on timeout
    assert!(server.client_closed(0).await);
}

#[tokio::test]
async fn test_oversized_reply_is_rejected() {
    let server = FakeServer::start(|_, _| Reply::line(&"y".repeat(10_000))).await;
    let client = HyperionClientBuilder::new(&server.addr)
        .max_response_size(1_024)
        .build()
        .unwrap();

    let err = client.send_command("LIST").await.unwrap_err();
    assert!(
        matches!(err, DriverError::ResponseTooLarge { limit: 1_024 }),
        "{:?}",
        err
    );
}

// ============================================================================
// Typed commands
// ============================================================================

#[tokio::test]
async fn test_typed_commands_classify_replies() {
    let server = FakeServer::start(|_, line| {
        if line.starts_with("GET missing") {
            Reply::line("NULL")
        } else if line.starts_with("GET") {
            Reply::line(r#"{"name":"Alice"}"#)
        } else if line.starts_with("INSERT ") || line.starts_with("DELETE ") {
            Reply::line("OK")
        } else if line == "LIST" {
            Reply::line(r#"[{"_id":"a"},{"_id":"b"}]"#)
        } else if line.starts_with("QUERY ") {
            Reply::line(r#"[{"_id":"a","price":150}]"#)
        } else if line.starts_with(r#"INSERT_OR_UPDATE_MANY [{"_id":"ok""#) {
            Reply::line("OK")
        } else if line.starts_with("INSERT_OR_UPDATE_MANY ") {
            Reply::line("ERR")
        } else {
            Reply::line("ERR Unknown command")
        }
    })
    .await;
    let client = client_for(&server);

    client
        .insert("alice", serde_json::json!({"name": "Alice"}))
        .await
        .unwrap();
    assert_eq!(
        client.get("alice").await.unwrap(),
        Some(serde_json::json!({"name": "Alice"}))
    );
    assert_eq!(client.get("missing").await.unwrap(), None);
    client.delete("alice").await.unwrap();
    assert_eq!(client.list().await.unwrap().len(), 2);

    let err = client.delete_many(&["a".to_string()]).await.unwrap_err();
    assert!(matches!(err, DriverError::ServerError(msg) if msg == "Unknown command"));

    let documents = client
        .query(&Filter::new("price", Operator::Gt, "100"))
        .await
        .unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["price"], 150);

    let reply = client
        .insert_or_update_many(&[Record::new("ok").with_field("n", 1)])
        .await
        .unwrap();
    assert_eq!(reply, "OK");
    let err = client
        .insert_or_update_many(&[Record::new("bad").with_field("n", 2)])
        .await
        .unwrap_err();
    assert!(matches!(err, DriverError::ServerError(msg) if msg.is_empty()));

    let requests = server.requests();
    assert_eq!(requests[0], r#"INSERT alice {"name":"Alice"}"#.to_string());
    assert_eq!(requests[6], "QUERY price > 100");
    assert_eq!(requests[7], r#"INSERT_OR_UPDATE_MANY [{"_id":"ok","n":1}]"#);
}
