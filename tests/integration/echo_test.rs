// tests/integration/echo_test.rs

//! End-to-end coverage of the echo contract.

use super::test_helpers::{TestServer, connect, wait_for_sessions};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn test_echoes_message_verbatim() {
    let server = TestServer::start().await;
    let mut client = connect(&server).await;

    client.send(Message::text("hello world")).await.unwrap();
    let reply = client.next().await.unwrap().unwrap();
    assert_eq!(reply.into_text().unwrap().as_str(), "hello world");

    server.stop().await;
}

#[tokio::test]
async fn test_echoes_in_arrival_order() {
    let server = TestServer::start().await;
    let mut client = connect(&server).await;

    let messages = ["first", "second", "third", "fourth", "fifth"];
    for message in messages {
        client.send(Message::text(message)).await.unwrap();
    }
    for message in messages {
        let reply = client.next().await.unwrap().unwrap();
        assert_eq!(reply.into_text().unwrap().as_str(), message);
    }

    server.stop().await;
}

#[tokio::test]
async fn test_command_frames_are_echoed_not_answered() {
    let server = TestServer::start().await;
    let mut client = connect(&server).await;
    wait_for_sessions(&server, 1).await;

    // A remove against the (empty) shared list is a no-op, and the frame
    // still comes back verbatim with nothing else on the wire before it.
    client.send(Message::text("remove milk")).await.unwrap();
    let reply = client.next().await.unwrap().unwrap();
    assert_eq!(reply.into_text().unwrap().as_str(), "remove milk");
    assert!(server.state.todo_list.is_empty());
    assert_eq!(server.state.stats.get_total_messages(), 1);

    server.stop().await;
}

#[tokio::test]
async fn test_echoes_payload_spaces_unmodified() {
    let server = TestServer::start().await;
    let mut client = connect(&server).await;

    // The parser collapses payload spaces internally, but the echo carries
    // the original bytes.
    client.send(Message::text("remove milk eggs")).await.unwrap();
    let reply = client.next().await.unwrap().unwrap();
    assert_eq!(reply.into_text().unwrap().as_str(), "remove milk eggs");

    server.stop().await;
}

#[tokio::test]
async fn test_echoes_binary_frames_unchanged() {
    let server = TestServer::start().await;
    let mut client = connect(&server).await;

    let payload: Vec<u8> = vec![0x00, 0xFF, 0x7F, 0x80];
    client
        .send(Message::Binary(payload.clone().into()))
        .await
        .unwrap();
    let reply = client.next().await.unwrap().unwrap();
    match reply {
        Message::Binary(echoed) => assert_eq!(echoed.as_ref(), payload.as_slice()),
        other => panic!("expected a binary echo, got {other:?}"),
    }

    server.stop().await;
}
