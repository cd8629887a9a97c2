// tests/integration/isolation_test.rs

//! Fault isolation between concurrently open sessions.

use super::test_helpers::{TestServer, connect, wait_for_sessions};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn test_breaking_one_session_leaves_others_untouched() {
    let server = TestServer::start().await;

    let mut client_a = connect(&server).await;
    let mut client_b = connect(&server).await;
    wait_for_sessions(&server, 2).await;

    client_a.send(Message::text("from a")).await.unwrap();
    let reply = client_a.next().await.unwrap().unwrap();
    assert_eq!(reply.into_text().unwrap().as_str(), "from a");

    // Hard-drop A without a close handshake.
    drop(client_a);

    // B keeps working across A's teardown.
    client_b.send(Message::text("still here")).await.unwrap();
    let reply = client_b.next().await.unwrap().unwrap();
    assert_eq!(reply.into_text().unwrap().as_str(), "still here");

    // Only A's session was unregistered.
    wait_for_sessions(&server, 1).await;
    client_b.send(Message::text("and again")).await.unwrap();
    let reply = client_b.next().await.unwrap().unwrap();
    assert_eq!(reply.into_text().unwrap().as_str(), "and again");

    server.stop().await;
}

#[tokio::test]
async fn test_sessions_only_see_their_own_echoes() {
    let server = TestServer::start().await;

    let mut client_a = connect(&server).await;
    let mut client_b = connect(&server).await;
    wait_for_sessions(&server, 2).await;

    client_a.send(Message::text("for a only")).await.unwrap();
    let reply = client_a.next().await.unwrap().unwrap();
    assert_eq!(reply.into_text().unwrap().as_str(), "for a only");

    // No fan-out: B's next frame is its own echo, not A's message.
    client_b.send(Message::text("for b only")).await.unwrap();
    let reply = client_b.next().await.unwrap().unwrap();
    assert_eq!(reply.into_text().unwrap().as_str(), "for b only");

    server.stop().await;
}

#[tokio::test]
async fn test_clean_close_unregisters_the_session() {
    let server = TestServer::start().await;
    let mut client = connect(&server).await;
    wait_for_sessions(&server, 1).await;

    client.close(None).await.unwrap();
    wait_for_sessions(&server, 0).await;

    server.stop().await;
}
