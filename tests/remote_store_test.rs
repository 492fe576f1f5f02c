//! Remote Store Client Integration Tests
//!
//! Drives `RemoteDirectory` against an in-process WebSocket server speaking
//! the store wire protocol.

use futures::{SinkExt, StreamExt};
use parley::domain::shared::value_objects::UserId;
use parley::domain::shared::DomainError;
use parley::domain::user::{IdentityRecord, UserDirectory};
use parley::infrastructure::store::protocol::{ClientRequest, ServerMessage};
use parley::infrastructure::store::RemoteDirectory;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_test::assert_ok;
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn test_upsert_subscribe_and_snapshot_delivery() {
    let (url, server) = spawn_store_server().await;
    let store = RemoteDirectory::connect(&url).await.expect("connect failed");

    assert_ok!(store.upsert(&record("alice")).await);

    let mut subscription = store.subscribe_all().await.expect("subscribe failed");

    // Subscribing delivers the current snapshot immediately.
    let initial = recv_snapshot(&mut subscription.snapshots).await;
    assert_eq!(initial, vec![json!({ "id": "alice", "name": "alice" })]);

    // Every later mutation pushes a fresh full snapshot.
    store.upsert(&record("bob")).await.expect("upsert failed");
    let updated = recv_snapshot(&mut subscription.snapshots).await;
    assert_eq!(updated.len(), 2);

    store
        .unsubscribe(subscription.id)
        .await
        .expect("unsubscribe failed");
    assert!(subscription.snapshots.recv().await.is_none());

    server.abort();
}

#[tokio::test]
async fn test_server_error_becomes_store_rejected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let url = format!("ws://{}", listener.local_addr().expect("no addr"));

    // A server that rejects every request.
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake failed");
        while let Some(Ok(Message::Text(text))) = ws.next().await {
            let request: ClientRequest = serde_json::from_str(&text).expect("bad frame");
            let seq = match request {
                ClientRequest::Upsert { seq, .. }
                | ClientRequest::Subscribe { seq, .. }
                | ClientRequest::Unsubscribe { seq, .. } => seq,
            };
            let reply = ServerMessage::Error {
                seq,
                message: "users collection is read-only".to_string(),
            };
            ws.send(Message::Text(serde_json::to_string(&reply).expect("encode")))
                .await
                .expect("send failed");
        }
    });

    let store = RemoteDirectory::connect(&url).await.expect("connect failed");
    let err = store.upsert(&record("alice")).await.unwrap_err();
    assert!(matches!(err, DomainError::StoreRejected(_)));

    server.abort();
}

#[tokio::test]
async fn test_connection_loss_fails_in_flight_requests() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let url = format!("ws://{}", listener.local_addr().expect("no addr"));

    // A server that hangs up after the handshake without answering.
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake failed");
        let _ = ws.next().await; // read the request, then drop the socket
    });

    let store = RemoteDirectory::connect(&url).await.expect("connect failed");
    let result = tokio::time::timeout(Duration::from_secs(1), store.upsert(&record("alice")))
        .await
        .expect("upsert never resolved");
    assert!(matches!(result, Err(DomainError::StoreUnavailable(_))));

    server.abort();
}

fn record(id: &str) -> IdentityRecord {
    IdentityRecord::register(UserId::new(id).expect("bad test id"))
}

async fn recv_snapshot(
    snapshots: &mut tokio::sync::mpsc::UnboundedReceiver<
        parley::domain::user::DirectorySnapshot,
    >,
) -> Vec<serde_json::Value> {
    tokio::time::timeout(Duration::from_secs(1), snapshots.recv())
        .await
        .expect("timed out waiting for snapshot")
        .expect("snapshot stream ended")
        .documents
}

/// One-connection store server: keyed document map, snapshot fan-out to
/// every open subscription over the single socket.
async fn spawn_store_server() -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let url = format!("ws://{}", listener.local_addr().expect("no addr"));

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake failed");

        let mut documents: BTreeMap<String, serde_json::Value> = BTreeMap::new();
        let mut subscriptions: Vec<String> = Vec::new();

        while let Some(Ok(message)) = ws.next().await {
            let Message::Text(text) = message else {
                continue;
            };
            let request: ClientRequest = serde_json::from_str(&text).expect("bad frame");

            match request {
                ClientRequest::Upsert {
                    seq, key, document, ..
                } => {
                    documents.insert(key, document);
                    send(&mut ws, &ServerMessage::Ack { seq, sub: None }).await;
                    let docs: Vec<_> = documents.values().cloned().collect();
                    for sub in &subscriptions {
                        send(
                            &mut ws,
                            &ServerMessage::Snapshot {
                                sub: sub.clone(),
                                documents: docs.clone(),
                            },
                        )
                        .await;
                    }
                }
                ClientRequest::Subscribe { seq, .. } => {
                    let sub = uuid::Uuid::new_v4().to_string();
                    subscriptions.push(sub.clone());
                    send(
                        &mut ws,
                        &ServerMessage::Ack {
                            seq,
                            sub: Some(sub.clone()),
                        },
                    )
                    .await;
                    send(
                        &mut ws,
                        &ServerMessage::Snapshot {
                            sub,
                            documents: documents.values().cloned().collect(),
                        },
                    )
                    .await;
                }
                ClientRequest::Unsubscribe { seq, sub } => {
                    subscriptions.retain(|s| s != &sub);
                    send(&mut ws, &ServerMessage::Ack { seq, sub: None }).await;
                }
            }
        }
    });

    (url, handle)
}

async fn send<S>(ws: &mut tokio_tungstenite::WebSocketStream<S>, message: &ServerMessage)
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    ws.send(Message::Text(
        serde_json::to_string(message).expect("encode failed"),
    ))
    .await
    .expect("send failed");
}
