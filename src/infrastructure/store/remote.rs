//! Remote document store client
//!
//! One WebSocket connection to the fixed store endpoint, owned by a single
//! I/O task. Directory calls travel to the task over a command channel and
//! get their answers back over oneshots; push snapshots are routed to the
//! matching subscription stream. Connection loss fails in-flight requests
//! with `StoreUnavailable` and ends open streams - nothing reconnects.

use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::SubscriptionId;
use crate::domain::user::{DirectorySnapshot, DirectorySubscription, IdentityRecord, UserDirectory};
use crate::infrastructure::store::protocol::{ClientRequest, ServerMessage, USERS_COLLECTION};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct RemoteDirectory {
    commands: mpsc::Sender<Command>,
}

enum Command {
    Upsert {
        key: String,
        document: serde_json::Value,
        reply: oneshot::Sender<Result<()>>,
    },
    Subscribe {
        reply: oneshot::Sender<Result<DirectorySubscription>>,
    },
    Unsubscribe {
        sub: SubscriptionId,
        reply: oneshot::Sender<Result<()>>,
    },
}

enum PendingReply {
    Ack(oneshot::Sender<Result<()>>),
    Subscribe(oneshot::Sender<Result<DirectorySubscription>>),
}

impl PendingReply {
    fn fail(self, error: DomainError) {
        match self {
            PendingReply::Ack(reply) => {
                let _ = reply.send(Err(error));
            }
            PendingReply::Subscribe(reply) => {
                let _ = reply.send(Err(error));
            }
        }
    }
}

impl RemoteDirectory {
    /// Connect to the pre-provisioned store endpoint (`ws://` or `wss://`)
    pub async fn connect(url: &str) -> Result<Self> {
        let (socket, _) = connect_async(url).await.map_err(|e| {
            DomainError::StoreUnavailable(format!("connect to {}: {}", url, e))
        })?;
        info!(url, "connected to remote store");

        let (commands, command_rx) = mpsc::channel(32);
        tokio::spawn(io_task(socket, command_rx));
        Ok(Self { commands })
    }

    async fn send_command<T>(
        &self,
        command: Command,
        rx: oneshot::Receiver<Result<T>>,
    ) -> Result<T> {
        self.commands.send(command).await.map_err(|_| {
            DomainError::StoreUnavailable("store connection closed".to_string())
        })?;
        rx.await
            .map_err(|_| DomainError::StoreUnavailable("store connection closed".to_string()))?
    }
}

#[async_trait]
impl UserDirectory for RemoteDirectory {
    async fn upsert(&self, record: &IdentityRecord) -> Result<()> {
        let document = record.to_document()?;
        let (reply, rx) = oneshot::channel();
        self.send_command(
            Command::Upsert {
                key: record.id.to_string(),
                document,
                reply,
            },
            rx,
        )
        .await
    }

    async fn subscribe_all(&self) -> Result<DirectorySubscription> {
        let (reply, rx) = oneshot::channel();
        self.send_command(Command::Subscribe { reply }, rx).await
    }

    async fn unsubscribe(&self, sub: SubscriptionId) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send_command(Command::Unsubscribe { sub, reply }, rx)
            .await
    }
}

async fn io_task(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut commands: mpsc::Receiver<Command>,
) {
    let (mut sink, mut stream) = socket.split();
    let mut next_seq: u64 = 0;
    let mut pending: HashMap<u64, PendingReply> = HashMap::new();
    let mut subscriptions: HashMap<String, mpsc::UnboundedSender<DirectorySnapshot>> =
        HashMap::new();

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    // All directory handles dropped.
                    break;
                };
                next_seq += 1;
                let seq = next_seq;

                let (frame, entry) = match command {
                    Command::Upsert { key, document, reply } => (
                        ClientRequest::Upsert {
                            seq,
                            collection: USERS_COLLECTION.to_string(),
                            key,
                            document,
                        },
                        PendingReply::Ack(reply),
                    ),
                    Command::Subscribe { reply } => (
                        ClientRequest::Subscribe {
                            seq,
                            collection: USERS_COLLECTION.to_string(),
                        },
                        PendingReply::Subscribe(reply),
                    ),
                    Command::Unsubscribe { sub, reply } => {
                        // Dropping the sender ends the snapshot stream right
                        // away; the ack only settles the caller's Result.
                        subscriptions.remove(&sub.to_string());
                        (
                            ClientRequest::Unsubscribe {
                                seq,
                                sub: sub.to_string(),
                            },
                            PendingReply::Ack(reply),
                        )
                    }
                };

                let text = match serde_json::to_string(&frame) {
                    Ok(text) => text,
                    Err(e) => {
                        entry.fail(DomainError::StoreRejected(format!("encode request: {}", e)));
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(text)).await {
                    entry.fail(DomainError::StoreUnavailable(format!(
                        "store connection lost: {}",
                        e
                    )));
                    break;
                }
                pending.insert(seq, entry);
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        handle_server_message(&text, &mut pending, &mut subscriptions);
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("remote store closed the connection");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "remote store socket error");
                        break;
                    }
                }
            }
        }
    }

    for (_, entry) in pending.drain() {
        entry.fail(DomainError::StoreUnavailable(
            "store connection closed".to_string(),
        ));
    }
    // Dropping the senders ends every open snapshot stream.
    subscriptions.clear();
    debug!("remote store io task finished");
}

fn handle_server_message(
    text: &str,
    pending: &mut HashMap<u64, PendingReply>,
    subscriptions: &mut HashMap<String, mpsc::UnboundedSender<DirectorySnapshot>>,
) {
    let message: ServerMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "malformed frame from remote store");
            return;
        }
    };

    match message {
        ServerMessage::Ack { seq, sub } => match pending.remove(&seq) {
            Some(PendingReply::Ack(reply)) => {
                let _ = reply.send(Ok(()));
            }
            Some(PendingReply::Subscribe(reply)) => {
                let result = match sub.as_deref().and_then(|s| Uuid::parse_str(s).ok()) {
                    Some(uuid) => {
                        let id = SubscriptionId::from_uuid(uuid);
                        let (tx, rx) = mpsc::unbounded_channel();
                        subscriptions.insert(uuid.to_string(), tx);
                        debug!(subscription = %id, "remote subscription opened");
                        Ok(DirectorySubscription { id, snapshots: rx })
                    }
                    None => Err(DomainError::StoreRejected(
                        "subscribe ack carried no subscription id".to_string(),
                    )),
                };
                let _ = reply.send(result);
            }
            None => warn!(seq, "ack for unknown request"),
        },
        ServerMessage::Error { seq, message } => match pending.remove(&seq) {
            Some(entry) => entry.fail(DomainError::StoreRejected(message)),
            None => warn!(seq, "error for unknown request"),
        },
        ServerMessage::Snapshot { sub, documents } => {
            let snapshot = DirectorySnapshot::new(documents);
            let receiver_gone = match subscriptions.get(&sub) {
                Some(tx) => tx.send(snapshot).is_err(),
                None => {
                    debug!(sub = %sub, "snapshot for unknown subscription");
                    false
                }
            };
            if receiver_gone {
                subscriptions.remove(&sub);
            }
        }
    }
}
