//! One WebSocket client: request dispatch and room event forwarding.

use std::collections::BTreeSet;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use battle_core::{ActionKind, Side};
use battle_runtime::{RoomId, RoomManager, Subscriber};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::protocol::{self, ClientMessage, ProtocolViolation, Request, ServerMessage};

/// Serves one client until it disconnects, then leaves every joined room.
pub async fn serve(stream: TcpStream, peer: SocketAddr, manager: RoomManager) -> Result<()> {
    let ws = accept_async(stream)
        .await
        .context("WebSocket handshake failed")?;
    info!(target: "server::connection", %peer, "Client connected");

    let mut session = Session::new(manager);
    let result = session.run(ws, peer).await;
    session.close().await;

    info!(target: "server::connection", %peer, "Client disconnected");
    result
}

struct Session {
    manager: RoomManager,
    subscriber: Subscriber,
    events: tokio::sync::mpsc::UnboundedReceiver<battle_runtime::RoomMessage>,
    joined: BTreeSet<RoomId>,
}

impl Session {
    fn new(manager: RoomManager) -> Self {
        let (subscriber, events) = manager.subscriber();
        Self {
            manager,
            subscriber,
            events,
            joined: BTreeSet::new(),
        }
    }

    async fn run(
        &mut self,
        ws: tokio_tungstenite::WebSocketStream<TcpStream>,
        peer: SocketAddr,
    ) -> Result<()> {
        let (mut write, mut read) = ws.split();

        loop {
            tokio::select! {
                frame = read.next() => {
                    let text = match frame {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Binary(_))) => {
                            let reply = ServerMessage::protocol(ProtocolViolation {
                                request_id: None,
                                message: "binary frames are not supported".to_owned(),
                            });
                            write.send(Message::Text(reply.to_json()?)).await?;
                            continue;
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Ok(_)) => continue,
                        Some(Err(err)) => {
                            debug!(target: "server::connection", %peer, %err, "Read failed");
                            break;
                        }
                    };
                    let reply = self.dispatch(&text).await;
                    write.send(Message::Text(reply.to_json()?)).await?;
                }
                Some(message) = self.events.recv() => {
                    let frame = ServerMessage::from(message).to_json()?;
                    write.send(Message::Text(frame)).await?;
                }
            }
        }

        Ok(())
    }

    /// Handles one request and builds its acknowledgement.
    async fn dispatch(&mut self, text: &str) -> ServerMessage {
        let Request {
            request_id,
            message,
        } = match protocol::decode(text) {
            Ok(request) => request,
            Err(violation) => {
                warn!(
                    target: "server::connection",
                    request_id = ?violation.request_id,
                    reason = %violation.message,
                    "Malformed frame"
                );
                return ServerMessage::protocol(violation);
            }
        };
        debug!(
            target: "server::connection",
            event = message.name(),
            room = %message.room_id(),
            ?request_id,
            "Request"
        );

        let result = match message {
            ClientMessage::Join { room_id } => {
                self.manager.join(&room_id, self.subscriber.clone()).await;
                self.joined.insert(room_id);
                Ok(ServerMessage::accepted(request_id))
            }
            ClientMessage::Start { room_id, request } => self
                .manager
                .start(&room_id, request)
                .await
                .map(|receipt| ServerMessage::started(request_id, receipt)),
            ClientMessage::Action {
                room_id,
                side,
                action,
            } => self
                .submit(&room_id, &side, &action)
                .await
                .map(|()| ServerMessage::accepted(request_id)),
            ClientMessage::Stop { room_id } => self
                .manager
                .stop(&room_id)
                .await
                .map(|()| ServerMessage::accepted(request_id)),
            ClientMessage::Leave { room_id } => {
                self.joined.remove(&room_id);
                self.manager
                    .leave(&room_id, self.subscriber.id())
                    .await
                    .map(|_| ServerMessage::accepted(request_id))
            }
        };

        result.unwrap_or_else(|error| {
            debug!(
                target: "server::connection",
                ?request_id,
                class = ?error.class(),
                reason = error.kind(),
                %error,
                "Request rejected"
            );
            ServerMessage::rejected(request_id, &error)
        })
    }

    async fn submit(&self, room_id: &RoomId, side: &str, action: &str) -> battle_runtime::Result<()> {
        let side: Side = side.parse()?;
        let action = ActionKind::parse(action)?;
        self.manager.submit_action(room_id, side, action).await
    }

    async fn close(self) {
        for room_id in &self.joined {
            if let Err(err) = self.manager.leave(room_id, self.subscriber.id()).await {
                debug!(target: "server::connection", room = %room_id, %err, "Leave on disconnect failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tokio::net::TcpListener;
    use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

    type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

    async fn connect() -> (Client, RoomManager) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let manager = RoomManager::default();
        let server_manager = manager.clone();
        tokio::spawn(async move {
            let (stream, peer) = listener.accept().await.unwrap();
            let _ = serve(stream, peer, server_manager).await;
        });
        let (client, _) = connect_async(format!("ws://{addr}")).await.unwrap();
        (client, manager)
    }

    async fn send(client: &mut Client, frame: Value) {
        client
            .send(Message::Text(frame.to_string()))
            .await
            .unwrap();
    }

    async fn recv(client: &mut Client) -> Value {
        loop {
            match client.next().await.unwrap().unwrap() {
                Message::Text(text) => return serde_json::from_str(&text).unwrap(),
                _ => continue,
            }
        }
    }

    #[tokio::test]
    async fn join_start_and_act_over_websocket() {
        let (mut client, _manager) = connect().await;

        send(&mut client, json!({"event": "join", "requestId": 1, "roomId": "r"})).await;
        assert_eq!(
            recv(&mut client).await,
            json!({"event": "ack", "requestId": 1, "ok": true})
        );
        assert_eq!(
            recv(&mut client).await,
            json!({"event": "state", "roomId": "r", "state": null})
        );

        send(
            &mut client,
            json!({
                "event": "start",
                "requestId": 2,
                "roomId": "r",
                "players": {"sideA": {"name": "Personal"}, "sideB": {"name": "Player 456"}},
                "config": {
                    "controllers": {"sideA": "human", "sideB": "automated"},
                    "turnDelayMs": 60000,
                    "seed": 5
                }
            }),
        )
        .await;
        let ack = recv(&mut client).await;
        assert_eq!(ack["ok"], true);
        assert_eq!(ack["seed"], 5);
        assert_eq!(ack["restarted"], false);
        let initial = recv(&mut client).await;
        assert_eq!(initial["event"], "state");
        assert_eq!(initial["state"]["turn"], "sideA");

        send(
            &mut client,
            json!({"event": "action", "requestId": 3, "roomId": "r", "side": "sideC", "action": "ATTACK"}),
        )
        .await;
        let rejected = recv(&mut client).await;
        assert_eq!(rejected["ok"], false);
        assert_eq!(rejected["reason"], "unknown_side");

        send(
            &mut client,
            json!({"event": "action", "requestId": 4, "roomId": "r", "side": "sideA", "action": "rest"}),
        )
        .await;
        assert_eq!(recv(&mut client).await["ok"], true);
        let log = recv(&mut client).await;
        assert_eq!(log["event"], "log");
        assert_eq!(log["entry"]["action"], "REST");
        let state = recv(&mut client).await;
        assert_eq!(state["state"]["turn"], "sideB");
        assert_eq!(state["state"]["logLen"], 1);

        send(&mut client, json!({"event": "stop", "requestId": 5, "roomId": "r"})).await;
        assert_eq!(recv(&mut client).await["ok"], true);
        assert_eq!(recv(&mut client).await["state"], Value::Null);
    }

    #[tokio::test]
    async fn malformed_and_unknown_requests_are_acked() {
        let (mut client, manager) = connect().await;

        send(&mut client, json!({"event": "start", "requestId": 7, "roomId": "r"})).await;
        let ack = recv(&mut client).await;
        assert_eq!(ack["requestId"], 7);
        assert_eq!(ack["reason"], "protocol");

        send(
            &mut client,
            json!({"event": "stop", "requestId": 8, "roomId": "nowhere"}),
        )
        .await;
        let ack = recv(&mut client).await;
        assert_eq!(ack["ok"], false);
        assert_eq!(ack["reason"], "unknown_room");

        client.send(Message::Text("not json".into())).await.unwrap();
        let ack = recv(&mut client).await;
        assert_eq!(ack["requestId"], Value::Null);
        assert_eq!(ack["reason"], "protocol");

        assert!(manager.room_ids().await.is_empty());
    }
}
