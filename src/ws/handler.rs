use std::sync::Arc;

use axum::{
    extract::{State, ws::{Message, WebSocket, WebSocketUpgrade}},
    response::Response,
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::models::{ClientMessage, PongMessage, SendMessage};
use super::registry::OUTBOUND_QUEUE;
use super::relay;

/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    app_state: State<Arc<AppState>>,
) -> Response {
    info!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, app_state.0))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {

    // Split the socket into sender and receiver
    let (mut sender, mut receiver) = socket.split();

    // Bounded outbound queue; the relay and the pong path both feed it, so
    // frames reach the client in the order they were queued.
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(OUTBOUND_QUEUE);
    let reply_tx = outbound_tx.clone();

    let registry = app_state.registry.clone();
    let connection_id = registry.admit(outbound_tx).await;
    info!("WebSocket connection established with connection_id: {}", connection_id);

    // Pump queued frames out to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if sender.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
    });

    // Listen for incoming messages. Only text frames match the pattern;
    // binary frames, transport errors, and stream end all fall out of it.
    let recv_registry = registry.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(Message::Text(frame))) = receiver.next().await {

            // Parse the incoming frame as JSON
            let msg: ClientMessage = match serde_json::from_str(&frame) {
                Ok(msg) => msg,
                Err(e) => {
                    error!("Failed to parse message from connection {}: {}", connection_id, e);
                    continue;
                }
            };

            // Handle different message types
            match msg {
                ClientMessage::Join(join) => {
                    recv_registry.join(connection_id, &join.user_id).await;
                }
                ClientMessage::Ping => {
                    handle_ping(connection_id, &reply_tx).await;
                }
                ClientMessage::TabCreate(_)
                | ClientMessage::TabUpdate(_)
                | ClientMessage::TabDelete(_)
                | ClientMessage::ContentUpdate(_)
                | ClientMessage::TabsReorder(_) => {
                    // Forward the original frame so the payload reaches the
                    // rest of the group byte-for-byte unchanged.
                    relay::relay(&recv_registry, connection_id, frame).await;
                }
            }
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // The transport is gone either way; the registry entry goes with it.
    registry.remove(connection_id).await;
    info!("WebSocket connection terminated");
}

/// Handle a ping frame - send a pong message back.
async fn handle_ping(connection_id: Uuid, reply_tx: &mpsc::Sender<String>) {
    info!("Ping message received from connection {}", connection_id);

    // Reply with pong
    let pong = SendMessage::Pong(PongMessage { date: Utc::now().to_rfc3339() });
    let pong_msg = serde_json::to_string(&pong).unwrap();
    if reply_tx.send(pong_msg).await.is_err() {
        error!("Failed to queue Pong message for connection {}", connection_id);
    }
}
