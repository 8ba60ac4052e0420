//! WebSocket handler for live play.
//!
//! Frames are pushed to the client as they are revealed, so the client sees
//! the same paced animation a chat user would. The socket belongs to one
//! account, taken from the path.
//!
//! # Connection Flow
//!
//! 1. Client connects via `GET /ws/{account_id}`
//! 2. Server spawns a send task draining an outbound channel into the socket
//! 3. Each client message becomes an intent; frames, texts and the final
//!    reply are queued on the channel as they happen
//! 4. On disconnect the send task stops; a reveal still in progress is
//!    cancelled, but its wager stays settled
//!
//! # Client Messages
//!
//! ```json
//! {"type": "start", "label": "alice"}
//! {"type": "play_slots"}
//! {"type": "play_roulette"}
//! {"type": "balance"}
//! ```
//!
//! # Server Messages
//!
//! ```json
//! {"type": "frame", "text": "🎰 Spinning...\n🍒 | 🔔 | 🍋", "final": false}
//! {"type": "message", "text": "🎉 You won 20 credits!\n..."}
//! {"type": "reply", "reply": {...}, "actions": [...]}
//! {"type": "error", "message": "Invalid message format"}
//! ```

use async_trait::async_trait;
use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use credit_casino::{
    Intent, Reply,
    ledger::AccountId,
    reveal::{Frame, PresentationError, Presenter},
};
use futures_util::{SinkExt, StreamExt};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::{ActionItem, AppState, menu};
use crate::{logging, metrics};

/// Outbound messages buffered per connection
const OUTBOUND_BUFFER: usize = 32;

/// Client messages received via WebSocket
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Start { label: Option<String> },
    PlaySlots,
    PlayRoulette,
    Balance,
}

impl ClientMessage {
    fn into_intent(self, account_id: AccountId) -> Intent {
        match self {
            ClientMessage::Start { label } => Intent::Start {
                account_id,
                label: label.unwrap_or_else(|| format!("ws_{account_id}")),
            },
            ClientMessage::PlaySlots => Intent::PlaySlots { account_id },
            ClientMessage::PlayRoulette => Intent::PlayRoulette { account_id },
            ClientMessage::Balance => Intent::QueryBalance { account_id },
        }
    }
}

/// Messages sent to the client
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage<'a> {
    Frame {
        text: String,
        #[serde(rename = "final")]
        is_final: bool,
    },
    Message {
        text: &'a str,
    },
    Reply {
        reply: &'a Reply,
        actions: Vec<ActionItem>,
    },
    Error {
        message: &'a str,
    },
}

/// Presenter that queues everything on the connection's outbound channel
struct SocketPresenter {
    outbound: mpsc::Sender<String>,
}

impl SocketPresenter {
    async fn push(&self, message: &ServerMessage<'_>) -> Result<(), PresentationError> {
        let json = serde_json::to_string(message)
            .map_err(|e| PresentationError::Delivery(e.to_string()))?;
        self.outbound
            .send(json)
            .await
            .map_err(|_| PresentationError::ChannelClosed)
    }
}

#[async_trait]
impl Presenter for SocketPresenter {
    async fn show_frame(&mut self, frame: &Frame) -> Result<(), PresentationError> {
        self.push(&ServerMessage::Frame {
            text: frame.render(),
            is_final: frame.is_final(),
        })
        .await
    }

    async fn send_text(&mut self, text: &str) -> Result<(), PresentationError> {
        self.push(&ServerMessage::Message { text }).await
    }
}

/// Upgrade HTTP connection to a WebSocket session for one account.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(account_id): Path<AccountId>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, account_id, state))
}

/// Handle an established WebSocket connection.
///
/// Intents are processed one at a time in arrival order.
async fn handle_socket(socket: WebSocket, account_id: AccountId, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    info!("WebSocket connected: account={}", account_id);
    metrics::websocket_connections_total();

    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(OUTBOUND_BUFFER);

    // Dropping the receiver on a failed write closes the presenter's channel
    let send_task = tokio::spawn(async move {
        while let Some(json) = outbound_rx.recv().await {
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut presenter = SocketPresenter {
        outbound: outbound_tx,
    };

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let client_msg = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => client_msg,
                    Err(e) => {
                        warn!("Failed to parse client message: {}", e);
                        let error = ServerMessage::Error {
                            message: "Invalid message format",
                        };
                        if presenter.push(&error).await.is_err() {
                            break;
                        }
                        continue;
                    }
                };

                let intent = client_msg.into_intent(account_id);
                let is_play = matches!(
                    intent,
                    Intent::PlaySlots { .. } | Intent::PlayRoulette { .. }
                );

                let reply = state.orchestrator.handle(intent, &mut presenter).await;

                if is_play {
                    logging::log_wager("ws", &reply);
                    metrics::record_wager(&reply);
                }

                let message = ServerMessage::Reply {
                    reply: &reply,
                    actions: menu(state.orchestrator.config()),
                };
                if presenter.push(&message).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                info!("WebSocket closed: account={}", account_id);
                break;
            }
            Err(e) => {
                warn!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    drop(presenter);
    // Let queued messages drain unless the socket is already gone
    if let Err(e) = send_task.await {
        warn!("WebSocket send task failed: {}", e);
    }

    info!("WebSocket disconnected: account={}", account_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_messages_parse() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"play_slots"}"#).unwrap();
        assert_eq!(msg.into_intent(4), Intent::PlaySlots { account_id: 4 });

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"start"}"#).unwrap();
        assert_eq!(
            msg.into_intent(4),
            Intent::Start {
                account_id: 4,
                label: "ws_4".to_string()
            }
        );

        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"poker"}"#).is_err());
    }

    #[test]
    fn test_frame_message_shape() {
        let json = serde_json::to_value(ServerMessage::Frame {
            text: "🎲 🟢 0".to_string(),
            is_final: true,
        })
        .unwrap();
        assert_eq!(json["type"], "frame");
        assert_eq!(json["final"], true);
    }

    #[tokio::test]
    async fn test_presenter_fails_once_socket_side_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        let mut presenter = SocketPresenter { outbound: tx };
        drop(rx);

        let err = presenter.send_text("hello").await.unwrap_err();
        assert_eq!(err, PresentationError::ChannelClosed);
    }
}
