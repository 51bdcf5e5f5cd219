//! Axum routes — landing page, health, and the per-page-view WebSocket.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::{Html, IntoResponse},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::{PageSession, SessionEvent, SessionManager};
use crate::registry::SectionKey;
use crate::web::render::render_page;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
}

/// Messages exchanged with the page over WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Client → server: a section's intersection ratio crossed the
    /// observer threshold.
    SectionEntered { key: String, visible_fraction: f64 },
    /// Server → client: the session id and current order (sent on
    /// connect, and again after a broadcast lag).
    OrderSync {
        session_id: Uuid,
        order: Vec<String>,
    },
    /// Server → client: a validated reorder was applied.
    OrderChanged { order: Vec<String> },
}

/// Build the Axum router for the landing page.
pub fn page_routes(sessions: Arc<SessionManager>) -> Router {
    let state = AppState { sessions };

    Router::new()
        .route("/", get(landing_page))
        .route("/health", get(health))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Page ────────────────────────────────────────────────────────────────

async fn landing_page(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.sessions.registry();
    let html = render_page(
        registry,
        &registry.default_order(),
        state.sessions.config().visible_fraction,
    );
    Html(html)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "adaptive-landing"
    }))
}

// ── WebSocket ───────────────────────────────────────────────────────────

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    info!("Page connecting");
    ws.on_upgrade(|socket| handle_socket(socket, state.sessions))
}

/// One WebSocket connection = one page view = one session. The session is
/// opened on upgrade and closed when the socket goes away, which releases
/// its visibility subscriptions and makes any in-flight ranking result a
/// no-op.
async fn handle_socket(mut socket: WebSocket, sessions: Arc<SessionManager>) {
    let session = sessions.open().await;
    info!(session = %session.id(), "Page connected");

    let sync = order_sync(&session).await;
    if let Ok(json) = serde_json::to_string(&sync) {
        if socket.send(Message::Text(json.into())).await.is_err() {
            warn!(session = %session.id(), "Failed to send initial sync");
            sessions.close(session.id()).await;
            return;
        }
    }

    let mut rx = session.subscribe();

    loop {
        tokio::select! {
            // Forward session events to the page
            result = rx.recv() => {
                match result {
                    Ok(SessionEvent::OrderChanged { order }) => {
                        let msg = WsMessage::OrderChanged {
                            order: order.iter().map(|k| k.to_string()).collect(),
                        };
                        if let Ok(json) = serde_json::to_string(&msg) {
                            if socket.send(Message::Text(json.into())).await.is_err() {
                                debug!(session = %session.id(), "Page went away during send");
                                break;
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        warn!(session = %session.id(), missed = n, "Page lagged behind; re-syncing");
                        let sync = order_sync(&session).await;
                        if let Ok(json) = serde_json::to_string(&sync) {
                            if socket.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!(session = %session.id(), "Session event channel closed");
                        break;
                    }
                }
            }

            // Receive visibility reports from the page
            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        handle_page_message(&text, &session).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(session = %session.id(), "Page disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(session = %session.id(), error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    sessions.close(session.id()).await;
}

async fn order_sync(session: &Arc<PageSession>) -> WsMessage {
    WsMessage::OrderSync {
        session_id: session.id(),
        order: session
            .current_order()
            .await
            .iter()
            .map(|k| k.to_string())
            .collect(),
    }
}

async fn handle_page_message(text: &str, session: &Arc<PageSession>) {
    match serde_json::from_str::<WsMessage>(text) {
        Ok(WsMessage::SectionEntered {
            key,
            visible_fraction,
        }) => {
            session
                .report_visibility(SectionKey::from(key), visible_fraction)
                .await;
        }
        Ok(other) => {
            debug!(session = %session.id(), message = ?other, "Unexpected WS message from page");
        }
        Err(e) => {
            debug!(session = %session.id(), error = %e, text = text, "Unrecognized WS message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_messages_round_trip() {
        let msg = WsMessage::SectionEntered {
            key: "benefits".into(),
            visible_fraction: 0.4,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"section_entered\""));

        let parsed: WsMessage = serde_json::from_str(&json).unwrap();
        assert!(matches!(parsed, WsMessage::SectionEntered { .. }));
    }

    #[test]
    fn order_changed_serializes_keys() {
        let msg = WsMessage::OrderChanged {
            order: vec!["contact".into(), "benefits".into()],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"order_changed\""));
        assert!(json.contains("[\"contact\",\"benefits\"]"));
    }
}
