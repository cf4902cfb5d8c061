//! SafiChat realtime server.

mod auth;
mod config;
mod handlers;
mod profiles;
mod protocol;
mod registry;
mod rooms;
mod state;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use config::Config;
use futures::{SinkExt, StreamExt};
use protocol::{ClientEvent, ServerEvent};
use serde::Deserialize;
use state::AppState;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = Arc::new(AppState::new(config.clone()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/channels", get(channels_handler))
        .route("/dm/:user_a/:user_b", get(dm_room_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state.clone());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("SafiChat realtime server started");
    tracing::info!("Address: {}", addr);
    tracing::info!("WebSocket: ws://{}/ws", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn index_handler() -> Html<&'static str> {
    Html("<h1>SafiChat Realtime Server</h1><p>WebSocket endpoint: /ws</p>")
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "server": "safichat-rs",
        "connections": state.registry.connection_count(),
        "rooms": state.rooms.room_count(),
    }))
}

async fn channels_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.config.channels.clone())
}

/// Resolve the room id for a DM between two users, so both clients derive
/// the same route no matter who initiates.
async fn dm_room_handler(Path((user_a, user_b)): Path<(String, String)>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "room": rooms::dm_room_id(&user_a, &user_b) }))
}

#[derive(Debug, Deserialize)]
struct ConnectParams {
    session: Option<String>,
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let identity = match auth::authenticate(
        &state.sessions,
        state.config.auth_timeout_ms,
        params.session.as_deref(),
    )
    .await
    {
        Ok(identity) => identity,
        Err(err) => {
            tracing::warn!(error = %err, "connection refused");
            return (StatusCode::UNAUTHORIZED, err.to_string()).into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, identity))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, identity: Option<String>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let conn_id = handlers::handle_connection(state.clone(), tx, identity).await;

    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&event) {
                if ws_sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => dispatch_event(&state, &conn_id, event).await,
                Err(err) => {
                    tracing::debug!(conn_id = %conn_id, error = %err, "dropped malformed event");
                }
            },
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => {}
        }
    }

    handlers::handle_disconnect(state, &conn_id).await;
    send_task.abort();
}

async fn dispatch_event(state: &Arc<AppState>, conn_id: &str, event: ClientEvent) {
    match event {
        ClientEvent::Join { username, room } => {
            if !state.config.is_allowed_channel(&room) && !rooms::is_dm_room(&room) {
                tracing::warn!(conn_id = %conn_id, room = %room, "join rejected: unknown channel");
                return;
            }
            handlers::handle_join(state.clone(), conn_id, &username, &room).await;
        }
        ClientEvent::Message { room, username, msg } => {
            handlers::handle_chat_message(state.clone(), conn_id, &room, &username, &msg).await;
        }
        ClientEvent::Signal(signal) => {
            handlers::handle_signal(state.clone(), conn_id, signal).await;
        }
        ClientEvent::Profile(update) => {
            handlers::handle_profile_update(state, update);
        }
    }
}
