use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio_stream::{
    wrappers::{BroadcastStream, WatchStream},
    Stream, StreamExt,
};

use crate::{
    geo::Coordinate,
    session::{Frame, SessionError, SessionHandle},
};

pub struct WebServerConfig {
    pub host: String,
    pub port: u16,
}

struct AppState {
    session: SessionHandle,
}

struct ApiError(SessionError);

impl From<SessionError> for ApiError {
    fn from(value: SessionError) -> Self {
        ApiError(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::SERVICE_UNAVAILABLE, self.0.to_string()).into_response()
    }
}

type Accepted = Result<StatusCode, ApiError>;

pub fn router(session: SessionHandle) -> Router {
    let state = Arc::new(AppState { session });
    Router::new()
        .route("/api/state", get(latest_state))
        .route("/api/events", get(stream_frames))
        .route("/api/camera", get(stream_camera))
        .route("/api/game/start", post(start_game))
        .route("/api/game/pause", post(pause_game))
        .route("/api/game/reset", post(reset_game))
        .route("/api/camera/gesture", post(camera_gesture))
        .route("/api/camera/recenter", post(camera_recenter))
        .route("/api/location", post(location_update))
        .with_state(state)
}

pub async fn serve(session: SessionHandle, config: WebServerConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "monster radar API listening (Ctrl+C to stop)");

    axum::serve(listener, router(session))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down web API");
}

async fn latest_state(State(state): State<Arc<AppState>>) -> Json<Frame> {
    Json(state.session.latest_frame())
}

async fn stream_frames(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = WatchStream::new(state.session.frames()).filter_map(|frame| {
        serde_json::to_string(&frame)
            .ok()
            .map(|payload| Ok(Event::default().data(payload)))
    });
    Sse::new(stream).keep_alive(keep_alive())
}

async fn stream_camera(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.session.camera_commands()).filter_map(|msg| {
        msg.ok()
            .and_then(|command| serde_json::to_string(&command).ok())
            .map(|payload| Ok(Event::default().data(payload)))
    });
    Sse::new(stream).keep_alive(keep_alive())
}

fn keep_alive() -> KeepAlive {
    KeepAlive::new()
        .interval(Duration::from_secs(2))
        .text("keep-alive")
}

async fn start_game(State(state): State<Arc<AppState>>) -> Accepted {
    state.session.start_game()?;
    Ok(StatusCode::ACCEPTED)
}

async fn pause_game(State(state): State<Arc<AppState>>) -> Accepted {
    state.session.pause_game()?;
    Ok(StatusCode::ACCEPTED)
}

async fn reset_game(State(state): State<Arc<AppState>>) -> Accepted {
    state.session.reset_game()?;
    Ok(StatusCode::ACCEPTED)
}

async fn camera_gesture(State(state): State<Arc<AppState>>) -> Accepted {
    state.session.on_user_camera_gesture()?;
    Ok(StatusCode::ACCEPTED)
}

async fn camera_recenter(State(state): State<Arc<AppState>>) -> Accepted {
    state.session.on_recenter_requested()?;
    Ok(StatusCode::ACCEPTED)
}

async fn location_update(
    State(state): State<Arc<AppState>>,
    Json(location): Json<Coordinate>,
) -> Accepted {
    state.session.on_location_update(location)?;
    Ok(StatusCode::ACCEPTED)
}
