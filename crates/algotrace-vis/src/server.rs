//! Axum web server with WebSocket streaming for trace playback.

use std::net::SocketAddr;
use std::sync::Arc;

use algotrace_engine::{AlgorithmId, AlgorithmInput, Family, Trace};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use crate::playback::PlaybackStatus;
use crate::player::Player;
use crate::view::Frame;

/// Shared application state.
pub struct AppState {
    player: Player,
    algorithm: RwLock<String>,
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Serve `player`, whose trace was generated by `algorithm`.
    pub fn new(player: Player, algorithm: impl Into<String>) -> Self {
        Self {
            state: Arc::new(AppState {
                player,
                algorithm: RwLock::new(algorithm.into()),
            }),
        }
    }

    /// Handle on the served player.
    pub fn player(&self) -> &Player {
        &self.state.player
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/algorithms", get(algorithms_handler))
            .route("/api/frame", get(frame_handler))
            .route("/api/run", post(run_handler))
            .route("/api/playback", get(playback_status_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/reset", post(reset_handler))
            .route("/api/playback/step", post(step_handler))
            .route("/api/playback/scrub", post(scrub_handler))
            .route("/api/playback/speed", post(speed_handler))
            // WebSocket for real-time updates
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the given address.
    pub async fn serve(self, addr: SocketAddr) -> Result<(), std::io::Error> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Visualization server running on http://{}", addr);
        let result = axum::serve(listener, self.router()).await;
        self.state.player.shutdown().await;
        result
    }
}

/// Server status response.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub algorithm: String,
    pub trace_len: usize,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let algorithm = state.algorithm.read().await.clone();
    let status = state.player.status().await;
    Json(StatusResponse {
        status: "ok".into(),
        algorithm,
        trace_len: status.trace_len,
    })
}

/// One selectable algorithm.
#[derive(Debug, Serialize, Deserialize)]
pub struct AlgorithmInfo {
    pub id: AlgorithmId,
    pub family: Family,
    pub implemented: bool,
}

async fn algorithms_handler() -> Json<Vec<AlgorithmInfo>> {
    Json(
        AlgorithmId::ALL
            .into_iter()
            .map(|id| AlgorithmInfo {
                id,
                family: id.family(),
                implemented: id.is_implemented(),
            })
            .collect(),
    )
}

async fn frame_handler(State(state): State<Arc<AppState>>) -> Json<Frame> {
    Json(state.player.frame().await)
}

/// Request to generate and load a new trace.
///
/// With `random_len` set, array-based algorithms get a seeded random sample
/// instead of `input`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunRequest {
    pub algorithm: String,
    #[serde(default)]
    pub input: Option<AlgorithmInput>,
    #[serde(default)]
    pub random_len: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
}

async fn run_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RunRequest>,
) -> Json<PlaybackStatus> {
    Json(run(&state, req).await)
}

async fn run(state: &AppState, req: RunRequest) -> PlaybackStatus {
    let status = match (req.random_len, req.algorithm.parse::<AlgorithmId>()) {
        (Some(len), Ok(id)) => {
            let seed = req.seed.unwrap_or_else(rand::random);
            match id.random_input(len, seed) {
                Ok(input) => state.player.regenerate(&req.algorithm, Some(&input)).await,
                Err(err) => {
                    tracing::warn!(algorithm = %id, error = %err, "random input rejected");
                    state.player.load(Trace::rejected(id.as_str(), &err)).await
                }
            }
        }
        _ => state.player.regenerate(&req.algorithm, req.input.as_ref()).await,
    };
    *state.algorithm.write().await = req.algorithm;
    status
}

async fn playback_status_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.player.status().await)
}

async fn play_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.player.play().await)
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.player.pause().await)
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.player.reset().await)
}

/// Step direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn delta(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

#[derive(Deserialize)]
struct StepRequest {
    direction: Direction,
}

async fn step_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StepRequest>,
) -> Json<PlaybackStatus> {
    Json(state.player.step(req.direction.delta()).await)
}

#[derive(Deserialize)]
struct ScrubRequest {
    index: usize,
}

async fn scrub_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScrubRequest>,
) -> Json<PlaybackStatus> {
    Json(state.player.scrub(req.index).await)
}

#[derive(Deserialize)]
struct SpeedRequest {
    ms: u64,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> Json<PlaybackStatus> {
    Json(state.player.set_speed(req.ms).await)
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn send_json(socket: &mut WebSocket, response: &WsResponse) -> Result<(), axum::Error> {
    match serde_json::to_string(response) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(e) => {
            tracing::warn!("Failed to encode websocket response: {}", e);
            Ok(())
        }
    }
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let mut frames = state.player.subscribe();
    let initial = frames.borrow_and_update().clone();
    if send_json(&mut socket, &WsResponse::Frame(initial)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = frames.borrow_and_update().clone();
                if send_json(&mut socket, &WsResponse::Frame(frame)).await.is_err() {
                    break;
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<WsCommand>(text.as_str()) {
                            Ok(cmd) => {
                                let response = handle_ws_command(&state, cmd).await;
                                if send_json(&mut socket, &response).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => tracing::debug!("Ignoring malformed command: {}", e),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!("WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Commands accepted over the WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsCommand {
    GetFrame,
    GetStatus,
    Play,
    Pause,
    Reset,
    Step { direction: Direction },
    Scrub { index: usize },
    Speed { ms: u64 },
    Run(RunRequest),
}

/// Messages sent over the WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsResponse {
    Frame(Frame),
    Status(PlaybackStatus),
}

async fn handle_ws_command(state: &Arc<AppState>, cmd: WsCommand) -> WsResponse {
    let player = &state.player;
    match cmd {
        WsCommand::GetFrame => WsResponse::Frame(player.frame().await),
        WsCommand::GetStatus => WsResponse::Status(player.status().await),
        WsCommand::Play => WsResponse::Status(player.play().await),
        WsCommand::Pause => WsResponse::Status(player.pause().await),
        WsCommand::Reset => WsResponse::Status(player.reset().await),
        WsCommand::Step { direction } => WsResponse::Status(player.step(direction.delta()).await),
        WsCommand::Scrub { index } => WsResponse::Status(player.scrub(index).await),
        WsCommand::Speed { ms } => WsResponse::Status(player.set_speed(ms).await),
        WsCommand::Run(req) => WsResponse::Status(run(state, req).await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaybackConfig;
    use algotrace_engine::sort::bubble_sort;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn server() -> VisServer {
        let player = Player::new(bubble_sort(&[5, 3, 1]), PlaybackConfig::default());
        VisServer::new(player, "bubble-sort")
    }

    async fn call<T: DeserializeOwned>(router: Router, method: &str, uri: &str, body: &str) -> T {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn router_builds() {
        let _router = server().router();
    }

    #[test]
    fn ws_commands_parse() {
        let cmd: WsCommand = serde_json::from_str(r#"{"type":"scrub","index":3}"#).unwrap();
        assert!(matches!(cmd, WsCommand::Scrub { index: 3 }));

        let cmd: WsCommand =
            serde_json::from_str(r#"{"type":"step","direction":"backward"}"#).unwrap();
        assert!(matches!(cmd, WsCommand::Step { direction: Direction::Backward }));

        let cmd: WsCommand =
            serde_json::from_str(r#"{"type":"run","algorithm":"bfs"}"#).unwrap();
        assert!(matches!(cmd, WsCommand::Run(RunRequest { ref algorithm, .. }) if algorithm == "bfs"));
    }

    #[tokio::test]
    async fn scrub_endpoint_moves_cursor() {
        let server = server();
        let status: PlaybackStatus =
            call(server.router(), "POST", "/api/playback/scrub", r#"{"index":2}"#).await;
        assert_eq!(status.cursor, 2);
        assert!(!status.is_playing);
    }

    #[tokio::test]
    async fn step_endpoint_clamps() {
        let server = server();
        let status: PlaybackStatus = call(
            server.router(),
            "POST",
            "/api/playback/step",
            r#"{"direction":"backward"}"#,
        )
        .await;
        assert_eq!(status.cursor, 0);
    }

    #[tokio::test]
    async fn speed_endpoint_clamps() {
        let server = server();
        let status: PlaybackStatus =
            call(server.router(), "POST", "/api/playback/speed", r#"{"ms":5}"#).await;
        assert_eq!(status.speed_ms, 100);
    }

    #[tokio::test]
    async fn run_endpoint_loads_new_trace() {
        let server = server();
        let body = r#"{"algorithm":"binary-search","input":{"kind":"search","values":[5,10,15,20,25],"target":15}}"#;
        let status: PlaybackStatus = call(server.router(), "POST", "/api/run", body).await;
        assert_eq!(status.cursor, 0);

        let info: StatusResponse = call(server.router(), "GET", "/api/status", "").await;
        assert_eq!(info.algorithm, "binary-search");
        assert_eq!(info.trace_len, status.trace_len);

        server.player().scrub(usize::MAX).await;
        let frame: Frame = call(server.router(), "GET", "/api/frame", "").await;
        assert!(frame.step.description.contains("Found"));
    }

    #[tokio::test]
    async fn run_endpoint_random_sample_is_seeded() {
        let server = server();
        let body = r#"{"algorithm":"quick-sort","random_len":12,"seed":9}"#;
        let a: PlaybackStatus = call(server.router(), "POST", "/api/run", body).await;
        let first: Frame = call(server.router(), "GET", "/api/frame", "").await;
        let b: PlaybackStatus = call(server.router(), "POST", "/api/run", body).await;
        let second: Frame = call(server.router(), "GET", "/api/frame", "").await;
        assert_eq!(a.trace_len, b.trace_len);
        assert_eq!(first.step, second.step);
        assert_eq!(first.step.array.len(), 12);
    }

    #[tokio::test]
    async fn unknown_algorithm_falls_back() {
        let server = server();
        let status: PlaybackStatus =
            call(server.router(), "POST", "/api/run", r#"{"algorithm":"avl-tree"}"#).await;
        assert_eq!(status.trace_len, 1);
    }

    #[tokio::test]
    async fn algorithms_listed() {
        let server = server();
        let list: Vec<AlgorithmInfo> = call(server.router(), "GET", "/api/algorithms", "").await;
        assert_eq!(list.len(), AlgorithmId::ALL.len());
        assert!(list.iter().any(|a| a.id == AlgorithmId::Trie && !a.implemented));
    }
}
