//! Algorithm Trace Playback
//!
//! Drives a view through a recorded algorithm trace with transport controls.
//!
//! # Architecture
//!
//! - **Playback**: Synchronous state machine over a trace and a cursor
//! - **Player**: Owns the playback and its single auto-advance timer
//! - **Frame**: Current step plus status, the contract with the renderer
//! - **Server**: REST transport controls and a WebSocket frame stream
//!
//! # Usage
//!
//! ```ignore
//! let trace = algotrace_engine::generate_by_name("merge-sort", None);
//! let player = Player::new(trace, PlaybackConfig::default());
//!
//! let server = VisServer::new(player, "merge-sort");
//! server.serve(([0, 0, 0, 0], 3000).into()).await?;
//! ```

mod config;
mod playback;
mod player;
mod server;
mod view;

pub use config::{
    ConfigError, PlaybackConfig, ServerConfig, DEFAULT_MAX_SPEED_MS, DEFAULT_MIN_SPEED_MS,
    DEFAULT_SPEED_MS,
};
pub use playback::{Playback, PlaybackState, PlaybackStatus, Tick};
pub use player::Player;
pub use server::{AlgorithmInfo, Direction, RunRequest, StatusResponse, VisServer, WsCommand, WsResponse};
pub use view::Frame;
