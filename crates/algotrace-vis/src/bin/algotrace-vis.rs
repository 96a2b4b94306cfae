//! Algorithm Trace Visualization Server
//!
//! Generate a trace and serve playback controls over HTTP and WebSocket.

use std::net::SocketAddr;

use algotrace_engine::{generate_by_name, AlgorithmId};
use algotrace_vis::{
    PlaybackConfig, Player, ServerConfig, VisServer, DEFAULT_MAX_SPEED_MS, DEFAULT_MIN_SPEED_MS,
    DEFAULT_SPEED_MS,
};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// Serve algorithm trace playback.
#[derive(Parser, Debug)]
#[command(name = "algotrace-vis")]
#[command(about = "Step through recorded algorithm traces")]
struct Args {
    /// Algorithm to load on startup
    #[arg(short, long, default_value = "bubble-sort")]
    algorithm: String,

    /// Address to listen on
    #[arg(long, env = "ALGOTRACE_ADDR", default_value = "0.0.0.0:3000")]
    addr: SocketAddr,

    /// Fastest auto-advance interval in milliseconds
    #[arg(long, env = "ALGOTRACE_MIN_SPEED_MS", default_value_t = DEFAULT_MIN_SPEED_MS)]
    min_speed_ms: u64,

    /// Slowest auto-advance interval in milliseconds
    #[arg(long, env = "ALGOTRACE_MAX_SPEED_MS", default_value_t = DEFAULT_MAX_SPEED_MS)]
    max_speed_ms: u64,

    /// Starting auto-advance interval in milliseconds
    #[arg(long, env = "ALGOTRACE_SPEED_MS", default_value_t = DEFAULT_SPEED_MS)]
    speed_ms: u64,

    /// List algorithm ids and exit
    #[arg(long)]
    list: bool,
}

impl Args {
    fn server_config(&self) -> Result<ServerConfig> {
        let playback = PlaybackConfig {
            min_speed_ms: self.min_speed_ms,
            max_speed_ms: self.max_speed_ms,
            default_speed_ms: self.speed_ms,
        }
        .validate()?;
        Ok(ServerConfig {
            addr: self.addr,
            playback,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    if args.list {
        for id in AlgorithmId::ALL {
            let note = if id.is_implemented() { "" } else { " (not implemented)" };
            println!("{id}{note}");
        }
        return Ok(());
    }

    let config = args.server_config()?;
    let trace = generate_by_name(&args.algorithm, None);
    tracing::info!(
        algorithm = %args.algorithm,
        steps = trace.len(),
        "Generated initial trace"
    );

    let player = Player::new(trace, config.playback);
    let server = VisServer::new(player, args.algorithm);
    server.serve(config.addr).await?;

    Ok(())
}
