//! Playback and server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

/// Fastest auto-advance interval.
pub const DEFAULT_MIN_SPEED_MS: u64 = 100;
/// Slowest auto-advance interval.
pub const DEFAULT_MAX_SPEED_MS: u64 = 2000;
/// Interval a fresh player starts with.
pub const DEFAULT_SPEED_MS: u64 = 500;

/// Invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("speed bounds inverted: min {min}ms > max {max}ms")]
    InvertedBounds { min: u64, max: u64 },

    #[error("speed bounds must be positive")]
    ZeroSpeed,
}

/// Auto-advance timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    pub min_speed_ms: u64,
    pub max_speed_ms: u64,
    /// Starting interval; clamped into bounds on use.
    pub default_speed_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            min_speed_ms: DEFAULT_MIN_SPEED_MS,
            max_speed_ms: DEFAULT_MAX_SPEED_MS,
            default_speed_ms: DEFAULT_SPEED_MS,
        }
    }
}

impl PlaybackConfig {
    /// Check bounds are usable.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.min_speed_ms == 0 {
            return Err(ConfigError::ZeroSpeed);
        }
        if self.min_speed_ms > self.max_speed_ms {
            return Err(ConfigError::InvertedBounds {
                min: self.min_speed_ms,
                max: self.max_speed_ms,
            });
        }
        Ok(self)
    }

    /// Clamp `ms` into the configured bounds.
    pub fn clamp_speed(&self, ms: u64) -> u64 {
        ms.clamp(self.min_speed_ms, self.max_speed_ms)
    }

    pub fn initial_speed(&self) -> Duration {
        Duration::from_millis(self.clamp_speed(self.default_speed_ms))
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub playback: PlaybackConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000),
            playback: PlaybackConfig::default(),
        }
    }
}
