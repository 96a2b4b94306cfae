//! What the rendering layer reads.

use algotrace_engine::Step;
use serde::{Deserialize, Serialize};

use crate::playback::{Playback, PlaybackStatus};

/// The current step plus everything needed to draw transport controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub step: Step,
    pub status: PlaybackStatus,
}

impl From<&Playback> for Frame {
    fn from(playback: &Playback) -> Self {
        Self {
            step: playback.current_step().clone(),
            status: PlaybackStatus::from(playback),
        }
    }
}
