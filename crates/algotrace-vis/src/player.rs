//! Timer-driven playback.
//!
//! A [`Player`] owns a [`Playback`] together with the one auto-advance timer.
//! Both live behind the same mutex, along with an arm epoch: every arm,
//! disarm, load and teardown bumps the epoch and aborts the previous timer
//! task, and a timer that wakes to a different epoch exits without touching
//! the playback. At most one timer can therefore drive the cursor.

use std::sync::{Arc, Weak};

use algotrace_engine::{generate_by_name, AlgorithmInput, Trace};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::config::PlaybackConfig;
use crate::playback::{Playback, PlaybackStatus, Tick};
use crate::view::Frame;

struct Inner {
    playback: Playback,
    timer: Option<JoinHandle<()>>,
    epoch: u64,
}

impl Inner {
    /// Cancel the live timer, if any, and invalidate its epoch.
    fn disarm(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn has_timer(&self) -> bool {
        self.timer.is_some()
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.disarm();
    }
}

struct Shared {
    inner: Mutex<Inner>,
    frames: watch::Sender<Frame>,
}

impl Shared {
    fn publish(&self, inner: &Inner) {
        self.frames.send_replace(Frame::from(&inner.playback));
    }
}

/// Cloneable handle to a playback session with its auto-advance timer.
///
/// Must be used inside a tokio runtime; `play` spawns the timer task.
#[derive(Clone)]
pub struct Player {
    shared: Arc<Shared>,
}

impl Player {
    /// Create a player positioned on the first step of `trace`.
    pub fn new(trace: Trace, config: PlaybackConfig) -> Self {
        let playback = Playback::new(trace, config);
        let (frames, _) = watch::channel(Frame::from(&playback));
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    playback,
                    timer: None,
                    epoch: 0,
                }),
                frames,
            }),
        }
    }

    /// Receive a frame after every change.
    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.shared.frames.subscribe()
    }

    pub async fn frame(&self) -> Frame {
        Frame::from(&self.shared.inner.lock().await.playback)
    }

    pub async fn status(&self) -> PlaybackStatus {
        PlaybackStatus::from(&self.shared.inner.lock().await.playback)
    }

    /// Whether an auto-advance timer is armed.
    pub async fn timer_armed(&self) -> bool {
        self.shared.inner.lock().await.has_timer()
    }

    /// Replace the trace. Cancels the timer before the swap.
    pub async fn load(&self, trace: Trace) -> PlaybackStatus {
        self.update(|inner| {
            inner.disarm();
            inner.playback.load(trace);
        })
        .await
    }

    /// Generate a fresh trace and load it.
    ///
    /// Unknown algorithms and rejected input load a single fallback step.
    pub async fn regenerate(&self, algorithm: &str, input: Option<&AlgorithmInput>) -> PlaybackStatus {
        let trace = generate_by_name(algorithm, input);
        tracing::info!(algorithm, steps = trace.len(), "loaded trace");
        self.load(trace).await
    }

    /// Start auto-advancing. A second call while playing keeps the
    /// existing timer.
    pub async fn play(&self) -> PlaybackStatus {
        let mut inner = self.shared.inner.lock().await;
        if inner.playback.play() {
            inner.disarm();
            let epoch = inner.epoch;
            inner.timer = Some(tokio::spawn(run_timer(Arc::downgrade(&self.shared), epoch)));
            tracing::debug!(cursor = inner.playback.cursor(), "playback started");
        }
        self.shared.publish(&inner);
        PlaybackStatus::from(&inner.playback)
    }

    pub async fn pause(&self) -> PlaybackStatus {
        self.update(|inner| {
            inner.disarm();
            inner.playback.pause();
        })
        .await
    }

    /// Move by `delta` steps. Ignored while playing.
    pub async fn step(&self, delta: isize) -> PlaybackStatus {
        self.update(|inner| {
            inner.playback.step(delta);
        })
        .await
    }

    /// Pause and jump to `index` (clamped).
    pub async fn scrub(&self, index: usize) -> PlaybackStatus {
        self.update(|inner| {
            inner.disarm();
            inner.playback.scrub(index);
        })
        .await
    }

    /// Change the interval. A running timer picks it up on its next tick.
    pub async fn set_speed(&self, ms: u64) -> PlaybackStatus {
        self.update(|inner| {
            inner.playback.set_speed(ms);
        })
        .await
    }

    pub async fn reset(&self) -> PlaybackStatus {
        self.update(|inner| {
            inner.disarm();
            inner.playback.reset();
        })
        .await
    }

    /// Cancel the timer ahead of teardown.
    pub async fn shutdown(&self) {
        self.update(|inner| {
            inner.disarm();
            inner.playback.pause();
        })
        .await;
    }

    async fn update<F>(&self, f: F) -> PlaybackStatus
    where
        F: FnOnce(&mut Inner),
    {
        let mut inner = self.shared.inner.lock().await;
        f(&mut inner);
        self.shared.publish(&inner);
        PlaybackStatus::from(&inner.playback)
    }
}

async fn run_timer(shared: Weak<Shared>, epoch: u64) {
    loop {
        let delay = match shared.upgrade() {
            Some(shared) => {
                let inner = shared.inner.lock().await;
                if inner.epoch != epoch {
                    return;
                }
                inner.playback.speed()
            }
            None => return,
        };

        tokio::time::sleep(delay).await;

        let Some(shared) = shared.upgrade() else {
            return;
        };
        let mut inner = shared.inner.lock().await;
        if inner.epoch != epoch {
            return;
        }

        let tick = inner.playback.tick();
        shared.publish(&inner);
        match tick {
            Tick::Advanced(_) => {}
            Tick::Finished | Tick::Ignored => {
                tracing::debug!(cursor = inner.playback.cursor(), "playback finished");
                // Detaches this task's own handle.
                inner.timer = None;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackState;
    use algotrace_engine::Recorder;
    use std::time::Duration;

    fn make_trace(count: usize) -> Trace {
        let mut rec = Recorder::new();
        for i in 0..count {
            rec.record(&[i as i64], [0], format!("step {i}"));
        }
        rec.finish()
    }

    fn player(count: usize) -> Player {
        let config = PlaybackConfig {
            default_speed_ms: 100,
            ..PlaybackConfig::default()
        };
        Player::new(make_trace(count), config)
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn play_advances_on_each_tick() {
        let player = player(5);
        player.play().await;
        assert!(player.timer_armed().await);

        advance(250).await;
        assert_eq!(player.status().await.cursor, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_disarms_at_end() {
        let player = player(3);
        player.play().await;

        advance(1000).await;
        let status = player.status().await;
        assert_eq!(status.cursor, 2);
        assert_eq!(status.state, PlaybackState::Finished);
        assert!(!player.timer_armed().await);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_timer() {
        let player = player(10);
        player.play().await;
        advance(150).await;
        player.pause().await;
        assert!(!player.timer_armed().await);

        advance(1000).await;
        assert_eq!(player.status().await.cursor, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn load_cancels_stale_timer() {
        let player = player(10);
        player.play().await;
        advance(150).await;

        player.load(make_trace(4)).await;
        advance(1000).await;

        let status = player.status().await;
        assert_eq!(status.cursor, 0);
        assert_eq!(status.trace_len, 4);
        assert!(!status.is_playing);
    }

    #[tokio::test(start_paused = true)]
    async fn speed_change_applies_next_tick() {
        let player = player(10);
        player.play().await;
        advance(50).await;
        player.set_speed(400).await;

        // The in-flight 100ms sleep still fires; the next one waits 400ms.
        advance(100).await;
        assert_eq!(player.status().await.cursor, 1);
        advance(300).await;
        assert_eq!(player.status().await.cursor, 1);
        advance(150).await;
        assert_eq!(player.status().await.cursor, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn step_ignored_while_playing() {
        let player = player(10);
        player.play().await;
        let status = player.step(1).await;
        assert_eq!(status.cursor, 0);
        assert!(status.is_playing);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_ticks() {
        let player = player(4);
        let mut frames = player.subscribe();
        player.play().await;
        let _ = frames.borrow_and_update();

        advance(110).await;
        assert!(frames.has_changed().unwrap());
        assert_eq!(frames.borrow_and_update().status.cursor, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn regenerate_falls_back_for_unknown() {
        let player = player(4);
        let status = player.regenerate("splay-tree", None).await;
        assert_eq!(status.trace_len, 1);
        let frame = player.frame().await;
        assert!(frame.step.description.contains("visualization not implemented"));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_player_stops_timer() {
        let player = player(10);
        let mut frames = player.subscribe();
        player.play().await;
        drop(player);

        advance(500).await;
        // Only the play() publish is visible; no tick ran after the drop.
        assert_eq!(frames.borrow_and_update().status.cursor, 0);
    }
}
