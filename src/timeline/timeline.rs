use std::collections::VecDeque;

use crate::foundation::error::{TweenError, TweenResult};
use crate::timeline::clock::Clock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
    Completed,
}

/// Lifecycle notifications, drained by the owner after each call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimelineEvent {
    Started,
    Resumed,
    Paused,
    Stopped,
    Seeked(f64),
    /// Total number of wraps so far.
    Looped(u64),
    Completed,
}

/// Playback position and state, for save/restore around offline work.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub current_time_ms: f64,
}

/// Playback state machine.
///
/// Knows nothing about shapes; it turns clock readings into a scene time in
/// `[0, duration_ms]`. Time only advances in [`Timeline::tick`], which is the frame callback.
pub struct Timeline {
    clock: Box<dyn Clock>,
    duration_ms: f64,
    target_fps: f64,
    looping: bool,
    playback_rate: f64,
    current_time_ms: f64,
    state: PlaybackState,
    // Clock reading that corresponds to scene time zero at the current rate.
    origin_ms: f64,
    frame_pending: bool,
    frame_count: u64,
    dropped_frame_count: u64,
    loop_count: u64,
    last_frame_at: Option<f64>,
    fps_samples: VecDeque<f64>,
    fps_window: usize,
    events: Vec<TimelineEvent>,
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("duration_ms", &self.duration_ms)
            .field("state", &self.state)
            .field("current_time_ms", &self.current_time_ms)
            .field("playback_rate", &self.playback_rate)
            .field("looping", &self.looping)
            .finish_non_exhaustive()
    }
}

impl Timeline {
    pub fn new(clock: Box<dyn Clock>, duration_ms: f64, target_fps: f64, looping: bool) -> Self {
        Self {
            clock,
            duration_ms: duration_ms.max(0.0),
            target_fps,
            looping,
            playback_rate: 1.0,
            current_time_ms: 0.0,
            state: PlaybackState::Stopped,
            origin_ms: 0.0,
            frame_pending: false,
            frame_count: 0,
            dropped_frame_count: 0,
            loop_count: 0,
            last_frame_at: None,
            fps_samples: VecDeque::new(),
            fps_window: 60,
            events: Vec::new(),
        }
    }

    pub fn with_fps_window(mut self, window: usize) -> Self {
        self.fps_window = window.max(1);
        self
    }

    /// Stop and apply new scene timing. Metrics are kept.
    pub fn configure(&mut self, duration_ms: f64, target_fps: f64, looping: bool) {
        self.stop();
        self.duration_ms = duration_ms.max(0.0);
        self.target_fps = target_fps;
        self.looping = looping;
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_time(&self) -> f64 {
        self.current_time_ms
    }

    pub fn duration(&self) -> f64 {
        self.duration_ms
    }

    pub fn target_fps(&self) -> f64 {
        self.target_fps
    }

    pub fn frame_interval_ms(&self) -> f64 {
        if self.target_fps > 0.0 {
            1000.0 / self.target_fps
        } else {
            0.0
        }
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    /// Whether a frame callback is registered.
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn dropped_frame_count(&self) -> u64 {
        self.dropped_frame_count
    }

    pub fn loop_count(&self) -> u64 {
        self.loop_count
    }

    /// Mean frames per second over the sample window, `0.0` before two frames were seen.
    pub fn fps(&self) -> f64 {
        if self.fps_samples.is_empty() {
            return 0.0;
        }
        self.fps_samples.iter().sum::<f64>() / self.fps_samples.len() as f64
    }

    pub fn drain_events(&mut self) -> Vec<TimelineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn play(&mut self) {
        let event = match self.state {
            PlaybackState::Playing => return,
            PlaybackState::Paused => TimelineEvent::Resumed,
            PlaybackState::Completed => {
                self.current_time_ms = 0.0;
                TimelineEvent::Started
            }
            PlaybackState::Stopped => TimelineEvent::Started,
        };
        self.rebase(self.current_time_ms);
        self.state = PlaybackState::Playing;
        self.frame_pending = true;
        self.last_frame_at = None;
        tracing::debug!(time_ms = self.current_time_ms, "timeline playing");
        self.events.push(event);
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.current_time_ms = self.sample().clamp(0.0, self.duration_ms);
        self.state = PlaybackState::Paused;
        self.frame_pending = false;
        tracing::debug!(time_ms = self.current_time_ms, "timeline paused");
        self.events.push(TimelineEvent::Paused);
    }

    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.current_time_ms = 0.0;
        self.frame_pending = false;
        self.loop_count = 0;
        self.last_frame_at = None;
        tracing::debug!("timeline stopped");
        self.events.push(TimelineEvent::Stopped);
    }

    /// Jump to `time_ms`, clamped to `[0, duration]`. Works in every state; a completed
    /// timeline becomes paused at the new time.
    pub fn seek(&mut self, time_ms: f64) {
        let t = if time_ms.is_finite() {
            time_ms.clamp(0.0, self.duration_ms)
        } else {
            0.0
        };
        self.current_time_ms = t;
        match self.state {
            PlaybackState::Playing => self.rebase(t),
            PlaybackState::Completed if t < self.duration_ms => {
                self.state = PlaybackState::Paused;
            }
            _ => {}
        }
        tracing::debug!(time_ms = t, "timeline seek");
        self.events.push(TimelineEvent::Seeked(t));
    }

    /// Change speed without moving the current time. Rates must be finite and positive.
    pub fn set_playback_rate(&mut self, rate: f64) -> TweenResult<()> {
        if !(rate.is_finite() && rate > 0.0) {
            tracing::warn!(rate, "rejected playback rate");
            return Err(TweenError::InvalidPlaybackRate(rate));
        }
        if self.state == PlaybackState::Playing {
            self.current_time_ms = self.sample().clamp(0.0, self.duration_ms);
            self.playback_rate = rate;
            self.rebase(self.current_time_ms);
        } else {
            self.playback_rate = rate;
        }
        Ok(())
    }

    /// Frame callback. Returns the new scene time if a frame was due.
    pub fn tick(&mut self) -> Option<f64> {
        if self.state != PlaybackState::Playing || !self.frame_pending {
            return None;
        }
        let now = self.clock.now_ms();
        self.record_frame(now);

        let t = (now - self.origin_ms) * self.playback_rate;
        if t >= self.duration_ms {
            if self.looping && self.duration_ms > 0.0 {
                let wraps = (t / self.duration_ms).floor();
                let wrapped = t - wraps * self.duration_ms;
                self.loop_count += wraps as u64;
                self.current_time_ms = wrapped;
                self.rebase(wrapped);
                tracing::debug!(loops = self.loop_count, "timeline looped");
                self.events.push(TimelineEvent::Looped(self.loop_count));
            } else {
                self.current_time_ms = self.duration_ms;
                self.state = PlaybackState::Completed;
                self.frame_pending = false;
                tracing::debug!("timeline completed");
                self.events.push(TimelineEvent::Completed);
            }
        } else {
            self.current_time_ms = t.max(0.0);
        }
        Some(self.current_time_ms)
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state,
            current_time_ms: self.current_time_ms,
        }
    }

    /// Put state and time back exactly as captured, without emitting events.
    pub fn restore(&mut self, snap: PlaybackSnapshot) {
        self.current_time_ms = snap.current_time_ms.clamp(0.0, self.duration_ms);
        self.state = snap.state;
        self.frame_pending = snap.state == PlaybackState::Playing;
        if self.frame_pending {
            self.rebase(self.current_time_ms);
            self.last_frame_at = None;
        }
    }

    fn sample(&self) -> f64 {
        (self.clock.now_ms() - self.origin_ms) * self.playback_rate
    }

    fn rebase(&mut self, time_ms: f64) {
        self.origin_ms = self.clock.now_ms() - time_ms / self.playback_rate;
    }

    fn record_frame(&mut self, now: f64) {
        if let Some(last) = self.last_frame_at {
            let delta = now - last;
            let interval = self.frame_interval_ms();
            if interval > 0.0 && delta > interval * 1.5 {
                self.dropped_frame_count += 1;
            }
            if delta > 0.0 {
                if self.fps_samples.len() == self.fps_window {
                    self.fps_samples.pop_front();
                }
                self.fps_samples.push_back(1000.0 / delta);
            }
        }
        self.last_frame_at = Some(now);
        self.frame_count += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/timeline.rs"]
mod tests;
