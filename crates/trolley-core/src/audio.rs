//! Layered sound playback for the trolley.
//!
//! The manager owns the layer state (background loop, pending overlay timer,
//! happy loop, terminal latch) and delegates the actual playback to an
//! [`AudioBackend`]. The browser backend lives in the web crate; tests use a
//! recording fake.

use crate::constants::*;
use crate::progress::Progress;
use rand::prelude::*;
use std::time::Duration;
use thiserror::Error;

/// Every sound the page knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Clip {
    PleaseSmile1,
    PleaseSmile2,
    Smile,
    WifeAndKids,
    ChooChoo,
    Rumble,
    Happy,
    Crash,
}

impl Clip {
    /// Overlay clips used when the trolley is past the midpoint.
    pub const DISTRESS: [Clip; 4] = [
        Clip::PleaseSmile1,
        Clip::PleaseSmile2,
        Clip::Smile,
        Clip::WifeAndKids,
    ];
    /// The only overlay clip used before the midpoint.
    pub const OCCASIONAL: Clip = Clip::ChooChoo;
    pub const BACKGROUND: Clip = Clip::Rumble;
    pub const HAPPY: Clip = Clip::Happy;
    pub const TERMINAL: Clip = Clip::Crash;

    pub fn file_name(self) -> &'static str {
        match self {
            Clip::PleaseSmile1 => "pleasesmile1.mp3",
            Clip::PleaseSmile2 => "pleasesmile2.mp3",
            Clip::Smile => "smile.mp3",
            Clip::WifeAndKids => "wifen4kids.mp3",
            Clip::ChooChoo => "choochoo.mp3",
            Clip::Rumble => "rumble.mp3",
            Clip::Happy => "happy.mp3",
            Clip::Crash => "crash.mp3",
        }
    }
}

/// Per-playback parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voice {
    pub rate: f32,
    pub pan: f32,
    pub gain: f32,
}

impl Voice {
    pub const fn plain(gain: f32) -> Self {
        Self {
            rate: 1.0,
            pan: 0.0,
            gain,
        }
    }

    /// Randomized rate, pan and gain for an overlay clip.
    pub fn frantic<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let (rate_lo, rate_hi) = PLAYBACK_RATE_RANGE;
        let (gain_lo, gain_hi) = GAIN_RANGE;
        Self {
            rate: rng.gen_range(rate_lo..=rate_hi),
            pan: rng.gen_range(-PAN_SPREAD..=PAN_SPREAD),
            gain: rng.gen_range(gain_lo..=gain_hi).min(GAIN_CAP),
        }
    }
}

/// Outcome of one overlay pick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayPlan {
    /// Clip to play now, if this pick fires.
    pub clip: Option<(Clip, Voice)>,
    /// Delay until the next pick.
    pub next_in: Duration,
}

/// Choose the next overlay clip and inter-arrival delay for `progress`.
pub fn plan_overlay<R: Rng + ?Sized>(progress: Progress, rng: &mut R) -> OverlayPlan {
    let frantic = progress.value() > PROGRESS_MIDPOINT;
    let (lo, hi) = if frantic {
        FRANTIC_DELAY_MS
    } else {
        SPARSE_DELAY_MS
    };
    let next_in = Duration::from_millis(rng.gen_range(lo..=hi) as u64);
    let fire_probability = if frantic {
        FRANTIC_FIRE_PROBABILITY
    } else {
        SPARSE_FIRE_PROBABILITY
    };
    if rng.gen::<f32>() >= fire_probability {
        return OverlayPlan {
            clip: None,
            next_in,
        };
    }
    let clip = if frantic {
        pick_frantic_clip(rng)
    } else {
        Clip::OCCASIONAL
    };
    OverlayPlan {
        clip: Some((clip, Voice::frantic(rng))),
        next_in,
    }
}

fn pick_frantic_clip<R: Rng + ?Sized>(rng: &mut R) -> Clip {
    let mut weighted: Vec<(Clip, u32)> = Clip::DISTRESS
        .iter()
        .map(|c| (*c, DISTRESS_WEIGHT))
        .collect();
    weighted.push((Clip::OCCASIONAL, OCCASIONAL_WEIGHT));
    weighted
        .choose_weighted(rng, |(_, w)| *w)
        .map(|(c, _)| *c)
        .unwrap_or(Clip::OCCASIONAL)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("playback blocked until the audio context resumes")]
    Blocked,
    #[error("audio node error: {0}")]
    Node(String),
    #[error("timer error: {0}")]
    Timer(String),
}

/// Platform audio and timer primitives used by [`AudioLayerManager`].
pub trait AudioBackend {
    /// Handle to a looping track.
    type Loop;
    /// Handle to a pending overlay timer.
    type Timer;

    fn resume(&mut self);
    fn suspend(&mut self);
    fn start_loop(&mut self, clip: Clip, gain: f32) -> Result<Self::Loop, AudioError>;
    fn stop_loop(&mut self, handle: Self::Loop);
    fn play_once(&mut self, clip: Clip, voice: Voice) -> Result<(), AudioError>;
    /// Tear down every one-shot clip still sounding.
    fn stop_one_shots(&mut self);
    /// Arrange for the manager's `on_overlay_timer` to run after `delay`.
    fn schedule_overlay(&mut self, delay: Duration) -> Result<Self::Timer, AudioError>;
    fn cancel_overlay(&mut self, timer: Self::Timer);
}

pub struct AudioLayerManager<B: AudioBackend> {
    backend: B,
    rng: StdRng,
    progress: Progress,
    active: bool,
    finished: bool,
    background: Option<B::Loop>,
    happy: Option<B::Loop>,
    overlay_timer: Option<B::Timer>,
}

impl<B: AudioBackend> AudioLayerManager<B> {
    pub fn new(backend: B, seed: u64) -> Self {
        Self {
            backend,
            rng: StdRng::seed_from_u64(seed),
            progress: Progress::ZERO,
            active: false,
            finished: false,
            background: None,
            happy: None,
            overlay_timer: None,
        }
    }

    /// Start the distress layer. Idempotent while active.
    pub fn start(&mut self) {
        if self.active || self.finished {
            return;
        }
        self.active = true;
        log::info!("[audio] distress layer on");
        self.backend.resume();
        if let Some(h) = self.happy.take() {
            self.backend.stop_loop(h);
        }
        if self.background.is_none() {
            self.background = self.start_loop_with_retry(Clip::BACKGROUND, BACKGROUND_GAIN);
        }
        self.fire_overlay();
    }

    /// Stop the distress layer and suspend the context. Idempotent.
    pub fn stop(&mut self) {
        if !self.active && self.background.is_none() && self.overlay_timer.is_none() {
            return;
        }
        self.active = false;
        log::info!("[audio] distress layer off");
        self.teardown_distress();
        self.backend.suspend();
    }

    /// Replace the distress layer with the happy loop.
    pub fn calm(&mut self) {
        if self.finished {
            return;
        }
        // Tear down without suspending: the happy loop shares the context.
        if self.active {
            log::info!("[audio] distress layer off");
        }
        self.active = false;
        self.teardown_distress();
        if self.happy.is_none() {
            self.backend.resume();
            self.happy = self.start_loop_with_retry(Clip::HAPPY, HAPPY_GAIN);
        }
    }

    /// Record progress for overlay planning. Never starts playback.
    #[inline]
    pub fn set_progress(&mut self, progress: Progress) {
        self.progress = progress;
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn is_calm(&self) -> bool {
        self.happy.is_some()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Callback for the timer handed out by `schedule_overlay`.
    pub fn on_overlay_timer(&mut self) {
        self.overlay_timer = None;
        if !self.active || self.finished {
            return;
        }
        self.fire_overlay();
    }

    /// Tear everything down and play the terminal stinger. Runs once.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.active = false;
        self.teardown_distress();
        if let Some(h) = self.happy.take() {
            self.backend.stop_loop(h);
        }
        self.backend.resume();
        log::info!("[audio] terminal stinger");
        self.play_with_retry(Clip::TERMINAL, Voice::plain(TERMINAL_GAIN));
    }

    /// Resume the shared context, e.g. after a user gesture.
    pub fn resume(&mut self) {
        self.backend.resume();
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn fire_overlay(&mut self) {
        let plan = plan_overlay(self.progress, &mut self.rng);
        if let Some((clip, voice)) = plan.clip {
            self.play_with_retry(clip, voice);
        }
        if let Some(t) = self.overlay_timer.take() {
            self.backend.cancel_overlay(t);
        }
        match self.backend.schedule_overlay(plan.next_in) {
            Ok(t) => self.overlay_timer = Some(t),
            Err(e) => log::warn!("[audio] overlay scheduling failed: {}", e),
        }
    }

    fn teardown_distress(&mut self) {
        if let Some(t) = self.overlay_timer.take() {
            self.backend.cancel_overlay(t);
        }
        if let Some(h) = self.background.take() {
            self.backend.stop_loop(h);
        }
        self.backend.stop_one_shots();
    }

    fn play_with_retry(&mut self, clip: Clip, voice: Voice) {
        match self.backend.play_once(clip, voice) {
            Ok(()) => {}
            Err(AudioError::Blocked) => {
                self.backend.resume();
                if let Err(e) = self.backend.play_once(clip, voice) {
                    log::warn!("[audio] {:?} retry failed: {}", clip, e);
                }
            }
            Err(e) => log::warn!("[audio] {:?} failed: {}", clip, e),
        }
    }

    fn start_loop_with_retry(&mut self, clip: Clip, gain: f32) -> Option<B::Loop> {
        match self.backend.start_loop(clip, gain) {
            Ok(h) => Some(h),
            Err(AudioError::Blocked) => {
                self.backend.resume();
                self.backend
                    .start_loop(clip, gain)
                    .map_err(|e| log::warn!("[audio] {:?} loop retry failed: {}", clip, e))
                    .ok()
            }
            Err(e) => {
                log::warn!("[audio] {:?} loop failed: {}", clip, e);
                None
            }
        }
    }
}
