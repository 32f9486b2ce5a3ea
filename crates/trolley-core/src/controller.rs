//! Progress state machine driven by expression samples.

use crate::constants::{FACE_STEP, GAME_OVER_AT, NO_FACE_STEP};
use crate::expression::Sample;
use crate::progress::Progress;
use smallvec::SmallVec;

/// Visual state of the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mood {
    /// Not smiling or nobody in frame; the trolley rolls.
    Alarm,
    /// Smiling; the trolley holds.
    Calm,
}

/// Something the rest of the session should do as a result of a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    Mood(Mood),
    /// Progress changed; reposition the trolley.
    Moved(Progress),
    /// Progress increased since the previous tick.
    StartDistress,
    /// Switch audio to the happy state.
    Calm,
    /// Threshold reached; emitted once per session.
    GameOver,
}

pub type Effects = SmallVec<[Effect; 4]>;

/// Per-tick increments for the two non-smiling cases.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepConfig {
    pub face_step: f32,
    pub no_face_step: f32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            face_step: FACE_STEP,
            no_face_step: NO_FACE_STEP,
        }
    }
}

pub struct ProgressController {
    progress: Progress,
    prev: Progress,
    steps: StepConfig,
    game_over_at: f32,
    moving: bool,
    game_over: bool,
}

impl Default for ProgressController {
    fn default() -> Self {
        Self::new(StepConfig::default(), GAME_OVER_AT)
    }
}

impl ProgressController {
    pub fn new(steps: StepConfig, game_over_at: f32) -> Self {
        Self {
            progress: Progress::ZERO,
            prev: Progress::ZERO,
            steps,
            game_over_at,
            moving: false,
            game_over: false,
        }
    }

    #[inline]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Apply one sampler tick. Returns no effects once game over latched.
    pub fn tick(&mut self, sample: Sample) -> Effects {
        let mut out = Effects::new();
        if self.game_over {
            return out;
        }
        let step = match sample {
            s if s.is_smiling() => {
                self.moving = false;
                self.prev = self.progress;
                out.push(Effect::Mood(Mood::Calm));
                out.push(Effect::Calm);
                log::debug!("[controller] smiling; holding at {:.3}", self.progress.value());
                return out;
            }
            Sample::Face { .. } => self.steps.face_step,
            Sample::NoFace => self.steps.no_face_step,
        };
        out.push(Effect::Mood(Mood::Alarm));
        self.advance_into(step, &mut out);
        out
    }

    /// Advance by `step` outside the sampler. A no-op after game over.
    pub fn advance(&mut self, step: f32) -> Effects {
        let mut out = Effects::new();
        if !self.game_over {
            self.advance_into(step, &mut out);
        }
        out
    }

    fn advance_into(&mut self, step: f32, out: &mut Effects) {
        let next = self.progress.advanced_by(step);
        self.moving = next > self.prev;
        self.progress = next;
        self.prev = next;
        if self.moving {
            out.push(Effect::Moved(next));
        }
        if next.value() >= self.game_over_at {
            self.game_over = true;
            self.moving = false;
            out.push(Effect::GameOver);
            log::info!("[controller] game over at {:.3}", next.value());
        } else if self.moving {
            out.push(Effect::StartDistress);
        }
    }
}
