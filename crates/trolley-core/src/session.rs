//! Per-page-load state tying the controller, the sound layers and the track
//! layout together.

use crate::audio::{AudioBackend, AudioLayerManager};
use crate::config::TrolleyConfig;
use crate::controller::{Effect, Effects, Mood, ProgressController};
use crate::expression::Sample;
use crate::position::TrackLayout;
use crate::progress::Progress;
use glam::Vec2;

/// What the renderer needs after a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUpdate {
    /// New page mood, when the tick set one.
    pub mood: Option<Mood>,
    pub progress: Progress,
    pub moved: bool,
    /// True only on the tick that reached the threshold.
    pub game_over: bool,
}

pub struct Session<B: AudioBackend> {
    controller: ProgressController,
    audio: AudioLayerManager<B>,
    layout: TrackLayout,
    mood: Mood,
}

impl<B: AudioBackend> Session<B> {
    pub fn new(config: &TrolleyConfig, backend: B, seed: u64) -> Self {
        Self {
            controller: ProgressController::new(config.steps, config.game_over_at),
            audio: AudioLayerManager::new(backend, seed),
            layout: config.layout,
            mood: Mood::Calm,
        }
    }

    pub fn on_sample(&mut self, sample: Sample) -> FrameUpdate {
        let effects = self.controller.tick(sample);
        self.apply(effects)
    }

    /// Advance outside the sampler loop; a no-op after game over.
    pub fn advance(&mut self, step: f32) -> FrameUpdate {
        let effects = self.controller.advance(step);
        self.apply(effects)
    }

    #[inline]
    pub fn on_overlay_timer(&mut self) {
        self.audio.on_overlay_timer();
    }

    #[inline]
    pub fn resume_audio(&mut self) {
        self.audio.resume();
    }

    /// Trolley offset for the current progress.
    pub fn position(&self, element: Vec2, viewport: Vec2) -> Vec2 {
        self.layout.position(self.controller.progress(), element, viewport)
    }

    #[inline]
    pub fn progress(&self) -> Progress {
        self.controller.progress()
    }

    #[inline]
    pub fn mood(&self) -> Mood {
        self.mood
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.controller.is_game_over()
    }

    pub fn controller(&self) -> &ProgressController {
        &self.controller
    }

    pub fn audio(&self) -> &AudioLayerManager<B> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioLayerManager<B> {
        &mut self.audio
    }

    fn apply(&mut self, effects: Effects) -> FrameUpdate {
        let mut update = FrameUpdate {
            mood: None,
            progress: self.controller.progress(),
            moved: false,
            game_over: false,
        };
        for effect in effects {
            match effect {
                Effect::Mood(m) => {
                    if m != self.mood {
                        log::debug!("[session] mood {:?} -> {:?}", self.mood, m);
                    }
                    self.mood = m;
                    update.mood = Some(m);
                }
                Effect::Moved(p) => {
                    update.moved = true;
                    self.audio.set_progress(p);
                }
                Effect::StartDistress => self.audio.start(),
                Effect::Calm => self.audio.calm(),
                Effect::GameOver => {
                    self.audio.finish();
                    update.game_over = true;
                    log::info!("[session] game over");
                }
            }
        }
        update
    }
}
