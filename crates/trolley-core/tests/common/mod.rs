//! Shared test helpers: a recording `AudioBackend` fake.
#![allow(dead_code)]

use std::time::Duration;
use trolley_core::{AudioBackend, AudioError, AudioLayerManager, Clip, Voice};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Resume,
    Suspend,
    StartLoop(Clip),
    StopLoop(Clip),
    PlayOnce(Clip),
    StopOneShots,
    Schedule(Duration),
    Cancel,
}

/// Records every backend call and tracks live loops and pending timers.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    pub live_loops: Vec<(u32, Clip)>,
    pub pending_timers: Vec<u32>,
    /// Number of upcoming `play_once` calls that report `Blocked`.
    pub block_plays: u32,
    next_id: u32,
}

impl RecordingBackend {
    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn live(&self, clip: Clip) -> usize {
        self.live_loops.iter().filter(|(_, c)| *c == clip).count()
    }

    pub fn played(&self) -> Vec<Clip> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::PlayOnce(clip) => Some(*clip),
                _ => None,
            })
            .collect()
    }

    fn id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl AudioBackend for RecordingBackend {
    type Loop = u32;
    type Timer = u32;

    fn resume(&mut self) {
        self.calls.push(Call::Resume);
    }

    fn suspend(&mut self) {
        self.calls.push(Call::Suspend);
    }

    fn start_loop(&mut self, clip: Clip, _gain: f32) -> Result<u32, AudioError> {
        self.calls.push(Call::StartLoop(clip));
        let id = self.id();
        self.live_loops.push((id, clip));
        Ok(id)
    }

    fn stop_loop(&mut self, handle: u32) {
        if let Some(i) = self.live_loops.iter().position(|(id, _)| *id == handle) {
            let (_, clip) = self.live_loops.remove(i);
            self.calls.push(Call::StopLoop(clip));
        }
    }

    fn play_once(&mut self, clip: Clip, _voice: Voice) -> Result<(), AudioError> {
        self.calls.push(Call::PlayOnce(clip));
        if self.block_plays > 0 {
            self.block_plays -= 1;
            return Err(AudioError::Blocked);
        }
        Ok(())
    }

    fn stop_one_shots(&mut self) {
        self.calls.push(Call::StopOneShots);
    }

    fn schedule_overlay(&mut self, delay: Duration) -> Result<u32, AudioError> {
        self.calls.push(Call::Schedule(delay));
        let id = self.id();
        self.pending_timers.push(id);
        Ok(id)
    }

    fn cancel_overlay(&mut self, timer: u32) {
        self.calls.push(Call::Cancel);
        self.pending_timers.retain(|t| *t != timer);
    }
}

/// Fire the most recently scheduled overlay timer, as the browser would.
pub fn fire_timer(manager: &mut AudioLayerManager<RecordingBackend>) -> bool {
    match manager.backend_mut().pending_timers.pop() {
        Some(_) => {
            manager.on_overlay_timer();
            true
        }
        None => false,
    }
}

pub fn manager(seed: u64) -> AudioLayerManager<RecordingBackend> {
    AudioLayerManager::new(RecordingBackend::default(), seed)
}
