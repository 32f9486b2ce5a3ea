use crate::constants::{asset_url, MAX_LIVE_ONE_SHOTS};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use trolley_core::{AudioBackend, AudioError, Clip, Session, Voice};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

pub type WebSession = Session<WebAudioBackend>;

/// A media element plus the graph nodes it is routed through.
pub struct Voiced {
    audio: web::HtmlAudioElement,
    nodes: Vec<web::AudioNode>,
}

impl Voiced {
    fn teardown(self) {
        self.audio.set_onended(None);
        _ = self.audio.pause();
        self.audio.set_src("");
        for n in &self.nodes {
            _ = n.disconnect();
        }
    }
}

pub struct OverlayTimer(i32);

struct OneShot {
    id: u32,
    voiced: Voiced,
}

/// WebAudio implementation of the sound layers.
///
/// The `AudioContext` is created on first use and shared by every clip.
/// Overlay timers call back into the owning session through a weak handle.
pub struct WebAudioBackend {
    ctx: Option<web::AudioContext>,
    session: Weak<RefCell<WebSession>>,
    one_shots: Rc<RefCell<Vec<OneShot>>>,
    next_id: u32,
}

fn js_err(label: &str, e: JsValue) -> AudioError {
    AudioError::Node(format!("{}: {:?}", label, e))
}

fn route(
    ctx: &web::AudioContext,
    audio: &web::HtmlAudioElement,
    voice: Voice,
) -> Result<Vec<web::AudioNode>, JsValue> {
    let src = ctx.create_media_element_source(audio)?;
    let pan = ctx.create_stereo_panner()?;
    pan.pan().set_value(voice.pan);
    let gain = ctx.create_gain()?;
    gain.gain().set_value(voice.gain);
    src.connect_with_audio_node(&pan)?;
    pan.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;
    Ok(vec![src.into(), pan.into(), gain.into()])
}

// Rejected play() promises (autoplay policy) resume a suspended context and
// retry once; a second failure is dropped.
fn play_element(audio: &web::HtmlAudioElement, ctx: Option<web::AudioContext>) -> Result<(), AudioError> {
    let promise = audio.play().map_err(|_| AudioError::Blocked)?;
    let audio = audio.clone();
    spawn_local(async move {
        if JsFuture::from(promise).await.is_ok() {
            return;
        }
        if let Some(ctx) = ctx {
            if ctx.state() == web::AudioContextState::Suspended {
                if let Ok(p) = ctx.resume() {
                    _ = JsFuture::from(p).await;
                }
            }
        }
        if let Ok(p) = audio.play() {
            if let Err(e) = JsFuture::from(p).await {
                log::debug!("[audio] play retry rejected: {:?}", e);
            }
        }
    });
    Ok(())
}

fn settle(label: &'static str, promise: Result<js_sys::Promise, JsValue>) {
    if let Ok(p) = promise {
        spawn_local(async move {
            if let Err(e) = JsFuture::from(p).await {
                log::debug!("[audio] {} rejected: {:?}", label, e);
            }
        });
    }
}

impl WebAudioBackend {
    pub fn new(session: Weak<RefCell<WebSession>>) -> Self {
        Self {
            ctx: None,
            session,
            one_shots: Rc::new(RefCell::new(Vec::new())),
            next_id: 0,
        }
    }

    fn ensure_ctx(&mut self) -> Option<web::AudioContext> {
        if self.ctx.is_none() {
            match web::AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(e) => log::error!("[audio] AudioContext error: {:?}", e),
            }
        }
        self.ctx.clone()
    }

    fn voiced(&mut self, clip: Clip, voice: Voice) -> Result<Voiced, AudioError> {
        let audio = web::HtmlAudioElement::new_with_src(&asset_url(clip.file_name()))
            .map_err(|e| js_err("HtmlAudioElement", e))?;
        audio.set_cross_origin(Some("anonymous"));
        audio.set_playback_rate(voice.rate as f64);
        let nodes = match self.ensure_ctx() {
            Some(ctx) => route(&ctx, &audio, voice).unwrap_or_else(|e| {
                // Unrouted elements still play, just without pan.
                log::warn!("[audio] {:?} routing failed: {:?}", clip, e);
                audio.set_volume(voice.gain as f64);
                Vec::new()
            }),
            None => {
                audio.set_volume(voice.gain as f64);
                Vec::new()
            }
        };
        Ok(Voiced { audio, nodes })
    }
}

impl AudioBackend for WebAudioBackend {
    type Loop = Voiced;
    type Timer = OverlayTimer;

    fn resume(&mut self) {
        if let Some(ctx) = self.ensure_ctx() {
            // State lags pending transitions, so only a closed context is skipped.
            if ctx.state() != web::AudioContextState::Closed {
                settle("resume", ctx.resume());
            }
        }
    }

    fn suspend(&mut self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() != web::AudioContextState::Closed {
                settle("suspend", ctx.suspend());
            }
        }
    }

    fn start_loop(&mut self, clip: Clip, gain: f32) -> Result<Voiced, AudioError> {
        let voiced = self.voiced(clip, Voice::plain(gain))?;
        voiced.audio.set_loop(true);
        if let Err(e) = play_element(&voiced.audio, self.ctx.clone()) {
            voiced.teardown();
            return Err(e);
        }
        log::debug!("[audio] loop {:?} started", clip);
        Ok(voiced)
    }

    fn stop_loop(&mut self, handle: Voiced) {
        handle.teardown();
    }

    fn play_once(&mut self, clip: Clip, voice: Voice) -> Result<(), AudioError> {
        let voiced = self.voiced(clip, voice)?;
        if let Err(e) = play_element(&voiced.audio, self.ctx.clone()) {
            voiced.teardown();
            return Err(e);
        }
        self.next_id = self.next_id.wrapping_add(1);
        let id = self.next_id;

        // Attached after play() so a rejected clip never owns a callback.
        let one_shots = Rc::downgrade(&self.one_shots);
        let on_ended = Closure::once_into_js(move || {
            if let Some(list) = one_shots.upgrade() {
                let mut list = list.borrow_mut();
                if let Some(i) = list.iter().position(|s| s.id == id) {
                    list.remove(i).voiced.teardown();
                }
            }
        });
        voiced.audio.set_onended(Some(on_ended.unchecked_ref()));

        let mut list = self.one_shots.borrow_mut();
        list.push(OneShot { id, voiced });
        while list.len() > MAX_LIVE_ONE_SHOTS {
            list.remove(0).voiced.teardown();
        }
        Ok(())
    }

    fn stop_one_shots(&mut self) {
        let drained: Vec<OneShot> = self.one_shots.borrow_mut().drain(..).collect();
        for shot in drained {
            shot.voiced.teardown();
        }
    }

    fn schedule_overlay(&mut self, delay: Duration) -> Result<OverlayTimer, AudioError> {
        let window = web::window().ok_or_else(|| AudioError::Timer("no window".into()))?;
        let session = self.session.clone();
        let callback = Closure::once_into_js(move || {
            if let Some(session) = session.upgrade() {
                session.borrow_mut().on_overlay_timer();
            }
        });
        let ms = delay.as_millis().min(i32::MAX as u128) as i32;
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), ms)
            .map(OverlayTimer)
            .map_err(|e| AudioError::Timer(format!("{:?}", e)))
    }

    fn cancel_overlay(&mut self, timer: OverlayTimer) {
        if let Some(window) = web::window() {
            window.clear_timeout_with_handle(timer.0);
        }
    }
}
