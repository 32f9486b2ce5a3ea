use crate::audio::WebSession;
use crate::classifier::FaceApi;
use crate::constants::{ALARM_COLOR, CALM_COLOR};
use crate::{dom, overlay};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use trolley_core::{FrameUpdate, Mood};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[inline]
fn mood_color(mood: Mood) -> &'static str {
    match mood {
        Mood::Alarm => ALARM_COLOR,
        Mood::Calm => CALM_COLOR,
    }
}

/// DOM side of the session: trolley element, page background, overlay.
pub struct Stage {
    pub document: web::Document,
    pub trolley: Option<web::HtmlElement>,
}

impl Stage {
    pub fn place_trolley(&self, session: &WebSession) {
        if let Some(el) = &self.trolley {
            let pos = session.position(dom::element_size(el), dom::viewport_size());
            dom::place(el, pos);
        }
    }

    pub fn apply(&self, update: &FrameUpdate, session: &WebSession) {
        if let Some(mood) = update.mood {
            dom::set_background(&self.document, mood_color(mood));
        }
        if update.moved {
            self.place_trolley(session);
        }
        if update.game_over && overlay::is_hidden(&self.document) {
            overlay::show(&self.document);
        }
    }
}

pub struct FrameContext {
    pub session: Rc<RefCell<WebSession>>,
    pub stage: Rc<Stage>,
    pub classifier: FaceApi,
    pub video: web::HtmlVideoElement,
    pub busy: Cell<bool>,
    pub interval: Cell<Option<i32>>,
}

impl FrameContext {
    pub async fn frame(&self) {
        let started = Instant::now();
        let sample = match self.classifier.sample(&self.video).await {
            Ok(s) => s,
            Err(e) => {
                log::warn!("[frame] detection failed: {:?}", e);
                return;
            }
        };
        let update = self.session.borrow_mut().on_sample(sample);
        self.stage.apply(&update, &self.session.borrow());
        log::trace!(
            "[frame] {:?} -> {:.3} in {:?}",
            sample,
            update.progress.value(),
            started.elapsed()
        );
        if update.game_over {
            self.stop();
        }
    }

    fn stop(&self) {
        if let (Some(id), Some(w)) = (self.interval.take(), web::window()) {
            w.clear_interval_with_handle(id);
            log::info!("[frame] sampler stopped");
        }
    }
}

/// Sample every `interval_ms`; a tick is skipped while the previous one is
/// still waiting on detection.
pub fn start_loop(frame_ctx: Rc<FrameContext>, interval_ms: u32) {
    let ctx_tick = frame_ctx.clone();
    let tick = Closure::wrap(Box::new(move || {
        if ctx_tick.busy.replace(true) {
            return;
        }
        let ctx = ctx_tick.clone();
        spawn_local(async move {
            ctx.frame().await;
            ctx.busy.set(false);
        });
    }) as Box<dyn FnMut()>);
    if let Some(w) = web::window() {
        let ms = interval_ms.min(i32::MAX as u32) as i32;
        match w.set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), ms) {
            Ok(id) => frame_ctx.interval.set(Some(id)),
            Err(e) => log::error!("[frame] setInterval error: {:?}", e),
        }
    }
    tick.forget();
}
