#![cfg(target_arch = "wasm32")]
use crate::audio::{WebAudioBackend, WebSession};
use crate::frame::{FrameContext, Stage};
use anyhow::anyhow;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use trolley_core::Session;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod camera;
mod classifier;
mod config;
mod constants;
mod dom;
mod frame;
mod overlay;

fn wire_resize(stage: &Rc<Stage>, session: &Rc<RefCell<WebSession>>) {
    let stage = stage.clone();
    let session = session.clone();
    dom::on_resize(move || stage.place_trolley(&session.borrow()));
}

fn wire_audio_unlock(document: &web::Document, session: &Rc<RefCell<WebSession>>) {
    let session = session.clone();
    dom::on_gesture(document, move || {
        if let Ok(mut s) = session.try_borrow_mut() {
            s.resume_audio();
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("smile-trolley starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow!("no document"))?;

    let trolley: Option<web::HtmlElement> = document
        .query_selector(constants::TROLLEY_SELECTOR)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into().ok());
    if trolley.is_none() {
        log::warn!("[init] no {} element; nothing will move", constants::TROLLEY_SELECTOR);
    }

    let config = config::load(trolley.as_deref());
    let seed = config.seed.unwrap_or_else(rand::random);
    let session: Rc<RefCell<WebSession>> = Rc::new_cyclic(|weak: &Weak<RefCell<WebSession>>| {
        RefCell::new(Session::new(&config, WebAudioBackend::new(weak.clone()), seed))
    });

    let stage = Rc::new(Stage {
        document: document.clone(),
        trolley,
    });
    overlay::hide(&document);
    stage.place_trolley(&session.borrow());
    wire_resize(&stage, &session);
    wire_audio_unlock(&document, &session);

    let video: web::HtmlVideoElement = document
        .get_element_by_id(constants::VIDEO_ID)
        .ok_or_else(|| anyhow!("missing #{}", constants::VIDEO_ID))?
        .dyn_into()
        .map_err(|e| anyhow!(format!("{:?}", e)))?;

    let mut classifier = classifier::FaceApi::from_global()?;
    classifier.load_models(constants::MODEL_URI).await?;
    camera::start_video(&video).await?;
    camera::wait_for_frames(&video).await;

    if config.debug_overlay {
        if let Err(e) = classifier.attach_debug_canvas(&document, &video) {
            log::warn!("[init] debug canvas unavailable: {:?}", e);
        }
    }

    let frame_ctx = Rc::new(FrameContext {
        session,
        stage,
        classifier,
        video,
        busy: Cell::new(false),
        interval: Cell::new(None),
    });
    frame::start_loop(frame_ctx, config.poll_interval_ms);
    log::info!("[init] sampling every {} ms", config.poll_interval_ms);
    Ok(())
}
