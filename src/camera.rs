use crate::constants::{LEGACY_GET_USER_MEDIA, VIDEO_READY_POLL_MS};
use crate::dom;
use anyhow::anyhow;
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn video_constraints() -> web::MediaStreamConstraints {
    let constraints = web::MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);
    constraints
}

fn has_media_devices(navigator: &web::Navigator) -> bool {
    Reflect::get(navigator, &JsValue::from_str("mediaDevices"))
        .ok()
        .filter(|d| d.is_object())
        .and_then(|d| Reflect::get(&d, &JsValue::from_str("getUserMedia")).ok())
        .is_some_and(|f| f.is_function())
}

/// Wrap the callback-style `navigator.getUserMedia` (or a prefixed variant)
/// in a promise.
pub fn legacy_request(navigator: &web::Navigator) -> anyhow::Result<Promise> {
    let nav: &JsValue = navigator.as_ref();
    let legacy: Function = LEGACY_GET_USER_MEDIA
        .iter()
        .find_map(|name| {
            Reflect::get(nav, &JsValue::from_str(name))
                .ok()
                .and_then(|f| f.dyn_into::<Function>().ok())
        })
        .ok_or_else(|| anyhow!("getUserMedia not supported"))?;
    let constraints = video_constraints();
    Ok(Promise::new(&mut |resolve, reject| {
        if let Err(e) = legacy.call3(nav, &constraints, &resolve, &reject) {
            _ = reject.call1(&JsValue::NULL, &e);
        }
    }))
}

fn request_stream(navigator: &web::Navigator) -> anyhow::Result<Promise> {
    if !has_media_devices(navigator) {
        log::info!("[camera] mediaDevices missing; trying legacy getUserMedia");
        return legacy_request(navigator);
    }
    navigator
        .media_devices()
        .and_then(|devices| devices.get_user_media_with_constraints(&video_constraints()))
        .map_err(|e| anyhow!("getUserMedia error: {:?}", e))
}

/// Ask for the camera and stream it into `video`.
pub async fn start_video(video: &web::HtmlVideoElement) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let request = request_stream(&window.navigator())?;
    let stream: web::MediaStream = JsFuture::from(request)
        .await
        .map_err(|e| anyhow!("camera unavailable or denied: {:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow!("not a MediaStream: {:?}", e))?;
    video.set_src_object(Some(&stream));
    if let Ok(p) = video.play() {
        if let Err(e) = JsFuture::from(p).await {
            log::warn!("[camera] video.play rejected: {:?}", e);
        }
    }
    log::info!("[camera] stream attached");
    Ok(())
}

/// Wait until the video reports real frame dimensions.
pub async fn wait_for_frames(video: &web::HtmlVideoElement) {
    while video.video_width() == 0 || video.video_height() == 0 {
        dom::sleep_ms(VIDEO_READY_POLL_MS).await;
    }
    log::info!(
        "[camera] frames ready {}x{}",
        video.video_width(),
        video.video_height()
    );
}
