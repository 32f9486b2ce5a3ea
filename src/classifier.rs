//! Bindings to the `face-api.js` global.
//!
//! The library is loaded by the page as a plain script, so it is reached
//! through `Reflect` rather than typed externs.

use crate::constants::FACE_API_NETS;
use anyhow::{anyhow, bail};
use js_sys::{Array, Function, Object, Promise, Reflect};
use trolley_core::Sample;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn get(target: &JsValue, key: &str) -> anyhow::Result<JsValue> {
    Reflect::get(target, &JsValue::from_str(key)).map_err(|e| anyhow!("{}: {:?}", key, e))
}

fn call(target: &JsValue, method: &str, args: &[&JsValue]) -> anyhow::Result<JsValue> {
    let f: Function = get(target, method)?
        .dyn_into()
        .map_err(|_| anyhow!("{} is not a function", method))?;
    let argv = Array::new();
    for a in args {
        argv.push(a);
    }
    f.apply(target, &argv)
        .map_err(|e| anyhow!("{}: {:?}", method, e))
}

struct DebugCanvas {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    display: JsValue,
}

/// Reads the first face's "happy" score.
///
/// A detection with no expressions reads as no face at all; a missing
/// happy key reads as zero.
pub fn first_happy(detections: &JsValue) -> Option<Option<f64>> {
    let first = detections.dyn_ref::<Array>()?.get(0);
    if first.is_undefined() || first.is_null() {
        return None;
    }
    let expressions = get(&first, "expressions").ok().filter(|e| e.is_object())?;
    Some(get(&expressions, "happy").ok().and_then(|h| h.as_f64()))
}

pub struct FaceApi {
    api: JsValue,
    options: JsValue,
    debug: Option<DebugCanvas>,
}

impl FaceApi {
    pub fn from_global() -> anyhow::Result<Self> {
        let api = get(&js_sys::global(), "faceapi")?;
        if api.is_undefined() || api.is_null() {
            bail!("face-api.js not loaded; load face-api.min.js before the wasm bundle");
        }
        let ctor: Function = get(&api, "TinyFaceDetectorOptions")?
            .dyn_into()
            .map_err(|_| anyhow!("TinyFaceDetectorOptions is not a constructor"))?;
        let options = Reflect::construct(&ctor, &Array::new())
            .map_err(|e| anyhow!("TinyFaceDetectorOptions: {:?}", e))?;
        Ok(Self {
            api,
            options,
            debug: None,
        })
    }

    pub async fn load_models(&self, uri: &str) -> anyhow::Result<()> {
        let nets = get(&self.api, "nets")?;
        let loads = Array::new();
        for name in FACE_API_NETS {
            let net = get(&nets, name)?;
            loads.push(&call(&net, "loadFromUri", &[&JsValue::from_str(uri)])?);
        }
        JsFuture::from(Promise::all(&loads))
            .await
            .map_err(|e| anyhow!("failed to load models from {}: {:?}", uri, e))?;
        log::info!("[classifier] {} nets loaded from {}", FACE_API_NETS.len(), uri);
        Ok(())
    }

    /// Draw detections, landmarks and expression labels over the video.
    pub fn attach_debug_canvas(
        &mut self,
        document: &web::Document,
        video: &web::HtmlVideoElement,
    ) -> anyhow::Result<()> {
        let media: &JsValue = video.as_ref();
        let canvas: web::HtmlCanvasElement = call(&self.api, "createCanvasFromMedia", &[media])?
            .dyn_into()
            .map_err(|_| anyhow!("createCanvasFromMedia returned a non-canvas"))?;
        document
            .body()
            .ok_or_else(|| anyhow!("no body"))?
            .append_child(&canvas)
            .map_err(|e| anyhow!("append canvas: {:?}", e))?;

        let (w, h) = match (video.width(), video.height()) {
            (0, _) | (_, 0) => (video.video_width(), video.video_height()),
            dims => dims,
        };
        let display = Object::new();
        _ = Reflect::set(&display, &"width".into(), &JsValue::from(w));
        _ = Reflect::set(&display, &"height".into(), &JsValue::from(h));
        let canvas_js: &JsValue = canvas.as_ref();
        let display_js: &JsValue = display.as_ref();
        call(&self.api, "matchDimensions", &[canvas_js, display_js])?;

        let ctx: web::CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|e| anyhow!("getContext: {:?}", e))?
            .ok_or_else(|| anyhow!("no 2d context"))?
            .dyn_into()
            .map_err(|_| anyhow!("not a 2d context"))?;
        self.debug = Some(DebugCanvas {
            canvas,
            ctx,
            display: display.into(),
        });
        Ok(())
    }

    pub async fn sample(&self, video: &web::HtmlVideoElement) -> anyhow::Result<Sample> {
        let media: &JsValue = video.as_ref();
        let task = call(&self.api, "detectAllFaces", &[media, &self.options])?;
        let task = call(&task, "withFaceLandmarks", &[])?;
        let task = call(&task, "withFaceExpressions", &[])?;
        // The task is a thenable, not a Promise.
        let detections = JsFuture::from(Promise::resolve(&task))
            .await
            .map_err(|e| anyhow!("detectAllFaces: {:?}", e))?;
        if let Some(debug) = &self.debug {
            if let Err(e) = self.draw(debug, &detections) {
                log::debug!("[classifier] draw failed: {:?}", e);
            }
        }
        Ok(Sample::from_detection(first_happy(&detections)))
    }

    fn draw(&self, debug: &DebugCanvas, detections: &JsValue) -> anyhow::Result<()> {
        let resized = call(&self.api, "resizeResults", &[detections, &debug.display])?;
        debug.ctx.clear_rect(
            0.0,
            0.0,
            debug.canvas.width() as f64,
            debug.canvas.height() as f64,
        );
        let draw = get(&self.api, "draw")?;
        let canvas: &JsValue = debug.canvas.as_ref();
        for f in ["drawDetections", "drawFaceLandmarks", "drawFaceExpressions"] {
            call(&draw, f, &[canvas, &resized])?;
        }
        Ok(())
    }
}
