use glam::Vec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Inner window size in CSS pixels; zero when unavailable.
pub fn viewport_size() -> Vec2 {
    let Some(w) = web::window() else {
        return Vec2::ZERO;
    };
    let px = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Vec2::new(px(w.inner_width()), px(w.inner_height()))
}

#[inline]
pub fn element_size(el: &web::Element) -> Vec2 {
    let rect = el.get_bounding_client_rect();
    Vec2::new(rect.width() as f32, rect.height() as f32)
}

pub fn place(el: &web::HtmlElement, pos: Vec2) {
    let style = el.style();
    _ = style.set_property("left", &format!("{}px", pos.x));
    _ = style.set_property("top", &format!("{}px", pos.y));
}

pub fn set_background(document: &web::Document, color: &str) {
    if let Some(body) = document.body() {
        _ = body.style().set_property("background-color", color);
    }
}

pub fn on_resize(mut handler: impl FnMut() + 'static) {
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

/// Call `handler` on every pointer or key press; used to unlock audio.
pub fn on_gesture(document: &web::Document, handler: impl FnMut() + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
    for event in ["pointerdown", "keydown"] {
        _ = document.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

/// Resolve after `ms` milliseconds on the browser timer queue.
pub async fn sleep_ms(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = web::window().and_then(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .ok()
        });
        if scheduled.is_none() {
            _ = resolve.call0(&JsValue::NULL);
        }
    });
    _ = JsFuture::from(promise).await;
}
