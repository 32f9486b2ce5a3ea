use crate::constants::{GAME_OVER_ID, GAME_OVER_STYLE, GAME_OVER_TEXT, HIDDEN_CLASS};
use web_sys as web;

fn ensure(document: &web::Document) -> Option<web::Element> {
    if let Some(el) = document.get_element_by_id(GAME_OVER_ID) {
        return Some(el);
    }
    let el = document.create_element("div").ok()?;
    el.set_id(GAME_OVER_ID);
    el.set_text_content(Some(GAME_OVER_TEXT));
    _ = el.class_list().add_1(HIDDEN_CLASS);
    _ = el.set_attribute("style", "display:none");
    document.body()?.append_child(&el).ok()?;
    log::info!("[overlay] created #{}", GAME_OVER_ID);
    Some(el)
}

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = ensure(document) {
        _ = el.class_list().remove_1(HIDDEN_CLASS);
        _ = el.set_attribute("style", GAME_OVER_STYLE);
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(GAME_OVER_ID) {
        _ = el.class_list().add_1(HIDDEN_CLASS);
        _ = el.set_attribute("style", "display:none");
    }
}

#[inline]
pub fn is_hidden(document: &web::Document) -> bool {
    let Some(el) = document.get_element_by_id(GAME_OVER_ID) else {
        return true;
    };
    if el.class_list().contains(HIDDEN_CLASS) {
        return true;
    }
    el.get_attribute("style")
        .map(|s| s.contains("display:none"))
        .unwrap_or(false)
}
