use crate::constants::CONFIG_ATTR_PREFIX;
use trolley_core::{TrolleyConfig, OVERRIDE_KEYS};
use web_sys as web;

/// Defaults overridden by `data-*` attributes on `el`; bad values are skipped.
pub fn load(el: Option<&web::Element>) -> TrolleyConfig {
    let mut config = TrolleyConfig::default();
    let Some(el) = el else {
        return config;
    };
    for key in OVERRIDE_KEYS {
        let attr = format!("{}{}", CONFIG_ATTR_PREFIX, key);
        if let Some(value) = el.get_attribute(&attr) {
            match config.apply_override(key, &value) {
                Ok(()) => log::info!("[config] {}={}", key, value),
                Err(e) => log::warn!("[config] ignoring {}: {}", attr, e),
            }
        }
    }
    config
}
