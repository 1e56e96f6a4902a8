//! JSON values in LocalStorage
//!
//! Native builds have no persistent store: loads return `None` and saves are
//! dropped, so callers fall back to their defaults.

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Read and deserialize a value; `None` if absent or unparseable
#[cfg(target_arch = "wasm32")]
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = local_storage()?.get_item(key).ok()??;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Discarding unreadable `{}`: {}", key, e);
            None
        }
    }
}

/// Serialize and store a value, logging failures
#[cfg(target_arch = "wasm32")]
pub fn save_json<T: Serialize>(key: &str, value: &T) {
    let Some(storage) = local_storage() else {
        log::warn!("LocalStorage unavailable, `{}` not saved", key);
        return;
    };
    match serde_json::to_string(value) {
        Ok(json) => {
            if storage.set_item(key, &json).is_err() {
                log::warn!("LocalStorage rejected `{}`", key);
            }
        }
        Err(e) => log::error!("Failed to serialize `{}`: {}", key, e),
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load_json<T: DeserializeOwned>(_key: &str) -> Option<T> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_json<T: Serialize>(key: &str, _value: &T) {
    log::debug!("No persistent storage on native, `{}` not saved", key);
}
