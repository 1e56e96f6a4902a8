//! Transient user-visible messages

/// How long a toast stays on screen
pub const TOAST_DURATION_MS: i32 = 2500;

/// Something that can flash a short message at the player
pub trait Notifier {
    fn show(&self, message: &str);
}

/// Writes messages to the log (native builds and tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, message: &str) {
        log::info!("[notice] {}", message);
    }
}

/// Toast element appended to `<body>`, removed after [`TOAST_DURATION_MS`]
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct DomNotifier;

#[cfg(target_arch = "wasm32")]
impl Notifier for DomNotifier {
    fn show(&self, message: &str) {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        log::info!("[notice] {}", message);

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(body) = document.body() else {
            return;
        };
        let Ok(toast) = document.create_element("div") else {
            return;
        };
        toast.set_class_name("toast");
        toast.set_text_content(Some(message));
        if body.append_child(&toast).is_err() {
            return;
        }

        let remove = Closure::once(move || toast.remove());
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            remove.as_ref().unchecked_ref(),
            TOAST_DURATION_MS,
        );
        remove.forget();
    }
}

/// Collects messages for assertions
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub messages: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn show(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
