//! HTTP transports for the leaderboard
//!
//! `WebTransport` uses the browser's `fetch` on detached futures;
//! `HttpTransport` makes blocking `ureq` calls for the native build.

use super::{Endpoint, LeaderboardError, Rankings, ScoreSubmission};

/// Callback invoked once a request finishes
pub type Completion<T> = Box<dyn FnOnce(Result<T, LeaderboardError>)>;

/// Moves leaderboard requests over the wire
///
/// Implementations may complete on a later event-loop turn; callers must not
/// hold borrows of game state inside the completion.
pub trait ScoreTransport {
    fn submit(&self, submission: ScoreSubmission, done: Completion<()>);
    fn fetch_rankings(&self, limit: usize, done: Completion<Rankings>);
}

#[cfg(target_arch = "wasm32")]
pub use web::WebTransport;

#[cfg(not(target_arch = "wasm32"))]
pub use native::HttpTransport;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, Response};

    use super::*;

    /// `fetch`-backed transport
    #[derive(Debug, Clone)]
    pub struct WebTransport {
        endpoint: Endpoint,
    }

    impl WebTransport {
        pub fn new(endpoint: Endpoint) -> Self {
            Self { endpoint }
        }
    }

    fn js_error(value: JsValue) -> LeaderboardError {
        LeaderboardError::Network(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }

    /// Perform a request and return the response body as text
    async fn fetch_text(
        method: &str,
        url: &str,
        body: Option<String>,
    ) -> Result<String, LeaderboardError> {
        let window = web_sys::window()
            .ok_or_else(|| LeaderboardError::Network("no window".to_string()))?;

        let opts = RequestInit::new();
        opts.set_method(method);
        if let Some(body) = body {
            opts.set_body(&JsValue::from_str(&body));
        }

        let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;

        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;

        if !response.ok() {
            return Err(LeaderboardError::Status(response.status()));
        }

        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        text.as_string()
            .ok_or_else(|| LeaderboardError::Decode("body is not text".to_string()))
    }

    impl ScoreTransport for WebTransport {
        fn submit(&self, submission: ScoreSubmission, done: Completion<()>) {
            let body = match serde_json::to_string(&submission) {
                Ok(body) => body,
                Err(e) => return done(Err(LeaderboardError::Decode(e.to_string()))),
            };
            let url = self.endpoint.scores_url();
            wasm_bindgen_futures::spawn_local(async move {
                let result = fetch_text("POST", &url, Some(body)).await.map(|_| ());
                done(result);
            });
        }

        fn fetch_rankings(&self, limit: usize, done: Completion<Rankings>) {
            let url = self.endpoint.rankings_url(limit);
            wasm_bindgen_futures::spawn_local(async move {
                let result = fetch_text("GET", &url, None).await.and_then(|text| {
                    Rankings::from_json(&text).map_err(|e| LeaderboardError::Decode(e.to_string()))
                });
                done(result);
            });
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;
    use crate::leaderboard::LeaderboardEntry;

    /// Blocking `ureq` transport; completions run before the call returns
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        endpoint: Endpoint,
    }

    impl HttpTransport {
        pub fn new(endpoint: Endpoint) -> Self {
            Self { endpoint }
        }
    }

    fn map_error(e: ureq::Error) -> LeaderboardError {
        match e {
            ureq::Error::Status(code, _) => LeaderboardError::Status(code),
            ureq::Error::Transport(t) => LeaderboardError::Network(t.to_string()),
        }
    }

    impl ScoreTransport for HttpTransport {
        fn submit(&self, submission: ScoreSubmission, done: Completion<()>) {
            let result = ureq::post(&self.endpoint.scores_url())
                .set("User-Agent", "fall-dodge")
                .send_json(&submission)
                .map(|_| ())
                .map_err(map_error);
            done(result);
        }

        fn fetch_rankings(&self, limit: usize, done: Completion<Rankings>) {
            let result = ureq::get(&self.endpoint.rankings_url(limit))
                .set("User-Agent", "fall-dodge")
                .call()
                .map_err(map_error)
                .and_then(|response| {
                    response
                        .into_json::<Vec<LeaderboardEntry>>()
                        .map(Rankings::from_entries)
                        .map_err(|e| LeaderboardError::Decode(e.to_string()))
                });
            done(result);
        }
    }
}
