//! Background request jobs to keep the UI thread responsive.
//!
//! A job performs one blocking GET on its own thread, decodes the body, and
//! posts the result back to the event loop through an unbounded channel.
//! Nothing is written to view state from the job thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::mpsc;

use crate::core::{error::FetchError, transport::Transport};

/// Shared handle to whatever transport the app was built with.
pub type SharedTransport = Arc<dyn Transport>;

/// Spawn a GET of `url`, decode the body as `T`, and send `wrap(result)`
/// through `tx`.
///
/// When `cancel` is set before the response is decoded, nothing is sent.
pub fn spawn_json_get<T, M, F>(
    transport: SharedTransport,
    url: String,
    cancel: Arc<AtomicBool>,
    tx: mpsc::UnboundedSender<M>,
    wrap: F,
) where
    T: DeserializeOwned + 'static,
    M: Send + 'static,
    F: FnOnce(Result<T, FetchError>) -> M + Send + 'static,
{
    std::thread::spawn(move || {
        let result = get_json::<T>(transport.as_ref(), &url);
        if cancel.load(Ordering::Relaxed) {
            tracing::debug!("dropping response for {url}: owner torn down");
            return;
        }
        let _ = tx.send(wrap(result));
    });
}

/// Blocking GET + JSON decode.
pub fn get_json<T: DeserializeOwned>(transport: &dyn Transport, url: &str) -> Result<T, FetchError> {
    let body = transport.get(url)?;
    Ok(serde_json::from_slice(&body)?)
}
