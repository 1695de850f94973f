//! Observable state for weather lookups.
//!
//! [`WeatherStore::fetch`] publishes [`WeatherResult::Loading`] before it
//! returns, then settles the lookup on a tokio task. Overlapping fetches are
//! not coordinated: whichever request settles last owns the final state.

use std::sync::Arc;

use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    api::WeatherApi,
    result::{FETCH_FAILED, UNKNOWN_ERROR, WeatherResult},
};

/// Capacity of the transition log; slow observers past this see `Lagged`.
const TRANSITION_BUFFER: usize = 64;

#[derive(Debug)]
pub struct WeatherStore {
    api: Arc<dyn WeatherApi>,
    state: Arc<watch::Sender<Option<WeatherResult>>>,
    transitions: broadcast::Sender<WeatherResult>,
    cancel: CancellationToken,
}

impl WeatherStore {
    pub fn new(api: impl WeatherApi + 'static) -> Self {
        Self::with_api(Arc::new(api))
    }

    pub fn with_api(api: Arc<dyn WeatherApi>) -> Self {
        let (state, _) = watch::channel(None);
        let (transitions, _) = broadcast::channel(TRANSITION_BUFFER);

        Self { api, state: Arc::new(state), transitions, cancel: CancellationToken::new() }
    }

    /// Start a lookup for `city`, exactly as typed.
    ///
    /// `Loading` is visible to every observer by the time this returns. The
    /// terminal state is published from a spawned task; the handle can be
    /// awaited or dropped. Must be called from within a tokio runtime.
    pub fn fetch(&self, city: impl Into<String>) -> JoinHandle<()> {
        let city = city.into();
        publish(&self.state, &self.transitions, WeatherResult::Loading);

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let transitions = self.transitions.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(city = %city, "store closed, dropping in-flight lookup");
                    return;
                }
                result = resolve(api.as_ref(), &city) => result,
            };

            match &result {
                WeatherResult::Success(model) => {
                    info!(city = %city, location = %model.location.name, "weather lookup succeeded")
                }
                WeatherResult::Error(message) => info!(city = %city, %message, "weather lookup failed"),
                WeatherResult::Loading => {}
            }
            publish(&state, &transitions, result);
        })
    }

    /// Latest state; `None` before the first fetch.
    pub fn current(&self) -> Option<WeatherResult> {
        self.state.borrow().clone()
    }

    /// Latest-value observation. Intermediate states may be skipped by a
    /// receiver that isn't polling; use [`Self::transitions`] to see all.
    pub fn subscribe(&self) -> watch::Receiver<Option<WeatherResult>> {
        self.state.subscribe()
    }

    /// Every state published after this call, in order.
    pub fn transitions(&self) -> broadcast::Receiver<WeatherResult> {
        self.transitions.subscribe()
    }

    /// Tear down: lookups still in flight finish without publishing.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Map one capability call onto its terminal state.
pub async fn resolve(api: &dyn WeatherApi, city: &str) -> WeatherResult {
    match api.current(city).await {
        Ok(response) if response.is_success() => match response.body {
            Some(model) => WeatherResult::Success(model),
            None => WeatherResult::error(FETCH_FAILED),
        },
        Ok(response) => {
            debug!(city, status = response.status, "unsuccessful response");
            WeatherResult::error(FETCH_FAILED)
        }
        Err(err) => WeatherResult::Error(
            err.message.filter(|m| !m.is_empty()).unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        ),
    }
}

fn publish(
    state: &watch::Sender<Option<WeatherResult>>,
    transitions: &broadcast::Sender<WeatherResult>,
    result: WeatherResult,
) {
    // Sending under the watch lock keeps both channels in the same order.
    state.send_modify(|slot| {
        // No receivers is fine.
        let _ = transitions.send(result.clone());
        *slot = Some(result);
    });
}
