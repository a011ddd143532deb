//! End-to-end orchestration: acquire a fix, fetch, cache, present.
//!
//! The pipeline runs once at startup and again on every explicit refresh.
//! Data flows strictly one way; nothing is shared between runs except the
//! cached payload, which is replaced wholesale on success.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::cache::WeatherCache;
use crate::error::PipelineError;
use crate::location::LocationAcquirer;
use crate::present::{DisplayModel, WeatherPresenter};
use crate::provider::WeatherProvider;

/// Clears the in-flight flag even when the refresh future is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// One pipeline per screen. Refresh restarts it from the location step.
pub struct WeatherPipeline {
    acquirer: LocationAcquirer,
    provider: WeatherProvider,
    cache: Mutex<WeatherCache>,
    presenter: WeatherPresenter,
    in_flight: AtomicBool,
}

impl WeatherPipeline {
    pub fn new(
        acquirer: LocationAcquirer,
        provider: WeatherProvider,
        cache: WeatherCache,
        presenter: WeatherPresenter,
    ) -> Self {
        Self {
            acquirer,
            provider,
            cache: Mutex::new(cache),
            presenter,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Present whatever the cache holds. `None` means nothing to show yet.
    ///
    /// Cache read failures are logged and presented as nothing-yet; the
    /// screen stays blank rather than showing an error for a cold cache.
    pub fn cached(&self) -> Option<DisplayModel> {
        let cache = self.cache.lock();
        match cache.load() {
            Ok(Some(record)) => Some(self.presenter.present(&record)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read weather cache: {}", e);
                None
            }
        }
    }

    /// Run the full pipeline once.
    ///
    /// A refresh issued while another is in flight is ignored and reports
    /// `RefreshInProgress` without touching the network. On any failure the
    /// previously cached record remains in place for `cached()` to serve.
    pub async fn refresh(&self) -> Result<DisplayModel, PipelineError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::info!("Refresh already in progress, ignoring");
            return Err(PipelineError::RefreshInProgress);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let coordinate = self.acquirer.acquire().await?;
        let record = self.provider.fetch(&coordinate).await?;

        if let Err(e) = self.cache.lock().save(&record) {
            tracing::warn!("Failed to save weather cache: {}", e);
        }

        Ok(self.presenter.present(&record))
    }
}
