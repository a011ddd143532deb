//! Location acquisition: permission gating plus a single best-effort fix.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::LocationError;
use crate::types::Coordinate;

/// Aggregate outcome of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    /// Every requested permission was granted.
    Granted,
    /// At least one permission is permanently denied; only the user can
    /// undo that from the system settings.
    PermanentlyDenied,
    /// The platform asks for a rationale before the permission can be
    /// requested again.
    ShouldShowRationale,
}

/// Platform permission collaborator.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Request the location permissions and report the aggregate outcome.
    async fn request(&self) -> PermissionOutcome;

    /// Explain why the permission is needed. Implementations typically show
    /// a rationale dialog with a settings deeplink.
    async fn explain_rationale(&self);
}

/// Platform location-service collaborator.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Whether at least one location provider (GPS or network) is active.
    fn is_enabled(&self) -> bool;

    /// Wait for the next high-accuracy fix. The first fix completes the
    /// acquisition; no averaging, no accuracy threshold.
    async fn next_fix(&self) -> Result<Coordinate, LocationError>;
}

/// Obtains one coordinate, checking service state and permissions first.
pub struct LocationAcquirer {
    source: Arc<dyn LocationSource>,
    permissions: Arc<dyn PermissionGate>,
    fix_timeout: Duration,
}

impl LocationAcquirer {
    pub fn new(
        source: Arc<dyn LocationSource>,
        permissions: Arc<dyn PermissionGate>,
        fix_timeout: Duration,
    ) -> Self {
        Self {
            source,
            permissions,
            fix_timeout,
        }
    }

    /// Acquire a single coordinate.
    ///
    /// Fails fast when the location service is disabled or permission is
    /// permanently denied; on a rationale request it explains once and
    /// re-requests. The fix itself is bounded by the configured timeout.
    pub async fn acquire(&self) -> Result<Coordinate, LocationError> {
        if !self.source.is_enabled() {
            tracing::warn!("Location providers are disabled");
            return Err(LocationError::Disabled);
        }

        match self.permissions.request().await {
            PermissionOutcome::Granted => {}
            PermissionOutcome::PermanentlyDenied => {
                tracing::warn!("Location permission permanently denied");
                return Err(LocationError::PermissionDenied);
            }
            PermissionOutcome::ShouldShowRationale => {
                self.permissions.explain_rationale().await;
                if self.permissions.request().await != PermissionOutcome::Granted {
                    tracing::warn!("Location permission denied after rationale");
                    return Err(LocationError::PermissionDenied);
                }
            }
        }

        let timeout_secs = self.fix_timeout.as_secs();
        match tokio::time::timeout(self.fix_timeout, self.source.next_fix()).await {
            Ok(fix) => {
                let coordinate = fix?;
                tracing::info!(
                    "Got location fix: {}, {}",
                    coordinate.latitude,
                    coordinate.longitude
                );
                Ok(coordinate)
            }
            Err(_) => {
                tracing::warn!("Location fix timed out after {}s", timeout_secs);
                Err(LocationError::Timeout(timeout_secs))
            }
        }
    }
}

/// Fixed-coordinate source for hosts without a positioning service.
pub struct StaticSource {
    coordinate: Coordinate,
}

impl StaticSource {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

#[async_trait]
impl LocationSource for StaticSource {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn next_fix(&self) -> Result<Coordinate, LocationError> {
        Ok(self.coordinate)
    }
}

/// Permission gate for hosts without a runtime permission prompt.
pub struct AlwaysGranted;

#[async_trait]
impl PermissionGate for AlwaysGranted {
    async fn request(&self) -> PermissionOutcome {
        PermissionOutcome::Granted
    }

    async fn explain_rationale(&self) {}
}
