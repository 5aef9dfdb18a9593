//! Analytics events as structured log records.

use tracing::info;

use wayfinder_core::{AnalyticsEvent, AnalyticsSink};

/// Log target of analytics records.
pub const ANALYTICS_TARGET: &str = "wayfinder::analytics";

/// [`AnalyticsSink`] that writes each event to `tracing` under
/// [`ANALYTICS_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn track(&self, event: &AnalyticsEvent) {
        info!(
            target: ANALYTICS_TARGET,
            setting = %event.setting,
            value = %event.value,
            latitude = event.coordinate.latitude,
            longitude = event.coordinate.longitude,
            "settings change"
        );
    }
}
