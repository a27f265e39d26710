use anyhow::{anyhow, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus recorder globally and store the handle.
///
/// Installing twice is an error surfaced to the caller; the recorder is
/// process-global state and only `create()` is supposed to reach it.
pub fn init_metrics() -> Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|err| anyhow!("failed to install Prometheus recorder: {err}"))?;

    HANDLE
        .set(handle)
        .map_err(|_| anyhow!("metrics recorder already initialized"))
}

/// Render the current metrics in Prometheus text format.
///
/// Renders empty output when the recorder was never installed, which only
/// happens if construction was bypassed.
pub fn render_metrics() -> String {
    HANDLE.get().map(PrometheusHandle::render).unwrap_or_default()
}
