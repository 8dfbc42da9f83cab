use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled {
        return Ok(());
    }

    if PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

pub(crate) fn record_import(accepted: bool) {
    if accepted {
        metrics::counter!("assessments_imported_total").increment(1);
    } else {
        metrics::counter!("assessment_import_rejected_total").increment(1);
    }
}

pub(crate) fn record_unresolved_answers(view: &'static str, count: usize) {
    if count > 0 {
        metrics::counter!("unresolved_answers_total", "view" => view).increment(count as u64);
    }
}
