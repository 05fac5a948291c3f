use std::future::Future;

use metric_map_shared::{LoadError, MetricName};

use crate::config::MapConfig;
use crate::view::MetricSource;

/// Fetches `/api/metric/{metric}` from the configured backend.
#[derive(Debug, Clone)]
pub struct HttpMetricSource {
    config: MapConfig,
}

impl HttpMetricSource {
    pub fn new(config: MapConfig) -> Self {
        Self { config }
    }
}

impl MetricSource for HttpMetricSource {
    fn fetch(&self, metric: MetricName) -> impl Future<Output = Result<String, LoadError>> {
        let url = self.config.metric_url(metric);
        async move {
            let resp = gloo_net::http::Request::get(&url)
                .send()
                .await
                .map_err(|e| LoadError::Transport(e.to_string()))?;

            if !resp.ok() {
                return Err(LoadError::Status(resp.status()));
            }

            resp.text()
                .await
                .map_err(|e| LoadError::Transport(format!("reading body: {e}")))
        }
    }
}
