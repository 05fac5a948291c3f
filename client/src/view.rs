use std::cell::RefCell;
use std::future::Future;

use metric_map_shared::{LoadError, MarkerSpec, MetricName, MetricRecords};

/// The map widget as seen by [`MetricView`]: it can build a marker layer,
/// put it on the map, and take it off again.
pub trait MapSurface {
    type Layer;

    fn build_layer(&mut self, markers: &[MarkerSpec]) -> Self::Layer;
    fn attach_layer(&mut self, layer: &Self::Layer);
    fn detach_layer(&mut self, layer: &Self::Layer);
}

/// Where metric payloads come from. Resolves to the raw response body.
pub trait MetricSource {
    fn fetch(&self, metric: MetricName) -> impl Future<Output = Result<String, LoadError>>;
}

/// Identifies one issued load. Only the most recently issued token may
/// touch the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    seq: u64,
    metric: MetricName,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Rendered { metric: MetricName, markers: usize },
    Failed { metric: MetricName, error: LoadError },
    Stale { metric: MetricName },
}

/// What the status line next to the selector shows.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading(MetricName),
    Ready { metric: MetricName, markers: usize },
    Failed { metric: MetricName, message: String },
}

impl LoadStatus {
    /// `None` for stale outcomes: they must not overwrite the status of a newer load.
    pub fn from_outcome(outcome: &LoadOutcome) -> Option<Self> {
        match outcome {
            LoadOutcome::Rendered { metric, markers } => Some(LoadStatus::Ready {
                metric: *metric,
                markers: *markers,
            }),
            LoadOutcome::Failed { metric, error } => Some(LoadStatus::Failed {
                metric: *metric,
                message: error.to_string(),
            }),
            LoadOutcome::Stale { .. } => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            LoadStatus::Loading(metric) => format!("Loading {metric}…"),
            LoadStatus::Ready { markers: 1, .. } => "1 company".to_owned(),
            LoadStatus::Ready { markers, .. } => format!("{markers} companies"),
            LoadStatus::Failed { metric, .. } => format!("Could not load {metric} data"),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadStatus::Failed { .. })
    }
}

/// Owns the map surface and the marker layer currently on it.
pub struct MetricView<S: MapSurface> {
    surface: S,
    current_layer: Option<S::Layer>,
    displayed: Option<MetricName>,
    latest_request: u64,
}

impl<S: MapSurface> MetricView<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            current_layer: None,
            displayed: None,
            latest_request: 0,
        }
    }

    pub fn begin_load(&mut self, metric: MetricName) -> RequestToken {
        self.latest_request = self.latest_request.wrapping_add(1);
        RequestToken {
            seq: self.latest_request,
            metric,
        }
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.seq == self.latest_request
    }

    /// Apply a fetched response. Stale tokens are dropped untouched; failures
    /// leave the current layer on the map.
    pub fn finish_load(
        &mut self,
        token: RequestToken,
        response: Result<String, LoadError>,
    ) -> LoadOutcome {
        let metric = token.metric;
        if !self.is_current(token) {
            return LoadOutcome::Stale { metric };
        }

        let records = match response.and_then(|body| MetricRecords::decode(metric, &body)) {
            Ok(records) => records,
            Err(error) => return LoadOutcome::Failed { metric, error },
        };

        self.replace_layer(&records.markers());
        self.displayed = Some(records.metric());
        LoadOutcome::Rendered {
            metric: records.metric(),
            markers: records.len(),
        }
    }

    fn replace_layer(&mut self, markers: &[MarkerSpec]) {
        let layer = self.surface.build_layer(markers);
        if let Some(previous) = self.current_layer.take() {
            self.surface.detach_layer(&previous);
        }
        self.surface.attach_layer(&layer);
        self.current_layer = Some(layer);
    }

    pub fn displayed_metric(&self) -> Option<MetricName> {
        self.displayed
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

/// Holds a lazily created value whose construction may fail. A failed
/// attempt leaves the slot empty so the next caller tries again.
pub struct LazyMount<V> {
    mounted: Option<V>,
}

impl<V: Clone> LazyMount<V> {
    pub fn new() -> Self {
        Self { mounted: None }
    }

    pub fn get_or_mount<E>(&mut self, mount: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        if let Some(value) = &self.mounted {
            return Ok(value.clone());
        }
        let value = mount()?;
        self.mounted = Some(value.clone());
        Ok(value)
    }
}

/// Fetch `metric` and swap the marker layer if this is still the latest
/// request once the response arrives. Never panics on bad responses.
pub async fn load_metric_data<S, M>(
    view: &RefCell<MetricView<S>>,
    source: &M,
    metric: MetricName,
) -> LoadOutcome
where
    S: MapSurface,
    M: MetricSource,
{
    let token = view.borrow_mut().begin_load(metric);
    let response = source.fetch(metric).await;
    view.borrow_mut().finish_load(token, response)
}
