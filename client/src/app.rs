use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use metric_map_shared::{MetricName, SELECTABLE_METRICS};

use crate::api::HttpMetricSource;
use crate::config::MapConfig;
use crate::leaflet::LeafletSurface;
use crate::view::{LazyMount, LoadOutcome, LoadStatus, MetricView, load_metric_data};

type SharedView = Rc<RefCell<MetricView<LeafletSurface>>>;

/// Return the mounted view, creating the Leaflet map on first use.
fn ensure_view(
    slot: &RefCell<LazyMount<SharedView>>,
    container: &web_sys::HtmlElement,
    config: &MapConfig,
) -> Result<SharedView, String> {
    slot.borrow_mut().get_or_mount(|| {
        let surface = LeafletSurface::mount(container, config)?;
        Ok(Rc::new(RefCell::new(MetricView::new(surface))))
    })
}

fn report_outcome(view: &RefCell<MetricView<LeafletSurface>>, outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::Rendered { metric, markers } => {
            web_sys::console::info_1(&format!("metric_load metric={metric} markers={markers}").into());
        }
        LoadOutcome::Failed { metric, error } => {
            let kept = view
                .borrow()
                .displayed_metric()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "no".to_owned());
            let kind = if error.is_request() { "request" } else { "parse" };
            web_sys::console::warn_1(
                &format!("Error loading {metric} data ({kind}): {error} (keeping {kept} markers)")
                    .into(),
            );
        }
        LoadOutcome::Stale { metric } => {
            web_sys::console::info_1(&format!("metric_load_stale metric={metric}").into());
        }
    }
}

fn status_style(status: Option<&LoadStatus>) -> &'static str {
    match status {
        Some(s) if s.is_error() => "font-size: 0.75rem; color: #e07a5f;",
        _ => "font-size: 0.75rem; color: #8a8f98;",
    }
}

/// Metric selector over a full-height Leaflet map.
#[component]
pub fn App() -> impl IntoView {
    let config = MapConfig::from_window();
    let selected: RwSignal<MetricName> = RwSignal::new(config.default_metric);
    let status: RwSignal<Option<LoadStatus>> = RwSignal::new(None);
    let map_ref = NodeRef::<leptos::html::Div>::new();

    let source = Rc::new(HttpMetricSource::new(config.clone()));
    let view_slot: Rc<RefCell<LazyMount<SharedView>>> = Rc::new(RefCell::new(LazyMount::new()));

    // Mount the map once the container exists, then reload on every selection change.
    Effect::new(move || {
        let metric = selected.get();
        let Some(container) = map_ref.get() else {
            return;
        };
        let view = match ensure_view(&view_slot, &container, &config) {
            Ok(view) => view,
            Err(e) => {
                web_sys::console::error_1(&format!("Map initialization failed: {e}").into());
                status.set(Some(LoadStatus::Failed { metric, message: e }));
                return;
            }
        };

        status.set(Some(LoadStatus::Loading(metric)));
        let source = source.clone();
        spawn_local(async move {
            let outcome = load_metric_data(&view, source.as_ref(), metric).await;
            report_outcome(&view, &outcome);
            if let Some(next) = LoadStatus::from_outcome(&outcome) {
                status.set(Some(next));
            }
        });
    });

    let on_change = move |e: leptos::ev::Event| {
        let Some(target) = e.target() else {
            return;
        };
        let Ok(select) = target.dyn_into::<web_sys::HtmlSelectElement>() else {
            return;
        };
        match select.value().parse::<MetricName>() {
            Ok(metric) => selected.set(metric),
            Err(err) => web_sys::console::warn_1(&format!("Ignoring selection: {err}").into()),
        }
    };

    view! {
        <div style="display: flex; flex-direction: column; height: 100vh; font-family: 'Inter', system-ui, sans-serif;">
            <header style="display: flex; align-items: center; gap: 10px; padding: 8px 14px; background: #13151f; border-bottom: 1px solid #282c3e;">
                <label for="metric-select" style="font-size: 0.8rem; color: #9a9590;">"Metric"</label>
                <select
                    id="metric-select"
                    on:change=on_change
                    style="min-width: 140px; background: #1a1d2a; border: 1px solid #282c3e; border-radius: 4px; color: #e2e0d8; font-size: 0.8rem; padding: 4px 6px; outline: none;"
                >
                    {SELECTABLE_METRICS
                        .into_iter()
                        .map(|metric| {
                            view! {
                                <option
                                    value=metric.as_str()
                                    selected=move || selected.get() == metric
                                >
                                    {metric.as_str()}
                                </option>
                            }
                        })
                        .collect::<Vec<_>>()}
                </select>
                <span style=move || status_style(status.get().as_ref())>
                    {move || status.get().map(|s| s.describe()).unwrap_or_default()}
                </span>
            </header>
            <div id="map" node_ref=map_ref style="flex: 1; min-height: 0;"></div>
        </div>
    }
}
