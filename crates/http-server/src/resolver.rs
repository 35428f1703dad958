//! Read-time widget resolution.
//!
//! Widgets are stored as configuration and resolved against live data when a
//! dashboard is read. Resolution failures degrade the affected widget to its
//! stored form; they never abort the dashboard read.

use store::{Dashboard, DocumentStore, Widget, WidgetType};
use tracing::warn;

/// How many recent completed reports a chart widget pulls in
const CHART_REPORT_LIMIT: usize = 10;

/// Resolves every widget on the dashboard, in stored order.
pub fn resolve_widgets(store: &DocumentStore, dashboard: &Dashboard) -> Vec<Widget> {
    dashboard
        .widgets
        .iter()
        .map(|widget| resolve_widget(store, dashboard, widget))
        .collect()
}

fn resolve_widget(store: &DocumentStore, dashboard: &Dashboard, widget: &Widget) -> Widget {
    match widget.kind {
        WidgetType::Chart => chart_with_reports(store, dashboard, widget),
        // The remaining kinds render from their stored data as-is
        WidgetType::Table | WidgetType::Metric | WidgetType::Timeline | WidgetType::Map => {
            widget.clone()
        }
    }
}

/// Chart widgets get the team's most recent completed reports merged into
/// their data under `reports`. Stored keys survive; a stale `reports` key is
/// replaced by the live set.
fn chart_with_reports(store: &DocumentStore, dashboard: &Dashboard, widget: &Widget) -> Widget {
    let reports = store.recent_completed_reports(&dashboard.team, CHART_REPORT_LIMIT);

    let mut resolved = widget.clone();
    match serde_json::to_value(&reports) {
        Ok(value) => {
            resolved.data.insert("reports".to_string(), value);
        }
        Err(e) => {
            warn!(
                "Failed to resolve chart widget '{}' on dashboard {}: {}",
                widget.title, dashboard.id, e
            );
        }
    }
    resolved
}
