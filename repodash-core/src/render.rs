//! Dashboard operations applied to a `DisplaySurface`
//!
//! Every operation looks its target up first and does nothing when it is
//! missing; a page may carry only some of the dashboard sections.

use crate::chart::{file_types_chart, trend_chart, ChartConfig};
use crate::format::format_value;
use crate::model::{Epic, FileType, SourceFile};
use crate::surface::{
    DisplaySurface, Selector, EPICS_TABLE, FILE_TYPES_CHART, SNAPSHOT_CLASS, SNAPSHOT_ID,
    TOP_FILES_TABLE,
};
use crate::table::{epics_table, top_files_table, EscapeMode, Table};
use crate::view::DashboardView;
use std::fmt::Display;

/// Write a scalar into a card slot, or `"--"` when absent
pub fn set_card<T: Display>(
    surface: &mut dyn DisplaySurface,
    slot_id: &str,
    value: Option<T>,
) -> bool {
    show_text(surface, slot_id, &format_value(value))
}

/// Write the snapshot label into `.snapshot`, falling back to `#snapshot`
pub fn set_snapshot_label(surface: &mut dyn DisplaySurface, label: &str) -> bool {
    let selector = [Selector::Class(SNAPSHOT_CLASS), Selector::Id(SNAPSHOT_ID)]
        .into_iter()
        .find(|s| surface.contains(*s));
    match selector {
        Some(selector) => surface.set_text(selector, label),
        None => {
            tracing::debug!("no snapshot label element, skipping");
            false
        }
    }
}

pub fn render_trend_chart(
    surface: &mut dyn DisplaySurface,
    target_id: &str,
    labels: &[Option<String>],
    values: &[Option<f64>],
    series_name: &str,
) -> bool {
    if labels.len() != values.len() {
        tracing::warn!(
            chart = target_id,
            labels = labels.len(),
            values = values.len(),
            "trend series length differs from its date axis"
        );
    }
    show_chart(surface, target_id, &trend_chart(labels, values, series_name))
}

pub fn render_file_types(surface: &mut dyn DisplaySurface, file_types: &[FileType]) -> bool {
    show_chart(surface, FILE_TYPES_CHART, &file_types_chart(file_types))
}

pub fn render_epics(surface: &mut dyn DisplaySurface, epics: &[Epic], mode: EscapeMode) -> bool {
    show_table(surface, EPICS_TABLE, &epics_table(epics, mode))
}

pub fn render_top_source_files(
    surface: &mut dyn DisplaySurface,
    files: &[SourceFile],
    mode: EscapeMode,
) -> bool {
    show_table(surface, TOP_FILES_TABLE, &top_files_table(files, mode))
}

/// Apply a precomputed view to the surface
///
/// Goes through the same writers as the single-section operations above.
pub fn apply_view(surface: &mut dyn DisplaySurface, view: &DashboardView) {
    set_snapshot_label(surface, &view.snapshot_label);

    for card in &view.cards {
        show_text(surface, card.slot, &card.text);
    }
    for chart in &view.charts {
        show_chart(surface, chart.anchor, &chart.config);
    }
    for table in &view.tables {
        show_table(surface, table.container, &table.table);
    }
}

fn present(surface: &dyn DisplaySurface, selector: Selector<'_>) -> bool {
    let found = surface.contains(selector);
    if !found {
        tracing::debug!(?selector, "display target missing, skipping");
    }
    found
}

fn show_text(surface: &mut dyn DisplaySurface, id: &str, text: &str) -> bool {
    let selector = Selector::Id(id);
    present(surface, selector) && surface.set_text(selector, text)
}

fn show_chart(surface: &mut dyn DisplaySurface, id: &str, chart: &ChartConfig) -> bool {
    let selector = Selector::Id(id);
    present(surface, selector) && surface.attach_chart(selector, chart)
}

fn show_table(surface: &mut dyn DisplaySurface, id: &str, table: &Table) -> bool {
    let selector = Selector::Id(id);
    present(surface, selector) && surface.set_html(selector, &table.to_html())
}
