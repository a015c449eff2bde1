//! repodash core library - static dashboard for repository metrics snapshots

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Input documents are read-only; nothing is mutated after load
// - Every input field is optional and absence renders as a placeholder
// - A missing display target is skipped, never created
// - Rendering the same input twice yields identical output

pub mod chart;
pub mod config;
pub mod format;
pub mod loader;
pub mod model;
pub mod render;
pub mod surface;
pub mod table;
pub mod view;

pub use config::ResolvedConfig;
pub use loader::{load_data, DataSource};
pub use model::{History, Snapshot};
pub use surface::{DisplaySurface, HtmlPage};
pub use view::{DashboardView, RenderOptions};

use anyhow::Result;

/// Run one render pass against already-loaded data
pub fn render_dashboard(
    snapshot: &Snapshot,
    history: &History,
    surface: &mut dyn DisplaySurface,
    options: &RenderOptions,
) -> DashboardView {
    for mismatch in history.check_alignment() {
        tracing::warn!(
            series = mismatch.series,
            len = mismatch.len,
            dates = mismatch.dates,
            "history series length differs from dates"
        );
    }

    let view = DashboardView::build(snapshot, history, options);
    render::apply_view(surface, &view);
    view
}

/// Load both documents, then render them onto the surface
///
/// A load failure returns before anything is written to the surface.
pub async fn initialize(
    source: &DataSource,
    surface: &mut dyn DisplaySurface,
    options: &RenderOptions,
) -> Result<DashboardView> {
    let (snapshot, history) = load_data(source).await?;
    Ok(render_dashboard(&snapshot, &history, surface, options))
}
