//! Pure computation of everything the dashboard displays
//!
//! `DashboardView::build` never touches a display surface; `render` applies a
//! view to one. Keeping the two apart lets the CLI print the view as JSON and
//! lets tests assert on formatted strings instead of markup.

use crate::chart::{file_types_chart, trend_chart, ChartConfig};
use crate::format::{coverage_text, format_value, snapshot_label};
use crate::model::{History, Snapshot};
use crate::surface::{
    COMMITS_CHART, COVERAGE, EPICS_TABLE, FILE_TYPES_CHART, LOC_CHART, TESTS_CHART, TEST_FILES,
    TOP_FILES_TABLE, TOTAL_LOC,
};
use crate::table::{epics_table, top_files_table, EscapeMode, Table};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderOptions {
    pub escape_mode: EscapeMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub slot: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub anchor: &'static str,
    pub config: ChartConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub container: &'static str,
    pub table: Table,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub snapshot_label: String,
    pub cards: Vec<CardView>,
    pub charts: Vec<ChartView>,
    pub tables: Vec<TableView>,
}

impl DashboardView {
    pub fn build(snapshot: &Snapshot, history: &History, options: &RenderOptions) -> Self {
        let cards = vec![
            CardView {
                slot: TOTAL_LOC,
                text: format_value(snapshot.loc_total),
            },
            CardView {
                slot: TEST_FILES,
                text: format_value(snapshot.test_files),
            },
            CardView {
                slot: COVERAGE,
                text: coverage_text(snapshot.coverage.as_ref()),
            },
        ];

        let charts = vec![
            ChartView {
                anchor: COMMITS_CHART,
                config: trend_chart(&history.dates, &history.commits, "Commits"),
            },
            ChartView {
                anchor: LOC_CHART,
                config: trend_chart(&history.dates, &history.loc, "LOC"),
            },
            ChartView {
                anchor: TESTS_CHART,
                config: trend_chart(&history.dates, &history.tests, "Test Files"),
            },
            ChartView {
                anchor: FILE_TYPES_CHART,
                config: file_types_chart(&snapshot.file_types),
            },
        ];

        let tables = vec![
            TableView {
                container: EPICS_TABLE,
                table: epics_table(&snapshot.epics, options.escape_mode),
            },
            TableView {
                container: TOP_FILES_TABLE,
                table: top_files_table(&snapshot.source_files, options.escape_mode),
            },
        ];

        DashboardView {
            snapshot_label: snapshot_label(snapshot.snapshot_date.as_deref()),
            cards,
            charts,
            tables,
        }
    }

    pub fn card(&self, slot: &str) -> Option<&str> {
        self.cards
            .iter()
            .find(|c| c.slot == slot)
            .map(|c| c.text.as_str())
    }

    pub fn chart(&self, anchor: &str) -> Option<&ChartConfig> {
        self.charts
            .iter()
            .find(|c| c.anchor == anchor)
            .map(|c| &c.config)
    }

    pub fn table(&self, container: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.container == container)
            .map(|t| &t.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coverage, Epic, SourceFile};

    #[test]
    fn test_empty_inputs_degrade_to_placeholders() {
        let view = DashboardView::build(
            &Snapshot::default(),
            &History::default(),
            &RenderOptions::default(),
        );
        assert_eq!(view.snapshot_label, "Snapshot: unavailable");
        assert_eq!(view.card(TOTAL_LOC), Some("--"));
        assert_eq!(view.card(TEST_FILES), Some("--"));
        assert_eq!(view.card(COVERAGE), Some("N/A"));
        for anchor in [COMMITS_CHART, LOC_CHART, TESTS_CHART, FILE_TYPES_CHART] {
            assert!(view.chart(anchor).unwrap().points().is_empty());
        }
        assert!(view.table(EPICS_TABLE).unwrap().rows.is_empty());
        assert!(view.table(TOP_FILES_TABLE).unwrap().rows.is_empty());
    }

    #[test]
    fn test_coverage_shapes_render_the_same() {
        let options = RenderOptions::default();
        let history = History::default();
        let bare = Snapshot {
            coverage: Some(Coverage::Rate(0.5)),
            ..Default::default()
        };
        let record = Snapshot {
            coverage: Some(Coverage::Detailed {
                line_rate: Some(0.5),
                branch_rate: None,
            }),
            ..Default::default()
        };
        assert_eq!(
            DashboardView::build(&bare, &history, &options).card(COVERAGE),
            Some("50.0%")
        );
        assert_eq!(
            DashboardView::build(&record, &history, &options).card(COVERAGE),
            Some("50.0%")
        );
    }

    #[test]
    fn test_trend_charts_share_dates_axis() {
        let history = History {
            dates: vec![Some("d1".into()), Some("d2".into())],
            commits: vec![Some(1.0), Some(2.0)],
            loc: vec![Some(100.0), Some(200.0)],
            tests: vec![Some(1.0), Some(2.0)],
        };
        let view = DashboardView::build(&Snapshot::default(), &history, &RenderOptions::default());
        let series = [
            (COMMITS_CHART, "Commits"),
            (LOC_CHART, "LOC"),
            (TESTS_CHART, "Test Files"),
        ];
        for (anchor, name) in series {
            let chart = view.chart(anchor).unwrap();
            assert_eq!(chart.labels(), &[Some("d1".to_string()), Some("d2".to_string())]);
            assert_eq!(chart.data.datasets[0].label.as_deref(), Some(name));
        }
        assert_eq!(view.chart(LOC_CHART).unwrap().points(), &[Some(100.0), Some(200.0)]);
    }

    #[test]
    fn test_escape_mode_flows_into_tables() {
        let snapshot = Snapshot {
            epics: vec![Epic {
                key: Some("<i>".into()),
                commits: Some(1.0),
            }],
            source_files: vec![SourceFile {
                path: Some("a.rs".into()),
                loc: Some(1.0),
                extension: Some("<e>".into()),
            }],
            ..Default::default()
        };
        let strict = RenderOptions {
            escape_mode: EscapeMode::Strict,
        };
        let view = DashboardView::build(&snapshot, &History::default(), &strict);
        assert_eq!(view.table(EPICS_TABLE).unwrap().rows[0][0], "&lt;i&gt;");
        assert_eq!(view.table(TOP_FILES_TABLE).unwrap().rows[0][2], "&lt;e&gt;");

        let legacy =
            DashboardView::build(&snapshot, &History::default(), &RenderOptions::default());
        assert_eq!(legacy.table(EPICS_TABLE).unwrap().rows[0][0], "<i>");
    }

    #[test]
    fn test_view_serializes_to_json() {
        let view = DashboardView::build(
            &Snapshot::default(),
            &History::default(),
            &RenderOptions::default(),
        );
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["cards"][0]["slot"], "total-loc");
        assert_eq!(value["charts"][3]["config"]["type"], "doughnut");
        assert_eq!(value["tables"][1]["table"]["headers"][0], "File");
    }
}
