//! HTML tables for epics and top source files

use crate::format::{escape_html, format_value};
use crate::model::{Epic, SourceFile};
use serde::Serialize;

/// Top files table never shows more than this many rows
pub const TOP_FILES_LIMIT: usize = 10;

/// Which table fields are HTML-escaped
///
/// `Legacy` keeps the published dashboard's behavior: epic fields and the file
/// extension are written verbatim and only the file path is escaped. `Strict`
/// escapes every interpolated field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeMode {
    #[default]
    Legacy,
    Strict,
}

impl EscapeMode {
    fn cell(self, raw: String) -> String {
        match self {
            EscapeMode::Legacy => raw,
            EscapeMode::Strict => escape_html(&raw),
        }
    }
}

/// Table with a fixed header row; cells hold final HTML fragments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn to_html(&self) -> String {
        let header: String = self
            .headers
            .iter()
            .map(|h| format!("<th>{}</th>", h))
            .collect();
        let body: String = self
            .rows
            .iter()
            .map(|row| {
                let cells: String = row
                    .iter()
                    .map(|cell| format!("\n      <td>{}</td>", cell))
                    .collect();
                format!("\n    <tr>{}\n    </tr>", cells)
            })
            .collect();

        format!(
            r#"<table>
  <thead><tr>{header}</tr></thead>
  <tbody>{body}</tbody>
</table>"#,
            header = header,
            body = body,
        )
    }
}

pub fn epics_table(epics: &[Epic], mode: EscapeMode) -> Table {
    let rows = epics
        .iter()
        .map(|e| {
            vec![
                mode.cell(format_value(e.key.as_deref())),
                mode.cell(format_value(e.commits)),
            ]
        })
        .collect();

    Table {
        headers: vec!["Epic", "Commits"],
        rows,
    }
}

/// First `TOP_FILES_LIMIT` files in producer order; this does not sort
pub fn top_files_table(files: &[SourceFile], mode: EscapeMode) -> Table {
    let rows = files
        .iter()
        .take(TOP_FILES_LIMIT)
        .map(|f| {
            vec![
                escape_html(&format_value(f.path.as_deref())),
                mode.cell(format_value(f.loc)),
                mode.cell(format_value(f.extension.as_deref())),
            ]
        })
        .collect();

    Table {
        headers: vec!["File", "LOC", "Type"],
        rows,
    }
}
