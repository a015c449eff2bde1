//! Display surface: where computed cards, charts and tables are applied
//!
//! `DisplaySurface` is the rendering port. Writes address an existing element
//! and report whether it was found; a surface never grows new elements in
//! response to a write, so a partial page simply renders fewer sections.
//!
//! `HtmlPage` is the production surface. It holds an ordered element layout
//! and serializes to a self-contained HTML document with inline CSS and a
//! small script that hands each attached chart config to Chart.js.

use crate::chart::ChartConfig;
use crate::format::escape_html;

pub const SNAPSHOT_CLASS: &str = "snapshot";
pub const SNAPSHOT_ID: &str = "snapshot";
pub const TOTAL_LOC: &str = "total-loc";
pub const TEST_FILES: &str = "test-files";
pub const COVERAGE: &str = "coverage";
pub const COMMITS_CHART: &str = "commits-chart";
pub const LOC_CHART: &str = "loc-chart";
pub const TESTS_CHART: &str = "tests-chart";
pub const FILE_TYPES_CHART: &str = "chart-file-types";
pub const EPICS_TABLE: &str = "epics-table";
pub const TOP_FILES_TABLE: &str = "top-files-table";

pub const DEFAULT_CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js@4";

/// Element lookup, by id or by class (first match wins)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    Id(&'a str),
    Class(&'a str),
}

pub trait DisplaySurface {
    fn contains(&self, selector: Selector<'_>) -> bool;

    /// Replace the element's text content. Returns false if no element matched.
    fn set_text(&mut self, selector: Selector<'_>, text: &str) -> bool;

    /// Replace the element's inner HTML. Returns false if no element matched.
    fn set_html(&mut self, selector: Selector<'_>, html: &str) -> bool;

    /// Bind a chart to the anchor element. Returns false if no element matched.
    fn attach_chart(&mut self, selector: Selector<'_>, chart: &ChartConfig) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Header line, e.g. the snapshot date
    Label,
    Card { title: String },
    Chart { title: String },
    Table { title: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Empty,
    Text(String),
    Html(String),
    Chart(ChartConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: Option<String>,
    pub class: Option<String>,
    pub kind: ElementKind,
    pub content: Content,
}

impl Element {
    fn new(id: Option<&str>, class: Option<&str>, kind: ElementKind) -> Self {
        Element {
            id: id.map(str::to_string),
            class: class.map(str::to_string),
            kind,
            content: Content::Empty,
        }
    }

    pub fn label(id: Option<&str>, class: Option<&str>) -> Self {
        Element::new(id, class, ElementKind::Label)
    }

    pub fn card(id: &str, title: &str) -> Self {
        Element::new(
            Some(id),
            None,
            ElementKind::Card {
                title: title.to_string(),
            },
        )
    }

    pub fn chart(id: &str, title: &str) -> Self {
        Element::new(
            Some(id),
            None,
            ElementKind::Chart {
                title: title.to_string(),
            },
        )
    }

    pub fn table(id: &str, title: &str) -> Self {
        Element::new(
            Some(id),
            None,
            ElementKind::Table {
                title: title.to_string(),
            },
        )
    }

    fn matches(&self, selector: Selector<'_>) -> bool {
        match selector {
            Selector::Id(id) => self.id.as_deref() == Some(id),
            Selector::Class(class) => self
                .class
                .as_deref()
                .is_some_and(|c| c.split_whitespace().any(|part| part == class)),
        }
    }

    fn attributes(&self) -> String {
        let mut attrs = String::new();
        if let Some(id) = &self.id {
            attrs.push_str(&format!(r#" id="{}""#, escape_html(id)));
        }
        if let Some(class) = &self.class {
            attrs.push_str(&format!(r#" class="{}""#, escape_html(class)));
        }
        attrs
    }

    fn inner_html(&self) -> String {
        match &self.content {
            Content::Empty | Content::Chart(_) => String::new(),
            Content::Text(text) => escape_html(text),
            Content::Html(html) => html.clone(),
        }
    }

    fn to_html(&self) -> String {
        let attrs = self.attributes();
        let inner = self.inner_html();
        match &self.kind {
            ElementKind::Label => format!("<p{}>{}</p>", attrs, inner),
            ElementKind::Card { title } => format!(
                r#"<div class="card">
    <h3>{title}</h3>
    <div class="value"{attrs}>{inner}</div>
</div>"#,
                title = escape_html(title),
                attrs = attrs,
                inner = inner,
            ),
            ElementKind::Chart { title } => format!(
                r#"<section class="panel">
    <h2>{title}</h2>
    <canvas{attrs}></canvas>
</section>"#,
                title = escape_html(title),
                attrs = attrs,
            ),
            ElementKind::Table { title } => format!(
                r#"<section class="panel">
    <h2>{title}</h2>
    <div class="table-wrap"{attrs}>{inner}</div>
</section>"#,
                title = escape_html(title),
                attrs = attrs,
                inner = inner,
            ),
        }
    }
}

/// In-memory page layout that renders to a static HTML document
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlPage {
    pub title: String,
    pub chart_js_url: String,
    elements: Vec<Element>,
}

impl HtmlPage {
    /// Empty page; add elements with `with_element`
    pub fn new(title: &str) -> Self {
        HtmlPage {
            title: title.to_string(),
            chart_js_url: DEFAULT_CHART_JS_URL.to_string(),
            elements: Vec::new(),
        }
    }

    /// Full dashboard layout with every slot, anchor and container
    pub fn dashboard(title: &str) -> Self {
        HtmlPage::new(title)
            .with_element(Element::label(None, Some(SNAPSHOT_CLASS)))
            .with_element(Element::card(TOTAL_LOC, "Lines of Code"))
            .with_element(Element::card(TEST_FILES, "Test Files"))
            .with_element(Element::card(COVERAGE, "Line Coverage"))
            .with_element(Element::chart(COMMITS_CHART, "Commits"))
            .with_element(Element::chart(LOC_CHART, "Lines of Code"))
            .with_element(Element::chart(TESTS_CHART, "Test Files"))
            .with_element(Element::chart(FILE_TYPES_CHART, "File Types"))
            .with_element(Element::table(EPICS_TABLE, "Epics"))
            .with_element(Element::table(TOP_FILES_TABLE, "Top Source Files"))
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_chart_js_url(mut self, url: &str) -> Self {
        self.chart_js_url = url.to_string();
        self
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn find(&self, selector: Selector<'_>) -> Option<&Element> {
        self.elements.iter().find(|e| e.matches(selector))
    }

    fn find_mut(&mut self, selector: Selector<'_>) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.matches(selector))
    }

    fn replace(&mut self, selector: Selector<'_>, content: Content) -> bool {
        match self.find_mut(selector) {
            Some(element) => {
                element.content = content;
                true
            }
            None => false,
        }
    }

    /// Text content of the first matching element, if it has any
    pub fn text(&self, selector: Selector<'_>) -> Option<&str> {
        match &self.find(selector)?.content {
            Content::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn inner_html(&self, selector: Selector<'_>) -> Option<&str> {
        match &self.find(selector)?.content {
            Content::Html(html) => Some(html.as_str()),
            _ => None,
        }
    }

    pub fn chart(&self, selector: Selector<'_>) -> Option<&ChartConfig> {
        match &self.find(selector)?.content {
            Content::Chart(chart) => Some(chart),
            _ => None,
        }
    }

    /// Render the whole page as a self-contained HTML document
    pub fn to_html(&self) -> String {
        let (header, body): (Vec<&Element>, Vec<&Element>) = self
            .elements
            .iter()
            .partition(|e| e.kind == ElementKind::Label);
        let cards: Vec<&Element> = body
            .iter()
            .copied()
            .filter(|e| matches!(e.kind, ElementKind::Card { .. }))
            .collect();
        let panels: Vec<&Element> = body
            .iter()
            .copied()
            .filter(|e| !matches!(e.kind, ElementKind::Card { .. }))
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <header>
            <h1>{title}</h1>
            {header}
        </header>
        <div class="cards">
{cards}
        </div>
        <div class="panels">
{panels}
        </div>
        <footer>
            <p>Generated by repodash</p>
        </footer>
    </div>
    <script src="{chart_js_url}"></script>
    <script>{charts}</script>
</body>
</html>"#,
            title = escape_html(&self.title),
            css = inline_css(),
            header = join_html(&header),
            cards = join_html(&cards),
            panels = join_html(&panels),
            chart_js_url = escape_html(&self.chart_js_url),
            charts = self.chart_script(),
        )
    }

    /// Script that instantiates every attached chart against its anchor
    fn chart_script(&self) -> String {
        let entries: Vec<String> = self
            .elements
            .iter()
            .filter_map(|e| match (&e.id, &e.content) {
                (Some(id), Content::Chart(chart)) => Some(format!(
                    r#"{{"id":{},"config":{}}}"#,
                    script_json(&serde_json::Value::String(id.clone()).to_string()),
                    script_json(&chart.to_json()),
                )),
                _ => None,
            })
            .collect();

        format!(
            r#"
window.__rdCharts = [{entries}];
(function() {{
    if (typeof Chart === 'undefined') return;
    window.__rdCharts.forEach(function(entry) {{
        var el = document.getElementById(entry.id);
        if (el) new Chart(el, entry.config);
    }});
}})();
"#,
            entries = entries.join(","),
        )
    }
}

impl DisplaySurface for HtmlPage {
    fn contains(&self, selector: Selector<'_>) -> bool {
        self.find(selector).is_some()
    }

    fn set_text(&mut self, selector: Selector<'_>, text: &str) -> bool {
        self.replace(selector, Content::Text(text.to_string()))
    }

    fn set_html(&mut self, selector: Selector<'_>, html: &str) -> bool {
        self.replace(selector, Content::Html(html.to_string()))
    }

    fn attach_chart(&mut self, selector: Selector<'_>, chart: &ChartConfig) -> bool {
        self.replace(selector, Content::Chart(chart.clone()))
    }
}

fn join_html(elements: &[&Element]) -> String {
    elements
        .iter()
        .map(|e| e.to_html())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Make JSON safe to embed inside a `<script>` element
fn script_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

fn inline_css() -> &'static str {
    r#"
* {
    box-sizing: border-box;
    margin: 0;
    padding: 0;
}

body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    line-height: 1.6;
    color: #f4f6fb;
    background: #0f1420;
}

.container {
    max-width: 1400px;
    margin: 0 auto;
    padding: 2rem;
}

header {
    margin-bottom: 2rem;
    padding-bottom: 1rem;
    border-bottom: 1px solid rgba(255, 255, 255, 0.08);
}

header h1 {
    font-size: 2rem;
    font-weight: 700;
    margin-bottom: 0.5rem;
}

.snapshot {
    color: #9aa4b2;
    font-size: 0.875rem;
}

.cards {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
    gap: 1rem;
    margin-bottom: 2rem;
}

.card, .panel {
    background: #171e2e;
    border-radius: 0.5rem;
    padding: 1.25rem;
}

.card h3 {
    font-size: 0.75rem;
    font-weight: 600;
    color: #9aa4b2;
    text-transform: uppercase;
    letter-spacing: 0.05em;
}

.card .value {
    font-size: 2rem;
    font-weight: 700;
    color: #59d1c9;
}

.panels {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(420px, 1fr));
    gap: 1rem;
}

.panel h2 {
    font-size: 1rem;
    font-weight: 600;
    margin-bottom: 0.75rem;
}

table {
    width: 100%;
    border-collapse: collapse;
    font-size: 0.875rem;
}

th, td {
    text-align: left;
    padding: 0.5rem 0.75rem;
    border-bottom: 1px solid rgba(255, 255, 255, 0.05);
}

th {
    color: #9aa4b2;
    font-weight: 600;
}

footer {
    margin-top: 2rem;
    color: #9aa4b2;
    font-size: 0.75rem;
    text-align: center;
}
"#
}
