//! Input documents: `latest.json` (snapshot) and `history.json` (time series)
//!
//! Every field is optional. A missing key, an explicit `null`, and an empty
//! document `{}` all deserialize successfully; absence is handled by the
//! formatting layer, never here.

use serde::{Deserialize, Deserializer, Serialize};

/// Latest-known-state metrics for the analyzed repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub snapshot_date: Option<String>,
    #[serde(default)]
    pub loc_total: Option<f64>,
    #[serde(default)]
    pub test_files: Option<f64>,
    #[serde(default)]
    pub coverage: Option<Coverage>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub file_types: Vec<FileType>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub epics: Vec<Epic>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source_files: Vec<SourceFile>,
}

/// Coverage is published either as a bare rate or as a record of rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coverage {
    Rate(f64),
    Detailed {
        #[serde(default)]
        line_rate: Option<f64>,
        #[serde(default)]
        branch_rate: Option<f64>,
    },
}

impl Coverage {
    /// Line rate in `0..=1`, whichever shape the producer used
    pub fn line_rate(&self) -> Option<f64> {
        match self {
            Coverage::Rate(rate) => Some(*rate),
            Coverage::Detailed { line_rate, .. } => *line_rate,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileType {
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub files: Option<f64>,
}

/// Commit count grouped under an epic key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Epic {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub commits: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub loc: Option<f64>,
    #[serde(default)]
    pub extension: Option<String>,
}

/// Time series metrics, one point per sampled date
///
/// The sequences are parallel: `commits[i]`, `loc[i]` and `tests[i]` belong to
/// `dates[i]`. A `null` point is kept so the chart shows a gap, and a `null`
/// date stays in place as a `null` axis label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dates: Vec<Option<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub commits: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub loc: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tests: Vec<Option<f64>>,
}

/// A series whose length does not match the `dates` axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesMismatch {
    pub series: &'static str,
    pub len: usize,
    pub dates: usize,
}

impl History {
    /// List every series that is not the same length as `dates`
    pub fn check_alignment(&self) -> Vec<SeriesMismatch> {
        [
            ("commits", self.commits.len()),
            ("loc", self.loc.len()),
            ("tests", self.tests.len()),
        ]
        .into_iter()
        .filter(|(_, len)| *len != self.dates.len())
        .map(|(series, len)| SeriesMismatch {
            series,
            len,
            dates: self.dates.len(),
        })
        .collect()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
