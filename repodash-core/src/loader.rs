//! Loading `latest.json` and `history.json`
//!
//! Both documents are read fresh on every call: local files straight from
//! disk, remote ones with `no-cache` request headers. The two reads happen one
//! after the other and the first failure aborts the load. There is no retry.

use crate::model::{History, Snapshot};
use anyhow::{Context, Result};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};

pub const LATEST_FILE: &str = "latest.json";
pub const HISTORY_FILE: &str = "history.json";

/// Where the two data documents live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Local directory holding both files
    Dir(PathBuf),
    /// Base URL; document names are joined onto it
    Url(Url),
}

impl DataSource {
    /// `http://` and `https://` become URLs, anything else is a directory path
    ///
    /// A URL must not carry a query or fragment; document names are joined
    /// onto its path and would drop either one.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            anyhow::bail!("data source must not be empty");
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let mut url =
                Url::parse(trimmed).with_context(|| format!("invalid data URL: {}", trimmed))?;
            if url.query().is_some() || url.fragment().is_some() {
                anyhow::bail!(
                    "data URL must not have a query string or fragment: {}",
                    trimmed
                );
            }
            // Url::join replaces the last segment unless the base ends with '/'
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            Ok(DataSource::Url(url))
        } else {
            Ok(DataSource::Dir(PathBuf::from(trimmed)))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Dir(dir) => write!(f, "{}", dir.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Load the snapshot and then the history document
pub async fn load_data(source: &DataSource) -> Result<(Snapshot, History)> {
    let (snapshot, history): (Snapshot, History) = match source {
        DataSource::Dir(dir) => (
            read_json(&dir.join(LATEST_FILE)).await?,
            read_json(&dir.join(HISTORY_FILE)).await?,
        ),
        DataSource::Url(base) => {
            let client = reqwest::Client::new();
            (
                fetch_json(&client, base, LATEST_FILE).await?,
                fetch_json(&client, base, HISTORY_FILE).await?,
            )
        }
    };

    tracing::info!(
        %source,
        snapshot_date = snapshot.snapshot_date.as_deref().unwrap_or("unavailable"),
        points = history.dates.len(),
        "loaded dashboard data"
    );
    Ok((snapshot, history))
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let body = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = body.len(), "read document");
    serde_json::from_str(&body).with_context(|| format!("failed to parse {}", path.display()))
}

async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    base: &Url,
    name: &str,
) -> Result<T> {
    let url = base
        .join(name)
        .with_context(|| format!("failed to build URL for {}", name))?;
    let response = client
        .get(url.clone())
        .header(CACHE_CONTROL, "no-cache")
        .header(PRAGMA, "no-cache")
        .send()
        .await
        .with_context(|| format!("failed to fetch {}", url))?
        .error_for_status()
        .with_context(|| format!("bad response from {}", url))?;
    let body = response
        .text()
        .await
        .with_context(|| format!("failed to read body of {}", url))?;
    tracing::debug!(%url, bytes = body.len(), "fetched document");
    serde_json::from_str(&body).with_context(|| format!("failed to parse {}", url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    type RequestLog = Arc<Mutex<Vec<String>>>;

    /// Serve `(path, status, body)` routes on a local port, one request per
    /// connection, and record every raw request head
    async fn serve(
        routes: Vec<(&'static str, &'static str, &'static str)>,
    ) -> (String, RequestLog) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let log = RequestLog::default();
        let seen = log.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&head).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("").to_string();
                seen.lock().unwrap().push(request);

                let (status, body) = routes
                    .iter()
                    .find(|(route, _, _)| *route == path)
                    .map(|(_, status, body)| (*status, *body))
                    .unwrap_or(("404 Not Found", ""));
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (format!("http://{}/data", addr), log)
    }

    fn request_paths(log: &RequestLog) -> Vec<String> {
        log.lock()
            .unwrap()
            .iter()
            .map(|r| r.split_whitespace().nth(1).unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn test_parse_directory_source() {
        let source = DataSource::parse("./data").unwrap();
        assert_eq!(source, DataSource::Dir(PathBuf::from("./data")));
    }

    #[test]
    fn test_parse_url_source_adds_trailing_slash() {
        let source = DataSource::parse("https://example.com/metrics/data").unwrap();
        assert_eq!(source.to_string(), "https://example.com/metrics/data/");
    }

    #[test]
    fn test_parse_url_source_keeps_trailing_slash() {
        let source = DataSource::parse("http://localhost:8000/data/").unwrap();
        assert_eq!(source.to_string(), "http://localhost:8000/data/");
    }

    #[test]
    fn test_parse_rejects_query_and_fragment() {
        let err = DataSource::parse("https://example.com/data?token=x").unwrap_err();
        assert!(err.to_string().contains("query string"));
        assert!(DataSource::parse("https://example.com/data#top").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_source() {
        assert!(DataSource::parse("  ").is_err());
    }

    #[tokio::test]
    async fn test_load_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LATEST_FILE), r#"{"loc_total": 10}"#).unwrap();
        fs::write(dir.path().join(HISTORY_FILE), r#"{"dates": ["d1"]}"#).unwrap();

        let source = DataSource::Dir(dir.path().to_path_buf());
        let (snapshot, history) = load_data(&source).await.unwrap();
        assert_eq!(snapshot.loc_total, Some(10.0));
        assert_eq!(history.dates, vec![Some("d1".to_string())]);
    }

    #[tokio::test]
    async fn test_load_reads_fresh_content_every_call() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LATEST_FILE), r#"{"loc_total": 1}"#).unwrap();
        fs::write(dir.path().join(HISTORY_FILE), "{}").unwrap();
        let source = DataSource::Dir(dir.path().to_path_buf());

        let (first, _) = load_data(&source).await.unwrap();
        fs::write(dir.path().join(LATEST_FILE), r#"{"loc_total": 2}"#).unwrap();
        let (second, _) = load_data(&source).await.unwrap();

        assert_eq!(first.loc_total, Some(1.0));
        assert_eq!(second.loc_total, Some(2.0));
    }

    #[tokio::test]
    async fn test_missing_latest_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(HISTORY_FILE), "{}").unwrap();
        let source = DataSource::Dir(dir.path().to_path_buf());

        let err = load_data(&source).await.unwrap_err();
        assert!(format!("{:#}", err).contains(LATEST_FILE));
    }

    #[tokio::test]
    async fn test_invalid_json_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LATEST_FILE), "{}").unwrap();
        fs::write(dir.path().join(HISTORY_FILE), "<html>not json</html>").unwrap();
        let source = DataSource::Dir(dir.path().to_path_buf());

        let err = load_data(&source).await.unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse"));
    }

    #[tokio::test]
    async fn test_load_from_url_bypasses_caches_in_order() {
        let (base, log) = serve(vec![
            ("/data/latest.json", "200 OK", r#"{"loc_total": 7}"#),
            ("/data/history.json", "200 OK", r#"{"dates": ["d1"], "commits": [3]}"#),
        ])
        .await;
        let source = DataSource::parse(&base).unwrap();

        let (snapshot, history) = load_data(&source).await.unwrap();
        assert_eq!(snapshot.loc_total, Some(7.0));
        assert_eq!(history.commits, vec![Some(3.0)]);

        assert_eq!(
            request_paths(&log),
            vec!["/data/latest.json", "/data/history.json"]
        );
        for request in log.lock().unwrap().iter() {
            let lower = request.to_ascii_lowercase();
            assert!(lower.contains("cache-control: no-cache"), "{}", request);
            assert!(lower.contains("pragma: no-cache"), "{}", request);
        }
    }

    #[tokio::test]
    async fn test_url_error_status_fails_load() {
        let (base, log) = serve(vec![("/data/latest.json", "200 OK", "{}")]).await;
        let source = DataSource::parse(&base).unwrap();

        let err = load_data(&source).await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains(HISTORY_FILE), "{}", message);
        assert!(message.contains("404"), "{}", message);
        assert_eq!(
            request_paths(&log),
            vec!["/data/latest.json", "/data/history.json"]
        );
    }

    #[tokio::test]
    async fn test_url_latest_failure_skips_history() {
        let (base, log) = serve(vec![("/data/history.json", "200 OK", "{}")]).await;
        let source = DataSource::parse(&base).unwrap();

        assert!(load_data(&source).await.is_err());
        assert_eq!(request_paths(&log), vec!["/data/latest.json"]);
    }
}
