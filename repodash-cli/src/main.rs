//! repodash CLI - renders repository metrics into a static HTML dashboard

#![deny(warnings)]

// Global invariants enforced:
// - Data is loaded once per invocation, never cached between runs
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use repodash_core::config::{self, ResolvedConfig};
use repodash_core::table::EscapeMode;
use repodash_core::{initialize, DataSource, HtmlPage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "repodash")]
#[command(about = "Render latest.json / history.json repository metrics as a static dashboard")]
#[command(version = env!("REPODASH_VERSION"))]
struct Cli {
    /// Log progress and skipped dashboard sections
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the metrics documents and render the dashboard
    Render {
        /// Directory or base URL holding latest.json and history.json (overrides config file)
        data: Option<String>,

        /// Output format
        #[arg(long, default_value = "html")]
        format: OutputFormat,

        /// Output file path for HTML (overrides config file)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Page title (overrides config file)
        #[arg(long)]
        title: Option<String>,

        /// Escape every table field, not only file paths
        #[arg(long)]
        strict_escaping: bool,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without rendering
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Html,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            data,
            format,
            output,
            title,
            strict_escaping,
            config: config_path,
        } => {
            let project_root = std::env::current_dir()?;
            let mut resolved = config::load_and_resolve(&project_root, config_path.as_deref())
                .context("failed to load configuration")?;

            if let Some(ref p) = resolved.config_path {
                tracing::info!(path = %p.display(), "using config");
            }

            // CLI flags override config file values
            if let Some(data) = data {
                resolved.data = DataSource::parse(&data)?;
            }
            if let Some(output) = output {
                resolved.output = output;
            }
            if let Some(title) = title {
                resolved.title = title;
            }
            if strict_escaping {
                resolved.escape_mode = EscapeMode::Strict;
            }

            let mut page = HtmlPage::dashboard(&resolved.title)
                .with_chart_js_url(&resolved.chart_js_url);
            let view = initialize(&resolved.data, &mut page, &resolved.render_options())
                .await
                .with_context(|| format!("failed to load dashboard data from {}", resolved.data))?;

            match format {
                OutputFormat::Html => {
                    write_html_report(&resolved.output, &page.to_html())?;
                    eprintln!("Dashboard written to {}", resolved.output.display());
                }
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&view)
                        .context("failed to serialize dashboard view")?;
                    println!("{}", json);
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref())
                    .context("failed to load configuration")?;
                print_config(&resolved);
            }
        },
    }

    Ok(())
}

/// Default to warnings only; `--verbose` or `RUST_LOG` raise the level
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!();
    println!("Data:");
    println!("  source: {}", resolved.data);
    println!();
    println!("Output:");
    println!("  path: {}", resolved.output.display());
    println!("  title: {}", resolved.title);
    println!("  chart_js_url: {}", resolved.chart_js_url);
    println!(
        "  escaping: {}",
        match resolved.escape_mode {
            EscapeMode::Legacy => "legacy (file paths only)",
            EscapeMode::Strict => "strict (all table fields)",
        }
    );
}

/// Write HTML report to file with atomic write pattern
fn write_html_report(path: &Path, html: &str) -> anyhow::Result<()> {
    use std::fs;

    // Create parent directories if needed
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    // Atomic write (temp + rename pattern)
    let temp_path = path.with_extension("html.tmp");
    fs::write(&temp_path, html)
        .with_context(|| format!("Failed to write temporary file: {}", temp_path.display()))?;
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err)
            .with_context(|| format!("Failed to rename temporary file to: {}", path.display()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_write_html_report_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site").join("dashboard.html");

        write_html_report(&path, "<html></html>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
        assert!(!path.with_extension("html.tmp").exists());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the target path makes the rename fail
        let path = dir.path().join("dashboard.html");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(write_html_report(&path, "<html></html>").is_err());
        assert!(!path.with_extension("html.tmp").exists());
    }
}
