//! ZDraft 命令行驱动
//!
//! 无界面运行绘图会话：加载配置与 DXF，回放事件脚本，输出实体摘要。

mod script;
mod summary;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zdraft_core::camera::Viewport;
use zdraft_core::config::DraftConfig;
use zdraft_ui::{DraftingSession, ShortcutTable, ToolManager};

use crate::summary::Summary;

#[derive(Parser, Debug)]
#[command(name = "zdraft")]
#[command(version, about = "Headless 2D drafting session driver")]
struct Cli {
    /// JSON configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// DXF file imported before the script runs
    #[arg(long)]
    dxf: Option<PathBuf>,

    /// JSON event script to replay
    #[arg(long, short = 's')]
    script: Option<PathBuf>,

    /// Shortcut alias file (`alias target` per line)
    #[arg(long)]
    aliases: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<DraftConfig> {
    let config = match &cli.config {
        Some(path) => DraftConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DraftConfig::default(),
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn checked_viewport(width: f64, height: f64) -> Result<Viewport> {
    if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
        anyhow::bail!("viewport size must be positive, got {width}x{height}");
    }
    Ok(Viewport::sized(width, height))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    info!("Starting ZDraft...");

    let config = load_config(&cli)?;
    let viewport = checked_viewport(cli.width, cli.height)?;
    let mut session = DraftingSession::new(config).with_viewport(viewport);
    let mut tools = ToolManager::with_defaults(&session.config);
    let mut shortcuts = ShortcutTable::new();

    if let Some(path) = &cli.aliases {
        let count = shortcuts
            .load_aliases(path)
            .with_context(|| format!("failed to read aliases {}", path.display()))?;
        info!(count, "shortcut aliases loaded");
    }

    if let Some(path) = &cli.dxf {
        let report = zdraft_file::import_path(path, &mut session.entities)
            .with_context(|| format!("failed to import {}", path.display()))?;
        if !report.unsupported.is_empty() {
            info!(unsupported = ?report.unsupported, "unsupported DXF entities skipped");
        }
    }

    if let Some(path) = &cli.script {
        let events = script::load(path)?;
        let stats = script::replay(&events, &mut session, &mut tools, &shortcuts);
        info!(events = stats.events, failed = stats.failed, "script replayed");
    }

    let summary = Summary::collect(&session, tools.active_name());
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_rejects_degenerate_size() {
        assert!(checked_viewport(1280.0, 720.0).is_ok());
        assert!(checked_viewport(0.0, 720.0).is_err());
        assert!(checked_viewport(1280.0, -1.0).is_err());
        assert!(checked_viewport(f64::NAN, 720.0).is_err());
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["zdraft", "--width", "800", "--height", "600", "--json"]);
        assert_eq!(cli.width, 800.0);
        assert!(cli.json);
        assert!(cli.script.is_none());
    }
}
