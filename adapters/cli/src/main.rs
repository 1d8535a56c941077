#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays the dungeon crawler on autopilot.

mod config;
mod render;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use self::{config::SessionConfig, session::Session};

/// Command-line arguments accepted by the dungeon crawler.
#[derive(Debug, Parser)]
#[command(name = "dungeon-crawler", about = "Procedural dungeon crawler on autopilot")]
struct CliArgs {
    /// TOML file with session settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for room generation, enemies, and loot.
    #[arg(long)]
    seed: Option<u64>,
    /// Side length of every room.
    #[arg(long)]
    side: Option<u32>,
    /// Number of free cells every room must exceed.
    #[arg(long)]
    cells: Option<u32>,
    /// Number of levels to play through.
    #[arg(long)]
    levels: Option<u32>,
    /// Suppresses the map drawn at the start and end of each level.
    #[arg(long)]
    no_map: bool,
}

impl CliArgs {
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(side) = self.side {
            config.side = side;
        }
        if let Some(cells) = self.cells {
            config.min_free_cells = cells;
        }
        if let Some(levels) = self.levels {
            config.levels = levels;
        }
        if self.no_map {
            config.show_map = false;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Entry point for the dungeon crawler command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = args.session_config()?;
    tracing::info!(
        seed = config.seed,
        side = config.side,
        levels = config.levels,
        "session starting"
    );

    let summary = Session::new(config).run()?;
    println!(
        "Cleared {} level(s): {} victories, {} defeats, {} item(s) looted.",
        summary.levels_cleared, summary.victories, summary.defeats, summary.loot
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = CliArgs::parse_from([
            "dungeon-crawler",
            "--seed",
            "11",
            "--side",
            "24",
            "--cells",
            "150",
            "--levels",
            "2",
            "--no-map",
        ]);
        let config = args.session_config().expect("valid flags");
        assert_eq!(config.seed, 11);
        assert_eq!(config.side, 24);
        assert_eq!(config.min_free_cells, 150);
        assert_eq!(config.levels, 2);
        assert!(!config.show_map);
    }

    #[test]
    fn invalid_side_is_reported() {
        let args = CliArgs::parse_from(["dungeon-crawler", "--side", "4"]);
        assert!(args.session_config().is_err());
    }

    #[test]
    fn missing_config_file_names_the_path() {
        let args = CliArgs::parse_from([
            "dungeon-crawler",
            "--config",
            "/nonexistent/session.toml",
        ]);
        let error = args.session_config().expect_err("file is missing");
        assert!(format!("{error:#}").contains("/nonexistent/session.toml"));
    }
}
