//! Session settings loaded from TOML and overlaid with command-line flags.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use dungeon_crawler_core::PlayerStats;
use dungeon_crawler_system_generation::{DEFAULT_MAX_CHUNKS, MIN_GRID_SIDE};
use dungeon_crawler_system_pacing::{DEFAULT_DISMISS_DELAY, DEFAULT_TURN_INTERVAL};
use dungeon_crawler_system_spawning::DEFAULT_MAX_RETRIES;
use dungeon_crawler_world::WorldConfig;
use serde::Deserialize;

/// Complete configuration of an autopilot session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    pub(crate) seed: u64,
    pub(crate) side: u32,
    pub(crate) min_free_cells: u32,
    pub(crate) levels: u32,
    pub(crate) max_chunks: u32,
    pub(crate) max_placement_retries: u32,
    pub(crate) turn_interval_ms: u64,
    pub(crate) dismiss_delay_ms: u64,
    pub(crate) frame_ms: u64,
    pub(crate) show_map: bool,
    pub(crate) player: PlayerConfig,
}

/// Player statistics section of the session file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlayerConfig {
    pub(crate) max_hp: i32,
    pub(crate) damage: u32,
    pub(crate) strength: u32,
    pub(crate) agility: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let world = WorldConfig::default();
        Self {
            seed: world.seed,
            side: world.side,
            min_free_cells: 120,
            levels: 3,
            max_chunks: DEFAULT_MAX_CHUNKS,
            max_placement_retries: DEFAULT_MAX_RETRIES,
            turn_interval_ms: duration_millis(DEFAULT_TURN_INTERVAL),
            dismiss_delay_ms: duration_millis(DEFAULT_DISMISS_DELAY),
            frame_ms: 250,
            show_map: true,
            player: PlayerConfig::default(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let world = WorldConfig::default();
        Self {
            max_hp: world.player_max_hp,
            damage: world.player_stats.damage,
            strength: world.player_stats.strength,
            agility: world.player_stats.agility,
        }
    }
}

impl SessionConfig {
    /// Reads a session file from disk.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid session config at {}", path.display()))
    }

    /// Parses and validates session settings from TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse session config toml contents")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the session cannot run with.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.side < MIN_GRID_SIDE {
            bail!(
                "room side {} is below the minimum of {MIN_GRID_SIDE}",
                self.side
            );
        }
        if self.frame_ms == 0 {
            bail!("frame_ms must be positive");
        }
        if self.turn_interval_ms == 0 {
            bail!("turn_interval_ms must be positive");
        }
        if self.player.max_hp <= 0 {
            bail!("player max_hp must be positive, got {}", self.player.max_hp);
        }
        Ok(())
    }

    /// World settings derived from the session.
    pub(crate) fn world(&self) -> WorldConfig {
        WorldConfig {
            side: self.side,
            seed: self.seed,
            max_chunks: self.max_chunks,
            player_max_hp: self.player.max_hp,
            player_stats: PlayerStats::new(
                self.player.damage,
                self.player.strength,
                self.player.agility,
            ),
        }
    }

    /// Simulated time advanced per frame.
    pub(crate) fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    /// Pacing settings derived from the session.
    pub(crate) fn pacing(&self) -> dungeon_crawler_system_pacing::Config {
        dungeon_crawler_system_pacing::Config::new(
            Duration::from_millis(self.turn_interval_ms),
            Duration::from_millis(self.dismiss_delay_ms),
        )
    }

    /// Spawning settings derived from the session.
    pub(crate) fn spawning(&self) -> dungeon_crawler_system_spawning::Config {
        dungeon_crawler_system_spawning::Config::new(self.max_placement_retries)
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
