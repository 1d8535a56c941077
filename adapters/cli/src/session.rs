//! Autopilot that walks the player through consecutive dungeon levels.
//!
//! Every level builds a room, scatters enemies, and walks the shortest route
//! to the exit. Encounters on the way are fought to completion by feeding
//! simulated frames through the pacing system, exactly like a frontend would.

use anyhow::{anyhow, bail, Result};
use dungeon_crawler_core::{BattleOutcome, Command, Event, LootItem};
use dungeon_crawler_system_bootstrap::Bootstrap;
use dungeon_crawler_system_pacing::BattlePacing;
use dungeon_crawler_system_spawning::{Roster, Spawning};
use dungeon_crawler_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{config::SessionConfig, render};

/// Frames a single battle may consume before the session gives up.
const MAX_BATTLE_FRAMES: u32 = 100_000;

const LOOT_TABLE: [(&str, &str, &str); 6] = [
    ("weapon", "rusty sword", "weapon"),
    ("head", "leather cap", "armor"),
    ("chest", "chain vest", "armor"),
    ("hands", "bone gloves", "armor"),
    ("neck", "amber amulet", "trinket"),
    ("belt", "healing draught", "consumable"),
];

const RARITIES: [&str; 4] = ["common", "uncommon", "rare", "epic"];

/// Totals gathered over a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) levels_cleared: u32,
    pub(crate) victories: u32,
    pub(crate) defeats: u32,
    pub(crate) loot: usize,
}

/// Owns the world together with the systems that drive it.
pub(crate) struct Session {
    config: SessionConfig,
    world: World,
    bootstrap: Bootstrap,
    spawning: Spawning,
    pacing: BattlePacing,
    roster: Roster,
    rng: ChaCha8Rng,
    summary: Summary,
}

impl Session {
    /// Creates a session for the provided settings.
    pub(crate) fn new(config: SessionConfig) -> Self {
        Self {
            world: World::with_config(config.world()),
            bootstrap: Bootstrap,
            spawning: Spawning::new(config.spawning()),
            pacing: BattlePacing::new(config.pacing()),
            roster: Roster,
            // Offset the stream so system draws never mirror the world's own.
            rng: ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(1)),
            summary: Summary::default(),
            config,
        }
    }

    /// Runs every configured level and returns the totals.
    pub(crate) fn run(mut self) -> Result<Summary> {
        println!("{}", self.bootstrap.welcome_banner(&self.world));

        for index in 0..self.config.levels {
            self.enter_room()?;
            self.walk_to_exit()?;
            self.summary.levels_cleared += 1;

            if index + 1 < self.config.levels {
                let _ = self.dispatch(Command::DescendLevel)?;
            }
        }
        Ok(self.summary)
    }

    fn enter_room(&mut self) -> Result<()> {
        let events = self.dispatch(Command::BuildRoom {
            min_free_cells: self.config.min_free_cells,
        })?;

        let mut placements = Vec::new();
        let report = self.spawning.handle(
            &events,
            query::grid(&self.world),
            &mut self.rng,
            &mut placements,
        );
        for command in placements {
            let _ = self.dispatch(command)?;
        }
        if let Some(report) = report {
            tracing::info!(
                level = query::level(&self.world),
                enemies = report.placed,
                requested = report.requested,
                "room populated"
            );
        }

        self.print_map();
        Ok(())
    }

    fn walk_to_exit(&mut self) -> Result<()> {
        let exit = query::exit(&self.world)
            .ok_or_else(|| anyhow!("no room was built"))?
            .cell();
        let route = query::route_to(&self.world, exit)
            .ok_or_else(|| anyhow!("exit at {exit:?} is unreachable"))?;

        for step in route {
            let events = self.dispatch(Command::MovePlayer { to: step })?;
            if let Some(cell) = events.iter().find_map(|event| match event {
                Event::EnemyEncountered { cell } => Some(*cell),
                _ => None,
            }) {
                tracing::debug!(?cell, "enemy encountered");
                self.fight()?;
            }
            if events
                .iter()
                .any(|event| matches!(event, Event::ExitReached { .. }))
            {
                println!("You reach the exit of level {}.", query::level(&self.world));
                self.print_map();
                return Ok(());
            }
        }
        bail!("route ended before the exit was reached")
    }

    fn fight(&mut self) -> Result<()> {
        let enemy = self
            .roster
            .enemy_for(query::level(&self.world), &mut self.rng);
        let events = self.dispatch(Command::StartBattle { enemy })?;
        let mut commands = Vec::new();
        self.pacing.handle(&events, &mut commands);

        let frame = self.config.frame();
        for _ in 0..MAX_BATTLE_FRAMES {
            let events = self.dispatch(Command::Tick { dt: frame })?;
            self.pacing.handle(&events, &mut commands);

            while !commands.is_empty() {
                let pending: Vec<Command> = commands.drain(..).collect();
                for command in pending {
                    let events = self.dispatch(command)?;
                    self.pacing.handle(&events, &mut commands);
                    if events
                        .iter()
                        .any(|event| matches!(event, Event::BattleDismissed))
                    {
                        return Ok(());
                    }
                }
            }
        }
        bail!("battle did not conclude within {MAX_BATTLE_FRAMES} frames")
    }

    /// Applies a command, reports its events, and reacts to battle results.
    fn dispatch(&mut self, command: Command) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        let mut follow_up = Vec::new();
        for event in &events {
            match event {
                Event::RoomRejected { reason } => bail!("room generation failed: {reason}"),
                Event::BattleRejected { reason } => bail!("battle could not start: {reason}"),
                Event::DescentRejected { reason } => bail!("cannot descend: {reason}"),
                Event::MoveRejected { to, reason } => {
                    bail!("move to {to:?} rejected: {reason}")
                }
                Event::EnemyPlacementRejected { cell, reason } => {
                    tracing::warn!(?cell, %reason, "enemy placement rejected");
                }
                Event::BattleLogged { entry } => println!("  {entry}"),
                Event::BattleEnded { outcome } => match outcome {
                    BattleOutcome::Victory => self.summary.victories += 1,
                    BattleOutcome::Defeat => self.summary.defeats += 1,
                },
                Event::EnemyDefeated { enemy, .. } => {
                    let item = loot_drop(enemy, &mut self.rng);
                    follow_up.push(Command::AwardLoot { item });
                }
                Event::LootAwarded { item } => {
                    self.summary.loot += 1;
                    println!("  Loot: {} {} ({})", item.rarity, item.name, item.slot);
                }
                Event::LootRejected { item, reason } => {
                    tracing::info!(item = %item.name, %reason, "loot discarded");
                }
                Event::LevelDescended { level } => println!("You descend to level {level}."),
                _ => {}
            }
        }

        for command in follow_up {
            let _ = self.dispatch(command)?;
        }
        Ok(events)
    }

    fn print_map(&self) {
        if !self.config.show_map {
            return;
        }
        if let Some(view) = self.bootstrap.render_view(&self.world) {
            println!("{}", render::ascii_map(&view));
        }
    }
}

/// Rolls the item dropped by a defeated enemy.
fn loot_drop<R>(enemy: &str, rng: &mut R) -> LootItem
where
    R: Rng + ?Sized,
{
    let (slot, base, kind) = LOOT_TABLE[rng.gen_range(0..LOOT_TABLE.len())];
    let rarity = RARITIES[rng.gen_range(0..RARITIES.len())];
    LootItem {
        slot: slot.to_owned(),
        name: format!("{enemy}'s {base}"),
        rarity: rarity.to_owned(),
        kind: kind.to_owned(),
    }
}
