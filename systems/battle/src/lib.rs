#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-based battle resolver.
//!
//! A [`Battle`] alternates player and enemy attacks. Each call to
//! [`Battle::step`] resolves exactly one turn and reports the resulting phase,
//! the log entry to display, and the audio cue to play. Pacing is left to the
//! caller, which either drives `step` from a scheduler or calls it directly.

use dungeon_crawler_core::{
    BattleError, BattleLogEntry, BattlePhase, Cue, Enemy, PlayerStats, Vitals,
};
use rand::Rng;

/// Divisor applied to `damage * strength` when computing the base player hit.
pub const DAMAGE_DIVISOR: u32 = 17;
/// Enemy turn from which enemy attacks deal double damage.
pub const ENRAGE_TURN: u32 = 7;
/// Extra enemy damage added per elapsed enemy turn.
pub const DAMAGE_PER_TURN: i32 = 2;

/// Damage dealt by a single attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    /// Damage applied to the defender.
    pub damage: i32,
    /// Whether the damage was doubled by a critical hit or enrage.
    pub doubled: bool,
}

/// Base player damage before variance and critical hits.
#[must_use]
pub fn base_damage(stats: PlayerStats) -> u32 {
    stats.damage.saturating_mul(stats.strength) / DAMAGE_DIVISOR
}

/// Reports whether the player's hits are critical.
///
/// A hit is critical once `agility >= strength + damage / 3`. The comparison
/// is carried out on values scaled by three so no precision is lost.
#[must_use]
pub fn is_critical(stats: PlayerStats) -> bool {
    let agility = u64::from(stats.agility) * 3;
    let threshold = u64::from(stats.strength) * 3 + u64::from(stats.damage);
    agility >= threshold
}

/// Rolls the player's damage within ±20% of the base and applies critical hits.
pub fn roll_player_strike<R>(stats: PlayerStats, rng: &mut R) -> Strike
where
    R: Rng + ?Sized,
{
    let base = base_damage(stats);
    let spread = base / 5;
    let rolled = rng.gen_range(base - spread..=base.saturating_add(spread));
    let critical = is_critical(stats);
    let damage = if critical {
        rolled.saturating_mul(2)
    } else {
        rolled
    };
    Strike {
        damage: i32::try_from(damage).unwrap_or(i32::MAX),
        doubled: critical,
    }
}

/// Damage dealt by an enemy on its `turn_count`-th attack.
#[must_use]
pub fn enemy_strike(enemy_damage: i32, turn_count: u32) -> Strike {
    let turns = i32::try_from(turn_count).unwrap_or(i32::MAX);
    let damage = enemy_damage.saturating_add(turns.saturating_mul(DAMAGE_PER_TURN));
    let enraged = turn_count >= ENRAGE_TURN;
    Strike {
        damage: if enraged {
            damage.saturating_mul(2)
        } else {
            damage
        },
        doubled: enraged,
    }
}

/// Outcome of a single resolved turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// Phase the battle entered after the turn.
    pub phase: BattlePhase,
    /// Entry describing the turn.
    pub entry: BattleLogEntry,
    /// Cue accompanying the turn.
    pub cue: Cue,
}

/// State machine for a single encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Battle {
    enemy: Enemy,
    phase: BattlePhase,
    turn_count: u32,
}

impl Battle {
    /// Opens an encounter with the player attacking first.
    #[must_use]
    pub fn start(enemy: Enemy) -> (Self, BattleLogEntry) {
        let entry = BattleLogEntry::Encounter {
            enemy: enemy.name.clone(),
            hp: enemy.hp,
        };
        let battle = Self {
            enemy,
            phase: BattlePhase::PlayerTurn,
            turn_count: 0,
        };
        (battle, entry)
    }

    /// Enemy taking part in the encounter.
    #[must_use]
    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    /// Current phase of the encounter.
    #[must_use]
    pub const fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Number of enemy attacks resolved so far.
    #[must_use]
    pub const fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Reports whether the player attacks next.
    #[must_use]
    pub const fn player_turn(&self) -> bool {
        matches!(self.phase, BattlePhase::PlayerTurn)
    }

    /// Reports whether the encounter reached a terminal phase.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.phase.outcome().is_some()
    }

    /// Resolves the next turn.
    ///
    /// Player health is clamped to zero on a lethal hit; restoring it is left
    /// to the owner of the encounter.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::NotInBattle`] once the encounter is over.
    pub fn step<R>(
        &mut self,
        stats: PlayerStats,
        vitals: &mut Vitals,
        rng: &mut R,
    ) -> Result<TurnReport, BattleError>
    where
        R: Rng + ?Sized,
    {
        let report = match self.phase {
            BattlePhase::PlayerTurn => self.player_attack(stats, rng),
            BattlePhase::EnemyTurn => self.enemy_attack(vitals),
            BattlePhase::Idle | BattlePhase::Victory | BattlePhase::Defeat => {
                return Err(BattleError::NotInBattle)
            }
        };
        self.phase = report.phase;
        tracing::debug!(
            enemy = %self.enemy.name,
            turn = self.turn_count,
            phase = ?report.phase,
            "{}",
            report.entry
        );
        Ok(report)
    }

    fn player_attack<R>(&mut self, stats: PlayerStats, rng: &mut R) -> TurnReport
    where
        R: Rng + ?Sized,
    {
        let strike = roll_player_strike(stats, rng);
        self.enemy.hp = self.enemy.hp.saturating_sub(strike.damage);
        let enemy = self.enemy.name.clone();

        if self.enemy.hp <= 0 {
            return TurnReport {
                phase: BattlePhase::Victory,
                entry: BattleLogEntry::EnemyFinished {
                    enemy,
                    damage: strike.damage,
                },
                cue: Cue::Victory,
            };
        }

        TurnReport {
            phase: BattlePhase::EnemyTurn,
            entry: BattleLogEntry::PlayerHit {
                enemy,
                damage: strike.damage,
                critical: strike.doubled,
            },
            cue: Cue::Hit,
        }
    }

    fn enemy_attack(&mut self, vitals: &mut Vitals) -> TurnReport {
        self.turn_count = self.turn_count.saturating_add(1);
        let strike = enemy_strike(self.enemy.damage, self.turn_count);
        let enemy = self.enemy.name.clone();

        if vitals.take_damage(strike.damage) {
            return TurnReport {
                phase: BattlePhase::Defeat,
                entry: BattleLogEntry::PlayerDied {
                    enemy,
                    damage: strike.damage,
                    enraged: strike.doubled,
                },
                cue: Cue::Hit,
            };
        }

        TurnReport {
            phase: BattlePhase::PlayerTurn,
            entry: BattleLogEntry::EnemyHit {
                enemy,
                damage: strike.damage,
                enraged: strike.doubled,
            },
            cue: Cue::Hit,
        }
    }
}
