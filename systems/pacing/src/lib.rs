#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Battle pacing system that turns elapsed time into battle commands.
//!
//! While a battle runs, one [`Command::ResolveTurn`] is emitted per turn
//! interval. The turn timer is cancelled once the battle ends, and a single
//! [`Command::DismissBattle`] follows after the dismissal delay so the final
//! log line stays visible before movement is unlocked.

use std::time::Duration;

use dungeon_crawler_core::{Command, Event};

/// Simulated time between two battle turns.
pub const DEFAULT_TURN_INTERVAL: Duration = Duration::from_millis(1250);
/// Simulated time between the end of a battle and its dismissal.
pub const DEFAULT_DISMISS_DELAY: Duration = Duration::from_millis(2000);

/// Configuration parameters required to construct the pacing system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    turn_interval: Duration,
    dismiss_delay: Duration,
}

impl Config {
    /// Creates a new configuration using the provided turn cadence and dismissal delay.
    #[must_use]
    pub const fn new(turn_interval: Duration, dismiss_delay: Duration) -> Self {
        Self {
            turn_interval,
            dismiss_delay,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_TURN_INTERVAL, DEFAULT_DISMISS_DELAY)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Timer {
    Idle,
    Turns { accumulator: Duration },
    Dismissal { accumulator: Duration },
}

/// Pure system that schedules battle turns and dismissal.
#[derive(Debug)]
pub struct BattlePacing {
    turn_interval: Duration,
    dismiss_delay: Duration,
    timer: Timer,
}

impl BattlePacing {
    /// Creates a new pacing system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            turn_interval: config.turn_interval,
            dismiss_delay: config.dismiss_delay,
            timer: Timer::Idle,
        }
    }

    /// Reports whether a turn timer or dismissal delay is pending.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.timer != Timer::Idle
    }

    /// Consumes world events in order and emits the commands that fall due.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::BattleStarted { .. } => {
                    self.timer = Timer::Turns {
                        accumulator: Duration::ZERO,
                    };
                }
                Event::BattleEnded { .. } => {
                    self.timer = Timer::Dismissal {
                        accumulator: Duration::ZERO,
                    };
                }
                Event::BattleDismissed | Event::RoomBuilt { .. } => {
                    self.timer = Timer::Idle;
                }
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                _ => {}
            }
        }
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        match &mut self.timer {
            Timer::Idle => {}
            Timer::Turns { accumulator } => {
                if self.turn_interval.is_zero() {
                    return;
                }
                *accumulator = accumulator.saturating_add(dt);
                while *accumulator >= self.turn_interval {
                    *accumulator -= self.turn_interval;
                    out.push(Command::ResolveTurn);
                }
            }
            Timer::Dismissal { accumulator } => {
                *accumulator = accumulator.saturating_add(dt);
                if *accumulator >= self.dismiss_delay {
                    self.timer = Timer::Idle;
                    out.push(Command::DismissBattle);
                }
            }
        }
    }
}

impl Default for BattlePacing {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
