//! mayhem-chaos — the fault-injection control loop.
//!
//! One pass of [`ChaosMonkey::run_once`] re-discovers everything from the
//! control plane, measures fleet health, and then either heals or
//! attacks:
//!
//! ```text
//! resolve environment → list candidates → count_healthy
//!   ├── count < total  → heal(all candidates)
//!   └── otherwise      → attack(one candidate, uniformly at random)
//! ```
//!
//! # Pacing
//!
//! Attack and heal wait [`PACING_DELAY`] after every request they send,
//! so a crash-looping target is never hammered. Attack sends exactly
//! [`KILL_ATTEMPTS`] kill requests per domain, even after the target is
//! seen going down. All calls are sequential; nothing runs concurrently
//! within a pass.

pub mod attack;
pub mod heal;
pub mod health;
pub mod monkey;

#[cfg(test)]
mod testing;

use std::time::Duration;

pub use attack::{AttackReport, attack};
pub use heal::{HealReport, heal};
pub use health::count_healthy;
pub use monkey::{ChaosMonkey, Decision, RunOutcome, Survey, decide, pick_target};

/// Kill requests sent to each domain of an attacked service.
pub const KILL_ATTEMPTS: u32 = 10;

/// Wait after every kill attempt and every heal check.
pub const PACING_DELAY: Duration = Duration::from_millis(5000);
