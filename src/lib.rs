//! Grimvale - deterministic zone-based combat resolution core

pub mod combat;
pub mod core;
pub mod rules;

pub use combat::{AttackReport, AttackRequest, CombatEngine, Combatant};
pub use core::{CombatError, Result};
pub use rules::RulesConfig;
