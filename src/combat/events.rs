//! Structured combat event log
//!
//! The core never prints; every observable effect of an attack becomes an
//! ordered event in the returned report, and presentation stays with the
//! caller.

use crate::combat::equipment::Condition;
use crate::combat::roll::{DefenseKind, RollOutcome};
use crate::combat::stamina::ActionKind;
use crate::combat::wounds::WoundSeverity;
use crate::combat::zone::BodyZone;
use serde::{Deserialize, Serialize};

/// Why a turn was skipped instead of resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    ActorIncapacitated,
    TargetIncapacitated,
}

/// What dropped an actor into Collapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollapseCause {
    Overdraft,
    Wounds,
    Pain,
}

/// What killed an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    VitalZone(BodyZone),
    HealthDepleted,
    BleedOut,
}

/// One entry in the ordered per-attack log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    TurnSkipped {
        actor: String,
        reason: SkipReason,
    },
    ActionRefused {
        actor: String,
        action: ActionKind,
        required: i32,
        available: i32,
    },
    /// Two-handed weapon forced the shield down
    ShieldLowered {
        actor: String,
        weapon: String,
    },
    /// Aimed zone was invalid; attack degraded to a spread
    AimDegraded {
        actor: String,
        zone: BodyZone,
    },
    StaminaSpent {
        actor: String,
        action: ActionKind,
        cost: i32,
        remaining: i32,
        overdraft: bool,
    },
    StaminaRegained {
        actor: String,
        amount: i32,
        remaining: i32,
    },
    Exhausted {
        actor: String,
    },
    Collapsed {
        actor: String,
        cause: CollapseCause,
    },
    AttackRolled {
        attacker: String,
        die: i32,
        total: i32,
        aimed_penalty: i32,
    },
    DefenseRolled {
        defender: String,
        die: i32,
        total: i32,
        defense: DefenseKind,
    },
    OutcomeDecided {
        attacker: String,
        defender: String,
        outcome: RollOutcome,
    },
    /// Critical damage scaling applied before distribution
    CriticalDamage {
        attacker: String,
        base: i32,
        scaled: i32,
        head_bonus: bool,
    },
    ZoneDamaged {
        actor: String,
        zone: BodyZone,
        raw: i32,
        absorbed: i32,
        inflicted: i32,
        /// No armor intersected this zone; full damage went through
        unarmored: bool,
    },
    ArmorDamaged {
        actor: String,
        piece: String,
        zone: BodyZone,
        absorbed: i32,
        durability_loss: i32,
        remaining_durability: i32,
        condition: Condition,
        broke: bool,
    },
    WeaponWear {
        actor: String,
        weapon: String,
        loss: i32,
        remaining: i32,
        condition: Condition,
    },
    ShieldWear {
        actor: String,
        shield: String,
        loss: i32,
        remaining: i32,
        condition: Condition,
    },
    ZoneCrippled {
        actor: String,
        zone: BodyZone,
        severity: WoundSeverity,
    },
    PainIncreased {
        actor: String,
        amount: i32,
        total: i32,
    },
    MobilityReduced {
        actor: String,
        penalty: i32,
        total: i32,
    },
    BleedStarted {
        actor: String,
        zone: BodyZone,
        severity: WoundSeverity,
        rate: f32,
        rounds: u32,
        critical: bool,
    },
    BleedTick {
        actor: String,
        rate: f32,
        damage: i32,
    },
    BleedStopped {
        actor: String,
    },
    MoraleDropped {
        actor: String,
        amount: i32,
        morale: i32,
    },
    MoraleChecked {
        actor: String,
        roll: i32,
        threshold: i32,
        held: bool,
    },
    /// Failed morale check: the actor breaks off from combat
    MoraleBroken {
        actor: String,
    },
    RiposteTriggered {
        attacker: String,
        defender: String,
    },
    Died {
        actor: String,
        cause: DeathCause,
    },
    Rested {
        actor: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize() {
        let events = vec![
            CombatEvent::ZoneCrippled {
                actor: "Torvald".to_string(),
                zone: BodyZone::UpperLegLeft,
                severity: WoundSeverity::Medium,
            },
            CombatEvent::Died {
                actor: "Torvald".to_string(),
                cause: DeathCause::VitalZone(BodyZone::Throat),
            },
        ];
        let json = serde_json::to_string(&events).unwrap();
        let back: Vec<CombatEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, events);
    }
}
