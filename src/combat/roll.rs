//! Opposed attack/defense roll resolution
//!
//! Both sides roll d100 and stack additive modifiers. The raw attack die
//! decides criticals before the totals are compared, so a critical miss
//! exposes the attacker even on a round they would have won on totals.

use crate::combat::attributes::stat_modifier;
use crate::combat::combatant::Combatant;
use crate::combat::stamina::ActionKind;
use crate::combat::zone::BodyZone;
use crate::rules::config::RulesConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the attack is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AttackKind {
    #[default]
    Normal,
    /// Target one zone at an accuracy penalty
    Aimed(BodyZone),
}

/// Defense chosen by equipment: shield > weapon > nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefenseKind {
    Block,
    Parry,
    Dodge,
}

impl DefenseKind {
    pub fn action(self) -> ActionKind {
        match self {
            DefenseKind::Block => ActionKind::Block,
            DefenseKind::Parry => ActionKind::Parry,
            DefenseKind::Dodge => ActionKind::Dodge,
        }
    }
}

impl fmt::Display for DefenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DefenseKind::Block => "block",
            DefenseKind::Parry => "parry",
            DefenseKind::Dodge => "dodge",
        };
        write!(f, "{}", s)
    }
}

/// Classified result of the opposed check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollOutcome {
    CriticalMiss,
    Miss,
    Hit,
    CriticalHit,
}

impl RollOutcome {
    pub fn is_hit(self) -> bool {
        matches!(self, RollOutcome::Hit | RollOutcome::CriticalHit)
    }
}

/// Full breakdown of one opposed roll, for the event log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollResult {
    pub attack_die: i32,
    pub defense_die: i32,
    pub attack_total: i32,
    pub defense_total: i32,
    pub defense: DefenseKind,
    pub aimed_penalty: i32,
    pub outcome: RollOutcome,
}

/// Pick the defense by equipment: an unbroken raised shield blocks, a
/// weapon parries, bare hands dodge.
pub fn choose_defense(defender: &Combatant) -> DefenseKind {
    if defender.usable_shield().is_some() {
        DefenseKind::Block
    } else if defender.weapon.is_some() {
        DefenseKind::Parry
    } else {
        DefenseKind::Dodge
    }
}

fn defense_stat_modifier(defender: &Combatant, defense: DefenseKind) -> i32 {
    match defense {
        DefenseKind::Dodge => stat_modifier(defender.attributes.agility),
        DefenseKind::Parry => {
            stat_modifier(defender.attributes.dexterity) + defender.weapon_skill / 2
        }
        DefenseKind::Block => {
            stat_modifier(defender.attributes.strength)
                + defender.usable_shield().map_or(0, |s| s.block_bonus)
        }
    }
}

/// Resolve the opposed check.
///
/// `defense_relief` is an extra additive bonus on the defender's total,
/// used by ripostes to fold the original attacker's perception back in.
pub fn resolve<R: Rng>(
    rng: &mut R,
    rules: &RulesConfig,
    attacker: &Combatant,
    defender: &Combatant,
    kind: AttackKind,
    ambush_bonus: i32,
    defense_relief: i32,
) -> RollResult {
    let attack_die = rng.gen_range(1..=100);
    let defense_die = rng.gen_range(1..=100);

    let aimed_penalty = match kind {
        AttackKind::Aimed(_) => rules.aimed_attack.penalty(attacker.attributes.dexterity),
        AttackKind::Normal => 0,
    };

    let attack_total = attack_die
        + attacker.weapon_skill
        + stat_modifier(attacker.attributes.dexterity)
        + attacker.stance.attack_modifier()
        + ambush_bonus
        - aimed_penalty
        - attacker.stress_penalty()
        - attacker.pain_penalty(rules.pain_penalty_cap);

    let defense = choose_defense(defender);
    let defense_total = defense_die
        + defense_stat_modifier(defender, defense)
        + defender.stance.defense_modifier()
        + defense_relief;

    let outcome = if attack_die <= rules.criticals.miss_threshold {
        RollOutcome::CriticalMiss
    } else if attack_die >= rules.criticals.hit_threshold {
        RollOutcome::CriticalHit
    } else if attack_total > defense_total {
        RollOutcome::Hit
    } else {
        RollOutcome::Miss
    };

    RollResult {
        attack_die,
        defense_die,
        attack_total,
        defense_total,
        defense,
        aimed_penalty,
        outcome,
    }
}
