//! Stamina governor
//!
//! Charges every action before it happens and drives the exhaustion ladder:
//! the first overdraft flags the actor Exhausted with one grace action, the
//! second drops them Collapsed. A separate hard floor (a fraction of max
//! stamina below zero) refuses the action outright.

use crate::combat::combatant::Combatant;
use crate::combat::events::{CollapseCause, CombatEvent};
use crate::core::error::CombatError;
use crate::rules::config::RulesConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Actions the governor prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Attack,
    Parry,
    Block,
    Dodge,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::Attack => "attack",
            ActionKind::Parry => "parry",
            ActionKind::Block => "block",
            ActionKind::Dodge => "dodge",
        };
        write!(f, "{}", s)
    }
}

/// Compute the full cost of an action for an actor in their current stance
pub fn action_cost(
    actor: &Combatant,
    action: ActionKind,
    ability_surcharge: i32,
    rules: &RulesConfig,
) -> i32 {
    let base = rules.stamina_costs.base_cost(action);
    let stance = rules.stamina_costs.stance_modifier(actor.stance);
    (base + stance + ability_surcharge.max(0)).max(0)
}

/// Charge an action against the actor's stamina.
///
/// The charge refuses (`InsufficientStamina`) only when it would drive
/// stamina through the hard floor - otherwise it always applies, and an
/// overdraft walks the actor down the exhaustion ladder. Returns the cost
/// and the events describing the delta and any condition change.
pub fn charge(
    actor: &mut Combatant,
    action: ActionKind,
    ability_surcharge: i32,
    rules: &RulesConfig,
) -> Result<(i32, Vec<CombatEvent>), CombatError> {
    let cost = action_cost(actor, action, ability_surcharge, rules);
    let after = actor.stamina - cost;
    let hard_floor = rules.overdraft.hard_floor(actor.max_stamina);
    if after < hard_floor {
        return Err(CombatError::InsufficientStamina {
            actor: actor.name.clone(),
            action: action.to_string(),
            required: cost,
            available: actor.stamina - hard_floor,
        });
    }

    actor.stamina = after;
    let overdraft = after < rules.overdraft.floor;
    let mut events = vec![CombatEvent::StaminaSpent {
        actor: actor.name.clone(),
        action,
        cost,
        remaining: actor.stamina,
        overdraft,
    }];

    if overdraft {
        if actor.is_exhausted() {
            actor.mark_collapsed();
            events.push(CombatEvent::Collapsed {
                actor: actor.name.clone(),
                cause: CollapseCause::Overdraft,
            });
        } else if !actor.is_collapsed() {
            actor.mark_exhausted();
            events.push(CombatEvent::Exhausted {
                actor: actor.name.clone(),
            });
        }
    }

    Ok((cost, events))
}

/// End-of-round stamina recovery, stance-dependent plus a small endurance
/// bonus, clamped to max.
pub fn regenerate(actor: &mut Combatant, rules: &RulesConfig) -> Vec<CombatEvent> {
    let base = rules.stamina_regen.amount(actor.stance);
    let endurance_bonus = i32::from(actor.attributes.endurance) / 20;
    let before = actor.stamina;
    actor.stamina = (before + base + endurance_bonus).min(actor.max_stamina);
    let gained = actor.stamina - before;
    if gained > 0 {
        vec![CombatEvent::StaminaRegained {
            actor: actor.name.clone(),
            amount: gained,
            remaining: actor.stamina,
        }]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::attributes::Attributes;
    use crate::combat::combatant::ConditionState;
    use crate::combat::stance::Stance;

    fn actor(stamina: i32, max: i32) -> Combatant {
        let mut a = Combatant::new("Brock", Attributes::default(), 100, max);
        a.stamina = stamina;
        a
    }

    #[test]
    fn test_cost_includes_stance_and_ability() {
        let rules = RulesConfig::default();
        let mut a = actor(20, 20);
        a.stance = Stance::Offensive;
        // attack 5 + offensive 1 + surcharge 2
        assert_eq!(action_cost(&a, ActionKind::Attack, 2, &rules), 8);
        a.stance = Stance::Defensive;
        assert_eq!(action_cost(&a, ActionKind::Dodge, 0, &rules), 1);
    }

    #[test]
    fn test_overdraft_flags_exhausted_then_collapsed() {
        let rules = RulesConfig::default();
        let mut a = actor(2, 20);

        // 2 - 5 = -3: overdraft, exhausted with one grace action
        let (cost, _) = charge(&mut a, ActionKind::Attack, 0, &rules).unwrap();
        assert_eq!(cost, 5);
        assert_eq!(a.stamina, -3);
        assert_eq!(a.condition, ConditionState::Exhausted);
        assert!(a.can_act());

        // Second overdraft while exhausted: collapse
        let (_, events) = charge(&mut a, ActionKind::Dodge, 0, &rules).unwrap();
        assert_eq!(a.condition, ConditionState::Collapsed);
        assert!(events
            .iter()
            .any(|e| matches!(e, CombatEvent::Collapsed { .. })));
    }

    #[test]
    fn test_no_overdraft_no_flag() {
        let rules = RulesConfig::default();
        let mut a = actor(10, 20);
        charge(&mut a, ActionKind::Attack, 0, &rules).unwrap();
        assert_eq!(a.stamina, 5);
        assert_eq!(a.condition, ConditionState::Active);
    }

    #[test]
    fn test_hard_floor_refuses_action() {
        let rules = RulesConfig::default();
        // hard floor for max 20 is -6; at -4 an attack (5) would hit -9
        let mut a = actor(-4, 20);
        a.mark_exhausted();
        let err = charge(&mut a, ActionKind::Attack, 0, &rules).unwrap_err();
        assert!(matches!(err, CombatError::InsufficientStamina { .. }));
        // Nothing was applied
        assert_eq!(a.stamina, -4);
        assert_eq!(a.condition, ConditionState::Exhausted);
    }

    #[test]
    fn test_regen_clamps_to_max() {
        let rules = RulesConfig::default();
        let mut a = actor(19, 20);
        a.stance = Stance::Neutral;
        regenerate(&mut a, &rules);
        assert_eq!(a.stamina, 20);
    }

    #[test]
    fn test_regen_depends_on_stance() {
        let rules = RulesConfig::default();
        let mut neutral = actor(0, 20);
        neutral.stance = Stance::Neutral;
        regenerate(&mut neutral, &rules);

        let mut offensive = actor(0, 20);
        offensive.stance = Stance::Offensive;
        regenerate(&mut offensive, &rules);

        assert!(neutral.stamina > offensive.stamina);
    }
}
