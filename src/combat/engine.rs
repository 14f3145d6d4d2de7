//! The combat engine: one attack, fully resolved, atomically
//!
//! Control flow per attack: stamina authorizes and charges the action, the
//! opposed roll classifies the outcome, hits route zone damage through
//! armor, and the wound/bleed/morale evaluator updates derived state. The
//! whole resolution is synchronous and completes before returning; the
//! caller always gets an ordered event log, never a half-applied attack.

use crate::combat::combatant::Combatant;
use crate::combat::damage::{apply_to_zone, spread_shares, ZoneDamage};
use crate::combat::equipment::DamageType;
use crate::combat::events::{CombatEvent, SkipReason};
use crate::combat::morale;
use crate::combat::roll::{self, AttackKind, RollOutcome, RollResult};
use crate::combat::stamina::{self, ActionKind};
use crate::combat::wounds::{self, WoundSeverity};
use crate::combat::zone::BodyZone;
use crate::core::error::{CombatError, Result};
use crate::rules::config::RulesConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Optional ability riding on an attack: a stamina surcharge buys a flat
/// damage bonus. Spell/ability semantics live outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub stamina_surcharge: i32,
    pub damage_bonus: i32,
}

/// One attack, as requested by the encounter loop
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttackRequest {
    pub kind: AttackKind,
    pub ambush_bonus: i32,
    pub ability: Option<Ability>,
}

impl AttackRequest {
    pub fn normal() -> Self {
        Self::default()
    }

    pub fn aimed(zone: BodyZone) -> Self {
        Self {
            kind: AttackKind::Aimed(zone),
            ..Self::default()
        }
    }
}

/// How the request ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackResolution {
    Resolved(RollOutcome),
    /// Action refused before any roll: actor must pick something cheaper
    InsufficientStamina,
    /// Collapsed/dead actor or target; turn skipped
    Skipped(SkipReason),
}

/// The full outcome of one `resolve_attack` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackReport {
    pub resolution: AttackResolution,
    pub events: Vec<CombatEvent>,
}

impl AttackReport {
    fn skipped(actor: &str, reason: SkipReason) -> Self {
        Self {
            resolution: AttackResolution::Skipped(reason),
            events: vec![CombatEvent::TurnSkipped {
                actor: actor.to_string(),
                reason,
            }],
        }
    }
}

/// Synchronous, per-encounter combat engine.
///
/// Holds the validated rules and a seeded RNG; given the same seed and the
/// same call sequence the emitted event log is identical. No process-wide
/// state: run one engine per encounter.
pub struct CombatEngine {
    rules: RulesConfig,
    rng: ChaCha8Rng,
}

impl CombatEngine {
    /// Build an engine. Fails fast on an invalid ruleset.
    pub fn new(rules: RulesConfig, seed: u64) -> Result<Self> {
        Self::with_rng(rules, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(rules: RulesConfig, rng: ChaCha8Rng) -> Result<Self> {
        rules.validate()?;
        Ok(Self { rules, rng })
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Resolve one attack end to end. Always returns a report with an
    /// ordered event log; state is never left half-applied.
    pub fn resolve_attack(
        &mut self,
        attacker: &mut Combatant,
        defender: &mut Combatant,
        request: &AttackRequest,
    ) -> AttackReport {
        if !attacker.can_act() {
            return AttackReport::skipped(&attacker.name, SkipReason::ActorIncapacitated);
        }
        if !defender.can_be_engaged() {
            return AttackReport::skipped(&defender.name, SkipReason::TargetIncapacitated);
        }

        let mut events = Vec::new();
        self.enforce_two_handed(attacker, &mut events);

        // An aimed strike at a destroyed zone degrades to a spread attack
        let kind = match request.kind {
            AttackKind::Aimed(zone) if defender.body.zone(zone).is_crippled() => {
                events.push(CombatEvent::AimDegraded {
                    actor: attacker.name.clone(),
                    zone,
                });
                AttackKind::Normal
            }
            other => other,
        };

        // Authorize and charge the attacker before anything rolls
        let surcharge = request.ability.as_ref().map_or(0, |a| a.stamina_surcharge);
        match stamina::charge(attacker, ActionKind::Attack, surcharge, &self.rules) {
            Ok((_, charge_events)) => events.extend(charge_events),
            Err(CombatError::InsufficientStamina {
                required,
                available,
                ..
            }) => {
                events.push(CombatEvent::ActionRefused {
                    actor: attacker.name.clone(),
                    action: ActionKind::Attack,
                    required,
                    available,
                });
                return AttackReport {
                    resolution: AttackResolution::InsufficientStamina,
                    events,
                };
            }
            Err(_) => unreachable!("charge only fails on stamina"),
        }

        let result = roll::resolve(
            &mut self.rng,
            &self.rules,
            attacker,
            defender,
            kind,
            request.ambush_bonus,
            0,
        );
        self.log_roll(attacker, defender, &result, &mut events);

        // Defending costs stamina win or lose; the defender picked a
        // defense the moment the blow came in.
        match stamina::charge(defender, result.defense.action(), 0, &self.rules) {
            Ok((_, charge_events)) => events.extend(charge_events),
            Err(CombatError::InsufficientStamina { .. }) => {
                // Too spent to defend properly; the contest stands, the
                // defender just pays nothing further.
                tracing::debug!(defender = %defender.name, "defense unpaid, stamina at hard floor");
            }
            Err(_) => unreachable!("charge only fails on stamina"),
        }

        match result.outcome {
            RollOutcome::Miss => {
                self.wear_defense(attacker, defender, result.defense, &mut events);
            }
            RollOutcome::CriticalMiss => {
                self.wear_defense(attacker, defender, result.defense, &mut events);
                self.resolve_riposte(attacker, defender, &mut events);
            }
            RollOutcome::Hit | RollOutcome::CriticalHit => {
                self.apply_hit(attacker, defender, request, kind, &result, &mut events);
            }
        }

        AttackReport {
            resolution: AttackResolution::Resolved(result.outcome),
            events,
        }
    }

    /// Round upkeep for one actor: bleed ticks (collapsed actors keep
    /// bleeding), stamina regeneration, and the pain/wound collapse check.
    pub fn end_round(&mut self, actor: &mut Combatant) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        if !actor.is_alive() {
            return events;
        }
        events.extend(wounds::tick_bleed(actor));
        if actor.is_alive() && !actor.is_collapsed() {
            events.extend(stamina::regenerate(actor, &self.rules));
            events.extend(wounds::check_collapse(actor, &mut self.rng));
        }
        events
    }

    /// Explicit rest/heal performed by the caller between encounters or
    /// rounds; the only path back from Collapsed.
    pub fn rest(&self, actor: &mut Combatant) -> Vec<CombatEvent> {
        if actor.rest() {
            vec![CombatEvent::Rested {
                actor: actor.name.clone(),
            }]
        } else {
            Vec::new()
        }
    }

    // --- internals ---

    fn enforce_two_handed(&self, actor: &mut Combatant, events: &mut Vec<CombatEvent>) {
        if self.rules.two_handed.shields_allowed || actor.shield_lowered {
            return;
        }
        let Some(weapon) = actor.weapon.as_ref() else {
            return;
        };
        if actor.shield.is_some() && self.rules.two_handed.is_two_handed(&weapon.kind) {
            actor.shield_lowered = true;
            events.push(CombatEvent::ShieldLowered {
                actor: actor.name.clone(),
                weapon: weapon.name.clone(),
            });
        }
    }

    fn log_roll(
        &self,
        attacker: &Combatant,
        defender: &Combatant,
        result: &RollResult,
        events: &mut Vec<CombatEvent>,
    ) {
        events.push(CombatEvent::AttackRolled {
            attacker: attacker.name.clone(),
            die: result.attack_die,
            total: result.attack_total,
            aimed_penalty: result.aimed_penalty,
        });
        events.push(CombatEvent::DefenseRolled {
            defender: defender.name.clone(),
            die: result.defense_die,
            total: result.defense_total,
            defense: result.defense,
        });
        events.push(CombatEvent::OutcomeDecided {
            attacker: attacker.name.clone(),
            defender: defender.name.clone(),
            outcome: result.outcome,
        });
    }

    /// Successful defense grinds the defending equipment against the
    /// attacker's raw damage. Dodging wears nothing.
    fn wear_defense(
        &self,
        attacker: &Combatant,
        defender: &mut Combatant,
        defense: crate::combat::roll::DefenseKind,
        events: &mut Vec<CombatEvent>,
    ) {
        use crate::combat::constants::{PARRY_WEAR_DIVISOR, SHIELD_WEAR_FACTOR};
        use crate::combat::roll::DefenseKind;

        let raw = attacker.attack_damage();
        match defense {
            DefenseKind::Parry => {
                if let Some(weapon) = defender.weapon.as_mut() {
                    let loss = weapon.durability.wear((raw / PARRY_WEAR_DIVISOR).max(1));
                    events.push(CombatEvent::WeaponWear {
                        actor: defender.name.clone(),
                        weapon: weapon.name.clone(),
                        loss,
                        remaining: weapon.durability.current,
                        condition: weapon.durability.condition(),
                    });
                }
            }
            DefenseKind::Block => {
                if let Some(shield) = defender.shield.as_mut() {
                    let loss = shield
                        .durability
                        .wear(((raw as f32 * SHIELD_WEAR_FACTOR).floor() as i32).max(1));
                    events.push(CombatEvent::ShieldWear {
                        actor: defender.name.clone(),
                        shield: shield.name.clone(),
                        loss,
                        remaining: shield.durability.current,
                        condition: shield.durability.condition(),
                    });
                }
            }
            DefenseKind::Dodge => {}
        }
    }

    /// Scale damage for criticals, distribute it, and run the wound,
    /// death, morale, and collapse follow-ups on the defender.
    fn apply_hit(
        &mut self,
        attacker: &mut Combatant,
        defender: &mut Combatant,
        request: &AttackRequest,
        kind: AttackKind,
        result: &RollResult,
        events: &mut Vec<CombatEvent>,
    ) {
        let critical = result.outcome == RollOutcome::CriticalHit;
        let damage_type = attacker
            .weapon
            .as_ref()
            .map_or(DamageType::Blunt, |w| w.damage_type);
        let base = attacker.attack_damage() + request.ability.as_ref().map_or(0, |a| a.damage_bonus);

        let mut damage = base;
        if critical {
            let mut scaled = (base as f32 * self.rules.criticals.multiplier).round() as i32;
            let head_bonus = kind == AttackKind::Aimed(BodyZone::Head);
            if head_bonus {
                scaled += (scaled * self.rules.aimed_attack.head_crit_bonus_pct) / 100;
            }
            events.push(CombatEvent::CriticalDamage {
                attacker: attacker.name.clone(),
                base,
                scaled,
                head_bonus,
            });
            damage = scaled;
        }

        // The swing itself chips the attacker's weapon
        if let Some(weapon) = attacker.weapon.as_mut() {
            let loss = weapon
                .durability
                .wear(crate::combat::constants::WEAPON_SWING_WEAR);
            if loss > 0 {
                events.push(CombatEvent::WeaponWear {
                    actor: attacker.name.clone(),
                    weapon: weapon.name.clone(),
                    loss,
                    remaining: weapon.durability.current,
                    condition: weapon.durability.condition(),
                });
            }
        }

        let shares: Vec<(BodyZone, i32)> = match kind {
            AttackKind::Aimed(zone) => vec![(zone, damage)],
            AttackKind::Normal => {
                let valid = defender.body.valid_zones(&BodyZone::spread_set());
                spread_shares(&valid, damage)
            }
        };

        let mut worst_wound: Option<WoundSeverity> = None;
        let mut zone_results: Vec<ZoneDamage> = Vec::new();
        for (zone, share) in shares {
            let zd = apply_to_zone(defender, zone, share, damage_type, &self.rules, events);
            zone_results.push(zd);
        }
        for zd in &zone_results {
            if zd.crippled {
                let zone_max = defender.body.zone(zd.zone).max;
                let severity = WoundSeverity::from_overkill(zd.overkill, zone_max);
                worst_wound = worst_wound.max(Some(severity));
                events.extend(wounds::on_zone_crippled(defender, zd.zone, severity, critical));
            }
        }

        if defender.is_alive() && defender.body.current_total() == 0 {
            defender.mark_dead();
            events.push(CombatEvent::Died {
                actor: defender.name.clone(),
                cause: crate::combat::events::DeathCause::HealthDepleted,
            });
        }

        if defender.is_alive() {
            if morale::check_required(defender, worst_wound) {
                events.extend(morale::check_morale(defender, &mut self.rng));
            }
            events.extend(wounds::check_collapse(defender, &mut self.rng));
        }
    }

    /// Free counter-attack after a critical miss. Turn order is bypassed
    /// but the counter still costs the defender stamina, and the original
    /// attacker's perception weighs against it.
    fn resolve_riposte(
        &mut self,
        attacker: &mut Combatant,
        defender: &mut Combatant,
        events: &mut Vec<CombatEvent>,
    ) {
        if !defender.can_act() {
            return;
        }
        events.push(CombatEvent::RiposteTriggered {
            attacker: defender.name.clone(),
            defender: attacker.name.clone(),
        });

        match stamina::charge(defender, ActionKind::Attack, 0, &self.rules) {
            Ok((_, charge_events)) => events.extend(charge_events),
            Err(CombatError::InsufficientStamina {
                required,
                available,
                ..
            }) => {
                events.push(CombatEvent::ActionRefused {
                    actor: defender.name.clone(),
                    action: ActionKind::Attack,
                    required,
                    available,
                });
                return;
            }
            Err(_) => unreachable!("charge only fails on stamina"),
        }

        let relief = attacker.perception_modifier();
        let result = roll::resolve(
            &mut self.rng,
            &self.rules,
            defender,
            attacker,
            AttackKind::Normal,
            0,
            relief,
        );
        self.log_roll(defender, attacker, &result, events);

        // A riposte never chains another riposte; its critical miss is
        // just a miss.
        if result.outcome.is_hit() {
            let dummy = AttackRequest::normal();
            self.apply_hit(defender, attacker, &dummy, AttackKind::Normal, &result, events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::attributes::Attributes;
    use crate::combat::equipment::Weapon;

    fn engine(seed: u64) -> CombatEngine {
        CombatEngine::new(RulesConfig::default(), seed).unwrap()
    }

    fn fighter(name: &str) -> Combatant {
        let mut c = Combatant::new(name, Attributes::uniform(40), 100, 20);
        c.weapon = Some(Weapon::new("Longsword", "longsword", DamageType::Slashing, 10, 60));
        c.weapon_skill = 5;
        c
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut rules = RulesConfig::default();
        rules.criticals.multiplier = 0.5;
        assert!(CombatEngine::new(rules, 1).is_err());
    }

    #[test]
    fn test_collapsed_attacker_is_skipped() {
        let mut eng = engine(1);
        let mut a = fighter("a");
        let mut d = fighter("d");
        a.mark_collapsed();
        let report = eng.resolve_attack(&mut a, &mut d, &AttackRequest::normal());
        assert_eq!(
            report.resolution,
            AttackResolution::Skipped(SkipReason::ActorIncapacitated)
        );
        assert_eq!(report.events.len(), 1);
    }

    #[test]
    fn test_dead_target_is_skipped() {
        let mut eng = engine(1);
        let mut a = fighter("a");
        let mut d = fighter("d");
        d.mark_dead();
        let report = eng.resolve_attack(&mut a, &mut d, &AttackRequest::normal());
        assert_eq!(
            report.resolution,
            AttackResolution::Skipped(SkipReason::TargetIncapacitated)
        );
    }

    #[test]
    fn test_two_handed_lowers_shield() {
        let mut eng = engine(1);
        let mut a = fighter("a");
        a.weapon = Some(Weapon::new(
            "Greatsword",
            "greatsword",
            DamageType::Slashing,
            14,
            70,
        ));
        a.shield = Some(crate::combat::equipment::Shield::new("Buckler", 30, 3));
        let mut d = fighter("d");
        let report = eng.resolve_attack(&mut a, &mut d, &AttackRequest::normal());
        assert!(a.shield_lowered);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, CombatEvent::ShieldLowered { .. })));
    }

    #[test]
    fn test_insufficient_stamina_refuses_action() {
        let mut eng = engine(1);
        let mut a = fighter("a");
        a.stamina = -5; // hard floor for max 20 is -6
        a.mark_exhausted();
        let mut d = fighter("d");
        let report = eng.resolve_attack(&mut a, &mut d, &AttackRequest::normal());
        assert_eq!(report.resolution, AttackResolution::InsufficientStamina);
        assert_eq!(a.stamina, -5);
        // No roll happened
        assert!(!report
            .events
            .iter()
            .any(|e| matches!(e, CombatEvent::AttackRolled { .. })));
    }

    #[test]
    fn test_aim_at_crippled_zone_degrades_to_spread() {
        let mut eng = engine(4);
        let mut a = fighter("a");
        let mut d = fighter("d");
        let max = d.body.zone(BodyZone::Chest).max;
        d.body.apply_damage(BodyZone::Chest, max);
        let report = eng.resolve_attack(&mut a, &mut d, &AttackRequest::aimed(BodyZone::Chest));
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, CombatEvent::AimDegraded { .. })));
    }

    #[test]
    fn test_attack_charges_attacker_and_defender() {
        let mut eng = engine(2);
        let mut a = fighter("a");
        let mut d = fighter("d");
        let report = eng.resolve_attack(&mut a, &mut d, &AttackRequest::normal());
        assert!(matches!(report.resolution, AttackResolution::Resolved(_)));
        assert!(a.stamina < a.max_stamina);
        assert!(d.stamina < d.max_stamina);
    }

    #[test]
    fn test_replay_determinism() {
        let run = |seed: u64| {
            let mut eng = engine(seed);
            let mut a = fighter("a");
            let mut d = fighter("d");
            let mut log = Vec::new();
            for _ in 0..12 {
                log.extend(eng.resolve_attack(&mut a, &mut d, &AttackRequest::normal()).events);
                log.extend(eng.end_round(&mut a));
                log.extend(eng.end_round(&mut d));
                if !d.is_alive() {
                    break;
                }
            }
            (log, a.body.current_total(), d.body.current_total())
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn test_end_round_regenerates_stamina() {
        let mut eng = engine(3);
        let mut a = fighter("a");
        a.stamina = 5;
        let events = eng.end_round(&mut a);
        assert!(a.stamina > 5);
        assert!(events
            .iter()
            .any(|e| matches!(e, CombatEvent::StaminaRegained { .. })));
    }

    #[test]
    fn test_rest_recovers_collapsed() {
        let eng = engine(3);
        let mut a = fighter("a");
        a.mark_collapsed();
        let events = eng.rest(&mut a);
        assert!(a.can_act());
        assert!(events.iter().any(|e| matches!(e, CombatEvent::Rested { .. })));
    }
}
