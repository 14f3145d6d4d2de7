//! Wound, bleed, and collapse evaluation
//!
//! Crippling a zone has consequences banded by how hard the zone was
//! overshot: pain, stress, a stacking time-limited bleed record, and for
//! legs a mobility penalty. Bleed records decay independently; their summed
//! rate (capped) is applied once per round through the normal spread policy.

use crate::combat::combatant::Combatant;
use crate::combat::constants::{
    BLEED_OUT_RATIO, BLEED_RATE_CAP, COLLAPSE_CRIPPLED_ZONES, CRIPPLE_MORALE_DROP, CRIPPLE_STRESS,
    LEG_MOBILITY_PENALTY, LIMB_CRIPPLE_PAIN, PAIN_COLLAPSE_THRESHOLD, TORSO_CRIPPLE_PAIN,
};
use crate::combat::damage::spread_shares;
use crate::combat::events::{CollapseCause, CombatEvent, DeathCause};
use crate::combat::zone::BodyZone;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wound severity tier, derived from overkill damage on the crippled zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WoundSeverity {
    Light,
    Medium,
    Heavy,
}

impl WoundSeverity {
    /// Per-round bleed contribution of this tier
    pub fn bleed_rate(self) -> f32 {
        match self {
            WoundSeverity::Light => 0.3,
            WoundSeverity::Medium => 0.6,
            WoundSeverity::Heavy => 1.2,
        }
    }

    /// Rounds the bleed keeps running
    pub fn bleed_duration(self) -> u32 {
        match self {
            WoundSeverity::Light => 3,
            WoundSeverity::Medium => 4,
            WoundSeverity::Heavy => 5,
        }
    }

    /// Band the severity by how far the crippling hit overshot the zone
    pub fn from_overkill(overkill: i32, zone_max: i32) -> Self {
        let zone_max = zone_max.max(1);
        if overkill >= zone_max {
            WoundSeverity::Heavy
        } else if overkill * 2 >= zone_max {
            WoundSeverity::Medium
        } else {
            WoundSeverity::Light
        }
    }
}

impl fmt::Display for WoundSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WoundSeverity::Light => "light",
            WoundSeverity::Medium => "medium",
            WoundSeverity::Heavy => "heavy",
        };
        write!(f, "{}", s)
    }
}

/// One active bleed. Records stack and decay independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BleedRecord {
    pub zone: BodyZone,
    pub severity: WoundSeverity,
    pub rate: f32,
    pub remaining_rounds: u32,
    pub critical: bool,
}

impl BleedRecord {
    /// A critical wound bleeds half again as hard and two rounds longer.
    pub fn new(zone: BodyZone, severity: WoundSeverity, critical: bool) -> Self {
        let rate = if critical {
            severity.bleed_rate() * 1.5
        } else {
            severity.bleed_rate()
        };
        let remaining_rounds = severity.bleed_duration() + if critical { 2 } else { 0 };
        Self {
            zone,
            severity,
            rate,
            remaining_rounds,
            critical,
        }
    }
}

/// Apply the consequences of a zone reaching zero HP.
///
/// Mutates pain/stress/mobility/morale, appends a bleed record, and marks
/// death for vital zones. Returns the events describing what happened.
pub fn on_zone_crippled(
    actor: &mut Combatant,
    zone: BodyZone,
    severity: WoundSeverity,
    critical: bool,
) -> Vec<CombatEvent> {
    let mut events = vec![CombatEvent::ZoneCrippled {
        actor: actor.name.clone(),
        zone,
        severity,
    }];

    let pain = if zone.is_torso() {
        TORSO_CRIPPLE_PAIN
    } else {
        LIMB_CRIPPLE_PAIN
    };
    actor.pain += pain;
    actor.stress += CRIPPLE_STRESS;
    events.push(CombatEvent::PainIncreased {
        actor: actor.name.clone(),
        amount: pain,
        total: actor.pain,
    });

    if zone.is_leg() {
        actor.mobility_penalty += LEG_MOBILITY_PENALTY;
        events.push(CombatEvent::MobilityReduced {
            actor: actor.name.clone(),
            penalty: LEG_MOBILITY_PENALTY,
            total: actor.mobility_penalty,
        });
    }

    let before = actor.morale;
    actor.morale = (actor.morale - CRIPPLE_MORALE_DROP).max(0);
    if actor.morale != before {
        events.push(CombatEvent::MoraleDropped {
            actor: actor.name.clone(),
            amount: before - actor.morale,
            morale: actor.morale,
        });
    }

    let record = BleedRecord::new(zone, severity, critical);
    events.push(CombatEvent::BleedStarted {
        actor: actor.name.clone(),
        zone,
        severity,
        rate: record.rate,
        rounds: record.remaining_rounds,
        critical,
    });
    actor.bleeds.push(record);

    if zone.is_vital() && actor.is_alive() {
        actor.mark_dead();
        events.push(CombatEvent::Died {
            actor: actor.name.clone(),
            cause: DeathCause::VitalZone(zone),
        });
    }

    events
}

/// Run one round of bleeding on an actor.
///
/// The summed rate of all active records (capped) accumulates in a
/// fractional pool; whole points drain out of the pool as zone damage via
/// the spread policy. Collapsed actors keep bleeding and can bleed out.
pub fn tick_bleed(actor: &mut Combatant) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    if !actor.is_alive() || actor.bleeds.is_empty() {
        return events;
    }

    let rate: f32 = actor.bleeds.iter().map(|b| b.rate).sum::<f32>().min(BLEED_RATE_CAP);
    actor.bleed_pool += rate;
    let damage = actor.bleed_pool.floor() as i32;
    actor.bleed_pool -= damage as f32;

    events.push(CombatEvent::BleedTick {
        actor: actor.name.clone(),
        rate,
        damage,
    });

    if damage > 0 {
        actor.bleed_out_loss += damage;
        let valid = actor.body.valid_zones(&BodyZone::spread_set());
        for (zone, share) in spread_shares(&valid, damage) {
            let (_, overkill, crippled) = actor.body.apply_damage(zone, share);
            if crippled {
                let zone_max = actor.body.zone(zone).max;
                let severity = WoundSeverity::from_overkill(overkill, zone_max);
                events.extend(on_zone_crippled(actor, zone, severity, false));
            }
        }
    }

    // Each record counts down on its own clock
    for record in &mut actor.bleeds {
        record.remaining_rounds = record.remaining_rounds.saturating_sub(1);
    }
    let before = actor.bleeds.len();
    actor.bleeds.retain(|b| b.remaining_rounds > 0);
    for _ in actor.bleeds.len()..before {
        events.push(CombatEvent::BleedStopped {
            actor: actor.name.clone(),
        });
    }

    if actor.is_alive() {
        if actor.body.current_total() == 0 {
            actor.mark_dead();
            events.push(CombatEvent::Died {
                actor: actor.name.clone(),
                cause: DeathCause::HealthDepleted,
            });
        } else if (actor.bleed_out_loss as f32)
            >= (actor.starting_hp() as f32 * BLEED_OUT_RATIO)
        {
            actor.mark_dead();
            events.push(CombatEvent::Died {
                actor: actor.name.clone(),
                cause: DeathCause::BleedOut,
            });
        }
    }

    events
}

/// Collapse check: three crippled zones force it, otherwise raw pain above
/// the threshold rolls against (pain - threshold) on a d100.
pub fn check_collapse<R: Rng>(actor: &mut Combatant, rng: &mut R) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    if !actor.is_alive() || actor.is_collapsed() {
        return events;
    }

    if actor.body.crippled_count() >= COLLAPSE_CRIPPLED_ZONES {
        actor.mark_collapsed();
        events.push(CombatEvent::Collapsed {
            actor: actor.name.clone(),
            cause: CollapseCause::Wounds,
        });
        return events;
    }

    let chance = actor.pain - PAIN_COLLAPSE_THRESHOLD;
    if chance > 0 {
        let roll = rng.gen_range(1..=100);
        if roll <= chance {
            actor.mark_collapsed();
            events.push(CombatEvent::Collapsed {
                actor: actor.name.clone(),
                cause: CollapseCause::Pain,
            });
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::combatant::Combatant;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn actor() -> Combatant {
        Combatant::new("Torvald", Default::default(), 100, 20)
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(WoundSeverity::from_overkill(0, 20), WoundSeverity::Light);
        assert_eq!(WoundSeverity::from_overkill(10, 20), WoundSeverity::Medium);
        assert_eq!(WoundSeverity::from_overkill(20, 20), WoundSeverity::Heavy);
    }

    #[test]
    fn test_critical_bleed_is_worse() {
        let plain = BleedRecord::new(BodyZone::Chest, WoundSeverity::Medium, false);
        let crit = BleedRecord::new(BodyZone::Chest, WoundSeverity::Medium, true);
        assert!(crit.rate > plain.rate);
        assert!(crit.remaining_rounds > plain.remaining_rounds);
    }

    #[test]
    fn test_leg_cripple_adds_mobility_penalty() {
        let mut a = actor();
        let events = on_zone_crippled(&mut a, BodyZone::UpperLegLeft, WoundSeverity::Light, false);
        assert_eq!(a.mobility_penalty, LEG_MOBILITY_PENALTY);
        assert!(events
            .iter()
            .any(|e| matches!(e, CombatEvent::MobilityReduced { .. })));
    }

    #[test]
    fn test_torso_cripple_hurts_more() {
        let mut torso = actor();
        on_zone_crippled(&mut torso, BodyZone::Chest, WoundSeverity::Light, false);
        let mut limb = actor();
        on_zone_crippled(&mut limb, BodyZone::LowerArmLeft, WoundSeverity::Light, false);
        assert!(torso.pain > limb.pain);
    }

    #[test]
    fn test_vital_cripple_kills() {
        let mut a = actor();
        let events = on_zone_crippled(&mut a, BodyZone::Head, WoundSeverity::Heavy, false);
        assert!(!a.is_alive());
        assert!(events.iter().any(|e| matches!(
            e,
            CombatEvent::Died {
                cause: DeathCause::VitalZone(BodyZone::Head),
                ..
            }
        )));
    }

    #[test]
    fn test_bleeds_stack_and_decay_independently() {
        let mut a = actor();
        a.bleeds.push(BleedRecord {
            zone: BodyZone::Chest,
            severity: WoundSeverity::Light,
            rate: 0.3,
            remaining_rounds: 1,
            critical: false,
        });
        a.bleeds.push(BleedRecord {
            zone: BodyZone::Stomach,
            severity: WoundSeverity::Light,
            rate: 0.3,
            remaining_rounds: 3,
            critical: false,
        });

        let events = tick_bleed(&mut a);
        let tick = events
            .iter()
            .find_map(|e| match e {
                CombatEvent::BleedTick { rate, .. } => Some(*rate),
                _ => None,
            })
            .unwrap();
        assert!((tick - 0.6).abs() < 1e-6);

        // The one-round record expired, the other keeps going
        assert_eq!(a.bleeds.len(), 1);
        assert_eq!(a.bleeds[0].remaining_rounds, 2);
    }

    #[test]
    fn test_bleed_pool_converts_fraction_to_damage() {
        let mut a = actor();
        a.bleeds.push(BleedRecord {
            zone: BodyZone::Chest,
            severity: WoundSeverity::Light,
            rate: 0.6,
            remaining_rounds: 10,
            critical: false,
        });
        let start = a.body.current_total();
        tick_bleed(&mut a); // pool 0.6, no whole point yet
        assert_eq!(a.body.current_total(), start);
        tick_bleed(&mut a); // pool 1.2 -> 1 damage
        assert_eq!(a.body.current_total(), start - 1);
    }

    #[test]
    fn test_bleed_rate_capped() {
        let mut a = actor();
        for _ in 0..20 {
            a.bleeds
                .push(BleedRecord::new(BodyZone::Chest, WoundSeverity::Heavy, true));
        }
        let events = tick_bleed(&mut a);
        let rate = events
            .iter()
            .find_map(|e| match e {
                CombatEvent::BleedTick { rate, .. } => Some(*rate),
                _ => None,
            })
            .unwrap();
        assert!(rate <= BLEED_RATE_CAP);
    }

    #[test]
    fn test_three_crippled_zones_collapse() {
        let mut a = actor();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for zone in [BodyZone::LowerArmLeft, BodyZone::LowerArmRight, BodyZone::LowerLegLeft] {
            let max = a.body.zone(zone).max;
            a.body.apply_damage(zone, max);
        }
        let events = check_collapse(&mut a, &mut rng);
        assert!(a.is_collapsed());
        assert!(events.iter().any(|e| matches!(
            e,
            CombatEvent::Collapsed {
                cause: CollapseCause::Wounds,
                ..
            }
        )));
    }

    #[test]
    fn test_low_pain_never_collapses() {
        let mut a = actor();
        a.pain = PAIN_COLLAPSE_THRESHOLD;
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(check_collapse(&mut a, &mut rng).is_empty());
        }
        assert!(!a.is_collapsed());
    }
}
