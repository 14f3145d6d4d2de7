//! Morale checks
//!
//! A badly hurt combatant tests nerve instead of fighting to the death:
//! the hold threshold is morale weighted up by willpower, rolled on a
//! d100. Elites hold regardless.

use crate::combat::attributes::stat_modifier;
use crate::combat::combatant::Combatant;
use crate::combat::constants::{MORALE_CHECK_HEALTH_RATIO, MORALE_WILLPOWER_DIVISOR};
use crate::combat::events::CombatEvent;
use crate::combat::wounds::WoundSeverity;
use rand::Rng;

/// Should this hit trigger a morale check on the defender?
///
/// Fires when aggregate health drops below the check ratio or the hit
/// produced a heavy wound.
pub fn check_required(defender: &Combatant, worst_wound: Option<WoundSeverity>) -> bool {
    defender.health_fraction() < MORALE_CHECK_HEALTH_RATIO
        || worst_wound == Some(WoundSeverity::Heavy)
}

/// Run the morale check. A failure routs the actor (break off/flee) unless
/// they are elite; elites log the shaken nerve (`held: false`) and keep
/// fighting.
pub fn check_morale<R: Rng>(actor: &mut Combatant, rng: &mut R) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    if !actor.is_alive() || actor.routed {
        return events;
    }

    let willpower_weight =
        stat_modifier(actor.attributes.willpower) * (10 / MORALE_WILLPOWER_DIVISOR);
    let threshold = (actor.morale + willpower_weight).clamp(0, 100);
    let roll = rng.gen_range(1..=100);
    // The event carries the raw roll result; the elite exemption only
    // suppresses the rout, never the record of the failed nerve.
    let held = roll <= threshold;

    events.push(CombatEvent::MoraleChecked {
        actor: actor.name.clone(),
        roll,
        threshold,
        held,
    });

    if !held && !actor.elite {
        actor.routed = true;
        events.push(CombatEvent::MoraleBroken {
            actor: actor.name.clone(),
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::attributes::Attributes;
    use crate::combat::zone::BodyZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn actor() -> Combatant {
        Combatant::new("Caldran", Attributes::default(), 100, 20)
    }

    #[test]
    fn test_check_required_on_low_health() {
        let mut a = actor();
        assert!(!check_required(&a, None));
        // Strip HP below 30%
        for zone in BodyZone::all() {
            let max = a.body.zone(zone).max;
            a.body.apply_damage(zone, (max * 3) / 4);
        }
        assert!(check_required(&a, None));
    }

    #[test]
    fn test_check_required_on_heavy_wound() {
        let a = actor();
        assert!(check_required(&a, Some(WoundSeverity::Heavy)));
        assert!(!check_required(&a, Some(WoundSeverity::Light)));
    }

    #[test]
    fn test_zero_morale_breaks() {
        let mut a = actor();
        a.morale = 0;
        a.attributes.willpower = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let events = check_morale(&mut a, &mut rng);
        assert!(a.routed);
        assert!(events
            .iter()
            .any(|e| matches!(e, CombatEvent::MoraleBroken { .. })));
    }

    #[test]
    fn test_full_morale_holds() {
        let mut a = actor();
        a.morale = 100;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..20 {
            check_morale(&mut a, &mut rng);
        }
        assert!(!a.routed);
    }

    #[test]
    fn test_elite_never_routs() {
        let mut a = actor();
        a.morale = 0;
        a.elite = true;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..20 {
            let events = check_morale(&mut a, &mut rng);
            assert!(!events
                .iter()
                .any(|e| matches!(e, CombatEvent::MoraleBroken { .. })));
        }
        assert!(!a.routed);
    }

    #[test]
    fn test_elite_failed_nerve_is_recorded() {
        let mut a = actor();
        a.morale = 0;
        a.attributes.willpower = 0;
        a.elite = true;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let events = check_morale(&mut a, &mut rng);
        // Threshold 0 cannot be rolled under: the log shows the failed
        // check, the elite just refuses to break on it.
        assert!(events
            .iter()
            .any(|e| matches!(e, CombatEvent::MoraleChecked { held: false, .. })));
        assert!(!events
            .iter()
            .any(|e| matches!(e, CombatEvent::MoraleBroken { .. })));
        assert!(!a.routed);
    }
}
