//! Combat tuning constants not exposed through the injected rules config
//!
//! The rules config carries the knobs a campaign tunes per ruleset; these
//! are engine-level values shared by every ruleset.

/// Damage of an unarmed strike when no weapon is equipped
pub const UNARMED_DAMAGE: i32 = 3;

/// Durability chipped off the attacker's weapon per connecting swing
pub const WEAPON_SWING_WEAR: i32 = 1;

/// Parry wear: defender's weapon loses max(1, raw / this) on a parried miss
pub const PARRY_WEAR_DIVISOR: i32 = 10;

/// Block wear: shield loses max(1, floor(raw * this)) on a blocked miss
pub const SHIELD_WEAR_FACTOR: f32 = 0.2;

// Wound consequences
pub const TORSO_CRIPPLE_PAIN: i32 = 8;
pub const LIMB_CRIPPLE_PAIN: i32 = 5;
pub const CRIPPLE_STRESS: i32 = 5;
pub const LEG_MOBILITY_PENALTY: i32 = 25;
pub const CRIPPLE_MORALE_DROP: i32 = 10;

// Bleeding
/// Hard cap on the summed per-round bleed rate across all records
pub const BLEED_RATE_CAP: f32 = 6.0;
/// Cumulative bleed loss at this fraction of starting HP is fatal
pub const BLEED_OUT_RATIO: f32 = 0.33;

// Collapse
/// Crippled zones at or above this count force a collapse
pub const COLLAPSE_CRIPPLED_ZONES: usize = 3;
/// Pain above this value starts rolling for pain collapse
pub const PAIN_COLLAPSE_THRESHOLD: i32 = 30;

// Morale
/// Aggregate health fraction below which a hit triggers a morale check
pub const MORALE_CHECK_HEALTH_RATIO: f32 = 0.3;
/// Willpower weighting on the hold threshold (willpower / this)
pub const MORALE_WILLPOWER_DIVISOR: i32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wear_constants_reasonable() {
        assert!(WEAPON_SWING_WEAR >= 1);
        assert!(PARRY_WEAR_DIVISOR > 0);
        assert!(SHIELD_WEAR_FACTOR > 0.0 && SHIELD_WEAR_FACTOR < 1.0);
    }

    #[test]
    fn test_torso_pain_exceeds_limb_pain() {
        assert!(TORSO_CRIPPLE_PAIN > LIMB_CRIPPLE_PAIN);
    }

    #[test]
    fn test_thresholds_sane() {
        assert!(BLEED_OUT_RATIO > 0.0 && BLEED_OUT_RATIO < 1.0);
        assert!(MORALE_CHECK_HEALTH_RATIO > 0.0 && MORALE_CHECK_HEALTH_RATIO < 1.0);
        assert!(COLLAPSE_CRIPPLED_ZONES >= 2);
    }
}
