//! Injected rules configuration
//!
//! Every campaign-tunable number the resolution core consumes lives here,
//! supplied once at engine construction and validated fail-fast: the core
//! never tolerates an invalid ruleset mid-combat.

use crate::combat::equipment::DamageType;
use crate::combat::stamina::ActionKind;
use crate::combat::stance::Stance;
use crate::core::error::{CombatError, Result};
use serde::{Deserialize, Serialize};

/// Base stamina costs per action, plus per-stance cost shifts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaminaCosts {
    pub attack: i32,
    pub parry: i32,
    pub block: i32,
    pub dodge: i32,
    pub offensive_modifier: i32,
    pub neutral_modifier: i32,
    pub defensive_modifier: i32,
}

impl StaminaCosts {
    pub fn base_cost(&self, action: ActionKind) -> i32 {
        match action {
            ActionKind::Attack => self.attack,
            ActionKind::Parry => self.parry,
            ActionKind::Block => self.block,
            ActionKind::Dodge => self.dodge,
        }
    }

    pub fn stance_modifier(&self, stance: Stance) -> i32 {
        match stance {
            Stance::Offensive => self.offensive_modifier,
            Stance::Neutral => self.neutral_modifier,
            Stance::Defensive => self.defensive_modifier,
        }
    }
}

impl Default for StaminaCosts {
    fn default() -> Self {
        Self {
            attack: 5,
            parry: 3,
            block: 3,
            dodge: 2,
            offensive_modifier: 1,
            neutral_modifier: 0,
            defensive_modifier: -1,
        }
    }
}

/// Per-stance stamina regeneration; neutral recovers most
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaminaRegen {
    pub offensive: i32,
    pub neutral: i32,
    pub defensive: i32,
}

impl StaminaRegen {
    pub fn amount(&self, stance: Stance) -> i32 {
        match stance {
            Stance::Offensive => self.offensive,
            Stance::Neutral => self.neutral,
            Stance::Defensive => self.defensive,
        }
    }
}

impl Default for StaminaRegen {
    fn default() -> Self {
        Self {
            offensive: 2,
            neutral: 4,
            defensive: 3,
        }
    }
}

/// Critical thresholds on the raw attack die, and the damage multiplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criticals {
    pub hit_threshold: i32,
    pub miss_threshold: i32,
    pub multiplier: f32,
}

impl Default for Criticals {
    fn default() -> Self {
        Self {
            hit_threshold: 95,
            miss_threshold: 5,
            multiplier: 1.5,
        }
    }
}

/// Aimed-strike penalty: base minus a dexterity-derived relief, floored at 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AimedAttack {
    pub base_penalty: i32,
    pub dexterity_relief_ratio: f32,
    /// Extra damage on an aimed head-shot critical, in percent
    pub head_crit_bonus_pct: i32,
}

impl AimedAttack {
    pub fn penalty(&self, dexterity: u8) -> i32 {
        let relief = (f32::from(dexterity) * self.dexterity_relief_ratio).round() as i32;
        (self.base_penalty - relief).max(0)
    }
}

impl Default for AimedAttack {
    fn default() -> Self {
        Self {
            base_penalty: 30,
            dexterity_relief_ratio: 0.1,
            head_crit_bonus_pct: 10,
        }
    }
}

/// Per-damage-type factors (penetration, durability wear)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DamageTypeFactors {
    pub slashing: f32,
    pub piercing: f32,
    pub blunt: f32,
}

impl DamageTypeFactors {
    pub fn factor(&self, damage_type: DamageType) -> f32 {
        match damage_type {
            DamageType::Slashing => self.slashing,
            DamageType::Piercing => self.piercing,
            DamageType::Blunt => self.blunt,
        }
    }
}

/// Two-handed weapon / shield exclusivity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoHandedRule {
    pub shields_allowed: bool,
    pub two_handed_kinds: Vec<String>,
}

impl TwoHandedRule {
    pub fn is_two_handed(&self, kind: &str) -> bool {
        self.two_handed_kinds.iter().any(|k| k == kind)
    }
}

impl Default for TwoHandedRule {
    fn default() -> Self {
        Self {
            shields_allowed: false,
            two_handed_kinds: vec![
                "greatsword".to_string(),
                "polearm".to_string(),
                "maul".to_string(),
            ],
        }
    }
}

/// Stamina overdraft bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverdraftRule {
    /// Below this, a charge counts as an overdraft (exhaustion ladder)
    pub floor: i32,
    /// Fraction of max stamina below zero where actions are refused outright
    pub hard_floor_ratio: f32,
}

impl OverdraftRule {
    pub fn hard_floor(&self, max_stamina: i32) -> i32 {
        -((max_stamina as f32 * self.hard_floor_ratio).round() as i32)
    }
}

impl Default for OverdraftRule {
    fn default() -> Self {
        Self {
            floor: 0,
            hard_floor_ratio: 0.3,
        }
    }
}

/// The complete injected parameter table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    pub stamina_costs: StaminaCosts,
    pub stamina_regen: StaminaRegen,
    pub criticals: Criticals,
    pub aimed_attack: AimedAttack,
    pub armor_penetration: DamageTypeFactors,
    pub durability_loss: DamageTypeFactors,
    pub two_handed: TwoHandedRule,
    pub overdraft: OverdraftRule,
    /// Cap on the pain penalty applied to rolls, whatever the raw pain
    pub pain_penalty_cap: i32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            stamina_costs: StaminaCosts::default(),
            stamina_regen: StaminaRegen::default(),
            criticals: Criticals::default(),
            aimed_attack: AimedAttack::default(),
            armor_penetration: DamageTypeFactors {
                slashing: 0.10,
                piercing: 0.25,
                blunt: 0.0,
            },
            // Blunt wears armor fastest, piercing slowest
            durability_loss: DamageTypeFactors {
                slashing: 0.20,
                piercing: 0.10,
                blunt: 0.30,
            },
            two_handed: TwoHandedRule::default(),
            overdraft: OverdraftRule::default(),
            pain_penalty_cap: 20,
        }
    }
}

impl RulesConfig {
    /// Validate internal consistency. Called at engine construction; a
    /// config that fails here never reaches an encounter.
    pub fn validate(&self) -> Result<()> {
        if self.criticals.miss_threshold >= self.criticals.hit_threshold {
            return Err(CombatError::InvalidConfig(format!(
                "critical_miss_threshold ({}) must be below critical_hit_threshold ({})",
                self.criticals.miss_threshold, self.criticals.hit_threshold
            )));
        }
        if self.criticals.multiplier < 1.0 {
            return Err(CombatError::InvalidConfig(format!(
                "critical multiplier ({}) must be >= 1.0",
                self.criticals.multiplier
            )));
        }
        for (label, f) in [
            ("slashing", self.armor_penetration.slashing),
            ("piercing", self.armor_penetration.piercing),
            ("blunt", self.armor_penetration.blunt),
        ] {
            if !(0.0..=1.0).contains(&f) {
                return Err(CombatError::InvalidConfig(format!(
                    "armor_penetration.{} ({}) must be within [0, 1]",
                    label, f
                )));
            }
        }
        for (label, f) in [
            ("slashing", self.durability_loss.slashing),
            ("piercing", self.durability_loss.piercing),
            ("blunt", self.durability_loss.blunt),
        ] {
            if f <= 0.0 {
                return Err(CombatError::InvalidConfig(format!(
                    "durability_loss.{} ({}) must be positive",
                    label, f
                )));
            }
        }
        let costs = &self.stamina_costs;
        if costs.attack < 0 || costs.parry < 0 || costs.block < 0 || costs.dodge < 0 {
            return Err(CombatError::InvalidConfig(
                "stamina costs must be non-negative".to_string(),
            ));
        }
        let regen = &self.stamina_regen;
        if regen.offensive < 0 || regen.neutral < 0 || regen.defensive < 0 {
            return Err(CombatError::InvalidConfig(
                "stamina regen must be non-negative".to_string(),
            ));
        }
        if self.aimed_attack.base_penalty < 0 || self.aimed_attack.dexterity_relief_ratio < 0.0 {
            return Err(CombatError::InvalidConfig(
                "aimed attack penalty and relief ratio must be non-negative".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.overdraft.hard_floor_ratio)
            || self.overdraft.hard_floor_ratio == 0.0
        {
            return Err(CombatError::InvalidConfig(format!(
                "overdraft.hard_floor_ratio ({}) must be within (0, 1]",
                self.overdraft.hard_floor_ratio
            )));
        }
        if self.pain_penalty_cap < 0 {
            return Err(CombatError::InvalidConfig(
                "pain_penalty_cap must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(RulesConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_crit_thresholds_rejected() {
        let mut config = RulesConfig::default();
        config.criticals.hit_threshold = 5;
        config.criticals.miss_threshold = 95;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_penetration_out_of_range_rejected() {
        let mut config = RulesConfig::default();
        config.armor_penetration.piercing = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_aimed_penalty_relief() {
        let aimed = AimedAttack::default();
        // base 30, dex 20, relief ratio 1:10 -> net 28
        assert_eq!(aimed.penalty(20), 28);
        // Relief floors the penalty at zero
        let generous = AimedAttack {
            base_penalty: 5,
            dexterity_relief_ratio: 1.0,
            head_crit_bonus_pct: 10,
        };
        assert_eq!(generous.penalty(90), 0);
    }

    #[test]
    fn test_neutral_regenerates_most() {
        let regen = StaminaRegen::default();
        assert!(regen.neutral > regen.defensive);
        assert!(regen.defensive > regen.offensive);
    }

    #[test]
    fn test_hard_floor_scales_with_max() {
        let rule = OverdraftRule::default();
        assert_eq!(rule.hard_floor(20), -6);
        assert_eq!(rule.hard_floor(100), -30);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = RulesConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: RulesConfig = serde_json::from_str(&json).unwrap();
        assert!(back.validate().is_ok());
        assert_eq!(back.criticals.hit_threshold, config.criticals.hit_threshold);
    }
}
