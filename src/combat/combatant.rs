//! Combatant state and the exhaustion/collapse state machine
//!
//! A combatant is built fully-formed by an external loader, mutated only by
//! the resolution components during an encounter, and permanently dead once
//! a kill condition is crossed. Condition transitions are one-directional
//! except Collapsed/Exhausted -> Active via an explicit `rest`.

use crate::combat::armor::ArmorPiece;
use crate::combat::attributes::{stat_modifier, Attributes};
use crate::combat::equipment::{Shield, Weapon};
use crate::combat::stance::Stance;
use crate::combat::wounds::BleedRecord;
use crate::combat::zone::Body;
use serde::{Deserialize, Serialize};

/// Lifecycle condition of a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConditionState {
    #[default]
    Active,
    /// Stamina overdraft; one grace action before collapse
    Exhausted,
    /// Out of the fight, recoverable through rest
    Collapsed,
    /// Terminal
    Dead,
}

/// One actor in an encounter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub attributes: Attributes,
    pub body: Body,
    pub stamina: i32,
    pub max_stamina: i32,
    pub stance: Stance,
    pub weapon_skill: i32,
    /// Raw pain accumulator; roll penalty is capped by the rules config
    pub pain: i32,
    pub stress: i32,
    pub mobility_penalty: i32,
    /// 0-100; feeds morale checks
    pub morale: i32,
    /// Elites never flee on a failed morale check
    pub elite: bool,
    /// Set when a failed morale check drives the actor out of the fight
    pub routed: bool,
    pub condition: ConditionState,
    pub bleeds: Vec<BleedRecord>,
    /// Fractional bleed carry-over between rounds
    pub bleed_pool: f32,
    /// Cumulative HP lost to bleeding, for the bleed-out threshold
    pub bleed_out_loss: i32,
    pub weapon: Option<Weapon>,
    pub shield: Option<Shield>,
    /// Lowered (not dropped) shield, e.g. forced by a two-handed weapon
    pub shield_lowered: bool,
    pub armor: Vec<ArmorPiece>,
    starting_hp: i32,
}

impl Combatant {
    pub fn new(name: &str, attributes: Attributes, total_hp: i32, max_stamina: i32) -> Self {
        let body = Body::from_total_hp(total_hp);
        let starting_hp = body.max_total();
        Self {
            name: name.to_string(),
            attributes,
            body,
            stamina: max_stamina,
            max_stamina,
            stance: Stance::Neutral,
            weapon_skill: 0,
            pain: 0,
            stress: 0,
            mobility_penalty: 0,
            morale: 100,
            elite: false,
            routed: false,
            condition: ConditionState::Active,
            bleeds: Vec::new(),
            bleed_pool: 0.0,
            bleed_out_loss: 0,
            weapon: None,
            shield: None,
            shield_lowered: false,
            armor: Vec::new(),
            starting_hp,
        }
    }

    pub fn starting_hp(&self) -> i32 {
        self.starting_hp
    }

    pub fn is_alive(&self) -> bool {
        self.condition != ConditionState::Dead
    }

    pub fn is_collapsed(&self) -> bool {
        self.condition == ConditionState::Collapsed
    }

    pub fn is_exhausted(&self) -> bool {
        self.condition == ConditionState::Exhausted
    }

    /// Can this actor take an action this turn?
    pub fn can_act(&self) -> bool {
        matches!(
            self.condition,
            ConditionState::Active | ConditionState::Exhausted
        ) && !self.routed
    }

    /// Can this actor be the target of an attack?
    pub fn can_be_engaged(&self) -> bool {
        matches!(
            self.condition,
            ConditionState::Active | ConditionState::Exhausted
        )
    }

    /// Fraction of starting HP remaining
    pub fn health_fraction(&self) -> f32 {
        self.body.current_total() as f32 / self.body.max_total().max(1) as f32
    }

    /// Pain penalty applied to attack rolls, capped
    pub fn pain_penalty(&self, cap: i32) -> i32 {
        self.pain.clamp(0, cap)
    }

    /// Stress penalty applied to attack rolls
    pub fn stress_penalty(&self) -> i32 {
        (self.stress / 10).max(0)
    }

    pub fn perception_modifier(&self) -> i32 {
        stat_modifier(self.attributes.perception)
    }

    // --- condition transitions ---

    pub fn mark_exhausted(&mut self) {
        if self.condition == ConditionState::Active {
            self.condition = ConditionState::Exhausted;
        }
    }

    pub fn mark_collapsed(&mut self) {
        if self.is_alive() {
            self.condition = ConditionState::Collapsed;
        }
    }

    pub fn mark_dead(&mut self) {
        self.condition = ConditionState::Dead;
    }

    /// Explicit rest/heal performed by the caller between rounds. The only
    /// path out of Collapsed (and Exhausted). Dead stays dead.
    pub fn rest(&mut self) -> bool {
        match self.condition {
            ConditionState::Collapsed | ConditionState::Exhausted => {
                self.condition = ConditionState::Active;
                self.stamina = self.max_stamina;
                self.pain /= 2;
                true
            }
            _ => false,
        }
    }

    /// The shield, if raised and still serviceable
    pub fn usable_shield(&self) -> Option<&Shield> {
        if self.shield_lowered {
            return None;
        }
        self.shield.as_ref().filter(|s| s.is_usable())
    }

    /// Base damage the actor swings with (unarmed fallback if no weapon)
    pub fn attack_damage(&self) -> i32 {
        self.weapon
            .as_ref()
            .map(|w| w.effective_damage())
            .unwrap_or(crate::combat::constants::UNARMED_DAMAGE)
    }
}
