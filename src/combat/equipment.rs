//! Weapons, shields, and shared durability handling
//!
//! Durability is banded: protection and reporting step down at 75/50/25%
//! remaining and hit zero when the piece breaks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Damage categories; also key the penetration and wear tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Slashing,
    Piercing,
    Blunt,
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DamageType::Slashing => "slashing",
            DamageType::Piercing => "piercing",
            DamageType::Blunt => "blunt",
        };
        write!(f, "{}", s)
    }
}

/// Human-readable equipment condition, derived from remaining durability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Pristine,
    Good,
    Worn,
    Damaged,
    Critical,
    Broken,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Condition::Pristine => "pristine",
            Condition::Good => "good",
            Condition::Worn => "worn",
            Condition::Damaged => "damaged",
            Condition::Critical => "critical",
            Condition::Broken => "broken",
        };
        write!(f, "{}", s)
    }
}

/// Current/max durability pool shared by weapons, shields, and armor zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durability {
    pub current: i32,
    pub max: i32,
}

impl Durability {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn ratio(&self) -> f32 {
        if self.max <= 0 {
            return 0.0;
        }
        self.current.max(0) as f32 / self.max as f32
    }

    pub fn is_broken(&self) -> bool {
        self.current <= 0
    }

    /// Protection scaling by durability band: full at >=75%, then 0.75,
    /// 0.5, 0.25, and zero when broken.
    pub fn condition_multiplier(&self) -> f32 {
        let r = self.ratio();
        if r >= 0.75 {
            1.0
        } else if r >= 0.5 {
            0.75
        } else if r >= 0.25 {
            0.5
        } else if r > 0.0 {
            0.25
        } else {
            0.0
        }
    }

    pub fn condition(&self) -> Condition {
        let pct = self.ratio() * 100.0;
        if pct >= 90.0 {
            Condition::Pristine
        } else if pct >= 75.0 {
            Condition::Good
        } else if pct >= 50.0 {
            Condition::Worn
        } else if pct >= 25.0 {
            Condition::Damaged
        } else if pct > 0.0 {
            Condition::Critical
        } else {
            Condition::Broken
        }
    }

    /// Reduce durability, never below zero. Returns actual loss.
    pub fn wear(&mut self, amount: i32) -> i32 {
        let loss = amount.max(0).min(self.current.max(0));
        self.current -= loss;
        loss
    }
}

/// An equipped weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    /// Template kind, matched against the two-handed list in the rules
    pub kind: String,
    pub damage_type: DamageType,
    pub base_damage: i32,
    pub durability: Durability,
}

impl Weapon {
    pub fn new(name: &str, kind: &str, damage_type: DamageType, base_damage: i32, durability: i32) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            damage_type,
            base_damage,
            durability: Durability::new(durability),
        }
    }

    /// Damage the weapon actually deals: a broken weapon fights on at half
    /// effect (minimum 1), it does not vanish mid-encounter.
    pub fn effective_damage(&self) -> i32 {
        if self.durability.is_broken() {
            (self.base_damage / 2).max(1)
        } else {
            self.base_damage
        }
    }
}

/// An equipped shield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shield {
    pub name: String,
    pub durability: Durability,
    /// Added to block defense totals while the shield holds
    pub block_bonus: i32,
}

impl Shield {
    pub fn new(name: &str, durability: i32, block_bonus: i32) -> Self {
        Self {
            name: name.to_string(),
            durability: Durability::new(durability),
            block_bonus,
        }
    }

    pub fn is_usable(&self) -> bool {
        !self.durability.is_broken()
    }
}
