//! Primary attributes (0-100 scale)
//!
//! Attributes feed rolls as small d100 modifiers: one point of modifier
//! per ten points of attribute.

use serde::{Deserialize, Serialize};

/// Converts a 0-100 attribute into a d100 roll modifier.
pub fn stat_modifier(value: u8) -> i32 {
    i32::from(value) / 10
}

/// The nine primary attributes of a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: u8,
    pub dexterity: u8,
    pub agility: u8,
    pub toughness: u8,
    pub willpower: u8,
    pub endurance: u8,
    pub perception: u8,
    pub charisma: u8,
    pub intelligence: u8,
}

impl Attributes {
    /// Flat profile, useful for spawning filler combatants
    pub fn uniform(value: u8) -> Self {
        Self {
            strength: value,
            dexterity: value,
            agility: value,
            toughness: value,
            willpower: value,
            endurance: value,
            perception: value,
            charisma: value,
            intelligence: value,
        }
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::uniform(25)
    }
}
