//! Combat stances
//!
//! Every combatant is in exactly one stance. Stance trades attack for
//! defense and shifts stamina economy (see `RulesConfig`).

use serde::{Deserialize, Serialize};

/// Combat stance - exactly one of three values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Stance {
    /// Bonus to attack, penalty to defense, worst stamina regen
    Offensive,
    #[default]
    Neutral,
    /// Penalty to attack, bonus to defense
    Defensive,
}

impl Stance {
    /// Additive d100 modifier on attack rolls
    pub fn attack_modifier(self) -> i32 {
        match self {
            Stance::Offensive => 10,
            Stance::Neutral => 0,
            Stance::Defensive => -10,
        }
    }

    /// Additive d100 modifier on defense rolls
    pub fn defense_modifier(self) -> i32 {
        match self {
            Stance::Offensive => -10,
            Stance::Neutral => 0,
            Stance::Defensive => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stance_tradeoff_is_symmetric() {
        for stance in [Stance::Offensive, Stance::Neutral, Stance::Defensive] {
            assert_eq!(stance.attack_modifier(), -stance.defense_modifier());
        }
    }

    #[test]
    fn test_default_is_neutral() {
        assert_eq!(Stance::default(), Stance::Neutral);
    }
}
