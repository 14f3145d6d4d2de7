//! Body zones and per-zone health (12 zones)
//!
//! Every combatant's hit points live entirely in its zones: aggregate HP is
//! the sum of zone HP, never a separate counter. A zone at zero is crippled.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Body zones for hit location (12 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyZone {
    /// Vital - a crippling hit here kills
    Head,
    /// Vital - arterial
    Throat,
    Chest,
    Stomach,
    UpperArmLeft,
    UpperArmRight,
    LowerArmLeft,
    LowerArmRight,
    UpperLegLeft,
    UpperLegRight,
    LowerLegLeft,
    LowerLegRight,
}

impl BodyZone {
    pub const COUNT: usize = 12;

    /// All zones, in canonical order (also the storage order of `Body`)
    pub fn all() -> [BodyZone; Self::COUNT] {
        [
            BodyZone::Head,
            BodyZone::Throat,
            BodyZone::Chest,
            BodyZone::Stomach,
            BodyZone::UpperArmLeft,
            BodyZone::UpperArmRight,
            BodyZone::LowerArmLeft,
            BodyZone::LowerArmRight,
            BodyZone::UpperLegLeft,
            BodyZone::UpperLegRight,
            BodyZone::LowerLegLeft,
            BodyZone::LowerLegRight,
        ]
    }

    pub(crate) fn index(self) -> usize {
        Self::all().iter().position(|z| *z == self).unwrap_or(0)
    }

    /// Share of total HP assigned to this zone, in percent (sums to 100)
    pub fn health_share(self) -> i32 {
        match self {
            BodyZone::Head => 6,
            BodyZone::Throat => 3,
            BodyZone::Chest => 19,
            BodyZone::Stomach => 14,
            BodyZone::UpperArmLeft | BodyZone::UpperArmRight => 5,
            BodyZone::LowerArmLeft | BodyZone::LowerArmRight => 6,
            BodyZone::UpperLegLeft | BodyZone::UpperLegRight => 10,
            BodyZone::LowerLegLeft | BodyZone::LowerLegRight => 8,
        }
    }

    /// Vital zones kill outright when crippled
    pub fn is_vital(self) -> bool {
        matches!(self, BodyZone::Head | BodyZone::Throat)
    }

    pub fn is_torso(self) -> bool {
        matches!(self, BodyZone::Chest | BodyZone::Stomach)
    }

    pub fn is_leg(self) -> bool {
        matches!(
            self,
            BodyZone::UpperLegLeft
                | BodyZone::UpperLegRight
                | BodyZone::LowerLegLeft
                | BodyZone::LowerLegRight
        )
    }

    /// Zones eligible for spread (unaimed) damage: everything non-vital
    pub fn spread_set() -> [BodyZone; 10] {
        [
            BodyZone::Chest,
            BodyZone::Stomach,
            BodyZone::UpperArmLeft,
            BodyZone::UpperArmRight,
            BodyZone::LowerArmLeft,
            BodyZone::LowerArmRight,
            BodyZone::UpperLegLeft,
            BodyZone::UpperLegRight,
            BodyZone::LowerLegLeft,
            BodyZone::LowerLegRight,
        ]
    }

    /// Remainder priority for spread damage: chest first, then the upper
    /// legs alternating left/right. Keeps integer splits reproducible.
    pub fn remainder_priority() -> [BodyZone; 3] {
        [
            BodyZone::Chest,
            BodyZone::UpperLegLeft,
            BodyZone::UpperLegRight,
        ]
    }
}

impl fmt::Display for BodyZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BodyZone::Head => "head",
            BodyZone::Throat => "throat",
            BodyZone::Chest => "chest",
            BodyZone::Stomach => "stomach",
            BodyZone::UpperArmLeft => "left upper arm",
            BodyZone::UpperArmRight => "right upper arm",
            BodyZone::LowerArmLeft => "left lower arm",
            BodyZone::LowerArmRight => "right lower arm",
            BodyZone::UpperLegLeft => "left upper leg",
            BodyZone::UpperLegRight => "right upper leg",
            BodyZone::LowerLegLeft => "left lower leg",
            BodyZone::LowerLegRight => "right lower leg",
        };
        write!(f, "{}", label)
    }
}

/// Current/max health of a single zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneHealth {
    pub current: i32,
    pub max: i32,
}

impl ZoneHealth {
    pub fn is_crippled(&self) -> bool {
        self.current == 0
    }
}

/// The full zone-health map of one combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    zones: [ZoneHealth; BodyZone::COUNT],
}

impl Body {
    /// Split a total HP pool into zone maxima by `health_share`.
    ///
    /// Integer rounding leftovers go to the chest so that the sum of zone
    /// maxima equals `total_hp` exactly.
    pub fn from_total_hp(total_hp: i32) -> Self {
        let total_hp = total_hp.max(1);
        let mut zones = [ZoneHealth { current: 0, max: 0 }; BodyZone::COUNT];
        let mut assigned = 0;
        for zone in BodyZone::all() {
            let max = (total_hp * zone.health_share() / 100).max(1);
            zones[zone.index()] = ZoneHealth { current: max, max };
            assigned += max;
        }
        let leftover = total_hp - assigned;
        if leftover > 0 {
            let chest = &mut zones[BodyZone::Chest.index()];
            chest.max += leftover;
            chest.current += leftover;
        }
        Self { zones }
    }

    pub fn zone(&self, zone: BodyZone) -> ZoneHealth {
        self.zones[zone.index()]
    }

    /// Sum of current zone HP. This IS the combatant's current HP.
    pub fn current_total(&self) -> i32 {
        self.zones.iter().map(|z| z.current).sum()
    }

    pub fn max_total(&self) -> i32 {
        self.zones.iter().map(|z| z.max).sum()
    }

    pub fn crippled_count(&self) -> usize {
        self.zones.iter().filter(|z| z.is_crippled()).count()
    }

    /// Zones from `set` that can still take damage
    pub fn valid_zones(&self, set: &[BodyZone]) -> Vec<BodyZone> {
        set.iter()
            .copied()
            .filter(|z| self.zone(*z).current > 0)
            .collect()
    }

    /// Apply damage to a zone, clamping at zero.
    ///
    /// Returns (inflicted, overkill, crippled_now). Overkill is the portion
    /// of the hit that exceeded the zone's remaining HP; it feeds wound
    /// severity, never negative zone HP.
    pub fn apply_damage(&mut self, zone: BodyZone, amount: i32) -> (i32, i32, bool) {
        let amount = amount.max(0);
        let slot = &mut self.zones[zone.index()];
        if slot.current == 0 || amount == 0 {
            return (0, amount, false);
        }
        let inflicted = amount.min(slot.current);
        let overkill = amount - inflicted;
        slot.current -= inflicted;
        (inflicted, overkill, slot.current == 0)
    }

    /// Restore a zone (external healing hook)
    pub fn heal(&mut self, zone: BodyZone, amount: i32) -> i32 {
        let slot = &mut self.zones[zone.index()];
        let healed = amount.max(0).min(slot.max - slot.current);
        slot.current += healed;
        healed
    }
}
