//! Armor pieces with per-zone durability
//!
//! Each covered zone wears down independently; protection scales with that
//! zone's durability band and is reduced by the weapon's penetration
//! factor. A zone at zero durability offers nothing and is reported broken.

use crate::combat::equipment::{Condition, DamageType, Durability};
use crate::combat::zone::BodyZone;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Protection ratings per damage type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Protection {
    pub slashing: i32,
    pub piercing: i32,
    pub blunt: i32,
}

impl Protection {
    pub fn uniform(value: i32) -> Self {
        Self {
            slashing: value,
            piercing: value,
            blunt: value,
        }
    }

    pub fn rating(&self, damage_type: DamageType) -> i32 {
        match damage_type {
            DamageType::Slashing => self.slashing,
            DamageType::Piercing => self.piercing,
            DamageType::Blunt => self.blunt,
        }
    }
}

/// What a single absorption pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Absorption {
    pub absorbed: i32,
    pub durability_loss: i32,
    pub remaining_durability: i32,
    /// The zone's plating broke on this hit
    pub broke: bool,
}

/// One piece of armor covering a set of zones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorPiece {
    pub name: String,
    pub protection: Protection,
    /// Per-zone durability; the key set is the coverage
    zones: BTreeMap<String, Durability>,
}

impl ArmorPiece {
    pub fn new(name: &str, protection: Protection, coverage: &[BodyZone], durability: i32) -> Self {
        let zones = coverage
            .iter()
            .map(|z| (z.to_string(), Durability::new(durability)))
            .collect();
        Self {
            name: name.to_string(),
            protection,
            zones,
        }
    }

    pub fn covers(&self, zone: BodyZone) -> bool {
        self.zones.contains_key(&zone.to_string())
    }

    pub fn zone_durability(&self, zone: BodyZone) -> Option<Durability> {
        self.zones.get(&zone.to_string()).copied()
    }

    pub fn zone_condition(&self, zone: BodyZone) -> Option<Condition> {
        self.zone_durability(zone).map(|d| d.condition())
    }

    /// Absorb an incoming hit on `zone`.
    ///
    /// Effective protection = rating x durability-band multiplier x
    /// (1 - penetration). Durability loss is max(1, floor(raw x loss
    /// factor)) and only ever touches this zone's pool. Returns `None`
    /// when the piece does not cover the zone.
    pub fn absorb(
        &mut self,
        zone: BodyZone,
        raw_damage: i32,
        damage_type: DamageType,
        penetration: f32,
        loss_factor: f32,
    ) -> Option<Absorption> {
        let durability = self.zones.get_mut(&zone.to_string())?;
        let raw_damage = raw_damage.max(0);

        let effective = (self.protection.rating(damage_type) as f32
            * durability.condition_multiplier()
            * (1.0 - penetration.clamp(0.0, 1.0)))
        .floor() as i32;
        let absorbed = effective.clamp(0, raw_damage);

        let was_broken = durability.is_broken();
        let loss = if was_broken {
            0
        } else {
            let loss = ((raw_damage as f32 * loss_factor).floor() as i32).max(1);
            durability.wear(loss)
        };

        Some(Absorption {
            absorbed,
            durability_loss: loss,
            remaining_durability: durability.current,
            broke: !was_broken && durability.is_broken(),
        })
    }
}
