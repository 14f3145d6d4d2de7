//! Damage distribution across body zones
//!
//! Aimed hits route everything to one zone. Spread hits split the total
//! over the valid (uncrippled, non-vital) zones by integer division; the
//! remainder drips one point at a time onto a fixed priority list so the
//! split is reproducible for a given total and zone set.

use crate::combat::combatant::Combatant;
use crate::combat::equipment::DamageType;
use crate::combat::events::CombatEvent;
use crate::combat::zone::BodyZone;
use crate::rules::config::RulesConfig;

/// Per-zone record of one application pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneDamage {
    pub zone: BodyZone,
    pub raw: i32,
    pub absorbed: i32,
    pub inflicted: i32,
    pub overkill: i32,
    pub crippled: bool,
    pub unarmored: bool,
}

/// Split `total` across `zones` deterministically.
///
/// Every zone gets the integer base share; leftover points go one at a
/// time to the remainder priority zones (chest, then alternating upper
/// legs), skipping priority zones not present in the valid set.
pub fn spread_shares(zones: &[BodyZone], total: i32) -> Vec<(BodyZone, i32)> {
    if zones.is_empty() || total <= 0 {
        return Vec::new();
    }
    let base = total / zones.len() as i32;
    let mut remainder = total % zones.len() as i32;
    let mut shares: Vec<(BodyZone, i32)> = zones.iter().map(|z| (*z, base)).collect();

    let priority: Vec<BodyZone> = BodyZone::remainder_priority()
        .into_iter()
        .filter(|p| zones.contains(p))
        .collect();
    // No priority zone left standing: fall back to the valid set order
    let targets: Vec<BodyZone> = if priority.is_empty() {
        zones.to_vec()
    } else {
        priority
    };

    let mut i = 0;
    while remainder > 0 {
        let target = targets[i % targets.len()];
        if let Some(entry) = shares.iter_mut().find(|(z, _)| *z == target) {
            entry.1 += 1;
        }
        remainder -= 1;
        i += 1;
    }

    shares.retain(|(_, amount)| *amount > 0);
    shares
}

/// Route one zone's share of raw damage through every armor piece covering
/// the zone, then into zone health. Emits the per-zone and per-piece
/// events; an unarmored zone is called out explicitly.
pub fn apply_to_zone(
    defender: &mut Combatant,
    zone: BodyZone,
    raw: i32,
    damage_type: DamageType,
    rules: &RulesConfig,
    events: &mut Vec<CombatEvent>,
) -> ZoneDamage {
    let penetration = rules.armor_penetration.factor(damage_type);
    let loss_factor = rules.durability_loss.factor(damage_type);

    let mut remaining = raw;
    let mut absorbed_total = 0;
    let mut covered = false;

    let name = defender.name.clone();
    for piece in defender.armor.iter_mut() {
        let Some(absorption) = piece.absorb(zone, remaining, damage_type, penetration, loss_factor)
        else {
            continue;
        };
        covered = true;
        absorbed_total += absorption.absorbed;
        remaining -= absorption.absorbed;
        events.push(CombatEvent::ArmorDamaged {
            actor: name.clone(),
            piece: piece.name.clone(),
            zone,
            absorbed: absorption.absorbed,
            durability_loss: absorption.durability_loss,
            remaining_durability: absorption.remaining_durability,
            condition: piece
                .zone_durability(zone)
                .map(|d| d.condition())
                .unwrap_or(crate::combat::equipment::Condition::Broken),
            broke: absorption.broke,
        });
        if remaining == 0 {
            break;
        }
    }

    let (inflicted, overkill, crippled) = defender.body.apply_damage(zone, remaining);
    events.push(CombatEvent::ZoneDamaged {
        actor: name,
        zone,
        raw,
        absorbed: absorbed_total,
        inflicted,
        unarmored: !covered,
    });

    ZoneDamage {
        zone,
        raw,
        absorbed: absorbed_total,
        inflicted,
        overkill,
        crippled,
        unarmored: !covered,
    }
}
