pub mod armor;
pub mod attributes;
pub mod combatant;
pub mod constants;
pub mod damage;
pub mod engine;
pub mod equipment;
pub mod events;
pub mod morale;
pub mod roll;
pub mod stamina;
pub mod stance;
pub mod wounds;
pub mod zone;

pub use combatant::{Combatant, ConditionState};
pub use engine::{Ability, AttackReport, AttackRequest, AttackResolution, CombatEngine};
pub use events::CombatEvent;
pub use zone::{Body, BodyZone};
