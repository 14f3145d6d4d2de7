pub mod config;

pub use config::{
    AimedAttack, Criticals, DamageTypeFactors, OverdraftRule, RulesConfig, StaminaCosts,
    StaminaRegen, TwoHandedRule,
};
