pub mod error;

pub use error::{CombatError, Result};
