use thiserror::Error;

#[derive(Error, Debug)]
pub enum CombatError {
    #[error("Invalid rules config: {0}")]
    InvalidConfig(String),

    #[error("{actor} lacks stamina for {action}: needs {required}, has {available}")]
    InsufficientStamina {
        actor: String,
        action: String,
        required: i32,
        available: i32,
    },

}

pub type Result<T> = std::result::Result<T, CombatError>;
