//! Error type for configuration and data-table lookups.
//!
//! The simulation itself never fails: bad numbers are clamped and lost
//! references become state transitions. Only identifiers coming from
//! outside the crate (weapon names, difficulty names, config files) can be
//! rejected.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("unknown weapon type `{0}`")]
    UnknownWeaponType(String),

    #[error("unknown difficulty `{0}` (expected easy, normal, hard or extreme)")]
    UnknownDifficulty(String),

    #[error("unknown container type `{0}`")]
    UnknownContainerType(String),

    #[error("invalid game config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type GameResult<T> = Result<T, GameError>;
