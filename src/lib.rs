//! Headless simulation core for a top-down extraction shooter.
//!
//! A raid is one [`GameState`]: a rectangular map with buildings, loot
//! containers and extraction zones, a player, and enemies driven by a
//! five-state AI. Hosts feed [`PlayerInput`] into [`GameState::step`] at a
//! fixed rate and read back a [`StepReport`] of events and HUD values.

pub mod components;
pub mod config;
pub mod constants;
pub mod enemy;
pub mod engine;
pub mod error;
pub mod events;
pub mod logging;
pub mod loot;
pub mod map;
pub mod map_gen;
pub mod pathfinding;
pub mod perception;
pub mod player;
pub mod projectile;
pub mod spawning;
pub mod systems;
pub mod time_system;
pub mod vector;
pub mod weapon;
pub mod weapon_defs;

pub use config::{Difficulty, GameConfig};
pub use engine::{GameState, RaidPhase, RaidSummary, StepReport};
pub use error::{GameError, GameResult};
pub use events::GameEvent;
pub use player::PlayerInput;
