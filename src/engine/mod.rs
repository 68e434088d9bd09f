//! Game engine - owns all raid state and advances it one step at a time.
//!
//! The engine handles:
//! - Raid state (world, map, projectiles, clock, RNG)
//! - Simulation advancement through `GameState::step`
//! - Win and loss evaluation
//!
//! A host (the headless runner, a renderer, a test) only builds
//! `PlayerInput`, calls `step`, and reads the report and snapshots.

mod game_state;
mod simulation;

pub use game_state::{GameState, RaidPhase, RaidSummary};
pub use simulation::StepReport;
