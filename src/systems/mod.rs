//! Game systems organized by domain.
//!
//! - `ai`: enemy state machine, perception-driven behavior and attacks
//! - `flocking`: separation, cohesion and alignment among nearby enemies
//! - `combat`: projectile flight and hits, melee, dead enemy cleanup
//! - `extraction`: the extraction zone dwell timer

pub mod ai;
pub mod combat;
pub mod extraction;
pub mod flocking;

pub use ai::{run_enemy_ai, transition, AiEvent, MeleeHit, TargetInfo};
pub use combat::{apply_melee_hits, remove_dead_enemies, update_projectiles};
pub use extraction::{ExtractionProgress, ExtractionTracker};
pub use flocking::apply_flocking;
