//! Game constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.
//! Constants are split into submodules by domain for easier navigation.

mod ai;
mod combat;
mod enemies;
mod game;
mod map;
mod player;

pub use ai::*;
pub use combat::*;
pub use enemies::*;
pub use game::*;
pub use map::*;
pub use player::*;
