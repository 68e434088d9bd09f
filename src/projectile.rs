//! Projectile descriptors produced by weapons.
//!
//! Weapons only create these. The game loop moves them, tests them against
//! walls and entities, and retires them (see `systems::combat`).

use glam::Vec2;
use hecs::Entity;

use crate::components::Faction;
use crate::time_system::has_elapsed;
use crate::weapon_defs::WeaponType;

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    /// Entity that fired it; it can never hit its owner
    pub owner: Entity,
    pub faction: Faction,
    /// Seconds the projectile may fly
    pub lifetime: f32,
    /// Game time of firing
    pub created_at: f32,
    pub kind: WeaponType,
}

impl Projectile {
    /// Move along the velocity for `dt` seconds and return the segment start.
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        let from = self.position;
        self.position += self.velocity * dt;
        from
    }

    pub fn is_expired(&self, now: f32) -> bool {
        has_elapsed(now, self.created_at, self.lifetime)
    }
}
