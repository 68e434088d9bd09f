//! Enemy archetype stats.

/// Collision radius shared by all enemies
pub const ENEMY_RADIUS: f32 = 15.0;

// SCAV
/// Scav health
pub const SCAV_HEALTH: f32 = 80.0;
/// Scav patrol speed
pub const SCAV_PATROL_SPEED: f32 = 50.0;
/// Scav chase speed
pub const SCAV_CHASE_SPEED: f32 = 100.0;
/// Scav attack range
pub const SCAV_ATTACK_RANGE: f32 = 200.0;
/// Scav seconds between attacks
pub const SCAV_ATTACK_COOLDOWN: f32 = 0.8;
/// Scav base accuracy (0.0 - 1.0)
pub const SCAV_ACCURACY: f32 = 0.5;

// RAIDER
/// Raider health
pub const RAIDER_HEALTH: f32 = 120.0;
/// Raider patrol speed
pub const RAIDER_PATROL_SPEED: f32 = 55.0;
/// Raider chase speed
pub const RAIDER_CHASE_SPEED: f32 = 110.0;
/// Raider attack range (rifles reach further)
pub const RAIDER_ATTACK_RANGE: f32 = 280.0;
/// Raider seconds between attacks
pub const RAIDER_ATTACK_COOLDOWN: f32 = 0.5;
/// Raider base accuracy
pub const RAIDER_ACCURACY: f32 = 0.65;

// HEAVY
/// Heavy health (slow and tanky)
pub const HEAVY_HEALTH: f32 = 200.0;
/// Heavy patrol speed
pub const HEAVY_PATROL_SPEED: f32 = 40.0;
/// Heavy chase speed
pub const HEAVY_CHASE_SPEED: f32 = 80.0;
/// Heavy attack range (shotgun)
pub const HEAVY_ATTACK_RANGE: f32 = 150.0;
/// Heavy seconds between attacks
pub const HEAVY_ATTACK_COOLDOWN: f32 = 1.2;
/// Heavy base accuracy
pub const HEAVY_ACCURACY: f32 = 0.6;

// BRUTE
/// Brute health
pub const BRUTE_HEALTH: f32 = 150.0;
/// Brute patrol speed
pub const BRUTE_PATROL_SPEED: f32 = 60.0;
/// Brute chase speed (fast, closes the gap)
pub const BRUTE_CHASE_SPEED: f32 = 130.0;
/// Brute attack range (melee)
pub const BRUTE_ATTACK_RANGE: f32 = 30.0;
/// Brute seconds between attacks
pub const BRUTE_ATTACK_COOLDOWN: f32 = 1.0;
/// Brute melee damage
pub const BRUTE_MELEE_DAMAGE: f32 = 25.0;
