//! Combat system constants.

/// Flight time (seconds) at which a chase shot's hit chance reaches zero
pub const TRY_SHOOT_FLIGHT_TIME: f32 = 1.0;
/// Upper bound for a chase shot's hit chance before accuracy scaling
pub const TRY_SHOOT_MAX_CHANCE: f32 = 0.8;
/// Aim error (radians) of a fully inaccurate enemy; scaled by 1 - accuracy
pub const ENEMY_AIM_ERROR: f32 = 0.25;
/// Extra reach beyond touching radii for melee hits
pub const MELEE_REACH: f32 = 10.0;

/// Collision radius of a projectile
pub const PROJECTILE_RADIUS: f32 = 2.0;
/// Muzzle flash duration in seconds (cosmetic)
pub const MUZZLE_FLASH_DURATION: f32 = 0.05;

/// Minimum value of the loot a dead enemy drops
pub const ENEMY_LOOT_DROP_MIN: u32 = 40;
/// Maximum value of the loot a dead enemy drops
pub const ENEMY_LOOT_DROP_MAX: u32 = 160;

/// Spacing of the wall samples taken along a projectile's path each tick
pub const WALL_SAMPLE_STEP: f32 = 2.0;
