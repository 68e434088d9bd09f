//! Player movement, stamina and interaction constants.

/// Player starting health
pub const PLAYER_MAX_HEALTH: f32 = 100.0;
/// Player collision radius
pub const PLAYER_RADIUS: f32 = 15.0;
/// Walking speed in units per second
pub const PLAYER_SPEED: f32 = 150.0;
/// Speed multiplier while sprinting
pub const PLAYER_SPRINT_MULTIPLIER: f32 = 1.6;
/// Per-tick velocity multiplier once movement input is released
pub const PLAYER_FRICTION: f32 = 0.8;
/// Speed below which a coasting player snaps to a stop
pub const PLAYER_STOP_THRESHOLD: f32 = 5.0;

/// Maximum stamina
pub const PLAYER_MAX_STAMINA: f32 = 100.0;
/// Stamina drained per second of sprinting
pub const STAMINA_DRAIN_RATE: f32 = 25.0;
/// Stamina regenerated per second while walking
pub const STAMINA_REGEN_MOVING: f32 = 8.0;
/// Stamina regenerated per second while standing still
pub const STAMINA_REGEN_IDLE: f32 = 20.0;

/// Number of weapon slots
pub const MAX_WEAPONS: usize = 3;
/// Default loot inventory capacity
pub const DEFAULT_INVENTORY_SIZE: usize = 12;

/// Maximum distance to a container for searching
pub const SEARCH_RANGE: f32 = 50.0;
/// Seconds needed to search a container
pub const SEARCH_TIME: f32 = 3.0;
/// Maximum distance to a ground item for pickup
pub const PICKUP_RANGE: f32 = 30.0;
