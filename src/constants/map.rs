//! Map size and generation constants.

/// Default map width in world units
pub const MAP_DEFAULT_WIDTH: f32 = 2000.0;
/// Default map height in world units
pub const MAP_DEFAULT_HEIGHT: f32 = 2000.0;

/// Number of buildings placed by the generator
pub const MAP_BUILDING_COUNT: usize = 12;
/// Smallest building side length
pub const MAP_BUILDING_MIN_SIZE: f32 = 80.0;
/// Largest building side length
pub const MAP_BUILDING_MAX_SIZE: f32 = 200.0;
/// Keep-out margin along map edges for buildings
pub const MAP_EDGE_MARGIN: f32 = 100.0;

/// Number of containers placed by the generator
pub const MAP_CONTAINER_COUNT: usize = 20;
/// Number of loose ground items placed by the generator
pub const MAP_GROUND_ITEM_COUNT: usize = 15;

/// Number of extraction zones
pub const EXTRACTION_ZONE_COUNT: usize = 2;
/// Extraction zone radius
pub const EXTRACTION_ZONE_RADIUS: f32 = 60.0;

/// Enemies never spawn closer than this to the player spawn
pub const PLAYER_SPAWN_CLEARANCE: f32 = 400.0;
/// Attempts at finding a free spot before giving up on a placement
pub const PLACEMENT_ATTEMPTS: usize = 64;
