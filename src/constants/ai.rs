//! Enemy perception, navigation and flocking constants.

use std::f32::consts::PI;

/// Default full vision cone angle (60 degrees)
pub const ENEMY_VISION_ANGLE: f32 = PI / 3.0;
/// Default vision range in world units
pub const ENEMY_VISION_RANGE: f32 = 350.0;
/// Hearing range as a fraction of vision range
pub const HEARING_RANGE_FACTOR: f32 = 0.6;
/// Target speed (units/s) above which footsteps can be heard
pub const MOVEMENT_NOISE_THRESHOLD: f32 = 120.0;
/// A chased target is lost once it is unseen and beyond vision range times this
pub const LOST_TARGET_RANGE_FACTOR: f32 = 1.5;

/// How long an enemy searches before returning to patrol (seconds)
pub const SEARCH_DURATION: f32 = 10.0;
/// Heading sweep speed while looking around a search point (radians/s)
pub const SEARCH_SWEEP_RATE: f32 = 1.5;
/// Search movement speed as a fraction of chase speed
pub const SEARCH_SPEED_FACTOR: f32 = 0.7;

/// Distance covered by one pathfinding step
pub const PATH_STRIDE: f32 = 20.0;
/// Maximum number of pathfinding steps before giving up
pub const PATH_MAX_STEPS: usize = 50;
/// Distance at which a path waypoint counts as reached
pub const WAYPOINT_REACHED_RADIUS: f32 = 12.0;
/// Seconds between path recomputations toward a moving goal
pub const REPATH_INTERVAL: f32 = 0.5;
/// Goal drift that forces an early path recomputation
pub const REPATH_GOAL_DRIFT: f32 = 40.0;

/// Distance at which a patrol point counts as reached
pub const PATROL_POINT_REACHED_RADIUS: f32 = 15.0;
/// Radius around the spawn point in which patrol points are generated
pub const PATROL_RADIUS: f32 = 200.0;
/// Minimum number of generated patrol points
pub const PATROL_POINTS_MIN: usize = 3;
/// Maximum number of generated patrol points
pub const PATROL_POINTS_MAX: usize = 5;

/// Radius within which other enemies count as flock neighbors
pub const FLOCK_NEIGHBOR_RADIUS: f32 = 100.0;
/// Neighbors closer than this push each other apart
pub const FLOCK_SEPARATION_RADIUS: f32 = 50.0;
/// Speed (units/s) of the normalized separation push
pub const FLOCK_SEPARATION_STRENGTH: f32 = 40.0;
/// Weight of the steer toward the neighbor centroid
pub const FLOCK_COHESION_WEIGHT: f32 = 0.1;
/// Weight of the steer toward the average neighbor velocity
pub const FLOCK_ALIGNMENT_WEIGHT: f32 = 0.05;

/// Per-tick velocity multiplier applied to enemies
pub const ENEMY_FRICTION: f32 = 0.9;
