//! Raid flow constants.

/// Seconds the player must stay inside an extraction zone
pub const EXTRACTION_TIME: f32 = 5.0;
/// Default raid length before the player is declared missing in action
pub const RAID_TIME_LIMIT: f32 = 900.0;

/// Container value that yields loot at its base value
pub const LOOT_VALUE_BASELINE: f32 = 100.0;

/// Fixed step the headless runner advances by (60 Hz)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
/// Containers the headless runner searches before heading out
pub const RUNNER_CONTAINER_QUOTA: usize = 3;
/// Seconds between route refreshes in the headless runner
pub const RUNNER_REPATH_INTERVAL: f32 = 0.5;

/// Slack allowed when comparing an elapsed time against a duration, so a
/// timer read exactly at its deadline counts as finished despite f32 rounding
pub const TIMER_EPSILON: f32 = 1e-4;
