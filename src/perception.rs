//! Enemy perception: vision cone and hearing.
//!
//! Either channel is enough to detect a target. Vision also asks the map for
//! line of sight, which currently always succeeds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::map::Map;
use crate::vector;

/// Detection parameters of one observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Senses {
    /// Full width of the vision cone in radians
    pub vision_angle: f32,
    pub vision_range: f32,
    pub hearing_range: f32,
}

impl Default for Senses {
    fn default() -> Self {
        Self::with_range(ENEMY_VISION_RANGE)
    }
}

impl Senses {
    /// Default cone, with hearing derived from the vision range.
    pub fn with_range(vision_range: f32) -> Self {
        Self {
            vision_angle: ENEMY_VISION_ANGLE,
            vision_range,
            hearing_range: vision_range * HEARING_RANGE_FACTOR,
        }
    }

    /// Beyond this distance an undetected target counts as lost.
    pub fn lost_range(&self) -> f32 {
        self.vision_range * LOST_TARGET_RANGE_FACTOR
    }
}

/// What an observer knows about itself when looking around.
#[derive(Debug, Clone, Copy)]
pub struct Observer {
    pub position: Vec2,
    /// Facing angle in radians
    pub facing: f32,
    pub senses: Senses,
}

/// Which channel detected the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sense {
    Sight,
    Hearing,
}

/// Target inside the vision range, inside the cone, and in line of sight.
pub fn can_see(map: &Map, observer: &Observer, target: Vec2) -> bool {
    let offset = target - observer.position;
    let distance = offset.length();
    if distance > observer.senses.vision_range {
        return false;
    }
    // Standing on top of the observer: no meaningful bearing
    if distance > f32::EPSILON {
        let bearing = vector::heading(offset);
        if vector::angle_between(observer.facing, bearing) > observer.senses.vision_angle * 0.5 {
            return false;
        }
    }
    map.has_line_of_sight(observer.position, target)
}

/// Target inside hearing range and moving fast enough to make noise.
pub fn can_hear(observer: &Observer, target: Vec2, target_velocity: Vec2) -> bool {
    observer.position.distance(target) <= observer.senses.hearing_range
        && target_velocity.length() > MOVEMENT_NOISE_THRESHOLD
}

/// Combined check; sight is tried first.
pub fn perceive(map: &Map, observer: &Observer, target: Vec2, target_velocity: Vec2) -> Option<Sense> {
    if can_see(map, observer, target) {
        Some(Sense::Sight)
    } else if can_hear(observer, target, target_velocity) {
        Some(Sense::Hearing)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::f32::consts::PI;

    fn observer_at_origin() -> Observer {
        Observer {
            position: Vec2::ZERO,
            facing: 0.0,
            senses: Senses {
                vision_angle: PI / 3.0,
                vision_range: 350.0,
                hearing_range: 210.0,
            },
        }
    }

    #[rstest]
    #[case(Vec2::new(100.0, 0.0), true)]
    #[case(Vec2::new(100.0, 300.0), false)]
    #[case(Vec2::new(100.0, 50.0), true)]
    #[case(Vec2::new(-100.0, 0.0), false)]
    #[case(Vec2::new(400.0, 0.0), false)]
    fn test_vision_cone(#[case] target: Vec2, #[case] seen: bool) {
        let map = Map::new(2000.0, 2000.0);
        assert_eq!(can_see(&map, &observer_at_origin(), target), seen);
    }

    #[test]
    fn test_cone_wraps_around_pi() {
        let map = Map::new(2000.0, 2000.0);
        let mut observer = observer_at_origin();
        observer.facing = PI;
        // Bearing just below -PI wraps next to PI
        assert!(can_see(&map, &observer, Vec2::new(-100.0, -10.0)));
        assert!(can_see(&map, &observer, Vec2::new(-100.0, 10.0)));
    }

    #[test]
    fn test_hearing_needs_movement_noise() {
        let observer = observer_at_origin();
        let behind = Vec2::new(-150.0, 0.0);
        assert!(!can_hear(&observer, behind, Vec2::new(50.0, 0.0)));
        assert!(can_hear(&observer, behind, Vec2::new(200.0, 0.0)));
        assert!(!can_hear(&observer, Vec2::new(-300.0, 0.0), Vec2::new(200.0, 0.0)));
    }

    #[test]
    fn test_perceive_prefers_sight() {
        let map = Map::new(2000.0, 2000.0);
        let observer = observer_at_origin();
        assert_eq!(
            perceive(&map, &observer, Vec2::new(100.0, 0.0), Vec2::new(200.0, 0.0)),
            Some(Sense::Sight)
        );
        assert_eq!(
            perceive(&map, &observer, Vec2::new(-100.0, 0.0), Vec2::new(200.0, 0.0)),
            Some(Sense::Hearing)
        );
        assert_eq!(perceive(&map, &observer, Vec2::new(100.0, 300.0), Vec2::ZERO), None);
    }

    #[test]
    fn test_default_senses_derive_hearing() {
        let senses = Senses::default();
        approx::assert_relative_eq!(senses.hearing_range, ENEMY_VISION_RANGE * HEARING_RANGE_FACTOR);
        approx::assert_relative_eq!(senses.lost_range(), ENEMY_VISION_RANGE * 1.5);
    }
}
