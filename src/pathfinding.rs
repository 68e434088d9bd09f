//! Greedy fixed-stride steering toward a goal point.
//!
//! This is local steering, not search: each step heads straight at the goal
//! and, when that point is blocked, tries a fixed list of sidesteps. It can
//! get stuck behind concave walls and does not find shortest routes. The
//! alternative order is fixed so a seeded raid replays identically.

use glam::Vec2;

use crate::constants::{PATH_MAX_STEPS, PATH_STRIDE};
use crate::map::Map;
use crate::vector;

/// Outcome of a path query.
#[derive(Debug, Clone, PartialEq)]
pub enum PathResult {
    /// Waypoints ending at the goal
    Complete(Vec<Vec2>),
    /// Waypoints toward the goal, cut short by a dead end or the step budget
    Partial(Vec<Vec2>),
    /// Not even the first step was walkable; callers steer in a direct line
    NoPath,
}

impl PathResult {
    pub fn waypoints(&self) -> Option<&[Vec2]> {
        match self {
            PathResult::Complete(points) | PathResult::Partial(points) => Some(points),
            PathResult::NoPath => None,
        }
    }

    pub fn into_waypoints(self) -> Option<Vec<Vec2>> {
        match self {
            PathResult::Complete(points) | PathResult::Partial(points) => Some(points),
            PathResult::NoPath => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, PathResult::Complete(_))
    }
}

/// Find a path from `start` to `goal` for a body of `radius`, with the
/// default stride and step budget. Returned waypoints exclude `start`.
pub fn find_path(map: &Map, start: Vec2, goal: Vec2, radius: f32) -> PathResult {
    find_path_with(map, start, goal, radius, PATH_STRIDE, PATH_MAX_STEPS)
}

/// `find_path` with an explicit stride and step budget.
pub fn find_path_with(
    map: &Map,
    start: Vec2,
    goal: Vec2,
    radius: f32,
    stride: f32,
    max_steps: usize,
) -> PathResult {
    puffin::profile_function!();

    if !start.is_finite() || !goal.is_finite() || stride <= 0.0 {
        return PathResult::NoPath;
    }

    let blocked = |p: Vec2| !map.is_walkable(p) || map.check_collision(p, radius);
    let mut path = Vec::new();
    let mut current = start;

    for _ in 0..max_steps {
        let to_goal = goal - current;
        if to_goal.length() <= stride {
            if blocked(goal) {
                break;
            }
            path.push(goal);
            return PathResult::Complete(path);
        }

        let dir = vector::normalize(to_goal);
        let next = candidates(dir, to_goal, stride)
            .into_iter()
            .flatten()
            .map(|offset| current + offset)
            .find(|&p| !blocked(p));

        match next {
            Some(p) => {
                path.push(p);
                current = p;
            }
            None => break,
        }
    }

    if path.is_empty() {
        PathResult::NoPath
    } else {
        PathResult::Partial(path)
    }
}

/// Step offsets to try, in order: straight, left perpendicular, right
/// perpendicular, along x toward the goal, along y toward the goal. Axis
/// steps are skipped when the goal is level on that axis.
fn candidates(dir: Vec2, to_goal: Vec2, stride: f32) -> [Option<Vec2>; 5] {
    let axis = |d: f32| (d != 0.0).then(|| d.signum() * stride);
    [
        Some(dir * stride),
        Some(dir.perp() * stride),
        Some(-dir.perp() * stride),
        axis(to_goal.x).map(|x| Vec2::new(x, 0.0)),
        axis(to_goal.y).map(|y| Vec2::new(0.0, y)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Rect;

    #[test]
    fn test_open_ground_reaches_goal() {
        let map = Map::new(1000.0, 1000.0);
        let start = Vec2::new(100.0, 100.0);
        let goal = Vec2::new(300.0, 100.0);

        let result = find_path(&map, start, goal, 10.0);
        let points = result.waypoints().unwrap();
        assert!(result.is_complete());
        assert_eq!(*points.last().unwrap(), goal);
        // 200 units at stride 20
        assert_eq!(points.len(), 10);
    }

    #[test]
    fn test_goal_within_one_stride() {
        let map = Map::new(1000.0, 1000.0);
        let result = find_path(&map, Vec2::new(100.0, 100.0), Vec2::new(110.0, 100.0), 10.0);
        assert_eq!(result, PathResult::Complete(vec![Vec2::new(110.0, 100.0)]));
    }

    #[test]
    fn test_steps_around_small_obstacle() {
        let mut map = Map::new(1000.0, 1000.0);
        // Short wall straight ahead
        map.add_obstacle(Rect::new(190.0, 80.0, 20.0, 40.0));
        let goal = Vec2::new(400.0, 100.0);

        let result = find_path(&map, Vec2::new(100.0, 100.0), goal, 5.0);
        let points = result.waypoints().unwrap();
        assert!(!points.is_empty());
        for p in points {
            assert!(!map.check_collision(*p, 5.0));
        }
    }

    #[test]
    fn test_boxed_in_start_has_no_path() {
        let mut map = Map::new(1000.0, 1000.0);
        map.add_obstacle(Rect::new(0.0, 0.0, 1000.0, 480.0));
        map.add_obstacle(Rect::new(0.0, 520.0, 1000.0, 480.0));
        map.add_obstacle(Rect::new(0.0, 480.0, 480.0, 40.0));
        map.add_obstacle(Rect::new(520.0, 480.0, 480.0, 40.0));

        let result = find_path(&map, Vec2::new(500.0, 500.0), Vec2::new(900.0, 500.0), 5.0);
        assert_eq!(result, PathResult::NoPath);
        assert!(result.waypoints().is_none());
    }

    #[test]
    fn test_step_budget_yields_partial() {
        let map = Map::new(5000.0, 5000.0);
        let result = find_path_with(
            &map,
            Vec2::new(100.0, 100.0),
            Vec2::new(4000.0, 100.0),
            5.0,
            20.0,
            10,
        );
        match result {
            PathResult::Partial(points) => assert_eq!(points.len(), 10),
            other => panic!("expected partial path, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_input_is_no_path() {
        let map = Map::new(1000.0, 1000.0);
        assert_eq!(
            find_path(&map, Vec2::new(f32::NAN, 0.0), Vec2::ONE, 5.0),
            PathResult::NoPath
        );
    }

    #[test]
    fn test_same_query_same_path() {
        let mut map = Map::new(1000.0, 1000.0);
        map.add_obstacle(Rect::new(250.0, 150.0, 30.0, 200.0));
        let a = find_path(&map, Vec2::new(100.0, 300.0), Vec2::new(600.0, 250.0), 10.0);
        let b = find_path(&map, Vec2::new(100.0, 300.0), Vec2::new(600.0, 250.0), 10.0);
        assert_eq!(a, b);
    }
}
