//! Enemy component: body, AI memory, perception and combat parameters.
//!
//! Behavior lives in `systems::ai`; this module holds the data plus the few
//! operations that other systems call directly (damage, death, physics).

use glam::Vec2;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::components::{is_valid_damage, DamageOutcome, Health};
use crate::constants::*;
use crate::map::Map;
use crate::perception::{Observer, Senses};
use crate::spawning::EnemyKind;
use crate::systems::ai::{self, AiEvent};
use crate::time_system::has_elapsed;
use crate::vector;
use crate::weapon::Weapon;

/// Enemy behavior states. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Patrol,
    Chase,
    Attack,
    Search,
    Dead,
}

/// Cached waypoints toward a goal, replaced when stale.
#[derive(Debug, Clone, Default)]
pub struct CachedPath {
    pub waypoints: Vec<Vec2>,
    pub goal: Option<Vec2>,
    pub computed_at: f32,
}

impl CachedPath {
    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.goal = None;
    }

    /// Needs recomputing for `goal` at time `now`.
    pub fn is_stale(&self, goal: Vec2, now: f32) -> bool {
        match self.goal {
            None => true,
            Some(old) => {
                self.waypoints.is_empty()
                    || old.distance(goal) > REPATH_GOAL_DRIFT
                    || has_elapsed(now, self.computed_at, REPATH_INTERVAL)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub health: Health,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Facing angle in radians; the vision cone points here
    pub facing: f32,

    state: AiState,
    /// Entity being hunted. A handle only: the entity may be gone.
    pub target: Option<Entity>,
    patrol_points: Vec<Vec2>,
    patrol_index: usize,
    pub last_known_target_position: Option<Vec2>,
    pub search_start_time: f32,

    pub senses: Senses,

    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub last_attack_time: f32,
    /// Base hit chance in [0, 1]
    pub accuracy: f32,
    pub damage_multiplier: f32,
    /// Damage per swing when unarmed
    pub melee_damage: f32,
    /// `None` means melee only
    pub weapon: Option<Weapon>,

    pub path: CachedPath,
}

impl Enemy {
    pub fn new(kind: EnemyKind, position: Vec2) -> Self {
        let def = kind.def();
        Self {
            kind,
            position,
            velocity: Vec2::ZERO,
            radius: ENEMY_RADIUS,
            health: Health::new(def.health),
            patrol_speed: def.patrol_speed,
            chase_speed: def.chase_speed,
            facing: 0.0,
            state: AiState::Patrol,
            target: None,
            patrol_points: Vec::new(),
            patrol_index: 0,
            last_known_target_position: None,
            search_start_time: 0.0,
            senses: Senses::default(),
            attack_range: def.attack_range,
            attack_cooldown: def.attack_cooldown,
            last_attack_time: f32::NEG_INFINITY,
            accuracy: def.accuracy.clamp(0.0, 1.0),
            damage_multiplier: 1.0,
            melee_damage: def.melee_damage,
            weapon: def.weapon.map(|t| Weapon::new(t).with_infinite_ammo()),
            path: CachedPath::default(),
        }
    }

    pub fn with_patrol_points(mut self, points: Vec<Vec2>) -> Self {
        self.patrol_points = points;
        self.patrol_index = 0;
        self
    }

    pub fn state(&self) -> AiState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == AiState::Dead
    }

    pub fn patrol_points(&self) -> &[Vec2] {
        &self.patrol_points
    }

    /// Current patrol waypoint, if the enemy has a route
    pub fn patrol_target(&self) -> Option<Vec2> {
        self.patrol_points.get(self.patrol_index).copied()
    }

    /// Move on to the next patrol waypoint, wrapping at the end.
    pub fn advance_patrol(&mut self) {
        if !self.patrol_points.is_empty() {
            self.patrol_index = (self.patrol_index + 1) % self.patrol_points.len();
        }
    }

    pub fn observer(&self) -> Observer {
        Observer {
            position: self.position,
            facing: self.facing,
            senses: self.senses,
        }
    }

    /// Feed an event through the state machine. Returns `(from, to)` when
    /// the state changed.
    pub fn apply(&mut self, event: AiEvent) -> Option<(AiState, AiState)> {
        let from = self.state;
        let to = ai::transition(from, event);
        if to == from {
            return None;
        }
        self.state = to;
        self.path.clear();
        Some((from, to))
    }

    /// Take a hit. `source` is where the damage came from, if known; a
    /// patrolling enemy that gets hit starts searching there.
    pub fn take_damage(&mut self, amount: f32, source: Option<Vec2>, now: f32) -> DamageOutcome {
        if self.is_dead() || !is_valid_damage(amount) {
            return DamageOutcome::Ignored;
        }

        self.health.damage(amount);
        if self.health.is_depleted() {
            self.die();
            return DamageOutcome::Killed;
        }

        if self.state == AiState::Patrol {
            self.last_known_target_position = Some(source.unwrap_or(self.position));
            self.search_start_time = now;
            self.apply(AiEvent::Damaged);
        }
        DamageOutcome::Wounded
    }

    /// Enter the terminal state. The owning world removes the entity later.
    pub fn die(&mut self) {
        self.velocity = Vec2::ZERO;
        self.target = None;
        self.apply(AiEvent::Killed);
    }

    /// Point the vision cone along a direction; zero vectors keep the
    /// current facing.
    pub fn face(&mut self, direction: Vec2) {
        if direction.length_squared() > f32::EPSILON {
            self.facing = vector::heading(direction);
        }
    }

    /// Integrate velocity with per-axis collision, then apply friction.
    pub fn integrate(&mut self, map: &Map, dt: f32) {
        if self.is_dead() {
            return;
        }
        self.velocity = vector::clamp_length(self.velocity, self.chase_speed);
        let step = self.velocity * dt;

        let next_x = Vec2::new(self.position.x + step.x, self.position.y);
        if map.check_collision(next_x, self.radius) {
            self.velocity.x = 0.0;
        } else {
            self.position = next_x;
        }

        let next_y = Vec2::new(self.position.x, self.position.y + step.y);
        if map.check_collision(next_y, self.radius) {
            self.velocity.y = 0.0;
        } else {
            self.position = next_y;
        }

        self.position = map.clamp_to_bounds(self.position, self.radius);
        self.velocity *= ENEMY_FRICTION;
    }

    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            kind: self.kind,
            state: self.state,
            health: self.health.current(),
            max_health: self.health.max(),
            position: self.position,
            facing: self.facing,
        }
    }
}

/// Read-only view of an enemy for hosts and renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemySnapshot {
    pub kind: EnemyKind,
    pub state: AiState,
    pub health: f32,
    pub max_health: f32,
    pub position: Vec2,
    pub facing: f32,
}
