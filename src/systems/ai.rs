//! Enemy AI: state machine, perception-driven behavior and attacks.
//!
//! Every state change goes through `transition`, so the full table of
//! legal moves lives in one match. The per-state handlers only decide which
//! event happened and how the enemy moves or attacks this tick.

use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;

use crate::components::Faction;
use crate::constants::*;
use crate::enemy::{AiState, Enemy};
use crate::events::{EventQueue, GameEvent};
use crate::map::Map;
use crate::pathfinding;
use crate::perception;
use crate::projectile::Projectile;
use crate::time_system::{has_elapsed, GameClock};
use crate::vector;
use crate::weapon::Shooter;

/// Things that can happen to an enemy's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiEvent {
    /// Perception picked up the target
    TargetAcquired,
    TargetInRange,
    TargetOutOfRange,
    /// Target out of sight and far away, or its handle no longer resolves
    TargetLost,
    /// The search timer ran out
    SearchExpired,
    Damaged,
    Killed,
}

/// The state machine. Unlisted pairs keep the current state.
pub fn transition(state: AiState, event: AiEvent) -> AiState {
    use AiEvent::*;
    use AiState::*;

    match (state, event) {
        (Dead, _) => Dead,
        (_, Killed) => Dead,
        (Patrol | Search, TargetAcquired) => Chase,
        (Chase, TargetInRange) => Attack,
        (Attack, TargetOutOfRange) => Chase,
        (Chase | Attack, TargetLost) => Search,
        (Search, SearchExpired) => Patrol,
        (Patrol, Damaged) => Search,
        (state, _) => state,
    }
}

/// What an enemy knows about a potential target this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfo {
    pub entity: Entity,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

/// A melee blow, applied after the AI pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeHit {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
}

/// Where an enemy's attacks go.
pub struct AiOutput<'a> {
    pub projectiles: &'a mut Vec<Projectile>,
    pub melee: &'a mut Vec<MeleeHit>,
    pub events: &'a mut EventQueue,
}

/// Run one AI tick for every live enemy. `player` is the only target
/// candidate; `None` when the player is gone or dead.
#[allow(clippy::too_many_arguments)]
pub fn run_enemy_ai(
    world: &mut World,
    player: Option<TargetInfo>,
    map: &Map,
    clock: &GameClock,
    dt: f32,
    projectiles: &mut Vec<Projectile>,
    events: &mut EventQueue,
    rng: &mut impl Rng,
) -> Vec<MeleeHit> {
    puffin::profile_function!();

    let mut melee = Vec::new();
    let mut out = AiOutput {
        projectiles,
        melee: &mut melee,
        events,
    };
    for (entity, enemy) in world.query_mut::<&mut Enemy>() {
        update_enemy(enemy, entity, player, map, clock.time, dt, &mut out, rng);
    }
    melee
}

/// One AI tick for one enemy: timers, perception, state change, then the
/// movement or attack of the resulting state. Physics runs separately.
#[allow(clippy::too_many_arguments)]
pub fn update_enemy(
    enemy: &mut Enemy,
    entity: Entity,
    player: Option<TargetInfo>,
    map: &Map,
    now: f32,
    dt: f32,
    out: &mut AiOutput,
    rng: &mut impl Rng,
) {
    if enemy.is_dead() {
        return;
    }

    if let Some(weapon) = enemy.weapon.as_mut() {
        if weapon.update(dt, now) {
            log::debug!("Enemy {:?} reloaded {}", entity, weapon.weapon_type());
        }
    }

    match enemy.state() {
        AiState::Patrol => patrol(enemy, entity, player, map, now, out),
        AiState::Search => search(enemy, entity, player, map, now, dt, out),
        AiState::Chase | AiState::Attack => {
            // A handle that no longer resolves to the candidate means the
            // target is gone
            let tracked = enemy
                .target
                .and_then(|t| player.filter(|p| p.entity == t));
            pursue(enemy, entity, tracked, map, now, out, rng);
        }
        AiState::Dead => {}
    }
}

// =============================================================================
// STATE HANDLERS
// =============================================================================

fn patrol(
    enemy: &mut Enemy,
    entity: Entity,
    player: Option<TargetInfo>,
    map: &Map,
    now: f32,
    out: &mut AiOutput,
) {
    if let Some(target) = perceived(enemy, player, map) {
        acquire(enemy, entity, target, out.events);
        return;
    }

    if let Some(goal) = enemy.patrol_target() {
        if enemy.position.distance(goal) <= PATROL_POINT_REACHED_RADIUS {
            enemy.advance_patrol();
        }
    }
    let speed = enemy.patrol_speed;
    match enemy.patrol_target() {
        Some(goal) => steer_toward(enemy, goal, speed, map, now),
        None => enemy.velocity = Vec2::ZERO,
    }
}

fn search(
    enemy: &mut Enemy,
    entity: Entity,
    player: Option<TargetInfo>,
    map: &Map,
    now: f32,
    dt: f32,
    out: &mut AiOutput,
) {
    if let Some(target) = perceived(enemy, player, map) {
        acquire(enemy, entity, target, out.events);
        return;
    }

    if has_elapsed(now, enemy.search_start_time, SEARCH_DURATION) {
        enemy.target = None;
        enemy.last_known_target_position = None;
        change_state(enemy, entity, AiEvent::SearchExpired, out.events);
        return;
    }

    match enemy.last_known_target_position {
        Some(goal) if enemy.position.distance(goal) > WAYPOINT_REACHED_RADIUS => {
            let speed = enemy.chase_speed * SEARCH_SPEED_FACTOR;
            steer_toward(enemy, goal, speed, map, now);
        }
        _ => {
            // Arrived: stand and sweep the vision cone
            enemy.velocity = Vec2::ZERO;
            enemy.facing = vector::normalize_angle(enemy.facing + SEARCH_SWEEP_RATE * dt);
        }
    }
}

fn pursue(
    enemy: &mut Enemy,
    entity: Entity,
    tracked: Option<TargetInfo>,
    map: &Map,
    now: f32,
    out: &mut AiOutput,
    rng: &mut impl Rng,
) {
    let Some(target) = tracked else {
        lose_target(enemy, entity, now, out.events);
        return;
    };

    let distance = enemy.position.distance(target.position);
    let sees = perception::perceive(map, &enemy.observer(), target.position, target.velocity).is_some();
    if sees {
        enemy.last_known_target_position = Some(target.position);
    } else if distance > enemy.senses.lost_range() {
        lose_target(enemy, entity, now, out.events);
        return;
    }

    let event = if distance <= enemy.attack_range {
        AiEvent::TargetInRange
    } else {
        AiEvent::TargetOutOfRange
    };
    change_state(enemy, entity, event, out.events);

    match enemy.state() {
        AiState::Attack => attack(enemy, entity, &target, now, out, rng),
        AiState::Chase => {
            let speed = enemy.chase_speed;
            steer_toward(enemy, target.position, speed, map, now);
            if sees {
                try_shoot(enemy, entity, &target, now, out, rng);
            }
        }
        _ => {}
    }
}

/// Stand, face the target and attack when the cooldown allows.
fn attack(
    enemy: &mut Enemy,
    entity: Entity,
    target: &TargetInfo,
    now: f32,
    out: &mut AiOutput,
    rng: &mut impl Rng,
) {
    enemy.velocity = Vec2::ZERO;
    let to_target = target.position - enemy.position;
    enemy.face(to_target);

    if !has_elapsed(now, enemy.last_attack_time, enemy.attack_cooldown) {
        return;
    }

    if enemy.weapon.is_some() {
        let error = ENEMY_AIM_ERROR * (1.0 - enemy.accuracy);
        let jitter = if error > 0.0 { rng.gen_range(-error..=error) } else { 0.0 };
        let aim = enemy.facing + jitter;
        fire_weapon(enemy, entity, aim, now, out, rng);
    } else if to_target.length() <= enemy.radius + target.radius + MELEE_REACH {
        out.melee.push(MeleeHit {
            attacker: entity,
            target: target.entity,
            damage: enemy.melee_damage * enemy.damage_multiplier,
        });
    }
    enemy.last_attack_time = now;
}

// =============================================================================
// SHOOTING
// =============================================================================

/// Chance that a chase shot is taken: falls linearly with the distance the
/// bullet covers in `TRY_SHOOT_FLIGHT_TIME`, capped, then scaled by accuracy.
pub fn hit_chance(distance: f32, bullet_speed: f32, accuracy: f32) -> f32 {
    let reach = (bullet_speed * TRY_SHOOT_FLIGHT_TIME).max(f32::EPSILON);
    let falloff = (1.0 - distance / reach).clamp(0.0, 1.0);
    (falloff.min(TRY_SHOOT_MAX_CHANCE) * accuracy.clamp(0.0, 1.0)).clamp(0.0, 1.0)
}

/// Opportunistic shot while chasing. The cooldown is spent whether or not
/// the roll succeeds. Returns true when a shot was fired.
pub fn try_shoot(
    enemy: &mut Enemy,
    entity: Entity,
    target: &TargetInfo,
    now: f32,
    out: &mut AiOutput,
    rng: &mut impl Rng,
) -> bool {
    if !has_elapsed(now, enemy.last_attack_time, enemy.attack_cooldown) {
        return false;
    }
    let Some(weapon) = enemy.weapon.as_ref() else {
        return false;
    };

    let distance = enemy.position.distance(target.position);
    let chance = hit_chance(distance, weapon.def().bullet_speed, enemy.accuracy);
    enemy.last_attack_time = now;
    if !rng.gen_bool(chance as f64) {
        return false;
    }

    let aim = vector::heading(target.position - enemy.position);
    fire_weapon(enemy, entity, aim, now, out, rng)
}

fn fire_weapon(
    enemy: &mut Enemy,
    entity: Entity,
    aim: f32,
    now: f32,
    out: &mut AiOutput,
    rng: &mut impl Rng,
) -> bool {
    let origin = enemy.position + vector::from_heading(aim) * enemy.radius;
    let shooter = Shooter {
        entity,
        faction: Faction::Enemy,
        damage_multiplier: enemy.damage_multiplier,
    };
    let Some(weapon) = enemy.weapon.as_mut() else {
        return false;
    };

    let shots = weapon.fire(origin, aim, now, shooter, rng);
    if shots.is_empty() {
        if weapon.start_reload(now) {
            out.events.push(GameEvent::ReloadStarted {
                faction: Faction::Enemy,
                weapon: weapon.weapon_type(),
            });
        }
        return false;
    }

    out.events.push(GameEvent::ShotFired {
        faction: Faction::Enemy,
        weapon: weapon.weapon_type(),
        origin,
        pellets: shots.len(),
    });
    out.projectiles.extend(shots);
    true
}

// =============================================================================
// HELPERS
// =============================================================================

/// The candidate, if this enemy perceives it right now.
fn perceived(enemy: &Enemy, player: Option<TargetInfo>, map: &Map) -> Option<TargetInfo> {
    player.filter(|p| {
        perception::perceive(map, &enemy.observer(), p.position, p.velocity).is_some()
    })
}

fn acquire(enemy: &mut Enemy, entity: Entity, target: TargetInfo, events: &mut EventQueue) {
    enemy.target = Some(target.entity);
    enemy.last_known_target_position = Some(target.position);
    change_state(enemy, entity, AiEvent::TargetAcquired, events);
}

fn lose_target(enemy: &mut Enemy, entity: Entity, now: f32, events: &mut EventQueue) {
    enemy.target = None;
    enemy.search_start_time = now;
    change_state(enemy, entity, AiEvent::TargetLost, events);
}

fn change_state(enemy: &mut Enemy, entity: Entity, event: AiEvent, events: &mut EventQueue) {
    if let Some((from, to)) = enemy.apply(event) {
        log::debug!("Enemy {:?} {:?} -> {:?} on {:?}", entity, from, to, event);
        events.push(GameEvent::AiStateChanged { entity, from, to });
    }
}

/// Head for `goal` along a cached path, or in a straight line when no path
/// exists.
fn steer_toward(enemy: &mut Enemy, goal: Vec2, speed: f32, map: &Map, now: f32) {
    if enemy.path.is_stale(goal, now) {
        enemy.path.waypoints = pathfinding::find_path(map, enemy.position, goal, enemy.radius)
            .into_waypoints()
            .unwrap_or_default();
        enemy.path.goal = Some(goal);
        enemy.path.computed_at = now;
    }

    let reached = enemy
        .path
        .waypoints
        .iter()
        .take_while(|p| p.distance(enemy.position) <= WAYPOINT_REACHED_RADIUS)
        .count();
    enemy.path.waypoints.drain(..reached);

    let next = enemy.path.waypoints.first().copied().unwrap_or(goal);
    let dir = vector::normalize(next - enemy.position);
    enemy.velocity = dir * speed;
    enemy.face(dir);
}
