//! Data-driven entity spawning.
//!
//! Enemy archetypes are rows in a static table. Adding an archetype means
//! adding a row; the spawning code does not change.

use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::DifficultyPreset;
use crate::constants::*;
use crate::enemy::Enemy;
use crate::map::Map;
use crate::player::Player;
use crate::weapon_defs::WeaponType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Scav,
    Raider,
    Heavy,
    Brute,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Scav,
        EnemyKind::Raider,
        EnemyKind::Heavy,
        EnemyKind::Brute,
    ];

    pub fn def(self) -> &'static EnemyDef {
        match self {
            EnemyKind::Scav => &enemies::SCAV,
            EnemyKind::Raider => &enemies::RAIDER,
            EnemyKind::Heavy => &enemies::HEAVY,
            EnemyKind::Brute => &enemies::BRUTE,
        }
    }
}

/// Definition of an enemy type - all the data needed to spawn one
#[derive(Debug, Clone)]
pub struct EnemyDef {
    pub kind: EnemyKind,
    /// Display name for logs
    pub name: &'static str,
    pub health: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub accuracy: f32,
    pub melee_damage: f32,
    /// `None` fights in melee
    pub weapon: Option<WeaponType>,
    /// Relative spawn frequency
    pub spawn_weight: u32,
}

impl EnemyDef {
    /// Spawn this enemy type with difficulty scaling applied.
    pub fn spawn(
        &self,
        world: &mut World,
        position: Vec2,
        patrol_points: Vec<Vec2>,
        preset: &DifficultyPreset,
    ) -> Entity {
        let mut enemy = Enemy::new(self.kind, position).with_patrol_points(patrol_points);
        enemy.health = crate::components::Health::new(preset.scale_health(self.health));
        enemy.damage_multiplier = preset.damage_multiplier;
        log::debug!("Spawned {} at ({:.0}, {:.0})", self.name, position.x, position.y);
        world.spawn((enemy,))
    }
}

/// Predefined enemy types
pub mod enemies {
    use super::*;

    pub const SCAV: EnemyDef = EnemyDef {
        kind: EnemyKind::Scav,
        name: "Scav",
        health: SCAV_HEALTH,
        patrol_speed: SCAV_PATROL_SPEED,
        chase_speed: SCAV_CHASE_SPEED,
        attack_range: SCAV_ATTACK_RANGE,
        attack_cooldown: SCAV_ATTACK_COOLDOWN,
        accuracy: SCAV_ACCURACY,
        melee_damage: 0.0,
        weapon: Some(WeaponType::Pistol),
        spawn_weight: 50,
    };

    pub const RAIDER: EnemyDef = EnemyDef {
        kind: EnemyKind::Raider,
        name: "Raider",
        health: RAIDER_HEALTH,
        patrol_speed: RAIDER_PATROL_SPEED,
        chase_speed: RAIDER_CHASE_SPEED,
        attack_range: RAIDER_ATTACK_RANGE,
        attack_cooldown: RAIDER_ATTACK_COOLDOWN,
        accuracy: RAIDER_ACCURACY,
        melee_damage: 0.0,
        weapon: Some(WeaponType::Rifle),
        spawn_weight: 25,
    };

    pub const HEAVY: EnemyDef = EnemyDef {
        kind: EnemyKind::Heavy,
        name: "Heavy",
        health: HEAVY_HEALTH,
        patrol_speed: HEAVY_PATROL_SPEED,
        chase_speed: HEAVY_CHASE_SPEED,
        attack_range: HEAVY_ATTACK_RANGE,
        attack_cooldown: HEAVY_ATTACK_COOLDOWN,
        accuracy: HEAVY_ACCURACY,
        melee_damage: 0.0,
        weapon: Some(WeaponType::Shotgun),
        spawn_weight: 10,
    };

    pub const BRUTE: EnemyDef = EnemyDef {
        kind: EnemyKind::Brute,
        name: "Brute",
        health: BRUTE_HEALTH,
        patrol_speed: BRUTE_PATROL_SPEED,
        chase_speed: BRUTE_CHASE_SPEED,
        attack_range: BRUTE_ATTACK_RANGE,
        attack_cooldown: BRUTE_ATTACK_COOLDOWN,
        accuracy: 1.0,
        melee_damage: BRUTE_MELEE_DAMAGE,
        weapon: None,
        spawn_weight: 15,
    };
}

/// Pick an archetype by spawn weight.
pub fn choose_kind(rng: &mut impl Rng) -> EnemyKind {
    let total: u32 = EnemyKind::ALL.iter().map(|k| k.def().spawn_weight).sum();
    let mut roll = rng.gen_range(0..total);
    for kind in EnemyKind::ALL {
        let weight = kind.def().spawn_weight;
        if roll < weight {
            return kind;
        }
        roll -= weight;
    }
    EnemyKind::Scav
}

/// Random walkable patrol route around `center`. Falls back to a single
/// point at `center` when nothing nearby is walkable.
pub fn generate_patrol_points(map: &Map, center: Vec2, radius: f32, rng: &mut impl Rng) -> Vec<Vec2> {
    let wanted = rng.gen_range(PATROL_POINTS_MIN..=PATROL_POINTS_MAX);
    let mut points = Vec::with_capacity(wanted);

    for _ in 0..PLACEMENT_ATTEMPTS {
        if points.len() == wanted {
            break;
        }
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = rng.gen_range(radius * 0.25..=radius);
        let p = center + crate::vector::from_heading(angle) * distance;
        if map.is_walkable(p) && !map.check_collision(p, ENEMY_RADIUS) {
            points.push(p);
        }
    }

    if points.is_empty() {
        points.push(center);
    }
    points
}

/// Random collision-free point for a body of `radius` that satisfies
/// `accept`.
pub fn find_open_position(
    map: &Map,
    radius: f32,
    rng: &mut impl Rng,
    accept: impl Fn(Vec2) -> bool,
) -> Option<Vec2> {
    let margin = MAP_EDGE_MARGIN.min(map.width * 0.25).min(map.height * 0.25);
    (0..PLACEMENT_ATTEMPTS * 4)
        .map(|_| {
            Vec2::new(
                rng.gen_range(margin..map.width - margin),
                rng.gen_range(margin..map.height - margin),
            )
        })
        .find(|&p| !map.check_collision(p, radius) && accept(p))
}

/// Spawn the difficulty's enemy count away from the player spawn.
/// Returns the spawned entities.
pub fn spawn_enemies(
    world: &mut World,
    map: &Map,
    preset: &DifficultyPreset,
    player_spawn: Vec2,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    let count = preset.spawn_count(rng);
    let mut used: Vec<Vec2> = Vec::with_capacity(count);
    let mut spawned = Vec::with_capacity(count);

    for i in 0..count {
        let position = find_open_position(map, ENEMY_RADIUS, rng, |p| {
            p.distance(player_spawn) >= PLAYER_SPAWN_CLEARANCE
                && used.iter().all(|u| u.distance(p) >= ENEMY_RADIUS * 4.0)
        });
        let Some(position) = position else {
            log::warn!("No room for enemy {} of {}", i + 1, count);
            break;
        };
        let patrol = generate_patrol_points(map, position, PATROL_RADIUS, rng);
        spawned.push(choose_kind(rng).def().spawn(world, position, patrol, preset));
        used.push(position);
    }

    spawned
}

/// Spawn the player entity.
pub fn spawn_player(world: &mut World, position: Vec2, inventory_size: usize) -> Entity {
    world.spawn((Player::new(position, inventory_size),))
}
