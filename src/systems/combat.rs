//! Combat resolution: projectile flight and hits, melee blows, damage
//! application and removal of dead enemies.
//!
//! Hits are collected first and applied afterwards, so no entity is
//! borrowed mutably while the projectile list is being walked.

use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;

use crate::components::{DamageOutcome, Faction};
use crate::constants::{PROJECTILE_RADIUS, WALL_SAMPLE_STEP};
use crate::enemy::Enemy;
use crate::events::{EventQueue, GameEvent};
use crate::loot;
use crate::map::Map;
use crate::player::Player;
use crate::projectile::Projectile;
use crate::systems::ai::MeleeHit;

/// A hit waiting to be applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingHit {
    pub target: Entity,
    pub attacker: Entity,
    pub damage: f32,
}

/// Something a projectile can hit this tick.
#[derive(Debug, Clone, Copy)]
struct Hittable {
    entity: Entity,
    faction: Faction,
    position: Vec2,
    radius: f32,
}

/// First unwalkable point along `from -> to`, sampled every
/// `WALL_SAMPLE_STEP` units including both ends.
fn wall_contact(map: &Map, from: Vec2, to: Vec2) -> Option<Vec2> {
    let samples = (from.distance(to) / WALL_SAMPLE_STEP).ceil().min(10_000.0) as usize;
    (0..=samples.max(1))
        .map(|i| from.lerp(to, i as f32 / samples.max(1) as f32))
        .find(|&point| !map.is_walkable(point))
}

/// Whether the segment `a -> b` passes within `radius` of `center`.
pub fn segment_hits_circle(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq > f32::EPSILON {
        ((center - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (a + ab * t).distance_squared(center) <= radius * radius
}

fn hittables(world: &World) -> Vec<Hittable> {
    let enemies = world
        .query::<&Enemy>()
        .iter()
        .filter(|(_, e)| !e.is_dead())
        .map(|(entity, e)| Hittable {
            entity,
            faction: Faction::Enemy,
            position: e.position,
            radius: e.radius,
        })
        .collect::<Vec<_>>();
    let players = world
        .query::<&Player>()
        .iter()
        .filter(|(_, p)| !p.is_dead())
        .map(|(entity, p)| Hittable {
            entity,
            faction: Faction::Player,
            position: p.position,
            radius: p.radius,
        })
        .collect::<Vec<_>>();
    enemies.into_iter().chain(players).collect()
}

/// Move every projectile, retire the expired, blocked and spent ones, and
/// apply their hits. A projectile stops at the first body along its path
/// this tick and never hits its owner or its own side.
pub fn update_projectiles(
    projectiles: &mut Vec<Projectile>,
    world: &mut World,
    map: &Map,
    now: f32,
    dt: f32,
    events: &mut EventQueue,
) {
    puffin::profile_function!();

    let targets = hittables(world);
    let mut hits = Vec::new();

    projectiles.retain_mut(|p| {
        let from = p.advance(dt);
        if p.is_expired(now) {
            return false;
        }

        // Only what lies in front of the first wall can be hit
        let wall = wall_contact(map, from, p.position);
        let end = wall.unwrap_or(p.position);

        let hit = targets
            .iter()
            .filter(|t| t.faction != p.faction && t.entity != p.owner)
            .filter(|t| segment_hits_circle(from, end, t.position, t.radius + PROJECTILE_RADIUS))
            .min_by(|a, b| from.distance(a.position).total_cmp(&from.distance(b.position)));
        if let Some(target) = hit {
            hits.push(PendingHit {
                target: target.entity,
                attacker: p.owner,
                damage: p.damage,
            });
            return false;
        }

        if let Some(contact) = wall {
            if map.in_bounds(contact) {
                events.push(GameEvent::ProjectileBlocked { position: contact });
            }
            return false;
        }
        true
    });

    for hit in hits {
        apply_damage(world, hit.target, hit.damage, Some(hit.attacker), now, events);
    }
}

/// Apply melee blows collected during the AI pass.
pub fn apply_melee_hits(world: &mut World, hits: &[MeleeHit], now: f32, events: &mut EventQueue) {
    for hit in hits {
        apply_damage(world, hit.target, hit.damage, Some(hit.attacker), now, events);
    }
}

/// Damage a player or enemy entity and report it. Missing entities are
/// ignored.
pub fn apply_damage(
    world: &mut World,
    target: Entity,
    amount: f32,
    attacker: Option<Entity>,
    now: f32,
    events: &mut EventQueue,
) -> DamageOutcome {
    let source = attacker.and_then(|a| position_of(world, a));

    if let Ok(mut player) = world.get::<&mut Player>(target) {
        let outcome = player.take_damage(amount);
        if outcome != DamageOutcome::Ignored {
            events.push(GameEvent::PlayerDamaged {
                amount,
                health: player.health.current(),
            });
        }
        return outcome;
    }

    if let Ok(mut enemy) = world.get::<&mut Enemy>(target) {
        let outcome = enemy.take_damage(amount, source, now);
        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Wounded => events.push(GameEvent::EnemyDamaged {
                entity: target,
                amount,
                health: enemy.health.current(),
            }),
            DamageOutcome::Killed => {
                log::debug!("Enemy {:?} ({:?}) killed", target, enemy.kind);
                events.push(GameEvent::EnemyKilled {
                    entity: target,
                    position: enemy.position,
                });
            }
        }
        return outcome;
    }

    DamageOutcome::Ignored
}

fn position_of(world: &World, entity: Entity) -> Option<Vec2> {
    if let Ok(player) = world.get::<&Player>(entity) {
        return Some(player.position);
    }
    world.get::<&Enemy>(entity).ok().map(|e| e.position)
}

/// Despawn dead enemies and drop their loot on the ground. Returns how many
/// were removed.
pub fn remove_dead_enemies(world: &mut World, map: &mut Map, rng: &mut impl Rng) -> usize {
    let dead: Vec<(Entity, Vec2)> = world
        .query::<&Enemy>()
        .iter()
        .filter(|(_, e)| e.is_dead())
        .map(|(entity, e)| (entity, e.position))
        .collect();

    for &(entity, position) in &dead {
        let _ = world.despawn(entity);
        map.add_ground_item(position, loot::generate_enemy_drop(rng));
    }
    dead.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_INVENTORY_SIZE;
    use crate::enemy::AiState;
    use crate::spawning::EnemyKind;
    use crate::weapon_defs::WeaponType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bullet(owner: Entity, faction: Faction, from: Vec2, velocity: Vec2) -> Projectile {
        Projectile {
            position: from,
            velocity,
            damage: 30.0,
            owner,
            faction,
            lifetime: 2.0,
            created_at: 0.0,
            kind: WeaponType::Pistol,
        }
    }

    #[test]
    fn test_segment_hits_circle() {
        let a = Vec2::ZERO;
        let b = Vec2::new(100.0, 0.0);
        assert!(segment_hits_circle(a, b, Vec2::new(50.0, 5.0), 10.0));
        assert!(!segment_hits_circle(a, b, Vec2::new(50.0, 20.0), 10.0));
        assert!(!segment_hits_circle(a, b, Vec2::new(150.0, 0.0), 10.0));
        assert!(segment_hits_circle(a, a, Vec2::new(5.0, 0.0), 10.0));
    }

    #[test]
    fn test_player_bullet_damages_enemy() {
        let mut world = World::new();
        let map = Map::new(2000.0, 2000.0);
        let player = world.spawn((Player::new(Vec2::new(100.0, 500.0), DEFAULT_INVENTORY_SIZE),));
        let enemy = world.spawn((Enemy::new(EnemyKind::Scav, Vec2::new(150.0, 500.0)),));
        let mut events = EventQueue::new();
        let mut projectiles = vec![bullet(player, Faction::Player, Vec2::new(115.0, 500.0), Vec2::new(600.0, 0.0))];

        update_projectiles(&mut projectiles, &mut world, &map, 0.1, 0.1, &mut events);

        assert!(projectiles.is_empty());
        let e = world.get::<&Enemy>(enemy).unwrap();
        assert_eq!(e.health.current(), e.health.max() - 30.0);
        // Hit while patrolling: searches toward the shooter
        assert_eq!(e.state(), AiState::Search);
        assert_eq!(e.last_known_target_position, Some(Vec2::new(100.0, 500.0)));
    }

    #[test]
    fn test_no_friendly_fire() {
        let mut world = World::new();
        let map = Map::new(2000.0, 2000.0);
        let shooter = world.spawn((Enemy::new(EnemyKind::Scav, Vec2::new(100.0, 500.0)),));
        let friend = world.spawn((Enemy::new(EnemyKind::Scav, Vec2::new(150.0, 500.0)),));
        let mut events = EventQueue::new();
        let mut projectiles = vec![bullet(shooter, Faction::Enemy, Vec2::new(100.0, 500.0), Vec2::new(600.0, 0.0))];

        update_projectiles(&mut projectiles, &mut world, &map, 0.1, 0.1, &mut events);

        assert_eq!(projectiles.len(), 1);
        let f = world.get::<&Enemy>(friend).unwrap();
        assert_eq!(f.health.current(), f.health.max());
    }

    #[test]
    fn test_wall_blocks_and_expiry_retires() {
        let mut world = World::new();
        let owner = world.spawn(());
        let mut map = Map::new(2000.0, 2000.0);
        map.add_obstacle(crate::map::Rect::new(150.0, 0.0, 50.0, 1000.0));
        let mut events = EventQueue::new();
        let mut projectiles = vec![
            bullet(owner, Faction::Player, Vec2::new(100.0, 500.0), Vec2::new(600.0, 0.0)),
            bullet(owner, Faction::Player, Vec2::new(100.0, 1500.0), Vec2::new(10.0, 0.0)),
        ];

        update_projectiles(&mut projectiles, &mut world, &map, 0.1, 0.1, &mut events);
        assert_eq!(projectiles.len(), 1);
        assert!(events.iter().any(|e| matches!(e, GameEvent::ProjectileBlocked { .. })));

        update_projectiles(&mut projectiles, &mut world, &map, 2.5, 0.1, &mut events);
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_thin_wall_shields_enemy_behind_it() {
        let mut world = World::new();
        let mut map = Map::new(2000.0, 2000.0);
        map.add_obstacle(crate::map::Rect::new(130.0, 400.0, 4.0, 200.0));
        let player = world.spawn((Player::new(Vec2::new(100.0, 500.0), DEFAULT_INVENTORY_SIZE),));
        let enemy = world.spawn((Enemy::new(EnemyKind::Scav, Vec2::new(150.0, 500.0)),));
        let mut events = EventQueue::new();
        // One tick carries the bullet across the wall and through the enemy
        let mut projectiles = vec![bullet(player, Faction::Player, Vec2::new(115.0, 500.0), Vec2::new(600.0, 0.0))];

        update_projectiles(&mut projectiles, &mut world, &map, 0.1, 0.1, &mut events);

        assert!(projectiles.is_empty());
        let e = world.get::<&Enemy>(enemy).unwrap();
        assert_eq!(e.health.current(), e.health.max());
        let blocked_at = events.iter().find_map(|e| match e {
            GameEvent::ProjectileBlocked { position } => Some(*position),
            _ => None,
        });
        assert!(blocked_at.is_some_and(|p| p.x >= 130.0 && p.x <= 134.0));
    }

    #[test]
    fn test_enemy_bullet_damages_player() {
        let mut world = World::new();
        let map = Map::new(2000.0, 2000.0);
        let enemy = world.spawn((Enemy::new(EnemyKind::Scav, Vec2::new(100.0, 500.0)),));
        let player = world.spawn((Player::new(Vec2::new(160.0, 500.0), DEFAULT_INVENTORY_SIZE),));
        let mut events = EventQueue::new();
        let mut projectiles = vec![bullet(enemy, Faction::Enemy, Vec2::new(115.0, 500.0), Vec2::new(600.0, 0.0))];

        update_projectiles(&mut projectiles, &mut world, &map, 0.1, 0.1, &mut events);

        assert_eq!(world.get::<&Player>(player).unwrap().health.current(), 70.0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerDamaged { health, .. } if *health == 70.0)));
    }

    #[test]
    fn test_dead_enemies_removed_with_loot() {
        let mut world = World::new();
        let mut map = Map::new(2000.0, 2000.0);
        let mut rng = StdRng::seed_from_u64(8);
        let mut events = EventQueue::new();
        let alive = world.spawn((Enemy::new(EnemyKind::Scav, Vec2::new(100.0, 100.0)),));
        let doomed = world.spawn((Enemy::new(EnemyKind::Raider, Vec2::new(300.0, 300.0)),));

        let outcome = apply_damage(&mut world, doomed, 10_000.0, None, 0.0, &mut events);
        assert_eq!(outcome, DamageOutcome::Killed);
        assert_eq!(
            apply_damage(&mut world, doomed, 5.0, None, 0.0, &mut events),
            DamageOutcome::Ignored
        );

        assert_eq!(remove_dead_enemies(&mut world, &mut map, &mut rng), 1);
        assert!(world.contains(alive));
        assert!(!world.contains(doomed));
        assert_eq!(map.ground_items().len(), 1);
        assert_eq!(map.ground_items()[0].position, Vec2::new(300.0, 300.0));

        // The stale handle now resolves to nothing
        assert_eq!(
            apply_damage(&mut world, doomed, 5.0, None, 0.0, &mut events),
            DamageOutcome::Ignored
        );
    }

    #[test]
    fn test_melee_hits_player() {
        let mut world = World::new();
        let brute = world.spawn((Enemy::new(EnemyKind::Brute, Vec2::new(100.0, 100.0)),));
        let player = world.spawn((Player::new(Vec2::new(125.0, 100.0), DEFAULT_INVENTORY_SIZE),));
        let mut events = EventQueue::new();
        let hits = [MeleeHit {
            attacker: brute,
            target: player,
            damage: 25.0,
        }];
        apply_melee_hits(&mut world, &hits, 1.0, &mut events);
        assert_eq!(world.get::<&Player>(player).unwrap().health.current(), 75.0);
    }
}
