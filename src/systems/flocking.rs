//! Group steering among nearby enemies.
//!
//! Flocking perturbs the velocity the AI already chose; it never replaces
//! it. Forces are computed from a snapshot of all live enemies and applied
//! afterwards, so every enemy sees the same neighbor state.

use glam::Vec2;
use hecs::{Entity, World};

use crate::constants::*;
use crate::enemy::Enemy;
use crate::vector;

/// Position and velocity of one flock member at the start of the pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    pub entity: Entity,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Sum of separation, cohesion and alignment for `me` against the flock.
/// Members farther than the neighbor radius, and `me` itself, are ignored.
pub fn flocking_force(me: &Boid, flock: &[Boid]) -> Vec2 {
    let mut separation = Vec2::ZERO;
    let mut centroid = Vec2::ZERO;
    let mut average_velocity = Vec2::ZERO;
    let mut neighbors = 0usize;

    for other in flock.iter().filter(|b| b.entity != me.entity) {
        let offset = me.position - other.position;
        let distance = offset.length();
        if distance > FLOCK_NEIGHBOR_RADIUS {
            continue;
        }
        neighbors += 1;
        centroid += other.position;
        average_velocity += other.velocity;

        // Closer neighbors push harder; coincident ones have no direction
        if distance < FLOCK_SEPARATION_RADIUS && distance > f32::EPSILON {
            separation += offset / distance / distance;
        }
    }

    if neighbors == 0 {
        return Vec2::ZERO;
    }

    let count = neighbors as f32;
    let separation = vector::normalize(separation) * FLOCK_SEPARATION_STRENGTH;
    let cohesion = (centroid / count - me.position) * FLOCK_COHESION_WEIGHT;
    let alignment = (average_velocity / count - me.velocity) * FLOCK_ALIGNMENT_WEIGHT;
    separation + cohesion + alignment
}

/// Add flocking forces to every live enemy's velocity.
pub fn apply_flocking(world: &mut World) {
    puffin::profile_function!();

    let flock: Vec<Boid> = world
        .query::<&Enemy>()
        .iter()
        .filter(|(_, enemy)| !enemy.is_dead())
        .map(|(entity, enemy)| Boid {
            entity,
            position: enemy.position,
            velocity: enemy.velocity,
        })
        .collect();

    if flock.len() < 2 {
        return;
    }

    let forces: Vec<(Entity, Vec2)> = flock
        .iter()
        .map(|boid| (boid.entity, flocking_force(boid, &flock)))
        .filter(|(_, force)| *force != Vec2::ZERO)
        .collect();

    for (entity, force) in forces {
        if let Ok(mut enemy) = world.get::<&mut Enemy>(entity) {
            enemy.velocity += force;
        }
    }
}
