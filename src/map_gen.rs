//! Raid map generation: buildings, containers, ground loot and extraction
//! zones.
//!
//! Extraction zones go near the map edges and the player spawns in the
//! middle, so every raid starts with a walk out. Buildings never cover a
//! zone or the spawn point.

use glam::Vec2;
use rand::Rng;

use crate::config::GameConfig;
use crate::constants::*;
use crate::loot;
use crate::map::{ContainerType, Map, Rect};
use crate::spawning::find_open_position;

/// Minimum gap between two buildings
const BUILDING_GAP: f32 = 40.0;

/// A freshly generated map and where the player starts on it.
#[derive(Debug, Clone)]
pub struct GeneratedMap {
    pub map: Map,
    pub player_spawn: Vec2,
}

pub struct MapGenerator {
    map: Map,
    /// Circles buildings must stay out of
    reserved: Vec<(Vec2, f32)>,
}

impl MapGenerator {
    fn new(width: f32, height: f32) -> Self {
        Self {
            map: Map::new(width, height),
            reserved: Vec::new(),
        }
    }

    /// Generate a map for the config's dimensions.
    pub fn generate(config: &GameConfig, rng: &mut impl Rng) -> GeneratedMap {
        puffin::profile_function!();

        let mut gen = Self::new(config.map_width, config.map_height);

        gen.place_extraction_zones(rng);
        let player_spawn = gen.pick_player_spawn(rng);
        gen.reserved.push((player_spawn, PLAYER_RADIUS * 4.0));
        gen.place_buildings(rng);
        gen.place_containers(rng);
        gen.place_ground_items(rng);

        log::info!(
            "Generated {:.0}x{:.0} map: {} buildings, {} containers, {} items, {} extraction zones",
            gen.map.width,
            gen.map.height,
            gen.map.obstacles().len(),
            gen.map.containers().len(),
            gen.map.ground_items().len(),
            gen.map.extraction_zones().len(),
        );

        GeneratedMap {
            map: gen.map,
            player_spawn,
        }
    }

    /// Zones sit one edge margin in from a random side, on distinct sides
    /// while there are sides left.
    fn place_extraction_zones(&mut self, rng: &mut impl Rng) {
        let (w, h) = (self.map.width, self.map.height);
        let inset = MAP_EDGE_MARGIN.min(w * 0.25).min(h * 0.25);
        let mut sides = vec![0u8, 1, 2, 3];

        for _ in 0..EXTRACTION_ZONE_COUNT {
            let side = if sides.is_empty() {
                rng.gen_range(0..4)
            } else {
                sides.swap_remove(rng.gen_range(0..sides.len()))
            };
            let along_x = rng.gen_range(inset..=w - inset);
            let along_y = rng.gen_range(inset..=h - inset);
            let position = match side {
                0 => Vec2::new(along_x, inset),
                1 => Vec2::new(w - inset, along_y),
                2 => Vec2::new(along_x, h - inset),
                _ => Vec2::new(inset, along_y),
            };
            self.map.add_extraction_zone(position, EXTRACTION_ZONE_RADIUS);
            self.reserved.push((position, EXTRACTION_ZONE_RADIUS + BUILDING_GAP));
        }
    }

    /// Somewhere in the middle third of the map.
    fn pick_player_spawn(&self, rng: &mut impl Rng) -> Vec2 {
        let (w, h) = (self.map.width, self.map.height);
        Vec2::new(
            rng.gen_range(w / 3.0..=w * 2.0 / 3.0),
            rng.gen_range(h / 3.0..=h * 2.0 / 3.0),
        )
    }

    fn place_buildings(&mut self, rng: &mut impl Rng) {
        let (w, h) = (self.map.width, self.map.height);
        let max_size = MAP_BUILDING_MAX_SIZE.min(w - 2.0 * MAP_EDGE_MARGIN).min(h - 2.0 * MAP_EDGE_MARGIN);
        if max_size < MAP_BUILDING_MIN_SIZE {
            return;
        }
        let mut placed: Vec<Rect> = Vec::with_capacity(MAP_BUILDING_COUNT);

        for _ in 0..PLACEMENT_ATTEMPTS * 4 {
            if placed.len() == MAP_BUILDING_COUNT {
                break;
            }
            let width = rng.gen_range(MAP_BUILDING_MIN_SIZE..=max_size);
            let height = rng.gen_range(MAP_BUILDING_MIN_SIZE..=max_size);
            let x = rng.gen_range(MAP_EDGE_MARGIN..=w - MAP_EDGE_MARGIN - width);
            let y = rng.gen_range(MAP_EDGE_MARGIN..=h - MAP_EDGE_MARGIN - height);
            let rect = Rect::new(x, y, width, height);

            let padded = rect.expanded(BUILDING_GAP);
            let overlaps = placed.iter().any(|other| padded.intersects(other))
                || self
                    .reserved
                    .iter()
                    .any(|&(center, radius)| rect.intersects_circle(center, radius));
            if !overlaps {
                placed.push(rect);
            }
        }

        for rect in placed {
            self.map.add_obstacle(rect);
        }
    }

    /// Container types are drawn by spawn weight; each rolls its value
    /// within the type's range.
    fn place_containers(&mut self, rng: &mut impl Rng) {
        let total_weight: u32 = ContainerType::ALL.iter().map(|t| t.spawn_weight()).sum();

        for _ in 0..MAP_CONTAINER_COUNT {
            let mut roll = rng.gen_range(0..total_weight);
            let kind = ContainerType::ALL
                .into_iter()
                .find(|t| {
                    let hit = roll < t.spawn_weight();
                    roll = roll.saturating_sub(t.spawn_weight());
                    hit
                })
                .unwrap_or(ContainerType::Crate);

            let footprint = kind.size().max_element() * 0.5;
            let existing: Vec<Vec2> = self.map.containers().iter().map(|c| c.position).collect();
            let Some(position) = find_open_position(&self.map, footprint, rng, |p| {
                existing.iter().all(|c| c.distance(p) >= footprint * 3.0)
            }) else {
                continue;
            };

            let (min, max) = kind.value_range();
            let value = rng.gen_range(min..=max);
            self.map.add_container(position, kind, value);
        }
    }

    fn place_ground_items(&mut self, rng: &mut impl Rng) {
        for _ in 0..MAP_GROUND_ITEM_COUNT {
            let Some(position) = find_open_position(&self.map, PROJECTILE_RADIUS, rng, |_| true) else {
                continue;
            };
            let item = loot::generate_ground_loot(rng);
            self.map.add_ground_item(position, item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generate(seed: u64) -> GeneratedMap {
        let config = GameConfig::new(Difficulty::Normal, seed);
        let mut rng = StdRng::seed_from_u64(seed);
        MapGenerator::generate(&config, &mut rng)
    }

    #[test]
    fn test_spawn_and_zones_are_clear() {
        for seed in 0..10 {
            let generated = generate(seed);
            let map = &generated.map;
            assert!(!map.check_collision(generated.player_spawn, PLAYER_RADIUS));
            assert_eq!(map.extraction_zones().len(), EXTRACTION_ZONE_COUNT);
            for zone in map.extraction_zones() {
                assert!(map.is_walkable(zone.position));
                assert!(zone.available);
            }
        }
    }

    #[test]
    fn test_zones_near_edges() {
        let generated = generate(4);
        let map = &generated.map;
        for zone in map.extraction_zones() {
            let p = zone.position;
            let edge_distance = p.x.min(p.y).min(map.width - p.x).min(map.height - p.y);
            assert!(edge_distance <= MAP_EDGE_MARGIN + 1e-3);
        }
    }

    #[test]
    fn test_containers_have_values_in_range() {
        let generated = generate(9);
        assert!(!generated.map.containers().is_empty());
        for c in generated.map.containers() {
            let (min, max) = c.kind.value_range();
            assert!((min..=max).contains(&c.value));
            assert!(c.is_available());
            assert!(generated.map.is_walkable(c.position));
        }
    }

    #[test]
    fn test_buildings_do_not_overlap() {
        let generated = generate(12);
        let obstacles = generated.map.obstacles();
        assert!(!obstacles.is_empty());
        for (i, a) in obstacles.iter().enumerate() {
            for b in &obstacles[i + 1..] {
                assert!(!a.intersects(b));
            }
        }
    }

    #[test]
    fn test_same_seed_same_map() {
        let a = generate(77);
        let b = generate(77);
        assert_eq!(a.player_spawn, b.player_spawn);
        assert_eq!(a.map.obstacles(), b.map.obstacles());
    }
}
