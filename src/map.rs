//! The raid map: terrain queries, collision, and the container, ground item
//! and extraction zone registries.
//!
//! The map owns every registry. Other code holds plain indices
//! (`ContainerId`, zone index) and resolves them through lookups that
//! return `None` when the index is stale.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::loot::LootItem;

/// Axis-aligned rectangle used for building footprints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width.max(0.0), y + height.max(0.0)),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Circle-vs-rectangle overlap test
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        closest.distance_squared(center) < radius * radius || self.contains(center)
    }

    /// Rectangle grown by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

// =============================================================================
// CONTAINERS
// =============================================================================

/// Index of a container in the map's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(pub usize);

/// Container kinds, from common to rare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerType {
    Crate,
    Locker,
    Chest,
    Safe,
}

impl ContainerType {
    pub const ALL: [ContainerType; 4] = [
        ContainerType::Crate,
        ContainerType::Locker,
        ContainerType::Chest,
        ContainerType::Safe,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ContainerType::Crate => "crate",
            ContainerType::Locker => "locker",
            ContainerType::Chest => "chest",
            ContainerType::Safe => "safe",
        }
    }

    /// Inclusive value range a container of this kind rolls from
    pub fn value_range(self) -> (u32, u32) {
        match self {
            ContainerType::Crate => (50, 200),
            ContainerType::Locker => (100, 400),
            ContainerType::Chest => (200, 600),
            ContainerType::Safe => (500, 1500),
        }
    }

    /// Footprint size in world units
    pub fn size(self) -> Vec2 {
        match self {
            ContainerType::Crate => Vec2::new(30.0, 30.0),
            ContainerType::Locker => Vec2::new(25.0, 40.0),
            ContainerType::Chest => Vec2::new(35.0, 25.0),
            ContainerType::Safe => Vec2::new(30.0, 30.0),
        }
    }

    /// Relative spawn weight; rarer kinds are worth more
    pub fn spawn_weight(self) -> u32 {
        match self {
            ContainerType::Crate => 50,
            ContainerType::Locker => 30,
            ContainerType::Chest => 15,
            ContainerType::Safe => 5,
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContainerType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContainerType::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::UnknownContainerType(s.to_string()))
    }
}

/// A searchable container placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub id: ContainerId,
    pub position: Vec2,
    pub kind: ContainerType,
    pub value: u32,
    is_searched: bool,
    is_searching: bool,
    search_progress: f32,
}

impl Container {
    pub fn is_searched(&self) -> bool {
        self.is_searched
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    /// Fraction of the search completed, in [0, 1]
    pub fn search_progress(&self) -> f32 {
        self.search_progress
    }

    /// Searched containers are spent; one being searched is busy.
    pub fn is_available(&self) -> bool {
        !self.is_searched && !self.is_searching
    }
}

/// A loose item lying on the ground (including enemy drops).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroundItem {
    pub position: Vec2,
    pub item: LootItem,
    collected: bool,
}

impl GroundItem {
    pub fn is_collected(&self) -> bool {
        self.collected
    }
}

/// A circular area the player must hold to extract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionZone {
    pub position: Vec2,
    pub radius: f32,
    pub available: bool,
}

impl ExtractionZone {
    pub fn contains(&self, p: Vec2) -> bool {
        self.position.distance(p) <= self.radius
    }
}

// =============================================================================
// MAP
// =============================================================================

#[derive(Debug, Clone)]
pub struct Map {
    pub width: f32,
    pub height: f32,
    obstacles: Vec<Rect>,
    containers: Vec<Container>,
    items: Vec<GroundItem>,
    extraction_zones: Vec<ExtractionZone>,
}

impl Map {
    /// Create an empty, fully walkable map.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            obstacles: Vec::new(),
            containers: Vec::new(),
            items: Vec::new(),
            extraction_zones: Vec::new(),
        }
    }

    pub fn add_obstacle(&mut self, rect: Rect) {
        self.obstacles.push(rect);
    }

    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    pub fn in_bounds(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }

    /// A point is walkable when it is on the map and outside every building.
    pub fn is_walkable(&self, p: Vec2) -> bool {
        p.is_finite() && self.in_bounds(p) && !self.obstacles.iter().any(|r| r.contains(p))
    }

    /// Circle-vs-geometry test: true when a circle of `radius` at `p`
    /// pokes out of the map or overlaps a building.
    pub fn check_collision(&self, p: Vec2, radius: f32) -> bool {
        if !p.is_finite() {
            return true;
        }
        if p.x - radius < 0.0
            || p.y - radius < 0.0
            || p.x + radius > self.width
            || p.y + radius > self.height
        {
            return true;
        }
        self.obstacles.iter().any(|r| r.intersects_circle(p, radius))
    }

    /// Clamp a position so a circle of `radius` stays on the map.
    pub fn clamp_to_bounds(&self, p: Vec2, radius: f32) -> Vec2 {
        let r = radius.clamp(0.0, self.width.min(self.height) * 0.5);
        Vec2::new(
            p.x.clamp(r, self.width - r),
            p.y.clamp(r, self.height - r),
        )
    }

    /// Whether `from` can see `to`. Always true: buildings do not occlude
    /// vision. Perception still routes through here so an occlusion test
    /// can be added without touching the AI.
    pub fn has_line_of_sight(&self, _from: Vec2, _to: Vec2) -> bool {
        true
    }

    // -------------------------------------------------------------------------
    // Containers
    // -------------------------------------------------------------------------

    pub fn add_container(&mut self, position: Vec2, kind: ContainerType, value: u32) -> ContainerId {
        let id = ContainerId(self.containers.len());
        self.containers.push(Container {
            id,
            position,
            kind,
            value,
            is_searched: false,
            is_searching: false,
            search_progress: 0.0,
        });
        id
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(id.0)
    }

    /// Closest container within `range` that nobody has searched or is searching.
    pub fn nearest_available_container(&self, p: Vec2, range: f32) -> Option<ContainerId> {
        self.containers
            .iter()
            .filter(|c| c.is_available())
            .map(|c| (c.id, c.position.distance(p)))
            .filter(|(_, d)| *d <= range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Mark a container as being searched. Fails when it is missing, spent
    /// or already busy.
    pub fn begin_search(&mut self, id: ContainerId) -> bool {
        match self.containers.get_mut(id.0) {
            Some(c) if c.is_available() => {
                c.is_searching = true;
                c.search_progress = 0.0;
                true
            }
            _ => false,
        }
    }

    pub fn set_search_progress(&mut self, id: ContainerId, progress: f32) {
        if let Some(c) = self.containers.get_mut(id.0) {
            if c.is_searching {
                c.search_progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
            }
        }
    }

    /// Stop a search in progress and forget its progress.
    pub fn cancel_search(&mut self, id: ContainerId) {
        if let Some(c) = self.containers.get_mut(id.0) {
            c.is_searching = false;
            c.search_progress = 0.0;
        }
    }

    /// Complete a search. The container is spent from now on. Returns the
    /// container's value, or `None` if it was not being searched.
    pub fn finish_search(&mut self, id: ContainerId) -> Option<u32> {
        let c = self.containers.get_mut(id.0)?;
        if !c.is_searching || c.is_searched {
            return None;
        }
        c.is_searching = false;
        c.is_searched = true;
        c.search_progress = 1.0;
        Some(c.value)
    }

    // -------------------------------------------------------------------------
    // Ground items
    // -------------------------------------------------------------------------

    pub fn add_ground_item(&mut self, position: Vec2, item: LootItem) -> usize {
        self.items.push(GroundItem {
            position,
            item,
            collected: false,
        });
        self.items.len() - 1
    }

    pub fn ground_items(&self) -> &[GroundItem] {
        &self.items
    }

    /// Closest uncollected item within `range`.
    pub fn nearest_item(&self, p: Vec2, range: f32) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_collected())
            .map(|(i, item)| (i, item.position.distance(p)))
            .filter(|(_, d)| *d <= range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Take an item off the ground. Each item can be taken once.
    pub fn collect_item(&mut self, index: usize) -> Option<LootItem> {
        let ground = self.items.get_mut(index)?;
        if ground.collected {
            return None;
        }
        ground.collected = true;
        Some(ground.item.clone())
    }

    // -------------------------------------------------------------------------
    // Extraction zones
    // -------------------------------------------------------------------------

    pub fn add_extraction_zone(&mut self, position: Vec2, radius: f32) -> usize {
        self.extraction_zones.push(ExtractionZone {
            position,
            radius: radius.max(0.0),
            available: true,
        });
        self.extraction_zones.len() - 1
    }

    pub fn extraction_zones(&self) -> &[ExtractionZone] {
        &self.extraction_zones
    }

    pub fn set_extraction_available(&mut self, index: usize, available: bool) {
        if let Some(zone) = self.extraction_zones.get_mut(index) {
            zone.available = available;
        }
    }

    /// The available extraction zone containing `p`, with its index.
    pub fn extraction_zone_at(&self, p: Vec2) -> Option<(usize, &ExtractionZone)> {
        self.extraction_zones
            .iter()
            .enumerate()
            .find(|(_, zone)| zone.available && zone.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::LootCategory;

    fn map_with_wall() -> Map {
        let mut map = Map::new(500.0, 500.0);
        map.add_obstacle(Rect::new(200.0, 200.0, 100.0, 100.0));
        map
    }

    #[test]
    fn test_walkable_outside_buildings() {
        let map = map_with_wall();
        assert!(map.is_walkable(Vec2::new(50.0, 50.0)));
        assert!(!map.is_walkable(Vec2::new(250.0, 250.0)));
        assert!(!map.is_walkable(Vec2::new(-1.0, 50.0)));
        assert!(!map.is_walkable(Vec2::new(f32::NAN, 50.0)));
    }

    #[test]
    fn test_check_collision_circle_edges() {
        let map = map_with_wall();
        // Circle touching the wall from the left
        assert!(map.check_collision(Vec2::new(195.0, 250.0), 10.0));
        assert!(!map.check_collision(Vec2::new(180.0, 250.0), 10.0));
        // Circle poking out of the map
        assert!(map.check_collision(Vec2::new(5.0, 250.0), 10.0));
    }

    #[test]
    fn test_clamp_to_bounds() {
        let map = map_with_wall();
        assert_eq!(map.clamp_to_bounds(Vec2::new(-50.0, 600.0), 10.0), Vec2::new(10.0, 490.0));
    }

    #[test]
    fn test_container_search_lifecycle() {
        let mut map = map_with_wall();
        let id = map.add_container(Vec2::new(50.0, 50.0), ContainerType::Chest, 300);

        assert!(map.begin_search(id));
        assert!(!map.begin_search(id), "busy container cannot be searched twice");

        map.set_search_progress(id, 0.5);
        assert_eq!(map.container(id).unwrap().search_progress(), 0.5);

        map.cancel_search(id);
        let c = map.container(id).unwrap();
        assert!(!c.is_searching());
        assert_eq!(c.search_progress(), 0.0);

        assert!(map.begin_search(id));
        assert_eq!(map.finish_search(id), Some(300));
        assert!(map.container(id).unwrap().is_searched());
        assert!(!map.begin_search(id), "searched container is spent");
        assert_eq!(map.finish_search(id), None);
    }

    #[test]
    fn test_stale_container_id_resolves_to_none() {
        let mut map = map_with_wall();
        assert!(map.container(ContainerId(3)).is_none());
        assert!(!map.begin_search(ContainerId(3)));
    }

    #[test]
    fn test_nearest_available_container_skips_spent() {
        let mut map = map_with_wall();
        let near = map.add_container(Vec2::new(50.0, 50.0), ContainerType::Crate, 100);
        let far = map.add_container(Vec2::new(80.0, 50.0), ContainerType::Crate, 100);

        assert_eq!(map.nearest_available_container(Vec2::new(40.0, 50.0), 50.0), Some(near));
        map.begin_search(near);
        map.finish_search(near);
        assert_eq!(map.nearest_available_container(Vec2::new(40.0, 50.0), 50.0), Some(far));
        assert_eq!(map.nearest_available_container(Vec2::new(400.0, 50.0), 50.0), None);
    }

    #[test]
    fn test_collect_item_once() {
        let mut map = map_with_wall();
        let item = LootItem::new("Bandage", LootCategory::Medical, 30);
        let index = map.add_ground_item(Vec2::new(10.0, 10.0), item.clone());

        assert_eq!(map.nearest_item(Vec2::new(15.0, 10.0), 30.0), Some(index));
        assert_eq!(map.collect_item(index), Some(item));
        assert_eq!(map.collect_item(index), None);
        assert_eq!(map.nearest_item(Vec2::new(15.0, 10.0), 30.0), None);
    }

    #[test]
    fn test_extraction_zone_membership() {
        let mut map = map_with_wall();
        let zone = map.add_extraction_zone(Vec2::new(450.0, 450.0), 40.0);

        assert_eq!(map.extraction_zone_at(Vec2::new(440.0, 450.0)).map(|(i, _)| i), Some(zone));
        assert!(map.extraction_zone_at(Vec2::new(300.0, 450.0)).is_none());

        map.set_extraction_available(zone, false);
        assert!(map.extraction_zone_at(Vec2::new(440.0, 450.0)).is_none());
    }

    #[test]
    fn test_container_type_from_str() {
        assert_eq!("Safe".parse::<ContainerType>().unwrap(), ContainerType::Safe);
        assert!(matches!(
            "barrel".parse::<ContainerType>(),
            Err(GameError::UnknownContainerType(_))
        ));
    }
}
