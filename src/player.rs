//! Player component: movement, stamina, weapons, container search and loot.
//!
//! The player only touches the map through its query and registry methods
//! (containers, ground items); everything else it mutates is its own.

use glam::Vec2;
use hecs::Entity;
use rand::Rng;
use serde::Serialize;

use crate::components::{is_valid_damage, DamageOutcome, Faction, Health, Posture};
use crate::constants::*;
use crate::loot::{self, InsertOutcome, Inventory, LootItem};
use crate::map::{ContainerId, Map};
use crate::projectile::Projectile;
use crate::time_system::has_elapsed;
use crate::vector;
use crate::weapon::{Shooter, Weapon};
use crate::weapon_defs::WeaponType;

/// One tick of player intent, as produced by a host's input layer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Desired direction; any length, normalized before use
    pub movement: Vec2,
    pub sprint: bool,
    /// Aim direction in radians
    pub aim_angle: f32,
    pub fire: bool,
    pub reload: bool,
    /// Switch to this weapon slot
    pub switch_weapon: Option<usize>,
    /// Pick up a nearby item, or start searching a nearby container
    pub interact: bool,
    pub cancel_search: bool,
}

impl PlayerInput {
    pub fn is_moving(&self) -> bool {
        self.movement.length_squared() > f32::EPSILON
    }
}

/// An in-progress container search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchState {
    pub container: ContainerId,
    pub started_at: f32,
}

/// What a tick of searching produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchUpdate {
    Idle,
    /// Fraction of the search completed
    Progress(f32),
    Cancelled(ContainerId),
    Completed {
        container: ContainerId,
        item: LootItem,
        outcome: InsertOutcome,
    },
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub health: Health,
    stamina: f32,
    pub max_stamina: f32,
    pub posture: Posture,
    /// Aim direction in radians
    pub facing: f32,
    weapons: Vec<Weapon>,
    active_weapon: usize,
    pub inventory: Inventory,
    search: Option<SearchState>,
}

impl Player {
    /// A fresh player with a pistol.
    pub fn new(position: Vec2, inventory_size: usize) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            health: Health::new(PLAYER_MAX_HEALTH),
            stamina: PLAYER_MAX_STAMINA,
            max_stamina: PLAYER_MAX_STAMINA,
            posture: Posture::Idle,
            facing: 0.0,
            weapons: vec![Weapon::new(WeaponType::Pistol)],
            active_weapon: 0,
            inventory: Inventory::new(inventory_size),
            search: None,
        }
    }

    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_depleted()
    }

    // =========================================================================
    // Movement
    // =========================================================================

    /// Apply movement input, stamina and collision for one tick.
    pub fn update_movement(&mut self, input: &PlayerInput, map: &Map, dt: f32) {
        if self.is_dead() {
            self.velocity = Vec2::ZERO;
            return;
        }

        if input.is_moving() {
            let dir = vector::normalize(input.movement);
            let sprinting = input.sprint && self.stamina > 0.0;
            let speed = if sprinting {
                PLAYER_SPEED * PLAYER_SPRINT_MULTIPLIER
            } else {
                PLAYER_SPEED
            };
            self.velocity = dir * speed;
            self.posture = if sprinting { Posture::Sprinting } else { Posture::Walking };
        } else {
            // Coasting to a stop regenerates like walking
            if self.posture == Posture::Sprinting {
                self.posture = Posture::Walking;
            }
            self.velocity *= PLAYER_FRICTION;
            if self.velocity.length() < PLAYER_STOP_THRESHOLD {
                self.velocity = Vec2::ZERO;
                self.posture = Posture::Idle;
            }
        }

        self.update_stamina(dt);
        self.move_with_collision(map, dt);
    }

    fn update_stamina(&mut self, dt: f32) {
        let rate = match self.posture {
            Posture::Sprinting => -STAMINA_DRAIN_RATE,
            Posture::Walking => STAMINA_REGEN_MOVING,
            Posture::Idle => STAMINA_REGEN_IDLE,
        };
        self.stamina = (self.stamina + rate * dt).clamp(0.0, self.max_stamina);
    }

    fn move_with_collision(&mut self, map: &Map, dt: f32) {
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
    }

    // =========================================================================
    // Weapons
    // =========================================================================

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn active_weapon(&self) -> Option<&Weapon> {
        self.weapons.get(self.active_weapon)
    }

    pub fn active_weapon_mut(&mut self) -> Option<&mut Weapon> {
        self.weapons.get_mut(self.active_weapon)
    }

    /// Add a weapon; rejected when all slots are taken.
    pub fn add_weapon(&mut self, weapon: Weapon) -> bool {
        if self.weapons.len() >= MAX_WEAPONS {
            log::warn!("Weapon slots full, rejecting {}", weapon.weapon_type());
            return false;
        }
        self.weapons.push(weapon);
        true
    }

    /// Make `slot` the active weapon. Cancels any reload on the old one.
    pub fn switch_weapon(&mut self, slot: usize) -> bool {
        if slot >= self.weapons.len() || slot == self.active_weapon {
            return false;
        }
        if let Some(current) = self.active_weapon_mut() {
            current.cancel_reload();
        }
        self.active_weapon = slot;
        true
    }

    /// Pull the trigger. An empty magazine with reserve left starts a
    /// reload instead. Returns the projectiles fired and whether a reload
    /// was started.
    pub fn fire(
        &mut self,
        entity: Entity,
        aim_angle: f32,
        now: f32,
        rng: &mut impl Rng,
    ) -> (Vec<Projectile>, bool) {
        if self.is_dead() {
            return (Vec::new(), false);
        }
        self.facing = aim_angle;
        let origin = self.position + vector::from_heading(aim_angle) * self.radius;
        let shooter = Shooter {
            entity,
            faction: Faction::Player,
            damage_multiplier: 1.0,
        };
        let Some(weapon) = self.weapons.get_mut(self.active_weapon) else {
            return (Vec::new(), false);
        };

        if weapon.is_empty() {
            return (Vec::new(), weapon.start_reload(now));
        }
        (weapon.fire(origin, aim_angle, now, shooter, rng), false)
    }

    /// Start reloading the active weapon.
    pub fn reload(&mut self, now: f32) -> bool {
        self.active_weapon_mut().is_some_and(|w| w.start_reload(now))
    }

    /// Advance weapon timers. Returns true when the active weapon finished
    /// reloading this tick.
    pub fn update_weapons(&mut self, dt: f32, now: f32) -> bool {
        let mut finished = false;
        for (slot, weapon) in self.weapons.iter_mut().enumerate() {
            if weapon.update(dt, now) && slot == self.active_weapon {
                finished = true;
            }
        }
        finished
    }

    // =========================================================================
    // Search and loot
    // =========================================================================

    pub fn search(&self) -> Option<SearchState> {
        self.search
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// Start searching the nearest available container in range.
    pub fn start_search(&mut self, map: &mut Map, now: f32) -> Option<ContainerId> {
        if self.is_searching() || self.is_dead() {
            return None;
        }
        let id = map.nearest_available_container(self.position, SEARCH_RANGE)?;
        if !map.begin_search(id) {
            return None;
        }
        self.search = Some(SearchState {
            container: id,
            started_at: now,
        });
        Some(id)
    }

    /// Stop the current search; the container's progress resets.
    pub fn cancel_search(&mut self, map: &mut Map) -> Option<ContainerId> {
        let state = self.search.take()?;
        map.cancel_search(state.container);
        Some(state.container)
    }

    /// Advance the current search. Moving, an explicit cancel, leaving range
    /// or a container that no longer resolves all cancel it.
    pub fn update_search(
        &mut self,
        input: &PlayerInput,
        map: &mut Map,
        now: f32,
        rng: &mut impl Rng,
    ) -> SearchUpdate {
        let Some(state) = self.search else {
            return SearchUpdate::Idle;
        };

        let in_range = map
            .container(state.container)
            .is_some_and(|c| c.is_searching() && c.position.distance(self.position) <= SEARCH_RANGE);
        if input.is_moving() || input.cancel_search || !in_range {
            self.cancel_search(map);
            return SearchUpdate::Cancelled(state.container);
        }

        if !has_elapsed(now, state.started_at, SEARCH_TIME) {
            let progress = ((now - state.started_at) / SEARCH_TIME).clamp(0.0, 1.0);
            map.set_search_progress(state.container, progress);
            return SearchUpdate::Progress(progress);
        }

        self.search = None;
        let Some(value) = map.finish_search(state.container) else {
            return SearchUpdate::Cancelled(state.container);
        };
        let item = loot::generate_container_loot(value, rng);
        let outcome = self.inventory.insert(item.clone());
        SearchUpdate::Completed {
            container: state.container,
            item,
            outcome,
        }
    }

    /// Pick up the nearest uncollected ground item in range.
    pub fn collect_item(&mut self, map: &mut Map) -> Option<(LootItem, InsertOutcome)> {
        if self.is_dead() {
            return None;
        }
        let index = map.nearest_item(self.position, PICKUP_RANGE)?;
        let item = map.collect_item(index)?;
        let outcome = self.inventory.insert(item.clone());
        Some((item, outcome))
    }

    pub fn total_loot_value(&self) -> u32 {
        self.inventory.total_value()
    }

    // =========================================================================
    // Damage
    // =========================================================================

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_dead() || !is_valid_damage(amount) {
            return DamageOutcome::Ignored;
        }
        self.health.damage(amount);
        if self.health.is_depleted() {
            self.velocity = Vec2::ZERO;
            self.posture = Posture::Idle;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded
        }
    }

    pub fn hud(&self) -> PlayerHud {
        let weapon = self.active_weapon();
        PlayerHud {
            health: self.health.current(),
            max_health: self.health.max(),
            stamina: self.stamina,
            max_stamina: self.max_stamina,
            weapon: weapon.map(|w| w.weapon_type()),
            current_ammo: weapon.map_or(0, |w| w.current_ammo()),
            total_ammo: weapon.map_or(0, |w| w.total_ammo()),
            reloading: weapon.is_some_and(|w| w.is_reloading()),
            total_loot_value: self.total_loot_value(),
            inventory_used: self.inventory.len(),
            inventory_capacity: self.inventory.capacity(),
            searching: self.is_searching(),
        }
    }
}

/// Read-only player readout for a HUD.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerHud {
    pub health: f32,
    pub max_health: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    pub weapon: Option<WeaponType>,
    pub current_ammo: u32,
    pub total_ammo: u32,
    pub reloading: bool,
    pub total_loot_value: u32,
    pub inventory_used: usize,
    pub inventory_capacity: usize,
    pub searching: bool,
}
