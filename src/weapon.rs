//! Weapon runtime state: magazine, reserve, fire-rate gate and reload timer.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use hecs::Entity;
use rand::Rng;

use crate::components::Faction;
use crate::constants::MUZZLE_FLASH_DURATION;
use crate::error::GameResult;
use crate::projectile::Projectile;
use crate::time_system::has_elapsed;
use crate::vector;
use crate::weapon_defs::{WeaponDef, WeaponType};

/// Who is pulling the trigger, and how hard they hit.
#[derive(Debug, Clone, Copy)]
pub struct Shooter {
    pub entity: Entity,
    pub faction: Faction,
    pub damage_multiplier: f32,
}

/// A weapon instance. Invariants: `current_ammo <= magazine_size`, and a
/// reload never moves more ammo than the reserve holds.
#[derive(Debug, Clone)]
pub struct Weapon {
    def: &'static WeaponDef,
    current_ammo: u32,
    total_ammo: u32,
    infinite_ammo: bool,
    is_reloading: bool,
    reload_start_time: f32,
    last_shot_time: f32,
    // Cosmetic state for renderers
    muzzle_flash: f32,
    casing_angle: f32,
    recoil_kick: f32,
}

impl Weapon {
    /// A fresh weapon with a full magazine and a full reserve.
    pub fn new(weapon_type: WeaponType) -> Self {
        let def = weapon_type.def();
        Self {
            def,
            current_ammo: def.magazine_size,
            total_ammo: def.total_ammo_cap,
            infinite_ammo: def.infinite_ammo,
            is_reloading: false,
            reload_start_time: 0.0,
            last_shot_time: f32::NEG_INFINITY,
            muzzle_flash: 0.0,
            casing_angle: 0.0,
            recoil_kick: 0.0,
        }
    }

    /// Build a weapon from its table identifier, e.g. `"RIFLE"`.
    pub fn from_name(name: &str) -> GameResult<Self> {
        Ok(Self::new(name.parse()?))
    }

    /// A weapon with explicit ammo counts; the magazine count is clamped to
    /// the magazine size.
    pub fn with_ammo(weapon_type: WeaponType, current_ammo: u32, total_ammo: u32) -> Self {
        let mut weapon = Self::new(weapon_type);
        weapon.current_ammo = current_ammo.min(weapon.def.magazine_size);
        weapon.total_ammo = total_ammo;
        weapon
    }

    /// Never runs dry: shots and reloads do not touch the reserve.
    pub fn with_infinite_ammo(mut self) -> Self {
        self.infinite_ammo = true;
        self
    }

    pub fn weapon_type(&self) -> WeaponType {
        self.def.weapon_type
    }

    pub fn def(&self) -> &'static WeaponDef {
        self.def
    }

    pub fn current_ammo(&self) -> u32 {
        self.current_ammo
    }

    pub fn total_ammo(&self) -> u32 {
        self.total_ammo
    }

    pub fn magazine_size(&self) -> u32 {
        self.def.magazine_size
    }

    pub fn has_infinite_ammo(&self) -> bool {
        self.infinite_ammo
    }

    pub fn is_reloading(&self) -> bool {
        self.is_reloading
    }

    pub fn is_empty(&self) -> bool {
        !self.infinite_ammo && self.current_ammo == 0
    }

    pub fn muzzle_flash(&self) -> f32 {
        self.muzzle_flash
    }

    pub fn casing_angle(&self) -> f32 {
        self.casing_angle
    }

    pub fn recoil_kick(&self) -> f32 {
        self.recoil_kick
    }

    /// Fire-rate gate only.
    pub fn is_ready(&self, now: f32) -> bool {
        has_elapsed(now, self.last_shot_time, self.def.fire_rate)
    }

    /// All gates: not reloading, fire rate elapsed, ammo available.
    pub fn can_fire(&self, now: f32) -> bool {
        !self.is_reloading && self.is_ready(now) && (self.infinite_ammo || self.current_ammo > 0)
    }

    /// Fire toward `aim_angle` from `origin`. Produces one projectile per
    /// pellet, each with its own spread roll, and spends one round per shot.
    /// Returns nothing when a gate is closed; reloading is up to the caller.
    pub fn fire(
        &mut self,
        origin: Vec2,
        aim_angle: f32,
        now: f32,
        shooter: Shooter,
        rng: &mut impl Rng,
    ) -> Vec<Projectile> {
        if !self.can_fire(now) {
            return Vec::new();
        }

        let def = self.def;
        let damage = def.damage * shooter.damage_multiplier.max(0.0);
        let projectiles = (0..def.pellets)
            .map(|_| {
                let offset = if def.spread > 0.0 {
                    rng.gen_range(-def.spread..=def.spread)
                } else {
                    0.0
                };
                Projectile {
                    position: origin,
                    velocity: vector::from_heading(aim_angle + offset) * def.bullet_speed,
                    damage,
                    owner: shooter.entity,
                    faction: shooter.faction,
                    lifetime: def.projectile_lifetime,
                    created_at: now,
                    kind: def.weapon_type,
                }
            })
            .collect();

        if !self.infinite_ammo {
            self.current_ammo -= 1;
        }
        self.last_shot_time = now;
        self.muzzle_flash = MUZZLE_FLASH_DURATION;
        self.casing_angle = aim_angle + FRAC_PI_2 + rng.gen_range(-0.3..0.3);
        self.recoil_kick = def.recoil;

        projectiles
    }

    /// Whether a reload could start right now.
    pub fn can_reload(&self) -> bool {
        !self.is_reloading
            && self.current_ammo < self.def.magazine_size
            && (self.infinite_ammo || self.total_ammo > 0)
    }

    /// Start reloading. Refused while already reloading, with a full
    /// magazine, or with an empty reserve.
    pub fn start_reload(&mut self, now: f32) -> bool {
        if !self.can_reload() {
            return false;
        }
        self.is_reloading = true;
        self.reload_start_time = now;
        true
    }

    /// Abort a reload in progress (e.g. on weapon switch); no ammo moves.
    pub fn cancel_reload(&mut self) {
        self.is_reloading = false;
    }

    /// Advance timers. Returns true on the tick a reload completes.
    pub fn update(&mut self, dt: f32, now: f32) -> bool {
        self.muzzle_flash = (self.muzzle_flash - dt).max(0.0);
        self.recoil_kick = (self.recoil_kick - dt).max(0.0);

        if !self.is_reloading || !has_elapsed(now, self.reload_start_time, self.def.reload_time) {
            return false;
        }

        let needed = self.def.magazine_size - self.current_ammo;
        let moved = if self.infinite_ammo {
            needed
        } else {
            needed.min(self.total_ammo)
        };
        self.current_ammo += moved;
        if !self.infinite_ammo {
            self.total_ammo -= moved;
        }
        self.is_reloading = false;
        true
    }
}
