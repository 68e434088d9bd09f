//! Weapon definitions - all weapon stats in one place.
//!
//! Every `WeaponType` has exactly one row in `WEAPON_DEFS`. Weapons are
//! looked up by type, or by name when the type comes from outside the
//! crate; an unknown name is an error rather than a silent default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeaponType {
    Pistol,
    Rifle,
    Shotgun,
    Smg,
    Sniper,
}

impl WeaponType {
    pub const ALL: [WeaponType; 5] = [
        WeaponType::Pistol,
        WeaponType::Rifle,
        WeaponType::Shotgun,
        WeaponType::Smg,
        WeaponType::Sniper,
    ];

    pub fn def(self) -> &'static WeaponDef {
        get_def(self)
    }

    /// Identifier used in data tables and configs
    pub fn id(self) -> &'static str {
        match self {
            WeaponType::Pistol => "PISTOL",
            WeaponType::Rifle => "RIFLE",
            WeaponType::Shotgun => "SHOTGUN",
            WeaponType::Smg => "SMG",
            WeaponType::Sniper => "SNIPER",
        }
    }
}

impl fmt::Display for WeaponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for WeaponType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeaponType::ALL
            .into_iter()
            .find(|t| t.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::UnknownWeaponType(s.to_string()))
    }
}

/// Static stats of a weapon type
#[derive(Debug)]
pub struct WeaponDef {
    pub weapon_type: WeaponType,
    pub name: &'static str,
    /// Damage per projectile
    pub damage: f32,
    /// Minimum seconds between shots
    pub fire_rate: f32,
    /// Seconds to reload
    pub reload_time: f32,
    pub magazine_size: u32,
    /// Reserve ammo a fresh weapon carries
    pub total_ammo_cap: u32,
    /// Projectile speed in units per second
    pub bullet_speed: f32,
    /// Half-angle (radians) of the random spread per projectile
    pub spread: f32,
    /// Visual kick per shot (radians), cosmetic
    pub recoil: f32,
    /// Projectiles per shot
    pub pellets: u32,
    pub infinite_ammo: bool,
    /// Seconds a projectile lives before it is retired
    pub projectile_lifetime: f32,
}

/// Get the definition for a weapon type
pub fn get_def(weapon_type: WeaponType) -> &'static WeaponDef {
    match weapon_type {
        WeaponType::Pistol => &WEAPON_DEFS[0],
        WeaponType::Rifle => &WEAPON_DEFS[1],
        WeaponType::Shotgun => &WEAPON_DEFS[2],
        WeaponType::Smg => &WEAPON_DEFS[3],
        WeaponType::Sniper => &WEAPON_DEFS[4],
    }
}

/// Static table of all weapon definitions, in `WeaponType` order
pub static WEAPON_DEFS: [WeaponDef; 5] = [
    WeaponDef {
        weapon_type: WeaponType::Pistol,
        name: "Pistol",
        damage: 20.0,
        fire_rate: 0.3,
        reload_time: 1.2,
        magazine_size: 12,
        total_ammo_cap: 60,
        bullet_speed: 600.0,
        spread: 0.05,
        recoil: 0.02,
        pellets: 1,
        infinite_ammo: false,
        projectile_lifetime: 1.5,
    },
    WeaponDef {
        weapon_type: WeaponType::Rifle,
        name: "Assault Rifle",
        damage: 25.0,
        fire_rate: 0.1,
        reload_time: 2.0,
        magazine_size: 30,
        total_ammo_cap: 90,
        bullet_speed: 800.0,
        spread: 0.08,
        recoil: 0.03,
        pellets: 1,
        infinite_ammo: false,
        projectile_lifetime: 1.5,
    },
    WeaponDef {
        weapon_type: WeaponType::Shotgun,
        name: "Shotgun",
        damage: 12.0,
        fire_rate: 0.9,
        reload_time: 2.5,
        magazine_size: 6,
        total_ammo_cap: 24,
        bullet_speed: 500.0,
        // Wide cone, each pellet rolls its own angle
        spread: 0.3,
        recoil: 0.1,
        pellets: 8,
        infinite_ammo: false,
        projectile_lifetime: 0.6,
    },
    WeaponDef {
        weapon_type: WeaponType::Smg,
        name: "SMG",
        damage: 15.0,
        fire_rate: 0.07,
        reload_time: 1.8,
        magazine_size: 25,
        total_ammo_cap: 100,
        bullet_speed: 650.0,
        spread: 0.12,
        recoil: 0.02,
        pellets: 1,
        infinite_ammo: false,
        projectile_lifetime: 1.2,
    },
    WeaponDef {
        weapon_type: WeaponType::Sniper,
        name: "Sniper Rifle",
        damage: 90.0,
        fire_rate: 1.5,
        reload_time: 3.0,
        magazine_size: 5,
        total_ammo_cap: 20,
        bullet_speed: 1200.0,
        spread: 0.01,
        recoil: 0.15,
        pellets: 1,
        infinite_ammo: false,
        projectile_lifetime: 2.0,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_weapon_types_have_definitions() {
        for t in WeaponType::ALL {
            assert_eq!(get_def(t).weapon_type, t);
        }
    }

    #[test]
    fn test_from_str_accepts_ids() {
        assert_eq!("RIFLE".parse::<WeaponType>().unwrap(), WeaponType::Rifle);
        assert_eq!("shotgun".parse::<WeaponType>().unwrap(), WeaponType::Shotgun);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "RAILGUN".parse::<WeaponType>().unwrap_err();
        assert!(matches!(err, GameError::UnknownWeaponType(name) if name == "RAILGUN"));
    }

    #[test]
    fn test_defs_are_sane() {
        for def in WEAPON_DEFS.iter() {
            assert!(def.magazine_size > 0);
            assert!(def.pellets >= 1);
            assert!(def.fire_rate > 0.0);
            assert!(def.spread >= 0.0);
        }
        assert_eq!(get_def(WeaponType::Shotgun).pellets, 8);
    }
}
