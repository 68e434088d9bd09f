//! Core game state - owns the simulation data.

use glam::Vec2;
use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::config::{Difficulty, GameConfig};
use crate::enemy::{Enemy, EnemySnapshot};
use crate::events::{EventQueue, GameEvent};
use crate::map::Map;
use crate::map_gen::MapGenerator;
use crate::player::{Player, PlayerHud};
use crate::projectile::Projectile;
use crate::spawning::{self, EnemyKind};
use crate::systems::ExtractionTracker;
use crate::time_system::GameClock;
use crate::weapon::Weapon;

/// Where the raid stands. Every phase but `InProgress` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RaidPhase {
    InProgress,
    /// Made it out carrying this much loot value
    Extracted { loot_value: u32 },
    Killed,
    /// Missing in action: the raid timer ran out
    TimeExpired,
}

impl RaidPhase {
    pub fn is_over(self) -> bool {
        self != RaidPhase::InProgress
    }
}

/// Core game state - owns all simulation data.
pub struct GameState {
    /// The ECS world; holds the player and every enemy
    pub world: World,

    pub map: Map,

    /// Player entity handle
    pub player_entity: Entity,

    /// Projectiles in flight
    pub projectiles: Vec<Projectile>,

    /// Game clock (simulation time)
    pub game_clock: GameClock,

    /// Immutable session configuration
    pub config: GameConfig,

    /// Session RNG seeded from the config
    pub rng: StdRng,

    pub phase: RaidPhase,

    pub extraction: ExtractionTracker,

    /// Events pushed during the current step
    pub events: EventQueue,
}

impl GameState {
    /// Generate a map, then spawn the player and the difficulty's enemies.
    pub fn new(config: GameConfig) -> Self {
        let config = config.sanitized();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let generated = MapGenerator::generate(&config, &mut rng);

        let mut state = Self::assemble(config, generated.map, generated.player_spawn, rng);
        let preset = state.config.preset();
        let spawned = spawning::spawn_enemies(
            &mut state.world,
            &state.map,
            &preset,
            generated.player_spawn,
            &mut state.rng,
        );
        log::info!(
            "Raid started: difficulty {}, seed {}, {} enemies",
            state.config.difficulty,
            state.config.seed,
            spawned.len()
        );
        state
    }

    /// A raid on a prepared map with no enemies; add them with `spawn_enemy`.
    pub fn with_map(config: GameConfig, map: Map, player_spawn: Vec2) -> Self {
        let config = config.sanitized();
        let rng = StdRng::seed_from_u64(config.seed);
        Self::assemble(config, map, player_spawn, rng)
    }

    fn assemble(config: GameConfig, map: Map, player_spawn: Vec2, rng: StdRng) -> Self {
        let mut world = World::new();
        let player_entity = spawning::spawn_player(&mut world, player_spawn, config.inventory_size);
        Self {
            world,
            map,
            player_entity,
            projectiles: Vec::new(),
            game_clock: GameClock::new(),
            config,
            rng,
            phase: RaidPhase::InProgress,
            extraction: ExtractionTracker::new(),
            events: EventQueue::new(),
        }
    }

    /// Spawn an enemy with this raid's difficulty scaling.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, position: Vec2, patrol_points: Vec<Vec2>) -> Entity {
        let preset = self.config.preset();
        kind.def().spawn(&mut self.world, position, patrol_points, &preset)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// Give the player a weapon. Fails when all slots are full.
    pub fn give_weapon(&mut self, weapon: Weapon) -> bool {
        let weapon_type = weapon.weapon_type();
        let accepted = self
            .world
            .get::<&mut Player>(self.player_entity)
            .is_ok_and(|mut p| p.add_weapon(weapon));
        self.events.push(GameEvent::WeaponAcquired {
            weapon: weapon_type,
            accepted,
        });
        accepted
    }

    pub fn player_position(&self) -> Option<Vec2> {
        self.world.get::<&Player>(self.player_entity).ok().map(|p| p.position)
    }

    pub fn hud(&self) -> Option<PlayerHud> {
        self.world.get::<&Player>(self.player_entity).ok().map(|p| p.hud())
    }

    pub fn enemy_snapshots(&self) -> Vec<EnemySnapshot> {
        self.world
            .query::<&Enemy>()
            .iter()
            .map(|(_, enemy)| enemy.snapshot())
            .collect()
    }

    pub fn enemy_count(&self) -> usize {
        self.world.query::<&Enemy>().iter().count()
    }

    pub fn summary(&self) -> RaidSummary {
        let hud = self.hud();
        RaidSummary {
            phase: self.phase,
            difficulty: self.config.difficulty,
            seed: self.config.seed,
            elapsed: self.game_clock.time,
            ticks: self.game_clock.tick,
            loot_value: hud.as_ref().map_or(0, |h| h.total_loot_value),
            items: hud.as_ref().map_or(0, |h| h.inventory_used),
            health: hud.as_ref().map_or(0.0, |h| h.health),
            enemies_remaining: self.enemy_count(),
        }
    }
}

/// End-of-raid readout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaidSummary {
    pub phase: RaidPhase,
    pub difficulty: Difficulty,
    pub seed: u64,
    pub elapsed: f32,
    pub ticks: u64,
    pub loot_value: u32,
    pub items: usize,
    pub health: f32,
    pub enemies_remaining: usize,
}
