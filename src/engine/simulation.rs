//! Game simulation - one fixed step of the whole raid.
//!
//! Order within a step: player, enemy AI, flocking, enemy physics, melee,
//! projectiles, dead enemy cleanup, then win and loss checks.

use hecs::Entity;
use serde::Serialize;

use super::game_state::{GameState, RaidPhase};
use crate::components::Faction;
use crate::enemy::Enemy;
use crate::events::GameEvent;
use crate::loot::{InsertOutcome, LootItem};
use crate::player::{Player, PlayerHud, PlayerInput, SearchUpdate};
use crate::systems::{self, ExtractionProgress, TargetInfo};
use crate::weapon_defs::WeaponType;

/// Everything a host needs after a step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub time: f32,
    pub tick: u64,
    pub phase: RaidPhase,
    pub extraction: ExtractionProgress,
    pub hud: Option<PlayerHud>,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Advance the raid by `dt` seconds under `input`. Once the raid is over
    /// the state is frozen and steps report nothing new.
    pub fn step(&mut self, dt: f32, input: &PlayerInput) -> StepReport {
        puffin::profile_function!();

        if self.phase.is_over() {
            return self.report(ExtractionProgress::Idle);
        }

        let dt = self.game_clock.advance(dt);
        let now = self.game_clock.time;

        self.update_player(input, now, dt);

        let target = self.player_target();
        let melee = systems::run_enemy_ai(
            &mut self.world,
            target,
            &self.map,
            &self.game_clock,
            dt,
            &mut self.projectiles,
            &mut self.events,
            &mut self.rng,
        );
        systems::apply_flocking(&mut self.world);
        {
            puffin::profile_scope!("enemy_physics");
            for (_, enemy) in self.world.query_mut::<&mut Enemy>() {
                enemy.integrate(&self.map, dt);
            }
        }

        systems::apply_melee_hits(&mut self.world, &melee, now, &mut self.events);
        systems::update_projectiles(
            &mut self.projectiles,
            &mut self.world,
            &self.map,
            now,
            dt,
            &mut self.events,
        );
        systems::remove_dead_enemies(&mut self.world, &mut self.map, &mut self.rng);

        let extraction = self.evaluate_outcome(now);
        self.report(extraction)
    }

    fn report(&mut self, extraction: ExtractionProgress) -> StepReport {
        StepReport {
            time: self.game_clock.time,
            tick: self.game_clock.tick,
            phase: self.phase,
            extraction,
            hud: self.hud(),
            events: self.events.drain().collect(),
        }
    }

    fn player_target(&self) -> Option<TargetInfo> {
        self.world
            .get::<&Player>(self.player_entity)
            .ok()
            .filter(|p| !p.is_dead())
            .map(|p| TargetInfo {
                entity: self.player_entity,
                position: p.position,
                velocity: p.velocity,
                radius: p.radius,
            })
    }

    /// Input, movement, weapons, interaction and search for the player.
    fn update_player(&mut self, input: &PlayerInput, now: f32, dt: f32) {
        puffin::profile_function!();

        let entity: Entity = self.player_entity;
        let Ok(mut player) = self.world.get::<&mut Player>(entity) else {
            return;
        };
        if player.is_dead() {
            return;
        }

        if let Some(slot) = input.switch_weapon {
            player.switch_weapon(slot);
        }
        player.update_movement(input, &self.map, dt);

        if player.update_weapons(dt, now) {
            log::debug!("Player reload complete");
        }
        if input.reload && player.reload(now) {
            self.events.push(reload_event(&player));
        }
        if input.fire {
            let (shots, reloading) = player.fire(entity, input.aim_angle, now, &mut self.rng);
            if reloading {
                self.events.push(reload_event(&player));
            }
            if let (Some(first), Some(weapon)) = (shots.first(), player.active_weapon()) {
                self.events.push(GameEvent::ShotFired {
                    faction: Faction::Player,
                    weapon: weapon.weapon_type(),
                    origin: first.position,
                    pellets: shots.len(),
                });
            }
            self.projectiles.extend(shots);
        }

        if input.interact && !player.is_searching() {
            if let Some((item, outcome)) = player.collect_item(&mut self.map) {
                self.events.push(loot_event(item, outcome));
            } else if let Some(container) = player.start_search(&mut self.map, now) {
                self.events.push(GameEvent::SearchStarted { container });
            }
        }

        match player.update_search(input, &mut self.map, now, &mut self.rng) {
            SearchUpdate::Idle | SearchUpdate::Progress(_) => {}
            SearchUpdate::Cancelled(container) => {
                self.events.push(GameEvent::SearchCancelled { container });
            }
            SearchUpdate::Completed {
                container,
                item,
                outcome,
            } => {
                log::info!("Searched {:?}: {} worth {}", container, item.name, item.value);
                self.events.push(GameEvent::ContainerSearched {
                    container,
                    loot: item.clone(),
                });
                self.events.push(loot_event(item, outcome));
            }
        }
    }

    /// Death, extraction and the raid timer, in that order.
    fn evaluate_outcome(&mut self, now: f32) -> ExtractionProgress {
        let (dead, position, loot_value) = match self.world.get::<&Player>(self.player_entity) {
            Ok(p) => (p.is_dead(), p.position, p.total_loot_value()),
            Err(_) => (true, Default::default(), 0),
        };

        if dead {
            log::info!("Player killed at {:.1}s", now);
            self.phase = RaidPhase::Killed;
            self.extraction.cancel();
            self.events.push(GameEvent::PlayerKilled);
            return ExtractionProgress::Idle;
        }

        let progress = self.extraction.update(
            &self.map,
            position,
            now,
            self.config.extraction_time,
            &mut self.events,
        );
        if let ExtractionProgress::Complete { zone } = progress {
            log::info!("Extracted through zone {} with {} loot value", zone, loot_value);
            self.phase = RaidPhase::Extracted { loot_value };
            self.events.push(GameEvent::Extracted { loot_value });
            return progress;
        }

        if now >= self.config.raid_time_limit {
            log::info!("Raid time expired at {:.1}s", now);
            self.phase = RaidPhase::TimeExpired;
            self.events.push(GameEvent::RaidTimeExpired);
        }
        progress
    }
}

fn reload_event(player: &Player) -> GameEvent {
    GameEvent::ReloadStarted {
        faction: Faction::Player,
        weapon: player
            .active_weapon()
            .map(|w| w.weapon_type())
            .unwrap_or(WeaponType::Pistol),
    }
}

fn loot_event(item: LootItem, outcome: InsertOutcome) -> GameEvent {
    match outcome {
        InsertOutcome::Added => GameEvent::LootAdded { item },
        InsertOutcome::Replaced(replaced) => GameEvent::LootReplaced { item, replaced },
        InsertOutcome::Discarded(_) => GameEvent::LootDiscarded { item },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Difficulty, GameConfig};
    use crate::constants::*;
    use crate::enemy::AiState;
    use crate::map::{ContainerType, Map};
    use crate::spawning::EnemyKind;
    use glam::Vec2;

    const DT: f32 = 0.1;

    fn open_raid() -> GameState {
        let mut map = Map::new(2000.0, 2000.0);
        map.add_extraction_zone(Vec2::new(1800.0, 1000.0), EXTRACTION_ZONE_RADIUS);
        GameState::with_map(GameConfig::new(Difficulty::Normal, 1), map, Vec2::new(1000.0, 1000.0))
    }

    fn idle() -> PlayerInput {
        PlayerInput::default()
    }

    fn teleport(state: &mut GameState, position: Vec2) {
        state.world.get::<&mut Player>(state.player_entity).unwrap().position = position;
    }

    fn run(state: &mut GameState, seconds: f32, input: &PlayerInput) -> Vec<StepReport> {
        let steps = (seconds / DT).round() as usize;
        (0..steps).map(|_| state.step(DT, input)).collect()
    }

    #[test]
    fn test_extraction_after_dwell_wins() {
        let mut state = open_raid();
        teleport(&mut state, Vec2::new(1800.0, 1000.0));

        let reports = run(&mut state, EXTRACTION_TIME + 0.5, &idle());
        let last = reports.last().unwrap();
        assert_eq!(state.phase, RaidPhase::Extracted { loot_value: 0 });
        assert!(reports
            .iter()
            .flat_map(|r| &r.events)
            .any(|e| matches!(e, GameEvent::Extracted { loot_value: 0 })));
        assert!(last.phase.is_over());
    }

    #[test]
    fn test_leaving_zone_resets_extraction() {
        let mut state = open_raid();
        teleport(&mut state, Vec2::new(1800.0, 1000.0));
        run(&mut state, EXTRACTION_TIME - 1.0, &idle());

        teleport(&mut state, Vec2::new(1500.0, 1000.0));
        let report = state.step(DT, &idle());
        assert_eq!(report.extraction, ExtractionProgress::Idle);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::ExtractionCancelled { zone: 0 })));

        // Back in: the full countdown applies again
        teleport(&mut state, Vec2::new(1800.0, 1000.0));
        run(&mut state, EXTRACTION_TIME - 1.0, &idle());
        assert_eq!(state.phase, RaidPhase::InProgress);
        run(&mut state, 1.5, &idle());
        assert!(matches!(state.phase, RaidPhase::Extracted { .. }));
    }

    #[test]
    fn test_searched_loot_counts_at_extraction() {
        let mut state = open_raid();
        let container = state
            .map
            .add_container(Vec2::new(1020.0, 1000.0), ContainerType::Safe, 500);

        let interact = PlayerInput {
            interact: true,
            ..idle()
        };
        let first = state.step(DT, &interact);
        assert!(first
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::SearchStarted { container: c } if *c == container)));

        run(&mut state, SEARCH_TIME + 0.2, &idle());
        assert!(state.map.container(container).unwrap().is_searched());
        let loot = state.hud().unwrap().total_loot_value;
        assert!(loot > 0);

        teleport(&mut state, Vec2::new(1800.0, 1000.0));
        run(&mut state, EXTRACTION_TIME + 0.5, &idle());
        assert_eq!(state.phase, RaidPhase::Extracted { loot_value: loot });
    }

    #[test]
    fn test_raid_time_limit_loses() {
        let mut map = Map::new(2000.0, 2000.0);
        map.add_extraction_zone(Vec2::new(1800.0, 1000.0), EXTRACTION_ZONE_RADIUS);
        let config = GameConfig {
            raid_time_limit: 2.0,
            ..GameConfig::new(Difficulty::Normal, 1)
        };
        let mut state = GameState::with_map(config, map, Vec2::new(1000.0, 1000.0));

        run(&mut state, 2.5, &idle());
        assert_eq!(state.phase, RaidPhase::TimeExpired);

        // Frozen once over
        let tick = state.game_clock.tick;
        let report = state.step(DT, &idle());
        assert_eq!(report.tick, tick);
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_brute_kills_idle_player() {
        let mut state = open_raid();
        state.spawn_enemy(EnemyKind::Brute, Vec2::new(1100.0, 1000.0), vec![]);
        // Face the player so the first tick acquires
        for (_, enemy) in state.world.query_mut::<&mut Enemy>() {
            enemy.facing = std::f32::consts::PI;
        }

        run(&mut state, 30.0, &idle());
        assert_eq!(state.phase, RaidPhase::Killed);
        assert_eq!(state.hud().unwrap().health, 0.0);
    }

    #[test]
    fn test_player_kills_scav_and_loot_drops() {
        let mut state = open_raid();
        let scav = state.spawn_enemy(EnemyKind::Scav, Vec2::new(1150.0, 1000.0), vec![]);
        state.give_weapon(crate::weapon::Weapon::new(WeaponType::Sniper));
        let fire = PlayerInput {
            fire: true,
            aim_angle: 0.0,
            switch_weapon: Some(1),
            ..idle()
        };

        for _ in 0..40 {
            state.step(DT, &fire);
            if !state.world.contains(scav) {
                break;
            }
        }
        assert!(!state.world.contains(scav));
        assert_eq!(state.enemy_count(), 0);
        assert_eq!(state.map.ground_items().len(), 1);
    }

    #[test]
    fn test_enemy_spots_player_through_step() {
        let mut state = open_raid();
        let scav = state.spawn_enemy(EnemyKind::Scav, Vec2::new(1300.0, 1000.0), vec![]);
        state.world.get::<&mut Enemy>(scav).unwrap().facing = std::f32::consts::PI;

        let report = state.step(DT, &idle());
        assert_ne!(state.world.get::<&Enemy>(scav).unwrap().state(), AiState::Patrol);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::AiStateChanged { to: AiState::Chase, .. })));
    }

    #[test]
    fn test_seeded_raids_replay_identically() {
        let config = GameConfig::new(Difficulty::Hard, 99);
        let mut a = GameState::new(config.clone());
        let mut b = GameState::new(config);
        let input = PlayerInput {
            movement: Vec2::new(1.0, 0.3),
            fire: true,
            ..idle()
        };
        for _ in 0..100 {
            a.step(DT, &input);
            b.step(DT, &input);
        }
        assert_eq!(a.enemy_snapshots(), b.enemy_snapshots());
        assert_eq!(a.hud(), b.hud());
        assert_eq!(a.projectiles, b.projectiles);
    }

    #[test]
    fn test_generated_raid_spawns_difficulty_count() {
        let state = GameState::new(GameConfig::new(Difficulty::Easy, 5));
        let preset = Difficulty::Easy.preset();
        assert!(state.enemy_count() <= preset.spawn_max);
        assert!(state.enemy_count() >= 1);
        for snapshot in state.enemy_snapshots() {
            assert_eq!(snapshot.state, AiState::Patrol);
        }
    }
}
