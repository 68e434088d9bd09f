//! Headless raid runner.
//!
//! Plays one seeded raid with a scripted player: loot a few containers,
//! shoot back at anything hunting it, then walk to the nearest open
//! extraction zone. Prints the raid summary as JSON.
//!
//! Usage: `arena-breakout [difficulty] [seed] [-v] [--profile]`

use std::collections::HashSet;

use clap::Parser;
use glam::Vec2;

use arena_breakout::constants::*;
use arena_breakout::enemy::AiState;
use arena_breakout::map::ContainerId;
use arena_breakout::pathfinding;
use arena_breakout::vector;
use arena_breakout::{Difficulty, GameConfig, GameEvent, GameState, PlayerInput};

/// Headless raid runner for the extraction shooter simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Difficulty preset: easy, normal, hard or extreme
    #[arg(default_value_t = Difficulty::Normal)]
    difficulty: Difficulty,

    /// Seed for the raid RNG
    #[arg(default_value_t = 0)]
    seed: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Record puffin profiler scopes
    #[arg(long)]
    profile: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    arena_breakout::logging::init(args.verbose);
    puffin::set_scopes_on(args.profile);

    let mut state = GameState::new(GameConfig::new(args.difficulty, args.seed));
    let mut runner = Runner::default();

    while !state.phase.is_over() {
        puffin::GlobalProfiler::lock().new_frame();

        let input = runner.decide(&state);
        let report = state.step(FIXED_TIMESTEP, &input);
        for event in &report.events {
            runner.observe(event);
        }
    }

    println!("{}", serde_json::to_string_pretty(&state.summary())?);
    Ok(())
}

// =============================================================================
// SCRIPTED PLAYER
// =============================================================================

/// What the scripted player is walking toward.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Goal {
    Container(ContainerId, Vec2),
    Extraction(Vec2),
}

impl Goal {
    fn position(self) -> Vec2 {
        match self {
            Goal::Container(_, p) | Goal::Extraction(p) => p,
        }
    }
}

#[derive(Debug, Default)]
struct Runner {
    /// Containers already searched or given up on
    visited: HashSet<ContainerId>,
    searching: Option<ContainerId>,
    route: Vec<Vec2>,
    routed_at: Option<f32>,
    routed_goal: Option<Goal>,
}

impl Runner {
    fn observe(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ContainerSearched { container, .. } => {
                self.visited.insert(*container);
                self.searching = None;
            }
            GameEvent::SearchCancelled { container } => {
                // Don't keep walking back into the same interruption
                self.visited.insert(*container);
                self.searching = None;
            }
            GameEvent::SearchStarted { container } => self.searching = Some(*container),
            _ => {}
        }
    }

    fn decide(&mut self, state: &GameState) -> PlayerInput {
        let mut input = PlayerInput::default();
        let Some(position) = state.player_position() else {
            return input;
        };
        let now = state.game_clock.time;

        if let Some(threat) = nearest_threat(state, position) {
            input.fire = true;
            input.aim_angle = vector::heading(threat - position);
        } else if state
            .hud()
            .is_some_and(|hud| hud.current_ammo == 0 && !hud.reloading && hud.total_ammo > 0)
        {
            input.reload = true;
        }

        if self.searching.is_some() {
            // Standing still keeps the search going
            return input;
        }

        let Some(goal) = self.choose_goal(state, position) else {
            return input;
        };

        if let Goal::Container(id, target) = goal {
            if position.distance(target) <= SEARCH_RANGE * 0.8 {
                input.interact = true;
                self.visited.insert(id);
                return input;
            }
        }
        if let Goal::Extraction(target) = goal {
            if position.distance(target) <= EXTRACTION_ZONE_RADIUS * 0.5 {
                return input;
            }
        }

        input.movement = self.steer(state, position, goal, now);
        input
    }

    fn choose_goal(&self, state: &GameState, position: Vec2) -> Option<Goal> {
        let searched = self.visited.len();
        if searched < RUNNER_CONTAINER_QUOTA {
            let container = state
                .map
                .containers()
                .iter()
                .filter(|c| c.is_available() && !self.visited.contains(&c.id))
                .min_by(|a, b| {
                    let da = a.position.distance_squared(position);
                    let db = b.position.distance_squared(position);
                    da.total_cmp(&db)
                });
            if let Some(c) = container {
                return Some(Goal::Container(c.id, c.position));
            }
        }

        state
            .map
            .extraction_zones()
            .iter()
            .filter(|z| z.available)
            .min_by(|a, b| {
                let da = a.position.distance_squared(position);
                let db = b.position.distance_squared(position);
                da.total_cmp(&db)
            })
            .map(|z| Goal::Extraction(z.position))
    }

    /// Unit movement along a refreshed route to `goal`.
    fn steer(&mut self, state: &GameState, position: Vec2, goal: Goal, now: f32) -> Vec2 {
        let stale = self.routed_goal != Some(goal)
            || self
                .routed_at
                .map_or(true, |t| now - t >= RUNNER_REPATH_INTERVAL);
        if stale {
            self.route = pathfinding::find_path(&state.map, position, goal.position(), PLAYER_RADIUS)
                .into_waypoints()
                .unwrap_or_default();
            self.routed_at = Some(now);
            self.routed_goal = Some(goal);
        }

        while self
            .route
            .first()
            .is_some_and(|p| p.distance(position) <= PATH_STRIDE * 0.5)
        {
            self.route.remove(0);
        }

        let next = self.route.first().copied().unwrap_or(goal.position());
        vector::normalize(next - position)
    }
}

/// Position of the closest enemy actively hunting the player within
/// weapon reach.
fn nearest_threat(state: &GameState, position: Vec2) -> Option<Vec2> {
    state
        .enemy_snapshots()
        .into_iter()
        .filter(|e| matches!(e.state, AiState::Chase | AiState::Attack))
        .map(|e| e.position)
        .filter(|p| p.distance(position) <= ENEMY_VISION_RANGE)
        .min_by(|a, b| a.distance_squared(position).total_cmp(&b.distance_squared(position)))
}
