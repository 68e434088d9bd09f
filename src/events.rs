//! Game event system for decoupled communication between systems.
//!
//! Systems push events while a tick runs; the host drains them afterwards
//! to drive HUD messages, sound cues or logs without the simulation knowing
//! about any of those.

use glam::Vec2;
use hecs::Entity;
use serde::Serialize;

use crate::components::Faction;
use crate::enemy::AiState;
use crate::loot::LootItem;
use crate::map::ContainerId;
use crate::weapon_defs::WeaponType;

/// Game events that systems can emit and hosts can subscribe to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// An enemy's AI state changed
    AiStateChanged {
        #[serde(skip)]
        entity: Entity,
        from: AiState,
        to: AiState,
    },
    /// A weapon fired one shot (possibly several pellets)
    ShotFired {
        faction: Faction,
        weapon: WeaponType,
        origin: Vec2,
        pellets: usize,
    },
    /// A reload started
    ReloadStarted { faction: Faction, weapon: WeaponType },
    /// A projectile hit a wall or left the map
    ProjectileBlocked { position: Vec2 },
    /// The player took damage
    PlayerDamaged { amount: f32, health: f32 },
    /// An enemy took damage
    EnemyDamaged {
        #[serde(skip)]
        entity: Entity,
        amount: f32,
        health: f32,
    },
    /// An enemy died and dropped loot at its position
    EnemyKilled {
        #[serde(skip)]
        entity: Entity,
        position: Vec2,
    },
    /// The player started searching a container
    SearchStarted { container: ContainerId },
    /// A search was abandoned before completion
    SearchCancelled { container: ContainerId },
    /// A container search finished and produced loot
    ContainerSearched { container: ContainerId, loot: LootItem },
    /// Loot went into the inventory
    LootAdded { item: LootItem },
    /// Loot displaced a cheaper item from a full inventory
    LootReplaced { item: LootItem, replaced: LootItem },
    /// Loot was not worth keeping in a full inventory
    LootDiscarded { item: LootItem },
    /// A weapon was picked up or rejected for lack of slots
    WeaponAcquired { weapon: WeaponType, accepted: bool },
    /// The player stepped into an extraction zone and the countdown began
    ExtractionStarted { zone: usize },
    /// The player left the zone before the countdown finished
    ExtractionCancelled { zone: usize },
    /// The player extracted successfully
    Extracted { loot_value: u32 },
    /// The player died
    PlayerKilled,
    /// The raid timer ran out
    RaidTimeExpired,
}

/// Simple event queue - events are pushed during update, processed at end of frame
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to be processed later
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}

impl Extend<GameEvent> for EventQueue {
    fn extend<T: IntoIterator<Item = GameEvent>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}
