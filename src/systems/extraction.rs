//! Extraction dwell timer.
//!
//! Standing inside an available extraction zone starts a countdown. Leaving
//! the zone cancels it; coming back starts over from the full time.

use glam::Vec2;
use serde::Serialize;

use crate::events::{EventQueue, GameEvent};
use crate::map::Map;
use crate::time_system::has_elapsed;

/// Result of one extraction tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ExtractionProgress {
    /// Not in a zone
    Idle,
    /// Counting down in `zone`
    Counting { zone: usize, remaining: f32 },
    /// The countdown finished this tick
    Complete { zone: usize },
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionTracker {
    active: Option<(usize, f32)>,
}

impl ExtractionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zone currently counting down, if any
    pub fn active_zone(&self) -> Option<usize> {
        self.active.map(|(zone, _)| zone)
    }

    /// Seconds left on the countdown at `now`
    pub fn remaining(&self, now: f32, extraction_time: f32) -> Option<f32> {
        self.active
            .map(|(_, started)| (extraction_time - (now - started)).max(0.0))
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Advance the countdown for a player standing at `position`.
    pub fn update(
        &mut self,
        map: &Map,
        position: Vec2,
        now: f32,
        extraction_time: f32,
        events: &mut EventQueue,
    ) -> ExtractionProgress {
        let zone = map.extraction_zone_at(position).map(|(index, _)| index);

        let started = match (self.active, zone) {
            (None, None) => return ExtractionProgress::Idle,
            (Some((old, _)), None) => {
                log::info!("Left extraction zone {}, countdown reset", old);
                events.push(GameEvent::ExtractionCancelled { zone: old });
                self.active = None;
                return ExtractionProgress::Idle;
            }
            (Some((old, started)), Some(new)) if old == new => started,
            (previous, Some(new)) => {
                // Stepping straight from one zone into another restarts
                if let Some((old, _)) = previous {
                    events.push(GameEvent::ExtractionCancelled { zone: old });
                }
                log::info!("Entered extraction zone {}", new);
                events.push(GameEvent::ExtractionStarted { zone: new });
                self.active = Some((new, now));
                now
            }
        };

        let (Some(zone), Some(remaining)) = (self.active_zone(), self.remaining(now, extraction_time))
        else {
            return ExtractionProgress::Idle;
        };
        if has_elapsed(now, started, extraction_time) {
            self.active = None;
            ExtractionProgress::Complete { zone }
        } else {
            ExtractionProgress::Counting { zone, remaining }
        }
    }
}
