//! Door board and power meter.
//!
//! Doors are keyed by an unordered pair of connected rooms; a pair with no
//! door is implicitly open and never blocks movement. The power meter only
//! goes down during a session — the drain rate is idle + camera surcharge +
//! a surcharge per closed door. Depletion itself is not an error: the
//! session controller reacts by forcing every door open.

use std::collections::HashMap;

use crate::constants::{MAX_POWER, POWER_DRAIN_CAMERA, POWER_DRAIN_DOOR, POWER_DRAIN_IDLE};
use crate::map::RoomId;

/// Closed/open state for every door in the facility.
#[derive(Debug, Clone, Default)]
pub struct DoorBoard {
    /// Keyed by normalized (low, high) room pair.
    doors: HashMap<(RoomId, RoomId), bool>,
}

fn pair_key(a: RoomId, b: RoomId) -> (RoomId, RoomId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl DoorBoard {
    /// Create a board with every listed door open.
    pub fn new(pairs: impl IntoIterator<Item = (RoomId, RoomId)>) -> Self {
        let doors = pairs
            .into_iter()
            .map(|(a, b)| (pair_key(a, b), false))
            .collect();
        Self { doors }
    }

    /// Order-independent closed check. Pairs without a door are open.
    pub fn is_closed(&self, a: RoomId, b: RoomId) -> bool {
        self.doors.get(&pair_key(a, b)).copied().unwrap_or(false)
    }

    /// Flip the door between `a` and `b` if one exists; no-op otherwise.
    /// Returns the closed state after the call.
    pub fn toggle(&mut self, a: RoomId, b: RoomId) -> bool {
        match self.doors.get_mut(&pair_key(a, b)) {
            Some(closed) => {
                *closed = !*closed;
                *closed
            }
            None => false,
        }
    }

    pub fn closed_count(&self) -> usize {
        self.doors.values().filter(|&&closed| closed).count()
    }

    /// Open every door. Idempotent — opening an open door is a no-op, so the
    /// session can apply this each tick while power is depleted.
    pub fn force_all_open(&mut self) {
        for closed in self.doors.values_mut() {
            *closed = false;
        }
    }

    pub fn door_count(&self) -> usize {
        self.doors.len()
    }
}

/// Depletable power reserve, always within `[0, MAX_POWER]`.
#[derive(Debug, Clone)]
pub struct PowerMeter {
    level: f32,
}

impl Default for PowerMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerMeter {
    pub fn new() -> Self {
        Self { level: MAX_POWER }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_depleted(&self) -> bool {
        self.level <= 0.0
    }

    /// Current total drain rate per second for the given load.
    pub fn drain_rate(camera_active: bool, closed_doors: usize) -> f32 {
        let mut rate = POWER_DRAIN_IDLE;
        if camera_active {
            rate += POWER_DRAIN_CAMERA;
        }
        rate + POWER_DRAIN_DOOR * closed_doors as f32
    }

    /// Drain for `dt` seconds under the given load; clamps at zero.
    /// Returns the new level.
    pub fn drain(&mut self, dt: f32, camera_active: bool, closed_doors: usize) -> f32 {
        let rate = Self::drain_rate(camera_active, closed_doors);
        self.level = (self.level - rate * dt).max(0.0);
        self.level
    }
}
