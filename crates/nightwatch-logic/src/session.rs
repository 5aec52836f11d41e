//! Night session controller — fixed-timestep orchestration of power, doors,
//! and animatronics, plus the player/render-facing API.
//!
//! One external loop drives [`NightSession::tick`] once per frame. Per-tick
//! order is a contract: elapsed time, then power drain, then the depletion
//! side effect (all doors forced open, idempotently), then — unless the
//! session already ended — the night countdown and every animatronic in
//! declaration order. The first character found in `Jumpscare` inside the
//! player room loses the night and short-circuits the rest of the tick.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::animatronic::{Animatronic, StateKind, WorldView};
use crate::config::NightLayout;
use crate::map::{RoomGraph, RoomId};
use crate::power::{DoorBoard, PowerMeter};

/// Session outcome. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Won,
    Lost { who: String },
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Running)
    }
}

/// Read-only snapshot of one character for the render layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatronicView<'a> {
    pub name: &'a str,
    pub room: &'a str,
    pub position: (f32, f32),
    pub state: StateKind,
}

/// A running night. Owns all mutable simulation state; single-threaded.
pub struct NightSession {
    rooms: RoomGraph,
    doors: DoorBoard,
    power: PowerMeter,
    camera_active: bool,
    animatronics: Vec<Animatronic>,
    player_room: RoomId,
    hallway_room: RoomId,
    night_remaining: f32,
    elapsed: f32,
    rng: StdRng,
    status: SessionStatus,
}

impl NightSession {
    /// Start a night from a validated layout. The layout's seed makes the
    /// whole night replayable.
    pub fn new(layout: &NightLayout) -> Self {
        let mut rng = StdRng::seed_from_u64(layout.night.seed);
        let animatronics = layout
            .animatronics
            .iter()
            .map(|plan| {
                Animatronic::new(
                    plan.name.clone(),
                    plan.start_room,
                    plan.route.clone(),
                    plan.speed,
                    &layout.rooms,
                    &mut rng,
                )
            })
            .collect();
        Self {
            rooms: layout.rooms.clone(),
            doors: DoorBoard::new(layout.door_pairs.iter().copied()),
            power: PowerMeter::new(),
            camera_active: false,
            animatronics,
            player_room: layout.night.player_room,
            hallway_room: layout.night.hallway_room,
            night_remaining: layout.night.length,
            elapsed: 0.0,
            rng,
            status: SessionStatus::Running,
        }
    }

    /// Advance the simulation by `dt` seconds and return the session status.
    pub fn tick(&mut self, dt: f32) -> SessionStatus {
        self.elapsed += dt;

        // Power first — animatronic decisions this tick see current power.
        self.power.drain(dt, self.camera_active, self.doors.closed_count());
        if self.power.is_depleted() {
            self.doors.force_all_open();
        }

        if self.status.is_terminal() {
            return self.status.clone();
        }

        self.night_remaining -= dt;
        if self.night_remaining <= 0.0 {
            info!("[session] night survived after {:.1}s", self.elapsed);
            self.status = SessionStatus::Won;
            return self.status.clone();
        }

        let view = WorldView {
            rooms: &self.rooms,
            doors: &self.doors,
            power_depleted: self.power.is_depleted(),
            player_room: self.player_room,
            hallway_room: self.hallway_room,
        };
        for a in self.animatronics.iter_mut() {
            a.update(dt, &view, &mut self.rng);
            if a.state().kind() == StateKind::Jumpscare && a.room() == self.player_room {
                info!("[session] {} reached the player — night lost", a.name());
                self.status = SessionStatus::Lost {
                    who: a.name().to_string(),
                };
                break;
            }
        }

        self.status.clone()
    }

    // --- Player input hooks ---

    /// Toggle the door between two rooms, by name. Unknown names or a pair
    /// without a door are a no-op. Returns the closed state after the call.
    pub fn toggle_door(&mut self, room_a: &str, room_b: &str) -> bool {
        match (self.rooms.by_name(room_a), self.rooms.by_name(room_b)) {
            (Some(a), Some(b)) => self.doors.toggle(a, b),
            _ => false,
        }
    }

    /// Camera viewing only affects the power drain rate.
    pub fn set_camera_active(&mut self, active: bool) {
        self.camera_active = active;
    }

    // --- Read-only queries for the render layer ---

    pub fn status(&self) -> SessionStatus {
        self.status.clone()
    }

    pub fn power(&self) -> f32 {
        self.power.level()
    }

    pub fn camera_active(&self) -> bool {
        self.camera_active
    }

    pub fn is_door_closed(&self, room_a: &str, room_b: &str) -> bool {
        match (self.rooms.by_name(room_a), self.rooms.by_name(room_b)) {
            (Some(a), Some(b)) => self.doors.is_closed(a, b),
            _ => false,
        }
    }

    pub fn night_remaining(&self) -> f32 {
        self.night_remaining.max(0.0)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn rooms(&self) -> &RoomGraph {
        &self.rooms
    }

    pub fn animatronic(&self, name: &str) -> Option<AnimatronicView<'_>> {
        self.animatronics
            .iter()
            .find(|a| a.name() == name)
            .map(|a| self.view_of(a))
    }

    /// Views in stable declaration order.
    pub fn animatronics(&self) -> impl Iterator<Item = AnimatronicView<'_>> {
        self.animatronics.iter().map(|a| self.view_of(a))
    }

    fn view_of<'a>(&'a self, a: &'a Animatronic) -> AnimatronicView<'a> {
        AnimatronicView {
            name: a.name(),
            room: self.rooms.name(a.room()).unwrap_or(""),
            position: a.position(),
            state: a.state().kind(),
        }
    }
}
