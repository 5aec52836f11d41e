//! Pure simulation logic for Nightwatch, a night-shift survival game core.
//!
//! This crate contains the whole game simulation — facility map, doors and
//! power, animatronic AI, and the night session controller — with no engine,
//! rendering, or audio dependencies. A host loop (game client, headless
//! harness) drives [`session::NightSession::tick`] once per frame and reads
//! state back through plain queries, making every rule unit-testable.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`animatronic`] | Patrol/transition/attack state machine per character |
//! | [`config`] | Typed layout records, JSON parsing, fail-fast validation |
//! | [`constants`] | Tuning policy (drain rates, AI timing, aggression) |
//! | [`map`] | Immutable room graph, waypoints, cyclic patrol routes |
//! | [`power`] | Door board and depleting power meter |
//! | [`session`] | Fixed-timestep night controller and player/render API |
//!
//! # Determinism
//!
//! All randomness flows from one `StdRng` seeded by the layout's `seed`;
//! characters update in declaration order. Two sessions built from the same
//! layout replay tick-for-tick identically.

pub mod animatronic;
pub mod config;
pub mod constants;
pub mod map;
pub mod power;
pub mod session;

pub use animatronic::{AnimState, Animatronic, StateKind, WorldView};
pub use config::{LayoutError, LayoutSpec, NightLayout};
pub use map::{Room, RoomGraph, RoomId, RouteSpec};
pub use power::{DoorBoard, PowerMeter};
pub use session::{AnimatronicView, NightSession, SessionStatus};
