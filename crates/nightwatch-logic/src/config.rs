//! Typed facility layout records and fail-fast validation.
//!
//! The layout JSON (rooms, doors, animatronics, night parameters) is parsed
//! into explicit serde records, then interned into a [`NightLayout`] with
//! every room reference resolved to a [`RoomId`]. Unknown names, duplicate
//! rooms, and doors between unconnected rooms are rejected at build time —
//! the simulation core itself never validates and never fails.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{NIGHT_LENGTH_SECS, PATROL_SPEED};
use crate::map::{Room, RoomGraph, RoomId, RouteSpec};

/// Top-level layout file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub rooms: Vec<RoomSpec>,
    #[serde(default)]
    pub doors: Vec<DoorSpec>,
    pub animatronics: Vec<AnimatronicSpec>,
    pub night: NightSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSpec {
    pub name: String,
    #[serde(default)]
    pub waypoints: Vec<(f32, f32)>,
    #[serde(default)]
    pub connections: Vec<String>,
}

/// A door between two connected rooms. Order of the pair is irrelevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorSpec {
    pub room_a: String,
    pub room_b: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimatronicSpec {
    pub name: String,
    pub start_room: String,
    pub route: Vec<String>,
    /// Optional per-character patrol speed override.
    #[serde(default)]
    pub speed: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightSpec {
    /// Night length in seconds.
    #[serde(default = "default_night_length")]
    pub length: f32,
    /// Room the player occupies; a character jumpscaring here loses the night.
    pub player_room: String,
    /// Room guarding the entrance to the player room; the edge from here
    /// into the player room is the attack approach.
    pub hallway_room: String,
    /// RNG seed — identical seeds replay identical nights.
    #[serde(default)]
    pub seed: u64,
}

fn default_night_length() -> f32 {
    NIGHT_LENGTH_SECS
}

/// Why a layout was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    NoRooms,
    DuplicateRoom { name: String },
    /// A name reference that does not match any room. `context` says where
    /// the reference appeared (connection list, door, route, ...).
    UnknownRoom { context: String, name: String },
    DoorWithoutConnection { room_a: String, room_b: String },
    EmptyRoute { animatronic: String },
    NoAnimatronics,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::NoRooms => write!(f, "layout defines no rooms"),
            LayoutError::DuplicateRoom { name } => {
                write!(f, "room {name:?} is defined more than once")
            }
            LayoutError::UnknownRoom { context, name } => {
                write!(f, "{context} references unknown room {name:?}")
            }
            LayoutError::DoorWithoutConnection { room_a, room_b } => {
                write!(f, "door between {room_a:?} and {room_b:?} spans unconnected rooms")
            }
            LayoutError::EmptyRoute { animatronic } => {
                write!(f, "animatronic {animatronic:?} has an empty route")
            }
            LayoutError::NoAnimatronics => write!(f, "layout defines no animatronics"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// A fully validated, interned layout — everything a session needs to start.
#[derive(Debug, Clone)]
pub struct NightLayout {
    pub rooms: RoomGraph,
    pub door_pairs: Vec<(RoomId, RoomId)>,
    pub animatronics: Vec<AnimatronicPlan>,
    pub night: NightPlan,
}

/// One character, resolved against the room table.
#[derive(Debug, Clone)]
pub struct AnimatronicPlan {
    pub name: String,
    pub start_room: RoomId,
    pub route: RouteSpec,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct NightPlan {
    pub length: f32,
    pub player_room: RoomId,
    pub hallway_room: RoomId,
    pub seed: u64,
}

impl LayoutSpec {
    /// Parse a layout from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Validate and intern the layout. Fails on the first problem found.
    pub fn build(&self) -> Result<NightLayout, LayoutError> {
        if self.rooms.is_empty() {
            return Err(LayoutError::NoRooms);
        }
        if self.animatronics.is_empty() {
            return Err(LayoutError::NoAnimatronics);
        }

        // Intern room names first so forward references resolve.
        let mut names: Vec<&str> = Vec::with_capacity(self.rooms.len());
        for spec in &self.rooms {
            if names.contains(&spec.name.as_str()) {
                return Err(LayoutError::DuplicateRoom {
                    name: spec.name.clone(),
                });
            }
            names.push(&spec.name);
        }
        let resolve = |context: &str, name: &str| -> Result<RoomId, LayoutError> {
            names
                .iter()
                .position(|&n| n == name)
                .map(|i| RoomId(i as u32))
                .ok_or_else(|| LayoutError::UnknownRoom {
                    context: context.to_string(),
                    name: name.to_string(),
                })
        };

        let mut rooms = Vec::with_capacity(self.rooms.len());
        for spec in &self.rooms {
            let mut connections = Vec::with_capacity(spec.connections.len());
            for other in &spec.connections {
                let context = format!("connection list of room {:?}", spec.name);
                connections.push(resolve(&context, other)?);
            }
            rooms.push(Room {
                name: spec.name.clone(),
                waypoints: spec.waypoints.clone(),
                connections,
            });
        }
        let graph = RoomGraph::new(rooms);

        let mut door_pairs = Vec::with_capacity(self.doors.len());
        for door in &self.doors {
            let a = resolve("door", &door.room_a)?;
            let b = resolve("door", &door.room_b)?;
            if !graph.are_connected(a, b) && !graph.are_connected(b, a) {
                return Err(LayoutError::DoorWithoutConnection {
                    room_a: door.room_a.clone(),
                    room_b: door.room_b.clone(),
                });
            }
            door_pairs.push((a, b));
        }

        let mut animatronics = Vec::with_capacity(self.animatronics.len());
        for spec in &self.animatronics {
            if spec.route.is_empty() {
                return Err(LayoutError::EmptyRoute {
                    animatronic: spec.name.clone(),
                });
            }
            let context = format!("animatronic {:?}", spec.name);
            let start_room = resolve(&context, &spec.start_room)?;
            let mut route = Vec::with_capacity(spec.route.len());
            for stop in &spec.route {
                route.push(resolve(&context, stop)?);
            }
            animatronics.push(AnimatronicPlan {
                name: spec.name.clone(),
                start_room,
                route: RouteSpec::new(route),
                speed: spec.speed.unwrap_or(PATROL_SPEED),
            });
        }

        let night = NightPlan {
            length: self.night.length,
            player_room: resolve("night.player_room", &self.night.player_room)?,
            hallway_room: resolve("night.hallway_room", &self.night.hallway_room)?,
            seed: self.night.seed,
        };

        Ok(NightLayout {
            rooms: graph,
            door_pairs,
            animatronics,
            night,
        })
    }
}
