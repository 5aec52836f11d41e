//! Static facility map — rooms, waypoints, connectivity, patrol routes.
//!
//! Rooms are interned into a dense table at load time (see [`crate::config`]);
//! everything downstream works with `RoomId` indices instead of string keys.
//! The graph is immutable once built.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Index into the interned room table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

/// A single room: display name, local patrol waypoints, adjacent rooms.
#[derive(Debug, Clone)]
pub struct Room {
    pub name: String,
    /// 2D points local to the room, used for idle patrol motion.
    pub waypoints: Vec<(f32, f32)>,
    pub connections: Vec<RoomId>,
}

/// The immutable facility graph.
#[derive(Debug, Clone)]
pub struct RoomGraph {
    rooms: Vec<Room>,
    by_name: HashMap<String, RoomId>,
}

impl RoomGraph {
    /// Build a graph from an already-interned room table.
    pub(crate) fn new(rooms: Vec<Room>) -> Self {
        let by_name = rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), RoomId(i as u32)))
            .collect();
        Self { rooms, by_name }
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.0 as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<RoomId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: RoomId) -> Option<&str> {
        self.room(id).map(|r| r.name.as_str())
    }

    pub fn are_connected(&self, a: RoomId, b: RoomId) -> bool {
        self.room(a)
            .map(|r| r.connections.contains(&b))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoomId, &Room)> {
        self.rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (RoomId(i as u32), r))
    }
}

/// An ordered, cyclic sequence of rooms a character attempts to traverse.
/// Wraps to the start after the last entry.
#[derive(Debug, Clone)]
pub struct RouteSpec {
    rooms: Vec<RoomId>,
}

impl RouteSpec {
    pub fn new(rooms: Vec<RoomId>) -> Self {
        Self { rooms }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<RoomId> {
        self.rooms.get(index).copied()
    }

    /// Position of `room` on the route, if present.
    pub fn position(&self, room: RoomId) -> Option<usize> {
        self.rooms.iter().position(|&r| r == room)
    }

    /// Index following `index`, wrapping to the start of the cycle.
    pub fn next_index(&self, index: usize) -> usize {
        if self.rooms.is_empty() {
            0
        } else {
            (index + 1) % self.rooms.len()
        }
    }

    /// Room following the entry at `index`, wrapping to the start.
    pub fn next_room(&self, index: usize) -> Option<RoomId> {
        self.get(self.next_index(index))
    }
}
