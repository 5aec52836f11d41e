//! Animatronic AI — per-character patrol / transition / attack state machine.
//!
//! Each character cycles through a fixed route of rooms. Inside a room it
//! drifts between local waypoints; when its randomized move timer expires it
//! tries to start a timed transition to the next room on the route, blocked
//! only by a closed door. The edge from the hallway into the player room is
//! the attack approach: once the timer fires and that door is open, the move
//! happens deterministically and arrival puts the character in `Attack`.
//! Three seconds of unopposed `Attack` ends in `Jumpscare`, which is terminal
//! for the character.
//!
//! Missing room data never panics: the character holds at the origin and
//! resets its waypoint index. Route/room desync self-heals by resynchronizing
//! the route cursor before each move decision.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::{
    AGGRESSION_CAP, AGGRESSION_FLOOR, AGGRESSION_RATE, AGGRESSION_START, ATTACK_DWELL_SECS,
    DECISION_DELAY_MAX, DECISION_DELAY_MIN, TRANSITION_SECS_MAX, TRANSITION_SECS_MIN,
    WAYPOINT_RADIUS,
};
use crate::map::{RoomGraph, RoomId, RouteSpec};
use crate::power::DoorBoard;

/// Behavioral state. Exactly one holds at a time; `Transitioning` carries the
/// in-flight move so a character can never patrol and transition at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimState {
    /// Waypoint-seeking motion inside the current room.
    Patrol,
    /// Mid-move between rooms; `progress` accumulates `dt / duration`.
    Transitioning {
        target: RoomId,
        progress: f32,
        duration: f32,
    },
    /// In the player room, counting down to the jumpscare.
    Attack { dwell: f32 },
    /// Terminal. The session ends when this is reached in the player room.
    Jumpscare,
}

impl AnimState {
    pub fn kind(&self) -> StateKind {
        match self {
            AnimState::Patrol => StateKind::Patrol,
            AnimState::Transitioning { .. } => StateKind::Transitioning,
            AnimState::Attack { .. } => StateKind::Attack,
            AnimState::Jumpscare => StateKind::Jumpscare,
        }
    }
}

/// Data-free view of [`AnimState`] for render/query consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Patrol,
    Transitioning,
    Attack,
    Jumpscare,
}

/// Everything an animatronic reads from the rest of the simulation while
/// deciding. Borrowed fresh each tick so door and power state are current.
#[derive(Clone, Copy)]
pub struct WorldView<'a> {
    pub rooms: &'a RoomGraph,
    pub doors: &'a DoorBoard,
    /// True once the power meter hit zero this tick.
    pub power_depleted: bool,
    pub player_room: RoomId,
    pub hallway_room: RoomId,
}

/// One hostile character. Pure simulation state — no render handles.
#[derive(Debug, Clone)]
pub struct Animatronic {
    name: String,
    current_room: RoomId,
    pos: (f32, f32),
    waypoint_index: usize,
    speed: f32,
    route: RouteSpec,
    route_cursor: usize,
    state: AnimState,
    aggression: f32,
    move_timer: f32,
}

impl Animatronic {
    /// Create a character at `start_room`. If the start room is not on the
    /// route, the character is placed at the route's first stop instead so
    /// the cursor can never start desynced.
    pub fn new(
        name: impl Into<String>,
        start_room: RoomId,
        route: RouteSpec,
        speed: f32,
        rooms: &RoomGraph,
        rng: &mut impl Rng,
    ) -> Self {
        let current_room = match route.position(start_room) {
            Some(_) => start_room,
            None => route.get(0).unwrap_or(start_room),
        };
        let route_cursor = route.position(current_room).unwrap_or(0);
        let pos = random_waypoint(rooms, current_room, rng);
        Self {
            name: name.into(),
            current_room,
            pos,
            waypoint_index: 0,
            speed,
            route,
            route_cursor,
            state: AnimState::Patrol,
            aggression: AGGRESSION_START,
            move_timer: rng.gen_range(DECISION_DELAY_MIN..DECISION_DELAY_MAX),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn room(&self) -> RoomId {
        self.current_room
    }

    pub fn position(&self) -> (f32, f32) {
        self.pos
    }

    pub fn state(&self) -> AnimState {
        self.state
    }

    pub fn aggression(&self) -> f32 {
        self.aggression
    }

    /// Advance the character by `dt` seconds.
    pub fn update(&mut self, dt: f32, world: &WorldView<'_>, rng: &mut impl Rng) {
        // Aggression ramps every tick regardless of state.
        self.aggression = (self.aggression + dt * AGGRESSION_RATE).min(AGGRESSION_CAP);

        match self.state {
            AnimState::Transitioning {
                target,
                progress,
                duration,
            } => {
                let progress = progress + dt / duration.max(0.01);
                if progress >= 1.0 {
                    self.arrive(target, world, rng);
                } else {
                    self.state = AnimState::Transitioning {
                        target,
                        progress,
                        duration,
                    };
                }
            }
            AnimState::Patrol => {
                self.move_timer -= dt;
                self.patrol(dt, world.rooms);
                if self.move_timer <= 0.0 {
                    self.try_advance(world, rng);
                    let div = self.aggression.max(AGGRESSION_FLOOR);
                    self.move_timer =
                        rng.gen_range(DECISION_DELAY_MIN / div..DECISION_DELAY_MAX / div);
                }
            }
            AnimState::Attack { dwell } => {
                let dwell = dwell + dt;
                if dwell > ATTACK_DWELL_SECS {
                    debug!("[ai] {} jumpscare", self.name);
                    self.state = AnimState::Jumpscare;
                } else {
                    self.state = AnimState::Attack { dwell };
                }
            }
            AnimState::Jumpscare => {}
        }
    }

    /// Waypoint-seeking drift inside the current room. Missing room data or
    /// an empty waypoint list parks the character at the origin.
    fn patrol(&mut self, dt: f32, rooms: &RoomGraph) {
        let waypoints = match rooms.room(self.current_room) {
            Some(room) if !room.waypoints.is_empty() => &room.waypoints,
            _ => {
                self.pos = (0.0, 0.0);
                self.waypoint_index = 0;
                return;
            }
        };

        if self.waypoint_index >= waypoints.len() {
            self.waypoint_index = 0;
        }
        let target = waypoints[self.waypoint_index];
        let dx = target.0 - self.pos.0;
        let dy = target.1 - self.pos.1;
        let dist = (dx * dx + dy * dy).sqrt();

        if dist < WAYPOINT_RADIUS {
            self.waypoint_index = (self.waypoint_index + 1) % waypoints.len();
            return;
        }

        self.pos.0 += dx / dist * self.speed * dt;
        self.pos.1 += dy / dist * self.speed * dt;
    }

    /// Move decision: resync the route cursor, then start a transition to the
    /// next route stop unless the connecting door is closed.
    fn try_advance(&mut self, world: &WorldView<'_>, rng: &mut impl Rng) {
        if self.route.is_empty() {
            return;
        }

        // Cursor resync — the actual room wins over the cursor's expectation.
        if self.route.get(self.route_cursor) != Some(self.current_room) {
            match self.route.position(self.current_room) {
                Some(index) => self.route_cursor = index,
                None => {
                    self.route_cursor = 0;
                    if let Some(start) = self.route.get(0) {
                        self.current_room = start;
                        self.pos = random_waypoint(world.rooms, start, rng);
                        self.waypoint_index = 0;
                    }
                }
            }
        }

        let next = match self.route.next_room(self.route_cursor) {
            Some(room) => room,
            None => return,
        };

        // Attack approach: the hallway → player-room edge. Deterministic once
        // the move timer fired; gated only by that door.
        if self.current_room == world.hallway_room && next == world.player_room {
            if world.doors.is_closed(world.hallway_room, world.player_room) {
                debug!("[ai] {} blocked at the player-room door", self.name);
            } else {
                debug!("[ai] {} approaching the player room", self.name);
                self.begin_transition(next, rng);
                self.route_cursor = self.route.next_index(self.route_cursor);
            }
            return;
        }

        if world.doors.is_closed(self.current_room, next) {
            debug!(
                "[ai] {} blocked between rooms {:?} and {:?}",
                self.name, self.current_room, next
            );
            return;
        }

        self.begin_transition(next, rng);
        self.route_cursor = self.route.next_index(self.route_cursor);
    }

    fn begin_transition(&mut self, target: RoomId, rng: &mut impl Rng) {
        let div = self.aggression.max(AGGRESSION_FLOOR);
        let duration = rng.gen_range(TRANSITION_SECS_MIN / div..TRANSITION_SECS_MAX / div);
        debug!(
            "[ai] {} moving {:?} -> {:?} over {:.2}s",
            self.name, self.current_room, target, duration
        );
        self.state = AnimState::Transitioning {
            target,
            progress: 0.0,
            duration,
        };
    }

    /// Complete a transition: land in the target room at a random waypoint,
    /// then attack if this is the player room and the door no longer protects
    /// it (open, or power is out).
    fn arrive(&mut self, room: RoomId, world: &WorldView<'_>, rng: &mut impl Rng) {
        self.current_room = room;
        self.pos = random_waypoint(world.rooms, room, rng);
        self.waypoint_index = 0;

        let door_protects = world.doors.is_closed(world.hallway_room, world.player_room)
            && !world.power_depleted;
        if room == world.player_room && !door_protects {
            debug!("[ai] {} entered the player room — attack", self.name);
            self.state = AnimState::Attack { dwell: 0.0 };
        } else {
            self.state = AnimState::Patrol;
        }
    }
}

/// Pick a random waypoint in `room`, or the origin if the room is unknown or
/// has no waypoints.
fn random_waypoint(rooms: &RoomGraph, room: RoomId, rng: &mut impl Rng) -> (f32, f32) {
    rooms
        .room(room)
        .and_then(|r| r.waypoints.choose(rng).copied())
        .unwrap_or((0.0, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Room;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const STAGE: RoomId = RoomId(0);
    const HALL: RoomId = RoomId(1);
    const OFFICE: RoomId = RoomId(2);

    fn rooms() -> RoomGraph {
        RoomGraph::new(vec![
            Room {
                name: "Stage".into(),
                waypoints: vec![(160.0, 30.0), (160.0, 210.0)],
                connections: vec![HALL],
            },
            Room {
                name: "Hall".into(),
                waypoints: vec![(50.0, 50.0), (250.0, 180.0)],
                connections: vec![STAGE, OFFICE],
            },
            Room {
                name: "Office".into(),
                waypoints: vec![(10.0, 10.0)],
                connections: vec![HALL],
            },
        ])
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn character(start: RoomId, rooms: &RoomGraph, rng: &mut StdRng) -> Animatronic {
        Animatronic::new(
            "Rainer",
            start,
            RouteSpec::new(vec![STAGE, HALL, OFFICE]),
            60.0,
            rooms,
            rng,
        )
    }

    fn world<'a>(
        rooms: &'a RoomGraph,
        doors: &'a DoorBoard,
        power_depleted: bool,
    ) -> WorldView<'a> {
        WorldView {
            rooms,
            doors,
            power_depleted,
            player_room: OFFICE,
            hallway_room: HALL,
        }
    }

    /// Tick until the timer has certainly fired at least once.
    fn run(a: &mut Animatronic, world: &WorldView<'_>, rng: &mut StdRng, secs: f32) {
        let steps = (secs / 0.1) as usize;
        for _ in 0..steps {
            a.update(0.1, world, rng);
        }
    }

    // --- Patrol motion ---

    #[test]
    fn patrol_advances_waypoints_cyclically() {
        let g = rooms();
        let doors = DoorBoard::new([]);
        let mut rng = rng();
        let mut a = character(STAGE, &g, &mut rng);
        let w = world(&g, &doors, false);

        let start = a.position();
        a.update(0.5, &w, &mut rng);
        assert_ne!(a.position(), start, "patrol should move the character");
        assert_eq!(a.state().kind(), StateKind::Patrol);
    }

    #[test]
    fn missing_waypoints_fall_back_to_origin() {
        let g = RoomGraph::new(vec![Room {
            name: "Void".into(),
            waypoints: vec![],
            connections: vec![],
        }]);
        let doors = DoorBoard::new([]);
        let mut rng = rng();
        let mut a = Animatronic::new(
            "Fliege",
            RoomId(0),
            RouteSpec::new(vec![RoomId(0)]),
            60.0,
            &g,
            &mut rng,
        );
        let w = WorldView {
            rooms: &g,
            doors: &doors,
            power_depleted: false,
            player_room: RoomId(0),
            hallway_room: RoomId(0),
        };
        a.update(1.0, &w, &mut rng);
        assert_eq!(a.position(), (0.0, 0.0));
    }

    // --- Aggression ---

    #[test]
    fn aggression_grows_and_caps() {
        let g = rooms();
        let doors = DoorBoard::new([(HALL, OFFICE)]);
        let mut rng = rng();
        let mut a = character(STAGE, &g, &mut rng);
        let w = world(&g, &doors, false);

        let before = a.aggression();
        a.update(1.0, &w, &mut rng);
        assert!(a.aggression() > before);

        run(&mut a, &w, &mut rng, 500.0);
        assert!(a.aggression() <= AGGRESSION_CAP + f32::EPSILON);
    }

    // --- Route following and desync repair ---

    #[test]
    fn desync_resyncs_cursor_to_actual_room() {
        let g = rooms();
        let mut doors = DoorBoard::new([(HALL, OFFICE)]);
        doors.toggle(HALL, OFFICE);
        let mut rng = rng();
        let mut a = character(STAGE, &g, &mut rng);
        let w = world(&g, &doors, false);

        // Forcibly place the character in Hall, cursor still expects Stage.
        a.current_room = HALL;
        a.try_advance(&w, &mut rng);

        // Cursor must have resynced to index 1 (Hall) before deciding; the
        // next stop is therefore Office, and that door is closed, so the
        // character stays put in Hall.
        assert_eq!(a.route_cursor, 1);
        assert_eq!(a.room(), HALL);
        assert_eq!(a.state().kind(), StateKind::Patrol);
    }

    #[test]
    fn off_route_room_resets_to_route_start() {
        let g = rooms();
        let doors = DoorBoard::new([]);
        let mut rng = rng();
        let mut a = Animatronic::new(
            "Rainer",
            STAGE,
            RouteSpec::new(vec![HALL, OFFICE]),
            60.0,
            &g,
            &mut rng,
        );
        // Construction already snaps a start room that is off the route.
        assert_eq!(a.room(), HALL);
        assert_eq!(a.route_cursor, 0);

        // Drift off the route mid-session; the next decision relocates to the
        // route start and decides from there (no door, so a move begins).
        a.current_room = STAGE;
        let w = world(&g, &doors, false);
        a.try_advance(&w, &mut rng);
        assert_eq!(a.room(), HALL);
        assert_eq!(a.state().kind(), StateKind::Transitioning);
    }

    // --- Door blocking and the attack approach ---

    #[test]
    fn closed_player_door_blocks_attack_indefinitely() {
        let g = rooms();
        let mut doors = DoorBoard::new([(HALL, OFFICE)]);
        doors.toggle(HALL, OFFICE);
        let mut rng = rng();
        let mut a = character(HALL, &g, &mut rng);
        let w = world(&g, &doors, false);

        run(&mut a, &w, &mut rng, 120.0);
        assert_eq!(a.room(), HALL, "must stay behind the closed door");
        assert!(matches!(a.state().kind(), StateKind::Patrol));
    }

    #[test]
    fn open_player_door_leads_to_attack_then_jumpscare() {
        let g = rooms();
        let doors = DoorBoard::new([(HALL, OFFICE)]);
        let mut rng = rng();
        let mut a = character(HALL, &g, &mut rng);
        let w = world(&g, &doors, false);

        // Timer (≤10s) + transition (≤6s) + dwell (3s) fits well inside 30s.
        let mut saw_attack = false;
        for _ in 0..300 {
            a.update(0.1, &w, &mut rng);
            if a.state().kind() == StateKind::Attack {
                saw_attack = true;
            }
            if a.state().kind() == StateKind::Jumpscare {
                break;
            }
        }
        assert!(saw_attack, "arrival in the player room must enter Attack");
        assert_eq!(a.state().kind(), StateKind::Jumpscare);
        assert_eq!(a.room(), OFFICE);
    }

    #[test]
    fn arrival_with_power_out_attacks_through_closed_door() {
        let g = rooms();
        let mut doors = DoorBoard::new([(HALL, OFFICE)]);
        let mut rng = rng();
        let mut a = character(HALL, &g, &mut rng);

        // Door open at decision time, then closed mid-transition; with power
        // depleted the closed door no longer protects on arrival.
        let w_open = world(&g, &doors, false);
        loop {
            a.update(0.1, &w_open, &mut rng);
            if a.state().kind() == StateKind::Transitioning {
                break;
            }
        }
        doors.toggle(HALL, OFFICE);
        let w_dark = world(&g, &doors, true);
        run(&mut a, &w_dark, &mut rng, 60.0);
        assert_eq!(a.state().kind(), StateKind::Jumpscare);
    }

    #[test]
    fn transition_blocks_new_decisions_until_arrival() {
        let g = rooms();
        let doors = DoorBoard::new([(HALL, OFFICE)]);
        let mut rng = rng();
        let mut a = character(STAGE, &g, &mut rng);
        let w = world(&g, &doors, false);

        // Drive into a transition, then confirm state stays Transitioning
        // until progress completes (no double-move).
        loop {
            a.update(0.1, &w, &mut rng);
            if let AnimState::Transitioning { target, .. } = a.state() {
                assert_eq!(target, HALL);
                break;
            }
        }
        let from = a.room();
        a.update(0.01, &w, &mut rng);
        assert_eq!(a.room(), from, "room only changes on arrival");
    }

    // --- Jumpscare is terminal ---

    #[test]
    fn jumpscare_state_is_absorbing() {
        let g = rooms();
        let doors = DoorBoard::new([(HALL, OFFICE)]);
        let mut rng = rng();
        let mut a = character(HALL, &g, &mut rng);
        let w = world(&g, &doors, false);

        run(&mut a, &w, &mut rng, 60.0);
        assert_eq!(a.state().kind(), StateKind::Jumpscare);
        let room = a.room();
        run(&mut a, &w, &mut rng, 30.0);
        assert_eq!(a.state().kind(), StateKind::Jumpscare);
        assert_eq!(a.room(), room);
    }
}
