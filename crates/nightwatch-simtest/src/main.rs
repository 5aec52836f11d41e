//! Nightwatch Headless Night Harness
//!
//! Validates the bundled facility layout and plays scripted nights against
//! the simulation core. Runs entirely in-process — no rendering, no audio,
//! no window.
//!
//! Usage:
//!   cargo run -p nightwatch-simtest
//!   cargo run -p nightwatch-simtest -- --verbose

use nightwatch_logic::config::{AnimatronicSpec, DoorSpec, NightSpec, RoomSpec};
use nightwatch_logic::constants::{
    MAX_POWER, POWER_DRAIN_CAMERA, POWER_DRAIN_DOOR, POWER_DRAIN_IDLE,
};
use nightwatch_logic::power::PowerMeter;
use nightwatch_logic::{LayoutSpec, NightLayout, NightSession, SessionStatus, StateKind};

// ── Facility layout (same JSON a game client would ship) ────────────────
const LAYOUT_JSON: &str = include_str!("../../../data/night_layout.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed,
        detail: detail.into(),
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Nightwatch Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Bundled layout validation
    let layout = validate_layout(&mut results);

    // 2. Power drain policy
    results.extend(validate_power_policy());

    // 3. Scripted two-room nights (deterministic win/loss)
    results.extend(validate_scripted_nights());

    // 4. Bundled night playthroughs
    if let Some(layout) = &layout {
        results.extend(play_unmanaged_night(layout, verbose));
        results.extend(play_guarded_night(layout, verbose));
        results.extend(validate_determinism(layout));
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Layout validation ────────────────────────────────────────────────

fn validate_layout(results: &mut Vec<TestResult>) -> Option<NightLayout> {
    println!("--- Bundled Layout ---");

    let spec = match LayoutSpec::from_json(LAYOUT_JSON) {
        Ok(s) => s,
        Err(e) => {
            results.push(check("layout_parse", false, format!("JSON parse error: {e}")));
            return None;
        }
    };
    results.push(check(
        "layout_parse",
        true,
        format!("{} rooms, {} doors", spec.rooms.len(), spec.doors.len()),
    ));

    let layout = match spec.build() {
        Ok(l) => l,
        Err(e) => {
            results.push(check("layout_build", false, format!("{e}")));
            return None;
        }
    };
    results.push(check(
        "layout_build",
        true,
        format!(
            "{} rooms interned, {} animatronics",
            layout.rooms.len(),
            layout.animatronics.len()
        ),
    ));

    results.push(check(
        "player_room_resolved",
        layout.rooms.name(layout.night.player_room) == Some("Office"),
        "night.player_room is Office",
    ));

    // Every route stop must be a real room (build guarantees it; spot-check).
    let all_stops_valid = layout.animatronics.iter().all(|plan| {
        (0..plan.route.len()).all(|i| {
            plan.route
                .get(i)
                .and_then(|id| layout.rooms.room(id))
                .is_some()
        })
    });
    results.push(check("routes_resolve", all_stops_valid, "all route stops intern"));

    // A corrupted layout must be rejected.
    let mut broken = spec.clone();
    broken.animatronics[0].route.push("Basement".into());
    results.push(check(
        "broken_layout_rejected",
        broken.build().is_err(),
        "unknown route stop fails fast",
    ));

    Some(layout)
}

// ── 2. Power drain policy ───────────────────────────────────────────────

fn validate_power_policy() -> Vec<TestResult> {
    println!("--- Power Policy ---");
    let mut results = Vec::new();

    let idle = PowerMeter::drain_rate(false, 0);
    let camera = PowerMeter::drain_rate(true, 0);
    let one_door = PowerMeter::drain_rate(false, 1);
    let both = PowerMeter::drain_rate(true, 2);

    results.push(check(
        "idle_is_slowest",
        idle < camera && idle < one_door && idle < both,
        format!("idle {idle:.2}/s, camera {camera:.2}/s, door {one_door:.2}/s"),
    ));
    results.push(check(
        "doors_stack",
        PowerMeter::drain_rate(false, 2) > one_door,
        "each closed door adds drain",
    ));
    results.push(check(
        "constants_positive",
        POWER_DRAIN_IDLE > 0.0 && POWER_DRAIN_CAMERA > 0.0 && POWER_DRAIN_DOOR > 0.0,
        "all rates positive",
    ));

    let mut meter = PowerMeter::new();
    let mut bounded = meter.level() == MAX_POWER;
    for _ in 0..500 {
        let level = meter.drain(1.0, true, 3);
        bounded &= (0.0..=MAX_POWER).contains(&level);
    }
    results.push(check(
        "level_clamped",
        bounded && meter.is_depleted(),
        "level stays in [0, 100] and bottoms out at 0",
    ));

    results
}

// ── 3. Scripted two-room nights ─────────────────────────────────────────

fn two_room_layout(seed: u64) -> NightLayout {
    LayoutSpec {
        rooms: vec![
            RoomSpec {
                name: "A".into(),
                waypoints: vec![(10.0, 10.0), (90.0, 90.0)],
                connections: vec!["B".into()],
            },
            RoomSpec {
                name: "B".into(),
                waypoints: vec![(50.0, 50.0)],
                connections: vec!["A".into()],
            },
        ],
        doors: vec![DoorSpec {
            room_a: "A".into(),
            room_b: "B".into(),
        }],
        animatronics: vec![AnimatronicSpec {
            name: "Prowler".into(),
            start_room: "A".into(),
            route: vec!["A".into(), "B".into()],
            speed: None,
        }],
        night: NightSpec {
            length: 60.0,
            player_room: "B".into(),
            hallway_room: "A".into(),
            seed,
        },
    }
    .build()
    .expect("synthetic layout must validate")
}

fn validate_scripted_nights() -> Vec<TestResult> {
    println!("--- Scripted Nights ---");
    let mut results = Vec::new();

    // Door open all night: the prowler must reach the player before the
    // 60s timer (timer ≤ 10s, transition ≤ 6s, dwell 3s).
    let mut session = NightSession::new(&two_room_layout(11));
    let mut outcome = SessionStatus::Running;
    let mut ticks = 0;
    for _ in 0..60 {
        ticks += 1;
        outcome = session.tick(1.0);
        if outcome.is_terminal() {
            break;
        }
    }
    results.push(check(
        "open_door_night_lost",
        matches!(outcome, SessionStatus::Lost { .. }),
        format!("lost at tick {ticks}"),
    ));

    // Same night, door held closed: power lasts the hour and the prowler
    // never gets in.
    let mut session = NightSession::new(&two_room_layout(11));
    session.toggle_door("A", "B");
    let mut outcome = SessionStatus::Running;
    let mut office_breached = false;
    for _ in 0..60 {
        outcome = session.tick(1.0);
        if let Some(view) = session.animatronic("Prowler") {
            office_breached |= view.room == "B";
        }
        if outcome.is_terminal() {
            break;
        }
    }
    results.push(check(
        "closed_door_night_won",
        outcome == SessionStatus::Won && !office_breached,
        format!("power left {:.1}", session.power()),
    ));

    results
}

// ── 4. Bundled night playthroughs ───────────────────────────────────────

const TICK: f32 = 1.0 / 30.0;

fn play_unmanaged_night(layout: &NightLayout, verbose: bool) -> Vec<TestResult> {
    println!("--- Unmanaged Night ---");
    let mut results = Vec::new();

    // Nobody touches the doors: some character always reaches the office
    // well before the 90s timer.
    let mut session = NightSession::new(layout);
    let mut outcome = SessionStatus::Running;
    let mut power_ok = true;
    while !outcome.is_terminal() {
        outcome = session.tick(TICK);
        power_ok &= (0.0..=MAX_POWER).contains(&session.power());
        if verbose {
            if let SessionStatus::Lost { who } = &outcome {
                println!("  [night] {} attacked at {:.1}s", who, session.elapsed());
            }
        }
    }
    results.push(check(
        "unmanaged_night_lost",
        matches!(outcome, SessionStatus::Lost { .. }),
        format!("ended {:?} at {:.1}s", outcome, session.elapsed()),
    ));
    results.push(check("power_bounded", power_ok, "power stayed in [0, 100]"));

    results
}

fn play_guarded_night(layout: &NightLayout, verbose: bool) -> Vec<TestResult> {
    println!("--- Guarded Night ---");
    let mut results = Vec::new();

    // Hold the office door closed the whole night, re-closing it whenever a
    // blackout forces it open. While the door is actually closed, nobody may
    // be inside the office.
    let mut session = NightSession::new(layout);
    let mut outcome = SessionStatus::Running;
    let mut violated = false;
    while !outcome.is_terminal() {
        if !session.is_door_closed("HallCorner", "Office") {
            session.toggle_door("HallCorner", "Office");
        }
        outcome = session.tick(TICK);
        if session.is_door_closed("HallCorner", "Office") && session.power() > 0.0 {
            let breach = session
                .animatronics()
                .any(|v| v.room == "Office" && v.state != StateKind::Jumpscare);
            violated |= breach;
        }
    }
    if verbose {
        println!(
            "  [night] guarded run ended {:?} at {:.1}s, power {:.1}",
            outcome,
            session.elapsed(),
            session.power()
        );
    }
    results.push(check(
        "closed_door_never_breached",
        !violated,
        "office stayed empty while the door held",
    ));
    results.push(check(
        "guarded_night_terminates",
        outcome.is_terminal(),
        format!("ended {outcome:?}"),
    ));

    results
}

fn validate_determinism(layout: &NightLayout) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    let mut a = NightSession::new(layout);
    let mut b = NightSession::new(layout);
    let mut identical = true;
    for _ in 0..(90.0 / TICK) as usize {
        let sa = a.tick(TICK);
        let sb = b.tick(TICK);
        identical &= sa == sb;
        let va: Vec<_> = a.animatronics().map(|v| (v.room.to_string(), v.state)).collect();
        let vb: Vec<_> = b.animatronics().map(|v| (v.room.to_string(), v.state)).collect();
        identical &= va == vb;
        if sa.is_terminal() && sb.is_terminal() {
            break;
        }
    }
    results.push(check(
        "same_seed_same_night",
        identical,
        "two sessions from one layout replay identically",
    ));

    results
}
