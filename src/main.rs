//! Driftfield headless demo
//!
//! Runs the simulation in real time without a renderer: a scripted pilot
//! spins and fires while the fixed-timestep clock drives the tick loop.
//! Useful for smoke-testing determinism and watching the log output.

use std::path::Path;
use std::time::{Duration, Instant};

use driftfield::consts::SIM_DT;
use driftfield::sim::{tick, FixedTimestep, GamePhase, GameState, TickInput};
use driftfield::Tuning;

/// Demo run length in simulation ticks (30 seconds at 60 Hz)
const DEMO_TICKS: u64 = 30 * 60;

fn main() {
    env_logger::init();

    let tuning = Tuning::load(Path::new("tuning.json"));
    let seed = 0xD21F7;
    let mut state = GameState::with_tuning(seed, &tuning);
    let mut clock = FixedTimestep::new();

    log::info!(
        "driftfield demo: seed {seed:#x}, world {}x{}",
        state.bounds.width,
        state.bounds.height
    );

    let mut last_frame = Instant::now();
    while state.time_ticks < DEMO_TICKS && state.phase != GamePhase::GameOver {
        let now = Instant::now();
        let frame_dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        let input = scripted_input(state.time_ticks);
        let owed = clock.advance(frame_dt);
        for _ in 0..owed {
            tick(&mut state, &input, SIM_DT);
        }

        // Pace roughly like a render loop would
        std::thread::sleep(Duration::from_millis(8));
    }

    log::info!(
        "demo finished: {} ticks, wave {}, score {}, {} lives left",
        state.time_ticks,
        state.wave,
        state.score,
        state.lives
    );
    println!("final score: {}", state.score);
}

/// A crude pilot: sweep the heading and fire in bursts
fn scripted_input(time_ticks: u64) -> TickInput {
    TickInput {
        turn_right: time_ticks % 120 < 80,
        turn_left: false,
        thrust: time_ticks % 240 < 60,
        fire: time_ticks % 10 == 0,
        pause: false,
    }
}
