//! Fixed timestep simulation tick
//!
//! One tick advances every pool in a fixed, documented order:
//! player, bullets, asteroids (then fragment flush), particles, pickables.
//! The order is a contract: particles deliberately read same-tick asteroid
//! positions, and cross-entity tests always see either the committed prior
//! step or the already-updated current step depending on this order.
//! A tick never suspends and always runs to completion.

use glam::Vec2;

use super::entity::{BulletKind, Rgba};
use super::state::{nearest_asteroid, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (discrete action flags; raw key
/// mapping belongs to the input collaborator)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust: bool,
    pub fire: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

/// Debris color for asteroid destruction bursts
const DEBRIS_COLOR: Rgba = Rgba::new(0.8, 0.75, 0.7, 1.0);

/// Particles spawned per destroyed asteroid
const DEBRIS_COUNT: usize = 12;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        state.phase = match state.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::GameOver => GamePhase::GameOver,
        };
    }
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;
    let bounds = state.bounds;

    // --- Player ---
    let turn = (input.turn_right as i8 - input.turn_left as i8) as f32;
    state.player.update(turn, input.thrust, dt, &bounds);
    if input.fire && state.player.can_fire() {
        state.fire_bullet(BulletKind::Normal);
    }

    // --- Bullets ---
    {
        let asteroids = &state.asteroids;
        state.bullets.for_each(|bullet| {
            if bullet.kind == BulletKind::Homing && bullet.life > 0 {
                if let Some(target) = nearest_asteroid(asteroids, bullet.pos) {
                    bullet.steer_toward(target);
                }
            }
            bullet.update(dt, &bounds)
        });
    }

    // --- Asteroids ---
    // Kills are recorded and processed after the pass; fragments go through
    // the pending queue so this pass never visits entities it spawned.
    let mut kills: Vec<(Vec2, u8)> = Vec::new();
    {
        let bullets = &mut state.bullets;
        state.asteroids.for_each(|asteroid| {
            let alive = asteroid.update(dt, &bounds, bullets);
            if !alive {
                kills.push((asteroid.pos, asteroid.tier));
            }
            alive
        });
    }
    for (pos, tier) in kills {
        state.score += GameState::kill_score(tier);
        state.queue_fragments(pos, tier);
        state.burst_particles(pos, DEBRIS_COUNT, DEBRIS_COLOR);
        if tier == 0 {
            state.maybe_spawn_drop(pos);
        }
    }
    state.flush_pending_asteroids();

    // Asteroid-player contact costs a life unless the respawn shield holds
    if state.player.is_vulnerable() {
        let hit = state
            .asteroids
            .iter()
            .any(|a| a.mask.check_collision(&state.player.mask));
        if hit {
            state.lives = state.lives.saturating_sub(1);
            if state.lives == 0 {
                state.phase = GamePhase::GameOver;
                log::info!(
                    "game over at tick {} with score {}",
                    state.time_ticks,
                    state.score
                );
            } else {
                let center = Vec2::new(bounds.width / 2.0, bounds.height / 2.0);
                state.player.respawn(center);
                log::debug!("player hit, {} lives left", state.lives);
            }
        }
    }

    // --- Particles ---
    // The O(n*m) asteroid repulsion is spread across ticks: it runs on every
    // 3rd global tick, and only for particles whose storage index parity
    // matches the tick parity.
    {
        let asteroids = &state.asteroids;
        let player_pos = state.player.pos;
        let player_vel = state.player.vel;
        let field_pass = state.time_ticks % 3 == 0;
        let parity = (state.time_ticks % 2) as usize;
        state.particles.for_each_indexed(|index, particle| {
            if field_pass && index % 2 == parity {
                for asteroid in asteroids.iter() {
                    particle.apply_asteroid_repulsion(asteroid, dt);
                }
            }
            particle.apply_player_bands(player_pos, player_vel, dt);
            particle.update(dt, &bounds)
        });
    }

    // --- Pickables ---
    {
        let player = &state.player;
        state.pickables.for_each(|pickable| pickable.update(dt, &bounds, player));
    }
    state.settle_rewards();

    // Field cleared: next wave
    if state.asteroids.is_empty() && state.pending_asteroids.is_empty() {
        let count = (state.first_wave_size + state.wave as usize).min(8);
        state.spawn_field(count);
    }
}

/// Fixed-timestep accumulator decoupling simulation rate from render rate
///
/// Real elapsed frame time accumulates; each call runs at most
/// `MAX_TICKS_PER_FRAME` ticks and discards any leftover beyond the bound
/// rather than deferring it (spiral-of-death guard).
#[derive(Debug, Default)]
pub struct FixedTimestep {
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self { accumulator: 0.0 }
    }

    /// Consume a frame's real duration, returning how many ticks to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= SIM_DT;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = 0.0;
        }
        ticks
    }

    /// Advance and run the owed ticks against a state
    pub fn run(&mut self, state: &mut GameState, input: &TickInput, frame_dt: f32) -> u32 {
        let ticks = self.advance(frame_dt);
        for _ in 0..ticks {
            tick(state, input, SIM_DT);
        }
        ticks
    }
}
