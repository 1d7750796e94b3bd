//! Driftfield - simulation core for a toroidal-world arcade space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, collision masks, toroidal math, tick loop)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio, dialog/shop UI and raw input mapping are external
//! collaborators: the library exposes positions, masks and draw callbacks,
//! and consumes discrete per-tick action flags.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_TICKS_PER_FRAME: u32 = 6;

    /// Default world dimensions (toroidal - edges wrap)
    pub const WORLD_WIDTH: f32 = 640.0;
    pub const WORLD_HEIGHT: f32 = 480.0;

    /// Pool capacities
    pub const MAX_ASTEROIDS: usize = 64;
    pub const MAX_BULLETS: usize = 64;
    pub const MAX_PARTICLES: usize = 256;
    pub const MAX_PICKABLES: usize = 32;

    /// Asteroid collision radius per size tier (0 = smallest)
    pub const ASTEROID_RADII: [f32; 3] = [8.0, 16.0, 32.0];
    /// Base asteroid speed; lower-tier fragments move faster
    pub const ASTEROID_BASE_SPEED: f32 = 40.0;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 300.0;
    pub const BULLET_LIFE_TICKS: u32 = 90;
    pub const BULLET_RADIUS: f32 = 2.0;
    /// Homing bullet max steer per tick (radians)
    pub const BULLET_HOMING_TURN: f32 = 0.08;
    /// Assisted bullet aim-correction half-cone (radians)
    pub const BULLET_ASSIST_CONE: f32 = 0.35;

    /// Particle velocity damping per tick
    pub const PARTICLE_DRAG: f32 = 0.99;
    /// Particle alpha decrement per tick
    pub const PARTICLE_FADE: f32 = 0.01;
    /// Particles are pushed away from the player inside this distance
    pub const PARTICLE_PUSH_BAND: f32 = 30.0;
    /// Particles blend toward the player's velocity inside this distance
    pub const PARTICLE_DRAG_BAND: f32 = 100.0;

    /// Pickable collection distance while homing
    pub const PICKABLE_COLLECT_DIST: f32 = 8.0;
    /// Pickable homing speed
    pub const PICKABLE_HOMING_SPEED: f32 = 120.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 10.0;
    pub const PLAYER_TURN_SPEED: f32 = 4.0;
    pub const PLAYER_THRUST: f32 = 160.0;
    pub const PLAYER_MAX_SPEED: f32 = 240.0;
    pub const PLAYER_FIRE_COOLDOWN: u32 = 12;
    /// Invulnerability window after losing a life (ticks)
    pub const PLAYER_RESPAWN_SHIELD: u32 = 120;
}

/// Normalize angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_vec(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
