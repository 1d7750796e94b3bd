//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Fixed pool processing order (player, bullets, asteroids, particles, pickables)
//! - No rendering or platform dependencies

pub mod entity;
pub mod mask;
pub mod pool;
pub mod state;
pub mod tick;
pub mod world;

pub use entity::{
    Asteroid, Bullet, BulletKind, Particle, Pickable, PickableKind, PickablePhase, Player, Rgba,
};
pub use mask::{Mask, Shape};
pub use pool::FixedPool;
pub use state::{GamePhase, GameState, RngState};
pub use tick::{FixedTimestep, TickInput, tick};
pub use world::{WorldBounds, WrapRect};
