//! Entity kinds and their per-tick update routines
//!
//! Every entity owns its position, velocity and collision mask, and is
//! created through a factory that sets up a pool-correct default mask.
//! Update routines return `true` while the entity is alive; a `false`
//! return asks the owning pool pass to drop it.

use std::fmt;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::mask::Mask;
use super::pool::FixedPool;
use super::world::{WorldBounds, WrapRect};
use crate::consts::*;
use crate::{heading_vec, normalize_angle};

/// RGBA color with alpha used as particle lifetime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

// ---------------------------------------------------------------------------
// Asteroid

/// A drifting rock; tier 2 is largest, tier 0 terminal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Size class: 0 = smallest (no fragments on death), 2 = largest
    pub tier: u8,
    pub mask: Mask,
}

impl Asteroid {
    /// Factory: random heading, default base speed
    pub fn spawn(pos: Vec2, tier: u8, rng: &mut Pcg32) -> Self {
        Self::spawn_at_speed(pos, tier, ASTEROID_BASE_SPEED, rng)
    }

    /// Factory with an explicit base speed; children move faster per tier
    pub fn spawn_at_speed(pos: Vec2, tier: u8, base_speed: f32, rng: &mut Pcg32) -> Self {
        let tier = tier.min(2);
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = base_speed * (3 - tier) as f32;
        Self {
            pos,
            vel: heading_vec(angle) * speed,
            tier,
            mask: Mask::circle(pos, ASTEROID_RADII[tier as usize]),
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        ASTEROID_RADII[self.tier as usize]
    }

    /// Radius of the particle-repulsion field, scaled with size tier
    #[inline]
    pub fn field_radius(&self) -> f32 {
        self.radius() * 3.0
    }

    /// Integrate, wrap, then scan the bullet pool for a hit
    ///
    /// The first overlapping live bullet (pool iteration order) registers
    /// the kill: its `life` is zeroed (soft-delete, collected on the next
    /// bullet pass) and the asteroid reports dead. Remaining bullets are
    /// unaffected this tick. Fragment spawning is the caller's job - see
    /// the pending queue in `GameState`.
    pub fn update<const N: usize>(
        &mut self,
        dt: f32,
        bounds: &WorldBounds,
        bullets: &mut FixedPool<Bullet, N>,
    ) -> bool {
        self.pos = bounds.wrap(self.pos + self.vel * dt);
        self.mask.position = self.pos;

        let mask = &self.mask;
        let mut hit = false;
        bullets.for_each(|bullet| {
            if !hit && bullet.life > 0 && mask.check_collision(&bullet.mask) {
                bullet.life = 0;
                hit = true;
            }
            true
        });
        !hit
    }

    pub fn draw_rect(&self) -> WrapRect {
        let r = self.radius();
        WrapRect {
            pos: self.pos - Vec2::splat(r),
            width: r * 2.0,
            height: r * 2.0,
        }
    }

    /// Invoke the draw callback at the wrapped position and edge ghosts
    pub fn draw<F: FnMut(Vec2)>(&self, bounds: &WorldBounds, f: F) {
        bounds.for_each_ghost(self.draw_rect(), f);
    }
}

// ---------------------------------------------------------------------------
// Bullet

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BulletKind {
    #[default]
    Normal,
    /// One-time aim correction toward a target at spawn
    Assisted,
    /// Steers toward the nearest asteroid every tick, bounded turn rate
    Homing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining ticks; 0 means soft-deleted, dropped on the next pass
    pub life: u32,
    pub kind: BulletKind,
    pub mask: Mask,
}

impl Bullet {
    pub fn spawn(pos: Vec2, dir: Vec2, kind: BulletKind) -> Self {
        Self::spawn_at_speed(pos, dir, BULLET_SPEED, kind)
    }

    pub fn spawn_at_speed(pos: Vec2, dir: Vec2, speed: f32, kind: BulletKind) -> Self {
        Self {
            pos,
            vel: dir.normalize_or_zero() * speed,
            life: BULLET_LIFE_TICKS,
            kind,
            mask: Mask::circle(pos, BULLET_RADIUS),
        }
    }

    /// No-op dead report at life 0; otherwise integrate, wrap, decrement
    pub fn update(&mut self, dt: f32, bounds: &WorldBounds) -> bool {
        if self.life == 0 {
            return false;
        }
        self.pos = bounds.wrap(self.pos + self.vel * dt);
        self.mask.position = self.pos;
        self.life -= 1;
        true
    }

    /// Rotate velocity toward a target point, bounded per tick
    pub fn steer_toward(&mut self, target: Vec2) {
        let speed = self.vel.length();
        if speed <= f32::EPSILON {
            return;
        }
        let current = self.vel.y.atan2(self.vel.x);
        let desired = (target - self.pos).y.atan2((target - self.pos).x);
        let delta = normalize_angle(desired - current).clamp(-BULLET_HOMING_TURN, BULLET_HOMING_TURN);
        self.vel = heading_vec(current + delta) * speed;
    }

    pub fn draw_rect(&self) -> WrapRect {
        WrapRect {
            pos: self.pos - Vec2::splat(BULLET_RADIUS),
            width: BULLET_RADIUS * 2.0,
            height: BULLET_RADIUS * 2.0,
        }
    }

    pub fn draw<F: FnMut(Vec2)>(&self, bounds: &WorldBounds, f: F) {
        bounds.for_each_ghost(self.draw_rect(), f);
    }
}

// ---------------------------------------------------------------------------
// Particle

/// Cosmetic dust mote; alpha doubles as its lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgba,
    pub mask: Mask,
}

impl Particle {
    pub fn spawn(pos: Vec2, vel: Vec2, color: Rgba) -> Self {
        Self {
            pos,
            vel,
            color,
            mask: Mask::circle(pos, 1.0),
        }
    }

    /// Integrate with drag, wrap, fade; dead when fully transparent
    pub fn update(&mut self, dt: f32, bounds: &WorldBounds) -> bool {
        self.vel *= PARTICLE_DRAG;
        self.pos = bounds.wrap(self.pos + self.vel * dt);
        self.mask.position = self.pos;
        self.color.a = (self.color.a - PARTICLE_FADE).max(0.0);
        self.color.a > 0.0
    }

    /// Inverse-distance push away from an asteroid's field
    pub fn apply_asteroid_repulsion(&mut self, asteroid: &Asteroid, dt: f32) {
        let away = self.pos - asteroid.pos;
        let dist = away.length();
        let field = asteroid.field_radius();
        if dist > f32::EPSILON && dist < field {
            let strength = 400.0 * (1.0 - dist / field) / dist.max(4.0);
            self.vel += away / dist * strength * field * dt;
        }
    }

    /// Distance-banded interaction with the player: hard push inside the
    /// inner band, velocity blending inside the outer band
    pub fn apply_player_bands(&mut self, player_pos: Vec2, player_vel: Vec2, dt: f32) {
        let away = self.pos - player_pos;
        let dist = away.length();
        if dist < PARTICLE_PUSH_BAND && dist > f32::EPSILON {
            self.vel += away / dist * 200.0 * dt;
        } else if dist < PARTICLE_DRAG_BAND {
            self.vel = self.vel.lerp(player_vel, 1.5 * dt);
        }
    }

    pub fn draw_rect(&self) -> WrapRect {
        WrapRect {
            pos: self.pos - Vec2::splat(1.0),
            width: 2.0,
            height: 2.0,
        }
    }

    pub fn draw<F: FnMut(Vec2)>(&self, bounds: &WorldBounds, f: F) {
        bounds.for_each_ghost(self.draw_rect(), f);
    }
}

// ---------------------------------------------------------------------------
// Pickable

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickableKind {
    Ore,
    Artifact,
}

/// Attraction state of a pickable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickablePhase {
    /// Free floating, wrapping, waiting for first player contact
    Drifting,
    /// Snapped onto the player, chasing until collected
    Homing,
}

/// A collectible drop (ore, artifacts) with an exactly-once reward callback
pub struct Pickable {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: PickableKind,
    pub phase: PickablePhase,
    pub mask: Mask,
    on_collect: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for Pickable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pickable")
            .field("pos", &self.pos)
            .field("vel", &self.vel)
            .field("kind", &self.kind)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Pickable {
    pub fn spawn<F: FnMut() + 'static>(
        pos: Vec2,
        vel: Vec2,
        kind: PickableKind,
        on_collect: F,
    ) -> Self {
        Self {
            pos,
            vel,
            kind,
            phase: PickablePhase::Drifting,
            mask: Mask::circle(pos, 6.0),
            on_collect: Some(Box::new(on_collect)),
        }
    }

    /// Two-phase update: drift until player contact, then home until
    /// collected within `PICKABLE_COLLECT_DIST` of the player
    pub fn update(&mut self, dt: f32, bounds: &WorldBounds, player: &Player) -> bool {
        match self.phase {
            PickablePhase::Drifting => {
                self.pos = bounds.wrap(self.pos + self.vel * dt);
                self.mask.position = self.pos;
                if self.mask.check_collision(&player.mask) {
                    self.phase = PickablePhase::Homing;
                    self.vel =
                        (player.pos - self.pos).normalize_or_zero() * PICKABLE_HOMING_SPEED;
                }
                true
            }
            PickablePhase::Homing => {
                let mut to_player = player.pos - self.pos;
                let clamp = bounds.half_min_dimension();
                // Teleport closer rather than chasing forever around the wrap
                if to_player.length() > clamp {
                    self.pos = player.pos - to_player.normalize_or_zero() * clamp;
                    to_player = player.pos - self.pos;
                }
                let dist = to_player.length();
                if dist <= PICKABLE_COLLECT_DIST {
                    if let Some(mut reward) = self.on_collect.take() {
                        reward();
                    }
                    return false;
                }
                let dir = to_player / dist;
                // Direct positional nudge plus velocity blending
                self.pos += dir * PICKABLE_HOMING_SPEED * 0.5 * dt;
                self.vel = self.vel.lerp(dir * PICKABLE_HOMING_SPEED, 0.2);
                self.pos += self.vel * dt;
                self.mask.position = self.pos;
                true
            }
        }
    }

    pub fn draw_rect(&self) -> WrapRect {
        WrapRect {
            pos: self.pos - Vec2::splat(6.0),
            width: 12.0,
            height: 12.0,
        }
    }

    pub fn draw<F: FnMut(Vec2)>(&self, bounds: &WorldBounds, f: F) {
        bounds.for_each_ghost(self.draw_rect(), f);
    }
}

// ---------------------------------------------------------------------------
// Player

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle in radians
    pub heading: f32,
    pub mask: Mask,
    pub fire_cooldown: u32,
    /// Remaining invulnerability after a respawn
    pub shield_ticks: u32,
    /// Thrust acceleration, tunable per run
    pub thrust: f32,
    /// Speed clamp while thrusting, tunable per run
    pub max_speed: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            heading: -std::f32::consts::FRAC_PI_2,
            mask: Mask::circle(pos, PLAYER_RADIUS),
            fire_cooldown: 0,
            shield_ticks: 0,
            thrust: PLAYER_THRUST,
            max_speed: PLAYER_MAX_SPEED,
        }
    }

    /// Apply turn/thrust input, integrate, wrap, tick down cooldowns
    pub fn update(&mut self, turn: f32, thrust: bool, dt: f32, bounds: &WorldBounds) {
        self.heading = normalize_angle(self.heading + turn * PLAYER_TURN_SPEED * dt);
        if thrust {
            self.vel += heading_vec(self.heading) * self.thrust * dt;
            let speed = self.vel.length();
            if speed > self.max_speed {
                self.vel = self.vel / speed * self.max_speed;
            }
        }
        self.pos = bounds.wrap(self.pos + self.vel * dt);
        self.mask.position = self.pos;
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        self.shield_ticks = self.shield_ticks.saturating_sub(1);
    }

    #[inline]
    pub fn can_fire(&self) -> bool {
        self.fire_cooldown == 0
    }

    #[inline]
    pub fn is_vulnerable(&self) -> bool {
        self.shield_ticks == 0
    }

    /// Bullet spawn point just off the nose
    pub fn muzzle_pos(&self) -> Vec2 {
        self.pos + heading_vec(self.heading) * (PLAYER_RADIUS + 2.0)
    }

    /// Reset to a position with a fresh invulnerability window
    pub fn respawn(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.mask.position = pos;
        self.shield_ticks = PLAYER_RESPAWN_SHIELD;
    }

    pub fn draw_rect(&self) -> WrapRect {
        WrapRect {
            pos: self.pos - Vec2::splat(PLAYER_RADIUS),
            width: PLAYER_RADIUS * 2.0,
            height: PLAYER_RADIUS * 2.0,
        }
    }

    pub fn draw<F: FnMut(Vec2)>(&self, bounds: &WorldBounds, f: F) {
        bounds.for_each_ghost(self.draw_rect(), f);
    }
}
