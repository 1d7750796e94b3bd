//! Toroidal world math: position wrapping and ghost drawing
//!
//! The play field wraps at every edge. Positions are folded back into
//! `[0, width) x [0, height)` once per entity per tick, and draw callbacks
//! are repeated at up to four edge-wrap duplicates so an object crossing a
//! seam appears on both sides at once.
//!
//! Known asymmetry, kept on purpose: drawing is ghosted 5-way but collision
//! masks are only evaluated at the single wrapped position, so two objects
//! visually touching across a seam do not collide. Changing this is a
//! product decision, not a bug fix.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Injected world dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

/// An entity's axis-aligned draw rect (top-left position plus size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapRect {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Fold a position back into `[0, width) x [0, height)`
    ///
    /// Edge semantics match the original behavior: a coordinate below zero
    /// lands at `extent - 1`, a coordinate past the far edge lands at `0`.
    /// Idempotent: in-bounds positions pass through unchanged.
    pub fn wrap(&self, mut pos: Vec2) -> Vec2 {
        if pos.x < 0.0 {
            pos.x = self.width - 1.0;
        } else if pos.x >= self.width {
            pos.x = 0.0;
        }
        if pos.y < 0.0 {
            pos.y = self.height - 1.0;
        } else if pos.y >= self.height {
            pos.y = 0.0;
        }
        pos
    }

    /// Half the smaller world dimension (pickable chase clamp distance)
    pub fn half_min_dimension(&self) -> f32 {
        self.width.min(self.height) / 2.0
    }

    /// Invoke `f` at the rect's position and at its edge-wrap duplicates
    ///
    /// Always called once at the original position. Each of the four ghost
    /// positions fires only when the rect lies within its own size of the
    /// corresponding edge, so a far-from-edge object gets exactly one call
    /// and a corner-straddling one up to five.
    pub fn for_each_ghost<F: FnMut(Vec2)>(&self, rect: WrapRect, mut f: F) {
        f(rect.pos);
        if rect.pos.x < rect.width {
            f(rect.pos + Vec2::new(self.width, 0.0));
        }
        if rect.pos.x + 2.0 * rect.width > self.width {
            f(rect.pos - Vec2::new(self.width, 0.0));
        }
        if rect.pos.y < rect.height {
            f(rect.pos + Vec2::new(0.0, self.height));
        }
        if rect.pos.y + 2.0 * rect.height > self.height {
            f(rect.pos - Vec2::new(0.0, self.height));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> WorldBounds {
        WorldBounds::new(640.0, 480.0)
    }

    #[test]
    fn test_wrap_in_bounds_unchanged() {
        let b = bounds();
        let p = Vec2::new(320.0, 240.0);
        assert_eq!(b.wrap(p), p);
        assert_eq!(b.wrap(Vec2::ZERO), Vec2::ZERO);
        assert_eq!(b.wrap(Vec2::new(639.9, 479.9)), Vec2::new(639.9, 479.9));
    }

    #[test]
    fn test_wrap_edge_semantics() {
        let b = bounds();
        assert_eq!(b.wrap(Vec2::new(-5.0, 100.0)), Vec2::new(639.0, 100.0));
        assert_eq!(b.wrap(Vec2::new(640.0, 100.0)), Vec2::new(0.0, 100.0));
        assert_eq!(b.wrap(Vec2::new(100.0, -0.1)), Vec2::new(100.0, 479.0));
        assert_eq!(b.wrap(Vec2::new(100.0, 500.0)), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_wrap_idempotent() {
        let b = bounds();
        for p in [
            Vec2::new(-3.0, -3.0),
            Vec2::new(700.0, 500.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(639.0, 479.0),
            Vec2::new(12.5, 470.0),
        ] {
            let once = b.wrap(p);
            assert_eq!(b.wrap(once), once);
        }
    }

    #[test]
    fn test_ghost_single_call_far_from_edges() {
        let b = bounds();
        let rect = WrapRect {
            pos: Vec2::new(300.0, 200.0),
            width: 16.0,
            height: 16.0,
        };
        let mut calls = Vec::new();
        b.for_each_ghost(rect, |p| calls.push(p));
        assert_eq!(calls, vec![rect.pos]);
    }

    #[test]
    fn test_ghost_near_left_edge() {
        let b = bounds();
        let rect = WrapRect {
            pos: Vec2::new(4.0, 200.0),
            width: 16.0,
            height: 16.0,
        };
        let mut calls = Vec::new();
        b.for_each_ghost(rect, |p| calls.push(p));
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], rect.pos);
        // Ghost appears one world-width to the right
        assert_eq!(calls[1], rect.pos + Vec2::new(640.0, 0.0));
    }

    #[test]
    fn test_ghost_near_bottom_right_corner() {
        let b = bounds();
        let rect = WrapRect {
            pos: Vec2::new(630.0, 470.0),
            width: 16.0,
            height: 16.0,
        };
        let mut calls = Vec::new();
        b.for_each_ghost(rect, |p| calls.push(p));
        // Original + right-edge ghost + bottom-edge ghost
        assert_eq!(calls.len(), 3);
        assert!(calls.contains(&(rect.pos - Vec2::new(640.0, 0.0))));
        assert!(calls.contains(&(rect.pos - Vec2::new(0.0, 480.0))));
    }

    #[test]
    fn test_half_min_dimension() {
        assert!((bounds().half_min_dimension() - 240.0).abs() < f32::EPSILON);
    }
}
