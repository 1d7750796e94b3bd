//! Shape-based collision masks
//!
//! A mask anchors one or more local shapes (circles, axis-aligned rects) at
//! an entity's world position. Collision between two masks is the full cross
//! product of their shape pairs with a short-circuit OR - four concrete pair
//! combinations, dispatched by pattern match (no allocation per query).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A collision shape with offsets local to the owning mask's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Circle centered at `position + offset`
    Circle { offset: Vec2, radius: f32 },
    /// Axis-aligned rect with its top-left corner at `position + offset`
    Rect { offset: Vec2, width: f32, height: f32 },
}

/// Collision geometry attached to an entity
///
/// Repositioned every simulation tick (`mask.position = entity.pos`) after
/// the entity wraps, so collision is evaluated at the single wrapped
/// position only (drawing is ghosted separately, collision is not).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    /// World-space anchor for all shape offsets
    pub position: Vec2,
    shapes: Vec<Shape>,
}

impl Mask {
    /// Empty mask - never collides with anything
    pub fn empty() -> Self {
        Self {
            position: Vec2::ZERO,
            shapes: Vec::new(),
        }
    }

    /// Mask with a single centered circle
    pub fn circle(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            shapes: vec![Shape::Circle {
                offset: Vec2::ZERO,
                radius,
            }],
        }
    }

    /// Mask with a single rect centered on the anchor
    pub fn centered_rect(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            position,
            shapes: vec![Shape::Rect {
                offset: Vec2::new(-width / 2.0, -height / 2.0),
                width,
                height,
            }],
        }
    }

    /// Mask from an explicit shape list
    pub fn from_shapes(position: Vec2, shapes: Vec<Shape>) -> Self {
        Self { position, shapes }
    }

    /// Shapes in local coordinates (for debug overlays)
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Pairwise intersection test against another mask
    ///
    /// Pure predicate, symmetric. Returns true on the first intersecting
    /// shape pair found; a mask with no shapes never collides. Boundaries
    /// are inclusive for every pair kind (touching counts as overlap).
    pub fn check_collision(&self, other: &Mask) -> bool {
        for a in &self.shapes {
            for b in &other.shapes {
                if shapes_intersect(self.position, a, other.position, b) {
                    return true;
                }
            }
        }
        false
    }

    /// Visit every shape at the anchor plus the four fixed ghost offsets
    ///
    /// Debug-only visualization: the wrap duplicates are drawn regardless of
    /// edge proximity, unlike the proximity-gated draw ghosting in `world`.
    pub fn for_each_debug_shape<F: FnMut(&Shape, Vec2)>(
        &self,
        bounds: &super::WorldBounds,
        mut f: F,
    ) {
        let offsets = [
            Vec2::ZERO,
            Vec2::new(bounds.width, 0.0),
            Vec2::new(-bounds.width, 0.0),
            Vec2::new(0.0, bounds.height),
            Vec2::new(0.0, -bounds.height),
        ];
        for offset in offsets {
            for shape in &self.shapes {
                f(shape, self.position + offset);
            }
        }
    }
}

/// Intersection test for one concrete shape pair
fn shapes_intersect(pos_a: Vec2, a: &Shape, pos_b: Vec2, b: &Shape) -> bool {
    match (a, b) {
        (
            Shape::Circle { offset: oa, radius: ra },
            Shape::Circle { offset: ob, radius: rb },
        ) => {
            let ca = pos_a + *oa;
            let cb = pos_b + *ob;
            ca.distance_squared(cb) <= (ra + rb) * (ra + rb)
        }
        (
            Shape::Rect { offset: oa, width: wa, height: ha },
            Shape::Rect { offset: ob, width: wb, height: hb },
        ) => {
            let ta = pos_a + *oa;
            let tb = pos_b + *ob;
            ta.x <= tb.x + wb && tb.x <= ta.x + wa && ta.y <= tb.y + hb && tb.y <= ta.y + ha
        }
        (Shape::Circle { offset, radius }, Shape::Rect { .. }) => {
            circle_rect_intersect(pos_a + *offset, *radius, pos_b, b)
        }
        (Shape::Rect { .. }, Shape::Circle { offset, radius }) => {
            circle_rect_intersect(pos_b + *offset, *radius, pos_a, a)
        }
    }
}

/// Closest-point-on-rect test between a circle and a rect shape
fn circle_rect_intersect(center: Vec2, radius: f32, rect_pos: Vec2, rect: &Shape) -> bool {
    let Shape::Rect { offset, width, height } = rect else {
        return false;
    };
    let min = rect_pos + *offset;
    let max = min + Vec2::new(*width, *height);
    let closest = center.clamp(min, max);
    center.distance_squared(closest) <= radius * radius
}
