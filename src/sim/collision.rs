//! Axis-aligned bounding-box collision
//!
//! Every collision in the game is a center/size box overlap. Entities that
//! don't declare dimensions (enemies, power-ups) collide as 20x20 boxes.
//!
//! The reach is the first box's full extent plus half of the second's, so the
//! test depends on argument order. Call sites pass the moving or acting entity
//! first: `(bullet, enemy)`, `(bullet, player)`, `(player, enemy)`,
//! `(player, power_up)`.

use glam::Vec2;

use crate::consts::DEFAULT_HITBOX;

/// Anything that takes part in collision checks
pub trait Hitbox {
    /// Box center
    fn center(&self) -> Vec2;

    /// Box width/height
    fn size(&self) -> Vec2 {
        Vec2::splat(DEFAULT_HITBOX)
    }
}

/// Overlap test on raw boxes.
///
/// Collides when the center distance on each axis is below `a`'s full extent
/// plus half of `b`'s on that axis. Touching the reach does not collide.
#[inline]
pub fn boxes_overlap(a_center: Vec2, a_size: Vec2, b_center: Vec2, b_size: Vec2) -> bool {
    let delta = (a_center - b_center).abs();
    let reach = a_size + b_size * 0.5;
    delta.x < reach.x && delta.y < reach.y
}

/// Overlap test between two entities, `a` contributing its full extent
#[inline]
pub fn overlaps(a: &impl Hitbox, b: &impl Hitbox) -> bool {
    boxes_overlap(a.center(), a.size(), b.center(), b.size())
}
