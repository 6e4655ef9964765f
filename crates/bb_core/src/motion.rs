//! Constant-velocity motion with reflection off the canvas edges.
//!
//! One call to [`step`] is one tick. Velocity is per tick, not per second, so
//! the apparent speed follows the tick cadence.

use crate::scene::{Bounds, SceneState, SpriteMetrics};

/// Which axes clamped during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallHit {
    pub horizontal: bool,
    pub vertical: bool,
}

impl WallHit {
    /// A corner contact still counts as a single hit.
    pub fn any(self) -> bool {
        self.horizontal || self.vertical
    }
}

/// Advances `scene` by its velocity and reflects off the walls. Overshoot is
/// clamped exactly onto the boundary.
pub fn step(scene: &mut SceneState, sprite: &SpriteMetrics, bounds: Bounds) -> WallHit {
    scene.x = scene.x.saturating_add(scene.dx);
    scene.y = scene.y.saturating_add(scene.dy);

    let horizontal = reflect_axis(
        &mut scene.x,
        &mut scene.dx,
        sprite.half_width(),
        bounds.width,
    );
    let vertical = reflect_axis(
        &mut scene.y,
        &mut scene.dy,
        sprite.half_height(),
        bounds.height,
    );

    WallHit {
        horizontal,
        vertical,
    }
}

fn reflect_axis(pos: &mut i32, vel: &mut i32, half_extent: i32, limit: i32) -> bool {
    if *pos <= half_extent {
        *pos = half_extent;
        *vel = vel.saturating_neg();
        true
    } else if *pos >= limit - half_extent {
        *pos = limit - half_extent;
        *vel = vel.saturating_neg();
        true
    } else {
        false
    }
}
