//! Mutable motion record plus the immutable values it is checked against.

/// Fixed canvas extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Cached dimensions of the composite sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteMetrics {
    pub width: i32,
    pub height: i32,
    /// Vertical label offset relative to the sprite center.
    pub text_offset_y: i32,
}

impl SpriteMetrics {
    pub fn half_width(&self) -> i32 {
        self.width.div_euclid(2)
    }

    pub fn half_height(&self) -> i32 {
        self.height.div_euclid(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Running,
    Paused,
}

impl RunState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Running => Self::Paused,
            Self::Paused => Self::Running,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneState {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    pub run_state: RunState,
}

impl SceneState {
    pub fn new(x: i32, y: i32, dx: i32, dy: i32) -> Self {
        Self {
            x,
            y,
            dx,
            dy,
            run_state: RunState::Running,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.run_state == RunState::Paused
    }

    /// Flips RUNNING/PAUSED and returns whether the scene is now paused.
    pub fn toggle_pause(&mut self) -> bool {
        self.run_state = self.run_state.toggled();
        self.is_paused()
    }

    pub fn label_position(&self, sprite: &SpriteMetrics) -> (i32, i32) {
        (self.x, self.y + sprite.text_offset_y)
    }
}
