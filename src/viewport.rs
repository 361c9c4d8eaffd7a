//! Screen-space helpers for whatever draws the world.

use serde::{Deserialize, Serialize};

use crate::vector::Vec2;

fn default_width() -> f64 {
    1024.0
}

fn default_height() -> f64 {
    768.0
}

/// Size of the observer's window. The leader is always drawn at its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Viewport {
    pub fn half(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Translates a world position into screen coordinates for a window
    /// centred on `center`.
    pub fn to_display_coords(&self, world_pos: Vec2, center: Vec2) -> Vec2 {
        let top_left = center - self.half();
        world_pos - top_left
    }
}
