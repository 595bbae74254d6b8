//! World/screen coordinate conversion

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Camera window onto the world, kept centered on a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World position of the screen's top-left corner
    pub offset: Vec2,
    /// Viewport size in pixels
    pub viewport: Vec2,
    /// World size the camera is clamped to
    pub world: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2, world: Vec2, target_center: Vec2) -> Self {
        let mut camera = Self {
            offset: Vec2::ZERO,
            viewport,
            world,
        };
        camera.update(target_center);
        camera
    }

    /// Recenter on the target, clamped so the view stays inside the world
    pub fn update(&mut self, target_center: Vec2) {
        let desired = target_center - self.viewport / 2.0;
        // A viewport larger than the world pins the camera at the origin
        let max = (self.world - self.viewport).max(Vec2::ZERO);
        self.offset = desired.clamp(Vec2::ZERO, max);
    }

    /// World position -> screen position
    #[inline]
    pub fn apply(&self, world_pos: Vec2) -> Vec2 {
        world_pos - self.offset
    }

    /// Screen position -> world position
    #[inline]
    pub fn to_world(&self, screen_pos: Vec2) -> Vec2 {
        screen_pos + self.offset
    }
}
