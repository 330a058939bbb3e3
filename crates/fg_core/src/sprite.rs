//! Sprite kinematics and drawing.
//!
//! Each update is one explicit Euler step: velocity absorbs acceleration·dt,
//! then position absorbs velocity·dt. Wall reflection is checked once, after
//! integration, so a sprite may overshoot an edge by up to one step before its
//! velocity flips and it drifts back in. Nothing clamps it to the wall.

use glam::Vec2;

use crate::backend::{Rect, RenderBackend};
use crate::input::Direction;
use crate::texture_cache::{TextureCache, TextureId};

/// Sprites are drawn as a fixed 20×20 pixel square.
pub const SPRITE_SIZE: u32 = 20;
pub const DEFAULT_VELOCITY: Vec2 = Vec2::new(1.0, 1.0);
pub const DEFAULT_ACCELERATION: Vec2 = Vec2::new(0.0, 1.0);
/// Pixels moved per directional command.
pub const CONTROL_STEP: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub velocity: Vec2,
    pub acceleration: Vec2,
}

impl Motion {
    pub const STILL: Self = Self {
        velocity: Vec2::ZERO,
        acceleration: Vec2::ZERO,
    };

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vec2) -> Self {
        self.acceleration = acceleration;
        self
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            velocity: DEFAULT_VELOCITY,
            acceleration: DEFAULT_ACCELERATION,
        }
    }
}

/// Capability attached to sprites that accept directional commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    pub step: f32,
}

impl Default for Control {
    fn default() -> Self {
        Self { step: CONTROL_STEP }
    }
}

#[derive(Debug, Clone)]
pub struct Sprite {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    texture: Option<TextureId>,
    src: Rect,
    dest: Rect,
    control: Option<Control>,
}

impl Sprite {
    /// A sprite without a texture is kept in the simulation but never drawn.
    pub fn new(texture: Option<TextureId>, position: Vec2, motion: Motion) -> Self {
        let src = Rect::new(0, 0, SPRITE_SIZE, SPRITE_SIZE);
        let mut sprite = Self {
            position,
            velocity: motion.velocity,
            acceleration: motion.acceleration,
            texture,
            src,
            dest: src,
            control: None,
        };
        sprite.sync_dest();
        sprite
    }

    pub fn with_control(mut self, control: Control) -> Self {
        self.control = Some(control);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.texture.is_some()
    }

    pub fn is_controllable(&self) -> bool {
        self.control.is_some()
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn control(&self) -> Option<Control> {
        self.control
    }

    pub fn src(&self) -> Rect {
        self.src
    }

    pub fn dest(&self) -> Rect {
        self.dest
    }

    /// Returns whether a copy was issued.
    pub fn draw<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        textures: &TextureCache<B::Texture>,
    ) -> bool {
        let Some(id) = self.texture else {
            return false;
        };
        let Some(texture) = textures.texture(id) else {
            log::warn!("Sprite references unknown texture {:?}", id);
            return false;
        };
        self.sync_dest();
        backend.copy(texture, self.src, self.dest);
        true
    }

    pub fn update(&mut self, dt: f32, bounds: Vec2) {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;

        if self.position.x > bounds.x || self.position.x < 0.0 {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y > bounds.y || self.position.y < 0.0 {
            self.velocity.y = -self.velocity.y;
        }
    }

    /// Moves the sprite by its control step. Velocity and acceleration are
    /// left alone. Returns false for sprites without `Control`.
    pub fn command(&mut self, direction: Direction) -> bool {
        match self.control {
            Some(control) => {
                self.position += direction.offset(control.step);
                true
            }
            None => false,
        }
    }

    // Truncates toward zero, matching an integer cast of the position.
    fn sync_dest(&mut self) {
        self.dest.x = self.position.x as i32;
        self.dest.y = self.position.y as i32;
    }
}
