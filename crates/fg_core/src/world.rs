use glam::Vec2;

use crate::backend::RenderBackend;
use crate::config::SpriteSpec;
use crate::input::Direction;
use crate::sprite::{Control, Motion, Sprite};
use crate::texture_cache::TextureCache;

/// Render-target bounds, the ordered sprite list, and the texture cache the
/// sprites draw from.
pub struct World<T> {
    width: u32,
    height: u32,
    sprites: Vec<Sprite>,
    textures: TextureCache<T>,
}

impl<T> World<T> {
    pub fn new(width: u32, height: u32, textures: TextureCache<T>) -> Self {
        Self {
            width,
            height,
            sprites: Vec::new(),
            textures,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Returns the sprite's index; sprites draw and update in insertion order.
    pub fn add(&mut self, sprite: Sprite) -> usize {
        self.sprites.push(sprite);
        self.sprites.len() - 1
    }

    /// Create a sprite whose texture comes from the cache. A texture that
    /// fails to load leaves the sprite in the world but undrawable.
    pub fn spawn<B>(
        &mut self,
        backend: &mut B,
        texture: &str,
        position: Vec2,
        motion: Motion,
        control: Option<Control>,
    ) -> usize
    where
        B: RenderBackend<Texture = T>,
    {
        let texture = match self.textures.get(texture, backend) {
            Ok(id) => Some(id),
            Err(err) => {
                log::warn!(
                    "{err}. Sprite at ({}, {}) will not be drawn.",
                    position.x,
                    position.y
                );
                None
            }
        };
        let mut sprite = Sprite::new(texture, position, motion);
        if let Some(control) = control {
            sprite = sprite.with_control(control);
        }
        self.add(sprite)
    }

    pub fn spawn_all<B>(&mut self, backend: &mut B, specs: &[SpriteSpec])
    where
        B: RenderBackend<Texture = T>,
    {
        for spec in specs {
            let control = spec.controllable.then(Control::default);
            self.spawn(backend, &spec.texture, spec.position(), spec.motion(), control);
        }
        log::info!(
            "World {}x{}: {} sprites, {} controllable, {} textures",
            self.width,
            self.height,
            self.sprites.len(),
            self.controllable().count(),
            self.textures.len()
        );
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprite(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    pub fn sprite_mut(&mut self, index: usize) -> Option<&mut Sprite> {
        self.sprites.get_mut(index)
    }

    pub fn controllable(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(|s| s.is_controllable())
    }

    pub fn textures(&self) -> &TextureCache<T> {
        &self.textures
    }

    /// Returns the number of sprites that issued a copy.
    pub fn draw<B>(&mut self, backend: &mut B) -> usize
    where
        B: RenderBackend<Texture = T>,
    {
        let textures = &self.textures;
        let mut drawn = 0;
        for sprite in &mut self.sprites {
            if sprite.draw(backend, textures) {
                drawn += 1;
            }
        }
        drawn
    }

    pub fn update(&mut self, dt: f32) {
        let bounds = self.bounds();
        for sprite in &mut self.sprites {
            sprite.update(dt, bounds);
        }
    }

    /// Returns how many sprites accepted the command.
    pub fn dispatch(&mut self, direction: Direction) -> usize {
        let mut accepted = 0;
        for sprite in &mut self.sprites {
            if sprite.command(direction) {
                accepted += 1;
            }
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Rect;
    use crate::testing::{Call, RecordingBackend};

    fn world() -> World<u32> {
        World::new(640, 480, TextureCache::new("assets"))
    }

    #[test]
    fn spawn_shares_textures_between_sprites() {
        let mut backend = RecordingBackend::new();
        let mut world = world();
        let a = world.spawn(&mut backend, "test.bmp", Vec2::ONE, Motion::default(), None);
        let b = world.spawn(&mut backend, "test.bmp", Vec2::ZERO, Motion::default(), None);

        assert_eq!(backend.load_count(), 1);
        assert_eq!(
            world.sprite(a).and_then(Sprite::texture),
            world.sprite(b).and_then(Sprite::texture)
        );
    }

    #[test]
    fn missing_texture_spawns_invalid_sprite_that_never_draws() {
        let mut backend = RecordingBackend::with_missing(&["ghost.bmp"]);
        let mut world = world();
        world.spawn(&mut backend, "ghost.bmp", Vec2::ONE, Motion::default(), None);
        world.spawn(&mut backend, "test.bmp", Vec2::ONE, Motion::default(), None);
        backend.take_calls();

        for _ in 0..3 {
            assert_eq!(world.draw(&mut backend), 1);
            world.update(0.1);
        }

        let copies = backend.copies();
        assert_eq!(copies.len(), 3);
        assert!(!world.sprites()[0].is_valid());
    }

    #[test]
    fn missing_texture_is_loaded_once_for_many_spawns() {
        let mut backend = RecordingBackend::with_missing(&["test.bmp"]);
        let mut world = world();
        for i in 0..10 {
            let pos = Vec2::new(10.0 * i as f32, 10.0);
            world.spawn(&mut backend, "test.bmp", pos, Motion::default(), None);
        }

        assert_eq!(backend.load_count(), 1);
        assert_eq!(world.sprites().len(), 10);
        assert!(world.sprites().iter().all(|s| !s.is_valid()));
    }

    #[test]
    fn draw_runs_in_insertion_order() {
        let mut backend = RecordingBackend::new();
        let mut world = world();
        world.spawn(&mut backend, "test.bmp", Vec2::new(10.0, 0.0), Motion::STILL, None);
        world.spawn(&mut backend, "bot.bmp", Vec2::new(20.0, 0.0), Motion::STILL, None);
        world.spawn(&mut backend, "test.bmp", Vec2::new(30.0, 0.0), Motion::STILL, None);
        backend.take_calls();

        world.draw(&mut backend);
        let xs: Vec<i32> = backend.copies().iter().map(|(_, _, dest)| dest.x).collect();
        assert_eq!(xs, vec![10, 20, 30]);
    }

    #[test]
    fn dispatch_reaches_only_controllable_sprites() {
        let mut backend = RecordingBackend::new();
        let mut world = world();
        let start = Vec2::new(50.0, 50.0);
        let drifting = world.spawn(&mut backend, "test.bmp", start, Motion::STILL, None);
        let player = world.spawn(
            &mut backend,
            "bot.bmp",
            Vec2::new(50.0, 50.0),
            Motion::STILL,
            Some(Control::default()),
        );

        assert_eq!(world.dispatch(Direction::Right), 1);
        assert_eq!(world.sprite(drifting).map(|s| s.position), Some(Vec2::new(50.0, 50.0)));
        assert_eq!(world.sprite(player).map(|s| s.position), Some(Vec2::new(60.0, 50.0)));
        assert_eq!(world.controllable().count(), 1);
    }

    #[test]
    fn spawn_all_builds_sprites_from_specs() {
        let mut backend = RecordingBackend::new();
        let mut world = world();
        let config = crate::config::GameConfig::default();
        world.spawn_all(&mut backend, &config.sprites);

        assert_eq!(world.sprites().len(), config.sprites.len());
        assert_eq!(world.textures().len(), 2);
        assert_eq!(world.controllable().count(), 1);
        assert!(backend
            .calls
            .iter()
            .all(|c| matches!(c, Call::Load(_))));
    }

    #[test]
    fn update_uses_world_bounds() {
        let mut world = world();
        let index = world.add(Sprite::new(
            None,
            Vec2::new(635.0, 10.0),
            Motion::STILL.with_velocity(Vec2::new(10.0, 0.0)),
        ));
        world.update(1.0);
        assert_eq!(world.sprite(index).map(|s| s.velocity.x), Some(-10.0));
        assert_eq!(
            world.sprite(index).map(Sprite::dest),
            Some(Rect::new(635, 10, 20, 20)),
            "dest only refreshes on draw"
        );
    }
}
