//! Demo configuration.
//!
//! Every demo has a complete built-in configuration, so no file is required.
//! When `firstgame.json` exists, its fields override the defaults of the demo
//! it selects:
//!
//! ```json
//! { "demo": "drift", "width": 800, "limit": { "duration": 5.0 } }
//! ```

use glam::Vec2;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::driver::RunLimit;
use crate::sprite::{Motion, DEFAULT_ACCELERATION, DEFAULT_VELOCITY};
use crate::time::FrameClock;

pub const DEFAULT_CONFIG_PATH: &str = "firstgame.json";
pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;
pub const DEFAULT_ASSET_ROOT: &str = "assets";
pub const SPRITE_TEXTURE: &str = "test.bmp";
pub const PLAYER_TEXTURE: &str = "bot.bmp";

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DemoMode {
    /// One pixel per tick, fixed tick budget.
    Bounce,
    /// Delta-time integration, fixed wall-clock budget.
    Drift,
    /// Keyboard and mouse control, runs until quit.
    #[default]
    Player,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SpriteSpec {
    pub texture: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub velocity: Option<[f32; 2]>,
    #[serde(default)]
    pub acceleration: Option<[f32; 2]>,
    #[serde(default)]
    pub controllable: bool,
}

impl SpriteSpec {
    fn new(texture: &str, x: f32, y: f32) -> Self {
        Self {
            texture: texture.to_string(),
            x,
            y,
            velocity: None,
            acceleration: None,
            controllable: false,
        }
    }

    fn moving(mut self, velocity: [f32; 2], acceleration: [f32; 2]) -> Self {
        self.velocity = Some(velocity);
        self.acceleration = Some(acceleration);
        self
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn motion(&self) -> Motion {
        Motion {
            velocity: self.velocity.map_or(DEFAULT_VELOCITY, Vec2::from),
            acceleration: self.acceleration.map_or(DEFAULT_ACCELERATION, Vec2::from),
        }
    }
}

/// On-disk shape; every field is optional and falls back to the demo default.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub demo: DemoMode,
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub asset_root: Option<String>,
    pub fixed_dt: Option<f32>,
    pub limit: Option<RunLimit>,
    pub sprites: Option<Vec<SpriteSpec>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub asset_root: PathBuf,
    pub demo: DemoMode,
    pub fixed_dt: Option<f32>,
    pub limit: RunLimit,
    pub sprites: Vec<SpriteSpec>,
}

impl GameConfig {
    pub fn for_demo(demo: DemoMode) -> Self {
        let (title, fixed_dt, limit, sprites) = match demo {
            DemoMode::Bounce => (
                "firstgame: bounce",
                Some(1.0),
                RunLimit::Ticks(10_000),
                (0..10)
                    .map(|_| {
                        SpriteSpec::new(SPRITE_TEXTURE, 10.0, 10.0).moving([1.0, 1.0], [0.0, 0.0])
                    })
                    .collect::<Vec<_>>(),
            ),
            DemoMode::Drift => (
                "firstgame: drift",
                None,
                RunLimit::Duration(10.0),
                drifting_sprites(),
            ),
            DemoMode::Player => {
                let mut sprites = drifting_sprites();
                let mut player =
                    SpriteSpec::new(PLAYER_TEXTURE, 320.0, 240.0).moving([0.0, 0.0], [0.0, 0.0]);
                player.controllable = true;
                sprites.push(player);
                ("firstgame: player", None, RunLimit::UntilQuit, sprites)
            }
        };

        Self {
            title: title.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            demo,
            fixed_dt,
            limit,
            sprites,
        }
    }

    pub fn from_file(file: ConfigFile) -> Self {
        let mut config = Self::for_demo(file.demo);
        if let Some(title) = file.title {
            config.title = title;
        }
        if let Some(width) = file.width {
            config.width = width;
        }
        if let Some(height) = file.height {
            config.height = height;
        }
        if let Some(root) = file.asset_root {
            config.asset_root = PathBuf::from(root);
        }
        if file.fixed_dt.is_some() {
            config.fixed_dt = file.fixed_dt;
        }
        if let Some(limit) = file.limit {
            config.limit = limit;
        }
        if let Some(sprites) = file.sprites {
            config.sprites = sprites;
        }
        config
    }

    /// Load `path` if it exists, otherwise use the default demo.
    pub fn resolve(path: &Path) -> Result<Self, String> {
        if path.exists() {
            let config = load_config_from_path(path)?;
            log::info!("Loaded config '{}' ({:?})", path.display(), config.demo);
            Ok(config)
        } else {
            log::info!(
                "No config at '{}', using built-in {:?} demo",
                path.display(),
                DemoMode::default()
            );
            Ok(Self::default())
        }
    }

    pub fn frame_clock(&self) -> FrameClock {
        match self.fixed_dt {
            Some(dt) => FrameClock::fixed(dt),
            None => FrameClock::new(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_demo(DemoMode::default())
    }
}

fn drifting_sprites() -> Vec<SpriteSpec> {
    vec![
        SpriteSpec::new(SPRITE_TEXTURE, 100.0, 100.0),
        SpriteSpec::new(SPRITE_TEXTURE, 320.0, 60.0).moving([40.0, 0.0], [0.0, 30.0]),
        SpriteSpec::new(SPRITE_TEXTURE, 500.0, 300.0).moving([-25.0, -60.0], [0.0, 20.0]),
    ]
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let file: ConfigFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    let config = GameConfig::from_file(file);
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.width == 0 || config.height == 0 {
        return Err(format!(
            "Config validation failed: window size {}x{} must be non-zero",
            config.width, config.height
        ));
    }
    if let Some(dt) = config.fixed_dt {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(format!(
                "Config validation failed: fixed_dt must be > 0, got {dt}"
            ));
        }
    }
    match config.limit {
        RunLimit::Ticks(0) => {
            return Err("Config validation failed: tick limit must be > 0".to_string());
        }
        RunLimit::Duration(secs) if !(secs > 0.0 && secs.is_finite()) => {
            return Err(format!(
                "Config validation failed: duration must be > 0, got {secs}"
            ));
        }
        _ => {}
    }
    if config.sprites.is_empty() {
        log::warn!("Config has no sprites. The window will stay empty.");
    }
    for (index, sprite) in config.sprites.iter().enumerate() {
        if sprite.texture.trim().is_empty() {
            return Err(format!(
                "Config validation failed: sprite {index} has an empty texture name"
            ));
        }
    }
    Ok(())
}
