//! firstgame -- sprite demo entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Window and GPU setup
//! happen in `resumed`; if either fails the error is logged and the loop
//! exits, so a `Driver` only ever exists with a working renderer.
//!
//! Between redraws, keyboard and mouse events are classified into commands and
//! queued. Each `RedrawRequested` runs exactly one driver tick with the queued
//! commands; the loop exits once the driver terminates (quit, tick budget, or
//! time budget depending on the demo).

use std::path::Path;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use fg_core::config::{GameConfig, DEFAULT_CONFIG_PATH};
use fg_core::input::{InputCommand, InputQueue, Key, MouseTracker};
use fg_core::{Driver, DriverState, TextureCache, World};
use fg_platform::window::{PlatformConfig, PlatformError};
use fg_render::{RenderError, SpriteRenderer};

#[derive(Debug, thiserror::Error)]
enum InitError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

struct GameState {
    window: Arc<Window>,
    driver: Driver<SpriteRenderer>,
    input: InputQueue,
    mouse: MouseTracker,
}

impl GameState {
    fn new(event_loop: &ActiveEventLoop, config: &GameConfig) -> Result<Self, InitError> {
        let platform = PlatformConfig {
            title: config.title.clone(),
            width: config.width,
            height: config.height,
        };
        let window = fg_platform::window::create_window(event_loop, &platform)?;
        log::info!("Window created: {}x{}", platform.width, platform.height);

        let mut renderer = SpriteRenderer::new(window.clone(), (config.width, config.height))?;
        let mut world = World::new(
            config.width,
            config.height,
            TextureCache::new(config.asset_root.clone()),
        );
        world.spawn_all(&mut renderer, &config.sprites);

        let mut driver = Driver::new(renderer, world, config.frame_clock(), config.limit);
        driver.restart_clock();

        Ok(Self {
            window,
            driver,
            input: InputQueue::new(),
            mouse: MouseTracker::new(),
        })
    }
}

struct App {
    config: GameConfig,
    state: Option<GameState>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match GameState::new(event_loop, &self.config) {
            Ok(state) => {
                log::info!(
                    "Running {:?} demo until {:?}",
                    self.config.demo,
                    self.config.limit
                );
                self.state = Some(state);
            }
            Err(err) => {
                log::error!("Initialization failed: {err}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                state.input.push(InputCommand::Quit);
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.driver.backend_mut().resize(w, h);
                }
            }

            // Key repeat is deliberate: holding a key keeps the player moving.
            WindowEvent::KeyboardInput {
                event,
                is_synthetic,
                ..
            } => {
                if let Some(key) = pressed_key(event.physical_key, event.state, is_synthetic) {
                    state.input.push_key(key);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(command) = state.mouse.moved_to(position.x, position.y) {
                    state.input.push(command);
                }
            }

            WindowEvent::CursorLeft { .. } => {
                state.mouse.reset();
            }

            WindowEvent::RedrawRequested => {
                let status = state.driver.tick(state.input.drain());
                if status == DriverState::Terminated {
                    log::info!(
                        "Exiting after {} ticks ({:.1} fps smoothed)",
                        state.driver.ticks(),
                        state.driver.clock().smoothed_fps
                    );
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}

/// Synthetic presses are sent for keys already held when focus arrives; they
/// are not player input.
fn pressed_key(physical_key: PhysicalKey, state: ElementState, is_synthetic: bool) -> Option<Key> {
    if is_synthetic || state != ElementState::Pressed {
        return None;
    }
    match physical_key {
        PhysicalKey::Code(key_code) => Some(map_key(key_code)),
        PhysicalKey::Unidentified(_) => None,
    }
}

fn map_key(key_code: KeyCode) -> Key {
    match key_code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("firstgame starting...");

    let config = match GameConfig::resolve(Path::new(DEFAULT_CONFIG_PATH)) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            return;
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_core::input::{classify_key, Direction};

    #[test]
    fn wasd_and_escape_map_to_engine_keys() {
        assert_eq!(map_key(KeyCode::KeyW), Key::W);
        assert_eq!(map_key(KeyCode::KeyA), Key::A);
        assert_eq!(map_key(KeyCode::KeyS), Key::S);
        assert_eq!(map_key(KeyCode::KeyD), Key::D);
        assert_eq!(map_key(KeyCode::Escape), Key::Escape);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        assert_eq!(map_key(KeyCode::ArrowUp), Key::Other);
        assert_eq!(classify_key(map_key(KeyCode::Space)), None);
    }

    #[test]
    fn synthetic_presses_are_dropped() {
        let w = PhysicalKey::Code(KeyCode::KeyW);
        assert_eq!(pressed_key(w, ElementState::Pressed, true), None);
        assert_eq!(pressed_key(w, ElementState::Pressed, false), Some(Key::W));
    }

    #[test]
    fn releases_are_dropped() {
        let d = PhysicalKey::Code(KeyCode::KeyD);
        assert_eq!(pressed_key(d, ElementState::Released, false), None);
        assert_eq!(pressed_key(d, ElementState::Released, true), None);
    }

    #[test]
    fn mapped_keys_classify_to_player_commands() {
        assert_eq!(
            classify_key(map_key(KeyCode::KeyS)),
            Some(InputCommand::Move(Direction::Down))
        );
        assert_eq!(
            classify_key(map_key(KeyCode::Escape)),
            Some(InputCommand::Quit)
        );
    }
}
