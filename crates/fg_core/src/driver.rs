//! The tick loop.
//!
//! One tick, in order:
//!
//!   1. Look at the commands gathered since the last tick. A quit request
//!      terminates the driver immediately; nothing is drawn.
//!   2. Clear, draw every sprite in insertion order, present.
//!   3. Take the frame delta from the clock (or the caller) and update every
//!      sprite with it.
//!   4. Hand each movement command to every controllable sprite.
//!   5. Stop if the run limit has been reached.
//!
//! A `Duration` limit is measured in wall-clock seconds: the uncapped real
//! frame time when the clock drives the tick, or the given delta for
//! `tick_with_dt`. Simulated time can lag behind it when long frames are
//! capped.
//!
//! The driver owns an already-initialized backend. Window and GPU setup happen
//! before a `Driver` exists, so a failed setup never yields a half-built one.

use serde::Deserialize;

use crate::backend::RenderBackend;
use crate::input::InputCommand;
use crate::time::FrameClock;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Terminated,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RunLimit {
    Ticks(u64),
    /// Seconds of wall-clock time.
    Duration(f64),
    UntilQuit,
}

/// Where a tick's delta comes from.
#[derive(Debug, Clone, Copy)]
enum Step {
    Clock,
    Measured(f64),
    Given(f32),
}

pub struct Driver<B: RenderBackend> {
    backend: B,
    world: World<B::Texture>,
    clock: FrameClock,
    limit: RunLimit,
    state: DriverState,
    ticks: u64,
    elapsed: f64,
    wall_elapsed: f64,
}

impl<B: RenderBackend> Driver<B> {
    pub fn new(backend: B, world: World<B::Texture>, clock: FrameClock, limit: RunLimit) -> Self {
        Self {
            backend,
            world,
            clock,
            limit,
            state: DriverState::Running,
            ticks: 0,
            elapsed: 0.0,
            wall_elapsed: 0.0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Wall-clock seconds counted against a `Duration` limit.
    pub fn wall_elapsed(&self) -> f64 {
        self.wall_elapsed
    }

    pub fn world(&self) -> &World<B::Texture> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World<B::Texture> {
        &mut self.world
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Call right before the first tick so setup time is not simulated.
    pub fn restart_clock(&mut self) {
        self.clock.restart();
    }

    pub fn terminate(&mut self) {
        if self.state == DriverState::Running {
            log::info!(
                "Driver terminated after {} ticks ({:.2}s simulated, {:.2}s wall)",
                self.ticks,
                self.elapsed,
                self.wall_elapsed
            );
        }
        self.state = DriverState::Terminated;
    }

    /// Run one tick with the frame delta measured by the clock.
    pub fn tick<I>(&mut self, commands: I) -> DriverState
    where
        I: IntoIterator<Item = InputCommand>,
    {
        self.run_tick(commands, Step::Clock)
    }

    /// Run one tick as if the frame took `measured` wall-clock seconds. The
    /// clock caps or replaces the delta exactly as it would for a real frame.
    pub fn tick_measured<I>(&mut self, commands: I, measured: f64) -> DriverState
    where
        I: IntoIterator<Item = InputCommand>,
    {
        self.run_tick(commands, Step::Measured(measured))
    }

    /// Run one tick with a caller-chosen delta, bypassing the clock.
    pub fn tick_with_dt<I>(&mut self, commands: I, dt: f32) -> DriverState
    where
        I: IntoIterator<Item = InputCommand>,
    {
        self.run_tick(commands, Step::Given(dt))
    }

    fn run_tick<I>(&mut self, commands: I, step: Step) -> DriverState
    where
        I: IntoIterator<Item = InputCommand>,
    {
        if self.state == DriverState::Terminated {
            return self.state;
        }

        let commands: Vec<InputCommand> = commands.into_iter().collect();
        if commands.contains(&InputCommand::Quit) {
            log::info!("Quit requested");
            self.terminate();
            return self.state;
        }

        self.backend.clear();
        self.world.draw(&mut self.backend);
        if let Err(err) = self.backend.present() {
            log::warn!("Present failed: {err}");
        }

        let (dt, wall) = match step {
            Step::Clock => {
                let dt = self.clock.begin_frame();
                (dt, self.clock.real_dt)
            }
            Step::Measured(measured) => (self.clock.advance(measured), measured),
            Step::Given(dt) => (dt, f64::from(dt)),
        };
        self.world.update(dt);
        self.elapsed += f64::from(dt);
        self.wall_elapsed += wall;

        for command in commands {
            if let InputCommand::Move(direction) = command {
                let accepted = self.world.dispatch(direction);
                log::trace!("{:?} -> {} sprites", direction, accepted);
            }
        }

        self.ticks += 1;
        if self.ticks % 600 == 0 {
            log::debug!(
                "tick {}: {:.1} fps ({:.2}ms)",
                self.ticks,
                self.clock.smoothed_fps,
                self.clock.smoothed_frame_time_ms
            );
        }

        let limit_reached = match self.limit {
            RunLimit::Ticks(max) => self.ticks >= max,
            RunLimit::Duration(secs) => self.wall_elapsed >= secs,
            RunLimit::UntilQuit => false,
        };
        if limit_reached {
            log::info!("Run limit {:?} reached", self.limit);
            self.terminate();
        }

        self.state
    }
}
