//! Input classification for the player demo.
//!
//! Platform events are reduced to a tiny command vocabulary before they reach
//! the simulation: a quit request or one of four movement directions.
//!
//! - **Keys:** W/A/S/D map to Up/Left/Down/Right, Escape quits.
//! - **Mouse motion:** the axis with the larger relative motion wins and its
//!   sign picks the direction. Screen y grows downward, so moving the mouse up
//!   produces `Direction::Up`.
//!
//! Commands collected between two ticks are queued in an `InputQueue` and
//! drained by the driver at the start of the next tick.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Screen-space offset of `step` pixels in this direction.
    pub fn offset(self, step: f32) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -step),
            Self::Down => Vec2::new(0.0, step),
            Self::Left => Vec2::new(-step, 0.0),
            Self::Right => Vec2::new(step, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Quit,
    Move(Direction),
}

pub fn classify_key(key: Key) -> Option<InputCommand> {
    match key {
        Key::W => Some(InputCommand::Move(Direction::Up)),
        Key::A => Some(InputCommand::Move(Direction::Left)),
        Key::S => Some(InputCommand::Move(Direction::Down)),
        Key::D => Some(InputCommand::Move(Direction::Right)),
        Key::Escape => Some(InputCommand::Quit),
        Key::Other => None,
    }
}

/// Map relative mouse motion to a direction by its dominant axis.
/// Ties go to the horizontal axis.
pub fn classify_motion(dx: f64, dy: f64) -> Option<InputCommand> {
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let direction = if dx.abs() >= dy.abs() {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(InputCommand::Move(direction))
}

/// Turns absolute cursor positions into relative motion. The first sample
/// only primes the tracker.
#[derive(Debug, Default)]
pub struct MouseTracker {
    last: Option<(f64, f64)>,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moved_to(&mut self, x: f64, y: f64) -> Option<InputCommand> {
        let previous = self.last.replace((x, y))?;
        classify_motion(x - previous.0, y - previous.1)
    }

    /// Forget the last position, e.g. when the cursor leaves the window.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[derive(Debug, Default)]
pub struct InputQueue {
    pending: Vec<InputCommand>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: InputCommand) {
        self.pending.push(command);
    }

    pub fn push_key(&mut self, key: Key) {
        if let Some(command) = classify_key(key) {
            self.pending.push(command);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, InputCommand> {
        self.pending.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wasd_maps_to_directions() {
        assert_eq!(
            classify_key(Key::W),
            Some(InputCommand::Move(Direction::Up))
        );
        assert_eq!(
            classify_key(Key::A),
            Some(InputCommand::Move(Direction::Left))
        );
        assert_eq!(
            classify_key(Key::S),
            Some(InputCommand::Move(Direction::Down))
        );
        assert_eq!(
            classify_key(Key::D),
            Some(InputCommand::Move(Direction::Right))
        );
    }

    #[test]
    fn test_escape_is_quit_and_other_keys_are_ignored() {
        assert_eq!(classify_key(Key::Escape), Some(InputCommand::Quit));
        assert_eq!(classify_key(Key::Other), None);
    }

    #[test]
    fn test_motion_uses_dominant_axis() {
        assert_eq!(
            classify_motion(5.0, -2.0),
            Some(InputCommand::Move(Direction::Right))
        );
        assert_eq!(
            classify_motion(-7.0, 3.0),
            Some(InputCommand::Move(Direction::Left))
        );
        assert_eq!(
            classify_motion(1.0, 4.0),
            Some(InputCommand::Move(Direction::Down))
        );
        assert_eq!(
            classify_motion(0.5, -4.0),
            Some(InputCommand::Move(Direction::Up))
        );
    }

    #[test]
    fn test_motion_tie_prefers_horizontal() {
        assert_eq!(
            classify_motion(-3.0, 3.0),
            Some(InputCommand::Move(Direction::Left))
        );
    }

    #[test]
    fn test_zero_motion_is_no_command() {
        assert_eq!(classify_motion(0.0, 0.0), None);
    }

    #[test]
    fn test_mouse_tracker_first_sample_only_primes() {
        let mut tracker = MouseTracker::new();
        assert_eq!(tracker.moved_to(100.0, 100.0), None);
        assert_eq!(
            tracker.moved_to(100.0, 90.0),
            Some(InputCommand::Move(Direction::Up))
        );
        assert_eq!(
            tracker.moved_to(120.0, 95.0),
            Some(InputCommand::Move(Direction::Right))
        );
    }

    #[test]
    fn test_mouse_tracker_reset_reprimes() {
        let mut tracker = MouseTracker::new();
        tracker.moved_to(0.0, 0.0);
        tracker.reset();
        // A jump after leaving the window must not turn into a command.
        assert_eq!(tracker.moved_to(500.0, 0.0), None);
    }

    #[test]
    fn test_direction_offsets_are_screen_space() {
        assert_eq!(Direction::Up.offset(10.0), Vec2::new(0.0, -10.0));
        assert_eq!(Direction::Down.offset(10.0), Vec2::new(0.0, 10.0));
        assert_eq!(Direction::Left.offset(10.0), Vec2::new(-10.0, 0.0));
        assert_eq!(Direction::Right.offset(10.0), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = InputQueue::new();
        queue.push_key(Key::D);
        queue.push_key(Key::Other);
        queue.push(InputCommand::Quit);
        assert_eq!(queue.len(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![InputCommand::Move(Direction::Right), InputCommand::Quit]
        );
        assert!(queue.is_empty());
    }
}
