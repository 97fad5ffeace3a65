//! Pointer input state: events, held buttons and double-click detection.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

impl PointerEvent {
    /// Screen position carried by the event.
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Scroll { position, .. } => *position,
        }
    }
}

/// Double-click detection defaults.
const DOUBLE_CLICK_TIME_MS: u64 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tracks pointer state across events.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Currently pressed mouse buttons.
    pressed_buttons: HashSet<MouseButton>,
    /// Last click time for double-click detection.
    last_click_time: Option<Instant>,
    /// Last click position for double-click detection.
    last_click_position: Option<Point>,
    /// Whether the most recent press completed a double-click.
    double_click_detected: bool,
    double_click_time: Duration,
    double_click_distance: f64,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            pointer_position: Point::ZERO,
            pressed_buttons: HashSet::new(),
            last_click_time: None,
            last_click_position: None,
            double_click_detected: false,
            double_click_time: Duration::from_millis(DOUBLE_CLICK_TIME_MS),
            double_click_distance: DOUBLE_CLICK_DISTANCE,
        }
    }
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the double-click thresholds.
    pub fn with_double_click(mut self, time: Duration, distance: f64) -> Self {
        self.double_click_time = time;
        self.double_click_distance = distance;
        self
    }

    /// Process a pointer event received now.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        self.handle_pointer_event_at(event, Instant::now());
    }

    /// Process a pointer event received at `now`.
    pub fn handle_pointer_event_at(&mut self, event: &PointerEvent, now: Instant) {
        self.pointer_position = event.position();
        match *event {
            PointerEvent::Down { position, button } => {
                self.pressed_buttons.insert(button);
                self.double_click_detected = false;
                if button == MouseButton::Left {
                    self.register_click(position, now);
                }
            }
            PointerEvent::Up { button, .. } => {
                self.pressed_buttons.remove(&button);
            }
            PointerEvent::Move { .. } | PointerEvent::Scroll { .. } => {}
        }
    }

    fn register_click(&mut self, position: Point, now: Instant) {
        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position) {
            let elapsed = now.saturating_duration_since(last_time);
            let distance = (position - last_pos).hypot();
            if elapsed < self.double_click_time && distance < self.double_click_distance {
                self.double_click_detected = true;
                // Reset so a third click starts a new pair
                self.last_click_time = None;
                self.last_click_position = None;
                return;
            }
        }
        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
    }

    /// Check if a button is currently pressed.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Whether exactly the primary button is held.
    pub fn only_primary_pressed(&self) -> bool {
        self.pressed_buttons.len() == 1 && self.is_button_pressed(MouseButton::Left)
    }

    /// Check if the latest press completed a double-click.
    pub fn is_double_click(&self) -> bool {
        self.double_click_detected
    }
}
