//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;

/// Default minimum zoom level.
pub const MIN_ZOOM: f64 = 0.1;
/// Default maximum zoom level.
pub const MAX_ZOOM: f64 = 3.0;

/// Convert a screen point to world coordinates for the given zoom and pan offset.
///
/// `world = (screen - pan) / zoom`
pub fn to_world(screen: Point, zoom: f64, pan: Vec2) -> Point {
    Point::new((screen.x - pan.x) / zoom, (screen.y - pan.y) / zoom)
}

/// Convert a world point to screen coordinates for the given zoom and pan offset.
///
/// `screen = world * zoom + pan`
pub fn to_screen(world: Point, zoom: f64, pan: Vec2) -> Point {
    Point::new(world.x * zoom + pan.x, world.y * zoom + pan.y)
}

/// Camera manages the view transform for the canvas.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom level.
    zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera using the zoom limits from an editor config.
    pub fn from_config(config: &EditorConfig) -> Self {
        let mut camera = Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        };
        camera.set_zoom(config.initial_zoom);
        camera
    }

    /// Current zoom level, always within `[min_zoom, max_zoom]`.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        to_world(screen_point, self.zoom, self.offset)
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        to_screen(world_point, self.zoom, self.offset)
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Set the pan offset directly.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Set the zoom level, clamped to the allowed range.
    ///
    /// A non-finite zoom is ignored and the current level kept.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() {
            log::warn!("Ignoring non-finite zoom {}", zoom);
            return;
        }
        self.zoom = zoom.max(self.min_zoom).min(self.max_zoom);
    }

    /// Change the zoom level by an additive delta, clamped to the allowed range.
    ///
    /// The offset is left untouched, so the world origin stays fixed on screen.
    /// Returns the new zoom level.
    pub fn zoom_by(&mut self, delta: f64) -> f64 {
        self.set_zoom(self.zoom + delta);
        self.zoom
    }
}
