//! Whiteboard canvas state

use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: &str = "#10b981";
pub const PALETTE: [&str; 4] = ["#10b981", "#3b82f6", "#f43f5e", "#fafafa"];
pub const DEFAULT_BRUSH: u32 = 3;
pub const MIN_BRUSH: u32 = 1;
pub const MAX_BRUSH: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: u32,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone)]
pub struct Whiteboard {
    strokes: Vec<Stroke>,
    color: String,
    brush_size: u32,
    drawing: Option<Stroke>,
}

impl Default for Whiteboard {
    fn default() -> Self {
        Self {
            strokes: Vec::new(),
            color: DEFAULT_COLOR.to_string(),
            brush_size: DEFAULT_BRUSH,
            drawing: None,
        }
    }
}

impl Whiteboard {
    /// Finished strokes, oldest first
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    /// Clamped to `MIN_BRUSH..=MAX_BRUSH`
    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.clamp(MIN_BRUSH, MAX_BRUSH);
    }

    /// Pen down: start a stroke with the current colour and brush
    pub fn begin_stroke(&mut self, at: Point) {
        self.end_stroke();
        self.drawing = Some(Stroke {
            color: self.color.clone(),
            width: self.brush_size,
            points: vec![at],
        });
    }

    /// Pen move; ignored when the pen is up
    pub fn extend_stroke(&mut self, to: Point) {
        if let Some(stroke) = &mut self.drawing {
            stroke.points.push(to);
        }
    }

    /// Pen up
    pub fn end_stroke(&mut self) {
        if let Some(stroke) = self.drawing.take() {
            self.strokes.push(stroke);
        }
    }

    /// Wipe the canvas. Colour and brush survive.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.drawing = None;
    }
}
