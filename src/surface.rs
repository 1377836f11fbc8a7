//! Drawing surface abstraction.
//!
//! Mirrors the handful of canvas operations the renderer needs so the
//! same draw pass can target an SVG document or a test recorder.

use tiny_skia::Transform;

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    /// Alternating dash and gap lengths; empty for a solid line.
    pub dash: Vec<f64>,
    pub cap: LineCap,
    pub color: String,
    pub alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    Top,
    Middle,
    #[default]
    Alphabetic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// CSS font family list, already quoted where needed.
    pub font: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub color: String,
    pub alpha: f64,
}

pub trait Surface {
    /// Size in device pixels.
    fn size(&self) -> (u32, u32);

    /// Replace the current user-space to device transform.
    fn set_transform(&mut self, transform: Transform);

    /// Drop everything drawn so far, leaving a transparent surface.
    fn clear(&mut self);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);

    fn begin_path(&mut self);

    fn move_to(&mut self, point: Point);

    fn line_to(&mut self, point: Point);

    /// Stroke the current path. The path is kept until the next
    /// [`Surface::begin_path`].
    fn stroke(&mut self, style: &StrokeStyle);

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle);
}
