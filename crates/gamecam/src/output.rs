use crate::{Color, Picture, Rect, Vec2};

/// A drawing surface addressed in its own native coordinates.
///
/// Implementations own any failure reporting for the primitives; callers
/// (including [`crate::Camera`]) never inspect results.
pub trait VideoOutput {
    /// The drawable area in native coordinates. Queried on demand, so a
    /// resized surface reports its new bounds immediately.
    fn output_rect(&self) -> Rect;

    fn draw_point(&mut self, point: Vec2, color: Color);

    fn draw_line(&mut self, a: Vec2, b: Vec2, thickness: f32, color: Color);

    /// `thickness <= 0` fills the polygon; otherwise the closed outline is stroked.
    fn draw_polygon(&mut self, points: &[Vec2], thickness: f32, color: Color);

    /// `thickness <= 0` fills the rect; otherwise an inward border is drawn.
    fn draw_rect(&mut self, rect: Rect, thickness: f32, color: Color);

    /// Negative rect extents mirror the picture along that axis.
    fn draw_picture(&mut self, rect: Rect, picture: &Picture);
}
