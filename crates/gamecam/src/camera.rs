use thiserror::Error;

use crate::{Color, Picture, Rect, Vec2, VideoOutput};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CameraError {
    #[error("camera zoom components must be finite and non-zero, got ({x}, {y})")]
    InvalidZoom { x: f32, y: f32 },
}

/// Moves and zooms the view of a [`VideoOutput`].
///
/// Points are transformed between game space, the coordinates game logic
/// works in, and display space, the native coordinates of the output.
/// `center` is the game-space point that lands on the center of the output,
/// and `zoom` scales each axis; a negative component flips that axis.
///
/// The output is borrowed exclusively for the camera's lifetime and its
/// rectangle is re-read on every projection, so resizes need no bookkeeping.
///
/// Unprojection divides by `zoom`. A zero component yields non-finite
/// coordinates rather than an error; use [`Camera::set_zoom`] to reject such
/// values up front.
pub struct Camera<'a, O: VideoOutput + ?Sized> {
    pub center: Vec2,
    pub zoom: Vec2,
    output: &'a mut O,
}

impl<'a, O: VideoOutput + ?Sized> Camera<'a, O> {
    pub fn new(center: Vec2, zoom: Vec2, output: &'a mut O) -> Self {
        Self {
            center,
            zoom,
            output,
        }
    }

    /// Sets `zoom` after checking both components are finite and non-zero.
    /// On error the previous zoom is kept.
    pub fn set_zoom(&mut self, zoom: Vec2) -> Result<(), CameraError> {
        validate_zoom(zoom)?;
        self.zoom = zoom;
        Ok(())
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut *self.output
    }

    /// Transforms a point from game space to display space.
    pub fn project(&self, x: f32, y: f32) -> (f32, f32) {
        let display_center = self.output.output_rect().center();
        (
            (x - self.center.x) * self.zoom.x + display_center.x,
            (y - self.center.y) * self.zoom.y + display_center.y,
        )
    }

    /// Transforms a point from display space to game space.
    pub fn unproject(&self, x: f32, y: f32) -> (f32, f32) {
        let display_center = self.output.output_rect().center();
        (
            (x - display_center.x) / self.zoom.x + self.center.x,
            (y - display_center.y) / self.zoom.y + self.center.y,
        )
    }

    pub fn project_vec(&self, v: Vec2) -> Vec2 {
        let (x, y) = self.project(v.x, v.y);
        Vec2 { x, y }
    }

    pub fn unproject_vec(&self, v: Vec2) -> Vec2 {
        let (x, y) = self.unproject(v.x, v.y);
        Vec2 { x, y }
    }

    /// Transforms a rectangle from game space to display space.
    ///
    /// On a flipped axis the origin is first moved to the opposite corner, so
    /// the result covers the mirrored footprint with the same extent sign as
    /// an unflipped projection.
    pub fn project_rect(&self, rect: Rect) -> Rect {
        let anchored = self.anchor_for_flips(rect);
        let (x, y) = self.project(anchored.x, anchored.y);
        Rect {
            x,
            y,
            w: anchored.w * self.zoom.x,
            h: anchored.h * self.zoom.y,
        }
    }

    /// Transforms a rectangle from display space to game space.
    pub fn unproject_rect(&self, rect: Rect) -> Rect {
        let anchored = self.anchor_for_flips(rect);
        let (x, y) = self.unproject(anchored.x, anchored.y);
        Rect {
            x,
            y,
            w: anchored.w / self.zoom.x,
            h: anchored.h / self.zoom.y,
        }
    }

    fn anchor_for_flips(&self, mut rect: Rect) -> Rect {
        if self.zoom.x < 0.0 {
            rect.x += rect.w;
            rect.w = -rect.w;
        }
        if self.zoom.y < 0.0 {
            rect.y += rect.h;
            rect.h = -rect.h;
        }
        rect
    }
}

impl<O: VideoOutput + ?Sized> VideoOutput for Camera<'_, O> {
    /// The region of game space currently visible on the output.
    fn output_rect(&self) -> Rect {
        self.unproject_rect(self.output.output_rect())
    }

    fn draw_point(&mut self, point: Vec2, color: Color) {
        let point = self.project_vec(point);
        self.output.draw_point(point, color);
    }

    fn draw_line(&mut self, a: Vec2, b: Vec2, thickness: f32, color: Color) {
        let (a, b) = (self.project_vec(a), self.project_vec(b));
        self.output.draw_line(a, b, thickness, color);
    }

    fn draw_polygon(&mut self, points: &[Vec2], thickness: f32, color: Color) {
        let projected: Vec<Vec2> = points.iter().map(|&p| self.project_vec(p)).collect();
        self.output.draw_polygon(&projected, thickness, color);
    }

    fn draw_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        let rect = self.project_rect(rect);
        self.output.draw_rect(rect, thickness, color);
    }

    fn draw_picture(&mut self, rect: Rect, picture: &Picture) {
        let rect = self.project_rect(rect);
        self.output.draw_picture(rect, picture);
    }
}

pub fn validate_zoom(zoom: Vec2) -> Result<(), CameraError> {
    let valid = |c: f32| c.is_finite() && c != 0.0;
    if valid(zoom.x) && valid(zoom.y) {
        Ok(())
    } else {
        Err(CameraError::InvalidZoom {
            x: zoom.x,
            y: zoom.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Point(Vec2, Color),
        Line(Vec2, Vec2, f32, Color),
        Polygon(Vec<Vec2>, f32, Color),
        Rect(Rect, f32, Color),
        Picture(Rect, u32, u32),
    }

    struct RecordingOutput {
        rect: Rect,
        calls: Vec<Call>,
    }

    impl RecordingOutput {
        fn new(rect: Rect) -> Self {
            Self {
                rect,
                calls: Vec::new(),
            }
        }
    }

    impl VideoOutput for RecordingOutput {
        fn output_rect(&self) -> Rect {
            self.rect
        }

        fn draw_point(&mut self, point: Vec2, color: Color) {
            self.calls.push(Call::Point(point, color));
        }

        fn draw_line(&mut self, a: Vec2, b: Vec2, thickness: f32, color: Color) {
            self.calls.push(Call::Line(a, b, thickness, color));
        }

        fn draw_polygon(&mut self, points: &[Vec2], thickness: f32, color: Color) {
            self.calls
                .push(Call::Polygon(points.to_vec(), thickness, color));
        }

        fn draw_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
            self.calls.push(Call::Rect(rect, thickness, color));
        }

        fn draw_picture(&mut self, rect: Rect, picture: &Picture) {
            self.calls
                .push(Call::Picture(rect, picture.width(), picture.height()));
        }
    }

    fn screen_800x600() -> RecordingOutput {
        RecordingOutput::new(Rect::new(0.0, 0.0, 800.0, 600.0))
    }

    fn assert_vec_near(actual: Vec2, expected: Vec2) {
        assert!(
            (actual.x - expected.x).abs() < EPS && (actual.y - expected.y).abs() < EPS,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn assert_rect_near(actual: Rect, expected: Rect) {
        let close = (actual.x - expected.x).abs() < EPS
            && (actual.y - expected.y).abs() < EPS
            && (actual.w - expected.w).abs() < EPS
            && (actual.h - expected.h).abs() < EPS;
        assert!(close, "expected {expected:?}, got {actual:?}");
    }

    #[test]
    fn project_offsets_from_output_center() {
        let mut output = screen_800x600();
        let camera = Camera::new(Vec2::ZERO, Vec2::new(2.0, 2.0), &mut output);

        assert_eq!(camera.project(10.0, 5.0), (420.0, 310.0));
        assert_eq!(camera.unproject(420.0, 310.0), (10.0, 5.0));
    }

    #[test]
    fn identity_camera_leaves_points_unchanged() {
        let mut output = screen_800x600();
        let camera = Camera::new(Vec2::new(400.0, 300.0), Vec2::ONE, &mut output);

        for p in [
            Vec2::new(0.0, 0.0),
            Vec2::new(123.5, -7.25),
            Vec2::new(800.0, 600.0),
        ] {
            assert_eq!(camera.project_vec(p), p);
        }
    }

    #[test]
    fn unproject_inverts_project() {
        let mut output = RecordingOutput::new(Rect::new(-50.0, 20.0, 640.0, 480.0));
        let zooms = [
            Vec2::new(1.0, 1.0),
            Vec2::new(0.25, 3.0),
            Vec2::new(-2.0, 1.5),
            Vec2::new(-0.5, -4.0),
        ];
        for zoom in zooms {
            let camera = Camera::new(Vec2::new(12.0, -3.5), zoom, &mut output);
            for p in [
                Vec2::new(0.0, 0.0),
                Vec2::new(-31.0, 17.5),
                Vec2::new(250.0, 99.0),
            ] {
                assert_vec_near(camera.unproject_vec(camera.project_vec(p)), p);
            }
        }
    }

    #[test]
    fn projection_follows_output_resize() {
        let mut output = screen_800x600();
        let mut camera = Camera::new(Vec2::ZERO, Vec2::ONE, &mut output);
        assert_eq!(camera.project(0.0, 0.0), (400.0, 300.0));

        camera.output_mut().rect = Rect::new(0.0, 0.0, 1024.0, 768.0);
        assert_eq!(camera.project(0.0, 0.0), (512.0, 384.0));
    }

    #[test]
    fn project_rect_reanchors_flipped_axis() {
        let mut output = screen_800x600();
        let camera = Camera::new(Vec2::ZERO, Vec2::new(-1.0, 1.0), &mut output);

        let projected = camera.project_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_rect_near(projected, Rect::new(390.0, 300.0, 10.0, 10.0));
    }

    #[test]
    fn project_rect_flip_covers_mirrored_footprint() {
        let mut output = screen_800x600();
        let base = Rect::new(390.0, 290.0, 20.0, 20.0);
        let mut camera = Camera::new(Vec2::new(400.0, 300.0), Vec2::new(-1.0, -1.0), &mut output);
        let flipped = camera.project_rect(base).normalized();
        camera.zoom = Vec2::ONE;
        let straight = camera.project_rect(base).normalized();
        assert_rect_near(flipped, straight);

        // Off-center rect lands on the mirror image about the output center.
        let off_center = Rect::new(420.0, 310.0, 30.0, 5.0);
        let straight = camera.project_rect(off_center).normalized();
        camera.zoom = Vec2::new(-1.0, -1.0);
        let flipped = camera.project_rect(off_center);
        assert!(flipped.w > 0.0 && flipped.h > 0.0);
        assert_rect_near(flipped, Rect::new(350.0, 285.0, 30.0, 5.0));
        assert!((flipped.w * flipped.h - straight.w * straight.h).abs() < EPS);
    }

    #[test]
    fn unproject_rect_inverts_project_rect() {
        let mut output = screen_800x600();
        let rect = Rect::new(-8.0, 4.0, 16.0, -6.0);
        for zoom in [
            Vec2::new(3.0, 0.5),
            Vec2::new(-3.0, 0.5),
            Vec2::new(-1.0, -2.0),
        ] {
            let camera = Camera::new(Vec2::new(1.0, 2.0), zoom, &mut output);
            assert_rect_near(camera.unproject_rect(camera.project_rect(rect)), rect);
        }
    }

    #[test]
    fn output_rect_is_visible_game_region() {
        let mut output = screen_800x600();
        let camera = Camera::new(Vec2::new(100.0, 50.0), Vec2::new(2.0, 2.0), &mut output);

        assert_rect_near(camera.output_rect(), Rect::new(-100.0, -100.0, 400.0, 300.0));
    }

    #[test]
    fn output_rect_with_flipped_axis_keeps_positive_extent() {
        let mut output = screen_800x600();
        let camera = Camera::new(Vec2::ZERO, Vec2::new(-2.0, 1.0), &mut output);

        let visible = camera.output_rect();
        assert_rect_near(visible, Rect::new(-200.0, -300.0, 400.0, 600.0));
    }

    #[test]
    fn zero_zoom_unproject_is_non_finite() {
        let mut output = screen_800x600();
        let camera = Camera::new(Vec2::ZERO, Vec2::new(0.0, 1.0), &mut output);

        let (x, y) = camera.unproject(401.0, 300.0);
        assert!(!x.is_finite());
        assert_eq!(y, 0.0);
    }

    #[test]
    fn set_zoom_rejects_zero_and_non_finite() {
        let mut output = screen_800x600();
        let mut camera = Camera::new(Vec2::ZERO, Vec2::ONE, &mut output);

        assert_eq!(
            camera.set_zoom(Vec2::new(0.0, 2.0)),
            Err(CameraError::InvalidZoom { x: 0.0, y: 2.0 })
        );
        assert!(camera.set_zoom(Vec2::new(1.0, f32::NAN)).is_err());
        assert!(camera.set_zoom(Vec2::new(f32::INFINITY, 1.0)).is_err());
        assert_eq!(camera.zoom, Vec2::ONE);

        camera.set_zoom(Vec2::new(-3.0, 0.5)).expect("valid zoom");
        assert_eq!(camera.zoom, Vec2::new(-3.0, 0.5));
    }

    #[test]
    fn draw_calls_forward_projected_geometry() {
        let mut output = screen_800x600();
        let red = Color::rgb(255, 0, 0);
        let picture = Picture::solid(4, 2, Color::WHITE);
        {
            let mut camera = Camera::new(Vec2::ZERO, Vec2::new(2.0, 2.0), &mut output);
            camera.draw_point(Vec2::new(10.0, 5.0), red);
            camera.draw_line(Vec2::ZERO, Vec2::new(1.0, -1.0), 3.0, red);
            camera.draw_rect(Rect::new(0.0, 0.0, 5.0, 5.0), 0.0, red);
            camera.draw_picture(Rect::new(-2.0, -1.0, 4.0, 2.0), &picture);
        }

        assert_eq!(
            output.calls,
            vec![
                Call::Point(Vec2::new(420.0, 310.0), red),
                Call::Line(Vec2::new(400.0, 300.0), Vec2::new(402.0, 298.0), 3.0, red),
                Call::Rect(Rect::new(400.0, 300.0, 10.0, 10.0), 0.0, red),
                Call::Picture(Rect::new(396.0, 298.0, 8.0, 4.0), 4, 2),
            ]
        );
    }

    #[test]
    fn draw_polygon_preserves_vertex_order_and_count() {
        let mut output = screen_800x600();
        let blue = Color::rgb(0, 0, 255);
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(3.0, 2.0),
            Vec2::new(-1.0, 4.0),
            Vec2::new(0.0, 0.0),
        ];
        let expected: Vec<Vec2> = {
            let camera = Camera::new(Vec2::new(1.0, 1.0), Vec2::new(-2.0, 3.0), &mut output);
            points.iter().map(|&p| camera.project_vec(p)).collect()
        };
        {
            let mut camera = Camera::new(Vec2::new(1.0, 1.0), Vec2::new(-2.0, 3.0), &mut output);
            camera.draw_polygon(&points, 1.5, blue);
        }

        assert_eq!(output.calls, vec![Call::Polygon(expected, 1.5, blue)]);
        assert_eq!(points[1], Vec2::new(3.0, 0.0));
    }

    #[test]
    fn cameras_compose_over_each_other() {
        let mut output = screen_800x600();
        {
            let mut outer = Camera::new(Vec2::ZERO, Vec2::new(2.0, 2.0), &mut output);
            // The outer camera's game space is the inner camera's display space.
            let inner_view = outer.output_rect();
            assert_rect_near(inner_view, Rect::new(-200.0, -150.0, 400.0, 300.0));

            let mut inner = Camera::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0), &mut outer);
            assert_vec_near(inner.project_vec(Vec2::new(5.0, 5.0)), Vec2::ZERO);
            inner.draw_point(Vec2::new(6.0, 5.0), Color::WHITE);
        }

        assert_eq!(
            output.calls,
            vec![Call::Point(Vec2::new(420.0, 300.0), Color::WHITE)]
        );
    }
}
