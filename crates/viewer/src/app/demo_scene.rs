use gamecam::{
    Camera, Color, Frame, InputAction, InputSnapshot, Picture, Rect, Scene, SceneCommand, Vec2,
    VideoOutput,
};
use tracing::{debug, info};

const GRID_STEP: f32 = 1.0;
const GRID_MAJOR_EVERY: i32 = 5;
const MAX_GRID_LINES_PER_AXIS: f32 = 400.0;
const ZOOM_MAGNITUDE_MIN: f32 = 0.5;
const ZOOM_MAGNITUDE_MAX: f32 = 512.0;
const FAN_SPOKES: usize = 12;
const FAN_RADIUS: f32 = 3.0;
const FAN_TURNS_PER_SECOND: f32 = 0.05;
const CHECKER_SIZE: u32 = 8;

const GRID_MINOR_COLOR: Color = Color::rgb(35, 39, 46);
const GRID_MAJOR_COLOR: Color = Color::rgb(52, 58, 70);
const AXIS_X_COLOR: Color = Color::rgb(200, 70, 70);
const AXIS_Y_COLOR: Color = Color::rgb(70, 200, 90);
const FILL_COLOR: Color = Color::rgb(90, 120, 220);
const OUTLINE_COLOR: Color = Color::rgb(240, 200, 80);
const POINT_COLOR: Color = Color::rgb(240, 240, 240);
const FAN_COLOR: Color = Color::rgb(160, 110, 220);
const CURSOR_COLOR: Color = Color::rgb(255, 255, 255);
pub(crate) const CHECKER_LIGHT: Color = Color::rgb(220, 220, 230);
pub(crate) const CHECKER_DARK: Color = Color::rgb(60, 60, 80);

/// Pans, zooms and flips a camera over a fixed set of shapes.
pub(crate) struct DemoScene {
    home_center: Vec2,
    home_zoom: Vec2,
    center: Vec2,
    zoom: Vec2,
    pan_speed: f32,
    zoom_step: f32,
    picture: Picture,
    elapsed_seconds: f32,
    cursor_px: Option<Vec2>,
    cursor_game: Option<Vec2>,
}

impl DemoScene {
    pub(crate) fn new(
        center: Vec2,
        zoom: Vec2,
        pan_speed: f32,
        zoom_step: f32,
        picture: Picture,
    ) -> Self {
        Self {
            home_center: center,
            home_zoom: zoom,
            center,
            zoom,
            pan_speed,
            zoom_step,
            picture,
            elapsed_seconds: 0.0,
            cursor_px: None,
            cursor_game: None,
        }
    }

    pub(crate) fn center(&self) -> Vec2 {
        self.center
    }

    pub(crate) fn zoom(&self) -> Vec2 {
        self.zoom
    }

    pub(crate) fn cursor_game(&self) -> Option<Vec2> {
        self.cursor_game
    }

    fn apply_zoom_steps(&mut self, steps: i32) {
        if steps == 0 {
            return;
        }
        let factor = self.zoom_step.powi(steps);
        self.zoom = Vec2::new(
            scale_zoom_component(self.zoom.x, factor),
            scale_zoom_component(self.zoom.y, factor),
        );
    }

    fn pan_direction(input: &InputSnapshot) -> Vec2 {
        let axis = |positive: InputAction, negative: InputAction| {
            (input.is_down(positive) as i32 - input.is_down(negative) as i32) as f32
        };
        Vec2::new(
            axis(InputAction::PanRight, InputAction::PanLeft),
            axis(InputAction::PanDown, InputAction::PanUp),
        )
    }

    fn draw_grid(camera: &mut Camera<'_, Frame<'_>>, visible: Rect) {
        let min = visible.min();
        let max = visible.max();
        if (max.x - min.x) / GRID_STEP > MAX_GRID_LINES_PER_AXIS
            || (max.y - min.y) / GRID_STEP > MAX_GRID_LINES_PER_AXIS
        {
            return;
        }

        let first_x = (min.x / GRID_STEP).floor() as i32;
        let last_x = (max.x / GRID_STEP).ceil() as i32;
        for ix in first_x..=last_x {
            let x = ix as f32 * GRID_STEP;
            let color = match ix {
                0 => AXIS_Y_COLOR,
                _ if ix.rem_euclid(GRID_MAJOR_EVERY) == 0 => GRID_MAJOR_COLOR,
                _ => GRID_MINOR_COLOR,
            };
            camera.draw_line(Vec2::new(x, min.y), Vec2::new(x, max.y), 1.0, color);
        }

        let first_y = (min.y / GRID_STEP).floor() as i32;
        let last_y = (max.y / GRID_STEP).ceil() as i32;
        for iy in first_y..=last_y {
            let y = iy as f32 * GRID_STEP;
            let color = match iy {
                0 => AXIS_X_COLOR,
                _ if iy.rem_euclid(GRID_MAJOR_EVERY) == 0 => GRID_MAJOR_COLOR,
                _ => GRID_MINOR_COLOR,
            };
            camera.draw_line(Vec2::new(min.x, y), Vec2::new(max.x, y), 1.0, color);
        }
    }

    fn draw_shapes(&self, camera: &mut Camera<'_, Frame<'_>>) {
        let triangle = [
            Vec2::new(4.0, 1.0),
            Vec2::new(8.0, 1.0),
            Vec2::new(4.0, 5.0),
        ];
        camera.draw_polygon(&triangle, 0.0, FILL_COLOR);

        let hexagon: Vec<Vec2> = (0..6)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / 6.0;
                Vec2::new(-6.0 + 2.0 * angle.cos(), 3.0 + 2.0 * angle.sin())
            })
            .collect();
        camera.draw_polygon(&hexagon, 2.0, OUTLINE_COLOR);

        camera.draw_rect(Rect::new(-8.0, -6.0, 4.0, 2.0), 0.0, FILL_COLOR);
        camera.draw_rect(Rect::new(4.0, -6.0, 4.0, 3.0), 2.0, OUTLINE_COLOR);

        for i in 0..8 {
            camera.draw_point(Vec2::new(-3.5 + i as f32, 7.0), POINT_COLOR);
        }

        let phase = self.elapsed_seconds * FAN_TURNS_PER_SECOND * std::f32::consts::TAU;
        let hub = Vec2::new(0.0, -9.0);
        for spoke in 0..FAN_SPOKES {
            let angle = phase + spoke as f32 * std::f32::consts::TAU / FAN_SPOKES as f32;
            let tip = hub + Vec2::new(angle.cos(), angle.sin()) * FAN_RADIUS;
            camera.draw_line(hub, tip, 1.0, FAN_COLOR);
        }

        camera.draw_picture(Rect::new(-2.0, -2.0, 4.0, 4.0), &self.picture);
    }
}

impl Scene for DemoScene {
    fn load(&mut self) {
        info!(
            center_x = self.center.x,
            center_y = self.center.y,
            zoom_x = self.zoom.x,
            zoom_y = self.zoom.y,
            picture_width = self.picture.width(),
            picture_height = self.picture.height(),
            "demo_scene_loaded"
        );
    }

    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if input.quit_requested() {
            return SceneCommand::Quit;
        }
        self.elapsed_seconds += fixed_dt_seconds;
        self.cursor_px = input.cursor_position_px();

        if input.was_pressed(InputAction::ResetView) {
            self.center = self.home_center;
            self.zoom = self.home_zoom;
            debug!("view_reset");
        }
        if input.was_pressed(InputAction::FlipX) {
            self.zoom.x = -self.zoom.x;
            debug!(zoom_x = self.zoom.x, "axis_flipped");
        }
        if input.was_pressed(InputAction::FlipY) {
            self.zoom.y = -self.zoom.y;
            debug!(zoom_y = self.zoom.y, "axis_flipped");
        }
        self.apply_zoom_steps(input.zoom_delta_steps());

        // Direction is in display space; dividing by the signed zoom keeps the
        // on-screen pan speed and direction independent of zoom and flips.
        let direction = Self::pan_direction(input);
        if direction != Vec2::ZERO {
            let step = direction.div_components(self.zoom) * (self.pan_speed * fixed_dt_seconds);
            self.center = self.center + step;
        }

        SceneCommand::None
    }

    fn render(&mut self, frame: &mut Frame<'_>) {
        let mut camera = Camera::new(self.center, self.zoom, frame);
        let visible = camera.output_rect();

        Self::draw_grid(&mut camera, visible);
        self.draw_shapes(&mut camera);

        self.cursor_game = self
            .cursor_px
            .map(|px| camera.unproject_vec(px))
            .filter(|game| visible.contains(*game));
        if let Some(cursor) = self.cursor_game {
            let half = 0.25;
            camera.draw_rect(
                Rect::new(cursor.x - half, cursor.y - half, 2.0 * half, 2.0 * half),
                1.0,
                CURSOR_COLOR,
            );
        }
    }

    fn title(&self) -> Option<String> {
        let (center, zoom) = (self.center(), self.zoom());
        let cursor = match self.cursor_game() {
            Some(p) => format!("({:.2}, {:.2})", p.x, p.y),
            None => "-".to_string(),
        };
        Some(format!(
            "gamecam viewer | center ({:.2}, {:.2}) | zoom ({:.2}, {:.2}) | cursor {cursor}",
            center.x, center.y, zoom.x, zoom.y
        ))
    }
}

/// Scales a zoom component while keeping its sign and bounding its magnitude.
fn scale_zoom_component(component: f32, factor: f32) -> f32 {
    let magnitude = (component.abs() * factor).clamp(ZOOM_MAGNITUDE_MIN, ZOOM_MAGNITUDE_MAX);
    magnitude.copysign(component)
}

pub(crate) fn checker_picture() -> Picture {
    let mut picture = Picture::solid(CHECKER_SIZE, CHECKER_SIZE, CHECKER_LIGHT);
    for y in 0..CHECKER_SIZE {
        for x in 0..CHECKER_SIZE {
            if (x + y) % 2 == 1 {
                picture.set_pixel(x, y, CHECKER_DARK);
            }
        }
    }
    picture
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.5;

    fn scene() -> DemoScene {
        DemoScene::new(Vec2::ZERO, Vec2::new(8.0, 8.0), 16.0, 2.0, checker_picture())
    }

    fn held(actions: &[InputAction]) -> InputSnapshot {
        InputSnapshot::with_state(actions, &[], None, 0, (64, 64))
    }

    fn pressed(actions: &[InputAction]) -> InputSnapshot {
        InputSnapshot::with_state(&[], actions, None, 0, (64, 64))
    }

    fn zoom_steps(steps: i32) -> InputSnapshot {
        InputSnapshot::with_state(&[], &[], None, steps, (64, 64))
    }

    #[test]
    fn pan_speed_is_in_display_pixels() {
        let mut scene = scene();
        scene.update(DT, &held(&[InputAction::PanRight, InputAction::PanUp]));
        // 16 px/s for half a second at 8 px per unit.
        assert_eq!(scene.center(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn pan_follows_screen_direction_when_flipped() {
        let mut scene = scene();
        scene.update(DT, &pressed(&[InputAction::FlipX]));
        assert_eq!(scene.zoom(), Vec2::new(-8.0, 8.0));

        scene.update(DT, &held(&[InputAction::PanRight]));
        assert_eq!(scene.center(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn zoom_steps_scale_and_keep_sign() {
        let mut scene = scene();
        scene.update(DT, &pressed(&[InputAction::FlipY]));
        scene.update(DT, &zoom_steps(2));
        assert_eq!(scene.zoom(), Vec2::new(32.0, -32.0));

        scene.update(DT, &zoom_steps(-3));
        assert_eq!(scene.zoom(), Vec2::new(4.0, -4.0));
    }

    #[test]
    fn zoom_magnitude_is_bounded() {
        let mut scene = scene();
        scene.update(DT, &zoom_steps(-20));
        assert_eq!(scene.zoom(), Vec2::new(ZOOM_MAGNITUDE_MIN, ZOOM_MAGNITUDE_MIN));
        scene.update(DT, &zoom_steps(40));
        assert_eq!(scene.zoom(), Vec2::new(ZOOM_MAGNITUDE_MAX, ZOOM_MAGNITUDE_MAX));
    }

    #[test]
    fn reset_restores_initial_view() {
        let mut scene = scene();
        scene.update(DT, &held(&[InputAction::PanDown]));
        scene.update(DT, &pressed(&[InputAction::FlipX]));
        scene.update(DT, &zoom_steps(1));
        scene.update(DT, &pressed(&[InputAction::ResetView]));
        assert_eq!(scene.center(), Vec2::ZERO);
        assert_eq!(scene.zoom(), Vec2::new(8.0, 8.0));
    }

    #[test]
    fn quit_request_stops_scene() {
        let mut scene = scene();
        assert_eq!(
            scene.update(DT, &pressed(&[InputAction::Quit])),
            SceneCommand::Quit
        );
        assert_eq!(scene.update(DT, &InputSnapshot::empty()), SceneCommand::None);
    }

    fn render(scene: &mut DemoScene) -> Vec<u8> {
        let mut rgba = vec![0u8; 64 * 64 * 4];
        let mut frame = Frame::new(&mut rgba, 64, 64);
        frame.clear(Color::BLACK);
        scene.render(&mut frame);
        rgba
    }

    fn pixel(rgba: &[u8], x: usize, y: usize) -> Color {
        let offset = (y * 64 + x) * 4;
        Color::from_rgba([
            rgba[offset],
            rgba[offset + 1],
            rgba[offset + 2],
            rgba[offset + 3],
        ])
    }

    #[test]
    fn picture_is_drawn_at_camera_center() {
        let mut scene = scene();
        let rgba = render(&mut scene);
        let center = pixel(&rgba, 32, 32);
        assert!(center == CHECKER_LIGHT || center == CHECKER_DARK);

        scene.update(DT, &pressed(&[InputAction::FlipX, InputAction::FlipY]));
        let rgba = render(&mut scene);
        let center = pixel(&rgba, 32, 32);
        assert!(center == CHECKER_LIGHT || center == CHECKER_DARK);
    }

    #[test]
    fn cursor_is_unprojected_into_game_space() {
        let mut scene = scene();
        scene.update(
            DT,
            &InputSnapshot::with_state(&[], &[], Some(Vec2::new(48.0, 16.0)), 0, (64, 64)),
        );
        render(&mut scene);

        assert_eq!(scene.cursor_game(), Some(Vec2::new(2.0, -2.0)));
        let title = scene.title().expect("title");
        assert!(title.contains("cursor (2.00, -2.00)"), "{title}");
    }

    #[test]
    fn cursor_outside_window_is_not_tracked() {
        let mut scene = scene();
        scene.update(
            DT,
            &InputSnapshot::with_state(&[], &[], Some(Vec2::new(80.0, 16.0)), 0, (64, 64)),
        );
        render(&mut scene);

        assert_eq!(scene.cursor_game(), None);
        let title = scene.title().expect("title");
        assert!(title.ends_with("cursor -"), "{title}");
    }

    #[test]
    fn zoomed_out_view_skips_grid_without_panicking() {
        let mut scene = DemoScene::new(
            Vec2::ZERO,
            Vec2::new(ZOOM_MAGNITUDE_MIN, ZOOM_MAGNITUDE_MIN),
            16.0,
            2.0,
            checker_picture(),
        );
        let mut rgba = vec![0u8; 2000 * 10 * 4];
        let mut frame = Frame::new(&mut rgba, 2000, 10);
        scene.render(&mut frame);
    }

    #[test]
    fn checker_alternates_colors() {
        let picture = checker_picture();
        assert_eq!(picture.pixel(0, 0), Some(CHECKER_LIGHT));
        assert_eq!(picture.pixel(1, 0), Some(CHECKER_DARK));
        assert_eq!(picture.pixel(1, 1), Some(CHECKER_LIGHT));
    }
}
