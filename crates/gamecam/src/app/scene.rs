use crate::{Frame, Vec2};

use super::input::ActionStates;
use super::InputAction;

/// Input gathered between two simulation ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    cursor_position_px: Option<Vec2>,
    zoom_delta_steps: i32,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        quit_requested: bool,
        actions: ActionStates,
        cursor_position_px: Option<Vec2>,
        zoom_delta_steps: i32,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            quit_requested,
            actions,
            cursor_position_px,
            zoom_delta_steps,
            window_width,
            window_height,
        }
    }

    /// Builds a snapshot directly, for driving scenes without a window.
    pub fn with_state(
        held: &[InputAction],
        pressed: &[InputAction],
        cursor_position_px: Option<Vec2>,
        zoom_delta_steps: i32,
        window_size: (u32, u32),
    ) -> Self {
        let mut actions = ActionStates::default();
        for &action in pressed {
            actions.set(action, true);
            actions.set(action, false);
        }
        for &action in held {
            actions.set(action, true);
        }
        Self::new(
            pressed.contains(&InputAction::Quit),
            actions,
            cursor_position_px,
            zoom_delta_steps,
            window_size.0,
            window_size.1,
        )
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.actions.was_pressed(action)
    }

    /// Cursor position in window pixels, `None` while the cursor is outside.
    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    /// Positive steps zoom in, negative zoom out.
    pub fn zoom_delta_steps(&self) -> i32 {
        self.zoom_delta_steps
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

pub trait Scene {
    fn load(&mut self) {}
    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand;
    fn render(&mut self, frame: &mut Frame<'_>);
    fn title(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_state_marks_pressed_and_held_actions() {
        let snapshot = InputSnapshot::with_state(
            &[InputAction::PanUp],
            &[InputAction::FlipY, InputAction::Quit],
            Some(Vec2::new(3.0, 4.0)),
            -2,
            (640, 480),
        );

        assert!(snapshot.is_down(InputAction::PanUp));
        assert!(snapshot.was_pressed(InputAction::PanUp));
        assert!(snapshot.was_pressed(InputAction::FlipY));
        assert!(!snapshot.is_down(InputAction::FlipY));
        assert!(snapshot.quit_requested());
        assert_eq!(snapshot.zoom_delta_steps(), -2);
        assert_eq!(snapshot.window_size(), (640, 480));
        assert_eq!(snapshot.cursor_position_px(), Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn empty_snapshot_has_no_input() {
        let snapshot = InputSnapshot::empty();
        assert!(!snapshot.quit_requested());
        assert!(!snapshot.was_pressed(InputAction::ResetView));
        assert_eq!(snapshot.cursor_position_px(), None);
    }
}
