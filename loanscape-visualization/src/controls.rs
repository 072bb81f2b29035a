//! Mouse driven camera interaction

use crate::camera::Camera;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Camera control modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Rotating,
    Panning,
}

/// Pointer buttons, in browser numbering order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other(u16),
}

impl From<MouseButton> for PointerButton {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::Primary,
            MouseButton::Right => Self::Secondary,
            MouseButton::Middle => Self::Middle,
            MouseButton::Back => Self::Other(3),
            MouseButton::Forward => Self::Other(4),
            MouseButton::Other(id) => Self::Other(id),
        }
    }
}

/// Input delivered to the viewer. Positions are in logical pixels relative
/// to the top-left corner of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerPressed {
        button: PointerButton,
        position: Point2<f32>,
    },
    PointerReleased {
        button: PointerButton,
    },
    PointerMoved {
        position: Point2<f32>,
    },
    /// Vertical scroll in pixels, positive when scrolling down
    Wheel {
        delta_y: f32,
    },
}

/// Camera speeds per pixel of pointer or wheel movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlSettings {
    /// Radians per pixel
    pub rotation_speed: f32,
    /// World units per pixel
    pub pan_speed: f32,
    /// World units per wheel pixel
    pub zoom_speed: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            rotation_speed: 0.005,
            pan_speed: 0.5,
            zoom_speed: 0.1,
        }
    }
}

/// What handling an event did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputResponse {
    pub camera_changed: bool,
    /// The event belongs to the camera controls and should not reach the
    /// overlay or trigger a platform context menu
    pub prevent_default: bool,
}

/// Drag state machine that turns pointer input into camera motion
#[derive(Debug, Clone)]
pub struct InteractionController {
    mode: InteractionMode,
    last_position: Point2<f32>,
    settings: ControlSettings,
}

impl InteractionController {
    pub fn new(settings: ControlSettings) -> Self {
        Self {
            mode: InteractionMode::Idle,
            last_position: Point2::origin(),
            settings,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn settings(&self) -> &ControlSettings {
        &self.settings
    }

    /// Apply one input event to `camera`
    pub fn handle(&mut self, camera: &mut Camera, event: &InputEvent) -> InputResponse {
        match *event {
            InputEvent::PointerPressed { button, position } => {
                match button {
                    PointerButton::Primary => self.mode = InteractionMode::Rotating,
                    PointerButton::Secondary => self.mode = InteractionMode::Panning,
                    _ => {}
                }
                self.last_position = position;
                InputResponse {
                    camera_changed: false,
                    prevent_default: button == PointerButton::Secondary,
                }
            }
            InputEvent::PointerReleased { .. } => {
                self.mode = InteractionMode::Idle;
                InputResponse::default()
            }
            InputEvent::PointerMoved { position } => {
                let delta = position - self.last_position;
                self.last_position = position;

                let camera_changed = match self.mode {
                    InteractionMode::Rotating => {
                        camera.orbit(
                            -delta.x * self.settings.rotation_speed,
                            -delta.y * self.settings.rotation_speed,
                        );
                        true
                    }
                    InteractionMode::Panning => {
                        camera.pan(
                            -delta.x * self.settings.pan_speed,
                            delta.y * self.settings.pan_speed,
                        );
                        true
                    }
                    InteractionMode::Idle => false,
                };

                InputResponse {
                    camera_changed,
                    prevent_default: false,
                }
            }
            InputEvent::Wheel { delta_y } => {
                camera.move_forward(delta_y * self.settings.zoom_speed);
                InputResponse {
                    camera_changed: true,
                    prevent_default: true,
                }
            }
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(ControlSettings::default())
    }
}

/// Pixels scrolled per wheel notch
const LINE_HEIGHT: f32 = 100.0;

/// Converts winit window events into [`InputEvent`]s
#[derive(Debug, Clone)]
pub struct InputTranslator {
    scale_factor: f64,
    cursor: Point2<f32>,
}

impl InputTranslator {
    pub fn new(scale_factor: f64) -> Self {
        Self {
            scale_factor,
            cursor: Point2::origin(),
        }
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// Last known cursor position in logical pixels
    pub fn cursor(&self) -> Point2<f32> {
        self.cursor
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(self.cursor_moved(*position)),
            WindowEvent::MouseInput { state, button, .. } => {
                Some(self.mouse_input(*state, *button))
            }
            WindowEvent::MouseWheel { delta, .. } => Some(self.mouse_wheel(*delta)),
            _ => None,
        }
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> InputEvent {
        let logical = position.to_logical::<f64>(self.scale_factor);
        self.cursor = Point2::new(logical.x as f32, logical.y as f32);
        InputEvent::PointerMoved {
            position: self.cursor,
        }
    }

    pub fn mouse_input(&self, state: ElementState, button: MouseButton) -> InputEvent {
        let button = PointerButton::from(button);
        match state {
            ElementState::Pressed => InputEvent::PointerPressed {
                button,
                position: self.cursor,
            },
            ElementState::Released => InputEvent::PointerReleased { button },
        }
    }

    /// winit reports positive deltas when scrolling up
    pub fn mouse_wheel(&self, delta: MouseScrollDelta) -> InputEvent {
        let delta_y = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
            MouseScrollDelta::PixelDelta(pos) => (-pos.y / self.scale_factor) as f32,
        };
        InputEvent::Wheel { delta_y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, UnitQuaternion, Vector3};

    fn press(button: PointerButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerPressed {
            button,
            position: Point2::new(x, y),
        }
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved {
            position: Point2::new(x, y),
        }
    }

    #[test]
    fn test_press_and_release_modes() {
        let mut controller = InteractionController::default();
        let mut camera = Camera::default();

        controller.handle(&mut camera, &press(PointerButton::Primary, 0.0, 0.0));
        assert_eq!(controller.mode(), InteractionMode::Rotating);

        controller.handle(&mut camera, &press(PointerButton::Secondary, 0.0, 0.0));
        assert_eq!(controller.mode(), InteractionMode::Panning);

        controller.handle(&mut camera, &press(PointerButton::Middle, 0.0, 0.0));
        assert_eq!(controller.mode(), InteractionMode::Panning);

        controller.handle(
            &mut camera,
            &InputEvent::PointerReleased {
                button: PointerButton::Middle,
            },
        );
        assert_eq!(controller.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_idle_move_leaves_camera() {
        let mut controller = InteractionController::default();
        let mut camera = Camera::default();
        let before = camera.position;

        let response = controller.handle(&mut camera, &moved(40.0, 25.0));

        assert!(!response.camera_changed);
        assert_eq!(camera.position, before);
    }

    #[test]
    fn test_horizontal_rotation_yaws_by_delta_times_speed() {
        let mut controller = InteractionController::default();
        let mut camera = Camera::default();
        let start = camera.position;

        controller.handle(&mut camera, &press(PointerButton::Primary, 100.0, 100.0));
        let response = controller.handle(&mut camera, &moved(120.0, 100.0));
        assert!(response.camera_changed);

        let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -20.0 * 0.005);
        let expected = yaw * start.coords;
        assert_relative_eq!(camera.position.coords, expected, epsilon = 1e-3);

        let to_origin = (Point3::origin() - camera.position).normalize();
        assert_relative_eq!(camera.forward(), to_origin, epsilon = 1e-5);
    }

    #[test]
    fn test_vertical_rotation_pitches_about_right_axis() {
        let mut controller = InteractionController::default();
        let mut camera = Camera::default();
        let start = camera.position;
        let right = camera.right();

        controller.handle(&mut camera, &press(PointerButton::Primary, 0.0, 0.0));
        controller.handle(&mut camera, &moved(0.0, 10.0));

        let angle = start.coords.angle(&camera.position.coords);
        assert_relative_eq!(angle, 10.0 * 0.005, epsilon = 1e-4);
        assert_relative_eq!(camera.position.coords.dot(&right), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_pan_translates_without_reaiming() {
        let mut controller = InteractionController::default();
        let mut camera = Camera::default();
        let start = camera.position;
        let orientation = camera.orientation;
        let right = camera.right();
        let up = camera.up_axis();

        controller.handle(&mut camera, &press(PointerButton::Secondary, 50.0, 50.0));
        controller.handle(&mut camera, &moved(60.0, 44.0));

        let expected = start + right * (-10.0 * 0.5) + up * (-6.0 * 0.5);
        assert_relative_eq!(camera.position, expected, epsilon = 1e-3);
        assert_eq!(camera.orientation, orientation);
        assert_eq!(camera.target, Point3::origin());
    }

    #[test]
    fn test_wheel_moves_along_view_direction() {
        let mut controller = InteractionController::default();
        let mut camera = Camera::default();
        let start = camera.position;
        let forward = camera.forward();

        let response = controller.handle(&mut camera, &InputEvent::Wheel { delta_y: 100.0 });

        assert!(response.camera_changed);
        assert!(response.prevent_default);
        assert_relative_eq!(camera.position, start + forward * 10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_first_drag_measures_from_press_position() {
        let mut controller = InteractionController::default();
        let mut camera = Camera::default();
        let start = camera.position;

        controller.handle(&mut camera, &press(PointerButton::Secondary, 300.0, 300.0));
        controller.handle(&mut camera, &moved(300.0, 300.0));

        assert_relative_eq!(camera.position, start, epsilon = 1e-4);
    }

    #[test]
    fn test_diagonal_drag_yaws_then_pitches_about_starting_right_axis() {
        let mut controller = InteractionController::default();
        let mut camera = Camera::default();
        let start = camera.position;
        let right = camera.right();

        controller.handle(&mut camera, &press(PointerButton::Primary, 0.0, 0.0));
        let response = controller.handle(&mut camera, &moved(60.0, 40.0));
        assert!(response.camera_changed);

        let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -60.0 * 0.005);
        let pitch = UnitQuaternion::from_axis_angle(
            &nalgebra::Unit::new_normalize(right),
            -40.0 * 0.005,
        );
        let expected = pitch * (yaw * start.coords);
        assert_relative_eq!(camera.position.coords, expected, epsilon = 1e-2);

        let pitch_first = yaw * (pitch * start.coords);
        assert!((camera.position.coords - pitch_first).norm() > 1.0);

        let to_origin = (Point3::origin() - camera.position).normalize();
        assert_relative_eq!(camera.forward(), to_origin, epsilon = 1e-4);
    }

    #[test]
    fn test_secondary_press_is_suppressed() {
        let mut controller = InteractionController::default();
        let mut camera = Camera::default();

        let response = controller.handle(&mut camera, &press(PointerButton::Secondary, 0.0, 0.0));
        assert!(response.prevent_default);
        let response = controller.handle(&mut camera, &press(PointerButton::Primary, 0.0, 0.0));
        assert!(!response.prevent_default);
    }

    #[test]
    fn test_translator_uses_logical_pixels() {
        let mut translator = InputTranslator::new(2.0);

        let event = translator.cursor_moved(PhysicalPosition::new(200.0, 100.0));
        assert_eq!(
            event,
            InputEvent::PointerMoved {
                position: Point2::new(100.0, 50.0)
            }
        );

        let event = translator.mouse_input(ElementState::Pressed, MouseButton::Right);
        assert_eq!(
            event,
            InputEvent::PointerPressed {
                button: PointerButton::Secondary,
                position: Point2::new(100.0, 50.0)
            }
        );
    }

    #[test]
    fn test_translator_wheel_follows_scroll_down_positive() {
        let translator = InputTranslator::new(1.0);
        assert_eq!(
            translator.mouse_wheel(MouseScrollDelta::LineDelta(0.0, -1.0)),
            InputEvent::Wheel { delta_y: 100.0 }
        );
        let pixels = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 30.0));
        assert_eq!(
            translator.mouse_wheel(pixels),
            InputEvent::Wheel { delta_y: -30.0 }
        );
    }
}
