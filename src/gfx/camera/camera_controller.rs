use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, Modifiers, MouseButton, MouseScrollDelta},
};

use super::orbit_camera::OrbitCamera;

/// Orbit/pan/zoom input with damped motion.
///
/// Drag deltas accumulate into pending motion that [`CameraController::update`]
/// applies a `damping` fraction of each frame, so the view keeps gliding for a
/// moment after the pointer stops. A damping of 1 applies everything at once.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping: f32,
    is_shift_held: bool,
    is_left_pressed: bool,
    is_right_pressed: bool,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_pan: (f32, f32),
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            damping: 1.0,
            is_shift_held: false,
            is_left_pressed: false,
            is_right_pressed: false,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_pan: (0.0, 0.0),
        }
    }

    pub fn with_pan_speed(mut self, pan_speed: f32) -> Self {
        self.pan_speed = pan_speed;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping.clamp(f32::EPSILON, 1.0);
        self
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.is_left_pressed = pressed,
            MouseButton::Right => self.is_right_pressed = pressed,
            _ => (),
        }
    }

    /// Raw mouse motion and wheel input. Wheel zoom applies immediately.
    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut OrbitCamera) {
        match event {
            DeviceEvent::MouseWheel { delta } => {
                let scroll_amount = match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 40.0,
                };
                self.scroll(scroll_amount, camera);
            }
            DeviceEvent::MouseMotion { delta } => {
                self.drag(delta.0 as f32, delta.1 as f32);
            }
            _ => (),
        }
    }

    /// Tracks Shift from the window's modifier state, which arrives even while
    /// the UI owns the keyboard.
    pub fn process_modifiers(&mut self, modifiers: &Modifiers) {
        self.is_shift_held = modifiers.state().shift_key();
    }

    /// Pointer moved by (`dx`, `dy`) pixels. Only counts while a button is held.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        if self.is_panning() {
            self.pending_pan.0 -= dx * self.pan_speed;
            self.pending_pan.1 += dy * self.pan_speed;
        } else if self.is_rotating() {
            self.pending_yaw -= dx * self.rotate_speed;
            self.pending_pitch += dy * self.rotate_speed;
        }
    }

    /// Positive `amount` zooms in.
    pub fn scroll(&mut self, amount: f32, camera: &mut OrbitCamera) {
        camera.zoom((1.0 - self.zoom_speed).powf(amount));
    }

    /// Applies one frame of pending motion and decays the remainder.
    pub fn update(&mut self, camera: &mut OrbitCamera) {
        let d = self.damping;
        if self.pending_yaw != 0.0 {
            camera.add_yaw(self.pending_yaw * d);
        }
        if self.pending_pitch != 0.0 {
            camera.add_pitch(self.pending_pitch * d);
        }
        if self.pending_pan != (0.0, 0.0) {
            camera.pan((self.pending_pan.0 * d, self.pending_pan.1 * d));
        }

        let keep = 1.0 - d;
        self.pending_yaw = settle(self.pending_yaw * keep);
        self.pending_pitch = settle(self.pending_pitch * keep);
        self.pending_pan = (settle(self.pending_pan.0 * keep), settle(self.pending_pan.1 * keep));
    }

    /// Drops any motion still in flight.
    pub fn stop(&mut self) {
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        self.pending_pan = (0.0, 0.0);
    }

    pub fn is_shift_held(&self) -> bool {
        self.is_shift_held
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.is_right_pressed || (self.is_left_pressed && self.is_shift_held)
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_left_pressed && !self.is_shift_held
    }
}

fn settle(value: f32) -> f32 {
    if value.abs() < 1e-6 {
        0.0
    } else {
        value
    }
}
