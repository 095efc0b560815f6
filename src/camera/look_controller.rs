use winit::event::DeviceEvent;

use super::viewpoint::Viewpoint;

/// Mouse-look for the first-person [`Viewpoint`].
///
/// Raw device motion turns the view. While the inspect flow is active the
/// controller stands down so the lifted object stays framed.
pub struct LookController {
    pub rotate_speed: f32,
    pub invert_y: bool,
    enabled: bool,
}

impl LookController {
    pub fn new(rotate_speed: f32) -> Self {
        Self {
            rotate_speed,
            invert_y: false,
            enabled: true,
        }
    }

    pub fn process_device_event(
        &mut self,
        event: &DeviceEvent,
        viewpoint: &mut Viewpoint,
        focus_active: bool,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.process_motion((delta.0 as f32, delta.1 as f32), viewpoint, focus_active);
        }
    }

    /// Applies a motion delta; returns whether the view actually turned
    pub fn process_motion(
        &mut self,
        delta: (f32, f32),
        viewpoint: &mut Viewpoint,
        focus_active: bool,
    ) -> bool {
        if !self.enabled || focus_active {
            return false;
        }
        let pitch_sign = if self.invert_y { 1.0 } else { -1.0 };
        viewpoint.add_yaw(-delta.0 * self.rotate_speed);
        viewpoint.add_pitch(pitch_sign * delta.1 * self.rotate_speed);
        true
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for LookController {
    fn default() -> Self {
        Self::new(0.003)
    }
}
