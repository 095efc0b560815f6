//! Engine tuning.
//!
//! All values have sensible defaults; adjust with the `with_*` setters and call
//! [`EngineConfig::validate`] (the engine does this on construction).

use cgmath::{InnerSpace, Vector3};

use crate::animation::Easing;
use crate::error::ConfigError;

/// Transition durations and the double-click window, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingConfig {
    pub book_pull_out: f32,
    pub book_put_back: f32,
    pub drawer_slide: f32,
    pub focus_move: f32,
    pub stack_reflow: f32,
    pub double_click_window: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            book_pull_out: 0.25,
            book_put_back: 0.20,
            drawer_slide: 0.30,
            focus_move: 0.30,
            stack_reflow: 0.30,
            double_click_window: 0.30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickingConfig {
    /// Pointer rays ignore anything farther than this
    pub max_distance: f32,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self { max_distance: 4.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawerConfig {
    pub slide_distance: f32,
    /// Direction the drawer pulls out along, in the drawer's own frame
    pub outward_axis: Vector3<f32>,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            slide_distance: 0.30,
            outward_axis: Vector3::unit_z(),
        }
    }
}

/// Hover feedback strength
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverConfig {
    pub offset: f32,
    pub brightness: f32,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            offset: 0.015,
            brightness: 0.25,
        }
    }
}

/// Amplitude of the per-slot jitter applied to stacked items
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackLayoutConfig {
    pub max_offset: f32,
    pub max_yaw_degrees: f32,
}

impl Default for StackLayoutConfig {
    fn default() -> Self {
        Self {
            max_offset: 0.004,
            max_yaw_degrees: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineConfig {
    pub timing: TimingConfig,
    pub picking: PickingConfig,
    pub drawer: DrawerConfig,
    pub hover: HoverConfig,
    pub stack: StackLayoutConfig,
    pub easing: Easing,
}

impl EngineConfig {
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_max_pick_distance(mut self, distance: f32) -> Self {
        self.picking.max_distance = distance;
        self
    }

    pub fn with_drawer(mut self, drawer: DrawerConfig) -> Self {
        self.drawer = drawer;
        self
    }

    pub fn with_hover(mut self, hover: HoverConfig) -> Self {
        self.hover = hover;
        self
    }

    pub fn with_stack_layout(mut self, stack: StackLayoutConfig) -> Self {
        self.stack = stack;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Reports the first value that would make the engine misbehave
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("book_pull_out", self.timing.book_pull_out),
            ("book_put_back", self.timing.book_put_back),
            ("drawer_slide", self.timing.drawer_slide),
            ("focus_move", self.timing.focus_move),
            ("stack_reflow", self.timing.stack_reflow),
            ("double_click_window", self.timing.double_click_window as f32),
        ];
        for (name, value) in durations {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveDuration { name, value });
            }
        }

        let distances = [
            ("max_distance", self.picking.max_distance),
            ("slide_distance", self.drawer.slide_distance),
            ("hover_offset", self.hover.offset),
            ("max_offset", self.stack.max_offset),
            ("max_yaw_degrees", self.stack.max_yaw_degrees),
        ];
        for (name, value) in distances {
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeDistance { name, value });
            }
        }

        if self.drawer.outward_axis.magnitude2() <= f32::EPSILON {
            return Err(ConfigError::ZeroOutwardAxis);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_values() {
        let config = EngineConfig::default().with_timing(TimingConfig {
            focus_move: 0.0,
            ..TimingConfig::default()
        });
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveDuration { name: "focus_move", value: 0.0 })
        );

        let config = EngineConfig::default().with_max_pick_distance(-1.0);
        assert!(matches!(config.validate(), Err(ConfigError::NegativeDistance { name: "max_distance", .. })));

        let config = EngineConfig::default().with_drawer(DrawerConfig {
            outward_axis: Vector3::new(0.0, 0.0, 0.0),
            ..DrawerConfig::default()
        });
        assert_eq!(config.validate(), Err(ConfigError::ZeroOutwardAxis));
    }
}
