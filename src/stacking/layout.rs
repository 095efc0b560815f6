//! Pure layout math for flat stacks.
//!
//! Slot `i` (0 = bottom) rests at the summed thickness of everything below it
//! plus half its own thickness, measured along the base anchor's up axis. Each
//! slot also gets a small horizontal nudge and yaw drawn from a generator
//! seeded only by the slot index, so a slot looks the same no matter which item
//! occupies it.

use cgmath::{Deg, Quaternion, Rad, Rotation3, Vector3};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::StackLayoutConfig;
use crate::math::Pose;

/// Distance along the stack's up axis to the centre of each slot
pub fn base_offsets(thicknesses: &[f32]) -> Vec<f32> {
    let mut below = 0.0;
    thicknesses
        .iter()
        .map(|&thickness| {
            let centre = below + thickness * 0.5;
            below += thickness;
            centre
        })
        .collect()
}

/// Per-slot visual offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotJitter {
    /// Horizontal nudge in the base anchor's frame (y is always zero)
    pub offset: Vector3<f32>,
    pub yaw: Rad<f32>,
}

/// Deterministic jitter for `index`; identical inputs give identical output
pub fn slot_jitter(index: usize, layout: &StackLayoutConfig) -> SlotJitter {
    let mut rng = StdRng::seed_from_u64(index as u64);
    let max_offset = layout.max_offset.max(0.0);
    let max_yaw = layout.max_yaw_degrees.max(0.0);

    let x = rng.random_range(-max_offset..=max_offset);
    let z = rng.random_range(-max_offset..=max_offset);
    let yaw = rng.random_range(-max_yaw..=max_yaw);

    SlotJitter {
        offset: Vector3::new(x, 0.0, z),
        yaw: Deg(yaw).into(),
    }
}

/// World pose of a slot given its base offset and jitter
pub fn slot_pose(base: &Pose, base_offset: f32, jitter: &SlotJitter) -> Pose {
    let position =
        base.position + base.up() * base_offset + base.transform_vector(jitter.offset);
    Pose::new(position, base.rotation * Quaternion::from_angle_y(jitter.yaw))
}
