//! Ambient idle sway.
//!
//! Sway never writes an object's pose. It only sets the display-only
//! `idle_offset`, and it yields completely while the transition scheduler
//! owns the object: the offset is zeroed for that tick and picks up again
//! once the object is at rest.

use std::collections::BTreeMap;
use std::f32::consts::TAU;

use cgmath::{Vector3, Zero};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::animation::TransitionScheduler;
use crate::scene::{ObjectId, Scene};

/// Sway parameters for one object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleSway {
    /// Peak offset along each world axis
    pub amplitude: Vector3<f32>,
    /// Cycles per second
    pub frequency: f32,
    /// Radians; seeded from the object id when left to [`IdleSway::gentle`]
    pub phase: f32,
}

impl IdleSway {
    pub fn new(amplitude: Vector3<f32>, frequency: f32, phase: f32) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
        }
    }

    /// Slow vertical bob with a phase drawn from the object id, so neighbours
    /// do not move in lockstep
    pub fn gentle(id: ObjectId) -> Self {
        let mut rng = StdRng::seed_from_u64(id.0);
        Self {
            amplitude: Vector3::new(0.0, 0.004, 0.0),
            frequency: 0.25,
            phase: rng.random_range(0.0..TAU),
        }
    }

    pub fn offset_at(&self, time: f32) -> Vector3<f32> {
        self.amplitude * (TAU * self.frequency * time + self.phase).sin()
    }
}

/// All swaying objects and the shared clock
#[derive(Debug, Default)]
pub struct IdleMotion {
    time: f32,
    sways: BTreeMap<ObjectId, IdleSway>,
}

impl IdleMotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: ObjectId, sway: IdleSway) {
        self.sways.insert(id, sway);
    }

    /// Stops swaying `id` and clears its offset
    pub fn remove(&mut self, id: ObjectId, scene: &mut Scene) -> Option<IdleSway> {
        if let Some(object) = scene.get_mut(id) {
            object.idle_offset = Vector3::zero();
        }
        self.sways.remove(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.sways.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sways.is_empty()
    }

    /// Runs after transitions have advanced for the tick
    pub fn update(&mut self, dt: f32, scene: &mut Scene, transitions: &TransitionScheduler) {
        self.time += dt.max(0.0);
        for (&id, sway) in &self.sways {
            let offset = if transitions.owns_pose(id) {
                Vector3::zero()
            } else {
                sway.offset_at(self.time)
            };
            if let Some(object) = scene.get_mut(id) {
                object.idle_offset = offset;
            }
        }
    }
}
