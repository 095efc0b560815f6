//! # Object Picking
//!
//! Pointer ray-casting against scene objects.
//!
//! ## How it works
//!
//! 1. **Pointer to Ray**: unproject the pointer through the active [`Viewpoint`]
//! 2. **Ray-Bounds Intersection**: test the ray against each candidate's world-space box
//! 3. **Selection**: return the closest hit within the maximum distance
//!
//! Objects carry a [`LayerMask`]; a pick only considers objects whose layers
//! intersect the requested mask, mirroring how engine ray-casts are limited to
//! interaction layers.
//!
//! ## Usage
//!
//! ```rust
//! use nook::picking::{LayerMask, ObjectPicker};
//! # use nook::camera::Viewpoint;
//! # use nook::scene::Scene;
//! # use cgmath::Vector3;
//! # let viewpoint = Viewpoint::new(Vector3::new(0.0, 1.6, 0.0), 0.0, 0.0, (800.0, 600.0));
//! # let scene = Scene::new();
//! let picker = ObjectPicker::new();
//! let ray = picker.screen_to_ray((400.0, 300.0), &viewpoint);
//! if let Some(hit) = picker.pick(&ray, 4.0, LayerMask::ALL, &scene) {
//!     println!("pointer is over {}", hit.object);
//! }
//! ```

use std::ops::BitOr;

use cgmath::{ElementWise, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero};

use crate::camera::Viewpoint;
use crate::scene::{ObjectId, Scene};

/// Bit set of ray-cast layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    /// Static set dressing; never interactable
    pub const SCENERY: LayerMask = LayerMask(1);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Single layer at bit `index`
    pub const fn layer(index: u32) -> LayerMask {
        LayerMask(1 << index)
    }

    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 | rhs.0)
    }
}

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Box centred on the origin with the given full extents
    pub fn from_size(size: Vector3<f32>) -> Self {
        let half = size * 0.5;
        Self::new(-half, half)
    }

    /// Create AABB from a set of points
    pub fn from_points(points: &[Vector3<f32>]) -> Self {
        let Some(first) = points.first() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let mut min = *first;
        let mut max = *first;
        for p in points.iter().skip(1) {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Self::new(min, max)
    }

    /// Slab test. Returns the distance to the entry point (or exit point when
    /// the origin is inside), or `None` if the ray misses.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Bounds of this box after an affine transform
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let transformed: Vec<Vector3<f32>> = corners
            .iter()
            .map(|corner| {
                let p = matrix * Vector4::new(corner.x, corner.y, corner.z, 1.0);
                Vector3::new(p.x / p.w, p.y / p.w, p.z / p.w)
            })
            .collect();

        Self::from_points(&transformed)
    }
}

/// Result of an object picking operation
#[derive(Debug, Clone, Copy)]
pub struct PickResult {
    pub object: ObjectId,
    /// Distance from the ray origin to the hit
    pub distance: f32,
    pub point: Vector3<f32>,
}

/// Ray-caster for pointer hover and click resolution
#[derive(Debug, Default)]
pub struct ObjectPicker;

impl ObjectPicker {
    pub fn new() -> Self {
        Self
    }

    /// Convert a pointer position (physical pixels, origin top-left) into a
    /// world-space ray leaving the viewpoint
    pub fn screen_to_ray(&self, screen_pos: (f32, f32), viewpoint: &Viewpoint) -> Ray {
        let (mouse_x, mouse_y) = screen_pos;
        let (screen_width, screen_height) = viewpoint.screen_size;
        if screen_width <= 0.0 || screen_height <= 0.0 {
            return Ray::new(viewpoint.eye, viewpoint.forward());
        }

        // Normalized device coordinates (-1 to 1), Y flipped
        let ndc_x = (2.0 * mouse_x) / screen_width - 1.0;
        let ndc_y = 1.0 - (2.0 * mouse_y) / screen_height;

        let Some(inv_view_proj) = viewpoint.view_projection().invert() else {
            return Ray::new(viewpoint.eye, viewpoint.forward());
        };

        let world_near = inv_view_proj * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        let world_far = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near_3d = Vector3::new(
            world_near.x / world_near.w,
            world_near.y / world_near.w,
            world_near.z / world_near.w,
        );
        let far_3d = Vector3::new(
            world_far.x / world_far.w,
            world_far.y / world_far.w,
            world_far.z / world_far.w,
        );

        Ray::new(viewpoint.eye, far_3d - near_3d)
    }

    /// Closest interactable object hit within `max_distance` whose layers
    /// intersect `mask`. Hidden and non-pickable objects are transparent to
    /// the ray.
    pub fn pick(&self, ray: &Ray, max_distance: f32, mask: LayerMask, scene: &Scene) -> Option<PickResult> {
        let mut closest: Option<PickResult> = None;

        for (id, object) in scene.iter() {
            if !object.is_interactable() || !object.layers.intersects(mask) {
                continue;
            }
            let Some(bounds) = scene.world_bounds(id) else {
                continue;
            };
            let Some(distance) = bounds.intersect_ray(ray) else {
                continue;
            };
            if distance > max_distance {
                continue;
            }
            if closest.as_ref().map_or(true, |best| distance < best.distance) {
                closest = Some(PickResult {
                    object: id,
                    distance,
                    point: ray.point_at(distance),
                });
            }
        }

        closest
    }
}
