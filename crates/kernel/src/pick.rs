//! Ray casting against the scene's unit cubes.

use crate::layout::Layout;
use glam::Vec3;
use mansion_common::GridPos;

/// Half the edge length of a block.
const HALF_EXTENT: f32 = 0.5;

/// A ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest block struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Coordinate of the block that was hit.
    pub pos: GridPos,
    /// World-space point on the block's surface.
    pub point: Vec3,
    /// Outward normal of the face that was hit.
    pub normal: Vec3,
    pub distance: f32,
}

impl RayHit {
    /// The empty cell on the other side of the hit face, where a new block
    /// would go.
    pub fn adjacent(&self) -> GridPos {
        GridPos::round(self.point + self.normal * HALF_EXTENT)
    }
}

impl Layout {
    /// Cast `ray` against every block and return the nearest front-face hit
    /// no farther than `max_distance`.
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for (pos, _) in self.iter() {
            let Some((t, normal)) = ray_cube_intersect(ray, pos.center()) else {
                continue;
            };
            if t > max_distance {
                continue;
            }
            if best.is_none_or(|b| t < b.distance) {
                best = Some(RayHit {
                    pos,
                    point: ray.at(t),
                    normal,
                    distance: t,
                });
            }
        }
        best
    }
}

/// Slab test against the unit cube centered on `center`.
///
/// Returns the entry distance and the entry face normal. Rays starting inside
/// the cube see only back faces and do not hit it.
fn ray_cube_intersect(ray: &Ray, center: Vec3) -> Option<(f32, Vec3)> {
    let min = center - Vec3::splat(HALF_EXTENT);
    let max = center + Vec3::splat(HALF_EXTENT);

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut normal = Vec3::ZERO;

    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        if d.abs() < 1e-8 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_near {
            t_near = t0;
            normal = Vec3::ZERO;
            normal[axis] = -d.signum();
        }
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_near < 0.0 {
        return None;
    }
    Some((t_near, normal))
}
