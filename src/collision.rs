use glam::Vec3;

/// Axis-aligned bounding box. Every collision query in the game runs on
/// these; they are recomputed from entity transforms after each position
/// mutation so a resolution step never sees a stale box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

pub fn check_collision(a: &Aabb, b: &Aabb) -> bool {
    a.intersects(b)
}

/// How an overlap between the player and a solid box was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Snapped on top of the box, downward velocity zeroed, grounded.
    Landed,
    /// Snapped below the box, upward velocity zeroed.
    CeilingHit,
    /// Pushed out along X or Z, that velocity component zeroed.
    PushedX,
    PushedZ,
}

/// Kinematic state the resolver mutates. The player goes through this so
/// the resolver stays free of entity-specific flags.
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    pub half_extents: Vec3,
}

impl Body {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }
}

/// Push `body` out of `solid` along the axis of minimum penetration.
/// Returns `None` when the boxes do not overlap.
pub fn resolve_box(body: &mut Body, solid: &Aabb) -> Option<Resolution> {
    let bb = body.aabb();
    if !bb.intersects(solid) {
        return None;
    }

    let pen_x = (bb.max.x - solid.min.x).min(solid.max.x - bb.min.x);
    let pen_y = (bb.max.y - solid.min.y).min(solid.max.y - bb.min.y);
    let pen_z = (bb.max.z - solid.min.z).min(solid.max.z - bb.min.z);

    if pen_y <= pen_x && pen_y <= pen_z {
        if body.velocity.y <= 0.0 && bb.min.y >= solid.min.y {
            body.position.y = solid.max.y + body.half_extents.y;
            body.velocity.y = 0.0;
            Some(Resolution::Landed)
        } else if body.velocity.y > 0.0 {
            body.position.y = solid.min.y - body.half_extents.y;
            body.velocity.y = 0.0;
            Some(Resolution::CeilingHit)
        } else {
            // Sunk deep through the side of a box; push out horizontally
            // instead of teleporting through it.
            resolve_horizontal(body, solid, pen_x, pen_z)
        }
    } else {
        resolve_horizontal(body, solid, pen_x, pen_z)
    }
}

fn resolve_horizontal(body: &mut Body, solid: &Aabb, pen_x: f32, pen_z: f32) -> Option<Resolution> {
    let bb = body.aabb();
    if pen_x <= pen_z {
        if bb.min.x < solid.min.x {
            body.position.x = solid.min.x - body.half_extents.x;
        } else {
            body.position.x = solid.max.x + body.half_extents.x;
        }
        body.velocity.x = 0.0;
        Some(Resolution::PushedX)
    } else {
        if bb.min.z < solid.min.z {
            body.position.z = solid.min.z - body.half_extents.z;
        } else {
            body.position.z = solid.max.z + body.half_extents.z;
        }
        body.velocity.z = 0.0;
        Some(Resolution::PushedZ)
    }
}

/// Distance + angle cone test used for melee swings. `facing` must be
/// normalized. Inclusive on both boundaries so a target exactly at the
/// range or the half-angle still counts as hit.
pub fn cone_hit(origin: Vec3, facing: Vec3, target: Vec3, range: f32, full_angle: f32) -> bool {
    let to_target = target - origin;
    let distance = to_target.length();
    if distance > range {
        return false;
    }
    if distance <= f32::EPSILON {
        // On top of the attacker: no meaningful direction, count as hit.
        return true;
    }
    let dot = facing.dot(to_target / distance).clamp(-1.0, 1.0);
    dot.acos() <= full_angle / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn unit_box_at(center: Vec3) -> Aabb {
        Aabb::from_center_half_extents(center, Vec3::splat(0.5))
    }

    #[test]
    fn disjoint_boxes_do_not_intersect() {
        let a = unit_box_at(Vec3::ZERO);
        let b = unit_box_at(Vec3::new(2.0, 0.0, 0.0));
        assert!(!check_collision(&a, &b));
    }

    #[test]
    fn touching_boxes_intersect() {
        let a = unit_box_at(Vec3::ZERO);
        let b = unit_box_at(Vec3::new(1.0, 0.0, 0.0));
        assert!(check_collision(&a, &b));
    }

    #[test]
    fn falling_body_lands_on_top() {
        let solid = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(2.0, 0.25, 2.0));
        let mut body = Body {
            position: Vec3::new(0.0, 0.9, 0.0),
            velocity: Vec3::new(0.0, -5.0, 0.0),
            half_extents: Vec3::new(0.4, 0.8, 0.4),
        };
        assert_eq!(resolve_box(&mut body, &solid), Some(Resolution::Landed));
        assert_eq!(body.position.y, 0.25 + 0.8);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn rising_body_hits_ceiling() {
        let solid =
            Aabb::from_center_half_extents(Vec3::new(0.0, 3.0, 0.0), Vec3::new(2.0, 0.25, 2.0));
        let mut body = Body {
            position: Vec3::new(0.0, 2.1, 0.0),
            velocity: Vec3::new(0.0, 6.0, 0.0),
            half_extents: Vec3::new(0.4, 0.8, 0.4),
        };
        assert_eq!(resolve_box(&mut body, &solid), Some(Resolution::CeilingHit));
        assert_eq!(body.position.y, 2.75 - 0.8);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn shallow_side_overlap_pushes_out_horizontally() {
        let solid = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(1.0, 4.0, 1.0));
        let mut body = Body {
            position: Vec3::new(-1.3, 0.0, 0.0),
            velocity: Vec3::new(3.0, 0.0, 0.0),
            half_extents: Vec3::new(0.4, 0.8, 0.4),
        };
        assert_eq!(resolve_box(&mut body, &solid), Some(Resolution::PushedX));
        assert_eq!(body.position.x, -1.4);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn cone_hits_target_straight_ahead() {
        let facing = Vec3::new(0.0, 0.0, -1.0);
        assert!(cone_hit(
            Vec3::ZERO,
            facing,
            Vec3::new(0.0, 0.0, -2.0),
            2.5,
            PI / 3.0
        ));
    }

    #[test]
    fn cone_rejects_target_at_ninety_degrees() {
        let facing = Vec3::new(0.0, 0.0, -1.0);
        assert!(!cone_hit(
            Vec3::ZERO,
            facing,
            Vec3::new(2.5, 0.0, 0.0),
            2.5,
            PI / 3.0
        ));
    }

    #[test]
    fn cone_boundary_angle_is_inclusive() {
        let facing = Vec3::new(0.0, 0.0, -1.0);
        // A whisker under 30 degrees off axis with a 60 degree cone, so
        // acos rounding cannot tip the comparison.
        let half = PI / 6.0 - 1e-5;
        let target = Vec3::new(half.sin(), 0.0, -half.cos()) * 2.0;
        assert!(cone_hit(Vec3::ZERO, facing, target, 2.5, PI / 3.0));
    }

    #[test]
    fn cone_rejects_target_out_of_range() {
        let facing = Vec3::new(0.0, 0.0, -1.0);
        assert!(!cone_hit(
            Vec3::ZERO,
            facing,
            Vec3::new(0.0, 0.0, -3.0),
            2.5,
            PI / 3.0
        ));
    }
}
