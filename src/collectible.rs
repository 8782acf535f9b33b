use glam::Vec3;
use rand::Rng;
use serde::Deserialize;

use crate::collision::Aabb;
use crate::config::{COLLECTIBLE_BOB_HEIGHT, CRYSTAL_HALF_EXTENT, SEED_HALF_EXTENT};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectibleKind {
    Crystal,
    Seed,
}

/// Pickup with a small idle animation. The bob/spin state only feeds the
/// renderer; the collider follows the animated position.
#[derive(Clone, Debug)]
pub struct Collectible {
    pub position: Vec3,
    pub kind: CollectibleKind,
    pub rotation_y: f32,
    base_y: f32,
    bob_time: f32,
    bob_speed: f32,
    rotation_speed: f32,
}

impl Collectible {
    pub fn new(kind: CollectibleKind, position: Vec3, rng: &mut impl Rng) -> Self {
        Self {
            position,
            kind,
            rotation_y: 0.0,
            base_y: position.y,
            bob_time: rng.gen_range(0.0..std::f32::consts::TAU),
            bob_speed: rng.gen_range(1.0..2.0),
            rotation_speed: rng.gen_range(0.6..1.8),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.rotation_y += self.rotation_speed * dt;
        self.bob_time += self.bob_speed * dt;
        self.position.y = self.base_y + self.bob_time.sin() * COLLECTIBLE_BOB_HEIGHT;
    }

    pub fn aabb(&self) -> Aabb {
        let half = match self.kind {
            CollectibleKind::Crystal => CRYSTAL_HALF_EXTENT,
            CollectibleKind::Seed => SEED_HALF_EXTENT,
        };
        Aabb::from_center_half_extents(self.position, Vec3::splat(half))
    }
}
