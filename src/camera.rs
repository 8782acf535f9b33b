use glam::Vec3;

use crate::config::{CAMERA_LERP, CAMERA_OFFSET, CAMERA_OFFSET_FLYING};

/// Third-person follow rig. The renderer samples `position` and
/// `look_target` each frame; the simulation never reads anything back.
pub struct CameraRig {
    pub position: Vec3,
    pub look_target: Vec3,
}

impl CameraRig {
    pub fn new(player_position: Vec3) -> Self {
        Self {
            position: player_position + Vec3::from(CAMERA_OFFSET),
            look_target: player_position,
        }
    }

    /// Pull the camera further back and up while the player is flying.
    pub fn follow(&mut self, player_position: Vec3, flying: bool) {
        let offset = if flying {
            Vec3::from(CAMERA_OFFSET_FLYING)
        } else {
            Vec3::from(CAMERA_OFFSET)
        };
        let target = player_position + offset;
        self.position = self.position.lerp(target, CAMERA_LERP);
        self.look_target = player_position;
    }

    pub fn snap_to(&mut self, player_position: Vec3) {
        self.position = player_position + Vec3::from(CAMERA_OFFSET);
        self.look_target = player_position;
    }
}
