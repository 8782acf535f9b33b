use glam::Vec3;
use serde::Deserialize;

use crate::collision::Aabb;
use crate::config::PLATFORM_FADE_TIME;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Visibility phases of a disappearing platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadePhase {
    Visible,
    Disappearing,
    Invisible,
    Reappearing,
}

/// Kind-specific platform behavior, dispatched exhaustively in `update`.
#[derive(Clone, Debug)]
pub enum PlatformKind {
    Static,
    Moving {
        axis: Axis,
        amplitude: f32,
        speed: f32,
        time: f32,
    },
    Disappearing {
        visible_time: f32,
        reappear_time: f32,
        phase: FadePhase,
        timer: f32,
    },
}

#[derive(Clone, Debug)]
pub struct Platform {
    pub position: Vec3,
    pub initial_position: Vec3,
    pub half_extents: Vec3,
    pub opacity: f32,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn fixed(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            position,
            initial_position: position,
            half_extents,
            opacity: 1.0,
            kind: PlatformKind::Static,
        }
    }

    pub fn moving(position: Vec3, half_extents: Vec3, axis: Axis, amplitude: f32, speed: f32) -> Self {
        Self {
            position,
            initial_position: position,
            half_extents,
            opacity: 1.0,
            kind: PlatformKind::Moving {
                axis,
                amplitude,
                speed,
                time: 0.0,
            },
        }
    }

    pub fn disappearing(
        position: Vec3,
        half_extents: Vec3,
        visible_time: f32,
        reappear_time: f32,
    ) -> Self {
        Self {
            position,
            initial_position: position,
            half_extents,
            opacity: 1.0,
            kind: PlatformKind::Disappearing {
                visible_time,
                reappear_time,
                phase: FadePhase::Visible,
                timer: 0.0,
            },
        }
    }

    pub fn update(&mut self, dt: f32) {
        match &mut self.kind {
            PlatformKind::Static => {}
            PlatformKind::Moving {
                axis,
                amplitude,
                speed,
                time,
            } => {
                *time += dt;
                let offset = (*time * *speed).sin() * *amplitude;
                self.position = self.initial_position + axis.unit() * offset;
            }
            PlatformKind::Disappearing {
                visible_time,
                reappear_time,
                phase,
                timer,
            } => {
                *timer += dt;
                match *phase {
                    FadePhase::Visible => {
                        self.opacity = 1.0;
                        if *timer >= *visible_time {
                            *phase = FadePhase::Disappearing;
                            *timer = 0.0;
                        }
                    }
                    FadePhase::Disappearing => {
                        let progress = *timer / PLATFORM_FADE_TIME;
                        self.opacity = (1.0 - progress).max(0.0);
                        if progress >= 1.0 {
                            *phase = FadePhase::Invisible;
                            *timer = 0.0;
                        }
                    }
                    FadePhase::Invisible => {
                        self.opacity = 0.0;
                        if *timer >= *reappear_time {
                            *phase = FadePhase::Reappearing;
                            *timer = 0.0;
                        }
                    }
                    FadePhase::Reappearing => {
                        let progress = *timer / PLATFORM_FADE_TIME;
                        self.opacity = progress.min(1.0);
                        if progress >= 1.0 {
                            *phase = FadePhase::Visible;
                            *timer = 0.0;
                            self.opacity = 1.0;
                        }
                    }
                }
            }
        }
    }

    /// Whether the platform currently takes part in collision. Faded
    /// platforms stay solid until they reach the invisible phase.
    pub fn is_active(&self) -> bool {
        match &self.kind {
            PlatformKind::Disappearing { phase, .. } => *phase != FadePhase::Invisible,
            _ => true,
        }
    }

    /// Instantaneous velocity, so the player can inherit it while standing
    /// on a moving platform. Derivative of the sine drive.
    pub fn velocity(&self) -> Vec3 {
        match &self.kind {
            PlatformKind::Moving {
                axis,
                amplitude,
                speed,
                time,
            } => axis.unit() * ((*time * *speed).cos() * *amplitude * *speed),
            _ => Vec3::ZERO,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }
}
