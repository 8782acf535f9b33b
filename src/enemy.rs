use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;

use crate::collision::Aabb;
use crate::config::*;
use crate::events::{EventQueue, GameEvent};

/// Core behavior states. Stun and knockback are orthogonal interruptions
/// tracked by timers; when either expires the enemy drops back into a
/// neutral, non-attacking state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    Patrolling,
    Chasing,
    PreparingAttack,
    Attacking,
}

pub struct Enemy {
    pub position: Vec3,
    pub initial_position: Vec3,
    pub velocity: Vec3,
    pub rotation_y: f32,
    pub behavior: Behavior,
    pub health: f32,
    pub patrol_radius: f32,

    patrol_angle: f32,
    attack_timer: f32,
    attack_cooldown: f32,
    stun_timer: f32,
    knockback_timer: f32,
    invuln_timer: f32,
    has_detected_player: bool,
    dead: bool,

    /// Telegraph progress in 0..1 while preparing, for the renderer's
    /// ground indicator.
    pub telegraph_progress: f32,
}

impl Enemy {
    pub fn new(position: Vec3, patrol_radius: f32, rng: &mut impl Rng) -> Self {
        Self {
            position,
            initial_position: position,
            velocity: Vec3::ZERO,
            rotation_y: 0.0,
            behavior: Behavior::Patrolling,
            health: ENEMY_MAX_HEALTH,
            patrol_radius,
            patrol_angle: rng.gen_range(0.0..2.0 * PI),
            attack_timer: 0.0,
            attack_cooldown: 0.0,
            stun_timer: 0.0,
            knockback_timer: 0.0,
            invuln_timer: 0.0,
            has_detected_player: false,
            dead: false,
            telegraph_progress: 0.0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invuln_timer > 0.0
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_timer > 0.0
    }

    pub fn is_knocked_back(&self) -> bool {
        self.knockback_timer > 0.0
    }

    /// Whether the enemy deals contact damage this frame.
    pub fn is_attacking(&self) -> bool {
        self.behavior == Behavior::Attacking && !self.is_stunned() && !self.is_knocked_back()
    }

    pub fn attack_damage(&self) -> f32 {
        ENEMY_CONTACT_DAMAGE
    }

    pub fn collider(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, Vec3::splat(ENEMY_HALF_EXTENT))
    }

    /// Returns true on the single frame the player was first detected, so
    /// the orchestrator can fire the detect sound exactly once.
    pub fn update(&mut self, dt: f32, player_position: Vec3) -> bool {
        if self.dead {
            return false;
        }

        if self.invuln_timer > 0.0 {
            self.invuln_timer -= dt;
        }

        if self.knockback_timer > 0.0 {
            self.knockback_timer -= dt;
            // Knockback velocity was set directly; just drift with it.
            self.position += self.velocity * dt;
            return false;
        }

        if self.stun_timer > 0.0 {
            self.stun_timer -= dt;
            self.velocity = Vec3::ZERO;
            return false;
        }

        if self.attack_cooldown > 0.0 {
            self.attack_cooldown -= dt;
        }

        let mut first_detection = false;
        let distance = self.position.distance(player_position);

        match self.behavior {
            Behavior::Patrolling => {
                if distance < ENEMY_DETECTION_RADIUS {
                    self.behavior = Behavior::Chasing;
                    if !self.has_detected_player {
                        self.has_detected_player = true;
                        first_detection = true;
                    }
                } else {
                    self.patrol(dt);
                }
            }
            Behavior::Chasing => {
                if distance > ENEMY_DETECTION_RADIUS * ENEMY_DETECTION_EXIT_FACTOR {
                    self.behavior = Behavior::Patrolling;
                } else if distance < ENEMY_ATTACK_RANGE && self.attack_cooldown <= 0.0 {
                    self.behavior = Behavior::PreparingAttack;
                    self.attack_timer = ENEMY_ATTACK_TELEGRAPH;
                    self.velocity = Vec3::ZERO;
                } else {
                    self.chase(dt, player_position);
                }
            }
            Behavior::PreparingAttack => {
                self.attack_timer -= dt;
                self.telegraph_progress = 1.0 - (self.attack_timer / ENEMY_ATTACK_TELEGRAPH).max(0.0);
                if self.attack_timer <= 0.0 {
                    self.behavior = Behavior::Attacking;
                    self.attack_timer = ENEMY_ATTACK_DURATION;
                    self.telegraph_progress = 0.0;
                }
            }
            Behavior::Attacking => {
                self.attack_timer -= dt;
                if self.attack_timer <= 0.0 {
                    self.behavior = Behavior::Chasing;
                    self.attack_cooldown = ENEMY_ATTACK_COOLDOWN;
                }
            }
        }

        // No movement while winding up or striking.
        if matches!(self.behavior, Behavior::PreparingAttack | Behavior::Attacking) {
            self.velocity = Vec3::ZERO;
        }

        self.position.x += self.velocity.x * dt;
        self.position.z += self.velocity.z * dt;
        // Enemies stay on their spawn plane.
        self.position.y = self.initial_position.y;

        first_detection
    }

    fn patrol(&mut self, dt: f32) {
        self.patrol_angle += ENEMY_PATROL_SPEED * dt;
        let target = self.initial_position
            + Vec3::new(
                self.patrol_angle.cos() * self.patrol_radius,
                0.0,
                self.patrol_angle.sin() * self.patrol_radius,
            );
        let direction = Vec3::new(
            target.x - self.position.x,
            0.0,
            target.z - self.position.z,
        )
        .normalize_or_zero();

        self.velocity.x = direction.x * ENEMY_PATROL_SPEED;
        self.velocity.z = direction.z * ENEMY_PATROL_SPEED;

        if direction.length_squared() > 0.0 {
            self.rotation_y = direction.x.atan2(direction.z);
        }
    }

    fn chase(&mut self, dt: f32, player_position: Vec3) {
        let direction = Vec3::new(
            player_position.x - self.position.x,
            0.0,
            player_position.z - self.position.z,
        )
        .normalize_or_zero();

        self.velocity.x = direction.x * ENEMY_MOVE_SPEED;
        self.velocity.z = direction.z * ENEMY_MOVE_SPEED;

        if direction.length_squared() > 0.0 {
            let target = direction.x.atan2(direction.z);
            let diff = target - self.rotation_y;
            let shortest = (diff + PI).rem_euclid(2.0 * PI) - PI;
            self.rotation_y += shortest * ENEMY_CHASE_TURN_RATE * dt;
        }
    }

    /// No-op while invulnerable. Otherwise decrements health, opens an
    /// invulnerability window, stuns (cancelling any telegraph in
    /// progress), and dies at zero health.
    pub fn take_damage(&mut self, amount: f32, events: &mut EventQueue) {
        if self.dead || self.is_invulnerable() {
            return;
        }

        self.health -= amount;
        self.invuln_timer = ENEMY_INVULN_TIME;
        self.stun_timer = ENEMY_STUN_TIME;

        if matches!(
            self.behavior,
            Behavior::PreparingAttack | Behavior::Attacking
        ) {
            self.behavior = Behavior::Chasing;
            self.telegraph_progress = 0.0;
        }

        if self.health <= 0.0 {
            self.die(events);
        }
    }

    /// Override velocity and suspend movement logic for the recovery window.
    pub fn apply_knockback(&mut self, impulse: Vec3) {
        if self.dead {
            return;
        }
        self.knockback_timer = ENEMY_KNOCKBACK_RECOVERY;
        self.velocity = impulse;
    }

    /// Idempotent: the death event is emitted once; the level removes the
    /// corpse from its active collection afterwards.
    pub fn die(&mut self, events: &mut EventQueue) {
        if self.dead {
            return;
        }
        self.dead = true;
        events.push(GameEvent::EnemyDied {
            position: self.position,
            score_value: ENEMY_SCORE_VALUE,
        });
    }
}
