use glam::Vec3;
use serde::Deserialize;
use std::f32::consts::PI;

use crate::audio::{AudioOutput, Sound};
use crate::collision::{Aabb, Body};
use crate::config::*;
use crate::events::{EventQueue, GameEvent};
use crate::input::InputSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerClass {
    Warrior,
    Archer,
    Mage,
}

impl PlayerClass {
    pub fn move_speed(self) -> f32 {
        match self {
            PlayerClass::Warrior => 4.5,
            PlayerClass::Archer => 6.0,
            PlayerClass::Mage => 4.0,
        }
    }

    pub fn attack_damage(self) -> f32 {
        match self {
            PlayerClass::Warrior => 2.0,
            PlayerClass::Archer => 1.0,
            PlayerClass::Mage => 1.5,
        }
    }

    pub fn attack_range(self) -> f32 {
        match self {
            PlayerClass::Warrior => 2.5,
            PlayerClass::Archer => 15.0,
            PlayerClass::Mage => 8.0,
        }
    }

    pub fn attack_cooldown(self) -> f32 {
        match self {
            PlayerClass::Warrior => 0.6,
            PlayerClass::Archer => 0.4,
            PlayerClass::Mage => 0.8,
        }
    }

    pub fn attack_angle(self) -> f32 {
        match self {
            PlayerClass::Warrior => PI / 3.0,
            PlayerClass::Archer => PI / 12.0,
            PlayerClass::Mage => PI,
        }
    }

    /// How long the attack animation window locks out the next swing.
    pub fn attack_duration(self) -> f32 {
        match self {
            PlayerClass::Warrior => 0.3,
            PlayerClass::Archer => 0.25,
            PlayerClass::Mage => 0.4,
        }
    }

    pub fn projectile(self) -> Option<ProjectileKind> {
        match self {
            PlayerClass::Warrior => None,
            PlayerClass::Archer => Some(ProjectileKind::Arrow),
            PlayerClass::Mage => Some(ProjectileKind::Spell),
        }
    }

    pub fn projectile_speed(self) -> f32 {
        match self {
            PlayerClass::Warrior => 0.0,
            PlayerClass::Archer => 25.0,
            PlayerClass::Mage => 10.0,
        }
    }
}

impl std::str::FromStr for PlayerClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "warrior" => Ok(PlayerClass::Warrior),
            "archer" => Ok(PlayerClass::Archer),
            "mage" => Ok(PlayerClass::Mage),
            other => Err(format!("unknown class: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    Arrow,
    Spell,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub position: Vec3,
    pub velocity: Vec3,
    pub damage: f32,
    pub lifetime: f32,
    pub kind: ProjectileKind,
}

impl Projectile {
    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.lifetime -= dt;
    }

    pub fn expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, Vec3::splat(PROJECTILE_HALF_EXTENT))
    }
}

/// The player's kinematic and ability state. Health lives in the
/// orchestrator; the player only knows whether it is currently
/// invulnerable so damage sources can be gated in one place.
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation_y: f32,
    pub class: PlayerClass,

    pub grounded: bool,
    pub jumping: bool,
    pub was_in_air: bool,
    jump_held: bool,

    pub flying: bool,
    pub fuel: f32,
    can_fly: bool,
    fly_sound_playing: bool,

    pub dashing: bool,
    dash_timer: f32,
    dash_cooldown: f32,
    dash_direction: Vec3,

    pub attacking: bool,
    attack_timer: f32,
    attack_cooldown: f32,

    invuln_timer: f32,
    knockback_timer: f32,

    pub projectiles: Vec<Projectile>,
}

impl Player {
    pub fn new(class: PlayerClass, spawn: Vec3) -> Self {
        Self {
            position: spawn,
            velocity: Vec3::ZERO,
            rotation_y: 0.0,
            class,
            grounded: false,
            jumping: false,
            was_in_air: false,
            jump_held: false,
            flying: false,
            fuel: MAX_FUEL,
            can_fly: true,
            fly_sound_playing: false,
            dashing: false,
            dash_timer: 0.0,
            dash_cooldown: 0.0,
            dash_direction: Vec3::Z,
            attacking: false,
            attack_timer: 0.0,
            attack_cooldown: 0.0,
            invuln_timer: 0.0,
            knockback_timer: 0.0,
            projectiles: Vec::new(),
        }
    }

    /// Unit vector the player model faces, derived from yaw.
    pub fn facing(&self) -> Vec3 {
        Vec3::new(self.rotation_y.sin(), 0.0, self.rotation_y.cos())
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invuln_timer > 0.0
    }

    pub fn set_invulnerable(&mut self, duration: f32) {
        self.invuln_timer = self.invuln_timer.max(duration);
    }

    pub fn collider(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents())
    }

    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(PLAYER_HALF_WIDTH, PLAYER_HALF_HEIGHT, PLAYER_HALF_WIDTH)
    }

    pub fn as_body(&self) -> Body {
        Body {
            position: self.position,
            velocity: self.velocity,
            half_extents: self.half_extents(),
        }
    }

    pub fn apply_body(&mut self, body: &Body) {
        self.position = body.position;
        self.velocity = body.velocity;
    }

    pub fn handle_input(
        &mut self,
        dt: f32,
        input: &InputSnapshot,
        events: &mut EventQueue,
        audio: &mut dyn AudioOutput,
    ) {
        let mut direction = Vec3::ZERO;
        if input.forward {
            direction.z -= 1.0;
        }
        if input.backward {
            direction.z += 1.0;
        }
        if input.left {
            direction.x -= 1.0;
        }
        if input.right {
            direction.x += 1.0;
        }
        let direction = direction.normalize_or_zero();

        // While dashing or being shoved, direct control of the horizontal
        // velocity is suspended so the impulse can play out.
        if !self.dashing && self.knockback_timer <= 0.0 {
            let speed = if self.flying {
                FLIGHT_MOVE_SPEED
            } else if input.sprint {
                self.class.move_speed() * SPRINT_MULTIPLIER
            } else {
                self.class.move_speed()
            };
            self.velocity.x = direction.x * speed;
            self.velocity.z = direction.z * speed;
        }

        // Jump fires on the press edge, not while held.
        if input.jump && self.grounded && !self.jump_held {
            self.jump_held = true;
            self.jump(audio);
        } else if !input.jump {
            self.jump_held = false;
        }

        if input.fly {
            self.fly(dt, audio);
        } else {
            self.stop_flying(audio);
        }

        if input.dash && !self.dashing && self.dash_cooldown <= 0.0 {
            self.dashing = true;
            self.dash_timer = DASH_DURATION;
            self.dash_cooldown = DASH_COOLDOWN;
            self.dash_direction = if direction.length_squared() > 0.0 {
                direction
            } else {
                self.facing()
            };
            audio.play(Sound::Dash);
        }

        if input.attack && !self.attacking && self.attack_cooldown <= 0.0 {
            self.start_attack(events, audio);
        }

        if direction.length_squared() > 0.0 && !self.dashing {
            let target = direction.x.atan2(direction.z);
            let diff = target - self.rotation_y;
            let shortest = (diff + PI).rem_euclid(2.0 * PI) - PI;
            self.rotation_y += shortest * TURN_RATE * dt;
        }
    }

    fn jump(&mut self, audio: &mut dyn AudioOutput) {
        if self.flying {
            return;
        }
        self.velocity.y = JUMP_VELOCITY;
        self.jumping = true;
        self.grounded = false;
        self.was_in_air = true;
        // Leave the surface immediately so the next resolution pass does
        // not re-snap us onto it.
        self.position.y += JUMP_CLEARANCE;
        audio.play(Sound::Jump);
    }

    fn fly(&mut self, dt: f32, audio: &mut dyn AudioOutput) {
        if self.fuel > 0.0 && self.can_fly {
            self.flying = true;
            self.velocity.y = (self.velocity.y + FLIGHT_CLIMB_ACCEL * dt).min(MAX_FLIGHT_ASCENT);
            self.fuel -= FUEL_CONSUMPTION_RATE * dt;
            if !self.fly_sound_playing {
                audio.play(Sound::Fly);
                self.fly_sound_playing = true;
            }
            if self.fuel <= 0.0 {
                self.fuel = 0.0;
                self.can_fly = false;
                self.stop_flying(audio);
            }
        } else {
            self.stop_flying(audio);
        }
    }

    fn stop_flying(&mut self, audio: &mut dyn AudioOutput) {
        if self.fly_sound_playing {
            audio.stop(Sound::Fly);
            self.fly_sound_playing = false;
        }
        self.flying = false;
    }

    fn start_attack(&mut self, events: &mut EventQueue, audio: &mut dyn AudioOutput) {
        self.attacking = true;
        self.attack_timer = self.class.attack_duration();
        self.attack_cooldown = self.class.attack_cooldown();

        let facing = self.facing();
        events.push(GameEvent::PlayerAttack {
            position: self.position,
            direction: facing,
            range: self.class.attack_range(),
            angle: self.class.attack_angle(),
            damage: self.class.attack_damage(),
            class: self.class,
        });

        if let Some(kind) = self.class.projectile() {
            let speed = self.class.projectile_speed();
            self.projectiles.push(Projectile {
                position: self.position + facing * (PLAYER_HALF_WIDTH + PROJECTILE_HALF_EXTENT),
                velocity: facing * speed,
                damage: self.class.attack_damage(),
                lifetime: self.class.attack_range() / speed,
                kind,
            });
        }
        audio.play(Sound::Attack);
    }

    /// Advance timers, apply gravity, clamp velocity and move. Runs after
    /// `handle_input` every tick, with the already-capped dt.
    pub fn integrate(&mut self, dt: f32) {
        if self.invuln_timer > 0.0 {
            self.invuln_timer -= dt;
        }
        if self.attack_cooldown > 0.0 {
            self.attack_cooldown -= dt;
        }
        if self.attacking {
            self.attack_timer -= dt;
            if self.attack_timer <= 0.0 {
                self.attacking = false;
            }
        }
        if self.dash_cooldown > 0.0 {
            self.dash_cooldown -= dt;
        }
        if self.knockback_timer > 0.0 {
            self.knockback_timer -= dt;
        }
        if self.dashing {
            self.dash_timer -= dt;
            if self.dash_timer <= 0.0 {
                self.dashing = false;
            } else {
                self.velocity.x = self.dash_direction.x * DASH_SPEED;
                self.velocity.z = self.dash_direction.z * DASH_SPEED;
            }
        }

        if !self.grounded && !self.flying {
            self.velocity.y -= GRAVITY * dt;
        }
        if !self.flying && self.fuel < MAX_FUEL {
            self.fuel = (self.fuel + FUEL_REGENERATION_RATE * dt).min(MAX_FUEL);
            if self.fuel >= MAX_FUEL {
                self.can_fly = true;
            }
        }

        self.velocity = self.velocity.clamp(
            Vec3::splat(-MAX_AXIS_SPEED),
            Vec3::splat(MAX_AXIS_SPEED),
        );
        self.position += self.velocity * dt;

        for projectile in &mut self.projectiles {
            projectile.update(dt);
        }
        self.projectiles.retain(|p| !p.expired());
    }

    pub fn apply_knockback(&mut self, impulse: Vec3) {
        self.velocity += impulse;
        self.knockback_timer = PLAYER_KNOCKBACK_RECOVERY;
        if self.invuln_timer <= 0.0 {
            self.invuln_timer = KNOCKBACK_INVULN_TIME;
        }
    }

    /// Reinitialize all transient state in place, keeping the class.
    pub fn reset(&mut self, spawn: Vec3) {
        let class = self.class;
        *self = Player::new(class, spawn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;

    fn snapshot(forward: bool) -> InputSnapshot {
        InputSnapshot {
            forward,
            ..Default::default()
        }
    }

    fn tick(player: &mut Player, dt: f32, input: &InputSnapshot) {
        let mut events = EventQueue::new();
        let mut audio = NullAudio;
        player.handle_input(dt, input, &mut events, &mut audio);
        player.integrate(dt);
    }

    #[test]
    fn velocity_components_stay_clamped() {
        let mut player = Player::new(PlayerClass::Archer, Vec3::ZERO);
        player.velocity = Vec3::new(500.0, -500.0, 500.0);
        player.integrate(0.016);
        assert!(player.velocity.x.abs() <= MAX_AXIS_SPEED);
        assert!(player.velocity.y.abs() <= MAX_AXIS_SPEED);
        assert!(player.velocity.z.abs() <= MAX_AXIS_SPEED);
    }

    #[test]
    fn forward_input_moves_along_negative_z() {
        let mut player = Player::new(PlayerClass::Warrior, Vec3::ZERO);
        player.grounded = true;
        tick(&mut player, 0.016, &snapshot(true));
        assert!(player.velocity.z < 0.0);
        assert_eq!(player.velocity.z, -PlayerClass::Warrior.move_speed());
    }

    #[test]
    fn sprint_multiplies_ground_speed() {
        let mut player = Player::new(PlayerClass::Warrior, Vec3::ZERO);
        player.grounded = true;
        let input = InputSnapshot {
            forward: true,
            sprint: true,
            ..Default::default()
        };
        tick(&mut player, 0.016, &input);
        assert_eq!(
            player.velocity.z,
            -PlayerClass::Warrior.move_speed() * SPRINT_MULTIPLIER
        );
    }

    #[test]
    fn jump_only_fires_on_press_edge() {
        let mut player = Player::new(PlayerClass::Warrior, Vec3::ZERO);
        player.grounded = true;
        let input = InputSnapshot {
            jump: true,
            ..Default::default()
        };
        tick(&mut player, 0.016, &input);
        assert!(player.jumping);

        // Holding jump while grounded again must not re-trigger.
        player.grounded = true;
        player.jumping = false;
        player.velocity.y = 0.0;
        tick(&mut player, 0.016, &input);
        assert!(!player.jumping);
    }

    #[test]
    fn fuel_drains_while_flying_and_blocks_reentry_when_empty() {
        let mut player = Player::new(PlayerClass::Mage, Vec3::ZERO);
        let input = InputSnapshot {
            fly: true,
            ..Default::default()
        };
        let mut events = EventQueue::new();
        let mut audio = NullAudio;

        // 5 s of continuous flight at 100 steps of 50 ms.
        for _ in 0..100 {
            player.handle_input(0.05, &input, &mut events, &mut audio);
            // Skip integrate: flight consumption must not be offset by regen.
        }
        assert!((player.fuel - 40.0).abs() < 1e-3);

        // Run it dry: flight ends and cannot restart until full regen.
        for _ in 0..100 {
            player.handle_input(0.05, &input, &mut events, &mut audio);
        }
        assert_eq!(player.fuel, 0.0);
        assert!(!player.flying);
        player.handle_input(0.05, &input, &mut events, &mut audio);
        assert!(!player.flying);
    }

    #[test]
    fn flight_ascent_is_capped() {
        let mut player = Player::new(PlayerClass::Mage, Vec3::ZERO);
        let input = InputSnapshot {
            fly: true,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut player, 0.016, &input);
        }
        assert!(player.velocity.y <= MAX_FLIGHT_ASCENT + 1e-4);
    }

    #[test]
    fn dash_locks_direction_and_respects_cooldown() {
        let mut player = Player::new(PlayerClass::Archer, Vec3::ZERO);
        player.grounded = true;
        let input = InputSnapshot {
            forward: true,
            dash: true,
            ..Default::default()
        };
        tick(&mut player, 0.016, &input);
        assert!(player.dashing);
        assert_eq!(player.velocity.z, -DASH_SPEED);

        // Dash expires after its window.
        for _ in 0..20 {
            tick(&mut player, 0.016, &input);
        }
        assert!(!player.dashing);

        // Still cooling down, a held dash key does not re-trigger.
        tick(&mut player, 0.016, &input);
        assert!(!player.dashing);
    }

    #[test]
    fn attack_emits_event_and_respects_cooldown() {
        let mut player = Player::new(PlayerClass::Warrior, Vec3::ZERO);
        let mut events = EventQueue::new();
        let mut audio = NullAudio;
        let input = InputSnapshot {
            attack: true,
            ..Default::default()
        };
        player.handle_input(0.016, &input, &mut events, &mut audio);
        assert!(player.attacking);
        assert_eq!(events.len(), 1);
        match events.pop() {
            Some(GameEvent::PlayerAttack { damage, class, .. }) => {
                assert_eq!(damage, 2.0);
                assert_eq!(class, PlayerClass::Warrior);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        // Second press inside the cooldown window is ignored.
        player.handle_input(0.016, &input, &mut events, &mut audio);
        assert!(events.is_empty());
    }

    #[test]
    fn archer_attack_spawns_arrow_with_reach_limited_lifetime() {
        let mut player = Player::new(PlayerClass::Archer, Vec3::ZERO);
        let mut events = EventQueue::new();
        let mut audio = NullAudio;
        let input = InputSnapshot {
            attack: true,
            ..Default::default()
        };
        player.handle_input(0.016, &input, &mut events, &mut audio);
        assert_eq!(player.projectiles.len(), 1);
        let arrow = &player.projectiles[0];
        assert_eq!(arrow.kind, ProjectileKind::Arrow);
        let reach = arrow.velocity.length() * arrow.lifetime;
        assert!((reach - PlayerClass::Archer.attack_range()).abs() < 1e-3);
    }

    #[test]
    fn warrior_attack_spawns_no_projectile() {
        let mut player = Player::new(PlayerClass::Warrior, Vec3::ZERO);
        let mut events = EventQueue::new();
        let mut audio = NullAudio;
        let input = InputSnapshot {
            attack: true,
            ..Default::default()
        };
        player.handle_input(0.016, &input, &mut events, &mut audio);
        assert!(player.projectiles.is_empty());
    }

    #[test]
    fn knockback_grants_invulnerability_once() {
        let mut player = Player::new(PlayerClass::Warrior, Vec3::ZERO);
        player.apply_knockback(Vec3::new(5.0, 0.0, 0.0));
        assert!(player.is_invulnerable());
        assert_eq!(player.velocity.x, 5.0);
    }

    #[test]
    fn expired_projectiles_are_removed() {
        let mut player = Player::new(PlayerClass::Mage, Vec3::ZERO);
        player.projectiles.push(Projectile {
            position: Vec3::ZERO,
            velocity: Vec3::Z,
            damage: 1.0,
            lifetime: 0.01,
            kind: ProjectileKind::Spell,
        });
        player.integrate(0.05);
        assert!(player.projectiles.is_empty());
    }

    #[test]
    fn rotation_approaches_movement_heading() {
        let mut player = Player::new(PlayerClass::Warrior, Vec3::ZERO);
        player.grounded = true;
        let input = InputSnapshot {
            right: true,
            ..Default::default()
        };
        for _ in 0..120 {
            tick(&mut player, 0.016, &input);
        }
        // Heading for +X movement is atan2(1, 0) = pi/2.
        assert!((player.rotation_y - PI / 2.0).abs() < 0.05);
    }

    #[test]
    fn reset_restores_transient_state_but_keeps_class() {
        let mut player = Player::new(PlayerClass::Mage, Vec3::ZERO);
        player.fuel = 10.0;
        player.velocity = Vec3::splat(3.0);
        player.set_invulnerable(1.0);
        player.reset(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(player.class, PlayerClass::Mage);
        assert_eq!(player.fuel, MAX_FUEL);
        assert_eq!(player.velocity, Vec3::ZERO);
        assert!(!player.is_invulnerable());
        assert_eq!(player.position, Vec3::new(0.0, 2.0, 0.0));
    }
}
