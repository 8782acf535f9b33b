use glam::Vec3;
use web_time::Instant;

use crate::audio::{AudioOutput, Sound};
use crate::camera::CameraRig;
use crate::collision::cone_hit;
use crate::config::*;
use crate::events::{EventQueue, GameEvent};
use crate::input::InputSnapshot;
use crate::level::{LevelError, LevelManager};
use crate::player::{Player, PlayerClass, ProjectileKind};

/// Session phases. `GameOver` and `LevelComplete` are terminal until a UI
/// command restarts or advances; both are reachable only from `Playing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    ClassSelect,
    Playing,
    Paused,
    GameOver,
    LevelComplete,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    pub crystals: u32,
    pub seeds: u32,
}

/// The orchestrator. Owns the authoritative game state (phase, score,
/// health) and drives every subsystem in a fixed order once per frame.
pub struct Game {
    pub phase: GamePhase,
    pub score: Score,
    pub health: f32,
    pub player: Player,
    pub camera: CameraRig,
    levels: LevelManager,
    events: EventQueue,
    audio: Box<dyn AudioOutput>,
    last_tick: Option<Instant>,
}

impl Game {
    pub fn new(audio: Box<dyn AudioOutput>) -> Result<Self, LevelError> {
        let levels = LevelManager::new()?;
        let spawn = levels.current().spawn_point;
        Ok(Self {
            phase: GamePhase::ClassSelect,
            score: Score::default(),
            health: MAX_HEALTH,
            player: Player::new(PlayerClass::Warrior, spawn),
            camera: CameraRig::new(spawn),
            levels,
            events: EventQueue::new(),
            audio,
            last_tick: None,
        })
    }

    pub fn levels(&self) -> &LevelManager {
        &self.levels
    }

    pub fn levels_mut(&mut self) -> &mut LevelManager {
        &mut self.levels
    }

    /// UI command: pick a class and start the session.
    pub fn select_class(&mut self, class: PlayerClass) {
        if self.phase != GamePhase::ClassSelect {
            return;
        }
        let spawn = self.levels.current().spawn_point;
        self.player = Player::new(class, spawn);
        self.camera.snap_to(spawn);
        self.phase = GamePhase::Playing;
        log::info!("class selected: {class:?}, starting {}", self.levels.current().name);
    }

    /// Real-time entry point: measures dt from the wall clock and steps the
    /// simulation. The cap keeps long frame stalls (tab backgrounding) from
    /// destabilizing integration.
    pub fn tick(&mut self, input: &InputSnapshot) {
        let now = Instant::now();
        let dt = self
            .last_tick
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_tick = Some(now);
        self.update(dt, input);
    }

    /// One simulation step. The stage order is fixed; reordering changes
    /// observable behavior.
    pub fn update(&mut self, dt: f32, input: &InputSnapshot) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let dt = dt.clamp(0.0, MAX_DELTA_TIME);

        // 1. Input and kinematics.
        self.player
            .handle_input(dt, input, &mut self.events, self.audio.as_mut());
        self.player.integrate(dt);

        // 2. World geometry.
        let effects = self
            .levels
            .current()
            .resolve_player_collisions(&mut self.player, dt);
        if effects.landed {
            self.audio.play(Sound::Land);
        }

        // 3. Level entities.
        let detections = self
            .levels
            .current_mut()
            .update(dt, self.player.position);
        for _ in 0..detections {
            self.audio.play(Sound::EnemyDetect);
        }

        // 4. Entity interactions.
        self.collect_pickups();
        self.resolve_enemy_contacts();
        self.resolve_projectile_hits();
        if self.player.position.y < WORLD_FLOOR_Y {
            self.damage_player(FALL_DAMAGE);
        }

        // 5. Combat/score event routing.
        self.drain_events();
        self.levels.current_mut().remove_dead_enemies();

        // 6. Camera follow.
        self.camera.follow(self.player.position, self.player.flying);

        // 7. Win/lose evaluation. At most one terminal transition per
        // tick; completing the level wins a tie with dying.
        if self.score.crystals >= self.levels.current().total_crystals() {
            self.level_complete();
        } else if self.health <= 0.0 {
            self.game_over();
        }
    }

    /// Single chokepoint for every damage source: enemy strikes, contact
    /// hits, falling out of the world. A no-op while invulnerable.
    pub fn damage_player(&mut self, amount: f32) {
        if self.player.is_invulnerable() {
            return;
        }
        self.health = (self.health - amount).clamp(0.0, MAX_HEALTH);
        self.player.set_invulnerable(DAMAGE_INVULN_TIME);
        self.audio.play(Sound::PlayerDamage);
    }

    fn collect_pickups(&mut self) {
        let player_box = self.player.collider();
        let picked = self.levels.current_mut().collect_pickups(&player_box);
        for kind in picked {
            match kind {
                crate::collectible::CollectibleKind::Crystal => {
                    self.score.crystals += 1;
                    self.audio.play(Sound::CollectCrystal);
                }
                crate::collectible::CollectibleKind::Seed => {
                    self.score.seeds += 1;
                    self.audio.play(Sound::CollectSeed);
                }
            }
        }
    }

    fn resolve_enemy_contacts(&mut self) {
        let player_box = self.player.collider();
        let player_position = self.player.position;

        struct Contact {
            damage: Option<f32>,
            impulse: Vec3,
        }
        let mut contacts = Vec::new();
        for enemy in &self.levels.current().enemies {
            if !player_box.intersects(&enemy.collider()) {
                continue;
            }
            let away = (player_position - enemy.position)
                .try_normalize()
                .unwrap_or(Vec3::Z);
            // Damage only lands while the boxes overlap during the strike
            // window, so a player who keeps their distance through the
            // swing takes nothing.
            let struck = enemy.is_attacking() && !self.player.is_invulnerable();
            contacts.push(Contact {
                damage: struck.then(|| enemy.attack_damage()),
                impulse: away * ENEMY_CONTACT_KNOCKBACK,
            });
        }

        for contact in contacts {
            if let Some(damage) = contact.damage {
                self.damage_player(damage);
                self.audio.play(Sound::EnemyAttack);
            }
            // Brushing against an enemy shoves the player away even outside
            // the strike window.
            self.player.apply_knockback(contact.impulse);
        }
    }

    fn resolve_projectile_hits(&mut self) {
        let projectiles = std::mem::take(&mut self.player.projectiles);
        let level = self.levels.current_mut();
        let mut surviving = Vec::with_capacity(projectiles.len());

        for projectile in projectiles {
            let mut impact = None;
            for enemy in level.enemies.iter_mut() {
                if !projectile.aabb().intersects(&enemy.collider()) {
                    continue;
                }
                enemy.take_damage(projectile.damage, &mut self.events);
                let direction = projectile.velocity.try_normalize().unwrap_or(Vec3::Z);
                enemy.apply_knockback(direction * PROJECTILE_KNOCKBACK);
                impact = Some((projectile.position, projectile.kind, projectile.damage));
                break;
            }

            let Some((position, kind, damage)) = impact else {
                surviving.push(projectile);
                continue;
            };
            match kind {
                ProjectileKind::Arrow => self.audio.play(Sound::ArrowHit),
                ProjectileKind::Spell => {
                    self.audio.play(Sound::SpellHit);
                    // Splash: half damage to everything near the impact.
                    for enemy in level.enemies.iter_mut() {
                        if enemy.position.distance(position) <= SPELL_SPLASH_RADIUS {
                            enemy.take_damage(damage / 2.0, &mut self.events);
                        }
                    }
                }
            }
        }

        self.player.projectiles = surviving;
    }

    fn drain_events(&mut self) {
        let mut any_death = false;
        while let Some(event) = self.events.pop() {
            match event {
                GameEvent::PlayerAttack {
                    position,
                    direction,
                    range,
                    angle,
                    damage,
                    class,
                } => {
                    // Ranged classes resolve through projectiles; only the
                    // warrior's swing is an immediate cone check.
                    if class != PlayerClass::Warrior {
                        continue;
                    }
                    let level = self.levels.current_mut();
                    for enemy in level.enemies.iter_mut() {
                        if !cone_hit(position, direction, enemy.position, range, angle) {
                            continue;
                        }
                        enemy.take_damage(damage, &mut self.events);
                        let push = (enemy.position - position)
                            .try_normalize()
                            .unwrap_or(direction);
                        enemy.apply_knockback(push * MELEE_KNOCKBACK);
                        self.audio.play(Sound::AttackHit);
                    }
                }
                GameEvent::EnemyDied { score_value, .. } => {
                    any_death = true;
                    self.score.crystals += score_value;
                    self.audio.play(Sound::EnemyDeath);
                }
            }
        }

        if any_death {
            let level = self.levels.current();
            if level.enemies.iter().all(|e| e.is_dead()) {
                self.score.crystals += ALL_ENEMIES_BONUS;
                log::info!("all enemies defeated, +{ALL_ENEMIES_BONUS} crystals");
            }
        }
    }

    /// UI command: flip between playing and paused. Ignored in terminal
    /// phases and before a class is chosen.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => self.phase = GamePhase::Paused,
            GamePhase::Paused => self.phase = GamePhase::Playing,
            _ => {}
        }
    }

    /// UI command: rebuild the current level and start over.
    pub fn restart_game(&mut self) {
        if self.phase == GamePhase::ClassSelect {
            return;
        }
        self.levels.reset_current();
        self.begin_level();
    }

    /// UI command: advance to the next level in the catalogue.
    pub fn next_level(&mut self) -> Result<(), LevelError> {
        if self.phase == GamePhase::ClassSelect {
            return Ok(());
        }
        self.levels.load_next_level()?;
        self.begin_level();
        Ok(())
    }

    fn begin_level(&mut self) {
        let spawn = self.levels.current().spawn_point;
        self.score = Score::default();
        self.health = MAX_HEALTH;
        self.player.reset(spawn);
        self.camera.snap_to(spawn);
        self.events = EventQueue::new();
        self.phase = GamePhase::Playing;
    }

    fn game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.audio.play(Sound::GameOver);
        log::info!("game over");
    }

    fn level_complete(&mut self) {
        if self.phase == GamePhase::LevelComplete {
            return;
        }
        self.phase = GamePhase::LevelComplete;
        self.audio.play(Sound::LevelComplete);
        log::info!(
            "level complete: {} ({} crystals, {} seeds)",
            self.levels.current().name,
            self.score.crystals,
            self.score.seeds
        );
    }
}
