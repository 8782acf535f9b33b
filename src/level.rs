use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;

use crate::collectible::{Collectible, CollectibleKind};
use crate::collision::{resolve_box, Aabb, Resolution};
use crate::config::ENEMY_HALF_EXTENT;
use crate::enemy::Enemy;
use crate::platform::{Axis, Platform};
use crate::player::Player;

const LEVEL_CATALOGUE: &str = include_str!("../assets/levels.json");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialFeature {
    MovingPlatforms,
    DisappearingPlatforms,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    pub difficulty: String,
    pub description: String,
    pub platform_count: usize,
    pub crystals: u32,
    pub seeds: u32,
    pub enemy_count: usize,
    #[serde(default)]
    pub special_features: Vec<SpecialFeature>,
    #[serde(default = "default_true")]
    pub has_ground: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level index {index} out of range ({count} levels)")]
    OutOfRange { index: usize, count: usize },
    #[error("failed to parse level catalogue: {0}")]
    Catalogue(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    Tree,
    Mushroom,
}

/// Static decorative collider. Resolved like a platform but never carries
/// the player.
#[derive(Clone, Debug)]
pub struct Obstacle {
    pub position: Vec3,
    pub half_extents: Vec3,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }
}

/// What happened while resolving the player against level geometry.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollisionEffects {
    /// True when the player touched down this frame after being airborne.
    pub landed: bool,
}

/// Sole owner of everything a level spawns. The orchestrator queries and
/// mutates entities through this container and never outlives it.
pub struct Level {
    pub name: String,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub obstacles: Vec<Obstacle>,
    pub spawn_point: Vec3,
    total_crystals: u32,
    total_seeds: u32,
}

impl Level {
    /// Place platforms, pickups, enemies and scenery from a config. The rng
    /// seed pins the layout, so the same (config, seed) pair always builds
    /// the same level.
    pub fn generate(config: &LevelConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut platforms = Vec::new();
        let mut spawn_point = Vec3::new(0.0, 2.0, 0.0);

        if config.has_ground {
            // Large slab just below y = 0, same resolution path as any
            // other platform.
            platforms.push(Platform::fixed(
                Vec3::new(0.0, -0.1, 0.0),
                Vec3::new(100.0, 0.1, 100.0),
            ));
        } else {
            // No ground: guarantee a perch under the spawn point.
            platforms.push(Platform::fixed(
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(3.0, 0.25, 3.0),
            ));
            spawn_point = Vec3::new(0.0, 2.5, 0.0);
        }

        let moving = config
            .special_features
            .contains(&SpecialFeature::MovingPlatforms);
        let disappearing = config
            .special_features
            .contains(&SpecialFeature::DisappearingPlatforms);

        let moving_count = if moving {
            (config.platform_count as f32 * 0.3) as usize
        } else {
            0
        };
        let disappearing_count = if disappearing {
            (config.platform_count as f32 * 0.2) as usize
        } else {
            0
        };
        let regular_count = config.platform_count - moving_count - disappearing_count;

        for _ in 0..regular_count {
            let position = scatter(&mut rng, 2.0, 12.0);
            let half = Vec3::new(
                rng.gen_range(1.0..2.5),
                0.25,
                rng.gen_range(1.0..2.5),
            );
            platforms.push(Platform::fixed(position, half));
        }

        for _ in 0..moving_count {
            let position = scatter(&mut rng, 2.0, 12.0);
            let half = Vec3::new(rng.gen_range(0.75..1.75), 0.25, rng.gen_range(0.75..1.75));
            let axis = if rng.gen_bool(0.5) { Axis::X } else { Axis::Z };
            let amplitude = rng.gen_range(3.0..8.0);
            let speed = rng.gen_range(1.0..3.0);
            platforms.push(Platform::moving(position, half, axis, amplitude, speed));
        }

        for _ in 0..disappearing_count {
            let position = scatter(&mut rng, 2.0, 12.0);
            let half = Vec3::new(rng.gen_range(0.75..1.75), 0.25, rng.gen_range(0.75..1.75));
            let visible_time = rng.gen_range(0.5..1.5);
            let reappear_time = rng.gen_range(1.0..3.0);
            platforms.push(Platform::disappearing(
                position,
                half,
                visible_time,
                reappear_time,
            ));
        }

        let mut collectibles = Vec::new();
        for _ in 0..config.crystals {
            let position = scatter(&mut rng, 2.0, 12.0);
            collectibles.push(Collectible::new(CollectibleKind::Crystal, position, &mut rng));
        }
        for _ in 0..config.seeds {
            let position = scatter(&mut rng, 2.0, 12.0);
            collectibles.push(Collectible::new(CollectibleKind::Seed, position, &mut rng));
        }

        let mut enemies = Vec::new();
        for _ in 0..config.enemy_count {
            let mut position = scatter(&mut rng, 0.0, 0.0);
            position.y = ENEMY_HALF_EXTENT;
            let patrol_radius = rng.gen_range(3.0..8.0);
            enemies.push(Enemy::new(position, patrol_radius, &mut rng));
        }

        let mut obstacles = Vec::new();
        if config.has_ground {
            for _ in 0..12 {
                if let Some(position) = scatter_clear(&mut rng, 90.0, &platforms) {
                    obstacles.push(Obstacle {
                        position: Vec3::new(position.x, 4.0, position.z),
                        half_extents: Vec3::new(1.0, 4.0, 1.0),
                        kind: ObstacleKind::Tree,
                    });
                }
            }
            for _ in 0..8 {
                if let Some(position) = scatter_clear(&mut rng, 80.0, &platforms) {
                    obstacles.push(Obstacle {
                        position: Vec3::new(position.x, 0.5, position.z),
                        half_extents: Vec3::splat(0.5),
                        kind: ObstacleKind::Mushroom,
                    });
                }
            }
        }

        Self {
            name: config.name.clone(),
            platforms,
            enemies,
            collectibles,
            obstacles,
            spawn_point,
            total_crystals: config.crystals,
            total_seeds: config.seeds,
        }
    }

    /// Fixed at generation time; pickups and kill bonuses count against it.
    pub fn total_crystals(&self) -> u32 {
        self.total_crystals
    }

    pub fn total_seeds(&self) -> u32 {
        self.total_seeds
    }

    /// Advance platforms, collectibles and enemies. Returns how many
    /// enemies spotted the player for the first time this frame.
    pub fn update(&mut self, dt: f32, player_position: Vec3) -> u32 {
        for platform in &mut self.platforms {
            platform.update(dt);
        }
        for collectible in &mut self.collectibles {
            collectible.update(dt);
        }
        let mut detections = 0;
        for enemy in &mut self.enemies {
            if enemy.update(dt, player_position) {
                detections += 1;
            }
        }
        detections
    }

    pub fn remove_dead_enemies(&mut self) {
        self.enemies.retain(|e| !e.is_dead());
    }

    /// Push the player out of platforms and obstacles. Landing on a moving
    /// platform also carries the player with it.
    pub fn resolve_player_collisions(&self, player: &mut Player, dt: f32) -> CollisionEffects {
        let mut effects = CollisionEffects::default();
        let mut supported = false;

        for platform in &self.platforms {
            if !platform.is_active() {
                continue;
            }
            let mut body = player.as_body();
            let Some(resolution) = resolve_box(&mut body, &platform.aabb()) else {
                continue;
            };
            player.apply_body(&body);
            if resolution == Resolution::Landed {
                supported = true;
                player.grounded = true;
                player.jumping = false;
                if player.was_in_air {
                    player.was_in_air = false;
                    effects.landed = true;
                }
                player.position += platform.velocity() * dt;
            }
        }

        for obstacle in &self.obstacles {
            let mut body = player.as_body();
            let Some(resolution) = resolve_box(&mut body, &obstacle.aabb()) else {
                continue;
            };
            player.apply_body(&body);
            if resolution == Resolution::Landed {
                supported = true;
                player.grounded = true;
                player.jumping = false;
                if player.was_in_air {
                    player.was_in_air = false;
                    effects.landed = true;
                }
            }
        }

        // Walked off an edge (or the platform vanished underneath us).
        if !supported && player.grounded && !player.flying {
            player.grounded = false;
            player.was_in_air = true;
        }

        effects
    }

    /// Remove and return every collectible overlapping the player.
    pub fn collect_pickups(&mut self, player_aabb: &Aabb) -> Vec<CollectibleKind> {
        let mut picked = Vec::new();
        self.collectibles.retain(|collectible| {
            if collectible.aabb().intersects(player_aabb) {
                picked.push(collectible.kind);
                false
            } else {
                true
            }
        });
        picked
    }
}

fn scatter(rng: &mut SmallRng, min_y: f32, y_span: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-20.0..20.0),
        if y_span > 0.0 {
            rng.gen_range(min_y..min_y + y_span)
        } else {
            min_y
        },
        rng.gen_range(-20.0..20.0),
    )
}

/// Pick a ground position away from the spawn point and existing platforms
/// so scenery never blocks a landing spot.
fn scatter_clear(rng: &mut SmallRng, span: f32, platforms: &[Platform]) -> Option<Vec3> {
    for _ in 0..8 {
        let candidate = Vec3::new(
            rng.gen_range(-span..span),
            0.0,
            rng.gen_range(-span..span),
        );
        if candidate.length() < 4.0 {
            continue;
        }
        let clear = platforms.iter().skip(1).all(|p| {
            let d = p.position - candidate;
            (d.x * d.x + d.z * d.z).sqrt() >= 3.0
        });
        if clear {
            return Some(candidate);
        }
    }
    None
}

/// Owns the level catalogue and the currently loaded level.
pub struct LevelManager {
    configs: Vec<LevelConfig>,
    current_index: usize,
    current: Level,
}

impl LevelManager {
    pub fn new() -> Result<Self, LevelError> {
        Self::from_catalogue(LEVEL_CATALOGUE)
    }

    pub fn from_catalogue(json: &str) -> Result<Self, LevelError> {
        let configs: Vec<LevelConfig> = serde_json::from_str(json)?;
        let Some(first) = configs.first() else {
            return Err(LevelError::OutOfRange { index: 0, count: 0 });
        };
        let current = Level::generate(first, 0);
        Ok(Self {
            configs,
            current_index: 0,
            current,
        })
    }

    pub fn load_level(&mut self, index: usize) -> Result<(), LevelError> {
        let Some(config) = self.configs.get(index) else {
            return Err(LevelError::OutOfRange {
                index,
                count: self.configs.len(),
            });
        };
        self.current = Level::generate(config, index as u64);
        self.current_index = index;
        log::info!("loaded level {}: {}", index, self.current.name);
        Ok(())
    }

    pub fn load_next_level(&mut self) -> Result<(), LevelError> {
        self.load_level((self.current_index + 1) % self.configs.len())
    }

    /// Rebuild the current level from its config, restoring every entity.
    pub fn reset_current(&mut self) {
        self.current = Level::generate(&self.configs[self.current_index], self.current_index as u64);
    }

    pub fn current(&self) -> &Level {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut Level {
        &mut self.current
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn level_count(&self) -> usize {
        self.configs.len()
    }

    pub fn level_info(&self, index: usize) -> Option<&LevelConfig> {
        self.configs.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_FUEL;
    use crate::player::PlayerClass;

    fn test_config() -> LevelConfig {
        LevelConfig {
            name: "Test Grove".into(),
            difficulty: "easy".into(),
            description: String::new(),
            platform_count: 10,
            crystals: 5,
            seeds: 3,
            enemy_count: 2,
            special_features: vec![SpecialFeature::MovingPlatforms],
            has_ground: true,
        }
    }

    #[test]
    fn generation_honors_config_counts() {
        let level = Level::generate(&test_config(), 1);
        // Platform count plus the ground slab.
        assert_eq!(level.platforms.len(), 11);
        assert_eq!(level.collectibles.len(), 8);
        assert_eq!(level.enemies.len(), 2);
        assert_eq!(level.total_crystals(), 5);
        assert_eq!(level.total_seeds(), 3);
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let a = Level::generate(&test_config(), 9);
        let b = Level::generate(&test_config(), 9);
        for (pa, pb) in a.platforms.iter().zip(&b.platforms) {
            assert_eq!(pa.position, pb.position);
        }
    }

    #[test]
    fn player_falls_onto_ground_slab_and_lands_once() {
        // Bare level: just the ground slab, so nothing else can catch the fall.
        let mut config = test_config();
        config.platform_count = 0;
        config.special_features.clear();
        config.enemy_count = 0;
        let level = Level::generate(&config, 1);
        let mut player = Player::new(PlayerClass::Warrior, Vec3::new(0.0, 2.0, 0.0));
        player.was_in_air = true;

        let mut landed_frames = 0;
        for _ in 0..120 {
            player.integrate(0.016);
            let effects = level.resolve_player_collisions(&mut player, 0.016);
            if effects.landed {
                landed_frames += 1;
            }
        }
        assert!(player.grounded);
        assert_eq!(landed_frames, 1);
        // Resting on the slab top at y = 0 plus half the player height.
        assert!((player.position.y - 0.8).abs() < 1e-3);
        assert_eq!(player.fuel, MAX_FUEL);
    }

    #[test]
    fn pickups_are_removed_on_overlap() {
        let mut level = Level::generate(&test_config(), 1);
        let target = level.collectibles[0].position;
        let before = level.collectibles.len();
        let player_box = Aabb::from_center_half_extents(target, Vec3::splat(0.5));
        let picked = level.collect_pickups(&player_box);
        assert!(!picked.is_empty());
        assert_eq!(level.collectibles.len(), before - picked.len());
    }

    #[test]
    fn manager_rejects_out_of_range_index() {
        let mut manager = LevelManager::new().unwrap();
        let before = manager.current_index();
        assert!(matches!(
            manager.load_level(99),
            Err(LevelError::OutOfRange { index: 99, .. })
        ));
        // Failed load leaves the current level untouched.
        assert_eq!(manager.current_index(), before);
    }

    #[test]
    fn manager_cycles_through_catalogue() {
        let mut manager = LevelManager::new().unwrap();
        let count = manager.level_count();
        assert_eq!(count, 3);
        for expected in [1, 2, 0] {
            manager.load_next_level().unwrap();
            assert_eq!(manager.current_index(), expected);
        }
    }

    #[test]
    fn catalogue_parses_embedded_features() {
        let manager = LevelManager::new().unwrap();
        let hard = manager.level_info(2).unwrap();
        assert!(hard
            .special_features
            .contains(&SpecialFeature::DisappearingPlatforms));
        assert!(!hard.has_ground);
    }
}
