// Simulation
pub const MAX_DELTA_TIME: f32 = 0.1; // cap per-frame dt after tab stalls
pub const MAX_AXIS_SPEED: f32 = 20.0; // per-axis velocity clamp
pub const GRAVITY: f32 = 22.0;
pub const WORLD_FLOOR_Y: f32 = -10.0; // below this the fall is lethal
pub const FALL_DAMAGE: f32 = 100.0;

// Player dimensions
pub const PLAYER_HALF_WIDTH: f32 = 0.4;
pub const PLAYER_HALF_HEIGHT: f32 = 0.8;

// Movement
pub const SPRINT_MULTIPLIER: f32 = 1.5;
pub const TURN_RATE: f32 = 10.0; // yaw interpolation, rad/s per rad of error
pub const JUMP_VELOCITY: f32 = 12.0;
pub const JUMP_CLEARANCE: f32 = 0.3; // lift off the surface before the next resolve pass

// Flight
pub const MAX_FUEL: f32 = 100.0;
pub const FUEL_CONSUMPTION_RATE: f32 = 12.0; // per second while flying
pub const FUEL_REGENERATION_RATE: f32 = 8.0; // per second while not flying
pub const FLIGHT_CLIMB_ACCEL: f32 = 180.0;
pub const MAX_FLIGHT_ASCENT: f32 = 7.0; // vertical speed ceiling while climbing
pub const FLIGHT_MOVE_SPEED: f32 = 7.0;

// Dash
pub const DASH_SPEED: f32 = 30.0;
pub const DASH_DURATION: f32 = 0.2;
pub const DASH_COOLDOWN: f32 = 1.5;

// Health and damage
pub const MAX_HEALTH: f32 = 100.0;
pub const DAMAGE_INVULN_TIME: f32 = 1.5;
pub const KNOCKBACK_INVULN_TIME: f32 = 1.0;
pub const PLAYER_KNOCKBACK_RECOVERY: f32 = 0.3; // control suppressed while shoved

// Knockback impulse magnitudes by source
pub const ENEMY_CONTACT_KNOCKBACK: f32 = 8.0;
pub const MELEE_KNOCKBACK: f32 = 3.0;
pub const PROJECTILE_KNOCKBACK: f32 = 2.0;

// Enemies
pub const ENEMY_MAX_HEALTH: f32 = 3.0;
pub const ENEMY_HALF_EXTENT: f32 = 0.6;
pub const ENEMY_CONTACT_DAMAGE: f32 = 10.0;
pub const ENEMY_DETECTION_RADIUS: f32 = 10.0;
pub const ENEMY_DETECTION_EXIT_FACTOR: f32 = 1.5; // hysteresis on losing the player
pub const ENEMY_ATTACK_RANGE: f32 = 2.0;
pub const ENEMY_ATTACK_TELEGRAPH: f32 = 1.0; // wind-up before the strike lands
pub const ENEMY_ATTACK_DURATION: f32 = 0.5;
pub const ENEMY_ATTACK_COOLDOWN: f32 = 2.0;
pub const ENEMY_STUN_TIME: f32 = 0.5;
pub const ENEMY_INVULN_TIME: f32 = 0.5;
pub const ENEMY_KNOCKBACK_RECOVERY: f32 = 0.3;
pub const ENEMY_PATROL_SPEED: f32 = 0.5;
pub const ENEMY_MOVE_SPEED: f32 = 3.5; // chase speed
pub const ENEMY_CHASE_TURN_RATE: f32 = 5.0;
pub const ENEMY_SCORE_VALUE: u32 = 1;
pub const ALL_ENEMIES_BONUS: u32 = 5;

// Projectiles
pub const PROJECTILE_HALF_EXTENT: f32 = 0.15;
pub const SPELL_SPLASH_RADIUS: f32 = 3.0;

// Platforms
pub const PLATFORM_FADE_TIME: f32 = 0.5;

// Collectibles
pub const CRYSTAL_HALF_EXTENT: f32 = 0.3;
pub const SEED_HALF_EXTENT: f32 = 0.2;
pub const COLLECTIBLE_BOB_HEIGHT: f32 = 0.25;

// Camera
pub const CAMERA_OFFSET: [f32; 3] = [0.0, 5.0, 10.0];
pub const CAMERA_OFFSET_FLYING: [f32; 3] = [0.0, 8.0, 15.0];
pub const CAMERA_LERP: f32 = 0.1;
