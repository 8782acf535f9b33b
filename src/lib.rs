pub mod audio;
pub mod camera;
pub mod collectible;
pub mod collision;
pub mod config;
pub mod enemy;
pub mod events;
pub mod game;
pub mod input;
pub mod level;
pub mod platform;
pub mod player;

pub use audio::{AudioOutput, LogAudio, NullAudio, Sound};
pub use game::{Game, GamePhase, Score};
pub use input::{InputSnapshot, InputState};
pub use level::{Level, LevelError, LevelManager};
pub use player::PlayerClass;
