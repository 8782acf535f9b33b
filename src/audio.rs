/// Sound cues the simulation fires. Playback is a collaborator concern; the
/// core works the same whether anything is actually audible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sound {
    Jump,
    Land,
    Fly,
    Dash,
    Attack,
    AttackHit,
    ArrowHit,
    SpellHit,
    CollectCrystal,
    CollectSeed,
    PlayerDamage,
    EnemyAttack,
    EnemyDetect,
    EnemyDeath,
    GameOver,
    LevelComplete,
}

pub trait AudioOutput {
    fn play(&mut self, sound: Sound);
    /// Stop a looping sound. Non-looping sounds ignore this.
    fn stop(&mut self, sound: Sound);
}

/// No-op sink for tests and headless runs.
#[derive(Default)]
pub struct NullAudio;

impl AudioOutput for NullAudio {
    fn play(&mut self, _sound: Sound) {}
    fn stop(&mut self, _sound: Sound) {}
}

/// Sink that traces every cue, used by the headless demo driver.
#[derive(Default)]
pub struct LogAudio;

impl AudioOutput for LogAudio {
    fn play(&mut self, sound: Sound) {
        log::debug!("audio play: {sound:?}");
    }

    fn stop(&mut self, sound: Sound) {
        log::debug!("audio stop: {sound:?}");
    }
}
