use winit::keyboard::KeyCode;

use sylva::{Game, GamePhase, InputState, LogAudio, PlayerClass};

/// Headless demo driver: runs a short scripted session at a fixed 60 Hz
/// step and logs what happens. Useful for eyeballing the simulation
/// without a renderer attached.
pub fn run() {
    #[cfg(target_arch = "wasm32")]
    {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        console_log::init_with_level(log::Level::Info).expect("Couldn't initialize logger");
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let class = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(PlayerClass::Warrior);

    let mut game = match Game::new(Box::new(LogAudio)) {
        Ok(game) => game,
        Err(err) => {
            log::error!("failed to load level catalogue: {err}");
            return;
        }
    };
    game.select_class(class);

    let mut input = InputState::new();
    let dt = 1.0 / 60.0;
    let total_frames = 30 * 60;

    for frame in 0..total_frames {
        script_inputs(&mut input, frame);
        game.update(dt, &input.snapshot());
        if matches!(game.phase, GamePhase::GameOver | GamePhase::LevelComplete) {
            break;
        }
        if frame % 300 == 0 {
            log::info!(
                "t={:>5.1}s pos=({:.1}, {:.1}, {:.1}) health={} crystals={}/{} seeds={}",
                frame as f32 * dt,
                game.player.position.x,
                game.player.position.y,
                game.player.position.z,
                game.health,
                game.score.crystals,
                game.levels().current().total_crystals(),
                game.score.seeds,
            );
        }
    }

    log::info!(
        "session ended in {:?}: {} crystals, {} seeds, {} health",
        game.phase,
        game.score.crystals,
        game.score.seeds,
        game.health
    );
}

/// A canned tour of the controls: run around, sprint, hop, take flight,
/// and swing on the way.
fn script_inputs(input: &mut InputState, frame: u32) {
    match frame {
        0 => input.handle_key_press(KeyCode::KeyW),
        180 => input.handle_key_press(KeyCode::ShiftLeft),
        240 => input.handle_key_press(KeyCode::Space),
        250 => input.handle_key_release(KeyCode::Space),
        360 => {
            input.handle_key_release(KeyCode::ShiftLeft);
            input.handle_key_press(KeyCode::KeyA);
        }
        480 => {
            input.handle_key_release(KeyCode::KeyA);
            input.handle_key_press(KeyCode::KeyF);
        }
        720 => input.handle_key_release(KeyCode::KeyF),
        _ => {}
    }
    // Swing or shoot once a second.
    if frame % 60 == 0 {
        input.handle_key_press(KeyCode::KeyE);
    } else if frame % 60 == 5 {
        input.handle_key_release(KeyCode::KeyE);
    }
}

fn main() {
    run();
}
