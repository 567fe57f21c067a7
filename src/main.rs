//! Alien Raid - headless runner
//!
//! Plays the game with the autopilot, drawing into an in-memory canvas and
//! mixing into the in-memory audio manager. Usage:
//!
//! ```text
//! alien-raid [settings.json]
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use alien_raid::Settings;
    use alien_raid::app::{ControllerEnd, Devices, GameController};
    use alien_raid::assets::{Manifest, Sprites};
    use alien_raid::audio::AudioManager;
    use alien_raid::autopilot::Autopilot;
    use alien_raid::platform::{FrameClock, ManualClock, PacedClock};
    use alien_raid::renderer::DrawList;
    use alien_raid::sim::{GameState, Outcome};

    env_logger::init();
    log::info!("Alien Raid starting...");

    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load_or_default(settings_path.as_deref());

    let sprites = match &settings.asset_manifest {
        Some(path) => Manifest::load(path).and_then(|m| Sprites::from_manifest(&m)),
        None => Sprites::builtin(),
    };
    let sprites = match sprites {
        Ok(sprites) => sprites,
        Err(e) => {
            log::error!("Cannot load images: {e}");
            return ExitCode::FAILURE;
        }
    };

    let seed = settings.resolve_seed();
    log::info!("Game initialized with seed: {}", seed);
    let state = GameState::new(seed, sprites);

    let mut input = Autopilot::new();
    let mut canvas = DrawList::new();
    let mut audio = AudioManager::from_settings(&settings);
    let mut paced = PacedClock::default();
    let mut manual = ManualClock::default();
    let clock: &mut dyn FrameClock = if settings.realtime {
        &mut paced
    } else {
        &mut manual
    };

    let mut controller = GameController::new(state, settings.rounds);
    let end = controller.run(&mut Devices {
        input: &mut input,
        canvas: &mut canvas,
        audio: &mut audio,
        clock,
    });

    let wins = controller
        .outcomes()
        .iter()
        .filter(|&&o| o == Outcome::Win)
        .count();
    log::info!(
        "Finished ({}): {} win(s), {} loss(es) over {} frames",
        match end {
            ControllerEnd::Quit => "quit",
            ControllerEnd::RoundLimit => "round limit",
        },
        wins,
        controller.outcomes().len() - wins,
        canvas.frames()
    );
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No wasm entry point; the library is usable from a wasm host directly
}
