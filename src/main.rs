//! Tilt Hockey headless driver
//!
//! Runs the gameplay core against a scripted physics thread and a scripted
//! tilt sensor, logging every output the host would apply. Useful for
//! checking tuning files without a device.
//!
//! Usage: `tilt-hockey [tuning.json] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library; there is nothing to drive here
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::PathBuf;
    use std::thread;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use glam::Vec3;

    use tilt_hockey::consts::PHYSICS_DT;
    use tilt_hockey::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
    use tilt_hockey::platform::ScriptedMotion;
    use tilt_hockey::sim::{
        BodyRole, ContactPhase, Engine, GamePhase, Input, InputSender, Output, RngDice, Session,
        TiltPipeline,
    };
    use tilt_hockey::{HighScore, Settings, Tuning};

    const SAVE_FILE: &str = "tilt-hockey-save.json";

    pub fn run() {
        let mut args = std::env::args().skip(1).map(PathBuf::from);
        let tuning = args
            .next()
            .map(|p| Tuning::load_or_default(&p))
            .unwrap_or_default();
        let settings = args
            .next()
            .map(|p| Settings::load_or_default(&p))
            .unwrap_or_default();

        let store: Box<dyn KeyValueStore> = match JsonFileStore::open(SAVE_FILE) {
            Ok(store) => Box::new(store),
            Err(err) => {
                log::warn!("Can't open {SAVE_FILE} ({err}); high score won't persist");
                Box::new(MemoryStore::new())
            }
        };
        let high_score = HighScore::load(store);

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        log::info!("Tilt Hockey starting (seed {seed})");

        let engine = Engine::new(tuning, &settings, high_score, RngDice::from_seed(seed));
        // Gentle right-then-left sway
        let motion = ScriptedMotion::new(
            (0..120).map(|i| Vec3::new(((i as f32) * 0.1).sin() * 0.4, -0.9, 0.0)),
        );
        let mut session = Session::new(engine, TiltPipeline::new(Box::new(motion)), &settings);

        let ui = session.sender();
        ui.send(Input::PlaneDetected);
        ui.send(Input::PlaceField(Vec3::new(0.0, -0.5, -1.0)));
        ui.send(Input::Start);

        let physics = session.sender();
        let worker = thread::Builder::new()
            .name("physics".into())
            .spawn(move || scripted_rallies(&physics));
        if let Err(err) = worker {
            log::error!("Can't start physics thread: {err}");
            return;
        }

        let mut frame = Duration::ZERO;
        while session.engine().phase() != GamePhase::GameOver {
            let outputs = session.pump_timeout(Duration::from_millis(16));
            frame += Duration::from_millis(16);
            ui.send(Input::Advance(0.016));
            log_outputs(&outputs);
            if frame > Duration::from_secs(30) {
                log::warn!("Demo timed out");
                break;
            }
        }
        log_outputs(&session.pump());

        let engine = session.engine();
        log::info!(
            "Final score {} (best {})",
            engine.state().score,
            engine.high_score()
        );
        log::info!("{}", engine.share_message());
    }

    /// Physics thread stand-in: a few won points, then a losing streak.
    /// Every contact is reported three times, like a real contact solver.
    fn scripted_rallies(physics: &InputSender) {
        let step = Duration::from_secs_f32(PHYSICS_DT * 30.0);
        let burst = |a: BodyRole, b: BodyRole| {
            for _ in 0..3 {
                if !physics.contact(ContactPhase::Begin, a, b) {
                    return false;
                }
            }
            thread::sleep(step);
            true
        };

        for point in 0..12 {
            if !burst(BodyRole::Puck, BodyRole::AttackerBoundary) {
                return;
            }
            // Every third point the striker misses
            let (a, b) = if point % 3 == 2 {
                (BodyRole::DefenderBoundary, BodyRole::Puck)
            } else {
                (BodyRole::Striker, BodyRole::Puck)
            };
            if !burst(a, b) {
                return;
            }
        }
        physics.named_contact(ContactPhase::Begin, "firstPlayerStriker", "leftWallForStriker");
        physics.send(Input::Shake);
        loop {
            if !burst(BodyRole::Puck, BodyRole::AttackerBoundary)
                || !burst(BodyRole::Puck, BodyRole::DefenderBoundary)
            {
                return;
            }
        }
    }

    fn log_outputs(outputs: &[Output]) {
        for output in outputs {
            match output {
                Output::GameOver { score } => log::info!("Game over with {score} points"),
                Output::Display(update) => log::info!("HUD: {:?}", update),
                other => log::debug!("{:?}", other),
            }
        }
    }
}
