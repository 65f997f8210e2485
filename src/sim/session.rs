//! Single-writer game session
//!
//! Contact callbacks arrive on the physics thread, tilt samples on the
//! sampler thread and UI actions on the host's main thread. None of them
//! touch the engine: they push `Input`s into one queue and the session
//! thread applies them in arrival order.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use glam::Vec3;

use super::body::BodyRole;
use super::collision::ContactPhase;
use super::dice::{Dice, RngDice};
use super::engine::Engine;
use super::events::Output;
use super::tilt::TiltPipeline;
use crate::error::TiltError;
use crate::settings::Settings;

/// Everything that can happen to a game
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Contact {
        phase: ContactPhase,
        a: BodyRole,
        b: BodyRole,
    },
    /// Contact reported by scene node names
    NamedContact {
        phase: ContactPhase,
        a: String,
        b: String,
    },
    /// Gravity sample
    Tilt(Vec3),
    PlaneDetected,
    PlaceField(Vec3),
    Start,
    ChooseNewPlane,
    Shake,
    /// Elapsed seconds for obstacle animation
    Advance(f32),
}

/// Cloneable handle for producer threads
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<Input>,
}

impl InputSender {
    /// Queue an input. Returns false once the session is gone.
    pub fn send(&self, input: Input) -> bool {
        self.tx.send(input).is_ok()
    }

    pub fn contact(&self, phase: ContactPhase, a: BodyRole, b: BodyRole) -> bool {
        self.send(Input::Contact { phase, a, b })
    }

    pub fn named_contact(&self, phase: ContactPhase, a: &str, b: &str) -> bool {
        self.send(Input::NamedContact {
            phase,
            a: a.to_owned(),
            b: b.to_owned(),
        })
    }
}

/// Owns the engine and the tilt pipeline; the only writer of game state
#[derive(Debug)]
pub struct Session<D: Dice = RngDice> {
    engine: Engine<D>,
    tx: Sender<Input>,
    rx: Receiver<Input>,
    tilt: TiltPipeline,
    tilt_enabled: bool,
    tilt_warned: bool,
}

impl<D: Dice> Session<D> {
    pub fn new(engine: Engine<D>, tilt: TiltPipeline, settings: &Settings) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            engine,
            tx,
            rx,
            tilt,
            tilt_enabled: settings.tilt_enabled,
            tilt_warned: false,
        }
    }

    pub fn sender(&self) -> InputSender {
        InputSender {
            tx: self.tx.clone(),
        }
    }

    pub fn engine(&self) -> &Engine<D> {
        &self.engine
    }

    pub fn is_tilt_running(&self) -> bool {
        self.tilt.is_running()
    }

    /// Apply every queued input without blocking
    pub fn pump(&mut self) -> Vec<Output> {
        while let Ok(input) = self.rx.try_recv() {
            self.dispatch(input);
        }
        self.sync_tilt();
        self.engine.drain()
    }

    /// Wait up to `timeout` for the first input, then pump
    pub fn pump_timeout(&mut self, timeout: Duration) -> Vec<Output> {
        match self.rx.recv_timeout(timeout) {
            Ok(input) => self.dispatch(input),
            // We hold a sender ourselves, so the queue can't disconnect
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {}
        }
        self.pump()
    }

    fn dispatch(&mut self, input: Input) {
        match input {
            Input::Contact { phase, a, b } => self.engine.handle_contact(phase, a, b),
            Input::NamedContact { phase, a, b } => self.engine.handle_named_contact(phase, &a, &b),
            Input::Tilt(gravity) => self.engine.tilt(gravity),
            Input::PlaneDetected => self.engine.plane_detected(),
            Input::PlaceField(anchor) => {
                self.engine.place_field(anchor);
            }
            Input::Start => {
                self.engine.start();
            }
            Input::ChooseNewPlane => self.engine.choose_new_plane(),
            Input::Shake => self.engine.shake(),
            Input::Advance(dt) => self.engine.advance(dt),
        }
    }

    /// Run the sampler exactly while a field exists
    fn sync_tilt(&mut self) {
        let wanted = self.tilt_enabled && self.engine.wants_tilt();
        if wanted == self.tilt.is_running() {
            return;
        }
        if !wanted {
            self.tilt.stop();
            return;
        }

        let tx = self.tx.clone();
        match self.tilt.start(move |gravity| tx.send(Input::Tilt(gravity)).is_ok()) {
            Ok(()) => self.tilt_warned = false,
            Err(TiltError::Unavailable) => {
                if !self.tilt_warned {
                    log::warn!("No motion sensor; striker will not move");
                    self.tilt_warned = true;
                }
            }
            Err(err) => log::warn!("Tilt pipeline failed to start: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScore;
    use crate::persistence::MemoryStore;
    use crate::platform::ScriptedMotion;
    use crate::sim::dice::ScriptedDice;
    use crate::sim::events::PhysicsCommand;
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;
    use std::thread;

    fn session(motion: ScriptedMotion) -> Session<ScriptedDice> {
        let settings = Settings::default();
        let high = HighScore::load(Box::new(MemoryStore::new()));
        let engine = Engine::new(Tuning::default(), &settings, high, ScriptedDice::new());
        let tilt = TiltPipeline::with_interval(Box::new(motion), Duration::from_millis(1));
        Session::new(engine, tilt, &settings)
    }

    #[test]
    fn test_inputs_from_many_threads_apply_in_one_place() {
        let mut session = session(ScriptedMotion::unavailable());
        let ui = session.sender();
        ui.send(Input::PlaneDetected);
        ui.send(Input::PlaceField(Vec3::ZERO));
        ui.send(Input::Start);
        session.pump();
        assert_eq!(session.engine().phase(), GamePhase::Playing);

        let physics = session.sender();
        let worker = thread::spawn(move || {
            for _ in 0..3 {
                physics.named_contact(ContactPhase::Begin, "puck", "wallPlayer2");
            }
            for _ in 0..3 {
                physics.contact(ContactPhase::Begin, BodyRole::Striker, BodyRole::Puck);
            }
        });
        worker.join().unwrap();

        session.pump();
        assert_eq!(session.engine().state().score, 1);
        assert_eq!(session.engine().high_score(), 1);
    }

    #[test]
    fn test_tilt_follows_field_lifetime() {
        let mut session = session(ScriptedMotion::constant(Vec3::new(0.5, 0.0, 0.0)));
        let ui = session.sender();
        session.pump();
        assert!(!session.is_tilt_running());

        ui.send(Input::PlaceField(Vec3::ZERO));
        session.pump();
        assert!(session.is_tilt_running());

        // Samples come back through the queue as striker forces
        let mut forces = Vec::new();
        for _ in 0..200 {
            forces.extend(
                session
                    .pump_timeout(Duration::from_millis(10))
                    .into_iter()
                    .filter(|o| matches!(o, Output::Physics(PhysicsCommand::ApplyStrikerForce(_)))),
            );
            if !forces.is_empty() {
                break;
            }
        }
        assert_eq!(
            forces.first(),
            Some(&Output::Physics(PhysicsCommand::ApplyStrikerForce(Vec3::new(
                3.0, 0.0, 0.0
            ))))
        );

        ui.send(Input::ChooseNewPlane);
        session.pump();
        assert!(!session.is_tilt_running());
    }

    #[test]
    fn test_tilt_disabled_in_settings() {
        let settings = Settings {
            tilt_enabled: false,
            ..Default::default()
        };
        let high = HighScore::load(Box::new(MemoryStore::new()));
        let engine = Engine::new(Tuning::default(), &settings, high, ScriptedDice::new());
        let tilt = TiltPipeline::new(Box::new(ScriptedMotion::constant(Vec3::X)));
        let mut session = Session::new(engine, tilt, &settings);

        session.sender().send(Input::PlaceField(Vec3::ZERO));
        session.pump();
        assert!(!session.is_tilt_running());
    }
}
