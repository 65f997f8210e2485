//! Game engine
//!
//! Wires classifier → rally machine → scoring → escalation together and owns
//! every piece of mutable game state. Driven from the session thread only;
//! other actors send inputs.

use glam::Vec3;

use super::body::BodyRole;
use super::collision::{CollisionEvent, ContactPhase, classify, classify_named};
use super::dice::{Dice, RngDice};
use super::escalation::{Escalation, WallSide};
use super::events::{DisplayUpdate, GeometryUpdate, Haptic, Outbox, Output, PhysicsCommand};
use super::field::{FieldGeometry, FieldTemplate, ObstacleSlot};
use super::rally::{Rally, RallyOutcome};
use super::state::{GamePhase, MatchState};
use super::tilt::striker_force;
use crate::highscores::HighScore;
use crate::settings::Settings;
use crate::tuning::Tuning;
use crate::ui::{Hint, LivesIndicator, speed_pips};

/// The gameplay core
#[derive(Debug)]
pub struct Engine<D: Dice = RngDice> {
    tuning: Tuning,
    template: FieldTemplate,
    phase: GamePhase,
    state: MatchState,
    rally: Rally,
    escalation: Escalation,
    field: Option<FieldGeometry>,
    /// The puck body exists in the physics world
    puck_spawned: bool,
    /// Taps on a plane are ignored while a field is locked in
    placement_locked: bool,
    high_score: HighScore,
    dice: D,
    out: Outbox,
}

impl<D: Dice> Engine<D> {
    pub fn new(tuning: Tuning, settings: &Settings, high_score: HighScore, dice: D) -> Self {
        let mut out = Outbox::new(settings);
        let state = MatchState::new(&tuning);
        out.hint(Hint::SearchForPlanes);
        out.display(DisplayUpdate::Lives(LivesIndicator::from_lives(state.lives)));
        out.display(DisplayUpdate::HighScore(high_score.best()));
        out.display(DisplayUpdate::Controls { visible: false });
        Self {
            tuning,
            template: FieldTemplate::default(),
            phase: GamePhase::SearchingForPlane,
            state,
            rally: Rally::new(),
            escalation: Escalation::new(),
            field: None,
            puck_spawned: false,
            placement_locked: false,
            high_score,
            dice,
            out,
        }
    }

    /// Use the scales of a specific field asset
    pub fn with_template(mut self, template: FieldTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn rally(&self) -> &Rally {
        &self.rally
    }

    pub fn escalation(&self) -> &Escalation {
        &self.escalation
    }

    pub fn field(&self) -> Option<&FieldGeometry> {
        self.field.as_ref()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    pub fn share_message(&self) -> String {
        self.high_score.share_message()
    }

    /// Tilt drives the striker for as long as a field exists
    pub fn wants_tilt(&self) -> bool {
        self.field.is_some()
    }

    /// Take all outputs produced since the last drain
    pub fn drain(&mut self) -> Vec<Output> {
        self.out.drain()
    }

    // === Placement & lifecycle ===

    /// The plane detector found a surface
    pub fn plane_detected(&mut self) {
        if self.phase == GamePhase::SearchingForPlane {
            self.phase = GamePhase::PlaneDetected;
            self.out.hint(Hint::TapPlaneToPlaceField);
        }
    }

    /// Place the field at `anchor`. Ignored while a field is locked in.
    pub fn place_field(&mut self, anchor: Vec3) -> bool {
        if self.placement_locked {
            log::debug!("Placement ignored: field already locked in");
            return false;
        }
        if self.field.is_some() {
            self.out.physics(PhysicsCommand::RemoveField);
        }

        let field = FieldGeometry::place(anchor, self.template, &self.tuning);
        self.emit_field(&field);
        self.field = Some(field);
        self.puck_spawned = false;
        self.placement_locked = true;
        self.reset_match();
        self.phase = GamePhase::Ready;

        self.out.hint(Hint::Ready);
        self.out.display(DisplayUpdate::Controls { visible: true });
        true
    }

    /// Start, or restart on the same field. No-op without a field.
    pub fn start(&mut self) -> bool {
        let Some(field) = self.field.as_mut() else {
            log::debug!("Start ignored: no field placed");
            return false;
        };

        let spawn = field.puck_spawn();
        if self.puck_spawned {
            field.reset_to_original();
            let field = field.clone();
            self.emit_field(&field);
            self.out.physics(PhysicsCommand::FreezePuck);
            self.out.physics(PhysicsCommand::TeleportPuck { at: spawn });
        } else {
            self.out.physics(PhysicsCommand::SpawnPuck { at: spawn });
            self.puck_spawned = true;
        }

        self.reset_match();
        self.placement_locked = true;
        self.phase = GamePhase::Playing;
        self.out.hide_hint();
        self.out.display(DisplayUpdate::Controls { visible: false });
        self.launch_puck();
        log::info!("Game started (high score {})", self.high_score.best());
        true
    }

    /// Throw the field away and go back to plane detection
    pub fn choose_new_plane(&mut self) {
        if self.field.take().is_some() {
            self.out.physics(PhysicsCommand::RemoveField);
        }
        self.puck_spawned = false;
        self.placement_locked = false;
        self.state = MatchState::new(&self.tuning);
        self.rally.reset();
        self.escalation.reset();
        self.phase = GamePhase::SearchingForPlane;
        self.out.display(DisplayUpdate::Controls { visible: false });
        self.out.hint(Hint::SearchForPlanes);
        log::info!("Field removed; searching for a new plane");
    }

    // === Inputs ===

    /// Contact callback by role pair
    pub fn handle_contact(&mut self, phase: ContactPhase, a: BodyRole, b: BodyRole) {
        if let Some(event) = classify(phase, a, b) {
            self.handle_event(event);
        }
    }

    /// Contact callback by scene node names; unknown names are ignored
    pub fn handle_named_contact(&mut self, phase: ContactPhase, a: &str, b: &str) {
        if let Some(event) = classify_named(phase, a, b) {
            self.handle_event(event);
        }
    }

    /// Device shake gesture
    pub fn shake(&mut self) {
        if let Some(field) = self.field.as_mut() {
            self.escalation.on_shake(field, &mut self.out);
        }
    }

    /// Gravity sample from the tilt pipeline
    pub fn tilt(&mut self, gravity: Vec3) {
        if self.field.is_none() {
            return;
        }
        let force = striker_force(
            gravity,
            self.state.striker_gain,
            self.state.inverted_controls,
        );
        self.out.physics(PhysicsCommand::ApplyStrikerForce(force));
    }

    /// Advance obstacle animations by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        let Some(field) = self.field.as_mut() else {
            return;
        };
        let finished = field.advance(dt);
        for slot in [ObstacleSlot::Primary, ObstacleSlot::Secondary] {
            let obstacle = field.obstacle(slot);
            if obstacle.is_sliding() {
                self.out.geometry(GeometryUpdate::Obstacle {
                    slot,
                    position: obstacle.position(),
                });
            }
        }
        for slot in finished {
            self.escalation
                .on_slide_finished(slot, field, &mut self.out);
        }
    }

    fn handle_event(&mut self, event: CollisionEvent) {
        if event.clears_striker_forces() {
            self.out.physics(PhysicsCommand::ClearStrikerForces);
        }

        match event {
            CollisionEvent::StrikerHitLeftWall => self.striker_wall(WallSide::Left),
            CollisionEvent::StrikerHitRightWall => self.striker_wall(WallSide::Right),
            CollisionEvent::PuckHitDefenderBoundary
            | CollisionEvent::PuckHitAttackerBoundary
            | CollisionEvent::PuckHitStriker => {
                if self.phase != GamePhase::Playing {
                    log::debug!("{:?} outside play ({:?})", event, self.phase);
                    return;
                }
                match self.rally.on_event(event) {
                    RallyOutcome::Returned => self.on_returned(),
                    RallyOutcome::Scored => self.on_scored(),
                    RallyOutcome::Conceded => self.on_conceded(),
                    RallyOutcome::Ignored => {}
                }
            }
            CollisionEvent::StrikerPuckOngoing | CollisionEvent::StrikerContactEnded => {}
        }
    }

    fn striker_wall(&mut self, side: WallSide) {
        if let Some(field) = self.field.as_mut() {
            self.escalation.on_striker_wall(side, field, &mut self.out);
        }
    }

    // === Rally outcomes ===

    fn on_returned(&mut self) {
        self.out.haptic(Haptic::Success);
        self.out.physics(PhysicsCommand::ClearStrikerForces);
        self.out.physics(PhysicsCommand::StopPuckForward);
        self.out.physics(PhysicsCommand::ApplyPuckImpulse(Vec3::new(
            0.0,
            0.0,
            -self.state.puck_speed,
        )));
    }

    fn on_scored(&mut self) {
        let Some(score) = self.state.on_goal_scored() else {
            return;
        };
        self.out.display(DisplayUpdate::Score(score));
        if self.high_score.submit(score) {
            self.out.display(DisplayUpdate::HighScore(score));
        }

        // Stop the puck and send it back down toward the striker
        self.out.physics(PhysicsCommand::StopPuckForward);
        self.out.physics(PhysicsCommand::ApplyPuckImpulse(Vec3::new(
            0.0,
            0.0,
            self.state.puck_speed,
        )));

        if let Some(field) = self.field.as_mut() {
            self.escalation.on_score(
                score,
                &self.tuning,
                &mut self.state,
                field,
                &mut self.dice,
                &mut self.out,
            );
        }
    }

    fn on_conceded(&mut self) {
        let game_over = self.state.on_life_lost();
        self.out
            .display(DisplayUpdate::Lives(LivesIndicator::from_lives(self.state.lives)));
        self.out.physics(PhysicsCommand::ClearStrikerForces);

        let spawn = self.field.as_ref().map(FieldGeometry::puck_spawn);
        if game_over {
            self.phase = GamePhase::GameOver;
            self.placement_locked = false;
            self.out.haptic(Haptic::Error);
            self.out.physics(PhysicsCommand::FreezePuck);
            if let Some(at) = spawn {
                self.out.physics(PhysicsCommand::TeleportPuck { at });
            }
            self.out.game_over(self.state.score);
            self.out.display(DisplayUpdate::Controls { visible: true });
        } else if let Some(at) = spawn {
            self.out.physics(PhysicsCommand::TeleportPuck { at });
            self.launch_puck();
        }
    }

    // === Helpers ===

    /// Kick the puck from the attacker boundary toward the striker side at a
    /// random lateral angle
    fn launch_puck(&mut self) {
        let lateral = self.dice.lateral(self.tuning.launch_lateral_range);
        let forward = -self.state.puck_speed * self.tuning.launch_forward_factor;
        self.out.physics(PhysicsCommand::ApplyPuckImpulse(Vec3::new(
            lateral, 0.0, forward,
        )));
    }

    fn reset_match(&mut self) {
        self.state.reset(&self.tuning);
        self.rally.reset();
        self.escalation.reset();
        self.out.display(DisplayUpdate::Score(0));
        self.out
            .display(DisplayUpdate::Lives(LivesIndicator::from_lives(self.state.lives)));
        self.out.display(DisplayUpdate::HighScore(self.high_score.best()));
        self.out
            .display(DisplayUpdate::PuckSpeed(speed_pips(self.state.puck_speed)));
    }

    fn emit_field(&mut self, field: &FieldGeometry) {
        self.out
            .geometry(GeometryUpdate::Boundaries(*field.current()));
        for slot in [ObstacleSlot::Primary, ObstacleSlot::Secondary] {
            self.out.geometry(GeometryUpdate::Obstacle {
                slot,
                position: field.obstacle(slot).position(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::dice::ScriptedDice;
    use crate::sim::escalation::{ActiveEffect, Feature};
    use crate::sim::rally::RallyPhase;
    use proptest::prelude::*;

    fn engine(dice: ScriptedDice) -> Engine<ScriptedDice> {
        let high = HighScore::load(Box::new(MemoryStore::new()));
        Engine::new(Tuning::default(), &Settings::default(), high, dice)
    }

    fn playing(dice: ScriptedDice) -> Engine<ScriptedDice> {
        let mut engine = engine(dice);
        engine.plane_detected();
        assert!(engine.place_field(Vec3::new(0.0, -0.5, -1.0)));
        assert!(engine.start());
        engine.drain();
        engine
    }

    fn hit(engine: &mut Engine<ScriptedDice>, a: BodyRole, b: BodyRole, times: usize) {
        for _ in 0..times {
            engine.handle_contact(ContactPhase::Begin, a, b);
        }
    }

    fn goal(engine: &mut Engine<ScriptedDice>) {
        hit(engine, BodyRole::Puck, BodyRole::AttackerBoundary, 3);
    }

    fn concede(engine: &mut Engine<ScriptedDice>) {
        hit(engine, BodyRole::DefenderBoundary, BodyRole::Puck, 3);
    }

    fn ret(engine: &mut Engine<ScriptedDice>) {
        hit(engine, BodyRole::Striker, BodyRole::Puck, 3);
    }

    #[test]
    fn test_start_without_field_is_noop() {
        let mut engine = engine(ScriptedDice::new());
        engine.drain();
        assert!(!engine.start());
        assert!(engine.drain().is_empty());
        assert_eq!(engine.phase(), GamePhase::SearchingForPlane);
    }

    #[test]
    fn test_first_start_spawns_and_launches() {
        let mut dice = ScriptedDice::new();
        dice.push_lateral(0.75);
        let mut engine = engine(dice);
        engine.place_field(Vec3::new(1.0, 0.0, 0.0));
        engine.drain();
        engine.start();
        let out = engine.drain();
        assert!(out.contains(&Output::Physics(PhysicsCommand::SpawnPuck {
            at: Vec3::new(1.0, 0.0, 0.0)
        })));
        assert!(out.contains(&Output::Physics(PhysicsCommand::ApplyPuckImpulse(
            Vec3::new(0.75, 0.0, -3.0)
        ))));
    }

    #[test]
    fn test_duplicate_goal_callbacks_score_once() {
        let mut engine = playing(ScriptedDice::new());
        goal(&mut engine);
        assert_eq!(engine.state().score, 1);
        assert_eq!(engine.high_score(), 1);
        assert_eq!(engine.rally().phase(), RallyPhase::AwaitingStrikerTouch);

        let out = engine.drain();
        let impulses: Vec<_> = out
            .iter()
            .filter(|o| matches!(o, Output::Physics(PhysicsCommand::ApplyPuckImpulse(_))))
            .collect();
        assert_eq!(
            impulses,
            vec![&Output::Physics(PhysicsCommand::ApplyPuckImpulse(Vec3::new(
                0.0, 0.0, 1.5
            )))]
        );
    }

    #[test]
    fn test_duplicate_concede_callbacks_cost_one_life() {
        let mut engine = playing(ScriptedDice::new());
        goal(&mut engine);
        concede(&mut engine);
        assert_eq!(engine.state().lives, 5);
        // Relaunched; defender hits no longer count until the next goal
        concede(&mut engine);
        assert_eq!(engine.state().lives, 5);
    }

    #[test]
    fn test_return_sends_puck_toward_attacker() {
        let mut engine = playing(ScriptedDice::new());
        goal(&mut engine);
        engine.drain();
        ret(&mut engine);
        let out = engine.drain();
        assert!(out.contains(&Output::Haptic(Haptic::Success)));
        assert!(out.contains(&Output::Physics(PhysicsCommand::StopPuckForward)));
        assert!(out.contains(&Output::Physics(PhysicsCommand::ApplyPuckImpulse(
            Vec3::new(0.0, 0.0, -1.5)
        ))));
        assert_eq!(
            out.iter()
                .filter(|o| **o == Output::Haptic(Haptic::Success))
                .count(),
            1
        );
    }

    #[test]
    fn test_six_concedes_end_the_game() {
        let mut engine = playing(ScriptedDice::new());
        for i in 0..6 {
            goal(&mut engine);
            engine.drain();
            concede(&mut engine);
            if i < 5 {
                assert_eq!(engine.phase(), GamePhase::Playing);
            }
        }
        assert!(engine.state().game_over);
        assert_eq!(engine.phase(), GamePhase::GameOver);
        let out = engine.drain();
        assert!(out.contains(&Output::GameOver { score: 6 }));
        assert!(out.contains(&Output::Haptic(Haptic::Error)));
        assert!(out.contains(&Output::Physics(PhysicsCommand::FreezePuck)));
        assert!(out.contains(&Output::Physics(PhysicsCommand::ClearStrikerForces)));

        // Frozen until restart
        goal(&mut engine);
        ret(&mut engine);
        concede(&mut engine);
        assert_eq!(engine.state().score, 6);
        assert_eq!(engine.state().lives, 0);

        assert!(engine.start());
        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.state().lives, 6);
        assert_eq!(engine.high_score(), 6);
        goal(&mut engine);
        assert_eq!(engine.state().score, 1);
    }

    #[test]
    fn test_game_over_unlocks_placement() {
        let mut engine = playing(ScriptedDice::new());
        assert!(!engine.place_field(Vec3::ONE));
        for _ in 0..6 {
            goal(&mut engine);
            concede(&mut engine);
        }
        assert!(engine.place_field(Vec3::ONE));
        assert_eq!(engine.field().unwrap().anchor(), Vec3::ONE);
        assert_eq!(engine.phase(), GamePhase::Ready);
    }

    #[test]
    fn test_restart_restores_field() {
        let mut engine = playing(ScriptedDice::with_features([Feature::WidenField]));
        for _ in 0..10 {
            goal(&mut engine);
            ret(&mut engine);
        }
        let field = engine.field().unwrap();
        assert_eq!(field.widen_steps(), 1);
        assert_ne!(field.current(), field.original());

        engine.start();
        let field = engine.field().unwrap();
        assert_eq!(field.current(), field.original());
        assert_eq!(engine.escalation().active(), ActiveEffect::None);
    }

    #[test]
    fn test_fifty_inverts_tilt() {
        let mut engine = playing(ScriptedDice::new());
        for _ in 0..50 {
            goal(&mut engine);
            ret(&mut engine);
        }
        assert!(engine.state().inverted_controls);
        assert_eq!(engine.state().lives, 9);
        engine.drain();

        engine.tilt(Vec3::new(0.5, 0.0, 0.0));
        let force = match engine.drain().as_slice() {
            [Output::Physics(PhysicsCommand::ApplyStrikerForce(f))] => *f,
            other => panic!("unexpected outputs {other:?}"),
        };
        assert!(force.x < 0.0);

        for _ in 0..5 {
            goal(&mut engine);
            ret(&mut engine);
        }
        assert!(!engine.state().inverted_controls);
    }

    #[test]
    fn test_gate_cleared_by_wall_contact() {
        let mut engine = playing(ScriptedDice::with_features([Feature::ArmLeftGate]));
        for _ in 0..10 {
            goal(&mut engine);
            ret(&mut engine);
        }
        assert!(engine.escalation().gate_armed(WallSide::Left));
        engine.handle_named_contact(
            ContactPhase::Begin,
            "leftWallForStriker",
            "firstPlayerStriker",
        );
        assert!(!engine.escalation().gate_armed(WallSide::Left));
        assert!(
            !engine
                .field()
                .unwrap()
                .obstacle(ObstacleSlot::Primary)
                .is_deployed()
        );
    }

    #[test]
    fn test_shutter_slides_then_leaves() {
        let mut engine = playing(ScriptedDice::with_features([Feature::ArmShutter]));
        for _ in 0..10 {
            goal(&mut engine);
            ret(&mut engine);
        }
        assert!(engine.escalation().shutter_armed());
        engine.drain();

        engine.advance(1.0);
        assert!(engine.drain().iter().any(|o| matches!(
            o,
            Output::Geometry(GeometryUpdate::Obstacle {
                slot: ObstacleSlot::Primary,
                ..
            })
        )));
        engine.advance(20.0);
        assert!(!engine.escalation().shutter_armed());
    }

    #[test]
    fn test_unknown_contacts_ignored() {
        let mut engine = playing(ScriptedDice::new());
        engine.handle_named_contact(ContactPhase::Begin, "puck", "ceiling");
        engine.handle_contact(ContactPhase::Begin, BodyRole::Puck, BodyRole::PuckLeftWall);
        assert!(engine.drain().is_empty());
    }

    #[test]
    fn test_tilt_needs_a_field() {
        let mut engine = engine(ScriptedDice::new());
        engine.drain();
        engine.tilt(Vec3::X);
        assert!(engine.drain().is_empty());

        engine.place_field(Vec3::ZERO);
        engine.drain();
        engine.tilt(Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(
            engine.drain(),
            vec![Output::Physics(PhysicsCommand::ApplyStrikerForce(Vec3::new(
                3.0, 0.0, 0.0
            )))]
        );
    }

    #[test]
    fn test_choose_new_plane_tears_down() {
        let mut engine = playing(ScriptedDice::new());
        engine.choose_new_plane();
        assert!(engine.field().is_none());
        assert!(!engine.wants_tilt());
        assert!(!engine.start());
        let out = engine.drain();
        assert!(out.contains(&Output::Physics(PhysicsCommand::RemoveField)));
        assert!(out.contains(&Output::Display(DisplayUpdate::Hint(Some(
            Hint::SearchForPlanes
        )))));
    }

    fn contact_pair() -> impl Strategy<Value = (BodyRole, BodyRole)> {
        prop_oneof![
            Just((BodyRole::Puck, BodyRole::AttackerBoundary)),
            Just((BodyRole::Puck, BodyRole::DefenderBoundary)),
            Just((BodyRole::Striker, BodyRole::Puck)),
            Just((BodyRole::Striker, BodyRole::StrikerLeftWall)),
            Just((BodyRole::StrikerRightWall, BodyRole::Striker)),
        ]
    }

    proptest! {
        #[test]
        fn prop_scores_never_go_down(
            contacts in prop::collection::vec(contact_pair(), 0..400),
            restart_every in 20usize..100,
        ) {
            let mut engine = playing(ScriptedDice::new());
            let mut last_score = 0;
            let mut last_best = 0;
            for (i, (a, b)) in contacts.into_iter().enumerate() {
                if i > 0 && i % restart_every == 0 {
                    engine.start();
                    last_score = 0;
                }
                engine.handle_contact(ContactPhase::Begin, a, b);
                let score = engine.state().score;
                prop_assert!(score >= last_score);
                prop_assert!(score <= last_score + 1);
                prop_assert!(engine.high_score() >= last_best);
                prop_assert!(engine.high_score() >= score);
                last_score = score;
                last_best = engine.high_score();
            }
        }
    }
}
