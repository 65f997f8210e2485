//! Difficulty escalation
//!
//! Runs after every goal against the new score:
//! - every `feature_interval` points (except the inversion start) one of
//!   five field features is picked at random
//! - at `speed_up_offset` within each interval (except the inversion end)
//!   the puck speeds up while it is still at or below the cap
//! - at the inversion start the player gets bonus lives, a slower puck and
//!   inverted tilt; at the inversion end tilt goes back to normal
//!
//! The thresholds and their `!=` exceptions are kept exactly as tuned.

use serde::{Deserialize, Serialize};

use super::dice::Dice;
use super::events::{DisplayUpdate, GeometryUpdate, Outbox};
use super::field::{FieldGeometry, ObstacleSlot};
use super::state::MatchState;
use crate::tuning::Tuning;
use crate::ui::{Hint, LivesIndicator, speed_pips};

/// Field-modifying features picked at score milestones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    WidenField,
    SlowStriker,
    /// Obstacle slides in; shake the device to remove it
    ArmShutter,
    /// Obstacle slides in; touch the left wall to remove it
    ArmLeftGate,
    /// Obstacle slides in; touch the right wall to remove it
    ArmRightGate,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::WidenField,
        Feature::SlowStriker,
        Feature::ArmShutter,
        Feature::ArmLeftGate,
        Feature::ArmRightGate,
    ];
}

/// Most recently applied effect that is still in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActiveEffect {
    #[default]
    None,
    FieldWidened,
    StrikerSlowed,
    ShutterActive,
    LeftGateArmed,
    RightGateArmed,
}

/// Which striker wall was touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Right,
}

/// What a milestone evaluation did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MilestoneReport {
    pub feature: Option<Feature>,
    pub sped_up: bool,
    pub inversion_started: bool,
    pub inversion_ended: bool,
}

impl MilestoneReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Escalation window state
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Escalation {
    active: ActiveEffect,
    shutter_armed: bool,
    left_gate_armed: bool,
    right_gate_armed: bool,
}

impl Escalation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> ActiveEffect {
        self.active
    }

    pub fn shutter_armed(&self) -> bool {
        self.shutter_armed
    }

    pub fn gate_armed(&self, side: WallSide) -> bool {
        match side {
            WallSide::Left => self.left_gate_armed,
            WallSide::Right => self.right_gate_armed,
        }
    }

    /// Evaluate milestones for a freshly incremented score
    pub fn on_score(
        &mut self,
        score: u32,
        tuning: &Tuning,
        state: &mut MatchState,
        field: &mut FieldGeometry,
        dice: &mut dyn Dice,
        out: &mut Outbox,
    ) -> MilestoneReport {
        let mut report = MilestoneReport::default();
        let interval = tuning.feature_interval;
        let position = score % interval;

        if position == 0 && score != tuning.inversion_start_score {
            let feature = dice.pick_feature();
            self.apply(feature, tuning, state, field, out);
            report.feature = Some(feature);
        }

        if position == tuning.speed_up_offset
            && state.puck_speed <= tuning.puck_speed_cap
            && score != tuning.inversion_end_score
        {
            state.puck_speed += tuning.puck_speed_step;
            out.hint(Hint::PuckFaster);
            out.display(DisplayUpdate::PuckSpeed(speed_pips(state.puck_speed)));
            report.sped_up = true;
            log::info!("Score {}: puck speed -> {:.1}", score, state.puck_speed);
        }

        if score == tuning.inversion_start_score {
            state.lives += tuning.bonus_lives;
            state.puck_speed -= tuning.inversion_puck_slowdown;
            state.inverted_controls = true;
            out.display(DisplayUpdate::Lives(LivesIndicator::from_lives(state.lives)));
            out.hint(Hint::InvertedTilting);
            out.display(DisplayUpdate::PuckSpeed(speed_pips(state.puck_speed)));
            report.inversion_started = true;
            log::info!("Score {}: inverted tilt, +{} lives", score, tuning.bonus_lives);
        }

        if score == tuning.inversion_end_score {
            state.inverted_controls = false;
            out.hint(Hint::NormalTilting);
            report.inversion_ended = true;
            log::info!("Score {}: normal tilt", score);
        }

        report
    }

    /// Apply one feature
    pub fn apply(
        &mut self,
        feature: Feature,
        tuning: &Tuning,
        state: &mut MatchState,
        field: &mut FieldGeometry,
        out: &mut Outbox,
    ) {
        log::info!("Escalation feature: {:?}", feature);
        match feature {
            Feature::WidenField => {
                field.apply_widen_step();
                out.hint(Hint::FieldGotBigger);
                out.geometry(GeometryUpdate::Boundaries(*field.current()));
                self.active = ActiveEffect::FieldWidened;
            }
            Feature::SlowStriker => {
                if state.striker_gain > tuning.striker_gain_floor {
                    state.striker_gain -= tuning.striker_slow_step;
                    out.hint(Hint::StrikerSlowedDown);
                    self.active = ActiveEffect::StrikerSlowed;
                }
            }
            Feature::ArmShutter => {
                deploy(field, ObstacleSlot::Primary, tuning, out);
                out.hint(Hint::ShakeToRemoveWall);
                self.shutter_armed = true;
                self.active = ActiveEffect::ShutterActive;
            }
            Feature::ArmLeftGate => {
                deploy(field, ObstacleSlot::Primary, tuning, out);
                out.hint(Hint::TouchLeftWall);
                self.left_gate_armed = true;
                self.active = ActiveEffect::LeftGateArmed;
            }
            Feature::ArmRightGate => {
                deploy(field, ObstacleSlot::Secondary, tuning, out);
                out.hint(Hint::TouchRightWall);
                self.right_gate_armed = true;
                self.active = ActiveEffect::RightGateArmed;
            }
        }
    }

    /// Striker touched a side wall. Consumes an armed gate on that side.
    pub fn on_striker_wall(
        &mut self,
        side: WallSide,
        field: &mut FieldGeometry,
        out: &mut Outbox,
    ) -> bool {
        let (armed, slot) = match side {
            WallSide::Left => (self.left_gate_armed, ObstacleSlot::Primary),
            WallSide::Right => (self.right_gate_armed, ObstacleSlot::Secondary),
        };
        if !armed {
            return false;
        }
        log::info!("{:?} gate cleared by wall contact", side);
        self.retract(slot, field, out);
        true
    }

    /// Device shaken. Consumes an armed shutter.
    pub fn on_shake(&mut self, field: &mut FieldGeometry, out: &mut Outbox) -> bool {
        if !self.shutter_armed {
            return false;
        }
        log::info!("Shutter cleared by shake");
        self.retract(ObstacleSlot::Primary, field, out);
        true
    }

    /// An obstacle finished sliding across; it leaves the field
    pub fn on_slide_finished(
        &mut self,
        slot: ObstacleSlot,
        field: &mut FieldGeometry,
        out: &mut Outbox,
    ) {
        log::debug!("{:?} obstacle slide finished", slot);
        self.retract(slot, field, out);
    }

    /// Drop every armed effect (restart). Geometry is reset by the caller.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn retract(&mut self, slot: ObstacleSlot, field: &mut FieldGeometry, out: &mut Outbox) {
        field.retract_obstacle(slot);
        out.geometry(GeometryUpdate::Obstacle {
            slot,
            position: field.obstacle(slot).position(),
        });
        out.hide_hint();

        match slot {
            ObstacleSlot::Primary => {
                self.shutter_armed = false;
                self.left_gate_armed = false;
                if matches!(
                    self.active,
                    ActiveEffect::ShutterActive | ActiveEffect::LeftGateArmed
                ) {
                    self.active = ActiveEffect::None;
                }
            }
            ObstacleSlot::Secondary => {
                self.right_gate_armed = false;
                if self.active == ActiveEffect::RightGateArmed {
                    self.active = ActiveEffect::None;
                }
            }
        }
    }
}

fn deploy(field: &mut FieldGeometry, slot: ObstacleSlot, tuning: &Tuning, out: &mut Outbox) {
    field.deploy_obstacle(
        slot,
        tuning.obstacle_slide_distance,
        tuning.obstacle_slide_secs,
    );
    out.geometry(GeometryUpdate::Obstacle {
        slot,
        position: field.obstacle(slot).position(),
    });
}
