//! Everything the core asks its collaborators to do
//!
//! The engine never touches the physics world, the scene or the HUD
//! directly. It appends `Output`s to an `Outbox` and the host applies them
//! in order.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::field::{Boundaries, ObstacleSlot};
use crate::settings::Settings;
use crate::ui::{Hint, LivesIndicator};

/// Requests for the rigid-body collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PhysicsCommand {
    /// Create the puck body at a position
    SpawnPuck { at: Vec3 },
    /// Move the puck (velocity kept)
    TeleportPuck { at: Vec3 },
    /// Zero the puck's velocity along the field's long (z) axis
    StopPuckForward,
    /// Drop accumulated forces on the puck and zero its velocity
    FreezePuck,
    ApplyPuckImpulse(Vec3),
    /// Drop accumulated forces on the striker
    ClearStrikerForces,
    /// Sustained (non-impulse) force on the striker
    ApplyStrikerForce(Vec3),
    /// Tear down puck and field bodies
    RemoveField,
}

/// Requests for the 3D scene collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GeometryUpdate {
    Boundaries(Boundaries),
    Obstacle { slot: ObstacleSlot, position: Vec3 },
}

/// HUD values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DisplayUpdate {
    Score(u32),
    HighScore(u32),
    Lives(LivesIndicator),
    /// Puck speed as 1..=7 pips
    PuckSpeed(u8),
    /// Show a hint, or hide the hint label with `None`
    Hint(Option<Hint>),
    /// Whether the start / new-plane buttons are shown
    Controls { visible: bool },
}

/// Haptic feedback kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Haptic {
    Success,
    Error,
}

/// One instruction for a collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Output {
    Physics(PhysicsCommand),
    Geometry(GeometryUpdate),
    Display(DisplayUpdate),
    Haptic(Haptic),
    /// Gameplay stopped; restart controls should be offered
    GameOver { score: u32 },
}

/// Ordered output buffer. Applies the player's settings on the way in.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    outputs: Vec<Output>,
    haptics: bool,
    hints: bool,
}

impl Outbox {
    pub fn new(settings: &Settings) -> Self {
        Self {
            outputs: Vec::new(),
            haptics: settings.haptics,
            hints: settings.hints,
        }
    }

    pub fn physics(&mut self, command: PhysicsCommand) {
        self.outputs.push(Output::Physics(command));
    }

    pub fn geometry(&mut self, update: GeometryUpdate) {
        self.outputs.push(Output::Geometry(update));
    }

    pub fn display(&mut self, update: DisplayUpdate) {
        self.outputs.push(Output::Display(update));
    }

    pub fn hint(&mut self, hint: Hint) {
        if hint.is_caution() && !self.hints {
            return;
        }
        self.display(DisplayUpdate::Hint(Some(hint)));
    }

    pub fn hide_hint(&mut self) {
        self.display(DisplayUpdate::Hint(None));
    }

    pub fn haptic(&mut self, haptic: Haptic) {
        if self.haptics {
            self.outputs.push(Output::Haptic(haptic));
        }
    }

    pub fn game_over(&mut self, score: u32) {
        self.outputs.push(Output::GameOver { score });
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn as_slice(&self) -> &[Output] {
        &self.outputs
    }

    /// Hand everything collected so far to the host
    pub fn drain(&mut self) -> Vec<Output> {
        std::mem::take(&mut self.outputs)
    }
}
