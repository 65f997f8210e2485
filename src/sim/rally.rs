//! Rally state machine
//!
//! The puck's collision hull has many faces, so one physical hit arrives as
//! a burst of contact-begin callbacks. The machine remembers what the puck
//! last legitimately touched and accepts each rally event only from the
//! state where it is meaningful; everything else is a duplicate.
//!
//! ```text
//!                 goal (attacker boundary)
//!   AwaitingAttackerBoundary ───────────────▶ AwaitingStrikerTouch
//!            ▲                                      │
//!            └──── return (striker) / concede ──────┘
//!                  (defender boundary)
//! ```

use serde::{Deserialize, Serialize};

use super::collision::CollisionEvent;

/// What the puck is currently heading for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RallyPhase {
    /// Last touched by the striker (or freshly launched): a hit on the
    /// attacker boundary scores.
    #[default]
    AwaitingAttackerBoundary,
    /// Last touched the attacker boundary: the striker must return it, or
    /// the defender boundary takes a life.
    AwaitingStrikerTouch,
}

/// Body the puck last legitimately touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LastTouch {
    Striker,
    AttackerBoundary,
}

/// Result of feeding an event to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RallyOutcome {
    /// Striker sent the puck back toward the attacker
    Returned,
    /// Puck got past the striker
    Conceded,
    /// Puck reached the attacker boundary
    Scored,
    /// Duplicate callback or not a rally event
    Ignored,
}

/// Two-state rally tracker
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Rally {
    phase: RallyPhase,
}

impl Rally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RallyPhase {
        self.phase
    }

    pub fn last_touch(&self) -> LastTouch {
        match self.phase {
            RallyPhase::AwaitingAttackerBoundary => LastTouch::Striker,
            RallyPhase::AwaitingStrikerTouch => LastTouch::AttackerBoundary,
        }
    }

    /// Back to the initial state (game start, relaunch)
    pub fn reset(&mut self) {
        self.phase = RallyPhase::AwaitingAttackerBoundary;
    }

    /// Feed a classified contact-begin event
    pub fn on_event(&mut self, event: CollisionEvent) -> RallyOutcome {
        use RallyPhase::*;

        let (outcome, next) = match (self.phase, event) {
            (AwaitingAttackerBoundary, CollisionEvent::PuckHitAttackerBoundary) => {
                (RallyOutcome::Scored, AwaitingStrikerTouch)
            }
            (AwaitingStrikerTouch, CollisionEvent::PuckHitStriker) => {
                (RallyOutcome::Returned, AwaitingAttackerBoundary)
            }
            (AwaitingStrikerTouch, CollisionEvent::PuckHitDefenderBoundary) => {
                (RallyOutcome::Conceded, AwaitingAttackerBoundary)
            }
            (phase, _) => (RallyOutcome::Ignored, phase),
        };

        if outcome == RallyOutcome::Ignored && event.is_rally_event() {
            log::debug!("Ignoring {:?} while {:?}", event, self.phase);
        }
        self.phase = next;
        outcome
    }
}
