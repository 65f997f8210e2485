//! Contact classification
//!
//! Turns raw (phase, role, role) contact callbacks into semantic events.
//! Classification is symmetric: the physics engine reports bodies in no
//! particular order. Repeated callbacks for one physical collision are NOT
//! filtered here; the rally machine does that.

use serde::{Deserialize, Serialize};

use super::body::BodyRole;

/// Phase of a contact callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactPhase {
    Begin,
    Persist,
    End,
}

/// Semantic collision event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionEvent {
    PuckHitDefenderBoundary,
    PuckHitAttackerBoundary,
    PuckHitStriker,
    StrikerHitLeftWall,
    StrikerHitRightWall,
    /// Striker and puck are still touching
    StrikerPuckOngoing,
    /// Striker stopped touching a side wall or the puck
    StrikerContactEnded,
}

impl CollisionEvent {
    /// Whether the striker's accumulated force should be dropped, so it does
    /// not bounce or drift after the contact.
    pub fn clears_striker_forces(&self) -> bool {
        matches!(
            self,
            CollisionEvent::StrikerHitLeftWall
                | CollisionEvent::StrikerHitRightWall
                | CollisionEvent::StrikerPuckOngoing
                | CollisionEvent::StrikerContactEnded
        )
    }

    /// Events that feed the rally machine
    pub fn is_rally_event(&self) -> bool {
        matches!(
            self,
            CollisionEvent::PuckHitDefenderBoundary
                | CollisionEvent::PuckHitAttackerBoundary
                | CollisionEvent::PuckHitStriker
        )
    }
}

/// Classify a contact callback. Pairs with no gameplay meaning yield `None`.
pub fn classify(phase: ContactPhase, a: BodyRole, b: BodyRole) -> Option<CollisionEvent> {
    use BodyRole::*;

    // Order the pair so each arm only has to match one orientation
    let (a, b) = if rank(a) <= rank(b) { (a, b) } else { (b, a) };

    match (phase, a, b) {
        (ContactPhase::Begin, Puck, DefenderBoundary) => {
            Some(CollisionEvent::PuckHitDefenderBoundary)
        }
        (ContactPhase::Begin, Puck, AttackerBoundary) => {
            Some(CollisionEvent::PuckHitAttackerBoundary)
        }
        (ContactPhase::Begin, Puck, Striker) => Some(CollisionEvent::PuckHitStriker),
        (ContactPhase::Begin, Striker, StrikerLeftWall) => Some(CollisionEvent::StrikerHitLeftWall),
        (ContactPhase::Begin, Striker, StrikerRightWall) => {
            Some(CollisionEvent::StrikerHitRightWall)
        }
        (ContactPhase::Persist, Puck, Striker) => Some(CollisionEvent::StrikerPuckOngoing),
        (ContactPhase::End, Puck, Striker)
        | (ContactPhase::End, Striker, StrikerLeftWall)
        | (ContactPhase::End, Striker, StrikerRightWall) => {
            Some(CollisionEvent::StrikerContactEnded)
        }
        _ => None,
    }
}

/// Classify by scene node names; unknown names are ignored
pub fn classify_named(phase: ContactPhase, a: &str, b: &str) -> Option<CollisionEvent> {
    let a = BodyRole::from_node_name(a)?;
    let b = BodyRole::from_node_name(b)?;
    classify(phase, a, b)
}

fn rank(role: BodyRole) -> u8 {
    match role {
        BodyRole::Puck => 0,
        BodyRole::Striker => 1,
        BodyRole::DefenderBoundary => 2,
        BodyRole::AttackerBoundary => 3,
        BodyRole::StrikerLeftWall => 4,
        BodyRole::StrikerRightWall => 5,
        BodyRole::PuckLeftWall => 6,
        BodyRole::PuckRightWall => 7,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_begin_pairs() {
        assert_eq!(
            classify(ContactPhase::Begin, BodyRole::DefenderBoundary, BodyRole::Puck),
            Some(CollisionEvent::PuckHitDefenderBoundary)
        );
        assert_eq!(
            classify(ContactPhase::Begin, BodyRole::Puck, BodyRole::AttackerBoundary),
            Some(CollisionEvent::PuckHitAttackerBoundary)
        );
        assert_eq!(
            classify(ContactPhase::Begin, BodyRole::Striker, BodyRole::Puck),
            Some(CollisionEvent::PuckHitStriker)
        );
        assert_eq!(
            classify(ContactPhase::Begin, BodyRole::StrikerRightWall, BodyRole::Striker),
            Some(CollisionEvent::StrikerHitRightWall)
        );
    }

    #[test]
    fn test_puck_side_walls_are_silent() {
        assert_eq!(
            classify(ContactPhase::Begin, BodyRole::Puck, BodyRole::PuckLeftWall),
            None
        );
        assert_eq!(
            classify(ContactPhase::End, BodyRole::PuckRightWall, BodyRole::Puck),
            None
        );
    }

    #[test]
    fn test_persist_and_end_clear_striker() {
        let ongoing = classify(ContactPhase::Persist, BodyRole::Puck, BodyRole::Striker).unwrap();
        assert_eq!(ongoing, CollisionEvent::StrikerPuckOngoing);
        assert!(ongoing.clears_striker_forces());

        let ended =
            classify(ContactPhase::End, BodyRole::StrikerLeftWall, BodyRole::Striker).unwrap();
        assert_eq!(ended, CollisionEvent::StrikerContactEnded);
        assert!(ended.clears_striker_forces());

        // Persisting wall contact is not reported
        assert_eq!(
            classify(ContactPhase::Persist, BodyRole::Striker, BodyRole::StrikerLeftWall),
            None
        );
    }

    #[test]
    fn test_classify_named() {
        assert_eq!(
            classify_named(ContactPhase::Begin, "puck", "wallPlayer2"),
            Some(CollisionEvent::PuckHitAttackerBoundary)
        );
        assert_eq!(classify_named(ContactPhase::Begin, "puck", "lamp"), None);
    }

    fn any_role() -> impl Strategy<Value = BodyRole> {
        prop::sample::select(BodyRole::ALL.to_vec())
    }

    fn any_phase() -> impl Strategy<Value = ContactPhase> {
        prop::sample::select(vec![
            ContactPhase::Begin,
            ContactPhase::Persist,
            ContactPhase::End,
        ])
    }

    proptest! {
        #[test]
        fn prop_classify_is_symmetric(phase in any_phase(), a in any_role(), b in any_role()) {
            prop_assert_eq!(classify(phase, a, b), classify(phase, b, a));
        }
    }
}
