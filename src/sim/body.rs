//! Physical body roles
//!
//! Every body the physics collaborator reports on has exactly one role.
//! Collision handling dispatches only on role pairs.

use serde::{Deserialize, Serialize};

/// Role of a physical body in the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyRole {
    Puck,
    Striker,
    /// Invisible backstop behind the striker (costs a life)
    DefenderBoundary,
    /// Invisible backstop on the far side (scores a point)
    AttackerBoundary,
    StrikerLeftWall,
    StrikerRightWall,
    PuckLeftWall,
    PuckRightWall,
}

impl BodyRole {
    /// Map a scene node name to its role. Unknown names have no role.
    pub fn from_node_name(name: &str) -> Option<Self> {
        match name {
            "puck" => Some(BodyRole::Puck),
            "firstPlayerStriker" => Some(BodyRole::Striker),
            "wallPlayer1" => Some(BodyRole::DefenderBoundary),
            "wallPlayer2" => Some(BodyRole::AttackerBoundary),
            "leftWallForStriker" => Some(BodyRole::StrikerLeftWall),
            "rightWallForStriker" => Some(BodyRole::StrikerRightWall),
            "leftWallForPuck" => Some(BodyRole::PuckLeftWall),
            "rightWallForPuck" => Some(BodyRole::PuckRightWall),
            _ => None,
        }
    }

    /// Scene node name for this role
    pub fn node_name(&self) -> &'static str {
        match self {
            BodyRole::Puck => "puck",
            BodyRole::Striker => "firstPlayerStriker",
            BodyRole::DefenderBoundary => "wallPlayer1",
            BodyRole::AttackerBoundary => "wallPlayer2",
            BodyRole::StrikerLeftWall => "leftWallForStriker",
            BodyRole::StrikerRightWall => "rightWallForStriker",
            BodyRole::PuckLeftWall => "leftWallForPuck",
            BodyRole::PuckRightWall => "rightWallForPuck",
        }
    }

    pub const ALL: [BodyRole; 8] = [
        BodyRole::Puck,
        BodyRole::Striker,
        BodyRole::DefenderBoundary,
        BodyRole::AttackerBoundary,
        BodyRole::StrikerLeftWall,
        BodyRole::StrikerRightWall,
        BodyRole::PuckLeftWall,
        BodyRole::PuckRightWall,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_names_map_back() {
        for role in BodyRole::ALL {
            assert_eq!(BodyRole::from_node_name(role.node_name()), Some(role));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(BodyRole::from_node_name("floorPlane"), None);
        assert_eq!(BodyRole::from_node_name(""), None);
    }
}
