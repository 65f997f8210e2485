//! HUD-facing formatting
//!
//! The core does not draw anything. It hands the presentation collaborator
//! enumerated values from here; `Display` gives the default text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_DISPLAY_LIVES, SPEED_PIPS};

/// Hint / caution message catalog (one is active at a time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hint {
    SearchForPlanes,
    TapPlaneToPlaceField,
    Ready,
    PuckFaster,
    FieldGotBigger,
    ShakeToRemoveWall,
    TouchLeftWall,
    TouchRightWall,
    StrikerSlowedDown,
    InvertedTilting,
    NormalTilting,
}

impl Hint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hint::SearchForPlanes => "👀 Look for a plane to place field",
            Hint::TapPlaneToPlaceField => "🏒 Tap plane to place field!",
            Hint::Ready => "🥅 Press start or choose new plane",
            Hint::PuckFaster => "🏎 Increased velocity of puck",
            Hint::FieldGotBigger => "😛 Increased field size",
            Hint::ShakeToRemoveWall => "📱👋 Shake Phone to remove wall",
            Hint::TouchLeftWall => "👈 Move striker to left wall",
            Hint::TouchRightWall => "👉 Move striker to right wall",
            Hint::StrikerSlowedDown => "🐌 Slowed down striker",
            Hint::InvertedTilting => "🤪 Inverted tilting for striker!",
            Hint::NormalTilting => "🥳 Normal tilting activated again",
        }
    }

    /// Placement-flow hints stay visible even when caution hints are disabled
    pub fn is_caution(&self) -> bool {
        !matches!(
            self,
            Hint::SearchForPlanes | Hint::TapPlaneToPlaceField | Hint::Ready
        )
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lives display: up to nine hearts, or a depleted marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LivesIndicator {
    /// `count` hearts; `overflow` when the real count exceeds what is shown
    Hearts { count: u32, overflow: bool },
    Depleted,
}

impl LivesIndicator {
    pub fn from_lives(lives: u32) -> Self {
        if lives == 0 {
            LivesIndicator::Depleted
        } else {
            LivesIndicator::Hearts {
                count: lives.min(MAX_DISPLAY_LIVES),
                overflow: lives > MAX_DISPLAY_LIVES,
            }
        }
    }
}

impl fmt::Display for LivesIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            LivesIndicator::Depleted => f.write_str("☠️"),
            LivesIndicator::Hearts { count, overflow } => {
                let hearts = vec!["❤️"; count as usize].join(" ");
                f.write_str(&hearts)?;
                if overflow {
                    f.write_str(" +")?;
                }
                Ok(())
            }
        }
    }
}

/// Discretize puck speed to 1..=7 pips.
///
/// Bands are 0.3 wide starting at 1.3 ([1.3,1.6] → 1 … [3.2,3.4] → 7);
/// boundaries sit halfway between the speeds the ramp can produce so float
/// drift never lands between bands. Anything slower shows one pip, anything
/// faster shows all seven.
pub fn speed_pips(speed: f32) -> u8 {
    const BAND_TOPS: [f32; 6] = [1.65, 1.95, 2.25, 2.55, 2.85, 3.15];
    let below = BAND_TOPS.iter().take_while(|&&top| speed >= top).count() as u8;
    (below + 1).min(SPEED_PIPS)
}

/// Render pips as filled/empty dots
pub fn speed_pips_text(pips: u8) -> String {
    let filled = pips.min(SPEED_PIPS) as usize;
    let mut text = "●".repeat(filled);
    text.push_str(&"○".repeat(SPEED_PIPS as usize - filled));
    text
}
