//! Match state: score, lives and the difficulty knobs that escalation turns
//!
//! Owned by the engine and only mutated from the session thread.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Where the game is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No field; waiting for the plane detector
    #[default]
    SearchingForPlane,
    /// A plane was found; waiting for the player to tap it
    PlaneDetected,
    /// Field placed, puck not in play yet
    Ready,
    /// Puck in play
    Playing,
    /// Lives ran out; only a restart or a new plane leaves this
    GameOver,
}

/// Score, lives and live difficulty parameters for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub score: u32,
    pub lives: u32,
    /// Magnitude of the impulses applied to the puck
    pub puck_speed: f32,
    /// Tilt-to-force gain for the striker
    pub striker_gain: f32,
    /// Tilt polarity flipped
    pub inverted_controls: bool,
    pub game_over: bool,
}

impl MatchState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.starting_lives,
            puck_speed: tuning.starting_puck_speed,
            striker_gain: tuning.starting_striker_gain,
            inverted_controls: false,
            game_over: false,
        }
    }

    /// Back to a fresh game
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Count a goal. Returns the new score, or `None` once the game is over.
    pub fn on_goal_scored(&mut self) -> Option<u32> {
        if self.game_over {
            return None;
        }
        self.score += 1;
        Some(self.score)
    }

    /// Take a life. Returns true if this ended the game.
    pub fn on_life_lost(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.game_over = true;
            log::info!("Game over at score {}", self.score);
        }
        self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_lives_then_game_over() {
        let tuning = Tuning::default();
        let mut state = MatchState::new(&tuning);
        for _ in 0..5 {
            assert!(!state.on_life_lost());
        }
        assert!(state.on_life_lost());
        assert!(state.game_over);
        assert_eq!(state.lives, 0);

        // Terminal: nothing moves until reset
        assert!(!state.on_life_lost());
        assert_eq!(state.on_goal_scored(), None);
        assert_eq!(state.score, 0);

        state.reset(&tuning);
        assert!(!state.game_over);
        assert_eq!(state.lives, 6);
    }

    #[test]
    fn test_goals_count_up() {
        let mut state = MatchState::new(&Tuning::default());
        assert_eq!(state.on_goal_scored(), Some(1));
        assert_eq!(state.on_goal_scored(), Some(2));
    }
}
