//! Best score tracking
//!
//! A single persisted best score. It only ever goes up; a failed write is
//! logged and the in-memory value still advances.

use crate::consts::HIGH_SCORE_KEY;
use crate::persistence::KeyValueStore;

/// Persisted best score
pub struct HighScore {
    best: u32,
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for HighScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScore").field("best", &self.best).finish()
    }
}

impl HighScore {
    /// Read the best score from `store`. Unreadable or negative values count as 0.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let best = match store.get_int(HIGH_SCORE_KEY) {
            Ok(Some(value)) => u32::try_from(value).unwrap_or(0),
            Ok(None) => 0,
            Err(err) => {
                log::warn!("Could not read high score: {}", err);
                0
            }
        };
        log::info!("High score: {}", best);
        Self { best, store }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Offer a score. Returns true if it became the new best.
    pub fn submit(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        if let Err(err) = self.store.set_int(HIGH_SCORE_KEY, i64::from(score)) {
            log::warn!("Could not save high score {}: {}", score, err);
        }
        true
    }

    /// Text handed to the share sheet
    pub fn share_message(&self) -> String {
        format!(
            "Hey there, my highest score is {}. Can you beat it ?",
            self.best
        )
    }
}
