use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum GameAction {
    /// Flap while running; restart while game over.
    Flap,
    /// End the round and report the score.
    Cancel,
}
