use serde::{Serialize, Deserialize};

use crate::config::game::{TIMER_CRITICAL_SECS, TIMER_WARNING_SECS};

/// Which player's clock is running and who is expected to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    PlayerOne,
    PlayerTwo,
}

impl Turn {
    pub fn other(self) -> Turn {
        match self {
            Turn::PlayerOne => Turn::PlayerTwo,
            Turn::PlayerTwo => Turn::PlayerOne,
        }
    }

    /// Position of this player in per-player arrays.
    pub fn index(self) -> usize {
        match self {
            Turn::PlayerOne => 0,
            Turn::PlayerTwo => 1,
        }
    }
}

/// One round: the answer to speak and the image to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub expected_answer: String,
    pub image_reference: String,
    pub image_label: String,
}

impl Prompt {
    pub fn new(
        expected_answer: impl Into<String>,
        image_reference: impl Into<String>,
        image_label: impl Into<String>,
    ) -> Self {
        Self {
            expected_answer: expected_answer.into(),
            image_reference: image_reference.into(),
            image_label: image_label.into(),
        }
    }
}

/// Coarse phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Running,
    GameOver,
}

/// How a finished session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Outcome {
    /// The opponent's clock ran out.
    Winner { turn: Turn, name: String },
    /// Every prompt was answered.
    Completed,
    /// Speech input was lost while playing.
    Aborted { reason: String },
}

/// Display hint for a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    Normal,
    Warning,
    Critical,
}

impl Urgency {
    pub fn for_seconds(seconds: u32) -> Self {
        if seconds < TIMER_CRITICAL_SECS {
            Urgency::Critical
        } else if seconds < TIMER_WARNING_SECS {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    }
}

/// Player as sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub display_name: String,
    pub seconds_remaining: u32,
    pub urgency: Urgency,
    pub editing: bool,
}

/// Everything a client needs to render the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub turn: Turn,
    pub round_index: usize,
    pub players: [PlayerView; 2],
    pub image_reference: String,
    pub image_label: String,
    pub transcript: String,
    /// Upper-cased answer, only while a correct answer is being confirmed.
    pub revealed_answer: Option<String>,
    pub epoch: u64,
    pub outcome: Option<Outcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_turn_toggles() {
        assert_eq!(Turn::PlayerOne.other(), Turn::PlayerTwo);
        assert_eq!(Turn::PlayerTwo.other().other(), Turn::PlayerTwo);
    }

    #[test]
    fn urgency_thresholds() {
        assert_eq!(Urgency::for_seconds(45), Urgency::Normal);
        assert_eq!(Urgency::for_seconds(30), Urgency::Normal);
        assert_eq!(Urgency::for_seconds(29), Urgency::Warning);
        assert_eq!(Urgency::for_seconds(15), Urgency::Warning);
        assert_eq!(Urgency::for_seconds(14), Urgency::Critical);
        assert_eq!(Urgency::for_seconds(0), Urgency::Critical);
    }
}
