//! Reaction challenge: a timed arrow-sequence minigame that runs on top of
//! the live simulation and pays out one power-up on success.

use rand::Rng;

use crate::constants::{CHALLENGE_MAX_LEN, CHALLENGE_MIN_LEN};
use crate::entities::PowerUpKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Left => "←",
            Direction::Right => "→",
        }
    }
}

/// Result of feeding one direction into a running challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeProgress {
    Advanced,
    Completed,
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReactionChallenge {
    pub sequence: Vec<Direction>,
    /// Index of the next expected direction.
    pub index: usize,
    pub remaining_ms: f32,
}

impl ReactionChallenge {
    pub fn new(sequence: Vec<Direction>, time_limit_ms: f32) -> Self {
        Self { sequence, index: 0, remaining_ms: time_limit_ms }
    }

    /// 3–5 independently uniform directions.
    pub fn generate(rng: &mut impl Rng, time_limit_ms: f32) -> Self {
        let len = rng.gen_range(CHALLENGE_MIN_LEN..=CHALLENGE_MAX_LEN);
        let sequence = (0..len)
            .map(|_| Direction::ALL[rng.gen_range(0..Direction::ALL.len())])
            .collect();
        Self::new(sequence, time_limit_ms)
    }

    pub fn press(&mut self, direction: Direction) -> ChallengeProgress {
        match self.sequence.get(self.index) {
            Some(&expected) if expected == direction => {
                self.index += 1;
                if self.index >= self.sequence.len() {
                    ChallengeProgress::Completed
                } else {
                    ChallengeProgress::Advanced
                }
            }
            _ => ChallengeProgress::Failed,
        }
    }

    /// Run the countdown; `true` once time is up.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        self.remaining_ms -= dt_ms;
        self.remaining_ms <= 0.0
    }

    /// Whole seconds left, rounded up for display.
    pub fn seconds_left(&self) -> u32 {
        (self.remaining_ms.max(0.0) / 1000.0).ceil() as u32
    }
}

/// Uniform pick among every grantable power-up.
pub fn roll_power_up(rng: &mut impl Rng) -> PowerUpKind {
    PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())]
}

/// Banner shown for a short while after a challenge ends.
#[derive(Clone, Debug, PartialEq)]
pub struct ChallengeFeedback {
    pub success: bool,
    pub granted: Option<PowerUpKind>,
    pub remaining_ms: f32,
}

impl ChallengeFeedback {
    pub fn message(&self) -> String {
        match (self.success, self.granted) {
            (true, Some(kind)) => format!("Challenge complete! {}", kind.label()),
            (true, None) => "Challenge complete!".to_string(),
            (false, _) => "Challenge failed!".to_string(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.remaining_ms > 0.0
    }
}
