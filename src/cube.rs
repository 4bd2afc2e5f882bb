//! Doubling cube state and the offer/accept advisor.
//!
//! The advisor works on a win probability supplied by an external
//! evaluator. Its thresholds are fixed heuristics (see `constants.rs`), not
//! equity calculations; the point is a deterministic, testable decision.

use thiserror::Error;

use crate::board::Player;
use crate::constants::{
    ACCEPT_CUBE_BONUS_CAP, ACCEPT_CUBE_DIVISOR, ACCEPT_FLOOR, CUBE_MAX, CUBE_START, MATCH_SHIFT,
    OFFER_CUBE_BONUS_CAP, OFFER_CUBE_DIVISOR, OFFER_FLOOR, TOO_GOOD,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeOwner {
    Centered,
    Owned(Player),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CubeError {
    #[error("{0} does not have access to the cube")]
    NoAccess(Player),
    #[error("cube is already at 64")]
    AtMaximum,
}

/// Cube value and ownership for the game in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeState {
    value: u32,
    owner: CubeOwner,
}

impl Default for CubeState {
    fn default() -> Self {
        Self::new()
    }
}

impl CubeState {
    pub const fn new() -> Self {
        CubeState {
            value: CUBE_START,
            owner: CubeOwner::Centered,
        }
    }

    /// Current stake multiplier, 1 through 64.
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Who may turn the cube next.
    pub const fn owner(&self) -> CubeOwner {
        self.owner
    }

    /// Whether `player` is allowed to turn the cube right now.
    pub fn may_double(&self, player: Player) -> Result<(), CubeError> {
        match self.owner {
            CubeOwner::Owned(owner) if owner != player => Err(CubeError::NoAccess(player)),
            _ if self.value >= CUBE_MAX => Err(CubeError::AtMaximum),
            _ => Ok(()),
        }
    }

    /// Record a double by `offered_by` that the opponent accepted. The taker
    /// owns the cube afterwards. Returns the new value.
    pub fn accept_double(&mut self, offered_by: Player) -> Result<u32, CubeError> {
        self.may_double(offered_by)?;
        self.value *= 2;
        self.owner = CubeOwner::Owned(offered_by.opponent());
        Ok(self.value)
    }

    /// Back to 1 and centered.
    pub fn reset(&mut self) {
        *self = CubeState::new();
    }
}

/// Match standing from the point of view of the player deciding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchContext {
    /// Points needed to win the match; 0 for a money game.
    pub match_length: u32,
    pub my_score: u32,
    pub opponent_score: u32,
}

impl MatchContext {
    pub const fn money() -> Self {
        MatchContext {
            match_length: 0,
            my_score: 0,
            opponent_score: 0,
        }
    }

    pub const fn new(match_length: u32, my_score: u32, opponent_score: u32) -> Self {
        MatchContext {
            match_length,
            my_score,
            opponent_score,
        }
    }

    pub const fn is_money(&self) -> bool {
        self.match_length == 0
    }

    /// Points the deciding player still needs. `None` in a money game.
    pub fn my_away(&self) -> Option<u32> {
        (!self.is_money()).then(|| self.match_length.saturating_sub(self.my_score))
    }

    pub fn opponent_away(&self) -> Option<u32> {
        (!self.is_money()).then(|| self.match_length.saturating_sub(self.opponent_score))
    }

    /// Threshold shift for match play: negative makes the player bolder.
    fn shift(&self) -> f64 {
        let mut shift = 0.0;
        if self.my_away().is_some_and(|away| away <= 1) {
            shift -= MATCH_SHIFT;
        }
        if self.opponent_away().is_some_and(|away| away <= 1) {
            shift += MATCH_SHIFT;
        }
        shift
    }
}

/// Win-probability window `[low, high)` in which a double is offered.
pub fn offer_window(cube_value: u32, context: &MatchContext) -> (f64, f64) {
    let bonus = (f64::from(cube_value) / OFFER_CUBE_DIVISOR).min(OFFER_CUBE_BONUS_CAP);
    (OFFER_FLOOR + bonus + context.shift(), TOO_GOOD)
}

/// Minimum win probability at which a double is taken.
pub fn accept_threshold(cube_value: u32, context: &MatchContext) -> f64 {
    let bonus = (f64::from(cube_value) / ACCEPT_CUBE_DIVISOR).min(ACCEPT_CUBE_BONUS_CAP);
    ACCEPT_FLOOR + bonus + context.shift()
}

/// Should a player with `win_probability` offer a double on `cube_value`?
pub fn should_offer(win_probability: f64, cube_value: u32, context: &MatchContext) -> bool {
    if !win_probability.is_finite() || cube_value >= CUBE_MAX {
        return false;
    }
    let (low, high) = offer_window(cube_value, context);
    win_probability >= low && win_probability < high
}

/// Should a player with `win_probability` take a double to `2 * cube_value`?
pub fn should_accept(win_probability: f64, cube_value: u32, context: &MatchContext) -> bool {
    win_probability.is_finite() && win_probability >= accept_threshold(cube_value, context)
}
