//! Game end detection and win-type classification.

use std::fmt;

use crate::board::{Board, Player};
use crate::constants::{
    CHECKERS_PER_PLAYER, MULTIPLIER_BACKGAMMON, MULTIPLIER_GAMMON, MULTIPLIER_SIMPLE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinType {
    Simple,
    Gammon,
    Backgammon,
}

impl WinType {
    /// 1, 2 or 3 times the cube.
    pub const fn multiplier(self) -> u32 {
        match self {
            WinType::Simple => MULTIPLIER_SIMPLE,
            WinType::Gammon => MULTIPLIER_GAMMON,
            WinType::Backgammon => MULTIPLIER_BACKGAMMON,
        }
    }

    /// Points owed at the given cube value. Saturates instead of
    /// overflowing for cube values beyond the 64 cap.
    pub const fn points(self, cube_value: u32) -> u32 {
        cube_value.saturating_mul(self.multiplier())
    }
}

impl fmt::Display for WinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WinType::Simple => "single game",
            WinType::Gammon => "gammon",
            WinType::Backgammon => "backgammon",
        };
        f.write_str(name)
    }
}

/// The player who has borne off all 15 checkers, if any.
pub fn check_winner(board: &Board) -> Option<Player> {
    Player::ALL
        .into_iter()
        .find(|&p| board.off_count(p) == CHECKERS_PER_PLAYER)
}

/// Classify the win of `winner` on a finished board.
///
/// Backgammon when the loser still has a checker on the bar or in the
/// winner's home board; gammon when the loser has borne nothing off.
pub fn classify_win_type(board: &Board, winner: Player) -> WinType {
    let loser = winner.opponent();
    let winner_home = winner.direction();
    let in_winner_home = board
        .occupied_points(loser)
        .any(|i| winner_home.is_home(i));
    if board.bar_count(loser) > 0 || in_winner_home {
        WinType::Backgammon
    } else if board.off_count(loser) == 0 {
        WinType::Gammon
    } else {
        WinType::Simple
    }
}

/// Points `winner` collects at `cube_value`.
pub fn points_owed(board: &Board, winner: Player, cube_value: u32) -> u32 {
    classify_win_type(board, winner).points(cube_value)
}
