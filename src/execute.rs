//! Move execution.
//!
//! Both entry points validate the move against the legal set for the given
//! dice first. A rejected move leaves the board exactly as it was.

use thiserror::Error;
use tracing::debug;

use crate::board::{Board, Player};
use crate::movegen::{Destination, Move, Origin, die_for_move};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move {mv} for {player} with dice {dice:?}")]
    Illegal {
        player: Player,
        mv: Move,
        dice: Vec<u8>,
    },
}

/// What applying a move did besides moving the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEffect {
    /// Die value consumed by the move.
    pub die: u8,
    /// True if an opposing blot was sent to the bar.
    pub hit: bool,
}

/// Apply `mv` to `board` in place.
pub fn play_move(
    board: &mut Board,
    player: Player,
    mv: Move,
    dice: &[u8],
) -> Result<MoveEffect, MoveError> {
    let die = die_for_move(board, player, mv, dice).ok_or_else(|| MoveError::Illegal {
        player,
        mv,
        dice: dice.to_vec(),
    })?;

    match mv.from {
        Origin::Bar => board.take_from_bar(player),
        Origin::Point(index) => board.take_from_point(index),
    }
    let hit = match mv.to {
        Destination::Off => {
            board.bear_off(player);
            false
        }
        Destination::Point(index) => board.land(index, player),
    };
    board.assert_conserved();

    debug!(%player, %mv, die, hit, "applied move");
    Ok(MoveEffect { die, hit })
}

/// Apply `mv` to a copy of `board` and return the new board.
pub fn apply_move(board: &Board, player: Player, mv: Move, dice: &[u8]) -> Result<Board, MoveError> {
    let mut next = board.clone();
    play_move(&mut next, player, mv, dice)?;
    Ok(next)
}
