//! Legal move generation.
//!
//! Moves are single-checker steps by one die. Each die value offers its own
//! candidates; the caller decides which die to spend and the executor
//! re-checks membership before touching the board.
//!
//! Rules applied here:
//! - A player with checkers on the bar may only enter from the bar.
//! - A checker may land on an empty point, its own point, or a blot.
//! - Bearing off requires every checker home. An exact die always bears off;
//!   a larger die only bears off the checker farthest from home.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::board::{Board, Player};
use crate::constants::{DIE_MAX, DIE_MIN, NUM_POINTS};

/// Where a moving checker starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Origin {
    Bar,
    Point(usize),
}

/// Where a moving checker ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Destination {
    Point(usize),
    Off,
}

/// A single checker move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    pub from: Origin,
    pub to: Destination,
}

impl Move {
    pub const fn new(from: Origin, to: Destination) -> Self {
        Move { from, to }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Bar => f.write_str("bar"),
            Origin::Point(i) => write!(f, "{i}"),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Point(i) => write!(f, "{i}"),
            Destination::Off => f.write_str("off"),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("expected <from>/<to>, got {0:?}")]
    Format(String),
    #[error("invalid point {0:?}, expected 0..23, bar or off")]
    Point(String),
}

fn parse_index(s: &str) -> Result<usize, MoveParseError> {
    match s.parse::<usize>() {
        Ok(i) if i < NUM_POINTS => Ok(i),
        _ => Err(MoveParseError::Point(s.to_string())),
    }
}

impl FromStr for Origin {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("bar") {
            return Ok(Origin::Bar);
        }
        parse_index(s).map(Origin::Point)
    }
}

impl FromStr for Destination {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("off") {
            return Ok(Destination::Off);
        }
        parse_index(s).map(Destination::Point)
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    /// Parse `"13/7"`, `"bar/3"` or `"20/off"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| MoveParseError::Format(s.to_string()))?;
        Ok(Move::new(from.trim().parse()?, to.trim().parse()?))
    }
}

/// Legal moves for one decision point, keyed by origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalMoves {
    by_origin: BTreeMap<Origin, BTreeSet<Destination>>,
}

impl LegalMoves {
    fn insert(&mut self, mv: Move) {
        self.by_origin.entry(mv.from).or_default().insert(mv.to);
    }

    /// True when no move is available; the turn is forfeited.
    pub fn is_empty(&self) -> bool {
        self.by_origin.is_empty()
    }

    /// Number of distinct `(from, to)` pairs.
    pub fn len(&self) -> usize {
        self.by_origin.values().map(BTreeSet::len).sum()
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.by_origin
            .get(&mv.from)
            .is_some_and(|dests| dests.contains(&mv.to))
    }

    pub fn origins(&self) -> impl Iterator<Item = Origin> + '_ {
        self.by_origin.keys().copied()
    }

    /// Destinations reachable from `from`; empty if `from` cannot move.
    pub fn destinations(&self, from: Origin) -> impl Iterator<Item = Destination> + '_ {
        self.by_origin.get(&from).into_iter().flatten().copied()
    }

    /// Every legal move in `(origin, destination)` order.
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.by_origin
            .iter()
            .flat_map(|(&from, dests)| dests.iter().map(move |&to| Move::new(from, to)))
    }
}

/// Can `player` put a checker on `index`? Empty, own, or an opposing blot.
pub fn can_land(board: &Board, player: Player, index: usize) -> bool {
    match board.point_owner(index) {
        None => true,
        Some(owner) if owner == player => true,
        Some(_) => board.checker_count_at(index) == 1,
    }
}

/// Can `player` bear off the checker on `from` with `die`?
pub fn can_bear_off(board: &Board, player: Player, from: usize, die: u8) -> bool {
    if !board.all_home(player) || board.point_owner(from) != Some(player) {
        return false;
    }
    let needed = player.direction().distance_to_off(from);
    if die == needed {
        return true;
    }
    die > needed && board.farthest_point(player) == Some(from)
}

/// The move a single `die` produces from `from`, if it is legal.
///
/// Does not apply bar priority; [`legal_moves`] handles that.
pub fn move_for_die(board: &Board, player: Player, from: Origin, die: u8) -> Option<Move> {
    if !(DIE_MIN..=DIE_MAX).contains(&die) {
        return None;
    }
    let dir = player.direction();
    match from {
        Origin::Bar => {
            if board.bar_count(player) == 0 {
                return None;
            }
            let entry = dir.entry_point(die);
            can_land(board, player, entry).then_some(Move::new(from, Destination::Point(entry)))
        }
        Origin::Point(index) => {
            if index >= NUM_POINTS || board.point_owner(index) != Some(player) {
                return None;
            }
            let target = dir.advance(index as isize, die);
            if (0..NUM_POINTS as isize).contains(&target) {
                let target = target as usize;
                can_land(board, player, target)
                    .then_some(Move::new(from, Destination::Point(target)))
            } else {
                can_bear_off(board, player, index, die).then_some(Move::new(from, Destination::Off))
            }
        }
    }
}

fn distinct_dice(dice: &[u8]) -> BTreeSet<u8> {
    dice.iter()
        .copied()
        .filter(|d| (DIE_MIN..=DIE_MAX).contains(d))
        .collect()
}

/// All legal single-die moves for `player` given the unused `dice`.
///
/// Doubles may be passed as four equal values; duplicates collapse. Values
/// outside 1..=6 are ignored.
pub fn legal_moves(board: &Board, player: Player, dice: &[u8]) -> LegalMoves {
    let dice = distinct_dice(dice);
    let mut moves = LegalMoves::default();

    if board.bar_count(player) > 0 {
        for &die in &dice {
            if let Some(mv) = move_for_die(board, player, Origin::Bar, die) {
                moves.insert(mv);
            }
        }
        return moves;
    }

    for index in board.occupied_points(player) {
        for &die in &dice {
            if let Some(mv) = move_for_die(board, player, Origin::Point(index), die) {
                moves.insert(mv);
            }
        }
    }
    moves
}

/// Smallest die among `dice` that produces `mv`, respecting bar priority.
pub fn die_for_move(board: &Board, player: Player, mv: Move, dice: &[u8]) -> Option<u8> {
    if board.bar_count(player) > 0 && mv.from != Origin::Bar {
        return None;
    }
    distinct_dice(dice)
        .into_iter()
        .find(|&die| move_for_die(board, player, mv.from, die) == Some(mv))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn test_starting_position_white() {
        let board = Board::new();
        let moves = legal_moves(&board, Player::White, &[3, 1]);
        assert!(moves.contains(mv("0/3")));
        assert!(moves.contains(mv("0/1")));
        assert!(moves.contains(mv("18/21")));
        assert!(moves.contains(mv("16/19")));
        // 11 + 1 = 12 is Black's five-checker point
        assert!(!moves.contains(mv("11/12")));
        assert!(moves.contains(mv("11/14")));
    }

    #[test]
    fn test_starting_position_black() {
        let board = Board::new();
        let moves = legal_moves(&board, Player::Black, &[3, 1]);
        assert!(moves.contains(mv("23/20")));
        assert!(moves.contains(mv("23/22")));
        assert!(!moves.contains(mv("12/11")));
    }

    #[test]
    fn test_can_land() {
        let board = Board::from_layout(
            &[
                (4, Player::Black, 1),
                (5, Player::Black, 2),
                (6, Player::White, 1),
                (0, Player::White, 14),
                (23, Player::Black, 12),
            ],
            [0, 0],
            [0, 0],
        )
        .unwrap();
        assert!(can_land(&board, Player::White, 3));
        assert!(can_land(&board, Player::White, 4));
        assert!(!can_land(&board, Player::White, 5));
        assert!(can_land(&board, Player::White, 6));
    }

    #[test]
    fn test_bar_entry_only() {
        let board = Board::from_layout(
            &[(10, Player::White, 14), (23, Player::Black, 15)],
            [1, 0],
            [0, 0],
        )
        .unwrap();
        let moves = legal_moves(&board, Player::White, &[2, 5]);
        assert_eq!(moves.origins().collect::<Vec<_>>(), vec![Origin::Bar]);
        assert!(moves.contains(mv("bar/1")));
        assert!(moves.contains(mv("bar/4")));
    }

    #[test]
    fn test_blocked_bar_means_no_moves() {
        let board = Board::from_layout(
            &[
                (10, Player::White, 11),
                (18, Player::White, 2),
                (19, Player::White, 2),
                (3, Player::Black, 14),
            ],
            [0, 1],
            [0, 0],
        )
        .unwrap();
        // Black enters on 24 - die: 6 -> 18, 5 -> 19
        assert!(legal_moves(&board, Player::Black, &[6, 5]).is_empty());
        assert!(!legal_moves(&board, Player::Black, &[4]).is_empty());
    }

    #[test]
    fn test_exact_bear_off() {
        let board = Board::from_layout(
            &[(20, Player::White, 3), (22, Player::White, 2), (0, Player::Black, 15)],
            [0, 0],
            [10, 0],
        )
        .unwrap();
        let moves = legal_moves(&board, Player::White, &[4, 2]);
        assert!(moves.contains(mv("20/off")));
        assert!(moves.contains(mv("22/off")));
        assert!(moves.contains(mv("20/22")));
    }

    #[test]
    fn test_overshoot_only_from_farthest_point() {
        let board = Board::from_layout(
            &[(20, Player::White, 3), (22, Player::White, 2), (0, Player::Black, 15)],
            [0, 0],
            [10, 0],
        )
        .unwrap();
        let moves = legal_moves(&board, Player::White, &[6]);
        assert!(moves.contains(mv("20/off")));
        assert!(!moves.contains(mv("22/off")));
    }

    #[test]
    fn test_black_bears_off_below_zero() {
        let board = Board::from_layout(
            &[(2, Player::Black, 1), (23, Player::White, 15)],
            [0, 0],
            [0, 14],
        )
        .unwrap();
        let moves = legal_moves(&board, Player::Black, &[3, 5]);
        assert!(moves.contains(mv("2/off")));
        assert_eq!(die_for_move(&board, Player::Black, mv("2/off"), &[5, 3]), Some(3));
    }

    #[test]
    fn test_doubles_collapse() {
        let board = Board::new();
        let single = legal_moves(&board, Player::White, &[4]);
        let double = legal_moves(&board, Player::White, &[4, 4, 4, 4]);
        assert_eq!(single, double);
    }

    #[test]
    fn test_invalid_dice_ignored() {
        let board = Board::new();
        assert!(legal_moves(&board, Player::White, &[0, 7]).is_empty());
    }

    #[test]
    fn test_die_for_move_respects_bar() {
        let board = Board::from_layout(
            &[(10, Player::White, 14), (23, Player::Black, 15)],
            [1, 0],
            [0, 0],
        )
        .unwrap();
        assert_eq!(die_for_move(&board, Player::White, mv("10/13"), &[3]), None);
        assert_eq!(die_for_move(&board, Player::White, mv("bar/2"), &[3, 3]), Some(3));
    }

    #[test]
    fn test_move_notation() {
        assert_eq!(mv("bar/3"), Move::new(Origin::Bar, Destination::Point(3)));
        assert_eq!(mv(" 20/off "), Move::new(Origin::Point(20), Destination::Off));
        assert_eq!(mv("13/7").to_string(), "13/7");
        assert!("13-7".parse::<Move>().is_err());
        assert!("24/20".parse::<Move>().is_err());
        assert!("off/3".parse::<Move>().is_err());
    }

    #[test]
    fn test_legal_moves_iter_matches_len() {
        let moves = legal_moves(&Board::new(), Player::Black, &[6, 5]);
        assert_eq!(moves.iter().count(), moves.len());
        assert!(moves.iter().all(|m| moves.contains(m)));
    }
}
