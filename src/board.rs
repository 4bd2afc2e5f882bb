//! Board model: 24 points, two bars, two off-areas.
//!
//! The board is a plain data container. It answers queries and exposes a
//! handful of crate-private primitives the executor uses to move checkers;
//! it never decides whether a move is legal.
//!
//! Every player owns exactly [`CHECKERS_PER_PLAYER`] checkers, spread over
//! the points, the bar, and the off-area. Debug builds assert this after
//! every applied move.

use std::fmt;
use std::num::NonZeroU8;

use thiserror::Error;

use crate::constants::{
    BAR_PIP_DISTANCE, CHECKERS_PER_PLAYER, HOME_SIZE, NUM_POINTS, WHITE_START,
};

/// One of the two sides.
///
/// White moves toward index 23 and bears off past it; Black moves toward
/// index 0 and bears off below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::White, Player::Black];

    /// The other player.
    pub const fn opponent(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Slot of this player in per-player arrays.
    pub const fn index(self) -> usize {
        match self {
            Player::White => 0,
            Player::Black => 1,
        }
    }

    /// Movement geometry for this player. All direction-dependent math goes
    /// through the returned value.
    pub const fn direction(self) -> Direction {
        match self {
            Player::White => Direction {
                step: 1,
                bar_index: -1,
                home_start: NUM_POINTS - HOME_SIZE,
                home_end: NUM_POINTS - 1,
            },
            Player::Black => Direction {
                step: -1,
                bar_index: NUM_POINTS as isize,
                home_start: 0,
                home_end: HOME_SIZE - 1,
            },
        }
    }

    /// Side number used by external analysers and UI layers (1 = White,
    /// 2 = Black). Keep this the only place the two numberings meet.
    pub const fn to_external_side(self) -> u8 {
        match self {
            Player::White => 1,
            Player::Black => 2,
        }
    }

    /// Inverse of [`Player::to_external_side`].
    pub const fn from_external_side(side: u8) -> Option<Player> {
        match side {
            1 => Some(Player::White),
            2 => Some(Player::Black),
            _ => None,
        }
    }

    /// Single-letter code used in board diagrams.
    pub const fn code(self) -> char {
        match self {
            Player::White => 'W',
            Player::Black => 'B',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => f.write_str("white"),
            Player::Black => f.write_str("black"),
        }
    }
}

/// Per-player movement geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction {
    /// +1 for White, -1 for Black.
    pub step: isize,
    /// Virtual index of the bar, one step behind the first point.
    pub bar_index: isize,
    /// Lowest index of the home board.
    pub home_start: usize,
    /// Highest index of the home board.
    pub home_end: usize,
}

impl Direction {
    /// Index reached by moving `die` pips from `from`. May be off the board.
    #[inline]
    pub const fn advance(self, from: isize, die: u8) -> isize {
        from + self.step * die as isize
    }

    /// Point a checker on the bar enters on with `die`.
    #[inline]
    pub const fn entry_point(self, die: u8) -> usize {
        self.advance(self.bar_index, die) as usize
    }

    #[inline]
    pub const fn is_home(self, index: usize) -> bool {
        index >= self.home_start && index <= self.home_end
    }

    /// Pips a checker on `index` needs to bear off exactly.
    #[inline]
    pub const fn distance_to_off(self, index: usize) -> u8 {
        if self.step > 0 {
            (NUM_POINTS - index) as u8
        } else {
            (index + 1) as u8
        }
    }
}

/// A single board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Point {
    #[default]
    Empty,
    Occupied { player: Player, count: NonZeroU8 },
}

impl Point {
    fn with(player: Player, count: u8) -> Point {
        match NonZeroU8::new(count) {
            Some(count) => Point::Occupied { player, count },
            None => Point::Empty,
        }
    }

    pub fn owner(self) -> Option<Player> {
        match self {
            Point::Empty => None,
            Point::Occupied { player, .. } => Some(player),
        }
    }

    pub fn count(self) -> u8 {
        match self {
            Point::Empty => 0,
            Point::Occupied { count, .. } => count.get(),
        }
    }

    /// True if the point holds exactly one checker of `player`.
    pub fn is_blot_of(self, player: Player) -> bool {
        self.owner() == Some(player) && self.count() == 1
    }
}

/// Reasons a custom layout is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("point index {0} is outside 0..24")]
    IndexOutOfRange(usize),
    #[error("point {0} holds checkers of both players")]
    MixedPoint(usize),
    #[error("{player} has {found} checkers, expected 15")]
    CheckerCount { player: Player, found: u32 },
}

/// Full board state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    points: [Point; NUM_POINTS],
    bar: [u8; 2],
    off: [u8; 2],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position.
    pub fn new() -> Self {
        let mut points = [Point::Empty; NUM_POINTS];
        for (index, count) in WHITE_START {
            points[index] = Point::with(Player::White, count);
            points[NUM_POINTS - 1 - index] = Point::with(Player::Black, count);
        }
        let board = Board {
            points,
            bar: [0; 2],
            off: [0; 2],
        };
        board.assert_conserved();
        board
    }

    /// Build an arbitrary position.
    ///
    /// `points` lists `(index, player, count)`; repeated entries for the same
    /// player on one index add up. Fails unless each player ends up with
    /// exactly 15 checkers across points, bar and off.
    pub fn from_layout(
        points: &[(usize, Player, u8)],
        bar: [u8; 2],
        off: [u8; 2],
    ) -> Result<Self, BoardError> {
        let mut board = Board {
            points: [Point::Empty; NUM_POINTS],
            bar,
            off,
        };
        for &(index, player, count) in points {
            if index >= NUM_POINTS {
                return Err(BoardError::IndexOutOfRange(index));
            }
            let current = board.points[index];
            if current.owner().is_some_and(|owner| owner != player) {
                return Err(BoardError::MixedPoint(index));
            }
            let total = current.count().saturating_add(count);
            board.points[index] = Point::with(player, total);
        }
        for player in Player::ALL {
            let found = board.checker_total(player);
            if found != u32::from(CHECKERS_PER_PLAYER) {
                return Err(BoardError::CheckerCount { player, found });
            }
        }
        Ok(board)
    }

    /// Contents of point `index` (0..24).
    #[inline]
    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    /// Player holding point `index`, if any.
    #[inline]
    pub fn point_owner(&self, index: usize) -> Option<Player> {
        self.points[index].owner()
    }

    #[inline]
    pub fn checker_count_at(&self, index: usize) -> u8 {
        self.points[index].count()
    }

    #[inline]
    pub fn bar_count(&self, player: Player) -> u8 {
        self.bar[player.index()]
    }

    #[inline]
    pub fn off_count(&self, player: Player) -> u8 {
        self.off[player.index()]
    }

    /// Indices of points holding at least one checker of `player`, in
    /// ascending order.
    pub fn occupied_points(&self, player: Player) -> impl Iterator<Item = usize> + '_ {
        (0..NUM_POINTS).filter(move |&i| self.point_owner(i) == Some(player))
    }

    /// Checkers of `player` currently on points (excluding bar and off).
    pub fn checkers_on_points(&self, player: Player) -> u32 {
        self.occupied_points(player)
            .map(|i| u32::from(self.checker_count_at(i)))
            .sum()
    }

    /// Points + bar + off for `player`. Always 15 on a valid board.
    pub fn checker_total(&self, player: Player) -> u32 {
        self.checkers_on_points(player)
            + u32::from(self.bar_count(player))
            + u32::from(self.off_count(player))
    }

    /// True if every checker of `player` still in play sits in its home
    /// board and none waits on the bar.
    pub fn all_home(&self, player: Player) -> bool {
        let dir = player.direction();
        self.bar_count(player) == 0 && self.occupied_points(player).all(|i| dir.is_home(i))
    }

    /// Farthest-from-off occupied point of `player`, if any.
    pub fn farthest_point(&self, player: Player) -> Option<usize> {
        let dir = player.direction();
        self.occupied_points(player)
            .max_by_key(|&i| dir.distance_to_off(i))
    }

    /// Total pips `player` must travel to bear off every checker.
    pub fn pip_count(&self, player: Player) -> u32 {
        let dir = player.direction();
        let on_points: u32 = self
            .occupied_points(player)
            .map(|i| u32::from(dir.distance_to_off(i)) * u32::from(self.checker_count_at(i)))
            .sum();
        on_points + BAR_PIP_DISTANCE * u32::from(self.bar_count(player))
    }

    // -------------------------------------------------------------------------
    // Mutation primitives (used by the executor only)
    // -------------------------------------------------------------------------

    pub(crate) fn take_from_point(&mut self, index: usize) {
        let point = self.points[index];
        if let Point::Occupied { player, count } = point {
            self.points[index] = Point::with(player, count.get() - 1);
        }
    }

    pub(crate) fn take_from_bar(&mut self, player: Player) {
        self.bar[player.index()] -= 1;
    }

    pub(crate) fn bear_off(&mut self, player: Player) {
        self.off[player.index()] += 1;
    }

    /// Put one checker of `player` on `index`. A lone opposing checker is
    /// sent to its bar first; returns true in that case.
    pub(crate) fn land(&mut self, index: usize, player: Player) -> bool {
        let point = self.points[index];
        let opponent = player.opponent();
        if point.is_blot_of(opponent) {
            self.bar[opponent.index()] += 1;
            self.points[index] = Point::with(player, 1);
            return true;
        }
        self.points[index] = Point::with(player, point.count() + 1);
        false
    }

    /// Debug-build check of checker conservation for both players.
    #[inline]
    pub(crate) fn assert_conserved(&self) {
        for player in Player::ALL {
            debug_assert_eq!(
                self.checker_total(player),
                u32::from(CHECKERS_PER_PLAYER),
                "checker conservation violated for {player}"
            );
        }
    }
}

fn write_cell(f: &mut fmt::Formatter<'_>, point: Point) -> fmt::Result {
    match point {
        Point::Empty => write!(f, "  . "),
        Point::Occupied { player, count } => write!(f, "{:>3}{}", count, player.code()),
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let half = NUM_POINTS / 2;
        for i in half..NUM_POINTS {
            write!(f, "{i:>4}")?;
        }
        writeln!(f)?;
        for i in half..NUM_POINTS {
            write_cell(f, self.point(i))?;
        }
        writeln!(f)?;
        for i in (0..half).rev() {
            write_cell(f, self.point(i))?;
        }
        writeln!(f)?;
        for i in (0..half).rev() {
            write!(f, "{i:>4}")?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "bar W:{} B:{}  off W:{} B:{}",
            self.bar_count(Player::White),
            self.bar_count(Player::Black),
            self.off_count(Player::White),
            self.off_count(Player::Black),
        )
    }
}
