//! Constants for board geometry, checker counts, and doubling-cube policy.
//!
//! All engine tunables live here so the rules modules only refer to names.
//! Board indices run 0..=23; White moves toward 23, Black toward 0.

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of points on the board.
pub const NUM_POINTS: usize = 24;

/// Number of points in each home board.
pub const HOME_SIZE: usize = 6;

/// Checkers each player owns for the whole game.
pub const CHECKERS_PER_PLAYER: u8 = 15;

/// Pip distance of a checker waiting on the bar.
pub const BAR_PIP_DISTANCE: u32 = 25;

// =============================================================================
// Dice
// =============================================================================

/// Lowest face of a die.
pub const DIE_MIN: u8 = 1;

/// Highest face of a die.
pub const DIE_MAX: u8 = 6;

/// Number of moves granted by a double.
pub const DOUBLE_MOVES: usize = 4;

// =============================================================================
// Starting Layout
// =============================================================================

/// Standard starting layout for White as `(index, count)`.
/// Black's layout is the mirror image (`23 - index`).
pub const WHITE_START: [(usize, u8); 4] = [(0, 2), (11, 5), (16, 3), (18, 5)];

// =============================================================================
// Doubling Cube
// =============================================================================

/// Cube value at the start of every game.
pub const CUBE_START: u32 = 1;

/// Highest value the cube can reach.
pub const CUBE_MAX: u32 = 64;

/// Win-type multipliers: simple, gammon, backgammon.
pub const MULTIPLIER_SIMPLE: u32 = 1;
pub const MULTIPLIER_GAMMON: u32 = 2;
pub const MULTIPLIER_BACKGAMMON: u32 = 3;

// =============================================================================
// Doubling Advisor Thresholds
// =============================================================================

/// Minimum win probability before a double is considered.
pub const OFFER_FLOOR: f64 = 0.68;

/// Cap on the cube-size adjustment to the offer floor.
pub const OFFER_CUBE_BONUS_CAP: f64 = 0.10;

/// Cube divisor for the offer floor adjustment.
pub const OFFER_CUBE_DIVISOR: f64 = 64.0;

/// At or above this probability the position is "too good" to double.
pub const TOO_GOOD: f64 = 0.85;

/// Minimum win probability to take a double.
pub const ACCEPT_FLOOR: f64 = 0.25;

/// Cap on the cube-size adjustment to the accept threshold.
pub const ACCEPT_CUBE_BONUS_CAP: f64 = 0.05;

/// Cube divisor for the accept threshold adjustment.
pub const ACCEPT_CUBE_DIVISOR: f64 = 128.0;

/// Threshold shift applied when either side is one point from the match.
pub const MATCH_SHIFT: f64 = 0.05;
