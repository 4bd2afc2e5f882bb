//! Backgammon rules engine.
//!
//! Board representation, legal move generation, move execution (hits, bar
//! entry, bearing off), win classification, and a doubling-cube advisor.
//! The engine decides whether a move is legal and what board results from
//! it; choosing a good move is left to the caller.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, checker counts, cube thresholds
//! - [`board`] - Players, points and the board itself
//! - [`dice`] - Validated dice rolls
//! - [`movegen`] - Legal move generation and move notation
//! - [`execute`] - Applying a move to a board
//! - [`scoring`] - Winner detection and gammon/backgammon classification
//! - [`cube`] - Cube state and the offer/accept advisor
//! - [`game`] - Turn flow and match scoring
//! - [`selfplay`] - Random self-play driver
//! - [`console`] - Text command loop
//!
//! ## Example
//!
//! ```
//! use backgammon_rules::board::{Board, Player};
//! use backgammon_rules::execute::apply_move;
//! use backgammon_rules::movegen::legal_moves;
//! use backgammon_rules::scoring::check_winner;
//!
//! let board = Board::new();
//! let moves = legal_moves(&board, Player::Black, &[3, 1]);
//! let first = moves.iter().next().unwrap();
//!
//! let board = apply_move(&board, Player::Black, first, &[3, 1]).unwrap();
//! assert_eq!(check_winner(&board), None);
//! ```

pub mod board;
pub mod console;
pub mod constants;
pub mod cube;
pub mod dice;
pub mod execute;
pub mod game;
pub mod movegen;
pub mod scoring;
pub mod selfplay;
