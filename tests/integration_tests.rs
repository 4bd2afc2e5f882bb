//! Integration tests for backgammon-rules
//!
//! Scenarios exercised through the public API: starting-position moves,
//! hits, bar priority, bear-off gating, win classification and the cube
//! advisor thresholds.

use backgammon_rules::board::{Board, Player};
use backgammon_rules::cube::{MatchContext, should_accept, should_offer};
use backgammon_rules::execute::{MoveError, apply_move, play_move};
use backgammon_rules::movegen::{Destination, Move, Origin, legal_moves};
use backgammon_rules::scoring::{WinType, check_winner, classify_win_type, points_owed};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

fn mv(s: &str) -> Move {
    s.parse().unwrap()
}

/// White with `white` checkers placed as given, the rest borne off; Black
/// likewise. Bars start empty.
fn position(white: &[(usize, u8)], black: &[(usize, u8)]) -> Board {
    let mut layout = Vec::new();
    layout.extend(white.iter().map(|&(i, n)| (i, Player::White, n)));
    layout.extend(black.iter().map(|&(i, n)| (i, Player::Black, n)));
    let on_board = |side: &[(usize, u8)]| side.iter().map(|&(_, n)| n).sum::<u8>();
    Board::from_layout(
        &layout,
        [0, 0],
        [15 - on_board(white), 15 - on_board(black)],
    )
    .unwrap()
}

fn totals_conserved(board: &Board) -> bool {
    Player::ALL.iter().all(|&p| board.checker_total(p) == 15)
}

// =============================================================================
// Starting position
// =============================================================================

#[test]
fn test_starting_position_three_one() {
    let board = Board::new();

    // The player moving toward index 0 plays its back checkers 23 -> 20 and 23 -> 22
    let black = legal_moves(&board, Player::Black, &[3, 1]);
    assert!(black.contains(mv("23/20")));
    assert!(black.contains(mv("23/22")));

    // Mirror image for the player moving toward 23
    let white = legal_moves(&board, Player::White, &[3, 1]);
    assert!(white.contains(mv("0/3")));
    assert!(white.contains(mv("0/1")));

    // No bear-off and no bar entry at the start
    for moves in [&black, &white] {
        assert!(moves.iter().all(|m| m.to != Destination::Off));
        assert!(moves.iter().all(|m| m.from != Origin::Bar));
    }
}

#[test]
fn test_starting_position_blocked_points() {
    let board = Board::new();
    // Black 5 - 5 = 0 holds two White checkers
    let black = legal_moves(&board, Player::Black, &[5]);
    assert!(!black.contains(mv("5/0")));
    // White 0 + 5 = 5 is Black's five-checker point
    let white = legal_moves(&board, Player::White, &[5]);
    assert!(!white.contains(mv("0/5")));
    assert!(white.contains(mv("11/16")));
}

// =============================================================================
// Hits
// =============================================================================

#[test]
fn test_hit_from_starting_position() {
    // Starting layout with one Black checker moved from 12 to the blot point 3
    let board = Board::from_layout(
        &[
            (0, Player::White, 2),
            (11, Player::White, 5),
            (16, Player::White, 3),
            (18, Player::White, 5),
            (23, Player::Black, 2),
            (12, Player::Black, 4),
            (7, Player::Black, 3),
            (5, Player::Black, 5),
            (3, Player::Black, 1),
        ],
        [0, 0],
        [0, 0],
    )
    .unwrap();

    let moves = legal_moves(&board, Player::White, &[3, 1]);
    assert!(moves.contains(mv("0/3")));

    let next = apply_move(&board, Player::White, mv("0/3"), &[3, 1]).unwrap();
    assert_eq!(next.bar_count(Player::Black), board.bar_count(Player::Black) + 1);
    assert_eq!(next.bar_count(Player::White), 0);
    assert_eq!(next.off_count(Player::White), 0);
    assert_eq!(next.off_count(Player::Black), 0);
    assert_eq!(next.point_owner(3), Some(Player::White));
    assert_eq!(next.checker_count_at(3), 1);
    assert!(totals_conserved(&next));
}

#[test]
fn test_two_checkers_cannot_be_hit() {
    let board = position(&[(0, 15)], &[(3, 2), (20, 13)]);
    let moves = legal_moves(&board, Player::White, &[3]);
    assert!(!moves.contains(mv("0/3")));
    assert!(moves.is_empty());
}

// =============================================================================
// Bar priority
// =============================================================================

#[test]
fn test_bar_priority() {
    let board = Board::from_layout(
        &[(0, Player::White, 13), (11, Player::White, 1), (12, Player::Black, 15)],
        [1, 0],
        [0, 0],
    )
    .unwrap();
    let moves = legal_moves(&board, Player::White, &[6, 2]);
    assert!(!moves.is_empty());
    assert!(moves.iter().all(|m| m.from == Origin::Bar));

    // A point move is refused while the bar is occupied
    let err = apply_move(&board, Player::White, mv("11/13"), &[6, 2]).unwrap_err();
    assert!(matches!(err, MoveError::Illegal { .. }));

    // After entering, other checkers may move again
    let entered = apply_move(&board, Player::White, mv("bar/1"), &[6, 2]).unwrap();
    let moves = legal_moves(&entered, Player::White, &[6]);
    assert!(moves.contains(mv("11/17")));
}

#[test]
fn test_closed_board_gives_no_moves() {
    let board = Board::from_layout(
        &[
            (0, Player::Black, 2),
            (1, Player::Black, 2),
            (2, Player::Black, 2),
            (3, Player::Black, 2),
            (4, Player::Black, 2),
            (5, Player::Black, 5),
            (12, Player::White, 14),
        ],
        [1, 0],
        [0, 0],
    )
    .unwrap();
    for d1 in 1..=6 {
        for d2 in 1..=6 {
            assert!(legal_moves(&board, Player::White, &[d1, d2]).is_empty());
        }
    }
}

// =============================================================================
// Bearing off
// =============================================================================

#[test]
fn test_bear_off_gated_by_outside_checker() {
    // One White checker still on 10; the rest at home
    let board = position(&[(10, 1), (21, 7), (23, 7)], &[(2, 15)]);
    for die in 1..=6 {
        let moves = legal_moves(&board, Player::White, &[die]);
        assert!(
            moves.iter().all(|m| m.to != Destination::Off),
            "die {die} must not bear off"
        );
    }
}

#[test]
fn test_bear_off_after_last_checker_comes_home() {
    let board = position(&[(17, 1), (21, 7), (23, 7)], &[(2, 15)]);
    assert!(legal_moves(&board, Player::White, &[1]).iter().all(|m| m.to != Destination::Off));
    let home = apply_move(&board, Player::White, mv("17/18"), &[1]).unwrap();
    let moves = legal_moves(&home, Player::White, &[1, 3]);
    assert!(moves.contains(mv("23/off")));
    assert!(moves.contains(mv("21/off")));
}

#[test]
fn test_no_bear_off_with_checker_on_bar() {
    let board = Board::from_layout(
        &[(20, Player::White, 14), (2, Player::Black, 15)],
        [1, 0],
        [0, 0],
    )
    .unwrap();
    let moves = legal_moves(&board, Player::White, &[4, 6]);
    assert!(moves.iter().all(|m| m.to != Destination::Off));
}

// =============================================================================
// Winning
// =============================================================================

#[test]
fn test_win_detected_only_at_fifteen_off() {
    let board = position(&[(23, 1)], &[(5, 15)]);
    assert_eq!(check_winner(&board), None);
    let done = apply_move(&board, Player::White, mv("23/off"), &[1, 4]).unwrap();
    assert_eq!(check_winner(&done), Some(Player::White));
    assert_eq!(done.off_count(Player::White), 15);
}

#[test]
fn test_gammon_classification() {
    let board = position(&[], &[(5, 10), (9, 5)]);
    assert_eq!(check_winner(&board), Some(Player::White));
    assert_eq!(classify_win_type(&board, Player::White), WinType::Gammon);
    assert_eq!(points_owed(&board, Player::White, 2), 4);
}

#[test]
fn test_simple_and_backgammon_classification() {
    let simple = position(&[], &[(3, 12)]);
    assert_eq!(classify_win_type(&simple, Player::White), WinType::Simple);

    let backgammon = position(&[], &[(3, 14), (19, 1)]);
    assert_eq!(classify_win_type(&backgammon, Player::White), WinType::Backgammon);
    assert_eq!(points_owed(&backgammon, Player::White, 4), 12);
}

// =============================================================================
// Doubling cube
// =============================================================================

#[test]
fn test_doubling_thresholds() {
    let money = MatchContext::money();
    assert!(should_offer(0.70, 1, &money));
    assert!(!should_offer(0.90, 1, &money));
    assert!(!should_accept(0.20, 2, &money));
    assert!(should_accept(0.30, 2, &money));
}

// =============================================================================
// Atomicity
// =============================================================================

#[test]
fn test_failed_move_leaves_board_untouched() {
    let mut board = Board::new();
    let before = board.clone();
    assert!(play_move(&mut board, Player::White, mv("0/5"), &[5, 6]).is_err());
    assert!(play_move(&mut board, Player::White, mv("bar/4"), &[5, 6]).is_err());
    assert!(play_move(&mut board, Player::White, mv("18/off"), &[6]).is_err());
    assert_eq!(board, before);
}
