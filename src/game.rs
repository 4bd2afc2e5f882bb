//! Turn flow for a single game and score keeping for a match.
//!
//! A game cycles through
//! `AwaitingRoll -> AwaitingMove -> ... -> AwaitingRoll` for alternating
//! players. A double may only be offered from `AwaitingRoll`; a dropped
//! double ends the game at the current cube value.
//!
//! Turns end on their own: once the dice are used up, or when no remaining
//! die can be played, the turn passes to the opponent.

use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

use crate::board::{Board, Player};
use crate::cube::{CubeError, CubeState, MatchContext};
use crate::dice::{Dice, DiceError};
use crate::execute::{MoveEffect, MoveError, play_move};
use crate::movegen::{LegalMoves, Move, legal_moves};
use crate::scoring::{WinType, check_winner, classify_win_type};

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// All checkers borne off.
    BornOff(WinType),
    /// The opponent declined a double.
    DoubleDropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: Player,
    pub ending: Ending,
    pub points: u32,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ending {
            Ending::BornOff(win_type) => {
                write!(f, "{} wins a {} for {} points", self.winner, win_type, self.points)
            }
            Ending::DoubleDropped => {
                write!(f, "{} wins {} points (double dropped)", self.winner, self.points)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    AwaitingRoll,
    AwaitingMove { dice: Dice, remaining: Vec<u8> },
    DoubleOffered { by: Player },
    GameOver(GameOutcome),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::AwaitingRoll => f.write_str("awaiting roll"),
            Phase::AwaitingMove { remaining, .. } => write!(f, "awaiting move {remaining:?}"),
            Phase::DoubleOffered { by } => write!(f, "double offered by {by}"),
            Phase::GameOver(_) => f.write_str("game over"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cannot {action} while {phase}")]
    WrongPhase { action: &'static str, phase: String },
    #[error("match is already decided")]
    MatchOver,
    #[error("current game has not been scored")]
    GameUnscored,
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Cube(#[from] CubeError),
    #[error(transparent)]
    Dice(#[from] DiceError),
}

/// A single game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Player,
    cube: CubeState,
    phase: Phase,
}

impl Game {
    /// Fresh game with `first` to roll.
    pub fn new(first: Player) -> Self {
        Game {
            board: Board::new(),
            turn: first,
            cube: CubeState::new(),
            phase: Phase::AwaitingRoll,
        }
    }

    /// Game from an arbitrary position with `first` to roll and a centered
    /// cube.
    pub fn with_board(board: Board, first: Player) -> Self {
        Game {
            board,
            ..Game::new(first)
        }
    }

    /// Start a game from the opening roll: each side throws one die and the
    /// higher die moves first, playing both numbers. Ties return `None`.
    pub fn opening_roll(white_die: u8, black_die: u8) -> Result<Option<Self>, GameError> {
        let dice = Dice::new(white_die, black_die)?;
        if dice.is_double() {
            return Ok(None);
        }
        let first = if white_die > black_die {
            Player::White
        } else {
            Player::Black
        };
        let mut game = Game::new(first);
        game.roll(dice)?;
        Ok(Some(game))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player whose turn it is (the doubler while a double is pending).
    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn cube(&self) -> &CubeState {
        &self.cube
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.phase {
            Phase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Dice still to be played this turn.
    pub fn remaining_dice(&self) -> &[u8] {
        match &self.phase {
            Phase::AwaitingMove { remaining, .. } => remaining,
            _ => &[],
        }
    }

    fn wrong_phase(&self, action: &'static str) -> GameError {
        GameError::WrongPhase {
            action,
            phase: self.phase.to_string(),
        }
    }

    /// Start the current player's move with `dice`.
    pub fn roll(&mut self, dice: Dice) -> Result<(), GameError> {
        if self.phase != Phase::AwaitingRoll {
            return Err(self.wrong_phase("roll"));
        }
        debug!(player = %self.turn, %dice, "rolled");
        self.phase = Phase::AwaitingMove {
            dice,
            remaining: dice.distances(),
        };
        self.settle_turn();
        Ok(())
    }

    /// Legal moves for the player on roll; empty outside `AwaitingMove`.
    pub fn legal_moves(&self) -> LegalMoves {
        match &self.phase {
            Phase::AwaitingMove { remaining, .. } => legal_moves(&self.board, self.turn, remaining),
            _ => LegalMoves::default(),
        }
    }

    /// Play one checker move for the player on roll.
    pub fn play(&mut self, mv: Move) -> Result<MoveEffect, GameError> {
        let effect = match &mut self.phase {
            Phase::AwaitingMove { remaining, .. } => {
                let effect = play_move(&mut self.board, self.turn, mv, remaining)?;
                if let Some(pos) = remaining.iter().position(|&d| d == effect.die) {
                    remaining.remove(pos);
                }
                effect
            }
            _ => return Err(self.wrong_phase("move")),
        };

        if let Some(winner) = check_winner(&self.board) {
            let win_type = classify_win_type(&self.board, winner);
            self.finish(GameOutcome {
                winner,
                ending: Ending::BornOff(win_type),
                points: win_type.points(self.cube.value()),
            });
        } else {
            self.settle_turn();
        }
        Ok(effect)
    }

    /// Offer a double before rolling.
    pub fn offer_double(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::AwaitingRoll {
            return Err(self.wrong_phase("double"));
        }
        self.cube.may_double(self.turn)?;
        debug!(player = %self.turn, cube = self.cube.value(), "double offered");
        self.phase = Phase::DoubleOffered { by: self.turn };
        Ok(())
    }

    /// The opponent takes; the doubler then rolls. Returns the new cube value.
    pub fn accept_double(&mut self) -> Result<u32, GameError> {
        let Phase::DoubleOffered { by } = self.phase else {
            return Err(self.wrong_phase("take"));
        };
        let value = self.cube.accept_double(by)?;
        debug!(cube = value, "double taken");
        self.phase = Phase::AwaitingRoll;
        Ok(value)
    }

    /// The opponent drops; the doubler wins the current cube value.
    pub fn decline_double(&mut self) -> Result<GameOutcome, GameError> {
        let Phase::DoubleOffered { by } = self.phase else {
            return Err(self.wrong_phase("drop"));
        };
        let outcome = GameOutcome {
            winner: by,
            ending: Ending::DoubleDropped,
            points: self.cube.value(),
        };
        self.finish(outcome);
        Ok(outcome)
    }

    fn finish(&mut self, outcome: GameOutcome) {
        info!(%outcome, "game over");
        self.phase = Phase::GameOver(outcome);
    }

    /// Pass the turn if the player on roll has nothing left to play.
    fn settle_turn(&mut self) {
        let Phase::AwaitingMove { remaining, .. } = &self.phase else {
            return;
        };
        if remaining.is_empty() {
            self.end_turn();
        } else if legal_moves(&self.board, self.turn, remaining).is_empty() {
            debug!(player = %self.turn, ?remaining, "no legal moves, turn forfeited");
            self.end_turn();
        }
    }

    fn end_turn(&mut self) {
        self.turn = self.turn.opponent();
        self.phase = Phase::AwaitingRoll;
    }
}

/// A sequence of games played to a target score.
#[derive(Debug, Clone)]
pub struct Match {
    match_length: u32,
    scores: [u32; 2],
    games_played: u32,
    game: Game,
    scored: bool,
}

impl Match {
    /// `match_length` of 0 is an open-ended money session.
    pub fn new(match_length: u32, first: Player) -> Self {
        Match {
            match_length,
            scores: [0; 2],
            games_played: 0,
            game: Game::new(first),
            scored: false,
        }
    }

    pub fn match_length(&self) -> u32 {
        self.match_length
    }

    /// Points credited to `player` so far.
    pub fn score(&self, player: Player) -> u32 {
        self.scores[player.index()]
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    /// The game in progress, or the last one played.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Mutable access to the current game for rolls, moves and cube actions.
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn winner(&self) -> Option<Player> {
        if self.match_length == 0 {
            return None;
        }
        Player::ALL
            .into_iter()
            .find(|&p| self.score(p) >= self.match_length)
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Standing as seen by `player`, for the doubling advisor.
    pub fn context_for(&self, player: Player) -> MatchContext {
        MatchContext::new(
            self.match_length,
            self.score(player),
            self.score(player.opponent()),
        )
    }

    /// True once the current game's points have been credited.
    pub fn is_scored(&self) -> bool {
        self.scored
    }

    /// Credit the finished game's points. Each game is scored once.
    pub fn finish_game(&mut self) -> Result<GameOutcome, GameError> {
        let outcome = match self.game.outcome() {
            Some(outcome) if !self.scored => outcome,
            _ => return Err(self.game.wrong_phase("score the game")),
        };
        self.scores[outcome.winner.index()] += outcome.points;
        self.games_played += 1;
        self.scored = true;
        info!(
            white = self.score(Player::White),
            black = self.score(Player::Black),
            "score"
        );
        Ok(outcome)
    }

    /// Start the next game with a fresh board and a centered cube.
    ///
    /// The current game must be finished and credited with [`finish_game`].
    ///
    /// [`finish_game`]: Match::finish_game
    pub fn new_game(&mut self, first: Player) -> Result<&mut Game, GameError> {
        if self.is_over() {
            return Err(GameError::MatchOver);
        }
        if !self.scored {
            return Err(GameError::GameUnscored);
        }
        self.game = Game::new(first);
        self.scored = false;
        Ok(&mut self.game)
    }
}
