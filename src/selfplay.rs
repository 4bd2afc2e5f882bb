//! Random self-play.
//!
//! Plays complete games by picking uniformly among legal moves. The cube is
//! handled by the advisor, fed with a crude pip-count race estimate standing
//! in for an external evaluator. Useful for demos and for exercising the
//! rules over many reachable positions.

use tracing::debug;

use crate::board::{Board, Player};
use crate::cube::{MatchContext, should_accept, should_offer};
use crate::dice::Dice;
use crate::game::{Game, GameError, GameOutcome, Match, Phase};

/// Steepness of the race estimate's logistic curve.
const RACE_SCALE: f64 = 8.0;

/// Statistics of one finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRecord {
    pub outcome: GameOutcome,
    /// Turns in which dice were rolled.
    pub turns: u32,
    /// Checker moves played.
    pub moves: u32,
    pub hits: u32,
    /// Turns passed without a playable die.
    pub forfeits: u32,
}

/// Chance that `player` wins a pure race, from the relative pip lead.
pub fn race_estimate(board: &Board, player: Player) -> f64 {
    let mine = f64::from(board.pip_count(player));
    let theirs = f64::from(board.pip_count(player.opponent()));
    let total = (mine + theirs).max(1.0);
    let lead = (theirs - mine) / total;
    1.0 / (1.0 + (-RACE_SCALE * lead).exp())
}

/// Roll single dice until they differ. Returns the opening roll and the
/// player with the higher die.
pub fn opening_roll(rng: &mut fastrand::Rng) -> (Dice, Player) {
    loop {
        let dice = Dice::roll(rng);
        if dice.is_double() {
            continue;
        }
        let [white, black] = dice.values();
        let first = if white > black {
            Player::White
        } else {
            Player::Black
        };
        return (dice, first);
    }
}

/// Handle the cube at the start of a turn. Returns true if the game ended.
fn cube_action(
    game: &mut Game,
    context: &impl Fn(Player) -> MatchContext,
) -> Result<bool, GameError> {
    let doubler = game.turn();
    let taker = doubler.opponent();
    let cube = game.cube().value();
    if game.cube().may_double(doubler).is_err() {
        return Ok(false);
    }
    let p = race_estimate(game.board(), doubler);
    if !should_offer(p, cube, &context(doubler)) {
        return Ok(false);
    }
    game.offer_double()?;
    respond_to_double(game, taker, context)
}

/// Take or drop the pending double for `taker`. Returns true if dropped.
fn respond_to_double(
    game: &mut Game,
    taker: Player,
    context: &impl Fn(Player) -> MatchContext,
) -> Result<bool, GameError> {
    let cube = game.cube().value();
    let p = race_estimate(game.board(), taker);
    if should_accept(p, cube, &context(taker)) {
        game.accept_double()?;
        Ok(false)
    } else {
        game.decline_double()?;
        Ok(true)
    }
}

/// Play `game` to the end with random moves and `rng` dice.
///
/// `context` gives the match standing from a player's point of view.
pub fn play_out(
    rng: &mut fastrand::Rng,
    game: &mut Game,
    context: impl Fn(Player) -> MatchContext,
) -> Result<GameRecord, GameError> {
    let mut turns = 0;
    let mut moves = 0;
    let mut hits = 0;
    let mut forfeits = 0;

    loop {
        match game.phase() {
            Phase::GameOver(outcome) => {
                return Ok(GameRecord {
                    outcome: *outcome,
                    turns,
                    moves,
                    hits,
                    forfeits,
                });
            }
            Phase::AwaitingRoll => {
                if cube_action(game, &context)? {
                    continue;
                }
                let player = game.turn();
                game.roll(Dice::roll(rng))?;
                turns += 1;
                if game.turn() != player {
                    forfeits += 1;
                }
            }
            Phase::AwaitingMove { .. } => {
                let legal: Vec<_> = game.legal_moves().iter().collect();
                let mv = legal[rng.usize(..legal.len())];
                let effect = game.play(mv)?;
                moves += 1;
                if effect.hit {
                    hits += 1;
                }
            }
            Phase::DoubleOffered { by } => {
                let taker = by.opponent();
                respond_to_double(game, taker, &context)?;
            }
        }
    }
}

/// Play a whole match. For money play (`match_length == 0`) stops after
/// `max_games`; otherwise stops when the match is decided or `max_games` is
/// reached.
pub fn play_match(
    rng: &mut fastrand::Rng,
    match_length: u32,
    max_games: u32,
) -> Result<(Match, Vec<GameRecord>), GameError> {
    let (dice, first) = opening_roll(rng);
    let mut session = Match::new(match_length, first);
    session.game_mut().roll(dice)?;
    let mut records = Vec::new();

    loop {
        let contexts = Player::ALL.map(|p| session.context_for(p));
        let record = play_out(rng, session.game_mut(), |p| contexts[p.index()])?;
        session.finish_game()?;
        debug!(
            game = session.games_played(),
            outcome = %record.outcome,
            turns = record.turns,
            "game finished"
        );
        records.push(record);

        if session.is_over() || session.games_played() >= max_games {
            return Ok((session, records));
        }
        let (dice, first) = opening_roll(rng);
        session.new_game(first)?.roll(dice)?;
    }
}
