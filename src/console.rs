//! Line-oriented command console.
//!
//! Drives a [`Match`] from text commands, one per line, in the style of the
//! Go Text Protocol: an optional numeric id, a command word, arguments.
//! Responses start with `=` on success or `?` on failure, followed by the id
//! and a blank line.
//!
//! ## Supported Commands
//!
//! - `new` - Start a new match (opening roll decides who moves first)
//! - `next` - Start the next game once the current one is over
//! - `roll [a b]` - Roll the dice, or use the given values
//! - `moves` - List legal moves for the remaining dice
//! - `move <from>/<to>` - Play one checker (`bar`, `off`, or 0..23)
//! - `board` - Show the board, turn and cube
//! - `double`, `take`, `drop` - Cube actions
//! - `score` - Show the match score
//! - `list_commands` (or `help`), `quit`

use std::io::{self, BufRead, Write};

use tracing::{info, warn};

use crate::board::Player;
use crate::dice::Dice;
use crate::game::{GameError, Match};
use crate::movegen::Move;
use crate::selfplay::opening_roll;

const KNOWN_COMMANDS: &[&str] = &[
    "board",
    "double",
    "drop",
    "help",
    "list_commands",
    "move",
    "moves",
    "new",
    "next",
    "quit",
    "roll",
    "score",
    "take",
];

/// Console state: the match being played and the dice source.
pub struct Console {
    session: Match,
    match_length: u32,
    rng: fastrand::Rng,
}

impl Console {
    /// Start a console with a fresh match. `match_length` 0 is money play.
    pub fn new(match_length: u32, mut rng: fastrand::Rng) -> Result<Self, GameError> {
        let session = Self::fresh_match(match_length, &mut rng)?;
        Ok(Console {
            session,
            match_length,
            rng,
        })
    }

    fn fresh_match(match_length: u32, rng: &mut fastrand::Rng) -> Result<Match, GameError> {
        let (dice, first) = opening_roll(rng);
        let mut session = Match::new(match_length, first);
        session.game_mut().roll(dice)?;
        Ok(session)
    }

    pub fn session(&self) -> &Match {
        &self.session
    }

    /// Read commands from `input` until EOF or `quit`, answering on `output`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            if !success {
                warn!(%command, %message, "command rejected");
            }
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional leading numeric id off the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end == 0 {
            return (None, trimmed);
        }
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    fn status(&self) -> String {
        let game = self.session.game();
        format!(
            "{}to play: {}  phase: {}  cube: {}",
            game.board(),
            game.turn(),
            game.phase(),
            game.cube().value()
        )
    }

    fn score_line(&self) -> String {
        let target = match self.session.match_length() {
            0 => "money".to_string(),
            n => format!("match to {n}"),
        };
        format!(
            "white {} black {} ({target})",
            self.session.score(Player::White),
            self.session.score(Player::Black)
        )
    }

    /// Credit a finished game and describe the result.
    fn settle(&mut self) -> Result<String, GameError> {
        let outcome = self.session.finish_game()?;
        info!(%outcome, "game finished");
        let mut text = format!("{outcome}; {}", self.score_line());
        if let Some(winner) = self.session.winner() {
            text.push_str(&format!("; {winner} wins the match"));
        }
        Ok(text)
    }

    fn roll(&mut self, args: &[&str]) -> (bool, String) {
        let dice = match args {
            [] => Dice::roll(&mut self.rng),
            [a, b] => match (a.parse::<u8>(), b.parse::<u8>()) {
                (Ok(a), Ok(b)) => match Dice::new(a, b) {
                    Ok(dice) => dice,
                    Err(e) => return (false, e.to_string()),
                },
                _ => return (false, "dice must be numbers".to_string()),
            },
            _ => return (false, "expected zero or two dice".to_string()),
        };
        let player = self.session.game().turn();
        if let Err(e) = self.session.game_mut().roll(dice) {
            return (false, e.to_string());
        }
        if self.session.game().turn() != player {
            (true, format!("{dice}: no legal moves, turn passes"))
        } else {
            (true, dice.to_string())
        }
    }

    fn play(&mut self, args: &[&str]) -> (bool, String) {
        let text = args.join("/");
        let mv = match text.parse::<Move>() {
            Ok(mv) => mv,
            Err(e) => return (false, e.to_string()),
        };
        match self.session.game_mut().play(mv) {
            Ok(effect) => {
                let mut message = if effect.hit {
                    format!("{mv} hit")
                } else {
                    mv.to_string()
                };
                if self.session.game().is_over() {
                    match self.settle() {
                        Ok(result) => message = format!("{message}; {result}"),
                        Err(e) => return (false, format!("{message}; {e}")),
                    }
                }
                (true, message)
            }
            Err(e) => (false, e.to_string()),
        }
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "list_commands" | "help" => (true, KNOWN_COMMANDS.join("\n")),

            "quit" => (true, String::new()),

            "new" => match Self::fresh_match(self.match_length, &mut self.rng) {
                Ok(session) => {
                    self.session = session;
                    (true, self.status())
                }
                Err(e) => (false, e.to_string()),
            },

            "next" => {
                if !self.session.game().is_over() {
                    return (false, "game still in progress".to_string());
                }
                let (dice, first) = opening_roll(&mut self.rng);
                let started = self
                    .session
                    .new_game(first)
                    .and_then(|game| game.roll(dice));
                match started {
                    Ok(()) => (true, self.status()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "roll" => self.roll(args),

            "moves" => {
                let moves = self.session.game().legal_moves();
                if moves.is_empty() {
                    return (true, "none".to_string());
                }
                let list: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                (true, list.join(" "))
            }

            "move" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                self.play(args)
            }

            "board" => (true, self.status()),

            "score" => (true, self.score_line()),

            "double" => match self.session.game_mut().offer_double() {
                Ok(()) => (true, format!("{} doubles", self.session.game().turn())),
                Err(e) => (false, e.to_string()),
            },

            "take" => match self.session.game_mut().accept_double() {
                Ok(value) => (true, format!("cube at {value}")),
                Err(e) => (false, e.to_string()),
            },

            "drop" => match self.session.game_mut().decline_double() {
                Ok(_) => match self.settle() {
                    Ok(result) => (true, result),
                    Err(e) => (false, e.to_string()),
                },
                Err(e) => (false, e.to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }

    /// True once the current game is over and its points are credited.
    pub fn game_finished(&self) -> bool {
        self.session.game().is_over() && self.session.is_scored()
    }
}
