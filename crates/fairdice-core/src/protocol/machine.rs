//! The game session state machine.
//!
//! Phases run strictly forward: first-mover coin, dice assignment, one
//! throw per party, verdict. Every contested random decision goes
//! through a [`FairExchange`]; the host's own non-contested picks use
//! the plain random source.

use super::events::{ExchangeRecord, ExchangeStage, GameEvent, GameReport};
use super::session::{InputError, InputProvider, OutputSink, Selection};
use super::types::{GameId, GameOutcome, Party};
use crate::crypto::{ExchangeError, FairExchange, RandomSource};
use crate::games::{winning_probabilities, Dice, DiceError, DiceSet};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error(transparent)]
    Dice(#[from] DiceError),
}

/// Forward-only phases of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    DeterminingFirstMover,
    SelectingDice,
    Throwing,
    Finished,
}

/// How a session ended
#[derive(Clone, Debug)]
pub enum SessionEnd {
    /// The game ran to a verdict
    Completed(GameReport),
    /// The user asked to exit at a suspension point
    Cancelled,
}

/// One interactive game between the host and the user.
///
/// Consumed by [`GameSession::play`]; a session is never replayed.
pub struct GameSession<R, I, O> {
    id: GameId,
    dice: DiceSet,
    rng: R,
    input: I,
    output: O,
    phase: Phase,
    records: Vec<ExchangeRecord>,
}

impl<R, I, O> GameSession<R, I, O>
where
    R: RandomSource,
    I: InputProvider,
    O: OutputSink,
{
    pub fn new(dice: DiceSet, rng: R, input: I, output: O) -> Self {
        Self {
            id: GameId::new(),
            dice,
            rng,
            input,
            output,
            phase: Phase::DeterminingFirstMover,
            records: Vec::new(),
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the whole game to a verdict or cancellation
    pub fn play(mut self) -> Result<SessionEnd, SessionError> {
        info!(game_id = %self.id, dice = self.dice.len(), "session started");

        let first_mover = match self.determine_first_mover()? {
            Some(party) => party,
            None => return Ok(SessionEnd::Cancelled),
        };
        self.advance(Phase::SelectingDice);

        let (host_dice, user_dice) = match self.select_dice(first_mover)? {
            Some(pair) => pair,
            None => return Ok(SessionEnd::Cancelled),
        };
        self.advance(Phase::Throwing);

        // Host's dice is thrown first regardless of who moved first
        let host_throw = match self.throw(Party::Host, &host_dice)? {
            Some(face) => face,
            None => return Ok(SessionEnd::Cancelled),
        };
        let user_throw = match self.throw(Party::User, &user_dice)? {
            Some(face) => face,
            None => return Ok(SessionEnd::Cancelled),
        };
        self.advance(Phase::Finished);

        let outcome = if user_throw > host_throw {
            GameOutcome::UserWins
        } else if user_throw < host_throw {
            GameOutcome::HostWins
        } else {
            GameOutcome::Draw
        };
        self.output.emit(GameEvent::GameFinished {
            outcome,
            host_throw,
            user_throw,
        });
        info!(game_id = %self.id, %outcome, host_throw, user_throw, "session finished");

        Ok(SessionEnd::Completed(GameReport {
            id: self.id,
            first_mover,
            host_dice,
            user_dice,
            host_throw,
            user_throw,
            outcome,
            exchanges: self.records,
        }))
    }

    /// Range-2 coin exchange; the user's contribution is a guess of
    /// the host's hidden number, compared directly after the reveal.
    fn determine_first_mover(&mut self) -> Result<Option<Party>, SessionError> {
        let mut exchange = FairExchange::commit(2, &mut self.rng)?;
        self.output.emit(GameEvent::ExchangeCommitted {
            stage: ExchangeStage::FirstMover,
            range: exchange.range(),
            commitment: exchange.commitment(),
        });

        let guess = match self.collect_number(2)? {
            Some(value) => value,
            None => return Ok(None),
        };
        exchange.contribute(guess)?;
        let reveal = exchange.reveal()?;

        let first_mover = if reveal.guess_matches() {
            Party::User
        } else {
            Party::Host
        };
        self.records.push(ExchangeRecord {
            stage: ExchangeStage::FirstMover,
            reveal: reveal.clone(),
        });
        self.output.emit(GameEvent::ExchangeRevealed {
            stage: ExchangeStage::FirstMover,
            reveal,
        });
        self.output.emit(GameEvent::FirstMoverDecided { first_mover });
        debug!(game_id = %self.id, %first_mover, "first mover decided");
        Ok(Some(first_mover))
    }

    /// Assign one dice to each party; the moving party picks first and
    /// the host's own picks are plain uniform draws.
    fn select_dice(&mut self, first_mover: Party) -> Result<Option<(Dice, Dice)>, SessionError> {
        match first_mover {
            Party::Host => {
                let host_index = self.rng.draw(self.dice.len() as u64) as usize;
                let (host_dice, rest) = self.dice.split_at_pick(host_index)?;
                self.output.emit(GameEvent::HostDicePicked {
                    dice: host_dice.clone(),
                });

                let pick = match self.collect_dice(&rest)? {
                    Some(index) => index,
                    None => return Ok(None),
                };
                let user_dice = rest[pick].clone();
                self.output.emit(GameEvent::UserDicePicked {
                    dice: user_dice.clone(),
                });
                Ok(Some((host_dice, user_dice)))
            }
            Party::User => {
                let options = self.dice.dice().to_vec();
                let pick = match self.collect_dice(&options)? {
                    Some(index) => index,
                    None => return Ok(None),
                };
                let (user_dice, rest) = self.dice.split_at_pick(pick)?;
                self.output.emit(GameEvent::UserDicePicked {
                    dice: user_dice.clone(),
                });

                // Draw over the remaining dice only; the user's dice is
                // already claimed
                let host_index = self.rng.draw(rest.len() as u64) as usize;
                let host_dice = rest[host_index].clone();
                self.output.emit(GameEvent::HostDicePicked {
                    dice: host_dice.clone(),
                });
                Ok(Some((host_dice, user_dice)))
            }
        }
    }

    /// Throw exchange over the dice's side count; the combined result
    /// indexes the face list.
    fn throw(&mut self, party: Party, dice: &Dice) -> Result<Option<i64>, SessionError> {
        let stage = ExchangeStage::Throw(party);
        let sides = dice.sides() as u64;
        let mut exchange = FairExchange::commit(sides, &mut self.rng)?;
        self.output.emit(GameEvent::ExchangeCommitted {
            stage,
            range: exchange.range(),
            commitment: exchange.commitment(),
        });

        let contribution = match self.collect_number(dice.sides())? {
            Some(value) => value,
            None => return Ok(None),
        };
        exchange.contribute(contribution)?;
        let reveal = exchange.reveal()?;

        let face_value = dice.roll(reveal.combined as usize)?;
        self.records.push(ExchangeRecord {
            stage,
            reveal: reveal.clone(),
        });
        self.output.emit(GameEvent::ExchangeRevealed { stage, reveal });
        self.output.emit(GameEvent::ThrowResolved { party, face_value });
        debug!(game_id = %self.id, %party, face_value, "throw resolved");
        Ok(Some(face_value))
    }

    /// Ask for a number in `[0, upper)`; help re-asks without
    /// advancing, exit cancels (`None`).
    fn collect_number(&mut self, upper: usize) -> Result<Option<u64>, SessionError> {
        loop {
            match self.input.choose_number(upper)? {
                Selection::Pick(value) if value < upper => return Ok(Some(value as u64)),
                Selection::Pick(_) => continue,
                Selection::Help => self.emit_probability_table(),
                Selection::Exit => return Ok(None),
            }
        }
    }

    /// Ask to pick one of `options` by index
    fn collect_dice(&mut self, options: &[Dice]) -> Result<Option<usize>, SessionError> {
        loop {
            match self.input.choose_dice(options)? {
                Selection::Pick(index) if index < options.len() => return Ok(Some(index)),
                Selection::Pick(_) => continue,
                Selection::Help => self.emit_probability_table(),
                Selection::Exit => return Ok(None),
            }
        }
    }

    /// Read-only side query; never a transition
    fn emit_probability_table(&mut self) {
        self.output.emit(GameEvent::ProbabilityTable {
            dice: self.dice.dice().to_vec(),
            odds: winning_probabilities(&self.dice),
        });
    }

    fn advance(&mut self, next: Phase) {
        debug_assert!(next > self.phase, "phases only move forward");
        debug!(game_id = %self.id, ?next, "phase transition");
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::ScriptedRandom;
    use crate::protocol::session::{RecordingOutput, ScriptedInput};

    fn sample_set() -> DiceSet {
        DiceSet::parse(&[
            "2,2,4,4,9,9".to_string(),
            "1,1,6,6,8,8".to_string(),
            "3,3,5,5,7,7".to_string(),
        ])
        .unwrap()
    }

    fn completed(end: SessionEnd) -> GameReport {
        match end {
            SessionEnd::Completed(report) => report,
            SessionEnd::Cancelled => panic!("session was cancelled"),
        }
    }

    #[test]
    fn test_host_first_full_game() {
        // Coin: host 0, guess 1 -> host first. Host draw 1 picks
        // [1,1,6,6,8,8]; user picks index 1 of the rest -> [3,3,5,5,7,7].
        // Host throw: 1 + 0 = 1 -> face 1. User throw: 3 + 1 = 4 -> face 7.
        let rng = ScriptedRandom::new([0, 1, 1, 3]);
        let input = ScriptedInput::new([
            Selection::Pick(1),
            Selection::Pick(1),
            Selection::Pick(0),
            Selection::Pick(1),
        ]);
        let session = GameSession::new(sample_set(), rng, input, RecordingOutput::new());
        let report = completed(session.play().unwrap());

        assert_eq!(report.first_mover, Party::Host);
        assert_eq!(report.host_dice.values(), &[1, 1, 6, 6, 8, 8]);
        assert_eq!(report.user_dice.values(), &[3, 3, 5, 5, 7, 7]);
        assert_eq!(report.host_throw, 1);
        assert_eq!(report.user_throw, 7);
        assert_eq!(report.outcome, GameOutcome::UserWins);
        assert_eq!(report.exchanges.len(), 3);
        assert!(report.verify_exchanges());
    }

    #[test]
    fn test_user_first_picks_from_full_set_host_from_rest() {
        // Coin: host 1, guess 1 -> user first. User takes index 0;
        // host draw 1 over the rest -> [3,3,5,5,7,7].
        let rng = ScriptedRandom::new([1, 1, 2, 2]);
        let input = ScriptedInput::new([
            Selection::Pick(1),
            Selection::Pick(0),
            Selection::Pick(3),
            Selection::Pick(3),
        ]);
        let session = GameSession::new(sample_set(), rng, input, RecordingOutput::new());
        let report = completed(session.play().unwrap());

        assert_eq!(report.first_mover, Party::User);
        assert_eq!(report.user_dice.values(), &[2, 2, 4, 4, 9, 9]);
        assert_eq!(report.host_dice.values(), &[3, 3, 5, 5, 7, 7]);
        // Host: (2 + 3) % 6 = 5 -> face 7; user: (2 + 3) % 6 = 5 -> face 9
        assert_eq!(report.host_throw, 7);
        assert_eq!(report.user_throw, 9);
        assert_eq!(report.outcome, GameOutcome::UserWins);
    }

    #[test]
    fn test_draw_outcome() {
        // Both parties end up throwing the same face value.
        let set = DiceSet::parse(&[
            "1,1,1".to_string(),
            "1,1,1".to_string(),
            "2,2,2".to_string(),
        ])
        .unwrap();
        // Coin: host 0, guess 1 -> host first; host picks dice 0, user
        // picks rest index 0 -> dice 1. Throws both land on value 1.
        let rng = ScriptedRandom::new([0, 0, 0, 0]);
        let input = ScriptedInput::new([
            Selection::Pick(1),
            Selection::Pick(0),
            Selection::Pick(0),
            Selection::Pick(0),
        ]);
        let session = GameSession::new(set, rng, input, RecordingOutput::new());
        let report = completed(session.play().unwrap());

        assert_eq!(report.outcome, GameOutcome::Draw);
    }

    #[test]
    fn test_exit_at_first_prompt_cancels() {
        let rng = ScriptedRandom::new([0]);
        let input = ScriptedInput::new([Selection::Exit]);
        let session = GameSession::new(sample_set(), rng, input, RecordingOutput::new());

        assert!(matches!(session.play().unwrap(), SessionEnd::Cancelled));
    }

    #[test]
    fn test_exit_during_dice_selection_cancels() {
        let rng = ScriptedRandom::new([0, 0]);
        let input = ScriptedInput::new([Selection::Pick(1), Selection::Exit]);
        let session = GameSession::new(sample_set(), rng, input, RecordingOutput::new());

        assert!(matches!(session.play().unwrap(), SessionEnd::Cancelled));
    }

    #[test]
    fn test_help_emits_table_without_advancing() {
        let rng = ScriptedRandom::new([0, 1, 1, 3]);
        let input = ScriptedInput::new([
            Selection::Help,
            Selection::Pick(1),
            Selection::Pick(1),
            Selection::Pick(0),
            Selection::Pick(1),
        ]);
        let mut output = RecordingOutput::new();
        let session = GameSession::new(sample_set(), rng, input, &mut output);
        let report = completed(session.play().unwrap());

        // Help did not change the game relative to the no-help script
        assert_eq!(report.outcome, GameOutcome::UserWins);
        assert_eq!(report.exchanges.len(), 3);

        let tables = output
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::ProbabilityTable { .. }))
            .count();
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_all_recorded_exchanges_verify() {
        let rng = ScriptedRandom::new([0, 1, 1, 3]);
        let input = ScriptedInput::new([
            Selection::Pick(1),
            Selection::Pick(1),
            Selection::Pick(0),
            Selection::Pick(1),
        ]);
        let session = GameSession::new(sample_set(), rng, input, RecordingOutput::new());
        let report = completed(session.play().unwrap());

        for record in &report.exchanges {
            assert!(record.verify(), "commitment must bind the reveal");
        }
    }

    #[test]
    fn test_out_of_bound_pick_reprompts() {
        // A Pick beyond the bound is ignored and the prompt repeats.
        let rng = ScriptedRandom::new([0, 1, 1, 3]);
        let input = ScriptedInput::new([
            Selection::Pick(9),
            Selection::Pick(1),
            Selection::Pick(1),
            Selection::Pick(0),
            Selection::Pick(1),
        ]);
        let session = GameSession::new(sample_set(), rng, input, RecordingOutput::new());
        let report = completed(session.play().unwrap());

        assert_eq!(report.outcome, GameOutcome::UserWins);
    }
}
