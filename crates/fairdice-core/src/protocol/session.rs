//! Injected interactive capabilities.
//!
//! The state machine never touches a console directly: it asks an
//! [`InputProvider`] for tagged selections and pushes [`GameEvent`]s
//! into an [`OutputSink`]. Scripted implementations live here so the
//! whole game can run under test.

use super::events::GameEvent;
use crate::games::Dice;
use std::collections::VecDeque;
use thiserror::Error;

/// Result of one prompt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// A valid index in the stated bound
    Pick(usize),
    /// Show the probability table, then ask again
    Help,
    /// Abandon the game immediately
    Exit,
}

/// Errors from the interactive surface
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("input source exhausted")]
    Exhausted,
}

/// Supplies the user's choices.
///
/// Implementations own re-prompting on unparsable or out-of-range
/// input; the machine only ever sees a valid tagged selection.
pub trait InputProvider {
    /// Ask for a number in `[0, upper)`
    fn choose_number(&mut self, upper: usize) -> Result<Selection, InputError>;

    /// Ask to pick one of the offered dice, by index
    fn choose_dice(&mut self, options: &[Dice]) -> Result<Selection, InputError>;
}

/// Receives every observable event of a session
pub trait OutputSink {
    fn emit(&mut self, event: GameEvent);
}

impl<T: OutputSink + ?Sized> OutputSink for &mut T {
    fn emit(&mut self, event: GameEvent) {
        (**self).emit(event)
    }
}

/// Input provider serving a fixed script of selections
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    selections: VecDeque<Selection>,
}

impl ScriptedInput {
    pub fn new(selections: impl IntoIterator<Item = Selection>) -> Self {
        Self {
            selections: selections.into_iter().collect(),
        }
    }

    fn next(&mut self) -> Result<Selection, InputError> {
        self.selections.pop_front().ok_or(InputError::Exhausted)
    }

    /// Number of scripted selections not yet consumed
    pub fn remaining(&self) -> usize {
        self.selections.len()
    }
}

impl InputProvider for ScriptedInput {
    fn choose_number(&mut self, _upper: usize) -> Result<Selection, InputError> {
        self.next()
    }

    fn choose_dice(&mut self, _options: &[Dice]) -> Result<Selection, InputError> {
        self.next()
    }
}

/// Output sink collecting every event for assertions
#[derive(Clone, Debug, Default)]
pub struct RecordingOutput {
    events: Vec<GameEvent>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
}

impl OutputSink for RecordingOutput {
    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_serves_in_order() {
        let mut input = ScriptedInput::new([Selection::Help, Selection::Pick(1), Selection::Exit]);
        assert_eq!(input.choose_number(2).unwrap(), Selection::Help);
        assert_eq!(input.choose_number(2).unwrap(), Selection::Pick(1));
        assert_eq!(input.choose_dice(&[]).unwrap(), Selection::Exit);
    }

    #[test]
    fn test_scripted_input_exhaustion() {
        let mut input = ScriptedInput::new([]);
        assert!(matches!(
            input.choose_number(2),
            Err(InputError::Exhausted)
        ));
    }
}
