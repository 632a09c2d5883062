//! Game protocol: session state machine, events, and injected I/O.

mod events;
mod machine;
mod session;
mod types;

pub use events::{ExchangeRecord, ExchangeStage, GameEvent, GameReport};
pub use machine::{GameSession, Phase, SessionEnd, SessionError};
pub use session::{InputError, InputProvider, OutputSink, RecordingOutput, ScriptedInput, Selection};
pub use types::{GameId, GameOutcome, Party};
