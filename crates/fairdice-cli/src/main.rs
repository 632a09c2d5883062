//! Fairdice interactive console game.
//!
//! The host (this program) plays a non-transitive dice game against
//! the user on stdin/stdout. Every contested random decision is backed
//! by a commit-reveal exchange whose keys are printed so the user can
//! verify the host never cheated.

use clap::Parser;
use fairdice_core::protocol::{GameEvent, InputError, InputProvider, OutputSink, Selection};
use fairdice_core::{
    Dice, DiceSet, ExchangeStage, GameOutcome, GameSession, PairOdds, Party, SessionEnd,
    SystemRandom,
};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "fairdice",
    about = "Provably-fair non-transitive dice game",
    after_help = "Example: fairdice 2,2,4,4,9,9 1,1,6,6,8,8 3,3,5,5,7,7"
)]
struct Args {
    /// Dice face lists, one comma-separated integer list per dice
    #[arg(required = true)]
    dice: Vec<String>,

    /// Print the JSON verification transcript after a completed game
    #[arg(long)]
    transcript: bool,
}

// ============================================================================
// Console menu (input provider)
// ============================================================================

/// Interactive menu over any reader/writer pair.
///
/// Re-issues the same prompt on unparsable or out-of-range input;
/// end of input counts as an exit request.
struct ConsoleMenu<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ConsoleMenu<R, W> {
    fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn select(&mut self, options: &[String]) -> Result<Selection, InputError> {
        loop {
            for (i, option) in options.iter().enumerate() {
                writeln!(self.writer, "{} - {}", i, option)?;
            }
            writeln!(self.writer, "X - exit\n? - help")?;
            write!(self.writer, "Your selection: ")?;
            self.writer.flush()?;

            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(Selection::Exit);
            }
            match line.trim() {
                "?" => return Ok(Selection::Help),
                "x" | "X" => return Ok(Selection::Exit),
                raw => {
                    if let Ok(index) = raw.parse::<usize>() {
                        if index < options.len() {
                            return Ok(Selection::Pick(index));
                        }
                    }
                    writeln!(self.writer, "Invalid input. Please try again.")?;
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> InputProvider for ConsoleMenu<R, W> {
    fn choose_number(&mut self, upper: usize) -> Result<Selection, InputError> {
        let options: Vec<String> = (0..upper).map(|i| i.to_string()).collect();
        self.select(&options)
    }

    fn choose_dice(&mut self, options: &[Dice]) -> Result<Selection, InputError> {
        let labels: Vec<String> = options.iter().map(|d| d.to_string()).collect();
        self.select(&labels)
    }
}

// ============================================================================
// Console renderer (output sink)
// ============================================================================

/// Renders game events as the classic interaction script
struct ConsoleRenderer<W> {
    writer: W,
    first_mover: Option<Party>,
}

impl<W: Write> ConsoleRenderer<W> {
    fn new(writer: W) -> Self {
        Self {
            writer,
            first_mover: None,
        }
    }

    fn render(&mut self, event: &GameEvent) -> io::Result<()> {
        match event {
            GameEvent::ExchangeCommitted {
                stage: ExchangeStage::FirstMover,
                range,
                commitment,
            } => writeln!(
                self.writer,
                "Let's determine who makes the first move.\n\
                 I selected a random value in the range 0..{}\n\
                 (HMAC = {})\n\
                 Try to guess my selection.",
                range - 1,
                commitment
            ),
            GameEvent::ExchangeCommitted {
                stage: ExchangeStage::Throw(party),
                range,
                commitment,
            } => writeln!(
                self.writer,
                "It's time for {} throw.\n\
                 I selected a random value in the range 0..{}\n\
                 (HMAC = {})\n\
                 Add your number modulo {}.",
                match party {
                    Party::Host => "my",
                    Party::User => "your",
                },
                range - 1,
                commitment,
                range
            ),
            GameEvent::ExchangeRevealed {
                stage: ExchangeStage::FirstMover,
                reveal,
            } => writeln!(
                self.writer,
                "My selection: {}\n(KEY = {})",
                reveal.host_number, reveal.salt
            ),
            GameEvent::ExchangeRevealed {
                stage: ExchangeStage::Throw(_),
                reveal,
            } => writeln!(
                self.writer,
                "My number is {}\n(KEY = {})\nThe result is {} + {} = {} (mod {}).",
                reveal.host_number,
                reveal.salt,
                reveal.host_number,
                reveal.user_number,
                reveal.combined,
                reveal.range
            ),
            GameEvent::FirstMoverDecided { first_mover } => {
                self.first_mover = Some(*first_mover);
                if *first_mover == Party::User {
                    writeln!(self.writer, "You make the first move.\nChoose your dice.")
                } else {
                    Ok(())
                }
            }
            GameEvent::HostDicePicked { dice } => {
                if self.first_mover == Some(Party::Host) {
                    writeln!(
                        self.writer,
                        "I make the first move and choose the [{}] dice.\nChoose your dice.",
                        dice
                    )
                } else {
                    writeln!(self.writer, "My dice: [{}]", dice)
                }
            }
            GameEvent::UserDicePicked { dice } => {
                writeln!(self.writer, "You choose the [{}] dice.", dice)
            }
            GameEvent::ThrowResolved { party, face_value } => match party {
                Party::Host => writeln!(self.writer, "My throw is {}.", face_value),
                Party::User => writeln!(self.writer, "Your throw is {}.", face_value),
            },
            GameEvent::ProbabilityTable { dice, odds } => {
                let table = render_probability_table(dice, odds);
                writeln!(self.writer, "{}", table)
            }
            GameEvent::GameFinished {
                outcome,
                host_throw,
                user_throw,
            } => match outcome {
                GameOutcome::UserWins => {
                    writeln!(self.writer, "You win ({} > {})", user_throw, host_throw)
                }
                GameOutcome::HostWins => {
                    writeln!(self.writer, "I win ({} < {})", user_throw, host_throw)
                }
                GameOutcome::Draw => {
                    writeln!(self.writer, "It's a draw ({} = {})", user_throw, host_throw)
                }
            },
        }
    }
}

impl<W: Write> OutputSink for ConsoleRenderer<W> {
    fn emit(&mut self, event: GameEvent) {
        // A failed stdout write has nowhere useful to go
        let _ = self.render(&event);
    }
}

/// Format the pairwise win probability table, 2 decimal places
fn render_probability_table(dice: &[Dice], odds: &[PairOdds]) -> String {
    let labels: Vec<String> = odds
        .iter()
        .map(|o| format!("[{}] vs [{}]", dice[o.a], dice[o.b]))
        .collect();
    let pair_width = labels
        .iter()
        .map(|l| l.len())
        .chain(std::iter::once("A pair of dices".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let rule = format!("+-{}-+-------------+\n", "-".repeat(pair_width));
    out.push_str("\nProbabilities of winning for each pair of dice:\n");
    out.push_str(&rule);
    out.push_str(&format!(
        "| {:<width$} | Probability |\n",
        "A pair of dices",
        width = pair_width
    ));
    out.push_str(&rule);
    for (label, o) in labels.iter().zip(odds) {
        out.push_str(&format!(
            "| {:<width$} | {:<11.2} |\n",
            label,
            o.win_probability,
            width = pair_width
        ));
    }
    out.push_str(&rule);
    out
}

// ============================================================================
// Entry point
// ============================================================================

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let dice = match DiceSet::parse(&args.dice) {
        Ok(set) => set,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(dice = dice.len(), sides = dice.sides(), "configuration accepted");

    let menu = ConsoleMenu::new(io::stdin().lock(), io::stdout());
    let renderer = ConsoleRenderer::new(io::stdout());
    let session = GameSession::new(dice, SystemRandom, menu, renderer);

    match session.play() {
        Ok(SessionEnd::Completed(report)) => {
            if args.transcript {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(err) => {
                        eprintln!("failed to encode transcript: {}", err);
                        return ExitCode::FAILURE;
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Ok(SessionEnd::Cancelled) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("game aborted: {}", err);
            ExitCode::FAILURE
        }
    }
}
