//! edotune - prints the retuning table for a saved tuning document.
//!
//! A minimal host for the tuning core: it loads a document (if given),
//! then lists the cent offset of every spelling from Fbb to B##, the same
//! values the host would write onto notes.
//!
//! # Usage
//!
//! ```bash
//! cargo run                      # 12-EDO defaults
//! cargo run -- my_tuning.json    # load a saved tuning
//! ```
//!
//! Set `RUST_LOG=debug` to trace history and recalculation.

use anyhow::{bail, Context, Result};
use edotune::tuning::{
    format_cents, FileStore, PitchClass, SimplePitch, Spelling, TuningSession, MAX_PITCH_CLASS,
    MIN_PITCH_CLASS, SIMPLE_PITCH_COUNT,
};
use std::path::PathBuf;

/// Command-line options for the application.
struct CliOptions {
    /// Tuning document to load.
    document: Option<PathBuf>,
}

impl CliOptions {
    /// Parses command-line arguments: at most one positional document path.
    fn parse() -> Result<Self> {
        let mut args = std::env::args().skip(1);
        let document = args.next().map(PathBuf::from);
        if let Some(extra) = args.next() {
            bail!("unexpected argument: {}\nusage: edotune [DOCUMENT]", extra);
        }
        Ok(Self { document })
    }
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = CliOptions::parse()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut session = TuningSession::new();
    if let Some(path) = &cli.document {
        let mut store = FileStore::new(path);
        session
            .load(&mut store)
            .with_context(|| format!("Failed to load tuning document {}", path.display()))?;
    }

    print_table(&session)
}

/// Prints the settings followed by one line per spelling.
fn print_table(session: &TuningSession) -> Result<()> {
    let state = session.state();
    println!(
        "{}  root {}  pure {}  tweak {}",
        state.temperament(),
        state.root(),
        state.pure_tone(),
        format_cents(state.tweak())
    );
    println!();

    // Simple spellings in field order, as the offset fields show them.
    for position in 0..SIMPLE_PITCH_COUNT {
        let Some(pitch) = SimplePitch::from_field_position(position) else {
            continue;
        };
        println!(
            "{:>4}  {:>7}",
            pitch.name(),
            format_cents(state.final_offset(pitch))
        );
    }
    println!();

    // Double accidentals, which follow their enharmonic simple spelling.
    for value in MIN_PITCH_CLASS..=MAX_PITCH_CLASS {
        if matches!(PitchClass::new(value).spelling(), Ok(Spelling::Simple(_))) {
            continue;
        }
        let cents = session
            .resolve(value)
            .with_context(|| format!("Failed to resolve pitch class {}", value))?;
        println!("{:>4}  {:>7}", PitchClass::new(value), format_cents(cents));
    }

    Ok(())
}
