//! Writing final offsets back onto host notes.

use super::error::Result;
use super::pitch::PitchClass;
use super::resolver::{resolve_final, FinalOffsets};
use super::temperament::EnharmonicTable;

/// A note-like element of the host score.
///
/// The core reads the notated pitch class and writes a cents offset; it never
/// touches the host's selection or cursor.
pub trait Retunable {
    /// Host tonal pitch class (-1 = Fbb .. 33 = B##).
    fn pitch_class(&self) -> i32;

    /// Sets the note's tuning offset in cents.
    fn set_tuning(&mut self, cents: f64);
}

/// Retunes every note from the final offsets.
///
/// All offsets are resolved before any note is written, so a note with an
/// invalid pitch class leaves every note untouched.
///
/// # Returns
///
/// The number of notes retuned
///
/// # Errors
///
/// Returns the first resolution error (`InvalidPitchClass` or
/// `UnsupportedDivision`).
pub fn apply_tuning<'a, N, I>(
    notes: I,
    division: u32,
    enharmonics: &EnharmonicTable,
    finals: &FinalOffsets,
) -> Result<usize>
where
    N: Retunable + 'a,
    I: IntoIterator<Item = &'a mut N>,
{
    let notes: Vec<&mut N> = notes.into_iter().collect();
    let offsets = notes
        .iter()
        .map(|note| {
            resolve_final(
                PitchClass::new(note.pitch_class()),
                division,
                enharmonics,
                finals,
            )
        })
        .collect::<Result<Vec<f64>>>()?;

    let count = notes.len();
    for (note, cents) in notes.into_iter().zip(offsets) {
        note.set_tuning(cents);
    }

    tracing::debug!(count, division, "notes retuned");
    Ok(count)
}
