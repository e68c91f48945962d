//! Pitch class to cent offset resolution.
//!
//! A simple spelling is looked up in the temperament table, rotated by the
//! root and normalised so that the pure tone lands exactly on its 12-EDO pitch.
//! A double accidental is first respelled through the division's
//! [`EnharmonicMap`](super::temperament::EnharmonicMap) and then takes
//! whatever *final* value its simple equivalent currently holds, so manual
//! edits carry over to enharmonic double accidentals.

use super::error::Result;
use super::pitch::{PitchClass, SimplePitch, Spelling, SIMPLE_PITCH_COUNT};
use super::temperament::{EnharmonicTable, OffsetTable, TemperamentTable};
use std::ops::{Index, IndexMut};

/// The 21 editable per-pitch-class offsets, in fifths order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FinalOffsets(OffsetTable);

impl FinalOffsets {
    /// Wraps 21 offsets given in fifths order.
    pub const fn new(offsets: OffsetTable) -> Self {
        Self(offsets)
    }

    /// Builds offsets by evaluating `f` for every simple pitch.
    pub fn from_fn(mut f: impl FnMut(SimplePitch) -> f64) -> Self {
        let mut offsets = [0.0; SIMPLE_PITCH_COUNT];
        for pitch in SimplePitch::all() {
            offsets[pitch.index()] = f(pitch);
        }
        Self(offsets)
    }

    /// Returns the offsets in fifths order.
    pub fn as_array(&self) -> &OffsetTable {
        &self.0
    }

    /// Returns the offsets in document field order (Cb C C# ... Bb B B#).
    pub fn to_field_order(&self) -> OffsetTable {
        let mut fields = [0.0; SIMPLE_PITCH_COUNT];
        for pitch in SimplePitch::all() {
            fields[pitch.field_position()] = self[pitch];
        }
        fields
    }

    /// Builds offsets from values listed in document field order.
    pub fn from_field_order(fields: &OffsetTable) -> Self {
        Self::from_fn(|pitch| fields[pitch.field_position()])
    }
}

impl Index<SimplePitch> for FinalOffsets {
    type Output = f64;

    fn index(&self, pitch: SimplePitch) -> &f64 {
        &self.0[pitch.index()]
    }
}

impl IndexMut<SimplePitch> for FinalOffsets {
    fn index_mut(&mut self, pitch: SimplePitch) -> &mut f64 {
        &mut self.0[pitch.index()]
    }
}

/// Table offset of a simple pitch under the given root, pure tone and tweak.
///
/// The table is rotated so that `root` takes the table's C position, then
/// shifted so that `pure_tone` resolves to 0 before the tweak is added.
pub fn table_offset(
    table: &TemperamentTable,
    root: SimplePitch,
    pure_tone: SimplePitch,
    tweak: f64,
    pitch: SimplePitch,
) -> f64 {
    let c = SimplePitch::C.index() as i32;
    let raw = table.offset(SimplePitch::wrapping(
        pitch.index() as i32 - root.index() as i32 + c,
    ));
    let pure_adjustment = table.offset(SimplePitch::wrapping(
        pure_tone.index() as i32 - root.index() as i32 + c,
    ));
    raw - pure_adjustment + tweak
}

/// Resolves a pitch class using `lookup` for simple spellings.
///
/// Double accidentals are respelled with the enharmonic map of `division` and
/// answered from `finals`.
///
/// # Errors
///
/// - `InvalidPitchClass` if `pitch_class` is outside -1..=33
/// - `UnsupportedDivision` if a double accidental meets an unknown division
pub fn resolve_with<F>(
    pitch_class: PitchClass,
    division: u32,
    enharmonics: &EnharmonicTable,
    finals: &FinalOffsets,
    lookup: F,
) -> Result<f64>
where
    F: Fn(SimplePitch) -> f64,
{
    match pitch_class.spelling()? {
        Spelling::Simple(pitch) => Ok(lookup(pitch)),
        Spelling::DoubleFlat(letter) => {
            let pitch = enharmonics.lookup(division)?.double_flats[letter];
            Ok(finals[pitch])
        }
        Spelling::DoubleSharp(letter) => {
            let pitch = enharmonics.lookup(division)?.double_sharps[letter];
            Ok(finals[pitch])
        }
    }
}

/// Resolves a pitch class against a temperament table.
///
/// Double accidentals are mapped through `enharmonics`, so a map installed
/// with [`EnharmonicTable::insert`] applies here as well.
///
/// # Errors
///
/// See [`resolve_with`].
pub fn resolve_offset(
    pitch_class: PitchClass,
    table: &TemperamentTable,
    root: SimplePitch,
    pure_tone: SimplePitch,
    tweak: f64,
    enharmonics: &EnharmonicTable,
    finals: &FinalOffsets,
) -> Result<f64> {
    resolve_with(
        pitch_class,
        table.division,
        enharmonics,
        finals,
        |pitch| table_offset(table, root, pure_tone, tweak, pitch),
    )
}

/// Resolves a pitch class purely from the final offsets.
///
/// This is the override mode: saved or hand-edited values replace the table
/// for simple spellings too.
///
/// # Errors
///
/// See [`resolve_with`].
pub fn resolve_final(
    pitch_class: PitchClass,
    division: u32,
    enharmonics: &EnharmonicTable,
    finals: &FinalOffsets,
) -> Result<f64> {
    resolve_with(pitch_class, division, enharmonics, finals, |pitch| {
        finals[pitch]
    })
}
