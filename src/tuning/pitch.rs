//! Notated pitch classes.
//!
//! Pitch classes describe *spelling*, not sounding pitch: C# and Db are
//! different values. They follow the host's "tonal pitch class" numbering along
//! the line of fifths, from Fbb (-1) to B## (33).

use super::error::{Result, TuningError};
use std::fmt;

/// Number of simple spellings (single flat through single sharp).
pub const SIMPLE_PITCH_COUNT: usize = 21;

/// Lowest supported pitch class (Fbb).
pub const MIN_PITCH_CLASS: i32 = -1;

/// Highest supported pitch class (B##).
pub const MAX_PITCH_CLASS: i32 = 33;

/// Pitch class of Fb, the first simple spelling.
const FIRST_SIMPLE: i32 = 6;

/// Pitch class of F##, the first double sharp.
const FIRST_DOUBLE_SHARP: i32 = 27;

/// Simple spelling names in fifths order.
pub const SIMPLE_PITCH_NAMES: [&str; SIMPLE_PITCH_COUNT] = [
    "Fb", "Cb", "Gb", "Db", "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#",
    "G#", "D#", "A#", "E#", "B#",
];

/// Letter names in fifths order; the letter of any spelling is its position
/// on the line of fifths modulo 7.
const FIFTHS_LETTERS: [char; 7] = ['F', 'C', 'G', 'D', 'A', 'E', 'B'];

/// Position of each fifths-ordered letter within C D E F G A B.
const LETTER_FIELD_POSITION: [usize; 7] = [3, 0, 4, 1, 5, 2, 6];

/// A notated pitch class as supplied by the host.
///
/// Any `i32` can be wrapped; [`PitchClass::spelling`] reports values outside
/// -1..=33 as [`TuningError::InvalidPitchClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(i32);

impl PitchClass {
    /// Wraps a raw host pitch class.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Classifies this pitch class into its accidental region.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPitchClass` if the value is outside -1..=33.
    pub fn spelling(self) -> Result<Spelling> {
        match self.0 {
            MIN_PITCH_CLASS..FIRST_SIMPLE => {
                Ok(Spelling::DoubleFlat((self.0 - MIN_PITCH_CLASS) as usize))
            }
            FIRST_SIMPLE..FIRST_DOUBLE_SHARP => {
                Ok(Spelling::Simple(SimplePitch((self.0 - FIRST_SIMPLE) as u8)))
            }
            FIRST_DOUBLE_SHARP..=MAX_PITCH_CLASS => {
                Ok(Spelling::DoubleSharp((self.0 - FIRST_DOUBLE_SHARP) as usize))
            }
            other => Err(TuningError::InvalidPitchClass(other)),
        }
    }
}

impl From<SimplePitch> for PitchClass {
    fn from(pitch: SimplePitch) -> Self {
        Self(pitch.0 as i32 + FIRST_SIMPLE)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.spelling() {
            Ok(Spelling::Simple(p)) => p.name().to_string(),
            Ok(Spelling::DoubleFlat(i)) => format!("{}bb", FIFTHS_LETTERS[i]),
            Ok(Spelling::DoubleSharp(i)) => format!("{}##", FIFTHS_LETTERS[i]),
            Err(_) => format!("?{}", self.0),
        };
        f.pad(&name)
    }
}

/// The accidental region a pitch class falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spelling {
    /// Double flat; the index is the letter in fifths order (0 = Fbb, 6 = Bbb).
    DoubleFlat(usize),
    /// Single flat, natural or single sharp.
    Simple(SimplePitch),
    /// Double sharp; the index is the letter in fifths order (0 = F##, 6 = B##).
    DoubleSharp(usize),
}

/// One of the 21 simple spellings, indexed 0..=20 in fifths order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimplePitch(u8);

impl SimplePitch {
    pub const F_FLAT: Self = Self(0);
    pub const C_FLAT: Self = Self(1);
    pub const G_FLAT: Self = Self(2);
    pub const D_FLAT: Self = Self(3);
    pub const A_FLAT: Self = Self(4);
    pub const E_FLAT: Self = Self(5);
    pub const B_FLAT: Self = Self(6);
    pub const F: Self = Self(7);
    pub const C: Self = Self(8);
    pub const G: Self = Self(9);
    pub const D: Self = Self(10);
    pub const A: Self = Self(11);
    pub const E: Self = Self(12);
    pub const B: Self = Self(13);
    pub const F_SHARP: Self = Self(14);
    pub const C_SHARP: Self = Self(15);
    pub const G_SHARP: Self = Self(16);
    pub const D_SHARP: Self = Self(17);
    pub const A_SHARP: Self = Self(18);
    pub const E_SHARP: Self = Self(19);
    pub const B_SHARP: Self = Self(20);

    /// Creates a simple pitch from its fifths-order index.
    ///
    /// # Returns
    ///
    /// None if `index` is not in 0..=20
    pub fn new(index: u8) -> Option<Self> {
        ((index as usize) < SIMPLE_PITCH_COUNT).then_some(Self(index))
    }

    /// Creates a simple pitch from an index that may lie outside 0..=20,
    /// wrapping it around the 21-entry ring.
    pub fn wrapping(index: i32) -> Self {
        Self(index.rem_euclid(SIMPLE_PITCH_COUNT as i32) as u8)
    }

    /// Returns the fifths-order index (0..=20).
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterates over all 21 simple pitches in fifths order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SIMPLE_PITCH_COUNT as u8).map(Self)
    }

    /// Returns the display name, e.g. "C#".
    pub fn name(self) -> &'static str {
        SIMPLE_PITCH_NAMES[self.index()]
    }

    /// Returns the position of this spelling in the document field order
    /// Cb C C# Db D D# ... Bb B B#.
    pub fn field_position(self) -> usize {
        let letter = self.index() % 7;
        let accidental = self.index() / 7;
        LETTER_FIELD_POSITION[letter] * 3 + accidental
    }

    /// Inverse of [`SimplePitch::field_position`].
    ///
    /// # Returns
    ///
    /// None if `position` is not in 0..=20
    pub fn from_field_position(position: usize) -> Option<Self> {
        if position >= SIMPLE_PITCH_COUNT {
            return None;
        }
        let letter_position = position / 3;
        let accidental = position % 3;
        let letter = LETTER_FIELD_POSITION
            .iter()
            .position(|&p| p == letter_position)?;
        Some(Self((accidental * 7 + letter) as u8))
    }
}

impl TryFrom<u8> for SimplePitch {
    type Error = TuningError;

    fn try_from(index: u8) -> Result<Self> {
        Self::new(index).ok_or_else(|| {
            TuningError::MalformedDocument(format!("pitch index {} is not in 0..=20", index))
        })
    }
}

impl From<SimplePitch> for u8 {
    fn from(pitch: SimplePitch) -> Self {
        pitch.0
    }
}

impl fmt::Display for SimplePitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
