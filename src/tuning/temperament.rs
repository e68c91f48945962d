//! Built-in temperaments and their double-accidental spellings.
//!
//! The tables here are curated data, not derived at runtime. Each offset is
//! the deviation in cents of a simple spelling from its 12-EDO pitch, listed
//! in fifths order with C at index 8 and normalised so that A (index 11) sits
//! at 0.

use super::error::{Result, TuningError};
use super::pitch::{SimplePitch, SIMPLE_PITCH_COUNT};
use std::fmt;

/// Default tonic of every built-in table (C).
pub const DEFAULT_ROOT: SimplePitch = SimplePitch::C;

/// Default justly tuned reference tone of every built-in table (A).
pub const DEFAULT_PURE_TONE: SimplePitch = SimplePitch::A;

/// Offsets in cents, one per simple pitch class in fifths order.
pub type OffsetTable = [f64; SIMPLE_PITCH_COUNT];

/// An immutable, named temperament.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperamentTable {
    /// Unique key, also used in persisted documents.
    pub name: &'static str,

    /// Number of equal steps per octave.
    pub division: u32,

    /// Deviation from 12-EDO per simple pitch class, fifths order.
    pub offsets: OffsetTable,

    /// Tonic selected when the table is chosen.
    pub root: SimplePitch,

    /// Pure tone selected when the table is chosen.
    pub pure_tone: SimplePitch,
}

impl TemperamentTable {
    /// Returns the raw table offset of a simple pitch class.
    pub fn offset(&self, pitch: SimplePitch) -> f64 {
        self.offsets[pitch.index()]
    }
}

const EQUAL_12: TemperamentTable = TemperamentTable {
    name: "equal12",
    division: 12,
    offsets: [0.0; SIMPLE_PITCH_COUNT],
    root: DEFAULT_ROOT,
    pure_tone: DEFAULT_PURE_TONE,
};

// Fifth of 720 cents: +20 cents per step along the line of fifths.
const EQUAL_15: TemperamentTable = TemperamentTable {
    name: "equal15",
    division: 15,
    offsets: [
        -220.0, -200.0, -180.0, -160.0, -140.0, -120.0, -100.0, //
        -80.0, -60.0, -40.0, -20.0, 0.0, 20.0, 40.0, //
        60.0, 80.0, 100.0, 120.0, 140.0, 160.0, 180.0,
    ],
    root: DEFAULT_ROOT,
    pure_tone: DEFAULT_PURE_TONE,
};

// Fifth of 705.9 cents.
const EQUAL_17: TemperamentTable = TemperamentTable {
    name: "equal17",
    division: 17,
    offsets: [
        -64.7, -58.8, -52.9, -47.1, -41.2, -35.3, -29.4, //
        -23.5, -17.6, -11.8, -5.9, 0.0, 5.9, 11.8, //
        17.6, 23.5, 29.4, 35.3, 41.2, 47.1, 52.9,
    ],
    root: DEFAULT_ROOT,
    pure_tone: DEFAULT_PURE_TONE,
};

// Fifth of 694.7 cents.
const EQUAL_19: TemperamentTable = TemperamentTable {
    name: "equal19",
    division: 19,
    offsets: [
        57.9, 52.6, 47.4, 42.1, 36.8, 31.6, 26.3, //
        21.1, 15.8, 10.5, 5.3, 0.0, -5.3, -10.5, //
        -15.8, -21.1, -26.3, -31.6, -36.8, -42.1, -47.4,
    ],
    root: DEFAULT_ROOT,
    pure_tone: DEFAULT_PURE_TONE,
};

/// The selectable temperaments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Temperament {
    #[default]
    Equal12,
    Equal15,
    Equal17,
    Equal19,
}

impl Temperament {
    /// All temperaments, in the order a host lists them.
    pub const ALL: [Temperament; 4] = [
        Temperament::Equal12,
        Temperament::Equal15,
        Temperament::Equal17,
        Temperament::Equal19,
    ];

    /// Returns the table backing this temperament.
    pub fn table(self) -> &'static TemperamentTable {
        match self {
            Temperament::Equal12 => &EQUAL_12,
            Temperament::Equal15 => &EQUAL_15,
            Temperament::Equal17 => &EQUAL_17,
            Temperament::Equal19 => &EQUAL_19,
        }
    }

    /// Returns the unique key, e.g. "equal19".
    pub fn name(self) -> &'static str {
        self.table().name
    }

    /// Returns the number of steps per octave.
    pub fn division(self) -> u32 {
        self.table().division
    }

    /// Looks a temperament up by its unique key.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` for an unknown name.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| TuningError::MalformedDocument(format!("unknown temperament '{}'", name)))
    }
}

impl fmt::Display for Temperament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-EDO", self.division())
    }
}

/// Enharmonic spellings of double accidentals for one division.
///
/// Both arrays are indexed by letter in fifths order (F, C, G, D, A, E, B):
/// `double_flats[1]` is the simple spelling that Cbb sounds as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnharmonicMap {
    pub division: u32,
    pub double_flats: [SimplePitch; 7],
    pub double_sharps: [SimplePitch; 7],
}

use SimplePitch as P;

/// 12-EDO: a double accidental is twelve fifths away from its simple spelling.
const ENHARMONICS_12: EnharmonicMap = EnharmonicMap {
    division: 12,
    double_flats: [P::E_FLAT, P::B_FLAT, P::F, P::C, P::G, P::D, P::A],
    double_sharps: [P::G, P::D, P::A, P::E, P::B, P::F_SHARP, P::C_SHARP],
};

// FIXME: borrowed from 12-EDO until the 15-EDO spellings are checked by
// someone who reads 15-EDO notation.
const ENHARMONICS_15: EnharmonicMap = EnharmonicMap {
    division: 15,
    ..ENHARMONICS_12
};

const ENHARMONICS_17: EnharmonicMap = EnharmonicMap {
    division: 17,
    double_flats: [P::D, P::A, P::E, P::B, P::F_SHARP, P::C_SHARP, P::G_SHARP],
    double_sharps: [P::A_FLAT, P::E_FLAT, P::B_FLAT, P::F, P::C, P::G, P::D],
};

const ENHARMONICS_19: EnharmonicMap = EnharmonicMap {
    division: 19,
    double_flats: [P::E, P::B, P::F_SHARP, P::C_SHARP, P::G_SHARP, P::D_SHARP, P::A_SHARP],
    double_sharps: [P::G_FLAT, P::D_FLAT, P::A_FLAT, P::E_FLAT, P::B_FLAT, P::F, P::C],
};

/// Registry of enharmonic maps keyed by division.
///
/// Starts with the built-in maps; a host may replace any of them.
#[derive(Debug, Clone)]
pub struct EnharmonicTable {
    maps: Vec<EnharmonicMap>,
}

impl Default for EnharmonicTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EnharmonicTable {
    /// Returns the maps shipped for 12, 15, 17 and 19 EDO.
    pub fn builtin() -> Self {
        Self {
            maps: vec![ENHARMONICS_12, ENHARMONICS_15, ENHARMONICS_17, ENHARMONICS_19],
        }
    }

    /// Adds or replaces the map for `map.division`.
    pub fn insert(&mut self, map: EnharmonicMap) {
        match self.maps.iter_mut().find(|m| m.division == map.division) {
            Some(existing) => *existing = map,
            None => self.maps.push(map),
        }
    }

    /// Returns the map for `division`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedDivision` if no map exists.
    pub fn lookup(&self, division: u32) -> Result<&EnharmonicMap> {
        self.maps
            .iter()
            .find(|m| m.division == division)
            .ok_or(TuningError::UnsupportedDivision(division))
    }
}
