//! Persisted tuning document.
//!
//! The document is a single small JSON object:
//!
//! ```json
//! { "offsets": [21 numbers], "temperament": "equal19", "root": 8, "pure": 11, "tweak": 0.0 }
//! ```
//!
//! `offsets` are listed in field order (Cb, C, C#, Db, D, D#, ..., Bb, B, B#),
//! not the fifths order used internally. Older documents have no `tweak`;
//! it defaults to 0.

use super::error::{Result, TuningError};
use super::pitch::{SimplePitch, SIMPLE_PITCH_COUNT};
use super::resolver::FinalOffsets;
use super::state::TuningState;
use super::temperament::Temperament;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Read/write capability for the document, supplied by the host.
pub trait DocumentStore {
    /// Returns the whole stored document.
    fn read(&mut self) -> std::io::Result<String>;

    /// Replaces the stored document.
    fn write(&mut self, contents: &str) -> std::io::Result<()>;
}

/// A document stored in a file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store reading and writing `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DocumentStore for FileStore {
    fn read(&mut self) -> std::io::Result<String> {
        fs::read_to_string(&self.path)
    }

    fn write(&mut self, contents: &str) -> std::io::Result<()> {
        fs::write(&self.path, contents)
    }
}

/// The on-disk shape of a saved tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningDocument {
    /// Final offsets in field order.
    pub offsets: Vec<f64>,

    /// Temperament key, e.g. "equal17".
    pub temperament: String,

    /// Root as a fifths-order index (0..=20).
    pub root: u8,

    /// Pure tone as a fifths-order index (0..=20).
    pub pure: u8,

    #[serde(default)]
    pub tweak: f64,
}

/// A document that passed validation, ready to apply to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningSettings {
    pub temperament: Temperament,
    pub root: SimplePitch,
    pub pure_tone: SimplePitch,
    pub tweak: f64,
    pub final_offsets: FinalOffsets,
}

impl TuningDocument {
    /// Captures the persistent fields of a state.
    pub fn from_state(state: &TuningState) -> Self {
        Self {
            offsets: state.final_offsets().to_field_order().to_vec(),
            temperament: state.temperament().name().to_string(),
            root: u8::from(state.root()),
            pure: u8::from(state.pure_tone()),
            tweak: state.tweak(),
        }
    }

    /// Serializes the document to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a document from JSON without validating its contents.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if the text is not a document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks every field and converts to typed settings.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` for an unknown temperament, a root or pure
    /// tone outside 0..=20, or an offset list that is not 21 long.
    pub fn validate(&self) -> Result<TuningSettings> {
        let temperament = Temperament::from_name(&self.temperament)?;
        let root = SimplePitch::try_from(self.root)?;
        let pure_tone = SimplePitch::try_from(self.pure)?;

        let fields: [f64; SIMPLE_PITCH_COUNT] =
            self.offsets.as_slice().try_into().map_err(|_| {
                TuningError::MalformedDocument(format!(
                    "expected {} offsets, found {}",
                    SIMPLE_PITCH_COUNT,
                    self.offsets.len()
                ))
            })?;

        Ok(TuningSettings {
            temperament,
            root,
            pure_tone,
            tweak: self.tweak,
            final_offsets: FinalOffsets::from_field_order(&fields),
        })
    }
}

/// Reads and validates a document from `store`.
///
/// # Errors
///
/// Returns `Io` if the store fails, `MalformedDocument` if the contents are
/// not a valid document.
pub fn read_settings(store: &mut dyn DocumentStore) -> Result<TuningSettings> {
    let json = store.read()?;
    TuningDocument::from_json(&json)?.validate()
}

/// Writes the persistent fields of `state` to `store`.
///
/// # Errors
///
/// Returns `Io` if the store fails.
pub fn write_state(store: &mut dyn DocumentStore, state: &TuningState) -> Result<()> {
    let json = TuningDocument::from_state(state).to_json()?;
    store.write(&json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json(tweak: Option<f64>) -> String {
        let offsets: Vec<String> = (0..SIMPLE_PITCH_COUNT).map(|i| format!("{}.5", i)).collect();
        let tweak = tweak
            .map(|t| format!(", \"tweak\": {}", t))
            .unwrap_or_default();
        format!(
            "{{\"offsets\": [{}], \"temperament\": \"equal17\", \"root\": 10, \"pure\": 14{}}}",
            offsets.join(", "),
            tweak
        )
    }

    #[test]
    fn test_parse_and_validate() {
        let settings = TuningDocument::from_json(&sample_json(Some(1.5)))
            .unwrap()
            .validate()
            .unwrap();

        assert_eq!(settings.temperament, Temperament::Equal17);
        assert_eq!(settings.root, SimplePitch::D);
        assert_eq!(settings.pure_tone, SimplePitch::F_SHARP);
        assert_eq!(settings.tweak, 1.5);
        // Field 0 is Cb, field 1 is C.
        assert_eq!(settings.final_offsets[SimplePitch::C_FLAT], 0.5);
        assert_eq!(settings.final_offsets[SimplePitch::C], 1.5);
        assert_eq!(settings.final_offsets[SimplePitch::B_SHARP], 20.5);
    }

    #[test]
    fn test_missing_tweak_defaults_to_zero() {
        let doc = TuningDocument::from_json(&sample_json(None)).unwrap();
        assert_eq!(doc.tweak, 0.0);
    }

    #[test]
    fn test_unknown_temperament() {
        let json = sample_json(None).replace("equal17", "equal31");
        let result = TuningDocument::from_json(&json).unwrap().validate();
        assert!(matches!(result, Err(TuningError::MalformedDocument(_))));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            TuningDocument::from_json("offsets: nope"),
            Err(TuningError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_wrong_offset_count() {
        let doc = TuningDocument {
            offsets: vec![0.0; 12],
            temperament: "equal12".into(),
            root: 8,
            pure: 11,
            tweak: 0.0,
        };
        assert!(matches!(
            doc.validate(),
            Err(TuningError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_root_out_of_range() {
        let doc = TuningDocument {
            offsets: vec![0.0; SIMPLE_PITCH_COUNT],
            temperament: "equal12".into(),
            root: 21,
            pure: 11,
            tweak: 0.0,
        };
        assert!(matches!(
            doc.validate(),
            Err(TuningError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let state = TuningState::new();
        let json = TuningDocument::from_state(&state).to_json().unwrap();
        let loaded = TuningDocument::from_json(&json).unwrap();

        assert_eq!(loaded.temperament, "equal12");
        assert_eq!(loaded.root, 8);
        assert_eq!(loaded.pure, 11);
        assert_eq!(loaded.offsets.len(), SIMPLE_PITCH_COUNT);
    }
}
