//! End-to-end scenarios driving a tuning session the way the dialog does.

use edotune::tuning::{
    resolve_offset, DocumentStore, EnharmonicMap, EnharmonicTable, FinalOffsets, PitchClass,
    Retunable, SimplePitch, StateChange, Temperament, TuningError, TuningObserver, TuningSession,
    SIMPLE_PITCH_COUNT,
};
use edotune::MAX_HISTORY_SIZE;
use std::cell::RefCell;
use std::rc::Rc;

struct MemoryStore(String);

impl DocumentStore for MemoryStore {
    fn read(&mut self) -> std::io::Result<String> {
        Ok(self.0.clone())
    }

    fn write(&mut self, contents: &str) -> std::io::Result<()> {
        self.0 = contents.to_string();
        Ok(())
    }
}

/// Mirrors the temperament radio buttons.
struct RadioButtons(Rc<RefCell<Temperament>>);

impl TuningObserver for RadioButtons {
    fn on_change(&mut self, change: &StateChange) {
        if let StateChange::Temperament(t) = change {
            *self.0.borrow_mut() = *t;
        }
    }
}

#[test]
fn select_19_edo_then_undo() {
    let selected = Rc::new(RefCell::new(Temperament::Equal12));
    let mut session = TuningSession::new();
    session.subscribe(Box::new(RadioButtons(selected.clone())));

    session.select_temperament(Temperament::Equal19);

    let table = Temperament::Equal19.table();
    assert_eq!(session.state().root(), SimplePitch::C);
    assert_eq!(session.state().pure_tone(), SimplePitch::A);
    for pitch in SimplePitch::all() {
        assert_eq!(session.state().final_offset(pitch), table.offset(pitch));
    }
    assert_eq!(*selected.borrow(), Temperament::Equal19);

    assert!(session.undo());
    assert_eq!(*session.state().final_offsets(), FinalOffsets::default());
    assert_eq!(session.state().temperament(), Temperament::Equal12);
    assert_eq!(session.state().division(), 12);
    assert_eq!(*selected.borrow(), Temperament::Equal12);
}

#[test]
fn load_equal17_document() {
    let fields: Vec<String> = (0..SIMPLE_PITCH_COUNT)
        .map(|i| format!("{:.1}", i as f64 - 10.0))
        .collect();
    let mut store = MemoryStore(format!(
        r#"{{ "offsets": [{}], "temperament": "equal17", "root": 10, "pure": 14, "tweak": 1.5 }}"#,
        fields.join(", ")
    ));

    let mut session = TuningSession::new();
    session.load(&mut store).unwrap();

    let state = session.state();
    assert_eq!(state.temperament(), Temperament::Equal17);
    assert_eq!(state.division(), 17);
    assert_eq!(state.root(), SimplePitch::D);
    assert_eq!(state.pure_tone(), SimplePitch::F_SHARP);
    assert_eq!(state.tweak(), 1.5);
    for pitch in SimplePitch::all() {
        assert_eq!(
            state.final_offset(pitch),
            pitch.field_position() as f64 - 10.0
        );
    }

    // 17-EDO double sharps: F## is Ab, A## is C, B## is D.
    let ab = state.final_offset(SimplePitch::A_FLAT);
    let c = state.final_offset(SimplePitch::C);
    let d = state.final_offset(SimplePitch::D);
    assert_eq!(session.resolve(27).unwrap(), ab);
    assert_eq!(session.resolve(31).unwrap(), c);
    assert_eq!(session.resolve(33).unwrap(), d);
}

#[test]
fn double_accidentals_follow_edits_for_every_division() {
    for temperament in Temperament::ALL {
        let mut session = TuningSession::new();
        session.select_temperament(temperament);
        let map = session
            .enharmonics()
            .lookup(temperament.division())
            .unwrap()
            .clone();

        for letter in 0..7 {
            let flat_equivalent = map.double_flats[letter];
            session.edit_final_offset(flat_equivalent, 11.1 + letter as f64);
            assert_eq!(
                session.resolve(letter as i32 - 1).unwrap(),
                session.state().final_offset(flat_equivalent),
                "{} double flat {}",
                temperament,
                letter
            );

            let sharp_equivalent = map.double_sharps[letter];
            session.edit_final_offset(sharp_equivalent, -22.2 - letter as f64);
            assert_eq!(
                session.resolve(letter as i32 + 27).unwrap(),
                session.state().final_offset(sharp_equivalent),
                "{} double sharp {}",
                temperament,
                letter
            );
        }
    }
}

#[test]
fn custom_enharmonics_reach_double_flats() {
    let mut enharmonics = EnharmonicTable::builtin();
    enharmonics.insert(EnharmonicMap {
        division: 15,
        double_flats: [SimplePitch::C; 7],
        double_sharps: [SimplePitch::C; 7],
    });
    let mut session = TuningSession::new().with_enharmonics(enharmonics);
    session.select_temperament(Temperament::Equal15);
    session.edit_final_offset(SimplePitch::C, 42.0);

    // Fbb now sounds as C rather than the built-in Eb.
    assert_eq!(session.resolve(-1).unwrap(), 42.0);
    assert_eq!(session.resolve_from_table(-1).unwrap(), 42.0);

    let state = session.state();
    let cents = resolve_offset(
        PitchClass::new(-1),
        Temperament::Equal15.table(),
        state.root(),
        state.pure_tone(),
        state.tweak(),
        session.enharmonics(),
        state.final_offsets(),
    )
    .unwrap();
    assert_eq!(cents, 42.0);

    // The built-in table still answers with its own mapping.
    let builtin = resolve_offset(
        PitchClass::new(-1),
        Temperament::Equal15.table(),
        state.root(),
        state.pure_tone(),
        state.tweak(),
        &EnharmonicTable::builtin(),
        state.final_offsets(),
    )
    .unwrap();
    assert_ne!(builtin, 42.0);
}

#[test]
fn undo_then_redo_restores_exact_state() {
    let mut session = TuningSession::new();
    session.select_temperament(Temperament::Equal17);
    session.select_root(SimplePitch::E_FLAT);
    session.edit_tweak(-3.3);

    let after = session.state().clone();
    assert!(session.undo());
    assert!(!session.state().same_settings(&after));
    assert!(session.redo());
    assert!(session.state().same_settings(&after));
}

#[test]
fn new_action_after_undo_discards_redo() {
    let mut session = TuningSession::new();
    session.select_temperament(Temperament::Equal19);
    session.edit_tweak(4.0);

    session.undo();
    assert!(session.history().can_redo());

    session.edit_final_offset(SimplePitch::G, 1.0);
    assert!(!session.history().can_redo());
    assert!(!session.redo());
    assert_eq!(session.state().tweak(), 0.0);
}

#[test]
fn history_keeps_thirty_steps() {
    let mut session = TuningSession::new();
    for i in 0..=MAX_HISTORY_SIZE {
        session.edit_final_offset(SimplePitch::C, i as f64 + 1.0);
    }
    assert_eq!(session.history().len(), MAX_HISTORY_SIZE);

    let mut steps = 0;
    while session.undo() {
        steps += 1;
    }
    assert_eq!(steps, MAX_HISTORY_SIZE);
    // The first edit (0 -> 1) fell off the end.
    assert_eq!(session.state().final_offset(SimplePitch::C), 1.0);
}

#[test]
fn malformed_document_keeps_state() {
    let mut session = TuningSession::new();
    session.select_temperament(Temperament::Equal15);
    let before = session.state().clone();

    let mut store = MemoryStore(
        r#"{ "offsets": [], "temperament": "pythagorean", "root": 8, "pure": 11 }"#.into(),
    );
    assert!(matches!(
        session.load(&mut store),
        Err(TuningError::MalformedDocument(_))
    ));
    assert!(session.state().same_settings(&before));

    store.0 = "not json".into();
    assert!(session.load(&mut store).is_err());
    assert!(session.state().same_settings(&before));
}

#[derive(Debug)]
struct ScoreNote {
    tpc: i32,
    tuning: f64,
}

impl Retunable for ScoreNote {
    fn pitch_class(&self) -> i32 {
        self.tpc
    }

    fn set_tuning(&mut self, cents: f64) {
        self.tuning = cents;
    }
}

#[test]
fn retune_selection_in_19_edo() {
    let mut session = TuningSession::new();
    session.select_temperament(Temperament::Equal19);

    // C, F#, and Ebb, which is spelled D# in 19-EDO.
    let mut notes: Vec<ScoreNote> = [14, 20, 4]
        .into_iter()
        .map(|tpc| ScoreNote { tpc, tuning: 0.0 })
        .collect();
    assert_eq!(session.apply_to(&mut notes).unwrap(), 3);

    let table = Temperament::Equal19.table();
    assert_eq!(notes[0].tuning, table.offset(SimplePitch::C));
    assert_eq!(notes[1].tuning, table.offset(SimplePitch::F_SHARP));
    assert_eq!(notes[2].tuning, table.offset(SimplePitch::D_SHARP));
}
