//! Chords built from stacked scale degrees, and chord names.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::{
    classify::{Classification, ScaleClassTable},
    error::{LookupError, NameKind, ParseError, TheoryError},
    interval::{check_heptatonic, ToneLabel},
    note::{Note, Role},
    parse,
    scale::{Alteration, AlteredDiatonicScale, DiatonicScale, Scale},
    temperament::TuningSystem,
};

const MODE_C: usize = 0;
const MODE_D: usize = 1;
const MODE_G: usize = 4;
const MODE_A: usize = 5;
const MODE_B: usize = 6;

const TRIAD: &[i32] = &[0, 2, 4];
const SEVENTH: &[i32] = &[0, 2, 4, 6];
const NINTH: &[i32] = &[0, 2, 4, 6, 8];
const SIXTH: &[i32] = &[0, 2, 4, 5];

/// How to build a chord type: the scale containing it and the zero-based degrees forming its body.
struct Recipe {
    mode_index: usize,
    alterations: &'static [(i32, u16)],
    degrees: &'static [i32],
}

impl Recipe {
    const fn new(
        mode_index: usize,
        alterations: &'static [(i32, u16)],
        degrees: &'static [i32],
    ) -> Self {
        Self {
            mode_index,
            alterations,
            degrees,
        }
    }

    /// Pitch of a body degree above the root, read off the named tones without building the scale.
    fn degree_pitch(&self, tuning: &TuningSystem, degree: i32) -> i32 {
        let num_named_tones = i32::from(tuning.num_named_tones());
        let named_lin = tuning.named_lin();

        let position = self.mode_index as i32 + degree;
        let num_octaves = position.div_euclid(num_named_tones);
        let step_index = position.rem_euclid(num_named_tones) as usize;
        let scale_degree = degree.rem_euclid(num_named_tones) + 1;

        let alteration = self
            .alterations
            .iter()
            .filter(|&&(_, altered_degree)| i32::from(altered_degree) == scale_degree)
            .map(|&(delta, _)| delta)
            .sum::<i32>();

        i32::from(named_lin[step_index]) - i32::from(named_lin[self.mode_index])
            + num_octaves * i32::from(tuning.num_tones())
            + alteration
    }

    fn interval_vector(&self, tuning: &TuningSystem) -> Vec<i32> {
        self.degrees
            .windows(2)
            .map(|pair| self.degree_pitch(tuning, pair[1]) - self.degree_pitch(tuning, pair[0]))
            .collect()
    }
}

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum ChordType {
    Major,
    Minor,
    Diminished,
    Augmented,
    SuspendedSecond,
    SuspendedFourth,
    Power,
    Sixth,
    MinorSixth,
    SixthNinth,
    Seventh,
    MajorSeventh,
    MinorSeventh,
    MinorMajorSeventh,
    HalfDiminished,
    DiminishedSeventh,
    AugmentedSeventh,
    AugmentedMajorSeventh,
    SeventhSuspendedFourth,
    SeventhFlatFifth,
    MajorSeventhFlatFifth,
    AddNinth,
    Ninth,
    MajorNinth,
    MinorNinth,
}

impl ChordType {
    pub const ALL: [ChordType; 25] = [
        ChordType::Major,
        ChordType::Minor,
        ChordType::Diminished,
        ChordType::Augmented,
        ChordType::SuspendedSecond,
        ChordType::SuspendedFourth,
        ChordType::Power,
        ChordType::Sixth,
        ChordType::MinorSixth,
        ChordType::SixthNinth,
        ChordType::Seventh,
        ChordType::MajorSeventh,
        ChordType::MinorSeventh,
        ChordType::MinorMajorSeventh,
        ChordType::HalfDiminished,
        ChordType::DiminishedSeventh,
        ChordType::AugmentedSeventh,
        ChordType::AugmentedMajorSeventh,
        ChordType::SeventhSuspendedFourth,
        ChordType::SeventhFlatFifth,
        ChordType::MajorSeventhFlatFifth,
        ChordType::AddNinth,
        ChordType::Ninth,
        ChordType::MajorNinth,
        ChordType::MinorNinth,
    ];

    /// The suffix used in chord names, e.g. `m7-5`. The major triad has an empty symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            ChordType::Major => "",
            ChordType::Minor => "m",
            ChordType::Diminished => "dim",
            ChordType::Augmented => "aug",
            ChordType::SuspendedSecond => "sus2",
            ChordType::SuspendedFourth => "sus4",
            ChordType::Power => "5",
            ChordType::Sixth => "6",
            ChordType::MinorSixth => "m6",
            ChordType::SixthNinth => "69",
            ChordType::Seventh => "7",
            ChordType::MajorSeventh => "M7",
            ChordType::MinorSeventh => "m7",
            ChordType::MinorMajorSeventh => "mM7",
            ChordType::HalfDiminished => "m7-5",
            ChordType::DiminishedSeventh => "dim7",
            ChordType::AugmentedSeventh => "aug7",
            ChordType::AugmentedMajorSeventh => "augM7",
            ChordType::SeventhSuspendedFourth => "7sus4",
            ChordType::SeventhFlatFifth => "7-5",
            ChordType::MajorSeventhFlatFifth => "M7-5",
            ChordType::AddNinth => "add9",
            ChordType::Ninth => "9",
            ChordType::MajorNinth => "M9",
            ChordType::MinorNinth => "m9",
        }
    }

    fn recipe(self) -> Recipe {
        match self {
            ChordType::Major => Recipe::new(MODE_C, &[], TRIAD),
            ChordType::Minor => Recipe::new(MODE_A, &[], TRIAD),
            ChordType::Diminished => Recipe::new(MODE_B, &[], TRIAD),
            ChordType::Augmented => Recipe::new(MODE_C, &[(1, 5)], TRIAD),
            ChordType::SuspendedSecond => Recipe::new(MODE_C, &[], &[0, 1, 4]),
            ChordType::SuspendedFourth => Recipe::new(MODE_C, &[], &[0, 3, 4]),
            ChordType::Power => Recipe::new(MODE_C, &[], &[0, 4]),
            ChordType::Sixth => Recipe::new(MODE_C, &[], SIXTH),
            ChordType::MinorSixth => Recipe::new(MODE_D, &[], SIXTH),
            ChordType::SixthNinth => Recipe::new(MODE_C, &[], &[0, 2, 4, 5, 8]),
            ChordType::Seventh => Recipe::new(MODE_G, &[], SEVENTH),
            ChordType::MajorSeventh => Recipe::new(MODE_C, &[], SEVENTH),
            ChordType::MinorSeventh => Recipe::new(MODE_A, &[], SEVENTH),
            ChordType::MinorMajorSeventh => Recipe::new(MODE_A, &[(1, 7)], SEVENTH),
            ChordType::HalfDiminished => Recipe::new(MODE_B, &[], SEVENTH),
            ChordType::DiminishedSeventh => Recipe::new(MODE_B, &[(-1, 7)], SEVENTH),
            ChordType::AugmentedSeventh => Recipe::new(MODE_G, &[(1, 5)], SEVENTH),
            ChordType::AugmentedMajorSeventh => Recipe::new(MODE_C, &[(1, 5)], SEVENTH),
            ChordType::SeventhSuspendedFourth => Recipe::new(MODE_G, &[], &[0, 3, 4, 6]),
            ChordType::SeventhFlatFifth => Recipe::new(MODE_G, &[(-1, 5)], SEVENTH),
            ChordType::MajorSeventhFlatFifth => Recipe::new(MODE_C, &[(-1, 5)], SEVENTH),
            ChordType::AddNinth => Recipe::new(MODE_C, &[], &[0, 2, 4, 8]),
            ChordType::Ninth => Recipe::new(MODE_G, &[], NINTH),
            ChordType::MajorNinth => Recipe::new(MODE_C, &[], NINTH),
            ChordType::MinorNinth => Recipe::new(MODE_A, &[], NINTH),
        }
    }

    /// The scale the chord type is taken from, with `root` as its tonic.
    ///
    /// ```
    /// # use tune_theory::chord::ChordType;
    /// # use tune_theory::note::Note;
    /// # use tune_theory::scale::Scale;
    /// let root = "D".parse::<Note>().unwrap();
    /// assert_eq!(ChordType::MinorMajorSeventh.scale(root).unwrap().name(), "D A-mode(#7)");
    /// ```
    pub fn scale(self, root: Note<'_>) -> Result<AlteredDiatonicScale<'_>, LookupError> {
        check_heptatonic(root.tuning())?;
        let recipe = self.recipe();
        AlteredDiatonicScale::new(
            DiatonicScale::new(root, recipe.mode_index),
            recipe
                .alterations
                .iter()
                .map(|&(delta, degree)| Alteration::new(delta, degree)),
        )
    }

    /// Zero-based scale degrees of the chord body. Degrees beyond the octave wrap into the next register.
    pub fn degrees(self) -> &'static [i32] {
        self.recipe().degrees
    }

    /// Pitch deltas between consecutive body notes, e.g. `[4, 3, 4]` for `M7` in `[12, 7, 5]`.
    pub fn interval_vector(self, tuning: &TuningSystem) -> Result<Vec<i32>, LookupError> {
        check_heptatonic(tuning)?;
        Ok(self.recipe().interval_vector(tuning))
    }

    /// Finds the chord type whose body has the given pitch deltas.
    pub fn from_interval_vector(
        tuning: &TuningSystem,
        interval_vector: &[i32],
    ) -> Result<Self, LookupError> {
        check_heptatonic(tuning)?;
        ChordType::ALL
            .into_iter()
            .find(|chord_type| chord_type.recipe().interval_vector(tuning) == interval_vector)
            .ok_or_else(|| LookupError::UnknownIntervalVector(interval_vector.to_vec()))
    }

    fn body(self, root: Note<'_>) -> Result<Vec<Note<'_>>, LookupError> {
        let scale = self.scale(root)?;
        Ok(self
            .degrees()
            .iter()
            .map(|&degree| scale.note(degree))
            .collect())
    }
}

impl FromStr for ChordType {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChordType::ALL
            .into_iter()
            .find(|chord_type| chord_type.symbol() == s)
            .ok_or_else(|| LookupError::UnknownChordType(s.to_owned()))
    }
}

impl Display for ChordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.symbol())
    }
}

fn pitch_deltas(notes: &[Note<'_>]) -> Vec<i32> {
    notes
        .windows(2)
        .map(|pair| pair[1].pitch() - pair[0].pitch())
        .collect()
}

/// A chord made of an optional bass, a body of stacked chord tones and optional tensions.
///
/// # Examples
///
/// ```
/// # use tune_theory::chord::Chord;
/// let chord = "Dm7(9, 11)/C".parse::<Chord>().unwrap();
///
/// let notes = chord.notes().iter().map(|note| note.to_string()).collect::<Vec<_>>();
/// assert_eq!(notes, ["C0", "D0", "F0", "A0", "C1", "E1", "G1"]);
///
/// let roles = chord.notes().iter().filter_map(|note| note.role()).map(|role| role.to_string()).collect::<Vec<_>>();
/// assert_eq!(roles, ["B", "R", "b3", "5", "b7", "9", "11"]);
///
/// assert_eq!(chord.get_name(false).unwrap(), "Dm7(9, 11)/C");
/// assert_eq!(chord.get_name(true).unwrap(), "m7");
/// ```
#[derive(Clone, Debug)]
pub struct Chord<'t> {
    chord_type: ChordType,
    body: Vec<Note<'t>>,
    tensions: Vec<Note<'t>>,
    bass: Option<Note<'t>>,
}

impl<'t> Chord<'t> {
    pub fn new(root: Note<'t>, chord_type: ChordType) -> Result<Self, LookupError> {
        let body = chord_type.body(root)?;
        let root = body[0];

        let body = body
            .into_iter()
            .enumerate()
            .map(|(index, note)| {
                let role = if index == 0 {
                    Role::Root
                } else {
                    Role::Chord((note - root).tone_label(root.tuning())?)
                };
                Ok(note.with_role(role))
            })
            .collect::<Result<_, LookupError>>()?;

        Ok(Self {
            chord_type,
            body,
            tensions: Vec::new(),
            bass: None,
        })
    }

    /// Parses `<root><type>[(<tensions>)][/<bass>]`, e.g. `C`, `F#m7-5` or `Dm7(9, 11, 13)/C`.
    pub fn from_name(tuning: &'t TuningSystem, name: &str) -> Result<Self, TheoryError> {
        let token = parse::chord_name(name)
            .map_err(|reason| ParseError::new(NameKind::Chord, name, reason))?;

        let root = Note::from_name(tuning, token.root)?;
        let mut chord = Self::new(root, token.kind.parse()?)?;

        for tension in token.tensions.into_iter().flat_map(parse::list_items) {
            chord = chord.with_tension(tension.parse()?)?;
        }
        if let Some(bass) = token.bass {
            chord = chord.with_bass(Note::from_name(tuning, bass)?);
        }

        Ok(chord)
    }

    /// Identifies the chord type of the stacked `notes`, the first one being the root.
    ///
    /// ```
    /// # use tune_theory::chord::{Chord, ChordType};
    /// # use tune_theory::note::Note;
    /// let notes = ["G0", "B0", "D1", "F1"].map(|name| name.parse::<Note>().unwrap());
    /// let chord = Chord::from_notes(&notes).unwrap();
    /// assert_eq!(chord.chord_type(), ChordType::Seventh);
    /// assert_eq!(chord.get_name(false).unwrap(), "G7");
    /// ```
    pub fn from_notes(notes: &[Note<'t>]) -> Result<Self, LookupError> {
        let root = notes
            .first()
            .ok_or_else(|| LookupError::UnknownIntervalVector(Vec::new()))?;
        let chord_type = ChordType::from_interval_vector(root.tuning(), &pitch_deltas(notes))?;
        Self::new(root.without_role(), chord_type)
    }

    /// Adds a tension above the root, e.g. `b9` or `13`.
    pub fn with_tension(mut self, label: ToneLabel) -> Result<Self, LookupError> {
        let root = self.root();
        let tension = root + label.interval(root.tuning())?;
        self.tensions.push(tension.with_role(Role::Tension(label)));
        Ok(self)
    }

    /// Sets the bass note. It is placed on the closest named step below the root, keeping its accidental.
    pub fn with_bass(mut self, bass: Note<'t>) -> Self {
        let root = self.root();
        let num_named_tones = i32::from(root.tuning().num_named_tones());
        let bass = bass.with_register(0);
        let register = (root.step() - 1 - bass.step()).div_euclid(num_named_tones);
        self.bass = Some(bass.with_register(register).with_role(Role::Bass));
        self
    }

    pub fn chord_type(&self) -> ChordType {
        self.chord_type
    }

    pub fn root(&self) -> Note<'t> {
        self.body[0]
    }

    pub fn body(&self) -> &[Note<'t>] {
        &self.body
    }

    pub fn tensions(&self) -> &[Note<'t>] {
        &self.tensions
    }

    pub fn bass(&self) -> Option<Note<'t>> {
        self.bass
    }

    /// All notes from the bass up to the highest tension.
    pub fn notes(&self) -> Vec<Note<'t>> {
        self.bass
            .iter()
            .chain(&self.body)
            .chain(&self.tensions)
            .copied()
            .collect()
    }

    /// Derives the name from the notes: the type from the body's pitch deltas, tensions and bass from their position relative to the root.
    pub fn get_name(&self, type_only: bool) -> Result<String, LookupError> {
        let root = self.root();
        let tuning = root.tuning();
        let chord_type = ChordType::from_interval_vector(tuning, &pitch_deltas(&self.body))?;
        if type_only {
            return Ok(chord_type.symbol().to_owned());
        }

        let mut name = format!("{root:#}{chord_type}");
        if !self.tensions.is_empty() {
            let labels = self
                .tensions
                .iter()
                .map(|&tension| Ok((tension - root).tone_label(tuning)?.to_string()))
                .collect::<Result<Vec<_>, LookupError>>()?;
            name.push_str(&format!("({})", labels.join(", ")));
        }
        if let Some(bass) = self.bass {
            name.push_str(&format!("/{bass:#}"));
        }
        Ok(name)
    }

    /// The scale the chord body is taken from.
    pub fn scale(&self) -> Result<AlteredDiatonicScale<'t>, LookupError> {
        self.chord_type.scale(self.root())
    }

    pub fn scale_class(&self, table: &ScaleClassTable) -> Result<Classification, TheoryError> {
        Ok(self.scale()?.classify(table)?)
    }
}

/// [`Chord`]s can be parsed in the standard `[12, 7, 5]` tuning.
impl FromStr for Chord<'static> {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chord::from_name(TuningSystem::standard(), s)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use crate::{error::ParseFailure, interval::Interval};

    use super::*;

    #[test]
    fn interval_vectors_are_unique() {
        let tuning = TuningSystem::standard();
        let vectors = ChordType::ALL
            .iter()
            .map(|chord_type| chord_type.interval_vector(tuning).unwrap())
            .collect::<HashSet<_>>();
        assert_eq!(vectors.len(), ChordType::ALL.len());

        assert_eq!(ChordType::Major.interval_vector(tuning), Ok(vec![4, 3]));
        assert_eq!(
            ChordType::DiminishedSeventh.interval_vector(tuning),
            Ok(vec![3, 3, 3])
        );
        assert_eq!(
            ChordType::SixthNinth.interval_vector(tuning),
            Ok(vec![4, 3, 2, 5])
        );
        assert_eq!(
            ChordType::MinorNinth.interval_vector(tuning),
            Ok(vec![3, 4, 3, 4])
        );
    }

    #[test]
    fn interval_vectors_match_chord_bodies() {
        let tuning_19 =
            TuningSystem::new(19, 11, 8, ['C', 'D', 'E', 'F', 'G', 'A', 'B']).unwrap();

        for tuning in [TuningSystem::standard(), &tuning_19] {
            for root in ["C", "F#", "Bb", "Ebb"] {
                let root = Note::from_name(tuning, root).unwrap();
                for chord_type in ChordType::ALL {
                    let chord = Chord::new(root, chord_type).unwrap();
                    assert_eq!(
                        chord_type.interval_vector(tuning),
                        Ok(pitch_deltas(chord.body())),
                        "{chord_type}"
                    );
                }
            }
        }
    }

    #[test]
    fn forward_and_inverse_tables_agree() {
        let tuning = TuningSystem::standard();
        for chord_type in ChordType::ALL {
            let vector = chord_type.interval_vector(tuning).unwrap();
            assert_eq!(
                ChordType::from_interval_vector(tuning, &vector),
                Ok(chord_type)
            );
            assert_eq!(chord_type.symbol().parse(), Ok(chord_type));
        }
        assert_eq!(
            ChordType::from_interval_vector(tuning, &[1, 1]),
            Err(LookupError::UnknownIntervalVector(vec![1, 1]))
        );
    }

    #[test]
    fn major_seventh_chord() {
        let chord = "CM7".parse::<Chord>().unwrap();

        let roles = chord
            .notes()
            .iter()
            .map(|note| note.role().unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(roles, ["R", "3", "5", "7"]);

        let tuning = TuningSystem::standard();
        let intervals = chord
            .body()
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).named(tuning).to_string())
            .collect::<Vec<_>>();
        assert_eq!(intervals, ["M3", "m3", "M3"]);
    }

    #[test]
    fn chord_names_round_trip() {
        for root in ["C", "F#", "Bb", "Ebb", "G##"] {
            for chord_type in ChordType::ALL {
                let name = format!("{root}{chord_type}");
                let chord = name.parse::<Chord>().unwrap();
                assert_eq!(chord.get_name(true).unwrap(), chord_type.symbol());
                assert_eq!(chord.get_name(false).unwrap(), name);
            }
        }
    }

    #[test]
    fn chord_tone_spelling() {
        let cases = [
            ("Bm7-5", "B0 D1 F1 A1"),
            ("Cdim7", "C0 Eb0 Gb0 Bbb0"),
            ("Ebaug", "Eb0 G0 B0"),
            ("F#7sus4", "F#0 B0 C#1 E1"),
            ("C69", "C0 E0 G0 A0 D1"),
            ("Gadd9", "G0 B0 D1 A1"),
            ("A5", "A0 E1"),
        ];
        for (name, expected) in cases {
            let chord = name.parse::<Chord>().unwrap();
            let notes = chord
                .notes()
                .iter()
                .map(|note| note.to_string())
                .collect::<Vec<_>>();
            assert_eq!(notes.join(" "), expected);
        }
    }

    #[test]
    fn tensions_and_bass() {
        let chord = "G7(b9, #11, b13)/F".parse::<Chord>().unwrap();
        let notes = chord
            .notes()
            .iter()
            .map(|note| note.to_string())
            .collect::<Vec<_>>();
        assert_eq!(notes, ["F0", "G0", "B0", "D1", "F1", "Ab1", "C#2", "Eb2"]);
        assert_eq!(chord.get_name(false).unwrap(), "G7(b9, #11, b13)/F");

        let chord = "C/G".parse::<Chord>().unwrap();
        assert_eq!(chord.bass().unwrap().to_string(), "G-1");
        assert_eq!(chord.bass().unwrap().role(), Some(Role::Bass));

        let chord = "C/C".parse::<Chord>().unwrap();
        assert_eq!(chord.bass().unwrap().to_string(), "C-1");
    }

    #[test]
    fn identify_chords_from_notes() {
        let tuning = TuningSystem::standard();
        let root = Note::from_name(tuning, "E2").unwrap();
        let notes = [
            root,
            root + Interval::new(3, 2),
            root + Interval::new(6, 4),
            root + Interval::new(10, 6),
        ];

        let chord = Chord::from_notes(&notes).unwrap();
        assert_eq!(chord.chord_type(), ChordType::HalfDiminished);
        assert_eq!(chord.body(), notes);

        assert_eq!(
            Chord::from_notes(&[]).unwrap_err(),
            LookupError::UnknownIntervalVector(Vec::new())
        );
    }

    #[test]
    fn chord_errors() {
        assert_eq!(
            "Cmaj7".parse::<Chord>().unwrap_err(),
            TheoryError::Lookup(LookupError::UnknownChordType("maj7".to_owned()))
        );
        assert_eq!(
            "C7(#3)".parse::<Chord>().unwrap_err(),
            TheoryError::Parse(ParseError::new(NameKind::Tension, "#3", ParseFailure::OutOfRange))
        );
        assert_eq!(
            "c7".parse::<Chord>().unwrap_err(),
            TheoryError::Parse(ParseError::new(NameKind::Chord, "c7", ParseFailure::Syntax))
        );

        let pentatonic = TuningSystem::new(5, 3, 0, ['C', 'D']).unwrap();
        assert_eq!(
            Chord::new(Note::new(&pentatonic, 0, 0, 0), ChordType::Major).unwrap_err(),
            LookupError::NotHeptatonic { num_named_tones: 2 }
        );
    }

    #[test]
    fn chords_in_19_edo() {
        let tuning =
            TuningSystem::new(19, 11, 8, ['C', 'D', 'E', 'F', 'G', 'A', 'B']).unwrap();

        assert_eq!(ChordType::Major.interval_vector(&tuning), Ok(vec![6, 5]));
        assert_eq!(
            ChordType::MajorSeventh.interval_vector(&tuning),
            Ok(vec![6, 5, 6])
        );

        let chord = Chord::from_name(&tuning, "Ebm7-5").unwrap();
        assert_eq!(chord.get_name(false).unwrap(), "Ebm7-5");
    }

    #[test]
    fn chord_scales_are_classified() {
        let table = ScaleClassTable::standard().unwrap();

        let order = |name: &str| {
            let chord = name.parse::<Chord>().unwrap();
            let classification = chord.scale_class(table).unwrap();
            table.get(classification.class_index).unwrap().order()
        };

        assert_eq!(order("Cm7"), 0);
        assert_eq!(order("G7"), 0);
        assert_eq!(order("CmM7"), 1);
        assert_eq!(order("Caug"), 1);
        assert_eq!(order("Cdim7"), 1);
    }
}
