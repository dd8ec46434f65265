//! Diatonic scales derived from the generator chain, and scales with altered degrees.

use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::{
    classify::{Classification, ScaleClassTable},
    error::{ClassificationError, LookupError, NameKind, ParseError, ParseFailure, TheoryError},
    interval::Interval,
    math,
    note::{write_accidentals, Note, Role},
    parse,
    temperament::TuningSystem,
};

/// Common behavior of scales with one note per named tone.
///
/// Notes are indexed tonic-first in ascending order. Indices outside of `0..len` wrap around with a register carry.
pub trait Scale<'t> {
    fn tuning(&self) -> &'t TuningSystem;

    /// The notes of a single octave, starting at the tonic.
    fn notes(&self) -> &[Note<'t>];

    fn name(&self) -> String;

    fn len(&self) -> usize {
        self.notes().len()
    }

    fn tonic(&self) -> Note<'t> {
        self.notes()[0]
    }

    /// ```
    /// # use tune_theory::scale::{DiatonicScale, Scale};
    /// # use tune_theory::temperament::TuningSystem;
    /// let scale = DiatonicScale::from_name(TuningSystem::standard(), "D C-mode").unwrap();
    /// assert_eq!(scale.note(0).to_string(), "D0");
    /// assert_eq!(scale.note(6).to_string(), "C#1");
    /// assert_eq!(scale.note(7).to_string(), "D1");
    /// assert_eq!(scale.note(-1).to_string(), "C#0");
    /// ```
    fn note(&self, index: i32) -> Note<'t> {
        let (num_octaves, index) = math::div_mod(index, self.len() as u16);
        self.notes()[usize::from(index)].add_register(num_octaves)
    }

    /// Intervals between consecutive notes, closed by the tonic one octave up.
    fn get_intervals_seq(&self) -> Vec<Interval> {
        (0..self.len() as i32)
            .map(|index| self.note(index + 1) - self.note(index))
            .collect()
    }

    /// The pitch deltas of [`Scale::get_intervals_seq`], used as the identity of a scale class.
    fn signature(&self) -> Vec<i32> {
        self.get_intervals_seq()
            .into_iter()
            .map(Interval::delta_pitch)
            .collect()
    }

    /// Stacks every `step_length`-th note starting at `root_degree` (zero-based).
    ///
    /// ```
    /// # use tune_theory::scale::{DiatonicScale, Scale};
    /// # use tune_theory::temperament::TuningSystem;
    /// let scale = DiatonicScale::from_name(TuningSystem::standard(), "C C-mode").unwrap();
    /// let chord = scale.get_chord(4, 4, 2);
    /// assert_eq!(chord.iter().map(|note| note.to_string()).collect::<Vec<_>>(), ["G0", "B0", "D1", "F1"]);
    /// ```
    fn get_chord(&self, root_degree: i32, num_notes: usize, step_length: i32) -> Vec<Note<'t>> {
        (0..num_notes as i32)
            .map(|index| self.note(root_degree + index * step_length))
            .collect()
    }

    fn classify(&self, table: &ScaleClassTable) -> Result<Classification, ClassificationError>
    where
        Self: Sized,
    {
        table.classify_scale(self)
    }

    /// Up to `max_names` names of the scale's class and rotation, fewest accidentals first.
    fn class_names(
        &self,
        table: &ScaleClassTable,
        max_names: usize,
    ) -> Result<Vec<String>, ClassificationError>
    where
        Self: Sized,
    {
        table.scale_names(self, max_names)
    }
}

/// A scale whose notes are `M` consecutive positions of the generator chain.
///
/// The notes are kept in generator order, e.g. `F C G D A E B` in `[12, 7, 5]`.
/// Shifting the scale by one accidental sharpens the first unsharpened position or flattens the last unflattened position of that order.
///
/// # Examples
///
/// ```
/// # use tune_theory::scale::{DiatonicScale, Scale};
/// # use tune_theory::temperament::TuningSystem;
/// let tuning = TuningSystem::standard();
///
/// let mut scale = DiatonicScale::from_name(tuning, "E C-mode").unwrap();
/// assert_eq!(scale.accidentals(), 4);
/// assert_eq!(scale.signature(), [2, 2, 1, 2, 2, 2, 1]);
///
/// scale.set_tonic(5);
/// assert_eq!(scale.name(), "C# A-mode");
///
/// scale.add_accidental(-1);
/// assert_eq!(scale.name(), "C# E-mode");
/// ```
#[derive(Clone, Debug)]
pub struct DiatonicScale<'t> {
    tuning: &'t TuningSystem,
    meta_notes: Vec<Note<'t>>,
    accidentals: i32,
    tonic_index: usize,
    register: i32,
    notes: Vec<Note<'t>>,
}

impl<'t> DiatonicScale<'t> {
    /// Creates the scale in which `tonic` is the first note of the mode starting at the named tone with linear index `mode_index`.
    ///
    /// `mode_index` is taken modulo the number of named tones.
    pub fn new(tonic: Note<'t>, mode_index: usize) -> Self {
        let tuning = tonic.tuning();
        let num_named_tones = usize::from(tuning.num_named_tones());

        let mut scale = Self {
            tuning,
            meta_notes: (0..num_named_tones)
                .map(|gen_position| Note::new(tuning, tuning.step_index_at_gen(gen_position), 0, 0))
                .collect(),
            accidentals: 0,
            tonic_index: tonic.step_index(),
            register: tonic.register(),
            notes: Vec::new(),
        };

        scale.shift_accidentals(
            tuning.chain_position(tonic.step_index(), tonic.accidental())
                - tuning.gen_position(mode_index % num_named_tones) as i32,
        );
        scale.refresh();
        scale
    }

    /// Parses `<tonic> <X>-mode`. In the standard tuning, church mode names like `Dorian` are accepted as well.
    pub fn from_name(tuning: &'t TuningSystem, name: &str) -> Result<Self, ParseError> {
        let fail = |reason| ParseError::new(NameKind::Scale, name, reason);

        let token = parse::scale_name(name).map_err(fail)?;
        let tonic = Note::from_name(tuning, token.tonic)?;
        let scale_type = ScaleType::resolve(tuning, name, token.mode)?;

        if token.alterations.is_some() || !scale_type.alterations.is_empty() {
            return Err(fail(ParseFailure::UnexpectedAlterations));
        }

        Ok(Self::new(tonic, scale_type.mode_index))
    }

    /// Signed number of generator-order positions carrying an extra accidental.
    pub fn accidentals(&self) -> i32 {
        self.accidentals
    }

    /// Linear index of the named tone whose natural mode has the same shape, e.g. 1 (`D`) for Dorian scales.
    pub fn mode_index(&self) -> usize {
        let tonic = self.notes[0];
        let (_, gen_position) = math::div_mod(
            self.tuning
                .chain_position(tonic.step_index(), tonic.accidental())
                - self.accidentals,
            self.tuning.num_named_tones(),
        );
        self.tuning.step_index_at_gen(usize::from(gen_position))
    }

    /// Positive values add sharps, negative values add flats.
    pub fn add_accidental(&mut self, num_accidentals: i32) {
        self.shift_accidentals(num_accidentals);
        self.refresh();
    }

    /// Makes the note at the zero-based `degree` the new tonic. The pitches do not change.
    pub fn set_tonic(&mut self, degree: usize) {
        let new_tonic = self.notes[degree % self.notes.len()];
        self.tonic_index = new_tonic.step_index();
        self.register = new_tonic.register();
        self.refresh();
    }

    pub fn add_register(&mut self, num_registers: i32) {
        self.register += num_registers;
        self.refresh();
    }

    pub fn transpose(&self, interval: Interval) -> Self {
        Self::new(self.tonic() + interval, self.mode_index())
    }

    fn shift_accidentals(&mut self, num_accidentals: i32) {
        let num_named_tones = self.tuning.num_named_tones();
        for _ in 0..num_accidentals.unsigned_abs() {
            let direction = num_accidentals.signum();
            if direction < 0 {
                self.accidentals -= 1;
            }
            let (_, gen_position) = math::div_mod(self.accidentals, num_named_tones);
            let meta_note = &mut self.meta_notes[usize::from(gen_position)];
            *meta_note = meta_note.add_accidental(direction);
            if direction > 0 {
                self.accidentals += 1;
            }
        }
    }

    fn refresh(&mut self) {
        let num_named_tones = self.meta_notes.len();
        self.notes = (0..num_named_tones)
            .map(|degree| {
                let step_index = (self.tonic_index + degree) % num_named_tones;
                let register = self.register + i32::from(step_index < self.tonic_index);
                self.meta_notes[self.tuning.gen_position(step_index)]
                    .with_register(register)
                    .with_role(Role::Degree(degree as u16 + 1))
            })
            .collect();
    }
}

impl<'t> Scale<'t> for DiatonicScale<'t> {
    fn tuning(&self) -> &'t TuningSystem {
        self.tuning
    }

    fn notes(&self) -> &[Note<'t>] {
        &self.notes
    }

    fn name(&self) -> String {
        format!(
            "{:#} {}-mode",
            self.tonic(),
            self.tuning.symbol(self.mode_index())
        )
    }
}

/// A diatonic scale with some of its degrees raised or lowered.
///
/// # Examples
///
/// ```
/// # use tune_theory::scale::{AlteredDiatonicScale, Scale};
/// # use tune_theory::temperament::TuningSystem;
/// let tuning = TuningSystem::standard();
///
/// let scale = AlteredDiatonicScale::from_name(tuning, "C Harmonic minor").unwrap();
/// assert_eq!(scale.name(), "C A-mode(#7)");
/// assert_eq!(scale.signature(), [2, 1, 2, 2, 1, 3, 1]);
///
/// let scale = AlteredDiatonicScale::from_name(tuning, "D C-mode(#5, #5)").unwrap();
/// assert_eq!(scale.name(), "D C-mode(##5)");
/// ```
#[derive(Clone, Debug)]
pub struct AlteredDiatonicScale<'t> {
    base: DiatonicScale<'t>,
    alterations: Vec<Alteration>,
    notes: Vec<Note<'t>>,
}

impl<'t> AlteredDiatonicScale<'t> {
    pub fn new(
        base: DiatonicScale<'t>,
        alterations: impl IntoIterator<Item = Alteration>,
    ) -> Result<Self, LookupError> {
        let mut scale = Self {
            notes: base.notes.clone(),
            base,
            alterations: Vec::new(),
        };
        for alteration in alterations {
            scale.add_alteration(alteration)?;
        }
        Ok(scale)
    }

    /// Parses `<tonic> <mode>[(<alterations>)]`, e.g. `D C-mode(#5)` or `E Phrygian(#3)`.
    ///
    /// Aliases whose type alters the first degree are built on a corrected tonic s.t. the resulting scale starts at the given tonic.
    pub fn from_name(tuning: &'t TuningSystem, name: &str) -> Result<Self, TheoryError> {
        let fail = |reason| ParseError::new(NameKind::Scale, name, reason);

        let token = parse::scale_name(name).map_err(fail)?;
        let tonic = Note::from_name(tuning, token.tonic)?;
        let scale_type = ScaleType::resolve(tuning, name, token.mode)?;
        let tonic_shift = scale_type.tonic_shift();

        let mut alterations = scale_type.alterations;
        alterations.extend(parse_alterations(token.alterations)?);

        let base = DiatonicScale::new(tonic.add_accidental(-tonic_shift), scale_type.mode_index);
        Ok(Self::new(base, alterations)?)
    }

    pub fn base(&self) -> &DiatonicScale<'t> {
        &self.base
    }

    pub fn alterations(&self) -> &[Alteration] {
        &self.alterations
    }

    /// Alterations accumulate, i.e. `#5` applied twice yields `##5`.
    pub fn add_alteration(&mut self, alteration: Alteration) -> Result<(), LookupError> {
        let num_degrees = self.base.tuning.num_named_tones();
        if !(1..=num_degrees).contains(&alteration.degree) {
            return Err(LookupError::DegreeOutOfRange {
                degree: u32::from(alteration.degree),
                num_degrees,
            });
        }
        self.alterations.push(alteration);
        self.refresh();
        Ok(())
    }

    /// Makes the note at the zero-based `degree` the new tonic, moving the alterations along.
    pub fn set_tonic(&mut self, degree: usize) {
        let num_degrees = self.base.notes.len();
        let degree = degree % num_degrees;
        self.base.set_tonic(degree);
        for alteration in &mut self.alterations {
            let old_index = usize::from(alteration.degree) - 1;
            alteration.degree = ((old_index + num_degrees - degree) % num_degrees + 1) as u16;
        }
        self.refresh();
    }

    pub fn add_register(&mut self, num_registers: i32) {
        self.base.add_register(num_registers);
        self.refresh();
    }

    pub fn transpose(&self, interval: Interval) -> Self {
        let mut transposed = Self {
            base: self.base.transpose(interval),
            alterations: self.alterations.clone(),
            notes: Vec::new(),
        };
        transposed.refresh();
        transposed
    }

    /// The alterations summed up per degree, in ascending degree order.
    pub fn merged_alterations(&self) -> Vec<Alteration> {
        let mut deltas = BTreeMap::new();
        for alteration in &self.alterations {
            *deltas.entry(alteration.degree).or_insert(0) += alteration.delta;
        }
        deltas
            .into_iter()
            .filter(|&(_, delta)| delta != 0)
            .map(|(degree, delta)| Alteration::new(delta, degree))
            .collect()
    }

    fn refresh(&mut self) {
        self.notes = self.base.notes.clone();
        for alteration in &self.alterations {
            let note = &mut self.notes[usize::from(alteration.degree) - 1];
            *note = note.add_accidental(alteration.delta);
        }
    }
}

impl<'t> Scale<'t> for AlteredDiatonicScale<'t> {
    fn tuning(&self) -> &'t TuningSystem {
        self.base.tuning
    }

    fn notes(&self) -> &[Note<'t>] {
        &self.notes
    }

    fn name(&self) -> String {
        format_type_name(self.base.name(), &self.merged_alterations())
    }
}

pub(crate) fn format_type_name(mode: String, alterations: &[Alteration]) -> String {
    if alterations.is_empty() {
        return mode;
    }
    let alterations = alterations
        .iter()
        .map(Alteration::to_string)
        .collect::<Vec<_>>();
    format!("{mode}({})", alterations.join(", "))
}

/// Raises (positive delta) or lowers (negative delta) the one-based scale degree.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct Alteration {
    delta: i32,
    degree: u16,
}

impl Alteration {
    pub fn new(delta: i32, degree: u16) -> Self {
        Self { delta, degree }
    }

    pub fn delta(self) -> i32 {
        self.delta
    }

    pub fn degree(self) -> u16 {
        self.degree
    }
}

impl FromStr for Alteration {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (delta, degree) = parse::alteration(s)
            .map_err(|reason| ParseError::new(NameKind::Alteration, s, reason))?;
        Ok(Alteration::new(delta, degree))
    }
}

impl Display for Alteration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut formatted = String::new();
        write_accidentals(&mut formatted, self.delta);
        formatted.push_str(&self.degree.to_string());
        f.pad(&formatted)
    }
}

fn parse_alterations(list: Option<&str>) -> Result<Vec<Alteration>, ParseError> {
    list.into_iter()
        .flat_map(parse::list_items)
        .map(str::parse)
        .collect()
}

/// The part of a scale name following the tonic, resolved to a mode and alterations.
pub(crate) struct ScaleType {
    pub mode_index: usize,
    pub alterations: Vec<Alteration>,
}

impl ScaleType {
    /// Parses a type name like `C-mode(#1, b3)`.
    pub(crate) fn from_name(tuning: &TuningSystem, type_name: &str) -> Result<Self, ParseError> {
        let fail = |reason| ParseError::new(NameKind::Scale, type_name, reason);

        let (mode, alterations) = parse::scale_type_name(type_name).map_err(fail)?;
        Ok(Self {
            mode_index: Self::mode_index(tuning, mode).map_err(fail)?,
            alterations: parse_alterations(alterations)?,
        })
    }

    /// Resolves `X-mode` or, in the standard tuning, a scale alias like `Dorian` or `Harmonic minor`.
    fn resolve(tuning: &TuningSystem, name: &str, mode: &str) -> Result<Self, ParseError> {
        let fail = |reason| ParseError::new(NameKind::Scale, name, reason);

        if parse::mode_symbol(mode).is_some() {
            return Ok(Self {
                mode_index: Self::mode_index(tuning, mode).map_err(fail)?,
                alterations: Vec::new(),
            });
        }

        let type_name = standard_alias(tuning, mode)
            .ok_or_else(|| fail(ParseFailure::UnknownMode(mode.to_owned())))?;
        Self::from_name(tuning, type_name)
    }

    fn mode_index(tuning: &TuningSystem, mode: &str) -> Result<usize, ParseFailure> {
        let symbol = parse::mode_symbol(mode)
            .ok_or_else(|| ParseFailure::UnknownMode(mode.to_owned()))?;
        tuning
            .symbol_index(symbol)
            .ok_or(ParseFailure::UnknownSymbol(symbol))
    }

    /// Total alteration of the first degree, which the tonic of a name has to compensate.
    pub(crate) fn tonic_shift(&self) -> i32 {
        self.alterations
            .iter()
            .filter(|alteration| alteration.degree == 1)
            .map(|alteration| alteration.delta)
            .sum()
    }
}

fn standard_alias(tuning: &TuningSystem, alias: &str) -> Option<&'static str> {
    if !tuning.is_standard() {
        return None;
    }
    match ScaleClassTable::standard() {
        Ok(table) => table.resolve_alias(alias),
        Err(err) => {
            log::warn!("Scale aliases are unavailable: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn note_names<'t>(scale: &impl Scale<'t>) -> Vec<String> {
        scale.notes().iter().map(|note| note.to_string()).collect()
    }

    #[test]
    fn build_major_scales() {
        let tuning = TuningSystem::standard();

        let c_major = DiatonicScale::from_name(tuning, "C C-mode").unwrap();
        assert_eq!(
            c_major
                .notes()
                .iter()
                .map(|note| note.pitch())
                .collect::<Vec<_>>(),
            [0, 2, 4, 5, 7, 9, 11]
        );

        let cases = [
            ("G C-mode", "G0 A0 B0 C1 D1 E1 F#1"),
            ("F C-mode", "F0 G0 A0 Bb0 C1 D1 E1"),
            ("C# C-mode", "C#0 D#0 E#0 F#0 G#0 A#0 B#0"),
            ("Cb C-mode", "Cb0 Db0 Eb0 Fb0 Gb0 Ab0 Bb0"),
            ("G# C-mode", "G#0 A#0 B#0 C#1 D#1 E#1 F##1"),
            ("Eb3 C-mode", "Eb3 F3 G3 Ab3 Bb3 C4 D4"),
        ];
        for (name, expected) in cases {
            let scale = DiatonicScale::from_name(tuning, name).unwrap();
            assert_eq!(note_names(&scale).join(" "), expected);
            assert_eq!(scale.mode_index(), 0);
        }
    }

    #[test]
    fn build_modes() {
        let tuning = TuningSystem::standard();
        let cases = [
            ("C D-mode", "C0 D0 Eb0 F0 G0 A0 Bb0", -2),
            ("C E-mode", "C0 Db0 Eb0 F0 G0 Ab0 Bb0", -4),
            ("C F-mode", "C0 D0 E0 F#0 G0 A0 B0", 1),
            ("C A-mode", "C0 D0 Eb0 F0 G0 Ab0 Bb0", -3),
            ("C B-mode", "C0 Db0 Eb0 F0 Gb0 Ab0 Bb0", -5),
            ("B B-mode", "B0 C1 D1 E1 F1 G1 A1", 0),
        ];
        for (name, expected, accidentals) in cases {
            let scale = DiatonicScale::from_name(tuning, name).unwrap();
            assert_eq!(note_names(&scale).join(" "), expected);
            assert_eq!(scale.accidentals(), accidentals);
            assert_eq!(scale.name(), name);
        }
    }

    #[test]
    fn church_mode_aliases() {
        let tuning = TuningSystem::standard();
        let cases = [
            ("D Dorian", "D D-mode"),
            ("E Phrygian", "E E-mode"),
            ("Bb Lydian", "Bb F-mode"),
            ("G Mixolydian", "G G-mode"),
            ("F# Aeolian", "F# A-mode"),
            ("C Locrian", "C B-mode"),
            ("A Major", "A C-mode"),
        ];
        for (alias, name) in cases {
            assert_eq!(
                DiatonicScale::from_name(tuning, alias).unwrap().name(),
                name
            );
        }
    }

    #[test]
    fn reject_malformed_scale_names() {
        let tuning = TuningSystem::standard();
        let cases = [
            ("C", ParseFailure::Syntax),
            ("C Q-mode", ParseFailure::UnknownSymbol('Q')),
            ("C Bebop", ParseFailure::UnknownMode("Bebop".to_owned())),
            ("C C-mode(#5)", ParseFailure::UnexpectedAlterations),
            ("C Harmonic minor", ParseFailure::UnexpectedAlterations),
        ];
        for (name, reason) in cases {
            assert_eq!(
                DiatonicScale::from_name(tuning, name).unwrap_err(),
                ParseError::new(NameKind::Scale, name, reason)
            );
        }
        assert_eq!(
            DiatonicScale::from_name(tuning, "H C-mode").unwrap_err().kind,
            NameKind::Note
        );
    }

    #[test]
    fn intervals_seq_spans_one_octave() {
        for (num_tones, generator, starter) in [
            (12, 7, 5),
            (19, 11, 8),
            (17, 10, 4),
            (31, 18, 13),
            (22, 13, 0),
        ] {
            let num_named_tones = math::mod_inverse(generator, num_tones).unwrap();
            let symbols = ('A'..='Z').take(usize::from(num_named_tones)).collect::<Vec<_>>();
            let tuning = TuningSystem::new(num_tones, generator, starter, symbols).unwrap();

            for mode_index in 0..usize::from(num_named_tones) {
                for accidental in -2..=2 {
                    let tonic = Note::new(&tuning, mode_index, accidental, 1);
                    let scale = DiatonicScale::new(tonic, mode_index);
                    let intervals = scale.get_intervals_seq();

                    assert_eq!(intervals.len(), usize::from(num_named_tones));
                    assert_eq!(
                        intervals.iter().copied().sum::<Interval>(),
                        Interval::new(i32::from(num_tones), i32::from(num_named_tones))
                    );
                    assert!(intervals.iter().all(|interval| interval.delta_pitch() > 0));
                    assert_eq!(scale.tonic(), tonic);
                    assert_eq!(scale.mode_index(), mode_index);
                }
            }
        }
    }

    #[test]
    fn set_tonic_keeps_pitches() {
        let tuning = TuningSystem::standard();
        let mut scale = DiatonicScale::from_name(tuning, "A C-mode").unwrap();
        let pitches = scale
            .notes()
            .iter()
            .map(|note| note.pitch())
            .collect::<Vec<_>>();

        scale.set_tonic(3);
        assert_eq!(scale.name(), "D F-mode");
        assert_eq!(note_names(&scale).join(" "), "D1 E1 F#1 G#1 A1 B1 C#2");

        let mut rotated = scale
            .notes()
            .iter()
            .map(|note| note.pitch())
            .collect::<Vec<_>>();
        rotated.rotate_right(3);
        for pitch in &mut rotated[..3] {
            *pitch -= 12;
        }
        assert_eq!(rotated, pitches);
    }

    #[test]
    fn transpose_and_register() {
        let tuning = TuningSystem::standard();
        let scale = DiatonicScale::from_name(tuning, "E D-mode").unwrap();

        let mut transposed = scale.transpose(Interval::from_name(tuning, "m3").unwrap());
        assert_eq!(transposed.name(), "G D-mode");
        assert_eq!(transposed.signature(), scale.signature());

        transposed.add_register(-1);
        assert_eq!(transposed.tonic().to_string(), "G-1");
        assert_eq!(transposed.note(6).to_string(), "F0");
    }

    #[test]
    fn degree_roles() {
        let tuning = TuningSystem::standard();
        let scale = DiatonicScale::from_name(tuning, "F C-mode").unwrap();
        let roles = scale
            .notes()
            .iter()
            .map(|note| note.role())
            .collect::<Vec<_>>();
        assert_eq!(
            roles,
            (1..=7)
                .map(|degree| Some(Role::Degree(degree)))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn alterations_by_degree() {
        let tuning = TuningSystem::standard();

        let scale = AlteredDiatonicScale::from_name(tuning, "C A-mode(#7)").unwrap();
        assert_eq!(note_names(&scale).join(" "), "C0 D0 Eb0 F0 G0 Ab0 B0");

        let scale = AlteredDiatonicScale::from_name(tuning, "C Dorian(#7)").unwrap();
        assert_eq!(note_names(&scale).join(" "), "C0 D0 Eb0 F0 G0 A0 B0");
        assert_eq!(scale.name(), "C D-mode(#7)");

        let scale = AlteredDiatonicScale::from_name(tuning, "E Phrygian(#3)").unwrap();
        assert_eq!(scale.signature(), [1, 3, 1, 2, 1, 2, 2]);

        let scale = AlteredDiatonicScale::from_name(tuning, "D C-mode(b3, #4, b3)").unwrap();
        assert_eq!(scale.name(), "D C-mode(bb3, #4)");
        assert_eq!(note_names(&scale).join(" "), "D0 E0 Fb0 G#0 A0 B0 C#1");
    }

    #[test]
    fn altered_scale_errors() {
        let tuning = TuningSystem::standard();

        assert_eq!(
            AlteredDiatonicScale::from_name(tuning, "C C-mode(#8)").unwrap_err(),
            TheoryError::Lookup(LookupError::DegreeOutOfRange {
                degree: 8,
                num_degrees: 7
            })
        );
        assert_eq!(
            AlteredDiatonicScale::from_name(tuning, "C C-mode(x5)").unwrap_err(),
            TheoryError::Parse(ParseError::new(
                NameKind::Alteration,
                "x5",
                ParseFailure::Syntax
            ))
        );
    }

    #[test]
    fn move_alterations_with_the_tonic() {
        let tuning = TuningSystem::standard();
        let mut scale = AlteredDiatonicScale::from_name(tuning, "A A-mode(#7)").unwrap();
        let pitches = scale.signature();

        scale.set_tonic(6);
        assert_eq!(scale.name(), "G G-mode(#1)");
        assert_eq!(scale.tonic().to_string(), "G#1");

        let mut rotated = scale.signature();
        rotated.rotate_right(6);
        assert_eq!(rotated, pitches);
    }

    #[test]
    fn transpose_altered_scale() {
        let tuning = TuningSystem::standard();
        let scale = AlteredDiatonicScale::from_name(tuning, "C Harmonic minor").unwrap();
        let transposed = scale.transpose(Interval::from_name(tuning, "P5").unwrap());

        assert_eq!(transposed.name(), "G A-mode(#7)");
        assert_eq!(note_names(&transposed).join(" "), "G0 A0 Bb0 C1 D1 Eb1 F#1");
    }
}
