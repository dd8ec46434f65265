//! Classification of scales into rotation classes of interval signatures.
//!
//! Two scales belong to the same class iff their interval signatures are rotations of each other.
//! Every class is named by the diatonic modes it can be derived from using as few alterations as possible.
//! The number of accidentals needed is the order of the class, the diatonic class itself having order 0.

use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
};

use serde::Deserialize;

use crate::{
    error::{ClassificationError, TableError, TableErrorKind},
    scale::{format_type_name, Alteration, Scale, ScaleType},
    temperament::TuningSystem,
};

static STANDARD_TABLE: LazyLock<Result<ScaleClassTable, TableError>> = LazyLock::new(|| {
    ScaleClassTable::load(
        TuningSystem::standard(),
        include_str!("../data/scale-classes-12-7-5.txt"),
    )
});

/// One line of a class table file: `[order, signature, names per rotation, [[rotation, alias], ...]]`.
#[derive(Deserialize)]
struct ClassRecord(u32, Vec<i32>, Vec<Vec<String>>, Vec<(usize, String)>);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScaleClass {
    order: u32,
    signature: Vec<i32>,
    modes: Vec<Vec<String>>,
    aliases: Vec<(usize, String)>,
}

impl ScaleClass {
    /// Minimum number of accidentals needed to derive the class from a diatonic scale.
    pub fn order(&self) -> u32 {
        self.order
    }

    /// The canonical signature, i.e. the one of rotation 0.
    pub fn signature(&self) -> &[i32] {
        &self.signature
    }

    pub fn rotated_signature(&self, rotation: usize) -> Vec<i32> {
        let mut signature = self.signature.clone();
        let len = signature.len();
        signature.rotate_left(rotation % len);
        signature
    }

    /// Scale type names of the given rotation, e.g. `A-mode(#7)`, fewest alterations first.
    pub fn names(&self, rotation: usize) -> &[String] {
        &self.modes[rotation % self.modes.len()]
    }

    /// Historical names like `Dorian` or `Harmonic minor`, together with the rotation they name.
    pub fn aliases(&self) -> &[(usize, String)] {
        &self.aliases
    }
}

/// The result of a classification: signature = canonical signature of the class, rotated left by `rotation`.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct Classification {
    pub class_index: usize,
    pub rotation: usize,
}

/// All scale classes of a tuning, ordered by their best name (order first).
#[derive(Clone, Debug)]
pub struct ScaleClassTable {
    tuning: TuningSystem,
    classes: Vec<ScaleClass>,
    index: HashMap<Vec<i32>, usize>,
}

impl ScaleClassTable {
    /// The table of the standard `[12, 7, 5]` tuning with two accidentals per degree at most, loaded once.
    ///
    /// ```
    /// # use tune_theory::classify::ScaleClassTable;
    /// let table = ScaleClassTable::standard().unwrap();
    /// assert_eq!(table.len(), 66);
    /// assert_eq!(table.classes()[0].signature(), [2, 2, 1, 2, 2, 2, 1]);
    /// assert_eq!(table.classes()[0].names(5), ["A-mode"]);
    /// ```
    pub fn standard() -> Result<&'static ScaleClassTable, TableError> {
        STANDARD_TABLE.as_ref().map_err(Clone::clone)
    }

    /// Parses a line-based class table. Blank lines are skipped.
    pub fn load(tuning: &TuningSystem, text: &str) -> Result<Self, TableError> {
        let num_named_tones = usize::from(tuning.num_named_tones());
        let mut classes = Vec::new();

        for (line_index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fail = |reason| TableError {
                line_number: line_index + 1,
                reason,
            };

            let ClassRecord(order, signature, modes, aliases) = serde_yaml::from_str(line)
                .map_err(|err| fail(TableErrorKind::Syntax(err.to_string())))?;

            if signature.len() != num_named_tones {
                return Err(fail(TableErrorKind::SignatureLength {
                    expected: num_named_tones,
                    actual: signature.len(),
                }));
            }
            if signature.iter().any(|&step| step <= 0)
                || signature.iter().sum::<i32>() != i32::from(tuning.num_tones())
            {
                return Err(fail(TableErrorKind::SignatureSum {
                    expected: tuning.num_tones(),
                }));
            }
            if modes.len() != num_named_tones {
                return Err(fail(TableErrorKind::RotationCount {
                    expected: num_named_tones,
                    actual: modes.len(),
                }));
            }
            for type_name in modes.iter().flatten() {
                ScaleType::from_name(tuning, type_name)
                    .map_err(|err| fail(TableErrorKind::Syntax(err.to_string())))?;
            }
            if let Some(&(rotation, _)) = aliases
                .iter()
                .find(|(rotation, _)| *rotation >= num_named_tones)
            {
                return Err(fail(TableErrorKind::AliasRotation(rotation)));
            }

            classes.push(ScaleClass {
                order,
                signature,
                modes,
                aliases,
            });
        }

        log::debug!(
            "Loaded {} scale classes for [{}, {}, {}]",
            classes.len(),
            tuning.num_tones(),
            tuning.generator(),
            tuning.starter()
        );

        Ok(Self::from_classes(tuning.clone(), classes))
    }

    /// Searches all signatures of `M` positive steps summing up to `N` and names them after the diatonic modes.
    ///
    /// A name is admissible if no degree needs more than `max_accidentals` accidentals.
    /// Classes without any admissible name are left out.
    /// The generated table has no aliases.
    pub fn generate(tuning: &TuningSystem, max_accidentals: u16) -> Self {
        let num_named_tones = usize::from(tuning.num_named_tones());
        let mut seen = HashSet::new();
        let mut ranked_classes = Vec::new();
        let mut num_unnamed = 0;

        for signature in compositions(i32::from(tuning.num_tones()), num_named_tones) {
            if seen.contains(&signature) {
                continue;
            }

            let rotations = (0..num_named_tones)
                .map(|rotation| {
                    let mut rotated = signature.clone();
                    rotated.rotate_left(rotation);
                    rotated
                })
                .collect::<Vec<_>>();
            seen.extend(rotations.iter().cloned());

            let candidates = rotations
                .iter()
                .map(|rotation| name_candidates(tuning, rotation, max_accidentals))
                .collect::<Vec<_>>();

            let Some((canonical, best_key)) = candidates
                .iter()
                .enumerate()
                .filter_map(|(rotation, names)| names.first().map(|(key, _)| (rotation, key)))
                .min_by(|a, b| a.1.cmp(b.1))
            else {
                num_unnamed += 1;
                continue;
            };

            let modes: Vec<Vec<String>> = (0..num_named_tones)
                .map(|rotation| {
                    let names = &candidates[(canonical + rotation) % num_named_tones];
                    let min_accidentals = names.first().map(|(key, _)| key.accidentals);
                    names
                        .iter()
                        .filter(|(key, _)| Some(key.accidentals) == min_accidentals)
                        .map(|(_, name)| name.clone())
                        .collect::<Vec<_>>()
                })
                .collect();

            ranked_classes.push((
                best_key.clone(),
                ScaleClass {
                    order: best_key.accidentals,
                    signature: rotations[canonical].clone(),
                    modes,
                    aliases: Vec::new(),
                },
            ));
        }

        if num_unnamed > 0 {
            log::warn!(
                "{num_unnamed} scale classes need more than {max_accidentals} accidentals per degree and remain unnamed"
            );
        }

        ranked_classes.sort_by(|a, b| a.0.cmp(&b.0));
        log::debug!(
            "Generated {} scale classes for [{}, {}, {}]",
            ranked_classes.len(),
            tuning.num_tones(),
            tuning.generator(),
            tuning.starter()
        );

        let classes = ranked_classes.into_iter().map(|(_, class)| class);
        Self::from_classes(tuning.clone(), classes.collect())
    }

    fn from_classes(tuning: TuningSystem, classes: Vec<ScaleClass>) -> Self {
        let index = classes
            .iter()
            .enumerate()
            .map(|(class_index, class)| (class.signature.clone(), class_index))
            .collect();
        Self {
            tuning,
            classes,
            index,
        }
    }

    pub fn tuning(&self) -> &TuningSystem {
        &self.tuning
    }

    pub fn classes(&self) -> &[ScaleClass] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, class_index: usize) -> Option<&ScaleClass> {
        self.classes.get(class_index)
    }

    /// Finds the class whose canonical signature is a rotation of `signature`.
    ///
    /// ```
    /// # use tune_theory::classify::{Classification, ScaleClassTable};
    /// # use tune_theory::error::ClassificationError;
    /// let table = ScaleClassTable::standard().unwrap();
    ///
    /// // Dorian
    /// assert_eq!(
    ///     table.classify(&[2, 1, 2, 2, 2, 1, 2]),
    ///     Ok(Classification { class_index: 0, rotation: 1 })
    /// );
    /// assert_eq!(
    ///     table.classify(&[2, 2, 2, 2, 2, 2]),
    ///     Err(ClassificationError::WrongLength { expected: 7, actual: 6 })
    /// );
    /// ```
    pub fn classify(&self, signature: &[i32]) -> Result<Classification, ClassificationError> {
        let num_named_tones = usize::from(self.tuning.num_named_tones());
        if signature.len() != num_named_tones {
            return Err(ClassificationError::WrongLength {
                expected: num_named_tones,
                actual: signature.len(),
            });
        }

        let mut rotated = signature.to_vec();
        for shift in 0..num_named_tones {
            if let Some(&class_index) = self.index.get(&rotated) {
                let rotation = (num_named_tones - shift) % num_named_tones;
                log::trace!("{signature:?} is rotation {rotation} of class {class_index}");
                return Ok(Classification {
                    class_index,
                    rotation,
                });
            }
            rotated.rotate_left(1);
        }

        Err(ClassificationError::NoMatch(signature.to_vec()))
    }

    pub fn classify_scale<'t>(
        &self,
        scale: &impl Scale<'t>,
    ) -> Result<Classification, ClassificationError> {
        if scale.tuning() != &self.tuning {
            return Err(ClassificationError::TuningMismatch);
        }
        self.classify(&scale.signature())
    }

    /// Names `scale` after the diatonic modes it can be derived from with the fewest accidentals.
    ///
    /// Names altering the first degree start with a corrected tonic s.t. the named scale has the same tonic as `scale`.
    ///
    /// ```
    /// # use tune_theory::classify::ScaleClassTable;
    /// # use tune_theory::scale::AlteredDiatonicScale;
    /// # use tune_theory::temperament::TuningSystem;
    /// let table = ScaleClassTable::standard().unwrap();
    /// let scale = AlteredDiatonicScale::from_name(TuningSystem::standard(), "E C-mode(b3)").unwrap();
    /// assert_eq!(
    ///     table.scale_names(&scale, 5).unwrap(),
    ///     ["E C-mode(b3)", "E D-mode(#7)"]
    /// );
    /// ```
    pub fn scale_names<'t>(
        &self,
        scale: &impl Scale<'t>,
        max_names: usize,
    ) -> Result<Vec<String>, ClassificationError> {
        let classification = self.classify_scale(scale)?;
        let class = &self.classes[classification.class_index];

        Ok(class
            .names(classification.rotation)
            .iter()
            .take(max_names)
            .map(|type_name| {
                let tonic_shift = ScaleType::from_name(&self.tuning, type_name)
                    .map(|scale_type| scale_type.tonic_shift())
                    .unwrap_or_default();
                format!("{:#} {type_name}", scale.tonic().add_accidental(-tonic_shift))
            })
            .collect())
    }

    /// Historical names of the classified rotation.
    pub fn aliases(&self, classification: Classification) -> Vec<&str> {
        self.get(classification.class_index)
            .map(|class| {
                class
                    .aliases
                    .iter()
                    .filter(|(rotation, _)| *rotation == classification.rotation)
                    .map(|(_, alias)| alias.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the preferred type name of the rotation called `alias`, e.g. `A-mode(#7)` for `Harmonic minor`.
    ///
    /// Aliases are matched case-insensitively.
    pub fn resolve_alias(&self, alias: &str) -> Option<&str> {
        self.classes.iter().find_map(|class| {
            class
                .aliases
                .iter()
                .find(|(_, candidate)| candidate.eq_ignore_ascii_case(alias))
                .and_then(|&(rotation, _)| class.names(rotation).first())
                .map(String::as_str)
        })
    }
}

/// Ranks the names of a rotation. Smaller is better.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
struct NameKey {
    accidentals: u32,
    num_altered_degrees: usize,
    tonic_shift: u32,
    mode_index: usize,
    deltas: Vec<i32>,
}

/// All admissible names of `signature`, best first.
fn name_candidates(
    tuning: &TuningSystem,
    signature: &[i32],
    max_accidentals: u16,
) -> Vec<(NameKey, String)> {
    let num_tones = i32::from(tuning.num_tones());
    let num_named_tones = signature.len();
    let max_accidentals = i32::from(max_accidentals);

    let pitches = signature
        .iter()
        .scan(0, |pitch, &step| {
            let current = *pitch;
            *pitch += step;
            Some(current)
        })
        .collect::<Vec<_>>();

    let mut candidates = Vec::new();
    for mode_index in 0..num_named_tones {
        let mode_pitches = (0..num_named_tones)
            .map(|degree| {
                let step_index = mode_index + degree;
                tuning.reference_pitch(step_index % num_named_tones)
                    - tuning.reference_pitch(mode_index)
                    + num_tones * (step_index / num_named_tones) as i32
            })
            .collect::<Vec<_>>();

        for tonic_shift in -max_accidentals..=max_accidentals {
            let deltas = pitches
                .iter()
                .zip(&mode_pitches)
                .map(|(pitch, mode_pitch)| pitch + tonic_shift - mode_pitch)
                .collect::<Vec<_>>();
            if deltas.iter().any(|delta| delta.abs() > max_accidentals) {
                continue;
            }

            let alterations = deltas
                .iter()
                .enumerate()
                .filter(|&(_, &delta)| delta != 0)
                .map(|(degree, &delta)| Alteration::new(delta, degree as u16 + 1))
                .collect::<Vec<_>>();
            let name = format_type_name(
                format!("{}-mode", tuning.symbol(mode_index)),
                &alterations,
            );

            candidates.push((
                NameKey {
                    accidentals: deltas.iter().map(|delta| delta.unsigned_abs()).sum(),
                    num_altered_degrees: alterations.len(),
                    tonic_shift: tonic_shift.unsigned_abs(),
                    mode_index,
                    deltas,
                },
                name,
            ));
        }
    }

    candidates.sort();
    candidates
}

/// All sequences of `num_parts` positive integers summing up to `total`, in lexicographic order.
fn compositions(total: i32, num_parts: usize) -> Vec<Vec<i32>> {
    if num_parts == 0 {
        return if total == 0 { vec![Vec::new()] } else { Vec::new() };
    }

    let mut result = Vec::new();
    for first in 1..=total - (num_parts as i32 - 1) {
        for rest in compositions(total - first, num_parts - 1) {
            let mut composition = Vec::with_capacity(num_parts);
            composition.push(first);
            composition.extend(rest);
            result.push(composition);
        }
    }
    result
}
