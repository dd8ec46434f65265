//! Intervals between notes and their conventional names.

use std::{
    fmt::{self, Display, Formatter},
    iter::Sum,
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use crate::{
    error::{LookupError, NameKind, ParseError, ParseFailure},
    math,
    note::write_accidentals,
    parse,
    temperament::{NamingScheme, TuningSystem},
};

/// Number of named tones a tuning needs for tone labels and chords.
pub(crate) const NUM_HEPTATONIC_TONES: u16 = 7;

/// A pair of a pitch delta (in tones) and a step delta (in named tones).
///
/// Intervals do not refer to a tuning. A tuning is only needed to name them or to convert them into cents.
///
/// # Examples
///
/// ```
/// # use tune_theory::interval::Interval;
/// # use tune_theory::temperament::TuningSystem;
/// let tuning = TuningSystem::standard();
///
/// let fifth = Interval::from_name(tuning, "P5").unwrap();
/// assert_eq!(fifth, Interval::new(7, 4));
/// assert_eq!(fifth.named(tuning).to_string(), "P5");
/// assert_eq!((-fifth).named(tuning).to_string(), "-P5");
/// assert_eq!((fifth * 2).named(tuning).to_string(), "M9");
/// assert_eq!((fifth * 2).normalize(tuning).named(tuning).to_string(), "M2");
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Interval {
    delta_pitch: i32,
    delta_step: i32,
}

impl Interval {
    pub const UNISON: Interval = Interval::new(0, 0);

    pub const fn new(delta_pitch: i32, delta_step: i32) -> Self {
        Self {
            delta_pitch,
            delta_step,
        }
    }

    /// Parses `[-]<quality><degree>`.
    ///
    /// The quality is `P`, `M`, `m` or a run of `A`s or `d`s, e.g. `AA4` or `dd7`.
    /// Perfect qualities only apply to perfect step classes and vice versa.
    ///
    /// ```
    /// # use tune_theory::error::{NameKind, ParseFailure};
    /// # use tune_theory::interval::Interval;
    /// # use tune_theory::temperament::TuningSystem;
    /// let tuning = TuningSystem::standard();
    /// assert_eq!(Interval::from_name(tuning, "m3").unwrap(), Interval::new(3, 2));
    /// assert_eq!(Interval::from_name(tuning, "dd7").unwrap(), Interval::new(8, 6));
    /// assert_eq!(Interval::from_name(tuning, "-P8").unwrap(), Interval::new(-12, -7));
    ///
    /// let err = Interval::from_name(tuning, "M5").unwrap_err();
    /// assert_eq!(err.kind, NameKind::Interval);
    /// assert_eq!(
    ///     err.reason,
    ///     ParseFailure::QualityMismatch { quality: "M".to_owned(), degree: 5 }
    /// );
    /// ```
    pub fn from_name(tuning: &TuningSystem, name: &str) -> Result<Self, ParseError> {
        let fail = |reason| ParseError::new(NameKind::Interval, name, reason);

        let token = parse::interval_name(name).map_err(fail)?;
        let delta_step = i32::from(token.degree) - 1;
        let (num_octaves, step_class) = math::div_mod(delta_step, tuning.num_named_tones());
        let step_class = usize::from(step_class);

        let run_length = token.quality_len as i32;
        let quality_offset = match (tuning.naming_scheme(step_class), token.quality) {
            (_, 'A') => run_length,
            (NamingScheme::Perfect, 'P') => 0,
            (NamingScheme::Perfect, 'd') => -run_length,
            (NamingScheme::MajorMinor, 'M') => 0,
            (NamingScheme::MajorMinor, 'm') => -1,
            (NamingScheme::MajorMinor, 'd') => -1 - run_length,
            (_, quality) => {
                return Err(fail(ParseFailure::QualityMismatch {
                    quality: quality.to_string().repeat(token.quality_len),
                    degree: u32::from(token.degree),
                }))
            }
        };

        let ascending = Interval::new(
            num_octaves * i32::from(tuning.num_tones())
                + tuning.reference_pitch(step_class)
                + quality_offset,
            delta_step,
        );

        Ok(if token.descending {
            -ascending
        } else {
            ascending
        })
    }

    pub fn delta_pitch(self) -> i32 {
        self.delta_pitch
    }

    pub fn delta_step(self) -> i32 {
        self.delta_step
    }

    /// An interval is descending if it goes down by named steps, or stays on the same named step and goes down in pitch.
    pub fn is_descending(self) -> bool {
        self.delta_step < 0 || (self.delta_step == 0 && self.delta_pitch < 0)
    }

    /// Reduces the step delta into `0..M` by removing whole octaves.
    pub fn normalize(self, tuning: &TuningSystem) -> Self {
        let (num_octaves, step_class) = math::div_mod(self.delta_step, tuning.num_named_tones());
        Interval::new(
            self.delta_pitch - num_octaves * i32::from(tuning.num_tones()),
            i32::from(step_class),
        )
    }

    pub fn as_cents(self, tuning: &TuningSystem) -> f64 {
        f64::from(self.delta_pitch) * 1200.0 / f64::from(tuning.num_tones())
    }

    /// Returns a [`Display`] wrapper naming `self` in `tuning`.
    pub fn named(self, tuning: &TuningSystem) -> NamedInterval<'_> {
        NamedInterval {
            interval: self,
            tuning,
        }
    }

    /// Returns the R357T label of `self` after octave reduction.
    ///
    /// ```
    /// # use tune_theory::interval::Interval;
    /// # use tune_theory::temperament::TuningSystem;
    /// let tuning = TuningSystem::standard();
    /// let label = |name| Interval::from_name(tuning, name).unwrap().tone_label(tuning).unwrap().to_string();
    ///
    /// assert_eq!(label("P1"), "R");
    /// assert_eq!(label("m2"), "b9");
    /// assert_eq!(label("m10"), "b3");
    /// assert_eq!(label("A4"), "#11");
    /// assert_eq!(label("d7"), "bb7");
    /// assert!(Interval::from_name(tuning, "A3").unwrap().tone_label(tuning).is_err());
    /// ```
    pub fn tone_label(self, tuning: &TuningSystem) -> Result<ToneLabel, LookupError> {
        check_heptatonic(tuning)?;
        let normalized = self.normalize(tuning);
        let step_class = normalized.delta_step as usize;
        ToneLabel::from_offset(
            step_class,
            normalized.delta_pitch - tuning.reference_pitch(step_class),
        )
        .ok_or(LookupError::UnsupportedTone {
            delta_pitch: self.delta_pitch,
            delta_step: self.delta_step,
        })
    }
}

pub(crate) fn check_heptatonic(tuning: &TuningSystem) -> Result<(), LookupError> {
    if tuning.num_named_tones() == NUM_HEPTATONIC_TONES {
        Ok(())
    } else {
        Err(LookupError::NotHeptatonic {
            num_named_tones: tuning.num_named_tones(),
        })
    }
}

/// [`Interval`]s can be parsed in the standard `[12, 7, 5]` tuning.
impl FromStr for Interval {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::from_name(TuningSystem::standard(), s)
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Self) -> Self::Output {
        Interval::new(
            self.delta_pitch + rhs.delta_pitch,
            self.delta_step + rhs.delta_step,
        )
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

impl Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Self::Output {
        Interval::new(-self.delta_pitch, -self.delta_step)
    }
}

impl Mul<i32> for Interval {
    type Output = Interval;

    fn mul(self, rhs: i32) -> Self::Output {
        Interval::new(self.delta_pitch * rhs, self.delta_step * rhs)
    }
}

impl Sum for Interval {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Interval::UNISON, Add::add)
    }
}

/// Names an [`Interval`] within a given tuning.
///
/// Descending intervals are written as `-` followed by the name of their inversion, e.g. `-m3`.
/// A diminished unison is descending and will therefore be displayed as `-A1`.
pub struct NamedInterval<'a> {
    interval: Interval,
    tuning: &'a TuningSystem,
}

impl Display for NamedInterval<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (sign, interval) = if self.interval.is_descending() {
            ("-", -self.interval)
        } else {
            ("", self.interval)
        };

        let (num_octaves, step_class) =
            math::div_mod(interval.delta_step, self.tuning.num_named_tones());
        let step_class = usize::from(step_class);
        let offset = interval.delta_pitch
            - num_octaves * i32::from(self.tuning.num_tones())
            - self.tuning.reference_pitch(step_class);

        let quality = match (self.tuning.naming_scheme(step_class), offset) {
            (NamingScheme::Perfect, 0) => "P".to_owned(),
            (NamingScheme::MajorMinor, 0) => "M".to_owned(),
            (NamingScheme::MajorMinor, -1) => "m".to_owned(),
            (_, 1..) => "A".repeat(offset as usize),
            (NamingScheme::Perfect, _) => "d".repeat(offset.unsigned_abs() as usize),
            (NamingScheme::MajorMinor, _) => "d".repeat((offset.unsigned_abs() - 1) as usize),
        };

        let formatted = format!("{sign}{quality}{}", interval.delta_step + 1);
        f.pad(&formatted)
    }
}

/// Scale degrees used as compound chord-tone numbers, indexed by step class.
const LABEL_DEGREES: [u8; 7] = [1, 9, 3, 11, 5, 13, 7];

/// Supported `(step class, offset)` pairs, the offset being measured from the perfect or major interval.
const LABEL_OFFSETS: [(usize, i32); 16] = [
    (0, 0),
    (1, -1),
    (1, 0),
    (1, 1),
    (2, -1),
    (2, 0),
    (3, 0),
    (3, 1),
    (4, -1),
    (4, 0),
    (4, 1),
    (5, -1),
    (5, 0),
    (6, -2),
    (6, -1),
    (6, 0),
];

/// A chord-tone label in R357T notation: `R`, `b9`, `9`, `#9`, `b3`, `3`, `11`, `#11`, `b5`, `5`, `#5`, `b13`, `13`, `bb7`, `b7` or `7`.
///
/// Labels only exist for heptatonic tunings.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct ToneLabel {
    accidental: i8,
    degree: u8,
}

impl ToneLabel {
    pub const ROOT: ToneLabel = ToneLabel {
        accidental: 0,
        degree: 1,
    };

    fn from_offset(step_class: usize, offset: i32) -> Option<Self> {
        LABEL_OFFSETS
            .contains(&(step_class, offset))
            .then(|| ToneLabel {
                accidental: offset as i8,
                degree: LABEL_DEGREES[step_class],
            })
    }

    pub fn accidental(self) -> i32 {
        i32::from(self.accidental)
    }

    pub fn degree(self) -> u16 {
        u16::from(self.degree)
    }

    /// Step class of the labeled tone, e.g. 1 for `9` and 2 for `3`.
    pub fn step_class(self) -> usize {
        LABEL_DEGREES
            .iter()
            .position(|&degree| degree == self.degree)
            .unwrap_or_default()
    }

    /// The compound interval above the root, e.g. `M9` for `9` and `m3` for `b3`.
    pub fn interval(self, tuning: &TuningSystem) -> Result<Interval, LookupError> {
        check_heptatonic(tuning)?;
        let delta_step = i32::from(self.degree) - 1;
        let (num_octaves, step_class) = math::div_mod(delta_step, tuning.num_named_tones());
        Ok(Interval::new(
            num_octaves * i32::from(tuning.num_tones())
                + tuning.reference_pitch(usize::from(step_class))
                + self.accidental(),
            delta_step,
        ))
    }
}

impl FromStr for ToneLabel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason| ParseError::new(NameKind::Tension, s, reason);

        let (accidental, degree) = parse::tension(s).map_err(fail)?;
        let step_class = LABEL_DEGREES
            .iter()
            .position(|&candidate| u16::from(candidate) == degree)
            .ok_or_else(|| fail(ParseFailure::OutOfRange))?;

        ToneLabel::from_offset(step_class, accidental).ok_or_else(|| fail(ParseFailure::OutOfRange))
    }
}

impl Display for ToneLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if *self == ToneLabel::ROOT {
            return f.pad("R");
        }
        let mut formatted = String::new();
        write_accidentals(&mut formatted, self.accidental());
        formatted.push_str(&self.degree.to_string());
        f.pad(&formatted)
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn name_all_intervals_within_two_octaves() {
        let tuning = TuningSystem::standard();
        let names = (0..7)
            .map(|delta_step| {
                (-2..=2)
                    .map(|offset| {
                        let delta_pitch = tuning.reference_pitch(delta_step) + offset;
                        Interval::new(delta_pitch, delta_step as i32)
                            .named(tuning)
                            .to_string()
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>();

        assert_eq!(
            names,
            [
                "-AA1 -A1 P1 A1 AA1",
                "d2 m2 M2 A2 AA2",
                "d3 m3 M3 A3 AA3",
                "dd4 d4 P4 A4 AA4",
                "dd5 d5 P5 A5 AA5",
                "d6 m6 M6 A6 AA6",
                "d7 m7 M7 A7 AA7",
            ]
        );
    }

    #[test]
    fn parse_and_format_are_consistent() {
        let tuning = TuningSystem::standard();
        for name in [
            "P1", "A1", "m2", "M2", "AA2", "d3", "m3", "M3", "A3", "dd4", "d4", "P4", "A4",
            "ddd5", "d5", "P5", "A5", "m6", "M6", "d7", "m7", "M7", "P8", "m9", "M9", "A11",
            "M13", "P15", "-m2", "-P5", "-M7", "-P8", "-A4", "-m10",
        ] {
            let interval = Interval::from_name(tuning, name).unwrap();
            assert_eq!(interval.named(tuning).to_string(), name);
        }
    }

    #[test]
    fn diminished_unison_is_descending() {
        let tuning = TuningSystem::standard();
        let interval = Interval::from_name(tuning, "d1").unwrap();

        assert_eq!(interval, Interval::new(-1, 0));
        assert!(interval.is_descending());
        assert_eq!(interval.named(tuning).to_string(), "-A1");
    }

    #[test]
    fn reject_malformed_interval_names() {
        let tuning = TuningSystem::standard();
        let cases = [
            ("", ParseFailure::Syntax),
            ("P", ParseFailure::Syntax),
            ("Ad4", ParseFailure::Syntax),
            ("PP5", ParseFailure::Syntax),
            ("mm3", ParseFailure::Syntax),
            ("X3", ParseFailure::Syntax),
            ("P0", ParseFailure::OutOfRange),
            (
                "m4",
                ParseFailure::QualityMismatch {
                    quality: "m".to_owned(),
                    degree: 4,
                },
            ),
            (
                "P3",
                ParseFailure::QualityMismatch {
                    quality: "P".to_owned(),
                    degree: 3,
                },
            ),
        ];

        for (name, reason) in cases {
            assert_eq!(
                Interval::from_name(tuning, name),
                Err(ParseError::new(NameKind::Interval, name, reason))
            );
        }
    }

    #[test]
    fn naming_in_19_edo() {
        let tuning =
            TuningSystem::new(19, 11, 8, ['C', 'D', 'E', 'F', 'G', 'A', 'B']).unwrap();

        let major_third = Interval::new(6, 2);
        assert_eq!(major_third.named(&tuning).to_string(), "M3");
        assert_eq!(Interval::new(5, 2).named(&tuning).to_string(), "m3");
        assert_eq!(Interval::new(11, 4).named(&tuning).to_string(), "M5");
        assert_eq!(
            Interval::from_name(&tuning, "m5").unwrap(),
            Interval::new(10, 4)
        );
        assert!(Interval::from_name(&tuning, "P5").is_err());
        assert_eq!(
            Interval::from_name(&tuning, "P8").unwrap(),
            Interval::new(19, 7)
        );

        assert_approx_eq!(major_third.as_cents(&tuning), 378.947368);
    }

    #[test]
    fn interval_arithmetic() {
        let m3 = "m3".parse::<Interval>().unwrap();
        let maj3 = "M3".parse::<Interval>().unwrap();

        assert_eq!(m3 + maj3, "P5".parse().unwrap());
        assert_eq!(maj3 - m3, "A1".parse().unwrap());
        assert_eq!(maj3 * 3, "A7".parse().unwrap());
        assert_eq!(
            [m3, maj3, m3].into_iter().sum::<Interval>(),
            "m7".parse().unwrap()
        );
        assert_approx_eq!(m3.as_cents(TuningSystem::standard()), 300.0);

        for name in ["P1", "m2", "A4", "d5", "M9", "-P5", "dd7"] {
            let interval = name.parse::<Interval>().unwrap();
            assert_eq!(interval + Interval::UNISON, interval);
            assert_eq!(interval + -interval, Interval::UNISON);
            assert_eq!(interval - interval, "P1".parse().unwrap());
        }
    }

    #[test]
    fn tone_labels() {
        let tuning = TuningSystem::standard();
        let labels = [
            "R", "b9", "9", "#9", "b3", "3", "11", "#11", "b5", "5", "#5", "b13", "13", "bb7",
            "b7", "7",
        ];

        for name in labels {
            let label = name.parse::<ToneLabel>().unwrap();
            assert_eq!(label.to_string(), name);

            let interval = label.interval(tuning).unwrap();
            assert_eq!(interval.tone_label(tuning), Ok(label));
        }

        assert_eq!(
            "9".parse::<ToneLabel>().unwrap().interval(tuning),
            Ok(Interval::new(14, 8))
        );
        assert_eq!(
            "b13".parse::<ToneLabel>().unwrap().interval(tuning),
            Ok(Interval::new(20, 12))
        );
    }

    #[test]
    fn reject_unsupported_tone_labels() {
        for name in ["#3", "b11", "bb5", "2", "#1", "x9", ""] {
            let err = name.parse::<ToneLabel>().unwrap_err();
            assert_eq!(err.kind, NameKind::Tension);
        }

        let tuning = TuningSystem::standard();
        assert_eq!(
            Interval::new(5, 2).tone_label(tuning),
            Err(LookupError::UnsupportedTone {
                delta_pitch: 5,
                delta_step: 2
            })
        );

        let pentatonic = TuningSystem::new(5, 3, 0, ['C', 'D']).unwrap();
        assert_eq!(
            Interval::UNISON.tone_label(&pentatonic),
            Err(LookupError::NotHeptatonic { num_named_tones: 2 })
        );
    }
}
