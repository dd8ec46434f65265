//! Errors reported by the theory engine.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// Umbrella error for operations that touch more than one layer, e.g. building a chord from its name.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TheoryError {
    #[error(transparent)]
    Tuning(#[from] TuningError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Classification(#[from] ClassificationError),
    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TuningError {
    #[error("a tuning needs at least two tones per octave but {num_tones} were given")]
    TooFewTones { num_tones: u16 },
    #[error("generator {generator} is not coprime to {num_tones} (gcd is {gcd})")]
    GeneratorNotCoprime {
        num_tones: u16,
        generator: u16,
        gcd: u16,
    },
    #[error("expected {expected} note symbols but {actual} were given")]
    SymbolCountMismatch { expected: usize, actual: usize },
    #[error("note symbol '{0}' must be an uppercase letter")]
    InvalidSymbol(char),
    #[error("note symbol '{0}' is used more than once")]
    DuplicateSymbol(char),
}

/// A name string could not be parsed.
///
/// The [`Display`] output contains the original input and the pattern that was expected.
///
/// ```
/// # use tune_theory::note::Note;
/// let err = "H#3".parse::<Note>().unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "invalid note name 'H#3' (unknown note symbol 'H'), expected <letter>[#...|b...][register], e.g. C#3"
/// );
/// ```
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("invalid {kind} '{input}' ({reason}), expected {}", .kind.pattern())]
pub struct ParseError {
    pub kind: NameKind,
    pub input: String,
    pub reason: ParseFailure,
}

impl ParseError {
    pub fn new(kind: NameKind, input: impl Into<String>, reason: ParseFailure) -> Self {
        Self {
            kind,
            input: input.into(),
            reason,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NameKind {
    Note,
    Interval,
    Scale,
    Alteration,
    Chord,
    Tension,
}

impl NameKind {
    pub fn pattern(self) -> &'static str {
        match self {
            NameKind::Note => "<letter>[#...|b...][register], e.g. C#3",
            NameKind::Interval => "[-]<d|m|P|M|A...><degree>, e.g. m3 or -P8",
            NameKind::Scale => "<tonic> <mode>[(<alterations>)], e.g. D C-mode(#5)",
            NameKind::Alteration => "<#...|b...><degree>, e.g. #5 or bb7",
            NameKind::Chord => "<root><type>[(<tensions>)][/<bass>], e.g. Dm7(9, 11)/C",
            NameKind::Tension => "R or [#...|b...]<degree>, e.g. b9 or 13",
        }
    }
}

impl Display for NameKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            NameKind::Note => "note name",
            NameKind::Interval => "interval name",
            NameKind::Scale => "scale name",
            NameKind::Alteration => "alteration",
            NameKind::Chord => "chord name",
            NameKind::Tension => "tension",
        };
        write!(f, "{display_name}")
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseFailure {
    #[error("malformed syntax")]
    Syntax,
    #[error("unknown note symbol '{0}'")]
    UnknownSymbol(char),
    #[error("quality '{quality}' does not apply to degree {degree}")]
    QualityMismatch { quality: String, degree: u32 },
    #[error("unknown mode '{0}'")]
    UnknownMode(String),
    #[error("unexpected alterations")]
    UnexpectedAlterations,
    #[error("number out of range")]
    OutOfRange,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum LookupError {
    #[error("unknown chord type '{0}'")]
    UnknownChordType(String),
    #[error("no chord type has the interval vector {0:?}")]
    UnknownIntervalVector(Vec<i32>),
    #[error("interval with pitch delta {delta_pitch} and step delta {delta_step} has no tone label")]
    UnsupportedTone { delta_pitch: i32, delta_step: i32 },
    #[error("tone labels and chords need a heptatonic tuning but this one has {num_named_tones} named tones")]
    NotHeptatonic { num_named_tones: u16 },
    #[error("scale degree {degree} is outside of 1..={num_degrees}")]
    DegreeOutOfRange { degree: u32, num_degrees: u16 },
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ClassificationError {
    #[error("interval signature has {actual} steps but {expected} were expected")]
    WrongLength { expected: usize, actual: usize },
    #[error("no scale class matches the interval signature {0:?}")]
    NoMatch(Vec<i32>),
    #[error("the scale and the class table use different tunings")]
    TuningMismatch,
}

/// A class table file could not be loaded.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("class table line {line_number}: {reason}")]
pub struct TableError {
    pub line_number: usize,
    pub reason: TableErrorKind,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TableErrorKind {
    #[error("{0}")]
    Syntax(String),
    #[error("signature has {actual} steps but the tuning has {expected} named tones")]
    SignatureLength { expected: usize, actual: usize },
    #[error("signature steps must be positive and sum up to {expected}")]
    SignatureSum { expected: u16 },
    #[error("expected {expected} rotation name lists but found {actual}")]
    RotationCount { expected: usize, actual: usize },
    #[error("alias rotation {0} is out of range")]
    AliasRotation(usize),
}
