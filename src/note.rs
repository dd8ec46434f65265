//! Named notes of a [`TuningSystem`] and their arithmetic.

use std::{
    fmt::{self, Display, Formatter, Write},
    ops::{Add, Sub},
    str::FromStr,
};

use crate::{
    error::{NameKind, ParseError, ParseFailure},
    interval::{Interval, ToneLabel},
    math, parse,
    temperament::{AccidentalsOrder, TuningSystem},
};

/// A pitch spelled as a named tone, an accidental and a register.
///
/// The absolute pitch is `relative_pitch + accidental + register·N`.
/// Notes are values: every operation returns a new [`Note`].
/// The optional [`Role`] is metadata attached by scale and chord builders and does not take part in comparisons.
///
/// # Examples
///
/// ```
/// # use tune_theory::interval::Interval;
/// # use tune_theory::note::Note;
/// let c = "C0".parse::<Note>().unwrap();
/// let g = "G1".parse::<Note>().unwrap();
///
/// assert_eq!(g - c, Interval::new(19, 11));
/// assert_eq!(c - g, -(g - c));
/// assert_eq!(c + (g - c), g);
/// assert_eq!((c + "m3".parse::<Interval>().unwrap()).to_string(), "Eb0");
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Note<'t> {
    tuning: &'t TuningSystem,
    step_index: usize,
    accidental: i32,
    register: i32,
    role: Option<Role>,
}

impl<'t> Note<'t> {
    /// Creates a note from the linear index of its named tone.
    ///
    /// # Panics
    ///
    /// Panics if `step_index` is not smaller than the number of named tones.
    pub fn new(
        tuning: &'t TuningSystem,
        step_index: usize,
        accidental: i32,
        register: i32,
    ) -> Self {
        assert!(
            step_index < tuning.symbols().len(),
            "Step index must be smaller than {} but was {}",
            tuning.symbols().len(),
            step_index
        );
        Self {
            tuning,
            step_index,
            accidental,
            register,
            role: None,
        }
    }

    /// Parses `<symbol>[#...|b...][register]`, e.g. `C#3`, `Bb1` or `Fbb-1`. The register defaults to 0.
    pub fn from_name(tuning: &'t TuningSystem, name: &str) -> Result<Self, ParseError> {
        let fail = |reason| ParseError::new(NameKind::Note, name, reason);

        let token = parse::note_name(name).map_err(fail)?;
        let step_index = tuning
            .symbol_index(token.symbol)
            .ok_or_else(|| fail(ParseFailure::UnknownSymbol(token.symbol)))?;

        let register = token.register.unwrap_or_default();
        if !register_fits(tuning, register) {
            return Err(fail(ParseFailure::OutOfRange));
        }

        Ok(Self::new(tuning, step_index, token.accidental, register))
    }

    /// Spells the absolute `pitch` with as few accidentals as possible.
    ///
    /// ```
    /// # use tune_theory::note::Note;
    /// # use tune_theory::temperament::{AccidentalsOrder, TuningSystem};
    /// let tuning = TuningSystem::standard();
    /// assert_eq!(Note::from_pitch(tuning, 13, AccidentalsOrder::SharpFlat).to_string(), "C#1");
    /// assert_eq!(Note::from_pitch(tuning, 13, AccidentalsOrder::FlatSharp).to_string(), "Db1");
    /// assert_eq!(Note::from_pitch(tuning, -1, AccidentalsOrder::SharpFlat).to_string(), "B-1");
    /// ```
    pub fn from_pitch(tuning: &'t TuningSystem, pitch: i32, order: AccidentalsOrder) -> Self {
        let num_tones = i32::from(tuning.num_tones());
        let (_, pitch_class) = math::div_mod(pitch, tuning.num_tones());

        let (step_index, accidental) = tuning
            .named_lin()
            .iter()
            .enumerate()
            .flat_map(|(step_index, &relative_pitch)| {
                let upwards =
                    (i32::from(pitch_class) - i32::from(relative_pitch)).rem_euclid(num_tones);
                [(step_index, upwards), (step_index, upwards - num_tones)]
            })
            .fold((0, i32::MAX), |best, candidate| {
                if order.prefers(candidate.1, best.1) {
                    candidate
                } else {
                    best
                }
            });

        let relative_pitch = i32::from(tuning.relative_pitch(step_index));
        let register = (pitch - relative_pitch - accidental).div_euclid(num_tones);

        Self::new(tuning, step_index, accidental, register)
    }

    pub fn tuning(&self) -> &'t TuningSystem {
        self.tuning
    }

    /// Linear index of the named tone, e.g. 0 for C and 6 for B.
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn symbol(&self) -> char {
        self.tuning.symbol(self.step_index)
    }

    pub fn relative_pitch(&self) -> u16 {
        self.tuning.relative_pitch(self.step_index)
    }

    pub fn accidental(&self) -> i32 {
        self.accidental
    }

    pub fn register(&self) -> i32 {
        self.register
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Absolute pitch in tones above the lowest named tone of register 0.
    pub fn pitch(&self) -> i32 {
        i32::from(self.relative_pitch())
            + self.accidental
            + self.register * i32::from(self.tuning.num_tones())
    }

    /// Absolute number of named steps above the lowest named tone of register 0.
    pub fn step(&self) -> i32 {
        self.step_index as i32 + self.register * i32::from(self.tuning.num_named_tones())
    }

    pub fn with_accidental(mut self, accidental: i32) -> Self {
        self.accidental = accidental;
        self
    }

    pub fn with_register(mut self, register: i32) -> Self {
        self.register = register;
        self
    }

    /// Replaces the components that are provided. A provided zero is applied like any other value.
    pub fn with_vector(self, accidental: Option<i32>, register: Option<i32>) -> Self {
        let mut result = self;
        if let Some(accidental) = accidental {
            result.accidental = accidental;
        }
        if let Some(register) = register {
            result.register = register;
        }
        result
    }

    pub fn add_accidental(self, num_accidentals: i32) -> Self {
        self.with_accidental(self.accidental + num_accidentals)
    }

    pub fn add_register(self, num_registers: i32) -> Self {
        self.with_register(self.register + num_registers)
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn without_role(mut self) -> Self {
        self.role = None;
        self
    }
}

impl PartialEq for Note<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.step_index == other.step_index
            && self.accidental == other.accidental
            && self.register == other.register
            && (std::ptr::eq(self.tuning, other.tuning) || self.tuning == other.tuning)
    }
}

impl Eq for Note<'_> {}

/// [`Note`]s can be parsed in the standard `[12, 7, 5]` tuning.
impl FromStr for Note<'static> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::from_name(TuningSystem::standard(), s)
    }
}

/// The alternate flag omits the register.
///
/// ```
/// # use tune_theory::note::Note;
/// let note = "Fbb-1".parse::<Note>().unwrap();
/// assert_eq!(format!("{note}"), "Fbb-1");
/// assert_eq!(format!("{note:#}"), "Fbb");
/// assert_eq!(format!("{note:>6}"), " Fbb-1");
/// ```
impl Display for Note<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut formatted = String::new();
        formatted.push(self.symbol());
        write_accidentals(&mut formatted, self.accidental);
        if !f.alternate() {
            write!(formatted, "{}", self.register)?;
        }
        f.pad(&formatted)
    }
}

/// The pitch must stay representable, including the registers that scales and chords add on top.
fn register_fits(tuning: &TuningSystem, register: i32) -> bool {
    register
        .checked_mul(4 * i32::from(tuning.num_tones()))
        .is_some()
}

pub(crate) fn write_accidentals(target: &mut String, accidental: i32) {
    let sign = if accidental > 0 { '#' } else { 'b' };
    for _ in 0..accidental.unsigned_abs() {
        target.push(sign);
    }
}

impl Sub for Note<'_> {
    type Output = Interval;

    fn sub(self, rhs: Self) -> Self::Output {
        Interval::new(self.pitch() - rhs.pitch(), self.step() - rhs.step())
    }
}

impl<'t> Add<Interval> for Note<'t> {
    type Output = Note<'t>;

    /// The target named step is found first. Its accidental is derived from the target pitch s.t. `a + (b - a) == b`.
    fn add(self, rhs: Interval) -> Self::Output {
        let (register, step_index) = math::div_mod(
            self.step() + rhs.delta_step(),
            self.tuning.num_named_tones(),
        );
        let step_index = usize::from(step_index);
        let relative_pitch = i32::from(self.tuning.relative_pitch(step_index));
        let pitch = self.pitch() + rhs.delta_pitch();

        Note::new(
            self.tuning,
            step_index,
            pitch - relative_pitch - register * i32::from(self.tuning.num_tones()),
            register,
        )
    }
}

impl<'t> Sub<Interval> for Note<'t> {
    type Output = Note<'t>;

    fn sub(self, rhs: Interval) -> Self::Output {
        self + -rhs
    }
}

/// The function of a note within a scale or chord.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Role {
    Root,
    Bass,
    /// One-based scale degree.
    Degree(u16),
    /// Chord tone other than the root.
    Chord(ToneLabel),
    Tension(ToneLabel),
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Role::Root => write!(f, "R"),
            Role::Bass => write!(f, "B"),
            Role::Degree(degree) => write!(f, "{degree}"),
            Role::Chord(label) | Role::Tension(label) => write!(f, "{label}"),
        }
    }
}
