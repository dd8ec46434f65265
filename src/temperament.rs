//! Derive named tones and generator chains of equal temperaments.

use std::sync::LazyLock;

use crate::{error::TuningError, math};

static STANDARD: LazyLock<TuningSystem> = LazyLock::new(|| {
    TuningSystem::new(12, 7, 5, ['C', 'D', 'E', 'F', 'G', 'A', 'B'])
        .expect("12-EDO with a generator of 7 steps is a valid tuning")
});

/// Step-class naming schemes of `[12, 7, 5]`: unison, fourth and fifth are perfect intervals.
const NAMING_SCHEMES_12_7_5: [NamingScheme; 7] = [
    NamingScheme::Perfect,
    NamingScheme::MajorMinor,
    NamingScheme::MajorMinor,
    NamingScheme::Perfect,
    NamingScheme::Perfect,
    NamingScheme::MajorMinor,
    NamingScheme::MajorMinor,
];

/// An `N`-tone equal temperament whose named tones are produced by stacking a generator of `G` steps, starting at step `S`.
///
/// The number of named tones is `M = G⁻¹ mod N`.
/// Since `M·G ≡ 1 (mod N)`, stacking `M` further generators on top of any named tone lands exactly one step above it.
/// This is why a single accidental always changes the pitch by one step.
///
/// # Examples
///
/// ```
/// # use tune_theory::temperament::TuningSystem;
/// let tuning = TuningSystem::standard();
/// assert_eq!(tuning.num_named_tones(), 7);
/// assert_eq!(tuning.named_gen(), [5, 0, 7, 2, 9, 4, 11]);
/// assert_eq!(tuning.named_lin(), [0, 2, 4, 5, 7, 9, 11]);
///
/// let tuning_19 = TuningSystem::new(19, 11, 8, ['C', 'D', 'E', 'F', 'G', 'A', 'B']).unwrap();
/// assert_eq!(tuning_19.named_lin(), [0, 3, 6, 8, 11, 14, 17]);
///
/// assert!(TuningSystem::new(12, 8, 0, ['C', 'D', 'E']).is_err());
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TuningSystem {
    num_tones: u16,
    generator: u16,
    starter: u16,
    named_gen: Vec<u16>,
    named_lin: Vec<u16>,
    gen_positions: Vec<usize>,
    symbols: Vec<char>,
}

impl TuningSystem {
    /// Creates a tuning system with `symbols` naming the tones in linear (pitch) order.
    pub fn new(
        num_tones: u16,
        generator: u16,
        starter: u16,
        symbols: impl Into<Vec<char>>,
    ) -> Result<Self, TuningError> {
        if num_tones < 2 {
            return Err(TuningError::TooFewTones { num_tones });
        }

        let generator = generator % num_tones;
        let starter = starter % num_tones;
        let num_named_tones =
            math::mod_inverse(generator, num_tones).ok_or(TuningError::GeneratorNotCoprime {
                num_tones,
                generator,
                gcd: math::gcd_u16(generator, num_tones),
            })?;

        let named_gen: Vec<u16> = (0..u32::from(num_named_tones))
            .map(|index| {
                ((u32::from(starter) + index * u32::from(generator)) % u32::from(num_tones)) as u16
            })
            .collect();
        let mut named_lin = named_gen.clone();
        named_lin.sort_unstable();

        let gen_positions = named_lin
            .iter()
            .map(|relative_pitch| {
                named_gen
                    .iter()
                    .position(|generated| generated == relative_pitch)
                    .unwrap_or_default()
            })
            .collect();

        let symbols = symbols.into();
        if symbols.len() != named_lin.len() {
            return Err(TuningError::SymbolCountMismatch {
                expected: named_lin.len(),
                actual: symbols.len(),
            });
        }
        for (index, &symbol) in symbols.iter().enumerate() {
            if !symbol.is_alphabetic() || !symbol.is_uppercase() {
                return Err(TuningError::InvalidSymbol(symbol));
            }
            if symbols[..index].contains(&symbol) {
                return Err(TuningError::DuplicateSymbol(symbol));
            }
        }

        Ok(Self {
            num_tones,
            generator,
            starter,
            named_gen,
            named_lin,
            gen_positions,
            symbols,
        })
    }

    /// The `[12, 7, 5]` tuning with the named tones `C D E F G A B`.
    pub fn standard() -> &'static TuningSystem {
        &STANDARD
    }

    pub fn is_standard(&self) -> bool {
        self == Self::standard()
    }

    /// `N`, the number of tones per octave.
    pub fn num_tones(&self) -> u16 {
        self.num_tones
    }

    /// `G`, the size of the generator in tones.
    pub fn generator(&self) -> u16 {
        self.generator
    }

    /// `S`, the relative pitch the generator chain starts at.
    pub fn starter(&self) -> u16 {
        self.starter
    }

    /// `M`, the number of named tones.
    pub fn num_named_tones(&self) -> u16 {
        self.named_lin.len() as u16
    }

    /// Relative pitches of the named tones in generator order.
    pub fn named_gen(&self) -> &[u16] {
        &self.named_gen
    }

    /// Relative pitches of the named tones in linear order.
    pub fn named_lin(&self) -> &[u16] {
        &self.named_lin
    }

    /// Symbols of the named tones in linear order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn symbol(&self, step_index: usize) -> char {
        self.symbols[step_index]
    }

    /// Linear index of the named tone with the given `symbol`.
    pub fn symbol_index(&self, symbol: char) -> Option<usize> {
        self.symbols.iter().position(|&candidate| candidate == symbol)
    }

    pub fn relative_pitch(&self, step_index: usize) -> u16 {
        self.named_lin[step_index]
    }

    /// Linear index of the named tone sitting at `relative_pitch`, if any.
    pub fn step_index_of_pitch(&self, relative_pitch: u16) -> Option<usize> {
        self.named_lin.binary_search(&relative_pitch).ok()
    }

    /// Position of a named tone within the generator order.
    pub fn gen_position(&self, step_index: usize) -> usize {
        self.gen_positions[step_index]
    }

    /// Linear index of the named tone at `gen_position` within the generator order.
    pub fn step_index_at_gen(&self, gen_position: usize) -> usize {
        self.gen_positions
            .iter()
            .position(|&position| position == gen_position)
            .unwrap_or_default()
    }

    /// Position on the infinite generator chain, e.g. F=0, C=1, …, B=6, F#=7 in `[12, 7, 5]`.
    pub fn chain_position(&self, step_index: usize, accidental: i32) -> i32 {
        self.gen_position(step_index) as i32 + i32::from(self.num_named_tones()) * accidental
    }

    /// Inverse of [`TuningSystem::chain_position`], returning the linear index and accidental.
    ///
    /// ```
    /// # use tune_theory::temperament::TuningSystem;
    /// let tuning = TuningSystem::standard();
    /// assert_eq!(tuning.chain_note(1), (0, 0)); // C
    /// assert_eq!(tuning.chain_note(7), (3, 1)); // F#
    /// assert_eq!(tuning.chain_note(-1), (6, -1)); // Bb
    /// ```
    pub fn chain_note(&self, chain_position: i32) -> (usize, i32) {
        let (accidental, gen_position) = math::div_mod(chain_position, self.num_named_tones());
        (self.step_index_at_gen(usize::from(gen_position)), accidental)
    }

    /// The naming scheme used for intervals spanning `step_class` named steps.
    ///
    /// Only `[12, 7, 5]` distinguishes perfect fourths and fifths.
    /// Every other tuning names its unison class perfect and all other classes major/minor.
    pub fn naming_scheme(&self, step_class: usize) -> NamingScheme {
        if self.is_standard_layout() {
            NAMING_SCHEMES_12_7_5[step_class]
        } else if step_class == 0 {
            NamingScheme::Perfect
        } else {
            NamingScheme::MajorMinor
        }
    }

    /// Pitch delta of the perfect or major interval spanning `step_class` named steps.
    pub fn reference_pitch(&self, step_class: usize) -> i32 {
        i32::from(self.named_lin[step_class]) - i32::from(self.named_lin[0])
    }

    fn is_standard_layout(&self) -> bool {
        (self.num_tones, self.generator, self.starter) == (12, 7, 5)
    }
}

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum NamingScheme {
    /// Perfect, diminished and augmented intervals.
    Perfect,
    /// Major, minor, diminished and augmented intervals.
    MajorMinor,
}

/// Which accidental to prefer when a pitch can be spelled equally well with sharps or flats.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AccidentalsOrder {
    SharpFlat,
    FlatSharp,
}

impl AccidentalsOrder {
    pub fn from_sharpness(sharpness: i32) -> Self {
        if sharpness >= 0 {
            AccidentalsOrder::SharpFlat
        } else {
            AccidentalsOrder::FlatSharp
        }
    }

    pub(crate) fn prefers(self, accidental: i32, other: i32) -> bool {
        match accidental.abs().cmp(&other.abs()) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => match self {
                AccidentalsOrder::SharpFlat => accidental > other,
                AccidentalsOrder::FlatSharp => accidental < other,
            },
        }
    }
}
