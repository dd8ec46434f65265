//! Notes, intervals, scales and chords in equal temperaments whose named tones form a chain of generators.
//!
//! The standard `[12, 7, 5]` tuning (12 tones, generator of 7 tones, chain starting at F) yields the familiar seven letters.
//! Other tunings, e.g. `[19, 11, 8]`, get the same algebra, including interval names and diatonic modes.

mod parse;

pub mod chord;
pub mod classify;
pub mod error;
pub mod interval;
pub mod math;
pub mod note;
pub mod scale;
pub mod temperament;
