use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseFailure;

static NOTE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\p{Lu})(#+|b+)?(-?\d+)?$").unwrap());
static INTERVAL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-)?([dmPMA]+)(\d+)$").unwrap());
static SCALE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\S+)\s+(\S.*)$").unwrap());
static SCALE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^()]+?)\s*(?:\(([^()]*)\))?$").unwrap());
static MODE_SYMBOL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\p{Lu})-mode$").unwrap());
static ALTERATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#+|b+)(\d+)$").unwrap());
static CHORD_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\p{Lu}(?:#+|b+)?)([^()/]*)(?:\(([^()]*)\))?(?:/(\p{Lu}(?:#+|b+)?))?$").unwrap()
});
static TENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#+|b+)?(\d+)$").unwrap());

pub struct NoteToken {
    pub symbol: char,
    pub accidental: i32,
    pub register: Option<i32>,
}

pub fn note_name(s: &str) -> Result<NoteToken, ParseFailure> {
    let captures = NOTE_NAME.captures(s).ok_or(ParseFailure::Syntax)?;

    let symbol = captures[1].chars().next().ok_or(ParseFailure::Syntax)?;
    let accidental = accidentals(captures.get(2).map(|m| m.as_str()));
    let register = captures
        .get(3)
        .map(|m| m.as_str().parse().map_err(|_| ParseFailure::OutOfRange))
        .transpose()?;

    Ok(NoteToken {
        symbol,
        accidental,
        register,
    })
}

pub struct IntervalToken {
    pub descending: bool,
    pub quality: char,
    pub quality_len: usize,
    pub degree: u16,
}

pub fn interval_name(s: &str) -> Result<IntervalToken, ParseFailure> {
    let captures = INTERVAL_NAME.captures(s).ok_or(ParseFailure::Syntax)?;

    let run = &captures[2];
    let quality = run.chars().next().ok_or(ParseFailure::Syntax)?;
    if run.chars().any(|c| c != quality) {
        return Err(ParseFailure::Syntax);
    }
    if matches!(quality, 'P' | 'M' | 'm') && run.len() > 1 {
        return Err(ParseFailure::Syntax);
    }

    Ok(IntervalToken {
        descending: captures.get(1).is_some(),
        quality,
        quality_len: run.len(),
        degree: positive_number(&captures[3])?,
    })
}

pub struct ScaleToken<'a> {
    pub tonic: &'a str,
    pub mode: &'a str,
    pub alterations: Option<&'a str>,
}

/// Splits `<tonic> <mode>[(<alterations>)]`.
pub fn scale_name(s: &str) -> Result<ScaleToken<'_>, ParseFailure> {
    let captures = SCALE_NAME.captures(s.trim()).ok_or(ParseFailure::Syntax)?;
    let tonic = captures.get(1).ok_or(ParseFailure::Syntax)?.as_str();
    let scale_type = captures.get(2).ok_or(ParseFailure::Syntax)?.as_str();
    let (mode, alterations) = scale_type_name(scale_type)?;

    Ok(ScaleToken {
        tonic,
        mode,
        alterations,
    })
}

/// Splits `<mode>[(<alterations>)]`, e.g. `C-mode(#5)` or `Harmonic minor`.
pub fn scale_type_name(s: &str) -> Result<(&str, Option<&str>), ParseFailure> {
    let captures = SCALE_TYPE.captures(s.trim()).ok_or(ParseFailure::Syntax)?;
    let mode = captures.get(1).ok_or(ParseFailure::Syntax)?.as_str();
    Ok((mode, captures.get(2).map(|m| m.as_str())))
}

/// Extracts `X` from `X-mode`.
pub fn mode_symbol(s: &str) -> Option<char> {
    MODE_SYMBOL
        .captures(s)
        .and_then(|captures| captures[1].chars().next())
}

pub fn alteration(s: &str) -> Result<(i32, u16), ParseFailure> {
    let captures = ALTERATION.captures(s).ok_or(ParseFailure::Syntax)?;
    Ok((
        accidentals(Some(&captures[1])),
        positive_number(&captures[2])?,
    ))
}

pub struct ChordToken<'a> {
    pub root: &'a str,
    pub kind: &'a str,
    pub tensions: Option<&'a str>,
    pub bass: Option<&'a str>,
}

/// Splits `<root><type>[(<tensions>)][/<bass>]`.
pub fn chord_name(s: &str) -> Result<ChordToken<'_>, ParseFailure> {
    let captures = CHORD_NAME.captures(s).ok_or(ParseFailure::Syntax)?;
    let part = |index| captures.get(index).map(|m: regex::Match<'_>| m.as_str());

    Ok(ChordToken {
        root: part(1).ok_or(ParseFailure::Syntax)?,
        kind: part(2).unwrap_or_default(),
        tensions: part(3),
        bass: part(4),
    })
}

/// Returns the accidental and the degree of a tension, `R` being the unaltered first degree.
pub fn tension(s: &str) -> Result<(i32, u16), ParseFailure> {
    if s == "R" {
        return Ok((0, 1));
    }
    let captures = TENSION.captures(s).ok_or(ParseFailure::Syntax)?;
    Ok((
        accidentals(captures.get(1).map(|m| m.as_str())),
        positive_number(&captures[2])?,
    ))
}

/// Splits a comma-separated list. An empty or blank list has no items.
pub fn list_items(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn accidentals(s: Option<&str>) -> i32 {
    match s {
        Some(s) if s.starts_with('#') => s.len() as i32,
        Some(s) => -(s.len() as i32),
        None => 0,
    }
}

fn positive_number(s: &str) -> Result<u16, ParseFailure> {
    match s.parse() {
        Ok(0) | Err(_) => Err(ParseFailure::OutOfRange),
        Ok(number) => Ok(number),
    }
}
