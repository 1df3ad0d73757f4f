//! Byte unit conversion (1024-based)

use std::fmt;
use std::str::FromStr;

use crate::error::{CliError, CliResult};

/// Byte magnitudes, each 1024 times the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Unit {
    B,
    KB,
    MB,
    GB,
    TB,
    PB,
}

impl Unit {
    pub const ALL: [Unit; 6] = [Unit::B, Unit::KB, Unit::MB, Unit::GB, Unit::TB, Unit::PB];

    /// Number of bytes in one of this unit
    pub fn bytes(self) -> i128 {
        1i128 << (10 * self as u32)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unit::B => "B",
            Unit::KB => "KB",
            Unit::MB => "MB",
            Unit::GB => "GB",
            Unit::TB => "TB",
            Unit::PB => "PB",
        };
        f.write_str(s)
    }
}

impl FromStr for Unit {
    type Err = ();

    /// Accepts `G`, `GB`, `GiB` and friends, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let stem = lower
            .strip_suffix("ib")
            .or_else(|| lower.strip_suffix('b'))
            .unwrap_or(&lower);

        match stem {
            "" => Ok(Unit::B),
            "k" => Ok(Unit::KB),
            "m" => Ok(Unit::MB),
            "g" => Ok(Unit::GB),
            "t" => Ok(Unit::TB),
            "p" => Ok(Unit::PB),
            _ => Err(()),
        }
    }
}

/// Convert `value` from one unit to another.
///
/// Multiplies first, then divides, so anything smaller than one `to` unit
/// truncates to zero.
pub fn convert(value: i64, from: Unit, to: Unit) -> i64 {
    let bytes = value as i128 * from.bytes();
    let converted = bytes / to.bytes();
    converted.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Split a string like `" 4 GB "` into its number and optional unit.
///
/// Sizes are never negative: `"-5GB"` does not parse.
pub fn parse_size(s: &str) -> Option<(i64, Option<Unit>)> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() || compact.starts_with('-') {
        return None;
    }

    let split = compact
        .find(|c: char| !(c.is_ascii_digit() || c == '+'))
        .unwrap_or(compact.len());
    let (number, unit) = compact.split_at(split);

    let value = number.parse::<i64>().ok()?;
    if unit.is_empty() {
        return Some((value, None));
    }

    let unit = unit.parse::<Unit>().ok()?;
    Some((value, Some(unit)))
}

/// Parse `s` and convert it into `to`; unparsable input yields `(0, false)`.
///
/// A bare number is taken to already be in `to`.
pub fn from_string_ok(s: &str, to: Unit) -> (i64, bool) {
    match parse_size(s) {
        Some((value, Some(unit))) => (convert(value, unit, to), true),
        Some((value, None)) => (value, true),
        None => (0, false),
    }
}

/// Parse a size given on the command line and convert it into `to`
pub fn parse_in(s: &str, to: Unit) -> CliResult<i64> {
    if s.trim_start().starts_with('-') {
        return Err(CliError::InvalidSize {
            input: s.to_string(),
            reason: "sizes cannot be negative".to_string(),
        });
    }
    match from_string_ok(s, to) {
        (value, true) => Ok(value),
        (_, false) => Err(CliError::InvalidSize {
            input: s.to_string(),
            reason: "expected a number with an optional unit, e.g. 4GB".to_string(),
        }),
    }
}

/// Like [`from_string_ok`] but without the success flag
pub fn str_to_unit(s: &str, to: Unit) -> i64 {
    from_string_ok(s, to).0
}

/// Render a size as whole gigabytes, e.g. `"4 GB"`
pub fn format_gb(value: i64, from: Unit) -> String {
    format!("{} {}", convert(value, from, Unit::GB), Unit::GB)
}
