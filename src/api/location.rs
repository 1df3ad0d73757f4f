//! Location code normalization for regional endpoints

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CliError, CliResult};

/// Known data center codes and the country they belong to
static KNOWN_CODES: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("fra", "de"),
        ("fkb", "de"),
        ("txl", "de"),
        ("vit", "es"),
        ("lhr", "gb"),
        ("bhx", "gb"),
        ("par", "fr"),
        ("las", "us"),
        ("ewr", "us"),
        ("mci", "us"),
    ])
});

/// A `<country>/<code>` pair such as `de/fra`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub country: String,
    pub code: String,
}

impl Location {
    /// Region segment used in hostnames, e.g. `de-fra`
    pub fn region(&self) -> String {
        format!("{}-{}", self.country, self.code)
    }

    pub fn is_known(&self) -> bool {
        KNOWN_CODES.get(self.code.as_str()) == Some(&self.country.as_str())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.country, self.code)
    }
}

/// Every location with a known code
pub fn known() -> Vec<Location> {
    KNOWN_CODES
        .iter()
        .map(|(code, country)| Location {
            country: country.to_string(),
            code: code.to_string(),
        })
        .collect()
}

fn is_alpha(s: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphabetic())
}

/// Parse `de/fra`, `DE-FRA`, `de_fra` or a bare known code like `fra`.
///
/// Known codes always map to their own country. Unknown `cc/xyz` pairs are
/// passed through as-is.
pub fn normalize(input: &str) -> CliResult<Location> {
    let cleaned = input.trim().to_ascii_lowercase().replace(['-', '_'], "/");
    let invalid = || CliError::Location(input.to_string());

    let (country, code) = match cleaned.split_once('/') {
        Some((country, code)) => (country.trim(), code.trim()),
        None => {
            let code = cleaned.as_str();
            let country = KNOWN_CODES.get(code).ok_or_else(invalid)?;
            return Ok(Location {
                country: country.to_string(),
                code: code.to_string(),
            });
        }
    };

    if let Some(known_country) = KNOWN_CODES.get(code) {
        return Ok(Location {
            country: known_country.to_string(),
            code: code.to_string(),
        });
    }

    if is_alpha(country, 2..=2) && is_alpha(code, 2..=4) {
        return Ok(Location {
            country: country.to_string(),
            code: code.to_string(),
        });
    }

    Err(invalid())
}
