use std::fmt;

use crate::error::{ConfigError, Result};

/// Dotted address into a config tree, e.g. `People.2.Name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Trims surrounding whitespace and splits on `.`. Only the empty string is
    /// rejected; empty segments such as in `a..b` are kept and fail at lookup.
    pub fn parse(input: &str) -> Result<Path> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingKey);
        }
        Ok(Path {
            segments: trimmed.split('.').map(str::to_string).collect(),
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Joins a prefix and a child segment the way enumeration prints paths.
pub(crate) fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims() {
        let p = Path::parse("  PeopleMap.John.Age ").unwrap();
        assert_eq!(p.segments(), ["PeopleMap", "John", "Age"]);
        assert_eq!(p.to_string(), "PeopleMap.John.Age");
    }

    #[test]
    fn empty_is_missing_key() {
        assert!(matches!(Path::parse(""), Err(ConfigError::MissingKey)));
        assert!(matches!(Path::parse("   "), Err(ConfigError::MissingKey)));
    }

    #[test]
    fn keeps_empty_segments() {
        assert_eq!(Path::parse("a..b").unwrap().len(), 3);
    }
}
