// String <-> leaf conversions shared by Get, Set and key/index parsing.
use crate::error::{ConfigError, Result};
use crate::model::{KeyKind, MapKey, Scalar};

pub fn parse_int(input: &str) -> Result<i64> {
    input.parse::<i64>().map_err(|source| ConfigError::Parse {
        input: input.to_string(),
        source,
    })
}

/// Never fails: a case-insensitive `true` yields true, every other input
/// (including garbage) yields false.
pub fn parse_bool(input: &str) -> bool {
    input.eq_ignore_ascii_case("true")
}

/// 1-based sequence index. Non-numeric is a parse error, anything below 1 is
/// out of range.
pub fn parse_index(segment: &str) -> Result<usize> {
    let n = parse_int(segment)?;
    if n < 1 {
        return Err(ConfigError::IndexOutOfRange(segment.to_string()));
    }
    usize::try_from(n).map_err(|_| ConfigError::IndexOutOfRange(segment.to_string()))
}

pub fn parse_key(kind: KeyKind, segment: &str) -> Result<MapKey> {
    match kind {
        KeyKind::Str => Ok(MapKey::Str(segment.to_string())),
        KeyKind::Int => parse_int(segment).map(MapKey::Int),
    }
}

/// Overwrites `leaf` with `input` parsed as the leaf's own kind. On error the
/// leaf is untouched.
pub fn assign(leaf: &mut Scalar, input: &str) -> Result<()> {
    match leaf {
        Scalar::Int(n) => *n = parse_int(input)?,
        Scalar::Str(s) => *s = input.to_string(),
        Scalar::Bool(b) => *b = parse_bool(input),
    }
    Ok(())
}

pub fn format(leaf: &Scalar) -> String {
    leaf.to_string()
}
