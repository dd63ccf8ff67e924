//! Parsing of weakly typed strings into scalars.
//!
//! Integers accept an optional sign, the base prefixes `0x`, `0o`, `0b` (and a bare leading `0`
//! for octal), and `_` between digits. Floats accept decimal and exponent notation plus `inf` and
//! `nan`.
use crate::error::ParseError;

pub(crate) fn parse_bool(s: &str) -> Result<bool, ParseError> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ParseError::syntax(s)),
    }
}

/// Parse a signed integer. Range is checked against `i128`; the caller checks the destination
/// width.
pub(crate) fn parse_int(s: &str) -> Result<i128, ParseError> {
    let (neg, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mag = magnitude(body).map_err(|e| e.on(s))?;
    if neg {
        if mag > i128::MAX as u128 + 1 {
            Err(ParseError::range(s))
        } else {
            Ok((mag as i128).wrapping_neg())
        }
    } else {
        i128::try_from(mag).map_err(|_| ParseError::range(s))
    }
}

/// Parse an unsigned integer. A sign is a syntax error.
pub(crate) fn parse_uint(s: &str) -> Result<u128, ParseError> {
    match s.as_bytes().first() {
        Some(b'-') | Some(b'+') => Err(ParseError::syntax(s)),
        _ => magnitude(s).map_err(|e| e.on(s)),
    }
}

pub(crate) fn parse_float(s: &str) -> Result<f64, ParseError> {
    if let Some(f) = special_float(s) {
        return Ok(f);
    }

    let cleaned;
    let input = if s.contains('_') {
        cleaned = strip_underscores(s).ok_or_else(|| ParseError::syntax(s))?;
        cleaned.as_str()
    } else {
        s
    };

    let f = lexical_core::parse::<f64>(input.as_bytes()).map_err(|_| ParseError::syntax(s))?;
    if f.is_infinite() {
        return Err(ParseError::range(s));
    }
    Ok(f)
}

fn special_float(s: &str) -> Option<f64> {
    let (sign, body) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    match body.to_ascii_lowercase().as_str() {
        "inf" | "infinity" => Some(sign * f64::INFINITY),
        "nan" => Some(f64::NAN),
        _ => None,
    }
}

enum Fail {
    Syntax,
    Range,
}

impl Fail {
    fn on(self, input: &str) -> ParseError {
        match self {
            Fail::Syntax => ParseError::syntax(input),
            Fail::Range => ParseError::range(input),
        }
    }
}

fn magnitude(s: &str) -> Result<u128, Fail> {
    let (radix, digits, prefixed) = split_radix(s);

    let digits = if digits.contains('_') {
        let joined = if prefixed {
            // an underscore may follow the prefix directly
            format!("0{}", digits)
        } else {
            digits.to_string()
        };
        strip_underscores(&joined).ok_or(Fail::Syntax)?
    } else {
        digits.to_string()
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(Fail::Syntax);
    }

    if radix == 10 {
        lexical_core::parse::<u128>(digits.as_bytes()).map_err(|e| match e {
            lexical_core::Error::Overflow(_) => Fail::Range,
            _ => Fail::Syntax,
        })
    } else {
        // digits were validated, so the only failure is overflow
        u128::from_str_radix(&digits, radix).map_err(|_| Fail::Range)
    }
}

fn split_radix(s: &str) -> (u32, &str, bool) {
    let lower = |i: usize| s.as_bytes().get(i).map(u8::to_ascii_lowercase);
    if s.len() >= 2 && s.as_bytes()[0] == b'0' {
        match lower(1) {
            Some(b'x') => return (16, &s[2..], true),
            Some(b'o') => return (8, &s[2..], true),
            Some(b'b') => return (2, &s[2..], true),
            _ => return (8, &s[1..], true),
        }
    }
    (10, s, false)
}

/// Remove `_` separators, which must sit between two digits.
fn strip_underscores(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        if c == '_' {
            let before = i.checked_sub(1).map(|j| bytes[j].is_ascii_alphanumeric());
            let after = bytes.get(i + 1).map(|b| b.is_ascii_alphanumeric());
            if before != Some(true) || after != Some(true) {
                return None;
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}
