//! Decoding into the scalar families: booleans, integers, floats and strings.
//!
//! These functions report a bare [`DecodeError`]; the caller places it and attaches the values.
use super::{weak, Settings};
use crate::ds::{Number, Value};
use crate::error::{DecodeError, ErrorKind, ParseError};
use crate::reflect::{FloatPlace, IntPlace, UintPlace};
use crate::shape::Shape;

pub(super) fn unexpected(to: &Shape, input: &Value) -> DecodeError {
    DecodeError::new(
        ErrorKind::UnexpectedType,
        format!(
            "expected type '{}', got unconvertible type '{}', value: '{}'",
            to,
            input.shape(),
            input
        ),
    )
}

fn parse_failed(to: &Shape, err: ParseError) -> DecodeError {
    DecodeError::wrap(ErrorKind::Parse, err).with_header(format!("cannot parse as {}: ", to.kind()))
}

fn overflow(to: &Shape, input: &Value) -> DecodeError {
    DecodeError::new(
        ErrorKind::Overflow,
        format!("cannot parse: {} overflows {}", input, to),
    )
}

/// An empty weak string reads as zero.
fn or_zero(s: &str) -> &str {
    if s.is_empty() {
        "0"
    } else {
        s
    }
}

/// Keep the low `bits` bits of a two's complement value.
fn wrap(value: u128, bits: u32) -> u128 {
    if bits >= 128 {
        value
    } else {
        value & ((1u128 << bits) - 1)
    }
}

/// Truncate toward zero, `None` if the result does not fit an `i128`.
fn trunc_i128(f: f64) -> Option<i128> {
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0; // 2^127
    let t = f.trunc();
    if t.is_finite() && t >= -LIMIT && t < LIMIT {
        Some(t as i128)
    } else {
        None
    }
}

pub(super) fn decode_bool(
    settings: &Settings,
    to: &Shape,
    input: &Value,
    out: &mut bool,
) -> Result<(), DecodeError> {
    *out = match input {
        Value::Bool(b) => *b,
        Value::Num(n) if settings.weak => !n.is_zero(),
        Value::Str(s) if settings.weak => match weak::parse_bool(s) {
            Ok(b) => b,
            Err(_) if s.is_empty() => false,
            Err(e) => return Err(parse_failed(to, e)),
        },
        other => return Err(unexpected(to, other)),
    };
    Ok(())
}

pub(super) fn decode_int(
    settings: &Settings,
    to: &Shape,
    input: &Value,
    out: &mut dyn IntPlace,
) -> Result<(), DecodeError> {
    let value = match input {
        Value::Num(Number::Int(i)) => *i,
        Value::Num(Number::Uint(u)) => i128::try_from(*u).map_err(|_| overflow(to, input))?,
        Value::Num(Number::Float(f)) => trunc_i128(*f).ok_or_else(|| overflow(to, input))?,
        Value::Bool(b) if settings.weak => i128::from(*b),
        Value::Str(s) if settings.weak => {
            let s = or_zero(s);
            let i = weak::parse_int(s).map_err(|e| parse_failed(to, e))?;
            return if out.set(i) {
                Ok(())
            } else {
                Err(parse_failed(to, ParseError::range(s)))
            };
        }
        other => return Err(unexpected(to, other)),
    };

    if out.set(value) {
        Ok(())
    } else {
        Err(overflow(to, input))
    }
}

pub(super) fn decode_uint(
    settings: &Settings,
    to: &Shape,
    input: &Value,
    out: &mut dyn UintPlace,
) -> Result<(), DecodeError> {
    let wraps = settings.weak && settings.wrap_negative;
    let bits = out.bits();
    let negative = |i: i128| -> Result<u128, DecodeError> {
        if wraps {
            Ok(wrap(i as u128, bits))
        } else {
            Err(overflow(to, input))
        }
    };

    let value = match input {
        Value::Num(Number::Uint(u)) => *u,
        Value::Num(Number::Int(i)) if *i >= 0 => *i as u128,
        Value::Num(Number::Int(i)) => negative(*i)?,
        Value::Num(Number::Float(f)) => match trunc_i128(*f) {
            Some(i) if i >= 0 => i as u128,
            Some(i) => negative(i)?,
            None if *f > 0.0 && f.trunc() < u128::MAX as f64 => f.trunc() as u128,
            None => return Err(overflow(to, input)),
        },
        Value::Bool(b) if settings.weak => u128::from(*b),
        Value::Str(s) if settings.weak => {
            let s = or_zero(s);
            let u = if s.starts_with('-') {
                let i = weak::parse_int(s).map_err(|e| parse_failed(to, e))?;
                if i >= 0 {
                    i as u128
                } else {
                    negative(i)?
                }
            } else {
                weak::parse_uint(s).map_err(|e| parse_failed(to, e))?
            };
            return if out.set(u) {
                Ok(())
            } else {
                Err(parse_failed(to, ParseError::range(s)))
            };
        }
        other => return Err(unexpected(to, other)),
    };

    if out.set(value) {
        Ok(())
    } else {
        Err(overflow(to, input))
    }
}

pub(super) fn decode_float(
    settings: &Settings,
    to: &Shape,
    input: &Value,
    out: &mut dyn FloatPlace,
) -> Result<(), DecodeError> {
    let value = match input {
        Value::Num(n) => {
            let f = n.as_f64();
            if out.bits() == 32 && f.is_finite() && f.abs() > f64::from(f32::MAX) {
                return Err(overflow(to, input));
            }
            f
        }
        Value::Bool(b) if settings.weak => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Str(s) if settings.weak => {
            let s = or_zero(s);
            let f = weak::parse_float(s).map_err(|e| parse_failed(to, e))?;
            if out.bits() == 32 && f.is_finite() && f.abs() > f64::from(f32::MAX) {
                return Err(parse_failed(to, ParseError::range(s)));
            }
            f
        }
        other => return Err(unexpected(to, other)),
    };
    out.set(value);
    Ok(())
}

pub(super) fn decode_string(
    settings: &Settings,
    to: &Shape,
    input: &Value,
    out: &mut String,
) -> Result<(), DecodeError> {
    *out = match input {
        Value::Str(s) => s.clone(),
        Value::Bool(b) if settings.weak => if *b { "1" } else { "0" }.to_string(),
        Value::Num(n) if settings.weak => n.to_string(),
        Value::Bytes(b) if settings.weak => String::from_utf8_lossy(b).into_owned(),
        other => return Err(unexpected(to, other)),
    };
    Ok(())
}
