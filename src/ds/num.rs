use std::cmp::{Eq, Ord, Ordering, PartialEq, PartialOrd};
use std::convert::TryFrom;
use std::fmt;
use Number::*;

/// A numerical source value.
///
/// `Number` captures every Rust numerical primitive in one of three families: _unsigned
/// integers_, _signed integers_ and _floating point_ numbers. Each family is stored at its widest
/// width (128 bits for integers, 64 bits for floats), and the family decides which decode rules
/// apply (a negative `Int` cannot land in an unsigned destination without weak wraparound).
///
/// Numbers are canonicalized: `Eq` and `Ord` hold across families so that a `Number` can key a
/// [`Map`](crate::ds::Map). The number line runs from negative infinity, through zero, to
/// positive infinity with NaN above everything. All zeroes are equal, as are all NaNs.
///
/// `[ -∞, .., 0, .., +∞, NaN ]`
///
/// # Examples
/// ```rust
/// # use restruct::*;
/// let n = Number::from(100u8);
/// assert_eq!(n, Number::Uint(100));
/// assert_eq!(n, Number::from(100.0f32));
/// assert_eq!(n, 100i32);
/// assert!(n > 99.99);
/// assert!(n < Number::from(101));
/// ```
#[derive(Copy, Clone, Debug)]
#[allow(missing_docs)]
pub enum Number {
    Uint(u128),
    Int(i128),
    Float(f64),
}

/// Converting into an integer fails if the number is outside the integer's valid range, or is a
/// float with a fractional part.
#[derive(Debug, PartialEq)]
pub struct IntoIntError;

impl Number {
    /// Represent `Number` as an unsigned integer.
    ///
    /// # Example
    /// ```rust
    /// # use restruct::*;
    /// use restruct::IntoIntError;
    ///
    /// assert_eq!(Number::from(100i32).as_u128(), Ok(100));
    /// assert_eq!(Number::from(100.0).as_u128(), Ok(100));
    /// assert_eq!(Number::from(-100i32).as_u128(), Err(IntoIntError));
    /// assert_eq!(Number::from(0.5).as_u128(), Err(IntoIntError));
    /// ```
    pub fn as_u128(&self) -> Result<u128, IntoIntError> {
        match *self {
            Uint(x) => Ok(x),
            Int(x) => u128::try_from(x).map_err(|_| IntoIntError),
            Float(x) if x.is_finite() && x >= 0.0 && x.fract() == 0.0 => Ok(x as u128),
            Float(_) => Err(IntoIntError),
        }
    }

    /// Represent `Number` as a signed integer.
    ///
    /// # Example
    /// ```rust
    /// # use restruct::*;
    /// use restruct::IntoIntError;
    ///
    /// assert_eq!(Number::from(100u32).as_i128(), Ok(100));
    /// assert_eq!(Number::from(-3.0).as_i128(), Ok(-3));
    /// assert_eq!(Number::from(f64::NAN).as_i128(), Err(IntoIntError));
    /// ```
    pub fn as_i128(&self) -> Result<i128, IntoIntError> {
        match *self {
            Uint(x) => i128::try_from(x).map_err(|_| IntoIntError),
            Int(x) => Ok(x),
            Float(x) if x.is_finite() && x.fract() == 0.0 => Ok(x as i128),
            Float(_) => Err(IntoIntError),
        }
    }

    /// Represent `Number` as a floating point decimal.
    /// Does not fail, but is a lossy conversion for large integers.
    ///
    /// # Example
    /// ```rust
    /// # use restruct::*;
    /// assert_eq!(Number::from(100u8).as_f64(), 100.0);
    /// assert_eq!(Number::from(-100).as_f64(), -100.0);
    /// ```
    pub fn as_f64(&self) -> f64 {
        match *self {
            Uint(x) => x as f64,
            Int(x) => x as f64,
            Float(x) => x,
        }
    }

    /// Is the number zero in its own family.
    ///
    /// # Example
    /// ```rust
    /// # use restruct::*;
    /// assert!(Number::from(0u8).is_zero());
    /// assert!(Number::from(-0.0).is_zero());
    /// assert!(!Number::from(f64::NAN).is_zero());
    /// ```
    pub fn is_zero(&self) -> bool {
        match *self {
            Uint(x) => x == 0,
            Int(x) => x == 0,
            Float(x) => x == 0.0,
        }
    }

    /// The family name used when describing a source value: `uint`, `int` or `float`.
    pub fn family(&self) -> &'static str {
        match self {
            Uint(_) => "uint",
            Int(_) => "int",
            Float(_) => "float",
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uint(x) => write!(f, "{}", x),
            Int(x) => write!(f, "{}", x),
            Float(x) => write!(f, "{}", x),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Number) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Number) -> Ordering {
        match (*self, *other) {
            (Uint(lhs), Uint(rhs)) => lhs.cmp(&rhs),
            (Int(lhs), Int(rhs)) => lhs.cmp(&rhs),
            (Float(lhs), Float(rhs)) => cmp_floats(lhs, rhs),

            (Uint(lhs), Int(rhs)) => cmp_uint_int(lhs, rhs),
            (Int(lhs), Uint(rhs)) => cmp_uint_int(rhs, lhs).reverse(),

            (Float(lhs), Uint(rhs)) => cmp_float_int(lhs, Int128::Unsigned(rhs)),
            (Uint(lhs), Float(rhs)) => cmp_float_int(rhs, Int128::Unsigned(lhs)).reverse(),
            (Float(lhs), Int(rhs)) => cmp_float_int(lhs, Int128::Signed(rhs)),
            (Int(lhs), Float(rhs)) => cmp_float_int(rhs, Int128::Signed(lhs)).reverse(),
        }
    }
}

macro_rules! cross_cmp_impl {
    ( $( $t:ty ),* ) => {
	$(
	impl PartialEq<$t> for Number {
	    fn eq(&self, rhs: &$t) -> bool {
		self.eq(&Number::from(*rhs))
	    }
	}

	impl PartialOrd<$t> for Number {
	    fn partial_cmp(&self, rhs: &$t) -> Option<Ordering> {
		Some(self.cmp(&Number::from(*rhs)))
	    }
	}
	)*
    };
}

cross_cmp_impl!(usize, u8, u16, u32, u64, u128, isize, i8, i16, i32, i64, i128, f32, f64);

/// `[ -INF | ... | 0 | ... | +INF | NaN ]`
fn cmp_floats(lhs: f64, rhs: f64) -> Ordering {
    match (lhs.is_nan(), rhs.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal),
    }
}

fn cmp_uint_int(lhs: u128, rhs: i128) -> Ordering {
    match u128::try_from(rhs) {
        Ok(rhs) => lhs.cmp(&rhs),
        Err(_) => Ordering::Greater,
    }
}

#[derive(Copy, Clone)]
enum Int128 {
    Unsigned(u128),
    Signed(i128),
}

/// Compares a float against an integer through the float's floor and ceiling, which avoids the
/// precision loss of widening the integer into an `f64`.
fn cmp_float_int(lhs: f64, rhs: Int128) -> Ordering {
    use Ordering::*;

    if lhs.is_nan() || lhs == f64::INFINITY {
        return Greater;
    }
    if lhs == f64::NEG_INFINITY {
        return Less;
    }

    let (floor, ceil) = match rhs {
        Int128::Unsigned(rhs) => {
            if lhs < 0.0 {
                return Less;
            }
            ((lhs.floor() as u128).cmp(&rhs), (lhs.ceil() as u128).cmp(&rhs))
        }
        Int128::Signed(rhs) => ((lhs.floor() as i128).cmp(&rhs), (lhs.ceil() as i128).cmp(&rhs)),
    };

    match (floor, ceil) {
        (Equal, Equal) => Equal,
        (Less, _) => Less,
        _ => Greater,
    }
}

macro_rules! from_uint {
	( $( $t:ty ),* ) => {
		$(
			impl From<$t> for Number {
				fn from(x: $t) -> Self {
					Number::Uint(x as u128)
				}
			}
		)*
	};
}

macro_rules! from_int {
	( $( $t:ty ),* ) => {
		$(
			impl From<$t> for Number {
				fn from(x: $t) -> Self {
					Number::Int(x as i128)
				}
			}
		)*
	};
}

from_uint!(usize, u8, u16, u32, u64, u128);
from_int!(isize, i8, i16, i32, i64, i128);

impl From<f32> for Number {
    fn from(x: f32) -> Self {
        // go through the shortest decimal so 0.1f32 stays 0.1 rather than 0.10000000149...
        Number::Float(x.to_string().parse::<f64>().unwrap_or(x as f64))
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Float(x)
    }
}
