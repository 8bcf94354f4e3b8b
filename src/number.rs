//! Arbitrary-precision rational numbers.
//!
//! Every Quen number is an exact rational. Arithmetic never loses precision;
//! division by zero and non-integer modulo are recoverable errors. Rendering
//! uses the reduced-fraction form (`3/2`), collapsing to the plain integer
//! when the denominator is one.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::errors::{ErrorKind, QuenError, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Number(BigRational);

impl Number {
    pub fn from_integer(x: i64) -> Self {
        Self(BigRational::from_integer(BigInt::from(x)))
    }

    /// Parse integer or decimal text. Underscore separators are allowed;
    /// a decimal part becomes an exact fraction over a power of ten.
    pub fn from_text(s: &str) -> Result<Self> {
        let invalid = || QuenError::parse(format!("{s:?} is not a valid number"));
        let digits: String = s.chars().filter(|&ch| ch != '_').collect();
        match digits.split_once('.') {
            None => {
                let int = BigInt::from_str(&digits).map_err(|_| invalid())?;
                Ok(Self(BigRational::from_integer(int)))
            }
            Some((whole, frac)) => {
                if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                let numer = BigInt::from_str(&format!("{whole}{frac}")).map_err(|_| invalid())?;
                let denom = num_traits::pow(BigInt::from(10), frac.len());
                Ok(Self(BigRational::new(numer, denom)))
            }
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        Self(&self.0 + &other.0)
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self(&self.0 - &other.0)
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self(&self.0 * &other.0)
    }

    pub fn neg(&self) -> Self {
        Self(-&self.0)
    }

    pub fn div(&self, other: &Self) -> Result<Self> {
        if other.0.is_zero() {
            return Err(ErrorKind::DivisionByZero.into());
        }
        Ok(Self(&self.0 / &other.0))
    }

    /// Truncated integer remainder. Both operands must be integers and the
    /// divisor non-zero.
    pub fn modulo(&self, other: &Self) -> Result<Self> {
        self.check_int()?;
        other.check_int()?;
        if other.0.is_zero() {
            return Err(ErrorKind::DivisionByZero.into());
        }
        let rem = self.0.to_integer() % other.0.to_integer();
        Ok(Self(BigRational::from_integer(rem)))
    }

    pub fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    /// Checked narrowing to a host signed integer.
    pub fn to_i64(&self) -> Result<i64> {
        self.check_int()?;
        self.0
            .to_integer()
            .to_i64()
            .ok_or_else(|| self.too_large())
    }

    /// Checked narrowing to a host index. Errors on non-integer, negative,
    /// or out-of-range values.
    pub fn to_usize(&self) -> Result<usize> {
        self.check_int()?;
        if self.0.is_negative() {
            return Err(ErrorKind::Negative {
                value: self.to_string(),
            }
            .into());
        }
        self.0
            .to_integer()
            .to_usize()
            .ok_or_else(|| self.too_large())
    }

    fn check_int(&self) -> Result<()> {
        if !self.0.is_integer() {
            return Err(ErrorKind::NotAnInteger {
                value: self.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn too_large(&self) -> QuenError {
        ErrorKind::TooLarge {
            value: self.to_string(),
        }
        .into()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Ratio renders reduced, omitting a denominator of one.
        write!(f, "{}", self.0)
    }
}
