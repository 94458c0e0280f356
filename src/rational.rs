//! Component E: exact rationals over two integer-mode `BigNumber`s, reduced
//! to lowest terms at construction. Decimal expansion is unbounded and
//! makes no attempt to detect or annotate a repeating cycle — deliberately,
//! matching the source this was distilled from.

use std::fmt;

use crate::error::Error;
use crate::limb::Limb;
use crate::number::BigNumber;

/// `num / den` in lowest terms, with `den` always positive; the sign lives
/// on `num`.
#[derive(Clone)]
pub struct Rational<L: Limb = u64> {
    num: BigNumber<L>,
    den: BigNumber<L>,
}

impl<L: Limb> Rational<L> {
    /// Reduces by `gcd(|num|, den)` and normalizes the sign onto `num`.
    /// `den` of zero is rejected; a negative `den` has its sign folded into
    /// `num` instead of being rejected outright.
    pub fn new(num: BigNumber<L>, den: BigNumber<L>) -> Result<Self, Error> {
        if den.is_zero() {
            return Err(Error::DivideByZero);
        }
        let (num, den) = if den.is_negative() {
            (num.negate(), den.negate())
        } else {
            (num, den)
        };
        let gcd = BigNumber::gcd(&num, &den)?;
        let (num, den) = if gcd.is_zero() || gcd == BigNumber::one() {
            (num, den)
        } else {
            let (n, _) = num.divmod(&gcd)?;
            let (d, _) = den.divmod(&gcd)?;
            (n, d)
        };
        Ok(Self { num, den })
    }

    pub fn from_int(v: i64) -> Self {
        Self {
            num: BigNumber::from_int(v),
            den: BigNumber::one(),
        }
    }

    pub fn numerator(&self) -> &BigNumber<L> {
        &self.num
    }

    pub fn denominator(&self) -> &BigNumber<L> {
        &self.den
    }

    /// Parses `"<int>"`, `"<int>.<frac>"`, or `"<int>/<int>"`. The `/` form
    /// is a deliberate addition over what `BigNumber::from_decimal` accepts,
    /// since a fraction written as a decimal literal only round-trips
    /// exactly when the denominator is a power of ten.
    pub fn from_decimal(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if let Some((n, d)) = s.split_once('/') {
            let num = BigNumber::from_decimal(n.trim())?;
            let den = BigNumber::from_decimal(d.trim())?;
            return Self::new(num, den);
        }
        match s.find('.') {
            None => {
                let num = BigNumber::from_decimal(s)?;
                Self::new(num, BigNumber::one())
            }
            Some(pos) => {
                let frac_len = s.len() - pos - 1;
                let mut digits = String::with_capacity(s.len() - 1);
                digits.push_str(&s[..pos]);
                digits.push_str(&s[pos + 1..]);
                let num = BigNumber::from_decimal(&digits)?;
                let mut den = BigNumber::one();
                let ten = BigNumber::from_int(10);
                for _ in 0..frac_len {
                    den = den.mul(&ten)?;
                }
                Self::new(num, den)
            }
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self, Error> {
        let num = self
            .num
            .mul(&other.den)?
            .add(&other.num.mul(&self.den)?)?;
        let den = self.den.mul(&other.den)?;
        Self::new(num, den)
    }

    pub fn sub(&self, other: &Self) -> Result<Self, Error> {
        self.add(&other.negate())
    }

    pub fn mul(&self, other: &Self) -> Result<Self, Error> {
        Self::new(self.num.mul(&other.num)?, self.den.mul(&other.den)?)
    }

    pub fn div(&self, other: &Self) -> Result<Self, Error> {
        if other.num.is_zero() {
            return Err(Error::DivideByZero);
        }
        Self::new(self.num.mul(&other.den)?, self.den.mul(&other.num)?)
    }

    pub fn negate(&self) -> Self {
        Self {
            num: self.num.negate(),
            den: self.den.clone(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Renders the exact quotient to `digits` fractional places via repeated
    /// long division, truncating rather than rounding the final digit.
    /// Never detects a repeating cycle: a non-terminating fraction run long
    /// enough will simply read out its truncation.
    pub fn to_decimal_string(&self, digits: usize) -> Result<String, Error> {
        let (int_part, mut remainder) = self.num.abs().divmod(&self.den)?;
        let sign = if self.num.is_negative() { "-" } else { "" };
        let mut out = format!("{sign}{}", int_part.to_decimal_string());
        if digits == 0 {
            return Ok(out);
        }
        out.push('.');
        let ten = BigNumber::from_int(10);
        for _ in 0..digits {
            remainder = remainder.mul(&ten)?;
            let (digit, r) = remainder.divmod(&self.den)?;
            out.push_str(&digit.to_decimal_string());
            remainder = r;
        }
        Ok(out)
    }

    /// Renders the exact quotient in full: `r := r*10; digit := r div den;
    /// r := r mod den`, repeated until `r == 0`. Emits no decimal point at
    /// all when the fraction reduces to an integer. A non-terminating
    /// fraction (any denominator with a prime factor other than 2 or 5)
    /// never reaches `r == 0` and this loops forever — matching the
    /// reference implementation's contract, not a bug to guard against
    /// here.
    pub fn to_decimal_string_unbounded(&self) -> Result<String, Error> {
        let (int_part, mut remainder) = self.num.abs().divmod(&self.den)?;
        let sign = if self.num.is_negative() { "-" } else { "" };
        let mut out = format!("{sign}{}", int_part.to_decimal_string());
        if remainder.is_zero() {
            return Ok(out);
        }
        out.push('.');
        let ten = BigNumber::from_int(10);
        while !remainder.is_zero() {
            remainder = remainder.mul(&ten)?;
            let (digit, r) = remainder.divmod(&self.den)?;
            out.push_str(&digit.to_decimal_string());
            remainder = r;
        }
        Ok(out)
    }
}

impl<L: Limb> fmt::Display for Rational<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.num, self.den)
    }
}

impl<L: Limb> fmt::Debug for Rational<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<L: Limb> PartialEq for Rational<L> {
    fn eq(&self, other: &Self) -> bool {
        // num/den is always stored reduced, so cross-multiplication isn't
        // needed: equal rationals have identical reduced representations.
        self.num == other.num && self.den == other.den
    }
}

impl<L: Limb> Eq for Rational<L> {}
