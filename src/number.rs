//! Component D: the signed big-integer with an optional power-of-two
//! exponent for floating-point use. The four arithmetic operations,
//! division with remainder, power, integer/float square root, decimal I/O,
//! and an optional precision cap all live here.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Mutex;

use crate::error::Error;
use crate::limb::Limb;
use crate::magnitude;
use crate::mul;
use crate::pool::Pool;

/// Signed magnitude plus an optional signed power-of-two exponent.
///
/// `L` defaults to `u64`, the widest natively efficient unsigned type the
/// design permits as a cap on the process-wide chunk width; a narrower `L`
/// remains available for callers who want smaller buffers or who want to
/// exercise the Karatsuba/Toom-3 thresholds against a narrow limb directly.
#[derive(Clone)]
pub struct BigNumber<L: Limb = u64> {
    pub(crate) mantissa: Vec<L>,
    pub(crate) exponent: Vec<L>,
    pub(crate) negative: bool,
    pub(crate) exponent_negative: bool,
    pub(crate) is_float: bool,
}

/// log2(10), used to convert a decimal fractional length into a binary
/// exponent shift. Hardcoded rather than relying on the as-yet-unstable
/// `f64::consts::LOG2_10` across all supported toolchains.
const LOG2_10: f64 = 3.321_928_094_887_362_3;

impl<L: Limb> BigNumber<L> {
    pub fn zero() -> Self {
        Self {
            mantissa: magnitude::zero(),
            exponent: magnitude::zero(),
            negative: false,
            exponent_negative: false,
            is_float: false,
        }
    }

    pub fn one() -> Self {
        Self::from_int(1)
    }

    pub(crate) fn from_limbs_unsigned(mantissa: Vec<L>) -> Self {
        let mut out = Self {
            mantissa,
            exponent: magnitude::zero(),
            negative: false,
            exponent_negative: false,
            is_float: false,
        };
        out.normalize();
        out
    }

    pub fn is_zero(&self) -> bool {
        magnitude::is_zero(&self.mantissa)
    }

    pub fn is_float(&self) -> bool {
        self.is_float
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn mantissa_limbs(&self) -> &[L] {
        &self.mantissa
    }

    pub fn from_int(v: i64) -> Self {
        let negative = v < 0;
        let magnitude = v.unsigned_abs();
        let mut out = Self {
            mantissa: magnitude::int_to_limbs(magnitude),
            exponent: magnitude::zero(),
            negative,
            exponent_negative: false,
            is_float: false,
        };
        out.normalize();
        out
    }

    /// Optional leading `-`, optional single `.`. A fractional part of
    /// length `frac_len` marks the result as float with
    /// `exponent_negative=true` and `E = ceil(frac_len * log2(10))`; the
    /// mantissa is the digit string with the point removed. This matches
    /// the source's representation exactly and, as the source's own
    /// behavior does, does not numerically equal the decimal value — see
    /// `Rational::from_decimal` for a numerically faithful parse.
    pub fn from_decimal(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::zero());
        }
        let (negative, rest) = match s.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, s),
        };
        let (digits, frac_len) = match rest.find('.') {
            Some(pos) => {
                let mut d = String::with_capacity(rest.len() - 1);
                d.push_str(&rest[..pos]);
                d.push_str(&rest[pos + 1..]);
                (d, rest.len() - pos - 1)
            }
            None => (rest.to_string(), 0usize),
        };
        let mantissa = magnitude::decimal_to_limbs::<L>(&digits)?;
        let (exponent, is_float, exponent_negative) = if frac_len > 0 {
            let shift_bits = ((frac_len as f64) * LOG2_10).ceil() as u64;
            (magnitude::int_to_limbs::<L>(shift_bits), true, true)
        } else {
            (magnitude::zero(), false, false)
        };
        let mut out = Self {
            mantissa,
            exponent,
            negative,
            exponent_negative,
            is_float,
        };
        out.normalize();
        Ok(out)
    }

    /// Optional `0b` prefix, otherwise digits `{0,1}`.
    pub fn from_binary_string(s: &str) -> Result<Self, Error> {
        let body = s.strip_prefix("0b").unwrap_or(s);
        let mut mantissa: Vec<L> = magnitude::zero();
        for ch in body.chars() {
            let bit = match ch {
                '0' => false,
                '1' => true,
                other => return Err(Error::InvalidDigit(other)),
            };
            mantissa = magnitude::shl1(&mantissa);
            if bit {
                mantissa = magnitude::add(&mantissa, &[L::ONE]);
            }
        }
        Ok(Self::from_limbs_unsigned(mantissa))
    }

    fn normalize(&mut self) {
        magnitude::canonicalize(&mut self.mantissa);
        if self.is_float {
            magnitude::canonicalize(&mut self.exponent);
        } else {
            self.exponent = magnitude::zero();
            self.exponent_negative = false;
        }
        if self.is_zero() {
            self.negative = false;
            self.exponent = magnitude::zero();
            self.exponent_negative = false;
        }
    }

    fn exp_as_i64(&self) -> i64 {
        let v = magnitude::limbs_to_u64(&self.exponent) as i64;
        if self.exponent_negative {
            -v
        } else {
            v
        }
    }

    pub fn abs(&self) -> Self {
        let mut out = self.clone();
        out.negative = false;
        out
    }

    pub fn negate(&self) -> Self {
        let mut out = self.clone();
        if !out.is_zero() {
            out.negative = !out.negative;
        }
        out
    }

    fn check_precision(&self) -> Result<(), Error> {
        if let Some(limit) = precision_limit::<L>() {
            let bits = self.mantissa.len() as u64 * L::BITS as u64;
            if bits > limit {
                return Err(Error::PrecisionExceeded { limit });
            }
        }
        Ok(())
    }

    pub fn add(&self, other: &Self) -> Result<Self, Error> {
        let result = if self.is_float || other.is_float {
            self.add_float(other)
        } else {
            self.add_int(other)
        };
        result.check_precision()?;
        Ok(result)
    }

    fn add_int(&self, other: &Self) -> Self {
        let (mantissa, negative) = if self.negative == other.negative {
            (magnitude::add(&self.mantissa, &other.mantissa), self.negative)
        } else {
            match magnitude::compare(&self.mantissa, &other.mantissa) {
                Ordering::Equal => (magnitude::zero(), false),
                Ordering::Greater => (
                    magnitude::sub(&self.mantissa, &other.mantissa),
                    self.negative,
                ),
                Ordering::Less => (
                    magnitude::sub(&other.mantissa, &self.mantissa),
                    other.negative,
                ),
            }
        };
        let mut out = Self {
            mantissa,
            exponent: magnitude::zero(),
            negative,
            exponent_negative: false,
            is_float: false,
        };
        out.normalize();
        out
    }

    fn add_float(&self, other: &Self) -> Self {
        let exp_a = self.exp_as_i64();
        let exp_b = other.exp_as_i64();
        let (mant_a, mant_b, final_exp) = match exp_a.cmp(&exp_b) {
            Ordering::Equal => (self.mantissa.clone(), other.mantissa.clone(), exp_a),
            Ordering::Greater => {
                let shift = (exp_a - exp_b) as u64;
                (
                    self.mantissa.clone(),
                    magnitude::shr_bits(&other.mantissa, shift),
                    exp_a,
                )
            }
            Ordering::Less => {
                let shift = (exp_b - exp_a) as u64;
                (
                    magnitude::shr_bits(&self.mantissa, shift),
                    other.mantissa.clone(),
                    exp_b,
                )
            }
        };
        let (mantissa, negative) = if self.negative == other.negative {
            (magnitude::add(&mant_a, &mant_b), self.negative)
        } else {
            match magnitude::compare(&mant_a, &mant_b) {
                Ordering::Equal => (magnitude::zero(), false),
                Ordering::Greater => (magnitude::sub(&mant_a, &mant_b), self.negative),
                Ordering::Less => (magnitude::sub(&mant_b, &mant_a), other.negative),
            }
        };
        let exponent_negative = final_exp < 0;
        let exponent = magnitude::int_to_limbs(final_exp.unsigned_abs());
        let mut out = Self {
            mantissa,
            exponent,
            negative,
            exponent_negative,
            is_float: true,
        };
        out.normalize();
        out
    }

    pub fn sub(&self, other: &Self) -> Result<Self, Error> {
        self.add(&other.negate())
    }

    pub fn mul(&self, other: &Self) -> Result<Self, Error> {
        let result = if self.is_float || other.is_float {
            self.mul_float(other)
        } else {
            self.mul_int(other, Pool::global())
        };
        result.check_precision()?;
        Ok(result)
    }

    /// Same as `mul` but drawing multiplier scratch space from an explicit
    /// pool instead of the process-wide default.
    pub fn mul_with_pool(&self, other: &Self, pool: &Pool<L>) -> Result<Self, Error> {
        let result = if self.is_float || other.is_float {
            self.mul_float(other)
        } else {
            self.mul_int(other, pool)
        };
        result.check_precision()?;
        Ok(result)
    }

    fn mul_int(&self, other: &Self, pool: &Pool<L>) -> Self {
        let mantissa = mul::multiply(&self.mantissa, &other.mantissa, pool);
        let negative = !magnitude::is_zero(&mantissa) && (self.negative != other.negative);
        let mut out = Self {
            mantissa,
            exponent: magnitude::zero(),
            negative,
            exponent_negative: false,
            is_float: false,
        };
        out.normalize();
        out
    }

    fn mul_float(&self, other: &Self) -> Self {
        let mantissa = mul::multiply(&self.mantissa, &other.mantissa, Pool::global());
        let negative = !magnitude::is_zero(&mantissa) && (self.negative != other.negative);
        let new_exp = self.exp_as_i64() + other.exp_as_i64();
        let mut out = Self {
            mantissa,
            exponent: magnitude::int_to_limbs(new_exp.unsigned_abs()),
            negative,
            exponent_negative: new_exp < 0,
            is_float: true,
        };
        out.normalize();
        out
    }

    /// Integer floor division with remainder via long division.
    pub fn divmod(&self, other: &Self) -> Result<(Self, Self), Error> {
        if self.is_float || other.is_float {
            return Err(Error::UnsupportedMode("divmod is integer-only"));
        }
        if other.is_zero() {
            return Err(Error::DivideByZero);
        }
        let (q, r) = magnitude::divmod(&self.mantissa, &other.mantissa);
        let sign = !magnitude::is_zero(&q) && (self.negative != other.negative);
        let mut quotient = Self {
            mantissa: q,
            exponent: magnitude::zero(),
            negative: sign,
            exponent_negative: false,
            is_float: false,
        };
        quotient.normalize();
        let mut remainder = Self {
            mantissa: r,
            exponent: magnitude::zero(),
            negative: self.negative,
            exponent_negative: false,
            is_float: false,
        };
        remainder.normalize();
        Ok((quotient, remainder))
    }

    pub fn div(&self, other: &Self) -> Result<Self, Error> {
        if self.is_float || other.is_float {
            self.div_float(other)
        } else {
            Ok(self.divmod(other)?.0)
        }
    }

    fn div_float(&self, other: &Self) -> Result<Self, Error> {
        if other.is_zero() {
            return Err(Error::DivideByZero);
        }
        let negative = self.negative != other.negative;
        let new_exp = self.exp_as_i64() - other.exp_as_i64();
        let (q, _r) = magnitude::divmod(&self.mantissa, &other.mantissa);
        let negative = negative && !magnitude::is_zero(&q);
        let mut out = Self {
            mantissa: q,
            exponent: magnitude::int_to_limbs(new_exp.unsigned_abs()),
            negative,
            exponent_negative: new_exp < 0,
            is_float: true,
        };
        out.normalize();
        Ok(out)
    }

    /// Euclidean gcd via repeated `divmod`. Used by `Rational`'s reduction.
    pub fn gcd(a: &Self, b: &Self) -> Result<Self, Error> {
        let mut x = a.abs();
        let mut y = b.abs();
        while !y.is_zero() {
            let (_, r) = x.divmod(&y)?;
            x = y;
            y = r;
        }
        Ok(x)
    }

    /// Integer power via repeated squaring; `exponent` must be a
    /// non-negative integer-mode `BigNumber`.
    pub fn pow(&self, exponent: &Self) -> Result<Self, Error> {
        if self.is_float || exponent.is_float {
            return Err(Error::UnsupportedMode("pow is integer-only"));
        }
        if exponent.negative {
            return Err(Error::NegativeExponent);
        }
        if exponent.is_zero() {
            return Ok(Self::one());
        }
        let pool = Pool::global();
        let mut result = Self::one();
        let mut base = self.clone();
        let mut e = exponent.mantissa.clone();
        while !magnitude::is_zero(&e) {
            if e[0].is_odd() {
                result = result.mul_int(&base, pool);
            }
            e = magnitude::shr1(&e);
            if !magnitude::is_zero(&e) {
                base = base.mul_int(&base, pool);
            }
        }
        result.check_precision()?;
        Ok(result)
    }

    /// Integer square root: binary search on `[0, self]`, returning the
    /// floor of the true root.
    pub fn sqrt(&self) -> Result<Self, Error> {
        if self.is_float {
            return self.sqrt_float();
        }
        if self.negative {
            return Err(Error::InvalidOperand("sqrt of a negative integer"));
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }
        let pool = Pool::global();
        let one = vec![L::ONE];
        let mut low: Vec<L> = magnitude::zero();
        let mut high = self.mantissa.clone();
        let mut answer: Vec<L> = magnitude::zero();
        while magnitude::compare(&low, &high) != Ordering::Greater {
            let mid = magnitude::shr1(&magnitude::add(&low, &high));
            let mid_sqr = mul::multiply(&mid, &mid, pool);
            if magnitude::compare(&mid_sqr, &self.mantissa) == Ordering::Greater {
                high = magnitude::sub(&mid, &one);
            } else {
                low = magnitude::add(&mid, &one);
                answer = mid;
            }
        }
        Ok(Self::from_limbs_unsigned(answer))
    }

    fn sqrt_float(&self) -> Result<Self, Error> {
        if self.negative {
            return Err(Error::InvalidOperand("sqrt of a negative float"));
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }
        let mut exp = self.exp_as_i64();
        let mut mantissa = self.mantissa.clone();
        if exp.rem_euclid(2) != 0 {
            if exp > 0 {
                mantissa = magnitude::shl1(&mantissa);
                exp -= 1;
            } else {
                mantissa = magnitude::shr1(&mantissa);
                exp += 1;
            }
        }
        let int_form = Self::from_limbs_unsigned(mantissa);
        let root = int_form.sqrt()?;
        let new_exp = exp / 2;
        let mut out = Self {
            mantissa: root.mantissa,
            exponent: magnitude::int_to_limbs(new_exp.unsigned_abs()),
            negative: false,
            exponent_negative: new_exp < 0,
            is_float: true,
        };
        out.normalize();
        Ok(out)
    }

    /// Integer: `limbs_to_dec(mantissa)` prefixed with sign. Float:
    /// `"<mant> * 2^<signed E>"`, matched byte-for-byte against the source.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        let mant_str = magnitude::limbs_to_decimal(&self.mantissa);
        if !self.is_float {
            return format!("{sign}{mant_str}");
        }
        let exp_str = magnitude::limbs_to_decimal(&self.exponent);
        let exp_sign = if self.exponent_negative && exp_str != "0" {
            "-"
        } else {
            ""
        };
        format!("{sign}{mant_str} * 2^{exp_sign}{exp_str}")
    }
}

impl<L: Limb> fmt::Debug for BigNumber<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl<L: Limb> fmt::Display for BigNumber<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

fn magnitude_cmp_aligned<L: Limb>(a: &BigNumber<L>, b: &BigNumber<L>) -> Ordering {
    if !a.is_float && !b.is_float {
        return magnitude::compare(&a.mantissa, &b.mantissa);
    }
    let exp_a = a.exp_as_i64();
    let exp_b = b.exp_as_i64();
    match exp_a.cmp(&exp_b) {
        Ordering::Equal => magnitude::compare(&a.mantissa, &b.mantissa),
        Ordering::Greater => {
            let shifted = magnitude::shr_bits(&b.mantissa, (exp_a - exp_b) as u64);
            magnitude::compare(&a.mantissa, &shifted)
        }
        Ordering::Less => {
            let shifted = magnitude::shr_bits(&a.mantissa, (exp_b - exp_a) as u64);
            magnitude::compare(&shifted, &b.mantissa)
        }
    }
}

impl<L: Limb> Ord for BigNumber<L> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => magnitude_cmp_aligned(self, other),
            (true, true) => magnitude_cmp_aligned(other, self),
        }
    }
}

impl<L: Limb> PartialOrd for BigNumber<L> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<L: Limb> PartialEq for BigNumber<L> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<L: Limb> Eq for BigNumber<L> {}

impl<L: Limb> std::ops::Add for &BigNumber<L> {
    type Output = BigNumber<L>;
    fn add(self, rhs: Self) -> BigNumber<L> {
        BigNumber::add(self, rhs).expect("addition exceeded the configured precision limit")
    }
}

impl<L: Limb> std::ops::Sub for &BigNumber<L> {
    type Output = BigNumber<L>;
    fn sub(self, rhs: Self) -> BigNumber<L> {
        BigNumber::sub(self, rhs).expect("subtraction exceeded the configured precision limit")
    }
}

impl<L: Limb> std::ops::Mul for &BigNumber<L> {
    type Output = BigNumber<L>;
    fn mul(self, rhs: Self) -> BigNumber<L> {
        BigNumber::mul(self, rhs).expect("multiplication exceeded the configured precision limit")
    }
}

impl<L: Limb> std::ops::Div for &BigNumber<L> {
    type Output = BigNumber<L>;
    fn div(self, rhs: Self) -> BigNumber<L> {
        BigNumber::div(self, rhs).expect("division by zero or unsupported operand mode")
    }
}

impl<L: Limb> std::ops::Neg for &BigNumber<L> {
    type Output = BigNumber<L>;
    fn neg(self) -> BigNumber<L> {
        self.negate()
    }
}

fn precision_slot<L: Limb>() -> &'static Mutex<Option<u64>> {
    L::precision_cell().get_or_init(|| Mutex::new(None))
}

fn precision_limit<L: Limb>() -> Option<u64> {
    *precision_slot::<L>().lock().unwrap()
}

/// Sets an optional maximum mantissa bit width for `BigNumber<L>`. When set,
/// an operation whose result would exceed it fails with
/// `Error::PrecisionExceeded` instead of growing without bound. Unset (the
/// default) imposes no limit.
pub fn set_precision_limit<L: Limb>(limit: Option<u64>) {
    *precision_slot::<L>().lock().unwrap() = limit;
}
