//! Component F: a bit-sequence view over a `BigNumber`. Distinct from
//! plain integer arithmetic in that it tracks an explicit bit length and a
//! `keep_leading_zeros` flag, and offers duty-cycle generation and
//! multi-operand bitwise interference aimed at synthesizing digital
//! waveforms rather than doing arithmetic.

use crate::error::Error;
use crate::limb::Limb;
use crate::magnitude;
use crate::number::BigNumber;

/// Which bitwise operator `interfere` combines its operands with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterferenceMode {
    Xor,
    And,
    Or,
}

/// A `BigNumber` reinterpreted as a bit sequence.
///
/// `bit_length`, when set, is the number of significant bits the view
/// reports regardless of how few limbs are actually non-zero; this lets a
/// caller round-trip a fixed-width bit string (e.g. `"0001"`) without its
/// leading zeros being silently dropped. `keep_leading_zeros` additionally
/// suppresses canonicalization's high-limb stripping when constructing from
/// a bit string, pre-padding to `ceil(bit_length / W)` limbs instead.
#[derive(Clone)]
pub struct BitView<L: Limb = u64> {
    value: BigNumber<L>,
    bit_length: Option<u64>,
    keep_leading_zeros: bool,
}

impl<L: Limb> BitView<L> {
    pub fn from_bignumber(value: BigNumber<L>) -> Self {
        Self {
            value,
            bit_length: None,
            keep_leading_zeros: false,
        }
    }

    /// Parses a `{0,1}*` string MSB-first, as a human reads a binary
    /// literal. With `keep_leading_zeros`, the view remembers the string's
    /// length as its `bit_length` and keeps the mantissa padded out to that
    /// many bits' worth of limbs even if the high limbs are zero.
    pub fn from_binary_string(s: &str, keep_leading_zeros: bool) -> Result<Self, Error> {
        let bit_length = s.len() as u64;
        let mut mantissa: Vec<L> = magnitude::zero();
        for ch in s.chars() {
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
        if keep_leading_zeros {
            let needed = (bit_length as usize).div_ceil(L::BITS as usize).max(1);
            if mantissa.len() < needed {
                mantissa.resize(needed, L::ZERO);
            }
        }
        Ok(Self {
            value: BigNumber::from_limbs_unsigned(mantissa),
            bit_length: Some(bit_length),
            keep_leading_zeros,
        })
    }

    pub fn bit_length(&self) -> u64 {
        self.bit_length.unwrap_or_else(|| self.significant_bits())
    }

    fn significant_bits(&self) -> u64 {
        let limbs = self.value.mantissa_limbs();
        if magnitude::is_zero(limbs) {
            return 0;
        }
        let top = limbs.len() - 1;
        let mut bits = top as u64 * L::BITS as u64;
        let mut v = limbs[top].to_u64();
        while v > 0 {
            bits += 1;
            v >>= 1;
        }
        bits
    }

    pub fn value(&self) -> &BigNumber<L> {
        &self.value
    }

    pub fn get_bit(&self, index: usize) -> bool {
        let limb_index = index / L::BITS as usize;
        let bit_index = (index % L::BITS as usize) as u32;
        let limbs = self.value.mantissa_limbs();
        if limb_index >= limbs.len() {
            return false;
        }
        (limbs[limb_index] >> bit_index) & L::ONE == L::ONE
    }

    pub fn set_bit(&mut self, index: usize, bit: bool) {
        let limb_index = index / L::BITS as usize;
        let bit_index = (index % L::BITS as usize) as u32;
        let mut limbs = self.value.mantissa_limbs().to_vec();
        if limb_index >= limbs.len() {
            limbs.resize(limb_index + 1, L::ZERO);
        }
        let mask = L::ONE << bit_index;
        if bit {
            limbs[limb_index] = limbs[limb_index] | mask;
        } else {
            limbs[limb_index] = limbs[limb_index] & !mask;
        }
        if !self.keep_leading_zeros {
            magnitude::canonicalize(&mut limbs);
        }
        self.value = BigNumber::from_limbs_unsigned(limbs);
    }

    pub fn shift_left(&self, k: u64) -> Self {
        let mantissa = magnitude::shl_bits(self.value.mantissa_limbs(), k);
        Self {
            value: BigNumber::from_limbs_unsigned(mantissa),
            bit_length: self.bit_length.map(|b| b + k),
            keep_leading_zeros: self.keep_leading_zeros,
        }
    }

    pub fn shift_right(&self, k: u64) -> Self {
        let mantissa = magnitude::shr_bits(self.value.mantissa_limbs(), k);
        Self {
            value: BigNumber::from_limbs_unsigned(mantissa),
            bit_length: self.bit_length.map(|b| b.saturating_sub(k)),
            keep_leading_zeros: self.keep_leading_zeros,
        }
    }

    /// Arithmetic addition of the two views' underlying magnitudes, not a
    /// bitwise combination — `"1010".add("1100")` is `10 + 12 = 22`
    /// (`"10110"`), not an XOR/OR. The result's bit length is left
    /// unpinned so it renders at its natural significant width, since a
    /// carry out of the operands' shared length is expected and should not
    /// be truncated away.
    pub fn add(&self, other: &Self) -> Self {
        let mantissa = magnitude::add(self.value.mantissa_limbs(), other.value.mantissa_limbs());
        Self {
            value: BigNumber::from_limbs_unsigned(mantissa),
            bit_length: None,
            keep_leading_zeros: false,
        }
    }

    /// A repeating pattern of `length` bits, `high` of every `period` bits
    /// set starting from bit 0, where `period` is inferred as `length`
    /// itself (a single on/off cycle spanning the whole view). For a
    /// repeating multi-cycle pattern, build one cycle and tile it with
    /// `interfere`/`shift_left` at the call site.
    pub fn create_duty_cycle(length: u64, high: u64) -> Result<Self, Error> {
        if high > length {
            return Err(Error::InvalidOperand("duty cycle high count exceeds length"));
        }
        let mut mantissa: Vec<L> = magnitude::zero();
        for i in 0..length {
            mantissa = magnitude::shl1(&mantissa);
            if i < high {
                mantissa = magnitude::add(&mantissa, &[L::ONE]);
            }
        }
        Ok(Self {
            value: BigNumber::from_limbs_unsigned(mantissa),
            bit_length: Some(length),
            keep_leading_zeros: true,
        })
    }

    /// Same as `create_duty_cycle`, but `high = round(length * num / den)`.
    pub fn create_duty_cycle_ratio(length: u64, num: u64, den: u64) -> Result<Self, Error> {
        if den == 0 {
            return Err(Error::DivideByZero);
        }
        let high = (length as u128 * num as u128 / den as u128) as u64;
        Self::create_duty_cycle(length, high.min(length))
    }

    /// Combines `waves` bitwise, zero-extending shorter operands to the
    /// longest one's bit length.
    pub fn interfere(waves: &[BitView<L>], mode: InterferenceMode) -> Result<Self, Error> {
        if waves.is_empty() {
            return Err(Error::InvalidOperand("interfere requires at least one wave"));
        }
        let length = waves.iter().map(|w| w.bit_length()).max().unwrap_or(0);
        let mut acc: Vec<L> = match mode {
            InterferenceMode::And => {
                let limbs = (length as usize).div_ceil(L::BITS as usize).max(1);
                vec![L::MAX; limbs]
            }
            _ => magnitude::zero(),
        };
        for wave in waves {
            let mantissa = wave.value.mantissa_limbs();
            let n = acc.len().max(mantissa.len());
            acc.resize(n, L::ZERO);
            let mut rhs = mantissa.to_vec();
            rhs.resize(n, L::ZERO);
            for i in 0..n {
                acc[i] = match mode {
                    InterferenceMode::Xor => acc[i] ^ rhs[i],
                    InterferenceMode::And => acc[i] & rhs[i],
                    InterferenceMode::Or => acc[i] | rhs[i],
                };
            }
        }
        magnitude::canonicalize(&mut acc);
        Ok(Self {
            value: BigNumber::from_limbs_unsigned(acc),
            bit_length: Some(length),
            keep_leading_zeros: true,
        })
    }

    /// A square wave alternating every `half_period` bits over `length`
    /// bits total. Named for historical compatibility with the tool this
    /// was adapted from; it does not approximate a sine wave.
    pub fn generate_blocky_sin(length: u64, half_period: u64) -> Self {
        let half_period = half_period.max(1);
        let mut mantissa: Vec<L> = magnitude::zero();
        for i in 0..length {
            mantissa = magnitude::shl1(&mantissa);
            let phase = (i / half_period) % 2;
            if phase == 0 {
                mantissa = magnitude::add(&mantissa, &[L::ONE]);
            }
        }
        Self {
            value: BigNumber::from_limbs_unsigned(mantissa),
            bit_length: Some(length),
            keep_leading_zeros: true,
        }
    }

    /// Renders the view MSB-first over its tracked `bit_length` (or the
    /// value's significant bit count if none was set).
    pub fn to_binary_string(&self) -> String {
        let n = self.bit_length();
        if n == 0 {
            return "0".to_string();
        }
        (0..n)
            .rev()
            .map(|i| if self.get_bit(i as usize) { '1' } else { '0' })
            .collect()
    }
}
