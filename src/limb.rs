//! The `Limb` trait abstracts over the chunk width `W` (component A's "limb
//! primitives" operate generically over it). Each implementor pairs a
//! concrete unsigned integer with the next-wider native unsigned integer,
//! used internally as the carry/widening-multiply intermediate.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};
use std::sync::{Mutex, OnceLock};

use crate::pool::Pool;

/// One limb of a little-endian, base-`2^BITS` positional number.
///
/// Implemented for `u8`, `u16`, `u32` and `u64`. `BigNumber`, `Rational` and
/// `BitView` are all generic over `L: Limb` and default to `L = u64`.
pub trait Limb:
    Copy
    + Clone
    + Debug
    + Default
    + Eq
    + Ord
    + Hash
    + Send
    + Sync
    + 'static
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    /// Width of this limb in bits. `BASE = 2^BITS`.
    const BITS: u32;
    const ZERO: Self;
    const ONE: Self;
    const MAX: Self;

    /// Truncates a host integer down to the low `BITS` bits.
    fn from_u64(v: u64) -> Self;
    /// Widens this limb to a host integer. Lossless: `BITS <= 64` always.
    fn to_u64(self) -> u64;

    /// `self + rhs + carry`, returning the sum and the carry out.
    fn carrying_add(self, rhs: Self, carry: bool) -> (Self, bool);
    /// `self - rhs - borrow`, returning the difference and the borrow out.
    fn borrowing_sub(self, rhs: Self, borrow: bool) -> (Self, bool);

    /// `self * rhs + add + carry`, split into `(low, high)` where `high` is
    /// the new carry limb (itself < BASE, never just a single bit).
    fn mul_add_carry(self, rhs: Self, add: Self, carry: Self) -> (Self, Self);

    /// `self * rhs` as a `(low, high)` pair.
    fn widening_mul(self, rhs: Self) -> (Self, Self) {
        self.mul_add_carry(rhs, Self::ZERO, Self::ZERO)
    }

    /// Divides the double-limb value `hi*BASE + lo` by `d` (`d != 0`,
    /// `hi < d`), returning `(quotient, remainder)`. Used by `divmod_small`.
    fn div_rem_double(hi: Self, lo: Self, d: Self) -> (Self, Self);

    /// Shifts right by one bit, with `carry_in` (0 or 1) inserted at the top
    /// bit. Returns `(shifted, bit shifted out)`.
    fn shr1(self, carry_in: Self) -> (Self, Self);
    /// Shifts left by one bit, with `carry_in` (0 or 1) inserted at the
    /// bottom bit. Returns `(shifted, bit shifted out)`.
    fn shl1(self, carry_in: Self) -> (Self, Self);

    fn is_odd(self) -> bool;

    /// The process-wide default `Pool<Self>`, used by operator-overload call
    /// sites that cannot thread an explicit pool handle through. Each
    /// concrete impl below owns a distinct static, since a `static` cannot
    /// itself depend on a generic parameter of an enclosing function.
    fn global_pool() -> &'static Pool<Self>;

    /// Per-width storage backing `BigNumber::<Self>`'s optional precision
    /// cap. Same reasoning as `global_pool`: the static has to live inside a
    /// concrete impl, not a function generic over `Self`.
    fn precision_cell() -> &'static OnceLock<Mutex<Option<u64>>>;
}

macro_rules! impl_limb {
    ($t:ty, $wide:ty) => {
        impl Limb for $t {
            const BITS: u32 = <$t>::BITS;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn from_u64(v: u64) -> Self {
                v as $t
            }

            #[inline]
            fn to_u64(self) -> u64 {
                self as u64
            }

            #[inline]
            fn carrying_add(self, rhs: Self, carry: bool) -> (Self, bool) {
                let (a, c1) = self.overflowing_add(rhs);
                let (b, c2) = a.overflowing_add(carry as $t);
                (b, c1 || c2)
            }

            #[inline]
            fn borrowing_sub(self, rhs: Self, borrow: bool) -> (Self, bool) {
                let (a, b1) = self.overflowing_sub(rhs);
                let (b, b2) = a.overflowing_sub(borrow as $t);
                (b, b1 || b2)
            }

            #[inline]
            fn mul_add_carry(self, rhs: Self, add: Self, carry: Self) -> (Self, Self) {
                let acc = (self as $wide) * (rhs as $wide) + (add as $wide) + (carry as $wide);
                (acc as $t, (acc >> <$t>::BITS) as $t)
            }

            #[inline]
            fn div_rem_double(hi: Self, lo: Self, d: Self) -> (Self, Self) {
                let num = ((hi as $wide) << <$t>::BITS) | (lo as $wide);
                ((num / (d as $wide)) as $t, (num % (d as $wide)) as $t)
            }

            #[inline]
            fn shr1(self, carry_in: Self) -> (Self, Self) {
                let out_bit = self & 1;
                let shifted = (self >> 1) | (carry_in << (<$t>::BITS - 1));
                (shifted, out_bit)
            }

            #[inline]
            fn shl1(self, carry_in: Self) -> (Self, Self) {
                let out_bit = (self >> (<$t>::BITS - 1)) & 1;
                let shifted = (self << 1) | carry_in;
                (shifted, out_bit)
            }

            #[inline]
            fn is_odd(self) -> bool {
                self & 1 == 1
            }

            fn global_pool() -> &'static Pool<Self> {
                static POOL: OnceLock<Pool<$t>> = OnceLock::new();
                POOL.get_or_init(Pool::new)
            }

            fn precision_cell() -> &'static OnceLock<Mutex<Option<u64>>> {
                static CELL: OnceLock<Mutex<Option<u64>>> = OnceLock::new();
                &CELL
            }
        }
    };
}

impl_limb!(u8, u16);
impl_limb!(u16, u32);
impl_limb!(u32, u64);
impl_limb!(u64, u128);
