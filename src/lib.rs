//! Arbitrary-precision integers, exact rationals and bit-oriented views
//! over a generic chunk-limb core.
//!
//! The limb width is a compile-time type parameter (`L: Limb`, defaulting
//! to `u64`) rather than a runtime setting: [`tuning::recommended_chunk_width`]
//! still runs the process-wide benchmark the design calls for, but its
//! result is advisory rather than something the library switches into on
//! its own.

pub mod bitview;
pub mod error;
pub mod limb;
pub mod magnitude;
pub mod mul;
pub mod number;
pub mod pool;
pub mod rational;
pub mod tuning;

#[cfg(test)]
mod tests;

pub use bitview::{BitView, InterferenceMode};
pub use error::Error;
pub use limb::Limb;
pub use number::{set_precision_limit, BigNumber};
pub use pool::{MetricsSnapshot, Pool, PoolBuffer, Strategy};
pub use rational::Rational;
pub use tuning::{
    clear_chunk_width_override, recommended_chunk_width, set_chunk_width, ChunkWidth,
};
