//! Chunk-size (limb width) auto-tuning. Since `L` is a Rust type parameter
//! fixed at compile time rather than a runtime value, this module runs the
//! literal benchmark the original design describes and exposes its result
//! as advisory diagnostics: which concrete `BigNumber<L>` instantiation a
//! caller should prefer, not something the library switches into on its own.

use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

use crate::limb::Limb;
use crate::mul;
use crate::pool::Pool;

/// One of the four candidate limb widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkWidth {
    W8,
    W16,
    W32,
    W64,
}

impl ChunkWidth {
    pub fn bits(self) -> u32 {
        match self {
            ChunkWidth::W8 => 8,
            ChunkWidth::W16 => 16,
            ChunkWidth::W32 => 32,
            ChunkWidth::W64 => 64,
        }
    }
}

static OVERRIDE: OnceLock<Mutex<Option<ChunkWidth>>> = OnceLock::new();
static CACHED: OnceLock<ChunkWidth> = OnceLock::new();

fn override_slot() -> &'static Mutex<Option<ChunkWidth>> {
    OVERRIDE.get_or_init(|| Mutex::new(None))
}

/// Pins the recommendation to `w`, skipping the benchmark outright. Intended
/// for reproducible tests.
pub fn set_chunk_width(w: ChunkWidth) {
    *override_slot().lock().unwrap() = Some(w);
}

/// Clears a previously set override, re-enabling the benchmark on next call.
pub fn clear_chunk_width_override() {
    *override_slot().lock().unwrap() = None;
}

/// Returns the process-frozen recommended chunk width, benchmarking on first
/// use if no override is set.
pub fn recommended_chunk_width() -> ChunkWidth {
    if let Some(w) = *override_slot().lock().unwrap() {
        return w;
    }
    *CACHED.get_or_init(benchmark_all)
}

fn benchmark_all() -> ChunkWidth {
    let candidates = [
        ChunkWidth::W8,
        ChunkWidth::W16,
        ChunkWidth::W32,
        ChunkWidth::W64,
    ];
    let mut best = ChunkWidth::W64;
    let mut best_time = Duration::MAX;
    for candidate in candidates {
        let elapsed = match candidate {
            ChunkWidth::W8 => bench_mul::<u8>(),
            ChunkWidth::W16 => bench_mul::<u16>(),
            ChunkWidth::W32 => bench_mul::<u32>(),
            ChunkWidth::W64 => bench_mul::<u64>(),
        };
        log::debug!("chunk width {candidate:?} took {elapsed:?} for the 1024-bit benchmark");
        if elapsed < best_time {
            best_time = elapsed;
            best = candidate;
        }
    }
    log::info!("auto-selected chunk width {best:?}");
    best
}

const BENCH_BIT_LENGTH: usize = 1024;
const BENCH_TRIALS: usize = 10;
const BENCH_REPETITIONS: usize = 3;

fn bench_mul<L: Limb>() -> Duration {
    let pool = Pool::<L>::new();
    let limbs_needed = BENCH_BIT_LENGTH.div_ceil(L::BITS as usize);
    let mut seed: u64 = 0x243F_6A88_85A3_08D3;
    let start = Instant::now();
    for _ in 0..BENCH_TRIALS {
        let a = random_limbs::<L>(limbs_needed, &mut seed);
        let b = random_limbs::<L>(limbs_needed, &mut seed);
        for _ in 0..BENCH_REPETITIONS {
            let _ = mul::multiply(&a, &b, &pool);
        }
    }
    start.elapsed()
}

fn random_limbs<L: Limb>(n: usize, seed: &mut u64) -> Vec<L> {
    (0..n)
        .map(|_| {
            *seed = splitmix64(*seed);
            L::from_u64(*seed)
        })
        .collect()
}

/// A small, deterministic, non-cryptographic PRNG, used only to generate
/// benchmark operands with a fixed seed (no `rand` dependency needed for
/// this one-shot diagnostic).
fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
