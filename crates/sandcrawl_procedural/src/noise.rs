//! # Noise Field
//!
//! Deterministic coherent noise for the infinite world.
//!
//! ## Determinism Guarantee
//!
//! The simplex primitive uses a fixed permutation table, so it is a pure
//! function of its input. The only run-to-run variation comes from the two
//! [`NoiseOffsets`] drawn at world start: the same coordinate with the same
//! offsets gives **exactly** the same value on any platform, any time.
//!
//! ## Channels
//!
//! - [`NoiseField::smooth`]: coherent noise in `[0, 1]`, used for terrain
//! - [`NoiseField::noise`]: the smooth value scaled by `1e6` and wrapped to
//!   `[0, 1)`, which breaks the correlation between neighbouring cells
//! - [`NoiseField::noise2`]: `noise` fed back through itself, used for
//!   placement rolls that must not line up with terrain

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seed the permutation table is shuffled with. Never changes.
const PERMUTATION_SEED: u64 = 0xDEAD_BEEF_CAFE_BABE;

/// Pre-computed permutation table for noise.
struct PermutationTable {
    /// 512-entry permutation table (256 entries, doubled for overflow handling).
    perm: [u8; 512],
    /// Gradient table (12 gradients for 2D simplex).
    grad: [[i8; 2]; 12],
}

impl PermutationTable {
    fn new(seed: u64) -> Self {
        let mut perm = [0u8; 512];

        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates shuffle with xorshift64
        let mut rng_state = seed;
        for i in (1..256).rev() {
            rng_state ^= rng_state << 13;
            rng_state ^= rng_state >> 7;
            rng_state ^= rng_state << 17;

            let j = (rng_state as usize) % (i + 1);
            perm.swap(i, j);
        }

        perm.copy_within(0..256, 256);

        let grad = [
            [1, 0], [1, 1], [0, 1], [-1, 1],
            [-1, 0], [-1, -1], [0, -1], [1, -1],
            [1, 0], [0, 1], [-1, 0], [0, -1],
        ];

        Self { perm, grad }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    #[inline]
    fn gradient(&self, hash: u8) -> [i8; 2] {
        self.grad[(hash % 12) as usize]
    }
}

/// 2D Simplex noise generator.
///
/// Produces smooth, continuous noise values in the range [-1, 1].
pub struct SimplexNoise {
    perm_table: PermutationTable,
}

impl Default for SimplexNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl SimplexNoise {
    /// Skewing factor for 2D simplex grid.
    const F2: f64 = 0.366_025_403_784_439; // (sqrt(3) - 1) / 2
    /// Unskewing factor for 2D simplex grid.
    const G2: f64 = 0.211_324_865_405_187; // (3 - sqrt(3)) / 6

    /// Creates the noise generator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            perm_table: PermutationTable::new(PERMUTATION_SEED),
        }
    }

    /// Samples 2D simplex noise at the given coordinates.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        // Skew input coordinates to simplex grid
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        let unskew = f64::from(i.wrapping_add(j)) * Self::G2;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        // Upper or lower triangle
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1) + Self::G2;
        let y1 = y0 - f64::from(j1) + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let (i1, j1) = (i1 as usize, j1 as usize);

        let gi0 = self.perm_table.get(ii + self.perm_table.get(jj) as usize);
        let gi1 = self.perm_table.get(ii + i1 + self.perm_table.get(jj + j1) as usize);
        let gi2 = self.perm_table.get(ii + 1 + self.perm_table.get(jj + 1) as usize);

        let n0 = self.contribution(x0, y0, gi0);
        let n1 = self.contribution(x1, y1, gi1);
        let n2 = self.contribution(x2, y2, gi2);

        // 70.0 normalizes the sum to [-1, 1]
        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    #[inline]
    fn contribution(&self, x: f64, y: f64, gradient_index: u8) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let grad = self.perm_table.gradient(gradient_index);
            let t2 = t * t;
            t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
        }
    }
}

/// Fast floor function.
#[inline]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) { xi - 1 } else { xi }
}

/// The two integers that make one world differ from the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoiseOffsets {
    /// Added to every scaled X sample coordinate.
    pub seed_x: i32,
    /// Added to every scaled Y sample coordinate.
    pub seed_y: i32,
}

impl NoiseOffsets {
    /// Lower bound (inclusive) of a drawn offset.
    pub const MIN: i32 = 1_000;
    /// Upper bound (exclusive) of a drawn offset.
    pub const MAX: i32 = 1_000_000;

    /// Creates offsets from explicit values.
    #[inline]
    #[must_use]
    pub const fn new(seed_x: i32, seed_y: i32) -> Self {
        Self { seed_x, seed_y }
    }

    /// Draws both offsets from `rng`.
    #[must_use]
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            seed_x: rng.gen_range(Self::MIN..Self::MAX),
            seed_y: rng.gen_range(Self::MIN..Self::MAX),
        }
    }

    /// Draws fresh offsets from the thread-local generator.
    #[must_use]
    pub fn random() -> Self {
        Self::from_rng(&mut rand::thread_rng())
    }

    /// Draws both offsets deterministically from a world seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::from_rng(&mut ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Noise sampled over integer tile coordinates.
pub struct NoiseField {
    simplex: SimplexNoise,
    offsets: NoiseOffsets,
}

impl NoiseField {
    /// Sample frequency applied to tile coordinates.
    pub const FREQUENCY: f64 = 0.05;
    /// Scale applied before wrapping a smooth value into `noise`.
    const DECORRELATE: f64 = 1e6;
    /// Scale applied to `noise` values reused as coordinates in `noise2`.
    const SCATTER: f64 = 1000.0;
    /// Squared coordinates wrap at this value to stay inside `i32` simplex cells.
    const SQUARE_WRAP: i64 = 1 << 20;

    /// Creates a field for one world.
    #[must_use]
    pub fn new(offsets: NoiseOffsets) -> Self {
        Self {
            simplex: SimplexNoise::new(),
            offsets,
        }
    }

    /// Offsets this field was built with.
    #[inline]
    #[must_use]
    pub const fn offsets(&self) -> NoiseOffsets {
        self.offsets
    }

    /// Smooth noise in `[0, 1]` with an explicit offset pair.
    #[inline]
    #[must_use]
    pub fn channel(&self, x: f64, y: f64, offset_x: f64, offset_y: f64) -> f64 {
        let v = self
            .simplex
            .sample(x * Self::FREQUENCY + offset_x, y * Self::FREQUENCY + offset_y);
        (v + 1.0) * 0.5
    }

    /// Smooth noise in `[0, 1]` at a tile coordinate.
    #[inline]
    #[must_use]
    pub fn smooth(&self, x: i32, y: i32) -> f64 {
        self.smooth_at(f64::from(x), f64::from(y))
    }

    #[inline]
    fn smooth_at(&self, x: f64, y: f64) -> f64 {
        self.channel(
            x,
            y,
            f64::from(self.offsets.seed_x),
            f64::from(self.offsets.seed_y),
        )
    }

    #[inline]
    fn noise_at(&self, x: f64, y: f64) -> f64 {
        (self.smooth_at(x, y) * Self::DECORRELATE).rem_euclid(1.0)
    }

    /// Decorrelated noise in `[0, 1)` at a tile coordinate.
    #[inline]
    #[must_use]
    pub fn noise(&self, x: i32, y: i32) -> f64 {
        self.noise_at(f64::from(x), f64::from(y))
    }

    /// Higher-dispersion noise in `[0, 1)` for placement rolls.
    ///
    /// Samples `noise` at the coordinate and at its square, then uses the
    /// two results as a synthetic coordinate for a third sample.
    #[must_use]
    pub fn noise2(&self, x: i32, y: i32) -> f64 {
        let first = self.noise(x, y);
        let second = self.noise_at(Self::square_wrapped(x), Self::square_wrapped(y));
        self.noise_at(first * Self::SCATTER, second * Self::SCATTER)
    }

    #[inline]
    fn square_wrapped(v: i32) -> f64 {
        let v = i64::from(v);
        (v * v).rem_euclid(Self::SQUARE_WRAP) as f64
    }
}
