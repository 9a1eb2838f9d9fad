//! Index entropy sources.
//!
//! Index draws must be unpredictable to any single caller in production and
//! fully reproducible in tests, so the source is injected.

use crate::core::{Hash256, Identity};
use rand::rngs::OsRng;
use rand::RngCore;

/// Source of pseudo-random shard indexes.
pub trait EntropySource: Send {
    /// Draw an index in `[0, space)` on behalf of `caller`. `space` is never zero.
    fn draw_index(&mut self, caller: &Identity, space: u8) -> u8;
}

/// Keccak-based source mixing caller, a monotonic nonce and ledger entropy.
pub struct KeccakEntropy<R: RngCore> {
    rng: R,
    nonce: u64,
}

impl<R: RngCore> KeccakEntropy<R> {
    /// Create a source drawing ledger entropy from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng, nonce: 0 }
    }

    /// Number of indexes drawn so far.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }
}

impl KeccakEntropy<OsRng> {
    /// Create a source backed by the operating system RNG.
    pub fn from_os_rng() -> Self {
        Self::new(OsRng)
    }
}

impl<R: RngCore + Send> EntropySource for KeccakEntropy<R> {
    fn draw_index(&mut self, caller: &Identity, space: u8) -> u8 {
        let mut seed = [0u8; 32];
        self.rng.fill_bytes(&mut seed);
        let nonce = self.nonce;
        self.nonce = self.nonce.wrapping_add(1);

        let digest = Hash256::keccak(&[
            caller.as_bytes().as_slice(),
            nonce.to_be_bytes().as_slice(),
            seed.as_slice(),
        ]);
        index_from_digest(&digest, space)
    }
}

/// Reduce the leading eight digest bytes into `[0, space)`.
fn index_from_digest(digest: &Hash256, space: u8) -> u8 {
    let mut wide = [0u8; 8];
    wide.copy_from_slice(&digest.0[..8]);
    (u64::from_be_bytes(wide) % u64::from(space)) as u8
}

/// Deterministic source cycling through a fixed sequence.
#[derive(Clone, Debug)]
pub struct FixedEntropy {
    values: Vec<u8>,
    position: usize,
}

impl FixedEntropy {
    /// Create a source yielding `values` in order, wrapping around.
    ///
    /// An empty sequence always yields zero.
    pub fn new(values: impl Into<Vec<u8>>) -> Self {
        Self {
            values: values.into(),
            position: 0,
        }
    }
}

impl EntropySource for FixedEntropy {
    fn draw_index(&mut self, _caller: &Identity, space: u8) -> u8 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value % space
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fixed_sequence_wraps() {
        let caller = Identity::from_label("oracle");
        let mut source = FixedEntropy::new(vec![1, 2, 13]);

        let draws: Vec<u8> = (0..5).map(|_| source.draw_index(&caller, 10)).collect();
        assert_eq!(draws, vec![1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_fixed_empty_yields_zero() {
        let mut source = FixedEntropy::new(Vec::new());
        assert_eq!(source.draw_index(&Identity::from_label("x"), 10), 0);
    }

    #[test]
    fn test_keccak_stays_in_range() {
        let caller = Identity::from_label("oracle");
        let mut source = KeccakEntropy::new(StdRng::seed_from_u64(7));

        for _ in 0..500 {
            assert!(source.draw_index(&caller, 10) < 10);
        }
        assert_eq!(source.nonce(), 500);
    }

    #[test]
    fn test_keccak_reproducible_with_seeded_rng() {
        let caller = Identity::from_label("oracle");
        let mut a = KeccakEntropy::new(StdRng::seed_from_u64(42));
        let mut b = KeccakEntropy::new(StdRng::seed_from_u64(42));

        let left: Vec<u8> = (0..20).map(|_| a.draw_index(&caller, 10)).collect();
        let right: Vec<u8> = (0..20).map(|_| b.draw_index(&caller, 10)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_keccak_covers_index_space() {
        let caller = Identity::from_label("oracle");
        let mut source = KeccakEntropy::new(StdRng::seed_from_u64(1));
        let mut seen = [false; 10];

        for _ in 0..1000 {
            seen[source.draw_index(&caller, 10) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_index_uses_wide_digest() {
        let mut bytes = [0u8; 32];
        bytes[7] = 0x0b;
        assert_eq!(index_from_digest(&Hash256(bytes), 10), 1);

        // 0x01_00 = 256; a single-byte reduction would yield 0.
        let mut bytes = [0u8; 32];
        bytes[6] = 0x01;
        assert_eq!(index_from_digest(&Hash256(bytes), 10), 6);

        // Bytes past the eighth do not contribute.
        let mut bytes = [0u8; 32];
        bytes[8] = 0xff;
        assert_eq!(index_from_digest(&Hash256(bytes), 10), 0);
    }

    #[test]
    fn test_keccak_draws_are_balanced() {
        let caller = Identity::from_label("oracle");
        let mut source = KeccakEntropy::new(StdRng::seed_from_u64(3));
        let mut counts = [0usize; 10];

        for _ in 0..20_000 {
            counts[source.draw_index(&caller, 10) as usize] += 1;
        }
        for count in counts {
            assert!((1_700..=2_300).contains(&count), "count {count}");
        }
    }

    #[test]
    fn test_os_rng_source() {
        let mut source = KeccakEntropy::from_os_rng();
        assert!(source.draw_index(&Identity::from_label("x"), 3) < 3);
    }
}
