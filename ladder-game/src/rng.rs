//! Seeded RNG streams segregated by domain.
//!
//! A single user-visible seed (usually decoded from a round code) fans out
//! into independent streams, so drawing suggestions never shifts the rung
//! layout of the same seed.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

use crate::constants::{LAYOUT_STREAM, SUGGEST_STREAM};

/// Derive a per-domain seed from the user seed.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("HMAC accepts any key length");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Portable stream used for rung generation.
#[must_use]
pub fn layout_rng(user_seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(derive_stream_seed(user_seed, LAYOUT_STREAM))
}

/// Portable stream used for catalog suggestions.
#[must_use]
pub fn suggestion_rng(user_seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(derive_stream_seed(user_seed, SUGGEST_STREAM))
}
