//! ChaCha20 keystream plumbing: seeding, state folding, interval drawing.
//!
//! Pure functions over the stream-cipher state — no I/O. The wrapper in
//! [`crate::rng`] decides *when* to reseed; this module is the single place
//! that knows *how* cipher state is built and replaced.

use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::ChaCha20;

use crate::DecayRngError;

/// ChaCha20 key size in bytes.
pub const KEY_LEN: usize = 32;
/// ChaCha20 (IETF) nonce size in bytes.
pub const NONCE_LEN: usize = 12;
/// Raw bytes consumed from the detector per seed: key ‖ nonce.
pub const SEED_LEN: usize = KEY_LEN + NONCE_LEN;

/// Build a cipher from `SEED_LEN` bytes of seed material (key ‖ nonce).
pub fn init(seed: &[u8]) -> Result<ChaCha20, DecayRngError> {
    if seed.len() != SEED_LEN {
        return Err(DecayRngError::Cipher(format!(
            "Seed must be {} bytes, got {}",
            SEED_LEN,
            seed.len()
        )));
    }
    ChaCha20::new_from_slices(&seed[..KEY_LEN], &seed[KEY_LEN..])
        .map_err(|e| DecayRngError::Cipher(e.to_string()))
}

/// Fold fresh detector bytes through the outgoing cipher.
///
/// The reseed never keys the new cipher from raw hardware bytes alone: the
/// fresh material is XORed with the current cipher's keystream, so the old
/// state is carried into the new seed.
pub fn fold(current: &mut ChaCha20, fresh: &[u8; SEED_LEN]) -> [u8; SEED_LEN] {
    let mut seed = *fresh;
    current.apply_keystream(&mut seed);
    seed
}

/// Draw the next reseed interval from the cipher's own keystream.
///
/// Eight keystream bytes, read as a big-endian integer and reduced into
/// `[base, 2*base)`. Drawing from the freshly keyed cipher keeps the
/// schedule externally unpredictable without spending detector entropy.
pub fn draw_interval(cipher: &mut ChaCha20, base: u64) -> u64 {
    let mut fuzz = [0u8; 8];
    cipher.apply_keystream(&mut fuzz);
    base + u64::from_be_bytes(fuzz) % base
}
