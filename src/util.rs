//! Shared utility functions used across the codebase.

use rand::RngCore;

/// Number of random bytes in a generated API key.
pub const API_KEY_BYTES: usize = 32;

/// Compare two secrets without short-circuiting on the first differing byte.
///
/// Lengths are compared up front; only the content comparison is constant-time.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();
    if a_bytes.len() != b_bytes.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a_bytes.iter().zip(b_bytes) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Generate a random API key: 32 bytes from the OS-seeded RNG, hex encoded.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; API_KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
