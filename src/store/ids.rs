//! Short random base-36 identifiers.

use ring::rand::{SecureRandom, SystemRandom};
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of record and user ids.
pub const ID_LEN: usize = 7;

/// Largest multiple of 36 that fits in a byte; higher bytes are rejected
/// so every digit is equally likely.
const ACCEPT_BELOW: u8 = 252;

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a record/user id. Uniqueness is probabilistic only.
pub fn generate_id() -> String {
    random_base36(ID_LEN)
}

/// Random lowercase base-36 string of `len` characters.
pub fn random_base36(len: usize) -> String {
    let mut out = String::with_capacity(len);
    let mut buf = [0u8; 16];

    while out.len() < len {
        fill_random(&mut buf);
        for &byte in &buf {
            if byte < ACCEPT_BELOW && out.len() < len {
                out.push(ALPHABET[(byte % 36) as usize] as char);
            }
        }
    }
    out
}

fn fill_random(buf: &mut [u8]) {
    if SystemRandom::new().fill(buf).is_ok() {
        return;
    }

    tracing::warn!("System RNG unavailable, using per-process hasher seed");
    for chunk in buf.chunks_mut(8) {
        let mut hasher = RandomState::new().build_hasher();
        hasher.write_u64(FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed));
        let bytes = hasher.finish().to_le_bytes();
        chunk.copy_from_slice(&bytes[..chunk.len()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), ID_LEN);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_ids_do_not_repeat_in_practice() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_random_base36_honors_length() {
        assert_eq!(random_base36(0), "");
        assert_eq!(random_base36(40).len(), 40);
    }
}
