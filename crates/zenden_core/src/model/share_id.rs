//! Short share identifiers.
//!
//! Keys are 10 base62 characters taken from a random v4 UUID, about 59 bits
//! of entropy. Collisions are still possible, so inserts must not overwrite.

use uuid::Uuid;

/// Length of generated share ids.
pub const SHARE_ID_LEN: usize = 10;
/// Longest id accepted on lookup.
pub const MAX_SHARE_ID_LEN: usize = 64;

const BASE62: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Generates a fresh random share id.
pub fn generate_share_id() -> String {
    let mut value = Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(SHARE_ID_LEN);
    for _ in 0..SHARE_ID_LEN {
        id.push(char::from(BASE62[(value % 62) as usize]));
        value /= 62;
    }
    id
}

/// Returns whether `id` is acceptable as a lookup key.
///
/// Accepts generated ids and older client-made keys (`-` and `_` allowed).
pub fn is_valid_share_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SHARE_ID_LEN
        && id
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_')
}
