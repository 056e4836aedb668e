//! Room code generation.

use rand::Rng;

/// Length of every room code.
pub const ROOM_CODE_LEN: usize = 6;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Draws a random code of uppercase letters and digits.
pub(crate) fn generate(rng: &mut impl Rng) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect()
}
