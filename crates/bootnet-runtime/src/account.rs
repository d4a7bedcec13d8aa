//! Funded account: random password plus a keystore entry.

use rand::Rng;

/// Password alphabet: 52 letters, 10 digits, 8 punctuation marks.
pub const PASSWORD_ALPHABET: &[u8; 70] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

/// Draw `len` characters uniformly from [`PASSWORD_ALPHABET`].
pub fn generate_password<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| PASSWORD_ALPHABET[rng.gen_range(0..PASSWORD_ALPHABET.len())] as char)
        .collect()
}
