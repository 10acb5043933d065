//! Human-readable invite codes.

use rand::Rng;

/// Symbols a code may contain. `I`, `O`, `0` and `1` are left out so codes
/// survive being read aloud or retyped.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub const CODE_LENGTH: usize = 6;

/// Draws random invite codes. Codes are not checked for uniqueness.
#[derive(Debug, Clone, Copy, Default)]
pub struct InviteCodeGenerator;

impl InviteCodeGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        (0..CODE_LENGTH)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect()
    }
}

/// Whether `code` has the shape of an issued invite code.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| CODE_ALPHABET.contains(&b))
}
