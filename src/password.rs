//! Level codes.
//!
//! Every level maps to a fixed six-character code from a small linear
//! congruential generator seeded with the level number. Typing the code of a
//! multiple-of-ten level jumps straight to it.

use std::collections::VecDeque;

const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LENGTH: usize = 6;
const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233_280;

/// Most recent keys kept by [`PasswordEntry`].
pub const MAX_SEQUENCE_LENGTH: usize = 20;

/// Returns the six-character code for `level`.
#[must_use]
pub fn generate_password(level: u32) -> String {
    let mut seed = u64::from(level);
    let mut password = String::with_capacity(CODE_LENGTH);

    for _ in 0..CODE_LENGTH {
        seed = (seed * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        // floor(seed / modulus * 36) without going through floats.
        let index = (seed * ALPHABET.len() as u64 / LCG_MODULUS) as usize;
        password.push(char::from(ALPHABET[index]));
    }

    password
}

/// Case-insensitive comparison of the joined `sequence` with `password`.
#[must_use]
pub fn check_password<S: AsRef<str>>(sequence: &[S], password: &str) -> bool {
    let typed: String = sequence.iter().map(AsRef::as_ref).collect();
    typed.to_uppercase() == password.to_uppercase()
}

/// Scans multiples of ten up to `max_level` for a code matching the most
/// recent keys of `sequence`.
#[must_use]
pub fn level_for_password<S: AsRef<str>>(sequence: &[S], max_level: u32) -> Option<u32> {
    if sequence.len() < CODE_LENGTH {
        return None;
    }
    let recent = &sequence[sequence.len() - CODE_LENGTH..];

    (1..=max_level / 10)
        .map(|step| step * 10)
        .find(|level| check_password(recent, &generate_password(*level)))
}

/// Rolling buffer of typed keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordEntry {
    keys: VecDeque<String>,
}

impl PasswordEntry {
    /// Records one key, upper-cased, dropping the oldest past the limit.
    pub fn add_key(&mut self, key: char) {
        self.keys.push_back(key.to_uppercase().collect());
        if self.keys.len() > MAX_SEQUENCE_LENGTH {
            let _ = self.keys.pop_front();
        }
    }

    pub fn reset(&mut self) {
        self.keys.clear();
    }

    /// Returns the buffered keys, oldest first.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.keys.iter().cloned().collect()
    }

    /// Looks the buffered keys up against every multiple-of-ten level.
    #[must_use]
    pub fn matching_level(&self, max_level: u32) -> Option<u32> {
        level_for_password(&self.keys(), max_level)
    }
}
