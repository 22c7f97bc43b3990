//! Base62 codec between sequence values and fixed-width short codes.
//!
//! Codes are the positional base62 representation of a sequence value, left-padded with
//! the first alphabet symbol to [`CODE_LENGTH`] characters. The alphabet order defines the
//! bijection, so it must never change once codes have been issued.
//!
//! | value | code     |
//! |-------|----------|
//! | 0     | `000000` |
//! | 1     | `000001` |
//! | 61    | `00000Z` |
//! | 62    | `000010` |
//!
//! Values that need more than [`CODE_LENGTH`] symbols are rejected with
//! [`CodecError::CapacityExceeded`] instead of being truncated.

use thiserror::Error;

/// Symbols in code order: digits, lowercase, uppercase.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Fixed width of every issued code.
pub const CODE_LENGTH: usize = 6;

/// Number of distinct codes, `62^6`. Valid values are `0..CAPACITY`.
pub const CAPACITY: u64 = 56_800_235_584;

const BASE: u64 = ALPHABET.len() as u64;

const INVALID: u8 = u8::MAX;

/// Reverse lookup from ASCII byte to alphabet index.
const DECODE_TABLE: [u8; 128] = build_decode_table();

const fn build_decode_table() -> [u8; 128] {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Errors produced by [`encode`] and [`decode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("value {0} does not fit in a 6-character code")]
    CapacityExceeded(u64),

    #[error("invalid character {found:?} at position {position}")]
    InvalidCharacter { found: char, position: usize },

    #[error("code must be exactly 6 characters, got {0}")]
    InvalidLength(usize),
}

/// Encodes a sequence value as a fixed-width code.
///
/// # Errors
///
/// Returns [`CodecError::CapacityExceeded`] when `value >= CAPACITY`.
pub fn encode(value: u64) -> Result<String, CodecError> {
    if value >= CAPACITY {
        return Err(CodecError::CapacityExceeded(value));
    }

    let mut buf = [ALPHABET[0]; CODE_LENGTH];
    let mut n = value;
    let mut pos = CODE_LENGTH;

    while n > 0 {
        pos -= 1;
        buf[pos] = ALPHABET[(n % BASE) as usize];
        n /= BASE;
    }

    Ok(buf.iter().map(|&b| b as char).collect())
}

/// Decodes a code back into its sequence value.
///
/// # Errors
///
/// Returns [`CodecError::InvalidLength`] if `code` is not exactly [`CODE_LENGTH`]
/// characters, and [`CodecError::InvalidCharacter`] for any symbol outside [`ALPHABET`].
pub fn decode(code: &str) -> Result<u64, CodecError> {
    let len = code.chars().count();
    if len != CODE_LENGTH {
        return Err(CodecError::InvalidLength(len));
    }

    code.chars()
        .enumerate()
        .try_fold(0u64, |acc, (position, ch)| {
            let index = symbol_index(ch)
                .ok_or(CodecError::InvalidCharacter { found: ch, position })?;
            Ok(acc * BASE + index)
        })
}

/// Returns true if `code` has the fixed width and uses only alphabet symbols.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.chars().all(|c| symbol_index(c).is_some())
}

fn symbol_index(ch: char) -> Option<u64> {
    if !ch.is_ascii() {
        return None;
    }

    match DECODE_TABLE[ch as usize] {
        INVALID => None,
        index => Some(u64::from(index)),
    }
}
