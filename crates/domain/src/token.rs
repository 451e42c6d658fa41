//! Random opaque tokens.

use rand::RngCore;

/// Return `nbytes` random bytes encoded as lowercase hex (`2 * nbytes` chars).
#[must_use]
pub fn token_hex(nbytes: usize) -> String {
    let mut bytes = vec![0u8; nbytes];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_encode_two_hex_chars_per_byte() {
        let token = token_hex(6);
        assert_eq!(token.len(), 12);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn should_return_empty_string_for_zero_bytes() {
        assert_eq!(token_hex(0), "");
    }

    #[test]
    fn should_differ_between_calls() {
        assert_ne!(token_hex(16), token_hex(16));
    }
}
