use rand::rngs::OsRng;
use rand::RngCore;

/// Random bytes drawn for each new bookmark id.
pub const BOOKMARK_ID_BYTES: usize = 16;
/// Length of the hex-encoded id.
pub const BOOKMARK_ID_LEN: usize = BOOKMARK_ID_BYTES * 2;

/// Draws a fresh bookmark id from the operating system CSPRNG.
///
/// Collisions are not checked; uniqueness is left to the store's key
/// constraint.
pub fn generate_bookmark_id() -> String {
    let mut bytes = [0u8; BOOKMARK_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn is_generated_bookmark_id(value: &str) -> bool {
    value.len() == BOOKMARK_ID_LEN
        && value
            .bytes()
            .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn generated_ids_are_lowercase_hex_of_expected_length() {
        let id = generate_bookmark_id();
        assert_eq!(id.len(), 32);
        assert!(is_generated_bookmark_id(&id), "unexpected id shape: {id}");
    }

    #[test]
    fn generated_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..1_000).map(|_| generate_bookmark_id()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn rejects_foreign_id_shapes() {
        assert!(!is_generated_bookmark_id("abc123"));
        assert!(!is_generated_bookmark_id(&"G".repeat(32)));
        assert!(!is_generated_bookmark_id(&"A".repeat(32)));
    }
}
