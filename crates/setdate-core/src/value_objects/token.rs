//! Opaque secret token generation
//!
//! Tokens use a restricted alphabet that drops visually ambiguous
//! characters (`l`, `1`, `0` and all uppercase), since onboarding tokens
//! end up in emails and are occasionally retyped by hand.

use rand::Rng;

/// Alphabet for generated secrets; excludes visually ambiguous characters.
pub const TOKEN_ALPHABET: &[u8] = b"abcdefghijkmnopqrstuvwxyz23456789";

/// Length of one-time partner onboarding tokens.
pub const ONBOARDING_TOKEN_LEN: usize = 28;

/// Length of poll edit tokens.
pub const EDIT_TOKEN_LEN: usize = 22;

fn generate_token(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..TOKEN_ALPHABET.len());
            TOKEN_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a one-time onboarding token.
pub fn generate_onboarding_token() -> String {
    generate_token(ONBOARDING_TOKEN_LEN)
}

/// Generate a poll edit token.
///
/// Possession of this token, not identity, authorises poll mutation; the
/// organiser can forward the edit link to a co-host.
pub fn generate_edit_token() -> String {
    generate_token(EDIT_TOKEN_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onboarding_token_shape() {
        let token = generate_onboarding_token();
        assert_eq!(token.len(), ONBOARDING_TOKEN_LEN);
        assert!(token.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_edit_token_shape() {
        let token = generate_edit_token();
        assert_eq!(token.len(), EDIT_TOKEN_LEN);
        assert!(token.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_onboarding_token();
        let b = generate_onboarding_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_alphabet_excludes_ambiguous_characters() {
        for ambiguous in [b'l', b'1', b'0', b'O', b'I'] {
            assert!(!TOKEN_ALPHABET.contains(&ambiguous));
        }
    }
}
