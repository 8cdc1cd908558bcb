use uuid::Uuid;

/// Opaque token generation capability.
///
/// Tokens are hyphenated UUIDv4 strings: 122 bits of randomness, which makes
/// them unpredictable and effectively unique for the process lifetime without
/// consulting any store.
#[derive(Debug, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh opaque token.
    pub fn new_token(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_token_is_uuid() {
        let tokens = TokenGenerator::new();
        let token = tokens.new_token();

        assert!(Uuid::parse_str(&token).is_ok());
        assert_eq!(token.len(), 36);
    }

    #[test]
    fn test_tokens_do_not_repeat() {
        let tokens = TokenGenerator::new();
        let generated: HashSet<String> = (0..1000).map(|_| tokens.new_token()).collect();
        assert_eq!(generated.len(), 1000);
    }
}
