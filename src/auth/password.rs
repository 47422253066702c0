//! Password complexity policy and bcrypt hashing.

use std::fmt;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A single unmet complexity rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordViolation {
    TooShort,
    MissingLowercase,
    MissingUppercase,
    MissingDigit,
    MissingSymbol,
}

impl PasswordViolation {
    pub fn message(&self) -> &'static str {
        match self {
            PasswordViolation::TooShort => "Erro... senha deve possuir, no mínimo, 8 caracteres",
            PasswordViolation::MissingLowercase => "Erro... senha deve possuir letra(s) minúscula(s)",
            PasswordViolation::MissingUppercase => "Erro... senha deve possuir letra(s) maiúscula(s)",
            PasswordViolation::MissingDigit => "Erro... senha deve possuir número(s)",
            PasswordViolation::MissingSymbol => "Erro... senha deve possuir símbolo(s)",
        }
    }
}

impl fmt::Display for PasswordViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Check `candidate` against every rule and return the ones it breaks.
///
/// Rules are evaluated independently and reported in a fixed order: length,
/// lowercase, uppercase, digit, symbol. Letters and digits are the ASCII
/// classes; every other character (accented letters included) counts as a
/// symbol. An empty result means the password is acceptable.
pub fn validate(candidate: &str) -> Vec<PasswordViolation> {
    let mut violations = Vec::new();

    if candidate.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(PasswordViolation::TooShort);
    }

    let (mut lower, mut upper, mut digits, mut symbols) = (0usize, 0usize, 0usize, 0usize);
    for c in candidate.chars() {
        if c.is_ascii_lowercase() {
            lower += 1;
        } else if c.is_ascii_uppercase() {
            upper += 1;
        } else if c.is_ascii_digit() {
            digits += 1;
        } else {
            symbols += 1;
        }
    }

    if lower == 0 {
        violations.push(PasswordViolation::MissingLowercase);
    }
    if upper == 0 {
        violations.push(PasswordViolation::MissingUppercase);
    }
    if digits == 0 {
        violations.push(PasswordViolation::MissingDigit);
    }
    if symbols == 0 {
        violations.push(PasswordViolation::MissingSymbol);
    }

    violations
}

/// Join violation messages the way the admin endpoint reports them.
pub fn describe(violations: &[PasswordViolation]) -> String {
    violations
        .iter()
        .map(PasswordViolation::message)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Compare a plaintext password with a stored bcrypt hash.
///
/// A stored value that is not a parseable bcrypt hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Stored password hash could not be parsed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PasswordViolation::*;

    #[test]
    fn strong_password_passes() {
        assert!(validate("Admin@123").is_empty());
        assert!(validate("xY9!xY9!").is_empty());
    }

    #[test]
    fn empty_password_breaks_every_rule() {
        assert_eq!(
            validate(""),
            vec![TooShort, MissingLowercase, MissingUppercase, MissingDigit, MissingSymbol]
        );
    }

    #[test]
    fn reports_exactly_the_missing_classes() {
        assert_eq!(validate("abcdefgh"), vec![MissingUppercase, MissingDigit, MissingSymbol]);
        assert_eq!(validate("ABCDEFG1!"), vec![MissingLowercase]);
        assert_eq!(validate("Abcdefg!"), vec![MissingDigit]);
        assert_eq!(validate("Abcdefg1"), vec![MissingSymbol]);
        assert_eq!(validate("Ab1!"), vec![TooShort]);
    }

    #[test]
    fn accented_letters_count_as_symbols() {
        assert!(validate("Senhaçã1").is_empty());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 7 chars, 9 bytes
        assert_eq!(validate("Aé1aaaa"), vec![TooShort]);
    }

    #[test]
    fn describe_joins_messages_in_order() {
        let text = describe(&validate("abc"));
        assert!(text.starts_with("Erro... senha deve possuir, no mínimo, 8 caracteres; "));
        assert!(text.ends_with("símbolo(s)"));
        assert_eq!(text.matches("; ").count(), 3);
    }

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("Admin@123", 4).unwrap();
        assert!(verify_password("Admin@123", &hash));
        assert!(!verify_password("admin@123", &hash));
        assert!(!verify_password("Admin@123", "not-a-bcrypt-hash"));
    }
}
