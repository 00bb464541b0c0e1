//! Validation utilities for authentication.

/// Minimum password length requirement.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length requirement.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Specific password validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordValidationError {
    /// Password is too short.
    TooShort { min: usize, actual: usize },
    /// Password is too long.
    TooLong { max: usize, actual: usize },
    /// Missing uppercase letter.
    MissingUppercase,
    /// Missing lowercase letter.
    MissingLowercase,
    /// Missing digit.
    MissingDigit,
}

impl std::fmt::Display for PasswordValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort { min, actual } => {
                write!(f, "Password too short: {actual} characters (minimum {min})")
            }
            Self::TooLong { max, actual } => {
                write!(f, "Password too long: {actual} characters (maximum {max})")
            }
            Self::MissingUppercase => {
                write!(f, "Password must contain at least one uppercase letter")
            }
            Self::MissingLowercase => {
                write!(f, "Password must contain at least one lowercase letter")
            }
            Self::MissingDigit => write!(f, "Password must contain at least one digit"),
        }
    }
}

/// Validate a password against the complexity requirements.
///
/// Requirements:
/// - 8 to 128 characters
/// - At least 1 uppercase letter (A-Z)
/// - At least 1 lowercase letter (a-z)
/// - At least 1 digit (0-9)
///
/// Returns the list of violations; empty means the password is acceptable.
#[must_use]
pub fn validate_password_complexity(password: &str) -> Vec<PasswordValidationError> {
    let mut errors = Vec::new();
    let len = password.chars().count();

    if len < MIN_PASSWORD_LENGTH {
        errors.push(PasswordValidationError::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual: len,
        });
    }

    if len > MAX_PASSWORD_LENGTH {
        errors.push(PasswordValidationError::TooLong {
            max: MAX_PASSWORD_LENGTH,
            actual: len,
        });
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push(PasswordValidationError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push(PasswordValidationError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(PasswordValidationError::MissingDigit);
    }

    errors
}

/// Normalize an email address for storage and lookup.
///
/// Lowercases the entire address. Emails are compared case-insensitively,
/// so `User@Example.COM` and `user@example.com` are the same account.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_password() {
        assert!(validate_password_complexity("SecurePass1").is_empty());
    }

    #[test]
    fn too_short() {
        let errors = validate_password_complexity("Ab1");
        assert!(errors.contains(&PasswordValidationError::TooShort { min: 8, actual: 3 }));
    }

    #[test]
    fn missing_character_classes() {
        let errors = validate_password_complexity("alllowercase1");
        assert!(errors.contains(&PasswordValidationError::MissingUppercase));

        let errors = validate_password_complexity("ALLUPPERCASE1");
        assert!(errors.contains(&PasswordValidationError::MissingLowercase));

        let errors = validate_password_complexity("NoDigitsHere");
        assert!(errors.contains(&PasswordValidationError::MissingDigit));
    }

    #[test]
    fn normalize_email_lowercases() {
        assert_eq!(normalize_email("User@Example.COM"), "user@example.com");
    }
}
