//! Input validation for registration.

use crate::error::{AuthError, Result};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Whether `email` is a plausible address.
///
/// Accepts 3 to 255 characters with one `@`. The local part may use
/// letters, digits and `.-+_`. The domain needs at least one dot and no
/// empty labels.
///
/// # Examples
///
/// ```
/// use eventbook_auth::utils::is_valid_email;
///
/// assert!(is_valid_email("user@example.com"));
/// assert!(is_valid_email("user+tag@subdomain.example.com"));
/// assert!(!is_valid_email("invalid"));
/// assert!(!is_valid_email("@example.com"));
/// assert!(!is_valid_email("user@"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 255 {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    let valid_local_chars = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_');
    let valid_domain_chars = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-');

    local.chars().all(valid_local_chars)
        && domain.chars().all(valid_domain_chars)
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

/// Validate an email address.
///
/// # Errors
///
/// Returns [`AuthError::InvalidEmail`] if the address is malformed.
pub fn validate_email(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AuthError::InvalidEmail)
    }
}

/// Validate a new password.
///
/// # Errors
///
/// Returns [`AuthError::WeakPassword`] if it has fewer than
/// [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword {
            min_length: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_email_edge_cases() {
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email("us er@example.com"));
        assert!(is_valid_email("first.last@example.co.uk"));
    }

    #[test]
    fn test_password_length() {
        assert_eq!(
            validate_password("12345"),
            Err(AuthError::WeakPassword { min_length: 6 })
        );
        assert!(validate_password("123456").is_ok());
    }

    proptest! {
        #[test]
        fn generated_addresses_validate(
            local in "[a-z0-9]{1,20}",
            domain in "[a-z]{1,20}",
            tld in "[a-z]{2,6}",
        ) {
            let email = format!("{local}@{domain}.{tld}");
            prop_assert!(validate_email(&email).is_ok());
        }

        #[test]
        fn addresses_without_at_fail(s in "[a-z0-9.]{0,40}") {
            prop_assert!(!is_valid_email(&s));
        }
    }
}
