//! Shape checks applied to credentials before any store access.

use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};

/// Minimum length for both logins and passwords
pub const MIN_CREDENTIAL_LEN: usize = 8;

/// A login needs at least [`MIN_CREDENTIAL_LEN`] bytes, an ASCII digit and an
/// ASCII letter.
pub fn check_login(login: &str) -> bool {
    login.len() >= MIN_CREDENTIAL_LEN
        && login.bytes().any(|b| b.is_ascii_digit())
        && login.bytes().any(|b| b.is_ascii_alphabetic())
}

/// A password needs at least [`MIN_CREDENTIAL_LEN`] bytes, a lowercase and an
/// uppercase ASCII letter, an ASCII digit, and one special character.
pub fn check_password(password: &str) -> bool {
    password.len() >= MIN_CREDENTIAL_LEN
        && password.bytes().any(|b| b.is_ascii_lowercase())
        && password.bytes().any(|b| b.is_ascii_uppercase())
        && password.bytes().any(|b| b.is_ascii_digit())
        && password.chars().any(is_special)
}

/// Anything outside the Unicode letter categories and `Nd`. Other numerics
/// such as superscripts or roman numerals count as special.
fn is_special(c: char) -> bool {
    c.general_category_group() != GeneralCategoryGroup::Letter
        && c.general_category() != GeneralCategory::DecimalNumber
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_login() {
        assert!(check_login("login345"));
        assert!(check_login("12345678a"));
        // too short
        assert!(!check_login("login"));
        assert!(!check_login("log1"));
        // no digit
        assert!(!check_login("loginlogin"));
        // no letter
        assert!(!check_login("1234567890"));
        assert!(!check_login(""));
    }

    #[test]
    fn test_check_password() {
        assert!(check_password("Passw_345"));
        assert!(check_password("aB3!aB3!"));
        // too short
        assert!(!check_password("Pa_3"));
        // no special character
        assert!(!check_password("Passw345"));
        // non-decimal numerics are special, decimal digits and letters in any script are not
        assert!(check_password("Passw\u{b2}345"));
        assert!(check_password("Passw\u{216b}345"));
        assert!(!check_password("Passw\u{e9}345"));
        assert!(!check_password("Passw\u{663}345"));
        // no uppercase
        assert!(!check_password("passw_345"));
        // no lowercase
        assert!(!check_password("PASSW_345"));
        // no digit
        assert!(!check_password("Passw_abc"));
        assert!(!check_password(""));
    }
}
