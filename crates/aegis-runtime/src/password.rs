//! Password policy gate

/// The only special characters the policy admits.
const SYMBOLS: &str = "@$!%*?&";

/// At least eight characters with one lowercase letter, one uppercase
/// letter, one digit and one symbol; nothing outside that alphabet.
pub fn validate_password(password: &str) -> bool {
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut symbol = false;

    for c in password.chars() {
        if c.is_ascii_lowercase() {
            lower = true;
        } else if c.is_ascii_uppercase() {
            upper = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else if SYMBOLS.contains(c) {
            symbol = true;
        } else {
            return false;
        }
    }

    password.len() >= 8 && lower && upper && digit && symbol
}
