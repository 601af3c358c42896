//! Username derivation from email addresses.
//!
//! The deriver is pure: it never consults storage. Collision resolution walks
//! [`candidates`] against the credential store in the user service.

/// Fallback when an email yields nothing usable.
const FALLBACK: &str = "user";
const MIN_LENGTH: usize = 3;
const MAX_BASE_LENGTH: usize = 30;

/// Highest numeric suffix tried before giving up on a base.
pub const MAX_SUFFIX: u32 = 999;

/// Derive the base username for an email address.
///
/// Takes the part before the first `@`, keeps ASCII letters, digits and
/// underscore, and lowercases the result. Bases shorter than three
/// characters get `user` appended; longer than thirty are truncated.
///
/// # Examples
/// ```
/// use enquiry_service::user::username::derive_username;
///
/// assert_eq!(derive_username("John.Doe123@example.com"), "johndoe123");
/// assert_eq!(derive_username("ab@example.com"), "abuser");
/// assert_eq!(derive_username(""), "user");
/// ```
pub fn derive_username(email: &str) -> String {
    if email.is_empty() {
        return FALLBACK.to_string();
    }

    let local_part = email.split('@').next().unwrap_or_default();

    let mut base: String = local_part
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if base.len() < MIN_LENGTH {
        base.push_str(FALLBACK);
    }
    // Only ASCII survives the filter, so byte truncation is safe
    base.truncate(MAX_BASE_LENGTH);

    base
}

/// Candidate usernames for a base, in the order they are tried.
///
/// Yields `base`, then `base1` through `base999`.
pub fn candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string())
        .chain((1..=MAX_SUFFIX).map(move |suffix| format!("{}{}", base, suffix)))
}
