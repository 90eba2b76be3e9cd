use super::*;

// =============================================================================
// normalize_email
// =============================================================================

#[test]
fn normalize_email_lowercases_and_trims() {
    assert_eq!(
        normalize_email("  Ada@Example.COM "),
        Some("ada@example.com".to_owned())
    );
}

#[test]
fn normalize_email_rejects_missing_at() {
    assert_eq!(normalize_email("ada.example.com"), None);
}

#[test]
fn normalize_email_rejects_empty_sides() {
    assert_eq!(normalize_email("@example.com"), None);
    assert_eq!(normalize_email("ada@"), None);
    assert_eq!(normalize_email(""), None);
}

#[test]
fn normalize_email_rejects_double_at() {
    assert_eq!(normalize_email("a@b@c"), None);
}

// =============================================================================
// Password hashing
// =============================================================================

#[test]
fn generate_salt_is_32_hex_chars() {
    let salt = generate_salt();
    assert_eq!(salt.len(), 32);
    assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_salt_two_calls_differ() {
    assert_ne!(generate_salt(), generate_salt());
}

#[test]
fn hash_password_is_deterministic_per_salt() {
    assert_eq!(hash_password("secret", "ab"), hash_password("secret", "ab"));
}

#[test]
fn hash_password_varies_with_salt() {
    assert_ne!(hash_password("secret", "ab"), hash_password("secret", "cd"));
}

#[test]
fn hash_password_varies_with_password() {
    assert_ne!(hash_password("secret", "ab"), hash_password("secrets", "ab"));
}

// =============================================================================
// digests_match
// =============================================================================

#[test]
fn digests_match_equal_strings() {
    let digest = hash_password("secret", "ab");
    assert!(digests_match(&digest, &digest.clone()));
}

#[test]
fn digests_match_rejects_difference() {
    assert!(!digests_match("aa", "ab"));
}

#[test]
fn digests_match_rejects_length_mismatch() {
    assert!(!digests_match("aaa", "aa"));
}
