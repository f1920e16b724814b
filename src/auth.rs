//! Session and credential primitives.
//!
//! Passwords are hashed with PBKDF2-SHA256 through the password-hash API.
//! Sessions are random 32-byte bearer tokens carried in an HttpOnly cookie;
//! the server stores only the SHA-256 hash, so a leaked database cannot be
//! replayed as cookies.

use base64::Engine;
use chrono::{Duration, NaiveDateTime, Utc};
use pbkdf2::password_hash::rand_core::OsRng;
use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::Pbkdf2;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "ras_session";

/// Session lifetime (8 hours).
pub const SESSION_MAX_AGE_SECONDS: i64 = 60 * 60 * 8;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Pbkdf2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a stored hash. Malformed stored hashes verify
/// as false rather than erroring; they are indistinguishable from a wrong
/// password to the caller.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok()
}

/// Generate a random session token (URL-safe base64, 32 bytes of entropy).
pub fn generate_session_token() -> String {
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a session token for storage, hex-encoded.
pub fn hash_session_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Constant-time comparison of two token hashes.
pub fn token_hashes_match(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Expiry timestamp for a session created now.
pub fn session_expiry() -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::seconds(SESSION_MAX_AGE_SECONDS)
}

/// Build the Set-Cookie value for a fresh session.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={SESSION_MAX_AGE_SECONDS}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the Set-Cookie value that clears the session.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE_NAME}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// Pull the session token out of a Cookie header value.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        (name == SESSION_COOKIE_NAME && !value.is_empty()).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = hash_password("Johnson2024!").unwrap();
        assert!(verify_password("Johnson2024!", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn same_password_different_salts() {
        let a = hash_password("password123").unwrap();
        let b = hash_password("password123").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("password123", &a));
        assert!(verify_password("password123", &b));
    }

    #[test]
    fn malformed_stored_hash_rejects() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn tokens_are_unique_and_url_safe() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn token_hash_is_stable_hex() {
        let token = "fixed-token";
        let h1 = hash_session_token(token);
        let h2 = hash_session_token(token);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(token_hashes_match(&h1, &h2));
        assert!(!token_hashes_match(&h1, &hash_session_token("other")));
    }

    #[test]
    fn cookie_round_trip() {
        let cookie = session_cookie("tok123", false);
        assert!(cookie.starts_with("ras_session=tok123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));

        let secure = session_cookie("tok123", true);
        assert!(secure.ends_with("; Secure"));

        let header = format!("theme=dark; {}", "ras_session=tok123");
        assert_eq!(token_from_cookie_header(&header), Some("tok123"));
        assert_eq!(token_from_cookie_header("theme=dark"), None);
        assert_eq!(token_from_cookie_header("ras_session="), None);
    }

    #[test]
    fn clear_cookie_zeroes_max_age() {
        let cookie = clear_session_cookie();
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.starts_with("ras_session=;"));
    }

    #[test]
    fn session_expiry_is_eight_hours_out() {
        let expiry = session_expiry();
        let delta = expiry - Utc::now().naive_utc();
        assert!(delta.num_hours() >= 7 && delta.num_hours() <= 8);
    }
}
