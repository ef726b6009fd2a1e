//! Security-focused integration tests.
//!
//! Verifies properties the HTTP layer relies on:
//!
//! - A session token cannot be re-signed into another identity or role
//! - Expiry is exclusive and checked against the caller's clock
//! - Password hashes are salted and never accept near-misses

#![allow(clippy::unwrap_used)] // Test code uses unwrap for brevity

use chrono::{DateTime, Duration, TimeZone, Utc};
use eventbook_auth::password::MIN_COST;
use eventbook_auth::{AuthError, PasswordHasher, TokenIssuer};
use eventbook_core::types::{Role, User, UserId};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn account(email: &str, role: Role) -> User {
    User {
        id: UserId::new(),
        name: None,
        email: email.to_string(),
        password_hash: String::new(),
        role,
        created_at: t0(),
    }
}

/// Splice the payload of one token onto the signature of another.
fn splice(payload_from: &str, signature_from: &str) -> String {
    let payload: Vec<&str> = payload_from.split('.').collect();
    let signed: Vec<&str> = signature_from.split('.').collect();
    format!("{}.{}.{}", payload[0], payload[1], signed[2])
}

#[test]
fn test_payload_swap_is_rejected() {
    let issuer = TokenIssuer::new(b"server-secret", Duration::days(7));
    let user_token = issuer.issue(&account("ada@example.com", Role::User), t0()).unwrap();
    let admin_token = issuer
        .issue(&account("admin@example.com", Role::Admin), t0())
        .unwrap();

    // Admin claims carried by the user's signature.
    let forged = splice(&admin_token, &user_token);
    assert_eq!(issuer.verify(&forged, t0()), Err(AuthError::InvalidToken));

    // The untouched tokens keep their roles.
    assert!(!issuer.verify(&user_token, t0()).unwrap().is_admin());
    assert!(issuer.verify(&admin_token, t0()).unwrap().is_admin());
}

#[test]
fn test_unsigned_token_is_rejected() {
    let issuer = TokenIssuer::new(b"server-secret", Duration::days(7));
    let token = issuer.issue(&account("ada@example.com", Role::Admin), t0()).unwrap();
    let unsigned = token.rsplit_once('.').map(|(head, _)| format!("{head}.")).unwrap();

    assert_eq!(issuer.verify(&unsigned, t0()), Err(AuthError::InvalidToken));
}

#[test]
fn test_expiry_boundary() {
    let issuer = TokenIssuer::new(b"server-secret", Duration::days(7));
    let token = issuer.issue(&account("ada@example.com", Role::User), t0()).unwrap();
    let expires = t0() + Duration::days(7);

    assert!(issuer.verify(&token, expires - Duration::seconds(1)).is_ok());
    assert_eq!(issuer.verify(&token, expires), Err(AuthError::SessionExpired));
}

#[test]
fn test_claims_snapshot_identity() {
    let issuer = TokenIssuer::new(b"server-secret", Duration::days(7));
    let user = account("ada@example.com", Role::User);
    let claims = issuer
        .verify(&issuer.issue(&user, t0()).unwrap(), t0())
        .unwrap();

    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.iat, t0().timestamp());
    assert_eq!(claims.exp - claims.iat, Duration::days(7).num_seconds());
}

#[test]
fn test_password_hashes_are_salted() {
    let hasher = PasswordHasher::new(MIN_COST);
    let first = hasher.hash("correct horse").unwrap();
    let second = hasher.hash("correct horse").unwrap();

    assert_ne!(first, second);
    assert!(hasher.verify("correct horse", &first));
    assert!(hasher.verify("correct horse", &second));
    assert!(!hasher.verify("correct horse ", &first));
    assert!(!hasher.verify("Correct horse", &first));
}
