//! Token codec behaviour seen from outside the crate

use chrono::{Duration, Utc};
use movie_api::token::{Payload, TokenMaker};
use movie_api::Error;
use uuid::Uuid;

const KEY: &str = "token-tests-signing-key-0123456789abcdef";

fn maker() -> TokenMaker {
    TokenMaker::new(KEY).unwrap()
}

#[test]
fn test_valid_until_expiry() {
    let maker = maker();
    let session_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let (token, issued) = maker.issue(session_id, user_id, Duration::minutes(15)).unwrap();
    assert_eq!(token.split('.').count(), 3);
    assert_eq!(issued.exp - issued.iat, 15 * 60);

    let payload = maker.verify(&token).unwrap();
    assert_eq!(payload, issued);
    assert!(Utc::now() < payload.expires_at());
}

#[test]
fn test_expired_at_or_after_exp() {
    let maker = maker();

    let (past, _) = maker
        .issue(Uuid::new_v4(), Uuid::new_v4(), Duration::seconds(-1))
        .unwrap();
    assert!(matches!(maker.verify(&past), Err(Error::ExpiredToken)));

    let (now, _) = maker
        .issue(Uuid::new_v4(), Uuid::new_v4(), Duration::zero())
        .unwrap();
    assert!(matches!(maker.verify(&now), Err(Error::ExpiredToken)));
}

#[test]
fn test_payload_validity_ignores_signature() {
    let mut payload = Payload::new(Uuid::new_v4(), Uuid::new_v4(), Duration::minutes(1));
    assert!(payload.valid().is_ok());

    payload.exp = Utc::now().timestamp() - 1;
    assert!(matches!(payload.valid(), Err(Error::ExpiredToken)));
}

#[test]
fn test_single_byte_tamper_is_invalid() {
    let maker = maker();
    let (token, _) = maker
        .issue(Uuid::new_v4(), Uuid::new_v4(), Duration::minutes(5))
        .unwrap();

    let bytes = token.as_bytes();
    for i in 0..bytes.len() {
        if bytes[i] == b'.' {
            continue;
        }
        let mut tampered = bytes.to_vec();
        tampered[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        match maker.verify(&tampered) {
            Err(Error::InvalidToken) => {}
            other => panic!("byte {} accepted or misclassified: {:?}", i, other.map(|p| p.session_id)),
        }
    }
}

#[test]
fn test_other_key_rejects() {
    let (token, _) = maker()
        .issue(Uuid::new_v4(), Uuid::new_v4(), Duration::minutes(5))
        .unwrap();
    let other = TokenMaker::new("another-signing-key-abcdefghijklmnopqrstuvwxyz").unwrap();
    assert!(matches!(other.verify(&token), Err(Error::InvalidToken)));
}

#[test]
fn test_short_key_is_refused() {
    assert!(matches!(TokenMaker::new("short"), Err(Error::Signing(_))));
}
