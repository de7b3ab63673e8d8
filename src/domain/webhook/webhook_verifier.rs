//! Payment gateway webhook signature verification.
//!
//! The gateway signs the exact request body with HMAC-SHA256 using the
//! merchant's shared secret and sends the hex digest alongside it. The
//! digest is always computed over the raw bytes received, never over a
//! re-serialized form of the payload.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Optional scheme prefix some senders put in front of the hex digest.
const SCHEME_PREFIX: &str = "sha256=";

/// Verifies webhook bodies against the shared secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: SecretString,
}

impl SignatureVerifier {
    /// Creates a verifier for the given shared secret.
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Returns true if `declared_signature` is the HMAC of `raw_body`.
    ///
    /// A malformed or missing signature is simply `false`; callers decide how
    /// to respond.
    pub fn verify(&self, raw_body: &[u8], declared_signature: &str) -> bool {
        verify(self.secret.expose_secret().as_bytes(), raw_body, declared_signature)
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Verifies `declared_signature` (hex, optionally `sha256=`-prefixed) against
/// the HMAC-SHA256 of `raw_body` under `secret`.
pub fn verify(secret: &[u8], raw_body: &[u8], declared_signature: &str) -> bool {
    let declared = declared_signature.trim();
    let declared = declared.strip_prefix(SCHEME_PREFIX).unwrap_or(declared);

    let Ok(provided) = hex::decode(declared) else {
        return false;
    };
    let Some(expected) = compute_signature(secret, raw_body) else {
        return false;
    };

    constant_time_compare(&expected, &provided)
}

/// Produces the hex signature a sender would attach to `raw_body`.
///
/// Used by tests and local tooling that replay gateway callbacks.
pub fn sign_payload(secret: &[u8], raw_body: &[u8]) -> String {
    compute_signature(secret, raw_body)
        .map(hex::encode)
        .unwrap_or_default()
}

fn compute_signature(secret: &[u8], raw_body: &[u8]) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(raw_body);
    Some(mac.finalize().into_bytes().to_vec())
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_SECRET: &str = "merchant_secret_12345";
    const PAYLOAD: &str =
        r#"{"order":{"mrc_order_id":"ORDER_1700000000","stat":"c"},"txn":{"stat":1}}"#;

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new(SecretString::new(TEST_SECRET.to_string()))
    }

    // ══════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_valid_signature() {
        let signature = sign_payload(TEST_SECRET.as_bytes(), PAYLOAD.as_bytes());

        assert!(verifier().verify(PAYLOAD.as_bytes(), &signature));
    }

    #[test]
    fn verify_accepts_uppercase_hex_and_scheme_prefix() {
        let signature = sign_payload(TEST_SECRET.as_bytes(), PAYLOAD.as_bytes());
        let declared = format!("sha256={}", signature.to_uppercase());

        assert!(verifier().verify(PAYLOAD.as_bytes(), &declared));
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let signature = sign_payload(b"another_secret", PAYLOAD.as_bytes());

        assert!(!verifier().verify(PAYLOAD.as_bytes(), &signature));
    }

    #[test]
    fn verify_tampered_payload_fails() {
        let signature = sign_payload(TEST_SECRET.as_bytes(), PAYLOAD.as_bytes());
        let tampered = PAYLOAD.replace("ORDER_1700000000", "ORDER_1700000001");

        assert!(!verifier().verify(tampered.as_bytes(), &signature));
    }

    #[test]
    fn verify_uses_raw_bytes_not_reserialized_json() {
        // Same JSON value, different whitespace: the signature must not carry over.
        let signature = sign_payload(TEST_SECRET.as_bytes(), PAYLOAD.as_bytes());
        let reformatted = serde_json::to_string_pretty(
            &serde_json::from_str::<serde_json::Value>(PAYLOAD).unwrap(),
        )
        .unwrap();

        assert!(!verifier().verify(reformatted.as_bytes(), &signature));
    }

    #[test]
    fn verify_non_hex_signature_fails() {
        assert!(!verifier().verify(PAYLOAD.as_bytes(), "not_valid_hex"));
    }

    #[test]
    fn verify_empty_signature_fails() {
        assert!(!verifier().verify(PAYLOAD.as_bytes(), ""));
    }

    #[test]
    fn verify_truncated_signature_fails() {
        let signature = sign_payload(TEST_SECRET.as_bytes(), PAYLOAD.as_bytes());

        assert!(!verifier().verify(PAYLOAD.as_bytes(), &signature[..32]));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let output = format!("{:?}", verifier());
        assert!(!output.contains(TEST_SECRET));
    }

    // ══════════════════════════════════════════════════════════════
    // Constant Time Comparison Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn constant_time_compare_equal_values() {
        assert!(constant_time_compare(&[1, 2, 3, 4, 5], &[1, 2, 3, 4, 5]));
    }

    #[test]
    fn constant_time_compare_different_values() {
        assert!(!constant_time_compare(&[1, 2, 3, 4, 5], &[1, 2, 3, 4, 6]));
    }

    #[test]
    fn constant_time_compare_different_lengths() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 3, 4]));
    }

    // ══════════════════════════════════════════════════════════════
    // Properties
    // ══════════════════════════════════════════════════════════════

    proptest! {
        #[test]
        fn signed_bodies_always_verify(body in proptest::collection::vec(any::<u8>(), 0..512)) {
            let signature = sign_payload(TEST_SECRET.as_bytes(), &body);
            prop_assert!(verifier().verify(&body, &signature));
        }

        #[test]
        fn flipping_any_byte_breaks_the_signature(
            body in proptest::collection::vec(any::<u8>(), 1..256),
            index in any::<proptest::sample::Index>(),
        ) {
            let signature = sign_payload(TEST_SECRET.as_bytes(), &body);
            let mut tampered = body.clone();
            let i = index.index(tampered.len());
            tampered[i] ^= 0x01;
            prop_assert!(!verifier().verify(&tampered, &signature));
        }
    }
}
