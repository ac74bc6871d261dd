use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Bytes the auth layer signs to assert a caller's identity
///
/// Fields are newline-separated; none of them may contain a newline.
pub fn identity_signing_payload(email: &str, username: &str, role: &str, timestamp: i64) -> String {
    format!("{}\n{}\n{}\n{}", email, username, role, timestamp)
}

/// Sign data with HMAC-SHA256 and hex-encode the tag
///
/// The auth layer uses this to produce `x-identity-signature`.
pub fn sign_hmac(data: &str, secret: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(data.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Verify HMAC-SHA256 signature
///
/// Proves the identity headers were produced by the auth layer that holds
/// the shared secret, not by the client.
///
/// # Arguments
/// * `data` - The data that was signed
/// * `signature` - The hex-encoded HMAC signature
/// * `secret` - The shared secret key (from environment)
pub fn verify_hmac(data: &str, signature: &str, secret: &str) -> bool {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return false;
        }
    };

    mac.update(data.as_bytes());

    let sig_bytes = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid hex signature format");
            return false;
        }
    };

    // Constant-time comparison
    mac.verify_slice(&sig_bytes).is_ok()
}

/// Validate timestamp is within acceptable range
///
/// Prevents replaying captured identity headers.
///
/// # Arguments
/// * `timestamp` - Unix timestamp in seconds from the auth layer
/// * `max_age_secs` - Maximum clock skew allowed in either direction
pub fn validate_timestamp(timestamp: i64, max_age_secs: i64) -> bool {
    let now = chrono::Utc::now().timestamp();
    let age_seconds = now.saturating_sub(timestamp).saturating_abs();

    if age_seconds > max_age_secs {
        tracing::warn!(
            "Identity timestamp out of range: {} seconds (max: {})",
            age_seconds,
            max_age_secs
        );
        return false;
    }

    true
}
