use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::constants::MAX_IDENTITY_AGE_SECS;
use crate::error::{AppError, Result};
use crate::models::{Identity, Role};
use crate::security::{identity_signing_payload, validate_timestamp, verify_hmac};
use crate::AppState;

pub const HEADER_EMAIL: &str = "x-identity-email";
pub const HEADER_NAME: &str = "x-identity-name";
pub const HEADER_ROLE: &str = "x-identity-role";
pub const HEADER_TIMESTAMP: &str = "x-identity-timestamp";
pub const HEADER_SIGNATURE: &str = "x-identity-signature";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthenticated)
}

/// Verify the identity assertion the auth layer attached to a request
///
/// Any missing header, bad signature, stale timestamp or malformed field
/// rejects the request as unauthenticated.
pub fn identity_from_headers(headers: &HeaderMap, secret: &str) -> Result<Identity> {
    let email = header(headers, HEADER_EMAIL)?;
    let username = header(headers, HEADER_NAME)?;
    let role = header(headers, HEADER_ROLE)?;
    let signature = header(headers, HEADER_SIGNATURE)?;
    let timestamp: i64 = header(headers, HEADER_TIMESTAMP)?
        .parse()
        .map_err(|_| AppError::Unauthenticated)?;

    let payload = identity_signing_payload(email, username, role, timestamp);
    if !verify_hmac(&payload, signature, secret) {
        tracing::warn!("Invalid identity signature for {}", email);
        return Err(AppError::Unauthenticated);
    }

    if !validate_timestamp(timestamp, MAX_IDENTITY_AGE_SECS) {
        return Err(AppError::Unauthenticated);
    }

    let role: Role = role.parse()?;
    Identity::new(email, username, role).map_err(|e| {
        tracing::warn!("Signed identity rejected: {}", e);
        AppError::Unauthenticated
    })
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        identity_from_headers(&parts.headers, &state.config.identity_secret_key)
    }
}

/// Reject callers that are not instructors
pub fn require_instructor(identity: &Identity) -> Result<()> {
    if identity.is_instructor() {
        Ok(())
    } else {
        tracing::warn!("Instructor view denied for {}", identity.email);
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::sign_hmac;
    use axum::http::HeaderValue;

    const SECRET: &str = "identity-secret";

    fn signed_headers(email: &str, name: &str, role: &str, timestamp: i64) -> HeaderMap {
        let payload = identity_signing_payload(email, name, role, timestamp);
        let signature = sign_hmac(&payload, SECRET).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(HEADER_EMAIL, HeaderValue::from_str(email).unwrap());
        headers.insert(HEADER_NAME, HeaderValue::from_str(name).unwrap());
        headers.insert(HEADER_ROLE, HeaderValue::from_str(role).unwrap());
        headers.insert(HEADER_TIMESTAMP, HeaderValue::from(timestamp));
        headers.insert(HEADER_SIGNATURE, HeaderValue::from_str(&signature).unwrap());
        headers
    }

    #[test]
    fn test_valid_identity() {
        let now = chrono::Utc::now().timestamp();
        let headers = signed_headers("Siti@Example.com", "Siti", "learner", now);

        let identity = identity_from_headers(&headers, SECRET).unwrap();
        assert_eq!(identity.email, "siti@example.com");
        assert_eq!(identity.username, "Siti");
        assert_eq!(identity.role, Role::Learner);
    }

    #[test]
    fn test_missing_headers() {
        let result = identity_from_headers(&HeaderMap::new(), SECRET);
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_role_escalation_is_detected() {
        let now = chrono::Utc::now().timestamp();
        let mut headers = signed_headers("siti@example.com", "Siti", "learner", now);
        headers.insert(HEADER_ROLE, HeaderValue::from_static("instructor"));

        let result = identity_from_headers(&headers, SECRET);
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_stale_identity() {
        let old = chrono::Utc::now().timestamp() - MAX_IDENTITY_AGE_SECS - 60;
        let headers = signed_headers("siti@example.com", "Siti", "learner", old);

        let result = identity_from_headers(&headers, SECRET);
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_signed_but_malformed_email() {
        let now = chrono::Utc::now().timestamp();
        let headers = signed_headers("not-an-email", "Siti", "learner", now);

        let result = identity_from_headers(&headers, SECRET);
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_require_instructor() {
        let teacher = Identity::new("guru@example.com", "Guru", Role::Instructor).unwrap();
        let learner = Identity::new("siti@example.com", "Siti", Role::Learner).unwrap();

        assert!(require_instructor(&teacher).is_ok());
        assert!(matches!(
            require_instructor(&learner),
            Err(AppError::Forbidden)
        ));
    }
}
