//! Signed session cookies for dashboard users.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::domain::entities::User;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Name of the cookie carrying the session.
pub const SESSION_COOKIE: &str = "session";

/// Identity carried by a verified session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies stateless session cookies.
///
/// The cookie value is `base64url(user_id \n email \n expires_unix)` followed by a
/// `.` and the hex HMAC-SHA256 of that payload, keyed by the server secret. Nothing
/// is stored server-side.
pub struct SessionService {
    secret: String,
    ttl: Duration,
}

impl SessionService {
    /// Creates a session service.
    ///
    /// # Arguments
    ///
    /// - `secret` - HMAC key; rotating it invalidates every issued session
    /// - `ttl_seconds` - session lifetime
    pub fn new(secret: String, ttl_seconds: u64) -> Self {
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self { secret, ttl }
    }

    /// Session lifetime in whole seconds, used for the cookie `Max-Age`.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    fn mac(&self) -> Result<HmacSha256, AppError> {
        HmacSha256::new_from_slice(self.secret.as_bytes()).map_err(|e| {
            AppError::internal(
                "Session signing unavailable",
                json!({ "reason": e.to_string() }),
            )
        })
    }

    /// Mints a cookie value for `user`, valid from now for the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the signing key can't be initialised or the
    /// expiry overflows.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        self.issue_at(user, Utc::now())
    }

    fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, AppError> {
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            AppError::internal("Session lifetime out of range", json!({}))
        })?;
        let payload = format!("{}\n{}\n{}", user.id, user.email, expires_at.timestamp());
        let encoded = URL_SAFE_NO_PAD.encode(payload.as_bytes());

        let mut mac = self.mac()?;
        mac.update(encoded.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", encoded, signature))
    }

    /// Verifies a cookie value.
    ///
    /// Returns `None` for a bad signature, malformed payload or an expired session.
    pub fn verify(&self, value: &str) -> Option<SessionClaims> {
        self.verify_at(value, Utc::now())
    }

    fn verify_at(&self, value: &str, now: DateTime<Utc>) -> Option<SessionClaims> {
        let (encoded, signature) = value.split_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac().ok()?;
        mac.update(encoded.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let payload = String::from_utf8(URL_SAFE_NO_PAD.decode(encoded).ok()?).ok()?;
        let mut parts = payload.splitn(3, '\n');
        let user_id = parts.next()?.to_string();
        let email = parts.next()?.to_string();
        let expires_at = DateTime::from_timestamp(parts.next()?.parse().ok()?, 0)?;

        if expires_at <= now {
            return None;
        }

        Some(SessionClaims {
            user_id,
            email,
            expires_at,
        })
    }

    /// `Set-Cookie` header value establishing a session.
    pub fn cookie(&self, value: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE,
            value,
            self.ttl_seconds()
        )
    }

    /// `Set-Cookie` header value removing the session.
    pub fn clear_cookie(&self) -> String {
        format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            SESSION_COOKIE
        )
    }
}

/// Extracts a cookie value by name from a `Cookie` header.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|cookie| {
        let (key, value) = cookie.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}
