//! Request integrity check.
//!
//! Every call carries `X-UserId` and `X-Digest` headers. The digest is the
//! lowercase hex HMAC-SHA1 of the raw request body under a shared secret.
//! Verification works on the bytes exactly as received, before any parsing,
//! and hands the same buffer back so the body is never read twice.

use hmac::{Hmac, Mac, digest::InvalidLength};
use sha1::Sha1;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing authentication headers")]
    MissingCredentials,
    #[error("Invalid digest")]
    InvalidDigest,
}

#[derive(Clone)]
pub struct AuthGuard {
    // keyed once, cloned per request
    mac: HmacSha1,
}

impl std::fmt::Debug for AuthGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGuard").finish_non_exhaustive()
    }
}

impl AuthGuard {
    pub fn new(secret: &[u8]) -> Result<Self, InvalidLength> {
        Ok(Self {
            mac: HmacSha1::new_from_slice(secret)?,
        })
    }

    /// Hex digest a well-behaved client sends for `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = self.mac.clone();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Checks the credentials against `raw_body` and returns the body untouched.
    ///
    /// `user_id` only has to be present, it is not matched against wallet
    /// ownership.
    pub fn verify<B>(&self, raw_body: B, user_id: &str, digest: &str) -> Result<B, AuthError>
    where
        B: AsRef<[u8]>,
    {
        if user_id.is_empty() || digest.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let expected = self.sign(raw_body.as_ref());
        if constant_time_eq(expected.as_bytes(), digest.as_bytes()) {
            Ok(raw_body)
        } else {
            Err(AuthError::InvalidDigest)
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
