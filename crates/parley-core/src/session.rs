//! Admin session guard — a time-boxed binary gate.
//!
//! Two states: Anonymous and Authenticated. Authentication compares the
//! supplied code against the configured shared secret in constant time;
//! success sets a fixed expiry six hours out. There is no
//! refresh-on-activity: a long session expires at the boundary regardless
//! of use. Expiry is observed lazily, on the next guard check.
//!
//! This is a binary gate, not a capability system — one shared secret
//! grants all admin powers.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

/// How long an authenticated session lasts.
pub const SESSION_TTL_HOURS: i64 = 6;

// ─── Secret ──────────────────────────────────────────────────────────────────

/// The configured admin shared secret, held as a SHA-256 digest so the
/// comparison is over fixed-length arrays rather than variable-length
/// strings.
#[derive(Clone)]
pub struct AdminSecret {
  digest: [u8; 32],
}

impl AdminSecret {
  pub fn new(secret: &str) -> Self {
    Self { digest: Sha256::digest(secret.as_bytes()).into() }
  }

  /// Constant-time check of `code` against the secret: the digests are
  /// combined bitwise over their full length, never short-circuiting.
  pub fn verify(&self, code: &str) -> bool {
    let candidate: [u8; 32] = Sha256::digest(code.as_bytes()).into();
    self
      .digest
      .iter()
      .zip(candidate.iter())
      .fold(0u8, |acc, (a, b)| acc | (a ^ b))
      == 0
  }
}

impl std::fmt::Debug for AdminSecret {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    // Never print the digest.
    f.write_str("AdminSecret(..)")
  }
}

// ─── Guard ───────────────────────────────────────────────────────────────────

/// One user's admin session state.
#[derive(Debug, Clone, Default)]
pub struct SessionGuard {
  expiry: Option<DateTime<Utc>>,
}

impl SessionGuard {
  pub fn new() -> Self {
    Self::default()
  }

  /// Anonymous → Authenticated on code match. Returns whether the code was
  /// accepted; on success the expiry is `now + 6h`.
  pub fn authenticate(
    &mut self,
    secret: &AdminSecret,
    code: &str,
    now: DateTime<Utc>,
  ) -> bool {
    if secret.verify(code) {
      self.expiry = Some(now + Duration::hours(SESSION_TTL_HOURS));
      true
    } else {
      false
    }
  }

  /// Whether the session is active at `now`. An expired session is cleared
  /// here, lazily.
  pub fn is_active(&mut self, now: DateTime<Utc>) -> bool {
    match self.expiry {
      Some(expiry) if now < expiry => true,
      Some(_) => {
        self.expiry = None;
        false
      }
      None => false,
    }
  }

  /// Authenticated → Anonymous, unconditionally.
  pub fn logout(&mut self) {
    self.expiry = None;
  }

  pub fn expires_at(&self) -> Option<DateTime<Utc>> {
    self.expiry
  }
}
