//! Password hashing for account credentials.
//!
//! PBKDF2-HMAC-SHA256 with a per-credential random salt. The stored form is
//! self-describing (`pbkdf2-sha256$iterations$salt$digest`, base64 fields) so
//! iteration counts can change without invalidating existing credentials.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
const SALT_LENGTH: usize = 16;
const DIGEST_LENGTH: usize = 32;
const SCHEME: &str = "pbkdf2-sha256";

/// Hash a password for storing.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = derive(password, &salt, PBKDF2_ITERATIONS);
    format!(
        "{SCHEME}${PBKDF2_ITERATIONS}${}${}",
        BASE64.encode(salt),
        BASE64.encode(digest.as_slice()),
    )
}

/// Check a password against a stored credential hash.
///
/// Digest comparison is constant-time. Any malformed stored value verifies
/// as false rather than erroring — the caller must not learn why a login
/// failed.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (scheme, iterations, salt, digest) = match (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) {
        (Some(scheme), Some(iterations), Some(salt), Some(digest), None) => {
            (scheme, iterations, salt, digest)
        }
        _ => return false,
    };
    if scheme != SCHEME {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(digest)) = (BASE64.decode(salt), BASE64.decode(digest)) else {
        return false;
    };
    if digest.len() != DIGEST_LENGTH {
        return false;
    }

    let candidate = derive(password, &salt, iterations);
    candidate.as_slice().ct_eq(&digest).into()
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; DIGEST_LENGTH]> {
    let mut out = Zeroizing::new([0u8; DIGEST_LENGTH]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, out.as_mut_slice());
    out
}
